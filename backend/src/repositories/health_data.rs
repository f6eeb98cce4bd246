//! Health data repository - the wide table of timestamped readings

use super::{parse_tag, record_write};
use anyhow::Result;
use chrono::{DateTime, Utc};
use pixelpulse_shared::models::{HealthData, HealthDataType};
use sqlx::SqlitePool;

/// Health data row as stored
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HealthDataRecord {
    pub id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub data_type: String,
    pub value: f64,
    pub unit: String,
    pub source: String,
    pub confidence: f64,
    pub notes: Option<String>,
}

impl TryFrom<HealthDataRecord> for HealthData {
    type Error = anyhow::Error;

    fn try_from(r: HealthDataRecord) -> Result<Self> {
        Ok(HealthData {
            data_type: parse_tag("data_type", &r.data_type)?,
            source: parse_tag("source", &r.source)?,
            id: r.id,
            user_id: r.user_id,
            timestamp: r.timestamp,
            value: r.value,
            unit: r.unit,
            confidence: r.confidence,
            notes: r.notes,
        })
    }
}

fn into_models(records: Vec<HealthDataRecord>) -> Result<Vec<HealthData>> {
    records.into_iter().map(HealthData::try_from).collect()
}

const UPSERT_SQL: &str = r#"
    INSERT OR REPLACE INTO health_data (
        id, user_id, timestamp, data_type, value, unit, source, confidence, notes
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

/// Health data repository
pub struct HealthDataRepository;

impl HealthDataRepository {
    /// Insert or replace one reading
    pub async fn upsert(db: &SqlitePool, data: &HealthData) -> Result<()> {
        sqlx::query(UPSERT_SQL)
            .bind(&data.id)
            .bind(&data.user_id)
            .bind(data.timestamp)
            .bind(data.data_type.as_str())
            .bind(data.value)
            .bind(&data.unit)
            .bind(data.source.as_str())
            .bind(data.confidence)
            .bind(&data.notes)
            .execute(db)
            .await?;

        record_write("health_data", 1);
        Ok(())
    }

    /// Insert or replace a batch in one transaction
    pub async fn upsert_many(db: &SqlitePool, items: &[HealthData]) -> Result<u64> {
        let mut tx = db.begin().await?;
        let mut written = 0;

        for data in items {
            written += sqlx::query(UPSERT_SQL)
                .bind(&data.id)
                .bind(&data.user_id)
                .bind(data.timestamp)
                .bind(data.data_type.as_str())
                .bind(data.value)
                .bind(&data.unit)
                .bind(data.source.as_str())
                .bind(data.confidence)
                .bind(&data.notes)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;
        record_write("health_data", items.len() as u64);
        Ok(written)
    }

    pub async fn find_by_id(db: &SqlitePool, id: &str) -> Result<Option<HealthData>> {
        let record = sqlx::query_as::<_, HealthDataRecord>(
            r#"
            SELECT id, user_id, timestamp, data_type, value, unit, source, confidence, notes
            FROM health_data
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        record.map(HealthData::try_from).transpose()
    }

    /// All readings for a user, newest first
    pub async fn list_by_user(db: &SqlitePool, user_id: &str) -> Result<Vec<HealthData>> {
        let records = sqlx::query_as::<_, HealthDataRecord>(
            r#"
            SELECT id, user_id, timestamp, data_type, value, unit, source, confidence, notes
            FROM health_data
            WHERE user_id = ?
            ORDER BY timestamp DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;

        into_models(records)
    }

    /// Readings of one type with `start <= timestamp <= end`, newest first
    pub async fn list_by_type_in_range(
        db: &SqlitePool,
        user_id: &str,
        data_type: HealthDataType,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HealthData>> {
        let records = sqlx::query_as::<_, HealthDataRecord>(
            r#"
            SELECT id, user_id, timestamp, data_type, value, unit, source, confidence, notes
            FROM health_data
            WHERE user_id = ? AND data_type = ? AND timestamp >= ? AND timestamp <= ?
            ORDER BY timestamp DESC
            "#,
        )
        .bind(user_id)
        .bind(data_type.as_str())
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await?;

        into_models(records)
    }

    /// Readings of every type with `start <= timestamp <= end`, newest first
    pub async fn list_in_range(
        db: &SqlitePool,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HealthData>> {
        let records = sqlx::query_as::<_, HealthDataRecord>(
            r#"
            SELECT id, user_id, timestamp, data_type, value, unit, source, confidence, notes
            FROM health_data
            WHERE user_id = ? AND timestamp >= ? AND timestamp <= ?
            ORDER BY timestamp DESC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await?;

        into_models(records)
    }

    /// Most recent reading of a type
    pub async fn latest_by_type(
        db: &SqlitePool,
        user_id: &str,
        data_type: HealthDataType,
    ) -> Result<Option<HealthData>> {
        let record = sqlx::query_as::<_, HealthDataRecord>(
            r#"
            SELECT id, user_id, timestamp, data_type, value, unit, source, confidence, notes
            FROM health_data
            WHERE user_id = ? AND data_type = ?
            ORDER BY timestamp DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(data_type.as_str())
        .fetch_optional(db)
        .await?;

        record.map(HealthData::try_from).transpose()
    }

    pub async fn delete(db: &SqlitePool, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM health_data WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_by_type(
        db: &SqlitePool,
        user_id: &str,
        data_type: HealthDataType,
    ) -> Result<u64> {
        let result = sqlx::query("DELETE FROM health_data WHERE user_id = ? AND data_type = ?")
            .bind(user_id)
            .bind(data_type.as_str())
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_all_for_user(db: &SqlitePool, user_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM health_data WHERE user_id = ?")
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_in_memory_pool;
    use chrono::{Duration, TimeZone};
    use pixelpulse_shared::models::DataSource;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 10, hour, 0, 0).unwrap()
    }

    fn reading(id: &str, data_type: HealthDataType, value: f64, hour: u32) -> HealthData {
        HealthData::new("u1", data_type, value).with_id(id).at(at(hour))
    }

    #[tokio::test]
    async fn test_upsert_and_find() {
        let db = create_in_memory_pool().await.unwrap();
        let mut data = reading("h1", HealthDataType::BloodGlucose, 98.5, 7);
        data.source = DataSource::MedicalDevice;
        data.confidence = 0.9;
        data.notes = Some("Fasting".into());
        HealthDataRepository::upsert(&db, &data).await.unwrap();

        let loaded = HealthDataRepository::find_by_id(&db, "h1").await.unwrap().unwrap();
        assert_eq!(loaded, data);
    }

    #[tokio::test]
    async fn test_same_id_replaces() {
        let db = create_in_memory_pool().await.unwrap();
        HealthDataRepository::upsert(&db, &reading("h1", HealthDataType::HeartRate, 60.0, 7))
            .await
            .unwrap();
        HealthDataRepository::upsert(&db, &reading("h1", HealthDataType::HeartRate, 65.0, 7))
            .await
            .unwrap();

        let all = HealthDataRepository::list_by_user(&db, "u1").await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].value, 65.0);
    }

    #[tokio::test]
    async fn test_range_is_inclusive_and_newest_first() {
        let db = create_in_memory_pool().await.unwrap();
        let batch = vec![
            reading("a", HealthDataType::HeartRate, 60.0, 6),
            reading("b", HealthDataType::HeartRate, 70.0, 8),
            reading("c", HealthDataType::HeartRate, 80.0, 10),
            reading("d", HealthDataType::HeartRate, 90.0, 12),
            reading("s", HealthDataType::Steps, 500.0, 9),
        ];
        assert_eq!(HealthDataRepository::upsert_many(&db, &batch).await.unwrap(), 5);

        let hr = HealthDataRepository::list_by_type_in_range(
            &db,
            "u1",
            HealthDataType::HeartRate,
            at(8),
            at(10),
        )
        .await
        .unwrap();
        let ids: Vec<&str> = hr.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);

        let window = HealthDataRepository::list_in_range(&db, "u1", at(8), at(10))
            .await
            .unwrap();
        assert_eq!(window.len(), 3);
    }

    #[tokio::test]
    async fn test_latest_and_deletes() {
        let db = create_in_memory_pool().await.unwrap();
        let batch = vec![
            reading("w1", HealthDataType::Weight, 70.0, 6),
            reading("w2", HealthDataType::Weight, 69.5, 18),
            reading("s1", HealthDataType::Steps, 4000.0, 12),
        ];
        HealthDataRepository::upsert_many(&db, &batch).await.unwrap();

        let latest = HealthDataRepository::latest_by_type(&db, "u1", HealthDataType::Weight)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.id, "w2");

        assert_eq!(
            HealthDataRepository::delete_by_type(&db, "u1", HealthDataType::Weight)
                .await
                .unwrap(),
            2
        );
        assert!(HealthDataRepository::delete(&db, "s1").await.unwrap());
        assert!(!HealthDataRepository::delete(&db, "s1").await.unwrap());
        assert_eq!(HealthDataRepository::delete_all_for_user(&db, "u1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_stored_tag_is_an_error() {
        let db = create_in_memory_pool().await.unwrap();
        sqlx::query(
            "INSERT INTO health_data (id, user_id, timestamp, data_type, value, unit) VALUES ('x', 'u1', ?, 'PULSE', 1.0, 'bpm')",
        )
        .bind(Utc::now() - Duration::minutes(1))
        .execute(&db)
        .await
        .unwrap();

        let err = HealthDataRepository::find_by_id(&db, "x").await.unwrap_err();
        assert!(format!("{:#}", err).contains("Unknown health data type: PULSE"));
    }
}
