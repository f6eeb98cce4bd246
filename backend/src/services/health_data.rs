//! Health data service
//!
//! Validates readings before they reach the wide table, writes the typed
//! readings through their row mappings, and classifies heart-rate and
//! blood-pressure history on the way out.

use crate::error::ApiError;
use crate::repositories::nutrition::day_bounds;
use crate::repositories::{HealthDataRepository, UserRepository};
use chrono::{DateTime, NaiveDate, Utc};
use pixelpulse_shared::health_metrics::{
    classify_blood_pressure, classify_heart_rate, BloodPressureCategory, HeartRateZone,
};
use pixelpulse_shared::readings::{
    ActivityRecord, BloodPressureReading, HeartRateReading, HydrationEntry, SleepRecord,
    StressReading,
};
use pixelpulse_shared::validation::validate_health_data;
use pixelpulse_shared::{HealthData, HealthDataQuery, HealthDataType};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Upper bound for open-ended ranges (9999-12-31T23:59:59Z)
const FAR_FUTURE_SECS: i64 = 253_402_300_799;

/// Heart-rate reading with its training zone, when the user's age is known
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedHeartRate {
    #[serde(flatten)]
    pub reading: HeartRateReading,
    pub zone: Option<HeartRateZone>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedBloodPressure {
    #[serde(flatten)]
    pub reading: BloodPressureReading,
    pub category: BloodPressureCategory,
}

fn open_range(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = start.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    let end = end
        .or_else(|| DateTime::from_timestamp(FAR_FUTURE_SECS, 0))
        .unwrap_or_else(Utc::now);
    (start, end)
}

/// Health data service
pub struct HealthDataService;

impl HealthDataService {
    /// Validate and store one reading
    pub async fn record(db: &SqlitePool, data: HealthData) -> Result<HealthData, ApiError> {
        validate_health_data(&data)?;
        HealthDataRepository::upsert(db, &data)
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = %data.user_id, data_type = %data.data_type, "Recorded health data");
        Ok(data)
    }

    /// Validate every reading, then store the batch in one transaction
    pub async fn record_many(db: &SqlitePool, items: &[HealthData]) -> Result<u64, ApiError> {
        for data in items {
            validate_health_data(data)?;
        }
        let written = HealthDataRepository::upsert_many(db, items)
            .await
            .map_err(ApiError::Internal)?;

        info!(count = written, "Recorded health data batch");
        Ok(written)
    }

    pub async fn get(db: &SqlitePool, id: &str) -> Result<HealthData, ApiError> {
        HealthDataRepository::find_by_id(db, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(format!("Health data {} not found", id)))
    }

    /// List readings, newest first, filtered by type and/or an inclusive window
    pub async fn query(db: &SqlitePool, query: &HealthDataQuery) -> Result<Vec<HealthData>, ApiError> {
        debug!(user_id = %query.user_id, data_type = ?query.data_type, "Querying health data");

        let result = match (query.data_type, query.start, query.end) {
            (None, None, None) => HealthDataRepository::list_by_user(db, &query.user_id).await,
            (Some(data_type), start, end) => {
                let (start, end) = open_range(start, end);
                HealthDataRepository::list_by_type_in_range(
                    db,
                    &query.user_id,
                    data_type,
                    start,
                    end,
                )
                .await
            }
            (None, start, end) => {
                let (start, end) = open_range(start, end);
                HealthDataRepository::list_in_range(db, &query.user_id, start, end).await
            }
        };
        result.map_err(ApiError::Internal)
    }

    pub async fn latest(
        db: &SqlitePool,
        user_id: &str,
        data_type: HealthDataType,
    ) -> Result<HealthData, ApiError> {
        HealthDataRepository::latest_by_type(db, user_id, data_type)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(format!("No {} readings", data_type)))
    }

    pub async fn delete(db: &SqlitePool, id: &str) -> Result<(), ApiError> {
        let deleted = HealthDataRepository::delete(db, id)
            .await
            .map_err(ApiError::Internal)?;
        if !deleted {
            return Err(ApiError::NotFound(format!("Health data {} not found", id)));
        }
        Ok(())
    }

    pub async fn delete_by_type(
        db: &SqlitePool,
        user_id: &str,
        data_type: HealthDataType,
    ) -> Result<u64, ApiError> {
        HealthDataRepository::delete_by_type(db, user_id, data_type)
            .await
            .map_err(ApiError::Internal)
    }

    // ===== Typed readings =====

    pub async fn record_heart_rate(
        db: &SqlitePool,
        reading: HeartRateReading,
    ) -> Result<HeartRateReading, ApiError> {
        Self::record(db, reading.to_health_data()).await?;
        Ok(reading)
    }

    pub async fn record_blood_pressure(
        db: &SqlitePool,
        reading: BloodPressureReading,
    ) -> Result<BloodPressureReading, ApiError> {
        if !(30..=200).contains(&reading.diastolic) {
            return Err(pixelpulse_shared::ValidationError::new(
                "diastolic",
                "Diastolic value must be between 30 and 200",
            )
            .into());
        }
        Self::record(db, reading.to_health_data()).await?;
        Ok(reading)
    }

    pub async fn record_sleep(db: &SqlitePool, record: SleepRecord) -> Result<SleepRecord, ApiError> {
        Self::record(db, record.to_health_data()).await?;
        Ok(record)
    }

    pub async fn record_activity(
        db: &SqlitePool,
        record: ActivityRecord,
    ) -> Result<ActivityRecord, ApiError> {
        Self::record(db, record.to_health_data()).await?;
        Ok(record)
    }

    pub async fn record_stress(
        db: &SqlitePool,
        reading: StressReading,
    ) -> Result<StressReading, ApiError> {
        Self::record(db, reading.to_health_data()).await?;
        Ok(reading)
    }

    pub async fn record_hydration(
        db: &SqlitePool,
        entry: HydrationEntry,
    ) -> Result<HydrationEntry, ApiError> {
        Self::record(db, entry.to_health_data()).await?;
        Ok(entry)
    }

    /// Heart-rate history with zones relative to the user's age-predicted maximum
    pub async fn heart_rate_history(
        db: &SqlitePool,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ClassifiedHeartRate>, ApiError> {
        let age = UserRepository::find_by_id(db, user_id)
            .await
            .map_err(ApiError::Internal)?
            .and_then(|u| u.age_on(Utc::now().date_naive()));

        let rows = HealthDataRepository::list_by_type_in_range(
            db,
            user_id,
            HealthDataType::HeartRate,
            start,
            end,
        )
        .await
        .map_err(ApiError::Internal)?;

        Ok(rows
            .iter()
            .filter_map(HeartRateReading::from_health_data)
            .map(|reading| ClassifiedHeartRate {
                zone: age.map(|a| classify_heart_rate(reading.bpm, a)),
                reading,
            })
            .collect())
    }

    pub async fn blood_pressure_history(
        db: &SqlitePool,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ClassifiedBloodPressure>, ApiError> {
        let rows = HealthDataRepository::list_by_type_in_range(
            db,
            user_id,
            HealthDataType::BloodPressureSystolic,
            start,
            end,
        )
        .await
        .map_err(ApiError::Internal)?;

        Ok(rows
            .iter()
            .filter_map(BloodPressureReading::from_health_data)
            .map(|reading| ClassifiedBloodPressure {
                category: classify_blood_pressure(reading.systolic, reading.diastolic),
                reading,
            })
            .collect())
    }

    /// Total water logged on `date`, in ml
    pub async fn hydration_total(
        db: &SqlitePool,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<f64, ApiError> {
        let (start, end) = day_bounds(date);
        let rows = HealthDataRepository::list_by_type_in_range(
            db,
            user_id,
            HealthDataType::Hydration,
            start,
            end,
        )
        .await
        .map_err(ApiError::Internal)?;

        Ok(rows.iter().map(|r| r.value).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_in_memory_pool;
    use chrono::{Duration, TimeZone};
    use pixelpulse_shared::models::DataSource;
    use pixelpulse_shared::User;
    use tokio_test::{assert_err, assert_ok};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_record_rejects_bad_confidence() {
        let db = create_in_memory_pool().await.unwrap();
        let mut data = HealthData::new("u1", HealthDataType::Steps, 1200.0);
        data.confidence = 1.5;
        assert_err!(HealthDataService::record(&db, data.clone()).await);

        data.confidence = 0.5;
        assert_ok!(HealthDataService::record(&db, data).await);
    }

    #[tokio::test]
    async fn test_record_accepts_imperial_units() {
        let db = create_in_memory_pool().await.unwrap();
        let mut temperature = HealthData::new("u1", HealthDataType::BodyTemperature, 98.6);
        temperature.unit = "°F".into();
        assert_ok!(HealthDataService::record(&db, temperature).await);

        let mut weight = HealthData::new("u1", HealthDataType::Weight, 620.0);
        weight.unit = "lb".into();
        assert_ok!(HealthDataService::record(&db, weight).await);

        let celsius = HealthData::new("u1", HealthDataType::BodyTemperature, 98.6);
        assert_err!(HealthDataService::record(&db, celsius).await);
    }

    #[tokio::test]
    async fn test_batch_is_all_or_nothing_on_validation() {
        let db = create_in_memory_pool().await.unwrap();
        let good = HealthData::new("u1", HealthDataType::Weight, 71.0);
        let bad = HealthData::new("u1", HealthDataType::Weight, f64::NAN);

        assert_err!(HealthDataService::record_many(&db, &[good.clone(), bad]).await);
        assert!(HealthDataRepository::list_by_user(&db, "u1").await.unwrap().is_empty());

        assert_eq!(HealthDataService::record_many(&db, &[good]).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_query_variants() {
        let db = create_in_memory_pool().await.unwrap();
        let batch = vec![
            HealthData::new("u1", HealthDataType::HeartRate, 61.0).at(at(1, 8)),
            HealthData::new("u1", HealthDataType::HeartRate, 75.0).at(at(3, 8)),
            HealthData::new("u1", HealthDataType::Steps, 7000.0).at(at(2, 12)),
        ];
        HealthDataService::record_many(&db, &batch).await.unwrap();

        let all = HealthDataService::query(
            &db,
            &HealthDataQuery {
                user_id: "u1".into(),
                data_type: None,
                start: None,
                end: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(all.len(), 3);

        let hr_since = HealthDataService::query(
            &db,
            &HealthDataQuery {
                user_id: "u1".into(),
                data_type: Some(HealthDataType::HeartRate),
                start: Some(at(2, 0)),
                end: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(hr_since.len(), 1);
        assert_eq!(hr_since[0].value, 75.0);

        let until = HealthDataService::query(
            &db,
            &HealthDataQuery {
                user_id: "u1".into(),
                data_type: None,
                start: None,
                end: Some(at(2, 12)),
            },
        )
        .await
        .unwrap();
        assert_eq!(until.len(), 2);
    }

    #[tokio::test]
    async fn test_blood_pressure_round_trip_and_category() {
        let db = create_in_memory_pool().await.unwrap();
        let reading = BloodPressureReading {
            id: "bp1".into(),
            user_id: "u1".into(),
            timestamp: at(4, 9),
            systolic: 134,
            diastolic: 78,
            source: DataSource::MedicalDevice,
        };
        HealthDataService::record_blood_pressure(&db, reading.clone())
            .await
            .unwrap();

        let stored = HealthDataService::get(&db, "bp1_systolic").await.unwrap();
        assert_eq!(stored.notes.as_deref(), Some("Diastolic: 78"));

        let history = HealthDataService::blood_pressure_history(&db, "u1", at(1, 0), at(30, 0))
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].reading, reading);
        assert_eq!(history[0].category, BloodPressureCategory::Stage1);
    }

    #[tokio::test]
    async fn test_heart_rate_zones_need_age() {
        let db = create_in_memory_pool().await.unwrap();
        let reading = HeartRateReading {
            id: "hr1".into(),
            user_id: "u1".into(),
            timestamp: at(5, 7),
            bpm: 150,
            context: Some("Running".into()),
            source: DataSource::WearableDevice,
        };
        HealthDataService::record_heart_rate(&db, reading).await.unwrap();

        let history = HealthDataService::heart_rate_history(&db, "u1", at(1, 0), at(30, 0))
            .await
            .unwrap();
        assert_eq!(history[0].zone, None);
        assert_eq!(history[0].reading.context.as_deref(), Some("Running"));

        let mut user = User::new("u1", "a@b.co", "Ada");
        user.date_of_birth = Some(Utc::now().date_naive() - Duration::days(40 * 365 + 30));
        UserRepository::upsert(&db, &user).await.unwrap();

        let history = HealthDataService::heart_rate_history(&db, "u1", at(1, 0), at(30, 0))
            .await
            .unwrap();
        // 150 / 180 = 83 %
        assert_eq!(history[0].zone, Some(HeartRateZone::Cardio));
    }

    #[tokio::test]
    async fn test_hydration_total_for_day() {
        let db = create_in_memory_pool().await.unwrap();
        for (id, hour, ml) in [("h1", 8, 250.0), ("h2", 13, 500.0), ("h3", 23, 300.0)] {
            HealthDataService::record_hydration(
                &db,
                HydrationEntry {
                    id: id.into(),
                    user_id: "u1".into(),
                    timestamp: at(6, hour),
                    amount_ml: ml,
                    beverage: Some("Water".into()),
                    source: DataSource::ManualEntry,
                },
            )
            .await
            .unwrap();
        }
        HealthDataService::record_hydration(
            &db,
            HydrationEntry {
                id: "next-day".into(),
                user_id: "u1".into(),
                timestamp: at(7, 0),
                amount_ml: 999.0,
                beverage: None,
                source: DataSource::ManualEntry,
            },
        )
        .await
        .unwrap();

        let total = HealthDataService::hydration_total(
            &db,
            "u1",
            NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(total, 1050.0);
    }
}
