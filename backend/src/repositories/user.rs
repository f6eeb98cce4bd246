//! User repository - profile storage and per-user data removal

use super::{from_json, parse_tag, record_write, to_json};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use pixelpulse_shared::User;
use sqlx::SqlitePool;

/// User row as stored
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: String,
    pub fitness_goals: String,
    pub health_conditions: String,
    pub medications: String,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relationship: Option<String>,
    pub units: String,
    pub notification_preferences: String,
    pub privacy_preferences: String,
    pub theme: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = anyhow::Error;

    fn try_from(r: UserRecord) -> Result<Self> {
        Ok(User {
            gender: r
                .gender
                .as_deref()
                .map(|g| parse_tag("gender", g))
                .transpose()?,
            activity_level: parse_tag("activity_level", &r.activity_level)?,
            fitness_goals: from_json("fitness_goals", &r.fitness_goals)?,
            health_conditions: from_json("health_conditions", &r.health_conditions)?,
            medications: from_json("medications", &r.medications)?,
            units: parse_tag("units", &r.units)?,
            notification_preferences: from_json(
                "notification_preferences",
                &r.notification_preferences,
            )?,
            privacy_preferences: from_json("privacy_preferences", &r.privacy_preferences)?,
            theme: parse_tag("theme", &r.theme)?,
            id: r.id,
            email: r.email,
            name: r.name,
            date_of_birth: r.date_of_birth,
            height_cm: r.height_cm,
            weight_kg: r.weight_kg,
            emergency_contact_name: r.emergency_contact_name,
            emergency_contact_phone: r.emergency_contact_phone,
            emergency_contact_relationship: r.emergency_contact_relationship,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

const USER_COLUMNS: &str = r#"
    id, email, name, date_of_birth, gender, height_cm, weight_kg, activity_level,
    fitness_goals, health_conditions, medications, emergency_contact_name,
    emergency_contact_phone, emergency_contact_relationship, units,
    notification_preferences, privacy_preferences, theme, created_at, updated_at
"#;

/// Rows removed by `delete_user_data`, per table
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct DeletedUserData {
    pub health_data: u64,
    pub food_entries: u64,
    pub nutrition_goals: u64,
    pub workouts: u64,
    pub exercises: u64,
    pub users: u64,
}

impl DeletedUserData {
    pub fn total(&self) -> u64 {
        self.health_data
            + self.food_entries
            + self.nutrition_goals
            + self.workouts
            + self.exercises
            + self.users
    }
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Insert or replace the whole profile
    pub async fn upsert(db: &SqlitePool, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO users (
                id, email, name, date_of_birth, gender, height_cm, weight_kg, activity_level,
                fitness_goals, health_conditions, medications, emergency_contact_name,
                emergency_contact_phone, emergency_contact_relationship, units,
                notification_preferences, privacy_preferences, theme, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.date_of_birth)
        .bind(user.gender.map(|g| g.as_str()))
        .bind(user.height_cm)
        .bind(user.weight_kg)
        .bind(user.activity_level.as_str())
        .bind(to_json(&user.fitness_goals)?)
        .bind(to_json(&user.health_conditions)?)
        .bind(to_json(&user.medications)?)
        .bind(&user.emergency_contact_name)
        .bind(&user.emergency_contact_phone)
        .bind(&user.emergency_contact_relationship)
        .bind(user.units.as_str())
        .bind(to_json(&user.notification_preferences)?)
        .bind(to_json(&user.privacy_preferences)?)
        .bind(user.theme.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(db)
        .await?;

        record_write("users", 1);
        Ok(())
    }

    /// Find user by ID
    pub async fn find_by_id(db: &SqlitePool, id: &str) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {} FROM users WHERE id = ?",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;

        record.map(User::try_from).transpose()
    }

    /// The device owner: the earliest created profile
    pub async fn find_current(db: &SqlitePool) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {} FROM users ORDER BY created_at ASC, id ASC LIMIT 1",
            USER_COLUMNS
        ))
        .fetch_optional(db)
        .await?;

        record.map(User::try_from).transpose()
    }

    pub async fn list(db: &SqlitePool) -> Result<Vec<User>> {
        let records = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {} FROM users ORDER BY created_at ASC, id ASC",
            USER_COLUMNS
        ))
        .fetch_all(db)
        .await?;

        records.into_iter().map(User::try_from).collect()
    }

    pub async fn count(db: &SqlitePool) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(db)
            .await?;
        Ok(count.0)
    }

    /// Delete the profile row only
    pub async fn delete(db: &SqlitePool, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete the user and everything they own in one transaction. Nothing
    /// is removed when no profile has `user_id`.
    pub async fn delete_user_data(db: &SqlitePool, user_id: &str) -> Result<DeletedUserData> {
        let mut tx = db.begin().await?;
        let mut deleted = DeletedUserData::default();

        deleted.users = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted.users == 0 {
            tx.rollback().await?;
            return Ok(deleted);
        }

        deleted.health_data = sqlx::query("DELETE FROM health_data WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        deleted.food_entries = sqlx::query("DELETE FROM food_entries WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        deleted.nutrition_goals = sqlx::query("DELETE FROM nutrition_goals WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        deleted.exercises = sqlx::query(
            "DELETE FROM exercises WHERE workout_id IN (SELECT id FROM workouts WHERE user_id = ?)",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        deleted.workouts = sqlx::query("DELETE FROM workouts WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_in_memory_pool;
    use crate::repositories::{HealthDataRepository, WorkoutRepository};
    use chrono::{Duration, TimeZone};
    use pixelpulse_shared::models::{
        ActivityLevel, Exercise, FitnessGoal, Gender, HealthData, HealthDataType, ThemePreference,
        Workout, WorkoutType,
    };
    use pixelpulse_shared::Units;

    fn full_user(id: &str) -> User {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        let mut user = User::new(id, format!("{id}@example.com"), "Ada Lovelace");
        user.date_of_birth = NaiveDate::from_ymd_opt(1990, 12, 10);
        user.gender = Some(Gender::Female);
        user.height_cm = Some(168.5);
        user.weight_kg = Some(61.2);
        user.activity_level = ActivityLevel::VeryActive;
        user.fitness_goals = vec![FitnessGoal::CardiovascularFitness, FitnessGoal::BetterSleep];
        user.health_conditions = vec!["asthma".into()];
        user.medications = vec!["salbutamol".into()];
        user.emergency_contact_name = Some("Charles".into());
        user.emergency_contact_phone = Some("+44 20 7946 0000".into());
        user.emergency_contact_relationship = Some("Friend".into());
        user.units = Units::Imperial;
        user.notification_preferences.weekly_reports = false;
        user.privacy_preferences.anonymous_analytics = false;
        user.theme = ThemePreference::Dark;
        user.created_at = created;
        user.updated_at = created + Duration::hours(1);
        user
    }

    #[tokio::test]
    async fn test_round_trip_is_field_for_field_equal() {
        let db = create_in_memory_pool().await.unwrap();
        let user = full_user("u1");
        UserRepository::upsert(&db, &user).await.unwrap();

        let loaded = UserRepository::find_by_id(&db, "u1").await.unwrap().unwrap();
        assert_eq!(loaded, user);
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_row() {
        let db = create_in_memory_pool().await.unwrap();
        let mut user = full_user("u1");
        UserRepository::upsert(&db, &user).await.unwrap();
        user.name = "Ada King".into();
        UserRepository::upsert(&db, &user).await.unwrap();

        assert_eq!(UserRepository::count(&db).await.unwrap(), 1);
        let loaded = UserRepository::find_by_id(&db, "u1").await.unwrap().unwrap();
        assert_eq!(loaded.name, "Ada King");
    }

    #[tokio::test]
    async fn test_current_is_earliest_created() {
        let db = create_in_memory_pool().await.unwrap();
        assert!(UserRepository::find_current(&db).await.unwrap().is_none());

        let mut later = full_user("b");
        later.created_at += Duration::days(1);
        UserRepository::upsert(&db, &later).await.unwrap();
        UserRepository::upsert(&db, &full_user("a")).await.unwrap();

        let current = UserRepository::find_current(&db).await.unwrap().unwrap();
        assert_eq!(current.id, "a");
        assert_eq!(UserRepository::list(&db).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_user_data_leaves_other_users_alone() {
        let db = create_in_memory_pool().await.unwrap();
        for id in ["u1", "u2"] {
            UserRepository::upsert(&db, &full_user(id)).await.unwrap();
            HealthDataRepository::upsert(&db, &HealthData::new(id, HealthDataType::Steps, 9000.0))
                .await
                .unwrap();
            let workout = Workout {
                id: format!("{id}-w"),
                user_id: id.to_string(),
                name: "Push day".into(),
                workout_type: WorkoutType::StrengthTraining,
                duration_ms: 3_600_000,
                calories_burned: 350,
                started_at: None,
                exercises: vec![Exercise {
                    id: format!("{id}-e"),
                    workout_id: format!("{id}-w"),
                    name: "Bench press".into(),
                    exercise_type: "STRENGTH".into(),
                    sets: 3,
                    reps: 8,
                }],
            };
            WorkoutRepository::upsert(&db, &workout).await.unwrap();
        }

        let deleted = UserRepository::delete_user_data(&db, "u1").await.unwrap();
        assert_eq!(deleted.users, 1);
        assert_eq!(deleted.health_data, 1);
        assert_eq!(deleted.workouts, 1);
        assert_eq!(deleted.exercises, 1);
        assert_eq!(deleted.total(), 4);

        assert!(UserRepository::find_by_id(&db, "u1").await.unwrap().is_none());
        assert!(UserRepository::find_by_id(&db, "u2").await.unwrap().is_some());
        assert_eq!(HealthDataRepository::list_by_user(&db, "u2").await.unwrap().len(), 1);
        assert_eq!(WorkoutRepository::list_exercises(&db, "u2-w").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let db = create_in_memory_pool().await.unwrap();
        assert!(!UserRepository::delete(&db, "nobody").await.unwrap());

        HealthDataRepository::upsert(&db, &HealthData::new("nobody", HealthDataType::Steps, 10.0))
            .await
            .unwrap();
        let deleted = UserRepository::delete_user_data(&db, "nobody").await.unwrap();
        assert_eq!(deleted.total(), 0);
        assert_eq!(HealthDataRepository::list_by_user(&db, "nobody").await.unwrap().len(), 1);
    }
}
