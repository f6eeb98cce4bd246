//! Workout repository - workouts and their exercises

use super::{parse_tag, record_write};
use anyhow::Result;
use chrono::{DateTime, Utc};
use pixelpulse_shared::models::{Exercise, Workout, WorkoutType};
use sqlx::SqlitePool;

/// Workout row as stored
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkoutRecord {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub workout_type: String,
    pub duration_ms: i64,
    pub calories_burned: i32,
    pub started_at: Option<DateTime<Utc>>,
}

impl TryFrom<WorkoutRecord> for Workout {
    type Error = anyhow::Error;

    fn try_from(r: WorkoutRecord) -> Result<Self> {
        Ok(Workout {
            workout_type: parse_tag("workout_type", &r.workout_type)?,
            id: r.id,
            user_id: r.user_id,
            name: r.name,
            duration_ms: r.duration_ms,
            calories_burned: r.calories_burned,
            started_at: r.started_at,
            exercises: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseRecord {
    pub id: String,
    pub workout_id: String,
    pub name: String,
    pub exercise_type: String,
    pub sets: i32,
    pub reps: i32,
}

impl From<ExerciseRecord> for Exercise {
    fn from(r: ExerciseRecord) -> Self {
        Exercise {
            id: r.id,
            workout_id: r.workout_id,
            name: r.name,
            exercise_type: r.exercise_type,
            sets: r.sets,
            reps: r.reps,
        }
    }
}

fn into_models(records: Vec<WorkoutRecord>) -> Result<Vec<Workout>> {
    records.into_iter().map(Workout::try_from).collect()
}

/// Workout repository
pub struct WorkoutRepository;

impl WorkoutRepository {
    /// Insert or replace a workout and its exercise list in one transaction
    pub async fn upsert(db: &SqlitePool, workout: &Workout) -> Result<()> {
        let mut tx = db.begin().await?;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO workouts (
                id, user_id, name, workout_type, duration_ms, calories_burned, started_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&workout.id)
        .bind(&workout.user_id)
        .bind(&workout.name)
        .bind(workout.workout_type.as_str())
        .bind(workout.duration_ms)
        .bind(workout.calories_burned)
        .bind(workout.started_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM exercises WHERE workout_id = ?")
            .bind(&workout.id)
            .execute(&mut *tx)
            .await?;

        for exercise in &workout.exercises {
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO exercises (id, workout_id, name, exercise_type, sets, reps)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&exercise.id)
            .bind(&workout.id)
            .bind(&exercise.name)
            .bind(&exercise.exercise_type)
            .bind(exercise.sets)
            .bind(exercise.reps)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        record_write("workouts", 1);
        record_write("exercises", workout.exercises.len() as u64);
        Ok(())
    }

    /// Find a workout with its exercises attached
    pub async fn find_by_id(db: &SqlitePool, id: &str) -> Result<Option<Workout>> {
        let record = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT id, user_id, name, workout_type, duration_ms, calories_burned, started_at
            FROM workouts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        match record {
            Some(record) => {
                let mut workout = Workout::try_from(record)?;
                workout.exercises = Self::list_exercises(db, id).await?;
                Ok(Some(workout))
            }
            None => Ok(None),
        }
    }

    /// Workouts for a user, newest id first. Exercises are not loaded.
    pub async fn list_by_user(db: &SqlitePool, user_id: &str) -> Result<Vec<Workout>> {
        let records = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT id, user_id, name, workout_type, duration_ms, calories_burned, started_at
            FROM workouts
            WHERE user_id = ?
            ORDER BY id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;

        into_models(records)
    }

    pub async fn list_by_type(
        db: &SqlitePool,
        user_id: &str,
        workout_type: WorkoutType,
    ) -> Result<Vec<Workout>> {
        let records = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT id, user_id, name, workout_type, duration_ms, calories_burned, started_at
            FROM workouts
            WHERE user_id = ? AND workout_type = ?
            ORDER BY id DESC
            "#,
        )
        .bind(user_id)
        .bind(workout_type.as_str())
        .fetch_all(db)
        .await?;

        into_models(records)
    }

    /// Workouts whose `started_at` falls in `[start, end]`, most recent first
    pub async fn list_in_range(
        db: &SqlitePool,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Workout>> {
        let records = sqlx::query_as::<_, WorkoutRecord>(
            r#"
            SELECT id, user_id, name, workout_type, duration_ms, calories_burned, started_at
            FROM workouts
            WHERE user_id = ? AND started_at >= ? AND started_at <= ?
            ORDER BY started_at DESC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await?;

        into_models(records)
    }

    pub async fn list_exercises(db: &SqlitePool, workout_id: &str) -> Result<Vec<Exercise>> {
        let records = sqlx::query_as::<_, ExerciseRecord>(
            r#"
            SELECT id, workout_id, name, exercise_type, sets, reps
            FROM exercises
            WHERE workout_id = ?
            ORDER BY rowid
            "#,
        )
        .bind(workout_id)
        .fetch_all(db)
        .await?;

        Ok(records.into_iter().map(Exercise::from).collect())
    }

    /// Delete a workout and its exercises
    pub async fn delete(db: &SqlitePool, id: &str) -> Result<bool> {
        let mut tx = db.begin().await?;

        sqlx::query("DELETE FROM exercises WHERE workout_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM workouts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
