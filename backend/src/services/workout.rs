//! Workout service

use crate::error::ApiError;
use crate::repositories::WorkoutRepository;
use chrono::{DateTime, Utc};
use pixelpulse_shared::models::WorkoutType;
use pixelpulse_shared::validation::validate_workout;
use pixelpulse_shared::Workout;
use sqlx::SqlitePool;
use tracing::info;

/// Workout service
pub struct WorkoutService;

impl WorkoutService {
    /// Store a workout with its exercises. Exercises are re-parented to the
    /// workout id and replace any previously stored list.
    pub async fn save(db: &SqlitePool, workout: Workout) -> Result<Workout, ApiError> {
        validate_workout(&workout)?;

        let mut workout = workout;
        for exercise in &mut workout.exercises {
            exercise.workout_id = workout.id.clone();
        }

        WorkoutRepository::upsert(db, &workout)
            .await
            .map_err(ApiError::Internal)?;

        info!(
            workout_id = %workout.id,
            exercises = workout.exercises.len(),
            "Saved workout"
        );
        Ok(workout)
    }

    pub async fn get(db: &SqlitePool, id: &str) -> Result<Workout, ApiError> {
        WorkoutRepository::find_by_id(db, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(format!("Workout {} not found", id)))
    }

    pub async fn list(
        db: &SqlitePool,
        user_id: &str,
        workout_type: Option<WorkoutType>,
    ) -> Result<Vec<Workout>, ApiError> {
        let result = match workout_type {
            Some(t) => WorkoutRepository::list_by_type(db, user_id, t).await,
            None => WorkoutRepository::list_by_user(db, user_id).await,
        };
        result.map_err(ApiError::Internal)
    }

    /// Workouts started in `[start, end]`, with exercises attached
    pub async fn history(
        db: &SqlitePool,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Workout>, ApiError> {
        let mut workouts = WorkoutRepository::list_in_range(db, user_id, start, end)
            .await
            .map_err(ApiError::Internal)?;

        for workout in &mut workouts {
            workout.exercises = WorkoutRepository::list_exercises(db, &workout.id)
                .await
                .map_err(ApiError::Internal)?;
        }
        Ok(workouts)
    }

    pub async fn delete(db: &SqlitePool, id: &str) -> Result<(), ApiError> {
        let deleted = WorkoutRepository::delete(db, id)
            .await
            .map_err(ApiError::Internal)?;
        if !deleted {
            return Err(ApiError::NotFound(format!("Workout {} not found", id)));
        }
        info!(workout_id = %id, "Deleted workout");
        Ok(())
    }
}
