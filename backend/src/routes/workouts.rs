//! Workout API routes

use crate::error::ApiError;
use crate::services::WorkoutService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use pixelpulse_shared::types::WorkoutQuery;
use pixelpulse_shared::Workout;

/// Create workout routes
pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(save_workout).get(list_workouts))
        .route("/:id", get(get_workout).delete(delete_workout))
}

/// POST /api/v1/workouts - Store a workout with its exercises
async fn save_workout(
    State(state): State<AppState>,
    Json(workout): Json<Workout>,
) -> Result<(StatusCode, Json<Workout>), ApiError> {
    let workout = WorkoutService::save(state.db(), workout).await?;
    Ok((StatusCode::CREATED, Json(workout)))
}

/// GET /api/v1/workouts?user_id&workout_type
async fn list_workouts(
    State(state): State<AppState>,
    Query(query): Query<WorkoutQuery>,
) -> Result<Json<Vec<Workout>>, ApiError> {
    let workouts = WorkoutService::list(state.db(), &query.user_id, query.workout_type).await?;
    Ok(Json(workouts))
}

async fn get_workout(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Workout>, ApiError> {
    Ok(Json(WorkoutService::get(state.db(), &id).await?))
}

async fn delete_workout(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    WorkoutService::delete(state.db(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
