//! User profile API routes

use crate::error::ApiError;
use crate::repositories::user::DeletedUserData;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use pixelpulse_shared::User;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(save_user).get(list_users))
        .route("/current", get(current_user))
        .route("/:id", get(get_user).delete(delete_user))
}

/// POST /api/v1/users - Create or replace a profile
async fn save_user(
    State(state): State<AppState>,
    Json(user): Json<User>,
) -> Result<Json<User>, ApiError> {
    let user = UserService::save(state.db(), user).await?;
    Ok(Json(user))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(UserService::list(state.db()).await?))
}

/// GET /api/v1/users/current - The device owner's profile
async fn current_user(State(state): State<AppState>) -> Result<Json<User>, ApiError> {
    Ok(Json(UserService::current(state.db()).await?))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(UserService::get(state.db(), &id).await?))
}

/// DELETE /api/v1/users/:id - Remove the profile and everything recorded for it
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedUserData>, ApiError> {
    let deleted = UserService::delete_account(state.db(), &id).await?;
    Ok(Json(deleted))
}
