//! User profile service

use crate::error::ApiError;
use crate::repositories::user::DeletedUserData;
use crate::repositories::UserRepository;
use chrono::Utc;
use pixelpulse_shared::validation::validate_user;
use pixelpulse_shared::User;
use sqlx::SqlitePool;
use tracing::info;

/// User service for profile management
pub struct UserService;

impl UserService {
    /// Create or update a profile
    ///
    /// An existing profile keeps its stored `created_at`.
    pub async fn save(db: &SqlitePool, user: User) -> Result<User, ApiError> {
        validate_user(&user)?;

        let existing = UserRepository::find_by_id(db, &user.id)
            .await
            .map_err(ApiError::Internal)?;

        let mut user = user;
        if let Some(existing) = existing {
            user.created_at = existing.created_at;
        }
        user.updated_at = Utc::now();

        UserRepository::upsert(db, &user)
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = %user.id, "Saved user profile");
        Ok(user)
    }

    pub async fn get(db: &SqlitePool, id: &str) -> Result<User, ApiError> {
        UserRepository::find_by_id(db, id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(format!("User {} not found", id)))
    }

    /// The device owner's profile: the earliest one created
    pub async fn current(db: &SqlitePool) -> Result<User, ApiError> {
        UserRepository::find_current(db)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("No user profile exists".to_string()))
    }

    pub async fn list(db: &SqlitePool) -> Result<Vec<User>, ApiError> {
        UserRepository::list(db).await.map_err(ApiError::Internal)
    }

    pub async fn count(db: &SqlitePool) -> Result<i64, ApiError> {
        UserRepository::count(db).await.map_err(ApiError::Internal)
    }

    /// Remove a user and everything they own
    pub async fn delete_account(db: &SqlitePool, id: &str) -> Result<DeletedUserData, ApiError> {
        let deleted = UserRepository::delete_user_data(db, id)
            .await
            .map_err(ApiError::Internal)?;

        if deleted.users == 0 {
            return Err(ApiError::NotFound(format!("User {} not found", id)));
        }

        info!(user_id = %id, rows = deleted.total(), "Deleted user data");
        Ok(deleted)
    }
}
