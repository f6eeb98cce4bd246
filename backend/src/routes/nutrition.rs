//! Nutrition API routes - food catalog, consumption log and goals

use crate::error::ApiError;
use crate::services::NutritionService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use pixelpulse_shared::types::{DayQuery, FoodSearchQuery};
use pixelpulse_shared::{DailyNutrition, Food, FoodEntry, FoodEntryDetail, NutritionGoals};

/// Create nutrition routes
pub fn nutrition_routes() -> Router<AppState> {
    Router::new()
        .route("/foods", post(save_food))
        .route("/foods/search", get(search_foods))
        .route("/foods/barcode/:code", get(food_by_barcode))
        .route("/entries", post(log_entry).get(entries_for_date))
        .route("/entries/:id", delete(delete_entry))
        .route("/goals", put(save_goals))
        .route("/goals/:user_id", get(get_goals))
        .route("/daily", get(daily_nutrition))
}

// ============================================================================
// Foods
// ============================================================================

async fn save_food(
    State(state): State<AppState>,
    Json(food): Json<Food>,
) -> Result<(StatusCode, Json<Food>), ApiError> {
    let food = NutritionService::save_food(state.db(), food).await?;
    Ok((StatusCode::CREATED, Json(food)))
}

/// GET /api/v1/nutrition/foods/search?q=
async fn search_foods(
    State(state): State<AppState>,
    Query(query): Query<FoodSearchQuery>,
) -> Result<Json<Vec<Food>>, ApiError> {
    Ok(Json(NutritionService::search_foods(state.db(), &query.q).await?))
}

async fn food_by_barcode(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Food>, ApiError> {
    Ok(Json(NutritionService::food_by_barcode(state.db(), &code).await?))
}

// ============================================================================
// Entries
// ============================================================================

/// POST /api/v1/nutrition/entries - Log consumption, returned with its food
async fn log_entry(
    State(state): State<AppState>,
    Json(entry): Json<FoodEntry>,
) -> Result<(StatusCode, Json<FoodEntryDetail>), ApiError> {
    let detail = NutritionService::log_entry(state.db(), entry).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

async fn entries_for_date(
    State(state): State<AppState>,
    Query(day): Query<DayQuery>,
) -> Result<Json<Vec<FoodEntryDetail>>, ApiError> {
    let entries = NutritionService::entries_for_date(state.db(), &day.user_id, day.date).await?;
    Ok(Json(entries))
}

async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    NutritionService::delete_entry(state.db(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Goals and daily summary
// ============================================================================

/// PUT /api/v1/nutrition/goals - Replace the user's goals
async fn save_goals(
    State(state): State<AppState>,
    Json(goals): Json<NutritionGoals>,
) -> Result<Json<NutritionGoals>, ApiError> {
    Ok(Json(NutritionService::save_goals(state.db(), goals).await?))
}

async fn get_goals(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<NutritionGoals>, ApiError> {
    Ok(Json(NutritionService::goals_for(state.db(), &user_id).await?))
}

/// GET /api/v1/nutrition/daily?user_id&date
async fn daily_nutrition(
    State(state): State<AppState>,
    Query(day): Query<DayQuery>,
) -> Result<Json<DailyNutrition>, ApiError> {
    let daily = NutritionService::daily_nutrition(state.db(), &day.user_id, day.date).await?;
    Ok(Json(daily))
}
