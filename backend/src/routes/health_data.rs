//! Health data API routes
//!
//! Generic readings go through `/`; the typed endpoints accept the
//! reading-specific shapes and store them as generic rows.

use crate::error::ApiError;
use crate::services::health_data::{ClassifiedBloodPressure, ClassifiedHeartRate};
use crate::services::HealthDataService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use pixelpulse_shared::readings::{
    ActivityRecord, BloodPressureReading, HeartRateReading, HydrationEntry, SleepRecord,
    StressReading,
};
use pixelpulse_shared::types::{AffectedResponse, HealthDataQuery, LatestQuery, RangeQuery};
use pixelpulse_shared::HealthData;

/// Create health data routes
pub fn health_data_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(record).get(query))
        .route("/batch", post(record_batch))
        .route("/latest", get(latest))
        .route("/:id", delete(delete_reading))
        .route("/heart-rate", post(record_heart_rate).get(heart_rate_history))
        .route(
            "/blood-pressure",
            post(record_blood_pressure).get(blood_pressure_history),
        )
        .route("/sleep", post(record_sleep))
        .route("/activity", post(record_activity))
        .route("/stress", post(record_stress))
        .route("/hydration", post(record_hydration))
}

// ============================================================================
// Generic readings
// ============================================================================

async fn record(
    State(state): State<AppState>,
    Json(data): Json<HealthData>,
) -> Result<(StatusCode, Json<HealthData>), ApiError> {
    let data = HealthDataService::record(state.db(), data).await?;
    Ok((StatusCode::CREATED, Json(data)))
}

/// POST /api/v1/health-data/batch - All or nothing
async fn record_batch(
    State(state): State<AppState>,
    Json(items): Json<Vec<HealthData>>,
) -> Result<Json<AffectedResponse>, ApiError> {
    let affected = HealthDataService::record_many(state.db(), &items).await?;
    Ok(Json(AffectedResponse { affected }))
}

/// GET /api/v1/health-data?user_id&data_type&start&end
async fn query(
    State(state): State<AppState>,
    Query(query): Query<HealthDataQuery>,
) -> Result<Json<Vec<HealthData>>, ApiError> {
    Ok(Json(HealthDataService::query(state.db(), &query).await?))
}

async fn latest(
    State(state): State<AppState>,
    Query(query): Query<LatestQuery>,
) -> Result<Json<HealthData>, ApiError> {
    let data = HealthDataService::latest(state.db(), &query.user_id, query.data_type).await?;
    Ok(Json(data))
}

async fn delete_reading(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    HealthDataService::delete(state.db(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Typed readings
// ============================================================================

async fn record_heart_rate(
    State(state): State<AppState>,
    Json(reading): Json<HeartRateReading>,
) -> Result<(StatusCode, Json<HeartRateReading>), ApiError> {
    let reading = HealthDataService::record_heart_rate(state.db(), reading).await?;
    Ok((StatusCode::CREATED, Json(reading)))
}

async fn record_blood_pressure(
    State(state): State<AppState>,
    Json(reading): Json<BloodPressureReading>,
) -> Result<(StatusCode, Json<BloodPressureReading>), ApiError> {
    let reading = HealthDataService::record_blood_pressure(state.db(), reading).await?;
    Ok((StatusCode::CREATED, Json(reading)))
}

async fn record_sleep(
    State(state): State<AppState>,
    Json(record): Json<SleepRecord>,
) -> Result<(StatusCode, Json<SleepRecord>), ApiError> {
    let record = HealthDataService::record_sleep(state.db(), record).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn record_activity(
    State(state): State<AppState>,
    Json(record): Json<ActivityRecord>,
) -> Result<(StatusCode, Json<ActivityRecord>), ApiError> {
    let record = HealthDataService::record_activity(state.db(), record).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn record_stress(
    State(state): State<AppState>,
    Json(reading): Json<StressReading>,
) -> Result<(StatusCode, Json<StressReading>), ApiError> {
    let reading = HealthDataService::record_stress(state.db(), reading).await?;
    Ok((StatusCode::CREATED, Json(reading)))
}

async fn record_hydration(
    State(state): State<AppState>,
    Json(entry): Json<HydrationEntry>,
) -> Result<(StatusCode, Json<HydrationEntry>), ApiError> {
    let entry = HealthDataService::record_hydration(state.db(), entry).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/v1/health-data/heart-rate - Readings with training zones
async fn heart_rate_history(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<Vec<ClassifiedHeartRate>>, ApiError> {
    let readings =
        HealthDataService::heart_rate_history(state.db(), &range.user_id, range.start, range.end)
            .await?;
    Ok(Json(readings))
}

/// GET /api/v1/health-data/blood-pressure - Readings with their category
async fn blood_pressure_history(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<Vec<ClassifiedBloodPressure>>, ApiError> {
    let readings = HealthDataService::blood_pressure_history(
        state.db(),
        &range.user_id,
        range.start,
        range.end,
    )
    .await?;
    Ok(Json(readings))
}
