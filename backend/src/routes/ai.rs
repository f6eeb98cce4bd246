//! AI assistant API routes
//!
//! One POST per assistant operation. Transport failures surface as 502; a
//! reply the model got wrong still yields the operation's default result.

use crate::error::ApiError;
use crate::services::AssistantService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use pixelpulse_shared::ai::{
    AiRecommendation, ChatMessage, FoodScanResult, HealthInsight, HealthReport, MealPlan,
    MealSuggestion, NutritionalDeficiency, WorkoutAnalysis, WorkoutModification, WorkoutPlan,
};
use pixelpulse_shared::types::{
    ChatRequest, DeficienciesRequest, FoodScanRequest, InsightsRequest, MealImprovementsRequest,
    MealPlanRequest, MotivationRequest, PortionRequest, PortionResponse, QuestionRequest,
    RecommendationsRequest, ReportRequest, TextResponse, WorkoutAnalysisRequest,
    WorkoutModificationsRequest, WorkoutPlanRequest,
};

/// Create AI routes
pub fn ai_routes() -> Router<AppState> {
    Router::new()
        .route("/insights", post(insights))
        .route("/recommendations", post(recommendations))
        .route("/workout-plan", post(workout_plan))
        .route("/workout-analysis", post(workout_analysis))
        .route("/workout-modifications", post(workout_modifications))
        .route("/meal-plan", post(meal_plan))
        .route("/deficiencies", post(deficiencies))
        .route("/meal-improvements", post(meal_improvements))
        .route("/food-scan", post(food_scan))
        .route("/portion", post(portion))
        .route("/motivation", post(motivation))
        .route("/question", post(question))
        .route("/report", post(report))
        .route("/chat", post(chat))
        .route("/chat/:user_id", get(chat_history))
}

/// Decode a standard base64 JPEG payload
fn decode_image(encoded: &str) -> Result<Vec<u8>, ApiError> {
    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| ApiError::BadRequest(format!("Invalid base64 image: {}", e)))?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Image is empty".to_string()));
    }
    Ok(bytes)
}

// ============================================================================
// Health and fitness
// ============================================================================

async fn insights(
    State(state): State<AppState>,
    Json(req): Json<InsightsRequest>,
) -> Result<Json<Vec<HealthInsight>>, ApiError> {
    Ok(Json(AssistantService::insights(state.db(), state.ai(), req).await?))
}

async fn recommendations(
    State(state): State<AppState>,
    Json(req): Json<RecommendationsRequest>,
) -> Result<Json<Vec<AiRecommendation>>, ApiError> {
    let recommendations = AssistantService::recommendations(state.db(), state.ai(), req).await?;
    Ok(Json(recommendations))
}

async fn workout_plan(
    State(state): State<AppState>,
    Json(req): Json<WorkoutPlanRequest>,
) -> Result<Json<WorkoutPlan>, ApiError> {
    Ok(Json(AssistantService::workout_plan(state.ai(), &req).await?))
}

async fn workout_analysis(
    State(state): State<AppState>,
    Json(req): Json<WorkoutAnalysisRequest>,
) -> Result<Json<WorkoutAnalysis>, ApiError> {
    let analysis = AssistantService::workout_analysis(state.db(), state.ai(), req).await?;
    Ok(Json(analysis))
}

async fn workout_modifications(
    State(state): State<AppState>,
    Json(req): Json<WorkoutModificationsRequest>,
) -> Result<Json<Vec<WorkoutModification>>, ApiError> {
    let modifications = state
        .ai()
        .suggest_workout_modifications(&req.workout, &req.feedback)
        .await?;
    Ok(Json(modifications))
}

// ============================================================================
// Nutrition
// ============================================================================

async fn meal_plan(
    State(state): State<AppState>,
    Json(req): Json<MealPlanRequest>,
) -> Result<Json<MealPlan>, ApiError> {
    Ok(Json(AssistantService::meal_plan(state.db(), state.ai(), req).await?))
}

async fn deficiencies(
    State(state): State<AppState>,
    Json(req): Json<DeficienciesRequest>,
) -> Result<Json<Vec<NutritionalDeficiency>>, ApiError> {
    let found = state.ai().analyze_nutritional_deficiencies(&req.days).await?;
    Ok(Json(found))
}

async fn meal_improvements(
    State(state): State<AppState>,
    Json(req): Json<MealImprovementsRequest>,
) -> Result<Json<Vec<MealSuggestion>>, ApiError> {
    let suggestions = state.ai().suggest_meal_improvements(&req.entries).await?;
    Ok(Json(suggestions))
}

/// POST /api/v1/ai/food-scan - Identify foods in a base64 JPEG
async fn food_scan(
    State(state): State<AppState>,
    Json(req): Json<FoodScanRequest>,
) -> Result<Json<FoodScanResult>, ApiError> {
    let image = decode_image(&req.image_base64)?;
    Ok(Json(state.ai().recognize_food_from_image(&image).await?))
}

async fn portion(
    State(state): State<AppState>,
    Json(req): Json<PortionRequest>,
) -> Result<Json<PortionResponse>, ApiError> {
    let image = decode_image(&req.image_base64)?;
    let grams = state.ai().estimate_food_portion(&image, &req.food).await?;
    Ok(Json(PortionResponse { grams }))
}

// ============================================================================
// Coaching
// ============================================================================

async fn motivation(
    State(state): State<AppState>,
    Json(req): Json<MotivationRequest>,
) -> Result<Json<TextResponse>, ApiError> {
    let text = state
        .ai()
        .generate_motivational_message(&req.progress, &req.goals)
        .await?;
    Ok(Json(TextResponse { text }))
}

async fn question(
    State(state): State<AppState>,
    Json(req): Json<QuestionRequest>,
) -> Result<Json<TextResponse>, ApiError> {
    if req.question.trim().is_empty() {
        return Err(ApiError::BadRequest("Question is required".to_string()));
    }
    let text = state
        .ai()
        .answer_health_question(&req.question, &req.context)
        .await?;
    Ok(Json(TextResponse { text }))
}

async fn report(
    State(state): State<AppState>,
    Json(req): Json<ReportRequest>,
) -> Result<Json<HealthReport>, ApiError> {
    let report = state
        .ai()
        .generate_health_report(&req.user_id, req.time_range)
        .await?;
    Ok(Json(report))
}

/// POST /api/v1/ai/chat - Reply to one message given the prior conversation
async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatMessage>, ApiError> {
    let reply = state
        .ai()
        .chat(&req.user_id, &req.message, &req.history)
        .await?;
    Ok(Json(reply))
}

async fn chat_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<ChatMessage>> {
    Json(state.ai().chat_history(&user_id))
}
