//! API request and query types

use crate::ai::{ChatMessage, HealthContext, HealthProgress, RecognizedFood, TimeRange};
use crate::models::{
    DailyNutrition, DietaryRestriction, Equipment, FitnessGoal, FoodEntryDetail, HealthData,
    HealthDataType, NutritionGoals, User, Workout, WorkoutDifficulty, WorkoutType,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Query strings
// ============================================================================

/// `?user_id&data_type&start&end` for health data listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDataQuery {
    pub user_id: String,
    pub data_type: Option<HealthDataType>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestQuery {
    pub user_id: String,
    pub data_type: HealthDataType,
}

/// Inclusive time window for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeQuery {
    pub user_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutQuery {
    pub user_id: String,
    pub workout_type: Option<WorkoutType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayQuery {
    pub user_id: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodSearchQuery {
    pub q: String,
}

// ============================================================================
// Responses
// ============================================================================

/// Count of rows affected by a write or delete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffectedResponse {
    pub affected: u64,
}

// ============================================================================
// AI request bodies
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsRequest {
    pub user_id: String,
    #[serde(default)]
    pub time_range: TimeRange,
    /// Readings to analyze; loaded from storage for the window when omitted
    pub health_data: Option<Vec<HealthData>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsRequest {
    pub user_id: String,
    pub profile: Option<User>,
    pub recent_data: Option<Vec<HealthData>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlanRequest {
    pub user_id: String,
    #[serde(default)]
    pub goals: Vec<FitnessGoal>,
    pub fitness_level: WorkoutDifficulty,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    pub minutes_per_session: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutAnalysisRequest {
    pub user_id: String,
    pub workouts: Option<Vec<Workout>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutModificationsRequest {
    pub workout: Workout,
    pub feedback: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlanRequest {
    pub user_id: String,
    pub goals: Option<NutritionGoals>,
    #[serde(default)]
    pub dietary_restrictions: Vec<DietaryRestriction>,
    #[serde(default)]
    pub preferences: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeficienciesRequest {
    pub days: Vec<DailyNutrition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealImprovementsRequest {
    pub entries: Vec<FoodEntryDetail>,
}

/// Image payloads travel as standard base64 of the JPEG bytes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodScanRequest {
    pub image_base64: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortionRequest {
    pub image_base64: String,
    pub food: RecognizedFood,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotivationRequest {
    pub progress: HealthProgress,
    #[serde(default)]
    pub goals: Vec<FitnessGoal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
    pub context: HealthContext,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    pub user_id: String,
    #[serde(default)]
    pub time_range: TimeRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Free-text answer from the assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextResponse {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortionResponse {
    pub grams: f64,
}
