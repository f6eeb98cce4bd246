//! Result and context types produced by the AI assistant

use crate::models::{
    FitnessGoal, Food, MacroTargets, MealType, User, WorkoutDifficulty, WorkoutType,
};
use crate::tags::tagged_enum;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

tagged_enum! {
    /// Look-back window for insights and reports
    #[derive(Default)]
    pub enum TimeRange ("time range") {
        Last24Hours => "LAST_24_HOURS",
        #[default]
        Last7Days => "LAST_7_DAYS",
        Last30Days => "LAST_30_DAYS",
        Last90Days => "LAST_90_DAYS",
    }
}

impl TimeRange {
    pub fn duration(&self) -> Duration {
        match self {
            TimeRange::Last24Hours => Duration::hours(24),
            TimeRange::Last7Days => Duration::days(7),
            TimeRange::Last30Days => Duration::days(30),
            TimeRange::Last90Days => Duration::days(90),
        }
    }

    /// Human phrase used in prompts, e.g. "last 7 days"
    pub fn label(&self) -> String {
        self.as_str().to_lowercase().replace('_', " ")
    }

    /// `(start, end)` ending at `now`
    pub fn window(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        (now - self.duration(), now)
    }
}

tagged_enum! {
    #[derive(Default)]
    pub enum InsightCategory ("insight category") {
        HeartHealth => "HEART_HEALTH",
        SleepQuality => "SLEEP_QUALITY",
        ActivityLevel => "ACTIVITY_LEVEL",
        Nutrition => "NUTRITION",
        StressManagement => "STRESS_MANAGEMENT",
        WeightManagement => "WEIGHT_MANAGEMENT",
        #[default]
        GeneralWellness => "GENERAL_WELLNESS",
    }
}

tagged_enum! {
    #[derive(Default)]
    pub enum InsightPriority ("insight priority") {
        Low => "LOW",
        #[default]
        Medium => "MEDIUM",
        High => "HIGH",
        Urgent => "URGENT",
    }
}

tagged_enum! {
    #[derive(Default)]
    pub enum RecommendationType ("recommendation type") {
        Exercise => "EXERCISE",
        MealSuggestion => "MEAL_SUGGESTION",
        Sleep => "SLEEP",
        StressManagement => "STRESS_MANAGEMENT",
        Hydration => "HYDRATION",
        #[default]
        Lifestyle => "LIFESTYLE",
    }
}

tagged_enum! {
    #[derive(Default)]
    pub enum RecommendationDifficulty ("recommendation difficulty") {
        #[default]
        Easy => "EASY",
        Moderate => "MODERATE",
        Challenging => "CHALLENGING",
    }
}

tagged_enum! {
    #[derive(Default)]
    pub enum ProgressTrend ("progress trend") {
        Improving => "IMPROVING",
        #[default]
        Stable => "STABLE",
        Declining => "DECLINING",
        Inconsistent => "INCONSISTENT",
    }
}

tagged_enum! {
    pub enum ModificationType ("modification type") {
        IncreaseWeight => "INCREASE_WEIGHT",
        DecreaseWeight => "DECREASE_WEIGHT",
        IncreaseReps => "INCREASE_REPS",
        DecreaseReps => "DECREASE_REPS",
        IncreaseSets => "INCREASE_SETS",
        DecreaseSets => "DECREASE_SETS",
        ChangeExercise => "CHANGE_EXERCISE",
        AddRest => "ADD_REST",
        ReduceRest => "REDUCE_REST",
    }
}

tagged_enum! {
    #[derive(Default)]
    pub enum DeficiencySeverity ("deficiency severity") {
        Mild => "MILD",
        #[default]
        Moderate => "MODERATE",
        Severe => "SEVERE",
    }
}

tagged_enum! {
    pub enum SuggestionType ("suggestion type") {
        AddProtein => "ADD_PROTEIN",
        AddVegetables => "ADD_VEGETABLES",
        ReduceSodium => "REDUCE_SODIUM",
        ReduceSugar => "REDUCE_SUGAR",
        IncreaseFiber => "INCREASE_FIBER",
        BalanceMacros => "BALANCE_MACROS",
    }
}

// ============================================================================
// Insights and recommendations
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthInsight {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: InsightCategory,
    pub priority: InsightPriority,
    pub actionable: bool,
    pub recommendations: Vec<String>,
    pub confidence: f64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiRecommendation {
    pub id: String,
    pub user_id: String,
    pub recommendation_type: RecommendationType,
    pub title: String,
    pub description: String,
    pub action_items: Vec<String>,
    pub expected_benefit: String,
    pub difficulty: RecommendationDifficulty,
    pub estimated_time_to_results: String,
    pub confidence: f64,
    pub generated_at: DateTime<Utc>,
}

// ============================================================================
// Workouts
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedExercise {
    pub name: String,
    pub sets: i32,
    pub reps: i32,
    #[serde(default)]
    pub rest_seconds: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedWorkout {
    pub name: String,
    pub description: String,
    pub workout_type: WorkoutType,
    pub duration_minutes: i32,
    pub difficulty: WorkoutDifficulty,
    pub calories_burned: i32,
    #[serde(default)]
    pub exercises: Vec<PlannedExercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub goals: Vec<FitnessGoal>,
    pub duration_weeks: i32,
    pub workouts_per_week: i32,
    pub difficulty: WorkoutDifficulty,
    pub workouts: Vec<PlannedWorkout>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutAnalysis {
    pub user_id: String,
    pub overall_progress: String,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub recommended_changes: Vec<String>,
    pub injury_risk_assessment: String,
    pub progress_trend: ProgressTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutModification {
    pub exercise_id: Option<String>,
    pub modification_type: ModificationType,
    pub description: String,
    pub reason: String,
}

// ============================================================================
// Nutrition
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedMeal {
    pub day: i32,
    pub meal_type: MealType,
    pub name: String,
    pub calories: i32,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub meals: Vec<PlannedMeal>,
    pub total_calories: i32,
    pub macro_targets: MacroTargets,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionalDeficiency {
    pub nutrient: String,
    pub current_intake: f64,
    pub recommended_intake: f64,
    pub severity: DeficiencySeverity,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub food_sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSuggestion {
    pub suggestion_type: SuggestionType,
    pub description: String,
    #[serde(default)]
    pub foods_to_add: Vec<String>,
    #[serde(default)]
    pub foods_to_reduce: Vec<String>,
    pub expected_benefit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedFood {
    pub name: String,
    pub confidence: f64,
    pub estimated_weight_g: f64,
    pub calories: f64,
    #[serde(default)]
    pub nutrients: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodScanResult {
    pub recognized_foods: Vec<RecognizedFood>,
    pub confidence: f64,
    pub scanned_at: DateTime<Utc>,
}

// ============================================================================
// Progress, context, reports and chat
// ============================================================================

/// Body-composition snapshot used for motivational messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthProgress {
    pub user_id: String,
    pub current_weight_kg: Option<f64>,
    pub target_weight_kg: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub muscle_mass_kg: Option<f64>,
    pub goals_achieved: i32,
    pub total_goals: i32,
}

/// Profile facts that ground an answer to a free-form question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthContext {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub activity_level: Option<String>,
    #[serde(default)]
    pub health_conditions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
}

impl HealthContext {
    pub fn from_user(user: &User, today: NaiveDate) -> Self {
        Self {
            age: user.age_on(today),
            gender: user.gender.map(|g| g.to_string()),
            activity_level: Some(user.activity_level.to_string()),
            health_conditions: user.health_conditions.clone(),
            medications: user.medications.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub id: String,
    pub user_id: String,
    pub time_range: TimeRange,
    pub summary: String,
    pub key_findings: Vec<String>,
    pub recommendations: Vec<String>,
    pub progress_metrics: BTreeMap<String, f64>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub is_from_user: bool,
    pub timestamp: DateTime<Utc>,
}

/// Food record for a recognized item, nutrition normalized to 100 g
pub fn to_food_stub(recognized: &RecognizedFood, id: impl Into<String>) -> Food {
    let mut food = Food::unknown(id);
    food.name = recognized.name.clone();
    if recognized.estimated_weight_g > 0.0 {
        let per_100g = 100.0 / recognized.estimated_weight_g;
        food.nutrition_per_100g.calories = recognized.calories * per_100g;
        let nutrient = |key: &str| recognized.nutrients.get(key).copied().unwrap_or(0.0) * per_100g;
        food.nutrition_per_100g.protein_g = nutrient("protein");
        food.nutrition_per_100g.carbs_g = nutrient("carbs");
        food.nutrition_per_100g.fat_g = nutrient("fat");
        food.nutrition_per_100g.fiber_g = nutrient("fiber");
        food.nutrition_per_100g.sugar_g = nutrient("sugar");
    }
    food
}
