//! Response interpretation
//!
//! Model text is read in order: strip a markdown fence, try the expected JSON
//! shape, then (insights only) numbered `N. Title: description` lines. When
//! nothing usable comes back the operation's default value is returned. A
//! fallback is logged, never raised.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use pixelpulse_shared::ai::{
    AiRecommendation, DeficiencySeverity, FoodScanResult, HealthInsight, HealthReport,
    InsightCategory, InsightPriority, MealPlan, MealSuggestion, ModificationType,
    NutritionalDeficiency, PlannedExercise, PlannedMeal, PlannedWorkout, ProgressTrend,
    RecognizedFood, RecommendationDifficulty, RecommendationType, SuggestionType, TimeRange,
    WorkoutAnalysis, WorkoutModification, WorkoutPlan,
};
use pixelpulse_shared::models::{
    generate_id, FitnessGoal, MacroTargets, MealType, NutritionGoals, WorkoutDifficulty,
    WorkoutType,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::warn;

pub const MOTIVATION_FALLBACK: &str =
    "Great job on your health journey! Keep up the excellent work and stay consistent with your goals.";
pub const ANSWER_FALLBACK: &str =
    "I'm sorry, I couldn't process your question at the moment. Please try again.";
pub const CHAT_FALLBACK: &str = "I'm here to help with your health questions!";
pub const DEFAULT_PORTION_G: f64 = 150.0;

/// Confidence assigned to parsed items that carry none
const PARSED_CONFIDENCE: f64 = 0.8;
const NUMBERED_LINE_CONFIDENCE: f64 = 0.6;

// ============================================================================
// Text helpers
// ============================================================================

/// Remove a surrounding ``` fence (with or without a language tag)
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match inner.find('\n') {
        Some(newline) => &inner[newline + 1..],
        None => inner,
    };
    body.trim_end().trim_end_matches("```").trim()
}

/// Deserialize the text as `T`, or the outermost `{...}` / `[...]` slice of it
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Option<T> {
    let body = strip_code_fence(text);
    if let Ok(value) = serde_json::from_str(body) {
        return Some(value);
    }
    for (open, close) in [('{', '}'), ('[', ']')] {
        if let (Some(start), Some(end)) = (body.find(open), body.rfind(close)) {
            if start < end {
                if let Ok(value) = serde_json::from_str(&body[start..=end]) {
                    return Some(value);
                }
            }
        }
    }
    None
}

/// A non-empty list either bare or under one of `keys` of an object
fn parse_list<T: DeserializeOwned>(text: &str, keys: &[&str]) -> Option<Vec<T>> {
    let items = match parse_json::<Value>(text)? {
        list @ Value::Array(_) => list,
        Value::Object(mut map) => keys.iter().find_map(|k| map.remove(*k))?,
        _ => return None,
    };
    serde_json::from_value::<Vec<T>>(items)
        .ok()
        .filter(|list| !list.is_empty())
}

/// Lenient tag lookup: `"Heart health"` and `"heart-health"` both match `HEART_HEALTH`
fn tag_or<T: FromStr>(raw: &str, fallback: T) -> T {
    raw.trim()
        .replace([' ', '-'], "_")
        .parse()
        .unwrap_or(fallback)
}

fn confidence_or(value: Option<f64>, fallback: f64) -> f64 {
    value
        .filter(|c| c.is_finite())
        .map_or(fallback, |c| c.clamp(0.0, 1.0))
}

fn fallback<T>(operation: &str, value: T) -> T {
    warn!(operation, "No usable model output, returning default");
    value
}

/// Text of a free-form answer, or `fallback_text` when the model gave none
pub fn text_or(text: Option<&str>, fallback_text: &str) -> String {
    match text.map(str::trim).filter(|t| !t.is_empty()) {
        Some(text) => text.to_string(),
        None => fallback("free_text", fallback_text.to_string()),
    }
}

// ============================================================================
// Health insights
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InsightDraft {
    title: String,
    description: String,
    category: String,
    priority: String,
    actionable: Option<bool>,
    recommendations: Vec<String>,
    confidence: Option<f64>,
}

/// `(title, description)` of a line shaped `N. Title: description`
fn numbered_item(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    let digits = line.find(|c: char| !c.is_ascii_digit())?;
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    let rest = rest
        .strip_prefix('.')
        .or_else(|| rest.strip_prefix(')'))?
        .trim();
    if rest.is_empty() {
        return None;
    }

    let (title, description) = rest.split_once(':').unwrap_or((rest, rest));
    let clean = |s: &str| s.trim().trim_matches('*').trim().to_string();
    let title = clean(title);
    if title.is_empty() {
        return None;
    }
    Some((title, clean(description)))
}

/// One insight per numbered line
pub fn parse_numbered_insights(text: &str, user_id: &str, now: DateTime<Utc>) -> Vec<HealthInsight> {
    text.lines()
        .filter_map(numbered_item)
        .map(|(title, description)| HealthInsight {
            id: generate_id(),
            user_id: user_id.to_string(),
            title,
            description,
            category: InsightCategory::GeneralWellness,
            priority: InsightPriority::Medium,
            actionable: false,
            recommendations: Vec::new(),
            confidence: NUMBERED_LINE_CONFIDENCE,
            generated_at: now,
        })
        .collect()
}

pub fn default_insights(user_id: &str, now: DateTime<Utc>) -> Vec<HealthInsight> {
    vec![HealthInsight {
        id: generate_id(),
        user_id: user_id.to_string(),
        title: "Heart Rate Trend".to_string(),
        description: "Your heart rate has been consistently improving".to_string(),
        category: InsightCategory::HeartHealth,
        priority: InsightPriority::Medium,
        actionable: true,
        recommendations: vec![
            "Continue current exercise routine".to_string(),
            "Monitor during workouts".to_string(),
        ],
        confidence: 0.85,
        generated_at: now,
    }]
}

pub fn insights(text: Option<&str>, user_id: &str, now: DateTime<Utc>) -> Vec<HealthInsight> {
    let Some(text) = text else {
        return fallback("insights", default_insights(user_id, now));
    };

    let parsed: Vec<HealthInsight> = parse_list::<InsightDraft>(text, &["insights"])
        .unwrap_or_default()
        .into_iter()
        .filter(|d| !d.title.trim().is_empty())
        .map(|d| HealthInsight {
            id: generate_id(),
            user_id: user_id.to_string(),
            category: tag_or(&d.category, InsightCategory::GeneralWellness),
            priority: tag_or(&d.priority, InsightPriority::Medium),
            actionable: d.actionable.unwrap_or(!d.recommendations.is_empty()),
            confidence: confidence_or(d.confidence, PARSED_CONFIDENCE),
            title: d.title,
            description: d.description,
            recommendations: d.recommendations,
            generated_at: now,
        })
        .collect();
    if !parsed.is_empty() {
        return parsed;
    }

    let numbered = parse_numbered_insights(text, user_id, now);
    if !numbered.is_empty() {
        return numbered;
    }
    fallback("insights", default_insights(user_id, now))
}

// ============================================================================
// Recommendations
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RecommendationDraft {
    #[serde(rename = "type", alias = "recommendation_type")]
    recommendation_type: String,
    title: String,
    description: String,
    #[serde(alias = "actionItems")]
    action_items: Vec<String>,
    #[serde(alias = "expectedBenefit")]
    expected_benefit: String,
    difficulty: String,
    #[serde(alias = "estimatedTimeToResults")]
    estimated_time_to_results: String,
    confidence: Option<f64>,
}

pub fn default_recommendations(user_id: &str, now: DateTime<Utc>) -> Vec<AiRecommendation> {
    vec![AiRecommendation {
        id: generate_id(),
        user_id: user_id.to_string(),
        recommendation_type: RecommendationType::MealSuggestion,
        title: "Increase Protein Intake".to_string(),
        description: "Add more lean protein to your meals".to_string(),
        action_items: vec![
            "Include protein with each meal".to_string(),
            "Try Greek yogurt as snacks".to_string(),
        ],
        expected_benefit: "Better muscle recovery and satiety".to_string(),
        difficulty: RecommendationDifficulty::Easy,
        estimated_time_to_results: "2-3 weeks".to_string(),
        confidence: 0.8,
        generated_at: now,
    }]
}

pub fn recommendations(
    text: Option<&str>,
    user_id: &str,
    now: DateTime<Utc>,
) -> Vec<AiRecommendation> {
    let parsed: Vec<AiRecommendation> = text
        .and_then(|t| parse_list::<RecommendationDraft>(t, &["recommendations"]))
        .unwrap_or_default()
        .into_iter()
        .filter(|d| !d.title.trim().is_empty())
        .map(|d| AiRecommendation {
            id: generate_id(),
            user_id: user_id.to_string(),
            recommendation_type: tag_or(&d.recommendation_type, RecommendationType::Lifestyle),
            difficulty: tag_or(&d.difficulty, RecommendationDifficulty::Easy),
            confidence: confidence_or(d.confidence, PARSED_CONFIDENCE),
            title: d.title,
            description: d.description,
            action_items: d.action_items,
            expected_benefit: d.expected_benefit,
            estimated_time_to_results: d.estimated_time_to_results,
            generated_at: now,
        })
        .collect();

    if parsed.is_empty() {
        fallback("recommendations", default_recommendations(user_id, now))
    } else {
        parsed
    }
}

// ============================================================================
// Workouts
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExerciseDraft {
    name: String,
    sets: Option<i32>,
    reps: Option<i32>,
    rest_seconds: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PlannedWorkoutDraft {
    name: String,
    description: String,
    #[serde(alias = "type", alias = "category")]
    workout_type: String,
    #[serde(alias = "duration")]
    duration_minutes: Option<i32>,
    difficulty: String,
    calories_burned: Option<i32>,
    exercises: Vec<ExerciseDraft>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WorkoutPlanDraft {
    name: String,
    description: String,
    duration_weeks: Option<i32>,
    workouts_per_week: Option<i32>,
    difficulty: String,
    workouts: Vec<PlannedWorkoutDraft>,
}

/// Plan parameters echoed into the result
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest<'a> {
    pub user_id: &'a str,
    pub goals: &'a [FitnessGoal],
    pub level: WorkoutDifficulty,
}

pub fn default_workout_plan(request: PlanRequest<'_>, now: DateTime<Utc>) -> WorkoutPlan {
    WorkoutPlan {
        id: generate_id(),
        user_id: request.user_id.to_string(),
        name: "AI Generated Workout Plan".to_string(),
        description: "Personalized workout plan based on your goals and fitness level".to_string(),
        goals: request.goals.to_vec(),
        duration_weeks: 4,
        workouts_per_week: 3,
        difficulty: WorkoutDifficulty::Intermediate,
        workouts: vec![PlannedWorkout {
            name: "Full Body Strength".to_string(),
            description: "Complete full body workout".to_string(),
            workout_type: WorkoutType::StrengthTraining,
            duration_minutes: 45,
            difficulty: WorkoutDifficulty::Intermediate,
            calories_burned: 300,
            exercises: Vec::new(),
        }],
        created_at: now,
    }
}

pub fn workout_plan(text: Option<&str>, request: PlanRequest<'_>, now: DateTime<Utc>) -> WorkoutPlan {
    let draft = text
        .and_then(parse_json::<WorkoutPlanDraft>)
        .filter(|d| !d.workouts.is_empty());
    let Some(draft) = draft else {
        return fallback("workout_plan", default_workout_plan(request, now));
    };

    let workouts = draft
        .workouts
        .into_iter()
        .map(|w| PlannedWorkout {
            workout_type: tag_or(&w.workout_type, WorkoutType::Other),
            duration_minutes: w.duration_minutes.unwrap_or(45),
            difficulty: tag_or(&w.difficulty, request.level),
            calories_burned: w.calories_burned.unwrap_or(0),
            exercises: w
                .exercises
                .into_iter()
                .filter(|e| !e.name.trim().is_empty())
                .map(|e| PlannedExercise {
                    name: e.name,
                    sets: e.sets.unwrap_or(3),
                    reps: e.reps.unwrap_or(10),
                    rest_seconds: e.rest_seconds,
                })
                .collect(),
            name: w.name,
            description: w.description,
        })
        .collect();

    WorkoutPlan {
        id: generate_id(),
        user_id: request.user_id.to_string(),
        name: if draft.name.trim().is_empty() {
            "AI Generated Workout Plan".to_string()
        } else {
            draft.name
        },
        description: draft.description,
        goals: request.goals.to_vec(),
        duration_weeks: draft.duration_weeks.unwrap_or(4),
        workouts_per_week: draft.workouts_per_week.unwrap_or(3),
        difficulty: tag_or(&draft.difficulty, request.level),
        workouts,
        created_at: now,
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AnalysisDraft {
    overall_progress: Value,
    strengths: Vec<String>,
    areas_for_improvement: Vec<String>,
    recommended_changes: Vec<String>,
    injury_risk_assessment: String,
    progress_trend: String,
}

pub fn default_workout_analysis(user_id: &str) -> WorkoutAnalysis {
    WorkoutAnalysis {
        user_id: user_id.to_string(),
        overall_progress: "Steady progress with consistent training over the period".to_string(),
        strengths: vec![
            "Consistent workout schedule".to_string(),
            "Strength gains in major lifts".to_string(),
        ],
        areas_for_improvement: vec![
            "Cardiovascular endurance".to_string(),
            "Flexibility".to_string(),
        ],
        recommended_changes: vec![
            "Increase cardio frequency".to_string(),
            "Focus on compound movements".to_string(),
        ],
        injury_risk_assessment: "Low".to_string(),
        progress_trend: ProgressTrend::Improving,
    }
}

pub fn workout_analysis(text: Option<&str>, user_id: &str) -> WorkoutAnalysis {
    let draft = text.and_then(parse_json::<AnalysisDraft>).filter(|d| {
        !d.overall_progress.is_null() || !d.strengths.is_empty() || !d.recommended_changes.is_empty()
    });
    let Some(draft) = draft else {
        return fallback("workout_analysis", default_workout_analysis(user_id));
    };

    let overall_progress = match draft.overall_progress {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    };

    WorkoutAnalysis {
        user_id: user_id.to_string(),
        overall_progress,
        strengths: draft.strengths,
        areas_for_improvement: draft.areas_for_improvement,
        recommended_changes: draft.recommended_changes,
        injury_risk_assessment: draft.injury_risk_assessment,
        progress_trend: tag_or(&draft.progress_trend, ProgressTrend::Stable),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModificationDraft {
    exercise_id: Option<String>,
    #[serde(alias = "type")]
    modification_type: String,
    description: String,
    reason: String,
}

pub fn default_modifications() -> Vec<WorkoutModification> {
    vec![WorkoutModification {
        exercise_id: None,
        modification_type: ModificationType::DecreaseWeight,
        description: "Reduce intensity by 10% for better recovery".to_string(),
        reason: "User reported fatigue".to_string(),
    }]
}

pub fn workout_modifications(text: Option<&str>) -> Vec<WorkoutModification> {
    let parsed: Vec<WorkoutModification> = text
        .and_then(|t| parse_list::<ModificationDraft>(t, &["modifications"]))
        .unwrap_or_default()
        .into_iter()
        .filter(|d| !d.description.trim().is_empty())
        .map(|d| WorkoutModification {
            exercise_id: d.exercise_id.filter(|id| !id.trim().is_empty()),
            modification_type: tag_or(&d.modification_type, ModificationType::ChangeExercise),
            description: d.description,
            reason: d.reason,
        })
        .collect();

    if parsed.is_empty() {
        fallback("workout_modifications", default_modifications())
    } else {
        parsed
    }
}

// ============================================================================
// Nutrition
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MealDraft {
    day: Option<i32>,
    meal_type: String,
    name: String,
    calories: Option<i32>,
    description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MealPlanDraft {
    name: String,
    description: String,
    total_calories: Option<i32>,
    meals: Vec<MealDraft>,
}

pub fn default_meal_plan(user_id: &str, today: NaiveDate, now: DateTime<Utc>) -> MealPlan {
    MealPlan {
        id: generate_id(),
        user_id: user_id.to_string(),
        name: "AI Generated Meal Plan".to_string(),
        description: "Personalized meal plan based on your nutrition goals".to_string(),
        start_date: today,
        end_date: today + Duration::days(7),
        meals: Vec::new(),
        total_calories: 2000,
        macro_targets: MacroTargets {
            protein_g: 150.0,
            carbs_g: 200.0,
            fat_g: 80.0,
            fiber_g: 25.0,
        },
        created_at: now,
    }
}

pub fn meal_plan(
    text: Option<&str>,
    goals: &NutritionGoals,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> MealPlan {
    let draft = text
        .and_then(parse_json::<MealPlanDraft>)
        .filter(|d| !d.meals.is_empty());
    let Some(draft) = draft else {
        return fallback("meal_plan", default_meal_plan(&goals.user_id, today, now));
    };

    let meals = draft
        .meals
        .into_iter()
        .filter(|m| !m.name.trim().is_empty())
        .map(|m| PlannedMeal {
            day: m.day.unwrap_or(1).clamp(1, 7),
            meal_type: tag_or(&m.meal_type, MealType::Other),
            name: m.name,
            calories: m.calories.unwrap_or(0),
            description: m.description,
        })
        .collect();

    MealPlan {
        id: generate_id(),
        user_id: goals.user_id.clone(),
        name: if draft.name.trim().is_empty() {
            "AI Generated Meal Plan".to_string()
        } else {
            draft.name
        },
        description: draft.description,
        start_date: today,
        end_date: today + Duration::days(7),
        meals,
        total_calories: draft.total_calories.unwrap_or(goals.daily_calories),
        macro_targets: goals.macro_targets(),
        created_at: now,
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DeficiencyDraft {
    nutrient: String,
    #[serde(alias = "current_level")]
    current_intake: Option<f64>,
    #[serde(alias = "recommended_level")]
    recommended_intake: Option<f64>,
    severity: String,
    symptoms: Vec<String>,
    food_sources: Vec<String>,
}

pub fn default_deficiencies() -> Vec<NutritionalDeficiency> {
    vec![NutritionalDeficiency {
        nutrient: "Vitamin D".to_string(),
        current_intake: 20.0,
        recommended_intake: 30.0,
        severity: DeficiencySeverity::Moderate,
        symptoms: Vec::new(),
        food_sources: vec![
            "Fatty fish".to_string(),
            "Fortified milk".to_string(),
            "Egg yolks".to_string(),
        ],
    }]
}

pub fn deficiencies(text: Option<&str>) -> Vec<NutritionalDeficiency> {
    let parsed: Vec<NutritionalDeficiency> = text
        .and_then(|t| parse_list::<DeficiencyDraft>(t, &["deficiencies"]))
        .unwrap_or_default()
        .into_iter()
        .filter(|d| !d.nutrient.trim().is_empty())
        .map(|d| NutritionalDeficiency {
            severity: tag_or(&d.severity, DeficiencySeverity::Moderate),
            current_intake: d.current_intake.unwrap_or(0.0),
            recommended_intake: d.recommended_intake.unwrap_or(0.0),
            nutrient: d.nutrient,
            symptoms: d.symptoms,
            food_sources: d.food_sources,
        })
        .collect();

    if parsed.is_empty() {
        fallback("deficiencies", default_deficiencies())
    } else {
        parsed
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SuggestionDraft {
    #[serde(alias = "type")]
    suggestion_type: String,
    description: String,
    foods_to_add: Vec<String>,
    foods_to_reduce: Vec<String>,
    expected_benefit: String,
}

pub fn default_meal_suggestions() -> Vec<MealSuggestion> {
    vec![MealSuggestion {
        suggestion_type: SuggestionType::AddProtein,
        description: "Protein-Rich Breakfast: High protein breakfast to start your day".to_string(),
        foods_to_add: vec![
            "Greek yogurt".to_string(),
            "Berries".to_string(),
            "Nuts".to_string(),
        ],
        foods_to_reduce: Vec::new(),
        expected_benefit: "Longer satiety and steadier energy through the morning".to_string(),
    }]
}

pub fn meal_suggestions(text: Option<&str>) -> Vec<MealSuggestion> {
    let parsed: Vec<MealSuggestion> = text
        .and_then(|t| parse_list::<SuggestionDraft>(t, &["suggestions", "improvements"]))
        .unwrap_or_default()
        .into_iter()
        .filter(|d| !d.description.trim().is_empty())
        .map(|d| MealSuggestion {
            suggestion_type: tag_or(&d.suggestion_type, SuggestionType::BalanceMacros),
            description: d.description,
            foods_to_add: d.foods_to_add,
            foods_to_reduce: d.foods_to_reduce,
            expected_benefit: d.expected_benefit,
        })
        .collect();

    if parsed.is_empty() {
        fallback("meal_improvements", default_meal_suggestions())
    } else {
        parsed
    }
}

// ============================================================================
// Vision
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RecognizedDraft {
    name: String,
    confidence: Option<f64>,
    #[serde(alias = "estimated_weight", alias = "weight_g")]
    estimated_weight_g: Option<f64>,
    calories: Option<f64>,
    nutrients: BTreeMap<String, f64>,
}

pub fn default_food_scan(now: DateTime<Utc>) -> FoodScanResult {
    FoodScanResult {
        recognized_foods: vec![RecognizedFood {
            name: "Apple".to_string(),
            confidence: 0.95,
            estimated_weight_g: 150.0,
            calories: 80.0,
            nutrients: BTreeMap::from([
                ("carbs".to_string(), 21.0),
                ("fiber".to_string(), 4.0),
                ("sugar".to_string(), 16.0),
            ]),
        }],
        confidence: 0.95,
        scanned_at: now,
    }
}

pub fn food_scan(text: Option<&str>, now: DateTime<Utc>) -> FoodScanResult {
    let foods: Vec<RecognizedFood> = text
        .and_then(|t| parse_list::<RecognizedDraft>(t, &["foods", "recognized_foods"]))
        .unwrap_or_default()
        .into_iter()
        .filter(|d| !d.name.trim().is_empty())
        .map(|d| RecognizedFood {
            name: d.name,
            confidence: confidence_or(d.confidence, PARSED_CONFIDENCE),
            estimated_weight_g: d.estimated_weight_g.unwrap_or(DEFAULT_PORTION_G),
            calories: d.calories.unwrap_or(0.0),
            nutrients: d.nutrients,
        })
        .collect();

    if foods.is_empty() {
        return fallback("food_scan", default_food_scan(now));
    }

    let confidence = foods.iter().map(|f| f.confidence).sum::<f64>() / foods.len() as f64;
    FoodScanResult {
        recognized_foods: foods,
        confidence,
        scanned_at: now,
    }
}

/// Portion in grams from `{"grams": n}`, a bare number, or the first number in prose
pub fn portion_grams(text: Option<&str>) -> f64 {
    let from_json = |t: &str| match parse_json::<Value>(t)? {
        Value::Number(n) => n.as_f64(),
        Value::Object(map) => map.get("grams").and_then(Value::as_f64),
        _ => None,
    };
    let from_prose = |t: &str| {
        t.split(|c: char| !(c.is_ascii_digit() || c == '.'))
            .find_map(|token| token.trim_matches('.').parse::<f64>().ok())
    };

    text.and_then(|t| from_json(t).or_else(|| from_prose(t)))
        .filter(|g| g.is_finite() && *g > 0.0)
        .unwrap_or_else(|| fallback("food_portion", DEFAULT_PORTION_G))
}

// ============================================================================
// Reports
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReportDraft {
    summary: String,
    #[serde(alias = "insights")]
    key_findings: Vec<String>,
    recommendations: Vec<String>,
    #[serde(alias = "key_metrics")]
    progress_metrics: BTreeMap<String, f64>,
}

pub fn default_health_report(user_id: &str, time_range: TimeRange, now: DateTime<Utc>) -> HealthReport {
    HealthReport {
        id: generate_id(),
        user_id: user_id.to_string(),
        time_range,
        summary: "Your health metrics show positive trends across most categories".to_string(),
        key_findings: vec![
            "Consistent exercise routine".to_string(),
            "Good sleep patterns".to_string(),
        ],
        recommendations: vec![
            "Increase water intake".to_string(),
            "Add more vegetables to diet".to_string(),
        ],
        progress_metrics: BTreeMap::from([
            ("average_heart_rate".to_string(), 72.0),
            ("total_steps".to_string(), 8500.0),
            ("sleep_quality".to_string(), 7.5),
        ]),
        generated_at: now,
    }
}

pub fn health_report(
    text: Option<&str>,
    user_id: &str,
    time_range: TimeRange,
    now: DateTime<Utc>,
) -> HealthReport {
    let draft = text
        .and_then(parse_json::<ReportDraft>)
        .filter(|d| !d.summary.trim().is_empty());
    match draft {
        Some(d) => HealthReport {
            id: generate_id(),
            user_id: user_id.to_string(),
            time_range,
            summary: d.summary,
            key_findings: d.key_findings,
            recommendations: d.recommendations,
            progress_metrics: d.progress_metrics,
            generated_at: now,
        },
        None => fallback("health_report", default_health_report(user_id, time_range, now)),
    }
}
