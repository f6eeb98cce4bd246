//! Assistant service - fills AI requests from local storage
//!
//! Requests may carry their inputs inline. Anything omitted is loaded for the
//! user before the model is called.

use crate::ai::{AiAssistant, WorkoutPlanInput};
use crate::error::ApiError;
use crate::repositories::HealthDataRepository;
use crate::services::{NutritionService, UserService, WorkoutService};
use chrono::Utc;
use pixelpulse_shared::ai::{
    AiRecommendation, HealthInsight, MealPlan, TimeRange, WorkoutAnalysis, WorkoutPlan,
};
use pixelpulse_shared::{
    InsightsRequest, MealPlanRequest, RecommendationsRequest, WorkoutAnalysisRequest,
    WorkoutPlanRequest,
};
use sqlx::SqlitePool;
use tracing::debug;

/// Window of readings fed to recommendations when none are supplied
const RECENT_WINDOW: TimeRange = TimeRange::Last7Days;

pub struct AssistantService;

impl AssistantService {
    pub async fn insights(
        db: &SqlitePool,
        ai: &AiAssistant,
        req: InsightsRequest,
    ) -> Result<Vec<HealthInsight>, ApiError> {
        let data = match req.health_data {
            Some(data) => data,
            None => {
                let (start, end) = req.time_range.window(Utc::now());
                HealthDataRepository::list_in_range(db, &req.user_id, start, end)
                    .await
                    .map_err(ApiError::Internal)?
            }
        };
        debug!(user_id = %req.user_id, readings = data.len(), "Requesting health insights");

        Ok(ai
            .generate_health_insights(&req.user_id, &data, req.time_range)
            .await?)
    }

    pub async fn recommendations(
        db: &SqlitePool,
        ai: &AiAssistant,
        req: RecommendationsRequest,
    ) -> Result<Vec<AiRecommendation>, ApiError> {
        let profile = match req.profile {
            Some(profile) => profile,
            None => UserService::get(db, &req.user_id).await?,
        };
        let recent = match req.recent_data {
            Some(data) => data,
            None => {
                let (start, end) = RECENT_WINDOW.window(Utc::now());
                HealthDataRepository::list_in_range(db, &req.user_id, start, end)
                    .await
                    .map_err(ApiError::Internal)?
            }
        };

        Ok(ai
            .generate_personalized_recommendations(&req.user_id, &profile, &recent)
            .await?)
    }

    pub async fn workout_plan(
        ai: &AiAssistant,
        req: &WorkoutPlanRequest,
    ) -> Result<WorkoutPlan, ApiError> {
        if req.minutes_per_session == 0 {
            return Err(ApiError::BadRequest(
                "minutes_per_session must be greater than zero".to_string(),
            ));
        }
        let input = WorkoutPlanInput {
            goals: &req.goals,
            level: req.fitness_level,
            equipment: &req.equipment,
            minutes_per_session: req.minutes_per_session,
        };
        Ok(ai.generate_workout_plan(&req.user_id, input).await?)
    }

    pub async fn workout_analysis(
        db: &SqlitePool,
        ai: &AiAssistant,
        req: WorkoutAnalysisRequest,
    ) -> Result<WorkoutAnalysis, ApiError> {
        let workouts = match req.workouts {
            Some(workouts) => workouts,
            None => WorkoutService::list(db, &req.user_id, None).await?,
        };
        Ok(ai
            .analyze_workout_performance(&req.user_id, &workouts)
            .await?)
    }

    pub async fn meal_plan(
        db: &SqlitePool,
        ai: &AiAssistant,
        req: MealPlanRequest,
    ) -> Result<MealPlan, ApiError> {
        let goals = match req.goals {
            Some(goals) => goals,
            None => NutritionService::goals_for(db, &req.user_id).await?,
        };
        Ok(ai
            .generate_meal_plan(&goals, &req.dietary_restrictions, &req.preferences)
            .await?)
    }
}
