//! AI assistant backed by a generative text/vision model
//!
//! Every operation builds a prompt, makes exactly one model call, and turns
//! the reply into typed results. Transport and API failures are returned as
//! [`AiError`]; an unusable reply falls back to the operation's default.

pub mod gemini;
pub mod parse;
pub mod prompts;

use async_trait::async_trait;
use chrono::Utc;
use gemini::GeminiResponse;
use pixelpulse_shared::ai::{
    AiRecommendation, ChatMessage, FoodScanResult, HealthContext, HealthInsight, HealthProgress,
    HealthReport, MealPlan, MealSuggestion, NutritionalDeficiency, RecognizedFood, TimeRange,
    WorkoutAnalysis, WorkoutModification, WorkoutPlan,
};
use pixelpulse_shared::models::{
    generate_id, DailyNutrition, DietaryRestriction, Equipment, FitnessGoal, FoodEntryDetail,
    HealthData, NutritionGoals, User, Workout, WorkoutDifficulty,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Failures talking to the model
#[derive(Debug, Error)]
pub enum AiError {
    #[error("Gemini API key not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A model that answers text prompts and image prompts
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<GeminiResponse, AiError>;

    async fn generate_from_image(
        &self,
        prompt: &str,
        jpeg: &[u8],
    ) -> Result<GeminiResponse, AiError>;
}

/// Workout plan inputs
#[derive(Debug, Clone)]
pub struct WorkoutPlanInput<'a> {
    pub goals: &'a [FitnessGoal],
    pub level: WorkoutDifficulty,
    pub equipment: &'a [Equipment],
    pub minutes_per_session: u32,
}

/// Typed assistant operations over a [`GenerativeModel`]
#[derive(Clone)]
pub struct AiAssistant {
    model: Arc<dyn GenerativeModel>,
}

impl AiAssistant {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    async fn text(&self, prompt: &str) -> Result<GeminiResponse, AiError> {
        self.model.generate_text(prompt).await
    }

    pub async fn generate_health_insights(
        &self,
        user_id: &str,
        data: &[HealthData],
        time_range: TimeRange,
    ) -> Result<Vec<HealthInsight>, AiError> {
        let response = self.text(&prompts::health_insights(data, time_range)).await?;
        let insights = parse::insights(response.first_text(), user_id, Utc::now());
        info!(user_id, count = insights.len(), "Generated health insights");
        Ok(insights)
    }

    pub async fn generate_personalized_recommendations(
        &self,
        user_id: &str,
        profile: &User,
        recent: &[HealthData],
    ) -> Result<Vec<AiRecommendation>, AiError> {
        let now = Utc::now();
        let prompt = prompts::personalized_recommendations(profile, recent, now.date_naive());
        let response = self.text(&prompt).await?;
        Ok(parse::recommendations(response.first_text(), user_id, now))
    }

    pub async fn generate_workout_plan(
        &self,
        user_id: &str,
        input: WorkoutPlanInput<'_>,
    ) -> Result<WorkoutPlan, AiError> {
        let prompt = prompts::workout_plan(
            input.goals,
            input.level,
            input.equipment,
            input.minutes_per_session,
        );
        let response = self.text(&prompt).await?;
        let request = parse::PlanRequest {
            user_id,
            goals: input.goals,
            level: input.level,
        };
        Ok(parse::workout_plan(response.first_text(), request, Utc::now()))
    }

    pub async fn analyze_workout_performance(
        &self,
        user_id: &str,
        history: &[Workout],
    ) -> Result<WorkoutAnalysis, AiError> {
        let response = self.text(&prompts::workout_analysis(history)).await?;
        Ok(parse::workout_analysis(response.first_text(), user_id))
    }

    pub async fn suggest_workout_modifications(
        &self,
        workout: &Workout,
        feedback: &str,
    ) -> Result<Vec<WorkoutModification>, AiError> {
        let response = self
            .text(&prompts::workout_modifications(workout, feedback))
            .await?;
        Ok(parse::workout_modifications(response.first_text()))
    }

    pub async fn generate_meal_plan(
        &self,
        goals: &NutritionGoals,
        restrictions: &[DietaryRestriction],
        preferences: &[String],
    ) -> Result<MealPlan, AiError> {
        let response = self
            .text(&prompts::meal_plan(goals, restrictions, preferences))
            .await?;
        let now = Utc::now();
        Ok(parse::meal_plan(response.first_text(), goals, now.date_naive(), now))
    }

    pub async fn analyze_nutritional_deficiencies(
        &self,
        days: &[DailyNutrition],
    ) -> Result<Vec<NutritionalDeficiency>, AiError> {
        let response = self.text(&prompts::nutritional_analysis(days)).await?;
        Ok(parse::deficiencies(response.first_text()))
    }

    pub async fn suggest_meal_improvements(
        &self,
        meal: &[FoodEntryDetail],
    ) -> Result<Vec<MealSuggestion>, AiError> {
        let response = self.text(&prompts::meal_improvements(meal)).await?;
        Ok(parse::meal_suggestions(response.first_text()))
    }

    pub async fn recognize_food_from_image(&self, jpeg: &[u8]) -> Result<FoodScanResult, AiError> {
        let response = self
            .model
            .generate_from_image(prompts::FOOD_SCAN, jpeg)
            .await?;
        let scan = parse::food_scan(response.first_text(), Utc::now());
        info!(foods = scan.recognized_foods.len(), "Recognized food image");
        Ok(scan)
    }

    pub async fn estimate_food_portion(
        &self,
        jpeg: &[u8],
        food: &RecognizedFood,
    ) -> Result<f64, AiError> {
        let response = self
            .model
            .generate_from_image(&prompts::food_portion(&food.name), jpeg)
            .await?;
        Ok(parse::portion_grams(response.first_text()))
    }

    pub async fn generate_motivational_message(
        &self,
        progress: &HealthProgress,
        goals: &[FitnessGoal],
    ) -> Result<String, AiError> {
        let response = self
            .text(&prompts::motivational_message(progress, goals))
            .await?;
        Ok(parse::text_or(response.first_text(), parse::MOTIVATION_FALLBACK))
    }

    pub async fn answer_health_question(
        &self,
        question: &str,
        context: &HealthContext,
    ) -> Result<String, AiError> {
        let response = self
            .text(&prompts::health_question(question, context))
            .await?;
        Ok(parse::text_or(response.first_text(), parse::ANSWER_FALLBACK))
    }

    pub async fn generate_health_report(
        &self,
        user_id: &str,
        time_range: TimeRange,
    ) -> Result<HealthReport, AiError> {
        let response = self.text(&prompts::health_report(time_range)).await?;
        Ok(parse::health_report(
            response.first_text(),
            user_id,
            time_range,
            Utc::now(),
        ))
    }

    /// Assistant reply to `message`, given the conversation so far
    pub async fn chat(
        &self,
        user_id: &str,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<ChatMessage, AiError> {
        let response = self.text(&prompts::chat(message, history)).await?;
        Ok(ChatMessage {
            id: generate_id(),
            user_id: user_id.to_string(),
            content: parse::text_or(response.first_text(), parse::CHAT_FALLBACK),
            is_from_user: false,
            timestamp: Utc::now(),
        })
    }

    /// Conversations are not persisted
    pub fn chat_history(&self, _user_id: &str) -> Vec<ChatMessage> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::gemini::{Candidate, Content, Part};
    use super::*;
    use pixelpulse_shared::models::HealthDataType;
    use std::sync::Mutex;

    /// Replays a canned reply and records prompts
    struct ScriptedModel {
        reply: Result<Option<String>, u16>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn replying(text: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.map(str::to_string)),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn respond(&self, prompt: &str) -> Result<GeminiResponse, AiError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(None) => Ok(GeminiResponse::default()),
                Ok(Some(text)) => Ok(GeminiResponse {
                    candidates: vec![Candidate {
                        content: Some(Content {
                            parts: vec![Part::text(text.clone())],
                            role: "model".into(),
                        }),
                        finish_reason: Some("STOP".into()),
                        index: 0,
                        safety_ratings: vec![],
                    }],
                    prompt_feedback: None,
                }),
                Err(status) => Err(AiError::Api {
                    status: *status,
                    message: "quota exceeded".into(),
                }),
            }
        }
    }

    #[async_trait]
    impl GenerativeModel for ScriptedModel {
        async fn generate_text(&self, prompt: &str) -> Result<GeminiResponse, AiError> {
            self.respond(prompt)
        }

        async fn generate_from_image(
            &self,
            prompt: &str,
            _jpeg: &[u8],
        ) -> Result<GeminiResponse, AiError> {
            self.respond(prompt)
        }
    }

    #[tokio::test]
    async fn test_failure_carries_no_data() {
        let assistant = AiAssistant::new(ScriptedModel::failing(429));
        let err = assistant
            .generate_health_insights("u1", &[], TimeRange::Last7Days)
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Api { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_empty_candidates_yield_defaults() {
        let assistant = AiAssistant::new(ScriptedModel::replying(None));

        let insights = assistant
            .generate_health_insights("u1", &[], TimeRange::Last7Days)
            .await
            .unwrap();
        assert_eq!(insights[0].title, "Heart Rate Trend");

        let grams = assistant
            .estimate_food_portion(
                &[0xFF, 0xD8],
                &parse::default_food_scan(Utc::now()).recognized_foods[0],
            )
            .await
            .unwrap();
        assert_eq!(grams, 150.0);

        let reply = assistant.chat("u1", "hello", &[]).await.unwrap();
        assert_eq!(reply.content, parse::CHAT_FALLBACK);
        assert!(!reply.is_from_user);
    }

    #[tokio::test]
    async fn test_prompt_reaches_model() {
        let model = ScriptedModel::replying(Some("Keep going!"));
        let assistant = AiAssistant::new(model.clone());
        let data = vec![HealthData::new("u1", HealthDataType::Steps, 9000.0)];

        assistant
            .generate_health_insights("u1", &data, TimeRange::Last24Hours)
            .await
            .unwrap();
        let message = assistant
            .answer_health_question(
                "Should I stretch?",
                &HealthContext {
                    age: None,
                    gender: None,
                    activity_level: None,
                    health_conditions: vec![],
                    medications: vec![],
                },
            )
            .await
            .unwrap();

        assert_eq!(message, "Keep going!");
        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[0].contains("from the last 24 hours"));
        assert!(prompts[0].contains("STEPS: 9000 steps"));
        assert!(prompts[1].contains("Question: \"Should I stretch?\""));
    }

    #[test]
    fn test_chat_history_is_empty() {
        let assistant = AiAssistant::new(ScriptedModel::replying(None));
        assert!(assistant.chat_history("u1").is_empty());
    }
}
