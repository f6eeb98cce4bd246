//! Prompt templates
//!
//! Each builder interpolates domain records as labelled lines followed by
//! numbered analysis requests. Builders whose answer is parsed end with a JSON
//! shape instruction.

use chrono::NaiveDate;
use pixelpulse_shared::ai::{ChatMessage, HealthContext, HealthProgress, TimeRange};
use pixelpulse_shared::models::{
    join_tags, DailyNutrition, DietaryRestriction, Equipment, FitnessGoal, FoodEntryDetail,
    HealthData, NutritionGoals, User, Workout, WorkoutDifficulty,
};

/// Messages of history carried into a chat prompt
pub const CHAT_HISTORY_LIMIT: usize = 5;

pub const FOOD_SCAN: &str = "Analyze this food image and identify all visible food items with their estimated quantities.\n\nFormat as JSON with a foods array containing name, confidence (0-1), estimated_weight_g, calories, and nutrients (an object of grams keyed by carbs, protein, fat, fiber, sugar).";

fn or_unknown<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "unknown".to_string(), |v| v.to_string())
}

fn json_shape(shape: &str) -> String {
    format!("Format as JSON with {}.", shape)
}

pub fn health_insights(data: &[HealthData], time_range: TimeRange) -> String {
    let readings = data
        .iter()
        .map(|d| {
            format!(
                "{}: {} {} at {}",
                d.data_type,
                d.value,
                d.unit,
                d.timestamp.to_rfc3339()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze the following health data from the {} and provide actionable insights:\n\n\
         {}\n\n\
         Please provide:\n\
         1. Key patterns or trends\n\
         2. Areas of concern\n\
         3. Positive developments\n\
         4. Specific actionable recommendations\n\n\
         Format as JSON with insights array containing title, description, category, priority, and recommendations.",
        time_range.label(),
        readings
    )
}

pub fn personalized_recommendations(profile: &User, recent: &[HealthData], today: NaiveDate) -> String {
    let activity = recent
        .iter()
        .map(|d| format!("{}: {} {}", d.data_type, d.value, d.unit))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Based on this user profile and recent activity, generate personalized health recommendations:\n\n\
         User Profile:\n\
         - Age: {}\n\
         - Gender: {}\n\
         - Activity Level: {}\n\
         - Fitness Goals: {}\n\
         - Health Conditions: {}\n\n\
         Recent Activity:\n\
         {}\n\n\
         Provide specific, actionable recommendations with expected benefits and difficulty levels.\n\
         {}",
        or_unknown(profile.age_on(today)),
        or_unknown(profile.gender),
        profile.activity_level,
        join_tags(&profile.fitness_goals),
        profile.health_conditions.join(", "),
        activity,
        json_shape(
            "a recommendations array containing type, title, description, action_items, \
             expected_benefit, difficulty, and estimated_time_to_results"
        )
    )
}

pub fn workout_plan(
    goals: &[FitnessGoal],
    level: WorkoutDifficulty,
    equipment: &[Equipment],
    minutes_per_session: u32,
) -> String {
    format!(
        "Create a personalized workout plan with these parameters:\n\
         - Fitness Goals: {}\n\
         - Current Level: {}\n\
         - Available Equipment: {}\n\
         - Time per session: {} minutes\n\n\
         Include specific exercises, sets, reps, and progression plan.\n\
         {}",
        join_tags(goals),
        level,
        join_tags(equipment),
        minutes_per_session,
        json_shape(
            "name, description, duration_weeks, workouts_per_week, difficulty, and a workouts \
             array whose items contain name, description, workout_type, duration_minutes, \
             difficulty, calories_burned, and exercises (name, sets, reps, rest_seconds)"
        )
    )
}

pub fn workout_analysis(history: &[Workout]) -> String {
    let workouts = history
        .iter()
        .map(|w| {
            format!(
                "Workout: {}, Duration: {}min, Type: {}, Calories: {}",
                w.name,
                w.duration_minutes(),
                w.workout_type,
                w.calories_burned
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze the following workout history and provide detailed insights:\n\n\
         {}\n\n\
         Please analyze:\n\
         1. Progress trends and patterns\n\
         2. Consistency and frequency\n\
         3. Strength and endurance improvements\n\
         4. Areas needing attention\n\
         5. Specific recommendations for improvement\n\n\
         Provide scores for overall progress, strength, endurance, and consistency (0-100).\n\
         {}",
        workouts,
        json_shape(
            "overall_progress, strengths, areas_for_improvement, recommended_changes, \
             injury_risk_assessment, and progress_trend (IMPROVING, STABLE, DECLINING or INCONSISTENT)"
        )
    )
}

pub fn workout_modifications(workout: &Workout, feedback: &str) -> String {
    format!(
        "Based on this workout and user feedback, suggest modifications:\n\n\
         Workout: {}\n\
         Duration: {} minutes\n\
         Type: {}\n\
         Exercises: {} exercises\n\n\
         User Feedback: \"{}\"\n\n\
         Suggest specific modifications to:\n\
         1. Adjust intensity if needed\n\
         2. Modify exercises for better results\n\
         3. Change duration or frequency\n\
         4. Address any concerns mentioned in feedback\n\
         {}",
        workout.name,
        workout.duration_minutes(),
        workout.workout_type,
        workout.exercises.len(),
        feedback,
        json_shape(
            "a modifications array containing exercise_id, modification_type, description, and reason"
        )
    )
}

pub fn meal_plan(
    goals: &NutritionGoals,
    restrictions: &[DietaryRestriction],
    preferences: &[String],
) -> String {
    let targets = goals.macro_targets();
    format!(
        "Create a personalized meal plan with these requirements:\n\n\
         Nutrition Goals:\n\
         - Daily Calories: {}\n\
         - Protein: {:.0}g\n\
         - Carbs: {:.0}g\n\
         - Fat: {:.0}g\n\
         - Fiber: {:.0}g\n\n\
         Dietary Restrictions: {}\n\
         Preferences: {}\n\n\
         Provide a 7-day meal plan with breakfast, lunch, dinner, and snacks.\n\
         Include nutritional information and preparation instructions.\n\
         {}",
        goals.daily_calories,
        targets.protein_g,
        targets.carbs_g,
        targets.fat_g,
        targets.fiber_g,
        join_tags(restrictions),
        preferences.join(", "),
        json_shape(
            "name, description, total_calories, and a meals array containing day (1-7), \
             meal_type, name, calories, and description"
        )
    )
}

pub fn nutritional_analysis(days: &[DailyNutrition]) -> String {
    let lines = days
        .iter()
        .map(|d| {
            format!(
                "Date: {}, Calories: {:.0}, Protein: {:.1}g, Carbs: {:.1}g, Fat: {:.1}g",
                d.date, d.totals.calories, d.totals.protein_g, d.totals.carbs_g, d.totals.fat_g
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze the following nutritional data and identify deficiencies:\n\n\
         {}\n\n\
         Identify:\n\
         1. Nutritional deficiencies or excesses\n\
         2. Patterns in eating habits\n\
         3. Recommendations for improvement\n\
         4. Specific nutrients to focus on\n\
         {}",
        lines,
        json_shape(
            "a deficiencies array containing nutrient, current_intake, recommended_intake, \
             severity (MILD, MODERATE or SEVERE), symptoms, and food_sources"
        )
    )
}

pub fn meal_improvements(meal: &[FoodEntryDetail]) -> String {
    let lines = meal
        .iter()
        .map(|item| {
            format!(
                "{}: {}g ({:.0} calories)",
                item.food.name,
                item.entry.quantity_g,
                item.nutrition().calories
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze this meal and suggest improvements:\n\n\
         {}\n\n\
         Suggest improvements for:\n\
         1. Nutritional balance\n\
         2. Calorie optimization\n\
         3. Healthier alternatives\n\
         4. Portion adjustments\n\
         {}",
        lines,
        json_shape(
            "a suggestions array containing suggestion_type, description, foods_to_add, \
             foods_to_reduce, and expected_benefit"
        )
    )
}

pub fn food_portion(food_name: &str) -> String {
    format!(
        "Estimate the portion size in grams for {} in this image.\n\
         Format as JSON with a grams field.",
        food_name
    )
}

pub fn motivational_message(progress: &HealthProgress, goals: &[FitnessGoal]) -> String {
    format!(
        "Create a motivational message based on this progress:\n\n\
         Current Progress:\n\
         - Weight: {}kg (Goal: {}kg)\n\
         - Body Fat: {}%\n\
         - Muscle Mass: {}kg\n\
         - Goals achieved: {} of {}\n\n\
         Goals: {}\n\n\
         Create an encouraging, personalized message that:\n\
         1. Acknowledges current achievements\n\
         2. Motivates continued effort\n\
         3. Provides specific next steps\n\
         4. Maintains positive tone",
        or_unknown(progress.current_weight_kg),
        or_unknown(progress.target_weight_kg),
        or_unknown(progress.body_fat_percentage),
        or_unknown(progress.muscle_mass_kg),
        progress.goals_achieved,
        progress.total_goals,
        join_tags(goals)
    )
}

pub fn health_question(question: &str, context: &HealthContext) -> String {
    format!(
        "Answer this health question with context:\n\n\
         Question: \"{}\"\n\n\
         User Context:\n\
         - Age: {}\n\
         - Gender: {}\n\
         - Activity Level: {}\n\
         - Health Conditions: {}\n\
         - Current Medications: {}\n\n\
         Provide a helpful, accurate response while noting this is not medical advice.\n\
         Include relevant recommendations and suggest consulting healthcare providers when appropriate.",
        question,
        or_unknown(context.age),
        or_unknown(context.gender.as_deref()),
        or_unknown(context.activity_level.as_deref()),
        context.health_conditions.join(", "),
        context.medications.join(", ")
    )
}

pub fn health_report(time_range: TimeRange) -> String {
    format!(
        "Generate a comprehensive health report for the {}:\n\n\
         Include analysis of:\n\
         1. Key health metrics and trends\n\
         2. Activity and exercise patterns\n\
         3. Nutrition and dietary habits\n\
         4. Sleep quality and patterns\n\
         5. Overall progress toward goals\n\
         6. Areas of improvement\n\
         7. Specific recommendations\n\n\
         Provide actionable insights and maintain an encouraging tone.\n\
         {}",
        time_range.label(),
        json_shape(
            "summary, key_findings, recommendations, and progress_metrics (an object of numbers)"
        )
    )
}

pub fn chat(message: &str, history: &[ChatMessage]) -> String {
    let context = if history.is_empty() {
        String::new()
    } else {
        let recent = &history[history.len().saturating_sub(CHAT_HISTORY_LIMIT)..];
        let lines = recent
            .iter()
            .map(|m| {
                let speaker = if m.is_from_user { "User" } else { "Assistant" };
                format!("{}: {}", speaker, m.content)
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!("Previous conversation:\n{}\n\n", lines)
    };

    format!(
        "{}Current message: \"{}\"\n\n\
         Respond as a helpful AI health assistant. Provide accurate, supportive guidance while noting that this is not medical advice.\n\
         Be conversational, empathetic, and focus on actionable health and wellness advice.",
        context, message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pixelpulse_shared::models::{HealthDataType, WorkoutType};

    fn message(content: &str, is_from_user: bool) -> ChatMessage {
        ChatMessage {
            id: content.to_string(),
            user_id: "u1".into(),
            content: content.to_string(),
            is_from_user,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_insight_prompt_lists_readings() {
        let reading = HealthData::new("u1", HealthDataType::HeartRate, 72.0)
            .at(Utc.with_ymd_and_hms(2024, 1, 2, 7, 30, 0).unwrap());
        let prompt = health_insights(&[reading], TimeRange::Last7Days);

        assert!(prompt.starts_with(
            "Analyze the following health data from the last 7 days and provide actionable insights:"
        ));
        assert!(prompt.contains("HEART_RATE: 72 BPM at 2024-01-02T07:30:00+00:00"));
        assert!(prompt.contains("4. Specific actionable recommendations"));
        assert!(prompt.ends_with(
            "Format as JSON with insights array containing title, description, category, priority, and recommendations."
        ));
    }

    #[test]
    fn test_recommendation_prompt_profile_block() {
        let mut user = User::new("u1", "a@b.co", "Ada");
        user.date_of_birth = NaiveDate::from_ymd_opt(1994, 1, 1);
        user.fitness_goals = vec![FitnessGoal::WeightLoss, FitnessGoal::Flexibility];
        let prompt = personalized_recommendations(
            &user,
            &[HealthData::new("u1", HealthDataType::Steps, 8000.0)],
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );

        assert!(prompt.contains("- Age: 30\n"));
        assert!(prompt.contains("- Gender: unknown\n"));
        assert!(prompt.contains("- Fitness Goals: WEIGHT_LOSS, FLEXIBILITY\n"));
        assert!(prompt.contains("Recent Activity:\nSTEPS: 8000 steps"));
    }

    #[test]
    fn test_workout_plan_prompt() {
        let prompt = workout_plan(
            &[FitnessGoal::StrengthTraining],
            WorkoutDifficulty::Beginner,
            &[Equipment::Dumbbells, Equipment::Bench],
            40,
        );
        assert!(prompt.contains("- Current Level: BEGINNER\n"));
        assert!(prompt.contains("- Available Equipment: DUMBBELLS, BENCH\n"));
        assert!(prompt.contains("- Time per session: 40 minutes"));
    }

    #[test]
    fn test_workout_analysis_lines() {
        let workout = Workout {
            id: "w1".into(),
            user_id: "u1".into(),
            name: "Tempo run".into(),
            workout_type: WorkoutType::Running,
            duration_ms: 35 * 60_000,
            calories_burned: 410,
            started_at: None,
            exercises: vec![],
        };
        let prompt = workout_analysis(&[workout.clone()]);
        assert!(prompt.contains("Workout: Tempo run, Duration: 35min, Type: RUNNING, Calories: 410"));

        let prompt = workout_modifications(&workout, "Too easy");
        assert!(prompt.contains("User Feedback: \"Too easy\""));
        assert!(prompt.contains("Exercises: 0 exercises"));
    }

    #[test]
    fn test_meal_plan_uses_gram_targets() {
        let prompt = meal_plan(
            &NutritionGoals::default_for("u1"),
            &[DietaryRestriction::Vegetarian],
            &["spicy".to_string()],
        );
        assert!(prompt.contains("- Daily Calories: 2000\n"));
        assert!(prompt.contains("- Protein: 100g\n"));
        assert!(prompt.contains("- Carbs: 250g\n"));
        assert!(prompt.contains("Dietary Restrictions: VEGETARIAN\n"));
        assert!(prompt.contains("Preferences: spicy"));
    }

    #[test]
    fn test_chat_prompt_keeps_last_five_messages() {
        let history: Vec<ChatMessage> = (1..=7)
            .map(|i| message(&format!("m{i}"), i % 2 == 1))
            .collect();
        let prompt = chat("How did I sleep?", &history);

        assert!(prompt.starts_with("Previous conversation:\nUser: m3\nAssistant: m4\n"));
        assert!(!prompt.contains("m2"));
        assert!(prompt.contains("User: m7\n\nCurrent message: \"How did I sleep?\""));
    }

    #[test]
    fn test_chat_prompt_without_history() {
        let prompt = chat("Hi", &[]);
        assert!(prompt.starts_with("Current message: \"Hi\""));
    }

    #[test]
    fn test_question_prompt_context() {
        let context = HealthContext {
            age: Some(41),
            gender: Some("MALE".into()),
            activity_level: None,
            health_conditions: vec!["hypertension".into()],
            medications: vec!["lisinopril".into(), "aspirin".into()],
        };
        let prompt = health_question("Is coffee ok?", &context);
        assert!(prompt.contains("Question: \"Is coffee ok?\""));
        assert!(prompt.contains("- Activity Level: unknown\n"));
        assert!(prompt.contains("- Current Medications: lisinopril, aspirin\n"));
    }

    #[test]
    fn test_report_and_portion_prompts() {
        assert!(health_report(TimeRange::Last30Days)
            .starts_with("Generate a comprehensive health report for the last 30 days:"));
        assert!(food_portion("Banana")
            .starts_with("Estimate the portion size in grams for Banana in this image."));
    }
}
