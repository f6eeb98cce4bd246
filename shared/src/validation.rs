//! Input validation functions
//!
//! Field validators return `Result<(), String>` with a user-facing message;
//! the record validators wrap them into a `ValidationError` naming the field.

use crate::models::{Food, FoodEntry, HealthData, HealthDataType, NutritionGoals, User, Workout};
use chrono::{NaiveDate, Utc};
use regex_lite::Regex;
use std::sync::OnceLock;
use validator::ValidateEmail;

/// Tolerance for macro percentages that should add up to 100
pub const MACRO_SUM_TOLERANCE: f64 = 0.5;

fn finite(value: f64, what: &str) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err(format!("{what} must be a valid number"));
    }
    Ok(())
}

fn phone_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^\+?[0-9][0-9 ()\-]{5,19}$").ok())
        .as_ref()
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    if !email.validate_email() {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty".to_string());
    }
    if name.chars().count() > 100 {
        return Err("Name too long".to_string());
    }
    Ok(())
}

/// Validate a phone number: digits with optional leading `+`, spaces, dashes, parentheses
pub fn validate_phone(phone: &str) -> Result<(), String> {
    match phone_pattern() {
        Some(pattern) if pattern.is_match(phone.trim()) => Ok(()),
        _ => Err("Invalid phone number".to_string()),
    }
}

/// Validate weight value (in kg)
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    finite(weight_kg, "Weight")?;
    if weight_kg < 20.0 {
        return Err("Weight must be at least 20 kg".to_string());
    }
    if weight_kg > 500.0 {
        return Err("Weight must be at most 500 kg".to_string());
    }
    Ok(())
}

/// Validate height value (in cm)
pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    finite(height_cm, "Height")?;
    if height_cm < 50.0 {
        return Err("Height must be at least 50 cm".to_string());
    }
    if height_cm > 300.0 {
        return Err("Height must be at most 300 cm".to_string());
    }
    Ok(())
}

/// Validate date of birth: not in the future, not more than 150 years ago
pub fn validate_date_of_birth(dob: NaiveDate) -> Result<(), String> {
    let today = Utc::now().date_naive();
    if dob > today {
        return Err("Date of birth cannot be in the future".to_string());
    }
    match today.years_since(dob) {
        Some(age) if age <= 150 => Ok(()),
        _ => Err("Date of birth is too far in the past".to_string()),
    }
}

/// Validate a confidence score (0-1)
pub fn validate_confidence(confidence: f64) -> Result<(), String> {
    finite(confidence, "Confidence")?;
    if !(0.0..=1.0).contains(&confidence) {
        return Err("Confidence must be between 0 and 1".to_string());
    }
    Ok(())
}

/// Validate percentage value (0-100)
pub fn validate_percentage(value: f64) -> Result<(), String> {
    finite(value, "Percentage")?;
    if !(0.0..=100.0).contains(&value) {
        return Err("Percentage must be between 0 and 100".to_string());
    }
    Ok(())
}

/// Validate calorie value
pub fn validate_calories(calories: f64) -> Result<(), String> {
    finite(calories, "Calories")?;
    if calories < 0.0 {
        return Err("Calories cannot be negative".to_string());
    }
    if calories > 50000.0 {
        return Err("Calorie value unreasonably high".to_string());
    }
    Ok(())
}

/// Validate a consumed quantity in grams
pub fn validate_quantity_g(grams: f64) -> Result<(), String> {
    finite(grams, "Quantity")?;
    if grams <= 0.0 {
        return Err("Quantity must be positive".to_string());
    }
    if grams > 10_000.0 {
        return Err("Quantity unreasonably high".to_string());
    }
    Ok(())
}

/// Validate that protein, carbs and fat percentages form a full split
pub fn validate_macro_split(protein: f64, carbs: f64, fat: f64) -> Result<(), String> {
    for pct in [protein, carbs, fat] {
        validate_percentage(pct)?;
    }
    let total = protein + carbs + fat;
    if (total - 100.0).abs() > MACRO_SUM_TOLERANCE {
        return Err(format!("Macro percentages must add up to 100 (got {total:.1})"));
    }
    Ok(())
}

/// Plausible range for a reading of the given type
pub fn health_value_range(data_type: HealthDataType) -> (f64, f64) {
    match data_type {
        HealthDataType::HeartRate => (20.0, 300.0),
        HealthDataType::BloodPressureSystolic => (50.0, 300.0),
        HealthDataType::BloodPressureDiastolic => (30.0, 200.0),
        HealthDataType::BloodOxygen
        | HealthDataType::BodyFatPercentage
        | HealthDataType::SleepQuality => (0.0, 100.0),
        HealthDataType::BodyTemperature => (25.0, 45.0),
        HealthDataType::Weight | HealthDataType::MuscleMass => (0.0, 500.0),
        HealthDataType::BoneDensity => (0.0, 5.0),
        HealthDataType::Steps => (0.0, 200_000.0),
        HealthDataType::Distance => (0.0, 1_000_000.0),
        HealthDataType::CaloriesBurned => (0.0, 50_000.0),
        HealthDataType::ActiveMinutes | HealthDataType::SleepDuration => (0.0, 1440.0),
        HealthDataType::StressLevel => (0.0, 100.0),
        HealthDataType::Hydration => (0.0, 20_000.0),
        HealthDataType::BloodGlucose => (10.0, 1000.0),
    }
}

/// Validate a reading. The plausible range is in the type's default unit, so
/// it only applies to readings recorded in that unit.
pub fn validate_health_value(data_type: HealthDataType, value: f64, unit: &str) -> Result<(), String> {
    finite(value, "Value")?;
    if !unit.trim().eq_ignore_ascii_case(data_type.default_unit()) {
        return Ok(());
    }
    let (min, max) = health_value_range(data_type);
    if value < min || value > max {
        return Err(format!(
            "{} value must be between {} and {}",
            data_type, min, max
        ));
    }
    Ok(())
}

/// Get user-friendly display label for a field name
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "email" => "Email",
        "name" => "Name",
        "height_cm" => "Height",
        "weight_kg" => "Weight",
        "date_of_birth" => "Date of Birth",
        "emergency_contact_phone" => "Emergency Contact Phone",
        "value" => "Value",
        "confidence" => "Confidence",
        "quantity_g" => "Quantity",
        "daily_calories" => "Daily Calories",
        "macro_split" => "Macro Split",
        "duration_ms" => "Duration",
        "calories_burned" => "Calories Burned",
        "nutrition_per_100g" => "Nutrition",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", get_field_display_label(&self.field), self.message)
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl std::error::Error for ValidationError {}

fn check(field: &str, result: Result<(), String>) -> Result<(), ValidationError> {
    result.map_err(|message| ValidationError::new(field, &message))
}

// ===== Record validators =====

pub fn validate_user(user: &User) -> Result<(), ValidationError> {
    check("email", validate_email(&user.email))?;
    check("name", validate_name(&user.name))?;
    if let Some(height) = user.height_cm {
        check("height_cm", validate_height_cm(height))?;
    }
    if let Some(weight) = user.weight_kg {
        check("weight_kg", validate_weight(weight))?;
    }
    if let Some(dob) = user.date_of_birth {
        check("date_of_birth", validate_date_of_birth(dob))?;
    }
    if let Some(phone) = user.emergency_contact_phone.as_deref() {
        check("emergency_contact_phone", validate_phone(phone))?;
    }
    Ok(())
}

pub fn validate_health_data(data: &HealthData) -> Result<(), ValidationError> {
    if data.user_id.trim().is_empty() {
        return Err(ValidationError::new("user_id", "User id is required"));
    }
    check("value", validate_health_value(data.data_type, data.value, &data.unit))?;
    check("confidence", validate_confidence(data.confidence))?;
    Ok(())
}

pub fn validate_workout(workout: &Workout) -> Result<(), ValidationError> {
    check("name", validate_name(&workout.name))?;
    if workout.duration_ms < 0 {
        return Err(ValidationError::new("duration_ms", "Duration cannot be negative"));
    }
    check("calories_burned", validate_calories(f64::from(workout.calories_burned)))?;
    Ok(())
}

pub fn validate_food(food: &Food) -> Result<(), ValidationError> {
    check("name", validate_name(&food.name))?;
    let n = &food.nutrition_per_100g;
    check("nutrition_per_100g", validate_calories(n.calories))?;
    for value in [n.protein_g, n.carbs_g, n.fat_g, n.fiber_g, n.sugar_g, n.sodium_mg] {
        finite(value, "Nutrient")
            .and_then(|_| {
                if value < 0.0 {
                    Err("Nutrient values cannot be negative".to_string())
                } else {
                    Ok(())
                }
            })
            .map_err(|m| ValidationError::new("nutrition_per_100g", &m))?;
    }
    Ok(())
}

pub fn validate_food_entry(entry: &FoodEntry) -> Result<(), ValidationError> {
    if entry.food_id.trim().is_empty() {
        return Err(ValidationError::new("food_id", "Food id is required"));
    }
    check("quantity_g", validate_quantity_g(entry.quantity_g))
}

pub fn validate_nutrition_goals(goals: &NutritionGoals) -> Result<(), ValidationError> {
    check("daily_calories", validate_calories(f64::from(goals.daily_calories)))?;
    check(
        "macro_split",
        validate_macro_split(
            goals.protein_percentage,
            goals.carbs_percentage,
            goals.fat_percentage,
        ),
    )?;
    for (field, value) in [
        ("fiber_g", goals.fiber_g),
        ("sodium_mg", goals.sodium_mg),
        ("water_ml", goals.water_ml),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::new(field, "Must be a non-negative number"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;
    use proptest::prelude::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name+tag@domain.co.uk").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn test_generated_profiles_validate() {
        for _ in 0..20 {
            let email: String = SafeEmail().fake();
            let name: String = Name().fake();
            let user = User::new("u1", email, name);
            assert!(validate_user(&user).is_ok(), "{:?}", user);
        }
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+1 (555) 123-4567").is_ok());
        assert!(validate_phone("0612345678").is_ok());
        assert!(validate_phone("call me").is_err());
        assert!(validate_phone("12").is_err());
    }

    #[test]
    fn test_validate_height_and_weight() {
        assert!(validate_height_cm(175.0).is_ok());
        assert!(validate_height_cm(49.9).is_err());
        assert!(validate_weight(70.0).is_ok());
        assert!(validate_weight(f64::NAN).is_err());
        assert!(validate_weight(501.0).is_err());
    }

    #[test]
    fn test_validate_date_of_birth() {
        let today = Utc::now().date_naive();
        assert!(validate_date_of_birth(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()).is_ok());
        assert!(validate_date_of_birth(today + chrono::Duration::days(1)).is_err());
        assert!(validate_date_of_birth(NaiveDate::from_ymd_opt(1800, 1, 1).unwrap()).is_err());
    }

    #[test]
    fn test_validate_macro_split() {
        assert!(validate_macro_split(20.0, 50.0, 30.0).is_ok());
        assert!(validate_macro_split(33.3, 33.3, 33.3).is_ok());
        assert!(validate_macro_split(40.0, 40.0, 40.0).is_err());
        assert!(validate_macro_split(-10.0, 80.0, 30.0).is_err());
    }

    #[test]
    fn test_validate_health_value() {
        assert!(validate_health_value(HealthDataType::HeartRate, 72.0, "BPM").is_ok());
        assert!(validate_health_value(HealthDataType::HeartRate, 5.0, "bpm").is_err());
        assert!(validate_health_value(HealthDataType::BloodOxygen, 101.0, "%").is_err());
        assert!(validate_health_value(HealthDataType::Steps, f64::INFINITY, "steps").is_err());
    }

    #[test]
    fn test_other_units_skip_range() {
        assert!(validate_health_value(HealthDataType::BodyTemperature, 98.6, "°F").is_ok());
        assert!(validate_health_value(HealthDataType::BodyTemperature, 98.6, "°C").is_err());
        assert!(validate_health_value(HealthDataType::Weight, 620.0, "lb").is_ok());
        assert!(validate_health_value(HealthDataType::Weight, f64::NAN, "lb").is_err());
    }

    #[test]
    fn test_user_validation_reports_field() {
        let mut user = User::new("u1", "ada@example.com", "Ada");
        user.height_cm = Some(20.0);
        let err = validate_user(&user).unwrap_err();
        assert_eq!(err.field, "height_cm");
        assert_eq!(err.user_message(), "Height: Height must be at least 50 cm");
    }

    #[test]
    fn test_default_goals_are_valid() {
        assert!(validate_nutrition_goals(&NutritionGoals::default_for("u1")).is_ok());
        let mut goals = NutritionGoals::default_for("u1");
        goals.fat_percentage = 45.0;
        assert_eq!(validate_nutrition_goals(&goals).unwrap_err().field, "macro_split");
    }

    #[test]
    fn test_placeholder_food_is_valid() {
        assert!(validate_food(&Food::unknown("f1")).is_ok());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_confidence_range(c in 0.0f64..=1.0) {
            prop_assert!(validate_confidence(c).is_ok());
        }

        #[test]
        fn prop_confidence_above_one_rejected(c in 1.0001f64..100.0) {
            prop_assert!(validate_confidence(c).is_err());
        }

        #[test]
        fn prop_valid_weight_range(weight in 20.0f64..=500.0) {
            prop_assert!(validate_weight(weight).is_ok());
        }

        #[test]
        fn prop_quantity_must_be_positive(grams in -1000.0f64..=0.0) {
            prop_assert!(validate_quantity_g(grams).is_err());
        }

        #[test]
        fn prop_complete_macro_split_accepted(protein in 0.0f64..=100.0, carbs_share in 0.0f64..=1.0) {
            let carbs = (100.0 - protein) * carbs_share;
            let fat = 100.0 - protein - carbs;
            prop_assert!(validate_macro_split(protein, carbs, fat).is_ok());
        }

        #[test]
        fn prop_values_inside_range_accepted(idx in 0usize..18, t in 0.0f64..=1.0) {
            let data_type = HealthDataType::ALL[idx];
            let (min, max) = health_value_range(data_type);
            prop_assert!(validate_health_value(data_type, min + (max - min) * t, data_type.default_unit()).is_ok());
        }
    }
}
