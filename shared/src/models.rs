//! Data models for the PixelPulse application

use crate::tags::tagged_enum;
use crate::units::Units;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Generate a fresh caller-side identifier
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

// ============================================================================
// Enumerations
// ============================================================================

tagged_enum! {
    /// Data-type tag for rows of the wide health data table
    pub enum HealthDataType ("health data type") {
        HeartRate => "HEART_RATE",
        BloodPressureSystolic => "BLOOD_PRESSURE_SYSTOLIC",
        BloodPressureDiastolic => "BLOOD_PRESSURE_DIASTOLIC",
        BloodOxygen => "BLOOD_OXYGEN",
        BodyTemperature => "BODY_TEMPERATURE",
        Weight => "WEIGHT",
        BodyFatPercentage => "BODY_FAT_PERCENTAGE",
        MuscleMass => "MUSCLE_MASS",
        BoneDensity => "BONE_DENSITY",
        Steps => "STEPS",
        Distance => "DISTANCE",
        CaloriesBurned => "CALORIES_BURNED",
        ActiveMinutes => "ACTIVE_MINUTES",
        SleepDuration => "SLEEP_DURATION",
        SleepQuality => "SLEEP_QUALITY",
        StressLevel => "STRESS_LEVEL",
        Hydration => "HYDRATION",
        BloodGlucose => "BLOOD_GLUCOSE",
    }
}

impl HealthDataType {
    /// Unit recorded when the caller does not supply one
    pub fn default_unit(&self) -> &'static str {
        match self {
            HealthDataType::HeartRate => "BPM",
            HealthDataType::BloodPressureSystolic | HealthDataType::BloodPressureDiastolic => "mmHg",
            HealthDataType::BloodOxygen | HealthDataType::BodyFatPercentage => "%",
            HealthDataType::BodyTemperature => "°C",
            HealthDataType::Weight | HealthDataType::MuscleMass => "kg",
            HealthDataType::BoneDensity => "g/cm²",
            HealthDataType::Steps => "steps",
            HealthDataType::Distance => "m",
            HealthDataType::CaloriesBurned => "kcal",
            HealthDataType::ActiveMinutes | HealthDataType::SleepDuration => "minutes",
            HealthDataType::SleepQuality => "score",
            HealthDataType::StressLevel => "level",
            HealthDataType::Hydration => "ml",
            HealthDataType::BloodGlucose => "mg/dL",
        }
    }
}

tagged_enum! {
    /// Where a health reading came from
    #[derive(Default)]
    pub enum DataSource ("data source") {
        #[default]
        ManualEntry => "MANUAL_ENTRY",
        PixelSensors => "PIXEL_SENSORS",
        GoogleFit => "GOOGLE_FIT",
        HealthConnect => "HEALTH_CONNECT",
        WearableDevice => "WEARABLE_DEVICE",
        MedicalDevice => "MEDICAL_DEVICE",
        ThirdPartyApp => "THIRD_PARTY_APP",
    }
}

tagged_enum! {
    pub enum Gender ("gender") {
        Male => "MALE",
        Female => "FEMALE",
        Other => "OTHER",
        PreferNotToSay => "PREFER_NOT_TO_SAY",
    }
}

tagged_enum! {
    /// Self-reported activity level
    #[derive(Default)]
    pub enum ActivityLevel ("activity level") {
        Sedentary => "SEDENTARY",
        #[default]
        LightlyActive => "LIGHTLY_ACTIVE",
        ModeratelyActive => "MODERATELY_ACTIVE",
        VeryActive => "VERY_ACTIVE",
        ExtremelyActive => "EXTREMELY_ACTIVE",
    }
}

tagged_enum! {
    pub enum FitnessGoal ("fitness goal") {
        WeightLoss => "WEIGHT_LOSS",
        WeightGain => "WEIGHT_GAIN",
        MuscleBuilding => "MUSCLE_BUILDING",
        CardiovascularFitness => "CARDIOVASCULAR_FITNESS",
        StrengthTraining => "STRENGTH_TRAINING",
        Flexibility => "FLEXIBILITY",
        GeneralWellness => "GENERAL_WELLNESS",
        StressReduction => "STRESS_REDUCTION",
        BetterSleep => "BETTER_SLEEP",
        InjuryRecovery => "INJURY_RECOVERY",
    }
}

tagged_enum! {
    #[derive(Default)]
    pub enum ThemePreference ("theme") {
        Light => "LIGHT",
        Dark => "DARK",
        #[default]
        System => "SYSTEM",
    }
}

tagged_enum! {
    pub enum WorkoutType ("workout type") {
        StrengthTraining => "STRENGTH_TRAINING",
        Cardio => "CARDIO",
        Yoga => "YOGA",
        Pilates => "PILATES",
        Running => "RUNNING",
        Cycling => "CYCLING",
        Swimming => "SWIMMING",
        Walking => "WALKING",
        Hiking => "HIKING",
        Dancing => "DANCING",
        MartialArts => "MARTIAL_ARTS",
        Sports => "SPORTS",
        Stretching => "STRETCHING",
        Crossfit => "CROSSFIT",
        Hiit => "HIIT",
        CircuitTraining => "CIRCUIT_TRAINING",
        Bodyweight => "BODYWEIGHT",
        Flexibility => "FLEXIBILITY",
        Balance => "BALANCE",
        Other => "OTHER",
    }
}

tagged_enum! {
    pub enum WorkoutDifficulty ("workout difficulty") {
        Beginner => "BEGINNER",
        Intermediate => "INTERMEDIATE",
        Advanced => "ADVANCED",
        Expert => "EXPERT",
    }
}

tagged_enum! {
    pub enum Equipment ("equipment") {
        None => "NONE",
        Dumbbells => "DUMBBELLS",
        Barbell => "BARBELL",
        Kettlebell => "KETTLEBELL",
        ResistanceBands => "RESISTANCE_BANDS",
        PullUpBar => "PULL_UP_BAR",
        Bench => "BENCH",
        Treadmill => "TREADMILL",
        StationaryBike => "STATIONARY_BIKE",
        RowingMachine => "ROWING_MACHINE",
        Elliptical => "ELLIPTICAL",
        YogaMat => "YOGA_MAT",
        FoamRoller => "FOAM_ROLLER",
        MedicineBall => "MEDICINE_BALL",
        StabilityBall => "STABILITY_BALL",
        CableMachine => "CABLE_MACHINE",
        SmithMachine => "SMITH_MACHINE",
        LegPress => "LEG_PRESS",
        Other => "OTHER",
    }
}

tagged_enum! {
    #[derive(Default)]
    pub enum FoodCategory ("food category") {
        Fruits => "FRUITS",
        Vegetables => "VEGETABLES",
        Grains => "GRAINS",
        Protein => "PROTEIN",
        Dairy => "DAIRY",
        NutsSeeds => "NUTS_SEEDS",
        OilsFats => "OILS_FATS",
        Beverages => "BEVERAGES",
        Snacks => "SNACKS",
        Desserts => "DESSERTS",
        Condiments => "CONDIMENTS",
        HerbsSpices => "HERBS_SPICES",
        ProcessedFoods => "PROCESSED_FOODS",
        FastFood => "FAST_FOOD",
        Supplements => "SUPPLEMENTS",
        #[default]
        Other => "OTHER",
    }
}

tagged_enum! {
    pub enum MealType ("meal type") {
        Breakfast => "BREAKFAST",
        Lunch => "LUNCH",
        Dinner => "DINNER",
        Snack => "SNACK",
        PreWorkout => "PRE_WORKOUT",
        PostWorkout => "POST_WORKOUT",
        Other => "OTHER",
    }
}

tagged_enum! {
    pub enum DietaryRestriction ("dietary restriction") {
        Vegetarian => "VEGETARIAN",
        Vegan => "VEGAN",
        GlutenFree => "GLUTEN_FREE",
        DairyFree => "DAIRY_FREE",
        NutFree => "NUT_FREE",
        LowCarb => "LOW_CARB",
        Keto => "KETO",
        Paleo => "PALEO",
        Mediterranean => "MEDITERRANEAN",
        Dash => "DASH",
        LowSodium => "LOW_SODIUM",
        LowFat => "LOW_FAT",
        HighProtein => "HIGH_PROTEIN",
        Diabetic => "DIABETIC",
        HeartHealthy => "HEART_HEALTHY",
        Kosher => "KOSHER",
        Halal => "HALAL",
        RawFood => "RAW_FOOD",
        Whole30 => "WHOLE30",
    }
}

/// Join tags for prompt text and display, e.g. `WEIGHT_LOSS, FLEXIBILITY`
pub fn join_tags<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// User
// ============================================================================

/// Notification toggles, all enabled by default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPreferences {
    pub workout_reminders: bool,
    pub meal_reminders: bool,
    pub health_insights: bool,
    pub goal_achievements: bool,
    pub weekly_reports: bool,
    pub medication_reminders: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            workout_reminders: true,
            meal_reminders: true,
            health_insights: true,
            goal_achievements: true,
            weekly_reports: true,
            medication_reminders: true,
        }
    }
}

/// Data-sharing toggles, all enabled by default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivacyPreferences {
    pub share_with_healthcare_providers: bool,
    pub anonymous_analytics: bool,
    pub data_backup: bool,
    pub third_party_integrations: bool,
}

impl Default for PrivacyPreferences {
    fn default() -> Self {
        Self {
            share_with_healthcare_providers: true,
            anonymous_analytics: true,
            data_backup: true,
            third_party_integrations: true,
        }
    }
}

/// User profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub fitness_goals: Vec<FitnessGoal>,
    #[serde(default)]
    pub health_conditions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relationship: Option<String>,
    #[serde(default)]
    pub units: Units,
    #[serde(default)]
    pub notification_preferences: NotificationPreferences,
    #[serde(default)]
    pub privacy_preferences: PrivacyPreferences,
    #[serde(default)]
    pub theme: ThemePreference,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Minimal profile with defaults for every optional field
    pub fn new(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            date_of_birth: None,
            gender: None,
            height_cm: None,
            weight_kg: None,
            activity_level: ActivityLevel::default(),
            fitness_goals: Vec::new(),
            health_conditions: Vec::new(),
            medications: Vec::new(),
            emergency_contact_name: None,
            emergency_contact_phone: None,
            emergency_contact_relationship: None,
            units: Units::default(),
            notification_preferences: NotificationPreferences::default(),
            privacy_preferences: PrivacyPreferences::default(),
            theme: ThemePreference::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Age in whole years on `today`, if a date of birth is known
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.date_of_birth.and_then(|dob| today.years_since(dob))
    }
}

// ============================================================================
// Health data
// ============================================================================

/// One row of the wide health data table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthData {
    pub id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub data_type: HealthDataType,
    pub value: f64,
    pub unit: String,
    #[serde(default)]
    pub source: DataSource,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    pub notes: Option<String>,
}

fn default_confidence() -> f64 {
    1.0
}

impl HealthData {
    /// Manual reading with a fresh id, the type's default unit and full confidence
    pub fn new(user_id: impl Into<String>, data_type: HealthDataType, value: f64) -> Self {
        Self {
            id: generate_id(),
            user_id: user_id.into(),
            timestamp: Utc::now(),
            data_type,
            value,
            unit: data_type.default_unit().to_string(),
            source: DataSource::default(),
            confidence: default_confidence(),
            notes: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

// ============================================================================
// Workouts
// ============================================================================

/// A logged workout. `exercises` is only populated by the single-workout lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub workout_type: WorkoutType,
    pub duration_ms: i64,
    pub calories_burned: i32,
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl Workout {
    pub fn duration_minutes(&self) -> i64 {
        self.duration_ms / 60_000
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub workout_id: String,
    pub name: String,
    pub exercise_type: String,
    pub sets: i32,
    pub reps: i32,
}

// ============================================================================
// Nutrition
// ============================================================================

/// Nutrient values per 100 g, or totals when summed
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionInfo {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub sugar_g: f64,
    pub sodium_mg: f64,
}

impl NutritionInfo {
    /// Values for `grams` of a food whose per-100 g values are `self`
    pub fn scaled_to(&self, grams: f64) -> Self {
        let factor = grams / 100.0;
        Self {
            calories: self.calories * factor,
            protein_g: self.protein_g * factor,
            carbs_g: self.carbs_g * factor,
            fat_g: self.fat_g * factor,
            fiber_g: self.fiber_g * factor,
            sugar_g: self.sugar_g * factor,
            sodium_mg: self.sodium_mg * factor,
        }
    }
}

impl std::ops::Add for NutritionInfo {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            calories: self.calories + rhs.calories,
            protein_g: self.protein_g + rhs.protein_g,
            carbs_g: self.carbs_g + rhs.carbs_g,
            fat_g: self.fat_g + rhs.fat_g,
            fiber_g: self.fiber_g + rhs.fiber_g,
            sugar_g: self.sugar_g + rhs.sugar_g,
            sodium_mg: self.sodium_mg + rhs.sodium_mg,
        }
    }
}

/// Nutrition database record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: String,
    pub name: String,
    pub brand: Option<String>,
    pub barcode: Option<String>,
    #[serde(default)]
    pub category: FoodCategory,
    pub nutrition_per_100g: NutritionInfo,
    #[serde(default)]
    pub is_verified: bool,
    pub image_url: Option<String>,
}

impl Food {
    pub const UNKNOWN_NAME: &'static str = "Unknown Food";

    /// Stand-in for a food id that no longer resolves
    pub fn unknown(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Self::UNKNOWN_NAME.to_string(),
            brand: None,
            barcode: None,
            category: FoodCategory::Other,
            nutrition_per_100g: NutritionInfo::default(),
            is_verified: false,
            image_url: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.name == Self::UNKNOWN_NAME && self.nutrition_per_100g == NutritionInfo::default()
    }
}

/// Consumption log record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: String,
    pub user_id: String,
    pub food_id: String,
    pub quantity_g: f64,
    pub meal_type: MealType,
    pub timestamp: DateTime<Utc>,
    pub notes: Option<String>,
}

/// A food entry with its food resolved (or the placeholder)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntryDetail {
    #[serde(flatten)]
    pub entry: FoodEntry,
    pub food: Food,
}

impl FoodEntryDetail {
    pub fn nutrition(&self) -> NutritionInfo {
        self.food.nutrition_per_100g.scaled_to(self.entry.quantity_g)
    }
}

/// Per-user daily targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionGoals {
    pub id: String,
    pub user_id: String,
    pub daily_calories: i32,
    pub protein_percentage: f64,
    pub carbs_percentage: f64,
    pub fat_percentage: f64,
    pub fiber_g: f64,
    pub sodium_mg: f64,
    pub water_ml: f64,
}

impl NutritionGoals {
    /// Defaults used when a user has stored no goals
    pub fn default_for(user_id: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            user_id: user_id.into(),
            daily_calories: 2000,
            protein_percentage: 20.0,
            carbs_percentage: 50.0,
            fat_percentage: 30.0,
            fiber_g: 25.0,
            sodium_mg: 2300.0,
            water_ml: 2000.0,
        }
    }

    /// Gram targets implied by the calorie goal and macro split
    pub fn macro_targets(&self) -> MacroTargets {
        let calories = f64::from(self.daily_calories);
        MacroTargets {
            protein_g: calories * self.protein_percentage / 100.0 / 4.0,
            carbs_g: calories * self.carbs_percentage / 100.0 / 4.0,
            fat_g: calories * self.fat_percentage / 100.0 / 9.0,
            fiber_g: self.fiber_g,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
}

/// A day's intake compared with the user's goals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyNutrition {
    pub user_id: String,
    pub date: NaiveDate,
    pub totals: NutritionInfo,
    pub meals: BTreeMap<MealType, Vec<FoodEntryDetail>>,
    pub water_intake_ml: f64,
    pub goals: NutritionGoals,
}

impl DailyNutrition {
    pub fn entry_count(&self) -> usize {
        self.meals.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip_for_every_data_type() {
        for data_type in HealthDataType::ALL {
            let parsed: HealthDataType = data_type.as_str().parse().unwrap();
            assert_eq!(parsed, *data_type);
        }
        assert_eq!(HealthDataType::ALL.len(), 18);
    }

    #[test]
    fn test_tag_parsing_is_case_insensitive() {
        assert_eq!("breakfast".parse::<MealType>().unwrap(), MealType::Breakfast);
        assert_eq!(" pre_workout ".parse::<MealType>().unwrap(), MealType::PreWorkout);
        assert!("brunch".parse::<MealType>().is_err());
    }

    #[test]
    fn test_serde_uses_stored_tag() {
        let json = serde_json::to_string(&WorkoutType::Hiit).unwrap();
        assert_eq!(json, "\"HIIT\"");
        let parsed: DietaryRestriction = serde_json::from_str("\"WHOLE30\"").unwrap();
        assert_eq!(parsed, DietaryRestriction::Whole30);
    }

    #[test]
    fn test_default_preferences_are_enabled() {
        let notifications = NotificationPreferences::default();
        assert!(notifications.workout_reminders && notifications.medication_reminders);
        let privacy: PrivacyPreferences = serde_json::from_str("{}").unwrap();
        assert_eq!(privacy, PrivacyPreferences::default());
    }

    #[test]
    fn test_user_age() {
        let mut user = User::new("u1", "a@b.co", "Ada");
        assert_eq!(user.age_on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()), None);
        user.date_of_birth = NaiveDate::from_ymd_opt(1990, 6, 15);
        assert_eq!(user.age_on(NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()), Some(33));
        assert_eq!(user.age_on(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()), Some(34));
    }

    #[test]
    fn test_health_data_defaults() {
        let reading = HealthData::new("u1", HealthDataType::HeartRate, 64.0);
        assert_eq!(reading.unit, "BPM");
        assert_eq!(reading.source, DataSource::ManualEntry);
        assert_eq!(reading.confidence, 1.0);
        assert!(!reading.id.is_empty());
    }

    #[test]
    fn test_nutrition_scaling() {
        let per_100g = NutritionInfo {
            calories: 52.0,
            carbs_g: 14.0,
            ..Default::default()
        };
        let portion = per_100g.scaled_to(150.0);
        assert!((portion.calories - 78.0).abs() < 1e-9);
        assert!((portion.carbs_g - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_food_placeholder() {
        let food = Food::unknown("missing");
        assert_eq!(food.name, "Unknown Food");
        assert_eq!(food.category, FoodCategory::Other);
        assert!(food.is_placeholder());
    }

    #[test]
    fn test_default_goal_macro_targets() {
        let goals = NutritionGoals::default_for("u1");
        let targets = goals.macro_targets();
        assert!((targets.protein_g - 100.0).abs() < 1e-9);
        assert!((targets.carbs_g - 250.0).abs() < 1e-9);
        assert!((targets.fat_g - 2000.0 * 0.3 / 9.0).abs() < 1e-9);
        assert_eq!(targets.fiber_g, 25.0);
    }

    #[test]
    fn test_workout_duration_minutes() {
        let workout = Workout {
            id: "w1".into(),
            user_id: "u1".into(),
            name: "Run".into(),
            workout_type: WorkoutType::Running,
            duration_ms: 45 * 60_000 + 30_000,
            calories_burned: 400,
            started_at: None,
            exercises: vec![],
        };
        assert_eq!(workout.duration_minutes(), 45);
    }
}
