//! PixelPulse Shared Library
//!
//! Domain models, AI result types, typed readings, derived health metrics
//! and validation shared by the backend and any client of its JSON API.

mod tags;

pub mod ai;
pub mod errors;
pub mod health_metrics;
pub mod models;
pub mod readings;
pub mod types;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use errors::ParseEnumError;
pub use health_metrics::*;
pub use types::*;
pub use units::Units;

pub use models::{
    generate_id, DailyNutrition, DataSource, Exercise, Food, FoodEntry, FoodEntryDetail, HealthData,
    HealthDataType, NutritionGoals, NutritionInfo, User, Workout,
};
pub use validation::ValidationError;
