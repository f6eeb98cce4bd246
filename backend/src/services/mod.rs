//! Business logic services
//!
//! Services validate input, coordinate repositories and the AI assistant,
//! and translate failures into [`ApiError`](crate::error::ApiError).

pub mod assistant;
pub mod health_data;
pub mod nutrition;
pub mod user;
pub mod workout;

pub use assistant::AssistantService;
pub use health_data::HealthDataService;
pub use nutrition::NutritionService;
pub use user::UserService;
pub use workout::WorkoutService;
