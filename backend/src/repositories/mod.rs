//! Database repositories
//!
//! Provides data access layer for database operations. Each call issues one
//! statement, or one transaction for multi-row writes, against the SQLite pool.

pub mod health_data;
pub mod nutrition;
pub mod user;
pub mod workout;

pub use health_data::HealthDataRepository;
pub use nutrition::{FoodEntryRepository, FoodRepository, NutritionGoalsRepository};
pub use user::UserRepository;
pub use workout::WorkoutRepository;

use anyhow::{Context, Result};
use pixelpulse_shared::ParseEnumError;
use serde::{de::DeserializeOwned, Serialize};
use std::str::FromStr;

/// Parse a stored enum tag
pub(crate) fn parse_tag<T>(column: &str, value: &str) -> Result<T>
where
    T: FromStr<Err = ParseEnumError>,
{
    value
        .parse::<T>()
        .with_context(|| format!("Invalid value in column {}", column))
}

/// Decode a JSON text column
pub(crate) fn from_json<T: DeserializeOwned>(column: &str, value: &str) -> Result<T> {
    serde_json::from_str(value).with_context(|| format!("Malformed JSON in column {}", column))
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Count a repository write for the Prometheus exporter
pub(crate) fn record_write(table: &'static str, rows: u64) {
    metrics::counter!("pixelpulse_db_writes_total", "table" => table).increment(rows);
}
