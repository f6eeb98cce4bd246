//! Typed readings stored in the wide health data table
//!
//! Each reading kind maps to one `HealthData` row with a fixed data type,
//! unit and a `Key: value` note carrying its secondary field. Mapping back is
//! lenient: a missing or malformed note yields `None` (or the documented
//! default) rather than an error.

use crate::models::{DataSource, HealthData, HealthDataType};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const SYSTOLIC_SUFFIX: &str = "_systolic";
const STEPS_SUFFIX: &str = "_steps";

/// Diastolic value assumed when a stored reading carries none
pub const DEFAULT_DIASTOLIC: i32 = 80;

fn note(key: &str, value: impl std::fmt::Display) -> String {
    format!("{key}: {value}")
}

fn note_value<'a>(notes: Option<&'a str>, key: &str) -> Option<&'a str> {
    notes?
        .strip_prefix(key)?
        .strip_prefix(':')
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn row(
    id: String,
    user_id: &str,
    timestamp: DateTime<Utc>,
    data_type: HealthDataType,
    value: f64,
    source: DataSource,
    notes: Option<String>,
) -> HealthData {
    HealthData {
        id,
        user_id: user_id.to_string(),
        timestamp,
        data_type,
        value,
        unit: data_type.default_unit().to_string(),
        source,
        confidence: 1.0,
        notes,
    }
}

// ===== Heart rate =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateReading {
    pub id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub bpm: i32,
    pub context: Option<String>,
    #[serde(default)]
    pub source: DataSource,
}

impl HeartRateReading {
    pub fn to_health_data(&self) -> HealthData {
        row(
            self.id.clone(),
            &self.user_id,
            self.timestamp,
            HealthDataType::HeartRate,
            f64::from(self.bpm),
            self.source,
            self.context.as_ref().map(|c| note("Context", c)),
        )
    }

    pub fn from_health_data(data: &HealthData) -> Option<Self> {
        (data.data_type == HealthDataType::HeartRate).then(|| Self {
            id: data.id.clone(),
            user_id: data.user_id.clone(),
            timestamp: data.timestamp,
            bpm: data.value.round() as i32,
            context: note_value(data.notes.as_deref(), "Context").map(str::to_string),
            source: data.source,
        })
    }
}

// ===== Sleep =====

/// A night of sleep, stored at bedtime as a duration in minutes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepRecord {
    pub id: String,
    pub user_id: String,
    pub bedtime: DateTime<Utc>,
    pub duration_minutes: i64,
    pub sleep_score: Option<i32>,
    #[serde(default)]
    pub source: DataSource,
}

impl SleepRecord {
    pub fn wake_time(&self) -> DateTime<Utc> {
        self.bedtime + chrono::Duration::minutes(self.duration_minutes)
    }

    pub fn to_health_data(&self) -> HealthData {
        row(
            self.id.clone(),
            &self.user_id,
            self.bedtime,
            HealthDataType::SleepDuration,
            self.duration_minutes as f64,
            self.source,
            self.sleep_score.map(|s| note("Sleep score", s)),
        )
    }

    pub fn from_health_data(data: &HealthData) -> Option<Self> {
        (data.data_type == HealthDataType::SleepDuration).then(|| Self {
            id: data.id.clone(),
            user_id: data.user_id.clone(),
            bedtime: data.timestamp,
            duration_minutes: data.value.round() as i64,
            sleep_score: note_value(data.notes.as_deref(), "Sleep score")
                .and_then(|s| s.parse().ok()),
            source: data.source,
        })
    }
}

// ===== Activity =====

/// Daily step count, stored at noon of its date under `<id>_steps`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub steps: i64,
    #[serde(default)]
    pub source: DataSource,
}

impl ActivityRecord {
    pub fn to_health_data(&self) -> HealthData {
        let noon = self.date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default());
        row(
            format!("{}{}", self.id, STEPS_SUFFIX),
            &self.user_id,
            Utc.from_utc_datetime(&noon),
            HealthDataType::Steps,
            self.steps as f64,
            self.source,
            None,
        )
    }

    pub fn from_health_data(data: &HealthData) -> Option<Self> {
        (data.data_type == HealthDataType::Steps).then(|| Self {
            id: data
                .id
                .strip_suffix(STEPS_SUFFIX)
                .unwrap_or(&data.id)
                .to_string(),
            user_id: data.user_id.clone(),
            date: data.timestamp.date_naive(),
            steps: data.value.round() as i64,
            source: data.source,
        })
    }
}

// ===== Blood pressure =====

/// Stored as the systolic row `<id>_systolic`, diastolic kept in the note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureReading {
    pub id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub systolic: i32,
    pub diastolic: i32,
    #[serde(default)]
    pub source: DataSource,
}

impl BloodPressureReading {
    pub fn to_health_data(&self) -> HealthData {
        row(
            format!("{}{}", self.id, SYSTOLIC_SUFFIX),
            &self.user_id,
            self.timestamp,
            HealthDataType::BloodPressureSystolic,
            f64::from(self.systolic),
            self.source,
            Some(note("Diastolic", self.diastolic)),
        )
    }

    pub fn from_health_data(data: &HealthData) -> Option<Self> {
        (data.data_type == HealthDataType::BloodPressureSystolic).then(|| Self {
            id: data
                .id
                .strip_suffix(SYSTOLIC_SUFFIX)
                .unwrap_or(&data.id)
                .to_string(),
            user_id: data.user_id.clone(),
            timestamp: data.timestamp,
            systolic: data.value.round() as i32,
            diastolic: note_value(data.notes.as_deref(), "Diastolic")
                .and_then(|d| d.parse().ok())
                .unwrap_or(DEFAULT_DIASTOLIC),
            source: data.source,
        })
    }
}

// ===== Stress =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressReading {
    pub id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub level: f64,
    pub category: Option<String>,
    #[serde(default)]
    pub source: DataSource,
}

impl StressReading {
    pub fn to_health_data(&self) -> HealthData {
        row(
            self.id.clone(),
            &self.user_id,
            self.timestamp,
            HealthDataType::StressLevel,
            self.level,
            self.source,
            self.category.as_ref().map(|c| note("Category", c)),
        )
    }

    pub fn from_health_data(data: &HealthData) -> Option<Self> {
        (data.data_type == HealthDataType::StressLevel).then(|| Self {
            id: data.id.clone(),
            user_id: data.user_id.clone(),
            timestamp: data.timestamp,
            level: data.value,
            category: note_value(data.notes.as_deref(), "Category").map(str::to_string),
            source: data.source,
        })
    }
}

// ===== Hydration =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrationEntry {
    pub id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub amount_ml: f64,
    pub beverage: Option<String>,
    #[serde(default)]
    pub source: DataSource,
}

impl HydrationEntry {
    pub fn to_health_data(&self) -> HealthData {
        row(
            self.id.clone(),
            &self.user_id,
            self.timestamp,
            HealthDataType::Hydration,
            self.amount_ml,
            self.source,
            self.beverage.as_ref().map(|b| note("Beverage", b)),
        )
    }

    pub fn from_health_data(data: &HealthData) -> Option<Self> {
        (data.data_type == HealthDataType::Hydration).then(|| Self {
            id: data.id.clone(),
            user_id: data.user_id.clone(),
            timestamp: data.timestamp,
            amount_ml: data.value,
            beverage: note_value(data.notes.as_deref(), "Beverage").map(str::to_string),
            source: data.source,
        })
    }
}
