//! Nutrition repository - foods, food entries and nutrition goals

use super::{parse_tag, record_write};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use pixelpulse_shared::models::{Food, FoodEntry, NutritionGoals, NutritionInfo};
use sqlx::SqlitePool;

/// Food row as stored, nutrition flattened into per-100 g columns
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FoodRecord {
    pub id: String,
    pub name: String,
    pub brand: Option<String>,
    pub barcode: Option<String>,
    pub category: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub sugar_g: f64,
    pub sodium_mg: f64,
    pub is_verified: bool,
    pub image_url: Option<String>,
}

impl TryFrom<FoodRecord> for Food {
    type Error = anyhow::Error;

    fn try_from(r: FoodRecord) -> Result<Self> {
        Ok(Food {
            category: parse_tag("category", &r.category)?,
            nutrition_per_100g: NutritionInfo {
                calories: r.calories,
                protein_g: r.protein_g,
                carbs_g: r.carbs_g,
                fat_g: r.fat_g,
                fiber_g: r.fiber_g,
                sugar_g: r.sugar_g,
                sodium_mg: r.sodium_mg,
            },
            id: r.id,
            name: r.name,
            brand: r.brand,
            barcode: r.barcode,
            is_verified: r.is_verified,
            image_url: r.image_url,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FoodEntryRecord {
    pub id: String,
    pub user_id: String,
    pub food_id: String,
    pub quantity_g: f64,
    pub meal_type: String,
    pub timestamp: DateTime<Utc>,
    pub notes: Option<String>,
}

impl TryFrom<FoodEntryRecord> for FoodEntry {
    type Error = anyhow::Error;

    fn try_from(r: FoodEntryRecord) -> Result<Self> {
        Ok(FoodEntry {
            meal_type: parse_tag("meal_type", &r.meal_type)?,
            id: r.id,
            user_id: r.user_id,
            food_id: r.food_id,
            quantity_g: r.quantity_g,
            timestamp: r.timestamp,
            notes: r.notes,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NutritionGoalsRecord {
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

impl From<NutritionGoalsRecord> for NutritionGoals {
    fn from(r: NutritionGoalsRecord) -> Self {
        NutritionGoals {
            id: r.id,
            user_id: r.user_id,
            daily_calories: r.daily_calories,
            protein_percentage: r.protein_percentage,
            carbs_percentage: r.carbs_percentage,
            fat_percentage: r.fat_percentage,
            fiber_g: r.fiber_g,
            sodium_mg: r.sodium_mg,
            water_ml: r.water_ml,
        }
    }
}

/// `[00:00:00, 23:59:59]` of `date` in UTC
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(NaiveTime::MIN);
    let end = date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN));
    (Utc.from_utc_datetime(&start), Utc.from_utc_datetime(&end))
}

// ============================================================================
// Foods
// ============================================================================

/// Escape `LIKE` wildcards so they match literally under `ESCAPE '\'`
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Food repository
pub struct FoodRepository;

impl FoodRepository {
    pub async fn upsert(db: &SqlitePool, food: &Food) -> Result<()> {
        let n = &food.nutrition_per_100g;
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO foods (
                id, name, brand, barcode, category, calories, protein_g, carbs_g, fat_g,
                fiber_g, sugar_g, sodium_mg, is_verified, image_url
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&food.id)
        .bind(&food.name)
        .bind(&food.brand)
        .bind(&food.barcode)
        .bind(food.category.as_str())
        .bind(n.calories)
        .bind(n.protein_g)
        .bind(n.carbs_g)
        .bind(n.fat_g)
        .bind(n.fiber_g)
        .bind(n.sugar_g)
        .bind(n.sodium_mg)
        .bind(food.is_verified)
        .bind(&food.image_url)
        .execute(db)
        .await?;

        record_write("foods", 1);
        Ok(())
    }

    /// Find food by ID
    pub async fn find_by_id(db: &SqlitePool, id: &str) -> Result<Option<Food>> {
        let record = sqlx::query_as::<_, FoodRecord>(
            r#"
            SELECT id, name, brand, barcode, category, calories, protein_g, carbs_g, fat_g,
                   fiber_g, sugar_g, sodium_mg, is_verified, image_url
            FROM foods
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        record.map(Food::try_from).transpose()
    }

    /// Find food by barcode
    pub async fn find_by_barcode(db: &SqlitePool, barcode: &str) -> Result<Option<Food>> {
        let record = sqlx::query_as::<_, FoodRecord>(
            r#"
            SELECT id, name, brand, barcode, category, calories, protein_g, carbs_g, fat_g,
                   fiber_g, sugar_g, sodium_mg, is_verified, image_url
            FROM foods
            WHERE barcode = ?
            LIMIT 1
            "#,
        )
        .bind(barcode)
        .fetch_optional(db)
        .await?;

        record.map(Food::try_from).transpose()
    }

    /// Name substring search, verified foods first
    /// Foods whose name contains `query` literally
    pub async fn search(db: &SqlitePool, query: &str, limit: i64) -> Result<Vec<Food>> {
        let records = sqlx::query_as::<_, FoodRecord>(
            r#"
            SELECT id, name, brand, barcode, category, calories, protein_g, carbs_g, fat_g,
                   fiber_g, sugar_g, sodium_mg, is_verified, image_url
            FROM foods
            WHERE name LIKE ? ESCAPE '\'
            ORDER BY is_verified DESC, name ASC
            LIMIT ?
            "#,
        )
        .bind(format!("%{}%", escape_like(query)))
        .bind(limit)
        .fetch_all(db)
        .await?;

        records.into_iter().map(Food::try_from).collect()
    }

    pub async fn delete(db: &SqlitePool, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM foods WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Food entries
// ============================================================================

/// Food entry repository
pub struct FoodEntryRepository;

impl FoodEntryRepository {
    pub async fn upsert(db: &SqlitePool, entry: &FoodEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO food_entries (
                id, user_id, food_id, quantity_g, meal_type, timestamp, notes
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.user_id)
        .bind(&entry.food_id)
        .bind(entry.quantity_g)
        .bind(entry.meal_type.as_str())
        .bind(entry.timestamp)
        .bind(&entry.notes)
        .execute(db)
        .await?;

        record_write("food_entries", 1);
        Ok(())
    }

    pub async fn find_by_id(db: &SqlitePool, id: &str) -> Result<Option<FoodEntry>> {
        let record = sqlx::query_as::<_, FoodEntryRecord>(
            r#"
            SELECT id, user_id, food_id, quantity_g, meal_type, timestamp, notes
            FROM food_entries
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        record.map(FoodEntry::try_from).transpose()
    }

    /// Entries with `start <= timestamp <= end`, oldest first
    pub async fn list_in_range(
        db: &SqlitePool,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FoodEntry>> {
        let records = sqlx::query_as::<_, FoodEntryRecord>(
            r#"
            SELECT id, user_id, food_id, quantity_g, meal_type, timestamp, notes
            FROM food_entries
            WHERE user_id = ? AND timestamp >= ? AND timestamp <= ?
            ORDER BY timestamp ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await?;

        records.into_iter().map(FoodEntry::try_from).collect()
    }

    /// Entries logged on `date`
    pub async fn list_for_date(
        db: &SqlitePool,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<FoodEntry>> {
        let (start, end) = day_bounds(date);
        Self::list_in_range(db, user_id, start, end).await
    }

    pub async fn delete(db: &SqlitePool, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM food_entries WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Nutrition goals
// ============================================================================

/// Nutrition goals repository, one row per user
pub struct NutritionGoalsRepository;

impl NutritionGoalsRepository {
    /// Insert or replace the user's goals; a new id replaces the previous row
    pub async fn upsert(db: &SqlitePool, goals: &NutritionGoals) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO nutrition_goals (
                id, user_id, daily_calories, protein_percentage, carbs_percentage,
                fat_percentage, fiber_g, sodium_mg, water_ml
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&goals.id)
        .bind(&goals.user_id)
        .bind(goals.daily_calories)
        .bind(goals.protein_percentage)
        .bind(goals.carbs_percentage)
        .bind(goals.fat_percentage)
        .bind(goals.fiber_g)
        .bind(goals.sodium_mg)
        .bind(goals.water_ml)
        .execute(db)
        .await?;

        record_write("nutrition_goals", 1);
        Ok(())
    }

    pub async fn find_for_user(db: &SqlitePool, user_id: &str) -> Result<Option<NutritionGoals>> {
        let record = sqlx::query_as::<_, NutritionGoalsRecord>(
            r#"
            SELECT id, user_id, daily_calories, protein_percentage, carbs_percentage,
                   fat_percentage, fiber_g, sodium_mg, water_ml
            FROM nutrition_goals
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        Ok(record.map(NutritionGoals::from))
    }
}
