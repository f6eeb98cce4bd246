//! Nutrition service - foods, consumption log, goals and daily totals

use crate::error::ApiError;
use crate::repositories::{FoodEntryRepository, FoodRepository, NutritionGoalsRepository};
use crate::services::HealthDataService;
use chrono::NaiveDate;
use pixelpulse_shared::validation::{validate_food, validate_food_entry, validate_nutrition_goals};
use pixelpulse_shared::{
    DailyNutrition, Food, FoodEntry, FoodEntryDetail, NutritionGoals, NutritionInfo,
};
use sqlx::SqlitePool;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

/// Maximum results from a food name search
const SEARCH_LIMIT: i64 = 50;

/// Nutrition service
pub struct NutritionService;

impl NutritionService {
    // ===== Foods =====

    pub async fn save_food(db: &SqlitePool, food: Food) -> Result<Food, ApiError> {
        validate_food(&food)?;
        FoodRepository::upsert(db, &food)
            .await
            .map_err(ApiError::Internal)?;

        info!(food_id = %food.id, name = %food.name, "Saved food");
        Ok(food)
    }

    pub async fn search_foods(db: &SqlitePool, query: &str) -> Result<Vec<Food>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::BadRequest("Search query is required".to_string()));
        }
        FoodRepository::search(db, query, SEARCH_LIMIT)
            .await
            .map_err(ApiError::Internal)
    }

    pub async fn food_by_barcode(db: &SqlitePool, barcode: &str) -> Result<Food, ApiError> {
        FoodRepository::find_by_barcode(db, barcode)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(format!("No food with barcode {}", barcode)))
    }

    // ===== Food entries =====

    /// Attach each entry's food, substituting the `Unknown Food` placeholder
    /// for ids that no longer resolve
    pub async fn resolve_entries(
        db: &SqlitePool,
        entries: Vec<FoodEntry>,
    ) -> Result<Vec<FoodEntryDetail>, ApiError> {
        let mut foods: HashMap<String, Food> = HashMap::new();
        let mut details = Vec::with_capacity(entries.len());

        for entry in entries {
            let food = match foods.get(&entry.food_id) {
                Some(food) => food.clone(),
                None => {
                    let food = FoodRepository::find_by_id(db, &entry.food_id)
                        .await
                        .map_err(ApiError::Internal)?
                        .unwrap_or_else(|| {
                            warn!(food_id = %entry.food_id, "Food entry references a missing food");
                            Food::unknown(entry.food_id.clone())
                        });
                    foods.insert(entry.food_id.clone(), food.clone());
                    food
                }
            };
            details.push(FoodEntryDetail { entry, food });
        }

        Ok(details)
    }

    pub async fn log_entry(db: &SqlitePool, entry: FoodEntry) -> Result<FoodEntryDetail, ApiError> {
        validate_food_entry(&entry)?;
        FoodEntryRepository::upsert(db, &entry)
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = %entry.user_id, meal_type = %entry.meal_type, "Logged food entry");
        let mut resolved = Self::resolve_entries(db, vec![entry]).await?;
        resolved
            .pop()
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("Resolved entry missing")))
    }

    pub async fn entries_for_date(
        db: &SqlitePool,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<FoodEntryDetail>, ApiError> {
        let entries = FoodEntryRepository::list_for_date(db, user_id, date)
            .await
            .map_err(ApiError::Internal)?;
        Self::resolve_entries(db, entries).await
    }

    pub async fn delete_entry(db: &SqlitePool, id: &str) -> Result<(), ApiError> {
        let deleted = FoodEntryRepository::delete(db, id)
            .await
            .map_err(ApiError::Internal)?;
        if !deleted {
            return Err(ApiError::NotFound(format!("Food entry {} not found", id)));
        }
        Ok(())
    }

    // ===== Goals =====

    pub async fn save_goals(db: &SqlitePool, goals: NutritionGoals) -> Result<NutritionGoals, ApiError> {
        validate_nutrition_goals(&goals)?;
        NutritionGoalsRepository::upsert(db, &goals)
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = %goals.user_id, "Saved nutrition goals");
        Ok(goals)
    }

    /// Stored goals, or the defaults when the user has none
    pub async fn goals_for(db: &SqlitePool, user_id: &str) -> Result<NutritionGoals, ApiError> {
        let goals = NutritionGoalsRepository::find_for_user(db, user_id)
            .await
            .map_err(ApiError::Internal)?;
        Ok(goals.unwrap_or_else(|| NutritionGoals::default_for(user_id)))
    }

    // ===== Daily view =====

    /// A day's intake grouped by meal, with hydration and goals attached
    pub async fn daily_nutrition(
        db: &SqlitePool,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<DailyNutrition, ApiError> {
        let entries = Self::entries_for_date(db, user_id, date).await?;
        let water_intake_ml = HealthDataService::hydration_total(db, user_id, date).await?;
        let goals = Self::goals_for(db, user_id).await?;

        let totals = entries
            .iter()
            .map(FoodEntryDetail::nutrition)
            .fold(NutritionInfo::default(), |acc, n| acc + n);

        let mut meals: BTreeMap<_, Vec<FoodEntryDetail>> = BTreeMap::new();
        for detail in entries {
            meals.entry(detail.entry.meal_type).or_default().push(detail);
        }

        debug!(user_id, %date, calories = totals.calories, "Computed daily nutrition");
        Ok(DailyNutrition {
            user_id: user_id.to_string(),
            date,
            totals,
            meals,
            water_intake_ml,
            goals,
        })
    }
}
