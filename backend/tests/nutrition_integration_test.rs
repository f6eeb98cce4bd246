//! Integration tests for nutrition endpoints

mod common;

use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use pixelpulse_shared::models::MealType;
use pixelpulse_shared::{
    DailyNutrition, Food, FoodEntry, FoodEntryDetail, NutritionGoals, NutritionInfo,
};

fn banana() -> Food {
    let mut food = Food::unknown("banana");
    food.name = "Banana".into();
    food.barcode = Some("4011".into());
    food.nutrition_per_100g = NutritionInfo {
        calories: 89.0,
        protein_g: 1.1,
        carbs_g: 22.8,
        fat_g: 0.3,
        fiber_g: 2.6,
        sugar_g: 12.2,
        sodium_mg: 1.0,
    };
    food
}

fn entry(id: &str, food_id: &str, grams: f64, meal_type: MealType) -> FoodEntry {
    FoodEntry {
        id: id.into(),
        user_id: "u1".into(),
        food_id: food_id.into(),
        quantity_g: grams,
        meal_type,
        timestamp: Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap(),
        notes: None,
    }
}

#[tokio::test]
async fn test_food_catalog_lookup() {
    let app = common::TestApp::new().await;
    let (status, _) = app.post_json("/api/v1/nutrition/foods", &banana()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.get("/api/v1/nutrition/foods/search?q=ban").await;
    assert_eq!(status, StatusCode::OK);
    let found: Vec<Food> = common::json(&body);
    assert_eq!(found[0].id, "banana");

    let (status, _) = app.get("/api/v1/nutrition/foods/barcode/4011").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get("/api/v1/nutrition/foods/barcode/0000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_entry_with_missing_food_uses_placeholder() {
    let app = common::TestApp::new().await;

    let (status, body) = app
        .post_json("/api/v1/nutrition/entries", &entry("e1", "ghost", 100.0, MealType::Snack))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let detail: FoodEntryDetail = common::json(&body);
    assert_eq!(detail.food.name, "Unknown Food");
}

#[tokio::test]
async fn test_daily_summary() {
    let app = common::TestApp::new().await;
    app.post_json("/api/v1/nutrition/foods", &banana()).await;
    app.post_json(
        "/api/v1/nutrition/entries",
        &entry("e1", "banana", 200.0, MealType::Breakfast),
    )
    .await;

    let (status, body) = app
        .get("/api/v1/nutrition/daily?user_id=u1&date=2024-07-01")
        .await;
    assert_eq!(status, StatusCode::OK);
    let daily: DailyNutrition = common::json(&body);
    assert!((daily.totals.calories - 178.0).abs() < 1e-9);
    assert_eq!(daily.meals[&MealType::Breakfast].len(), 1);
    assert_eq!(daily.goals.daily_calories, 2000);

    let (_, body) = app
        .get("/api/v1/nutrition/entries?user_id=u1&date=2024-07-02")
        .await;
    let next_day: Vec<FoodEntryDetail> = common::json(&body);
    assert!(next_day.is_empty());
}

#[tokio::test]
async fn test_goals_replace_and_validate() {
    let app = common::TestApp::new().await;
    let mut goals = NutritionGoals::default_for("u1");
    goals.daily_calories = 2400;

    let (status, _) = app.put_json("/api/v1/nutrition/goals", &goals).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/v1/nutrition/goals/u1").await;
    let stored: NutritionGoals = common::json(&body);
    assert_eq!(stored.daily_calories, 2400);

    goals.fat_percentage = 60.0;
    let (status, body) = app.put_json("/api/v1/nutrition/goals", &goals).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_delete_entry() {
    let app = common::TestApp::new().await;
    app.post_json("/api/v1/nutrition/entries", &entry("e1", "banana", 50.0, MealType::Lunch))
        .await;

    let (status, _) = app.delete("/api/v1/nutrition/entries/e1").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.delete("/api/v1/nutrition/entries/e1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
