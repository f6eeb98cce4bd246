//! Integration tests for the AI endpoints against a mocked Gemini API

mod common;

use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use pixelpulse_shared::ai::{ChatMessage, FoodScanResult, HealthInsight};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "AIzaSyTest-0123456789abcdef";
const TEXT_PATH: &str = "/models/gemini-pro:generateContent";
const VISION_PATH: &str = "/models/gemini-pro-vision:generateContent";

fn reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP",
            "index": 0
        }]
    })
}

async fn mock_reply(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path(route))
        .and(header("x-goog-api-key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn insights_request() -> Value {
    json!({ "user_id": "u1", "time_range": "LAST_7_DAYS", "health_data": [] })
}

#[tokio::test]
async fn test_insights_from_numbered_lines() {
    let server = MockServer::start().await;
    mock_reply(
        &server,
        TEXT_PATH,
        reply("Here is what I noticed:\n1. **Sleep**: You slept less midweek\n2) Hydration: Drink more water"),
    )
    .await;
    let app = common::TestApp::with_ai(&server.uri(), Some(API_KEY)).await;

    let (status, body) = app.post_json("/api/v1/ai/insights", &insights_request()).await;

    assert_eq!(status, StatusCode::OK);
    let insights: Vec<HealthInsight> = common::json(&body);
    assert_eq!(insights.len(), 2);
    assert_eq!(insights[0].title, "Sleep");
    assert_eq!(insights[0].description, "You slept less midweek");
    assert_eq!(insights[1].title, "Hydration");
    assert!((insights[0].confidence - 0.6).abs() < 1e-9);
}

#[tokio::test]
async fn test_insights_from_fenced_json() {
    let server = MockServer::start().await;
    let text = "```json\n{\"insights\":[{\"title\":\"Resting heart rate\",\"description\":\"Down 4 bpm\",\"category\":\"HEART_HEALTH\",\"priority\":\"LOW\",\"recommendations\":[\"Keep it up\"],\"confidence\":0.9}]}\n```";
    mock_reply(&server, TEXT_PATH, reply(text)).await;
    let app = common::TestApp::with_ai(&server.uri(), Some(API_KEY)).await;

    let (status, body) = app.post_json("/api/v1/ai/insights", &insights_request()).await;

    assert_eq!(status, StatusCode::OK);
    let insights: Vec<Value> = common::json(&body);
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0]["category"], "HEART_HEALTH");
    assert_eq!(insights[0]["priority"], "LOW");
    assert_eq!(insights[0]["user_id"], "u1");
}

#[tokio::test]
async fn test_empty_candidates_fall_back_to_default() {
    let server = MockServer::start().await;
    mock_reply(&server, TEXT_PATH, json!({ "candidates": [] })).await;
    let app = common::TestApp::with_ai(&server.uri(), Some(API_KEY)).await;

    let (status, body) = app.post_json("/api/v1/ai/insights", &insights_request()).await;

    assert_eq!(status, StatusCode::OK);
    let insights: Vec<HealthInsight> = common::json(&body);
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].title, "Heart Rate Trend");
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TEXT_PATH))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "error": { "code": 500, "message": "backend overloaded" } })),
        )
        .mount(&server)
        .await;
    let app = common::TestApp::with_ai(&server.uri(), Some(API_KEY)).await;

    let (status, body) = app.post_json("/api/v1/ai/insights", &insights_request()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("AI_SERVICE_ERROR"));
    assert!(body.contains("backend overloaded"));
}

#[tokio::test]
async fn test_missing_api_key_is_bad_gateway() {
    let app = common::TestApp::new().await;

    let (status, body) = app
        .post_json("/api/v1/ai/chat", &json!({ "user_id": "u1", "message": "Hi" }))
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("Gemini API key not configured"));
}

#[tokio::test]
async fn test_chat_reply_and_history() {
    let server = MockServer::start().await;
    mock_reply(&server, TEXT_PATH, reply("Try a 20 minute walk after lunch.")).await;
    let app = common::TestApp::with_ai(&server.uri(), Some(API_KEY)).await;

    let (status, body) = app
        .post_json(
            "/api/v1/ai/chat",
            &json!({ "user_id": "u1", "message": "How can I move more?" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let message: ChatMessage = common::json(&body);
    assert_eq!(message.content, "Try a 20 minute walk after lunch.");
    assert!(!message.is_from_user);

    let (status, body) = app.get("/api/v1/ai/chat/u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn test_food_scan_uses_vision_model() {
    let server = MockServer::start().await;
    mock_reply(
        &server,
        VISION_PATH,
        reply(r#"[{"name":"Apple","confidence":0.9,"estimated_weight_g":180,"calories":95}]"#),
    )
    .await;
    let app = common::TestApp::with_ai(&server.uri(), Some(API_KEY)).await;

    let image = BASE64.encode([0xFF, 0xD8, 0xFF, 0xE0]);
    let (status, body) = app
        .post_json("/api/v1/ai/food-scan", &json!({ "image_base64": image }))
        .await;

    assert_eq!(status, StatusCode::OK);
    let scan: FoodScanResult = common::json(&body);
    assert_eq!(scan.recognized_foods.len(), 1);
    assert_eq!(scan.recognized_foods[0].name, "Apple");
    assert!((scan.confidence - 0.9).abs() < 1e-9);
}

#[tokio::test]
async fn test_food_scan_rejects_bad_base64() {
    let app = common::TestApp::new().await;

    let (status, body) = app
        .post_json("/api/v1/ai/food-scan", &json!({ "image_base64": "%%%" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("BAD_REQUEST"));
}

#[tokio::test]
async fn test_workout_plan_rejects_zero_minutes() {
    let app = common::TestApp::new().await;

    let (status, _) = app
        .post_json(
            "/api/v1/ai/workout-plan",
            &json!({ "user_id": "u1", "fitness_level": "BEGINNER", "minutes_per_session": 0 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
