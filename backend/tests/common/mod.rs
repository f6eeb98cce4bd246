//! Common test utilities for integration tests
//!
//! Every `TestApp` owns a fresh in-memory database with migrations applied.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use pixelpulse_backend::{config::AppConfig, db, routes, state::AppState};
use secrecy::SecretString;
use serde::Serialize;
use sqlx::SqlitePool;
use tower::ServiceExt;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
}

impl TestApp {
    /// App with no Gemini key configured
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    /// App whose Gemini client talks to `base_url` with `api_key`
    pub async fn with_ai(base_url: &str, api_key: Option<&str>) -> Self {
        let mut config = AppConfig::default();
        config.ai.base_url = base_url.to_string();
        config.ai.api_key = api_key.map(|k| SecretString::new(k.to_string()));
        Self::with_config(config).await
    }

    async fn with_config(config: AppConfig) -> Self {
        let pool = db::create_in_memory_pool()
            .await
            .expect("Failed to create in-memory database");

        let state = AppState::new(pool.clone(), config);
        let app = routes::create_router(state);

        Self { app, pool }
    }

    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        self.send("GET", path, None).await
    }

    pub async fn delete(&self, path: &str) -> (StatusCode, String) {
        self.send("DELETE", path, None).await
    }

    /// POST a raw JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.send("POST", path, Some(body.to_string())).await
    }

    pub async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> (StatusCode, String) {
        let body = serde_json::to_string(body).expect("Failed to serialize body");
        self.send("POST", path, Some(body)).await
    }

    pub async fn put_json<T: Serialize>(&self, path: &str, body: &T) -> (StatusCode, String) {
        let body = serde_json::to_string(body).expect("Failed to serialize body");
        self.send("PUT", path, Some(body)).await
    }

    async fn send(&self, method: &str, path: &str, body: Option<String>) -> (StatusCode, String) {
        let builder = Request::builder().method(method).uri(path);
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }
}

/// Parse a JSON response body
pub fn json<T: serde::de::DeserializeOwned>(body: &str) -> T {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("Invalid JSON ({e}): {body}"))
}
