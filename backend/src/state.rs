//! Application state management
//!
//! Shared resources handed to every handler through Axum's state extraction.
//! All fields are cheap to clone: the pool and the assistant are internally
//! reference counted and the configuration sits behind an `Arc`.

use crate::ai::gemini::GeminiClient;
use crate::ai::AiAssistant;
use crate::config::AppConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Assistant over the configured Gemini client
    pub ai: AiAssistant,
    /// Renders `/metrics` when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Build state with a Gemini client created from `config.ai`
    pub fn new(db: SqlitePool, config: AppConfig) -> Self {
        let client = GeminiClient::new(&config.ai);
        Self {
            db,
            ai: AiAssistant::new(Arc::new(client)),
            config: Arc::new(config),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the database pool
    #[inline]
    pub fn db(&self) -> &SqlitePool {
        &self.db
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn ai(&self) -> &AiAssistant {
        &self.ai
    }
}
