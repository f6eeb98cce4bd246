//! Configuration management for the PixelPulse backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: PP__)
//!
//! `GEMINI_API_KEY` and `NUTRITION_API_KEY` are honoured when the prefixed
//! variables leave the keys unset.

use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Application configuration
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub ai: AiConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Generative model configuration
#[derive(Debug, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,
    #[serde(default, skip_serializing)]
    pub nutrition_api_key: Option<SecretString>,
    pub base_url: String,
    pub text_model: String,
    pub vision_model: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            nutrition_api_key: None,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            text_model: "gemini-pro".to_string(),
            vision_model: "gemini-pro-vision".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "sqlite://pixelpulse.db".to_string(),
                max_connections: 5,
            },
            ai: AiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with PP__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name(&config_file).required(false))
            // e.g., PP__AI__API_KEY=... sets ai.api_key
            .add_source(config::Environment::with_prefix("PP").separator("__"))
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;
        app_config.ai.apply_legacy_env();
        Ok(app_config)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}

impl AiConfig {
    fn apply_legacy_env(&mut self) {
        if self.api_key.is_none() {
            self.api_key = non_empty_env("GEMINI_API_KEY");
        }
        if self.nutrition_api_key.is_none() {
            self.nutrition_api_key = non_empty_env("NUTRITION_API_KEY");
        }
    }

    /// Inspect the configured keys without contacting any service
    pub fn validate_api_keys(&self) -> ApiKeyReport {
        let mut report = ApiKeyReport::default();

        match self.api_key.as_ref().map(|k| k.expose_secret().trim().len()) {
            None | Some(0) => report.missing_keys.push("GEMINI_API_KEY".to_string()),
            Some(len) if len < 20 => report
                .warnings
                .push("GEMINI_API_KEY appears to be too short".to_string()),
            Some(_) => {}
        }

        if let Some(key) = &self.nutrition_api_key {
            if key.expose_secret().trim().len() < 10 {
                report
                    .warnings
                    .push("NUTRITION_API_KEY appears to be too short".to_string());
            }
        }

        report.is_valid = report.missing_keys.is_empty();
        report
    }
}

fn non_empty_env(name: &str) -> Option<SecretString> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::new)
}

/// Outcome of inspecting the AI keys at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApiKeyReport {
    pub is_valid: bool,
    pub missing_keys: Vec<String>,
    pub warnings: Vec<String>,
}
