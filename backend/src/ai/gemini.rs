//! Gemini `generateContent` client
//!
//! Wire types use the API's camelCase JSON. The client sends one request per
//! call: no retries and no timeout beyond the `reqwest` defaults.

use super::{AiError, GenerativeModel};
use crate::config::AiConfig;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Formatter};
use tracing::{debug, error, instrument};

const API_KEY_HEADER: &str = "x-goog-api-key";
const JPEG_MIME_TYPE: &str = "image/jpeg";

// ============================================================================
// Request types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_settings: Option<Vec<SafetySetting>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default = "user_role")]
    pub role: String,
}

fn user_role() -> String {
    "user".to_string()
}

/// Either a text part or an inline binary part
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// JPEG bytes as a base64 inline part
    pub fn jpeg(bytes: &[u8]) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: JPEG_MIME_TYPE.to_string(),
                data: BASE64.encode(bytes),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
            stop_sequences: None,
        }
    }
}

impl GenerationConfig {
    /// Text prompts: low temperature, 1000 tokens
    pub fn text() -> Self {
        Self {
            temperature: 0.3,
            max_output_tokens: 1000,
            ..Self::default()
        }
    }

    /// Vision prompts: lower temperature, 500 tokens
    pub fn vision() -> Self {
        Self {
            temperature: 0.2,
            max_output_tokens: 500,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

impl GeminiRequest {
    pub fn text(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part::text(prompt)],
                role: user_role(),
            }],
            generation_config: Some(GenerationConfig::text()),
            safety_settings: None,
        }
    }

    pub fn vision(prompt: &str, jpeg: &[u8]) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part::text(prompt), Part::jpeg(jpeg)],
                role: user_role(),
            }],
            generation_config: Some(GenerationConfig::vision()),
            safety_settings: None,
        }
    }
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GeminiResponse {
    /// Text of the first part of the first candidate
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub safety_ratings: Vec<SafetyRating>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyRating {
    pub category: String,
    pub probability: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
    #[serde(default)]
    pub safety_ratings: Vec<SafetyRating>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// ============================================================================
// Client
// ============================================================================

/// HTTP client for the Gemini API
pub struct GeminiClient {
    client: Client,
    api_key: Option<SecretString>,
    base_url: String,
    text_model: String,
    vision_model: String,
}

impl GeminiClient {
    pub fn new(config: &AiConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            vision_model: config.vision_model.clone(),
        }
    }

    fn build_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    fn map_api_error(status: u16, body: &str) -> AiError {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string());
        AiError::Api { status, message }
    }

    #[instrument(skip(self, request))]
    async fn send(&self, model: &str, request: &GeminiRequest) -> Result<GeminiResponse, AiError> {
        let result = self.send_inner(model, request).await;
        let outcome = if result.is_ok() { "success" } else { "error" };
        metrics::counter!(
            "pixelpulse_ai_requests_total",
            "model" => model.to_string(),
            "outcome" => outcome
        )
        .increment(1);
        result
    }

    async fn send_inner(
        &self,
        model: &str,
        request: &GeminiRequest,
    ) -> Result<GeminiResponse, AiError> {
        let api_key = self
            .api_key
            .as_ref()
            .filter(|k| !k.expose_secret().trim().is_empty())
            .ok_or(AiError::MissingApiKey)?;

        debug!("Sending request to Gemini API");

        let response = self
            .client
            .post(self.build_url(model))
            .header(API_KEY_HEADER, api_key.expose_secret())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(Self::map_api_error(status.as_u16(), &body));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to parse Gemini response");
            AiError::Decode(e)
        })?;

        debug!(candidates = parsed.candidates.len(), "Received Gemini response");
        Ok(parsed)
    }
}

impl Debug for GeminiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("vision_model", &self.vision_model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> Result<GeminiResponse, AiError> {
        self.send(&self.text_model, &GeminiRequest::text(prompt)).await
    }

    async fn generate_from_image(
        &self,
        prompt: &str,
        jpeg: &[u8],
    ) -> Result<GeminiResponse, AiError> {
        self.send(&self.vision_model, &GeminiRequest::vision(prompt, jpeg))
            .await
    }
}
