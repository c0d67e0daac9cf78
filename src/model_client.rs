//! Generative model client
//!
//! [`GenerativeModel`] is the seam between advisor logic and the hosted
//! model. [`GeminiClient`] talks to the `generateContent` REST endpoint;
//! tests substitute scripted implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Transport(String),

    #[error("model returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model returned no text")]
    EmptyResponse,

    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        ModelError::Transport(err.without_url().to_string())
    }
}

impl ModelError {
    /// Message safe to hand to HTTP clients; transport detail stays in logs.
    pub fn public_message(&self) -> String {
        match self {
            ModelError::Transport(_) => "Model service is unreachable".to_string(),
            ModelError::Status { status, .. } => format!("Model service returned HTTP {status}"),
            ModelError::EmptyResponse => "Model returned no text".to_string(),
            ModelError::MissingApiKey => self.to_string(),
        }
    }
}

// ============================================================================
// Request
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    InlineImage { mime_type: String, data_base64: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    /// Structured disease detection.
    pub fn disease() -> Self {
        Self::with(0.2, 2048)
    }

    /// Pathologist analysis; long tab content needs headroom.
    pub fn pathologist() -> Self {
        Self::with(0.2, 8192)
    }

    /// Crop and fertilizer planning.
    pub fn planning() -> Self {
        Self::with(0.3, 2048)
    }

    /// Advice and assistant chat.
    pub fn chat() -> Self {
        Self::with(0.7, 1024)
    }

    fn with(temperature: f32, max_output_tokens: u32) -> Self {
        Self {
            temperature,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::chat()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub parts: Vec<Part>,
    pub config: GenerationConfig,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::Text(prompt.into())],
            config: GenerationConfig::default(),
        }
    }

    pub fn image(mut self, mime_type: &str, data_base64: String) -> Self {
        self.parts.push(Part::InlineImage {
            mime_type: mime_type.to_string(),
            data_base64,
        });
        self
    }

    pub fn config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// First text part, if any.
    pub fn prompt(&self) -> Option<&str> {
        self.parts.iter().find_map(|p| match p {
            Part::Text(t) => Some(t.as_str()),
            Part::InlineImage { .. } => None,
        })
    }

    pub fn has_image(&self) -> bool {
        self.parts.iter().any(|p| matches!(p, Part::InlineImage { .. }))
    }
}

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Raw reply text of the first candidate.
    async fn generate(&self, request: GenerationRequest) -> Result<String, ModelError>;
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest {
    contents: Vec<WireContent>,
    generation_config: WireGenerationConfig,
    safety_settings: Vec<WireSafetySetting>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    inline_data: Option<WireInlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct WireSafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Debug, Deserialize)]
struct WireCandidate {
    content: Option<WireContent>,
}

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

impl From<&GenerationRequest> for WireRequest {
    fn from(request: &GenerationRequest) -> Self {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => WirePart {
                    text: Some(text.clone()),
                    inline_data: None,
                },
                Part::InlineImage { mime_type, data_base64 } => WirePart {
                    text: None,
                    inline_data: Some(WireInlineData {
                        mime_type: mime_type.clone(),
                        data: data_base64.clone(),
                    }),
                },
            })
            .collect();

        let config = request.config;
        WireRequest {
            contents: vec![WireContent { parts }],
            generation_config: WireGenerationConfig {
                temperature: config.temperature,
                top_k: config.top_k,
                top_p: config.top_p,
                max_output_tokens: config.max_output_tokens,
            },
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|&category| WireSafetySetting {
                    category,
                    threshold: "BLOCK_MEDIUM_AND_ABOVE",
                })
                .collect(),
        }
    }
}

impl WireResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
    }
}

// ============================================================================
// Gemini REST client
// ============================================================================

#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// The key travels in a header so it never appears in a URL.
    fn build_request(&self, request: &GenerationRequest) -> reqwest::RequestBuilder {
        self.client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&WireRequest::from(request))
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, ModelError> {
        if self.api_key.trim().is_empty() {
            return Err(ModelError::MissingApiKey);
        }

        debug!(
            model = %self.model,
            image = request.has_image(),
            max_tokens = request.config.max_output_tokens,
            "Sending generateContent request"
        );

        let response = self.build_request(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Model request rejected");
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: WireResponse = response.json().await?;
        body.into_text().ok_or(ModelError::EmptyResponse)
    }
}
