//! Gemini - Google Gemini API endpoint client
//!
//! This module implements the single-shot `generateContent` client using
//! reqwest. It builds one HTTP POST, maps transport and status failures to
//! typed errors, and returns the raw response body for interpretation.
//! Retry logic lives in the runner, not here.

use crate::error::{Error, Result};
use crate::util::mask_api_key;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Default API base URL
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

// ============================================================================
// Wire Types
// ============================================================================

/// One text part of a content turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Prompt or response text
    pub text: String,
}

/// A single conversation turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Turn role ("user" / "model"); omitted for single-shot prompts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Ordered message parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// A user turn holding one text part
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// Schema field declaration (OpenAPI subset accepted by Gemini)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaField {
    /// OpenAPI type name ("NUMBER", "STRING", ...)
    #[serde(rename = "type")]
    pub field_type: &'static str,
}

/// Properties of the credibility-analysis response schema.
///
/// Declared as a struct rather than a `serde_json` map so the serialized
/// property order is exactly `credibilityScore` then `breakdown`, which is
/// what the endpoint contract specifies. `serde_json` maps sort keys
/// alphabetically and would flip the order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSchemaProperties {
    /// Credibility score field (NUMBER)
    pub credibility_score: SchemaField,
    /// Breakdown field (STRING)
    pub breakdown: SchemaField,
}

/// Response schema attached to structured (analyze) requests
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSchema {
    /// OpenAPI type of the top-level value (always "OBJECT")
    #[serde(rename = "type")]
    pub schema_type: &'static str,
    /// Declared properties, in contract order
    pub properties: AnalysisSchemaProperties,
    /// Required property names
    pub required: [&'static str; 2],
}

impl Default for AnalysisSchema {
    fn default() -> Self {
        Self {
            schema_type: "OBJECT",
            properties: AnalysisSchemaProperties {
                credibility_score: SchemaField {
                    field_type: "NUMBER",
                },
                breakdown: SchemaField {
                    field_type: "STRING",
                },
            },
            required: ["credibilityScore", "breakdown"],
        }
    }
}

/// Generation configuration for a request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Response MIME type ("application/json" or "text/plain")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    /// Response schema; only set for structured requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<AnalysisSchema>,
}

impl GenerationConfig {
    /// Configuration for a structured JSON response constrained by the
    /// credibility-analysis schema
    #[must_use]
    pub fn structured_json() -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(AnalysisSchema::default()),
        }
    }

    /// Configuration for a plain prose response
    #[must_use]
    pub fn plain_text() -> Self {
        Self {
            response_mime_type: Some("text/plain".to_string()),
            response_schema: None,
        }
    }
}

/// A `generateContent` request body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Conversation turns (a single user turn for every operation here)
    pub contents: Vec<Content>,
    /// Generation configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    /// Optional tool declarations (e.g. search grounding)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<serde_json::Value>>,
}

impl GenerateRequest {
    /// Build a request from a single prompt
    #[must_use]
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::user(prompt)],
            generation_config: None,
            tools: None,
        }
    }

    /// Set the generation configuration
    #[must_use]
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    /// Attach tool declarations
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<serde_json::Value>) -> Self {
        self.tools = Some(tools);
        self
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Gemini client configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key (appended as `?key=` in the URL)
    pub api_key: String,
    /// Base URL
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Request timeout
    pub timeout: Duration,
}

// Custom Debug implementation to mask the credential
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Create a new configuration with an API key
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `GEMINI_API_KEY` (or `GOOGLE_API_KEY`), with optional
    /// `GEMINI_BASE_URL` and `GEMINI_MODEL` overrides.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map_err(|_| {
                Error::NotConfigured("GEMINI_API_KEY or GOOGLE_API_KEY not set".to_string())
            })?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.model = model;
        }
        Ok(config)
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================================================
// Client
// ============================================================================

/// Single-shot endpoint client, mockable at the seam the retry runner and
/// coordinators call through.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerateClient: Send + Sync {
    /// Issue one `generateContent` POST and return the raw response body.
    ///
    /// A transport fault maps to [`Error::Network`]; a non-2xx status maps
    /// to [`Error::HttpStatus`] without interpreting the body. Exactly one
    /// attempt per call.
    async fn generate(&self, request: GenerateRequest) -> Result<String>;
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new client
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// The configuration this client was built with
    #[must_use]
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl GenerateClient for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<String> {
        // Don't log the URL: it carries the API key
        debug!(model = %self.config.model, "sending generateContent request");

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), model = %self.config.model, "generateContent rejected");
            return Err(Error::HttpStatus(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Network(e.without_url().to_string()))
    }
}
