//! Gemini structured-output client.
//!
//! Talks to the `generateContent` REST endpoint and constrains each
//! response to the requesting stage's schema through Gemini's structured
//! output mode (`responseMimeType` + `responseSchema`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{GenerationRequest, Generator};
use crate::errors::GeneratorError;

/// Configuration for the Gemini client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key for authentication.
    #[serde(default)]
    pub api_key: String,
    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Base endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            endpoint: default_endpoint(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GeminiConfig {
    /// Creates a configuration with the given API key and defaults elsewhere.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Reads the API key from the `GEMINI_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Config`] when the variable is unset or blank.
    pub fn from_env() -> Result<Self, GeneratorError> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Self::new)
            .ok_or_else(|| GeneratorError::config("GEMINI_API_KEY is not set"))
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the request timeout in seconds.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Gets the timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Production [`Generator`] backed by Gemini's `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiGenerator {
    /// Creates a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Network`] when the HTTP client cannot be
    /// built.
    pub fn new(config: GeminiConfig) -> Result<Self, GeneratorError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Config`] when `GEMINI_API_KEY` is unset.
    pub fn from_env() -> Result<Self, GeneratorError> {
        Self::new(GeminiConfig::from_env()?)
    }

    fn build_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.config.endpoint, self.config.model, self.config.api_key
        )
    }

    fn build_body(&self, request: &GenerationRequest) -> GeminiRequest {
        // Identity pass-through lands here: the traveler line rides on the
        // fixed stage instruction, not on the prompt.
        let instruction = format!(
            "{} The traveler is {}, departing from {}.",
            request.instruction, request.traveler.user_name, request.traveler.origin_city
        );

        GeminiRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            system_instruction: SystemInstruction {
                parts: vec![Part { text: instruction }],
            },
            generation_config: GenerationSettings {
                temperature: self.config.temperature,
                response_mime_type: "application/json".to_string(),
                response_schema: to_gemini_schema(&request.response_schema),
            },
        }
    }
}

/// Converts a JSON-schema-style value into Gemini's schema dialect.
///
/// Gemini spells primitive types in uppercase (`STRING`, `INTEGER`, ...);
/// `properties` and `items` are converted recursively and `required`
/// passes through unchanged.
fn to_gemini_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let converted = map
                .iter()
                .map(|(key, value)| {
                    let value = match (key.as_str(), value) {
                        ("type", Value::String(name)) => Value::String(name.to_uppercase()),
                        ("properties", Value::Object(props)) => Value::Object(
                            props
                                .iter()
                                .map(|(name, prop)| (name.clone(), to_gemini_schema(prop)))
                                .collect(),
                        ),
                        ("items", value) => to_gemini_schema(value),
                        (_, value) => value.clone(),
                    };
                    (key.clone(), value)
                })
                .collect();
            Value::Object(converted)
        }
        other => other.clone(),
    }
}

/// Extracts the generated JSON value from a `generateContent` response body.
fn parse_response(body: &str) -> Result<Value, GeneratorError> {
    let parsed: GeminiResponse = serde_json::from_str(body)
        .map_err(|err| GeneratorError::malformed(format!("invalid response envelope: {err}")))?;

    if let Some(error) = parsed.error {
        let status = error.code.and_then(|code| u16::try_from(code).ok()).unwrap_or(0);
        return Err(GeneratorError::api(status, error.message));
    }

    let text = parsed
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content.parts)
        .and_then(|parts| parts.into_iter().next())
        .map(|part| part.text)
        .ok_or(GeneratorError::EmptyResponse)?;

    serde_json::from_str(&text)
        .map_err(|err| GeneratorError::malformed(format!("candidate text is not JSON: {err}")))
}

// Gemini API request/response structures

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    system_instruction: SystemInstruction,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationSettings,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationSettings {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<TextPart>>,
}

#[derive(Debug, Deserialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    code: Option<i32>,
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<Value, GeneratorError> {
        let url = self.build_url();
        let body = self.build_body(&request);

        debug!(model = %self.config.model, "sending generateContent request");

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeneratorError::api(status.as_u16(), message));
        }

        let text = response.text().await?;
        parse_response(&text)
    }
}
