//! Error types for trip planning.
//!
//! The pipeline surfaces exactly one error to its caller:
//! [`GenerationError`], tagged with the stage that failed. The underlying
//! cause is a [`GeneratorError`] describing what went wrong at the
//! generation capability boundary.

use thiserror::Error;

/// Failure modes of the generation capability.
///
/// The pipeline treats every variant the same way (abort the run, no
/// retry); the split exists so integration code and operators can tell a
/// transport failure from a bad response.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The backing service could not be reached or the transport failed.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with a non-success status or an error body.
    #[error("generation service returned status {status}: {message}")]
    Api {
        /// The HTTP status code (or the error code reported in the body).
        status: u16,
        /// The message reported by the service.
        message: String,
    },

    /// The service answered without any usable candidate content.
    #[error("generation service returned no candidates")]
    EmptyResponse,

    /// The service returned content that could not be understood.
    #[error("malformed generation output: {0}")]
    MalformedOutput(String),

    /// The generated value does not match the stage's response schema.
    #[error("output does not match the response schema: {0}")]
    Json(#[from] serde_json::Error),

    /// The generator is missing required configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GeneratorError {
    /// Creates an API error.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a malformed output error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedOutput(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Error returned when a pipeline run fails.
///
/// Carries the name of the stage whose generation call failed and the
/// underlying cause. A run that fails produces no trip plan; the partially
/// populated context is dropped, never returned.
#[derive(Debug, Error)]
#[error("generation failed at stage '{stage}': {source}")]
pub struct GenerationError {
    /// The stage that failed.
    pub stage: String,
    /// The underlying generator failure.
    #[source]
    pub source: GeneratorError,
}

impl GenerationError {
    /// Creates a new generation error for the given stage.
    #[must_use]
    pub fn new(stage: impl Into<String>, source: GeneratorError) -> Self {
        Self {
            stage: stage.into(),
            source,
        }
    }
}
