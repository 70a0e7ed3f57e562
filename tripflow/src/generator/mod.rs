//! Generation capability boundary.
//!
//! The pipeline depends on one external service: a text-to-structured-output
//! generator. [`Generator`] is that boundary; [`GeminiGenerator`] is the
//! production implementation and
//! [`ScriptedGenerator`](crate::testing::ScriptedGenerator) the test double.

mod gemini;

pub use gemini::{GeminiConfig, GeminiGenerator};

use async_trait::async_trait;
use serde_json::Value;

use crate::context::Traveler;
use crate::errors::GeneratorError;

/// One structured-output request issued by a stage.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The request text built by the stage's prompt builder.
    pub prompt: String,
    /// Fixed task guidance for the stage issuing the request.
    pub instruction: &'static str,
    /// Caller identity, passed through for personalization.
    pub traveler: Traveler,
    /// JSON schema the generated value must conform to.
    pub response_schema: Value,
}

/// The external text-to-structured-output capability.
///
/// Implementations return a JSON value conforming to the request's
/// `response_schema`, or fail with a [`GeneratorError`]. The pipeline
/// treats the cause as opaque: it never retries and never inspects the
/// variant, it only tags the failure with the stage that issued the
/// request.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generates a structured value for the given request.
    async fn generate(&self, request: GenerationRequest) -> Result<Value, GeneratorError>;
}
