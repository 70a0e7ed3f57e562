//! Scripted generator double.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::time::Duration;

use crate::errors::GeneratorError;
use crate::generator::{GenerationRequest, Generator};

/// A [`Generator`] that replays queued results and records every request.
///
/// Results are consumed in FIFO order, one per call; an exhausted queue
/// fails with [`GeneratorError::EmptyResponse`]. An optional per-call delay
/// simulates service latency.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    results: Mutex<VecDeque<Result<Value, GeneratorError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
    delay: Mutex<Option<Duration>>,
}

impl ScriptedGenerator {
    /// Creates a generator with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful result.
    pub fn enqueue_value(&self, value: Value) {
        self.results.lock().push_back(Ok(value));
    }

    /// Queues a failure.
    pub fn enqueue_error(&self, error: GeneratorError) {
        self.results.lock().push_back(Err(error));
    }

    /// Sets a delay applied to every call.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Returns every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().clone()
    }

    /// Returns the prompt of the request at `index`, if received.
    #[must_use]
    pub fn prompt_at(&self, index: usize) -> Option<String> {
        self.requests
            .lock()
            .get(index)
            .map(|request| request.prompt.clone())
    }

    /// Returns how many requests were received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Clears the script and the recorded requests.
    pub fn reset(&self) {
        self.results.lock().clear();
        self.requests.lock().clear();
        *self.delay.lock() = None;
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<Value, GeneratorError> {
        self.requests.lock().push(request);

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(GeneratorError::EmptyResponse))
    }
}
