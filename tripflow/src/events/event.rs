//! Lifecycle event type emitted during pipeline runs.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

/// An event emitted while a pipeline run executes.
///
/// Events are consumed by event sinks for logging, monitoring, or test
/// assertions. Every event carries the run it belongs to and an RFC 3339
/// timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEvent {
    /// The event type (e.g., "stage.started", "pipeline.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// When the event occurred (RFC 3339).
    pub timestamp: String,

    /// The run this event belongs to.
    pub run_id: Uuid,

    /// The event payload data.
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,
}

impl PipelineEvent {
    /// Creates a new event with an empty payload.
    #[must_use]
    pub fn new(event_type: impl Into<String>, run_id: Uuid) -> Self {
        Self {
            event_type: event_type.into(),
            timestamp: Utc::now().to_rfc3339(),
            run_id,
            data: HashMap::new(),
        }
    }

    /// Adds a data field to the event.
    #[must_use]
    pub fn add_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Creates a "pipeline.started" event.
    #[must_use]
    pub fn pipeline_started(run_id: Uuid) -> Self {
        Self::new("pipeline.started", run_id)
    }

    /// Creates a "pipeline.completed" event.
    #[must_use]
    pub fn pipeline_completed(run_id: Uuid, duration_ms: f64) -> Self {
        Self::new("pipeline.completed", run_id).add_data("duration_ms", json!(duration_ms))
    }

    /// Creates a "pipeline.failed" event.
    #[must_use]
    pub fn pipeline_failed(run_id: Uuid, stage: &str, error: &str) -> Self {
        Self::new("pipeline.failed", run_id)
            .add_data("stage", json!(stage))
            .add_data("error", json!(error))
    }

    /// Creates a "stage.started" event.
    #[must_use]
    pub fn stage_started(run_id: Uuid, stage: &str) -> Self {
        Self::new("stage.started", run_id).add_data("stage", json!(stage))
    }

    /// Creates a "stage.completed" event.
    #[must_use]
    pub fn stage_completed(run_id: Uuid, stage: &str, duration_ms: f64) -> Self {
        Self::new("stage.completed", run_id)
            .add_data("stage", json!(stage))
            .add_data("duration_ms", json!(duration_ms))
    }

    /// Creates a "stage.failed" event.
    #[must_use]
    pub fn stage_failed(run_id: Uuid, stage: &str, error: &str) -> Self {
        Self::new("stage.failed", run_id)
            .add_data("stage", json!(stage))
            .add_data("error", json!(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_started_event() {
        let run_id = Uuid::new_v4();
        let event = PipelineEvent::stage_started(run_id, "flight");

        assert_eq!(event.event_type, "stage.started");
        assert_eq!(event.run_id, run_id);
        assert_eq!(event.data.get("stage"), Some(&json!("flight")));
        assert!(event.timestamp.contains('T'));
    }

    #[test]
    fn test_stage_completed_has_duration() {
        let event = PipelineEvent::stage_completed(Uuid::new_v4(), "hotel", 12.5);
        assert_eq!(event.data.get("duration_ms"), Some(&json!(12.5)));
    }

    #[test]
    fn test_add_data() {
        let event = PipelineEvent::new("custom", Uuid::new_v4())
            .add_data("key", json!("value"))
            .add_data("count", json!(2));

        assert_eq!(event.data.len(), 2);
        assert_eq!(event.data.get("count"), Some(&json!(2)));
    }

    #[test]
    fn test_event_serialization_renames_type() {
        let event = PipelineEvent::pipeline_failed(Uuid::new_v4(), "hotel", "boom");
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["type"], "pipeline.failed");
        assert_eq!(value["data"]["stage"], "hotel");
    }
}
