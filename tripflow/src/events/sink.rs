//! Event sink trait and implementations.

use async_trait::async_trait;
use tracing::{debug, info, Level};

use super::PipelineEvent;

/// Trait for sinks that receive pipeline lifecycle events.
///
/// Emission is best-effort: the planner uses [`EventSink::try_emit`] and a
/// sink must never panic or block the run.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Emits an event asynchronously.
    async fn emit(&self, event: PipelineEvent);

    /// Emits an event without blocking.
    ///
    /// Errors are logged or swallowed, never surfaced to the run.
    fn try_emit(&self, event: PipelineEvent);
}

/// A no-op event sink that discards all events.
///
/// Used as the default when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: PipelineEvent) {
        // Intentionally empty - discards all events
    }

    fn try_emit(&self, _event: PipelineEvent) {
        // Intentionally empty - discards all events
    }
}

/// An event sink that logs events using the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    /// The log level to use.
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a new logging event sink with the specified level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    /// Creates an info-level logging sink.
    #[must_use]
    pub fn info() -> Self {
        Self::new(Level::INFO)
    }

    fn log_event(&self, event: &PipelineEvent) {
        match self.level {
            Level::DEBUG => {
                debug!(
                    event_type = %event.event_type,
                    run_id = %event.run_id,
                    event_data = ?event.data,
                    "Event: {}", event.event_type
                );
            }
            _ => {
                info!(
                    event_type = %event.event_type,
                    run_id = %event.run_id,
                    event_data = ?event.data,
                    "Event: {}", event.event_type
                );
            }
        }
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event: PipelineEvent) {
        self.log_event(&event);
    }

    fn try_emit(&self, event: PipelineEvent) {
        self.log_event(&event);
    }
}

/// A collecting event sink for testing purposes.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: parking_lot::RwLock<Vec<PipelineEvent>>,
}

impl CollectingEventSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.read().clone()
    }

    /// Returns the collected event types, in emission order.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        self.events
            .read()
            .iter()
            .map(|event| event.event_type.clone())
            .collect()
    }

    /// Returns events matching a type prefix.
    #[must_use]
    pub fn events_of_type(&self, type_prefix: &str) -> Vec<PipelineEvent> {
        self.events
            .read()
            .iter()
            .filter(|event| event.event_type.starts_with(type_prefix))
            .cloned()
            .collect()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event: PipelineEvent) {
        self.events.write().push(event);
    }

    fn try_emit(&self, event: PipelineEvent) {
        self.events.write().push(event);
    }
}
