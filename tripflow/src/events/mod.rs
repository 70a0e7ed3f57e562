//! Observability for pipeline runs.
//!
//! The planner emits best-effort lifecycle events through an [`EventSink`]:
//! `pipeline.started`, `stage.started`, `stage.completed`, `stage.failed`,
//! `pipeline.completed` and `pipeline.failed`. A failing or slow sink never
//! fails the run.

mod event;
mod sink;

pub use event::PipelineEvent;
pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
