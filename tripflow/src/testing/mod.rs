//! Test doubles for the generation capability.
//!
//! This module provides [`ScriptedGenerator`], an in-memory [`Generator`]
//! that replays canned results and records every request it receives, so
//! tests can assert on prompt construction and call ordering without any
//! network traffic. [`CollectingEventSink`] is re-exported here so event
//! assertions need only this module.
//!
//! [`Generator`]: crate::generator::Generator

mod generators;

pub use generators::ScriptedGenerator;

pub use crate::events::CollectingEventSink;
