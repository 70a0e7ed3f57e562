//! # Tripflow
//!
//! A sequential trip-planning pipeline over a structured generation service.
//!
//! Tripflow turns a traveler's free-text preferences into a complete trip
//! plan by chaining four generation stages:
//!
//! - **Destination**: pick a destination from the traveler's preferences
//! - **Flight**: plan the flight to the chosen destination
//! - **Hotel**: recommend a hotel near the arrival airport or city center
//! - **Activities**: suggest activities close to the hotel
//!
//! Each stage prompts the generation service with fields merged by the
//! stages before it, validates the structured response against a typed
//! record, and merges its designated fields into the shared trip context.
//! The first failing stage aborts the run.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tripflow::prelude::*;
//!
//! // Reads GEMINI_API_KEY from the environment
//! let generator = Arc::new(GeminiGenerator::from_env()?);
//! let planner = TripPlanner::new(generator);
//!
//! let traveler = Traveler::new("Ana", "Boston");
//! let context = planner.run("a relaxing beach vacation", &traveler).await?;
//!
//! println!("{:?}", context.destination);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod context;
pub mod errors;
pub mod events;
pub mod generator;
pub mod pipeline;
pub mod stages;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::context::{Traveler, TripContext};
    pub use crate::errors::{GenerationError, GeneratorError};
    pub use crate::events::{
        CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink, PipelineEvent,
    };
    pub use crate::generator::{
        GeminiConfig, GeminiGenerator, GenerationRequest, Generator,
    };
    pub use crate::pipeline::TripPlanner;
    pub use crate::stages::{
        ActivitiesStage, ActivityList, DestinationChoice, DestinationStage, FlightPlan,
        FlightStage, HotelOption, HotelStage, Stage,
    };
}
