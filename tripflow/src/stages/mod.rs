//! Trip planning stages.
//!
//! A stage binds a typed response record, a fixed instruction, and a
//! prompt builder over the shared context. Stages never write the context
//! themselves: the planner validates the generated output against
//! [`Stage::Output`] and then drives the stage's merge.

mod activities;
mod destination;
mod flight;
mod hotel;

pub use activities::{ActivitiesStage, ActivityList};
pub use destination::{DestinationChoice, DestinationStage};
pub use flight::{FlightPlan, FlightStage};
pub use hotel::{HotelOption, HotelStage};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::context::{Traveler, TripContext};

/// One unit of the planning pipeline.
///
/// Implementations pair a response record with the prompt and instruction
/// that elicit it. `build_prompt` is pure: it reads only the context
/// fields written by earlier stages, the traveler identity, and (for the
/// first stage) the caller's free-text input. An unset predecessor field
/// is embedded as empty text rather than rejected; the fixed stage order
/// makes that unreachable in practice.
pub trait Stage: Send + Sync {
    /// The typed record the generation capability must produce.
    type Output: DeserializeOwned;

    /// Returns the stage name used in errors and events.
    fn name(&self) -> &'static str;

    /// Returns the fixed task guidance sent with every request.
    fn instruction(&self) -> &'static str;

    /// Returns the JSON schema for [`Self::Output`].
    fn response_schema(&self) -> Value;

    /// Builds the request prompt from the current context.
    fn build_prompt(
        &self,
        context: &TripContext,
        traveler: &Traveler,
        original_input: &str,
    ) -> String;

    /// Writes this stage's fields of `output` into the context.
    fn merge(&self, output: Self::Output, context: &mut TripContext);
}
