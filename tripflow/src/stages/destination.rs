//! Destination selection stage.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::Stage;
use crate::context::{Traveler, TripContext};

/// Typed output of the destination stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationChoice {
    /// The chosen destination city.
    pub destination: String,
}

/// Picks a destination from the caller's free-text preferences.
///
/// The only stage whose prompt is the original input, verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct DestinationStage;

impl Stage for DestinationStage {
    type Output = DestinationChoice;

    fn name(&self) -> &'static str {
        "destination"
    }

    fn instruction(&self) -> &'static str {
        "You help users select an ideal travel destination based on their preferences."
    }

    fn response_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "destination": { "type": "string" }
            },
            "required": ["destination"]
        })
    }

    fn build_prompt(
        &self,
        _context: &TripContext,
        _traveler: &Traveler,
        original_input: &str,
    ) -> String {
        original_input.to_string()
    }

    fn merge(&self, output: Self::Output, context: &mut TripContext) {
        context.destination = Some(output.destination);
    }
}
