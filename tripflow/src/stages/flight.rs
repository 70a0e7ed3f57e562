//! Flight planning stage.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::Stage;
use crate::context::{Traveler, TripContext};

/// Typed output of the flight stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightPlan {
    /// Departure city.
    pub from_city: String,
    /// Destination city.
    pub to_city: String,
    /// Arrival time at the destination.
    pub arrival_time: String,
}

/// Plans the flight leg once a destination is known.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlightStage;

impl Stage for FlightStage {
    type Output = FlightPlan;

    fn name(&self) -> &'static str {
        "flight"
    }

    fn instruction(&self) -> &'static str {
        "Plan a realistic flight itinerary for a trip. Include origin city and arrival time."
    }

    fn response_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "from_city": { "type": "string" },
                "to_city": { "type": "string" },
                "arrival_time": { "type": "string" }
            },
            "required": ["from_city", "to_city", "arrival_time"]
        })
    }

    fn build_prompt(
        &self,
        context: &TripContext,
        traveler: &Traveler,
        _original_input: &str,
    ) -> String {
        format!(
            "Plan a flight from {} to {}.",
            traveler.origin_city,
            context.destination.as_deref().unwrap_or_default()
        )
    }

    fn merge(&self, output: Self::Output, context: &mut TripContext) {
        // to_city is accepted from the capability but never retained; the
        // context already carries the destination.
        context.from_city = Some(output.from_city);
        context.arrival_time = Some(output.arrival_time);
    }
}
