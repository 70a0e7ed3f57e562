//! Hotel recommendation stage.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::Stage;
use crate::context::{Traveler, TripContext};

/// Typed output of the hotel stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelOption {
    /// Hotel name.
    pub name: String,
    /// Where the hotel is located.
    pub location: String,
    /// Price per night in USD.
    pub price_per_night_usd: u32,
    /// Star rating.
    pub stars: u8,
}

/// Recommends a hotel once the arrival time is known.
#[derive(Debug, Clone, Copy, Default)]
pub struct HotelStage;

impl Stage for HotelStage {
    type Output = HotelOption;

    fn name(&self) -> &'static str {
        "hotel"
    }

    fn instruction(&self) -> &'static str {
        "Suggest a good hotel near the arrival airport or city center. \
         Consider time of arrival and convenience."
    }

    fn response_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "location": { "type": "string" },
                "price_per_night_usd": { "type": "integer" },
                "stars": { "type": "integer" }
            },
            "required": ["name", "location", "price_per_night_usd", "stars"]
        })
    }

    fn build_prompt(
        &self,
        context: &TripContext,
        _traveler: &Traveler,
        _original_input: &str,
    ) -> String {
        format!(
            "Recommend a hotel in {} for a traveler arriving at {}. \
             Prefer locations near the airport or city center.",
            context.destination.as_deref().unwrap_or_default(),
            context.arrival_time.as_deref().unwrap_or_default()
        )
    }

    fn merge(&self, output: Self::Output, context: &mut TripContext) {
        context.hotel_name = Some(output.name);
        context.hotel_location = Some(output.location);
        context.hotel_price_usd = Some(output.price_per_night_usd);
        context.hotel_stars = Some(output.stars);
    }
}
