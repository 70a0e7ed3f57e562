//! Shared trip context accumulated across stages.

use serde::{Deserialize, Serialize};

/// The mutable accumulator of planning results.
///
/// Every field starts unset. Each stage's merge writes its designated
/// fields exactly once per run, in pipeline order, and no field is read
/// before the stage that writes it has run. The context lives for one
/// planning request; it is returned to the caller on success and dropped
/// on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripContext {
    /// Chosen destination city.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// City the flight departs from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_city: Option<String>,

    /// Arrival time at the destination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<String>,

    /// Recommended hotel name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_name: Option<String>,

    /// Where the hotel is located.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_location: Option<String>,

    /// Hotel price per night in USD.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_price_usd: Option<u32>,

    /// Hotel star rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_stars: Option<u8>,

    /// Suggested activities, in recommendation order.
    #[serde(default)]
    pub activities: Vec<String>,
}

impl TripContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
