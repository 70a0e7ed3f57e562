//! Activity suggestion stage.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::Stage;
use crate::context::{Traveler, TripContext};

/// Typed output of the activities stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityList {
    /// Who the suggestions were personalized for.
    pub personalized_for: String,
    /// Suggested activities, best first.
    pub top_activities: Vec<String>,
}

/// Suggests activities near the recommended hotel.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivitiesStage;

impl Stage for ActivitiesStage {
    type Output = ActivityList;

    fn name(&self) -> &'static str {
        "activities"
    }

    fn instruction(&self) -> &'static str {
        "Suggest local activities close to the hotel and suitable for arrival time \
         (e.g., evening, morning)."
    }

    fn response_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "personalized_for": { "type": "string" },
                "top_activities": {
                    "type": "array",
                    "items": { "type": "string" }
                }
            },
            "required": ["personalized_for", "top_activities"]
        })
    }

    fn build_prompt(
        &self,
        context: &TripContext,
        _traveler: &Traveler,
        _original_input: &str,
    ) -> String {
        format!(
            "Suggest activities in {} close to {} and suitable for a traveler arriving at {}.",
            context.destination.as_deref().unwrap_or_default(),
            context.hotel_location.as_deref().unwrap_or_default(),
            context.arrival_time.as_deref().unwrap_or_default()
        )
    }

    fn merge(&self, output: Self::Output, context: &mut TripContext) {
        // personalized_for is reported but has no context slot.
        context.activities = output.top_activities;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_references_hotel_location() {
        let context = TripContext {
            destination: Some("Cancun".to_string()),
            arrival_time: Some("2025-03-01T14:00".to_string()),
            hotel_location: Some("Cancun Beachfront".to_string()),
            ..Default::default()
        };
        let prompt =
            ActivitiesStage.build_prompt(&context, &Traveler::new("Ana", "Boston"), "anything");

        assert_eq!(
            prompt,
            "Suggest activities in Cancun close to Cancun Beachfront \
             and suitable for a traveler arriving at 2025-03-01T14:00."
        );
    }

    #[test]
    fn test_merge_replaces_activities() {
        let mut context = TripContext::new();
        ActivitiesStage.merge(
            ActivityList {
                personalized_for: "Ana".to_string(),
                top_activities: vec!["snorkeling".to_string(), "sunset cruise".to_string()],
            },
            &mut context,
        );

        assert_eq!(context.activities, vec!["snorkeling", "sunset cruise"]);
    }

    #[test]
    fn test_schema_describes_string_array() {
        let schema = ActivitiesStage.response_schema();
        assert_eq!(schema["properties"]["top_activities"]["type"], "array");
        assert_eq!(
            schema["properties"]["top_activities"]["items"]["type"],
            "string"
        );
    }
}
