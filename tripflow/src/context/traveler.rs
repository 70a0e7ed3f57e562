//! Traveler identity supplied by the caller.

use serde::{Deserialize, Serialize};

/// Immutable identity for one planning request.
///
/// Created once from caller input, read by every stage's prompt builder
/// and passed through to the generation capability for personalization.
/// Never mutated during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traveler {
    /// The traveler's name.
    pub user_name: String,
    /// The city the trip departs from.
    pub origin_city: String,
}

impl Traveler {
    /// Creates a new traveler identity.
    #[must_use]
    pub fn new(user_name: impl Into<String>, origin_city: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            origin_city: origin_city.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traveler_new() {
        let traveler = Traveler::new("Ana", "Boston");
        assert_eq!(traveler.user_name, "Ana");
        assert_eq!(traveler.origin_city, "Boston");
    }

    #[test]
    fn test_traveler_serialization() {
        let traveler = Traveler::new("Ana", "Boston");
        let json = serde_json::to_string(&traveler).unwrap();
        let deserialized: Traveler = serde_json::from_str(&json).unwrap();
        assert_eq!(traveler, deserialized);
    }
}
