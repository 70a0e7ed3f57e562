//! Per-run state for trip planning.
//!
//! This module provides:
//! - The immutable traveler identity captured from caller input
//! - The mutable trip context that accumulates stage results

mod traveler;
mod trip;

pub use traveler::Traveler;
pub use trip::TripContext;
