//! Pipeline execution.
//!
//! The planner runs the four stages in their fixed order against one trip
//! context and one traveler, deriving each prompt from the fields merged
//! by earlier stages and propagating the first failure.

mod planner;

pub use planner::TripPlanner;
