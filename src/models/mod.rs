//! Core data models for the parking engine.
//!
//! This module contains all the domain models used throughout the engine.

mod context;
mod cost;
mod facility;
mod recommendation;
mod scored;

pub use context::{
    clamp_duration, Destination, PricingContext, Priority, PriorityWeights,
    MIN_DURATION_HALF_HOURS,
};
pub use cost::{CostResult, RateSource};
pub use facility::{Agency, Coordinate, Facility};
pub use recommendation::Recommendation;
pub use scored::{Badge, ScoredFacility};
