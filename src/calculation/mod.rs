//! Calculation logic for the parking engine.
//!
//! This module contains the cost calculation engine (interval decomposition
//! with capped aggregation per agency class), the mall override resolver,
//! facility scoring and ranking with badge assignment, the recommendation
//! selector, and the coarse ERP estimator.

mod cost;
mod erp;
mod mall;
mod ranking;
mod recommend;
mod scoring;

pub use cost::{compute_cost, peak_window_overlap};
pub use erp::{estimate_erp, ErpConfidence, ErpEstimate};
pub use mall::resolve_mall_override;
pub use ranking::rank_facilities;
pub use recommend::{
    select_recommendation, EVENING_LOOKAHEAD_MINUTES, MALL_MORNING_CUTOFF_HOUR,
};
pub use scoring::{
    score_facility, COST_SCORE_CEILING, DISTANCE_SCORE_CEILING_KM, FREE_TODAY_BLEND,
    FULL_SCORE_LOTS,
};
