//! Facility scoring.
//!
//! Normalizes cost, distance and availability to a 0-100 scale and combines
//! them with the weight record of the selected priority profile. The tuning
//! constants live here, named, so they can be adjusted without touching the
//! calculation logic.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::Priority;

/// A session cost at or above this many dollars scores zero on the cost
/// factor.
pub const COST_SCORE_CEILING: f64 = 30.0;

/// Distances at or beyond this many kilometers score zero on the distance
/// factor.
pub const DISTANCE_SCORE_CEILING_KM: f64 = 2.0;

/// This many available lots (or more) earn the full availability score.
pub const FULL_SCORE_LOTS: f64 = 50.0;

/// How much of a free-today facility's score comes from the flat free bonus
/// versus its zero-cost weighted score.
pub const FREE_TODAY_BLEND: f64 = 0.60;

/// Scores a facility 0-100 for the given priority profile.
///
/// Facilities flagged free-today receive a blended score — a flat bonus
/// plus their score as if the session cost nothing — so free options rank
/// highly without unconditionally outranking everything regardless of
/// distance and availability.
///
/// # Example
///
/// ```
/// use parking_engine::calculation::score_facility;
/// use parking_engine::models::Priority;
/// use rust_decimal::Decimal;
///
/// // Free, adjacent and plentiful is a perfect score.
/// let score = score_facility(Decimal::ZERO, 0.0, 50, false, Priority::Balanced);
/// assert_eq!(score, 100);
/// ```
pub fn score_facility(
    cost: Decimal,
    distance_km: f64,
    available_lots: u32,
    free_today: bool,
    priority: Priority,
) -> u32 {
    if free_today {
        let zero_cost = weighted_score(0.0, distance_km, available_lots, priority);
        return clamp_score(FREE_TODAY_BLEND * 100.0 + (1.0 - FREE_TODAY_BLEND) * zero_cost);
    }
    let cost = cost.to_f64().unwrap_or(COST_SCORE_CEILING);
    clamp_score(weighted_score(cost, distance_km, available_lots, priority))
}

/// The raw weighted score before rounding.
fn weighted_score(cost: f64, distance_km: f64, available_lots: u32, priority: Priority) -> f64 {
    let cost_score = (1.0 - cost / COST_SCORE_CEILING).max(0.0) * 100.0;
    let distance_score = (1.0 - (distance_km / DISTANCE_SCORE_CEILING_KM).min(1.0)) * 100.0;
    let availability_score = (f64::from(available_lots) / FULL_SCORE_LOTS).min(1.0) * 100.0;

    let weights = priority.weights();
    cost_score * weights.cost
        + distance_score * weights.distance
        + availability_score * weights.availability
}

fn clamp_score(score: f64) -> u32 {
    (score.round().max(0.0) as u32).min(100)
}
