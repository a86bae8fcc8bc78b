//! Request context models: destination, priority profile and pricing context.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Coordinate;

/// The minimum billable session length, counted in half hours.
///
/// Non-positive durations are clamped up to this unit rather than rejected.
pub const MIN_DURATION_HALF_HOURS: u32 = 1;

/// The search destination: a display name plus a resolved coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    /// The destination name as entered by the user (used for mall matching).
    pub name: String,
    /// The geocoded destination coordinate.
    pub coordinate: Coordinate,
}

/// The ranking priority profile selected by the user.
///
/// A closed enumeration: every variant maps to a fixed weight record, so the
/// full table is validated exhaustively by the compiler instead of relying on
/// a runtime string lookup with a silent default.
///
/// # Example
///
/// ```
/// use parking_engine::models::Priority;
///
/// assert_eq!(Priority::from_key("cheapest"), Priority::Cheapest);
/// // Unknown keys fall back to the balanced profile.
/// assert_eq!(Priority::from_key("fastest"), Priority::Balanced);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Weight cost heaviest.
    Cheapest,
    /// Weight distance heaviest.
    Closest,
    /// Even split between cost and distance, availability close behind.
    Balanced,
    /// Cost-leaning blend of all three factors.
    BestValue,
}

/// The factor weights for one priority profile.
///
/// Weights always sum to 1 within a profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityWeights {
    /// Weight applied to the normalized cost score.
    pub cost: f64,
    /// Weight applied to the normalized distance score.
    pub distance: f64,
    /// Weight applied to the normalized availability score.
    pub availability: f64,
}

impl Priority {
    /// Parses a priority key, falling back to [`Priority::Balanced`] for
    /// anything unrecognized.
    pub fn from_key(key: &str) -> Self {
        match key {
            "cheapest" => Priority::Cheapest,
            "closest" => Priority::Closest,
            "best_value" => Priority::BestValue,
            _ => Priority::Balanced,
        }
    }

    /// The fixed weight record for this profile.
    pub const fn weights(self) -> PriorityWeights {
        match self {
            Priority::Cheapest => PriorityWeights {
                cost: 0.60,
                distance: 0.20,
                availability: 0.20,
            },
            Priority::Closest => PriorityWeights {
                cost: 0.20,
                distance: 0.60,
                availability: 0.20,
            },
            Priority::Balanced => PriorityWeights {
                cost: 0.35,
                distance: 0.35,
                availability: 0.30,
            },
            Priority::BestValue => PriorityWeights {
                cost: 0.45,
                distance: 0.30,
                availability: 0.25,
            },
        }
    }

    /// All priority profiles, for exhaustive validation in tests.
    pub const fn all() -> [Priority; 4] {
        [
            Priority::Cheapest,
            Priority::Closest,
            Priority::Balanced,
            Priority::BestValue,
        ]
    }
}

/// The read-only context for one ranking pass.
///
/// Constructed once per request; every facility in the pass is priced against
/// the same start instant and duration so that free-day and night-cutover
/// decisions stay consistent across the result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingContext {
    /// The search destination.
    pub destination: Destination,
    /// The session start instant.
    pub start: DateTime<Utc>,
    /// The session duration in hours, clamped to the minimum billable unit.
    pub duration_hours: Decimal,
    /// The selected priority profile.
    pub priority: Priority,
    /// The search radius in kilometers.
    pub radius_km: f64,
}

impl PricingContext {
    /// Creates a pricing context, clamping a non-positive duration to the
    /// minimum billable half hour.
    pub fn new(
        destination: Destination,
        start: DateTime<Utc>,
        duration_hours: Decimal,
        priority: Priority,
        radius_km: f64,
    ) -> Self {
        Self {
            destination,
            start,
            duration_hours: clamp_duration(duration_hours),
            priority,
            radius_km,
        }
    }
}

/// Clamps a session duration to the minimum billable unit (half an hour).
pub fn clamp_duration(duration_hours: Decimal) -> Decimal {
    let minimum = Decimal::new(i64::from(MIN_DURATION_HALF_HOURS) * 5, 1);
    if duration_hours <= Decimal::ZERO {
        minimum
    } else {
        duration_hours
    }
}
