//! Cost calculation result models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a facility's tariff came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// The agency-class default tariff from the rate catalog.
    AgencyDefault,
    /// A mall-specific tariff entry matched by the override resolver.
    MallOverride,
}

/// The priced outcome of one session at one facility.
///
/// Produced fresh on every calculation — the result depends on the supplied
/// start instant, so it is never cached across requests.
///
/// The night-hours and day-hours components always sum to the billed
/// duration (to two decimal places).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostResult {
    /// The total estimated price for the session, rounded to cents.
    pub cost: Decimal,
    /// The effective headline rate per hour.
    pub rate_per_hour: Decimal,
    /// Human-readable rate description, e.g. `$0.60/30min`.
    pub rate_label: String,
    /// Human-readable cap description, e.g. `$12/day cap`.
    pub cap_label: String,
    /// Whether any relevant cap (day or night) bounded the result.
    pub cap_applied: bool,
    /// Whether the night cap specifically bounded the night sub-total.
    pub night_cap_applied: bool,
    /// Whether the session starts inside the night period.
    pub is_night_rate: bool,
    /// Hours billed outside the night period, rounded to two decimals.
    pub day_hours: Decimal,
    /// Hours billed inside the night period, rounded to two decimals.
    pub night_hours: Decimal,
    /// Whether the free-parking-day discount was applied (fully or partially).
    pub free_day_applied: bool,
    /// Where the tariff that priced this session came from.
    pub rate_source: RateSource,
}
