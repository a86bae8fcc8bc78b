//! Scored facility and badge models.

use serde::{Deserialize, Serialize};

use super::{Agency, CostResult, Facility, RateSource};

/// A result-set badge.
///
/// At most one badge per facility. The top-ranked facility always carries
/// [`Badge::BestMatch`]; [`Badge::Cheapest`] and [`Badge::Nearest`] go to the
/// minimum-cost and minimum-distance facilities unless that facility is
/// already badged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Badge {
    /// The highest-scoring facility in the result set.
    BestMatch,
    /// The lowest-cost facility in the result set.
    Cheapest,
    /// The closest facility to the destination.
    Nearest,
}

/// One ranked entry in a result set.
///
/// Created once per ranking pass, ordered by score, then handed to the
/// recommendation selector; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredFacility {
    /// The facility this entry describes.
    pub facility: Facility,
    /// The priced session at this facility.
    pub cost: CostResult,
    /// Great-circle distance to the destination in km, two decimals.
    pub distance_km: f64,
    /// Estimated walking time from the facility to the destination.
    pub walk_minutes: u32,
    /// The weighted multi-factor score, 0-100.
    pub score: u32,
    /// The badge assigned after ranking, if any.
    pub badge: Option<Badge>,
    /// Whether the free-parking-day discount applies today.
    pub free_today: bool,
    /// Whether the facility is classified central-area.
    pub is_central: bool,
}

impl ScoredFacility {
    /// Whether this facility is billed under a mall tariff, either by agency
    /// class or through a mall override.
    pub fn is_mall_tariff(&self) -> bool {
        self.facility.agency == Agency::Mall || self.cost.rate_source == RateSource::MallOverride
    }
}
