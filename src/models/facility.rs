//! Facility and coordinate models.
//!
//! A facility is an immutable per-request snapshot of one carpark as
//! reported by the availability feed. The engine never mutates it.

use serde::{Deserialize, Serialize};

/// The operating agency class of a facility.
///
/// Determines which tariff family applies: half-hour billing with day and
/// night caps ([`Agency::Standard`], [`Agency::PremiumFlat`]) or flat hourly
/// billing with a single day cap ([`Agency::Mall`]).
///
/// # Example
///
/// ```
/// use parking_engine::models::Agency;
///
/// assert_eq!(Agency::from_code("HDB"), Agency::Standard);
/// assert_eq!(Agency::from_code("URA"), Agency::PremiumFlat);
/// assert_eq!(Agency::from_code("LTA"), Agency::Mall);
/// // Unknown agencies fall back to the non-central flat-rate class.
/// assert_eq!(Agency::from_code("JTC"), Agency::Standard);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Agency {
    /// Half-hour billing, non-central or central rate, day and night caps (HDB).
    Standard,
    /// Half-hour billing at the premium flat rate, day and night caps (URA).
    PremiumFlat,
    /// Flat hourly billing with a single day cap, typically malls (LTA).
    Mall,
}

impl Agency {
    /// Maps an upstream agency code to its tariff class.
    ///
    /// Unknown codes fall back to [`Agency::Standard`] so that an unexpected
    /// upstream value degrades to the non-central flat-rate class instead of
    /// failing the request.
    pub fn from_code(code: &str) -> Self {
        match code {
            "URA" => Agency::PremiumFlat,
            "LTA" => Agency::Mall,
            _ => Agency::Standard,
        }
    }

    /// The upstream code for this agency class.
    pub fn code(&self) -> &'static str {
        match self {
            Agency::Standard => "HDB",
            Agency::PremiumFlat => "URA",
            Agency::Mall => "LTA",
        }
    }
}

impl std::fmt::Display for Agency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A parking facility candidate.
///
/// Sourced from the availability feed and immutable for the lifetime of a
/// ranking pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    /// The upstream facility identifier.
    pub id: String,
    /// The display name of the facility.
    pub name: String,
    /// The operating agency class.
    pub agency: Agency,
    /// The facility's location.
    pub coordinate: Coordinate,
    /// The live count of available passenger-car lots.
    pub available_lots: u32,
    /// The upstream area tag, empty when the feed reports none.
    pub area: String,
}
