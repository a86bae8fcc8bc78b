//! Rate catalog types.
//!
//! This module contains the strongly-typed catalog structures that are
//! deserialized from YAML catalog files. The catalog is the single source of
//! truth for all monetary rules and is read-only at run time.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::calendar::DayClass;
use crate::error::{EngineError, EngineResult};
use crate::geo::haversine_km;
use crate::models::Coordinate;

/// Metadata about the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogMetadata {
    /// The human-readable name of the catalog.
    pub name: String,
    /// The catalog version or effective date.
    pub version: String,
    /// The region the catalog covers.
    pub region: String,
}

/// A half-hour tariff with independent day and night caps.
#[derive(Debug, Clone, Deserialize)]
pub struct HalfHourTariff {
    /// The rate per half hour.
    pub per_half_hour: Decimal,
    /// The cap on the day sub-total.
    pub day_cap: Decimal,
    /// The cap on the night sub-total.
    pub night_cap: Decimal,
}

impl HalfHourTariff {
    /// The equivalent per-hour rate.
    pub fn per_hour(&self) -> Decimal {
        self.per_half_hour * Decimal::from(2)
    }
}

/// A flat hourly tariff with a single day cap and no night distinction.
#[derive(Debug, Clone, Deserialize)]
pub struct HourlyTariff {
    /// The rate per hour.
    pub per_hour: Decimal,
    /// The whole-day cap.
    pub day_cap: Decimal,
}

/// The default tariffs per agency class, plus the fixed peak surcharge.
#[derive(Debug, Clone, Deserialize)]
pub struct AgencyTariffs {
    /// The standard agency outside the central area.
    pub standard_non_central: HalfHourTariff,
    /// The standard agency inside the central area (business-hours premium).
    pub standard_central: HalfHourTariff,
    /// The premium flat agency, central or not.
    pub premium_flat: HalfHourTariff,
    /// The mall agency's flat hourly tariff.
    pub mall_flat: HourlyTariff,
    /// The fixed per-hour premium added for peak-window hours.
    pub peak_surcharge_per_hour: Decimal,
}

/// A rough geographic bounding box.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoBounds {
    /// Minimum latitude.
    pub min_lat: f64,
    /// Maximum latitude.
    pub max_lat: f64,
    /// Minimum longitude.
    pub min_lng: f64,
    /// Maximum longitude.
    pub max_lng: f64,
}

impl GeoBounds {
    /// Whether the coordinate lies inside the box.
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        coordinate.lat >= self.min_lat
            && coordinate.lat <= self.max_lat
            && coordinate.lng >= self.min_lng
            && coordinate.lng <= self.max_lng
    }
}

/// The central-area classification rules.
///
/// A facility is central when it appears in the contractual identifier set,
/// carries a central area tag, or sits inside the central bounding box.
#[derive(Debug, Clone, Deserialize)]
pub struct CentralZones {
    /// Facility identifiers that are contractually central-area regardless
    /// of geography.
    pub carpark_ids: HashSet<String>,
    /// Upstream area tags that imply the central area.
    pub area_tags: HashSet<String>,
    /// The rough central-area bounding box.
    pub bounds: GeoBounds,
}

impl CentralZones {
    /// Classifies a facility as central-area or not.
    pub fn is_central(&self, facility_id: &str, area: &str, coordinate: Coordinate) -> bool {
        if self.carpark_ids.contains(facility_id) {
            return true;
        }
        if !area.is_empty() && self.area_tags.contains(area) {
            return true;
        }
        self.bounds.contains(coordinate)
    }
}

/// One facility-specific peak surcharge period.
#[derive(Debug, Clone, Deserialize)]
pub struct PeakWindow {
    /// Which days of the week the period recurs on.
    pub days: DayClass,
    /// The start of the period, whole local hour.
    pub start_hour: u32,
    /// The end of the period, whole local hour.
    pub end_hour: u32,
}

/// A circular geofence around a mall.
#[derive(Debug, Clone, Deserialize)]
pub struct Geofence {
    /// Latitude of the geofence center.
    pub lat: f64,
    /// Longitude of the geofence center.
    pub lng: f64,
    /// Radius in kilometers.
    pub radius_km: f64,
}

impl Geofence {
    /// Whether the coordinate falls within the geofence radius.
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        haversine_km(Coordinate::new(self.lat, self.lng), coordinate) <= self.radius_km
    }
}

/// A day-window rate band of a mall tariff: first hour, then per half hour.
#[derive(Debug, Clone, Deserialize)]
pub struct MallDayBand {
    /// The charge for the first hour.
    pub first_hour: Decimal,
    /// The charge per additional half hour (rounded up).
    pub per_half_hour: Decimal,
    /// Start of this band's day window, whole local hour.
    pub window_start_hour: u32,
    /// End of this band's day window, whole local hour.
    pub window_end_hour: u32,
}

/// The night rate band of a mall tariff.
#[derive(Debug, Clone, Deserialize)]
pub struct MallNightBand {
    /// The charge for the first hour.
    pub first_hour: Decimal,
    /// The charge per additional half hour (rounded up).
    pub per_half_hour: Decimal,
}

/// A mall-specific tariff entry that overrides the agency default.
///
/// Matching is deterministic first-match-in-catalog-order; entries earlier in
/// the file win when aliases are ambiguous.
#[derive(Debug, Clone, Deserialize)]
pub struct MallTariff {
    /// A stable key for the entry.
    pub key: String,
    /// The label shown in place of a cap description.
    pub label: String,
    /// Aliases matched (normalized) against facility id, name and area, and
    /// against the destination name for geofence matches.
    pub aliases: Vec<String>,
    /// Optional geofence enabling coordinate-based matching.
    #[serde(default)]
    pub geofence: Option<Geofence>,
    /// The Monday-Friday band.
    pub weekday: MallDayBand,
    /// The Saturday/Sunday/public-holiday band.
    pub weekend_or_holiday: MallDayBand,
    /// The night band, applied outside the day windows.
    pub night: MallNightBand,
}

/// The complete rate catalog.
///
/// Aggregates agency tariffs, central-area rules, peak windows, the free-day
/// scheme and mall tariff entries. Construction validates the catalog and
/// fails loudly so a broken catalog never goes into service.
#[derive(Debug, Clone)]
pub struct RateCatalog {
    metadata: CatalogMetadata,
    agencies: AgencyTariffs,
    central: CentralZones,
    peaks: HashMap<String, Vec<PeakWindow>>,
    free_day_carparks: HashSet<String>,
    malls: Vec<MallTariff>,
}

impl RateCatalog {
    /// Creates a catalog from its component parts, validating every entry.
    pub fn new(
        metadata: CatalogMetadata,
        agencies: AgencyTariffs,
        central: CentralZones,
        peaks: HashMap<String, Vec<PeakWindow>>,
        free_day_carparks: HashSet<String>,
        malls: Vec<MallTariff>,
    ) -> EngineResult<Self> {
        validate_agencies(&agencies)?;
        validate_peaks(&peaks)?;
        for mall in &malls {
            validate_mall(mall)?;
        }
        Ok(Self {
            metadata,
            agencies,
            central,
            peaks,
            free_day_carparks,
            malls,
        })
    }

    /// Returns the catalog metadata.
    pub fn metadata(&self) -> &CatalogMetadata {
        &self.metadata
    }

    /// Returns the agency tariff table.
    pub fn agencies(&self) -> &AgencyTariffs {
        &self.agencies
    }

    /// Returns the central-area classification rules.
    pub fn central(&self) -> &CentralZones {
        &self.central
    }

    /// Returns the peak windows for a facility, empty when none are defined.
    pub fn peak_windows(&self, facility_id: &str) -> &[PeakWindow] {
        self.peaks
            .get(facility_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether a facility participates in the free-parking-day scheme.
    pub fn is_free_day_eligible(&self, facility_id: &str) -> bool {
        self.free_day_carparks.contains(facility_id)
    }

    /// Returns the mall tariff entries in catalog order.
    pub fn malls(&self) -> &[MallTariff] {
        &self.malls
    }
}

fn validate_agencies(agencies: &AgencyTariffs) -> EngineResult<()> {
    let half_hour_tariffs = [
        ("agencies/standard_non_central", &agencies.standard_non_central),
        ("agencies/standard_central", &agencies.standard_central),
        ("agencies/premium_flat", &agencies.premium_flat),
    ];
    for (entry, tariff) in half_hour_tariffs {
        if tariff.per_half_hour <= Decimal::ZERO {
            return Err(invalid(entry, "per_half_hour must be positive"));
        }
        if tariff.day_cap <= Decimal::ZERO || tariff.night_cap <= Decimal::ZERO {
            return Err(invalid(entry, "caps must be positive"));
        }
    }
    if agencies.mall_flat.per_hour <= Decimal::ZERO || agencies.mall_flat.day_cap <= Decimal::ZERO {
        return Err(invalid("agencies/mall_flat", "rates and caps must be positive"));
    }
    if agencies.peak_surcharge_per_hour < Decimal::ZERO {
        return Err(invalid(
            "agencies/peak_surcharge_per_hour",
            "surcharge must not be negative",
        ));
    }
    Ok(())
}

fn validate_peaks(peaks: &HashMap<String, Vec<PeakWindow>>) -> EngineResult<()> {
    for (facility_id, windows) in peaks {
        for window in windows {
            let entry = format!("peak_windows/{}", facility_id);
            if window.start_hour >= window.end_hour {
                return Err(invalid(&entry, "start_hour must precede end_hour"));
            }
            // Peak hours must never overlap the 22:30-07:00 night period,
            // so the surcharge can be added without double application.
            if window.start_hour < 7 || window.end_hour > 22 {
                return Err(invalid(&entry, "peak windows must lie within 07:00-22:00"));
            }
        }
    }
    Ok(())
}

fn validate_mall(mall: &MallTariff) -> EngineResult<()> {
    let entry = format!("malls/{}", mall.key);
    if mall.aliases.iter().all(|a| a.trim().is_empty()) {
        return Err(invalid(&entry, "aliases must not be empty"));
    }
    for band in [&mall.weekday, &mall.weekend_or_holiday] {
        if band.window_start_hour >= band.window_end_hour {
            return Err(invalid(&entry, "day window start must precede its end"));
        }
        if band.window_end_hour > 24 {
            return Err(invalid(&entry, "day window end must be within the day"));
        }
        if band.first_hour < Decimal::ZERO || band.per_half_hour < Decimal::ZERO {
            return Err(invalid(&entry, "band rates must not be negative"));
        }
    }
    if mall.night.first_hour < Decimal::ZERO || mall.night.per_half_hour < Decimal::ZERO {
        return Err(invalid(&entry, "night band rates must not be negative"));
    }
    if let Some(geofence) = &mall.geofence {
        if geofence.radius_km <= 0.0 {
            return Err(invalid(&entry, "geofence radius must be positive"));
        }
    }
    Ok(())
}

fn invalid(entry: &str, message: &str) -> EngineError {
    EngineError::CatalogInvalid {
        entry: entry.to_string(),
        message: message.to_string(),
    }
}
