//! Mall tariff override resolution.
//!
//! Some facilities publish their own rate schedules that replace the agency
//! default. This module matches a facility against the catalog's mall
//! entries and prices the session with the matched entry's rate bands.
//!
//! Matching is deterministic first-match-in-catalog-order. Alias substring
//! matching is inherently ambiguous (two malls can share a word), so the
//! order of entries in the catalog is part of the pricing contract.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use rust_decimal::Decimal;

use crate::calendar::{in_night_period, to_sgt, HolidayCalendar};
use crate::catalog::{MallTariff, RateCatalog};
use crate::models::{clamp_duration, CostResult, Facility, RateSource};

use super::cost::round2;

/// Attempts to price a session with a mall-specific tariff.
///
/// A facility matches an entry when:
/// 1. any normalized alias is a substring of the facility's id, name or
///    area tag, OR
/// 2. the entry declares a geofence, the facility's coordinate falls inside
///    it, and the destination name carries one of the aliases.
///
/// Returns `None` when no entry matches, in which case the caller falls
/// through to the agency default tariff.
///
/// Band selection: a start inside the night period (or outside the selected
/// band's configured day window) uses the night band; otherwise the weekday
/// or weekend-or-holiday band applies. The charge is the band's first-hour
/// rate plus the per-half-hour rate for each started half hour beyond the
/// first.
pub fn resolve_mall_override(
    facility: &Facility,
    destination_name: &str,
    duration_hours: Decimal,
    start: DateTime<Utc>,
    catalog: &RateCatalog,
    holidays: &HolidayCalendar,
) -> Option<CostResult> {
    let entry = match_entry(facility, destination_name, catalog)?;
    Some(price_session(
        entry,
        clamp_duration(duration_hours),
        start,
        holidays,
    ))
}

/// Finds the first matching mall entry in catalog order.
fn match_entry<'a>(
    facility: &Facility,
    destination_name: &str,
    catalog: &'a RateCatalog,
) -> Option<&'a MallTariff> {
    let id = normalize(&facility.id);
    let name = normalize(&facility.name);
    let area = normalize(&facility.area);
    let destination = normalize(destination_name);

    catalog.malls().iter().find(|entry| {
        let alias_match = entry.aliases.iter().any(|alias| {
            let alias = normalize(alias);
            !alias.is_empty()
                && (id.contains(&alias) || name.contains(&alias) || area.contains(&alias))
        });
        if alias_match {
            return true;
        }

        match &entry.geofence {
            Some(fence) if fence.contains(facility.coordinate) => {
                entry.aliases.iter().any(|alias| {
                    let alias = normalize(alias);
                    !alias.is_empty() && destination.contains(&alias)
                })
            }
            _ => false,
        }
    })
}

/// Lowercases and strips everything but ASCII alphanumerics.
fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Prices a session with the entry's band for the start instant.
fn price_session(
    entry: &MallTariff,
    duration: Decimal,
    start: DateTime<Utc>,
    holidays: &HolidayCalendar,
) -> CostResult {
    let local = to_sgt(start);

    let (first_hour, per_half_hour, is_night) = if in_night_period(start) {
        (entry.night.first_hour, entry.night.per_half_hour, true)
    } else {
        let weekend_or_holiday = matches!(local.weekday(), Weekday::Sat | Weekday::Sun)
            || holidays.is_public_holiday(local.date_naive());
        let band = if weekend_or_holiday {
            &entry.weekend_or_holiday
        } else {
            &entry.weekday
        };

        let minute = local.hour() * 60 + local.minute();
        if minute >= band.window_start_hour * 60 && minute < band.window_end_hour * 60 {
            (band.first_hour, band.per_half_hour, false)
        } else {
            // Outside the band's day window but before the 22:30 cutover:
            // the night band still applies.
            (entry.night.first_hour, entry.night.per_half_hour, true)
        }
    };

    let cost = if duration <= Decimal::ONE {
        first_hour
    } else {
        first_hour + extra_half_hours(duration) * per_half_hour
    };

    CostResult {
        cost: round2(cost),
        rate_per_hour: per_half_hour * Decimal::from(2),
        rate_label: format!("${} first hr, ${}/30min", first_hour, per_half_hour),
        cap_label: entry.label.clone(),
        cap_applied: false,
        night_cap_applied: false,
        is_night_rate: is_night,
        day_hours: round2(duration),
        night_hours: Decimal::ZERO,
        free_day_applied: false,
        rate_source: RateSource::MallOverride,
    }
}

/// Started half hours beyond the first hour.
fn extra_half_hours(duration: Decimal) -> Decimal {
    ((duration - Decimal::ONE) * Decimal::from(2)).ceil()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        AgencyTariffs, CatalogMetadata, CentralZones, GeoBounds, Geofence, HalfHourTariff,
        HourlyTariff, MallDayBand, MallNightBand,
    };
    use crate::models::{Agency, Coordinate};
    use chrono::NaiveDateTime;
    use std::collections::{HashMap, HashSet};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sgt(date: &str, time: &str) -> DateTime<Utc> {
        crate::calendar::sgt_datetime(
            NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M:%S")
                .unwrap(),
        )
    }

    fn day_band(first: &str, half: &str) -> MallDayBand {
        MallDayBand {
            first_hour: dec(first),
            per_half_hour: dec(half),
            window_start_hour: 7,
            window_end_hour: 22,
        }
    }

    fn jurong_point() -> MallTariff {
        MallTariff {
            key: "jurong_point".to_string(),
            label: "Jurong Point published rates".to_string(),
            aliases: vec![
                "jurongpoint".to_string(),
                "jp1".to_string(),
                "jp2".to_string(),
            ],
            geofence: None,
            weekday: day_band("1.50", "0.75"),
            weekend_or_holiday: day_band("1.80", "0.90"),
            night: MallNightBand {
                first_hour: dec("1.20"),
                per_half_hour: dec("0.60"),
            },
        }
    }

    fn vivocity() -> MallTariff {
        MallTariff {
            key: "vivocity".to_string(),
            label: "VivoCity published rates".to_string(),
            aliases: vec!["vivocity".to_string(), "vivo city".to_string()],
            geofence: Some(Geofence {
                lat: 1.2644,
                lng: 103.8222,
                radius_km: 0.45,
            }),
            weekday: day_band("2.40", "1.20"),
            weekend_or_holiday: day_band("2.40", "1.20"),
            night: MallNightBand {
                first_hour: dec("1.20"),
                per_half_hour: dec("0.60"),
            },
        }
    }

    fn test_catalog() -> RateCatalog {
        RateCatalog::new(
            CatalogMetadata {
                name: "Test tariffs".to_string(),
                version: "test".to_string(),
                region: "SG".to_string(),
            },
            AgencyTariffs {
                standard_non_central: HalfHourTariff {
                    per_half_hour: dec("0.60"),
                    day_cap: dec("12"),
                    night_cap: dec("5"),
                },
                standard_central: HalfHourTariff {
                    per_half_hour: dec("1.20"),
                    day_cap: dec("20"),
                    night_cap: dec("5"),
                },
                premium_flat: HalfHourTariff {
                    per_half_hour: dec("1.20"),
                    day_cap: dec("20"),
                    night_cap: dec("5"),
                },
                mall_flat: HourlyTariff {
                    per_hour: dec("3.00"),
                    day_cap: dec("30"),
                },
                peak_surcharge_per_hour: dec("2.00"),
            },
            CentralZones {
                carpark_ids: HashSet::new(),
                area_tags: HashSet::new(),
                bounds: GeoBounds {
                    min_lat: 1.27,
                    max_lat: 1.31,
                    min_lng: 103.82,
                    max_lng: 103.87,
                },
            },
            HashMap::new(),
            HashSet::new(),
            vec![jurong_point(), vivocity()],
        )
        .unwrap()
    }

    fn holidays() -> HolidayCalendar {
        HolidayCalendar::new(vec![chrono::NaiveDate::from_ymd_opt(2026, 2, 17).unwrap()])
    }

    fn facility(id: &str, name: &str, coordinate: Coordinate) -> Facility {
        Facility {
            id: id.to_string(),
            name: name.to_string(),
            agency: Agency::Mall,
            coordinate,
            available_lots: 50,
            area: String::new(),
        }
    }

    // ==========================================================================
    // MALL-001: alias substring match on the facility name, weekday band
    // 2h on Monday 10:00: $1.50 first hour + 2 half hours x $0.75 = $3.00
    // ==========================================================================
    #[test]
    fn test_mall_001_alias_match_weekday_band() {
        let catalog = test_catalog();
        let f = facility(
            "J55",
            "Jurong Point Shopping Centre",
            Coordinate::new(1.3397, 103.7067),
        );

        let result = resolve_mall_override(
            &f,
            "",
            dec("2"),
            sgt("2026-01-12", "10:00:00"),
            &catalog,
            &holidays(),
        )
        .unwrap();

        assert_eq!(result.cost, dec("3.00"));
        assert_eq!(result.rate_label, "$1.50 first hr, $0.75/30min");
        assert_eq!(result.cap_label, "Jurong Point published rates");
        assert_eq!(result.rate_source, RateSource::MallOverride);
        assert!(!result.is_night_rate);
    }

    // ==========================================================================
    // MALL-002: alias match on the facility id
    // ==========================================================================
    #[test]
    fn test_mall_002_alias_match_on_id() {
        let catalog = test_catalog();
        let f = facility("JP1", "Carpark JP1", Coordinate::new(1.3397, 103.7067));

        let result = resolve_mall_override(
            &f,
            "",
            dec("1"),
            sgt("2026-01-12", "10:00:00"),
            &catalog,
            &holidays(),
        )
        .unwrap();
        assert_eq!(result.cost, dec("1.50"));
    }

    // ==========================================================================
    // MALL-003: weekend band on Saturday
    // 2.25h: $1.80 + ceil(2.5) x $0.90 = $4.50
    // ==========================================================================
    #[test]
    fn test_mall_003_weekend_band_rounds_half_hours_up() {
        let catalog = test_catalog();
        let f = facility(
            "J55",
            "Jurong Point",
            Coordinate::new(1.3397, 103.7067),
        );

        // 2026-01-17 is a Saturday.
        let result = resolve_mall_override(
            &f,
            "",
            dec("2.25"),
            sgt("2026-01-17", "10:00:00"),
            &catalog,
            &holidays(),
        )
        .unwrap();

        assert_eq!(result.cost, dec("4.50"));
    }

    // ==========================================================================
    // MALL-004: a public holiday uses the weekend band
    // ==========================================================================
    #[test]
    fn test_mall_004_holiday_uses_weekend_band() {
        let catalog = test_catalog();
        let f = facility("J55", "Jurong Point", Coordinate::new(1.3397, 103.7067));

        // 2026-02-17 is a Tuesday, designated a holiday in the test calendar.
        let result = resolve_mall_override(
            &f,
            "",
            dec("1"),
            sgt("2026-02-17", "10:00:00"),
            &catalog,
            &holidays(),
        )
        .unwrap();
        assert_eq!(result.cost, dec("1.80"));
    }

    // ==========================================================================
    // MALL-005: the night period takes precedence over the day bands
    // ==========================================================================
    #[test]
    fn test_mall_005_night_band_after_cutover() {
        let catalog = test_catalog();
        let f = facility("J55", "Jurong Point", Coordinate::new(1.3397, 103.7067));

        let result = resolve_mall_override(
            &f,
            "",
            dec("2"),
            sgt("2026-01-12", "23:00:00"),
            &catalog,
            &holidays(),
        )
        .unwrap();

        assert_eq!(result.cost, dec("2.40"));
        assert!(result.is_night_rate);
    }

    // ==========================================================================
    // MALL-006: a start past the day window but before the cutover also
    // falls to the night band
    // ==========================================================================
    #[test]
    fn test_mall_006_night_band_outside_day_window() {
        let catalog = test_catalog();
        let f = facility("J55", "Jurong Point", Coordinate::new(1.3397, 103.7067));

        // 22:10 is past the 22:00 day window but before the 22:30 cutover.
        let result = resolve_mall_override(
            &f,
            "",
            dec("1"),
            sgt("2026-01-12", "22:10:00"),
            &catalog,
            &holidays(),
        )
        .unwrap();

        assert_eq!(result.cost, dec("1.20"));
        assert!(result.is_night_rate);
    }

    // ==========================================================================
    // MALL-007: geofence plus destination alias matches a facility whose
    // own name matches nothing
    // ==========================================================================
    #[test]
    fn test_mall_007_geofence_with_destination_match() {
        let catalog = test_catalog();
        let f = facility("HBF1", "HarbourFront Off-Street", Coordinate::new(1.2650, 103.8225));

        let result = resolve_mall_override(
            &f,
            "VivoCity",
            dec("2"),
            sgt("2026-01-12", "10:00:00"),
            &catalog,
            &holidays(),
        );
        assert!(result.is_some());
        assert_eq!(result.unwrap().cap_label, "VivoCity published rates");
    }

    // ==========================================================================
    // MALL-008: geofence without a destination alias does not match
    // ==========================================================================
    #[test]
    fn test_mall_008_geofence_needs_destination_alias() {
        let catalog = test_catalog();
        let f = facility("HBF1", "HarbourFront Off-Street", Coordinate::new(1.2650, 103.8225));

        let result = resolve_mall_override(
            &f,
            "Sentosa Boardwalk",
            dec("2"),
            sgt("2026-01-12", "10:00:00"),
            &catalog,
            &holidays(),
        );
        assert!(result.is_none());
    }

    // ==========================================================================
    // MALL-009: no match falls through to the agency default
    // ==========================================================================
    #[test]
    fn test_mall_009_no_match_returns_none() {
        let catalog = test_catalog();
        let f = facility("ACB", "Ang Mo Kio Block 21", Coordinate::new(1.3691, 103.8454));

        let result = resolve_mall_override(
            &f,
            "Ang Mo Kio Hub",
            dec("2"),
            sgt("2026-01-12", "10:00:00"),
            &catalog,
            &holidays(),
        );
        assert!(result.is_none());
    }

    // ==========================================================================
    // MALL-010: first entry in catalog order wins
    // ==========================================================================
    #[test]
    fn test_mall_010_first_match_wins() {
        // A facility matching both entries resolves to the first one.
        let catalog = test_catalog();
        let f = facility(
            "JP1",
            "Jurong Point VivoCity Shuttle Carpark",
            Coordinate::new(1.2650, 103.8225),
        );

        let result = resolve_mall_override(
            &f,
            "VivoCity",
            dec("1"),
            sgt("2026-01-12", "10:00:00"),
            &catalog,
            &holidays(),
        )
        .unwrap();
        assert_eq!(result.cap_label, "Jurong Point published rates");
    }

    #[test]
    fn test_normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("Jurong Point!"), "jurongpoint");
        assert_eq!(normalize("JP-1"), "jp1");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_first_hour_only_for_short_sessions() {
        let catalog = test_catalog();
        let f = facility("JP1", "Carpark JP1", Coordinate::new(1.3397, 103.7067));

        let result = resolve_mall_override(
            &f,
            "",
            dec("0.5"),
            sgt("2026-01-12", "10:00:00"),
            &catalog,
            &holidays(),
        )
        .unwrap();
        assert_eq!(result.cost, dec("1.50"));
    }

    #[test]
    fn test_mall_duration_clamped() {
        let catalog = test_catalog();
        let f = facility("JP1", "Carpark JP1", Coordinate::new(1.3397, 103.7067));

        let result = resolve_mall_override(
            &f,
            "",
            dec("0"),
            sgt("2026-01-12", "10:00:00"),
            &catalog,
            &holidays(),
        )
        .unwrap();
        assert_eq!(result.day_hours, dec("0.50"));
        assert_eq!(result.cost, dec("1.50"));
    }
}
