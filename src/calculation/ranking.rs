//! Facility ranking.
//!
//! Turns the raw availability snapshot into a scored, badge-annotated result
//! set: filter out ineligible records, price every candidate (mall override
//! first, agency default otherwise), score, sort and assign badges.

use crate::availability::RawFacilityRecord;
use crate::calendar::HolidayCalendar;
use crate::catalog::RateCatalog;
use crate::geo::{haversine_km, round_km, walk_minutes};
use crate::models::{Badge, Facility, PricingContext, ScoredFacility};

use super::cost::compute_cost;
use super::mall::resolve_mall_override;
use super::scoring::score_facility;

/// Ranks the raw facility records for one request.
///
/// * Records that are not passenger-car lots, carry an unparsable or zero
///   coordinate, or lie outside the search radius are silently dropped.
/// * Each surviving facility is priced with its mall override when one
///   matches, falling through to the agency default tariff.
/// * Results are sorted by score descending; the sort is stable, so equal
///   scores preserve input order.
/// * The top facility gets [`Badge::BestMatch`]; the first minimum-cost and
///   minimum-distance facilities get [`Badge::Cheapest`] / [`Badge::Nearest`]
///   unless already badged.
pub fn rank_facilities(
    records: &[RawFacilityRecord],
    ctx: &PricingContext,
    catalog: &RateCatalog,
    holidays: &HolidayCalendar,
) -> Vec<ScoredFacility> {
    let mut scored: Vec<ScoredFacility> = Vec::new();

    for record in records {
        if !record.is_passenger_lot() {
            continue;
        }
        let Some(coordinate) = record.coordinate() else {
            continue;
        };

        let distance_km = haversine_km(coordinate, ctx.destination.coordinate);
        if distance_km > ctx.radius_km {
            continue;
        }

        let facility = Facility {
            id: record.carpark_id.clone(),
            name: record.display_name(),
            agency: record.agency_class(),
            coordinate,
            available_lots: record.lots(),
            area: record.area.clone(),
        };
        let is_central =
            catalog
                .central()
                .is_central(&facility.id, &facility.area, facility.coordinate);

        let cost = resolve_mall_override(
            &facility,
            &ctx.destination.name,
            ctx.duration_hours,
            ctx.start,
            catalog,
            holidays,
        )
        .unwrap_or_else(|| {
            compute_cost(
                facility.agency,
                ctx.duration_hours,
                is_central,
                ctx.start,
                Some(&facility.id),
                catalog,
                holidays,
            )
        });

        let free_today = cost.free_day_applied;
        let score = score_facility(
            cost.cost,
            distance_km,
            facility.available_lots,
            free_today,
            ctx.priority,
        );

        scored.push(ScoredFacility {
            facility,
            cost,
            distance_km: round_km(distance_km),
            walk_minutes: walk_minutes(distance_km),
            score,
            badge: None,
            free_today,
            is_central,
        });
    }

    // Stable sort: equal scores keep their input order.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    assign_badges(&mut scored);
    scored
}

/// Assigns badges after sorting: BEST_MATCH to the top entry, CHEAPEST and
/// NEAREST to the first minimum-cost and minimum-distance entries unless
/// they already carry a badge. At most one badge per facility.
fn assign_badges(scored: &mut [ScoredFacility]) {
    if scored.is_empty() {
        return;
    }
    scored[0].badge = Some(Badge::BestMatch);

    let cheapest = first_min_index(scored, |s| s.cost.cost);
    if cheapest != 0 && scored[cheapest].badge.is_none() {
        scored[cheapest].badge = Some(Badge::Cheapest);
    }

    let nearest = first_min_index(scored, |s| s.distance_km);
    if nearest != 0 && scored[nearest].badge.is_none() {
        scored[nearest].badge = Some(Badge::Nearest);
    }
}

/// Index of the first entry carrying the minimum key, in ranked order.
fn first_min_index<K: PartialOrd>(
    scored: &[ScoredFacility],
    key: impl Fn(&ScoredFacility) -> K,
) -> usize {
    let mut best = 0;
    for (index, entry) in scored.iter().enumerate().skip(1) {
        if key(entry) < key(&scored[best]) {
            best = index;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        AgencyTariffs, CatalogMetadata, CentralZones, GeoBounds, HalfHourTariff, HourlyTariff,
    };
    use crate::models::{Coordinate, Destination, Priority};
    use chrono::{DateTime, NaiveDateTime, Utc};
    use rust_decimal::Decimal;
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
                area_tags: ["Marina".to_string()].into_iter().collect(),
                bounds: GeoBounds {
                    min_lat: 1.27,
                    max_lat: 1.31,
                    min_lng: 103.82,
                    max_lng: 103.87,
                },
            },
            HashMap::new(),
            ["ACB".to_string()].into_iter().collect(),
            vec![],
        )
        .unwrap()
    }

    fn record(id: &str, agency: &str, location: &str, lots: i64) -> RawFacilityRecord {
        RawFacilityRecord {
            carpark_id: id.to_string(),
            development: format!("{} Carpark", id),
            location: location.to_string(),
            available_lots: lots,
            lot_type: "C".to_string(),
            agency: agency.to_string(),
            area: String::new(),
        }
    }

    fn context(date: &str, time: &str, priority: Priority) -> PricingContext {
        PricingContext::new(
            Destination {
                name: "Test Destination".to_string(),
                coordinate: Coordinate::new(1.3000, 103.7000),
            },
            sgt(date, time),
            dec("2"),
            priority,
            2.0,
        )
    }

    // ==========================================================================
    // RANK-001: filtering drops non-car lots, bad coordinates and
    // out-of-radius records
    // ==========================================================================
    #[test]
    fn test_rank_001_filters() {
        let catalog = test_catalog();
        let mut motorcycle = record("M1", "HDB", "1.3010 103.7000", 10);
        motorcycle.lot_type = "Y".to_string();

        let records = vec![
            record("H1", "HDB", "1.3010 103.7000", 10),
            motorcycle,
            record("B1", "HDB", "0 0", 10),
            record("B2", "HDB", "garbage", 10),
            // Roughly 5.5 km north, outside the 2 km radius.
            record("F1", "HDB", "1.3500 103.7000", 10),
        ];

        let ranked = rank_facilities(
            &records,
            &context("2026-01-12", "10:00:00", Priority::Balanced),
            &catalog,
            &HolidayCalendar::empty(),
        );

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].facility.id, "H1");
    }

    // ==========================================================================
    // RANK-002: ordering and badges with distinct top/cheapest/nearest
    // ==========================================================================
    #[test]
    fn test_rank_002_badges_distinct() {
        let catalog = test_catalog();
        // Under the cheapest profile:
        //   L1 (mall flat, 0.5 km, 50 lots) scores highest,
        //   H1 (standard, 1.5 km, 40 lots) is the cheapest at $2.40,
        //   U1 (premium, 0.2 km, 10 lots) is the nearest.
        let records = vec![
            record("L1", "LTA", "1.30450 103.7000", 50),
            record("U1", "URA", "1.30180 103.7000", 10),
            record("H1", "HDB", "1.31349 103.7000", 40),
        ];

        let ranked = rank_facilities(
            &records,
            &context("2026-01-12", "10:00:00", Priority::Cheapest),
            &catalog,
            &HolidayCalendar::empty(),
        );

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].facility.id, "L1");
        assert_eq!(ranked[0].badge, Some(Badge::BestMatch));

        let h1 = ranked.iter().find(|s| s.facility.id == "H1").unwrap();
        assert_eq!(h1.badge, Some(Badge::Cheapest));
        assert_eq!(h1.cost.cost, dec("2.40"));

        let u1 = ranked.iter().find(|s| s.facility.id == "U1").unwrap();
        assert_eq!(u1.badge, Some(Badge::Nearest));
    }

    // ==========================================================================
    // RANK-003: badges coinciding with BEST_MATCH are suppressed
    // ==========================================================================
    #[test]
    fn test_rank_003_best_match_absorbs_other_badges() {
        let catalog = test_catalog();
        // A single facility is top, cheapest and nearest at once.
        let records = vec![
            record("H1", "HDB", "1.3010 103.7000", 50),
            record("L1", "LTA", "1.3050 103.7000", 10),
        ];

        let ranked = rank_facilities(
            &records,
            &context("2026-01-12", "10:00:00", Priority::Cheapest),
            &catalog,
            &HolidayCalendar::empty(),
        );

        assert_eq!(ranked[0].facility.id, "H1");
        assert_eq!(ranked[0].badge, Some(Badge::BestMatch));
        // The runner-up earns neither CHEAPEST nor NEAREST.
        assert_eq!(ranked[1].badge, None);
    }

    // ==========================================================================
    // RANK-004: equal scores preserve input order (stable sort)
    // ==========================================================================
    #[test]
    fn test_rank_004_stable_tie_break() {
        let catalog = test_catalog();
        let records = vec![
            record("T1", "HDB", "1.3010 103.7000", 20),
            record("T2", "HDB", "1.3010 103.7000", 20),
            record("T3", "HDB", "1.3010 103.7000", 20),
        ];

        let ranked = rank_facilities(
            &records,
            &context("2026-01-12", "10:00:00", Priority::Balanced),
            &catalog,
            &HolidayCalendar::empty(),
        );

        assert_eq!(ranked[0].score, ranked[1].score);
        assert_eq!(ranked[1].score, ranked[2].score);
        let ids: Vec<&str> = ranked.iter().map(|s| s.facility.id.as_str()).collect();
        assert_eq!(ids, vec!["T1", "T2", "T3"]);
    }

    // ==========================================================================
    // RANK-005: badge uniqueness on every result set
    // ==========================================================================
    #[test]
    fn test_rank_005_badge_uniqueness() {
        let catalog = test_catalog();
        let records = vec![
            record("A", "HDB", "1.3010 103.7000", 5),
            record("B", "URA", "1.3050 103.7000", 45),
            record("C", "LTA", "1.3100 103.7000", 25),
            record("D", "HDB", "1.3150 103.7000", 30),
        ];

        for priority in Priority::all() {
            let ranked = rank_facilities(
                &records,
                &context("2026-01-12", "10:00:00", priority),
                &catalog,
                &HolidayCalendar::empty(),
            );

            let best_count = ranked
                .iter()
                .filter(|s| s.badge == Some(Badge::BestMatch))
                .count();
            let cheap_count = ranked
                .iter()
                .filter(|s| s.badge == Some(Badge::Cheapest))
                .count();
            let near_count = ranked
                .iter()
                .filter(|s| s.badge == Some(Badge::Nearest))
                .count();

            assert_eq!(best_count, 1);
            assert!(cheap_count <= 1);
            assert!(near_count <= 1);
            assert_eq!(ranked[0].badge, Some(Badge::BestMatch));
        }
    }

    // ==========================================================================
    // RANK-006: free-day facilities are flagged and boosted on a Sunday
    // ==========================================================================
    #[test]
    fn test_rank_006_free_today_flagged() {
        let catalog = test_catalog();
        let records = vec![
            record("ACB", "HDB", "1.3010 103.7000", 20),
            record("H2", "HDB", "1.3012 103.7000", 20),
        ];

        // 2026-01-18 is a Sunday; ACB is in the free-day scheme.
        let ranked = rank_facilities(
            &records,
            &context("2026-01-18", "10:00:00", Priority::Balanced),
            &catalog,
            &HolidayCalendar::empty(),
        );

        let acb = ranked.iter().find(|s| s.facility.id == "ACB").unwrap();
        let h2 = ranked.iter().find(|s| s.facility.id == "H2").unwrap();
        assert!(acb.free_today);
        assert_eq!(acb.cost.cost, dec("0"));
        assert!(!h2.free_today);
        assert!(acb.score > h2.score);
    }

    // ==========================================================================
    // RANK-007: central classification feeds the premium tariff
    // ==========================================================================
    #[test]
    fn test_rank_007_central_area_pricing() {
        let catalog = test_catalog();
        // Inside the central bounding box.
        let records = vec![record("C1", "HDB", "1.2900 103.8500", 20)];

        let ctx = PricingContext::new(
            Destination {
                name: String::new(),
                coordinate: Coordinate::new(1.2900, 103.8500),
            },
            sgt("2026-01-12", "10:00:00"),
            dec("2"),
            Priority::Balanced,
            2.0,
        );

        let ranked = rank_facilities(&records, &ctx, &catalog, &HolidayCalendar::empty());
        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].is_central);
        // Two business hours at the premium rate.
        assert_eq!(ranked[0].cost.cost, dec("4.80"));
    }

    // ==========================================================================
    // RANK-008: walk minutes and display distance are derived per entry
    // ==========================================================================
    #[test]
    fn test_rank_008_walk_minutes_and_distance() {
        let catalog = test_catalog();
        // Roughly one kilometer north of the destination.
        let records = vec![record("H1", "HDB", "1.30899 103.7000", 20)];

        let ranked = rank_facilities(
            &records,
            &context("2026-01-12", "10:00:00", Priority::Balanced),
            &catalog,
            &HolidayCalendar::empty(),
        );

        assert_eq!(ranked[0].distance_km, 1.0);
        assert_eq!(ranked[0].walk_minutes, 12);
    }

    #[test]
    fn test_rank_empty_input() {
        let catalog = test_catalog();
        let ranked = rank_facilities(
            &[],
            &context("2026-01-12", "10:00:00", Priority::Balanced),
            &catalog,
            &HolidayCalendar::empty(),
        );
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_missing_development_gets_fallback_name() {
        let catalog = test_catalog();
        let mut r = record("H9", "HDB", "1.3010 103.7000", 20);
        r.development = String::new();

        let ranked = rank_facilities(
            &[r],
            &context("2026-01-12", "10:00:00", Priority::Balanced),
            &catalog,
            &HolidayCalendar::empty(),
        );
        assert_eq!(ranked[0].facility.name, "Carpark H9");
    }
}
