//! Recommendation banner selection.
//!
//! Evaluates the scored result set against the current instant in strict
//! priority order and emits at most one banner. First match wins:
//! free-day active, rate change imminent, night period active, early-morning
//! mall-heavy results.

use chrono::{DateTime, Duration, Timelike, Utc};
use rust_decimal::Decimal;

use crate::calendar::{night_boundaries, to_sgt, HolidayCalendar};
use crate::catalog::RateCatalog;
use crate::models::{clamp_duration, Recommendation, ScoredFacility};

use super::cost::{compute_cost, round2};

/// How close to the night cutover the wait-for-night banner looks.
pub const EVENING_LOOKAHEAD_MINUTES: i64 = 30;

/// Mall-heavy results are only called out before this local hour.
pub const MALL_MORNING_CUTOFF_HOUR: u32 = 10;

/// The minimum saving before suggesting the driver wait for the night rate.
fn evening_saving_threshold() -> Decimal {
    Decimal::new(50, 2) // $0.50
}

/// Selects at most one recommendation for an already-ranked result set.
///
/// The wait-for-night rule reprices the cheapest *non-mall* facility as if
/// the session started at the cutover; mall tariffs have no night cap, so
/// waiting buys nothing there.
pub fn select_recommendation(
    scored: &[ScoredFacility],
    now: DateTime<Utc>,
    duration_hours: Decimal,
    catalog: &RateCatalog,
    holidays: &HolidayCalendar,
) -> Option<Recommendation> {
    if scored.is_empty() {
        return None;
    }
    let duration = clamp_duration(duration_hours);

    // 1. Free-day active.
    let free_count = scored.iter().filter(|s| s.free_today).count();
    if free_count > 0 {
        return Some(Recommendation::FreeDay { free_count });
    }

    let boundaries = night_boundaries(now);

    // 2. Rate change imminent: shortly before the cutover, waiting can move
    // the whole session under the night cap.
    if now < boundaries.night_start
        && boundaries.night_start - now <= Duration::minutes(EVENING_LOOKAHEAD_MINUTES)
    {
        if let Some(candidate) = cheapest_non_mall(scored) {
            let repriced = compute_cost(
                candidate.facility.agency,
                duration,
                candidate.is_central,
                boundaries.night_start,
                Some(&candidate.facility.id),
                catalog,
                holidays,
            );
            let saving = candidate.cost.cost - repriced.cost;
            if saving > evening_saving_threshold() {
                return Some(Recommendation::EveningSoon {
                    wait_minutes: (boundaries.night_start - now).num_minutes(),
                    saving: round2(saving),
                });
            }
        }
    }

    // 3. Night period active.
    if boundaries.night_start <= now {
        return Some(Recommendation::NightNow {
            night_cap: catalog.agencies().standard_non_central.night_cap,
        });
    }

    // 4. Early morning with mall tariffs in the result set.
    if to_sgt(now).hour() < MALL_MORNING_CUTOFF_HOUR {
        let mall_count = scored.iter().filter(|s| s.is_mall_tariff()).count();
        if mall_count > 0 {
            return Some(Recommendation::MallMorning { mall_count });
        }
    }

    None
}

/// The first minimum-cost facility, in ranked order, that is not billed
/// under a mall tariff.
fn cheapest_non_mall(scored: &[ScoredFacility]) -> Option<&ScoredFacility> {
    let mut best: Option<&ScoredFacility> = None;
    for entry in scored.iter().filter(|s| !s.is_mall_tariff()) {
        match best {
            Some(current) if entry.cost.cost >= current.cost.cost => {}
            _ => best = Some(entry),
        }
    }
    best
}
