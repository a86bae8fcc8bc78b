//! Session cost calculation.
//!
//! This module prices a parking session against an agency tariff by
//! decomposing the session interval across the tariff calendars: the night
//! window, business hours for central-area facilities, facility peak windows
//! and the free-parking-day window. Each sub-period is billed and capped
//! independently, then aggregated.
//!
//! The calculation is pure: identical inputs always yield an identical
//! result, and nothing here reads the wall clock.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::calendar::{
    business_hours_overlap, duration_hours, in_night_period, night_boundaries, window_overlap,
    DailyWindow, DayClass, HolidayCalendar, NIGHT_WINDOW,
};
use crate::catalog::RateCatalog;
use crate::models::{clamp_duration, Agency, CostResult, RateSource};

/// Computes the estimated cost of one session at one facility.
///
/// * Mall-class agencies bill a flat hourly rate under a single day cap,
///   with no night distinction and no peak surcharge.
/// * Half-hour agencies split the session into day and night hours using
///   the 22:30-07:00 night window. Day hours bill at the agency rate (with
///   the central business-hours premium split where applicable) under the
///   day cap; night hours bill at the flat rate under the independent night
///   cap; peak-window hours add the fixed per-hour surcharge.
/// * On Sundays and public holidays, facilities in the free-parking scheme
///   pay nothing between 07:00 and the night cutover; a session crossing
///   the cutover is free up to 22:30 and re-priced from there.
///
/// A non-positive duration is clamped to the minimum billable half hour.
///
/// # Example
///
/// ```no_run
/// use chrono::NaiveDateTime;
/// use parking_engine::calculation::compute_cost;
/// use parking_engine::calendar::sgt_datetime;
/// use parking_engine::catalog::CatalogLoader;
/// use parking_engine::models::Agency;
/// use rust_decimal::Decimal;
///
/// let loader = CatalogLoader::load("./config/sg").unwrap();
/// let start = sgt_datetime(
///     NaiveDateTime::parse_from_str("2026-01-12 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap(),
/// );
///
/// let result = compute_cost(
///     Agency::Standard,
///     Decimal::from(2),
///     false,
///     start,
///     None,
///     loader.catalog(),
///     loader.holidays(),
/// );
/// // Two day hours at $1.20/hr.
/// assert_eq!(result.cost, Decimal::new(240, 2));
/// ```
pub fn compute_cost(
    agency: Agency,
    duration_hours: Decimal,
    is_central: bool,
    start: DateTime<Utc>,
    facility_id: Option<&str>,
    catalog: &RateCatalog,
    holidays: &HolidayCalendar,
) -> CostResult {
    let duration = clamp_duration(duration_hours);

    if agency == Agency::Mall {
        return mall_flat_cost(duration, catalog);
    }

    if let Some(id) = facility_id {
        if catalog.is_free_day_eligible(id) && holidays.is_free_eligible_day(start) {
            if let Some(result) = free_day_cost(agency, duration, is_central, start, id, catalog) {
                return result;
            }
        }
    }

    half_hour_cost(agency, duration, is_central, start, facility_id, catalog)
}

/// Flat hourly pricing for the mall agency class.
fn mall_flat_cost(duration: Decimal, catalog: &RateCatalog) -> CostResult {
    let tariff = &catalog.agencies().mall_flat;
    let raw = duration * tariff.per_hour;

    CostResult {
        cost: round2(raw.min(tariff.day_cap)),
        rate_per_hour: tariff.per_hour,
        rate_label: format!("${}/hr", tariff.per_hour),
        cap_label: format!("${}/day cap", tariff.day_cap),
        cap_applied: raw > tariff.day_cap,
        night_cap_applied: false,
        is_night_rate: false,
        day_hours: round2(duration),
        night_hours: Decimal::ZERO,
        free_day_applied: false,
        rate_source: RateSource::AgencyDefault,
    }
}

/// Half-hour-rate pricing with the night/day decomposition.
fn half_hour_cost(
    agency: Agency,
    duration: Decimal,
    is_central: bool,
    start: DateTime<Utc>,
    facility_id: Option<&str>,
    catalog: &RateCatalog,
) -> CostResult {
    let end = start + session_length(duration);
    let agencies = catalog.agencies();
    let non_central = &agencies.standard_non_central;

    let night_hours =
        duration_hours(window_overlap(start, end, NIGHT_WINDOW, DayClass::Daily)).min(duration);
    let day_hours = duration - night_hours;

    let (rate_label, rate_per_hour, day_raw, day_cap) = if agency == Agency::PremiumFlat {
        let tariff = &agencies.premium_flat;
        (
            format!("${}/30min", tariff.per_half_hour),
            tariff.per_hour(),
            day_hours * tariff.per_hour(),
            tariff.day_cap,
        )
    } else if is_central {
        // Business hours bill at the premium rate, the rest of the day at
        // the standard rate, capped together at the central day cap.
        let central = &agencies.standard_central;
        let business_hours =
            duration_hours(business_hours_overlap(start, end)).min(day_hours);
        let standard_day_hours = day_hours - business_hours;
        let raw =
            business_hours * central.per_hour() + standard_day_hours * non_central.per_hour();
        (
            format!("${}/30min", central.per_half_hour),
            central.per_hour(),
            raw,
            central.day_cap,
        )
    } else {
        (
            format!("${}/30min", non_central.per_half_hour),
            non_central.per_hour(),
            day_hours * non_central.per_hour(),
            non_central.day_cap,
        )
    };

    // Night hours bill at the agency's flat rate under the night cap,
    // independent of the day cap and the central premium.
    let (night_rate, night_cap) = if agency == Agency::PremiumFlat {
        (agencies.premium_flat.per_hour(), agencies.premium_flat.night_cap)
    } else {
        (non_central.per_hour(), non_central.night_cap)
    };
    let night_raw = night_hours * night_rate;

    let day_cost = day_raw.min(day_cap);
    let night_cost = night_raw.min(night_cap);
    let peak_cost = peak_surcharge(start, end, facility_id, catalog);

    CostResult {
        cost: round2(day_cost + night_cost + peak_cost),
        rate_per_hour,
        rate_label,
        cap_label: format!("${}/day cap", day_cap),
        cap_applied: day_raw > day_cap || night_raw > night_cap,
        night_cap_applied: night_raw > night_cap,
        is_night_rate: in_night_period(start),
        day_hours: round2(day_hours),
        night_hours: round2(night_hours),
        free_day_applied: false,
        rate_source: RateSource::AgencyDefault,
    }
}

/// Total overlap between `[start, end)` and a facility's peak surcharge
/// windows. Zero for facilities with no peak definition.
pub fn peak_window_overlap(
    facility_id: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    catalog: &RateCatalog,
) -> Duration {
    let mut total = Duration::zero();
    for window in catalog.peak_windows(facility_id) {
        total += window_overlap(
            start,
            end,
            DailyWindow::from_hours(window.start_hour, window.end_hour),
            window.days,
        );
    }
    total
}

/// The peak surcharge for the hours overlapping the facility's peak windows.
///
/// Catalog validation keeps peak windows inside 07:00-22:00, so surcharged
/// hours can never overlap the night period.
fn peak_surcharge(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    facility_id: Option<&str>,
    catalog: &RateCatalog,
) -> Decimal {
    let Some(id) = facility_id else {
        return Decimal::ZERO;
    };
    let peak_hours = duration_hours(peak_window_overlap(id, start, end, catalog));
    peak_hours * catalog.agencies().peak_surcharge_per_hour
}

/// Free-parking-day pricing for an eligible facility on an eligible day.
///
/// Returns `None` when the session starts outside the free window (before
/// 07:00 the start is inside the previous night; after 22:30 it is inside
/// tonight) so the caller falls through to normal pricing.
fn free_day_cost(
    agency: Agency,
    duration: Decimal,
    is_central: bool,
    start: DateTime<Utc>,
    facility_id: &str,
    catalog: &RateCatalog,
) -> Option<CostResult> {
    let boundaries = night_boundaries(start);
    if start < boundaries.free_window_start || start >= boundaries.night_start {
        return None;
    }

    let end = start + session_length(duration);
    if end <= boundaries.night_start {
        // The whole session sits inside the free window.
        return Some(CostResult {
            cost: Decimal::ZERO,
            rate_per_hour: Decimal::ZERO,
            rate_label: "Free (Sunday/public holiday)".to_string(),
            cap_label: "Free parking day scheme".to_string(),
            cap_applied: false,
            night_cap_applied: false,
            is_night_rate: false,
            day_hours: round2(duration),
            night_hours: Decimal::ZERO,
            free_day_applied: true,
            rate_source: RateSource::AgencyDefault,
        });
    }

    // The session crosses the cutover: free up to 22:30, then priced as a
    // fresh session pinned to the cutover instant.
    let free_hours = duration_hours(boundaries.night_start - start);
    let paid_hours = duration - free_hours;
    let paid = half_hour_cost(
        agency,
        paid_hours,
        is_central,
        boundaries.night_start,
        Some(facility_id),
        catalog,
    );

    let night_hours = paid.night_hours;
    Some(CostResult {
        cost: paid.cost,
        rate_per_hour: paid.rate_per_hour,
        rate_label: paid.rate_label,
        cap_label: format!("Free until 22:30, then {}", paid.cap_label),
        cap_applied: paid.cap_applied,
        night_cap_applied: paid.night_cap_applied,
        is_night_rate: false,
        day_hours: round2(duration - night_hours),
        night_hours,
        free_day_applied: true,
        rate_source: RateSource::AgencyDefault,
    })
}

/// Converts a fractional hour count into a concrete session length at
/// minute precision.
fn session_length(hours: Decimal) -> Duration {
    let minutes = (hours * Decimal::from(60))
        .round()
        .to_i64()
        .unwrap_or(30);
    Duration::minutes(minutes.max(1))
}

/// Rounds a value to two decimal places, half away from zero.
pub(crate) fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
