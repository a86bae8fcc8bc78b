//! Civil-calendar math for tariff boundaries.
//!
//! Every boundary the engine cares about — the night cutover, business
//! hours, peak windows, the free-parking window — is defined in Singapore
//! civil time, a fixed UTC+8 offset. All calendar math in this module runs
//! in that offset regardless of the host timezone; callers must not
//! substitute host-local time.
//!
//! The four calendars share one primitive: a recurring [`DailyWindow`]
//! filtered by a [`DayClass`], summed across every local calendar day an
//! interval touches.

use std::collections::BTreeSet;

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
    Weekday,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The fixed UTC+8 civil offset all tariff boundaries are defined in.
pub fn sgt_offset() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).expect("valid fixed offset")
}

/// Converts an instant to Singapore civil time.
pub fn to_sgt(instant: DateTime<Utc>) -> DateTime<FixedOffset> {
    instant.with_timezone(&sgt_offset())
}

/// Converts a naive Singapore civil datetime back to an instant.
pub fn sgt_datetime(naive: NaiveDateTime) -> DateTime<Utc> {
    sgt_offset()
        .from_local_datetime(&naive)
        .single()
        .expect("fixed offset datetimes are unambiguous")
        .with_timezone(&Utc)
}

/// The day-of-week filter for a recurring daily window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayClass {
    /// Every day of the week.
    Daily,
    /// Monday through Friday.
    Weekday,
    /// Saturday and Sunday.
    Weekend,
    /// Monday through Saturday.
    MonToSat,
}

impl DayClass {
    /// Whether the given weekday is selected by this class.
    pub fn matches(self, weekday: Weekday) -> bool {
        match self {
            DayClass::Daily => true,
            DayClass::Weekday => !matches!(weekday, Weekday::Sat | Weekday::Sun),
            DayClass::Weekend => matches!(weekday, Weekday::Sat | Weekday::Sun),
            DayClass::MonToSat => weekday != Weekday::Sun,
        }
    }
}

/// A recurring daily time window in Singapore civil time.
///
/// Bounds are minutes since local midnight. A window whose end does not
/// exceed its start wraps past midnight into the next day (the night window
/// 22:30 to 07:00 is the canonical case); a wrapping instance belongs to the
/// day it starts on for day-class filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyWindow {
    start_minute: u32,
    end_minute: u32,
}

/// The night period: 22:30 to 07:00 the next day.
pub const NIGHT_WINDOW: DailyWindow = DailyWindow::new(22 * 60 + 30, 7 * 60);

/// Business hours: 07:00 to 17:00, Monday through Saturday.
pub const BUSINESS_WINDOW: DailyWindow = DailyWindow::new(7 * 60, 17 * 60);

/// The free-parking window on eligible days: 07:00 to the night cutover.
pub const FREE_WINDOW: DailyWindow = DailyWindow::new(7 * 60, 22 * 60 + 30);

impl DailyWindow {
    /// Creates a window from minutes since local midnight.
    pub const fn new(start_minute: u32, end_minute: u32) -> Self {
        Self {
            start_minute,
            end_minute,
        }
    }

    /// Creates a window from whole local hours.
    pub const fn from_hours(start_hour: u32, end_hour: u32) -> Self {
        Self::new(start_hour * 60, end_hour * 60)
    }

    /// Whether this window wraps past midnight.
    pub fn wraps(&self) -> bool {
        self.end_minute <= self.start_minute
    }

    /// The concrete instance of this window starting on the given local day.
    fn instance_on(&self, day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let start = day.and_time(minute_time(self.start_minute));
        let end_day = if self.wraps() {
            day + Duration::days(1)
        } else {
            day
        };
        (start, end_day.and_time(minute_time(self.end_minute)))
    }
}

fn minute_time(minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0).expect("minute within a day")
}

/// Total overlap between `[start, end)` and a recurring daily window,
/// filtered by day class, summed across every local calendar day the
/// interval touches.
///
/// This is the shared primitive behind the night, business-hours, peak and
/// free-day calendars.
///
/// # Example
///
/// ```
/// use chrono::{Duration, NaiveDateTime};
/// use parking_engine::calendar::{sgt_datetime, window_overlap, DayClass, NIGHT_WINDOW};
///
/// // 21:30 for three hours crosses the 22:30 cutover: two night hours.
/// let start = sgt_datetime(
///     NaiveDateTime::parse_from_str("2026-01-12 21:30:00", "%Y-%m-%d %H:%M:%S").unwrap(),
/// );
/// let end = start + Duration::hours(3);
/// let overlap = window_overlap(start, end, NIGHT_WINDOW, DayClass::Daily);
/// assert_eq!(overlap, Duration::hours(2));
/// ```
pub fn window_overlap(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    window: DailyWindow,
    class: DayClass,
) -> Duration {
    if end <= start {
        return Duration::zero();
    }

    let local_start = to_sgt(start).naive_local();
    let local_end = to_sgt(end).naive_local();

    let mut total = Duration::zero();
    // A wrapping instance can begin on the day before the interval starts.
    let mut day = local_start.date() - Duration::days(1);
    let last = local_end.date();
    while day <= last {
        if class.matches(day.weekday()) {
            let (window_start, window_end) = window.instance_on(day);
            let overlap_start = window_start.max(local_start);
            let overlap_end = window_end.min(local_end);
            if overlap_end > overlap_start {
                total += overlap_end - overlap_start;
            }
        }
        day += Duration::days(1);
    }
    total
}

/// Overlap with business hours (Monday-Saturday 07:00-17:00).
pub fn business_hours_overlap(start: DateTime<Utc>, end: DateTime<Utc>) -> Duration {
    window_overlap(start, end, BUSINESS_WINDOW, DayClass::MonToSat)
}

/// Converts a duration to fractional hours at minute precision.
pub fn duration_hours(duration: Duration) -> Decimal {
    Decimal::new(duration.num_minutes(), 0) / Decimal::new(60, 0)
}

/// The night period that contains or immediately follows an instant, plus
/// the start of the same civil day's free-parking window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightBoundaries {
    /// The start of the night period (22:30 local).
    pub night_start: DateTime<Utc>,
    /// The end of the night period (07:00 local the next day).
    pub night_end: DateTime<Utc>,
    /// The start of the same-day free-parking window (07:00 local).
    pub free_window_start: DateTime<Utc>,
}

/// Computes the night period containing or immediately following `instant`.
///
/// An instant before 07:00 local belongs to the night that started the
/// previous day; any later instant belongs to (or awaits) the night that
/// starts at 22:30 the same day.
pub fn night_boundaries(instant: DateTime<Utc>) -> NightBoundaries {
    let local = to_sgt(instant).naive_local();
    let today = local.date();
    let seven = today.and_time(minute_time(7 * 60));
    let cutover = today.and_time(minute_time(22 * 60 + 30));

    let (night_start, night_end) = if local < seven {
        ((today - Duration::days(1)).and_time(minute_time(22 * 60 + 30)), seven)
    } else {
        (cutover, (today + Duration::days(1)).and_time(minute_time(7 * 60)))
    };

    NightBoundaries {
        night_start: sgt_datetime(night_start),
        night_end: sgt_datetime(night_end),
        free_window_start: sgt_datetime(seven),
    }
}

/// Whether an instant falls inside its containing night period.
pub fn in_night_period(instant: DateTime<Utc>) -> bool {
    night_boundaries(instant).night_start <= instant
}

/// The injected public-holiday calendar.
///
/// The engine never decides holidays itself; the surrounding system loads
/// the designated dates and hands them in here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Creates a calendar from a set of holiday dates.
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: dates.into_iter().collect(),
        }
    }

    /// A calendar with no designated holidays.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the given local date is a designated public holiday.
    pub fn is_public_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// Whether the instant falls on a free-parking-eligible day: a Sunday or
    /// a designated public holiday, judged in Singapore civil time.
    pub fn is_free_eligible_day(&self, instant: DateTime<Utc>) -> bool {
        let local = to_sgt(instant);
        local.weekday() == Weekday::Sun || self.is_public_holiday(local.date_naive())
    }

    /// Number of designated holidays in the calendar.
    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    /// Whether the calendar has no designated holidays.
    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }
}
