//! Recommendation banner model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A banner recommendation for a ranked result set.
///
/// Selected in strict priority order (free day, rate change imminent, night
/// period, mall-heavy morning); a result set produces at most one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    /// Free parking is active for part of the result set today.
    FreeDay {
        /// How many facilities in the result set are free today.
        free_count: usize,
    },
    /// The night rate starts soon; waiting saves money at the cheapest
    /// non-mall facility.
    EveningSoon {
        /// Minutes until the night cutover.
        wait_minutes: i64,
        /// The saving from starting at the cutover instead of now.
        saving: Decimal,
    },
    /// The night period is active and the flat night cap applies.
    NightNow {
        /// The flat night-cap amount for half-hour-rate agencies.
        night_cap: Decimal,
    },
    /// It is early morning and mall tariffs dominate the result set.
    MallMorning {
        /// How many mall-tariff facilities are in the result set.
        mall_count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_serializes_with_kind_tag() {
        let rec = Recommendation::FreeDay { free_count: 3 };
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("\"kind\":\"free_day\""));
        assert!(json.contains("\"free_count\":3"));
    }

    #[test]
    fn test_evening_soon_round_trip() {
        let rec = Recommendation::EveningSoon {
            wait_minutes: 20,
            saving: Decimal::new(180, 2),
        };
        let json = serde_json::to_string(&rec).unwrap();
        let back: Recommendation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }
}
