//! Geographic utilities: great-circle distance, walking-time estimate and
//! coordinate parsing.
//!
//! Walking time is a display and scoring proxy only; it is never validated
//! against real pedestrian paths.

use crate::models::Coordinate;

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Assumed walking speed in km/h for the walking-time estimate.
const WALK_SPEED_KMH: f64 = 5.0;

/// Great-circle distance between two coordinates in kilometers, using the
/// haversine formula.
///
/// # Example
///
/// ```
/// use parking_engine::geo::haversine_km;
/// use parking_engine::models::Coordinate;
///
/// let a = Coordinate::new(1.2841, 103.8515);
/// let same = haversine_km(a, a);
/// assert!(same < 1e-9);
/// ```
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Estimated walking time in whole minutes for a distance in kilometers.
pub fn walk_minutes(distance_km: f64) -> u32 {
    ((distance_km / WALK_SPEED_KMH) * 60.0).round().max(0.0) as u32
}

/// Parses an upstream `"lat lng"` location string.
///
/// Returns `None` for missing, unparsable or zero components so that the
/// caller can silently discard the facility instead of failing the request.
///
/// # Example
///
/// ```
/// use parking_engine::geo::parse_coordinate;
///
/// let coord = parse_coordinate("1.3691 103.8454").unwrap();
/// assert_eq!(coord.lat, 1.3691);
/// assert_eq!(coord.lng, 103.8454);
///
/// assert!(parse_coordinate("0 0").is_none());
/// assert!(parse_coordinate("not a location").is_none());
/// ```
pub fn parse_coordinate(location: &str) -> Option<Coordinate> {
    let mut parts = location.split_whitespace();
    let lat: f64 = parts.next()?.parse().ok()?;
    let lng: f64 = parts.next()?.parse().ok()?;
    if !lat.is_finite() || !lng.is_finite() || lat == 0.0 || lng == 0.0 {
        return None;
    }
    Some(Coordinate::new(lat, lng))
}

/// Rounds a distance to two decimal places for display.
pub fn round_km(distance_km: f64) -> f64 {
    (distance_km * 100.0).round() / 100.0
}
