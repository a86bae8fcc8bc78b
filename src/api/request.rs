//! Request types for the parking engine API.

use serde::Deserialize;

/// Query parameters for the carpark search endpoint.
///
/// Everything except the destination coordinate is optional: a missing
/// duration defaults to two hours, an unknown priority falls back to the
/// balanced profile, the radius defaults to two kilometers and the start
/// instant defaults to now. Malformed optional values degrade to their
/// defaults rather than failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarparkQuery {
    /// Destination latitude. Required.
    pub lat: Option<f64>,
    /// Destination longitude. Required.
    pub lng: Option<f64>,
    /// Destination display name, used for mall-tariff matching.
    pub dest: Option<String>,
    /// Session duration in hours.
    pub duration: Option<String>,
    /// Priority profile key (cheapest, closest, balanced, best_value).
    pub priority: Option<String>,
    /// Search radius in kilometers.
    pub radius: Option<f64>,
    /// Session start instant as an RFC 3339 timestamp.
    pub start: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_deserializes() {
        let query: CarparkQuery = serde_json::from_str(
            r#"{
                "lat": 1.3,
                "lng": 103.85,
                "dest": "VivoCity",
                "duration": "2.5",
                "priority": "cheapest",
                "radius": 1.5
            }"#,
        )
        .unwrap();

        assert_eq!(query.lat, Some(1.3));
        assert_eq!(query.lng, Some(103.85));
        assert_eq!(query.dest.as_deref(), Some("VivoCity"));
        assert_eq!(query.duration.as_deref(), Some("2.5"));
        assert_eq!(query.priority.as_deref(), Some("cheapest"));
        assert_eq!(query.radius, Some(1.5));
    }

    #[test]
    fn test_query_all_fields_optional() {
        let query: CarparkQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.lat, None);
        assert_eq!(query.lng, None);
        assert_eq!(query.duration, None);
    }
}
