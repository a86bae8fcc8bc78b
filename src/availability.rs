//! The facility-availability collaborator.
//!
//! The engine itself is pure; this module is the one place that performs
//! I/O. It defines the upstream record schema, the [`AvailabilitySource`]
//! boundary trait, and the LTA DataMall client that pages through the
//! carpark availability feed.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::geo::parse_coordinate;
use crate::models::{Agency, Coordinate};

/// The upstream availability endpoint.
const LTA_API_URL: &str =
    "http://datamall2.mytransport.sg/ltaodataservice/CarParkAvailabilityv2";

/// The feed pages at this many records per call.
const PAGE_SIZE: usize = 500;

static HTTP: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to build reqwest client")
});

/// One raw record from the availability feed.
///
/// Field names mirror the upstream payload. The coordinate arrives as a
/// single `"lat lng"` string and must be parsed with validation; records
/// with zero or unparsable coordinates are discarded by the ranking pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFacilityRecord {
    /// The upstream facility identifier.
    #[serde(rename = "CarParkID")]
    pub carpark_id: String,
    /// The development (display) name; may be empty.
    #[serde(rename = "Development", default)]
    pub development: String,
    /// The `"lat lng"` location string.
    #[serde(rename = "Location", default)]
    pub location: String,
    /// The live available-lot count.
    #[serde(rename = "AvailableLots", default)]
    pub available_lots: i64,
    /// The lot type; passenger cars are `"C"`.
    #[serde(rename = "LotType", default)]
    pub lot_type: String,
    /// The operating agency code (HDB, URA, LTA).
    #[serde(rename = "Agency", default)]
    pub agency: String,
    /// The area tag; populated for some LTA facilities only.
    #[serde(rename = "Area", default)]
    pub area: String,
}

impl RawFacilityRecord {
    /// Whether the record describes passenger-car lots. Records without a
    /// lot type pass the filter.
    pub fn is_passenger_lot(&self) -> bool {
        self.lot_type.is_empty() || self.lot_type == "C"
    }

    /// The parsed coordinate, or `None` when the location is missing,
    /// unparsable or zero.
    pub fn coordinate(&self) -> Option<Coordinate> {
        parse_coordinate(&self.location)
    }

    /// The agency tariff class for this record.
    pub fn agency_class(&self) -> Agency {
        Agency::from_code(&self.agency)
    }

    /// The available-lot count, clamped to zero.
    pub fn lots(&self) -> u32 {
        self.available_lots.max(0).try_into().unwrap_or(u32::MAX)
    }

    /// The display name, falling back to the identifier.
    pub fn display_name(&self) -> String {
        if self.development.is_empty() {
            format!("Carpark {}", self.carpark_id)
        } else {
            self.development.clone()
        }
    }
}

/// A pinned, boxed future returning availability records.
pub type AvailabilityFuture<'a> =
    Pin<Box<dyn Future<Output = EngineResult<Vec<RawFacilityRecord>>> + Send + 'a>>;

/// The boundary trait for the availability collaborator.
///
/// Callers are expected to fetch one snapshot per ranking pass; the engine
/// never refetches or retries on its own.
pub trait AvailabilitySource: Send + Sync {
    /// Fetches one availability snapshot.
    fn fetch(&self) -> AvailabilityFuture<'_>;
}

#[derive(Debug, Deserialize)]
struct AvailabilityPage {
    #[serde(default)]
    value: Vec<RawFacilityRecord>,
}

/// The LTA DataMall availability client.
///
/// Pages through the feed with `$skip` until a short page signals the end.
#[derive(Debug, Clone)]
pub struct LtaClient {
    api_key: String,
}

impl LtaClient {
    /// Creates a client with the given DataMall account key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    async fn fetch_all(&self) -> EngineResult<Vec<RawFacilityRecord>> {
        let mut records = Vec::new();
        let mut skip = 0usize;

        loop {
            let url = if skip > 0 {
                format!("{}?$skip={}", LTA_API_URL, skip)
            } else {
                LTA_API_URL.to_string()
            };

            let response = HTTP
                .get(&url)
                .header("AccountKey", &self.api_key)
                .header("accept", "application/json")
                .send()
                .await
                .map_err(|e| EngineError::AvailabilityUnavailable {
                    message: e.to_string(),
                })?;

            if !response.status().is_success() {
                return Err(EngineError::AvailabilityUnavailable {
                    message: format!("upstream returned {}", response.status()),
                });
            }

            let page: AvailabilityPage =
                response
                    .json()
                    .await
                    .map_err(|e| EngineError::AvailabilityUnavailable {
                        message: e.to_string(),
                    })?;

            let count = page.value.len();
            records.extend(page.value);

            if count < PAGE_SIZE {
                return Ok(records);
            }
            skip += PAGE_SIZE;
        }
    }
}

impl AvailabilitySource for LtaClient {
    fn fetch(&self) -> AvailabilityFuture<'_> {
        Box::pin(self.fetch_all())
    }
}

/// An in-memory availability source serving a fixed snapshot.
///
/// Useful for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticAvailability {
    records: Vec<RawFacilityRecord>,
}

impl StaticAvailability {
    /// Creates a source that always returns the given records.
    pub fn new(records: Vec<RawFacilityRecord>) -> Self {
        Self { records }
    }
}

impl AvailabilitySource for StaticAvailability {
    fn fetch(&self) -> AvailabilityFuture<'_> {
        let records = self.records.clone();
        Box::pin(async move { Ok(records) })
    }
}
