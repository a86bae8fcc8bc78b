//! Rate catalog loading and types.
//!
//! The catalog is a static, versioned table of monetary rules: default
//! tariffs per agency class, the contractual central-area set, per-facility
//! peak windows, the free-parking-day scheme and mall tariff entries. It is
//! loaded from YAML at startup, validated loudly, and read-only afterwards.
//!
//! # Example
//!
//! ```no_run
//! use parking_engine::catalog::CatalogLoader;
//!
//! let loader = CatalogLoader::load("./config/sg").unwrap();
//! println!("{} mall tariffs", loader.catalog().malls().len());
//! ```

mod loader;
mod types;

pub use loader::CatalogLoader;
pub use types::{
    AgencyTariffs, CatalogMetadata, CentralZones, GeoBounds, Geofence, HalfHourTariff,
    HourlyTariff, MallDayBand, MallNightBand, MallTariff, PeakWindow, RateCatalog,
};
