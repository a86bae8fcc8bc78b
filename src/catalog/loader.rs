//! Catalog loading functionality.
//!
//! Loads the rate catalog and public-holiday calendar from a YAML directory
//! and validates them before the engine goes into service.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::calendar::HolidayCalendar;
use crate::error::{EngineError, EngineResult};

use super::types::{
    AgencyTariffs, CatalogMetadata, CentralZones, MallTariff, PeakWindow, RateCatalog,
};

/// Loads and provides access to the rate catalog.
///
/// # Directory Structure
///
/// The catalog directory has the following structure:
/// ```text
/// config/sg/
/// ├── catalog.yaml    # Metadata and agency tariffs
/// ├── zones.yaml      # Central-area ids, tags and bounding box
/// ├── peaks.yaml      # Facility peak-window definitions
/// ├── schemes.yaml    # Free-parking-day facility set
/// ├── malls.yaml      # Mall tariff entries
/// └── holidays/
///     └── 2026.yaml   # Designated public holidays per year
/// ```
///
/// # Example
///
/// ```no_run
/// use parking_engine::catalog::CatalogLoader;
///
/// let loader = CatalogLoader::load("./config/sg").unwrap();
/// println!("Loaded catalog: {}", loader.catalog().metadata().name);
/// ```
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    catalog: RateCatalog,
    holidays: HolidayCalendar,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    catalog: CatalogMetadata,
    agencies: AgencyTariffs,
}

#[derive(Debug, Deserialize)]
struct ZonesFile {
    central: CentralZones,
}

#[derive(Debug, Deserialize)]
struct PeaksFile {
    #[serde(default)]
    peak_windows: HashMap<String, Vec<PeakWindow>>,
}

#[derive(Debug, Deserialize)]
struct SchemesFile {
    #[serde(default)]
    free_day_carparks: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MallsFile {
    #[serde(default)]
    malls: Vec<MallTariff>,
}

#[derive(Debug, Deserialize)]
struct HolidayEntry {
    date: NaiveDate,
    #[allow(dead_code)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct HolidayFile {
    #[serde(default)]
    holidays: Vec<HolidayEntry>,
}

impl CatalogLoader {
    /// Loads the catalog from the specified directory.
    ///
    /// Returns an error if any required file is missing, fails to parse, or
    /// fails catalog validation. This is the startup-time failure path: a
    /// broken catalog must never be served.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let catalog_file = Self::load_yaml::<CatalogFile>(&path.join("catalog.yaml"))?;
        let zones = Self::load_yaml::<ZonesFile>(&path.join("zones.yaml"))?;
        let peaks = Self::load_yaml::<PeaksFile>(&path.join("peaks.yaml"))?;
        let schemes = Self::load_yaml::<SchemesFile>(&path.join("schemes.yaml"))?;
        let malls = Self::load_yaml::<MallsFile>(&path.join("malls.yaml"))?;
        let holidays = Self::load_holidays(&path.join("holidays"))?;

        let catalog = RateCatalog::new(
            catalog_file.catalog,
            catalog_file.agencies,
            zones.central,
            peaks.peak_windows,
            schemes.free_day_carparks.into_iter().collect::<HashSet<_>>(),
            malls.malls,
        )?;

        Ok(Self { catalog, holidays })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::CatalogNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::CatalogParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every holiday file from the holidays directory.
    fn load_holidays(holidays_dir: &Path) -> EngineResult<HolidayCalendar> {
        let dir_str = holidays_dir.display().to_string();

        if !holidays_dir.exists() {
            return Err(EngineError::CatalogNotFound { path: dir_str });
        }

        let entries = fs::read_dir(holidays_dir).map_err(|_| EngineError::CatalogNotFound {
            path: dir_str.clone(),
        })?;

        let mut dates = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::CatalogNotFound {
                path: dir_str.clone(),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let file = Self::load_yaml::<HolidayFile>(&path)?;
                dates.extend(file.holidays.into_iter().map(|h| h.date));
            }
        }

        if dates.is_empty() {
            return Err(EngineError::CatalogNotFound {
                path: format!("{} (no holiday files found)", dir_str),
            });
        }

        Ok(HolidayCalendar::new(dates))
    }

    /// Returns the validated rate catalog.
    pub fn catalog(&self) -> &RateCatalog {
        &self.catalog
    }

    /// Returns the public-holiday calendar.
    pub fn holidays(&self) -> &HolidayCalendar {
        &self.holidays
    }
}
