//! Application state for the parking engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::availability::AvailabilitySource;
use crate::catalog::CatalogLoader;

/// Shared application state.
///
/// Contains resources shared across all request handlers: the loaded rate
/// catalog and the availability collaborator.
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<CatalogLoader>,
    source: Arc<dyn AvailabilitySource>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(catalog: CatalogLoader, source: Arc<dyn AvailabilitySource>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            source,
        }
    }

    /// Returns a reference to the catalog loader.
    pub fn catalog(&self) -> &CatalogLoader {
        &self.catalog
    }

    /// Returns the availability source.
    pub fn source(&self) -> &dyn AvailabilitySource {
        self.source.as_ref()
    }
}
