//! Error types for the parking engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Catalog problems are startup-time failures: the engine must refuse to go
//! into service with a broken rate catalog. Per-request input problems are
//! never errors — malformed facilities are dropped, bad durations clamped,
//! unknown priorities and agencies fall back to defaults.

use thiserror::Error;

/// The main error type for the parking engine.
///
/// # Example
///
/// ```
/// use parking_engine::error::EngineError;
///
/// let error = EngineError::CatalogNotFound {
///     path: "/missing/catalog.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Catalog file not found: /missing/catalog.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A rate catalog file was not found at the specified path.
    #[error("Catalog file not found: {path}")]
    CatalogNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A rate catalog file could not be parsed.
    #[error("Failed to parse catalog file '{path}': {message}")]
    CatalogParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The rate catalog failed startup validation.
    #[error("Invalid catalog entry '{entry}': {message}")]
    CatalogInvalid {
        /// The catalog entry that failed validation.
        entry: String,
        /// A description of what made the entry invalid.
        message: String,
    },

    /// The upstream facility-availability source could not be reached.
    #[error("Availability source unavailable: {message}")]
    AvailabilityUnavailable {
        /// A description of the failure reported by the collaborator.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
