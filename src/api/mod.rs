//! The HTTP adapter for the parking engine.
//!
//! A thin axum layer over the pure engine: one endpoint that fetches an
//! availability snapshot, ranks it, and returns the scored result set with
//! the recommendation banner and ERP estimate. Request caching belongs to
//! the surrounding system, not this adapter.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::CarparkQuery;
pub use response::{ApiError, ApiErrorResponse, CarparkResponse};
pub use state::AppState;
