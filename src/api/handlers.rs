//! HTTP request handlers for the parking engine API.

use std::str::FromStr;
use std::time::Instant;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{estimate_erp, rank_facilities, select_recommendation};
use crate::models::{Coordinate, Destination, PricingContext, Priority};

use super::request::CarparkQuery;
use super::response::{ApiError, ApiErrorResponse, CarparkResponse};
use super::state::AppState;

/// The default session duration in hours when the query omits one.
const DEFAULT_DURATION_HOURS: i64 = 2;

/// The default search radius in kilometers.
const DEFAULT_RADIUS_KM: f64 = 2.0;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/carparks", get(carparks_handler))
        .with_state(state)
}

/// Handler for GET /carparks.
///
/// Fetches one availability snapshot, ranks it for the requested
/// destination and timing, and returns the scored list together with the
/// banner recommendation and the coarse ERP estimate.
async fn carparks_handler(
    State(state): State<AppState>,
    query: Result<Query<CarparkQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing carpark search");

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection,
                "Malformed query string"
            );
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiError::validation_error(rejection.to_string())),
            )
                .into_response();
        }
    };

    let (Some(lat), Some(lng)) = (query.lat, query.lng) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiError::validation_error("lat and lng are required")),
        )
            .into_response();
    };
    if !lat.is_finite() || !lng.is_finite() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiError::validation_error("lat and lng must be finite")),
        )
            .into_response();
    }

    // Malformed optional values degrade to defaults rather than failing.
    let start = query
        .start
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);
    let duration = query
        .duration
        .as_deref()
        .and_then(|s| Decimal::from_str(s).ok())
        .unwrap_or_else(|| Decimal::from(DEFAULT_DURATION_HOURS));
    let priority = Priority::from_key(query.priority.as_deref().unwrap_or("balanced"));

    let ctx = PricingContext::new(
        Destination {
            name: query.dest.unwrap_or_default(),
            coordinate: Coordinate::new(lat, lng),
        },
        start,
        duration,
        priority,
        query.radius.unwrap_or(DEFAULT_RADIUS_KM),
    );

    let records = match state.source().fetch().await {
        Ok(records) => records,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Availability fetch failed"
            );
            let response: ApiErrorResponse = err.into();
            return response.into_response();
        }
    };

    let started = Instant::now();
    let catalog = state.catalog().catalog();
    let holidays = state.catalog().holidays();

    let carparks = rank_facilities(&records, &ctx, catalog, holidays);
    let recommendation =
        select_recommendation(&carparks, ctx.start, ctx.duration_hours, catalog, holidays);
    let destination_central = catalog.central().bounds.contains(ctx.destination.coordinate);
    let erp = estimate_erp(
        ctx.destination.coordinate,
        ctx.start,
        ctx.duration_hours,
        destination_central,
    );

    info!(
        correlation_id = %correlation_id,
        records = records.len(),
        ranked = carparks.len(),
        priority = ?ctx.priority,
        duration_us = started.elapsed().as_micros() as u64,
        "Ranking completed"
    );

    (
        StatusCode::OK,
        Json(CarparkResponse {
            total: carparks.len(),
            carparks,
            recommendation,
            erp,
        }),
    )
        .into_response()
}
