//! HTTP handlers for quotes and bookings.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use panelquote::booking::{submit_booking, BookingRequest};
use panelquote::models::{BookingQuote, QuoteView};
use panelquote::ResolutionError;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    zones: usize,
}

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        zones: state.resolver.zones().len(),
    })
}

#[derive(Serialize)]
pub struct ZoneResponse {
    name: String,
    lat: f64,
    lon: f64,
    price_per_panel: Decimal,
    radius_km: f64,
}

/// Supported zones in evaluation order
pub async fn zones(State(state): State<Arc<AppState>>) -> Json<Vec<ZoneResponse>> {
    let radius_km = state.resolver.settings().zone_radius_km;
    Json(
        state
            .resolver
            .zones()
            .iter()
            .map(|zone| ZoneResponse {
                name: zone.name.clone(),
                lat: zone.center.lat,
                lon: zone.center.lon,
                price_per_panel: zone.price_per_panel,
                radius_km,
            })
            .collect(),
    )
}

#[derive(Deserialize)]
pub struct QuoteParams {
    /// Pickup address text
    pickup: Option<String>,
}

/// Price a pickup address
pub async fn quote(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuoteParams>,
) -> (StatusCode, Json<QuoteView>) {
    let quote = state
        .resolver
        .resolve(params.pickup.as_deref().unwrap_or(""))
        .await;

    (status_for(&quote), Json(quote.view()))
}

#[derive(Serialize)]
pub struct BookingResponse {
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    booking_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    submitted_at: Option<DateTime<Utc>>,
    status: String,
    quote: QuoteView,
}

/// Submit a booking form
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BookingRequest>,
) -> (StatusCode, Json<BookingResponse>) {
    let result = submit_booking(&state.resolver, request).await;

    let code = match result.receipt {
        Some(_) => StatusCode::CREATED,
        None => status_for(&result.quote),
    };

    (
        code,
        Json(BookingResponse {
            accepted: result.is_accepted(),
            booking_id: result.receipt.as_ref().map(|r| r.booking_id),
            submitted_at: result.receipt.as_ref().map(|r| r.submitted_at),
            status: result.status_message(),
            quote: result.quote.view(),
        }),
    )
}

/// Outside-zone pickups are a normal answer; only bad input and provider failures are errors.
fn status_for(quote: &BookingQuote) -> StatusCode {
    match quote.error() {
        None | Some(ResolutionError::OutsideZones) => StatusCode::OK,
        Some(ResolutionError::MissingInput(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(ResolutionError::MeasurementFailed { .. }) => StatusCode::BAD_GATEWAY,
    }
}
