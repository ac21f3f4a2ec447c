//! Resolver output and its serializable view.

use rust_decimal::Decimal;
use serde::Serialize;

use super::MetroZone;
use crate::resolver::ResolutionError;

/// The zone a pickup fell into, with the measured distance to its center
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneMatch {
    pub zone: MetroZone,
    pub distance_km: f64,
}

/// Decision for a single pickup address.
///
/// A quote carries a price if and only if `outcome` is `Ok`.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingQuote {
    /// Pickup text as evaluated (trimmed)
    pub pickup: String,
    pub outcome: Result<ZoneMatch, ResolutionError>,
    /// Pickup to drop-off distance, when the feasibility check ran and succeeded
    pub drop_off_km: Option<f64>,
}

impl BookingQuote {
    pub fn priced(pickup: &str, matched: ZoneMatch, drop_off_km: Option<f64>) -> Self {
        Self {
            pickup: pickup.to_string(),
            outcome: Ok(matched),
            drop_off_km,
        }
    }

    pub fn rejected(pickup: &str, error: ResolutionError, drop_off_km: Option<f64>) -> Self {
        Self {
            pickup: pickup.to_string(),
            outcome: Err(error),
            drop_off_km,
        }
    }

    pub fn is_priced(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn matched_zone(&self) -> Option<&MetroZone> {
        self.outcome.as_ref().ok().map(|m| &m.zone)
    }

    pub fn price_per_panel(&self) -> Option<Decimal> {
        self.matched_zone().map(|zone| zone.price_per_panel)
    }

    pub fn error(&self) -> Option<&ResolutionError> {
        self.outcome.as_ref().err()
    }

    /// Stable machine tag: "priced" or the rejection kind
    pub fn kind(&self) -> &'static str {
        match &self.outcome {
            Ok(_) => "priced",
            Err(e) => e.kind(),
        }
    }

    /// Human-readable status line
    pub fn status_message(&self) -> String {
        match &self.outcome {
            Ok(matched) => price_line(matched.zone.price_per_panel),
            Err(e) => e.to_string(),
        }
    }

    pub fn view(&self) -> QuoteView {
        let matched = self.outcome.as_ref().ok();
        QuoteView {
            pickup: self.pickup.clone(),
            priced: self.is_priced(),
            kind: self.kind(),
            zone: matched.map(|m| m.zone.name.clone()),
            price_per_panel: matched.map(|m| m.zone.price_per_panel),
            distance_km: matched.map(|m| m.distance_km),
            drop_off_km: self.drop_off_km,
            status: self.status_message(),
        }
    }
}

/// "Price: $179.95 per panel"
pub fn price_line(price: Decimal) -> String {
    format!("Price: ${:.2} per panel", price)
}

/// Quote as returned by the HTTP API and the CLI
#[derive(Debug, Clone, Serialize)]
pub struct QuoteView {
    pub pickup: String,
    pub priced: bool,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_panel: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_off_km: Option<f64>,
    pub status: String,
}
