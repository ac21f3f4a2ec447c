//! Panel shipping booking submission.
//!
//! A booking needs a pickup address plus the panel SKU, serial number and
//! service ticket. Storage of accepted bookings is left to the caller.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::models::{price_line, BookingQuote};
use crate::resolver::{MissingField, PriceResolver, ResolutionError};

/// Booking form as submitted by the user. Omitted fields are blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingRequest {
    pub pickup: String,
    pub sku: String,
    pub serial_number: String,
    pub ticket_number: String,
}

impl BookingRequest {
    /// Pickup is checked first, then the panel details.
    pub fn validate(&self) -> Result<(), ResolutionError> {
        if self.pickup.trim().is_empty() {
            return Err(ResolutionError::MissingInput(MissingField::Pickup));
        }

        let details = [&self.sku, &self.serial_number, &self.ticket_number];
        if details.iter().any(|field| field.trim().is_empty()) {
            return Err(ResolutionError::MissingInput(MissingField::BookingDetails));
        }

        Ok(())
    }
}

/// An accepted, priced booking
#[derive(Debug, Clone, Serialize)]
pub struct BookingReceipt {
    pub booking_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub request: BookingRequest,
    pub zone: String,
    pub price_per_panel: Decimal,
}

impl BookingReceipt {
    pub fn status_message(&self) -> String {
        format!("Booking submitted! {}", price_line(self.price_per_panel))
    }
}

/// Outcome of a submission. `receipt` is present only for priced quotes.
#[derive(Debug, Clone)]
pub struct BookingResult {
    pub quote: BookingQuote,
    pub receipt: Option<BookingReceipt>,
}

impl BookingResult {
    pub fn is_accepted(&self) -> bool {
        self.receipt.is_some()
    }

    pub fn status_message(&self) -> String {
        match &self.receipt {
            Some(receipt) => receipt.status_message(),
            None => self.quote.status_message(),
        }
    }
}

/// Validate the form, price the pickup and issue a receipt.
pub async fn submit_booking(resolver: &PriceResolver, request: BookingRequest) -> BookingResult {
    if let Err(e) = request.validate() {
        return BookingResult {
            quote: BookingQuote::rejected(request.pickup.trim(), e, None),
            receipt: None,
        };
    }

    let quote = resolver.resolve(&request.pickup).await;

    let receipt = quote.matched_zone().map(|zone| BookingReceipt {
        booking_id: Uuid::new_v4(),
        submitted_at: Utc::now(),
        request: request.clone(),
        zone: zone.name.clone(),
        price_per_panel: zone.price_per_panel,
    });

    if let Some(ref receipt) = receipt {
        info!(
            "Booking {} accepted: ticket {} from {} ({}, {} per panel)",
            receipt.booking_id,
            request.ticket_number,
            quote.pickup,
            receipt.zone,
            receipt.price_per_panel
        );
    }

    BookingResult { quote, receipt }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::scripted::ScriptedDistances;
    use crate::models::ZoneTable;
    use crate::resolver::ResolverSettings;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn request(pickup: &str) -> BookingRequest {
        BookingRequest {
            pickup: pickup.to_string(),
            sku: "PNL-450W".to_string(),
            serial_number: "SN-88213".to_string(),
            ticket_number: "T-1042".to_string(),
        }
    }

    fn melbourne_resolver(measure: Arc<ScriptedDistances>) -> PriceResolver {
        let settings = ResolverSettings {
            check_drop_off: false,
            ..ResolverSettings::default()
        };
        PriceResolver::new(measure, settings)
    }

    #[test]
    fn test_validate_order() {
        let mut empty = BookingRequest::default();
        assert_eq!(
            empty.validate(),
            Err(ResolutionError::MissingInput(MissingField::Pickup))
        );

        empty.pickup = "Fitzroy VIC".to_string();
        assert_eq!(
            empty.validate(),
            Err(ResolutionError::MissingInput(MissingField::BookingDetails))
        );

        assert!(request("Fitzroy VIC").validate().is_ok());
    }

    #[test]
    fn test_omitted_fields_deserialize_blank() {
        let request: BookingRequest = serde_json::from_str(
            r#"{"pickup":"Sydney","serial_number":"S","ticket_number":"T"}"#,
        )
        .unwrap();
        assert_eq!(request.sku, "");
        assert_eq!(
            request.validate(),
            Err(ResolutionError::MissingInput(MissingField::BookingDetails))
        );
    }

    #[tokio::test]
    async fn test_accepted_booking() {
        let zones = ZoneTable::australian_metros();
        let measure = Arc::new(
            ScriptedDistances::new()
                .km("Fitzroy VIC", &zones.find("Sydney").unwrap().center_location(), 710.0)
                .km("Fitzroy VIC", &zones.find("Melbourne").unwrap().center_location(), 3.0),
        );

        let result = submit_booking(&melbourne_resolver(measure), request("Fitzroy VIC")).await;

        assert!(result.is_accepted());
        let receipt = result.receipt.as_ref().unwrap();
        assert_eq!(receipt.zone, "Melbourne");
        assert_eq!(receipt.price_per_panel, dec!(209.95));
        assert_eq!(receipt.request.ticket_number, "T-1042");
        assert_eq!(
            result.status_message(),
            "Booking submitted! Price: $209.95 per panel"
        );
    }

    #[tokio::test]
    async fn test_incomplete_form_is_not_measured() {
        let measure = Arc::new(ScriptedDistances::new());
        let mut incomplete = request("Fitzroy VIC");
        incomplete.serial_number = " ".to_string();

        let result = submit_booking(&melbourne_resolver(measure.clone()), incomplete).await;

        assert!(!result.is_accepted());
        assert_eq!(result.quote.kind(), "missing_input");
        assert_eq!(result.status_message(), "Please fill all fields");
        assert!(measure.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_quote_has_no_receipt() {
        let measure = Arc::new(ScriptedDistances::new());

        let result = submit_booking(&melbourne_resolver(measure), request("Atlantis")).await;

        assert!(result.receipt.is_none());
        assert_eq!(result.quote.kind(), "measurement_failed");
        assert_eq!(
            result.status_message(),
            "Error calculating distance. Please try again."
        );
    }
}
