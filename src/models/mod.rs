//! Core data models for price resolution.

pub mod location;
pub mod quote;
pub mod zone;

pub use location::{GeoPoint, Location};
pub use quote::{price_line, BookingQuote, QuoteView, ZoneMatch};
pub use zone::{MetroZone, ZoneTable, DEFAULT_DROP_OFF, DEFAULT_ZONE_RADIUS_KM};
