//! Panelquote - metro-zone price resolution for panel shipping bookings
//!
//! This library provides shared types and modules for the server and quote binaries.

pub mod booking;
pub mod config;
pub mod distance;
pub mod models;
pub mod resolver;

pub use models::{BookingQuote, GeoPoint, Location, MetroZone, ZoneTable};
pub use resolver::{resolve_price, PriceResolver, ResolutionError};
