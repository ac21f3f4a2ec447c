//! Origins and destinations handed to the distance service.

use serde::{Deserialize, Serialize};

/// Geographic point (lat/lon)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether the point lies within WGS84 latitude/longitude bounds
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }

    /// Parse a "lat,lon" pair such as "-33.8688, 151.2093".
    pub fn parse(text: &str) -> Option<Self> {
        let (lat, lon) = text.split_once(',')?;
        let point = Self::new(lat.trim().parse().ok()?, lon.trim().parse().ok()?);
        point.is_valid().then_some(point)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Either side of a distance lookup.
///
/// Deserializes from `{"lat": .., "lon": ..}` or a plain address string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Point(GeoPoint),
    Address(String),
}

impl Location {
    pub fn address(text: impl Into<String>) -> Self {
        Location::Address(text.into())
    }

    pub fn point(lat: f64, lon: f64) -> Self {
        Location::Point(GeoPoint::new(lat, lon))
    }
}

impl From<GeoPoint> for Location {
    fn from(point: GeoPoint) -> Self {
        Location::Point(point)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Point(point) => write!(f, "{}", point),
            Location::Address(text) => write!(f, "{}", text),
        }
    }
}
