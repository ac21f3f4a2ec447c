//! Distance measurement between a pickup and a destination.
//!
//! The resolver only sees the [`DistanceMeasure`] trait. Two providers ship
//! with the crate: the hosted distance matrix service and an offline
//! great-circle provider.

pub mod matrix;
pub mod straight_line;

#[cfg(test)]
pub(crate) mod scripted;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Location;

pub use matrix::{DistanceMatrixClient, MatrixOptions, DEFAULT_MATRIX_URL};
pub use straight_line::StraightLineDistance;

/// Measures the travel distance between two locations.
#[async_trait]
pub trait DistanceMeasure: Send + Sync {
    async fn measure(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<Distance, DistanceError>;
}

/// A measured distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance {
    meters: f64,
}

impl Distance {
    pub fn from_meters(meters: f64) -> Self {
        Self { meters }
    }

    pub fn from_kilometers(km: f64) -> Self {
        Self { meters: km * 1000.0 }
    }

    pub fn meters(&self) -> f64 {
        self.meters
    }

    pub fn kilometers(&self) -> f64 {
        self.meters / 1000.0
    }
}

/// Failures reported by a distance provider
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistanceError {
    #[error("distance request failed: {0}")]
    Request(String),

    #[error("distance service returned status {status}{}", status_detail(.message))]
    Status {
        status: String,
        message: Option<String>,
    },

    #[error("no route between origin and destination: {0}")]
    Element(String),

    #[error("malformed distance response: {0}")]
    Malformed(String),

    #[error("cannot locate '{0}'")]
    Unresolvable(String),

    #[error("no API key configured for the distance service")]
    MissingApiKey,
}

fn status_detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

/// Travel mode requested from the distance service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }
}

/// Unit system for the human-readable text of the response.
///
/// Numeric distances are always meters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }
}
