//! Hosted distance matrix client.
//!
//! One origin, one destination per request. The service answers with a
//! top-level status plus a row/element grid; only `rows[0].elements[0]` is read.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::{Distance, DistanceError, DistanceMeasure, TravelMode, UnitSystem};
use crate::models::Location;

pub const DEFAULT_MATRIX_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

/// Connection settings for [`DistanceMatrixClient`]
#[derive(Debug, Clone)]
pub struct MatrixOptions {
    pub base_url: String,
    pub travel_mode: TravelMode,
    pub unit_system: UnitSystem,
    pub timeout: Duration,
}

impl Default for MatrixOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MATRIX_URL.to_string(),
            travel_mode: TravelMode::Driving,
            unit_system: UnitSystem::Metric,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Distance provider backed by the distance matrix HTTP API
pub struct DistanceMatrixClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    travel_mode: TravelMode,
    unit_system: UnitSystem,
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    distance: Option<MatrixValue>,
}

#[derive(Debug, Deserialize)]
struct MatrixValue {
    /// Always meters
    value: f64,
}

impl DistanceMatrixClient {
    pub fn new(api_key: &str, options: MatrixOptions) -> Result<Self, DistanceError> {
        if api_key.trim().is_empty() {
            return Err(DistanceError::MissingApiKey);
        }

        let endpoint = Url::parse(&options.base_url)
            .map_err(|e| DistanceError::Request(format!("invalid base URL: {}", e)))?;

        let client = Client::builder()
            .user_agent("Panelquote/0.1 (booking price resolver)")
            .timeout(options.timeout)
            .build()
            .map_err(|e| DistanceError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.trim().to_string(),
            travel_mode: options.travel_mode,
            unit_system: options.unit_system,
        })
    }

    fn request_url(&self, origin: &Location, destination: &Location) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("origins", &origin.to_string())
            .append_pair("destinations", &destination.to_string())
            .append_pair("mode", self.travel_mode.as_str())
            .append_pair("units", self.unit_system.as_str())
            .append_pair("key", &self.api_key);
        url
    }
}

#[async_trait]
impl DistanceMeasure for DistanceMatrixClient {
    async fn measure(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<Distance, DistanceError> {
        debug!("Distance matrix request: {} -> {}", origin, destination);

        let response = self
            .client
            .get(self.request_url(origin, destination))
            .send()
            .await
            .map_err(|e| DistanceError::Request(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("Distance matrix HTTP error {}", status);
            return Err(DistanceError::Request(format!("HTTP {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DistanceError::Request(e.without_url().to_string()))?;

        parse_matrix_response(&body)
    }
}

/// Extract the single origin/destination distance from a response body.
pub fn parse_matrix_response(body: &str) -> Result<Distance, DistanceError> {
    let response: MatrixResponse =
        serde_json::from_str(body).map_err(|e| DistanceError::Malformed(e.to_string()))?;

    if response.status != "OK" {
        return Err(DistanceError::Status {
            status: response.status,
            message: response.error_message,
        });
    }

    let element = response
        .rows
        .into_iter()
        .next()
        .and_then(|row| row.elements.into_iter().next())
        .ok_or_else(|| DistanceError::Malformed("response has no elements".to_string()))?;

    if element.status != "OK" {
        return Err(DistanceError::Element(element.status));
    }

    element
        .distance
        .map(|d| Distance::from_meters(d.value))
        .ok_or_else(|| DistanceError::Malformed("element has no distance".to_string()))
}
