//! Offline great-circle distance provider.
//!
//! Free-text addresses are placed by parsing "lat,lon" or by looking up a
//! configured landmark name. Anything else is unresolvable.

use std::collections::HashMap;

use async_trait::async_trait;
use geo::{Distance as _, Haversine, Point};
use tracing::debug;

use super::{Distance, DistanceError, DistanceMeasure};
use crate::models::{GeoPoint, Location};

#[derive(Debug, Clone, Default)]
pub struct StraightLineDistance {
    /// Lowercased landmark name -> point
    landmarks: HashMap<String, GeoPoint>,
}

impl StraightLineDistance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_landmark(mut self, name: &str, point: GeoPoint) -> Self {
        self.add_landmark(name, point);
        self
    }

    pub fn add_landmark(&mut self, name: &str, point: GeoPoint) {
        self.landmarks.insert(normalize(name), point);
    }

    fn locate(&self, location: &Location) -> Result<GeoPoint, DistanceError> {
        match location {
            Location::Point(point) => Ok(*point),
            Location::Address(text) => GeoPoint::parse(text)
                .or_else(|| self.landmarks.get(&normalize(text)).copied())
                .ok_or_else(|| DistanceError::Unresolvable(text.clone())),
        }
    }
}

fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[async_trait]
impl DistanceMeasure for StraightLineDistance {
    async fn measure(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<Distance, DistanceError> {
        let from = self.locate(origin)?;
        let to = self.locate(destination)?;

        let meters = Haversine.distance(Point::new(from.lon, from.lat), Point::new(to.lon, to.lat));
        debug!("Straight-line distance {} -> {}: {:.0} m", origin, destination, meters);

        Ok(Distance::from_meters(meters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_point_is_zero() {
        let provider = StraightLineDistance::new();
        let sydney = Location::point(-33.8688, 151.2093);
        let d = provider.measure(&sydney, &sydney).await.unwrap();
        assert!(d.kilometers() < 1e-6);
    }

    #[tokio::test]
    async fn test_sydney_to_canberra() {
        let provider = StraightLineDistance::new();
        let d = provider
            .measure(
                &Location::address("-33.8688, 151.2093"),
                &Location::point(-35.2809, 149.13),
            )
            .await
            .unwrap();
        // Roughly 246 km as the crow flies
        assert!(d.kilometers() > 240.0 && d.kilometers() < 255.0);
    }

    #[tokio::test]
    async fn test_landmark_lookup_normalizes_name() {
        let provider = StraightLineDistance::new()
            .with_landmark("11 Grand Ave, Camellia NSW 2142", GeoPoint::new(-33.8197, 151.0275));
        let d = provider
            .measure(
                &Location::address("  11 grand ave,  Camellia NSW 2142"),
                &Location::point(-33.8688, 151.2093),
            )
            .await
            .unwrap();
        assert!(d.kilometers() > 10.0 && d.kilometers() < 25.0);
    }

    #[tokio::test]
    async fn test_unknown_address() {
        let provider = StraightLineDistance::new();
        let err = provider
            .measure(&Location::address("Nowhere St"), &Location::point(0.0, 0.0))
            .await
            .unwrap_err();
        assert_eq!(err, DistanceError::Unresolvable("Nowhere St".into()));
    }
}
