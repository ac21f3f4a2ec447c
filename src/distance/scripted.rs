//! Scripted distance provider for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Distance, DistanceError, DistanceMeasure};
use crate::models::Location;

/// Answers from a fixed table keyed on (origin, destination) and records every call.
#[derive(Default)]
pub struct ScriptedDistances {
    answers: HashMap<(String, String), Result<f64, DistanceError>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedDistances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn km(mut self, origin: &str, destination: &Location, km: f64) -> Self {
        self.answers
            .insert((origin.to_string(), destination.to_string()), Ok(km));
        self
    }

    pub fn fails(mut self, origin: &str, destination: &Location, error: DistanceError) -> Self {
        self.answers
            .insert((origin.to_string(), destination.to_string()), Err(error));
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Destinations requested, in call order
    pub fn destinations(&self) -> Vec<String> {
        self.calls().into_iter().map(|(_, d)| d).collect()
    }
}

#[async_trait]
impl DistanceMeasure for ScriptedDistances {
    async fn measure(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<Distance, DistanceError> {
        let key = (origin.to_string(), destination.to_string());
        self.calls.lock().unwrap().push(key.clone());

        match self.answers.get(&key) {
            Some(Ok(km)) => Ok(Distance::from_kilometers(*km)),
            Some(Err(e)) => Err(e.clone()),
            None => Err(DistanceError::Element("NOT_FOUND".to_string())),
        }
    }
}
