//! Metro-zone price resolution.
//!
//! Zones are checked one at a time in declaration order. The first zone whose
//! center is within the radius of the pickup wins; later zones are not measured.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::distance::{DistanceError, DistanceMeasure};
use crate::models::{
    BookingQuote, Location, MetroZone, ZoneMatch, ZoneTable, DEFAULT_DROP_OFF,
    DEFAULT_ZONE_RADIUS_KM,
};

/// Which required input was left blank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Pickup,
    /// SKU, serial number or ticket number
    BookingDetails,
}

impl MissingField {
    pub fn prompt(&self) -> &'static str {
        match self {
            MissingField::Pickup => "Please enter a pickup location",
            MissingField::BookingDetails => "Please fill all fields",
        }
    }
}

/// Why a pickup could not be priced.
///
/// `Display` renders the status message shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolutionError {
    #[error("{}", .0.prompt())]
    MissingInput(MissingField),

    #[error("Pickup location outside supported metro zones. Please contact us.")]
    OutsideZones,

    #[error("Error calculating distance. Please try again.")]
    MeasurementFailed {
        zone: String,
        #[source]
        source: DistanceError,
    },
}

impl ResolutionError {
    pub fn kind(&self) -> &'static str {
        match self {
            ResolutionError::MissingInput(_) => "missing_input",
            ResolutionError::OutsideZones => "outside_zones",
            ResolutionError::MeasurementFailed { .. } => "measurement_failed",
        }
    }
}

/// Immutable resolver configuration
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub zones: ZoneTable,
    pub drop_off: Location,
    pub zone_radius_km: f64,
    /// Measure pickup to drop-off before zone matching. Never affects the price.
    pub check_drop_off: bool,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            zones: ZoneTable::default(),
            drop_off: Location::address(DEFAULT_DROP_OFF),
            zone_radius_km: DEFAULT_ZONE_RADIUS_KM,
            check_drop_off: true,
        }
    }
}

/// Resolves pickup addresses to quotes.
///
/// Holds no per-call state; clones share the provider and settings and may
/// resolve concurrently.
#[derive(Clone)]
pub struct PriceResolver {
    measure: Arc<dyn DistanceMeasure>,
    settings: Arc<ResolverSettings>,
}

impl PriceResolver {
    pub fn new(measure: Arc<dyn DistanceMeasure>, settings: ResolverSettings) -> Self {
        Self {
            measure,
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    pub fn zones(&self) -> &ZoneTable {
        &self.settings.zones
    }

    pub async fn resolve(&self, pickup: &str) -> BookingQuote {
        let drop_off = self
            .settings
            .check_drop_off
            .then_some(&self.settings.drop_off);

        resolve_with(
            self.measure.as_ref(),
            pickup,
            drop_off,
            self.settings.zones.as_slice(),
            self.settings.zone_radius_km,
        )
        .await
    }
}

/// Resolve a pickup against `zones` using the default 50 km radius.
///
/// The pickup to `drop_off` distance is measured first as a feasibility check;
/// its result is recorded on the quote but never blocks zone matching.
pub async fn resolve_price(
    pickup: &str,
    drop_off: &Location,
    zones: &ZoneTable,
    measure: &dyn DistanceMeasure,
) -> BookingQuote {
    resolve_with(
        measure,
        pickup,
        Some(drop_off),
        zones.as_slice(),
        DEFAULT_ZONE_RADIUS_KM,
    )
    .await
}

async fn resolve_with(
    measure: &dyn DistanceMeasure,
    pickup: &str,
    drop_off: Option<&Location>,
    zones: &[MetroZone],
    radius_km: f64,
) -> BookingQuote {
    let pickup = pickup.trim();
    if pickup.is_empty() {
        debug!("Rejecting quote request with empty pickup");
        return BookingQuote::rejected(
            pickup,
            ResolutionError::MissingInput(MissingField::Pickup),
            None,
        );
    }

    let origin = Location::address(pickup);

    let drop_off_km = match drop_off {
        Some(destination) => drop_off_distance(measure, &origin, destination).await,
        None => None,
    };

    match match_zone(measure, &origin, zones, radius_km).await {
        Ok(matched) => {
            info!(
                "Pickup '{}' matched {} at {:.1} km: {} per panel",
                pickup, matched.zone.name, matched.distance_km, matched.zone.price_per_panel
            );
            BookingQuote::priced(pickup, matched, drop_off_km)
        }
        Err(e) => {
            info!("Pickup '{}' not priced: {}", pickup, e.kind());
            BookingQuote::rejected(pickup, e, drop_off_km)
        }
    }
}

async fn drop_off_distance(
    measure: &dyn DistanceMeasure,
    origin: &Location,
    drop_off: &Location,
) -> Option<f64> {
    match measure.measure(origin, drop_off).await {
        Ok(distance) => {
            debug!("Drop-off distance for '{}': {:.1} km", origin, distance.kilometers());
            Some(distance.kilometers())
        }
        Err(e) => {
            warn!("Drop-off check failed for '{}': {}", origin, e);
            None
        }
    }
}

/// First zone in declaration order within `radius_km` of `origin`.
async fn match_zone(
    measure: &dyn DistanceMeasure,
    origin: &Location,
    zones: &[MetroZone],
    radius_km: f64,
) -> Result<ZoneMatch, ResolutionError> {
    for zone in zones {
        let distance = measure
            .measure(origin, &zone.center_location())
            .await
            .map_err(|source| {
                error!("Distance to {} center failed for '{}': {}", zone.name, origin, source);
                ResolutionError::MeasurementFailed {
                    zone: zone.name.clone(),
                    source,
                }
            })?;

        let km = distance.kilometers();
        debug!("'{}' is {:.1} km from {} center", origin, km, zone.name);

        if km <= radius_km {
            return Ok(ZoneMatch {
                zone: zone.clone(),
                distance_km: km,
            });
        }
    }

    Err(ResolutionError::OutsideZones)
}
