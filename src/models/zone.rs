//! Metro zones and the ordered zone table.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{GeoPoint, Location};

/// Inclusion radius around every zone center
pub const DEFAULT_ZONE_RADIUS_KM: f64 = 50.0;

/// Fixed destination for every shipment
pub const DEFAULT_DROP_OFF: &str = "11 Grand Ave, Camellia NSW 2142";

/// A supported service area with a flat per-panel price.
#[derive(Debug, Clone, PartialEq)]
pub struct MetroZone {
    pub name: String,
    pub center: GeoPoint,
    pub price_per_panel: Decimal,
}

impl MetroZone {
    pub fn new(name: &str, lat: f64, lon: f64, price_per_panel: Decimal) -> Self {
        Self {
            name: name.to_string(),
            center: GeoPoint::new(lat, lon),
            price_per_panel,
        }
    }

    /// Destination used when measuring the distance to this zone
    pub fn center_location(&self) -> Location {
        self.center.into()
    }
}

/// Ordered, immutable collection of zones.
///
/// Declaration order is evaluation order. Cloning shares the underlying table.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneTable {
    zones: Arc<[MetroZone]>,
}

impl ZoneTable {
    pub fn new(zones: Vec<MetroZone>) -> Self {
        Self {
            zones: zones.into(),
        }
    }

    /// Sydney, Melbourne, Canberra, Brisbane, in that order
    pub fn australian_metros() -> Self {
        Self::new(vec![
            MetroZone::new("Sydney", -33.8688, 151.2093, dec!(179.95)),
            MetroZone::new("Melbourne", -37.8136, 144.9631, dec!(209.95)),
            MetroZone::new("Canberra", -35.2809, 149.13, dec!(199.95)),
            MetroZone::new("Brisbane", -27.4698, 153.0251, dec!(219.95)),
        ])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetroZone> {
        self.zones.iter()
    }

    pub fn as_slice(&self) -> &[MetroZone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Case-insensitive lookup by zone name
    pub fn find(&self, name: &str) -> Option<&MetroZone> {
        self.zones
            .iter()
            .find(|zone| zone.name.eq_ignore_ascii_case(name.trim()))
    }
}

impl Default for ZoneTable {
    fn default() -> Self {
        Self::australian_metros()
    }
}
