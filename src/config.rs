//! TOML configuration for the resolver and its distance provider.
//!
//! Every section is optional; an empty file yields the built-in zone table,
//! the fixed drop-off and the distance matrix provider.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::distance::{
    DistanceMatrixClient, DistanceMeasure, MatrixOptions, StraightLineDistance, TravelMode,
    UnitSystem, DEFAULT_MATRIX_URL,
};
use crate::models::{
    GeoPoint, Location, MetroZone, ZoneTable, DEFAULT_DROP_OFF, DEFAULT_ZONE_RADIUS_KM,
};
use crate::resolver::{PriceResolver, ResolverSettings};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default = "default_zones")]
    pub zones: Vec<ZoneConfig>,
    #[serde(default = "default_landmarks")]
    pub landmarks: Vec<LandmarkConfig>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GlobalConfig {
    pub drop_off: String,
    pub zone_radius_km: f64,
    pub check_drop_off: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            drop_off: DEFAULT_DROP_OFF.to_string(),
            zone_radius_km: DEFAULT_ZONE_RADIUS_KM,
            check_drop_off: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    Matrix,
    StraightLine,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// Environment variable holding the distance matrix API key
    pub api_key_env: String,
    pub base_url: String,
    pub travel_mode: TravelMode,
    pub unit_system: UnitSystem,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Matrix,
            api_key_env: "GOOGLE_MAPS_API_KEY".to_string(),
            base_url: DEFAULT_MATRIX_URL.to_string(),
            travel_mode: TravelMode::Driving,
            unit_system: UnitSystem::Metric,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ZoneConfig {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub price_per_panel: Decimal,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LandmarkConfig {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

fn default_zones() -> Vec<ZoneConfig> {
    ZoneTable::australian_metros()
        .iter()
        .map(|zone| ZoneConfig {
            name: zone.name.clone(),
            lat: zone.center.lat,
            lon: zone.center.lon,
            price_per_panel: zone.price_per_panel,
        })
        .collect()
}

fn default_landmarks() -> Vec<LandmarkConfig> {
    vec![LandmarkConfig {
        name: DEFAULT_DROP_OFF.to_string(),
        lat: -33.8197,
        lon: 151.0275,
    }]
}

impl Default for Config {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Built-in configuration, equivalent to an empty file
    pub fn builtin() -> Self {
        Self {
            global: GlobalConfig::default(),
            provider: ProviderConfig::default(),
            zones: default_zones(),
            landmarks: default_landmarks(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.zones.is_empty() {
            bail!("At least one zone must be configured");
        }
        if !(self.global.zone_radius_km > 0.0) {
            bail!("zone_radius_km must be positive, got {}", self.global.zone_radius_km);
        }
        if self.global.drop_off.trim().is_empty() {
            bail!("drop_off must not be empty");
        }

        if self.provider.timeout_secs == 0 {
            bail!("provider timeout_secs must be at least 1");
        }

        let mut seen = HashSet::new();
        for zone in &self.zones {
            if zone.name.trim().is_empty() {
                bail!("Zone names must not be empty");
            }
            if !seen.insert(zone.name.to_lowercase()) {
                bail!("Duplicate zone '{}'", zone.name);
            }
            if zone.price_per_panel <= Decimal::ZERO {
                bail!("Zone '{}' has a non-positive price", zone.name);
            }
            if !GeoPoint::new(zone.lat, zone.lon).is_valid() {
                bail!("Zone '{}' has out-of-range coordinates", zone.name);
            }
        }

        for landmark in &self.landmarks {
            if !GeoPoint::new(landmark.lat, landmark.lon).is_valid() {
                bail!("Landmark '{}' has out-of-range coordinates", landmark.name);
            }
        }

        Ok(())
    }

    pub fn zone_table(&self) -> ZoneTable {
        ZoneTable::new(
            self.zones
                .iter()
                .map(|z| MetroZone::new(&z.name, z.lat, z.lon, z.price_per_panel))
                .collect(),
        )
    }

    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            zones: self.zone_table(),
            drop_off: Location::address(self.global.drop_off.trim()),
            zone_radius_km: self.global.zone_radius_km,
            check_drop_off: self.global.check_drop_off,
        }
    }

    /// Offline provider knowing the configured landmarks and zone names
    pub fn straight_line(&self) -> StraightLineDistance {
        let mut provider = StraightLineDistance::new();
        for zone in &self.zones {
            provider.add_landmark(&zone.name, GeoPoint::new(zone.lat, zone.lon));
        }
        for landmark in &self.landmarks {
            provider.add_landmark(&landmark.name, GeoPoint::new(landmark.lat, landmark.lon));
        }
        provider
    }

    /// Build the configured distance provider.
    ///
    /// `api_key` overrides the key read from `provider.api_key_env`.
    pub fn build_measure(&self, api_key: Option<&str>) -> Result<Arc<dyn DistanceMeasure>> {
        match self.provider.kind {
            ProviderKind::StraightLine => Ok(Arc::new(self.straight_line())),
            ProviderKind::Matrix => {
                let key = match api_key {
                    Some(key) => key.to_string(),
                    None => std::env::var(&self.provider.api_key_env).with_context(|| {
                        format!(
                            "Distance matrix API key not set (expected ${})",
                            self.provider.api_key_env
                        )
                    })?,
                };

                let options = MatrixOptions {
                    base_url: self.provider.base_url.clone(),
                    travel_mode: self.provider.travel_mode,
                    unit_system: self.provider.unit_system,
                    timeout: Duration::from_secs(self.provider.timeout_secs),
                };

                let client = DistanceMatrixClient::new(&key, options)
                    .context("Failed to create distance matrix client")?;
                Ok(Arc::new(client))
            }
        }
    }

    pub fn build_resolver(&self, api_key: Option<&str>) -> Result<PriceResolver> {
        Ok(PriceResolver::new(
            self.build_measure(api_key)?,
            self.resolver_settings(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_is_builtin() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.zone_table(), ZoneTable::australian_metros());
        assert_eq!(config.global.drop_off, DEFAULT_DROP_OFF);
        assert_eq!(config.global.zone_radius_km, 50.0);
        assert!(config.global.check_drop_off);
        assert_eq!(config.provider.kind, ProviderKind::Matrix);
        assert_eq!(config.landmarks.len(), 1);
    }

    #[test]
    fn test_load_custom_zones() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("panelquote.toml");
        fs::write(
            &path,
            r#"
            [global]
            zone_radius_km = 40.0
            check_drop_off = false

            [provider]
            kind = "straight_line"

            [[zones]]
            name = "Perth"
            lat = -31.9523
            lon = 115.8613
            price_per_panel = 239.95

            [[zones]]
            name = "Adelaide"
            lat = -34.9285
            lon = 138.6007
            price_per_panel = "229.95"
            "#,
        )
        .unwrap();

        let config = Config::load_from_file(&path).unwrap();
        let table = config.zone_table();
        assert_eq!(table.len(), 2);
        assert_eq!(table.as_slice()[0].name, "Perth");
        assert_eq!(table.as_slice()[0].price_per_panel, dec!(239.95));
        assert_eq!(table.as_slice()[1].price_per_panel, dec!(229.95));

        let settings = config.resolver_settings();
        assert_eq!(settings.zone_radius_km, 40.0);
        assert!(!settings.check_drop_off);
        assert_eq!(config.provider.kind, ProviderKind::StraightLine);
    }

    #[test]
    fn test_rejects_duplicate_zone() {
        let result = Config::from_toml_str(
            r#"
            [[zones]]
            name = "Sydney"
            lat = -33.8688
            lon = 151.2093
            price_per_panel = 179.95

            [[zones]]
            name = "sydney"
            lat = -33.8688
            lon = 151.2093
            price_per_panel = 189.95
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::from_toml_str("[global]\nzone_radius_km = 0.0").is_err());
        assert!(Config::from_toml_str("zones = []").is_err());
        assert!(Config::from_toml_str("[provider]\ntimeout_secs = 0").is_err());
        assert!(Config::from_toml_str(
            r#"
            [[zones]]
            name = "  "
            lat = -33.8688
            lon = 151.2093
            price_per_panel = 179.95
            "#
        )
        .is_err());
        assert!(Config::from_toml_str(
            r#"
            [[zones]]
            name = "Free"
            lat = 0.0
            lon = 0.0
            price_per_panel = 0
            "#
        )
        .is_err());
    }

    #[test]
    fn test_matrix_provider_requires_key() {
        let mut config = Config::builtin();
        config.provider.api_key_env = "PANELQUOTE_TEST_UNSET_KEY".to_string();
        assert!(config.build_measure(None).is_err());
        assert!(config.build_measure(Some("explicit-key")).is_ok());
    }

    #[tokio::test]
    async fn test_straight_line_knows_zone_names() {
        let mut config = Config::builtin();
        config.provider.kind = ProviderKind::StraightLine;

        let resolver = config.build_resolver(None).unwrap();
        let quote = resolver.resolve("brisbane").await;

        assert_eq!(quote.matched_zone().unwrap().name, "Brisbane");
        assert_eq!(quote.price_per_panel(), Some(dec!(219.95)));
        // Drop-off is a built-in landmark
        assert!(quote.drop_off_km.unwrap() > 500.0);
    }
}
