//! Map configuration embedded at compile time from `config/map.toml`.

use beredskap_map_layers::background::BackgroundTiles;
use beredskap_map_resource_models::LonLat;
use beredskap_map_surface::ControlPosition;
use serde::Deserialize;

use crate::ConfigError;

const MAP_TOML: &str = include_str!("../config/map.toml");

/// Initial view, base style and data locations of the map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapConfig {
    /// Initial map center as `[lon, lat]`.
    pub center: LonLat,
    /// Initial zoom level.
    pub zoom: f64,
    /// URL of the base `MapLibre` style.
    pub style_url: String,
    /// Relative path of the bundled shelter file.
    pub shelters_path: String,
    /// Corner holding the zoom and compass buttons.
    #[serde(default)]
    pub navigation_control: ControlPosition,
    /// Background raster tiles.
    #[serde(default)]
    pub background: BackgroundTiles,
}

impl MapConfig {
    /// Parses a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the TOML is malformed or misses a
    /// required key.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(content)?)
    }

    /// The configuration bundled with the crate.
    ///
    /// # Panics
    ///
    /// Panics if the embedded `config/map.toml` fails to parse. It is a
    /// compile-time constant, so a failure is a development error caught by
    /// the tests.
    #[must_use]
    pub fn embedded() -> Self {
        Self::from_toml(MAP_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded map config: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beredskap_map_data::shelters::DEFAULT_SHELTER_PATH;
    use beredskap_map_layers::background::KARTVERKET_GRAATONE_TILES;

    #[test]
    fn embedded_config_parses() {
        let config = MapConfig::embedded();
        assert_eq!(config.center, LonLat::new(8.005, 58.15));
        assert!((config.zoom - 12.0).abs() < f64::EPSILON);
        assert_eq!(config.shelters_path, DEFAULT_SHELTER_PATH);
        assert_eq!(config.navigation_control, ControlPosition::TopRight);
        assert_eq!(config.background.tiles_url, KARTVERKET_GRAATONE_TILES);
        assert_eq!(config.background.tile_size, 256);
    }

    #[test]
    fn background_defaults_to_kartverket() {
        let config = MapConfig::from_toml(
            r#"
            center = [10.75, 59.91]
            zoom = 10
            style_url = "https://example.org/style.json"
            shelters_path = "./shelters.geojson"
            "#,
        )
        .unwrap();
        assert_eq!(config.center, LonLat::new(10.75, 59.91));
        assert_eq!(config.background, BackgroundTiles::default());
        assert_eq!(config.navigation_control, ControlPosition::TopRight);
    }

    #[test]
    fn navigation_control_can_move() {
        let config = MapConfig::from_toml(
            r#"
            center = [8.005, 58.15]
            zoom = 12
            style_url = "https://example.org/style.json"
            shelters_path = "./tilfluktsrom.geojson"
            navigation_control = "bottom-left"
            "#,
        )
        .unwrap();
        assert_eq!(config.navigation_control, ControlPosition::BottomLeft);

        let err = MapConfig::from_toml(
            r#"
            center = [8.005, 58.15]
            zoom = 12
            style_url = "https://example.org/style.json"
            shelters_path = "./tilfluktsrom.geojson"
            navigation_control = "middle"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_keys_are_reported() {
        let err = MapConfig::from_toml("zoom = 12").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
