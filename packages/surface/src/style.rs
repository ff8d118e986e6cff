//! Source, layer, popup, marker and camera descriptions.
//!
//! Sources and layers serialize to the `MapLibre` style specification
//! shapes so a front end can pass them to `map.addSource` /
//! `map.addLayer` unchanged.

use beredskap_map_resource_models::LonLat;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceSpec {
    /// Inline `GeoJSON` data.
    GeoJson {
        /// The features served by the source.
        data: geojson::FeatureCollection,
    },
    /// Raster tiles from a templated endpoint.
    Raster {
        /// Tile URL templates. `{bbox-epsg-3857}` is substituted per tile
        /// by the renderer.
        tiles: Vec<String>,
        /// Tile edge length in pixels.
        #[serde(rename = "tileSize")]
        tile_size: u32,
        /// Attribution HTML shown by the renderer.
        #[serde(skip_serializing_if = "Option::is_none")]
        attribution: Option<String>,
    },
}

impl SourceSpec {
    /// Features of a `GeoJSON` source; empty for raster sources.
    #[must_use]
    pub fn features(&self) -> &[geojson::Feature] {
        match self {
            Self::GeoJson { data } => &data.features,
            Self::Raster { .. } => &[],
        }
    }
}

/// Layer rendering type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LayerKind {
    /// Filled circles at point features.
    Circle,
    /// Raster imagery.
    Raster,
}

/// Value of the `visibility` layout property.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Visibility {
    /// The layer is drawn.
    #[default]
    Visible,
    /// The layer is hidden.
    None,
}

impl Visibility {
    /// Visibility for a checkbox state.
    #[must_use]
    pub const fn from_checked(checked: bool) -> Self {
        if checked { Self::Visible } else { Self::None }
    }

    #[must_use]
    pub fn to_value(self) -> serde_json::Value {
        serde_json::Value::String(self.to_string())
    }
}

/// A style layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Unique layer id.
    pub id: String,
    /// Rendering type.
    #[serde(rename = "type")]
    pub kind: LayerKind,
    /// Id of the source the layer draws from.
    pub source: String,
    /// Paint properties (may contain data-driven expressions).
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub paint: serde_json::Map<String, serde_json::Value>,
    /// Layout properties.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub layout: serde_json::Map<String, serde_json::Value>,
}

impl LayerSpec {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: LayerKind, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            source: source.into(),
            paint: serde_json::Map::new(),
            layout: serde_json::Map::new(),
        }
    }

    /// Sets a paint property.
    #[must_use]
    pub fn paint(mut self, name: &str, value: impl Into<serde_json::Value>) -> Self {
        self.paint.insert(name.to_string(), value.into());
        self
    }

    /// Current visibility, defaulting to visible when unset.
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.layout
            .get("visibility")
            .and_then(serde_json::Value::as_str)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

/// Pointer cursor over the map canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Cursor {
    /// The renderer's default (grab) cursor.
    #[default]
    Default,
    /// Hand cursor shown over clickable features.
    Pointer,
}

/// Corner of the map canvas a control is docked in.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ControlPosition {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

/// A popup anchored at a geographic position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupSpec {
    /// Anchor position.
    pub position: LonLat,
    /// Popup body HTML.
    pub html: String,
    /// CSS class applied to the popup container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

impl PopupSpec {
    #[must_use]
    pub fn new(position: LonLat, html: impl Into<String>) -> Self {
        Self {
            position,
            html: html.into(),
            class_name: None,
        }
    }

    #[must_use]
    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }
}

/// A map marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    /// Marker position.
    pub position: LonLat,
    /// Marker color as a CSS color string.
    pub color: String,
}

/// Target of an animated camera move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraTarget {
    /// New map center.
    pub center: LonLat,
    /// New zoom level.
    pub zoom: f64,
    /// Animation speed factor.
    pub speed: f64,
}
