//! Headless [`MapSurface`] that records state as a `MapLibre` style.
//!
//! Layers are kept in draw order (bottom first), exactly as `MapLibre`
//! stacks them. Rendered-feature queries use a fixed tolerance in degrees
//! around point features instead of screen-space hit testing.

use std::collections::BTreeMap;

use beredskap_map_resource_models::LonLat;

use crate::style::{
    CameraTarget, ControlPosition, Cursor, LayerSpec, MarkerSpec, PopupSpec, SourceSpec, Visibility,
};
use crate::{MapSurface, MarkerId, RenderedFeature, SurfaceError};

/// Default hit tolerance, roughly 10 m at Norwegian latitudes.
pub const DEFAULT_HIT_TOLERANCE_DEG: f64 = 0.0001;

/// Style `metadata` key holding the navigation control position.
pub const NAVIGATION_CONTROL_METADATA: &str = "beredskap:navigation-control";

/// Current camera of a [`MapDocument`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Camera {
    /// Map center.
    pub center: LonLat,
    /// Zoom level.
    pub zoom: f64,
}

/// In-memory map state.
#[derive(Debug, Clone)]
pub struct MapDocument {
    ready: bool,
    camera: Camera,
    sources: BTreeMap<String, SourceSpec>,
    layers: Vec<LayerSpec>,
    popup: Option<PopupSpec>,
    markers: BTreeMap<MarkerId, MarkerSpec>,
    next_marker: u64,
    cursor: Cursor,
    navigation_control: Option<ControlPosition>,
    hit_tolerance: f64,
}

impl MapDocument {
    /// Creates an empty, not yet loaded document.
    #[must_use]
    pub const fn new(center: LonLat, zoom: f64) -> Self {
        Self {
            ready: false,
            camera: Camera { center, zoom },
            sources: BTreeMap::new(),
            layers: Vec::new(),
            popup: None,
            markers: BTreeMap::new(),
            next_marker: 0,
            cursor: Cursor::Default,
            navigation_control: None,
            hit_tolerance: DEFAULT_HIT_TOLERANCE_DEG,
        }
    }

    /// Creates a document that has already finished loading.
    #[must_use]
    pub fn loaded(center: LonLat, zoom: f64) -> Self {
        let mut doc = Self::new(center, zoom);
        doc.mark_loaded();
        doc
    }

    #[must_use]
    pub const fn with_hit_tolerance(mut self, degrees: f64) -> Self {
        self.hit_tolerance = degrees;
        self
    }

    /// Signals that the base style finished loading.
    pub fn mark_loaded(&mut self) {
        log::debug!("Map document loaded");
        self.ready = true;
    }

    #[must_use]
    pub const fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[must_use]
    pub const fn navigation_control(&self) -> Option<ControlPosition> {
        self.navigation_control
    }

    #[must_use]
    pub const fn popup(&self) -> Option<&PopupSpec> {
        self.popup.as_ref()
    }

    #[must_use]
    pub fn markers(&self) -> Vec<&MarkerSpec> {
        self.markers.values().collect()
    }

    #[must_use]
    pub fn source(&self, id: &str) -> Option<&SourceSpec> {
        self.sources.get(id)
    }

    #[must_use]
    pub fn layer(&self, id: &str) -> Option<&LayerSpec> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Layer ids in draw order, bottom first.
    #[must_use]
    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.id.as_str()).collect()
    }

    /// Serializes sources and layers as a `MapLibre` style document.
    ///
    /// Controls are not part of the style specification and are listed
    /// under `metadata`.
    #[must_use]
    pub fn to_style(&self, name: &str) -> serde_json::Value {
        let mut style = serde_json::json!({
            "version": 8,
            "name": name,
            "center": self.camera.center,
            "zoom": self.camera.zoom,
            "sources": self.sources,
            "layers": self.layers,
        });
        if let Some(position) = self.navigation_control {
            style["metadata"][NAVIGATION_CONTROL_METADATA] = serde_json::json!(position);
        }
        style
    }

    fn ensure_ready(&self) -> Result<(), SurfaceError> {
        if self.ready {
            Ok(())
        } else {
            Err(SurfaceError::NotReady)
        }
    }

    fn layer_index(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    fn hits(&self, feature: &geojson::Feature, at: LonLat) -> bool {
        let Some(geometry) = &feature.geometry else {
            return false;
        };
        match &geometry.value {
            geojson::Value::Point(coords) if coords.len() >= 2 => {
                (coords[0] - at.lon).abs() <= self.hit_tolerance
                    && (coords[1] - at.lat).abs() <= self.hit_tolerance
            }
            _ => false,
        }
    }
}

impl MapSurface for MapDocument {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layer_index(id).is_some()
    }

    fn layers_using_source(&self, source_id: &str) -> Vec<String> {
        self.layers
            .iter()
            .filter(|l| l.source == source_id)
            .map(|l| l.id.clone())
            .collect()
    }

    fn add_source(&mut self, id: &str, source: SourceSpec) -> Result<(), SurfaceError> {
        self.ensure_ready()?;
        if self.sources.contains_key(id) {
            return Err(SurfaceError::DuplicateSource(id.to_string()));
        }
        self.sources.insert(id.to_string(), source);
        Ok(())
    }

    fn remove_source(&mut self, id: &str) -> Result<(), SurfaceError> {
        self.ensure_ready()?;
        if let Some(layer) = self.layers.iter().find(|l| l.source == id) {
            return Err(SurfaceError::SourceInUse {
                source_id: id.to_string(),
                layer_id: layer.id.clone(),
            });
        }
        self.sources
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| SurfaceError::UnknownSource(id.to_string()))
    }

    fn add_layer(&mut self, layer: LayerSpec, before: Option<&str>) -> Result<(), SurfaceError> {
        self.ensure_ready()?;
        if self.has_layer(&layer.id) {
            return Err(SurfaceError::DuplicateLayer(layer.id));
        }
        if !self.sources.contains_key(&layer.source) {
            return Err(SurfaceError::UnknownSource(layer.source));
        }

        match before {
            Some(before_id) => {
                let idx = self
                    .layer_index(before_id)
                    .ok_or_else(|| SurfaceError::UnknownLayer(before_id.to_string()))?;
                self.layers.insert(idx, layer);
            }
            None => self.layers.push(layer),
        }
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) -> Result<(), SurfaceError> {
        self.ensure_ready()?;
        let idx = self
            .layer_index(id)
            .ok_or_else(|| SurfaceError::UnknownLayer(id.to_string()))?;
        self.layers.remove(idx);
        Ok(())
    }

    fn set_layout_property(
        &mut self,
        layer_id: &str,
        name: &str,
        value: serde_json::Value,
    ) -> Result<(), SurfaceError> {
        self.ensure_ready()?;
        let idx = self
            .layer_index(layer_id)
            .ok_or_else(|| SurfaceError::UnknownLayer(layer_id.to_string()))?;
        self.layers[idx].layout.insert(name.to_string(), value);
        Ok(())
    }

    fn query_rendered_features(&self, at: LonLat, layers: &[&str]) -> Vec<RenderedFeature> {
        let mut found = Vec::new();

        for layer_id in layers {
            let Some(layer) = self.layer(layer_id) else {
                continue;
            };
            if layer.visibility() == Visibility::None {
                continue;
            }
            let Some(source) = self.sources.get(&layer.source) else {
                continue;
            };

            found.extend(
                source
                    .features()
                    .iter()
                    .filter(|f| self.hits(f, at))
                    .map(|f| RenderedFeature {
                        layer_id: layer.id.clone(),
                        feature: f.clone(),
                    }),
            );
        }

        found
    }

    fn open_popup(&mut self, popup: PopupSpec) {
        self.popup = Some(popup);
    }

    fn close_popup(&mut self) {
        self.popup = None;
    }

    fn fly_to(&mut self, target: CameraTarget) {
        self.camera = Camera {
            center: target.center,
            zoom: target.zoom,
        };
    }

    fn add_marker(&mut self, marker: MarkerSpec) -> MarkerId {
        self.next_marker += 1;
        let id = MarkerId(self.next_marker);
        self.markers.insert(id, marker);
        id
    }

    fn remove_marker(&mut self, id: MarkerId) -> bool {
        self.markers.remove(&id).is_some()
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn add_navigation_control(&mut self, position: ControlPosition) {
        log::debug!("Navigation control at {position}");
        self.navigation_control = Some(position);
    }
}
