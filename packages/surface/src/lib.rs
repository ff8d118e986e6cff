#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Display surface abstraction for the preparedness map.
//!
//! [`MapSurface`] is the handle every presentation and interaction
//! component receives by `&mut` reference. It mirrors the subset of the
//! `MapLibre` map API the page relies on: sources, layers, layout
//! properties, rendered-feature queries, popups, markers and camera moves.
//!
//! [`document::MapDocument`] is a headless implementation that records
//! the resulting state and serializes it as a `MapLibre` style document.
//! It backs the `/api/style` endpoint and the interaction tests.

pub mod document;
pub mod style;

use beredskap_map_resource_models::LonLat;
use thiserror::Error;

pub use document::MapDocument;
pub use style::{
    CameraTarget, ControlPosition, Cursor, LayerKind, LayerSpec, MarkerSpec, PopupSpec, SourceSpec, Visibility,
};

/// Errors raised by a display surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The surface has not signalled that it finished loading.
    #[error("Map surface is not ready")]
    NotReady,

    /// A source with this id already exists.
    #[error("There is already a source with ID \"{0}\"")]
    DuplicateSource(String),

    /// A layer with this id already exists.
    #[error("Layer \"{0}\" already exists on this map")]
    DuplicateLayer(String),

    /// No source with this id exists.
    #[error("Source \"{0}\" does not exist on this map")]
    UnknownSource(String),

    /// No layer with this id exists.
    #[error("Layer \"{0}\" does not exist on this map")]
    UnknownLayer(String),

    /// The source is still referenced by a layer.
    #[error("Source \"{source_id}\" cannot be removed while layer \"{layer_id}\" is using it")]
    SourceInUse {
        /// Source that was about to be removed.
        source_id: String,
        /// Layer still drawing from it.
        layer_id: String,
    },
}

/// Opaque handle of a marker placed on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(pub u64);

/// A feature currently rendered by a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFeature {
    /// Layer that renders the feature.
    pub layer_id: String,
    /// The feature as stored in the layer's source.
    pub feature: geojson::Feature,
}

/// The shared map display surface.
///
/// Source and layer operations fail with [`SurfaceError::NotReady`] until
/// the surface has finished loading.
pub trait MapSurface {
    /// Whether the surface finished loading and accepts sources and layers.
    fn is_ready(&self) -> bool;

    fn has_source(&self, id: &str) -> bool;

    fn has_layer(&self, id: &str) -> bool;

    /// Ids of the layers drawing from `source_id`, bottom first.
    fn layers_using_source(&self, source_id: &str) -> Vec<String>;

    /// Adds a source.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::DuplicateSource`] if the id is taken.
    fn add_source(&mut self, id: &str, source: SourceSpec) -> Result<(), SurfaceError>;

    /// Removes a source.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::UnknownSource`] if it does not exist or
    /// [`SurfaceError::SourceInUse`] while a layer still uses it.
    fn remove_source(&mut self, id: &str) -> Result<(), SurfaceError>;

    /// Adds a layer on top, or directly beneath `before` when given.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::DuplicateLayer`] if the id is taken,
    /// [`SurfaceError::UnknownSource`] if its source is missing, or
    /// [`SurfaceError::UnknownLayer`] if `before` does not exist.
    fn add_layer(&mut self, layer: LayerSpec, before: Option<&str>) -> Result<(), SurfaceError>;

    /// Removes a layer.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::UnknownLayer`] if it does not exist.
    fn remove_layer(&mut self, id: &str) -> Result<(), SurfaceError>;

    /// Sets a layout property (e.g. `visibility`) on a layer.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::UnknownLayer`] if the layer does not exist.
    fn set_layout_property(
        &mut self,
        layer_id: &str,
        name: &str,
        value: serde_json::Value,
    ) -> Result<(), SurfaceError>;

    /// Returns the features rendered at `at` by any of `layers`.
    ///
    /// Unknown and hidden layers contribute nothing.
    fn query_rendered_features(&self, at: LonLat, layers: &[&str]) -> Vec<RenderedFeature>;

    /// Opens a popup, replacing any popup that is currently open.
    fn open_popup(&mut self, popup: PopupSpec);

    /// Closes the open popup, if any.
    fn close_popup(&mut self);

    /// Animates the camera to `target`.
    fn fly_to(&mut self, target: CameraTarget);

    /// Places a marker and returns its handle.
    fn add_marker(&mut self, marker: MarkerSpec) -> MarkerId;

    /// Removes a marker. Returns `false` if it was already gone.
    fn remove_marker(&mut self, id: MarkerId) -> bool;

    /// Sets the pointer cursor over the map canvas.
    fn set_cursor(&mut self, cursor: Cursor);

    /// Docks the zoom and compass buttons in a corner of the canvas.
    ///
    /// Works before the surface has loaded. Calling it again moves the
    /// control.
    fn add_navigation_control(&mut self, position: ControlPosition);
}
