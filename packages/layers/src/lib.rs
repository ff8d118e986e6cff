#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Layer presentation for the preparedness map.
//!
//! Declares how each data set is drawn and attaches it to the shared
//! [`MapSurface`]:
//!
//! - resources: a fixed green circle style ([`resources`]);
//! - shelters: a two-bucket step style on capacity ([`shelters`]);
//! - background: a Kartverket WMS raster layer placed beneath the data
//!   layers ([`background`]).
//!
//! Attaching is idempotent. Attaching a layer whose id or source id is
//! already present replaces the previous pair instead of failing with a
//! duplicate-id error.

pub mod background;
pub mod resources;
pub mod shelters;

use beredskap_map_surface::{LayerSpec, MapSurface, SourceSpec, SurfaceError};

/// Source id of the resource features.
pub const RESOURCES_SOURCE_ID: &str = "supabase-ressurser";
/// Layer id of the resource circles.
pub const RESOURCES_LAYER_ID: &str = "ressurser-lag";
/// Source id of the shelter features.
pub const SHELTERS_SOURCE_ID: &str = "tilfluktsrom-kilde";
/// Layer id of the shelter circles.
pub const SHELTERS_LAYER_ID: &str = "tilfluktsrom-lag";
/// Source id of the background raster tiles.
pub const BACKGROUND_SOURCE_ID: &str = "geonorge-bakgrunn-kilde";
/// Layer id of the background raster.
pub const BACKGROUND_LAYER_ID: &str = "geonorge-bakgrunn-lag";

/// Adds `source` under `source_id` and `layer` on top of it, replacing any
/// layer or source that already uses those ids.
///
/// Every failure is detected before anything is removed, so a rejected
/// attach leaves the surface as it was. The replaced layer is removed
/// before its source.
///
/// # Errors
///
/// Returns [`SurfaceError`] if the surface is not ready, if `before` names
/// a missing layer (or the layer being replaced), or if another layer
/// still uses `source_id`.
pub fn attach_layer(
    surface: &mut dyn MapSurface,
    source_id: &str,
    source: SourceSpec,
    layer: LayerSpec,
    before: Option<&str>,
) -> Result<(), SurfaceError> {
    if !surface.is_ready() {
        return Err(SurfaceError::NotReady);
    }
    if let Some(other) = surface
        .layers_using_source(source_id)
        .into_iter()
        .find(|id| *id != layer.id)
    {
        return Err(SurfaceError::SourceInUse {
            source_id: source_id.to_string(),
            layer_id: other,
        });
    }
    if let Some(before_id) = before
        && (before_id == layer.id || !surface.has_layer(before_id))
    {
        return Err(SurfaceError::UnknownLayer(before_id.to_string()));
    }

    if surface.has_layer(&layer.id) {
        log::debug!("Replacing existing layer {}", layer.id);
        surface.remove_layer(&layer.id)?;
    }
    if surface.has_source(source_id) {
        log::debug!("Replacing existing source {source_id}");
        surface.remove_source(source_id)?;
    }

    surface.add_source(source_id, source)?;
    surface.add_layer(layer, before)
}

/// Attaches a `GeoJSON` feature collection as `source_id` drawn by `layer`.
///
/// # Errors
///
/// See [`attach_layer`].
pub fn attach_geojson_layer(
    surface: &mut dyn MapSurface,
    source_id: &str,
    data: geojson::FeatureCollection,
    layer: LayerSpec,
) -> Result<(), SurfaceError> {
    attach_layer(surface, source_id, SourceSpec::GeoJson { data }, layer, None)
}
