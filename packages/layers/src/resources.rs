//! Fixed style for preparedness resources.

use beredskap_map_surface::{LayerKind, LayerSpec, MapSurface, SurfaceError};

use crate::{RESOURCES_LAYER_ID, RESOURCES_SOURCE_ID, attach_geojson_layer};

/// Circle fill color of resources.
pub const RESOURCE_COLOR: &str = "#00ff00";
/// Circle radius of resources in pixels.
pub const RESOURCE_RADIUS: f64 = 8.0;
/// Circle stroke width of resources in pixels.
pub const RESOURCE_STROKE_WIDTH: f64 = 1.5;
/// Circle stroke color of resources.
pub const RESOURCE_STROKE_COLOR: &str = "#000000";

/// The resource circle layer.
#[must_use]
pub fn resources_layer() -> LayerSpec {
    LayerSpec::new(RESOURCES_LAYER_ID, LayerKind::Circle, RESOURCES_SOURCE_ID)
        .paint("circle-color", RESOURCE_COLOR)
        .paint("circle-radius", RESOURCE_RADIUS)
        .paint("circle-stroke-width", RESOURCE_STROKE_WIDTH)
        .paint("circle-stroke-color", RESOURCE_STROKE_COLOR)
}

/// Attaches the resource features to the surface.
///
/// # Errors
///
/// Returns [`SurfaceError`] if the surface rejects the source or layer.
pub fn add_resources_layer(
    surface: &mut dyn MapSurface,
    data: geojson::FeatureCollection,
) -> Result<(), SurfaceError> {
    log::info!("Adding {} resources to the map", data.features.len());
    attach_geojson_layer(surface, RESOURCES_SOURCE_ID, data, resources_layer())
}
