//! `GeoJSON` point feature helpers.

use beredskap_map_resource_models::LonLat;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

/// Builds a point feature at `position` with the given properties.
#[must_use]
pub fn point_feature(position: LonLat, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(position.to_position()))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Wraps features into a collection, keeping their order.
#[must_use]
pub const fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Returns the position of a point feature.
///
/// Returns `None` for features without geometry, non-point geometries and
/// positions with fewer than two ordinates.
#[must_use]
pub fn point_position(feature: &Feature) -> Option<LonLat> {
    match &feature.geometry.as_ref()?.value {
        Value::Point(coords) if coords.len() >= 2 => Some(LonLat::new(coords[0], coords[1])),
        _ => None,
    }
}

/// Returns a string property, treating numbers as their decimal text.
#[must_use]
pub fn string_property(feature: &Feature, key: &str) -> Option<String> {
    match feature.property(key)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
