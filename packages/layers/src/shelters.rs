//! Capacity-driven style for public shelters.
//!
//! Shelters are split into two buckets on their `plasser` property:
//! below [`CAPACITY_THRESHOLD`] they are drawn small and light, at or above
//! it large and dark. The mapping is a step function, never interpolated.

use beredskap_map_surface::{LayerKind, LayerSpec, MapSurface, SurfaceError};

use crate::{SHELTERS_LAYER_ID, SHELTERS_SOURCE_ID, attach_geojson_layer};

/// Capacity at which a shelter switches to the large style.
pub const CAPACITY_THRESHOLD: i64 = 200;

/// Feature property holding the shelter capacity.
pub const CAPACITY_PROPERTY: &str = "plasser";

/// Circle stroke width of shelters in pixels.
pub const SHELTER_STROKE_WIDTH: f64 = 1.0;
/// Circle stroke color of shelters.
pub const SHELTER_STROKE_COLOR: &str = "#ffffff";

/// Visual bucket of a shelter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShelterStyle {
    /// Capacity below the threshold.
    Small,
    /// Capacity at or above the threshold.
    Large,
}

impl ShelterStyle {
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Small => "#ff9999",
            Self::Large => "#cc0000",
        }
    }

    #[must_use]
    pub const fn radius(self) -> f64 {
        match self {
            Self::Small => 6.0,
            Self::Large => 12.0,
        }
    }
}

/// Bucket for a shelter of the given capacity.
#[must_use]
pub const fn shelter_style(capacity: i64) -> ShelterStyle {
    if capacity < CAPACITY_THRESHOLD {
        ShelterStyle::Small
    } else {
        ShelterStyle::Large
    }
}

/// Capacity as the renderer reads it: numeric strings are coerced and
/// anything else falls back to 0.
#[must_use]
pub fn capacity_input() -> serde_json::Value {
    serde_json::json!(["to-number", ["get", CAPACITY_PROPERTY], 0])
}

/// `["step", <capacity>, small, 200, large]` expression.
fn capacity_step(small: serde_json::Value, large: serde_json::Value) -> serde_json::Value {
    serde_json::json!([
        "step",
        capacity_input(),
        small,
        CAPACITY_THRESHOLD,
        large
    ])
}

/// The shelter circle layer with data-driven color and radius.
#[must_use]
pub fn shelters_layer() -> LayerSpec {
    LayerSpec::new(SHELTERS_LAYER_ID, LayerKind::Circle, SHELTERS_SOURCE_ID)
        .paint(
            "circle-color",
            capacity_step(
                ShelterStyle::Small.color().into(),
                ShelterStyle::Large.color().into(),
            ),
        )
        .paint(
            "circle-radius",
            capacity_step(
                ShelterStyle::Small.radius().into(),
                ShelterStyle::Large.radius().into(),
            ),
        )
        .paint("circle-stroke-width", SHELTER_STROKE_WIDTH)
        .paint("circle-stroke-color", SHELTER_STROKE_COLOR)
}

/// Attaches the shelter features to the surface.
///
/// Calling this again replaces the previous shelter layer and source.
///
/// # Errors
///
/// Returns [`SurfaceError`] if the surface rejects the source or layer.
pub fn add_shelters_layer(
    surface: &mut dyn MapSurface,
    data: geojson::FeatureCollection,
) -> Result<(), SurfaceError> {
    log::info!("Adding {} shelters to the map", data.features.len());
    attach_geojson_layer(surface, SHELTERS_SOURCE_ID, data, shelters_layer())
}

/// Evaluates a `["step", input, base, stop, value]` expression for
/// `input`, the way the renderer does.
#[must_use]
pub fn evaluate_step(expression: &serde_json::Value, input: f64) -> Option<&serde_json::Value> {
    let parts = expression.as_array()?;
    if parts.first()?.as_str()? != "step" || parts.len() < 3 || parts.len() % 2 == 0 {
        return None;
    }

    let mut output = &parts[2];
    for pair in parts[3..].chunks(2) {
        let stop = pair[0].as_f64()?;
        if input >= stop {
            output = &pair[1];
        } else {
            break;
        }
    }
    Some(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use beredskap_map_data::features::{collection, point_feature};
    use beredskap_map_resource_models::LonLat;
    use beredskap_map_surface::MapDocument;

    fn shelters(capacities: &[i64]) -> geojson::FeatureCollection {
        collection(
            capacities
                .iter()
                .enumerate()
                .map(|(i, plasser)| {
                    let mut props = geojson::JsonObject::new();
                    props.insert(CAPACITY_PROPERTY.to_string(), (*plasser).into());
                    #[allow(clippy::cast_precision_loss)]
                    let lon = 8.0 + i as f64 * 0.01;
                    point_feature(LonLat::new(lon, 58.1), props)
                })
                .collect(),
        )
    }

    #[test]
    fn threshold_is_inclusive_on_upper_bucket() {
        assert_eq!(shelter_style(0), ShelterStyle::Small);
        assert_eq!(shelter_style(199), ShelterStyle::Small);
        assert_eq!(shelter_style(200), ShelterStyle::Large);
        assert_eq!(shelter_style(5000), ShelterStyle::Large);
    }

    #[test]
    fn paint_expressions_match_local_rule() {
        let layer = shelters_layer();
        let color = &layer.paint["circle-color"];
        let radius = &layer.paint["circle-radius"];

        for capacity in [0, 150, 199, 200, 201, 1000] {
            let style = shelter_style(capacity);
            #[allow(clippy::cast_precision_loss)]
            let input = capacity as f64;
            assert_eq!(
                evaluate_step(color, input).and_then(serde_json::Value::as_str),
                Some(style.color()),
                "color for capacity {capacity}"
            );
            assert_eq!(
                evaluate_step(radius, input).and_then(serde_json::Value::as_f64),
                Some(style.radius()),
                "radius for capacity {capacity}"
            );
        }
    }

    #[test]
    fn paint_uses_two_bucket_step_expression() {
        let layer = shelters_layer();
        assert_eq!(
            layer.paint["circle-color"],
            serde_json::json!([
                "step",
                ["to-number", ["get", "plasser"], 0],
                "#ff9999",
                200,
                "#cc0000"
            ])
        );
        assert_eq!(
            layer.paint["circle-radius"],
            serde_json::json!(["step", ["to-number", ["get", "plasser"], 0], 6.0, 200, 12.0])
        );
        assert_eq!(layer.paint["circle-stroke-color"], "#ffffff");
    }

    #[test]
    fn rendered_bucket_agrees_with_shelter_records() {
        use beredskap_map_data::shelters::shelter_capacity;

        let layer = shelters_layer();
        let color = &layer.paint["circle-color"];
        assert_eq!(color[1], capacity_input());

        for (plasser, expected) in [
            (serde_json::json!("450"), ShelterStyle::Large),
            (serde_json::json!(" 200 "), ShelterStyle::Large),
            (serde_json::json!("199"), ShelterStyle::Small),
            (serde_json::json!(250.0), ShelterStyle::Large),
            (serde_json::json!("ukjent"), ShelterStyle::Small),
            (serde_json::Value::Null, ShelterStyle::Small),
        ] {
            let mut props = geojson::JsonObject::new();
            props.insert(CAPACITY_PROPERTY.to_string(), plasser.clone());
            let feature = point_feature(LonLat::new(8.0, 58.1), props);

            let capacity = shelter_capacity(&feature);
            assert_eq!(shelter_style(capacity), expected, "bucket for {plasser}");
            #[allow(clippy::cast_precision_loss)]
            let input = capacity as f64;
            assert_eq!(
                evaluate_step(color, input).and_then(serde_json::Value::as_str),
                Some(expected.color()),
                "color for {plasser}"
            );
        }
    }

    #[test]
    fn setup_twice_leaves_single_layer() {
        let mut doc = MapDocument::loaded(LonLat::new(8.0, 58.0), 12.0);

        add_shelters_layer(&mut doc, shelters(&[199])).unwrap();
        add_shelters_layer(&mut doc, shelters(&[199, 200])).unwrap();

        assert_eq!(doc.layer_ids(), vec![SHELTERS_LAYER_ID]);
        assert_eq!(doc.layer(SHELTERS_LAYER_ID).unwrap(), &shelters_layer());
        assert_eq!(
            doc.source(SHELTERS_SOURCE_ID).unwrap().features().len(),
            2
        );
    }

    #[test]
    fn rejects_malformed_step_expressions() {
        assert!(evaluate_step(&serde_json::json!(["interpolate", 1, 2]), 1.0).is_none());
        assert!(evaluate_step(&serde_json::json!(["step", 1, 2, 3]), 1.0).is_none());
        assert!(evaluate_step(&serde_json::json!("step"), 1.0).is_none());
    }
}
