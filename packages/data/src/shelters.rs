//! Public shelters from the bundled `tilfluktsrom.geojson` file.
//!
//! Shelter features are passed through as-is; their `plasser` property
//! drives the capacity styling and the other attributes feed the popup.

use std::str::FromStr as _;

use beredskap_map_resource_models::ShelterRecord;
use geojson::{Feature, FeatureCollection, GeoJson};

use crate::DataError;
use crate::assets::AssetSource;
use crate::features::string_property;

/// Relative identifier of the bundled shelter file.
pub const DEFAULT_SHELTER_PATH: &str = "./tilfluktsrom.geojson";

/// Loads the shelter collection from `path`.
///
/// # Errors
///
/// Returns [`DataError`] if the file cannot be retrieved or is not a
/// `GeoJSON` `FeatureCollection`. Both cases are logged here.
pub async fn fetch_shelters(
    assets: &dyn AssetSource,
    path: &str,
) -> Result<FeatureCollection, DataError> {
    let result = match assets.load(path).await {
        Ok(body) => parse_shelter_collection(&body),
        Err(e) => Err(e),
    };

    match result {
        Ok(fc) => {
            log::info!("Loaded {} shelters from {path}", fc.features.len());
            Ok(fc)
        }
        Err(e) => {
            log::error!("Failed to load shelters from {path}: {e}");
            Err(e)
        }
    }
}

/// Parses the shelter file contents.
///
/// # Errors
///
/// Returns [`DataError::Parse`] if the text is not valid `GeoJSON` or is
/// not a `FeatureCollection`.
pub fn parse_shelter_collection(body: &str) -> Result<FeatureCollection, DataError> {
    let geojson = GeoJson::from_str(body).map_err(|e| DataError::Parse {
        message: format!("Invalid shelter GeoJSON: {e}"),
    })?;

    match geojson {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        GeoJson::Feature(_) | GeoJson::Geometry(_) => Err(DataError::Parse {
            message: "Shelter file is not a FeatureCollection".to_string(),
        }),
    }
}

/// Reads the typed shelter attributes of a feature.
#[must_use]
pub fn shelter_record(feature: &Feature) -> ShelterRecord {
    ShelterRecord {
        address: string_property(feature, "adresse").filter(|s| !s.trim().is_empty()),
        kind: string_property(feature, "objtype"),
        capacity: shelter_capacity(feature),
        room_number: string_property(feature, "romnr"),
    }
}

/// Capacity (`plasser`) of a shelter feature.
///
/// Accepts integers, floats (truncated) and numeric strings. Anything else
/// reads as `0`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn shelter_capacity(feature: &Feature) -> i64 {
    match feature.property("plasser") {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(serde_json::Value::String(s)) => {
            let s = s.trim();
            s.parse()
                .ok()
                .or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f as i64)
                })
                .unwrap_or(0)
        }
        _ => 0,
    }
}
