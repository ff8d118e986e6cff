//! Kartverket grey-tone WMS background.
//!
//! The background is a raster layer drawn beneath the data layers. Its
//! insertion point is passed explicitly; when that layer does not exist
//! (for instance because its data failed to load) the background is
//! appended on top instead.

use beredskap_map_surface::{LayerKind, LayerSpec, MapSurface, SourceSpec, SurfaceError};
use serde::Deserialize;

use crate::{BACKGROUND_LAYER_ID, BACKGROUND_SOURCE_ID, attach_layer};

/// Kartverket `topograatone` WMS `GetMap` template in `EPSG:3857`.
pub const KARTVERKET_GRAATONE_TILES: &str = "https://wms.geonorge.no/skwms1/wms.topograatone?service=WMS&version=1.1.1&request=GetMap&layers=topograatone&styles=&format=image/png&transparent=true&srs=EPSG:3857&bbox={bbox-epsg-3857}&width=256&height=256";

/// Attribution required by Kartverket.
pub const KARTVERKET_ATTRIBUTION: &str =
    "&copy; <a href=\"http://www.kartverket.no/\">Kartverket</a>";

/// Background raster tile settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackgroundTiles {
    /// Tile URL template with a `{bbox-epsg-3857}` placeholder.
    pub tiles_url: String,
    /// Tile edge length in pixels.
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    /// Attribution HTML.
    pub attribution: Option<String>,
    /// Raster opacity between 0 and 1.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

const fn default_tile_size() -> u32 {
    256
}

const fn default_opacity() -> f64 {
    1.0
}

impl Default for BackgroundTiles {
    fn default() -> Self {
        Self {
            tiles_url: KARTVERKET_GRAATONE_TILES.to_string(),
            tile_size: default_tile_size(),
            attribution: Some(KARTVERKET_ATTRIBUTION.to_string()),
            opacity: default_opacity(),
        }
    }
}

/// Where the background layer ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Directly beneath the named layer.
    Beneath(String),
    /// On top of all existing layers.
    Top,
}

/// The raster source for `tiles`.
#[must_use]
pub fn background_source(tiles: &BackgroundTiles) -> SourceSpec {
    SourceSpec::Raster {
        tiles: vec![tiles.tiles_url.clone()],
        tile_size: tiles.tile_size,
        attribution: tiles.attribution.clone(),
    }
}

/// The raster layer for `tiles`.
#[must_use]
pub fn background_layer(tiles: &BackgroundTiles) -> LayerSpec {
    LayerSpec::new(BACKGROUND_LAYER_ID, LayerKind::Raster, BACKGROUND_SOURCE_ID)
        .paint("raster-opacity", tiles.opacity)
}

/// Attaches the background beneath `beneath`, or on top when `beneath` is
/// `None` or names a layer that is not on the surface.
///
/// # Errors
///
/// Returns [`SurfaceError`] if the surface rejects the source or layer.
pub fn add_background_layer(
    surface: &mut dyn MapSurface,
    tiles: &BackgroundTiles,
    beneath: Option<&str>,
) -> Result<Placement, SurfaceError> {
    let before = beneath.filter(|id| surface.has_layer(id));
    if let (None, Some(id)) = (before, beneath) {
        log::warn!("Layer {id} not on the map; adding background on top");
    }

    attach_layer(
        surface,
        BACKGROUND_SOURCE_ID,
        background_source(tiles),
        background_layer(tiles),
        before,
    )?;

    Ok(before.map_or(Placement::Top, |id| Placement::Beneath(id.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SHELTERS_LAYER_ID;
    use crate::shelters::add_shelters_layer;
    use beredskap_map_resource_models::LonLat;
    use beredskap_map_surface::MapDocument;

    fn empty() -> geojson::FeatureCollection {
        geojson::FeatureCollection {
            bbox: None,
            features: Vec::new(),
            foreign_members: None,
        }
    }

    #[test]
    fn inserts_beneath_existing_layer() {
        let mut doc = MapDocument::loaded(LonLat::new(8.0, 58.0), 12.0);
        add_shelters_layer(&mut doc, empty()).unwrap();

        let placement =
            add_background_layer(&mut doc, &BackgroundTiles::default(), Some(SHELTERS_LAYER_ID))
                .unwrap();

        assert_eq!(placement, Placement::Beneath(SHELTERS_LAYER_ID.to_string()));
        assert_eq!(doc.layer_ids(), vec![BACKGROUND_LAYER_ID, SHELTERS_LAYER_ID]);
    }

    #[test]
    fn falls_back_to_top_when_layer_missing() {
        let mut doc = MapDocument::loaded(LonLat::new(8.0, 58.0), 12.0);

        let placement =
            add_background_layer(&mut doc, &BackgroundTiles::default(), Some(SHELTERS_LAYER_ID))
                .unwrap();

        assert_eq!(placement, Placement::Top);
        assert_eq!(doc.layer_ids(), vec![BACKGROUND_LAYER_ID]);
    }

    #[test]
    fn appends_on_top_without_insertion_point() {
        let mut doc = MapDocument::loaded(LonLat::new(8.0, 58.0), 12.0);
        add_shelters_layer(&mut doc, empty()).unwrap();

        let placement = add_background_layer(&mut doc, &BackgroundTiles::default(), None).unwrap();

        assert_eq!(placement, Placement::Top);
        assert_eq!(doc.layer_ids(), vec![SHELTERS_LAYER_ID, BACKGROUND_LAYER_ID]);
    }

    #[test]
    fn declares_kartverket_raster_source() {
        let source = serde_json::to_value(background_source(&BackgroundTiles::default())).unwrap();
        assert_eq!(source["type"], "raster");
        assert_eq!(source["tileSize"], 256);
        assert!(
            source["tiles"][0]
                .as_str()
                .unwrap()
                .contains("bbox={bbox-epsg-3857}")
        );
        assert!(source["attribution"].as_str().unwrap().contains("Kartverket"));
    }
}
