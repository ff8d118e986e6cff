#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Value types for preparedness resources, shelters and nearest-resource
//! lookups.
//!
//! Wire row types (`*Row`) mirror the column names returned by the
//! Supabase remote procedures (`navn`, `kategori`, ...). Domain records are
//! converted from them via [`From`] and carry English field names.

use serde::{Deserialize, Serialize};

/// A geographic position in WGS84 degrees.
///
/// Serialized as a `[lon, lat]` pair, the coordinate order used by
/// `GeoJSON` and `MapLibre`. Longitude always comes first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LonLat {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl LonLat {
    #[must_use]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Returns the position as a `GeoJSON` position vector.
    #[must_use]
    pub fn to_position(self) -> Vec<f64> {
        vec![self.lon, self.lat]
    }
}

impl From<[f64; 2]> for LonLat {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<LonLat> for [f64; 2] {
    fn from(pos: LonLat) -> Self {
        [pos.lon, pos.lat]
    }
}

/// A row returned by the `get_all_ressurser` remote procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRow {
    /// Resource name.
    pub navn: String,
    /// Resource category (e.g. "Hjertestarter").
    pub kategori: String,
    /// Free-text description. `NULL` in the database arrives as `null`.
    #[serde(default)]
    pub beskrivelse: Option<String>,
    /// Longitude.
    pub lng: f64,
    /// Latitude.
    pub lat: f64,
}

/// A preparedness resource as used by the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    /// Resource name.
    pub name: String,
    /// Resource category.
    pub category: String,
    /// Free-text description.
    pub description: String,
    /// Longitude.
    pub longitude: f64,
    /// Latitude.
    pub latitude: f64,
}

impl ResourceRecord {
    /// Position of the resource.
    #[must_use]
    pub const fn position(&self) -> LonLat {
        LonLat::new(self.longitude, self.latitude)
    }
}

impl From<ResourceRow> for ResourceRecord {
    fn from(row: ResourceRow) -> Self {
        Self {
            name: row.navn,
            category: row.kategori,
            description: row.beskrivelse.unwrap_or_default(),
            longitude: row.lng,
            latitude: row.lat,
        }
    }
}

/// A public shelter read from the bundled shelter file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterRecord {
    /// Street address, if the file provides one.
    pub address: Option<String>,
    /// Shelter object type (`objtype`).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Number of people the shelter holds (`plasser`).
    pub capacity: i64,
    /// Room number (`romnr`).
    pub room_number: Option<String>,
}

/// A row returned by the `finn_naermeste_ressurs` remote procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestRow {
    /// Resource name.
    pub navn: String,
    /// Resource category.
    pub kategori: String,
    /// Distance from the queried point in meters.
    pub avstand_meter: f64,
}

/// One candidate of a nearest-resource lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestCandidate {
    /// Resource name.
    pub name: String,
    /// Resource category.
    pub category: String,
    /// Distance from the queried point in meters.
    pub distance_meters: f64,
}

impl NearestCandidate {
    /// Distance rounded to whole meters.
    ///
    /// Negative or non-finite distances read as zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rounded_distance(&self) -> u64 {
        if self.distance_meters.is_finite() && self.distance_meters > 0.0 {
            self.distance_meters.round() as u64
        } else {
            0
        }
    }
}

impl From<NearestRow> for NearestCandidate {
    fn from(row: NearestRow) -> Self {
        Self {
            name: row.navn,
            category: row.kategori,
            distance_meters: row.avstand_meter,
        }
    }
}

/// Ranked candidates of a nearest-resource lookup, closest first.
///
/// The order is whatever the remote query returned; it is never re-sorted
/// locally. Ties between equidistant candidates are resolved remotely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NearestResult {
    /// Candidates in remote rank order.
    pub candidates: Vec<NearestCandidate>,
}

impl NearestResult {
    /// The closest candidate, if the query returned any.
    #[must_use]
    pub fn nearest(&self) -> Option<&NearestCandidate> {
        self.candidates.first()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }
}

impl From<Vec<NearestRow>> for NearestResult {
    fn from(rows: Vec<NearestRow>) -> Self {
        Self {
            candidates: rows.into_iter().map(NearestCandidate::from).collect(),
        }
    }
}
