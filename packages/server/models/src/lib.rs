#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the preparedness map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the remote row types so the API contract can use English,
//! camel-cased field names.

use beredskap_map_resource_models::{NearestCandidate, NearestResult};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Query parameters for the nearest-resource endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NearestQueryParams {
    /// Longitude of the queried point.
    pub lon: f64,
    /// Latitude of the queried point.
    pub lat: f64,
}

/// A nearest-resource candidate as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiNearestCandidate {
    /// Resource name.
    pub name: String,
    /// Resource category.
    pub category: String,
    /// Distance in meters.
    pub distance_meters: f64,
    /// Distance rounded to whole meters, as shown in the popup.
    pub rounded_distance: u64,
}

impl From<NearestCandidate> for ApiNearestCandidate {
    fn from(candidate: NearestCandidate) -> Self {
        Self {
            rounded_distance: candidate.rounded_distance(),
            name: candidate.name,
            category: candidate.category,
            distance_meters: candidate.distance_meters,
        }
    }
}

/// Nearest-resource response, closest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiNearest {
    /// Ranked candidates in the order the database returned them.
    pub candidates: Vec<ApiNearestCandidate>,
}

impl From<NearestResult> for ApiNearest {
    fn from(result: NearestResult) -> Self {
        Self {
            candidates: result.candidates.into_iter().map(Into::into).collect(),
        }
    }
}

/// Error body returned by failing endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Human-readable error description.
    pub error: String,
}

impl ApiError {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_serializes_camel_case_with_rounded_distance() {
        let result = NearestResult {
            candidates: vec![NearestCandidate {
                name: "Tilfluktsrom A".to_string(),
                category: "Shelter".to_string(),
                distance_meters: 123.4,
            }],
        };

        let json = serde_json::to_value(ApiNearest::from(result)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "candidates": [{
                    "name": "Tilfluktsrom A",
                    "category": "Shelter",
                    "distanceMeters": 123.4,
                    "roundedDistance": 123
                }]
            })
        );
    }

    #[test]
    fn parses_query_params() {
        let params: NearestQueryParams =
            serde_json::from_str(r#"{ "lon": 8.0, "lat": 58.1 }"#).unwrap();
        assert!((params.lon - 8.0).abs() < f64::EPSILON);
        assert!((params.lat - 58.1).abs() < f64::EPSILON);
    }
}
