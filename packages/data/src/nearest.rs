//! Nearest-resource lookup through the `finn_naermeste_ressurs` remote
//! procedure.
//!
//! The spatial computation happens entirely in the database. This module
//! only shapes the request and decodes the ranked rows.

use beredskap_map_resource_models::{NearestResult, NearestRow};
use beredskap_map_supabase::{RpcClient, rpc};

use crate::DataError;

/// Name of the remote nearest-resource procedure.
pub const FIND_NEAREST_FN: &str = "finn_naermeste_ressurs";

/// Named parameters of the nearest-resource procedure.
#[must_use]
pub fn nearest_params(lon: f64, lat: f64) -> serde_json::Value {
    serde_json::json!({
        "bruker_lon": lon,
        "bruker_lat": lat,
    })
}

/// Finds the resources nearest to `(lon, lat)`.
///
/// Coordinates are passed through unvalidated. The ranked rows are returned
/// in the order the database produced them.
///
/// # Errors
///
/// Returns [`DataError::Remote`] if the remote call fails, including when
/// the database rejects the coordinates.
pub async fn find_nearest(
    client: &dyn RpcClient,
    lon: f64,
    lat: f64,
) -> Result<NearestResult, DataError> {
    log::debug!("Finding nearest resource to {lon}, {lat}");

    let rows: Vec<NearestRow> = match rpc(client, FIND_NEAREST_FN, nearest_params(lon, lat)).await
    {
        Ok(rows) => rows,
        Err(e) => {
            log::error!("Nearest resource query failed: {e}");
            return Err(e.into());
        }
    };

    log::debug!("Nearest resource query returned {} rows", rows.len());

    Ok(NearestResult::from(rows))
}
