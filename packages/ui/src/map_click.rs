//! Nearest-resource lookup for clicks on empty map areas.

use beredskap_map_data::find_nearest;
use beredskap_map_resource_models::{LonLat, NearestCandidate};
use beredskap_map_supabase::RpcClient;
use beredskap_map_surface::{MapSurface, PopupSpec};

use crate::popup::{POPUP_CLASS, nearest_popup};

/// What a map click resulted in.
#[derive(Debug, Clone, PartialEq)]
pub enum MapClickOutcome {
    /// The click hit a rendered feature of a tracked layer; that layer's
    /// own popup handles it.
    Suppressed,
    /// A popup for the nearest resource was opened at the click.
    Shown(NearestCandidate),
    /// The remote query returned no candidates.
    NoResult,
    /// The remote query failed.
    Failed,
}

/// Handles a click at `at` that was not consumed by a feature binding.
///
/// Clicks over rendered features of `tracked_layers` are suppressed without
/// calling the remote query. Otherwise the nearest resource is looked up
/// and shown at the click position. Failures are logged and leave the map
/// unchanged.
pub async fn handle_map_click(
    surface: &mut dyn MapSurface,
    client: &dyn RpcClient,
    at: LonLat,
    tracked_layers: &[&str],
) -> MapClickOutcome {
    if !surface.query_rendered_features(at, tracked_layers).is_empty() {
        log::trace!("Map click at {}, {} hit a feature", at.lon, at.lat);
        return MapClickOutcome::Suppressed;
    }

    let result = match find_nearest(client, at.lon, at.lat).await {
        Ok(result) => result,
        Err(e) => {
            log::warn!("Could not look up nearest resource: {e}");
            return MapClickOutcome::Failed;
        }
    };

    let Some(candidate) = result.nearest().cloned() else {
        log::info!("No resources near {}, {}", at.lon, at.lat);
        return MapClickOutcome::NoResult;
    };

    surface.open_popup(PopupSpec::new(at, nearest_popup(&candidate)).with_class(POPUP_CLASS));

    MapClickOutcome::Shown(candidate)
}
