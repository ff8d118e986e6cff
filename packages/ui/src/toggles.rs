//! Checkbox-driven layer visibility.

use beredskap_map_layers::{RESOURCES_LAYER_ID, SHELTERS_LAYER_ID};
use beredskap_map_surface::{MapSurface, SurfaceError, Visibility};

/// A checkbox bound to a layer's visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerToggle {
    /// Id of the checkbox element.
    pub element_id: &'static str,
    /// Layer whose visibility the checkbox controls.
    pub layer_id: &'static str,
}

/// Checkboxes on the page.
pub const LAYER_TOGGLES: [LayerToggle; 2] = [
    LayerToggle {
        element_id: "toggle-tilfluktsrom",
        layer_id: SHELTERS_LAYER_ID,
    },
    LayerToggle {
        element_id: "toggle-ressurser",
        layer_id: RESOURCES_LAYER_ID,
    },
];

/// Looks up the toggle for a checkbox element.
#[must_use]
pub fn toggle_for(element_id: &str) -> Option<LayerToggle> {
    LAYER_TOGGLES
        .iter()
        .find(|t| t.element_id == element_id)
        .copied()
}

/// Shows the layer when `checked`, hides it otherwise.
///
/// # Errors
///
/// Returns [`SurfaceError::UnknownLayer`] if the layer is not on the map,
/// which happens when its data failed to load.
pub fn set_layer_visibility(
    surface: &mut dyn MapSurface,
    layer_id: &str,
    checked: bool,
) -> Result<Visibility, SurfaceError> {
    let visibility = Visibility::from_checked(checked);
    surface.set_layout_property(layer_id, "visibility", visibility.to_value())?;
    log::debug!("Layer {layer_id} is now {visibility}");
    Ok(visibility)
}
