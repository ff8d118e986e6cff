//! Hover cursor and click popups for interactive layers.
//!
//! Each interactive layer is described by an [`InteractionBinding`] and
//! tracked by one generic binder, [`LayerInteractions`]. A layer moves
//! through three states:
//!
//! ```text
//! Idle --enter--> Hovering --leave--> Idle
//! Idle | Hovering --click--> PopupOpen --closed/replaced--> Idle
//! ```
//!
//! Only one popup exists at a time, so opening a popup for one layer
//! returns every other layer in `PopupOpen` to `Idle`.

use beredskap_map_layers::{RESOURCES_LAYER_ID, SHELTERS_LAYER_ID};
use beredskap_map_resource_models::LonLat;
use beredskap_map_surface::{Cursor, MapSurface, PopupSpec};

use crate::popup::{POPUP_CLASS, PopupFormatter, resource_popup, shelter_popup};

/// A layer that shows a popup when one of its features is clicked.
#[derive(Debug, Clone, Copy)]
pub struct InteractionBinding {
    /// Layer the binding listens on.
    pub layer_id: &'static str,
    /// Builds the popup body from the clicked feature's properties.
    pub formatter: PopupFormatter,
}

/// Bindings for the resource and shelter layers, in registration order.
#[must_use]
pub fn default_bindings() -> Vec<InteractionBinding> {
    vec![
        InteractionBinding {
            layer_id: RESOURCES_LAYER_ID,
            formatter: resource_popup,
        },
        InteractionBinding {
            layer_id: SHELTERS_LAYER_ID,
            formatter: shelter_popup,
        },
    ]
}

/// Interaction state of one layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InteractionState {
    #[default]
    Idle,
    /// The pointer is over one of the layer's features.
    Hovering,
    /// A popup for one of the layer's features is open.
    PopupOpen,
}

#[derive(Debug, Clone)]
struct Tracked {
    binding: InteractionBinding,
    state: InteractionState,
    pointer_inside: bool,
}

/// Binder driving the interaction state of every bound layer.
#[derive(Debug, Clone)]
pub struct LayerInteractions {
    layers: Vec<Tracked>,
}

impl LayerInteractions {
    #[must_use]
    pub fn new(bindings: Vec<InteractionBinding>) -> Self {
        Self {
            layers: bindings
                .into_iter()
                .map(|binding| Tracked {
                    binding,
                    state: InteractionState::Idle,
                    pointer_inside: false,
                })
                .collect(),
        }
    }

    /// Ids of all bound layers, in registration order.
    #[must_use]
    pub fn layer_ids(&self) -> Vec<&'static str> {
        self.layers.iter().map(|t| t.binding.layer_id).collect()
    }

    /// Current state of a layer, or `None` if it is not bound.
    #[must_use]
    pub fn state(&self, layer_id: &str) -> Option<InteractionState> {
        self.tracked(layer_id).map(|t| t.state)
    }

    fn tracked(&self, layer_id: &str) -> Option<&Tracked> {
        self.layers.iter().find(|t| t.binding.layer_id == layer_id)
    }

    fn tracked_mut(&mut self, layer_id: &str) -> Option<&mut Tracked> {
        self.layers
            .iter_mut()
            .find(|t| t.binding.layer_id == layer_id)
    }

    /// The pointer entered a rendered feature of `layer_id`.
    pub fn pointer_enter(&mut self, surface: &mut dyn MapSurface, layer_id: &str) {
        let Some(tracked) = self.tracked_mut(layer_id) else {
            return;
        };
        tracked.pointer_inside = true;
        if tracked.state == InteractionState::Idle {
            tracked.state = InteractionState::Hovering;
        }
        surface.set_cursor(Cursor::Pointer);
    }

    /// The pointer left the rendered features of `layer_id`.
    ///
    /// The cursor is reset only once no bound layer is under the pointer.
    pub fn pointer_leave(&mut self, surface: &mut dyn MapSurface, layer_id: &str) {
        let Some(tracked) = self.tracked_mut(layer_id) else {
            return;
        };
        tracked.pointer_inside = false;
        if tracked.state == InteractionState::Hovering {
            tracked.state = InteractionState::Idle;
        }
        if !self.layers.iter().any(|t| t.pointer_inside) {
            surface.set_cursor(Cursor::Default);
        }
    }

    /// Derives enter and leave transitions from a pointer position.
    ///
    /// All leaves are applied before any enter.
    pub fn pointer_moved(&mut self, surface: &mut dyn MapSurface, at: LonLat) {
        let (entered, left): (Vec<_>, Vec<_>) = self
            .layers
            .iter()
            .map(|t| {
                let id = t.binding.layer_id;
                let hit = !surface.query_rendered_features(at, &[id]).is_empty();
                (id, hit, t.pointer_inside)
            })
            .filter(|(_, hit, inside)| hit != inside)
            .partition(|(_, hit, _)| *hit);

        for (layer_id, _, _) in left {
            self.pointer_leave(surface, layer_id);
        }
        for (layer_id, _, _) in entered {
            self.pointer_enter(surface, layer_id);
        }
    }

    /// A rendered feature of `layer_id` was clicked.
    ///
    /// Opens a popup at the feature's own coordinates. Returns `false` if
    /// the layer is not bound or the feature is not a point.
    pub fn click(
        &mut self,
        surface: &mut dyn MapSurface,
        layer_id: &str,
        feature: &geojson::Feature,
    ) -> bool {
        let Some(tracked) = self.tracked(layer_id) else {
            return false;
        };
        let Some(position) = beredskap_map_data::features::point_position(feature) else {
            log::warn!("Clicked feature on {layer_id} has no point geometry");
            return false;
        };

        let empty = geojson::JsonObject::new();
        let props = feature.properties.as_ref().unwrap_or(&empty);
        let html = (tracked.binding.formatter)(props);

        self.release_popup();
        surface.open_popup(PopupSpec::new(position, html).with_class(POPUP_CLASS));
        if let Some(tracked) = self.tracked_mut(layer_id) {
            tracked.state = InteractionState::PopupOpen;
        }
        true
    }

    /// The open popup was closed or replaced by a popup not owned by any
    /// bound layer.
    pub fn release_popup(&mut self) {
        for tracked in &mut self.layers {
            if tracked.state == InteractionState::PopupOpen {
                tracked.state = if tracked.pointer_inside {
                    InteractionState::Hovering
                } else {
                    InteractionState::Idle
                };
            }
        }
    }

    /// Dispatches a click at `at` to every bound layer with a rendered
    /// feature there, in registration order. Returns whether any layer
    /// handled it.
    pub fn click_at(&mut self, surface: &mut dyn MapSurface, at: LonLat) -> bool {
        let mut handled = false;
        for layer_id in self.layer_ids() {
            let hits = surface.query_rendered_features(at, &[layer_id]);
            if let Some(hit) = hits.first() {
                handled |= self.click(surface, layer_id, &hit.feature);
            }
        }
        handled
    }
}
