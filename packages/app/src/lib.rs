#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Preparedness map application.
//!
//! [`MapApp`] wires data, layers and interaction handlers to a
//! [`MapSurface`]. Once the surface signals it has loaded, [`MapApp::on_load`]
//! fetches shelters and resources concurrently, attaches whatever arrived,
//! places the background beneath the shelters and hides the loader. UI
//! events are then routed through [`MapApp::handle_event`].
//!
//! Nothing here is fatal: failed fetches skip their layer, failed lookups
//! open no popup, and events that arrive before loading finished are
//! dropped with a warning.

pub mod config;

use std::sync::Arc;

use beredskap_map_data::assets::AssetSource;
use beredskap_map_data::{fetch_resources, fetch_shelters};
use beredskap_map_layers::background::{Placement, add_background_layer};
use beredskap_map_layers::resources::add_resources_layer;
use beredskap_map_layers::shelters::add_shelters_layer;
use beredskap_map_layers::SHELTERS_LAYER_ID;
use beredskap_map_resource_models::LonLat;
use beredskap_map_supabase::RpcClient;
use beredskap_map_surface::{MapDocument, MapSurface, SurfaceError, Visibility};
use beredskap_map_ui::geolocate::LocateControl;
use beredskap_map_ui::interaction::{LayerInteractions, default_bindings};
use beredskap_map_ui::map_click::{MapClickOutcome, handle_map_click};
use beredskap_map_ui::toggles::{set_layer_visibility, toggle_for};
use beredskap_map_ui::{Geolocator, PageShell};
use thiserror::Error;

pub use config::MapConfig;

/// Errors that can occur while loading the map configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration is not valid TOML or misses a key.
    #[error("Failed to parse map config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// What the initialization sequence managed to put on the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of resources attached, or `None` if the layer was skipped.
    pub resources: Option<usize>,
    /// Number of shelters attached, or `None` if the layer was skipped.
    pub shelters: Option<usize>,
    /// Where the background ended up, or `None` if it was skipped.
    pub background: Option<Placement>,
}

/// A user interaction delivered by the page.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// A layer checkbox changed.
    ToggleChanged {
        /// Id of the checkbox element.
        element_id: String,
        /// New checkbox state.
        checked: bool,
    },
    /// The pointer moved over the map.
    PointerMoved(LonLat),
    /// The map was clicked.
    MapClick(LonLat),
    /// The user dismissed the open popup.
    PopupClosed,
    /// The "find my position" button was pressed.
    LocateRequested,
}

/// Result of handling a [`UiEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// The map has not finished loading; the event was dropped.
    Ignored,
    /// A layer's visibility changed.
    Toggled(Visibility),
    /// The event was handled without a specific result.
    Handled,
    /// A click was dispatched to a feature popup.
    FeatureClicked,
    /// A click went to the nearest-resource lookup.
    MapClicked(MapClickOutcome),
    /// A locate request finished, with the position on success.
    Located(Option<LonLat>),
}

/// The preparedness map page.
pub struct MapApp {
    config: MapConfig,
    rpc: Arc<dyn RpcClient>,
    assets: Arc<dyn AssetSource>,
    geolocator: Option<Arc<dyn Geolocator>>,
    interactions: LayerInteractions,
    locate: LocateControl,
    ready: bool,
}

impl std::fmt::Debug for MapApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapApp")
            .field("config", &self.config)
            .field("geolocator", &self.geolocator.is_some())
            .field("interactions", &self.interactions)
            .field("locate", &self.locate)
            .field("ready", &self.ready)
            .finish_non_exhaustive()
    }
}

impl MapApp {
    #[must_use]
    pub fn new(config: MapConfig, rpc: Arc<dyn RpcClient>, assets: Arc<dyn AssetSource>) -> Self {
        Self {
            config,
            rpc,
            assets,
            geolocator: None,
            interactions: LayerInteractions::new(default_bindings()),
            locate: LocateControl::new(),
            ready: false,
        }
    }

    /// Enables the "find my position" button.
    #[must_use]
    pub fn with_geolocator(mut self, geolocator: Arc<dyn Geolocator>) -> Self {
        self.geolocator = Some(geolocator);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Whether [`Self::on_load`] has completed.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    #[must_use]
    pub const fn interactions(&self) -> &LayerInteractions {
        &self.interactions
    }

    /// A fresh headless surface at the configured initial view, with the
    /// navigation control docked where the configuration says.
    #[must_use]
    pub fn new_document(&self) -> MapDocument {
        let mut doc = MapDocument::new(self.config.center, self.config.zoom);
        doc.add_navigation_control(self.config.navigation_control);
        doc
    }

    /// Runs the initialization sequence against a loaded surface.
    ///
    /// Shelters and resources are fetched concurrently. A failed fetch or
    /// attach skips that layer. The background goes beneath the shelter
    /// layer, or on top if shelters are missing.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::NotReady`] if the surface has not finished
    /// loading. Nothing is fetched in that case.
    pub async fn on_load(
        &mut self,
        surface: &mut dyn MapSurface,
        shell: &mut dyn PageShell,
    ) -> Result<LoadReport, SurfaceError> {
        if !surface.is_ready() {
            log::warn!("Map surface not ready; postponing initialization");
            return Err(SurfaceError::NotReady);
        }

        log::info!("Map loaded, adding layers");

        let (shelters, resources) = futures::future::join(
            fetch_shelters(self.assets.as_ref(), &self.config.shelters_path),
            fetch_resources(self.rpc.as_ref()),
        )
        .await;

        let shelters = shelters.ok().and_then(|fc| {
            let count = fc.features.len();
            add_shelters_layer(surface, fc)
                .map_err(|e| log::error!("Failed to add shelter layer: {e}"))
                .ok()
                .map(|()| count)
        });

        let resources = resources.ok().and_then(|fc| {
            let count = fc.features.len();
            add_resources_layer(surface, fc)
                .map_err(|e| log::error!("Failed to add resource layer: {e}"))
                .ok()
                .map(|()| count)
        });

        let background =
            add_background_layer(surface, &self.config.background, Some(SHELTERS_LAYER_ID))
                .map_err(|e| log::error!("Failed to add background layer: {e}"))
                .ok();

        self.ready = true;
        shell.hide_loader();
        log::info!("Map ready");

        Ok(LoadReport {
            resources,
            shelters,
            background,
        })
    }

    /// Routes a UI event to its handler.
    pub async fn handle_event(
        &mut self,
        surface: &mut dyn MapSurface,
        shell: &mut dyn PageShell,
        event: UiEvent,
    ) -> EventOutcome {
        if !self.ready {
            log::warn!("Ignoring {event:?} before the map finished loading");
            return EventOutcome::Ignored;
        }

        match event {
            UiEvent::ToggleChanged {
                element_id,
                checked,
            } => {
                let Some(toggle) = toggle_for(&element_id) else {
                    log::warn!("No layer toggle for element {element_id}");
                    return EventOutcome::Handled;
                };
                match set_layer_visibility(surface, toggle.layer_id, checked) {
                    Ok(visibility) => EventOutcome::Toggled(visibility),
                    Err(e) => {
                        log::warn!("Could not toggle {}: {e}", toggle.layer_id);
                        EventOutcome::Handled
                    }
                }
            }
            UiEvent::PointerMoved(at) => {
                self.interactions.pointer_moved(surface, at);
                EventOutcome::Handled
            }
            UiEvent::MapClick(at) => {
                if self.interactions.click_at(surface, at) {
                    return EventOutcome::FeatureClicked;
                }
                let tracked = self.interactions.layer_ids();
                let outcome = handle_map_click(surface, self.rpc.as_ref(), at, &tracked).await;
                if matches!(outcome, MapClickOutcome::Shown(_)) {
                    self.interactions.release_popup();
                }
                EventOutcome::MapClicked(outcome)
            }
            UiEvent::PopupClosed => {
                surface.close_popup();
                self.interactions.release_popup();
                EventOutcome::Handled
            }
            UiEvent::LocateRequested => {
                let position = self
                    .locate
                    .locate(surface, self.geolocator.as_deref(), shell)
                    .await;
                EventOutcome::Located(position)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beredskap_map_data::DataError;
    use beredskap_map_data::resources::GET_ALL_RESOURCES_FN;
    use beredskap_map_layers::{BACKGROUND_LAYER_ID, RESOURCES_LAYER_ID};
    use beredskap_map_supabase::testing::StaticRpc;
    use beredskap_map_surface::ControlPosition;
    use beredskap_map_ui::GeolocationError;
    use beredskap_map_ui::interaction::InteractionState;

    const SHELTERS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [7.9931, 58.1455] },
                "properties": { "adresse": "Rådhusgata 20", "objtype": "Offentlig", "plasser": 350, "romnr": "1" }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [8.0120, 58.1510] },
                "properties": { "adresse": "Lundsiden", "objtype": "Offentlig", "plasser": 120, "romnr": "2" }
            }
        ]
    }"#;

    struct MemoryAssets(Option<&'static str>);

    #[async_trait::async_trait]
    impl AssetSource for MemoryAssets {
        async fn load(&self, path: &str) -> Result<String, DataError> {
            self.0.map(str::to_string).ok_or_else(|| DataError::Asset {
                message: format!("{path} returned 404"),
            })
        }
    }

    struct FixedGeolocator(LonLat);

    #[async_trait::async_trait]
    impl Geolocator for FixedGeolocator {
        async fn current_position(&self) -> Result<LonLat, GeolocationError> {
            Ok(self.0)
        }
    }

    #[derive(Default)]
    struct Shell {
        loader_hidden: bool,
        alerts: Vec<String>,
    }

    impl PageShell for Shell {
        fn hide_loader(&mut self) {
            self.loader_hidden = true;
        }

        fn alert(&mut self, message: &str) {
            self.alerts.push(message.to_string());
        }
    }

    fn resources_rpc() -> StaticRpc {
        StaticRpc::new().with_response(
            GET_ALL_RESOURCES_FN,
            serde_json::json!([
                { "navn": "Hjertestarter Torvet", "kategori": "Hjertestarter", "beskrivelse": "", "lng": 7.9956, "lat": 58.1462 }
            ]),
        )
    }

    fn app(rpc: StaticRpc, shelters: Option<&'static str>) -> MapApp {
        MapApp::new(
            MapConfig::embedded(),
            Arc::new(rpc),
            Arc::new(MemoryAssets(shelters)),
        )
    }

    fn loaded_doc(app: &MapApp) -> MapDocument {
        let mut doc = app.new_document();
        doc.mark_loaded();
        doc
    }

    #[tokio::test]
    async fn refuses_to_initialize_before_load() {
        let mut app = app(resources_rpc(), Some(SHELTERS));
        let mut doc = app.new_document();
        let mut shell = Shell::default();

        let result = app.on_load(&mut doc, &mut shell).await;

        assert_eq!(result, Err(SurfaceError::NotReady));
        assert!(!app.is_ready());
        assert!(!shell.loader_hidden);
        assert!(doc.layer_ids().is_empty());
        assert_eq!(doc.navigation_control(), Some(ControlPosition::TopRight));
    }

    #[tokio::test]
    async fn attaches_all_layers_with_background_at_bottom() {
        let mut app = app(resources_rpc(), Some(SHELTERS));
        let mut doc = loaded_doc(&app);
        let mut shell = Shell::default();

        let report = app.on_load(&mut doc, &mut shell).await.unwrap();

        assert_eq!(report.shelters, Some(2));
        assert_eq!(report.resources, Some(1));
        assert_eq!(
            report.background,
            Some(Placement::Beneath(SHELTERS_LAYER_ID.to_string()))
        );
        assert_eq!(
            doc.layer_ids(),
            vec![BACKGROUND_LAYER_ID, SHELTERS_LAYER_ID, RESOURCES_LAYER_ID]
        );
        assert!(shell.loader_hidden);
        assert!(app.is_ready());
    }

    #[tokio::test]
    async fn failed_fetches_skip_their_layers() {
        let rpc = StaticRpc::new().with_failure(GET_ALL_RESOURCES_FN, 500, "down");
        let mut app = app(rpc, None);
        let mut doc = loaded_doc(&app);
        let mut shell = Shell::default();

        let report = app.on_load(&mut doc, &mut shell).await.unwrap();

        assert_eq!(report.shelters, None);
        assert_eq!(report.resources, None);
        assert_eq!(report.background, Some(Placement::Top));
        assert_eq!(doc.layer_ids(), vec![BACKGROUND_LAYER_ID]);
        assert!(shell.loader_hidden);
    }

    #[tokio::test]
    async fn events_before_load_are_ignored() {
        let mut app = app(resources_rpc(), Some(SHELTERS));
        let mut doc = loaded_doc(&app);
        let mut shell = Shell::default();

        let outcome = app
            .handle_event(&mut doc, &mut shell, UiEvent::MapClick(LonLat::new(8.0, 58.0)))
            .await;

        assert_eq!(outcome, EventOutcome::Ignored);
        assert!(doc.popup().is_none());
    }

    #[tokio::test]
    async fn dispatches_toggles_clicks_and_locate() {
        let here = LonLat::new(8.001, 58.149);
        let mut app = app(resources_rpc(), Some(SHELTERS))
            .with_geolocator(Arc::new(FixedGeolocator(here)));
        let mut doc = loaded_doc(&app);
        let mut shell = Shell::default();
        app.on_load(&mut doc, &mut shell).await.unwrap();

        let toggled = app
            .handle_event(
                &mut doc,
                &mut shell,
                UiEvent::ToggleChanged {
                    element_id: "toggle-tilfluktsrom".to_string(),
                    checked: false,
                },
            )
            .await;
        assert_eq!(toggled, EventOutcome::Toggled(Visibility::None));

        let clicked = app
            .handle_event(
                &mut doc,
                &mut shell,
                UiEvent::MapClick(LonLat::new(7.9956, 58.1462)),
            )
            .await;
        assert_eq!(clicked, EventOutcome::FeatureClicked);
        assert_eq!(
            app.interactions().state(RESOURCES_LAYER_ID),
            Some(InteractionState::PopupOpen)
        );

        app.handle_event(&mut doc, &mut shell, UiEvent::PopupClosed)
            .await;
        assert!(doc.popup().is_none());
        assert_eq!(
            app.interactions().state(RESOURCES_LAYER_ID),
            Some(InteractionState::Idle)
        );

        let located = app
            .handle_event(&mut doc, &mut shell, UiEvent::LocateRequested)
            .await;
        assert_eq!(located, EventOutcome::Located(Some(here)));
        assert_eq!(doc.markers().len(), 1);
    }

    #[tokio::test]
    async fn hidden_shelters_do_not_suppress_lookup() {
        let rpc = resources_rpc().with_response(
            beredskap_map_data::nearest::FIND_NEAREST_FN,
            serde_json::json!([{ "navn": "Tilfluktsrom A", "kategori": "Shelter", "avstand_meter": 123.4 }]),
        );
        let mut app = app(rpc, Some(SHELTERS));
        let mut doc = loaded_doc(&app);
        let mut shell = Shell::default();
        app.on_load(&mut doc, &mut shell).await.unwrap();

        app.handle_event(
            &mut doc,
            &mut shell,
            UiEvent::ToggleChanged {
                element_id: "toggle-tilfluktsrom".to_string(),
                checked: false,
            },
        )
        .await;
        let outcome = app
            .handle_event(
                &mut doc,
                &mut shell,
                UiEvent::MapClick(LonLat::new(7.9931, 58.1455)),
            )
            .await;

        let EventOutcome::MapClicked(MapClickOutcome::Shown(candidate)) = outcome else {
            panic!("expected nearest popup, got {outcome:?}");
        };
        assert_eq!(candidate.rounded_distance(), 123);
        assert!(doc.popup().unwrap().html.contains("ca. 123 meter"));
    }
}
