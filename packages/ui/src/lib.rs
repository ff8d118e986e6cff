#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interaction handlers for the preparedness map.
//!
//! - [`interaction`]: per-layer hover cursor and click popups, driven by a
//!   table of [`interaction::InteractionBinding`]s;
//! - [`map_click`]: nearest-resource lookup for clicks that miss every
//!   tracked layer;
//! - [`geolocate`]: "find my position" with a single location marker;
//! - [`toggles`]: checkbox-driven layer visibility;
//! - [`popup`]: popup HTML formatters.
//!
//! The browser pieces the handlers depend on are abstracted as
//! [`PageShell`] (loading indicator and notices) and [`Geolocator`].

pub mod geolocate;
pub mod interaction;
pub mod map_click;
pub mod popup;
pub mod toggles;

use beredskap_map_resource_models::LonLat;
use thiserror::Error;

/// Id of the loading indicator element.
pub const LOADER_ELEMENT_ID: &str = "loader";
/// Id of the "find my position" button.
pub const MY_LOCATION_BUTTON_ID: &str = "my-location-btn";

/// Errors reported by a [`Geolocator`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    /// The user denied the position request.
    #[error("Permission to read the position was denied")]
    PermissionDenied,

    /// The platform could not determine a position.
    #[error("Position unavailable: {0}")]
    Unavailable(String),

    /// No position arrived in time.
    #[error("Timed out waiting for a position")]
    Timeout,

    /// The platform has no geolocation capability.
    #[error("Geolocation is not supported")]
    Unsupported,
}

/// Single-shot access to the device position.
#[async_trait::async_trait]
pub trait Geolocator: Send + Sync {
    /// Requests the current position once.
    ///
    /// # Errors
    ///
    /// Returns [`GeolocationError`] if the position cannot be determined.
    async fn current_position(&self) -> Result<LonLat, GeolocationError>;
}

/// Page chrome outside the map itself.
pub trait PageShell {
    /// Hides the loading indicator.
    fn hide_loader(&mut self);

    /// Shows a user-visible notice.
    fn alert(&mut self, message: &str);
}

/// A [`PageShell`] that only logs. Used when no page is attached, such as
/// when building a style document on the server.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogShell;

impl PageShell for LogShell {
    fn hide_loader(&mut self) {
        log::debug!("Loading finished");
    }

    fn alert(&mut self, message: &str) {
        log::warn!("{message}");
    }
}
