//! "Find my position" control.
//!
//! At most one location marker exists at a time. A successful locate
//! recenters the camera and replaces the previous marker; a failed one
//! shows a notice and leaves camera and marker untouched.

use beredskap_map_resource_models::LonLat;
use beredskap_map_surface::{CameraTarget, MapSurface, MarkerId, MarkerSpec};

use crate::{GeolocationError, Geolocator, PageShell};

/// Zoom level after flying to the user's position.
pub const LOCATE_ZOOM: f64 = 15.0;
/// Camera animation speed when flying to the user's position.
pub const LOCATE_SPEED: f64 = 1.5;
/// Color of the location marker.
pub const LOCATION_MARKER_COLOR: &str = "#007bff";

/// Notice shown when the platform has no geolocation capability.
pub const UNSUPPORTED_NOTICE: &str = "Geolokasjon støttes ikke av nettleseren din.";
/// Notice shown when the position could not be read.
pub const FAILED_NOTICE: &str =
    "Kunne ikke hente posisjonen din. Sørg for at du har gitt tillatelse.";

/// Owns the single location marker.
#[derive(Debug, Default)]
pub struct LocateControl {
    marker: Option<MarkerId>,
}

impl LocateControl {
    #[must_use]
    pub const fn new() -> Self {
        Self { marker: None }
    }

    /// Marker currently placed by this control.
    #[must_use]
    pub const fn marker(&self) -> Option<MarkerId> {
        self.marker
    }

    /// Requests the device position once and shows it on the map.
    ///
    /// `geolocator` is `None` when the platform offers no geolocation.
    /// Returns the located position on success.
    pub async fn locate(
        &mut self,
        surface: &mut dyn MapSurface,
        geolocator: Option<&dyn Geolocator>,
        shell: &mut dyn PageShell,
    ) -> Option<LonLat> {
        let Some(geolocator) = geolocator else {
            shell.alert(UNSUPPORTED_NOTICE);
            return None;
        };

        let position = match geolocator.current_position().await {
            Ok(position) => position,
            Err(GeolocationError::Unsupported) => {
                shell.alert(UNSUPPORTED_NOTICE);
                return None;
            }
            Err(e) => {
                log::warn!("Geolocation failed: {e}");
                shell.alert(FAILED_NOTICE);
                return None;
            }
        };

        log::debug!("Located user at {}, {}", position.lon, position.lat);

        surface.fly_to(CameraTarget {
            center: position,
            zoom: LOCATE_ZOOM,
            speed: LOCATE_SPEED,
        });

        if let Some(previous) = self.marker.take() {
            surface.remove_marker(previous);
        }
        self.marker = Some(surface.add_marker(MarkerSpec {
            position,
            color: LOCATION_MARKER_COLOR.to_string(),
        }));

        Some(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beredskap_map_surface::MapDocument;
    use std::sync::Mutex;

    struct SequenceGeolocator {
        answers: Mutex<Vec<Result<LonLat, GeolocationError>>>,
    }

    impl SequenceGeolocator {
        fn new(mut answers: Vec<Result<LonLat, GeolocationError>>) -> Self {
            answers.reverse();
            Self {
                answers: Mutex::new(answers),
            }
        }
    }

    #[async_trait::async_trait]
    impl Geolocator for SequenceGeolocator {
        async fn current_position(&self) -> Result<LonLat, GeolocationError> {
            self.answers
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(GeolocationError::Timeout))
        }
    }

    #[derive(Default)]
    struct RecordingShell {
        alerts: Vec<String>,
    }

    impl PageShell for RecordingShell {
        fn hide_loader(&mut self) {}

        fn alert(&mut self, message: &str) {
            self.alerts.push(message.to_string());
        }
    }

    const START: LonLat = LonLat::new(8.005, 58.15);

    #[tokio::test]
    async fn locating_twice_keeps_one_marker() {
        let mut doc = MapDocument::loaded(START, 12.0);
        let mut shell = RecordingShell::default();
        let mut control = LocateControl::new();
        let first = LonLat::new(7.99, 58.14);
        let second = LonLat::new(8.02, 58.16);
        let geolocator = SequenceGeolocator::new(vec![Ok(first), Ok(second)]);

        control.locate(&mut doc, Some(&geolocator), &mut shell).await;
        control.locate(&mut doc, Some(&geolocator), &mut shell).await;

        let markers = doc.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].position, second);
        assert_eq!(markers[0].color, LOCATION_MARKER_COLOR);
        assert_eq!(doc.camera().center, second);
        assert!((doc.camera().zoom - LOCATE_ZOOM).abs() < f64::EPSILON);
        assert!(shell.alerts.is_empty());
    }

    #[tokio::test]
    async fn failure_leaves_state_unchanged() {
        let mut doc = MapDocument::loaded(START, 12.0);
        let mut shell = RecordingShell::default();
        let mut control = LocateControl::new();
        let here = LonLat::new(7.99, 58.14);
        let geolocator = SequenceGeolocator::new(vec![
            Ok(here),
            Err(GeolocationError::PermissionDenied),
        ]);

        control.locate(&mut doc, Some(&geolocator), &mut shell).await;
        let marker = control.marker();
        let result = control.locate(&mut doc, Some(&geolocator), &mut shell).await;

        assert!(result.is_none());
        assert_eq!(control.marker(), marker);
        assert_eq!(doc.markers().len(), 1);
        assert_eq!(doc.markers()[0].position, here);
        assert_eq!(doc.camera().center, here);
        assert_eq!(shell.alerts, vec![FAILED_NOTICE.to_string()]);
    }

    #[tokio::test]
    async fn missing_capability_shows_notice() {
        let mut doc = MapDocument::loaded(START, 12.0);
        let mut shell = RecordingShell::default();
        let mut control = LocateControl::new();

        let result = control.locate(&mut doc, None, &mut shell).await;

        assert!(result.is_none());
        assert!(doc.markers().is_empty());
        assert_eq!(doc.camera().center, START);
        assert_eq!(shell.alerts, vec![UNSUPPORTED_NOTICE.to_string()]);
    }
}
