//! Geolocation tracking state and the policy that feeds the tracker.

use super::AppState;
use crate::geolocation::{GeolocationChannel, GeolocationEvent, LocationError, LocationFix};
use crate::tracker::NearestFacilityTracker;
use eframe::egui;
use geo_types::Point;

/// Where the locate control currently stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TrackingStatus {
    /// Tracking is switched off
    #[default]
    Off,
    /// Watching, but no fix has arrived yet
    Waiting,
    /// Receiving fixes
    Active,
    /// The sensor failed or is unavailable
    Failed(String),
    /// A point picked on the map stands in for the sensor
    Manual,
}

impl TrackingStatus {
    pub fn label(&self) -> &str {
        match self {
            Self::Off => "Location off",
            Self::Waiting => "Locating...",
            Self::Active => "Tracking location",
            Self::Failed(_) => "Location unavailable",
            Self::Manual => "Manual location",
        }
    }

    /// True when some position, sensed or picked, feeds the tracker.
    pub fn has_source(&self) -> bool {
        matches!(self, Self::Waiting | Self::Active | Self::Manual)
    }

    /// True while the sensor is being watched.
    pub fn is_watching(&self) -> bool {
        matches!(self, Self::Waiting | Self::Active)
    }
}

/// State for the user's live location.
#[derive(Debug, Clone, Default)]
pub struct TrackingState {
    pub status: TrackingStatus,

    /// Most recent fix, kept for display
    pub last_fix: Option<LocationFix>,

    /// Set by the UI to switch tracking on or off
    pub toggle_requested: bool,

    /// Set by the map context menu to use a point as the user's location
    pub manual_position_requested: Option<Point<f64>>,
}

impl TrackingState {
    /// Timestamp of the last fix as a UTC wall-clock string.
    pub fn last_fix_time(&self) -> Option<String> {
        let fix = self.last_fix.as_ref()?;
        chrono::DateTime::from_timestamp_millis(fix.timestamp_ms as i64)
            .map(|t| t.format("%H:%M:%S UTC").to_string())
    }
}

/// Connects the location sensor to the nearest-shelter tracker.
///
/// Applies the locate toggle and picked positions from [`TrackingState`],
/// and turns sensor events into tracker position updates. Permission
/// denial stops the watch and forgets the position; transient sensor
/// errors are reported but keep the watch and the last position.
pub struct TrackingController {
    geolocation: GeolocationChannel,
    tracker: NearestFacilityTracker,
}

impl TrackingController {
    pub fn new(min_route_zoom: f64) -> Self {
        Self {
            geolocation: GeolocationChannel::new(),
            tracker: NearestFacilityTracker::new(min_route_zoom),
        }
    }

    pub fn tracker(&self) -> &NearestFacilityTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut NearestFacilityTracker {
        &mut self.tracker
    }

    /// True while the sensor watch is registered.
    pub fn is_watching(&self) -> bool {
        self.geolocation.is_watching()
    }

    /// Applies the locate toggle, a picked manual position, and queued
    /// sensor events.
    pub fn update(&mut self, ctx: &egui::Context, state: &mut AppState) {
        if std::mem::take(&mut state.tracking.toggle_requested) {
            if state.tracking.status.is_watching() {
                self.stop(state, TrackingStatus::Off);
            } else {
                state.tracking.status = TrackingStatus::Waiting;
                state.tracking.last_fix = None;
                self.tracker.on_position_update(None);
                self.geolocation.start(ctx.clone());
            }
        }

        if let Some(position) = state.tracking.manual_position_requested.take() {
            self.stop(state, TrackingStatus::Manual);
            log::info!(
                "Using manual location {:.5}, {:.5}",
                position.y(),
                position.x()
            );
            self.tracker.on_position_update(Some(position));
        }

        while let Some(event) = self.geolocation.try_recv() {
            self.apply_event(event, state);
        }
    }

    /// Applies one sensor event.
    pub fn apply_event(&mut self, event: GeolocationEvent, state: &mut AppState) {
        match event {
            GeolocationEvent::Fix(fix) => {
                state.tracking.status = TrackingStatus::Active;
                self.tracker.on_position_update(Some(fix.position));
                state
                    .projection
                    .fly_to(fix.position.0, state.settings.locate_zoom);
                state.tracking.last_fix = Some(fix);
            }
            GeolocationEvent::Error(error) => self.apply_error(error, state),
        }
    }

    fn apply_error(&mut self, error: LocationError, state: &mut AppState) {
        state.status_message = format!("Location unavailable: {}", error);
        if error.kind.is_fatal() {
            log::warn!("Location error, stopping watch: {}", error);
            self.stop(state, TrackingStatus::Failed(error.message));
        } else {
            log::warn!("Location error ({:?}), still watching: {}", error.kind, error);
        }
    }

    fn stop(&mut self, state: &mut AppState, status: TrackingStatus) {
        self.geolocation.stop();
        state.tracking.status = status;
        state.tracking.last_fix = None;
        self.tracker.on_position_update(None);
    }
}
