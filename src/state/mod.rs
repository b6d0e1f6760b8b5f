//! Application state management.
//!
//! State is organized into logical groupings that correspond to different
//! areas of functionality.

mod layer;
mod route;
mod settings;
mod tracking;
pub mod url_state;

pub use layer::LayerState;
pub use route::RouteLayer;
pub use settings::{AppSettings, DATA_ENV_VAR};
pub use tracking::{TrackingController, TrackingState, TrackingStatus};

use crate::geo::MapProjection;
use crate::shelter::ShelterId;
use geo_types::Coord;

/// An open info popup for a clicked shelter.
#[derive(Debug, Clone, PartialEq)]
pub struct ShelterPopup {
    pub shelter_id: ShelterId,
    /// Geographic anchor, so the popup follows the map while panning
    pub anchor: Coord<f64>,
}

/// Root application state containing all sub-states.
#[derive(Default)]
pub struct AppState {
    /// Current map view
    pub projection: MapProjection,

    /// Hazard raster and shelter layer selection
    pub layer_state: LayerState,

    /// Locate control and last fix
    pub tracking: TrackingState,

    /// Route geometry last published by the tracker
    pub route_layer: RouteLayer,

    /// Shelter popup, if one is open
    pub popup: Option<ShelterPopup>,

    /// Map point under the pointer when the context menu was opened
    pub context_anchor: Option<Coord<f64>>,

    /// Application status message displayed in top bar
    pub status_message: String,

    pub settings: AppSettings,

    /// Set by the UI when a setting was edited and should be applied and saved
    pub settings_changed: bool,
}

impl AppState {
    pub fn new(settings: AppSettings) -> Self {
        let projection = MapProjection::new(settings.initial_center(), settings.initial_zoom);
        Self {
            projection,
            status_message: "Ready".to_string(),
            settings,
            ..Default::default()
        }
    }

    /// Applies parameters parsed from the page URL over the initial view.
    pub fn apply_url_params(&mut self, params: &url_state::UrlParams) {
        let mut center = self.projection.center;
        if let Some(lat) = params.lat {
            center.y = lat;
        }
        if let Some(lon) = params.lon {
            center.x = lon;
        }
        let zoom = params.zoom.unwrap_or(self.projection.zoom);
        self.projection.fly_to(center, zoom);

        if params.hazard.is_some() {
            self.layer_state.show_hazard_raster(params.hazard);
        }
        if params.shelter.is_some() {
            self.layer_state.show_shelter_category(params.shelter);
        }
    }

    /// Snapshot of the view to encode in the URL.
    pub fn url_view(&self) -> url_state::UrlView {
        url_state::UrlView {
            lat: self.projection.center.y,
            lon: self.projection.center.x,
            zoom: self.projection.zoom,
            hazard: self.layer_state.hazard_raster,
            shelter: self.layer_state.shelter_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hazard::{HazardCategory, HazardRasterLayer};

    #[test]
    fn test_url_params_applied() {
        let mut state = AppState::new(AppSettings::default());
        let params = url_state::parse_query("?lat=35&lon=139&z=12&hazard=flood&shelter=tsunami");
        state.apply_url_params(&params);

        assert_eq!(state.projection.center.x, 139.0);
        assert_eq!(state.projection.center.y, 35.0);
        assert_eq!(state.projection.zoom, 12.0);
        assert_eq!(state.layer_state.hazard_raster, Some(HazardRasterLayer::Flood));
        assert_eq!(
            state.layer_state.shelter_category,
            Some(HazardCategory::Tsunami)
        );
        assert_eq!(state.url_view().shelter, Some(HazardCategory::Tsunami));
    }

    #[test]
    fn test_empty_url_keeps_initial_view() {
        let mut state = AppState::new(AppSettings::default());
        state.apply_url_params(&url_state::UrlParams::default());
        assert_eq!(state.projection.center.x, 138.0);
        assert_eq!(state.projection.zoom, 5.0);
        assert!(state.popup.is_none());
    }
}
