//! Application settings.
//!
//! On the web, settings are persisted to localStorage so they survive page
//! reloads. Native builds use defaults with an environment override for the
//! shelter data location.

use serde::{Deserialize, Serialize};

/// Environment variable overriding the shelter data location on native builds.
pub const DATA_ENV_VAR: &str = "SHELTER_MAP_DATA";

/// User-tunable map and tracking settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Zoom below which no route is drawn.
    pub min_route_zoom: f64,
    /// Zoom the map flies to on each location fix.
    pub locate_zoom: f64,
    /// Initial map centre as `[lon, lat]`.
    pub initial_center: [f64; 2],
    pub initial_zoom: f64,
    /// URL (web) or file path (native) of the shelter GeoJSON.
    pub shelter_data: String,
    /// Base map tile URL template with `{z}`, `{x}` and `{y}` placeholders.
    pub basemap_url: String,
    pub basemap_attribution: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            min_route_zoom: crate::tracker::DEFAULT_MIN_ROUTE_ZOOM,
            locate_zoom: 15.0,
            initial_center: [138.0, 37.0],
            initial_zoom: 5.0,
            shelter_data: "data/shelters.geojson".to_string(),
            basemap_url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            basemap_attribution: "© OpenStreetMap contributors".to_string(),
        }
    }
}

impl AppSettings {
    /// localStorage key for persisting settings.
    const STORAGE_KEY: &'static str = "shelter_map_settings";

    /// Parses settings JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return Self::default(),
        };

        let storage = match window.local_storage() {
            Ok(Some(s)) => s,
            _ => return Self::default(),
        };

        let json = match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(s)) => s,
            _ => return Self::default(),
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from localStorage");
                settings
            }
            Err(e) => {
                log::warn!("Failed to parse settings: {}", e);
                Self::default()
            }
        }
    }

    /// Defaults, with the shelter data path taken from the environment if set.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let mut settings = Self::default();
        if let Ok(path) = std::env::var(DATA_ENV_VAR) {
            log::info!("Using shelter data from {}={}", DATA_ENV_VAR, path);
            settings.shelter_data = path;
        }
        settings
    }

    /// Save settings to localStorage.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return,
        };

        let storage = match window.local_storage() {
            Ok(Some(s)) => s,
            _ => return,
        };

        let json = match serde_json::to_string(self) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Failed to serialize settings: {}", e);
                return;
            }
        };

        if let Err(e) = storage.set_item(Self::STORAGE_KEY, &json) {
            log::warn!("Failed to save settings: {:?}", e);
        } else {
            log::info!("Saved settings to localStorage");
        }
    }

    /// No-op for native builds.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!("Settings are not persisted on native builds");
    }

    pub fn initial_center(&self) -> geo_types::Coord<f64> {
        geo_types::coord! { x: self.initial_center[0], y: self.initial_center[1] }
    }
}
