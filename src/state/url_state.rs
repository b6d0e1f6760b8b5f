//! URL state encoding/decoding for shareable URLs.
//!
//! Encodes the map view and the selected layers in the URL query string so
//! reloading restores the view and URLs can be shared.

use crate::hazard::{HazardCategory, HazardRasterLayer};

/// Parsed URL parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub zoom: Option<f64>,
    pub hazard: Option<HazardRasterLayer>,
    pub shelter: Option<HazardCategory>,
}

/// Snapshot of the state written back to the URL.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlView {
    pub lat: f64,
    pub lon: f64,
    pub zoom: f64,
    pub hazard: Option<HazardRasterLayer>,
    pub shelter: Option<HazardCategory>,
}

impl UrlView {
    pub fn to_query(&self) -> String {
        let mut query = format!("?lat={:.5}&lon={:.5}&z={:.2}", self.lat, self.lon, self.zoom);
        if let Some(hazard) = self.hazard {
            query.push_str("&hazard=");
            query.push_str(hazard.key());
        }
        if let Some(shelter) = self.shelter {
            query.push_str("&shelter=");
            query.push_str(shelter.key());
        }
        query
    }
}

/// Parse a query string (with or without the leading `?`).
///
/// Unknown keys and unparseable values are ignored.
pub fn parse_query(search: &str) -> UrlParams {
    let mut params = UrlParams::default();

    let query = search.trim_start_matches('?');
    if query.is_empty() {
        return params;
    }

    for pair in query.split('&') {
        let mut kv = pair.splitn(2, '=');
        let key = kv.next().unwrap_or("");
        let value = kv.next().unwrap_or("");
        match key {
            "lat" => params.lat = value.parse().ok().filter(|v: &f64| v.is_finite()),
            "lon" => params.lon = value.parse().ok().filter(|v: &f64| v.is_finite()),
            "z" => params.zoom = value.parse().ok().filter(|v: &f64| v.is_finite()),
            "hazard" => params.hazard = HazardRasterLayer::from_key(value),
            "shelter" => params.shelter = HazardCategory::from_key(value),
            _ => {}
        }
    }

    params
}

/// Parse URL query parameters from the current browser URL.
#[cfg(target_arch = "wasm32")]
pub fn parse_from_url() -> UrlParams {
    let Some(window) = web_sys::window() else {
        return UrlParams::default();
    };
    match window.location().search() {
        Ok(search) => parse_query(&search),
        Err(_) => UrlParams::default(),
    }
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn parse_from_url() -> UrlParams {
    UrlParams::default()
}

/// Push current state to the URL query string using `replaceState`.
#[cfg(target_arch = "wasm32")]
pub fn push_to_url(view: &UrlView) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(history) = window.history() else {
        return;
    };
    let _ = history.replace_state_with_url(
        &wasm_bindgen::JsValue::NULL,
        "",
        Some(&view.to_query()),
    );
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn push_to_url(_view: &UrlView) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let params = parse_query("?lat=35.5&lon=139.25&z=12&hazard=tsunami&shelter=flood&x=1");
        assert_eq!(params.lat, Some(35.5));
        assert_eq!(params.lon, Some(139.25));
        assert_eq!(params.zoom, Some(12.0));
        assert_eq!(params.hazard, Some(HazardRasterLayer::Tsunami));
        assert_eq!(params.shelter, Some(HazardCategory::Flood));
    }

    #[test]
    fn test_parse_query_ignores_garbage() {
        assert_eq!(parse_query(""), UrlParams::default());
        let params = parse_query("lat=abc&lon=NaN&hazard=lava&z");
        assert_eq!(params, UrlParams::default());
    }

    #[test]
    fn test_query_round_trip() {
        let view = UrlView {
            lat: 35.0,
            lon: 139.0,
            zoom: 7.5,
            hazard: Some(HazardRasterLayer::Flood),
            shelter: Some(HazardCategory::Earthquake),
        };
        let query = view.to_query();
        assert_eq!(query, "?lat=35.00000&lon=139.00000&z=7.50&hazard=flood&shelter=earthquake");

        let params = parse_query(&query);
        assert_eq!(params.zoom, Some(7.5));
        assert_eq!(params.hazard, view.hazard);
        assert_eq!(params.shelter, view.shelter);
    }
}
