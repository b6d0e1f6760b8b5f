//! Narrow adapter from GeoJSON features to [`Shelter`] records.
//!
//! Only the point coordinates, the eight `disasterN` flags and the
//! name/address/remarks attributes are kept; every other attribute of the
//! source feature is dropped here so nothing downstream depends on the
//! shape of the raw data.

use super::model::{Shelter, ShelterId};
use crate::hazard::{HazardCategory, HazardFilter};
use geo_types::Point;
use geojson::{feature::Id, Feature, GeoJson, JsonObject, JsonValue, Value};
use thiserror::Error;

/// Errors raised while loading shelter data.
#[derive(Debug, Error)]
pub enum ShelterLoadError {
    #[error("failed to parse shelter GeoJSON: {0}")]
    Parse(#[from] geojson::Error),
    #[error("shelter data is a bare geometry, expected features")]
    NotFeatures,
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },
}

/// Result of parsing a shelter data set.
#[derive(Debug, Default)]
pub struct ParsedShelters {
    pub shelters: Vec<Shelter>,
    /// Features dropped because they were not valid points
    pub skipped: usize,
}

/// Parses shelters from a GeoJSON document.
///
/// Features whose geometry is missing, is not a point, or has non-finite
/// coordinates are skipped and counted rather than failing the whole load.
pub fn parse_shelters(geojson_str: &str) -> Result<ParsedShelters, ShelterLoadError> {
    let geojson: GeoJson = geojson_str.parse()?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => return Err(ShelterLoadError::NotFeatures),
    };

    let mut parsed = ParsedShelters::default();
    for (index, feature) in features.iter().enumerate() {
        match convert_feature(feature, index) {
            Some(shelter) => parsed.shelters.push(shelter),
            None => parsed.skipped += 1,
        }
    }

    if parsed.skipped > 0 {
        log::warn!(
            "Skipped {} shelter feature(s) without a valid point geometry",
            parsed.skipped
        );
    }

    Ok(parsed)
}

/// Converts one feature, or returns `None` if it has no usable point.
pub fn convert_feature(feature: &Feature, index: usize) -> Option<Shelter> {
    let location = point_location(feature)?;
    let properties = feature.properties.as_ref();

    let mut hazards = HazardFilter::empty();
    for category in HazardCategory::ALL {
        let flag = properties
            .and_then(|p| p.get(&category.property_key()))
            .map(flag_value)
            .unwrap_or(false);
        hazards.set(category, flag);
    }

    Some(Shelter {
        id: feature_id(feature, index),
        location,
        name: string_property(properties, "name").unwrap_or_default(),
        address: string_property(properties, "address").unwrap_or_default(),
        remarks: string_property(properties, "remarks"),
        hazards,
    })
}

fn point_location(feature: &Feature) -> Option<Point<f64>> {
    let geometry = feature.geometry.as_ref()?;
    match &geometry.value {
        Value::Point(coords) if coords.len() >= 2 => {
            let (lon, lat) = (coords[0], coords[1]);
            (lon.is_finite() && lat.is_finite()).then(|| Point::new(lon, lat))
        }
        _ => None,
    }
}

fn feature_id(feature: &Feature, index: usize) -> ShelterId {
    match &feature.id {
        Some(Id::String(s)) => ShelterId(s.clone()),
        Some(Id::Number(n)) => ShelterId(n.to_string()),
        None => feature
            .properties
            .as_ref()
            .and_then(|p| p.get("id"))
            .and_then(|v| match v {
                JsonValue::String(s) => Some(s.clone()),
                JsonValue::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .map(ShelterId)
            .unwrap_or_else(|| ShelterId(index.to_string())),
    }
}

fn string_property(properties: Option<&JsonObject>, key: &str) -> Option<String> {
    match properties?.get(key)? {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Interprets a designation flag. The published data uses booleans, but
/// numeric and textual encodings also occur in converted copies.
fn flag_value(value: &JsonValue) -> bool {
    match value {
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        JsonValue::String(s) => matches!(s.trim(), "1" | "true" | "TRUE" | "True" | "○"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "A-1",
                "geometry": { "type": "Point", "coordinates": [139.01, 35.01] },
                "properties": {
                    "name": "Central Park",
                    "address": "1-1 Chiyoda",
                    "remarks": "",
                    "disaster1": true,
                    "disaster4": 1,
                    "disaster5": "1",
                    "disaster8": false
                }
            },
            {
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": [[139.0, 35.0], [139.1, 35.1]] },
                "properties": { "name": "Not a point" }
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [139.5, 35.5] },
                "properties": { "id": 42, "name": "School", "remarks": "Gym only", "disaster6": true }
            },
            {
                "type": "Feature",
                "geometry": null,
                "properties": {}
            },
            {
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [140.0, 36.0] },
                "properties": null
            }
        ]
    }"#;

    #[test]
    fn test_parse_sample_collection() {
        let parsed = parse_shelters(SAMPLE).unwrap();
        assert_eq!(parsed.shelters.len(), 3);
        assert_eq!(parsed.skipped, 2);

        let first = &parsed.shelters[0];
        assert_eq!(first.id, ShelterId::from("A-1"));
        assert_eq!(first.name, "Central Park");
        assert_eq!(first.address, "1-1 Chiyoda");
        assert_eq!(first.remarks, None);
        assert_eq!(first.longitude(), 139.01);
        assert_eq!(first.latitude(), 35.01);
        let cats: Vec<_> = first.hazards.iter().collect();
        assert_eq!(
            cats,
            vec![
                HazardCategory::Flood,
                HazardCategory::Earthquake,
                HazardCategory::Tsunami
            ]
        );

        let second = &parsed.shelters[1];
        assert_eq!(second.id, ShelterId::from("42"));
        assert_eq!(second.remarks.as_deref(), Some("Gym only"));
        assert_eq!(second.hazards, HazardFilter::only(HazardCategory::Fire));
    }

    #[test]
    fn test_missing_properties_fall_back_to_index() {
        let parsed = parse_shelters(SAMPLE).unwrap();
        let last = &parsed.shelters[2];
        assert_eq!(last.id, ShelterId::from("4"));
        assert!(last.hazards.is_empty());
        assert_eq!(last.display_name(), "4");
    }

    #[test]
    fn test_single_feature_document() {
        let doc = r#"{
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [141.35, 43.06] },
            "properties": { "name": "Sapporo", "disaster2": true }
        }"#;
        let parsed = parse_shelters(doc).unwrap();
        assert_eq!(parsed.shelters.len(), 1);
        assert!(parsed.shelters[0].hazards.contains(HazardCategory::Landslide));
    }

    #[test]
    fn test_rejects_bare_geometry_and_garbage() {
        let geometry = r#"{ "type": "Point", "coordinates": [139.0, 35.0] }"#;
        assert!(matches!(
            parse_shelters(geometry),
            Err(ShelterLoadError::NotFeatures)
        ));
        assert!(matches!(
            parse_shelters("not json"),
            Err(ShelterLoadError::Parse(_))
        ));
    }

    #[test]
    fn test_flag_encodings() {
        assert!(flag_value(&JsonValue::Bool(true)));
        assert!(!flag_value(&JsonValue::Bool(false)));
        assert!(flag_value(&serde_json::json!(1)));
        assert!(!flag_value(&serde_json::json!(0)));
        assert!(flag_value(&serde_json::json!("○")));
        assert!(!flag_value(&serde_json::json!("")));
        assert!(!flag_value(&JsonValue::Null));
    }
}
