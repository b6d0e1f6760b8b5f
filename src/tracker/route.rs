//! Route overlay geometry.

use crate::shelter::ShelterId;
use geo_types::Coord;
use geojson::{Feature, FeatureCollection, Geometry, Value};

/// The straight line drawn from the user to the nearest shelter.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLine {
    /// User position (lon, lat)
    pub from: Coord<f64>,
    /// Shelter position (lon, lat)
    pub to: Coord<f64>,
    pub shelter_id: ShelterId,
    /// Great-circle length in metres
    pub distance_m: f64,
}

/// What the route layer should display.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RouteOverlay {
    #[default]
    Empty,
    Line(RouteLine),
}

impl RouteOverlay {
    pub fn is_empty(&self) -> bool {
        matches!(self, RouteOverlay::Empty)
    }

    pub fn line(&self) -> Option<&RouteLine> {
        match self {
            RouteOverlay::Line(line) => Some(line),
            RouteOverlay::Empty => None,
        }
    }

    /// The overlay as a GeoJSON feature collection: one LineString feature,
    /// or no features when empty.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let features = self
            .line()
            .map(|line| {
                let geometry = Geometry::new(Value::LineString(vec![
                    vec![line.from.x, line.from.y],
                    vec![line.to.x, line.to.y],
                ]));
                let mut properties = geojson::JsonObject::new();
                properties.insert("shelter".to_string(), line.shelter_id.0.clone().into());
                properties.insert("dist".to_string(), line.distance_m.into());
                Feature {
                    bbox: None,
                    geometry: Some(geometry),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .into_iter()
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

/// Formats a distance for display.
pub fn format_distance(distance_m: f64) -> String {
    if distance_m >= 1000.0 {
        format!("{:.1} km", distance_m / 1000.0)
    } else {
        format!("{:.0} m", distance_m)
    }
}
