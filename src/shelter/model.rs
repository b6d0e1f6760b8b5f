//! Shelter records.

use crate::hazard::{HazardCategory, HazardFilter};
use geo_types::Point;
use std::fmt;

/// Identifier of a shelter, unique within a loaded data set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShelterId(pub String);

impl fmt::Display for ShelterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShelterId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A designated emergency evacuation site.
#[derive(Debug, Clone, PartialEq)]
pub struct Shelter {
    pub id: ShelterId,
    /// Location, x = longitude and y = latitude (WGS84)
    pub location: Point<f64>,
    pub name: String,
    pub address: String,
    pub remarks: Option<String>,
    /// Hazard categories this shelter is designated for
    pub hazards: HazardFilter,
}

impl Shelter {
    pub fn new(id: impl Into<ShelterId>, longitude: f64, latitude: f64) -> Self {
        Self {
            id: id.into(),
            location: Point::new(longitude, latitude),
            name: String::new(),
            address: String::new(),
            remarks: None,
            hazards: HazardFilter::empty(),
        }
    }

    pub fn with_hazard(mut self, category: HazardCategory) -> Self {
        self.hazards.insert(category);
        self
    }

    pub fn longitude(&self) -> f64 {
        self.location.x()
    }

    pub fn latitude(&self) -> f64 {
        self.location.y()
    }

    /// True if the shelter is designated for any category in `filter`.
    pub fn matches(&self, filter: &HazardFilter) -> bool {
        self.hazards.intersects(filter)
    }

    /// True if both coordinates are finite numbers.
    pub fn has_valid_location(&self) -> bool {
        self.longitude().is_finite() && self.latitude().is_finite()
    }

    /// Display name, falling back to the identifier.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id.0
        } else {
            &self.name
        }
    }
}

impl From<String> for ShelterId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
