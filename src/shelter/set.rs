//! In-memory shelter collection and the candidate queries run against it.

use super::model::{Shelter, ShelterId};
use crate::geo::{MapProjection, TileSource};
use crate::hazard::HazardFilter;
use crate::tracker::{CandidateSource, TrackerError};
use eframe::egui::Pos2;
use geo_types::Rect as GeoRect;
use std::collections::HashMap;

/// An immutable, ordered set of shelters with id lookup.
///
/// Iteration and query results always preserve the load order, which the
/// nearest-shelter search relies on to break ties.
#[derive(Debug, Clone, Default)]
pub struct ShelterSet {
    shelters: Vec<Shelter>,
    by_id: HashMap<ShelterId, usize>,
}

impl ShelterSet {
    pub fn new(shelters: Vec<Shelter>) -> Self {
        let mut by_id = HashMap::with_capacity(shelters.len());
        for (index, shelter) in shelters.iter().enumerate() {
            // First occurrence wins for duplicated ids
            by_id.entry(shelter.id.clone()).or_insert(index);
        }
        Self { shelters, by_id }
    }

    pub fn len(&self) -> usize {
        self.shelters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shelters.is_empty()
    }

    pub fn get(&self, id: &ShelterId) -> Option<&Shelter> {
        self.by_id.get(id).map(|&index| &self.shelters[index])
    }

    /// Shelters designated for any category in `filter`.
    pub fn matching(&self, filter: HazardFilter) -> impl Iterator<Item = &Shelter> + '_ {
        self.shelters.iter().filter(move |s| s.matches(&filter))
    }

    /// Shelters matching `filter` inside `extent`, or everywhere if `extent` is `None`.
    pub fn query(&self, filter: &HazardFilter, extent: Option<&GeoRect<f64>>) -> Vec<&Shelter> {
        self.matching(*filter)
            .filter(|s| extent.map_or(true, |e| contains(e, s)))
            .collect()
    }

    /// The visible shelter drawn under a screen position, if any.
    ///
    /// Among several shelters within `radius_px`, the closest on screen wins.
    pub fn hit_test(
        &self,
        pos: Pos2,
        radius_px: f32,
        filter: &HazardFilter,
        projection: &MapProjection,
    ) -> Option<&Shelter> {
        self.matching(*filter)
            .filter(|s| s.has_valid_location())
            .map(|s| (s, projection.geo_to_screen(s.location.0).distance(pos)))
            .filter(|(_, d)| *d <= radius_px)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(s, _)| s)
    }
}

fn contains(extent: &GeoRect<f64>, shelter: &Shelter) -> bool {
    let (min, max) = (extent.min(), extent.max());
    let (lon, lat) = (shelter.longitude(), shelter.latitude());
    lon >= min.x && lon <= max.x && lat >= min.y && lat <= max.y
}

/// The shelters the map currently has loaded: a [`ShelterSet`] scoped to
/// the tiles of the shelter source that cover the viewport.
pub struct LoadedShelters<'a> {
    set: Option<&'a ShelterSet>,
    extent: Option<GeoRect<f64>>,
}

impl<'a> LoadedShelters<'a> {
    /// Shelter tiles exist for zoom levels 5 through 8.
    pub fn source() -> TileSource {
        TileSource::new("skhb/{z}/{x}/{y}.pbf").with_zoom_range(5, 8)
    }

    /// Scopes `set` to the shelter tiles loaded for the current view.
    ///
    /// A set that has not finished loading yields no candidates.
    pub fn for_view(set: Option<&'a ShelterSet>, projection: &MapProjection) -> Self {
        let extent = Self::source().loaded_extent(&projection.visible_bounds(), projection.zoom);
        Self {
            set,
            extent: Some(extent),
        }
    }
}

impl CandidateSource for LoadedShelters<'_> {
    fn query_candidates(&self, filter: &HazardFilter) -> Result<Vec<&Shelter>, TrackerError> {
        Ok(self
            .set
            .map(|set| set.query(filter, self.extent.as_ref()))
            .unwrap_or_default())
    }
}
