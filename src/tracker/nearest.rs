//! Nearest-shelter search under great-circle distance.

use crate::shelter::Shelter;
use geo::{Distance, Haversine};
use geo_types::Point;

/// Great-circle distance in metres between two lon/lat points.
pub fn great_circle_distance(from: Point<f64>, to: Point<f64>) -> f64 {
    Haversine::distance(from, to)
}

/// Returns the candidate closest to (`longitude`, `latitude`).
///
/// Distance is measured along the great circle. When several candidates are
/// equally close the first one in `candidates` wins. Candidates whose
/// coordinates are not finite are skipped. Returns `None` when no usable
/// candidate remains.
pub fn get_nearest_shelter<'a, I>(longitude: f64, latitude: f64, candidates: I) -> Option<&'a Shelter>
where
    I: IntoIterator<Item = &'a Shelter>,
{
    nearest_with_distance(Point::new(longitude, latitude), candidates).map(|(shelter, _)| shelter)
}

/// Like [`get_nearest_shelter`], also returning the distance in metres.
pub fn nearest_with_distance<'a, I>(origin: Point<f64>, candidates: I) -> Option<(&'a Shelter, f64)>
where
    I: IntoIterator<Item = &'a Shelter>,
{
    let mut nearest: Option<(&'a Shelter, f64)> = None;

    for shelter in candidates {
        if !shelter.has_valid_location() {
            continue;
        }
        let distance = great_circle_distance(origin, shelter.location);
        // Strict comparison keeps the earliest candidate on ties
        match nearest {
            Some((_, best)) if distance >= best => {}
            _ => nearest = Some((shelter, distance)),
        }
    }

    nearest
}
