//! Nearest-shelter tracking.
//!
//! [`NearestFacilityTracker`] owns the user's last known position. On every
//! render tick it asks the host for the shelters matching the active hazard
//! filter, picks the nearest one, and hands the resulting route geometry to
//! the host for display. The host capabilities are the two traits below so
//! the tracker can run without a map or a geolocation sensor.

mod nearest;
mod route;

pub use nearest::{get_nearest_shelter, great_circle_distance, nearest_with_distance};
pub use route::{format_distance, RouteLine, RouteOverlay};

use crate::hazard::HazardFilter;
use crate::shelter::{Shelter, ShelterSet};
use geo_types::Point;
use thiserror::Error;

/// Zoom level below which no route is shown.
pub const DEFAULT_MIN_ROUTE_ZOOM: f64 = 7.0;

/// Failure of a host capability during a tick.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("shelter query failed: {0}")]
    Query(String),
    #[error("route publish failed: {0}")]
    Publish(String),
}

/// Supplies the shelters currently eligible as route targets.
pub trait CandidateSource {
    /// Shelters matching `filter`, in a stable order.
    fn query_candidates(&self, filter: &HazardFilter) -> Result<Vec<&Shelter>, TrackerError>;
}

/// Receives the route geometry to display, replacing whatever was shown.
pub trait RouteSink {
    fn publish_route(&mut self, route: &RouteOverlay) -> Result<(), TrackerError>;
}

impl CandidateSource for ShelterSet {
    fn query_candidates(&self, filter: &HazardFilter) -> Result<Vec<&Shelter>, TrackerError> {
        Ok(self.query(filter, None))
    }
}

impl CandidateSource for [Shelter] {
    fn query_candidates(&self, filter: &HazardFilter) -> Result<Vec<&Shelter>, TrackerError> {
        Ok(self.iter().filter(|s| s.matches(filter)).collect())
    }
}

/// Keeps the route to the nearest visible shelter in sync with the user's
/// position and the active hazard filter.
#[derive(Debug, Clone)]
pub struct NearestFacilityTracker {
    position: Option<Point<f64>>,
    min_route_zoom: f64,
    current: RouteOverlay,
}

impl Default for NearestFacilityTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ROUTE_ZOOM)
    }
}

impl NearestFacilityTracker {
    pub fn new(min_route_zoom: f64) -> Self {
        Self {
            position: None,
            min_route_zoom,
            current: RouteOverlay::Empty,
        }
    }

    pub fn set_min_route_zoom(&mut self, zoom: f64) {
        self.min_route_zoom = zoom;
    }

    /// Last known user position (x = longitude, y = latitude).
    pub fn position(&self) -> Option<Point<f64>> {
        self.position
    }

    /// The overlay published by the last successful tick.
    #[cfg(test)]
    pub fn route(&self) -> &RouteOverlay {
        &self.current
    }

    /// Records a new position, or forgets it when `None`.
    ///
    /// Nothing is recomputed here; the next render tick picks it up.
    pub fn on_position_update(&mut self, position: Option<Point<f64>>) {
        match (self.position.is_some(), position) {
            (false, Some(p)) => log::info!("User position acquired: {:.5}, {:.5}", p.x(), p.y()),
            (true, None) => log::info!("User position cleared"),
            _ => {}
        }
        self.position = position;
    }

    /// Recomputes the route and publishes it to `sink`.
    ///
    /// An empty overlay is published when the zoom is below the threshold,
    /// the position is unknown, or no shelter matches. Errors from `source`
    /// or `sink` are returned unchanged and leave the previous route in place.
    pub fn on_render_tick<S, R>(
        &mut self,
        zoom: f64,
        filter: &HazardFilter,
        source: &S,
        sink: &mut R,
    ) -> Result<&RouteOverlay, TrackerError>
    where
        S: CandidateSource + ?Sized,
        R: RouteSink + ?Sized,
    {
        let overlay = self.compute(zoom, filter, source)?;
        sink.publish_route(&overlay)?;
        self.current = overlay;
        Ok(&self.current)
    }

    fn compute<S>(&self, zoom: f64, filter: &HazardFilter, source: &S) -> Result<RouteOverlay, TrackerError>
    where
        S: CandidateSource + ?Sized,
    {
        let Some(position) = self.position else {
            return Ok(RouteOverlay::Empty);
        };
        if zoom.is_nan() || zoom < self.min_route_zoom {
            return Ok(RouteOverlay::Empty);
        }

        let candidates = source.query_candidates(filter)?;
        let overlay = match nearest_with_distance(position, candidates.iter().copied()) {
            Some((shelter, distance_m)) => RouteOverlay::Line(RouteLine {
                from: position.0,
                to: shelter.location.0,
                shelter_id: shelter.id.clone(),
                distance_m,
            }),
            None => RouteOverlay::Empty,
        };
        Ok(overlay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hazard::HazardCategory;
    use geo_types::coord;

    /// Sink that records every published overlay.
    #[derive(Default)]
    struct RecordingSink {
        published: Vec<RouteOverlay>,
    }

    impl RouteSink for RecordingSink {
        fn publish_route(&mut self, route: &RouteOverlay) -> Result<(), TrackerError> {
            self.published.push(route.clone());
            Ok(())
        }
    }

    struct FailingSource;

    impl CandidateSource for FailingSource {
        fn query_candidates(&self, _filter: &HazardFilter) -> Result<Vec<&Shelter>, TrackerError> {
            Err(TrackerError::Query("tiles unavailable".to_string()))
        }
    }

    struct FailingSink;

    impl RouteSink for FailingSink {
        fn publish_route(&mut self, _route: &RouteOverlay) -> Result<(), TrackerError> {
            Err(TrackerError::Publish("layer removed".to_string()))
        }
    }

    fn flood_shelters() -> Vec<Shelter> {
        vec![
            Shelter::new("A", 139.01, 35.01).with_hazard(HazardCategory::Flood),
            Shelter::new("B", 139.5, 35.5).with_hazard(HazardCategory::Flood),
        ]
    }

    fn tracker_at(lon: f64, lat: f64) -> NearestFacilityTracker {
        let mut tracker = NearestFacilityTracker::default();
        tracker.on_position_update(Some(Point::new(lon, lat)));
        tracker
    }

    #[test]
    fn test_routes_to_nearest_flood_shelter() {
        let shelters = flood_shelters();
        let mut tracker = tracker_at(139.0, 35.0);
        let mut sink = RecordingSink::default();
        let flood = HazardFilter::only(HazardCategory::Flood);

        let route = tracker
            .on_render_tick(10.0, &flood, shelters.as_slice(), &mut sink)
            .unwrap()
            .clone();

        let line = route.line().expect("route should be shown");
        assert_eq!(line.shelter_id.0, "A");
        assert_eq!(line.from, coord! { x: 139.0, y: 35.0 });
        assert_eq!(line.to, coord! { x: 139.01, y: 35.01 });
        assert_eq!(sink.published, vec![route]);
    }

    #[test]
    fn test_no_matching_category_publishes_empty() {
        let shelters = flood_shelters();
        let mut tracker = tracker_at(139.0, 35.0);
        let mut sink = RecordingSink::default();
        let quake = HazardFilter::only(HazardCategory::Earthquake);

        let route = tracker
            .on_render_tick(10.0, &quake, shelters.as_slice(), &mut sink)
            .unwrap();
        assert!(route.is_empty());
        assert_eq!(sink.published, vec![RouteOverlay::Empty]);
    }

    #[test]
    fn test_empty_filter_publishes_empty() {
        let shelters = flood_shelters();
        let mut tracker = tracker_at(139.0, 35.0);
        let mut sink = RecordingSink::default();

        let route = tracker
            .on_render_tick(10.0, &HazardFilter::empty(), shelters.as_slice(), &mut sink)
            .unwrap();
        assert!(route.is_empty());
    }

    #[test]
    fn test_zoom_threshold_boundary() {
        let shelters = flood_shelters();
        let mut tracker = tracker_at(139.0, 35.0);
        let mut sink = RecordingSink::default();
        let flood = HazardFilter::only(HazardCategory::Flood);

        let below = tracker
            .on_render_tick(6.999, &flood, shelters.as_slice(), &mut sink)
            .unwrap();
        assert!(below.is_empty());

        let at = tracker
            .on_render_tick(7.0, &flood, shelters.as_slice(), &mut sink)
            .unwrap();
        assert!(!at.is_empty());

        let nan = tracker
            .on_render_tick(f64::NAN, &flood, shelters.as_slice(), &mut sink)
            .unwrap();
        assert!(nan.is_empty());
    }

    #[test]
    fn test_unknown_position_publishes_empty() {
        let shelters = flood_shelters();
        let mut tracker = NearestFacilityTracker::default();
        let mut sink = RecordingSink::default();
        let flood = HazardFilter::only(HazardCategory::Flood);

        let route = tracker
            .on_render_tick(12.0, &flood, shelters.as_slice(), &mut sink)
            .unwrap();
        assert!(route.is_empty());
        assert_eq!(sink.published.len(), 1);
    }

    #[test]
    fn test_clearing_position_removes_route() {
        let shelters = flood_shelters();
        let mut tracker = tracker_at(139.0, 35.0);
        let mut sink = RecordingSink::default();
        let flood = HazardFilter::only(HazardCategory::Flood);

        tracker
            .on_render_tick(12.0, &flood, shelters.as_slice(), &mut sink)
            .unwrap();
        assert!(!tracker.route().is_empty());

        tracker.on_position_update(None);
        // Updating the position alone does not republish
        assert_eq!(sink.published.len(), 1);

        tracker
            .on_render_tick(12.0, &flood, shelters.as_slice(), &mut sink)
            .unwrap();
        assert_eq!(sink.published.last(), Some(&RouteOverlay::Empty));
        assert!(tracker.route().is_empty());
    }

    #[test]
    fn test_repeated_ticks_are_idempotent() {
        let shelters = flood_shelters();
        let mut tracker = tracker_at(139.0, 35.0);
        let mut sink = RecordingSink::default();
        let flood = HazardFilter::only(HazardCategory::Flood);

        for _ in 0..2 {
            tracker
                .on_render_tick(9.0, &flood, shelters.as_slice(), &mut sink)
                .unwrap();
        }
        assert_eq!(sink.published.len(), 2);
        assert_eq!(sink.published[0], sink.published[1]);

        let (a, b) = (
            sink.published[0].line().unwrap(),
            sink.published[1].line().unwrap(),
        );
        assert_eq!(a.to.x.to_bits(), b.to.x.to_bits());
        assert_eq!(a.to.y.to_bits(), b.to.y.to_bits());
        assert_eq!(a.distance_m.to_bits(), b.distance_m.to_bits());
    }

    #[test]
    fn test_route_follows_position_and_filter() {
        let shelters = vec![
            Shelter::new("flood-west", 138.0, 35.0).with_hazard(HazardCategory::Flood),
            Shelter::new("flood-east", 140.0, 35.0).with_hazard(HazardCategory::Flood),
            Shelter::new("quake", 139.0, 35.0).with_hazard(HazardCategory::Earthquake),
        ];
        let mut tracker = tracker_at(138.1, 35.0);
        let mut sink = RecordingSink::default();
        let flood = HazardFilter::only(HazardCategory::Flood);
        let quake = HazardFilter::only(HazardCategory::Earthquake);

        let id = |route: &RouteOverlay| route.line().map(|l| l.shelter_id.0.clone());

        let route = tracker.on_render_tick(8.0, &flood, shelters.as_slice(), &mut sink).unwrap();
        assert_eq!(id(route).as_deref(), Some("flood-west"));

        tracker.on_position_update(Some(Point::new(139.9, 35.0)));
        let route = tracker.on_render_tick(8.0, &flood, shelters.as_slice(), &mut sink).unwrap();
        assert_eq!(id(route).as_deref(), Some("flood-east"));

        let route = tracker.on_render_tick(8.0, &quake, shelters.as_slice(), &mut sink).unwrap();
        assert_eq!(id(route).as_deref(), Some("quake"));

        // Both categories active: nearest over the union
        let both: HazardFilter = [HazardCategory::Flood, HazardCategory::Earthquake]
            .into_iter()
            .collect();
        let route = tracker.on_render_tick(8.0, &both, shelters.as_slice(), &mut sink).unwrap();
        assert_eq!(id(route).as_deref(), Some("flood-east"));
    }

    #[test]
    fn test_host_failures_propagate() {
        let shelters = flood_shelters();
        let mut tracker = tracker_at(139.0, 35.0);
        let flood = HazardFilter::only(HazardCategory::Flood);

        let mut sink = RecordingSink::default();
        tracker
            .on_render_tick(10.0, &flood, shelters.as_slice(), &mut sink)
            .unwrap();

        let err = tracker
            .on_render_tick(10.0, &flood, &FailingSource, &mut sink)
            .unwrap_err();
        assert!(matches!(err, TrackerError::Query(_)));
        // Nothing was published and the previous route is kept
        assert_eq!(sink.published.len(), 1);
        assert!(!tracker.route().is_empty());

        let err = tracker
            .on_render_tick(10.0, &flood, shelters.as_slice(), &mut FailingSink)
            .unwrap_err();
        assert!(matches!(err, TrackerError::Publish(_)));
    }

    #[test]
    fn test_shelter_set_is_a_candidate_source() {
        let set = ShelterSet::new(flood_shelters());
        let mut tracker = tracker_at(139.49, 35.49);
        let mut sink = RecordingSink::default();
        let flood = HazardFilter::only(HazardCategory::Flood);

        let route = tracker.on_render_tick(7.5, &flood, &set, &mut sink).unwrap();
        assert_eq!(route.line().map(|l| l.shelter_id.0.as_str()), Some("B"));
    }
}
