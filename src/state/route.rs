//! The route layer: the map's binding for the published route geometry.

use crate::tracker::{RouteOverlay, RouteSink, TrackerError};

/// Holds whatever route the tracker last published for the canvas to draw.
#[derive(Debug, Clone, Default)]
pub struct RouteLayer {
    overlay: RouteOverlay,
}

impl RouteLayer {
    pub fn overlay(&self) -> &RouteOverlay {
        &self.overlay
    }
}

impl RouteSink for RouteLayer {
    fn publish_route(&mut self, route: &RouteOverlay) -> Result<(), TrackerError> {
        let target = |r: &RouteOverlay| r.line().map(|l| l.shelter_id.clone());
        if target(&self.overlay) != target(route) {
            match route.line() {
                Some(line) => log::debug!("Route now targets shelter {}", line.shelter_id),
                None => log::debug!("Route cleared"),
            }
            log::trace!(
                "Route geometry: {}",
                serde_json::to_string(&route.to_feature_collection()).unwrap_or_default()
            );
        }
        if &self.overlay != route {
            self.overlay = route.clone();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shelter::ShelterId;
    use crate::tracker::RouteLine;
    use geo_types::coord;

    #[test]
    fn test_republishing_same_route_is_harmless() {
        let mut layer = RouteLayer::default();
        let route = RouteOverlay::Line(RouteLine {
            from: coord! { x: 139.0, y: 35.0 },
            to: coord! { x: 139.01, y: 35.01 },
            shelter_id: ShelterId::from("A"),
            distance_m: 1430.0,
        });

        layer.publish_route(&route).unwrap();
        layer.publish_route(&route).unwrap();
        assert_eq!(layer.overlay(), &route);

        layer.publish_route(&RouteOverlay::Empty).unwrap();
        layer.publish_route(&RouteOverlay::Empty).unwrap();
        assert!(layer.overlay().is_empty());
    }
}
