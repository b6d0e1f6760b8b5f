//! Map projection and coordinate transformation.
//!
//! Handles converting between geographic coordinates (lon/lat) and screen
//! coordinates using Web Mercator with web-map zoom levels, so zoom values
//! here mean the same thing as the zoom levels of the tile servers.

use eframe::egui::{Pos2, Rect, Vec2};
use geo_types::{coord, Coord, Rect as GeoRect};
use std::f64::consts::PI;

/// Size in pixels of one map tile.
pub const TILE_SIZE: f64 = 256.0;

/// Equatorial circumference of the WGS84 ellipsoid.
const EARTH_CIRCUMFERENCE_M: f64 = 40_075_016.686;

/// Latitude limit of the Web Mercator square.
const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Projects lon/lat to normalized Web Mercator coordinates in `[0, 1]`,
/// with the origin at the north-west corner.
pub fn lonlat_to_unit(coord: Coord<f64>) -> Coord<f64> {
    let lat = coord.y.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    coord! {
        x: (coord.x + 180.0) / 360.0,
        y: (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0,
    }
}

/// Inverse of [`lonlat_to_unit`].
pub fn unit_to_lonlat(unit: Coord<f64>) -> Coord<f64> {
    let lat = (PI * (1.0 - 2.0 * unit.y)).sinh().atan().to_degrees();
    coord! { x: unit.x * 360.0 - 180.0, y: lat }
}

/// Map projection for converting geographic to screen coordinates.
#[derive(Debug, Clone)]
pub struct MapProjection {
    /// Geographic center of the view
    pub center: Coord<f64>,
    /// Current zoom level (fractional, web-map convention)
    pub zoom: f64,
    /// Minimum allowed zoom
    pub min_zoom: f64,
    /// Maximum allowed zoom
    pub max_zoom: f64,
    /// The view center is kept inside these bounds
    pub max_bounds: GeoRect<f64>,
    /// Screen rectangle for the canvas
    pub screen_rect: Rect,
}

impl Default for MapProjection {
    fn default() -> Self {
        Self {
            // Center of Japan
            center: coord! { x: 138.0, y: 37.0 },
            zoom: 5.0,
            min_zoom: 5.0,
            max_zoom: 18.0,
            max_bounds: GeoRect::new(coord! { x: 122.0, y: 20.0 }, coord! { x: 154.0, y: 50.0 }),
            screen_rect: Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)),
        }
    }
}

impl MapProjection {
    /// Creates a projection centered on the given coordinate.
    pub fn new(center: Coord<f64>, zoom: f64) -> Self {
        let mut projection = Self {
            center,
            zoom,
            ..Default::default()
        };
        projection.constrain();
        projection
    }

    /// Updates the canvas rectangle for this frame.
    pub fn set_screen_rect(&mut self, screen_rect: Rect) {
        self.screen_rect = screen_rect;
    }

    /// Width of the whole world in pixels at the current zoom.
    pub fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom)
    }

    /// Ground distance covered by one screen pixel at `latitude`.
    pub fn metres_per_pixel(&self, latitude: f64) -> f64 {
        EARTH_CIRCUMFERENCE_M * latitude.to_radians().cos() / self.world_size()
    }

    /// Converts geographic coordinates (lon, lat) to screen position.
    pub fn geo_to_screen(&self, coord: Coord<f64>) -> Pos2 {
        let world = self.world_size();
        let point = lonlat_to_unit(coord);
        let center = lonlat_to_unit(self.center);
        let screen_center = self.screen_rect.center();

        Pos2::new(
            screen_center.x + ((point.x - center.x) * world) as f32,
            screen_center.y + ((point.y - center.y) * world) as f32,
        )
    }

    /// Converts screen position to geographic coordinates (lon, lat).
    pub fn screen_to_geo(&self, pos: Pos2) -> Coord<f64> {
        let world = self.world_size();
        let center = lonlat_to_unit(self.center);
        let offset = pos - self.screen_rect.center();

        unit_to_lonlat(coord! {
            x: center.x + offset.x as f64 / world,
            y: center.y + offset.y as f64 / world,
        })
    }

    /// Returns the visible geographic bounds.
    pub fn visible_bounds(&self) -> GeoRect<f64> {
        let top_left = self.screen_to_geo(self.screen_rect.left_top());
        let bottom_right = self.screen_to_geo(self.screen_rect.right_bottom());
        GeoRect::new(top_left, bottom_right)
    }

    /// Checks if a coordinate is within the visible bounds, with a margin in pixels.
    pub fn is_visible(&self, coord: Coord<f64>, margin_px: f32) -> bool {
        self.screen_rect
            .expand(margin_px)
            .contains(self.geo_to_screen(coord))
    }

    /// Moves the view by a screen-space drag delta.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.center = self.screen_to_geo(self.screen_rect.center() - delta);
        self.constrain();
    }

    /// Changes zoom while keeping the geographic point under `anchor` fixed.
    pub fn zoom_about(&mut self, zoom: f64, anchor: Pos2) {
        let anchor_geo = self.screen_to_geo(anchor);
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);

        let world = self.world_size();
        let offset = anchor - self.screen_rect.center();
        let anchor_unit = lonlat_to_unit(anchor_geo);
        self.center = unit_to_lonlat(coord! {
            x: anchor_unit.x - offset.x as f64 / world,
            y: anchor_unit.y - offset.y as f64 / world,
        });
        self.constrain();
    }

    /// Jumps to a new center and zoom.
    pub fn fly_to(&mut self, center: Coord<f64>, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
        self.constrain();
    }

    fn constrain(&mut self) {
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
        let (min, max) = (self.max_bounds.min(), self.max_bounds.max());
        self.center.x = self.center.x.clamp(min.x, max.x);
        self.center.y = self.center.y.clamp(min.y, max.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_unit_projection_round_trip() {
        let tokyo = coord! { x: 139.767, y: 35.681 };
        let back = unit_to_lonlat(lonlat_to_unit(tokyo));
        assert!(approx_eq(back.x, tokyo.x));
        assert!(approx_eq(back.y, tokyo.y));

        let origin = lonlat_to_unit(coord! { x: 0.0, y: 0.0 });
        assert!(approx_eq(origin.x, 0.5));
        assert!(approx_eq(origin.y, 0.5));
    }

    #[test]
    fn test_metres_per_pixel() {
        let projection = MapProjection::new(coord! { x: 139.0, y: 35.0 }, 5.0);
        let at_equator = projection.metres_per_pixel(0.0);
        assert!((at_equator - 4891.97).abs() < 0.1);
        assert!(projection.metres_per_pixel(60.0) < at_equator / 1.99);
    }

    #[test]
    fn test_center_maps_to_screen_center() {
        let mut projection = MapProjection::new(coord! { x: 139.0, y: 35.0 }, 10.0);
        projection.set_screen_rect(Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 300.0)));

        let pos = projection.geo_to_screen(coord! { x: 139.0, y: 35.0 });
        assert!((pos.x - 200.0).abs() < 0.01);
        assert!((pos.y - 150.0).abs() < 0.01);

        let geo = projection.screen_to_geo(Pos2::new(310.0, 40.0));
        let screen = projection.geo_to_screen(geo);
        assert!((screen.x - 310.0).abs() < 0.01);
        assert!((screen.y - 40.0).abs() < 0.01);
    }

    #[test]
    fn test_zoom_about_keeps_anchor_fixed() {
        let mut projection = MapProjection::new(coord! { x: 139.0, y: 35.0 }, 8.0);
        let anchor = Pos2::new(600.0, 200.0);
        let before = projection.screen_to_geo(anchor);

        projection.zoom_about(9.5, anchor);

        assert!(approx_eq(projection.zoom, 9.5));
        let after = projection.screen_to_geo(anchor);
        assert!((before.x - after.x).abs() < 1e-5);
        assert!((before.y - after.y).abs() < 1e-5);
    }

    #[test]
    fn test_view_is_constrained() {
        let mut projection = MapProjection::new(coord! { x: 0.0, y: 0.0 }, 30.0);
        assert!(approx_eq(projection.zoom, 18.0));
        assert!(approx_eq(projection.center.x, 122.0));
        assert!(approx_eq(projection.center.y, 20.0));

        projection.fly_to(coord! { x: 140.0, y: 36.0 }, 1.0);
        assert!(approx_eq(projection.zoom, 5.0));
    }

    #[test]
    fn test_visible_bounds_contain_center() {
        let projection = MapProjection::new(coord! { x: 139.0, y: 35.0 }, 7.0);
        let bounds = projection.visible_bounds();
        assert!(bounds.min().x < 139.0 && bounds.max().x > 139.0);
        assert!(bounds.min().y < 35.0 && bounds.max().y > 35.0);
        assert!(projection.is_visible(coord! { x: 139.0, y: 35.0 }, 0.0));
        assert!(!projection.is_visible(coord! { x: 100.0, y: 35.0 }, 0.0));
    }
}
