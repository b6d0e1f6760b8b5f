//! Map layer rendering.
//!
//! Paints raster tile layers, shelter markers, the route line and the user
//! marker onto the egui canvas.

use super::{MapProjection, TileId, TileSource};
use crate::shelter::Shelter;
use crate::tracker::RouteOverlay;
use eframe::egui::{self, Color32, Painter, Pos2, Rect, Stroke};
use geo_types::{coord, Point};

pub const SHELTER_COLOR: Color32 = Color32::from_rgb(0x66, 0x66, 0xcc);
pub const ROUTE_COLOR: Color32 = Color32::from_rgb(0x33, 0xaa, 0xff);
pub const ROUTE_WIDTH: f32 = 4.0;
const USER_COLOR: Color32 = Color32::from_rgb(0x1e, 0x78, 0xff);

/// Screen rectangle covered by a tile.
pub fn tile_screen_rect(tile: TileId, projection: &MapProjection) -> Rect {
    let bounds = tile.bounds();
    let (min, max) = (bounds.min(), bounds.max());
    Rect::from_min_max(
        projection.geo_to_screen(coord! { x: min.x, y: max.y }),
        projection.geo_to_screen(coord! { x: max.x, y: min.y }),
    )
}

/// Paints every tile of `source` covering the view.
///
/// Tiles are fetched and cached by the egui image loaders; a tile that is
/// still loading simply leaves its area blank for this frame.
pub fn render_tile_layer(
    ui: &egui::Ui,
    source: &TileSource,
    projection: &MapProjection,
    opacity: f32,
) {
    if opacity <= 0.0 {
        return;
    }
    let tint = Color32::from_white_alpha((opacity.clamp(0.0, 1.0) * 255.0) as u8);

    for tile in source.tiles_for_view(&projection.visible_bounds(), projection.zoom) {
        let rect = tile_screen_rect(tile, projection);
        if !rect.intersects(projection.screen_rect) {
            continue;
        }
        egui::Image::new(source.tile_url(tile))
            .tint(tint)
            .paint_at(ui, rect);
    }
}

/// Marker radius in pixels: 2 px at zoom 5 growing to 6 px at zoom 14.
pub fn shelter_marker_radius(zoom: f64) -> f32 {
    let t = ((zoom - 5.0) / 9.0).clamp(0.0, 1.0);
    (2.0 + 4.0 * t) as f32
}

/// Paints shelter markers as filled circles with a white outline.
pub fn render_shelters<'a>(
    painter: &Painter,
    shelters: impl IntoIterator<Item = &'a Shelter>,
    projection: &MapProjection,
) {
    let radius = shelter_marker_radius(projection.zoom);
    let stroke = Stroke::new(1.0, Color32::WHITE);

    for shelter in shelters {
        let coord = shelter.location.0;
        if !projection.is_visible(coord, radius) {
            continue;
        }
        let pos = projection.geo_to_screen(coord);
        painter.circle(pos, radius, SHELTER_COLOR, stroke);
    }
}

/// Paints the route line, if any.
pub fn render_route(painter: &Painter, route: &RouteOverlay, projection: &MapProjection) {
    let Some(line) = route.line() else {
        return;
    };
    let from = projection.geo_to_screen(line.from);
    let to = projection.geo_to_screen(line.to);
    painter.line_segment([from, to], Stroke::new(ROUTE_WIDTH, ROUTE_COLOR));
}

/// Paints the user's position with an accuracy halo.
pub fn render_user_marker(
    painter: &Painter,
    position: Point<f64>,
    accuracy_m: Option<f64>,
    projection: &MapProjection,
) {
    let pos: Pos2 = projection.geo_to_screen(position.0);

    if let Some(accuracy) = accuracy_m {
        let radius = (accuracy / projection.metres_per_pixel(position.y())) as f32;
        if radius > 8.0 {
            painter.circle(
                pos,
                radius,
                USER_COLOR.gamma_multiply(0.15),
                Stroke::new(1.0, USER_COLOR.gamma_multiply(0.5)),
            );
        }
    }

    painter.circle(pos, 7.0, USER_COLOR, Stroke::new(2.0, Color32::WHITE));
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::Vec2;

    #[test]
    fn test_shelter_marker_radius() {
        assert_eq!(shelter_marker_radius(5.0), 2.0);
        assert_eq!(shelter_marker_radius(14.0), 6.0);
        assert_eq!(shelter_marker_radius(3.0), 2.0);
        assert_eq!(shelter_marker_radius(18.0), 6.0);
        assert!((shelter_marker_radius(9.5) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_tile_screen_rect_is_tile_sized() {
        let mut projection = MapProjection::new(coord! { x: 139.7, y: 35.7 }, 10.0);
        projection.set_screen_rect(Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)));

        let tile = TileId::containing(projection.center, 10);
        let rect = tile_screen_rect(tile, &projection);
        assert!((rect.width() - 256.0).abs() < 0.5);
        assert!((rect.height() - 256.0).abs() < 0.5);
        assert!(rect.contains(projection.screen_rect.center()));
    }
}
