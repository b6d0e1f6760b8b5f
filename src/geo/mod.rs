//! Map geometry and rendering.
//!
//! Web Mercator projection, XYZ tile arithmetic, and painting of the map
//! layers onto the egui canvas.

mod projection;
mod renderer;
mod tiles;

pub use projection::{lonlat_to_unit, unit_to_lonlat, MapProjection, TILE_SIZE};
pub use renderer::{
    render_route, render_shelters, render_tile_layer, render_user_marker, shelter_marker_radius,
    tile_screen_rect, ROUTE_COLOR, SHELTER_COLOR,
};
pub use tiles::{covering_extent, tiles_covering, TileId, TileSource};
