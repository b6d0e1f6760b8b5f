//! XYZ tile addressing for the raster and shelter tile sources.

use super::projection::{lonlat_to_unit, unit_to_lonlat};
use geo_types::{coord, Coord, Rect as GeoRect};

/// Address of a single tile in the XYZ scheme (y grows southwards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileId {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Number of tiles along one axis at zoom `z`.
    pub fn tiles_per_axis(z: u8) -> u32 {
        1u32 << z
    }

    /// The tile containing `coord` at zoom `z`.
    pub fn containing(coord: Coord<f64>, z: u8) -> Self {
        let n = Self::tiles_per_axis(z);
        let unit = lonlat_to_unit(coord);
        let index = |v: f64| ((v * n as f64).floor().max(0.0) as u32).min(n - 1);
        Self::new(z, index(unit.x), index(unit.y))
    }

    /// Geographic extent of this tile.
    pub fn bounds(&self) -> GeoRect<f64> {
        let n = Self::tiles_per_axis(self.z) as f64;
        let north_west = unit_to_lonlat(coord! { x: self.x as f64 / n, y: self.y as f64 / n });
        let south_east = unit_to_lonlat(coord! {
            x: (self.x + 1) as f64 / n,
            y: (self.y + 1) as f64 / n,
        });
        GeoRect::new(north_west, south_east)
    }
}

/// All tiles at zoom `z` intersecting `bounds`, row by row from the north-west.
pub fn tiles_covering(bounds: &GeoRect<f64>, z: u8) -> Vec<TileId> {
    let north_west = TileId::containing(coord! { x: bounds.min().x, y: bounds.max().y }, z);
    let south_east = TileId::containing(coord! { x: bounds.max().x, y: bounds.min().y }, z);

    (north_west.y..=south_east.y)
        .flat_map(|y| (north_west.x..=south_east.x).map(move |x| TileId::new(z, x, y)))
        .collect()
}

/// Union of the extents of the tiles at zoom `z` covering `bounds`.
pub fn covering_extent(bounds: &GeoRect<f64>, z: u8) -> GeoRect<f64> {
    let north_west = TileId::containing(coord! { x: bounds.min().x, y: bounds.max().y }, z);
    let south_east = TileId::containing(coord! { x: bounds.max().x, y: bounds.min().y }, z);

    let nw = north_west.bounds();
    let se = south_east.bounds();
    GeoRect::new(
        coord! { x: nw.min().x, y: nw.max().y },
        coord! { x: se.max().x, y: se.min().y },
    )
}

/// A tile server endpoint with the zoom range it serves.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSource {
    /// URL with `{z}`, `{x}` and `{y}` placeholders
    pub url_template: String,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

impl TileSource {
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            min_zoom: 0,
            max_zoom: 19,
        }
    }

    pub fn with_zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    pub fn tile_url(&self, tile: TileId) -> String {
        self.url_template
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }

    /// Tile zoom to request for a view zoom.
    ///
    /// Returns `None` below the source's minimum zoom. Above the maximum the
    /// deepest level is returned and its tiles are stretched (overzoom).
    pub fn tile_zoom(&self, view_zoom: f64) -> Option<u8> {
        let z = view_zoom.floor().max(0.0) as u8;
        if z < self.min_zoom {
            None
        } else {
            Some(z.min(self.max_zoom))
        }
    }

    /// Tiles to draw for `bounds` at `view_zoom`.
    pub fn tiles_for_view(&self, bounds: &GeoRect<f64>, view_zoom: f64) -> Vec<TileId> {
        self.tile_zoom(view_zoom)
            .map(|z| tiles_covering(bounds, z))
            .unwrap_or_default()
    }

    /// Extent of the tiles this source would have loaded for `bounds`.
    ///
    /// Below the minimum zoom the minimum-zoom tiles are used.
    pub fn loaded_extent(&self, bounds: &GeoRect<f64>, view_zoom: f64) -> GeoRect<f64> {
        let z = self.tile_zoom(view_zoom).unwrap_or(self.min_zoom);
        covering_extent(bounds, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_containing_known_location() {
        // Tokyo Station at z10 is tile 909/403
        let tile = TileId::containing(coord! { x: 139.767, y: 35.681 }, 10);
        assert_eq!(tile, TileId::new(10, 909, 403));

        let world = TileId::containing(coord! { x: 0.0, y: 0.0 }, 0);
        assert_eq!(world, TileId::new(0, 0, 0));
    }

    #[test]
    fn test_tile_bounds_contain_source_point() {
        let point = coord! { x: 139.767, y: 35.681 };
        let bounds = TileId::containing(point, 12).bounds();
        assert!(bounds.min().x <= point.x && point.x <= bounds.max().x);
        assert!(bounds.min().y <= point.y && point.y <= bounds.max().y);
    }

    #[test]
    fn test_tiles_covering_is_row_major() {
        let tile = TileId::new(8, 227, 100);
        let b = tile.bounds();
        // Slightly wider than one tile: spans the right neighbour too
        let bounds = GeoRect::new(
            coord! { x: b.min().x + 0.01, y: b.min().y + 0.01 },
            coord! { x: b.max().x + 0.5, y: b.max().y - 0.01 },
        );
        let tiles = tiles_covering(&bounds, 8);
        assert_eq!(tiles, vec![TileId::new(8, 227, 100), TileId::new(8, 228, 100)]);

        let extent = covering_extent(&bounds, 8);
        assert!((extent.min().x - b.min().x).abs() < 1e-9);
        assert!(extent.max().x > b.max().x);
    }

    #[test]
    fn test_tile_zoom_range() {
        let source = TileSource::new("https://example.com/{z}/{x}/{y}.png").with_zoom_range(5, 8);
        assert_eq!(source.tile_zoom(4.9), None);
        assert_eq!(source.tile_zoom(5.0), Some(5));
        assert_eq!(source.tile_zoom(7.6), Some(7));
        assert_eq!(source.tile_zoom(15.0), Some(8));
        assert_eq!(
            source.tile_url(TileId::new(6, 56, 25)),
            "https://example.com/6/56/25.png"
        );
    }
}
