//! Hazard raster layers published by the GSI hazard map portal.

use crate::geo::TileSource;
use eframe::egui::Color32;

const PORTAL_BASE: &str = "https://disaportaldata.gsi.go.jp/raster";

/// Attribution shown for all hazard rasters.
pub const HAZARD_ATTRIBUTION: &str = "Hazard Map Portal Site (GSI)";

/// A raster overlay showing the extent of one kind of hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HazardRasterLayer {
    Flood,
    HighTide,
    Tsunami,
    DebrisFlow,
    SteepSlope,
    Landslide,
}

impl HazardRasterLayer {
    pub const ALL: [HazardRasterLayer; 6] = [
        HazardRasterLayer::Flood,
        HazardRasterLayer::HighTide,
        HazardRasterLayer::Tsunami,
        HazardRasterLayer::DebrisFlow,
        HazardRasterLayer::SteepSlope,
        HazardRasterLayer::Landslide,
    ];

    /// Opacity a layer starts with when first shown.
    pub const DEFAULT_OPACITY: f32 = 0.7;

    pub fn key(&self) -> &'static str {
        match self {
            Self::Flood => "flood",
            Self::HighTide => "hightide",
            Self::Tsunami => "tsunami",
            Self::DebrisFlow => "doseki",
            Self::SteepSlope => "kyukeisha",
            Self::Landslide => "jisuberi",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Flood => "Flood Inundation Area",
            Self::HighTide => "Storm Surge Inundation Area",
            Self::Tsunami => "Tsunami Inundation Area",
            Self::DebrisFlow => "Debris Flow Warning Area",
            Self::SteepSlope => "Steep Slope Warning Area",
            Self::Landslide => "Landslide Warning Area",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|l| l.key() == key)
    }

    /// Zero-based position in [`HazardRasterLayer::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Dataset path segment on the hazard portal.
    fn dataset(&self) -> &'static str {
        match self {
            Self::Flood => "01_flood_L2_shinsuishin_data",
            Self::HighTide => "03_hightide_L2_shinsuishin_data",
            Self::Tsunami => "04_tsunami_newlegend_data",
            Self::DebrisFlow => "05_dosekiryukeikaikuiki",
            Self::SteepSlope => "05_kyukeishakeikaikuiki",
            Self::Landslide => "05_jisuberikeikaikuiki",
        }
    }

    /// Swatch color for the layer list.
    pub fn legend_color(&self) -> Color32 {
        match self {
            Self::Flood => Color32::from_rgb(90, 140, 230),
            Self::HighTide => Color32::from_rgb(60, 180, 200),
            Self::Tsunami => Color32::from_rgb(230, 120, 60),
            Self::DebrisFlow => Color32::from_rgb(200, 170, 60),
            Self::SteepSlope => Color32::from_rgb(220, 90, 90),
            Self::Landslide => Color32::from_rgb(170, 110, 200),
        }
    }

    /// Tile source serving this layer.
    pub fn tile_source(&self) -> TileSource {
        TileSource::new(format!("{}/{}/{{z}}/{{x}}/{{y}}.png", PORTAL_BASE, self.dataset()))
            .with_zoom_range(2, 17)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::TileId;

    #[test]
    fn test_keys_round_trip() {
        for layer in HazardRasterLayer::ALL {
            assert_eq!(HazardRasterLayer::from_key(layer.key()), Some(layer));
        }
        assert_eq!(HazardRasterLayer::from_key("flood"), Some(HazardRasterLayer::Flood));
        assert_eq!(HazardRasterLayer::from_key("unknown"), None);
    }

    #[test]
    fn test_tile_url() {
        let source = HazardRasterLayer::Tsunami.tile_source();
        assert_eq!(
            source.tile_url(TileId::new(10, 908, 403)),
            "https://disaportaldata.gsi.go.jp/raster/04_tsunami_newlegend_data/10/908/403.png"
        );
        assert_eq!(source.min_zoom, 2);
        assert_eq!(source.max_zoom, 17);
    }
}
