//! Layer visibility and opacity state.

use crate::hazard::{HazardCategory, HazardFilter, HazardRasterLayer};

/// State for the hazard raster overlays and the shelter category layers.
///
/// Both groups behave like radio buttons: at most one hazard raster and at
/// most one shelter category are shown at a time.
#[derive(Debug, Clone)]
pub struct LayerState {
    /// Hazard raster currently drawn over the base map
    pub hazard_raster: Option<HazardRasterLayer>,

    /// Opacity per hazard raster, indexed by [`HazardRasterLayer::index`]
    raster_opacity: [f32; HazardRasterLayer::ALL.len()],

    /// Shelter category currently shown
    pub shelter_category: Option<HazardCategory>,
}

impl Default for LayerState {
    fn default() -> Self {
        Self {
            hazard_raster: None,
            raster_opacity: [HazardRasterLayer::DEFAULT_OPACITY; HazardRasterLayer::ALL.len()],
            shelter_category: None,
        }
    }
}

impl LayerState {
    pub fn opacity(&self, layer: HazardRasterLayer) -> f32 {
        self.raster_opacity[layer.index()]
    }

    pub fn set_opacity(&mut self, layer: HazardRasterLayer, opacity: f32) {
        self.raster_opacity[layer.index()] = opacity.clamp(0.0, 1.0);
    }

    /// Shows `layer` (hiding any other), or hides all with `None`.
    pub fn show_hazard_raster(&mut self, layer: Option<HazardRasterLayer>) {
        if self.hazard_raster != layer {
            log::debug!(
                "Hazard raster: {}",
                layer.map(|l| l.key()).unwrap_or("none")
            );
        }
        self.hazard_raster = layer;
    }

    /// Shows shelters for `category` (hiding any other), or none with `None`.
    pub fn show_shelter_category(&mut self, category: Option<HazardCategory>) {
        if self.shelter_category != category {
            log::debug!(
                "Shelter category: {}",
                category.map(|c| c.key()).unwrap_or("none")
            );
        }
        self.shelter_category = category;
    }

    /// The active shelter filter derived from the selected category.
    pub fn shelter_filter(&self) -> HazardFilter {
        self.shelter_category
            .map(HazardFilter::only)
            .unwrap_or_default()
    }
}
