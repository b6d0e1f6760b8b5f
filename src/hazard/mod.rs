//! Hazard categories and the hazard raster layers drawn over the base map.
//!
//! Every shelter is designated safe for a fixed set of eight hazard
//! categories. The category set doubles as the filter that decides which
//! shelters are currently visible on the map.

mod raster;

pub use raster::{HazardRasterLayer, HAZARD_ATTRIBUTION};

/// One of the eight disaster types a shelter can be designated for.
///
/// The declaration order is fixed and matches the `disaster1`..`disaster8`
/// attributes of the shelter source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HazardCategory {
    Flood,
    Landslide,
    HighTide,
    Earthquake,
    Tsunami,
    Fire,
    InlandFlood,
    Volcanic,
}

impl HazardCategory {
    /// All categories in their fixed order.
    pub const ALL: [HazardCategory; 8] = [
        HazardCategory::Flood,
        HazardCategory::Landslide,
        HazardCategory::HighTide,
        HazardCategory::Earthquake,
        HazardCategory::Tsunami,
        HazardCategory::Fire,
        HazardCategory::InlandFlood,
        HazardCategory::Volcanic,
    ];

    /// Stable identifier used in settings and URLs.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Flood => "flood",
            Self::Landslide => "landslide",
            Self::HighTide => "hightide",
            Self::Earthquake => "earthquake",
            Self::Tsunami => "tsunami",
            Self::Fire => "fire",
            Self::InlandFlood => "inlandflood",
            Self::Volcanic => "volcanic",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Flood => "Flood",
            Self::Landslide => "Landslide / Debris Flow / Slope Failure",
            Self::HighTide => "High Tide",
            Self::Earthquake => "Earthquake",
            Self::Tsunami => "Tsunami",
            Self::Fire => "Large-scale Fire",
            Self::InlandFlood => "Inland Flooding",
            Self::Volcanic => "Volcanic Phenomenon",
        }
    }

    /// Zero-based position in [`HazardCategory::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Attribute name carrying this category's flag in the source data.
    pub fn property_key(&self) -> String {
        format!("disaster{}", self.index() + 1)
    }

    /// Parses a stable key back into a category.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.key() == key)
    }
}

/// A set of hazard categories.
///
/// Used both as the per-shelter designation flags and as the active map
/// filter. A shelter matches a filter when the two sets intersect, so the
/// empty filter matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HazardFilter {
    bits: u8,
}

impl HazardFilter {
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    pub fn only(category: HazardCategory) -> Self {
        let mut filter = Self::empty();
        filter.insert(category);
        filter
    }

    fn mask(category: HazardCategory) -> u8 {
        1 << category.index()
    }

    pub fn insert(&mut self, category: HazardCategory) {
        self.bits |= Self::mask(category);
    }

    pub fn remove(&mut self, category: HazardCategory) {
        self.bits &= !Self::mask(category);
    }

    pub fn set(&mut self, category: HazardCategory, enabled: bool) {
        if enabled {
            self.insert(category);
        } else {
            self.remove(category);
        }
    }

    pub fn contains(&self, category: HazardCategory) -> bool {
        self.bits & Self::mask(category) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// True if the two sets share at least one category.
    pub fn intersects(&self, other: &HazardFilter) -> bool {
        self.bits & other.bits != 0
    }

    /// Iterates the contained categories in fixed order.
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = HazardCategory> + '_ {
        HazardCategory::ALL
            .into_iter()
            .filter(move |c| self.contains(*c))
    }
}

impl FromIterator<HazardCategory> for HazardFilter {
    fn from_iter<I: IntoIterator<Item = HazardCategory>>(iter: I) -> Self {
        let mut filter = Self::empty();
        for category in iter {
            filter.insert(category);
        }
        filter
    }
}
