use serde::Serialize;

use super::visual_region::RegionType;

/// Counts of classified regions per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ContentBreakdown {
    pub tables: usize,
    pub formulas: usize,
    pub diagrams: usize,
    pub general_images: usize,
}

impl ContentBreakdown {
    pub fn record(&mut self, region_type: RegionType) {
        match region_type {
            RegionType::Table => self.tables += 1,
            RegionType::Formula => self.formulas += 1,
            RegionType::Diagram => self.diagrams += 1,
            RegionType::GeneralImage => self.general_images += 1,
        }
    }

    pub fn count(&self, region_type: RegionType) -> usize {
        match region_type {
            RegionType::Table => self.tables,
            RegionType::Formula => self.formulas,
            RegionType::Diagram => self.diagrams,
            RegionType::GeneralImage => self.general_images,
        }
    }

    pub fn total(&self) -> usize {
        self.tables + self.formulas + self.diagrams + self.general_images
    }
}

impl FromIterator<RegionType> for ContentBreakdown {
    fn from_iter<I: IntoIterator<Item = RegionType>>(iter: I) -> Self {
        let mut breakdown = Self::default();
        for region_type in iter {
            breakdown.record(region_type);
        }
        breakdown
    }
}
