use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionType {
    Table,
    Formula,
    Diagram,
    GeneralImage,
}

impl RegionType {
    pub const ALL: [RegionType; 4] = [
        RegionType::Table,
        RegionType::Formula,
        RegionType::Diagram,
        RegionType::GeneralImage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegionType::Table => "table",
            RegionType::Formula => "formula",
            RegionType::Diagram => "diagram",
            RegionType::GeneralImage => "general_image",
        }
    }
}

impl fmt::Display for RegionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the extractor found the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionOrigin {
    EmbeddedImage,
    VectorDrawing,
    FullImage,
}

/// Measurements the classifier decides on. Densities are fractions in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RegionSignals {
    pub width: u32,
    pub height: u32,
    /// Text found inside or recognised from the region.
    pub text: String,
    pub ink_density: f32,
    pub edge_density: f32,
    pub horizontal_rules: u32,
    pub vertical_rules: u32,
}

impl RegionSignals {
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualRegion {
    pub page: u32,
    pub index: usize,
    pub origin: RegionOrigin,
    pub guess: RegionType,
    pub confidence: f32,
    pub signals: RegionSignals,
    classified: Option<RegionType>,
}

impl VisualRegion {
    pub fn new(page: u32, index: usize, origin: RegionOrigin, signals: RegionSignals) -> Self {
        let guess = match origin {
            RegionOrigin::VectorDrawing => RegionType::Diagram,
            RegionOrigin::EmbeddedImage | RegionOrigin::FullImage => RegionType::GeneralImage,
        };
        Self {
            page,
            index,
            origin,
            guess,
            confidence: 0.5,
            signals,
            classified: None,
        }
    }

    /// Returns a copy carrying the final type and confidence.
    pub fn finalized(&self, region_type: RegionType, confidence: f32) -> Self {
        Self {
            classified: Some(region_type),
            confidence: confidence.clamp(0.0, 1.0),
            ..self.clone()
        }
    }

    /// The classified type, or the extractor's guess before classification.
    pub fn region_type(&self) -> RegionType {
        self.classified.unwrap_or(self.guess)
    }

    pub fn is_classified(&self) -> bool {
        self.classified.is_some()
    }
}
