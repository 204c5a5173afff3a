use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::{ContentBreakdown, RegionSignals, RegionType, VisualRegion};

const MATH_SYMBOLS: &str = "=+-*/^_<>\\≤≥≠±×÷√∑∫∏∞∂≈∝πθαβγδελμσφωΔΣΠΩ";
const GENERAL_IMAGE_CONFIDENCE: f32 = 0.5;
const RULED_TABLE_CONFIDENCE: f32 = 0.9;

/// Tunables for the region heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassifierThresholds {
    /// Share of math symbols among non-whitespace characters.
    pub formula_symbol_density: f32,
    pub formula_min_chars: usize,
    pub table_min_rows: usize,
    pub table_max_columns: usize,
    /// Share of rows that must have the most common column count.
    pub table_row_regularity: f32,
    pub table_max_token_chars: f32,
    /// Distinct rule positions needed on each axis. A bordered box alone has
    /// two, so a ruled table needs at least one interior rule per axis.
    pub table_min_rules: u32,
    /// Non-whitespace characters per 10 000 square pixels.
    pub diagram_max_text_density: f32,
    pub diagram_min_edge_density: f32,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            formula_symbol_density: 0.15,
            formula_min_chars: 3,
            table_min_rows: 3,
            table_max_columns: 8,
            table_row_regularity: 0.6,
            table_max_token_chars: 12.0,
            table_min_rules: 3,
            diagram_max_text_density: 5.0,
            diagram_min_edge_density: 0.05,
        }
    }
}

type Predicate = fn(&RegionSignals, &ClassifierThresholds) -> Option<f32>;

/// One entry of the decision list: a label and the test that earns it.
/// The predicate returns the confidence on a match.
pub struct ClassificationRule {
    pub label: RegionType,
    pub predicate: Predicate,
}

/// Evaluated in order; the first match wins. Anything left is a general image.
pub const DECISION_LIST: [ClassificationRule; 3] = [
    ClassificationRule {
        label: RegionType::Formula,
        predicate: formula_match,
    },
    ClassificationRule {
        label: RegionType::Table,
        predicate: table_match,
    },
    ClassificationRule {
        label: RegionType::Diagram,
        predicate: diagram_match,
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub regions: Vec<VisualRegion>,
    pub breakdown: ContentBreakdown,
}

/// Assigns a final type to each region. Pure: no I/O, no randomness.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    thresholds: ClassifierThresholds,
}

impl Classifier {
    pub fn new(thresholds: ClassifierThresholds) -> Self {
        Self { thresholds }
    }

    pub fn classify(&self, regions: &[VisualRegion]) -> Classification {
        let regions: Vec<VisualRegion> = regions
            .iter()
            .map(|region| {
                let (label, confidence) = self.label(&region.signals);
                region.finalized(label, confidence)
            })
            .collect();

        let breakdown = regions.iter().map(VisualRegion::region_type).collect();

        Classification { regions, breakdown }
    }

    pub fn label(&self, signals: &RegionSignals) -> (RegionType, f32) {
        DECISION_LIST
            .iter()
            .find_map(|rule| {
                (rule.predicate)(signals, &self.thresholds).map(|confidence| (rule.label, confidence))
            })
            .unwrap_or((RegionType::GeneralImage, GENERAL_IMAGE_CONFIDENCE))
    }
}

pub fn symbol_density(text: &str) -> f32 {
    let mut total = 0usize;
    let mut symbols = 0usize;
    for ch in text.chars().filter(|c| !c.is_whitespace()) {
        total += 1;
        if MATH_SYMBOLS.contains(ch) {
            symbols += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        symbols as f32 / total as f32
    }
}

/// Non-whitespace characters per 10 000 square pixels.
pub fn text_density(signals: &RegionSignals) -> f32 {
    let chars = signals.text.chars().filter(|c| !c.is_whitespace()).count();
    if chars == 0 {
        return 0.0;
    }
    let area = signals.area();
    if area == 0 {
        return f32::INFINITY;
    }
    chars as f32 * 10_000.0 / area as f32
}

fn formula_match(signals: &RegionSignals, thresholds: &ClassifierThresholds) -> Option<f32> {
    let chars = signals.text.chars().filter(|c| !c.is_whitespace()).count();
    if chars < thresholds.formula_min_chars {
        return None;
    }

    let density = symbol_density(&signals.text);
    if density < thresholds.formula_symbol_density {
        return None;
    }

    let headroom = (1.0 - thresholds.formula_symbol_density).max(f32::EPSILON);
    Some(0.5 + 0.5 * ((density - thresholds.formula_symbol_density) / headroom).clamp(0.0, 1.0))
}

fn table_match(signals: &RegionSignals, thresholds: &ClassifierThresholds) -> Option<f32> {
    if signals.horizontal_rules >= thresholds.table_min_rules
        && signals.vertical_rules >= thresholds.table_min_rules
    {
        return Some(RULED_TABLE_CONFIDENCE);
    }
    grid_regularity(&signals.text, thresholds)
}

/// Share of rows matching the dominant column count, when the text reads
/// like rows of short cells.
fn grid_regularity(text: &str, thresholds: &ClassifierThresholds) -> Option<f32> {
    let rows: Vec<Vec<&str>> = text
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>())
        .filter(|tokens| !tokens.is_empty())
        .collect();

    if rows.len() < thresholds.table_min_rows {
        return None;
    }

    let mut column_counts: HashMap<usize, usize> = HashMap::new();
    for row in &rows {
        *column_counts.entry(row.len()).or_default() += 1;
    }
    let (columns, matching_rows) = column_counts
        .into_iter()
        .max_by_key(|&(columns, rows)| (rows, columns))?;

    if columns < 2 || columns > thresholds.table_max_columns {
        return None;
    }

    let regularity = matching_rows as f32 / rows.len() as f32;
    if regularity < thresholds.table_row_regularity {
        return None;
    }

    let (token_chars, tokens) = rows
        .iter()
        .flatten()
        .fold((0usize, 0usize), |(chars, count), token| {
            (chars + token.chars().count(), count + 1)
        });
    let mean_token_chars = token_chars as f32 / tokens as f32;
    if mean_token_chars > thresholds.table_max_token_chars {
        return None;
    }

    Some(regularity)
}

fn diagram_match(signals: &RegionSignals, thresholds: &ClassifierThresholds) -> Option<f32> {
    if text_density(signals) > thresholds.diagram_max_text_density {
        return None;
    }
    if signals.edge_density < thresholds.diagram_min_edge_density {
        return None;
    }
    Some((0.5 + signals.edge_density).min(1.0))
}
