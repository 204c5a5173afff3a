use image::imageops::FilterType;
use image::{GrayImage, ImageFormat, Luma};

use crate::application::ports::{AnalyzedImage, ImageAnalysisError, ImageAnalyzer};

/// Longer sides are scaled down to this before thresholding.
pub const MAX_DIMENSION: u32 = 2000;
/// Share of a row or column an ink run must span to count as a ruling line.
const RULE_COVERAGE: f32 = 0.5;
/// Grey levels between the two class means below which the image is treated
/// as paper noise, not ink on paper.
pub const MIN_CLASS_CONTRAST: f64 = 32.0;

const INK: Luma<u8> = Luma([0]);
const PAPER: Luma<u8> = Luma([255]);

/// Grayscale plus a single global Otsu threshold, then pixel statistics on
/// the binarised result.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdImageAnalyzer;

impl ThresholdImageAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl ImageAnalyzer for ThresholdImageAnalyzer {
    #[tracing::instrument(skip(self, data), fields(size_bytes = data.len()))]
    fn analyze(&self, data: &[u8]) -> Result<AnalyzedImage, ImageAnalysisError> {
        let img = image::load_from_memory(data)
            .map_err(|e| ImageAnalysisError::Unsupported(format!("image decode: {e}")))?;

        let img = if img.width().max(img.height()) > MAX_DIMENSION {
            img.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Triangle)
        } else {
            img
        };

        let gray = img.to_luma8();
        let binary = binarize(&gray);
        let (width, height) = binary.dimensions();

        let mut png: Vec<u8> = Vec::new();
        binary
            .write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| ImageAnalysisError::Encoding(format!("PNG encode: {e}")))?;

        Ok(AnalyzedImage {
            png,
            width,
            height,
            ink_density: ink_density(&binary),
            edge_density: edge_density(&binary),
            horizontal_rules: count_rules(&binary, Axis::Rows),
            vertical_rules: count_rules(&binary, Axis::Columns),
        })
    }
}

/// Threshold maximising between-class variance of the histogram. `None` for
/// an image of a single grey level, or when the best split separates classes
/// less than [`MIN_CLASS_CONTRAST`] apart.
pub fn otsu_threshold(gray: &GrayImage) -> Option<u8> {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 || histogram.iter().filter(|&&count| count > 0).count() < 2 {
        return None;
    }

    let weighted_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut best = (0u8, 0.0f64, 0.0f64);
    let mut background = 0u64;
    let mut weighted_background = 0.0f64;

    for (level, &count) in histogram.iter().enumerate() {
        background += count;
        if background == 0 {
            continue;
        }
        let foreground = total - background;
        if foreground == 0 {
            break;
        }
        weighted_background += level as f64 * count as f64;

        let mean_background = weighted_background / background as f64;
        let mean_foreground = (weighted_total - weighted_background) / foreground as f64;
        let variance = background as f64
            * foreground as f64
            * (mean_background - mean_foreground).powi(2);

        if variance > best.1 {
            best = (level as u8, variance, mean_foreground - mean_background);
        }
    }

    let (threshold, _, contrast) = best;
    (contrast >= MIN_CLASS_CONTRAST).then_some(threshold)
}

/// Pixels at or below the threshold become ink. Without a threshold the
/// whole image is paper.
fn binarize(gray: &GrayImage) -> GrayImage {
    let threshold = otsu_threshold(gray);
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| match threshold {
        Some(t) if gray.get_pixel(x, y).0[0] <= t => INK,
        _ => PAPER,
    })
}

fn ink_density(binary: &GrayImage) -> f32 {
    let total = binary.width() as u64 * binary.height() as u64;
    if total == 0 {
        return 0.0;
    }
    let ink = binary.pixels().filter(|&&p| p == INK).count() as u64;
    ink as f32 / total as f32
}

/// Share of pixels whose right or lower neighbour has the other colour.
fn edge_density(binary: &GrayImage) -> f32 {
    let (width, height) = binary.dimensions();
    if width == 0 || height == 0 {
        return 0.0;
    }

    let mut edges = 0u64;
    for (x, y, pixel) in binary.enumerate_pixels() {
        let right = x + 1 < width && binary.get_pixel(x + 1, y) != pixel;
        let below = y + 1 < height && binary.get_pixel(x, y + 1) != pixel;
        if right || below {
            edges += 1;
        }
    }
    edges as f32 / (width as u64 * height as u64) as f32
}

#[derive(Clone, Copy)]
enum Axis {
    Rows,
    Columns,
}

/// Adjacent qualifying lines merge into one rule, so a thick stroke counts once.
fn count_rules(binary: &GrayImage, axis: Axis) -> u32 {
    let (width, height) = binary.dimensions();
    let (lines, length) = match axis {
        Axis::Rows => (height, width),
        Axis::Columns => (width, height),
    };
    if length == 0 {
        return 0;
    }
    let min_run = ((length as f32) * RULE_COVERAGE).ceil() as u32;

    let mut rules = 0;
    let mut in_rule = false;
    for line in 0..lines {
        let mut longest = 0;
        let mut run = 0;
        for offset in 0..length {
            let (x, y) = match axis {
                Axis::Rows => (offset, line),
                Axis::Columns => (line, offset),
            };
            if *binary.get_pixel(x, y) == INK {
                run += 1;
                longest = longest.max(run);
            } else {
                run = 0;
            }
        }

        let qualifies = longest >= min_run;
        if qualifies && !in_rule {
            rules += 1;
        }
        in_rule = qualifies;
    }
    rules
}
