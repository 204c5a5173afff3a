use std::collections::BTreeSet;

use lopdf::Object;
use lopdf::content::Operation;

use crate::application::ports::PdfObject;

/// Shorter strokes are treated as glyph decoration, not rules.
const MIN_RULE_LENGTH: f32 = 10.0;
/// Maximum drift, in points, for a stroke to count as axis-aligned.
const AXIS_TOLERANCE: f32 = 1.0;
const MIN_DRAWING_SEGMENTS: u32 = 3;
/// Strokes closer than this, in points, belong to the same figure.
const FIGURE_GAP: f32 = 4.0;
/// A rectangle covering this share of the page on both axes is a background.
const PAGE_FILL_RATIO: f32 = 0.9;

#[derive(Debug, Clone, Copy)]
struct Line {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
}

impl Line {
    fn bounds(&self) -> Bounds {
        Bounds {
            min_x: self.x0.min(self.x1),
            min_y: self.y0.min(self.y1),
            max_x: self.x0.max(self.x1),
            max_y: self.y0.max(self.y1),
        }
    }
}

/// Axis-aligned box in PDF user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        (self.max_x - self.min_x).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.max_y - self.min_y).max(0.0)
    }

    fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    fn near(&self, other: &Bounds, gap: f32) -> bool {
        self.min_x - gap <= other.max_x
            && other.min_x - gap <= self.max_x
            && self.min_y - gap <= other.max_y
            && other.min_y - gap <= self.max_y
    }
}

struct Figure {
    bounds: Bounds,
    lines: Vec<Line>,
}

/// Summarizes the path-construction operators of one content stream as
/// drawings, one per group of touching strokes, top of the page first.
/// Rectangles covering `page` are backgrounds and are skipped. Text, images
/// and transforms are ignored.
pub fn scan_drawings(operations: &[Operation], page: Option<Bounds>) -> Vec<PdfObject> {
    let lines = collect_lines(operations, page);

    let mut figures = group_figures(lines);
    figures.sort_by(|a, b| {
        b.bounds
            .max_y
            .total_cmp(&a.bounds.max_y)
            .then(a.bounds.min_x.total_cmp(&b.bounds.min_x))
    });

    figures.iter().filter_map(summarize).collect()
}

fn collect_lines(operations: &[Operation], page: Option<Bounds>) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();
    let mut cursor: Option<(f32, f32)> = None;
    let mut subpath_start: Option<(f32, f32)> = None;

    for op in operations {
        let operands = numbers(&op.operands);
        match (op.operator.as_str(), operands.as_slice()) {
            ("m", [x, y]) => {
                cursor = Some((*x, *y));
                subpath_start = Some((*x, *y));
            }
            ("l", [x, y]) => {
                if let Some((cx, cy)) = cursor {
                    lines.push(Line {
                        x0: cx,
                        y0: cy,
                        x1: *x,
                        y1: *y,
                    });
                }
                cursor = Some((*x, *y));
            }
            ("c", [.., x, y]) | ("v", [.., x, y]) | ("y", [.., x, y]) => {
                cursor = Some((*x, *y));
            }
            ("h", []) => {
                if let (Some((cx, cy)), Some((sx, sy))) = (cursor, subpath_start) {
                    lines.push(Line {
                        x0: cx,
                        y0: cy,
                        x1: sx,
                        y1: sy,
                    });
                    cursor = Some((sx, sy));
                }
            }
            ("re", [x, y, w, h]) => {
                cursor = Some((*x, *y));
                subpath_start = Some((*x, *y));
                if page.is_some_and(|page| covers_page(w.abs(), h.abs(), &page)) {
                    continue;
                }
                let (x1, y1) = (x + w, y + h);
                lines.extend([
                    Line { x0: *x, y0: *y, x1, y1: *y },
                    Line { x0: x1, y0: *y, x1, y1 },
                    Line { x0: x1, y0: y1, x1: *x, y1 },
                    Line { x0: *x, y0: y1, x1: *x, y1: *y },
                ]);
            }
            _ => {}
        }
    }

    lines
}

fn covers_page(width: f32, height: f32, page: &Bounds) -> bool {
    page.width() > 0.0
        && page.height() > 0.0
        && width >= page.width() * PAGE_FILL_RATIO
        && height >= page.height() * PAGE_FILL_RATIO
}

/// Single pass: each stroke absorbs every figure it touches.
fn group_figures(lines: Vec<Line>) -> Vec<Figure> {
    let mut figures: Vec<Figure> = Vec::new();

    for line in lines {
        let mut merged = Figure {
            bounds: line.bounds(),
            lines: vec![line],
        };

        let mut i = 0;
        while i < figures.len() {
            if figures[i].bounds.near(&merged.bounds, FIGURE_GAP) {
                let other = figures.swap_remove(i);
                merged.bounds = merged.bounds.union(&other.bounds);
                merged.lines.extend(other.lines);
                // The grown box may now reach figures already passed over.
                i = 0;
            } else {
                i += 1;
            }
        }

        figures.push(merged);
    }

    figures
}

fn summarize(figure: &Figure) -> Option<PdfObject> {
    let segments = u32::try_from(figure.lines.len()).unwrap_or(u32::MAX);
    if segments < MIN_DRAWING_SEGMENTS {
        return None;
    }

    let mut horizontal: BTreeSet<i32> = BTreeSet::new();
    let mut vertical: BTreeSet<i32> = BTreeSet::new();

    for line in &figure.lines {
        let dx = (line.x1 - line.x0).abs();
        let dy = (line.y1 - line.y0).abs();
        if dy <= AXIS_TOLERANCE && dx >= MIN_RULE_LENGTH {
            horizontal.insert(line.y0.round() as i32);
        } else if dx <= AXIS_TOLERANCE && dy >= MIN_RULE_LENGTH {
            vertical.insert(line.x0.round() as i32);
        }
    }

    Some(PdfObject::Drawing {
        width: figure.bounds.width().round() as u32,
        height: figure.bounds.height().round() as u32,
        horizontal_rules: horizontal.len() as u32,
        vertical_rules: vertical.len() as u32,
        segments,
    })
}

fn numbers(operands: &[Object]) -> Vec<f32> {
    operands
        .iter()
        .filter_map(|operand| match operand {
            Object::Integer(i) => Some(*i as f32),
            Object::Real(r) => Some(*r as f32),
            _ => None,
        })
        .collect()
}
