mod content_breakdown;
mod content_unit;
mod document;
mod extracted_text;
mod processing_result;
mod visual_region;

pub use content_breakdown::ContentBreakdown;
pub use content_unit::{ContentUnit, ContentUnitError};
pub use document::{Document, DocumentId, MediaType};
pub use extracted_text::{
    ExtractedText, ExtractedTextBuilder, SEGMENT_SEPARATOR, TextSegment, TextSource,
};
pub use processing_result::{
    GENERATION_UNAVAILABLE_MESSAGE, NO_CONTENT_MESSAGE, ProcessingResult, ProcessingStats,
};
pub use visual_region::{RegionOrigin, RegionSignals, RegionType, VisualRegion};
