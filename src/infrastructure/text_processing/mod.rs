mod drawing_scanner;
mod lopdf_reader;
mod pdf_rasterizer;
mod text_sanitizer;

pub use drawing_scanner::{Bounds, scan_drawings};
pub use lopdf_reader::{LopdfPdfReader, MAX_PAGES_DUE_TO_RAM_USAGE};
pub use pdf_rasterizer::RENDER_DPI;
pub use text_sanitizer::sanitize_extracted_text;
