mod capability_error;
mod content_generator;
mod formula_converter;
mod image_analyzer;
mod ocr_engine;
mod pdf_reader;

pub use capability_error::CapabilityError;
pub use content_generator::{ContentGenerator, GeneratedContent, GenerationError};
pub use formula_converter::{FormulaConverter, FormulaError};
pub use image_analyzer::{AnalyzedImage, ImageAnalysisError, ImageAnalyzer};
pub use ocr_engine::{OcrEngine, OcrError};
pub use pdf_reader::{PdfObject, PdfPage, PdfReadError, PdfReader};
