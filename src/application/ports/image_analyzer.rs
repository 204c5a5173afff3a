/// Decodes an image, binarises it and measures it.
pub trait ImageAnalyzer: Send + Sync {
    fn analyze(&self, data: &[u8]) -> Result<AnalyzedImage, ImageAnalysisError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedImage {
    /// The preprocessed (grayscale, thresholded) image as PNG.
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub ink_density: f32,
    pub edge_density: f32,
    pub horizontal_rules: u32,
    pub vertical_rules: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ImageAnalysisError {
    #[error("unsupported image: {0}")]
    Unsupported(String),
    #[error("image encoding failed: {0}")]
    Encoding(String),
}
