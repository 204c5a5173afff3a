/// Blocking access to PDF internals. Callers run it off the async runtime.
pub trait PdfReader: Send + Sync {
    /// Reads every page in order: native text plus embedded objects.
    fn read_pages(&self, data: &[u8]) -> Result<Vec<PdfPage>, PdfReadError>;

    /// Renders one page (zero-based) to a PNG.
    fn rasterize_page(&self, data: &[u8], page_index: usize) -> Result<Vec<u8>, PdfReadError>;
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PdfPage {
    /// One-based page number.
    pub number: u32,
    pub text: String,
    pub objects: Vec<PdfObject>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    Image {
        width: u32,
        height: u32,
        /// Encoded bytes when the stream is in a format the image decoder understands.
        encoded: Option<Vec<u8>>,
    },
    Drawing {
        width: u32,
        height: u32,
        horizontal_rules: u32,
        vertical_rules: u32,
        segments: u32,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum PdfReadError {
    #[error("malformed pdf: {0}")]
    Malformed(String),
    #[error("encrypted pdf is not supported")]
    Encrypted,
    #[error("page {0} does not exist")]
    PageOutOfRange(usize),
    #[error("rasterization failed: {0}")]
    Rasterization(String),
}
