use async_trait::async_trait;

use super::capability_error::CapabilityError;

#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognises the text in a PNG-encoded image.
    async fn extract(&self, image_png: &[u8]) -> Result<String, OcrError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("ocr capability unavailable: {0}")]
    CapabilityUnavailable(String),
    #[error("ocr request timed out")]
    Timeout,
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),
}

impl CapabilityError for OcrError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::CapabilityUnavailable(_) | Self::Timeout)
    }

    fn timed_out() -> Self {
        Self::Timeout
    }
}
