use async_trait::async_trait;

use super::capability_error::CapabilityError;

#[async_trait]
pub trait FormulaConverter: Send + Sync {
    /// Converts a formula-like span into canonical markup, delimiters included.
    async fn convert(&self, span: &str) -> Result<String, FormulaError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FormulaError {
    #[error("formula capability unavailable: {0}")]
    CapabilityUnavailable(String),
    #[error("formula conversion timed out")]
    Timeout,
    #[error("unrecognized formula: {0}")]
    Unrecognized(String),
}

impl CapabilityError for FormulaError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::CapabilityUnavailable(_) | Self::Timeout)
    }

    fn timed_out() -> Self {
        Self::Timeout
    }
}
