use async_trait::async_trait;

use super::capability_error::CapabilityError;

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(
        &self,
        segment: &str,
        topic_hint: Option<&str>,
    ) -> Result<GeneratedContent, GenerationError>;
}

/// Validated reply of the generation capability.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GeneratedContent {
    pub topic: String,
    pub subtopic: Option<String>,
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation capability unavailable: {0}")]
    CapabilityUnavailable(String),
    #[error("generation request timed out")]
    Timeout,
    #[error("generation returned no usable content")]
    EmptyResult,
}

impl CapabilityError for GenerationError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::CapabilityUnavailable(_) | Self::Timeout)
    }

    fn timed_out() -> Self {
        Self::Timeout
    }
}
