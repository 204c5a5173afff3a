use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use super::content_breakdown::ContentBreakdown;
use super::content_unit::ContentUnit;

pub const NO_CONTENT_MESSAGE: &str = "No extractable content was found in the document.";
pub const GENERATION_UNAVAILABLE_MESSAGE: &str =
    "Content generation is temporarily unavailable. Please try again later.";

/// Counters gathered across all pipeline stages.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProcessingStats {
    pub pages: u32,
    pub native_pages: u32,
    pub ocr_pages: u32,
    pub skipped_pages: u32,
    pub regions: usize,
    pub region_failures: usize,
    pub formulas_converted: usize,
    pub formulas_failed: usize,
    pub segments: usize,
    pub units_emitted: usize,
    pub segments_empty: usize,
    pub segments_failed: usize,
    #[serde(serialize_with = "as_seconds")]
    pub total_time: Duration,
}

/// Outcome of one pipeline run.
///
/// Built only through [`ProcessingResult::succeeded`] and
/// [`ProcessingResult::failed`] so `total_items` always equals the number of
/// content items and a failure never carries content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingResult {
    success: bool,
    original_text: String,
    content_items: Vec<ContentUnit>,
    topic: Option<String>,
    processed_at: DateTime<Utc>,
    #[serde(serialize_with = "as_seconds")]
    processing_time: Duration,
    total_items: usize,
    error: Option<String>,
    content_breakdown: ContentBreakdown,
    stats: ProcessingStats,
}

impl ProcessingResult {
    /// Falls back to [`ProcessingResult::failed`] when `content_items` is empty.
    /// The error names a generation outage when any segment failed, and
    /// missing content otherwise.
    pub fn succeeded(
        original_text: String,
        content_items: Vec<ContentUnit>,
        topic: Option<String>,
        processing_time: Duration,
        content_breakdown: ContentBreakdown,
        stats: ProcessingStats,
    ) -> Self {
        if content_items.is_empty() {
            let error = if stats.segments_failed > 0 {
                GENERATION_UNAVAILABLE_MESSAGE
            } else {
                NO_CONTENT_MESSAGE
            };
            return Self::failed(error, original_text, topic)
                .with_details(processing_time, content_breakdown, stats);
        }

        Self {
            success: true,
            original_text,
            total_items: content_items.len(),
            content_items,
            topic,
            processed_at: Utc::now(),
            processing_time,
            error: None,
            content_breakdown,
            stats,
        }
    }

    pub fn failed(error: impl Into<String>, original_text: String, topic: Option<String>) -> Self {
        Self {
            success: false,
            original_text,
            content_items: Vec::new(),
            topic,
            processed_at: Utc::now(),
            processing_time: Duration::ZERO,
            total_items: 0,
            error: Some(error.into()),
            content_breakdown: ContentBreakdown::default(),
            stats: ProcessingStats::default(),
        }
    }

    fn with_details(
        mut self,
        processing_time: Duration,
        content_breakdown: ContentBreakdown,
        stats: ProcessingStats,
    ) -> Self {
        self.processing_time = processing_time;
        self.content_breakdown = content_breakdown;
        self.stats = stats;
        self
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn content_items(&self) -> &[ContentUnit] {
        &self.content_items
    }

    pub fn into_content_items(self) -> Vec<ContentUnit> {
        self.content_items
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn processed_at(&self) -> DateTime<Utc> {
        self.processed_at
    }

    pub fn processing_time(&self) -> Duration {
        self.processing_time
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn content_breakdown(&self) -> &ContentBreakdown {
        &self.content_breakdown
    }

    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }
}

fn as_seconds<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
