use std::time::{Duration, Instant};

use tokio::sync::watch;

use crate::domain::{Document, ProcessingResult, ProcessingStats};

use super::classifier::Classifier;
use super::content_structurer::ContentStructurer;
use super::extractor::Extractor;
use super::formula_normalizer::FormulaNormalizer;
use super::resilience::{CallPolicy, CallTimeout};

pub const CANCELLED_MESSAGE: &str = "Processing was cancelled before it finished.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub call_timeout: CallTimeout,
    pub retry_backoff: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            call_timeout: CallTimeout::default(),
            retry_backoff: Duration::from_millis(500),
        }
    }
}

/// Document bytes in, ordered content units out.
pub struct DocumentPipeline {
    extractor: Extractor,
    classifier: Classifier,
    normalizer: FormulaNormalizer,
    structurer: ContentStructurer,
    config: PipelineConfig,
}

impl DocumentPipeline {
    pub fn new(
        extractor: Extractor,
        classifier: Classifier,
        normalizer: FormulaNormalizer,
        structurer: ContentStructurer,
        config: PipelineConfig,
    ) -> Self {
        Self {
            extractor,
            classifier,
            normalizer,
            structurer,
            config,
        }
    }

    /// Call policy for a document: the deadline grows with its size.
    pub fn call_policy(&self, document: &Document) -> CallPolicy {
        CallPolicy {
            timeout: self.config.call_timeout.for_size(document.size_bytes()),
            backoff: self.config.retry_backoff,
        }
    }

    #[tracing::instrument(
        skip(self, document, topic_hint),
        fields(
            document_id = %document.id.as_uuid(),
            filename = %document.filename,
            media_type = document.media_type.as_str(),
        )
    )]
    pub async fn run(&self, document: &Document, topic_hint: Option<&str>) -> ProcessingResult {
        let started = Instant::now();
        let topic = topic_hint
            .map(str::trim)
            .filter(|hint| !hint.is_empty())
            .map(str::to_string);
        let policy = self.call_policy(document);

        let extraction = match self.extractor.extract(document, policy).await {
            Ok(extraction) => extraction,
            Err(e) => {
                tracing::error!(error = %e, "Extraction failed");
                return ProcessingResult::failed(e.user_message(), String::new(), topic);
            }
        };

        let classification = self.classifier.classify(&extraction.regions);
        let original_text = extraction.text.raw_text().to_string();

        let normalized = self.normalizer.normalize(&original_text, policy).await;
        let structured = self
            .structurer
            .structure(&normalized.text, topic.as_deref(), policy)
            .await;

        let stats = ProcessingStats {
            pages: extraction.report.pages,
            native_pages: extraction.report.native_pages,
            ocr_pages: extraction.report.ocr_pages,
            skipped_pages: extraction.report.skipped_pages,
            regions: classification.regions.len(),
            region_failures: extraction.report.region_failures,
            formulas_converted: normalized.converted,
            formulas_failed: normalized.failed,
            segments: structured.report.segments,
            units_emitted: structured.report.emitted,
            segments_empty: structured.report.empty,
            segments_failed: structured.report.failed,
            total_time: started.elapsed(),
        };

        let result = ProcessingResult::succeeded(
            original_text,
            structured.units,
            topic,
            structured.processing_time,
            classification.breakdown,
            stats,
        );

        tracing::info!(
            success = result.success(),
            total_items = result.total_items(),
            elapsed_ms = result.stats().total_time.as_millis() as u64,
            "Pipeline run finished"
        );

        result
    }

    /// Like [`DocumentPipeline::run`], abandoning all in-flight work once the
    /// receiver observes `true`. A dropped sender never cancels.
    pub async fn run_with_cancellation(
        &self,
        document: &Document,
        topic_hint: Option<&str>,
        mut cancel: watch::Receiver<bool>,
    ) -> ProcessingResult {
        let cancelled = async {
            if cancel.wait_for(|cancelled| *cancelled).await.is_err() {
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            result = self.run(document, topic_hint) => result,
            () = cancelled => {
                tracing::warn!(document_id = %document.id.as_uuid(), "Pipeline run cancelled");
                let topic = topic_hint.map(str::trim).filter(|hint| !hint.is_empty());
                ProcessingResult::failed(CANCELLED_MESSAGE, String::new(), topic.map(str::to_string))
            }
        }
    }
}
