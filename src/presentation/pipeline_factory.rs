use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    ContentGenerator, FormulaConverter, ImageAnalyzer, OcrEngine, PdfReader,
};
use crate::application::services::{
    CallTimeout, Classifier, ContentStructurer, DocumentPipeline, Extractor, ExtractorConfig,
    FormulaNormalizer, PipelineConfig, Segmenter,
};
use crate::infrastructure::imaging::ThresholdImageAnalyzer;
use crate::infrastructure::llm::{
    ChatClient, LlmContentGenerator, LlmFormulaConverter, ModelParams, VisionOcrEngine,
};
use crate::infrastructure::text_processing::LopdfPdfReader;

use super::config::{LlmProvider, Settings};

/// Slack between the per-call deadline and the HTTP client's own timeout.
const HTTP_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

pub struct PipelineFactory;

#[derive(Debug, thiserror::Error)]
pub enum PipelineFactoryError {
    #[error("missing API key: the openai provider requires llm.api_key")]
    MissingApiKey,
    #[error("missing base url: the lmstudio provider requires llm.base_url")]
    MissingBaseUrl,
    #[error("client initialization failed: {0}")]
    InitializationFailed(String),
}

/// The five collaborators the pipeline is assembled from.
pub struct PipelineParts {
    pub ocr: Arc<dyn OcrEngine>,
    pub formula_converter: Arc<dyn FormulaConverter>,
    pub content_generator: Arc<dyn ContentGenerator>,
    pub pdf_reader: Arc<dyn PdfReader>,
    pub image_analyzer: Arc<dyn ImageAnalyzer>,
}

impl PipelineFactory {
    /// Wires the chat-model adapters, lopdf reader and threshold analyzer.
    pub fn create(settings: &Settings) -> Result<DocumentPipeline, PipelineFactoryError> {
        let llm = &settings.llm;
        let base_url = match llm.provider {
            LlmProvider::OpenAi => {
                if llm.api_key.trim().is_empty() {
                    return Err(PipelineFactoryError::MissingApiKey);
                }
                llm.base_url.as_deref()
            }
            LlmProvider::LmStudio => Some(
                llm.base_url
                    .as_deref()
                    .filter(|url| !url.trim().is_empty())
                    .ok_or(PipelineFactoryError::MissingBaseUrl)?,
            ),
        };

        let http_timeout =
            Duration::from_secs(settings.pipeline.timeout_ceiling_secs) + HTTP_TIMEOUT_SLACK;
        let client = Arc::new(
            ChatClient::new(base_url, &llm.api_key, http_timeout)
                .map_err(|e| PipelineFactoryError::InitializationFailed(e.to_string()))?,
        );

        tracing::info!(
            provider = ?llm.provider,
            base_url = client.base_url(),
            chat_model = %llm.chat_model,
            "Creating document pipeline"
        );

        let chat = ModelParams {
            model: llm.chat_model.clone(),
            max_tokens: llm.max_tokens,
            temperature: llm.temperature,
        };
        let formula = ModelParams {
            model: llm.formula_model.clone().unwrap_or_else(|| llm.chat_model.clone()),
            temperature: 0.0,
            ..chat.clone()
        };
        let ocr = ModelParams {
            model: settings.ocr.model.clone().unwrap_or_else(|| llm.chat_model.clone()),
            max_tokens: settings.ocr.max_tokens,
            temperature: 0.0,
        };

        let parts = PipelineParts {
            ocr: Arc::new(VisionOcrEngine::new(Arc::clone(&client), ocr)),
            formula_converter: Arc::new(LlmFormulaConverter::new(Arc::clone(&client), formula)),
            content_generator: Arc::new(LlmContentGenerator::new(client, chat)),
            pdf_reader: Arc::new(LopdfPdfReader::new()),
            image_analyzer: Arc::new(ThresholdImageAnalyzer::new()),
        };

        Ok(Self::from_parts(settings, parts))
    }

    /// Assembles the pipeline around caller-supplied collaborators.
    pub fn from_parts(settings: &Settings, parts: PipelineParts) -> DocumentPipeline {
        let pipeline = &settings.pipeline;
        let extraction = &settings.extraction;

        let extractor = Extractor::new(
            parts.ocr,
            parts.pdf_reader,
            parts.image_analyzer,
            ExtractorConfig {
                min_native_chars: extraction.min_native_chars,
                dense_ink_ratio: extraction.dense_ink_ratio,
                ocr_embedded_images: extraction.ocr_embedded_images,
                max_document_bytes: pipeline.max_document_bytes,
            },
        );
        let normalizer = FormulaNormalizer::new(parts.formula_converter, pipeline.max_in_flight);
        let structurer = ContentStructurer::new(
            parts.content_generator,
            Segmenter::new(pipeline.max_segment_chars),
            pipeline.max_in_flight,
        );

        DocumentPipeline::new(
            extractor,
            Classifier::new(settings.classifier),
            normalizer,
            structurer,
            PipelineConfig {
                call_timeout: CallTimeout {
                    floor: Duration::from_secs(pipeline.timeout_floor_secs),
                    ceiling: Duration::from_secs(pipeline.timeout_ceiling_secs),
                    per_100_kib: Duration::from_secs(pipeline.timeout_secs_per_100_kib),
                },
                retry_backoff: Duration::from_millis(pipeline.retry_backoff_ms),
            },
        )
    }
}
