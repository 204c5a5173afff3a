use std::sync::Arc;

use bytes::Bytes;

use crate::application::ports::{
    AnalyzedImage, ImageAnalysisError, ImageAnalyzer, OcrEngine, OcrError, PdfObject, PdfPage,
    PdfReadError, PdfReader,
};
use crate::domain::{
    Document, ExtractedText, MediaType, RegionOrigin, RegionSignals, TextSource, VisualRegion,
};

use super::resilience::{CallPolicy, call_with_retry};

/// Drawing segment count at which a drawing's edge density saturates.
const DRAWING_SEGMENT_SATURATION: f32 = 40.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractorConfig {
    /// Pages with fewer native characters than this are OCR'd instead.
    pub min_native_chars: usize,
    /// Minimum dark-pixel fraction for a plain image to count as a visual region.
    pub dense_ink_ratio: f32,
    pub ocr_embedded_images: bool,
    pub max_document_bytes: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_native_chars: 25,
            dense_ink_ratio: 0.02,
            ocr_embedded_images: true,
            max_document_bytes: 50 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractionReport {
    pub pages: u32,
    pub native_pages: u32,
    pub ocr_pages: u32,
    pub skipped_pages: u32,
    pub region_failures: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub text: ExtractedText,
    pub regions: Vec<VisualRegion>,
    pub report: ExtractionReport,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("document is corrupt: {0}")]
    Corrupt(String),
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("ocr unavailable: {0}")]
    OcrUnavailable(String),
    #[error("extraction task failed: {0}")]
    Internal(String),
}

impl ExtractionError {
    /// Message safe to show to end users.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Corrupt(_) => "The document could not be read. It may be damaged.",
            Self::UnsupportedFormat(_) => "The document format is not supported.",
            Self::OcrUnavailable(_) => {
                "Text recognition is temporarily unavailable. Please try again later."
            }
            Self::Internal(_) => "The document could not be processed.",
        }
    }
}

/// Turns a document into raw text plus the visual regions found in it.
pub struct Extractor {
    ocr: Arc<dyn OcrEngine>,
    pdf_reader: Arc<dyn PdfReader>,
    image_analyzer: Arc<dyn ImageAnalyzer>,
    config: ExtractorConfig,
}

enum PageText {
    Native(String),
    Ocr(String),
    Skipped(String),
}

impl Extractor {
    pub fn new(
        ocr: Arc<dyn OcrEngine>,
        pdf_reader: Arc<dyn PdfReader>,
        image_analyzer: Arc<dyn ImageAnalyzer>,
        config: ExtractorConfig,
    ) -> Self {
        Self {
            ocr,
            pdf_reader,
            image_analyzer,
            config,
        }
    }

    #[tracing::instrument(
        skip(self, document, policy),
        fields(
            document_id = %document.id.as_uuid(),
            media_type = document.media_type.as_str(),
            size_bytes = document.size_bytes(),
        )
    )]
    pub async fn extract(
        &self,
        document: &Document,
        policy: CallPolicy,
    ) -> Result<Extraction, ExtractionError> {
        if document.size_bytes() > self.config.max_document_bytes {
            return Err(ExtractionError::UnsupportedFormat(format!(
                "document of {} bytes exceeds the {} byte limit",
                document.size_bytes(),
                self.config.max_document_bytes
            )));
        }

        let extraction = match document.media_type {
            MediaType::Image => self.extract_image(document.data().clone(), policy).await?,
            MediaType::Pdf => self.extract_pdf(document.data().clone(), policy).await?,
        };

        tracing::info!(
            pages = extraction.report.pages,
            ocr_pages = extraction.report.ocr_pages,
            skipped_pages = extraction.report.skipped_pages,
            regions = extraction.regions.len(),
            chars = extraction.text.raw_text().len(),
            "Extraction complete"
        );

        Ok(extraction)
    }

    async fn extract_image(
        &self,
        data: Bytes,
        policy: CallPolicy,
    ) -> Result<Extraction, ExtractionError> {
        let analyzed = self.analyze(data).await.map_err(|e| match e {
            ImageAnalysisError::Unsupported(msg) => ExtractionError::Corrupt(msg),
            ImageAnalysisError::Encoding(msg) => ExtractionError::Internal(msg),
        })?;

        let text = self.recognize(&analyzed.png, policy).await.map_err(|e| match e {
            OcrError::UnsupportedInput(msg) => ExtractionError::UnsupportedFormat(msg),
            other => ExtractionError::OcrUnavailable(other.to_string()),
        })?;

        let mut regions = Vec::new();
        if analyzed.ink_density >= self.config.dense_ink_ratio {
            regions.push(VisualRegion::new(
                1,
                0,
                RegionOrigin::FullImage,
                signals_from_image(&analyzed, text.clone()),
            ));
        }

        let has_text = !text.trim().is_empty();
        let mut builder = ExtractedText::builder(1);
        builder.push(1, TextSource::Ocr, text.trim());

        Ok(Extraction {
            text: builder.build(),
            regions,
            report: ExtractionReport {
                pages: 1,
                ocr_pages: u32::from(has_text),
                ..ExtractionReport::default()
            },
        })
    }

    async fn extract_pdf(
        &self,
        data: Bytes,
        policy: CallPolicy,
    ) -> Result<Extraction, ExtractionError> {
        let reader = Arc::clone(&self.pdf_reader);
        let source = data.clone();
        let pages = run_blocking(move || reader.read_pages(&source))
            .await?
            .map_err(|e| match e {
                err @ PdfReadError::Encrypted => ExtractionError::UnsupportedFormat(err.to_string()),
                other => ExtractionError::Corrupt(other.to_string()),
            })?;

        let mut report = ExtractionReport {
            pages: pages.len() as u32,
            ..ExtractionReport::default()
        };
        let mut builder = ExtractedText::builder(report.pages);
        let mut regions = Vec::new();

        for (page_index, page) in pages.iter().enumerate() {
            match self.page_text(&data, page_index, page, policy).await? {
                PageText::Native(text) => {
                    report.native_pages += 1;
                    builder.push(page.number, TextSource::Native, text);
                }
                PageText::Ocr(text) => {
                    report.ocr_pages += 1;
                    builder.push(page.number, TextSource::Ocr, text);
                }
                PageText::Skipped(partial) => {
                    report.skipped_pages += 1;
                    builder.push(page.number, TextSource::Native, partial);
                }
            }

            self.collect_regions(page, policy, &mut regions, &mut report).await;
        }

        Ok(Extraction {
            text: builder.build(),
            regions,
            report,
        })
    }

    /// Native text when the page has enough of it, OCR of the rendered page
    /// otherwise. A page that cannot be rendered or recognised is reported as
    /// skipped, keeping whatever native text it had.
    async fn page_text(
        &self,
        data: &Bytes,
        page_index: usize,
        page: &PdfPage,
        policy: CallPolicy,
    ) -> Result<PageText, ExtractionError> {
        let native = page.text.trim();
        if native.chars().count() >= self.config.min_native_chars {
            return Ok(PageText::Native(native.to_string()));
        }

        tracing::debug!(
            page = page.number,
            native_chars = native.chars().count(),
            "Page below native text threshold, falling back to OCR"
        );

        let reader = Arc::clone(&self.pdf_reader);
        let source = data.clone();
        let raster = match run_blocking(move || reader.rasterize_page(&source, page_index)).await? {
            Ok(png) => png,
            Err(e) => {
                tracing::warn!(page = page.number, error = %e, "Page rasterization failed");
                return Ok(PageText::Skipped(native.to_string()));
            }
        };

        let analyzed = match self.analyze(Bytes::from(raster)).await {
            Ok(analyzed) => analyzed,
            Err(e) => {
                tracing::warn!(page = page.number, error = %e, "Page preprocessing failed");
                return Ok(PageText::Skipped(native.to_string()));
            }
        };

        match self.recognize(&analyzed.png, policy).await {
            Ok(text) if text.trim().is_empty() && !native.is_empty() => {
                Ok(PageText::Native(native.to_string()))
            }
            Ok(text) => Ok(PageText::Ocr(text.trim().to_string())),
            Err(OcrError::UnsupportedInput(msg)) => {
                tracing::warn!(page = page.number, error = %msg, "OCR rejected page image");
                Ok(PageText::Skipped(native.to_string()))
            }
            Err(e) => Err(ExtractionError::OcrUnavailable(e.to_string())),
        }
    }

    async fn collect_regions(
        &self,
        page: &PdfPage,
        policy: CallPolicy,
        regions: &mut Vec<VisualRegion>,
        report: &mut ExtractionReport,
    ) {
        for object in &page.objects {
            let index = regions.len();
            let region = match object {
                PdfObject::Drawing {
                    width,
                    height,
                    horizontal_rules,
                    vertical_rules,
                    segments,
                } => VisualRegion::new(
                    page.number,
                    index,
                    RegionOrigin::VectorDrawing,
                    RegionSignals {
                        width: *width,
                        height: *height,
                        edge_density: (*segments as f32 / DRAWING_SEGMENT_SATURATION).min(1.0),
                        horizontal_rules: *horizontal_rules,
                        vertical_rules: *vertical_rules,
                        ..RegionSignals::default()
                    },
                ),
                PdfObject::Image {
                    width,
                    height,
                    encoded,
                } => {
                    let fallback = RegionSignals {
                        width: *width,
                        height: *height,
                        ..RegionSignals::default()
                    };
                    let signals = match encoded {
                        Some(bytes) if self.config.ocr_embedded_images => {
                            match self.inspect_embedded(bytes, policy).await {
                                Ok(signals) => signals,
                                Err(reason) => {
                                    tracing::warn!(
                                        page = page.number,
                                        region = index,
                                        error = %reason,
                                        "Embedded image inspection failed"
                                    );
                                    report.region_failures += 1;
                                    fallback
                                }
                            }
                        }
                        _ => fallback,
                    };
                    VisualRegion::new(page.number, index, RegionOrigin::EmbeddedImage, signals)
                }
            };
            regions.push(region);
        }
    }

    async fn inspect_embedded(
        &self,
        encoded: &[u8],
        policy: CallPolicy,
    ) -> Result<RegionSignals, String> {
        let analyzed = self
            .analyze(Bytes::copy_from_slice(encoded))
            .await
            .map_err(|e| e.to_string())?;
        let text = self
            .recognize(&analyzed.png, policy)
            .await
            .map_err(|e| e.to_string())?;
        Ok(signals_from_image(&analyzed, text))
    }

    async fn analyze(&self, data: Bytes) -> Result<AnalyzedImage, ImageAnalysisError> {
        let analyzer = Arc::clone(&self.image_analyzer);
        match run_blocking(move || analyzer.analyze(&data)).await {
            Ok(result) => result,
            Err(e) => Err(ImageAnalysisError::Encoding(e.to_string())),
        }
    }

    async fn recognize(&self, png: &[u8], policy: CallPolicy) -> Result<String, OcrError> {
        call_with_retry("ocr", policy, || self.ocr.extract(png)).await
    }
}

fn signals_from_image(analyzed: &AnalyzedImage, text: String) -> RegionSignals {
    RegionSignals {
        width: analyzed.width,
        height: analyzed.height,
        text,
        ink_density: analyzed.ink_density,
        edge_density: analyzed.edge_density,
        horizontal_rules: analyzed.horizontal_rules,
        vertical_rules: analyzed.vertical_rules,
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, ExtractionError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ExtractionError::Internal(format!("task join error: {e}")))
}
