mod classifier;
mod content_structurer;
mod extractor;
mod fan_out;
mod formula_normalizer;
mod pipeline;
mod resilience;
mod segmenter;

pub use classifier::{
    Classification, ClassificationRule, Classifier, ClassifierThresholds, DECISION_LIST,
    symbol_density, text_density,
};
pub use content_structurer::{ContentStructurer, FALLBACK_TOPIC, Structured, StructuringReport};
pub use extractor::{Extraction, ExtractionError, ExtractionReport, Extractor, ExtractorConfig};
pub use fan_out::fan_out_ordered;
pub use formula_normalizer::{FormulaNormalizer, NormalizedText, find_formula_spans};
pub use pipeline::{CANCELLED_MESSAGE, DocumentPipeline, PipelineConfig};
pub use resilience::{CallPolicy, CallTimeout, call_with_retry};
pub use segmenter::{Segment, Segmenter, is_heading};
