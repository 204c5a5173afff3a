mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment};
pub use settings::{
    ENV_PREFIX, ExtractionSettings, LlmProvider, LlmSettings, LoggingSettings, OcrSettings,
    PipelineSettings, Settings,
};
