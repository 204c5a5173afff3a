use config::Environment as EnvironmentSource;
use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::application::services::ClassifierThresholds;

use super::Environment;

pub const ENV_PREFIX: &str = "FOLIO";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub llm: LlmSettings,
    pub ocr: OcrSettings,
    pub pipeline: PipelineSettings,
    pub extraction: ExtractionSettings,
    pub classifier: ClassifierThresholds,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "lmstudio")]
    LmStudio,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    /// Required for `lmstudio`; overrides the public endpoint for `openai`.
    pub base_url: Option<String>,
    pub api_key: String,
    pub chat_model: String,
    pub formula_model: Option<String>,
    pub max_tokens: usize,
    pub temperature: f32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAi,
            base_url: None,
            api_key: String::new(),
            chat_model: "gpt-4o-mini".to_string(),
            formula_model: None,
            max_tokens: 1024,
            temperature: 0.2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Vision model used for OCR; falls back to `llm.chat_model`.
    pub model: Option<String>,
    pub max_tokens: usize,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 2048,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub timeout_floor_secs: u64,
    pub timeout_ceiling_secs: u64,
    pub timeout_secs_per_100_kib: u64,
    pub retry_backoff_ms: u64,
    pub max_in_flight: usize,
    pub max_segment_chars: usize,
    pub max_document_bytes: u64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            timeout_floor_secs: 10,
            timeout_ceiling_secs: 120,
            timeout_secs_per_100_kib: 2,
            retry_backoff_ms: 500,
            max_in_flight: 4,
            max_segment_chars: 4000,
            max_document_bytes: 50 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    pub min_native_chars: usize,
    pub dense_ink_ratio: f32,
    pub ocr_embedded_images: bool,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            min_native_chars: 25,
            dense_ink_ratio: 0.02,
            ocr_embedded_images: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub enable_json: bool,
    /// Used when `RUST_LOG` is unset.
    pub filter: Option<String>,
}

impl Settings {
    /// Layers `appsettings.toml`, `appsettings.{environment}.toml` and
    /// `FOLIO__SECTION__KEY` variables, later sources winning.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("appsettings").required(false))
            .add_source(File::with_name(&environment.settings_file()).required(false))
            .add_source(
                EnvironmentSource::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
