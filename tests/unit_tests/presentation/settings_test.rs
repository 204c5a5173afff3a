use config::{Config, File, FileFormat};
use folio::presentation::config::{LlmProvider, Settings};

fn from_toml(toml: &str) -> Settings {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap()
}

#[test]
fn given_no_sources_when_deserializing_then_defaults_apply() {
    let settings = from_toml("");

    assert_eq!(settings.llm.provider, LlmProvider::OpenAi);
    assert_eq!(settings.llm.chat_model, "gpt-4o-mini");
    assert_eq!(settings.pipeline.timeout_floor_secs, 10);
    assert_eq!(settings.pipeline.timeout_ceiling_secs, 120);
    assert_eq!(settings.pipeline.max_in_flight, 4);
    assert_eq!(settings.extraction.min_native_chars, 25);
    assert!(settings.extraction.ocr_embedded_images);
    assert!(!settings.logging.enable_json);
    assert_eq!(settings.classifier.table_min_rules, 3);
}

#[test]
fn given_partial_sections_when_deserializing_then_missing_keys_keep_defaults() {
    let settings = from_toml(
        r#"
        [llm]
        provider = "lmstudio"
        base_url = "http://localhost:1234/v1"

        [pipeline]
        max_in_flight = 2

        [classifier]
        formula_symbol_density = 0.3

        [logging]
        enable_json = true
        filter = "warn"
        "#,
    );

    assert_eq!(settings.llm.provider, LlmProvider::LmStudio);
    assert_eq!(settings.llm.base_url.as_deref(), Some("http://localhost:1234/v1"));
    assert_eq!(settings.llm.max_tokens, 1024);
    assert_eq!(settings.pipeline.max_in_flight, 2);
    assert_eq!(settings.pipeline.retry_backoff_ms, 500);
    assert_eq!(settings.classifier.formula_symbol_density, 0.3);
    assert_eq!(settings.classifier.table_min_rows, 3);
    assert!(settings.logging.enable_json);
    assert_eq!(settings.logging.filter.as_deref(), Some("warn"));
}

#[test]
fn given_unknown_provider_when_deserializing_then_fails() {
    let result = Config::builder()
        .add_source(File::from_str("[llm]\nprovider = \"bard\"", FileFormat::Toml))
        .build()
        .unwrap()
        .try_deserialize::<Settings>();

    assert!(result.is_err());
}
