pub const DEFAULT_FILTER: &str = "info,folio=debug";

/// Subscriber settings. `LOG_FORMAT=json` turns on JSON output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    /// Used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl TracingConfig {
    /// Settings-file values win over the process environment; a JSON request
    /// from either source is honoured.
    pub fn with_overrides(mut self, json_format: bool, filter: Option<&str>) -> Self {
        self.json_format |= json_format;
        if let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) {
            self.default_filter = filter.to_string();
        }
        self
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "local".to_string()),
            json_format: std::env::var("LOG_FORMAT")
                .is_ok_and(|v| v.eq_ignore_ascii_case("json")),
            default_filter: DEFAULT_FILTER.to_string(),
        }
    }
}
