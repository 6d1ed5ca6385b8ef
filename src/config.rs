use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "labscore";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Retrieval service defaults
pub const DEFAULT_RAG_API_URL: &str = "http://localhost:8001";
pub const DEFAULT_RAG_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_RAG_MAX_RESULTS: u32 = 5;

/// Environment variable naming an alternate resources directory for the
/// range catalog.
pub const RESOURCES_DIR_ENV: &str = "LABSCORE_RESOURCES_DIR";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "labscore=info,warn"
}

/// Settings for the retrieval-augmented enhancement step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancementConfig {
    /// `RAG_ENABLED`; when false enhancement is skipped entirely.
    pub enabled: bool,
    /// `RAG_API_URL`, without trailing slash.
    pub api_url: String,
    /// `RAG_TIMEOUT` in milliseconds, applied to each query independently.
    pub timeout: Duration,
    /// `RAG_MAX_RESULTS`, sent as `max_results` on every query.
    pub max_results: u32,
}

impl Default for EnhancementConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: DEFAULT_RAG_API_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_RAG_TIMEOUT_MS),
            max_results: DEFAULT_RAG_MAX_RESULTS,
        }
    }
}

impl EnhancementConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unparseable values fall back to their defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let enabled = match lookup("RAG_ENABLED") {
            Some(raw) => parse_bool(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Invalid RAG_ENABLED, using default");
                defaults.enabled
            }),
            None => defaults.enabled,
        };

        let api_url = lookup("RAG_API_URL")
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or(defaults.api_url);

        let timeout = match lookup("RAG_TIMEOUT") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    tracing::warn!(value = %raw, "Invalid RAG_TIMEOUT, using default");
                    defaults.timeout
                }
            },
            None => defaults.timeout,
        };

        let max_results = match lookup("RAG_MAX_RESULTS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    tracing::warn!(value = %raw, "Invalid RAG_MAX_RESULTS, using default");
                    defaults.max_results
                }
            },
            None => defaults.max_results,
        };

        Self {
            enabled,
            api_url,
            timeout,
            max_results,
        }
    }

    /// Timeout in whole milliseconds, for logging and error messages.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
