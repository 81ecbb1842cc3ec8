use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

/// Connection settings for the Gemini API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Google AI Studio API key (`GEMINI_API_KEY`).
    #[serde(default)]
    pub api_key: String,
    /// Model name, with or without the `models/` prefix.
    /// Env: `GEMINI_MODEL`. Default: `"gemini-2.5-flash-lite"`.
    #[serde(default = "default_model")]
    pub model: String,
    /// API root. Only overridden in tests.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request timeout. Env: `GEMINI_TIMEOUT_SECS`. Default: `60`.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Total attempts on 429 / 5xx / transport errors; `1` means no retry.
    /// Env: `GEMINI_RETRY_ATTEMPTS`. Default: `1`.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Model path segment as the REST API expects it (`models/<name>`).
    pub fn model_path(&self) -> String {
        let name = self.model.trim_start_matches("models/");
        format!("models/{}", name)
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            retry_attempts: default_retry_attempts(),
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_retry_attempts() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_path_adds_prefix() {
        let cfg = GeminiConfig::new("k");
        assert_eq!(cfg.model_path(), "models/gemini-2.5-flash-lite");
    }

    #[test]
    fn test_model_path_keeps_existing_prefix() {
        let cfg = GeminiConfig {
            model: "models/gemini-2.0-flash".to_string(),
            ..GeminiConfig::new("k")
        };
        assert_eq!(cfg.model_path(), "models/gemini-2.0-flash");
    }

    #[test]
    fn test_defaults() {
        let cfg = GeminiConfig::default();
        assert!(cfg.api_key.is_empty());
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout_secs, 60);
        assert_eq!(cfg.retry_attempts, 1);
    }

    #[test]
    fn test_partial_deserialize_fills_defaults() {
        let cfg: GeminiConfig = serde_json::from_str(r#"{"api_key":"abc"}"#).unwrap();
        assert_eq!(cfg.api_key, "abc");
        assert_eq!(cfg.model, DEFAULT_MODEL);
    }
}
