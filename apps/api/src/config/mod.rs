use crate::error::{ApiError, Result};
use serde::Deserialize;
use std::fmt;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ALADIN_BASE_URL: &str = "http://www.aladin.co.kr/ttb/api";
pub const DEFAULT_ALADIN_MAX_RESULTS: u32 = 5;
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Keys as they arrive from the environment source (lowercased, all strings).
#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    aladin_ttbkey: Option<String>,
    genai_api_key: Option<String>,
    host: Option<String>,
    port: Option<String>,
    aladin_base_url: Option<String>,
    aladin_max_results: Option<String>,
    gemini_base_url: Option<String>,
    gemini_model: Option<String>,
}

/// Process-wide settings, built once at startup and handed to the clients.
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub aladin_ttbkey: String,
    pub aladin_base_url: String,
    pub aladin_max_results: u32,
    pub genai_api_key: String,
    pub gemini_base_url: String,
    pub gemini_model: String,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Fails with [`ApiError::ConfigurationMissing`] when either provider
    /// credential is absent, so the server never starts half-configured.
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        Self::from_settings(settings)
    }

    /// Build from an already assembled `config::Config`.
    pub fn from_settings(settings: config::Config) -> Result<Self> {
        let raw: RawSettings = settings.try_deserialize()?;

        let port = match non_blank(raw.port) {
            Some(port) => port
                .parse::<u16>()
                .map_err(|_| ApiError::InvalidConfiguration(format!("PORT={port}")))?,
            None => DEFAULT_PORT,
        };

        let aladin_max_results = match non_blank(raw.aladin_max_results) {
            Some(value) => match value.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ApiError::InvalidConfiguration(format!(
                        "ALADIN_MAX_RESULTS={value}"
                    )))
                }
            },
            None => DEFAULT_ALADIN_MAX_RESULTS,
        };

        Ok(Self {
            host: non_blank(raw.host).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            aladin_ttbkey: require(raw.aladin_ttbkey, "ALADIN_TTBKEY")?,
            aladin_base_url: base_url(raw.aladin_base_url, DEFAULT_ALADIN_BASE_URL),
            aladin_max_results,
            genai_api_key: require(raw.genai_api_key, "GENAI_API_KEY")?,
            gemini_base_url: base_url(raw.gemini_base_url, DEFAULT_GEMINI_BASE_URL),
            gemini_model: non_blank(raw.gemini_model)
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("aladin_ttbkey", &"<redacted>")
            .field("aladin_base_url", &self.aladin_base_url)
            .field("aladin_max_results", &self.aladin_max_results)
            .field("genai_api_key", &"<redacted>")
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_model", &self.gemini_model)
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require(value: Option<String>, name: &str) -> Result<String> {
    non_blank(value).ok_or_else(|| ApiError::ConfigurationMissing(name.to_string()))
}

fn base_url(value: Option<String>, default: &str) -> String {
    non_blank(value)
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> config::Config {
        pairs
            .iter()
            .fold(config::Config::builder(), |builder, (key, value)| {
                builder.set_override(*key, *value).unwrap()
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_defaults_applied_when_only_credentials_set() {
        let config = Config::from_settings(settings(&[
            ("aladin_ttbkey", "ttb-key"),
            ("genai_api_key", "genai-key"),
        ]))
        .unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.aladin_max_results, 5);
        assert_eq!(config.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.aladin_base_url, DEFAULT_ALADIN_BASE_URL);
    }

    #[test]
    fn test_missing_search_key_fails_fast() {
        let err = Config::from_settings(settings(&[("genai_api_key", "genai-key")])).unwrap_err();
        assert!(matches!(err, ApiError::ConfigurationMissing(ref name) if name == "ALADIN_TTBKEY"));
    }

    #[test]
    fn test_blank_ai_key_counts_as_missing() {
        let err = Config::from_settings(settings(&[
            ("aladin_ttbkey", "ttb-key"),
            ("genai_api_key", "   "),
        ]))
        .unwrap_err();
        assert!(matches!(err, ApiError::ConfigurationMissing(ref name) if name == "GENAI_API_KEY"));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = Config::from_settings(settings(&[
            ("aladin_ttbkey", "ttb-key"),
            ("genai_api_key", "genai-key"),
            ("port", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_zero_max_results_rejected() {
        let err = Config::from_settings(settings(&[
            ("aladin_ttbkey", "ttb-key"),
            ("genai_api_key", "genai-key"),
            ("aladin_max_results", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_base_urls_lose_trailing_slash() {
        let config = Config::from_settings(settings(&[
            ("aladin_ttbkey", "ttb-key"),
            ("genai_api_key", "genai-key"),
            ("aladin_base_url", "http://localhost:9000/ttb/api/"),
            ("gemini_base_url", "http://localhost:9001/"),
        ]))
        .unwrap();

        assert_eq!(config.aladin_base_url, "http://localhost:9000/ttb/api");
        assert_eq!(config.gemini_base_url, "http://localhost:9001");
    }

    #[test]
    fn test_debug_output_redacts_credentials() {
        let config = Config::from_settings(settings(&[
            ("aladin_ttbkey", "secret-ttb"),
            ("genai_api_key", "secret-genai"),
        ]))
        .unwrap();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-ttb"));
        assert!(!debug.contains("secret-genai"));
    }
}
