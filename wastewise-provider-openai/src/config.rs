//! Environment-based configuration for the OpenAI suggestion provider.
//!
//! The provider is optional: without `OPENAI_API_KEY` no configuration is
//! produced and the application runs on rule-based suggestions only.
//!
//! - `OPENAI_API_KEY`: credential, enables the provider
//! - `WASTEWISE_OPENAI_MODEL`: chat model (default `gpt-3.5-turbo`)
//! - `WASTEWISE_OPENAI_BASE_URL`: API root (default `https://api.openai.com/v1`)
//! - `WASTEWISE_PROVIDER_TIMEOUT_SECS`: request bound in seconds (default 5)

use std::env;
use std::fmt;
use std::time::Duration;

/// Variable holding the API credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Variable overriding the chat model.
pub const MODEL_VAR: &str = "WASTEWISE_OPENAI_MODEL";
/// Variable overriding the API root.
pub const BASE_URL_VAR: &str = "WASTEWISE_OPENAI_BASE_URL";
/// Variable overriding the request timeout.
pub const TIMEOUT_VAR: &str = "WASTEWISE_PROVIDER_TIMEOUT_SECS";

const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 5;
const MIN_TIMEOUT_SECS: u64 = 1;
const MAX_TIMEOUT_SECS: u64 = 60;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
/// Invalid provider configuration.
pub enum ConfigError {
    /// A numeric variable could not be parsed.
    #[error("Configuration error for {var}: '{value}' is not a valid number")]
    InvalidNumber {
        /// Offending variable.
        var: &'static str,
        /// Raw value.
        value: String,
    },
    /// A numeric variable is outside its allowed range.
    #[error("Configuration error for {var}: {value} is outside {min}..={max}")]
    OutOfRange {
        /// Offending variable.
        var: &'static str,
        /// Parsed value.
        value: u64,
        /// Smallest allowed value.
        min: u64,
        /// Largest allowed value.
        max: u64,
    },
}

#[derive(Clone)]
/// Settings for talking to the chat completions API.
pub struct OpenAiConfig {
    /// Bearer credential.
    pub api_key: String,
    /// Chat model name.
    pub model: String,
    /// API root without trailing slash.
    pub base_url: String,
    /// Upper bound for a whole request.
    pub timeout: Duration,
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("OpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAiConfig {
    /// Configuration with default model, endpoint, and timeout.
    #[must_use]
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read the configuration from the process environment.
    ///
    /// Returns `Ok(None)` when no API key is set.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the timeout variable is invalid.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which maps variable names to values.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the timeout variable is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let Some(api_key) = non_blank(API_KEY_VAR) else {
            return Ok(None);
        };

        let mut config = Self::new(api_key);

        if let Some(model) = non_blank(MODEL_VAR) {
            config.model = model;
        }
        if let Some(base_url) = non_blank(BASE_URL_VAR) {
            config.base_url = base_url.trim_end_matches('/').to_owned();
        }
        if let Some(raw) = non_blank(TIMEOUT_VAR) {
            config.timeout = Duration::from_secs(parse_timeout(&raw)?);
        }

        Ok(Some(config))
    }

    /// Full URL of the chat completions endpoint.
    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    let secs: u64 = raw.parse().map_err(|_err| ConfigError::InvalidNumber {
        var: TIMEOUT_VAR,
        value: raw.to_owned(),
    })?;

    if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&secs) {
        return Err(ConfigError::OutOfRange {
            var: TIMEOUT_VAR,
            value: secs,
            min: MIN_TIMEOUT_SECS,
            max: MAX_TIMEOUT_SECS,
        });
    }

    Ok(secs)
}
