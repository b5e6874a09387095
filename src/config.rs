use std::path::PathBuf;
use std::time::Duration;

use eyre::{Result, bail};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::summarize::{DEFAULT_API_BASE, DEFAULT_MODEL, RetryPolicy};

pub const API_KEY_ENV: &str = "GROQ_API_KEY";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub default_lang: Option<String>,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub max_transcript_chars: Option<usize>,
    pub max_chunk_chars: Option<usize>,
    pub max_concurrency: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub call_timeout_secs: Option<u64>,
    pub retry_max_attempts: Option<u32>,
    pub retry_base_delay_ms: Option<u64>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub cookies_path: Option<PathBuf>,
}

impl Config {
    /// Load config from ~/.config/vidsum/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    /// Fill unset values with defaults
    pub fn resolve(&self) -> Result<Settings> {
        let defaults = Settings::default();
        let settings = Settings {
            default_lang: self.default_lang.clone().unwrap_or(defaults.default_lang),
            model: self.model.clone().unwrap_or(defaults.model),
            api_base: self.api_base.clone().unwrap_or(defaults.api_base),
            max_transcript_chars: self.max_transcript_chars.unwrap_or(defaults.max_transcript_chars),
            max_chunk_chars: self.max_chunk_chars.unwrap_or(defaults.max_chunk_chars),
            max_concurrency: self.max_concurrency.unwrap_or(defaults.max_concurrency),
            request_timeout: self
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            call_timeout: self
                .call_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.call_timeout),
            retry: RetryPolicy {
                max_attempts: self.retry_max_attempts.unwrap_or(defaults.retry.max_attempts),
                base_delay: self
                    .retry_base_delay_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.retry.base_delay),
                retryable: defaults.retry.retryable,
            },
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            cookies_path: self.cookies_path.clone(),
        };
        settings.validate()?;
        Ok(settings)
    }
}

/// Resolved, read-only settings shared by every request
#[derive(Debug, Clone)]
pub struct Settings {
    pub default_lang: String,
    pub model: String,
    pub api_base: String,
    pub max_transcript_chars: usize,
    pub max_chunk_chars: usize,
    pub max_concurrency: usize,
    pub request_timeout: Duration,
    pub call_timeout: Duration,
    pub retry: RetryPolicy,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Netscape cookies.txt sent with caption requests
    pub cookies_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_lang: "en".to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            max_transcript_chars: 200_000,
            max_chunk_chars: 7_000,
            max_concurrency: 4,
            request_timeout: Duration::from_secs(120),
            call_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            temperature: 0.7,
            max_tokens: 8000,
            cookies_path: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.max_chunk_chars == 0 {
            bail!("max_chunk_chars must be greater than zero");
        }
        if self.max_transcript_chars == 0 {
            bail!("max_transcript_chars must be greater than zero");
        }
        if self.max_concurrency == 0 {
            bail!("max_concurrency must be greater than zero");
        }
        if self.retry.max_attempts == 0 {
            bail!("retry_max_attempts must be at least 1");
        }
        if self.request_timeout.is_zero() || self.call_timeout.is_zero() {
            bail!("timeouts must be greater than zero");
        }
        Ok(())
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("vidsum")
        .join("config.toml")
}

/// Model API key from the environment, after loading any `.env` file
pub fn api_key() -> Result<String> {
    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded environment from {}", path.display());
    }
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => bail!("{API_KEY_ENV} environment variable not set (required for summarization)"),
    }
}
