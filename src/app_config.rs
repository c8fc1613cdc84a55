use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// System instruction sent to the backend with every batch
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Backend connection settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Maximum number of concurrent chunk tasks
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Lines per translation chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Attempts per chunk before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Backend endpoint and credential settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackendConfig {
    // @field: Service URL (OpenAI-compatible, without /chat/completions)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Model name
    #[serde(default = "default_model")]
    pub model: String,

    // @field: Timeout seconds per backend call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: String::new(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching log crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_prompt() -> String {
    "You are a professional translator. Translate each numbered line and reply \
     with the translations only, keeping the exact numbering of the input, one \
     numbered line per entry, no commentary."
        .to_string()
}

fn default_endpoint() -> String {
    "http://localhost:8000/v1".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_timeout_secs() -> u64 {
    90
}

fn default_max_workers() -> usize {
    10
}

fn default_chunk_size() -> usize {
    500
}

fn default_max_retries() -> u32 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: default_prompt(),
            backend: BackendConfig::default(),
            max_workers: default_max_workers(),
            chunk_size: default_chunk_size(),
            max_retries: default_max_retries(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, creating a default file when the
    /// path does not exist yet.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            let config = Config::default();
            config.save(path)?;
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Write the configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.backend.endpoint.trim().is_empty() {
            return Err(anyhow!("Backend endpoint must not be empty"));
        }
        if self.chunk_size == 0 {
            return Err(anyhow!("chunk_size must be at least 1"));
        }
        if self.max_workers == 0 {
            return Err(anyhow!("max_workers must be at least 1"));
        }
        if self.max_retries == 0 {
            return Err(anyhow!("max_retries must be at least 1"));
        }
        if self.backend.timeout_secs == 0 {
            return Err(anyhow!("backend.timeout_secs must be at least 1"));
        }
        Ok(())
    }
}
