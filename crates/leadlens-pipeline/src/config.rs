//! Pipeline configuration
//!
//! Explicit configuration structs injected into each client at construction
//! time. Provider credentials and endpoints are supplied at process start
//! and are not hot-reloadable; only the scoring configuration has a runtime
//! update path.

use secrecy::SecretString;
use serde::Deserialize;

use leadlens_core::ScoringConfig;

use crate::error::ConfigError;

/// Chat-completion capability settings
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    /// API base URL
    pub base_url: String,
    /// API key
    pub api_key: SecretString,
    /// Model identifier
    pub model: String,
}

/// Speech-to-text capability settings
#[derive(Debug, Clone, Deserialize)]
pub struct TranscribeConfig {
    /// Gateway base URL
    pub base_url: String,
    /// API key
    pub api_key: SecretString,
}

/// Sentiment capability settings
#[derive(Debug, Clone, Deserialize)]
pub struct SentimentConfig {
    /// API base URL
    pub base_url: String,
    /// API key
    pub api_key: SecretString,
}

/// Web-search capability settings
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// API base URL
    pub base_url: String,
    /// API key
    pub api_key: SecretString,
    /// Race timeout for the whole search exchange
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

fn default_search_timeout() -> u64 {
    15
}

/// Full pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Completion provider
    pub completion: CompletionConfig,
    /// Transcription provider
    pub transcription: TranscribeConfig,
    /// Sentiment provider
    pub sentiment: SentimentConfig,
    /// Search provider
    pub search: SearchConfig,
    /// Initial scoring configuration
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl PipelineConfig {
    /// Read configuration from `LEADLENS_*` environment variables.
    ///
    /// Scoring starts from its documented defaults; use
    /// `AnalysisPipeline::update_scoring` to change it at runtime.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            completion: CompletionConfig {
                base_url: require("LEADLENS_COMPLETION_URL")?,
                api_key: require("LEADLENS_COMPLETION_KEY")?.into(),
                model: require("LEADLENS_COMPLETION_MODEL")?,
            },
            transcription: TranscribeConfig {
                base_url: require("LEADLENS_TRANSCRIBE_URL")?,
                api_key: require("LEADLENS_TRANSCRIBE_KEY")?.into(),
            },
            sentiment: SentimentConfig {
                base_url: require("LEADLENS_SENTIMENT_URL")?,
                api_key: require("LEADLENS_SENTIMENT_KEY")?.into(),
            },
            search: SearchConfig {
                base_url: require("LEADLENS_SEARCH_URL")?,
                api_key: require("LEADLENS_SEARCH_KEY")?.into(),
                timeout_secs: optional_u64("LEADLENS_SEARCH_TIMEOUT_SECS", 15)?,
            },
            scoring: ScoringConfig::default(),
        })
    }
}

fn require(var: &'static str) -> Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::MissingVar(var))
}

fn optional_u64(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidVar { var, value }),
        Err(_) => Ok(default),
    }
}
