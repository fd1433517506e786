//! Pipeline error types

use thiserror::Error;

use leadlens_core::{ScoreError, StoreError};
use leadlens_transcribe::TranscribeError;

/// Pipeline-level errors.
///
/// Only the fatal-to-request classes appear here: transcription failure,
/// missing leads, store read failures, and invalid scoring configuration.
/// Degradable signal failures never surface as errors.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Transcription failed; nothing downstream is computable
    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscribeError),

    /// Lead is not present in the record store
    #[error("Lead not found: {0}")]
    LeadNotFound(String),

    /// Record store read failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Rejected scoring configuration
    #[error("Invalid scoring configuration: {0}")]
    Scoring(#[from] ScoreError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is unset
    #[error("Missing environment variable: {0}")]
    MissingVar(&'static str),

    /// Environment variable holds an unusable value
    #[error("Invalid value for {var}: {value}")]
    InvalidVar {
        /// Variable name
        var: &'static str,
        /// Rejected value
        value: String,
    },
}
