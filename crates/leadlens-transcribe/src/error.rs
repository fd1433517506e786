//! Transcription error types

use thiserror::Error;

/// Transcription-related errors
#[derive(Error, Debug)]
pub enum TranscribeError {
    /// Audio upload failed
    #[error("Audio upload failed: {0}")]
    UploadFailed(String),

    /// Speech-to-text call failed
    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    /// Invalid response from provider
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// Provider returned no transcript chunks
    #[error("Provider returned an empty transcript")]
    EmptyTranscript,

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Timeout
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for TranscribeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TranscribeError::Timeout
        } else if err.is_connect() {
            TranscribeError::ConnectionError(err.to_string())
        } else {
            TranscribeError::TranscriptionFailed(err.to_string())
        }
    }
}
