//! Sentiment error types

use thiserror::Error;

/// Sentiment-related errors
#[derive(Error, Debug)]
pub enum SentimentError {
    /// Provider reported an analysis failure
    #[error("Provider reported failure: {0}")]
    ProviderFailure(String),

    /// API request failed
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Invalid response from API
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Timeout
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for SentimentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SentimentError::Timeout
        } else if err.is_connect() {
            SentimentError::ConnectionError(err.to_string())
        } else {
            SentimentError::RequestFailed(err.to_string())
        }
    }
}
