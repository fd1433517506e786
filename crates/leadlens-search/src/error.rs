//! Search error types

use thiserror::Error;

/// Search-related errors.
///
/// These never escape `SearchRelevanceClient::search`; they exist so the
/// degrade decision happens in exactly one place.
#[derive(Error, Debug)]
pub enum SearchError {
    /// API request failed
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Invalid response from API
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Provider returned no results
    #[error("Search returned no results")]
    NoResults,

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Timeout
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SearchError::Timeout
        } else if err.is_connect() {
            SearchError::ConnectionError(err.to_string())
        } else {
            SearchError::RequestFailed(err.to_string())
        }
    }
}
