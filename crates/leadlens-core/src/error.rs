//! Core error types

use thiserror::Error;

/// Scoring configuration errors
#[derive(Error, Debug)]
pub enum ScoreError {
    /// Weight outside the 0-10 scale
    #[error("Weight '{name}' out of range: {value} (expected 0-10)")]
    WeightOutOfRange {
        /// Weight field name
        name: &'static str,
        /// Rejected value
        value: u8,
    },

    /// Time decay outside [0.1, 0.9]
    #[error("Time decay out of range: {0} (expected 0.1-0.9)")]
    DecayOutOfRange(f64),
}

/// Lead record store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Lead not present in the store
    #[error("Lead not found: {0}")]
    NotFound(String),

    /// Backend failure
    #[error("Store backend error: {0}")]
    Backend(String),
}
