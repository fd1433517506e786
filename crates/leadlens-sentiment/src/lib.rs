//! Sentiment integration for leadlens
//!
//! Wraps the sentiment capability provider behind a degrading client: a
//! provider failure yields the neutral Unknown/0.5 result, never an error.

pub mod client;
pub mod error;

pub use client::{EmotionApiProvider, SentimentClient, SentimentProvider};
pub use error::SentimentError;

// Re-export types from leadlens-core
pub use leadlens_core::SentimentResult;
