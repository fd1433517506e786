//! Web-search relevance integration for leadlens
//!
//! Runs a web search for a lead's company, extracts snippets, and derives a
//! relevance score, racing the whole exchange against a timeout. The client
//! is infallible by contract: timeout, provider failure, and malformed
//! payloads all degrade to the documented safe result.

pub mod client;
pub mod error;

pub use client::{
    SearchProvider, SearchRelevanceClient, SearchResponse, SearchResult, WebSearchProvider,
};
pub use error::SearchError;

// Re-export types from leadlens-core
pub use leadlens_core::SearchRelevance;
