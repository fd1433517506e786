//! leadlens-pipeline - lead signal aggregation and scoring
//!
//! Orchestrates the full flow: transcribe a recorded call, fan out the
//! transcript analyses concurrently, assemble the per-recording analysis
//! record, fold it into the lead's composite score, and persist best-effort.

pub mod config;
pub mod error;
pub mod service;

pub use config::{
    CompletionConfig, PipelineConfig, SearchConfig, SentimentConfig, TranscribeConfig,
};
pub use error::{ConfigError, PipelineError};
pub use service::AnalysisPipeline;
