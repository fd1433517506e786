//! Speech-to-text integration for leadlens
//!
//! Uploads call audio to a storage capability and turns the provider's
//! timestamped chunks into a `Transcript`. Transcription is the one
//! fatal-to-request stage: every downstream signal depends on the
//! transcript, so failures here propagate instead of degrading.

pub mod error;
pub mod provider;

pub use error::TranscribeError;
pub use provider::{SpeechGatewayProvider, TranscribeProvider};

// Re-export types from leadlens-core
pub use leadlens_core::{Transcript, TranscriptSegment};
