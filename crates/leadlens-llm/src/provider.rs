//! Completion provider trait

use tracing::warn;

use crate::error::LlmError;

/// Chat-completion capability provider.
///
/// One prompt in, raw text out. Single attempt per call; retry policy is the
/// caller's concern.
#[trait_variant::make(CompletionProvider: Send)]
pub trait LocalCompletionProvider {
    /// Send a prompt and return the raw completion text
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Check if provider is reachable
    async fn is_available(&self) -> bool;

    /// Get provider name
    fn name(&self) -> &'static str;

    /// Get model name
    fn model(&self) -> &str;
}

/// Run a completion, mapping any failure to `None`.
///
/// This is the degrade-to-default boundary for every completion-derived
/// signal: callers substitute their documented fallback on `None` and the
/// error never propagates past this point.
pub async fn try_complete<P>(provider: &P, prompt: &str) -> Option<String>
where
    P: CompletionProvider + Sync,
{
    match provider.complete(prompt).await {
        Ok(text) => Some(text),
        Err(err) => {
            warn!(provider = provider.name(), "Completion failed, using fallback: {err}");
            None
        }
    }
}
