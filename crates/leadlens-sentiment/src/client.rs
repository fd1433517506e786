//! Sentiment provider and degrading client

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};

use leadlens_core::SentimentResult;

use crate::error::SentimentError;

/// Provider input-size limit, in characters
const MAX_INPUT_CHARS: usize = 2000;

/// Wire-format response from the sentiment endpoint
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SentimentResponse {
    emotion: Option<String>,
    sentiment_type: Option<String>,
    confidence_score: Option<f64>,
    error: Option<String>,
}

/// Sentiment capability provider: raw text in, emotion label plus
/// confidence out
#[trait_variant::make(SentimentProvider: Send)]
pub trait LocalSentimentProvider {
    /// Analyze the sentiment of a text
    async fn sentiment(&self, text: &str) -> Result<SentimentResult, SentimentError>;

    /// Check if provider is reachable
    async fn is_available(&self) -> bool;

    /// Get provider name
    fn name(&self) -> &'static str;
}

/// HTTP sentiment provider
pub struct EmotionApiProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl EmotionApiProvider {
    /// Create a provider against a sentiment endpoint
    pub fn new(base_url: &str, api_key: SecretString) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

impl SentimentProvider for EmotionApiProvider {
    async fn sentiment(&self, text: &str) -> Result<SentimentResult, SentimentError> {
        let url = format!("{}/sentiment", self.base_url);

        debug!(chars = text.len(), "Requesting sentiment analysis");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SentimentError::RequestFailed(format!("{}: {}", status, error_text)));
        }

        let body: SentimentResponse = response
            .json()
            .await
            .map_err(|e| SentimentError::InvalidResponse(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(SentimentError::ProviderFailure(error));
        }

        match (body.emotion, body.confidence_score) {
            (Some(emotion), Some(confidence_score)) => Ok(SentimentResult {
                emotion,
                sentiment_type: body.sentiment_type.unwrap_or_else(|| "Neutral".to_string()),
                confidence_score: confidence_score.clamp(0.0, 1.0),
            }),
            _ => Err(SentimentError::InvalidResponse(
                "Missing emotion or confidence".to_string(),
            )),
        }
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        self.client
            .get(&url)
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "emotion-api"
    }
}

/// Degrading sentiment client.
///
/// Truncates the transcript to the provider's input limit and substitutes
/// the neutral Unknown/0.5 result on any provider failure.
pub struct SentimentClient<P> {
    provider: P,
}

impl<P> SentimentClient<P>
where
    P: SentimentProvider + Sync,
{
    /// Wrap a sentiment provider
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Analyze a rendered transcript, never failing
    pub async fn sentiment(&self, transcript: &str) -> SentimentResult {
        let text = truncate_chars(transcript, MAX_INPUT_CHARS);
        match self.provider.sentiment(text).await {
            Ok(result) => result,
            Err(err) => {
                warn!(provider = self.provider.name(), "Sentiment failed, using fallback: {err}");
                SentimentResult::unknown()
            }
        }
    }
}

/// Truncate to at most `max_chars` characters on a char boundary
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSentimentProvider(Result<SentimentResult, ()>);

    impl SentimentProvider for FixedSentimentProvider {
        async fn sentiment(&self, _text: &str) -> Result<SentimentResult, SentimentError> {
            self.0
                .clone()
                .map_err(|_| SentimentError::ProviderFailure("scripted".to_string()))
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    /// Provider that records the text length it receives
    struct LengthCheckProvider {
        max_seen: std::sync::Mutex<usize>,
    }

    impl SentimentProvider for LengthCheckProvider {
        async fn sentiment(&self, text: &str) -> Result<SentimentResult, SentimentError> {
            *self.max_seen.lock().unwrap() = text.chars().count();
            Ok(SentimentResult::unknown())
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn name(&self) -> &'static str {
            "length-check"
        }
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // Multibyte input truncates on a char boundary, not mid-codepoint.
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let expected = SentimentResult {
            emotion: "Joy".to_string(),
            sentiment_type: "Positive".to_string(),
            confidence_score: 0.9,
        };
        let client = SentimentClient::new(FixedSentimentProvider(Ok(expected.clone())));
        assert_eq!(client.sentiment("great call").await, expected);
    }

    #[tokio::test]
    async fn test_failure_degrades_to_unknown() {
        let client = SentimentClient::new(FixedSentimentProvider(Err(())));
        assert_eq!(client.sentiment("any").await, SentimentResult::unknown());
    }

    #[tokio::test]
    async fn test_input_truncated_to_limit() {
        let provider = LengthCheckProvider {
            max_seen: std::sync::Mutex::new(0),
        };
        let long_input = "x".repeat(MAX_INPUT_CHARS + 500);
        let client = SentimentClient::new(provider);
        client.sentiment(&long_input).await;
        assert_eq!(*client.provider.max_seen.lock().unwrap(), MAX_INPUT_CHARS);
    }
}
