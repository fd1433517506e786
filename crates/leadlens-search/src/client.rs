//! Web-search provider and relevance client

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use leadlens_core::SearchRelevance;
use leadlens_llm::{parse, prompts, try_complete, CompletionProvider};

use crate::error::SearchError;

/// Default race timeout for the whole search exchange
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Maximum snippets folded into the overview
const MAX_SNIPPETS: usize = 5;

/// One web search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title
    pub title: String,
    /// Result snippet text
    pub snippet: String,
    /// Result URL
    pub url: Option<String>,
}

/// Raw search provider payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Ranked results
    #[serde(default)]
    pub results: Vec<SearchResult>,
    /// Provider-computed relevance in [0, 1], when offered
    #[serde(default)]
    pub relevance: Option<f64>,
    /// Provider overview text, when offered
    #[serde(default)]
    pub overview: Option<String>,
    /// Safe-search verdict
    #[serde(default)]
    pub is_safe: Option<bool>,
}

/// Web-search capability provider
#[trait_variant::make(SearchProvider: Send)]
pub trait LocalSearchProvider {
    /// Run one search query
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError>;

    /// Get provider name
    fn name(&self) -> &'static str;
}

/// HTTP web-search provider with safety and spell-check enabled
pub struct WebSearchProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl WebSearchProvider {
    /// Create a provider against a search endpoint
    pub fn new(base_url: &str, api_key: SecretString) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

impl SearchProvider for WebSearchProvider {
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let url = format!("{}/search", self.base_url);

        let request = SearchRequest {
            q: query,
            ai_overview: true,
            safe_search: true,
            spell_check: true,
        };

        debug!(%query, "Sending web search request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SearchError::RequestFailed(format!("{}: {}", status, error_text)));
        }

        response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "web-search"
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    ai_overview: bool,
    safe_search: bool,
    spell_check: bool,
}

/// Derives company relevance from web search, degrading on any failure.
///
/// The search exchange races a timeout; if the timeout wins the in-flight
/// call is abandoned and the degraded result is returned. The pipeline never
/// fails a scoring request because search misbehaved.
pub struct SearchRelevanceClient<P, C> {
    provider: P,
    completion: C,
    timeout: Duration,
}

impl<P, C> SearchRelevanceClient<P, C>
where
    P: SearchProvider + Sync,
    C: CompletionProvider + Sync,
{
    /// Create a client with the default 15-second timeout
    pub fn new(provider: P, completion: C) -> Self {
        Self {
            provider,
            completion,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the race timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Search for a company and derive relevance, never failing
    pub async fn search(&self, query: &str) -> SearchRelevance {
        match tokio::time::timeout(self.timeout, self.run(query)).await {
            Ok(Ok(relevance)) => relevance,
            Ok(Err(err)) => {
                warn!(provider = self.provider.name(), "Search failed, degrading: {err}");
                SearchRelevance::degraded()
            }
            Err(_) => {
                warn!(
                    provider = self.provider.name(),
                    timeout_secs = self.timeout.as_secs(),
                    "Search timed out, degrading"
                );
                SearchRelevance::degraded()
            }
        }
    }

    async fn run(&self, query: &str) -> Result<SearchRelevance, SearchError> {
        let response = self.provider.search(query).await?;

        if response.results.is_empty() && response.overview.is_none() {
            return Err(SearchError::NoResults);
        }

        let snippets = response
            .results
            .iter()
            .take(MAX_SNIPPETS)
            .map(|r| r.snippet.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let overview = match response.overview {
            Some(text) if !text.is_empty() => text,
            _ => snippets.clone(),
        };

        let relevance_score = match response.relevance {
            Some(score) => score.clamp(0.0, 1.0),
            None => {
                let raw =
                    try_complete(&self.completion, &prompts::relevance_prompt(&snippets)).await;
                parse::parse_relevance_score(raw.as_deref())
            }
        };

        let company_website = response.results.iter().find_map(|r| r.url.clone());

        Ok(SearchRelevance {
            overview,
            relevance_score,
            company_website,
            is_safe: response.is_safe.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadlens_llm::LlmError;

    struct FakeSearchProvider {
        response: SearchResponse,
        delay: Option<Duration>,
        fail: bool,
    }

    impl FakeSearchProvider {
        fn returning(response: SearchResponse) -> Self {
            Self {
                response,
                delay: None,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                response: SearchResponse::default(),
                delay: None,
                fail: true,
            }
        }

        fn slow(response: SearchResponse, delay: Duration) -> Self {
            Self {
                response,
                delay: Some(delay),
                fail: false,
            }
        }
    }

    impl SearchProvider for FakeSearchProvider {
        async fn search(&self, _query: &str) -> Result<SearchResponse, SearchError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(SearchError::RequestFailed("scripted".to_string()));
            }
            Ok(self.response.clone())
        }

        fn name(&self) -> &'static str {
            "fake"
        }
    }

    struct FixedCompletion(Option<&'static str>);

    impl CompletionProvider for FixedCompletion {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            match self.0 {
                Some(text) => Ok(text.to_string()),
                None => Err(LlmError::RequestFailed("scripted".to_string())),
            }
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn name(&self) -> &'static str {
            "fixed"
        }

        fn model(&self) -> &str {
            "fixed"
        }
    }

    fn results(n: usize) -> Vec<SearchResult> {
        (0..n)
            .map(|i| SearchResult {
                title: format!("result {i}"),
                snippet: format!("snippet {i}"),
                url: Some(format!("https://example.com/{i}")),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_provider_relevance_used_directly() {
        let client = SearchRelevanceClient::new(
            FakeSearchProvider::returning(SearchResponse {
                results: results(2),
                relevance: Some(0.8),
                overview: None,
                is_safe: Some(true),
            }),
            FixedCompletion(None),
        );

        let relevance = client.search("Acme Corp").await;
        assert_eq!(relevance.relevance_score, 0.8);
        assert_eq!(relevance.overview, "snippet 0\nsnippet 1");
        assert_eq!(relevance.company_website.as_deref(), Some("https://example.com/0"));
        assert!(relevance.is_safe);
    }

    #[tokio::test]
    async fn test_secondary_completion_scores_relevance() {
        let client = SearchRelevanceClient::new(
            FakeSearchProvider::returning(SearchResponse {
                results: results(1),
                relevance: None,
                overview: None,
                is_safe: None,
            }),
            FixedCompletion(Some("```json\n{\"relevanceScore\":0.7}\n```")),
        );

        let relevance = client.search("Acme Corp").await;
        assert_eq!(relevance.relevance_score, 0.7);
    }

    #[tokio::test]
    async fn test_failed_secondary_completion_falls_back_to_half() {
        let client = SearchRelevanceClient::new(
            FakeSearchProvider::returning(SearchResponse {
                results: results(1),
                relevance: None,
                overview: None,
                is_safe: None,
            }),
            FixedCompletion(None),
        );

        let relevance = client.search("Acme Corp").await;
        assert_eq!(relevance.relevance_score, 0.5);
    }

    #[tokio::test]
    async fn test_snippets_capped_at_five() {
        let client = SearchRelevanceClient::new(
            FakeSearchProvider::returning(SearchResponse {
                results: results(8),
                relevance: Some(0.5),
                overview: None,
                is_safe: None,
            }),
            FixedCompletion(None),
        );

        let relevance = client.search("Acme Corp").await;
        assert_eq!(relevance.overview.lines().count(), 5);
    }

    #[tokio::test]
    async fn test_provider_failure_degrades() {
        let client =
            SearchRelevanceClient::new(FakeSearchProvider::failing(), FixedCompletion(None));
        let relevance = client.search("Acme Corp").await;
        assert_eq!(relevance, SearchRelevance::degraded());
    }

    #[tokio::test]
    async fn test_empty_results_degrade() {
        let client = SearchRelevanceClient::new(
            FakeSearchProvider::returning(SearchResponse::default()),
            FixedCompletion(None),
        );
        let relevance = client.search("Acme Corp").await;
        assert_eq!(relevance, SearchRelevance::degraded());
    }

    #[tokio::test]
    async fn test_timeout_wins_race() {
        let client = SearchRelevanceClient::new(
            FakeSearchProvider::slow(
                SearchResponse {
                    results: results(1),
                    relevance: Some(0.9),
                    overview: None,
                    is_safe: Some(false),
                },
                Duration::from_secs(30),
            ),
            FixedCompletion(None),
        )
        .with_timeout(Duration::from_millis(20));

        let relevance = client.search("Acme Corp").await;
        // Partial data from the abandoned call never leaks through.
        assert_eq!(relevance.relevance_score, 0.5);
        assert!(relevance.is_safe);
        assert_eq!(relevance, SearchRelevance::degraded());
    }
}
