//! Pipeline orchestration

use std::sync::RwLock;
use std::time::Duration;

use tracing::{info, warn};

use leadlens_core::{
    AudioAnalysisResult, LeadData, LeadRecordStore, LeadScorer, MemoryStore, ScoringConfig,
    SearchRelevance,
};
use leadlens_llm::{extract_actions, extract_topics, ChatProvider, CompletionProvider,
    EngagementAnalyzer};
use leadlens_search::{SearchProvider, SearchRelevanceClient, WebSearchProvider};
use leadlens_sentiment::{EmotionApiProvider, SentimentClient, SentimentProvider};
use leadlens_transcribe::{SpeechGatewayProvider, TranscribeProvider};

use crate::config::PipelineConfig;
use crate::error::PipelineError;

/// Lead signal aggregation and scoring pipeline.
///
/// Generic over the capability seams so tests can wire scripted providers.
/// Each scoring request snapshots the scoring configuration once at request
/// start; a concurrent `update_scoring` only affects later requests.
pub struct AnalysisPipeline<C, T, S, W, C2, R> {
    completion: C,
    transcriber: T,
    sentiment: SentimentClient<S>,
    search: SearchRelevanceClient<W, C2>,
    store: R,
    scorer: RwLock<LeadScorer>,
}

impl
    AnalysisPipeline<
        ChatProvider,
        SpeechGatewayProvider,
        EmotionApiProvider,
        WebSearchProvider,
        ChatProvider,
        MemoryStore,
    >
{
    /// Wire the default HTTP providers from a config, backed by an
    /// in-memory store
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let completion = ChatProvider::with_config(
            &config.completion.base_url,
            config.completion.api_key.clone(),
            &config.completion.model,
        );
        let relevance_completion = ChatProvider::with_config(
            &config.completion.base_url,
            config.completion.api_key.clone(),
            &config.completion.model,
        );

        Self::new(
            completion,
            SpeechGatewayProvider::new(
                &config.transcription.base_url,
                config.transcription.api_key.clone(),
            ),
            SentimentClient::new(EmotionApiProvider::new(
                &config.sentiment.base_url,
                config.sentiment.api_key.clone(),
            )),
            SearchRelevanceClient::new(
                WebSearchProvider::new(&config.search.base_url, config.search.api_key.clone()),
                relevance_completion,
            )
            .with_timeout(Duration::from_secs(config.search.timeout_secs)),
            MemoryStore::new(),
            config.scoring,
        )
    }
}

impl<C, T, S, W, C2, R> AnalysisPipeline<C, T, S, W, C2, R>
where
    C: CompletionProvider + Sync,
    T: TranscribeProvider + Sync,
    S: SentimentProvider + Sync,
    W: SearchProvider + Sync,
    C2: CompletionProvider + Sync,
    R: LeadRecordStore + Sync,
{
    /// Assemble a pipeline from already-built clients
    pub fn new(
        completion: C,
        transcriber: T,
        sentiment: SentimentClient<S>,
        search: SearchRelevanceClient<W, C2>,
        store: R,
        scoring: ScoringConfig,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            completion,
            transcriber,
            sentiment,
            search,
            store,
            scorer: RwLock::new(LeadScorer::new(scoring)?),
        })
    }

    /// Replace the scoring configuration.
    ///
    /// Takes effect for requests that start after this call returns;
    /// requests already in flight keep the snapshot they took.
    pub fn update_scoring(&self, scoring: ScoringConfig) -> Result<(), PipelineError> {
        let scorer = LeadScorer::new(scoring)?;
        *self.scorer.write().expect("scoring lock poisoned") = scorer;
        Ok(())
    }

    /// Get the current scoring configuration
    pub fn scoring(&self) -> ScoringConfig {
        *self.snapshot_scorer().config()
    }

    /// Analyze one recording: transcribe, then derive sentiment,
    /// engagement, topics, and actions concurrently.
    ///
    /// Transcription failure is fatal; every transcript-derived signal
    /// degrades independently to its documented fallback.
    pub async fn analyze_audio(
        &self,
        audio: &[u8],
        extension: &str,
    ) -> Result<AudioAnalysisResult, PipelineError> {
        let transcript = self.transcriber.transcribe(audio, extension).await?;
        let text = transcript.render();

        let engagement_analyzer = EngagementAnalyzer::new(&self.completion);
        let (sentiment, engagement, topics, actions) = tokio::join!(
            self.sentiment.sentiment(&text),
            engagement_analyzer.analyze(&text),
            extract_topics(&self.completion, &text),
            extract_actions(&self.completion, &text),
        );

        let result = AudioAnalysisResult::new(sentiment, engagement, topics, actions);
        info!(audio_id = %result.audio_id, topics = result.topics.len(), "Audio analysis complete");
        Ok(result)
    }

    /// Analyze a recording for a stored lead, fold it into the composite
    /// score, and persist best-effort.
    ///
    /// The analyzed and rescored lead is returned even when persistence
    /// fails; store write errors are logged and intentionally not
    /// propagated.
    pub async fn ingest_recording(
        &self,
        lead_id: &str,
        audio: &[u8],
        extension: &str,
    ) -> Result<LeadData, PipelineError> {
        let analysis = self.analyze_audio(audio, extension).await?;
        let scorer = self.snapshot_scorer();

        let lead = self
            .store
            .get(lead_id)
            .await?
            .ok_or_else(|| PipelineError::LeadNotFound(lead_id.to_string()))?;
        let scored = scorer.score(lead, Some(analysis.clone()), None);

        if let Err(err) = self.store.append_audio(lead_id, &analysis).await {
            warn!(%lead_id, "Failed to persist analysis row: {err}");
        }
        if let Err(err) = self.store.update_score(lead_id, scored.overall_score).await {
            warn!(%lead_id, "Failed to persist score: {err}");
        }

        Ok(scored)
    }

    /// Refresh a lead's search-derived relevance and rescore.
    ///
    /// Search never fails the request: timeout and provider errors surface
    /// as the degraded relevance result.
    pub async fn refresh_search(&self, lead_id: &str) -> Result<SearchRelevance, PipelineError> {
        let scorer = self.snapshot_scorer();

        let mut lead = self
            .store
            .get(lead_id)
            .await?
            .ok_or_else(|| PipelineError::LeadNotFound(lead_id.to_string()))?;

        let query = match &lead.osi.industry {
            Some(industry) => format!("{} {}", lead.name, industry),
            None => lead.name.clone(),
        };
        let relevance = self.search.search(&query).await;

        lead.osi.search = Some(relevance.clone());
        scorer.rescore(&mut lead);

        if let Err(err) = self.store.update_osi(lead_id, &lead.osi).await {
            warn!(%lead_id, "Failed to persist OSI fields: {err}");
        }
        if let Err(err) = self.store.update_score(lead_id, lead.overall_score).await {
            warn!(%lead_id, "Failed to persist score: {err}");
        }

        Ok(relevance)
    }

    /// Record a collaborator-supplied web-presence score and rescore
    pub async fn set_web_presence(
        &self,
        lead_id: &str,
        presence: f64,
    ) -> Result<LeadData, PipelineError> {
        let scorer = self.snapshot_scorer();

        let mut lead = self
            .store
            .get(lead_id)
            .await?
            .ok_or_else(|| PipelineError::LeadNotFound(lead_id.to_string()))?;

        lead.osi.web_presence = Some(presence.clamp(0.0, 1.0));
        scorer.rescore(&mut lead);

        if let Err(err) = self.store.update_osi(lead_id, &lead.osi).await {
            warn!(%lead_id, "Failed to persist OSI fields: {err}");
        }
        if let Err(err) = self.store.update_score(lead_id, lead.overall_score).await {
            warn!(%lead_id, "Failed to persist score: {err}");
        }

        Ok(lead)
    }

    /// Register a lead record
    pub async fn put_lead(&self, lead: &LeadData) -> Result<(), PipelineError> {
        Ok(self.store.put(lead).await?)
    }

    /// Fetch one lead
    pub async fn lead(&self, lead_id: &str) -> Result<Option<LeadData>, PipelineError> {
        Ok(self.store.get(lead_id).await?)
    }

    /// Fetch several leads; missing ids are skipped
    pub async fn leads(&self, lead_ids: &[String]) -> Result<Vec<LeadData>, PipelineError> {
        Ok(self.store.get_many(lead_ids).await?)
    }

    /// Snapshot the scorer under one lock read
    fn snapshot_scorer(&self) -> LeadScorer {
        self.scorer.read().expect("scoring lock poisoned").clone()
    }
}
