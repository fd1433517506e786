//! Weighted, time-decayed lead scoring

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::types::{AudioAnalysisResult, LeadData, SearchRelevance, SentimentResult};

/// Per-signal weights on a 0-10 scale.
///
/// A weight of 0 excludes the signal entirely: it contributes to neither
/// the numerator nor the normalizing sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Call sentiment signal
    pub sentiment: u8,
    /// Web-presence signal
    pub presence: u8,
    /// Search relevance signal
    pub relevance: u8,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            sentiment: 4,
            presence: 3,
            relevance: 3,
        }
    }
}

/// Scoring configuration: weights plus the exponential discount applied to
/// older recordings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Signal weights
    pub weights: ScoringWeights,
    /// Discount factor in [0.1, 0.9]; the i-th most recent recording is
    /// scaled by `time_decay^i`
    pub time_decay: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            time_decay: 0.7,
        }
    }
}

impl ScoringConfig {
    /// Validate ranges, consuming and returning the config
    pub fn validated(self) -> Result<Self, ScoreError> {
        let w = &self.weights;
        for (name, value) in [
            ("sentiment", w.sentiment),
            ("presence", w.presence),
            ("relevance", w.relevance),
        ] {
            if value > 10 {
                return Err(ScoreError::WeightOutOfRange { name, value });
            }
        }
        if !(0.1..=0.9).contains(&self.time_decay) {
            return Err(ScoreError::DecayOutOfRange(self.time_decay));
        }
        Ok(self)
    }
}

/// Folds call-derived and search-derived signals into one composite score.
///
/// Recomputation is idempotent: the same lead state and config always
/// reproduce the same score.
#[derive(Debug, Clone)]
pub struct LeadScorer {
    config: ScoringConfig,
}

impl LeadScorer {
    /// Create a scorer from a validated config
    pub fn new(config: ScoringConfig) -> Result<Self, ScoreError> {
        Ok(Self {
            config: config.validated()?,
        })
    }

    /// Get the active config
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Merge new signals into the lead and recompute the composite score.
    ///
    /// A new analysis appends to the lead's recording sequence; a new search
    /// result overwrites the previous one.
    pub fn score(
        &self,
        mut lead: LeadData,
        new_audio: Option<AudioAnalysisResult>,
        new_search: Option<SearchRelevance>,
    ) -> LeadData {
        if let Some(analysis) = new_audio {
            lead.audios.push(analysis);
        }
        if let Some(search) = new_search {
            lead.osi.search = Some(search);
        }
        lead.overall_score = self.composite(&lead);
        lead
    }

    /// Recompute the composite score in place, without merging new signals
    pub fn rescore(&self, lead: &mut LeadData) {
        lead.overall_score = self.composite(lead);
    }

    /// Weighted combination over the active signals, `None` when no weighted
    /// signal has a value
    fn composite(&self, lead: &LeadData) -> Option<f64> {
        let weights = &self.config.weights;
        let mut weighted_sum = 0.0;
        let mut active_weight = 0.0;

        if weights.sentiment > 0 {
            if let Some(term) = self.sentiment_term(&lead.audios) {
                weighted_sum += f64::from(weights.sentiment) * term;
                active_weight += f64::from(weights.sentiment);
            }
        }

        if weights.relevance > 0 {
            if let Some(search) = &lead.osi.search {
                weighted_sum += f64::from(weights.relevance) * search.relevance_score;
                active_weight += f64::from(weights.relevance);
            }
        }

        if weights.presence > 0 {
            if let Some(presence) = lead.osi.web_presence {
                weighted_sum += f64::from(weights.presence) * presence;
                active_weight += f64::from(weights.presence);
            }
        }

        if active_weight == 0.0 {
            None
        } else {
            Some(weighted_sum / active_weight)
        }
    }

    /// Decay-weighted mean of per-recording sentiment signals.
    ///
    /// Recordings are ordered oldest-first; the most recent (i = 0) is
    /// undiscounted and each step back is scaled by `time_decay`. Dividing
    /// by the decay-weight sum keeps the term in [0, 1].
    fn sentiment_term(&self, audios: &[AudioAnalysisResult]) -> Option<f64> {
        if audios.is_empty() {
            return None;
        }

        let decay = self.config.time_decay;
        let mut signal_sum = 0.0;
        let mut decay_sum = 0.0;

        for (i, analysis) in audios.iter().rev().enumerate() {
            let scale = decay.powi(i as i32);
            signal_sum += sentiment_signal(&analysis.sentiment) * scale;
            decay_sum += scale;
        }

        Some(signal_sum / decay_sum)
    }
}

/// Numeric sentiment signal for one recording, in [0, 1].
///
/// Positive sentiment contributes its confidence, negative contributes the
/// complement, and neutral or unknown sentiment contributes 0.5 so the
/// provider-failure fallback is scoring-neutral.
fn sentiment_signal(sentiment: &SentimentResult) -> f64 {
    let signal = match sentiment.sentiment_type.to_ascii_lowercase().as_str() {
        "positive" => sentiment.confidence_score,
        "negative" => 1.0 - sentiment.confidence_score,
        _ => 0.5,
    };
    signal.clamp(0.0, 1.0)
}
