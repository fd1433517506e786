//! Shared domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Single timestamped utterance in a call transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Speaker label, if the provider returned one
    pub speaker: Option<String>,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Utterance text
    pub text: String,
}

/// Timestamped transcript of a recorded call.
///
/// Immutable once produced; every downstream analyzer consumes the rendered
/// text form. Only derived metrics are ever persisted, never the transcript
/// itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    /// Utterances in chronological order
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    /// Create a transcript from ordered segments
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        Self { segments }
    }

    /// Render as prompt-embeddable text, one `{start} - {end}s: {text}` line
    /// per segment
    pub fn render(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("{} - {}s: {}", s.start, s.end, s.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether the transcript contains no utterances
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Emotion label and confidence derived from a transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Dominant emotion label (e.g. "Joy", "Frustration")
    pub emotion: String,
    /// Coarse polarity ("Positive", "Negative", "Neutral")
    pub sentiment_type: String,
    /// Provider confidence in [0, 1]
    pub confidence_score: f64,
}

impl SentimentResult {
    /// Neutral fallback used when the sentiment provider fails.
    ///
    /// A valid result, not an error: scoring treats it as a 0.5 signal.
    pub fn unknown() -> Self {
        Self {
            emotion: "Unknown".to_string(),
            sentiment_type: "Unknown".to_string(),
            confidence_score: 0.5,
        }
    }
}

/// Conversational dynamics metrics for one recording.
///
/// Each field falls back independently when its sub-analysis fails; the
/// `Default` value is the shape produced when every sub-call fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    /// Ratio of rep talk time to prospect talk time
    pub talk_to_listen_ratio: f64,
    /// Number of speaker turns
    pub turn_taking_frequency: u32,
    /// Count of overtalk events
    pub interruptions: u32,
    /// Speech pace rating, 1 (slow) to 5 (fast)
    pub speech_pace: u8,
}

impl Default for EngagementMetrics {
    fn default() -> Self {
        Self {
            talk_to_listen_ratio: 1.0,
            turn_taking_frequency: 1,
            interruptions: 0,
            speech_pace: 1,
        }
    }
}

/// Next-step recommendation drawn from a fixed vocabulary.
///
/// Parsing is the enforcement point: model output that does not match one of
/// the five phrases never constructs a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionItem {
    #[serde(rename = "Qualify the lead")]
    QualifyLead,
    #[serde(rename = "Research the company")]
    ResearchCompany,
    #[serde(rename = "Initiate a call/email")]
    InitiateContact,
    #[serde(rename = "Follow up consistently")]
    FollowUp,
    #[serde(rename = "Send a proposal")]
    SendProposal,
}

impl ActionItem {
    /// All vocabulary entries
    pub const ALL: [ActionItem; 5] = [
        ActionItem::QualifyLead,
        ActionItem::ResearchCompany,
        ActionItem::InitiateContact,
        ActionItem::FollowUp,
        ActionItem::SendProposal,
    ];

    /// Get display name (the exact vocabulary phrase)
    pub fn display_name(&self) -> &'static str {
        match self {
            ActionItem::QualifyLead => "Qualify the lead",
            ActionItem::ResearchCompany => "Research the company",
            ActionItem::InitiateContact => "Initiate a call/email",
            ActionItem::FollowUp => "Follow up consistently",
            ActionItem::SendProposal => "Send a proposal",
        }
    }

    /// Parse a vocabulary phrase, `None` for anything outside the vocabulary
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.iter().copied().find(|a| a.display_name() == s)
    }
}

/// Derived analysis of one recorded call.
///
/// Created once per recording and appended to the owning lead; never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioAnalysisResult {
    /// Opaque 32-hex-char identifier
    pub audio_id: String,
    /// Analysis creation time
    pub date: DateTime<Utc>,
    /// Sentiment signal
    pub sentiment: SentimentResult,
    /// Engagement signals
    pub engagement: EngagementMetrics,
    /// Short topic strings (prompts request ~5)
    pub topics: Vec<String>,
    /// Recommended next steps, vocabulary-constrained
    pub actionable_items: Vec<ActionItem>,
}

impl AudioAnalysisResult {
    /// Assemble a new analysis record with a fresh random id
    pub fn new(
        sentiment: SentimentResult,
        engagement: EngagementMetrics,
        topics: Vec<String>,
        actionable_items: Vec<ActionItem>,
    ) -> Self {
        Self {
            audio_id: Uuid::new_v4().simple().to_string(),
            date: Utc::now(),
            sentiment,
            engagement,
            topics,
            actionable_items,
        }
    }
}

/// Company-relevance signals derived from web search.
///
/// Recomputed on demand; a refresh overwrites the previous value on the
/// owning lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRelevance {
    /// Joined snippet overview of the top results
    pub overview: String,
    /// Relevance of the results to the product, in [0, 1]
    pub relevance_score: f64,
    /// Best-guess company website, if any result carried one
    pub company_website: Option<String>,
    /// Safe-search verdict from the provider
    pub is_safe: bool,
}

impl SearchRelevance {
    /// Safe degraded result substituted on search failure or timeout
    pub fn degraded() -> Self {
        Self {
            overview: "Search failed to return results.".to_string(),
            relevance_score: 0.5,
            company_website: None,
            is_safe: true,
        }
    }
}

/// Open-source-intelligence block on a lead
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsiProfile {
    /// Industry, when known
    pub industry: Option<String>,
    /// Latest search-derived relevance, overwritten on refresh
    pub search: Option<SearchRelevance>,
    /// Web-presence score in [0, 1], supplied by an external collaborator
    pub web_presence: Option<f64>,
}

/// Aggregate lead record.
///
/// Created minimal, then enriched incrementally: analyses append to
/// `audios`, search refreshes overwrite `osi.search`, and every enrichment
/// recomputes `overall_score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadData {
    /// Lead identifier
    pub id: String,
    /// Lead or company name
    pub name: String,
    /// Externally sourced signals
    pub osi: OsiProfile,
    /// Per-recording analyses, append-only, oldest first
    pub audios: Vec<AudioAnalysisResult>,
    /// Weighted composite in [0, 1]; `None` until a weighted signal exists
    pub overall_score: Option<f64>,
}

impl LeadData {
    /// Create a minimal lead record
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            osi: OsiProfile::default(),
            audios: Vec::new(),
            overall_score: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_transcript() {
        let t = Transcript::new(vec![
            TranscriptSegment {
                speaker: None,
                start: 0.0,
                end: 3.0,
                text: "Hello".to_string(),
            },
            TranscriptSegment {
                speaker: None,
                start: 3.0,
                end: 6.0,
                text: "Hi there".to_string(),
            },
        ]);
        assert_eq!(t.render(), "0 - 3s: Hello\n3 - 6s: Hi there");
    }

    #[test]
    fn test_action_vocabulary_round_trip() {
        for action in ActionItem::ALL {
            assert_eq!(ActionItem::parse(action.display_name()), Some(action));
        }
        assert_eq!(ActionItem::parse("Do something invalid"), None);
        assert_eq!(ActionItem::parse("  Send a proposal  "), Some(ActionItem::SendProposal));
    }

    #[test]
    fn test_action_serde_uses_vocabulary_phrases() {
        let json = serde_json::to_string(&ActionItem::InitiateContact).unwrap();
        assert_eq!(json, "\"Initiate a call/email\"");
        let back: ActionItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ActionItem::InitiateContact);
    }

    #[test]
    fn test_audio_id_is_32_hex_chars() {
        let result = AudioAnalysisResult::new(
            SentimentResult::unknown(),
            EngagementMetrics::default(),
            vec![],
            vec![],
        );
        assert_eq!(result.audio_id.len(), 32);
        assert!(result.audio_id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_degraded_search_relevance() {
        let degraded = SearchRelevance::degraded();
        assert_eq!(degraded.overview, "Search failed to return results.");
        assert_eq!(degraded.relevance_score, 0.5);
        assert!(degraded.is_safe);
        assert!(degraded.company_website.is_none());
    }

    #[test]
    fn test_engagement_default_is_all_fallbacks() {
        let m = EngagementMetrics::default();
        assert_eq!(m.talk_to_listen_ratio, 1.0);
        assert_eq!(m.turn_taking_frequency, 1);
        assert_eq!(m.interruptions, 0);
        assert_eq!(m.speech_pace, 1);
    }
}
