//! Transcript analyzers built on the completion provider

use leadlens_core::{ActionItem, EngagementMetrics};
use tracing::debug;

use crate::parse;
use crate::prompts;
use crate::provider::{try_complete, CompletionProvider};

/// Derives engagement metrics from a rendered transcript.
///
/// Issues the four sub-analyses (overtalk, pace, talk/listen, turn-taking)
/// concurrently and joins them. Each signal falls back independently, so one
/// failed completion never blocks the other three.
pub struct EngagementAnalyzer<'a, P> {
    provider: &'a P,
}

impl<'a, P> EngagementAnalyzer<'a, P>
where
    P: CompletionProvider + Sync,
{
    /// Create an analyzer over a completion provider
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Run the four sub-analyses and assemble the metrics
    pub async fn analyze(&self, transcript: &str) -> EngagementMetrics {
        let interruption_prompt = prompts::interruption_count_prompt(transcript);
        let pace_prompt = prompts::speech_pace_prompt(transcript);
        let talk_listen_prompt = prompts::talk_listen_prompt(transcript);
        let turn_prompt = prompts::turn_count_prompt(transcript);
        let (overtalk, pace, ratio, turns) = tokio::join!(
            try_complete(self.provider, &interruption_prompt),
            try_complete(self.provider, &pace_prompt),
            try_complete(self.provider, &talk_listen_prompt),
            try_complete(self.provider, &turn_prompt),
        );

        let metrics = EngagementMetrics {
            interruptions: parse::parse_count(overtalk.as_deref(), 0),
            speech_pace: parse::parse_count(pace.as_deref(), 1).clamp(1, 5) as u8,
            talk_to_listen_ratio: parse::parse_number(ratio.as_deref(), 1.0).max(0.0),
            turn_taking_frequency: parse::parse_count(turns.as_deref(), 1),
        };
        debug!(?metrics, "Engagement analysis complete");
        metrics
    }
}

/// Extract discussion topics from a rendered transcript.
///
/// The topic list is set-like: duplicates are dropped, first occurrence
/// wins. Falls back to an empty list on completion failure or malformed
/// output.
pub async fn extract_topics<P>(provider: &P, transcript: &str) -> Vec<String>
where
    P: CompletionProvider + Sync,
{
    let raw = try_complete(provider, &prompts::topics_prompt(transcript)).await;
    let mut topics = parse::parse_string_array(raw.as_deref(), "topics");
    let mut seen = std::collections::HashSet::new();
    topics.retain(|t| seen.insert(t.clone()));
    topics
}

/// Extract recommended actions from a rendered transcript.
///
/// Model output is filtered through the fixed action vocabulary; anything
/// the model invents is dropped at this boundary.
pub async fn extract_actions<P>(provider: &P, transcript: &str) -> Vec<ActionItem>
where
    P: CompletionProvider + Sync,
{
    let raw = try_complete(provider, &prompts::actions_prompt(transcript)).await;
    parse::parse_string_array(raw.as_deref(), "actions")
        .iter()
        .filter_map(|s| ActionItem::parse(s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;

    /// Scripted provider: answers each sub-analysis by prompt keyword, with
    /// an optional signal forced to fail.
    struct ScriptedProvider {
        fail_on: Option<&'static str>,
    }

    impl ScriptedProvider {
        fn answering() -> Self {
            Self { fail_on: None }
        }

        fn failing_on(keyword: &'static str) -> Self {
            Self { fail_on: Some(keyword) }
        }

        fn answer_for(prompt: &str) -> &'static str {
            if prompt.contains("overtalk") {
                "2"
            } else if prompt.contains("speech pace") {
                "4"
            } else if prompt.contains("talking versus listening") {
                "1.8"
            } else if prompt.contains("speaker turns") {
                "12"
            } else {
                "0"
            }
        }
    }

    impl CompletionProvider for ScriptedProvider {
        async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
            if let Some(keyword) = self.fail_on {
                if prompt.contains(keyword) {
                    return Err(LlmError::RequestFailed("scripted failure".to_string()));
                }
            }
            Ok(Self::answer_for(prompt).to_string())
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn name(&self) -> &'static str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    /// Provider whose every call fails
    struct DownProvider;

    impl CompletionProvider for DownProvider {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            Err(LlmError::ConnectionError("down".to_string()))
        }

        async fn is_available(&self) -> bool {
            false
        }

        fn name(&self) -> &'static str {
            "down"
        }

        fn model(&self) -> &str {
            "down"
        }
    }

    /// Provider returning one fixed completion
    struct FixedProvider(&'static str);

    impl CompletionProvider for FixedProvider {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
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

    #[tokio::test]
    async fn test_all_sub_analyses_succeed() {
        let provider = ScriptedProvider::answering();
        let metrics = EngagementAnalyzer::new(&provider)
            .analyze("0 - 3s: Hello\n3 - 6s: Hi there")
            .await;
        assert_eq!(metrics.interruptions, 2);
        assert_eq!(metrics.speech_pace, 4);
        assert_eq!(metrics.talk_to_listen_ratio, 1.8);
        assert_eq!(metrics.turn_taking_frequency, 12);
    }

    #[tokio::test]
    async fn test_one_failed_sub_call_does_not_block_others() {
        let provider = ScriptedProvider::failing_on("overtalk");
        let metrics = EngagementAnalyzer::new(&provider)
            .analyze("0 - 3s: Hello\n3 - 6s: Hi there")
            .await;
        // Failed signal takes its fallback, the rest reflect parsed values.
        assert_eq!(metrics.interruptions, 0);
        assert_eq!(metrics.speech_pace, 4);
        assert_eq!(metrics.talk_to_listen_ratio, 1.8);
        assert_eq!(metrics.turn_taking_frequency, 12);
    }

    #[tokio::test]
    async fn test_all_sub_calls_failed_yields_default_shape() {
        let metrics = EngagementAnalyzer::new(&DownProvider)
            .analyze("0 - 3s: Hello\n3 - 6s: Hi there")
            .await;
        assert_eq!(metrics, EngagementMetrics::default());
    }

    #[tokio::test]
    async fn test_pace_clamped_to_scale() {
        let metrics = EngagementAnalyzer::new(&FixedProvider("9"))
            .analyze("0 - 3s: Hello")
            .await;
        assert_eq!(metrics.speech_pace, 5);
    }

    #[tokio::test]
    async fn test_extract_topics_fenced_json() {
        let provider = FixedProvider("```json\n{\"topics\":[\"pricing\",\"support\"]}\n```");
        let topics = extract_topics(&provider, "transcript").await;
        assert_eq!(topics, vec!["pricing".to_string(), "support".to_string()]);
    }

    #[tokio::test]
    async fn test_extract_topics_failure_is_empty() {
        assert!(extract_topics(&DownProvider, "transcript").await.is_empty());
    }

    #[tokio::test]
    async fn test_extract_topics_dedups_preserving_order() {
        let provider = FixedProvider("{\"topics\":[\"pricing\",\"support\",\"pricing\"]}");
        let topics = extract_topics(&provider, "transcript").await;
        assert_eq!(topics, vec!["pricing".to_string(), "support".to_string()]);
    }

    #[tokio::test]
    async fn test_extract_actions_filters_vocabulary() {
        let provider =
            FixedProvider("{\"actions\":[\"Send a proposal\",\"Do something invalid\"]}");
        let actions = extract_actions(&provider, "transcript").await;
        assert_eq!(actions, vec![ActionItem::SendProposal]);
    }
}
