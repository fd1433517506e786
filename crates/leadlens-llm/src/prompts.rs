//! Prompt templates for transcript-derived signals
//!
//! One builder per signal, each embedding the rendered transcript and
//! stating the exact output shape the parser expects (a bare number or a
//! fenced JSON object).

use leadlens_core::ActionItem;

/// Build interruption-count prompt (expects a bare integer)
pub fn interruption_count_prompt(transcript: &str) -> String {
    format!(
        r#"You are analyzing a sales call transcript. Count the number of times one speaker starts talking before the other speaker has finished (overtalk events).

Respond with ONLY the count as a plain integer, no other text.

Transcript:
{transcript}"#
    )
}

/// Build speech-pace prompt (expects a bare integer 1-5)
pub fn speech_pace_prompt(transcript: &str) -> String {
    format!(
        r#"You are analyzing a sales call transcript. Rate the overall speech pace of the sales representative on a scale from 1 (very slow) to 5 (very fast), judging from utterance lengths and timestamps.

Respond with ONLY the rating as a plain integer from 1 to 5, no other text.

Transcript:
{transcript}"#
    )
}

/// Build talk/listen-ratio prompt (expects a bare decimal)
pub fn talk_listen_prompt(transcript: &str) -> String {
    format!(
        r#"You are analyzing a sales call transcript. Estimate the ratio of time the sales representative spent talking versus listening, using the utterance timestamps.

Respond with ONLY the ratio as a plain decimal number (for example 1.5), no other text.

Transcript:
{transcript}"#
    )
}

/// Build turn-count prompt (expects a bare integer)
pub fn turn_count_prompt(transcript: &str) -> String {
    format!(
        r#"You are analyzing a sales call transcript. Count the number of speaker turns, meaning each time the conversation passes from one speaker to the other.

Respond with ONLY the count as a plain integer, no other text.

Transcript:
{transcript}"#
    )
}

/// Build topic-extraction prompt (expects fenced JSON with a "topics" array)
pub fn topics_prompt(transcript: &str) -> String {
    format!(
        r#"You are analyzing a sales call transcript. Identify the main topics discussed, as short phrases of at most a few words each. Aim for about 5 topics.

Return a JSON object with a single "topics" field holding an array of strings:
```json
{{"topics": ["pricing", "onboarding timeline"]}}
```

Return ONLY the JSON object, no other text.

Transcript:
{transcript}"#
    )
}

/// Build action-extraction prompt (expects fenced JSON with an "actions"
/// array drawn from the fixed vocabulary)
pub fn actions_prompt(transcript: &str) -> String {
    let vocabulary = ActionItem::ALL
        .iter()
        .map(|a| format!("- \"{}\"", a.display_name()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are analyzing a sales call transcript. Recommend the next actions the sales representative should take. Choose ONLY from this list, verbatim:
{vocabulary}

Return a JSON object with a single "actions" field holding an array of the chosen strings:
```json
{{"actions": ["Send a proposal"]}}
```

Return ONLY the JSON object, no other text.

Transcript:
{transcript}"#
    )
}

/// Build relevance-scoring prompt over search snippets (expects fenced JSON
/// with a "relevanceScore" field)
pub fn relevance_prompt(snippets: &str) -> String {
    format!(
        r#"You are qualifying a sales lead. Below are web search snippets about the lead's company. Rate how relevant this company is as a prospect for a sales-engagement product, as a decimal between 0 and 1.

Return a JSON object with a single "relevanceScore" field:
```json
{{"relevanceScore": 0.7}}
```

Return ONLY the JSON object, no other text.

Search snippets:
{snippets}"#
    )
}
