//! Defensive parsing of model output
//!
//! Single point of defense against malformed completions: every function
//! here returns its documented fallback instead of an error, so downstream
//! signal assembly never fails on bad model output.

use regex::Regex;
use serde_json::Value;
use tracing::warn;

/// Parse a numeric completion, returning `fallback` on `None` or
/// non-numeric input.
///
/// Accepts a leading numeric prefix ("3 interruptions" parses as 3), since
/// models frequently append prose after the number.
pub fn parse_number(raw: Option<&str>, fallback: f64) -> f64 {
    let Some(raw) = raw else {
        return fallback;
    };
    let trimmed = raw.trim();

    if let Ok(value) = trimmed.parse::<f64>() {
        if value.is_finite() {
            return value;
        }
    }

    let leading = Regex::new(r"^-?\d+(\.\d+)?").unwrap();
    match leading.find(trimmed).and_then(|m| m.as_str().parse::<f64>().ok()) {
        Some(value) => value,
        None => {
            warn!("Non-numeric completion {trimmed:?}, using fallback {fallback}");
            fallback
        }
    }
}

/// Parse a non-negative count, returning `fallback` on `None`, non-numeric,
/// or negative input
pub fn parse_count(raw: Option<&str>, fallback: u32) -> u32 {
    let value = parse_number(raw, f64::from(fallback));
    if value < 0.0 || value > f64::from(u32::MAX) {
        fallback
    } else {
        value.round() as u32
    }
}

/// Strip Markdown code-fence markers.
///
/// Grammar: an optional leading ``` line (with optional language tag, e.g.
/// ```json), then the body, then an optional trailing ``` line. Anything
/// that does not match the grammar passes through trimmed.
pub fn strip_code_fence(raw: &str) -> &str {
    let mut body = raw.trim();

    if let Some(rest) = body.strip_prefix("```") {
        // Drop the rest of the fence line (the language tag, if any).
        body = match rest.split_once('\n') {
            Some((_tag, after)) => after,
            None => rest,
        };
    }

    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }

    body.trim()
}

/// Parse a JSON object completion and extract a named array-of-strings
/// field, returning an empty vector on any parse or validation failure
pub fn parse_string_array(raw: Option<&str>, field: &str) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let body = strip_code_fence(raw);
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) => {
            warn!("Failed to parse completion as JSON: {err}");
            return Vec::new();
        }
    };

    match value.get(field).cloned() {
        Some(array) => match serde_json::from_value::<Vec<String>>(array) {
            Ok(items) => items,
            Err(err) => {
                warn!("Field {field:?} is not an array of strings: {err}");
                Vec::new()
            }
        },
        None => {
            warn!("Field {field:?} missing from completion");
            Vec::new()
        }
    }
}

/// Extract a relevance score from a completion.
///
/// Tries the JSON `relevanceScore` field first, then the first decimal in
/// [0, 1] anywhere in the text, then falls back to 0.5.
pub fn parse_relevance_score(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.5;
    };

    let body = strip_code_fence(raw);
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(score) = value.get("relevanceScore").and_then(Value::as_f64) {
            return score.clamp(0.0, 1.0);
        }
    }

    let decimal = Regex::new(r"\d+(\.\d+)?").unwrap();
    for m in decimal.find_iter(body) {
        if let Ok(value) = m.as_str().parse::<f64>() {
            if (0.0..=1.0).contains(&value) {
                return value;
            }
        }
    }

    warn!("No relevance score found in completion, using 0.5");
    0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(Some("3"), 0.0), 3.0);
        assert_eq!(parse_number(Some(" 1.5 \n"), 0.0), 1.5);
        assert_eq!(parse_number(Some("3 interruptions"), 0.0), 3.0);
        assert_eq!(parse_number(Some("-2.5"), 0.0), -2.5);
        assert_eq!(parse_number(Some("not a number"), 1.0), 1.0);
        assert_eq!(parse_number(Some(""), 1.0), 1.0);
        assert_eq!(parse_number(Some("NaN"), 1.0), 1.0);
        assert_eq!(parse_number(None, 0.5), 0.5);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(Some("4"), 0), 4);
        assert_eq!(parse_count(Some("4.6"), 0), 5);
        assert_eq!(parse_count(Some("-3"), 1), 1);
        assert_eq!(parse_count(Some("many"), 1), 1);
        assert_eq!(parse_count(None, 0), 0);
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
        // Unterminated fence still yields the body.
        assert_eq!(strip_code_fence("```json\n{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_parse_string_array_fenced() {
        let raw = "```json\n{\"topics\":[\"pricing\",\"support\"]}\n```";
        assert_eq!(
            parse_string_array(Some(raw), "topics"),
            vec!["pricing".to_string(), "support".to_string()]
        );
    }

    #[test]
    fn test_parse_string_array_failures_fall_back_empty() {
        assert!(parse_string_array(None, "topics").is_empty());
        assert!(parse_string_array(Some("not json"), "topics").is_empty());
        assert!(parse_string_array(Some("{\"other\":[]}"), "topics").is_empty());
        assert!(parse_string_array(Some("{\"topics\":\"pricing\"}"), "topics").is_empty());
        assert!(parse_string_array(Some("{\"topics\":[1,2]}"), "topics").is_empty());
    }

    #[test]
    fn test_parse_relevance_score_json_field() {
        assert_eq!(
            parse_relevance_score(Some("```json\n{\"relevanceScore\":0.7}\n```")),
            0.7
        );
        assert_eq!(parse_relevance_score(Some("{\"relevanceScore\":1.4}")), 1.0);
    }

    #[test]
    fn test_parse_relevance_score_regex_fallback() {
        assert_eq!(parse_relevance_score(Some("the score is 0.65 overall")), 0.65);
        // Out-of-range decimals are skipped.
        assert_eq!(parse_relevance_score(Some("score: 42, nothing else")), 0.5);
    }

    #[test]
    fn test_parse_relevance_score_fallback() {
        assert_eq!(parse_relevance_score(None), 0.5);
        assert_eq!(parse_relevance_score(Some("no numbers here")), 0.5);
    }
}
