//! Tolerant parser for model output.
//!
//! The model is asked for bare JSON but routinely wraps it in a markdown
//! code fence or surrounding prose, so span selection runs in stages: a
//! fenced ```json block, then the first brace-to-brace span, then the whole
//! text. Whatever span is selected must decode as JSON; failure is a
//! reportable error carrying the span, never a panic.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use notical_core::{NoticalError, NoticalResult};

/// Event fields as the model returned them, before timestamp normalization.
/// Every field is optional; model output is unreliable.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedEvent {
    pub title: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

fn fenced_json_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").unwrap())
}

fn brace_span_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").unwrap())
}

/// Select the span of `raw` most likely to be the JSON object.
pub fn extract_json_span(raw: &str) -> &str {
    if let Some(caps) = fenced_json_re().captures(raw) {
        return caps.get(1).map_or(raw, |m| m.as_str());
    }
    if let Some(m) = brace_span_re().find(raw) {
        return m.as_str();
    }
    raw
}

/// Decode the selected span into an `ExtractedEvent`.
pub fn parse_extracted(raw: &str) -> NoticalResult<ExtractedEvent> {
    let span = extract_json_span(raw);
    serde_json::from_str(span).map_err(|_| NoticalError::ModelOutput {
        raw: span.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_block_wins() {
        let raw = "Here you go:\n```json\n{\"title\":\"A\"}\n```\nAnything else?";
        assert_eq!(extract_json_span(raw), "{\"title\":\"A\"}");
    }

    #[test]
    fn bare_brace_span_is_found_in_prose() {
        let raw = "blah {\"title\":\"B\"} blah";
        assert_eq!(extract_json_span(raw), "{\"title\":\"B\"}");
    }

    #[test]
    fn brace_span_is_greedy_across_newlines() {
        let raw = "note {\"title\":\"A\",\n\"description\":\"x } y\"} done";
        // Greedy match runs to the last closing brace
        assert_eq!(
            extract_json_span(raw),
            "{\"title\":\"A\",\n\"description\":\"x } y\"}"
        );
    }

    #[test]
    fn no_braces_falls_back_to_whole_text() {
        assert_eq!(extract_json_span("no json here"), "no json here");
    }

    #[test]
    fn parse_decodes_fields() {
        let raw = "```json\n{\"title\":\"Review\",\"start\":\"2025-10-03T09:00:00\"}\n```";
        let event = parse_extracted(raw).unwrap();
        assert_eq!(event.title.as_deref(), Some("Review"));
        assert_eq!(event.start.as_deref(), Some("2025-10-03T09:00:00"));
        assert_eq!(event.end, None);
    }

    #[test]
    fn null_fields_are_tolerated() {
        let raw = "{\"title\":\"Review\",\"location\":null}";
        let event = parse_extracted(raw).unwrap();
        assert_eq!(event.location, None);
    }

    #[test]
    fn undecodable_output_carries_the_span() {
        match parse_extracted("no json here") {
            Err(NoticalError::ModelOutput { raw }) => assert_eq!(raw, "no json here"),
            other => panic!("Expected ModelOutput, got {:?}", other.ok()),
        }
    }
}
