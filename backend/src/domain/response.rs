//! Structured-result extraction from the provider's unstructured reply.
//!
//! Providers wrap the mandated JSON object in markdown fences or prose often
//! enough that a three-tier candidate selection is required:
//!
//! 1. the interior of a closed ```` ```json ```` fence, if one exists;
//! 2. otherwise the first-to-last brace-delimited substring;
//! 3. otherwise the whole reply.
//!
//! The selected candidate is parsed exactly once. A candidate that fails to
//! parse is a terminal error with no fall-through to the next tier, so a
//! mangled fenced block surfaces as a parse failure instead of silently
//! re-parsing surrounding prose.

use serde::Deserialize;
use thiserror::Error;

use super::generation::GenerationResult;

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Which extraction tier supplied the candidate that was parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    FencedBlock,
    BraceSubstring,
    WholeText,
}

impl CandidateKind {
    fn describe(self) -> &'static str {
        match self {
            Self::FencedBlock => "fenced json block",
            Self::BraceSubstring => "brace-delimited substring",
            Self::WholeText => "whole reply",
        }
    }
}

/// Terminal parse failure; never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseParseError {
    #[error("provider reply could not be parsed ({}): {message}", candidate.describe())]
    Malformed {
        candidate: CandidateKind,
        message: String,
    },
}

/// Mandated output shape: an object with exactly these three keys.
#[derive(Debug, Deserialize)]
struct GenerationPayload {
    captions: Vec<String>,
    hashtags: Vec<String>,
    tips: String,
}

/// Extract and validate the structured result embedded in `raw`.
pub fn parse_generation(raw: &str) -> Result<GenerationResult, ResponseParseError> {
    let (kind, candidate) = select_candidate(raw);
    let payload: GenerationPayload =
        serde_json::from_str(candidate).map_err(|err| ResponseParseError::Malformed {
            candidate: kind,
            message: err.to_string(),
        })?;

    Ok(GenerationResult {
        captions: payload.captions,
        hashtags: payload.hashtags,
        tips: payload.tips,
    })
}

fn select_candidate(raw: &str) -> (CandidateKind, &str) {
    if let Some(inner) = fenced_json_block(raw) {
        return (CandidateKind::FencedBlock, inner);
    }
    if let Some(braced) = brace_substring(raw) {
        return (CandidateKind::BraceSubstring, braced);
    }
    (CandidateKind::WholeText, raw)
}

/// Interior of the first closed ```` ```json ```` fence. An unterminated fence
/// does not count as a candidate.
fn fenced_json_block(raw: &str) -> Option<&str> {
    let open = raw.find(FENCE_OPEN)?;
    let interior = &raw[open + FENCE_OPEN.len()..];
    let close = interior.find(FENCE_CLOSE)?;
    Some(interior[..close].trim())
}

/// First `{` through last `}`, mirroring the greedy match the provider
/// contract was written against.
fn brace_substring(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const WELL_FORMED: &str = r##"{
        "captions": ["Hook 🔥", "Body", "CTA: save this!"],
        "hashtags": ["#habits", "#morning"],
        "tips": "Post before 9am"
    }"##;

    #[rstest]
    fn parses_bare_json_reply() {
        let result = parse_generation(WELL_FORMED).expect("parses");
        assert_eq!(result.captions.len(), 3);
        assert_eq!(result.hashtags, vec!["#habits", "#morning"]);
        assert_eq!(result.tips, "Post before 9am");
    }

    #[rstest]
    fn fenced_reply_parses_identically_to_unfenced() {
        let fenced = format!("Here you go!\n```json\n{WELL_FORMED}\n```\nEnjoy!");
        assert_eq!(
            parse_generation(&fenced).expect("fenced parses"),
            parse_generation(WELL_FORMED).expect("bare parses"),
        );
    }

    #[rstest]
    fn extracts_brace_substring_from_surrounding_prose() {
        let wrapped = format!("Sure, here is the result: {WELL_FORMED} — let me know!");
        let result = parse_generation(&wrapped).expect("parses");
        assert_eq!(result.captions.len(), 3);
    }

    #[rstest]
    fn broken_fenced_block_fails_without_falling_through() {
        // Valid JSON follows the mangled fence; the fence candidate must still win and fail.
        let reply = format!("```json\n{{not json}}\n```\n{WELL_FORMED}");
        let err = parse_generation(&reply).expect_err("terminal failure");
        assert!(matches!(
            err,
            ResponseParseError::Malformed {
                candidate: CandidateKind::FencedBlock,
                ..
            }
        ));
    }

    #[rstest]
    fn unterminated_fence_falls_back_to_brace_substring() {
        let reply = format!("```json oops no close, but later: {WELL_FORMED}");
        let result = parse_generation(&reply).expect("brace substring wins");
        assert_eq!(result.captions.len(), 3);
    }

    #[rstest]
    fn prose_without_braces_is_malformed_whole_text() {
        let err = parse_generation("I could not produce captions today.").expect_err("no JSON");
        assert!(matches!(
            err,
            ResponseParseError::Malformed {
                candidate: CandidateKind::WholeText,
                ..
            }
        ));
    }

    #[rstest]
    #[case(r##"{"captions": ["a"], "hashtags": ["#a"]}"##)]
    #[case(r#"{"captions": ["a"], "tips": "t"}"#)]
    #[case(r##"{"hashtags": ["#a"], "tips": "t"}"##)]
    fn rejects_objects_missing_mandated_keys(#[case] reply: &str) {
        assert!(parse_generation(reply).is_err());
    }

    #[rstest]
    fn accepts_caption_count_differing_from_request() {
        // Strict slide-count enforcement is deliberately not the parser's job.
        let reply = r#"{"captions": ["only one"], "hashtags": [], "tips": ""}"#;
        let result = parse_generation(reply).expect("accepted as-is");
        assert_eq!(result.captions.len(), 1);
    }
}
