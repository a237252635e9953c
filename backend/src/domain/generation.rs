//! Generation request and artifact data model.
//!
//! [`GenerationRequest`] is a parse-don't-validate type: a value can only
//! exist once the slide-count range and topic checks have passed, so the
//! orchestration layer never re-validates input. [`CaptionRecord`] and
//! [`UsageLogEntry`] are write-once artifacts owned by the persistence store.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use super::UserId;

/// Inclusive lower bound for the requested slide count.
pub const MIN_SLIDE_COUNT: u8 = 3;
/// Inclusive upper bound for the requested slide count.
pub const MAX_SLIDE_COUNT: u8 = 10;

/// Tone used when the caller supplies none.
pub const DEFAULT_TONE: &str = "Friendly and engaging";
/// Audience used in the prompt when the caller supplies none.
pub const DEFAULT_TARGET_AUDIENCE: &str = "General audience";
/// Content type used when the caller supplies none.
pub const DEFAULT_CONTENT_TYPE: &str = "carousel";

/// Audit log action recorded for each generation attempt.
pub const USAGE_ACTION_GENERATE: &str = "generate";

/// Validation errors returned by [`GenerationRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequestError {
    EmptyTopic,
    SlideCountOutOfRange { actual: u8 },
}

impl fmt::Display for GenerationRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTopic => write!(f, "topic must not be empty"),
            Self::SlideCountOutOfRange { actual } => write!(
                f,
                "slide count must be between {MIN_SLIDE_COUNT} and {MAX_SLIDE_COUNT}, got {actual}"
            ),
        }
    }
}

impl std::error::Error for GenerationRequestError {}

/// A validated, normalized request for one carousel generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    user_id: UserId,
    topic: String,
    slide_count: u8,
    tone: String,
    target_audience: Option<String>,
    content_type: String,
}

impl GenerationRequest {
    /// Normalize and validate raw request fields.
    ///
    /// The topic is trimmed and must remain non-empty; the slide count must
    /// fall within `[MIN_SLIDE_COUNT, MAX_SLIDE_COUNT]`. Tone, audience, and
    /// content type are defaulted when missing or blank, never rejected.
    pub fn new(
        user_id: UserId,
        topic: impl AsRef<str>,
        slide_count: u8,
        tone: Option<String>,
        target_audience: Option<String>,
        content_type: Option<String>,
    ) -> Result<Self, GenerationRequestError> {
        let topic = topic.as_ref().trim().to_owned();
        if topic.is_empty() {
            return Err(GenerationRequestError::EmptyTopic);
        }
        if !(MIN_SLIDE_COUNT..=MAX_SLIDE_COUNT).contains(&slide_count) {
            return Err(GenerationRequestError::SlideCountOutOfRange {
                actual: slide_count,
            });
        }

        Ok(Self {
            user_id,
            topic,
            slide_count,
            tone: non_blank(tone).unwrap_or_else(|| DEFAULT_TONE.to_owned()),
            target_audience: non_blank(target_audience),
            content_type: non_blank(content_type).unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned()),
        })
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn slide_count(&self) -> u8 {
        self.slide_count
    }

    pub fn tone(&self) -> &str {
        &self.tone
    }

    /// Audience as supplied by the caller, if any.
    pub fn target_audience(&self) -> Option<&str> {
        self.target_audience.as_deref()
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Structured result extracted from the provider's reply.
///
/// The caption count is provider-controlled best effort; it is not forced to
/// match the requested slide count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub captions: Vec<String>,
    pub hashtags: Vec<String>,
    pub tips: String,
}

/// Immutable record of one successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub content_type: String,
    pub slide_count: u8,
    pub topic: String,
    pub tone: String,
    pub target_audience: Option<String>,
    pub captions: Vec<String>,
    pub hashtags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl CaptionRecord {
    /// Build a record from a validated request and its parsed result.
    pub fn new(request: &GenerationRequest, result: &GenerationResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: *request.user_id(),
            content_type: request.content_type().to_owned(),
            slide_count: request.slide_count(),
            topic: request.topic().to_owned(),
            tone: request.tone().to_owned(),
            target_audience: request.target_audience().map(str::to_owned),
            captions: result.captions.clone(),
            hashtags: result.hashtags.clone(),
            created_at: Utc::now(),
        }
    }
}

/// Append-only audit entry, one per attempt that reaches the logging step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLogEntry {
    pub user_id: UserId,
    pub action: String,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}

impl UsageLogEntry {
    /// Entry describing a caption generation attempt.
    pub fn generation(request: &GenerationRequest) -> Self {
        Self {
            user_id: *request.user_id(),
            action: USAGE_ACTION_GENERATE.to_owned(),
            metadata: json!({
                "topic": request.topic(),
                "slideCount": request.slide_count(),
                "contentType": request.content_type(),
            }),
            created_at: Utc::now(),
        }
    }
}
