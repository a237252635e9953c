//! Reqwest-backed chat-completion provider adapter.
//!
//! This adapter owns transport details only: request serialisation, timeout and
//! HTTP error mapping, and JSON decoding of the completion envelope. The raw
//! assistant text is handed back untouched for the domain parser to interpret.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::{ChatCompletionRequestDto, ChatCompletionResponseDto, ChatMessageDto};
use crate::domain::ports::{CaptionProvider, CaptionProviderError};
use crate::domain::prompt::Prompt;

const DEFAULT_MODEL: &str = "llama-3.1-70b-versatile";
const DEFAULT_TEMPERATURE: f32 = 0.8;
const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Sampling parameters forwarded with every completion request.
pub struct SamplingOptions {
    /// Sampling temperature passed to the model.
    pub temperature: f32,
    /// Upper bound on completion length in tokens.
    pub max_tokens: u32,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Provider adapter that performs HTTP POST requests against one
/// OpenAI-compatible chat-completion endpoint.
pub struct ChatCompletionClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
    sampling: SamplingOptions,
}

impl ChatCompletionClient {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Self::with_sampling(endpoint, api_key, model, timeout, SamplingOptions::default())
    }

    /// Build an adapter with explicit sampling parameters.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_sampling(
        endpoint: Url,
        api_key: String,
        model: String,
        timeout: Duration,
        sampling: SamplingOptions,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let model = if model.trim().is_empty() {
            DEFAULT_MODEL.to_owned()
        } else {
            model
        };
        Ok(Self {
            client,
            endpoint,
            api_key,
            model,
            sampling,
        })
    }
}

#[async_trait]
impl CaptionProvider for ChatCompletionClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String, CaptionProviderError> {
        let request = ChatCompletionRequestDto {
            model: &self.model,
            messages: vec![
                ChatMessageDto {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessageDto {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.sampling.temperature,
            max_tokens: self.sampling.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        extract_content(body.as_ref())
    }
}

fn extract_content(body: &[u8]) -> Result<String, CaptionProviderError> {
    let decoded: ChatCompletionResponseDto = serde_json::from_slice(body).map_err(|error| {
        CaptionProviderError::transport(format!("invalid completion envelope: {error}"))
    })?;
    decoded
        .into_content()
        .ok_or_else(|| CaptionProviderError::transport("completion reply contained no choices"))
}

fn map_transport_error(error: reqwest::Error) -> CaptionProviderError {
    if error.is_timeout() {
        CaptionProviderError::timeout(error.to_string())
    } else {
        CaptionProviderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> CaptionProviderError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            CaptionProviderError::timeout(message)
        }
        _ => CaptionProviderError::upstream(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network completion mapping helpers.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, true)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, true)]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, false)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, false)]
    #[case::unauthorized(StatusCode::UNAUTHORIZED, false)]
    fn maps_http_statuses_to_expected_errors(#[case] status: StatusCode, #[case] timeout: bool) {
        let error = map_status_error(status, b"{\"error\":\"model overloaded\"}");
        if timeout {
            assert!(
                matches!(error, CaptionProviderError::Timeout { .. }),
                "timeout statuses should map to Timeout",
            );
        } else {
            match error {
                CaptionProviderError::Upstream {
                    status: reported, ..
                } => {
                    assert_eq!(reported, status.as_u16(), "upstream status should survive");
                }
                other => panic!("expected Upstream, got {other:?}"),
            }
        }
    }

    #[test]
    fn status_message_includes_body_preview() {
        let error = map_status_error(StatusCode::BAD_GATEWAY, b"backend  went\naway");
        assert!(
            error.to_string().contains("status 502: backend went away"),
            "preview should collapse whitespace: {error}"
        );
    }

    #[test]
    fn long_bodies_are_truncated_with_ellipsis() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());
        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn decodes_assistant_content_from_envelope() {
        let body = br#"{"choices":[{"message":{"content":"```json\n{}\n```"}}]}"#;
        let content = extract_content(body).expect("content should decode");
        assert_eq!(content, "```json\n{}\n```");
    }

    #[test]
    fn empty_choice_list_maps_to_transport_error() {
        let error = extract_content(br#"{"choices":[]}"#).expect_err("decode should fail");
        assert!(matches!(error, CaptionProviderError::Transport { .. }));
    }

    #[test]
    fn invalid_envelope_maps_to_transport_error() {
        let error = extract_content(b"not json").expect_err("decode should fail");
        assert!(matches!(error, CaptionProviderError::Transport { .. }));
    }
}
