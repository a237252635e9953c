//! Caption generation HTTP handler.
//!
//! ```text
//! POST /api/v1/generate
//! ```
//!
//! The handler normalizes the payload into a validated domain request and
//! delegates to the generation driving port; all quota, provider, and
//! persistence policy lives behind that port.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::generation::{MAX_SLIDE_COUNT, MIN_SLIDE_COUNT};
use crate::domain::ports::GenerationOutcome;
use crate::domain::{ApiResult, Error, GenerationRequest, GenerationRequestError, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::missing_field_error;

/// Request payload for one carousel generation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCaptionsRequest {
    pub topic: Option<String>,
    pub slide_count: Option<u8>,
    pub tone: Option<String>,
    pub target_audience: Option<String>,
    pub content_type: Option<String>,
}

/// Successful generation envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateCaptionsResponse {
    pub success: bool,
    pub data: GenerationData,
}

/// Generated content plus the post-commit balance.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationData {
    /// Stored record id; absent when archival storage failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub captions: Vec<String>,
    pub hashtags: Vec<String>,
    pub tips: String,
    pub credits_remaining: i32,
}

impl From<GenerationOutcome> for GenerateCaptionsResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        Self {
            success: true,
            data: GenerationData {
                id: outcome.record_id,
                captions: outcome.result.captions,
                hashtags: outcome.result.hashtags,
                tips: outcome.result.tips,
                credits_remaining: outcome.credits_remaining,
            },
        }
    }
}

fn map_request_error(error: GenerationRequestError) -> Error {
    match error {
        GenerationRequestError::EmptyTopic => {
            Error::invalid_request("topic must not be empty").with_details(json!({
                "field": "topic",
                "code": "empty_topic",
            }))
        }
        GenerationRequestError::SlideCountOutOfRange { actual } => {
            Error::invalid_request(format!(
                "slide count must be between {MIN_SLIDE_COUNT} and {MAX_SLIDE_COUNT}"
            ))
            .with_details(json!({
                "field": "slideCount",
                "value": actual,
                "code": "out_of_range",
            }))
        }
    }
}

fn parse_generate_request(
    user_id: UserId,
    payload: GenerateCaptionsRequest,
) -> Result<GenerationRequest, Error> {
    let topic = payload.topic.ok_or_else(|| missing_field_error("topic"))?;
    let slide_count = payload
        .slide_count
        .ok_or_else(|| missing_field_error("slideCount"))?;

    GenerationRequest::new(
        user_id,
        topic,
        slide_count,
        payload.tone,
        payload.target_audience,
        payload.content_type,
    )
    .map_err(map_request_error)
}

/// Generate carousel captions, spending one credit on success.
#[utoipa::path(
    post,
    path = "/api/v1/generate",
    request_body = GenerateCaptionsRequest,
    responses(
        (status = 200, description = "Generated captions", body = GenerateCaptionsResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "No credits remaining", body = Error),
        (status = 502, description = "Provider failure", body = Error),
        (status = 500, description = "Parse or internal failure", body = Error)
    ),
    tags = ["captions"],
    operation_id = "generateCaptions"
)]
#[post("/generate")]
pub async fn generate(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<GenerateCaptionsRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let request = parse_generate_request(user_id, payload.into_inner())?;
    let outcome = state.generation.generate(request).await?;
    Ok(HttpResponse::Ok().json(GenerateCaptionsResponse::from(outcome)))
}
