//! Caption history HTTP handler.
//!
//! ```text
//! GET /api/v1/captions
//! ```

use actix_web::{HttpResponse, get, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::CaptionStorageError;
use crate::domain::{ApiResult, CaptionRecord, Error};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Most recent records returned by the history endpoint.
const HISTORY_LIMIT: i64 = 50;

/// One stored generation, as returned to the dashboard.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptionRecordResponse {
    pub id: Uuid,
    pub content_type: String,
    pub slide_count: u8,
    pub topic: String,
    pub tone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    pub captions: Vec<String>,
    pub hashtags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CaptionRecord> for CaptionRecordResponse {
    fn from(record: CaptionRecord) -> Self {
        Self {
            id: record.id,
            content_type: record.content_type,
            slide_count: record.slide_count,
            topic: record.topic,
            tone: record.tone,
            target_audience: record.target_audience,
            captions: record.captions,
            hashtags: record.hashtags,
            created_at: record.created_at,
        }
    }
}

fn map_storage_error(error: CaptionStorageError) -> Error {
    match error {
        CaptionStorageError::Connection { message } => {
            Error::service_unavailable(format!("caption store unavailable: {message}"))
        }
        CaptionStorageError::Query { message } => {
            Error::internal(format!("caption store error: {message}"))
        }
    }
}

/// List the caller's stored generations, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/captions",
    responses(
        (status = 200, description = "Stored caption records", body = [CaptionRecordResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["captions"],
    operation_id = "listCaptions"
)]
#[get("/captions")]
pub async fn list_captions(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let records = state
        .captions
        .find_by_user(&user_id, HISTORY_LIMIT)
        .await
        .map_err(map_storage_error)?;

    let response: Vec<CaptionRecordResponse> = records
        .into_iter()
        .map(CaptionRecordResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(response))
}
