//! Session bridge endpoints.
//!
//! ```text
//! POST   /api/v1/auth/session
//! DELETE /api/v1/auth/session
//! ```
//!
//! Identity verification happens upstream; these endpoints only exchange a
//! verified user identifier for a cookie session and clear it again.

use actix_web::{HttpResponse, delete, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ApiResult, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::validation::{invalid_field_error, missing_field_error};

/// Payload carrying the externally verified user identifier.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub user_id: Option<String>,
}

/// Open a cookie session for a verified user id.
#[utoipa::path(
    post,
    path = "/api/v1/auth/session",
    request_body = SessionRequest,
    responses(
        (status = 204, description = "Session established"),
        (status = 400, description = "Missing or malformed user id", body = crate::domain::Error)
    ),
    tags = ["auth"],
    operation_id = "openSession"
)]
#[post("/auth/session")]
pub async fn open_session(
    session: SessionContext,
    payload: web::Json<SessionRequest>,
) -> ApiResult<HttpResponse> {
    let raw = payload
        .into_inner()
        .user_id
        .ok_or_else(|| missing_field_error("userId"))?;
    let user_id = UserId::new(&raw)
        .map_err(|err| invalid_field_error("userId", raw, err.to_string()))?;

    session.persist_user(&user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Clear the cookie session.
#[utoipa::path(
    delete,
    path = "/api/v1/auth/session",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "closeSession"
)]
#[delete("/auth/session")]
pub async fn close_session(session: SessionContext) -> ApiResult<HttpResponse> {
    session.clear();
    Ok(HttpResponse::NoContent().finish())
}
