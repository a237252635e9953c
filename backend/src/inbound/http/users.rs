//! Account profile HTTP handler.
//!
//! ```text
//! GET /api/v1/users/me
//! ```

use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::ProfileStoreError;
use crate::domain::{ApiResult, Error, SubscriptionTier, UserProfile};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Credit-bearing profile view for the dashboard.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub credits_remaining: i32,
    pub subscription_tier: SubscriptionTier,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            credits_remaining: profile.credits_remaining,
            subscription_tier: profile.subscription_tier,
        }
    }
}

fn map_profile_error(error: ProfileStoreError) -> Error {
    match error {
        ProfileStoreError::Connection { message } => {
            Error::service_unavailable(format!("profile store unavailable: {message}"))
        }
        ProfileStoreError::Query { message } => {
            Error::internal(format!("profile store error: {message}"))
        }
    }
}

/// Fetch the authenticated user's profile and remaining credits.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Account profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No profile for this user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getProfile"
)]
#[get("/users/me")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let profile = state
        .profiles
        .fetch(&user_id)
        .await
        .map_err(map_profile_error)?
        .ok_or_else(|| Error::not_found("no profile for this user"))?;

    Ok(HttpResponse::Ok().json(ProfileResponse::from(profile)))
}
