//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] aggregates every HTTP endpoint and the schemas their bodies
//! reference. The generated specification is served to tooling; no UI is
//! bundled with the server.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::SessionRequest;
use crate::inbound::http::captions::CaptionRecordResponse;
use crate::inbound::http::generate::{
    GenerateCaptionsRequest, GenerateCaptionsResponse, GenerationData,
};
use crate::inbound::http::users::ProfileResponse;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/session.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Caption generation API",
        description = "Credit-gated caption generation, history, and account endpoints."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::generate::generate,
        crate::inbound::http::captions::list_captions,
        crate::inbound::http::users::get_profile,
        crate::inbound::http::auth::open_session,
        crate::inbound::http::auth::close_session,
    ),
    components(schemas(
        Error,
        ErrorCode,
        SessionRequest,
        GenerateCaptionsRequest,
        GenerateCaptionsResponse,
        GenerationData,
        CaptionRecordResponse,
        ProfileResponse,
    )),
    tags(
        (name = "generation", description = "Credit-gated caption generation"),
        (name = "captions", description = "Stored caption history"),
        (name = "users", description = "Account profile access"),
        (name = "auth", description = "Session lifecycle")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document covers the HTTP surface.

    use super::*;

    #[test]
    fn registers_every_endpoint_path() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/generate",
            "/api/v1/captions",
            "/api/v1/users/me",
            "/api/v1/auth/session",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "document should describe {path}"
            );
        }
    }

    #[test]
    fn registers_error_schema() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.keys().any(|name| name.ends_with("Error")));
    }
}
