//! Server construction: port wiring, session middleware, and the actix run loop.

mod config;

pub use config::AppConfig;

use std::io;
use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
use utoipa::OpenApi;

use crate::doc::ApiDoc;
use crate::domain::GenerationService;
use crate::inbound::http::auth::{close_session, open_session};
use crate::inbound::http::captions::list_captions;
use crate::inbound::http::generate::generate;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::get_profile;
use crate::outbound::persistence::{
    DbPool, DieselCaptionRepository, DieselCreditLedger, DieselProfileQuery, DieselUsageLog,
    MemoryStore, PoolConfig,
};
use crate::outbound::provider::ChatCompletionClient;

/// Wire the domain service and storage ports from configuration.
///
/// # Errors
///
/// Fails when the provider client cannot be built, or when no database URL is
/// configured outside `--in-memory` mode, or when the pool cannot be created.
pub async fn build_http_state(config: &AppConfig) -> io::Result<HttpState> {
    let provider = Arc::new(
        ChatCompletionClient::new(
            config.provider_endpoint.clone(),
            config.provider_api_key.clone(),
            config.provider_model.clone(),
            config.provider_timeout(),
        )
        .map_err(io::Error::other)?,
    );

    if config.in_memory {
        info!("serving from in-memory store");
        let store = Arc::new(MemoryStore::new());
        let generation = Arc::new(GenerationService::new(
            store.clone(),
            provider,
            store.clone(),
            store.clone(),
        ));
        return Ok(HttpState::new(generation, store.clone(), store));
    }

    let database_url = config.database_url.as_deref().ok_or_else(|| {
        io::Error::other("DATABASE_URL is required unless --in-memory is set")
    })?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|err| io::Error::other(err.to_string()))?;

    let ledger = Arc::new(DieselCreditLedger::new(pool.clone()));
    let captions = Arc::new(DieselCaptionRepository::new(pool.clone()));
    let usage = Arc::new(DieselUsageLog::new(pool.clone()));
    let profiles = Arc::new(DieselProfileQuery::new(pool));
    let generation = Arc::new(GenerationService::new(
        ledger,
        provider,
        captions.clone(),
        usage,
    ));
    Ok(HttpState::new(generation, captions, profiles))
}

/// Load the session cookie signing key, or fall back to an ephemeral key
/// where that is explicitly allowed.
///
/// # Errors
///
/// Fails when the key file is unreadable and ephemeral keys are not allowed.
pub fn load_session_key(config: &AppConfig) -> io::Result<Key> {
    match std::fs::read(&config.session_key_file) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(err) => {
            if cfg!(debug_assertions) || config.session_allow_ephemeral {
                warn!(
                    path = %config.session_key_file.display(),
                    error = %err,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            } else {
                Err(io::Error::other(format!(
                    "failed to read session key at {}: {err}",
                    config.session_key_file.display()
                )))
            }
        }
    }
}

/// Cookie-backed session middleware shared by server and tests.
pub fn session_middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build()
}

async fn openapi_json() -> web::Json<utoipa::openapi::OpenApi> {
    web::Json(ApiDoc::openapi())
}

/// Run the HTTP server until shutdown.
///
/// # Errors
///
/// Fails when wiring, binding, or serving fails.
pub async fn run(config: AppConfig) -> io::Result<()> {
    let state = build_http_state(&config).await?;
    let key = load_session_key(&config)?;
    let cookie_secure = config.session_cookie_secure;

    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(server_health_state.clone())
            .service(
                web::scope("/api/v1")
                    .wrap(session_middleware(key.clone(), cookie_secure))
                    .service(generate)
                    .service(list_captions)
                    .service(get_profile)
                    .service(open_session)
                    .service(close_session),
            )
            .service(ready)
            .service(live)
            .route("/api-docs/openapi.json", web::get().to(openapi_json))
    })
    .bind(config.bind_addr)?;

    info!(addr = %config.bind_addr, "listening");
    health_state.mark_ready();
    server.run().await
}
