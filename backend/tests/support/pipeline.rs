//! Shared test doubles and harness helpers for pipeline integration tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;
use async_trait::async_trait;
use serde_json::json;

use backend::domain::UserId;
use backend::domain::ports::{CaptionProvider, CaptionProviderError};
use backend::domain::prompt::Prompt;

/// Provider double that replays a scripted queue of replies.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, CaptionProviderError>>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.lock().push_back(Ok(reply.into()));
    }

    pub fn push_failure(&self, error: CaptionProviderError) {
        self.lock().push_back(Err(error));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, CaptionProviderError>>> {
        self.replies.lock().expect("provider script lock")
    }
}

#[async_trait]
impl CaptionProvider for ScriptedProvider {
    async fn complete(&self, _prompt: &Prompt) -> Result<String, CaptionProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.lock()
            .pop_front()
            .unwrap_or_else(|| Err(CaptionProviderError::transport("script exhausted")))
    }
}

/// Provider double that returns the same reply on every call.
pub struct FixedProvider {
    reply: String,
}

impl FixedProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl CaptionProvider for FixedProvider {
    async fn complete(&self, _prompt: &Prompt) -> Result<String, CaptionProviderError> {
        Ok(self.reply.clone())
    }
}

/// A well-formed fenced reply with the requested number of captions.
pub fn fenced_reply(caption_count: usize) -> String {
    let captions: Vec<String> = (1..=caption_count)
        .map(|n| format!("Slide {n}: keep going"))
        .collect();
    let hashtags: Vec<String> = (1..=12).map(|n| format!("#tag{n}")).collect();
    let body = json!({
        "captions": captions,
        "hashtags": hashtags,
        "tips": "Post in the morning for best reach",
    });
    format!("```json\n{body}\n```")
}

/// Open a cookie session for `user_id` and return the session cookie.
pub async fn open_session_cookie<S, B>(app: &S, user_id: &UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/auth/session")
        .set_json(json!({ "userId": user_id.to_string() }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert_eq!(response.status().as_u16(), 204, "session should open");

    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie issued")
        .into_owned()
}

/// Build the API app around `state` with cookie sessions enabled.
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .service(
                    actix_web::web::scope("/api/v1")
                        .wrap(backend::server::session_middleware(
                            actix_web::cookie::Key::generate(),
                            false,
                        ))
                        .service(backend::inbound::http::auth::open_session)
                        .service(backend::inbound::http::auth::close_session)
                        .service(backend::inbound::http::generate::generate)
                        .service(backend::inbound::http::captions::list_captions)
                        .service(backend::inbound::http::users::get_profile),
                ),
        )
        .await
    };
}
pub(crate) use init_app;
