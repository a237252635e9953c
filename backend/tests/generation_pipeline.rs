//! End-to-end pipeline tests over the HTTP surface with in-memory storage.
//!
//! Each test boots the real handler stack (session middleware, validation,
//! orchestration) against `MemoryStore` and a scripted provider double, so
//! the only faked piece is the network hop to the hosted model.

#[expect(
    dead_code,
    reason = "Shared helpers include doubles used only by other integration suites."
)]
#[path = "support/pipeline.rs"]
mod support;

use std::sync::Arc;

use actix_web::test;
use async_trait::async_trait;
use rstest::rstest;
use serde_json::{Value, json};

use backend::domain::generation::CaptionRecord;
use backend::domain::ports::{
    CaptionProviderError, CaptionRepository, CaptionStorageError,
};
use backend::domain::{GenerationService, SubscriptionTier, UserId};
use backend::inbound::http::state::HttpState;
use backend::outbound::persistence::MemoryStore;
use support::{ScriptedProvider, fenced_reply, init_app, open_session_cookie};

struct World {
    store: Arc<MemoryStore>,
    provider: Arc<ScriptedProvider>,
    state: HttpState,
    user: UserId,
}

fn seeded_world(credits: i32) -> World {
    let store = Arc::new(MemoryStore::new());
    let user = UserId::random();
    store.seed_profile(user, credits, SubscriptionTier::Free);

    let provider = Arc::new(ScriptedProvider::new());
    let generation = Arc::new(GenerationService::new(
        store.clone(),
        provider.clone(),
        store.clone(),
        store.clone(),
    ));
    let state = HttpState::new(generation, store.clone(), store.clone());
    World {
        store,
        provider,
        state,
        user,
    }
}

fn generate_payload(topic: &str, slide_count: u8) -> Value {
    json!({ "topic": topic, "slideCount": slide_count })
}

#[actix_web::test]
async fn successful_generation_returns_captions_and_spends_one_credit() {
    let world = seeded_world(3);
    world.provider.push_reply(fenced_reply(5));
    let app = init_app!(world.state.clone());
    let cookie = open_session_cookie(&app, &world.user).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/generate")
        .cookie(cookie)
        .set_json(generate_payload("5 morning habits", 5))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["captions"].as_array().map(Vec::len), Some(5));
    assert_eq!(body["data"]["hashtags"].as_array().map(Vec::len), Some(12));
    assert_eq!(body["data"]["creditsRemaining"], 2);
    assert!(body["data"]["id"].is_string(), "stored record id expected");

    assert_eq!(world.provider.calls(), 1);
    assert_eq!(world.store.caption_count(), 1);
    assert_eq!(world.store.usage_entry_count(), 1);
}

#[actix_web::test]
async fn generation_without_session_is_unauthorized() {
    let world = seeded_world(3);
    let app = init_app!(world.state.clone());

    let request = test::TestRequest::post()
        .uri("/api/v1/generate")
        .set_json(generate_payload("5 morning habits", 5))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(world.provider.calls(), 0);
}

#[actix_web::test]
async fn zero_balance_is_rejected_before_the_provider_is_called() {
    let world = seeded_world(0);
    let app = init_app!(world.state.clone());
    let cookie = open_session_cookie(&app, &world.user).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/generate")
        .cookie(cookie)
        .set_json(generate_payload("5 morning habits", 5))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status().as_u16(), 403);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "forbidden");
    assert_eq!(body["details"]["creditsRemaining"], 0);

    assert_eq!(world.provider.calls(), 0);
    assert_eq!(world.store.usage_entry_count(), 0);
}

#[rstest]
#[case(2, 400)]
#[case(3, 200)]
#[case(10, 200)]
#[case(11, 400)]
#[actix_web::test]
async fn slide_count_bounds_are_inclusive(#[case] slide_count: u8, #[case] expected: u16) {
    let world = seeded_world(5);
    if expected == 200 {
        world.provider.push_reply(fenced_reply(slide_count.into()));
    }
    let app = init_app!(world.state.clone());
    let cookie = open_session_cookie(&app, &world.user).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/generate")
        .cookie(cookie)
        .set_json(generate_payload("meal prep", slide_count))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status().as_u16(), expected);
}

#[actix_web::test]
async fn provider_failure_maps_to_bad_gateway_and_leaves_balance_intact() {
    let world = seeded_world(3);
    world
        .provider
        .push_failure(CaptionProviderError::upstream(500, "status 500"));
    let app = init_app!(world.state.clone());
    let cookie = open_session_cookie(&app, &world.user).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/generate")
        .cookie(cookie.clone())
        .set_json(generate_payload("5 morning habits", 5))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 502);

    let request = test::TestRequest::get()
        .uri("/api/v1/users/me")
        .cookie(cookie)
        .to_request();
    let profile: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(profile["creditsRemaining"], 3);
    assert_eq!(world.store.caption_count(), 0);
    assert_eq!(world.store.usage_entry_count(), 0);
}

#[actix_web::test]
async fn unparseable_reply_is_an_internal_error_and_stays_unbilled() {
    let world = seeded_world(3);
    world
        .provider
        .push_reply("Happy to help! Here are some caption ideas for you.");
    let app = init_app!(world.state.clone());
    let cookie = open_session_cookie(&app, &world.user).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/generate")
        .cookie(cookie.clone())
        .set_json(generate_payload("5 morning habits", 5))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "internal_error");

    let request = test::TestRequest::get()
        .uri("/api/v1/users/me")
        .cookie(cookie)
        .to_request();
    let profile: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(profile["creditsRemaining"], 3);
    assert_eq!(world.store.usage_entry_count(), 0);
}

struct FailingCaptionRepository;

#[async_trait]
impl CaptionRepository for FailingCaptionRepository {
    async fn store(&self, _record: &CaptionRecord) -> Result<(), CaptionStorageError> {
        Err(CaptionStorageError::connection("store offline"))
    }

    async fn find_by_user(
        &self,
        _user_id: &UserId,
        _limit: i64,
    ) -> Result<Vec<CaptionRecord>, CaptionStorageError> {
        Err(CaptionStorageError::connection("store offline"))
    }
}

#[actix_web::test]
async fn archival_failure_still_returns_the_generation() {
    let store = Arc::new(MemoryStore::new());
    let user = UserId::random();
    store.seed_profile(user, 3, SubscriptionTier::Pro);

    let provider = Arc::new(ScriptedProvider::new());
    provider.push_reply(fenced_reply(4));
    let generation = Arc::new(GenerationService::new(
        store.clone(),
        provider,
        Arc::new(FailingCaptionRepository),
        store.clone(),
    ));
    let state = HttpState::new(generation, store.clone(), store.clone());

    let app = init_app!(state);
    let cookie = open_session_cookie(&app, &user).await;
    let request = test::TestRequest::post()
        .uri("/api/v1/generate")
        .cookie(cookie)
        .set_json(generate_payload("meal prep", 4))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = test::read_body_json(response).await;
    assert!(
        body["data"].get("id").is_none(),
        "record id must be omitted when archival failed"
    );
    assert_eq!(body["data"]["creditsRemaining"], 2);
    assert_eq!(store.usage_entry_count(), 1, "audit entry still recorded");
}

#[actix_web::test]
async fn history_lists_stored_records_for_the_session_user() {
    let world = seeded_world(3);
    world.provider.push_reply(fenced_reply(5));
    let app = init_app!(world.state.clone());
    let cookie = open_session_cookie(&app, &world.user).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/generate")
        .cookie(cookie.clone())
        .set_json(generate_payload("5 morning habits", 5))
        .to_request();
    assert_eq!(
        test::call_service(&app, request).await.status().as_u16(),
        200
    );

    let request = test::TestRequest::get()
        .uri("/api/v1/captions")
        .cookie(cookie)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    let records = body.as_array().expect("history array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["topic"], "5 morning habits");
    assert_eq!(records[0]["slideCount"], 5);
}

#[actix_web::test]
async fn profile_endpoint_reports_balance_and_tier() {
    let world = seeded_world(3);
    let app = init_app!(world.state.clone());
    let cookie = open_session_cookie(&app, &world.user).await;

    let request = test::TestRequest::get()
        .uri("/api/v1/users/me")
        .cookie(cookie)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;

    assert_eq!(body["id"], world.user.to_string());
    assert_eq!(body["creditsRemaining"], 3);
    assert_eq!(body["subscriptionTier"], "free");
}

#[actix_web::test]
async fn closing_the_session_revokes_access() {
    let world = seeded_world(3);
    let app = init_app!(world.state.clone());
    let cookie = open_session_cookie(&app, &world.user).await;

    let request = test::TestRequest::delete()
        .uri("/api/v1/auth/session")
        .cookie(cookie.clone())
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 204);

    // The purge response rewrites the cookie; re-sending the old value must
    // no longer authenticate.
    let stale = response
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .map(|c| c.into_owned());
    let request = test::TestRequest::get()
        .uri("/api/v1/users/me")
        .cookie(stale.unwrap_or(cookie))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status().as_u16(), 401);
}
