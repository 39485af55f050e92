//! Signup, shadow-profile claiming, and the team validation dry-run
//! over HTTP.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use eventflow_server::db::models::{EventType, PaymentMode};
use eventflow_server::registration::cart::{BulkRegisterRequest, CartItem, TeammateInput};
use eventflow_server::registration::register_cart;

use common::{seed_event, seed_user, setup, TestContext};

async fn call(
    ctx: &TestContext,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let app = eventflow_server::api::router(ctx.state.clone());
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn signup_allocates_uid_and_rejects_duplicates() {
    let ctx = setup().await;

    let (status, user) = call(
        &ctx,
        "POST",
        "/api/users",
        Some(serde_json::json!({
            "name": "Sam",
            "email": "Sam@Fest.Test",
            "college": "NIT"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let uid = user["uid"].as_str().unwrap();
    assert!(uid.starts_with("EVT-"));
    assert_eq!(uid.len(), 9);
    // Emails are stored normalized
    assert_eq!(user["email"], "sam@fest.test");

    // uid resolves
    let (status, looked_up) = call(&ctx, "GET", &format!("/api/users/check-uid/{uid}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(looked_up["name"], "Sam");

    // Same email again, different casing: conflict
    let (status, body) = call(
        &ctx,
        "POST",
        "/api/users",
        Some(serde_json::json!({ "name": "Other", "email": "sam@fest.test" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "E2004");
}

#[tokio::test]
async fn shadow_profile_is_claimed_on_signup() {
    let ctx = setup().await;
    let event_id = seed_event(&ctx, "Hackathon", EventType::Group, 50_000, 2, 4).await;
    let leader = seed_user(&ctx, "Lena", "lena@fest.test").await;

    // Leader invites an unknown teammate; a shadow identity appears
    let req = BulkRegisterRequest {
        leader_uid: leader.uid.clone(),
        items: vec![CartItem {
            event_id,
            team_name: None,
            teammates: vec![TeammateInput {
                name: "Mate".into(),
                email: "mate@fest.test".into(),
            }],
        }],
        payment_mode: PaymentMode::Online,
        cash_token: None,
        return_url: None,
    };
    let outcome = register_cart(
        &ctx.state.pool,
        ctx.gateway.as_ref(),
        &ctx.state.notifier,
        &ctx.state.config,
        req,
    )
    .await
    .unwrap();
    let shadow_uid = outcome.items[0]
        .participants
        .iter()
        .find(|p| p.is_shadow)
        .map(|p| p.uid.clone())
        .expect("shadow participant");

    // The invitee signs up themselves; the shadow account is completed,
    // not duplicated, and keeps its uid (it is printed in the invite)
    let (status, user) = call(
        &ctx,
        "POST",
        "/api/users",
        Some(serde_json::json!({
            "name": "Mateo",
            "email": "mate@fest.test",
            "phone": "9876543210"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["uid"], shadow_uid.as_str());
    assert_eq!(user["is_shadow"], false);
    assert_eq!(user["name"], "Mateo");

    // Their registration from the invite is visible on the profile
    let (status, events) = call(
        &ctx,
        "GET",
        &format!("/api/users/{shadow_uid}/events"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(events.as_array().unwrap().len(), 1);
    assert_eq!(events[0]["event_name"], "Hackathon");
}

#[tokio::test]
async fn validate_team_reports_members_without_writing() {
    let ctx = setup().await;
    let event_id = seed_event(&ctx, "Hackathon", EventType::Group, 50_000, 2, 4).await;
    let leader = seed_user(&ctx, "Lena", "lena@fest.test").await;
    seed_user(&ctx, "Known", "known@fest.test").await;

    let (status, body) = call(
        &ctx,
        "POST",
        "/api/events/validate-team",
        Some(serde_json::json!({
            "leader_uid": leader.uid,
            "event_id": event_id,
            "teammates": [
                { "name": "Known", "email": "known@fest.test" },
                { "name": "New", "email": "new@fest.test" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["team_size"], 3);
    assert_eq!(body["members"][0]["known"], true);
    assert_eq!(body["members"][1]["known"], false);

    // Dry-run: the unknown teammate was not materialized
    let (status, _) = call(
        &ctx,
        "POST",
        "/api/users",
        Some(serde_json::json!({ "name": "New", "email": "new@fest.test" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn validate_team_rejects_self_add_with_clear_message() {
    let ctx = setup().await;
    let event_id = seed_event(&ctx, "Hackathon", EventType::Group, 50_000, 2, 4).await;
    let leader = seed_user(&ctx, "Lena", "lena@fest.test").await;

    let (status, body) = call(
        &ctx,
        "POST",
        "/api/events/validate-team",
        Some(serde_json::json!({
            "leader_uid": leader.uid,
            "event_id": event_id,
            "teammates": [
                { "name": "Lena", "email": "LENA@fest.test" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E2001");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("cannot be added as a teammate"));
}
