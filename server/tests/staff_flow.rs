//! Staff console over HTTP: login, role gates, cash token minting, and
//! the attendance gate.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use eventflow_server::db::models::{EventType, PaymentMode, StaffRole};
use eventflow_server::payments::tokens;
use eventflow_server::registration::cart::{BulkRegisterRequest, CartItem};
use eventflow_server::registration::register_cart;

use common::{seed_event, seed_staff, seed_user, setup, TestContext};

async fn call(
    ctx: &TestContext,
    method: &str,
    uri: &str,
    bearer: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let app = eventflow_server::api::router(ctx.state.clone());
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
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
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn login(ctx: &TestContext, username: &str, password: &str) -> String {
    let (status, body) = call(
        ctx,
        "POST",
        "/api/staff/login",
        None,
        Some(serde_json::json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("token in response").to_string()
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let ctx = setup().await;
    seed_staff(&ctx, "desk1", "cashier-pass", StaffRole::Cashier, None).await;

    let (status, body) = call(
        &ctx,
        "POST",
        "/api/staff/login",
        None,
        Some(serde_json::json!({ "username": "desk1", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E1003");

    // Unknown username looks identical to a wrong password
    let (status, body) = call(
        &ctx,
        "POST",
        "/api/staff/login",
        None,
        Some(serde_json::json!({ "username": "nobody", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E1003");
}

#[tokio::test]
async fn cashier_can_mint_tokens_guard_cannot() {
    let ctx = setup().await;
    seed_staff(&ctx, "desk1", "cashier-pass", StaffRole::Cashier, None).await;
    seed_staff(&ctx, "gate1", "guard-pass", StaffRole::Guard, None).await;

    let cashier_token = login(&ctx, "desk1", "cashier-pass").await;
    let (status, body) = call(
        &ctx,
        "POST",
        "/api/staff/generate-token",
        Some(&cashier_token),
        Some(serde_json::json!({ "amount_paise": 50_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "E0000");
    let code = body["data"]["token"].as_str().unwrap();
    assert_eq!(code.len(), 5);

    let guard_token = login(&ctx, "gate1", "guard-pass").await;
    let (status, body) = call(
        &ctx,
        "POST",
        "/api/staff/generate-token",
        Some(&guard_token),
        Some(serde_json::json!({ "amount_paise": 50_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "E1004");

    // No token at all
    let (status, _) = call(
        &ctx,
        "POST",
        "/api/staff/generate-token",
        None,
        Some(serde_json::json!({ "amount_paise": 50_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn attendance_requires_paid_registration() {
    let ctx = setup().await;
    let event_id = seed_event(&ctx, "Quiz", EventType::Solo, 20_000, 1, 1).await;
    let cashier = seed_staff(&ctx, "desk1", "cashier-pass", StaffRole::Cashier, None).await;
    seed_staff(&ctx, "gate1", "guard-pass", StaffRole::Guard, Some(event_id)).await;
    let user = seed_user(&ctx, "Sam", "sam@fest.test").await;
    let guard_token = login(&ctx, "gate1", "guard-pass").await;

    // Not registered at all
    let (status, body) = call(
        &ctx,
        "POST",
        "/api/staff/mark-attendance",
        Some(&guard_token),
        Some(serde_json::json!({ "uid": user.uid })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "E2003");

    // Registered but unpaid (online order still pending)
    let req = BulkRegisterRequest {
        leader_uid: user.uid.clone(),
        items: vec![CartItem {
            event_id,
            team_name: None,
            teammates: vec![],
        }],
        payment_mode: PaymentMode::Online,
        cash_token: None,
        return_url: None,
    };
    register_cart(
        &ctx.state.pool,
        ctx.gateway.as_ref(),
        &ctx.state.notifier,
        &ctx.state.config,
        req,
    )
    .await
    .unwrap();

    let (status, body) = call(
        &ctx,
        "POST",
        "/api/staff/mark-attendance",
        Some(&guard_token),
        Some(serde_json::json!({ "uid": user.uid })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E2006");

    // Pay by cash token on a fresh submission, then the gate opens
    let code = tokens::issue(&ctx.state.pool, 20_000, cashier.id).await.unwrap();
    let req = BulkRegisterRequest {
        leader_uid: user.uid.clone(),
        items: vec![CartItem {
            event_id,
            team_name: None,
            teammates: vec![],
        }],
        payment_mode: PaymentMode::Cash,
        cash_token: Some(code),
        return_url: None,
    };
    register_cart(
        &ctx.state.pool,
        ctx.gateway.as_ref(),
        &ctx.state.notifier,
        &ctx.state.config,
        req,
    )
    .await
    .unwrap();

    let (status, body) = call(
        &ctx,
        "POST",
        "/api/staff/mark-attendance",
        Some(&guard_token),
        Some(serde_json::json!({ "uid": user.uid })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["attended"], true);
    assert_eq!(body["already_checked_in"], false);

    // Second scan is an idempotent repeat, not an error
    let (status, body) = call(
        &ctx,
        "POST",
        "/api/staff/mark-attendance",
        Some(&guard_token),
        Some(serde_json::json!({ "uid": user.uid })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["already_checked_in"], true);
}

#[tokio::test]
async fn admin_passes_role_gates_and_manages_catalogue() {
    let ctx = setup().await;
    seed_staff(&ctx, "root", "admin-pass-123", StaffRole::Admin, None).await;
    let admin_token = login(&ctx, "root", "admin-pass-123").await;

    // Admin passes the cashier gate
    let (status, _) = call(
        &ctx,
        "POST",
        "/api/staff/generate-token",
        Some(&admin_token),
        Some(serde_json::json!({ "amount_paise": 10_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Create an event through the admin API
    let (status, event) = call(
        &ctx,
        "POST",
        "/api/admin/events",
        Some(&admin_token),
        Some(serde_json::json!({
            "name": "Robotics",
            "event_type": "GROUP",
            "fee_paise": 100_000,
            "min_team_size": 2,
            "max_team_size": 5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let event_id = event["id"].as_i64().unwrap();

    // It shows up in the public catalogue
    let (status, catalogue) = call(&ctx, "GET", "/api/events", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(catalogue
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["id"].as_i64() == Some(event_id)));

    // And deletes with its registrations
    let (status, body) = call(
        &ctx,
        "DELETE",
        &format!("/api/admin/events/{event_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "E0000");

    // Non-admin cannot touch the admin API
    seed_staff(&ctx, "gate1", "guard-pass", StaffRole::Guard, None).await;
    let guard_token = login(&ctx, "gate1", "guard-pass").await;
    let (status, _) = call(&ctx, "GET", "/api/admin/users", Some(&guard_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
