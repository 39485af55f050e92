//! Webhook intake over HTTP: signature checks, idempotent duplicate
//! deliveries, and terminal-state protection.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use eventflow_server::db::models::{EventType, OrderStatus, PaymentMode, PaymentStatus};
use eventflow_server::db::repository::{payment_order, registration as reg_repo};
use eventflow_server::registration::cart::{BulkRegisterRequest, CartItem, TeammateInput};
use eventflow_server::registration::register_cart;

use common::{seed_event, seed_user, setup, signed_webhook, TestContext};

async fn submit_online_group_cart(ctx: &TestContext, teammates: &[&str]) -> String {
    let event_id = seed_event(ctx, "Hackathon", EventType::Group, 50_000, 2, 4).await;
    let leader = seed_user(ctx, "Lena", "lena@fest.test").await;

    let req = BulkRegisterRequest {
        leader_uid: leader.uid.clone(),
        items: vec![CartItem {
            event_id,
            team_name: Some("Bitwise".into()),
            teammates: teammates
                .iter()
                .map(|e| TeammateInput {
                    name: format!("Mate {e}"),
                    email: e.to_string(),
                })
                .collect(),
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
    .unwrap()
    .order_id
}

async fn deliver(
    ctx: &TestContext,
    body: &str,
    timestamp: &str,
    signature: &str,
) -> (StatusCode, serde_json::Value) {
    let app = eventflow_server::api::router(ctx.state.clone());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/webhooks/cashfree")
                .header("content-type", "application/json")
                .header("x-webhook-signature", signature)
                .header("x-webhook-timestamp", timestamp)
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn duplicate_delivery_is_idempotent() {
    let ctx = setup().await;
    let order_id = submit_online_group_cart(&ctx, &["mate1@fest.test", "mate2@fest.test"]).await;

    let (body, ts, sig) = signed_webhook(&order_id, "SUCCESS");

    let (status, ack) = deliver(&ctx, &body, &ts, &sig).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["status"], "ok");

    // Same delivery again: still 200, store unchanged
    let (status, ack) = deliver(&ctx, &body, &ts, &sig).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["status"], "ok");

    let regs = reg_repo::find_by_order(&ctx.state.pool, &order_id).await.unwrap();
    assert_eq!(regs.len(), 3);
    assert!(regs.iter().all(|r| r.payment_status == PaymentStatus::Paid));
}

#[tokio::test]
async fn bad_signature_is_dropped() {
    let ctx = setup().await;
    let order_id = submit_online_group_cart(&ctx, &["mate1@fest.test"]).await;

    let (body, ts, _) = signed_webhook(&order_id, "SUCCESS");
    let (status, ack) = deliver(&ctx, &body, &ts, "bm90LXRoZS1yaWdodC10YWc=").await;

    // Acked to stop retries, but flagged and not applied
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["status"], "error");

    let regs = reg_repo::find_by_order(&ctx.state.pool, &order_id).await.unwrap();
    assert!(regs.iter().all(|r| r.payment_status == PaymentStatus::Pending));
}

#[tokio::test]
async fn unknown_order_is_acked_and_dropped() {
    let ctx = setup().await;
    let (body, ts, sig) = signed_webhook("ORD_does_not_exist", "SUCCESS");
    let (status, ack) = deliver(&ctx, &body, &ts, &sig).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["status"], "ok");
}

#[tokio::test]
async fn success_after_terminal_state_is_ignored() {
    let ctx = setup().await;
    let order_id = submit_online_group_cart(&ctx, &["mate1@fest.test"]).await;

    // User abandoned checkout; order goes terminal
    let (body, ts, sig) = signed_webhook(&order_id, "USER_DROPPED");
    let (status, ack) = deliver(&ctx, &body, &ts, &sig).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["status"], "ok");

    let order = payment_order::find_by_id(&ctx.state.pool, &order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);

    // A late SUCCESS must not resurrect it
    let (body, ts, sig) = signed_webhook(&order_id, "SUCCESS");
    let (_, ack) = deliver(&ctx, &body, &ts, &sig).await;
    assert_eq!(ack["status"], "ok");

    let order = payment_order::find_by_id(&ctx.state.pool, &order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    let regs = reg_repo::find_by_order(&ctx.state.pool, &order_id).await.unwrap();
    assert!(regs.iter().all(|r| r.payment_status == PaymentStatus::Pending));
}

#[tokio::test]
async fn status_polling_reflects_settlement() {
    let ctx = setup().await;
    let order_id = submit_online_group_cart(&ctx, &["mate1@fest.test"]).await;

    let app = eventflow_server::api::router(ctx.state.clone());
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/payment/status/{order_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let view: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(view["status"], "PENDING");
    assert_eq!(view["amount_paise"], 50_000);

    let (body, ts, sig) = signed_webhook(&order_id, "SUCCESS");
    deliver(&ctx, &body, &ts, &sig).await;

    let app = eventflow_server::api::router(ctx.state.clone());
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/payment/status/{order_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let view: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(view["status"], "PAID");
    assert!(view["uid"].as_str().unwrap_or_default().starts_with("EVT-"));
}
