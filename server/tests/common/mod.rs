//! Shared test harness: tempfile-backed database, mock gateway, and
//! seed helpers.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use base64::Engine;
use ring::hmac;
use tempfile::TempDir;

use eventflow_server::auth::{password, JwtConfig};
use eventflow_server::core::{Config, GatewayConfig, ServerState};
use eventflow_server::db::models::{EventCreate, EventType, PaymentStatus, Staff, StaffRole, User};
use eventflow_server::db::repository::{event as event_repo, staff as staff_repo, user as user_repo};
use eventflow_server::db::DbService;
use eventflow_server::payments::gateway::{
    GatewayError, GatewayOrderRequest, GatewaySession, PaymentGateway,
};

pub const TEST_GATEWAY_SECRET: &str = "test-gateway-secret";

/// Gateway stand-in: hands out deterministic sessions, counts calls,
/// and can be flipped to fail.
pub struct MockGateway {
    pub calls: AtomicUsize,
    pub fail_next: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_next: AtomicBool::new(false),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_order(&self, req: GatewayOrderRequest) -> Result<GatewaySession, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(GatewayError::Transport("mock gateway down".into()));
        }
        Ok(GatewaySession {
            payment_session_id: format!("session_{}", req.order_id),
        })
    }
}

pub struct TestContext {
    pub state: ServerState,
    pub gateway: Arc<MockGateway>,
    _dir: TempDir,
}

pub fn test_config(db_path: String) -> Config {
    Config {
        db_path,
        http_port: 0,
        environment: "test".into(),
        jwt: JwtConfig::default(),
        gateway: GatewayConfig {
            base_url: "http://localhost:1".into(),
            app_id: "test-app".into(),
            secret_key: TEST_GATEWAY_SECRET.into(),
            api_version: "2023-08-01".into(),
        },
        webhook_notify_url: "http://localhost/api/webhooks/cashfree".into(),
        default_return_url: "http://localhost/payment/return".into(),
        request_timeout_ms: 1000,
        notify_sink_url: None,
        bootstrap_admin_password: None,
        log_dir: None,
    }
}

pub async fn setup() -> TestContext {
    let dir = TempDir::new().expect("tempdir");
    let db_path = dir.path().join("test.db").to_string_lossy().to_string();
    let db = DbService::new(&db_path).await.expect("db init");

    let gateway = Arc::new(MockGateway::new());
    let state = ServerState::with_gateway(
        test_config(db_path),
        db.pool,
        gateway.clone() as Arc<dyn PaymentGateway>,
    );

    TestContext {
        state,
        gateway,
        _dir: dir,
    }
}

pub async fn seed_event(
    ctx: &TestContext,
    name: &str,
    event_type: EventType,
    fee_paise: i64,
    min_team_size: i64,
    max_team_size: i64,
) -> i64 {
    event_repo::create(
        &ctx.state.pool,
        EventCreate {
            name: name.into(),
            event_type,
            fee_paise,
            min_team_size,
            max_team_size,
            description: None,
            event_date: None,
            start_time: None,
            end_time: None,
        },
    )
    .await
    .expect("seed event")
}

pub async fn seed_user(ctx: &TestContext, name: &str, email: &str) -> User {
    let uid = user_repo::allocate_uid(&ctx.state.pool).await.expect("uid");
    let id = user_repo::insert(
        &ctx.state.pool,
        &uid,
        email,
        name,
        None,
        None,
        false,
        PaymentStatus::Unpaid,
    )
    .await
    .expect("seed user");
    user_repo::find_by_id(&ctx.state.pool, id)
        .await
        .expect("lookup")
        .expect("seeded user exists")
}

pub async fn seed_staff(
    ctx: &TestContext,
    username: &str,
    plain_password: &str,
    role: StaffRole,
    assigned_event_id: Option<i64>,
) -> Staff {
    let hash = password::hash_password(plain_password).expect("hash");
    let id = staff_repo::insert(&ctx.state.pool, username, &hash, role, assigned_event_id)
        .await
        .expect("seed staff");
    staff_repo::find_by_id(&ctx.state.pool, id)
        .await
        .expect("lookup")
        .expect("seeded staff exists")
}

/// Build a signed webhook delivery the way the gateway would send it.
pub fn signed_webhook(order_id: &str, payment_status: &str) -> (String, String, String) {
    let body = serde_json::json!({
        "data": {
            "order": { "order_id": order_id },
            "payment": {
                "cf_payment_id": 123456,
                "payment_status": payment_status,
            }
        }
    })
    .to_string();

    let timestamp = "1724900000000".to_string();
    let key = hmac::Key::new(hmac::HMAC_SHA256, TEST_GATEWAY_SECRET.as_bytes());
    let tag = hmac::sign(&key, format!("{timestamp}{body}").as_bytes());
    let signature = base64::engine::general_purpose::STANDARD.encode(tag.as_ref());

    (body, timestamp, signature)
}
