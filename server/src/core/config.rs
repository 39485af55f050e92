use crate::auth::JwtConfig;

/// Payment gateway credentials and endpoint.
///
/// The `secret_key` doubles as the webhook HMAC secret, matching the
/// gateway's signing scheme.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub app_id: String,
    pub secret_key: String,
    pub api_version: String,
}

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | DB_PATH | ./data/eventflow.db | SQLite database file |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| production |
/// | GATEWAY_BASE_URL | https://sandbox.cashfree.com/pg | Gateway API base |
/// | GATEWAY_APP_ID | (sandbox placeholder) | Gateway client id |
/// | GATEWAY_SECRET_KEY | (sandbox placeholder) | Gateway secret, also signs webhooks |
/// | GATEWAY_API_VERSION | 2023-08-01 | Gateway API version header |
/// | WEBHOOK_NOTIFY_URL | http://localhost:3000/api/webhooks/cashfree | Webhook callback we register on orders |
/// | DEFAULT_RETURN_URL | http://localhost:3000/payment/return | Checkout return page |
/// | REQUEST_TIMEOUT_MS | 30000 | Outbound HTTP timeout |
/// | NOTIFY_SINK_URL | (unset) | Notification sink; log-only when unset |
/// | JWT_SECRET | (dev default) | Staff token signing secret |
/// | JWT_EXPIRATION_MINUTES | 720 | Staff token lifetime |
/// | BOOTSTRAP_ADMIN_PASSWORD | (unset) | Seeds an `admin` staff row when the table is empty |
/// | LOG_DIR | (unset) | Daily-rolling file logs; stdout-only when unset |
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub http_port: u16,
    /// development | production
    pub environment: String,
    pub jwt: JwtConfig,
    pub gateway: GatewayConfig,
    /// Callback URL registered on every gateway order
    pub webhook_notify_url: String,
    /// Checkout return page used when the cart does not supply one
    pub default_return_url: String,
    pub request_timeout_ms: u64,
    /// Notification sink endpoint; None means log-only delivery
    pub notify_sink_url: Option<String>,
    pub bootstrap_admin_password: Option<String>,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, with defaults
    /// suitable for local development against the gateway sandbox.
    pub fn from_env() -> Self {
        let http_port: u16 = std::env::var("HTTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        Self {
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "./data/eventflow.db".into()),
            http_port,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            jwt: JwtConfig {
                secret: std::env::var("JWT_SECRET")
                    .unwrap_or_else(|_| JwtConfig::default().secret),
                expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(720),
                issuer: "eventflow-server".into(),
            },
            gateway: GatewayConfig {
                base_url: std::env::var("GATEWAY_BASE_URL")
                    .unwrap_or_else(|_| "https://sandbox.cashfree.com/pg".into()),
                app_id: std::env::var("GATEWAY_APP_ID")
                    .unwrap_or_else(|_| "sandbox-app-id".into()),
                secret_key: std::env::var("GATEWAY_SECRET_KEY")
                    .unwrap_or_else(|_| "sandbox-secret-key".into()),
                api_version: std::env::var("GATEWAY_API_VERSION")
                    .unwrap_or_else(|_| "2023-08-01".into()),
            },
            webhook_notify_url: std::env::var("WEBHOOK_NOTIFY_URL").unwrap_or_else(|_| {
                format!("http://localhost:{http_port}/api/webhooks/cashfree")
            }),
            default_return_url: std::env::var("DEFAULT_RETURN_URL")
                .unwrap_or_else(|_| format!("http://localhost:{http_port}/payment/return")),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30000),
            notify_sink_url: std::env::var("NOTIFY_SINK_URL").ok(),
            bootstrap_admin_password: std::env::var("BOOTSTRAP_ADMIN_PASSWORD").ok(),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
