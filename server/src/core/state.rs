use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::info;

use crate::auth::{password, JwtService};
use crate::core::Config;
use crate::db::repository::staff as staff_repo;
use crate::db::DbService;
use crate::db::models::StaffRole;
use crate::notify::NotificationSink;
use crate::payments::gateway::{CashfreeGateway, PaymentGateway};
use crate::utils::AppResult;

/// Shared application state, cloned into every handler.
///
/// | Field | Description |
/// |-------|-------------|
/// | config | Immutable configuration |
/// | pool | SQLite connection pool |
/// | gateway | Payment gateway client (trait object, mocked in tests) |
/// | notifier | Fire-and-forget notification sink |
/// | jwt | Staff token service |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
    pub gateway: Arc<dyn PaymentGateway>,
    pub notifier: NotificationSink,
    pub jwt: Arc<JwtService>,
}

impl ServerState {
    /// Initialize the full state: database (with migrations), gateway
    /// client, notification sink, JWT service, and the bootstrap admin.
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let db = DbService::new(&config.db_path).await?;
        let gateway: Arc<dyn PaymentGateway> =
            Arc::new(CashfreeGateway::new(&config.gateway, config.request_timeout()));
        let state = Self::with_gateway(config, db.pool, gateway);
        state.seed_bootstrap_admin().await?;
        Ok(state)
    }

    /// Assemble state around an existing pool and gateway. Tests use
    /// this with a mock gateway and a tempfile database.
    pub fn with_gateway(
        config: Config,
        pool: SqlitePool,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        let notifier =
            NotificationSink::new(config.notify_sink_url.clone(), config.request_timeout());
        let jwt = Arc::new(JwtService::new(config.jwt.clone()));
        Self {
            config: Arc::new(config),
            pool,
            gateway,
            notifier,
            jwt,
        }
    }

    /// Seed an `admin` staff account when the staff table is empty and
    /// a bootstrap password is configured. Without it a fresh install
    /// has no way to log into the staff console.
    pub async fn seed_bootstrap_admin(&self) -> AppResult<()> {
        let Some(password) = self.config.bootstrap_admin_password.as_deref() else {
            return Ok(());
        };
        if !staff_repo::find_all(&self.pool).await?.is_empty() {
            return Ok(());
        }

        let hash = password::hash_password(password)?;
        staff_repo::insert(&self.pool, "admin", &hash, StaffRole::Admin, None).await?;
        info!("Bootstrap admin account created");
        Ok(())
    }
}
