//! # Application Context
//!
//! The explicit object that replaces ambient globals: it owns the store
//! handle, the admin gate and the session flags, and every component
//! receives it through its constructor.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  init_tracing()                                                         │
//! │       │                                                                 │
//! │  AppConfig::from_user_dirs()                                            │
//! │       │                                                                 │
//! │  license file present? ──no──► AppError::LicenseMissing                 │
//! │       │ yes                    (shell runs license::activate, retries)  │
//! │       ▼                                                                 │
//! │  AppContext::initialize ──► open store (THE one fatal failure)          │
//! │       │                                                                 │
//! │       ├──► spawn_rate_poller()   (hourly feed)                          │
//! │       └──► products().sync_counts()   (repair drift from last run)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use caja_db::{Database, DbConfig};
use caja_rates::{RateFeedResult, RatePoller};

use crate::auth::AdminGate;
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::license;

/// Initializes the tracing subscriber once, honoring `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Shared application state: configuration, the open store, the admin
/// gate, and the per-session flags.
#[derive(Debug)]
pub struct AppContext {
    config: AppConfig,
    db: Database,
    gate: AdminGate,
    /// Whether the operator has unlocked admin mode this session.
    admin_unlocked: AtomicBool,
}

impl AppContext {
    /// Full startup: license check, data directory, store open.
    ///
    /// Being unable to open the store is the only fatal error in the
    /// system - the caller aborts startup on `Err(AppError::Db(..))`.
    /// A missing license is not fatal: the shell runs the activation
    /// flow and calls `initialize` again.
    pub async fn initialize(config: AppConfig) -> AppResult<Arc<Self>> {
        if !license::check_license_file(&config.license_path()) {
            return Err(AppError::LicenseMissing);
        }

        std::fs::create_dir_all(&config.data_dir)
            .map_err(|err| AppError::DataDir(err.to_string()))?;

        let db = Database::new(DbConfig::new(config.database_path())).await?;

        info!(data_dir = %config.data_dir.display(), "Application context ready");
        Ok(Self::with_database(config, db))
    }

    /// Builds a context around an already-open store. Used after license
    /// activation and by tests (with an in-memory database).
    pub fn with_database(config: AppConfig, db: Database) -> Arc<Self> {
        let gate = AdminGate::new(config.admin_password.clone());
        Arc::new(AppContext {
            config,
            db,
            gate,
            admin_unlocked: AtomicBool::new(false),
        })
    }

    /// The open store.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// The configuration this context was built from.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The admin password gate.
    pub fn gate(&self) -> &AdminGate {
        &self.gate
    }

    /// Verifies the admin password and flips the session flag on success.
    pub fn unlock_admin(&self, password: &str) -> AppResult<()> {
        self.gate.verify(password)?;
        self.admin_unlocked.store(true, Ordering::Relaxed);
        Ok(())
    }

    /// Drops admin mode (module exit, operator change).
    pub fn lock_admin(&self) {
        self.admin_unlocked.store(false, Ordering::Relaxed);
    }

    /// Whether admin mode is unlocked this session.
    pub fn admin_unlocked(&self) -> bool {
        self.admin_unlocked.load(Ordering::Relaxed)
    }

    /// The rate the register converts with right now: the latest stored
    /// observation, or the defined sentinel of 1.0 when the store has no
    /// rate yet ("no conversion" - totals display as unavailable).
    pub async fn rate_or_sentinel(&self) -> f64 {
        match self.db.rates().latest().await {
            Ok(Some(record)) => record.rate,
            Ok(None) => 1.0,
            Err(err) => {
                tracing::warn!(error = %err, "Rate lookup failed; using sentinel");
                1.0
            }
        }
    }

    /// Spawns the hourly rate poller on the runtime.
    pub fn spawn_rate_poller(&self) -> RateFeedResult<tokio::task::JoinHandle<()>> {
        let poller = RatePoller::new(self.config.rate_feed.clone(), self.db.rates())?;
        Ok(tokio::spawn(poller.run()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_context() -> Arc<AppContext> {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        AppContext::with_database(AppConfig::rooted_at(dir.path()), db)
    }

    #[tokio::test]
    async fn initialize_without_license_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::rooted_at(dir.path());

        let err = AppContext::initialize(config).await.unwrap_err();
        assert!(matches!(err, AppError::LicenseMissing));
    }

    #[tokio::test]
    async fn initialize_after_activation_opens_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::rooted_at(dir.path());

        license::activate(&config.license_path(), "CAJA-POS-7F2K-9QXV-2026").unwrap();

        let ctx = AppContext::initialize(config).await.unwrap();
        assert!(ctx.db().health_check().await);
        assert!(config_dir_has_db(dir.path()));
    }

    fn config_dir_has_db(dir: &std::path::Path) -> bool {
        dir.join("caja.db").exists()
    }

    #[tokio::test]
    async fn admin_unlock_flow() {
        let ctx = test_context().await;
        assert!(!ctx.admin_unlocked());

        assert!(ctx.unlock_admin("wrong").is_err());
        assert!(!ctx.admin_unlocked());

        ctx.unlock_admin("mb25adminx#").unwrap();
        assert!(ctx.admin_unlocked());

        ctx.lock_admin();
        assert!(!ctx.admin_unlocked());
    }

    #[tokio::test]
    async fn rate_sentinel_when_store_is_empty() {
        let ctx = test_context().await;
        assert_eq!(ctx.rate_or_sentinel().await, 1.0);

        ctx.db().rates().record(36.5, "manual").await.unwrap();
        assert!((ctx.rate_or_sentinel().await - 36.5).abs() < 1e-12);
    }
}
