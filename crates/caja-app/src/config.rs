//! # Application Configuration
//!
//! The register runs from a fixed per-user data directory - the store
//! file and the license file live there and the path is never asked for.
//! Everything else (store display name, admin password, feed settings,
//! display locale) has working defaults and can be overridden by the
//! shell before [`crate::context::AppContext`] is built.

use std::path::PathBuf;

use caja_core::format::Locale;
use caja_rates::PollerConfig;

use crate::error::{AppError, AppResult};

/// Subdirectory of the platform data dir that owns all register state.
const APP_DIR: &str = "caja-pos";

/// Store-file directory inside [`APP_DIR`].
const DB_DIR: &str = "MDB";

/// Default store file name.
const DB_FILE: &str = "caja.db";

/// Default administrator password; deployments override it in config.
const DEFAULT_ADMIN_PASSWORD: &str = "mb25adminx#";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the store and license files.
    pub data_dir: PathBuf,

    /// Store file name inside `data_dir`.
    pub database_file: String,

    /// Store name printed on reports.
    pub store_name: String,

    /// Password gating administrative actions (product edit/delete,
    /// cart-line removal, returns).
    pub admin_password: String,

    /// Rate feed settings (source URL, poll period).
    pub rate_feed: PollerConfig,

    /// Separator convention for rendered amounts.
    pub locale: Locale,
}

impl AppConfig {
    /// Resolves the fixed per-user data directory and returns the
    /// default configuration rooted there. The directory itself is
    /// created later, at context initialization.
    pub fn from_user_dirs() -> AppResult<Self> {
        let base = dirs::data_local_dir()
            .ok_or_else(|| AppError::DataDir("no per-user data directory".to_string()))?;

        Ok(AppConfig::rooted_at(base.join(APP_DIR).join(DB_DIR)))
    }

    /// Configuration rooted at an explicit directory (tests point this
    /// at a temp dir).
    pub fn rooted_at(data_dir: impl Into<PathBuf>) -> Self {
        AppConfig {
            data_dir: data_dir.into(),
            database_file: DB_FILE.to_string(),
            store_name: "Caja POS".to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            rate_feed: PollerConfig::default(),
            locale: Locale::EsVe,
        }
    }

    /// Full path of the store file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    /// Full path of the license activation file.
    pub fn license_path(&self) -> PathBuf {
        self.data_dir.join(crate::license::LICENSE_FILE)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_derive_from_data_dir() {
        let config = AppConfig::rooted_at("/tmp/caja-test");
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/caja-test/caja.db")
        );
        assert_eq!(
            config.license_path(),
            PathBuf::from("/tmp/caja-test/license.key")
        );
    }

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::rooted_at("/tmp/caja-test");
        assert_eq!(config.locale, Locale::EsVe);
        assert_eq!(config.rate_feed.period.as_secs(), 3600);
        assert!(!config.admin_password.is_empty());
    }
}
