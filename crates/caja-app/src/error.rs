//! # Application Error Types
//!
//! What the operator-facing shell sees. Everything here is recoverable -
//! reported, then the application keeps running - with one exception:
//! failing to open the local store at startup aborts the launch.

use thiserror::Error;

/// Application-layer errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// No valid activation file; the shell must run the activation flow.
    #[error("License not activated on this machine")]
    LicenseMissing,

    /// The key typed during activation does not match.
    #[error("Invalid license key")]
    InvalidLicenseKey,

    /// Wrong administrator password; the gated action was not invoked.
    /// Retry is allowed inline.
    #[error("Incorrect administrator password")]
    Unauthorized,

    /// The per-user data directory could not be determined or created.
    #[error("Data directory unavailable: {0}")]
    DataDir(String),

    /// Storage failure (the enclosing transaction was rolled back).
    #[error(transparent)]
    Db(#[from] caja_db::DbError),

    /// Business rule violation surfaced outside a storage call.
    #[error(transparent)]
    Domain(#[from] caja_core::CoreError),

    /// Rate feed failure (degrades to "rate unavailable").
    #[error(transparent)]
    Feed(#[from] caja_rates::RateFeedError),

    /// The export document could not be written.
    #[error(transparent)]
    Report(#[from] caja_report::ReportError),

    /// Filesystem failure (license file, exports).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<caja_core::ValidationError> for AppError {
    fn from(err: caja_core::ValidationError) -> Self {
        AppError::Domain(err.into())
    }
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;
