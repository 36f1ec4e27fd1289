//! # Report Error Types
//!
//! Summaries are best-effort and never fail as a whole - a broken bucket
//! query reads as zero (see [`crate::summary`]). The only hard errors in
//! this crate come from writing the export file.

use thiserror::Error;

/// Report generation errors.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The export document could not be written to the chosen path.
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;
