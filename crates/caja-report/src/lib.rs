//! # caja-report: Period Reporting for Caja POS
//!
//! Reads the ledgers and the rate history after the fact and produces:
//!
//! - [`summary`] - the executive period summary (six buckets + grand net)
//! - [`detail`]  - the row-level tables behind the export document
//! - [`export`]  - paginated plain-text rendering to an operator path
//!
//! Reporting never mutates the store, and it is best-effort by design:
//! a failing bucket query reads as zero so one broken table dependency
//! cannot abort the whole summary.

pub mod detail;
pub mod error;
pub mod export;
pub mod summary;

pub use detail::{fetch_period_details, AdvanceLine, PeriodDetails};
pub use error::{ReportError, ReportResult};
pub use export::{render_report, write_report};
pub use summary::{summarize, BucketTotal, PeriodSummary};
