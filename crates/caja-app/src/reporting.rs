//! # Report Export Service
//!
//! Glue between the executive-summary screen and `caja-report`: build
//! the period summary, fetch the detail tables, and write the paginated
//! document to the operator-chosen path.

use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use caja_report::{fetch_period_details, summarize, write_report, PeriodSummary};

use crate::context::AppContext;
use crate::error::AppResult;

/// Builds the period summary for the summary screen. Best-effort, like
/// everything in reporting: never fails, broken buckets read zero.
pub async fn period_summary(
    ctx: &AppContext,
    start_day: NaiveDate,
    end_day: NaiveDate,
) -> PeriodSummary {
    summarize(ctx.db(), start_day, end_day).await
}

/// Exports the full report (summary + three detail tables) to `path`.
/// Returns the summary that was rendered.
pub async fn export_period_report(
    ctx: &AppContext,
    start_day: NaiveDate,
    end_day: NaiveDate,
    path: &Path,
) -> AppResult<PeriodSummary> {
    let summary = summarize(ctx.db(), start_day, end_day).await;
    let details = fetch_period_details(ctx.db(), start_day, end_day).await;

    write_report(
        path,
        &ctx.config().store_name,
        &summary,
        &details,
        ctx.config().locale,
    )?;

    info!(path = %path.display(), "Period report exported");
    Ok(summary)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use caja_core::{Money, OperationStatus, PaymentMethod};
    use caja_db::{Database, DbConfig};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn export_writes_the_document_and_returns_the_summary() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::with_database(AppConfig::rooted_at(dir.path()), db);

        ctx.db().rates().record(50.0, "manual").await.unwrap();
        ctx.db()
            .advances()
            .commit(
                Money::from_cents(10_000),
                PaymentMethod::CardTerminal,
                OperationStatus::Concretized,
            )
            .await
            .unwrap();

        let today = Utc::now().date_naive();
        let (start, end) = (today - Duration::days(1), today + Duration::days(1));
        let path = dir.path().join("report.txt");

        let summary = export_period_report(&ctx, start, end, &path)
            .await
            .unwrap();

        assert!((summary.advance_principal.local - 100.0).abs() < 1e-9);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("III. CASH ADVANCES"));
        assert!(contents.contains("CAJA POS"));
    }

    #[tokio::test]
    async fn export_to_an_unwritable_path_errors() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::with_database(AppConfig::rooted_at(dir.path()), db);

        let today = Utc::now().date_naive();
        let path = dir.path().join("missing-subdir").join("report.txt");

        let err = export_period_report(&ctx, today, today, &path)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::AppError::Report(_)));
    }
}
