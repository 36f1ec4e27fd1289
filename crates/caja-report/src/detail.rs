//! # Period Detail Tables
//!
//! Row-level data behind the three detail sections of the exported
//! report: sales/returns movements, cash advances, phone recharges.
//! Like the summary, fetching is best-effort per table - a failing query
//! yields an empty section, never an aborted export.

use chrono::NaiveDate;
use tracing::warn;

use caja_db::Database;
use caja_core::{AdvanceRecord, RechargeRecord, TransactionRecord};

use crate::summary::day_bounds;

/// One advance row with its per-entry USD conversion already applied
/// (0.0 when no rate was in force).
#[derive(Debug, Clone)]
pub struct AdvanceLine {
    pub record: AdvanceRecord,
    pub principal_usd: f64,
    pub commission_usd: f64,
}

/// Detail rows for the report period.
#[derive(Debug, Clone, Default)]
pub struct PeriodDetails {
    /// All sale/return/cancelled/forced rows, oldest first.
    pub transactions: Vec<TransactionRecord>,
    /// All advance rows (any status), with per-entry conversions.
    pub advances: Vec<AdvanceLine>,
    /// All recharge rows (any status); local currency only.
    pub recharges: Vec<RechargeRecord>,
}

/// Fetches the period's detail rows.
pub async fn fetch_period_details(
    db: &Database,
    start_day: NaiveDate,
    end_day: NaiveDate,
) -> PeriodDetails {
    let (start, end) = day_bounds(start_day, end_day);
    let mut details = PeriodDetails::default();

    match db.transactions().in_range(start, end).await {
        Ok(rows) => details.transactions = rows,
        Err(err) => warn!(error = %err, "Transaction detail query failed; section empty"),
    }

    match db.advances().in_range(start, end).await {
        Ok(rows) => {
            for record in rows {
                let rate = match db.rates().as_of(record.recorded_at).await {
                    Ok(found) => found.map(|r| r.rate).filter(|r| *r > 0.0),
                    Err(err) => {
                        warn!(error = %err, "Advance detail rate lookup failed");
                        None
                    }
                };
                let principal = record.principal_cents as f64 / 100.0;
                let commission = record.commission_cents as f64 / 100.0;
                details.advances.push(AdvanceLine {
                    principal_usd: rate.map(|r| principal / r).unwrap_or(0.0),
                    commission_usd: rate.map(|r| commission / r).unwrap_or(0.0),
                    record,
                });
            }
        }
        Err(err) => warn!(error = %err, "Advance detail query failed; section empty"),
    }

    match db.recharges().in_range(start, end).await {
        Ok(rows) => details.recharges = rows,
        Err(err) => warn!(error = %err, "Recharge detail query failed; section empty"),
    }

    details
}

// =============================================================================
// Unit Tests
// =============================================================================
