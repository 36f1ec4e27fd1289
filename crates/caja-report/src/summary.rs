//! # Period Summary Aggregator
//!
//! Scans the three ledgers for an inclusive day range and buckets the
//! results.
//!
//! ## Conversion Rules (two, deliberately distinct)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Sales / returns     USD column is the stored base-currency total;      │
//! │                      local column is the stored rate-at-commit figure.  │
//! │                                                                         │
//! │  Advances /          Recorded in local currency only; the USD column    │
//! │  recharges           is converted PER ENTRY with the rate in force at   │
//! │                      that entry's timestamp (as_of), not a period rate. │
//! │                                                                         │
//! │  Headline rate       as_of(end of period), carried on the summary and   │
//! │                      printed in the report header as "rate used".       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Best-Effort Buckets
//! A failing query in any one bucket is logged and that bucket reads
//! zero; the other buckets still aggregate. One broken table dependency
//! must not take the whole summary down.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use tracing::warn;

use caja_db::Database;
use caja_core::{OperationStatus, SaleStatus};

// =============================================================================
// Summary Types
// =============================================================================

/// One bucket: a local-currency column and a USD column.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BucketTotal {
    pub local: f64,
    pub usd: f64,
}

impl BucketTotal {
    fn add(&mut self, local: f64, usd: f64) {
        self.local += local;
        self.usd += usd;
    }

    fn subtract(&mut self, local: f64, usd: f64) {
        self.local -= local;
        self.usd -= usd;
    }
}

/// Executive summary of a period.
#[derive(Debug, Clone)]
pub struct PeriodSummary {
    pub start_day: NaiveDate,
    pub end_day: NaiveDate,

    /// Rate in force at the end of the period (`as_of(end 23:59:59)`);
    /// `None` when the rate store is empty.
    pub headline_rate: Option<f64>,

    /// Completed sales (stored totals).
    pub net_sales: BucketTotal,
    /// Returns; carried negative so they subtract from the grand total.
    pub returns: BucketTotal,
    /// Concretized advance principal (USD converted per entry).
    pub advance_principal: BucketTotal,
    /// Concretized advance commissions (the house's cut).
    pub advance_commission: BucketTotal,
    /// Concretized recharge base amounts (USD converted per entry).
    pub recharge_base: BucketTotal,
    /// Concretized recharge commissions.
    pub recharge_commission: BucketTotal,
}

impl PeriodSummary {
    /// Net of every bucket (returns already carry their minus sign).
    pub fn grand_total(&self) -> BucketTotal {
        let mut total = BucketTotal::default();
        for bucket in self.buckets() {
            total.local += bucket.1.local;
            total.usd += bucket.1.usd;
        }
        total
    }

    /// Buckets in display order with their labels.
    pub fn buckets(&self) -> [(&'static str, BucketTotal); 6] {
        [
            ("Net sales", self.net_sales),
            ("Returns", self.returns),
            ("Cash advances (principal)", self.advance_principal),
            ("Advance commission earned", self.advance_commission),
            ("Phone recharges (base)", self.recharge_base),
            ("Recharge commission earned", self.recharge_commission),
        ]
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Inclusive day range as UTC timestamp bounds.
pub fn day_bounds(start_day: NaiveDate, end_day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = start_day.and_time(NaiveTime::MIN).and_utc();
    let end = end_day.and_time(NaiveTime::MIN).and_utc() + Duration::days(1)
        - Duration::nanoseconds(1);
    (start, end)
}

/// Builds the period summary. Pure read; never mutates the store and
/// never fails - broken buckets read zero.
pub async fn summarize(db: &Database, start_day: NaiveDate, end_day: NaiveDate) -> PeriodSummary {
    let (start, end) = day_bounds(start_day, end_day);

    let headline_rate = match db.rates().as_of(end).await {
        Ok(record) => record.map(|r| r.rate),
        Err(err) => {
            warn!(error = %err, "Headline rate lookup failed");
            None
        }
    };

    let mut summary = PeriodSummary {
        start_day,
        end_day,
        headline_rate,
        net_sales: BucketTotal::default(),
        returns: BucketTotal::default(),
        advance_principal: BucketTotal::default(),
        advance_commission: BucketTotal::default(),
        recharge_base: BucketTotal::default(),
        recharge_commission: BucketTotal::default(),
    };

    // 1. Sales and returns: stored columns, no re-conversion.
    match db.transactions().in_range(start, end).await {
        Ok(rows) => {
            for row in rows {
                let usd = row.total_cents as f64 / 100.0;
                match row.status {
                    SaleStatus::Completed => summary.net_sales.add(row.local_total, usd),
                    SaleStatus::Return => summary.returns.subtract(row.local_total, usd),
                    // audit rows never count toward money moved
                    SaleStatus::Cancelled | SaleStatus::ForcedClosure => {}
                }
            }
        }
        Err(err) => warn!(error = %err, "Sales bucket query failed; reading as zero"),
    }

    // 2. Cash advances: per-entry historical conversion.
    match db.advances().in_range(start, end).await {
        Ok(rows) => {
            for row in rows {
                if row.status != OperationStatus::Concretized {
                    continue;
                }
                let rate = rate_as_of(db, row.recorded_at).await;
                let principal = row.principal_cents as f64 / 100.0;
                let commission = row.commission_cents as f64 / 100.0;
                summary
                    .advance_principal
                    .add(principal, to_usd(principal, rate));
                summary
                    .advance_commission
                    .add(commission, to_usd(commission, rate));
            }
        }
        Err(err) => warn!(error = %err, "Advance bucket query failed; reading as zero"),
    }

    // 3. Phone recharges: per-entry historical conversion.
    match db.recharges().in_range(start, end).await {
        Ok(rows) => {
            for row in rows {
                if row.status != OperationStatus::Concretized {
                    continue;
                }
                let rate = rate_as_of(db, row.recorded_at).await;
                let base = row.base_cents as f64 / 100.0;
                let commission = row.commission_cents as f64 / 100.0;
                summary.recharge_base.add(base, to_usd(base, rate));
                summary
                    .recharge_commission
                    .add(commission, to_usd(commission, rate));
            }
        }
        Err(err) => warn!(error = %err, "Recharge bucket query failed; reading as zero"),
    }

    summary
}

/// Rate in force at `timestamp`; lookup failures read as unavailable.
async fn rate_as_of(db: &Database, timestamp: DateTime<Utc>) -> Option<f64> {
    match db.rates().as_of(timestamp).await {
        Ok(record) => record.map(|r| r.rate),
        Err(err) => {
            warn!(error = %err, "Per-entry rate lookup failed");
            None
        }
    }
}

/// Local → USD with the unavailable-rate sentinel: no rate, no conversion.
fn to_usd(local: f64, rate: Option<f64>) -> f64 {
    match rate {
        Some(rate) if rate > 0.0 => local / rate,
        _ => 0.0,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
