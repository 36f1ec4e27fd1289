//! # Exchange Rate Repository
//!
//! Timestamped history of the official exchange rate (local units per
//! USD), fed by the hourly scrape and by manual entry.
//!
//! ## Query Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  latest()    → highest-id row (the rate the register converts with)     │
//! │                                                                         │
//! │  as_of(T)    → most recent row with recorded_at <= T                    │
//! │                └─ none precedes T? fall back to latest()                │
//! │                └─ store empty?     None (callers show "unavailable")    │
//! │                                                                         │
//! │  record_if_changed(r) → insert only when |r - latest| > 1e-6, so an     │
//! │                         unchanged source polled hourly writes nothing   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use caja_core::{validation, CoreError, RateRecord, RATE_EPSILON};

/// Source tag for rows written by the automatic feed.
pub const SOURCE_FEED: &str = "official_feed";

/// Source tag for manually keyed rates.
pub const SOURCE_MANUAL: &str = "manual";

const RATE_COLUMNS: &str = "id, rate, source, recorded_at";

/// Repository for exchange-rate history.
#[derive(Debug, Clone)]
pub struct RateRepository {
    pool: SqlitePool,
}

impl RateRepository {
    /// Creates a new RateRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RateRepository { pool }
    }

    /// Most recent rate, or `None` when nothing has ever been recorded.
    pub async fn latest(&self) -> DbResult<Option<RateRecord>> {
        let record = sqlx::query_as::<_, RateRecord>(&format!(
            "SELECT {RATE_COLUMNS} FROM exchange_rates ORDER BY id DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// The rate in force at `timestamp`: the most recent row at or before
    /// it, falling back to the overall latest when nothing precedes it
    /// (a transaction recorded before the first rate observation still
    /// gets converted with *something*). `None` only when the store is
    /// empty.
    pub async fn as_of(&self, timestamp: DateTime<Utc>) -> DbResult<Option<RateRecord>> {
        let record = sqlx::query_as::<_, RateRecord>(&format!(
            "SELECT {RATE_COLUMNS} FROM exchange_rates \
             WHERE recorded_at <= ? \
             ORDER BY recorded_at DESC, id DESC LIMIT 1"
        ))
        .bind(timestamp)
        .fetch_optional(&self.pool)
        .await?;

        match record {
            Some(record) => Ok(Some(record)),
            None => self.latest().await,
        }
    }

    /// Unconditionally records a rate (manual entry path).
    pub async fn record(&self, rate: f64, source: &str) -> DbResult<RateRecord> {
        validation::validate_manual_rate(rate).map_err(CoreError::from)?;

        let recorded_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO exchange_rates (rate, source, recorded_at) VALUES (?, ?, ?)",
        )
        .bind(rate)
        .bind(source)
        .bind(recorded_at)
        .execute(&self.pool)
        .await?;

        info!(rate = rate, source = source, "Exchange rate recorded");

        Ok(RateRecord {
            id: result.last_insert_rowid(),
            rate,
            source: source.to_string(),
            recorded_at,
        })
    }

    /// Records a rate only when it actually moved.
    ///
    /// Safe to call on every poll cycle: when the scraped value is within
    /// `RATE_EPSILON` of the latest stored rate nothing is written, so an
    /// unchanged source never spams duplicate rows. Returns whether a row
    /// was inserted.
    pub async fn record_if_changed(&self, rate: f64, source: &str) -> DbResult<bool> {
        if let Some(latest) = self.latest().await? {
            if (rate - latest.rate).abs() <= RATE_EPSILON {
                debug!(rate = rate, "Rate unchanged; skipping insert");
                return Ok(false);
            }
            debug!(
                previous = latest.rate,
                current = rate,
                "Rate changed; recording"
            );
        }

        self.record(rate, source).await?;
        Ok(true)
    }

    /// Recent history, newest first (the rate screen shows the last 20).
    pub async fn history(&self, limit: u32) -> DbResult<Vec<RateRecord>> {
        let records = sqlx::query_as::<_, RateRecord>(&format!(
            "SELECT {RATE_COLUMNS} FROM exchange_rates ORDER BY id DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
