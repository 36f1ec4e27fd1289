//! # Cash Advance Repository
//!
//! The register hands local-currency cash to a customer against a card or
//! mobile payment, charging a fixed 20% commission on the principal. Each
//! operation is one immutable row; no inventory interaction.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::error::DbResult;
use caja_core::{
    validation, AdvanceRecord, CoreError, Money, OperationStatus, PaymentMethod,
    ADVANCE_COMMISSION,
};

const ADVANCE_COLUMNS: &str =
    "id, principal_cents, commission_cents, total_cents, payment_method, status, recorded_at";

/// Repository for the cash-advance ledger.
#[derive(Debug, Clone)]
pub struct AdvanceRepository {
    pool: SqlitePool,
}

impl AdvanceRepository {
    /// Creates a new AdvanceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AdvanceRepository { pool }
    }

    /// Records a cash advance: commission = 20% of the principal,
    /// total = principal + commission.
    ///
    /// `Concretized` means the customer paid and took the cash;
    /// `Cancelled` rows are recorded for audit when the operation is
    /// abandoned at the confirmation step.
    pub async fn commit(
        &self,
        principal: Money,
        payment_method: PaymentMethod,
        status: OperationStatus,
    ) -> DbResult<AdvanceRecord> {
        validation::validate_positive_amount(principal, "principal")
            .map_err(CoreError::from)?;

        let commission = principal.commission(ADVANCE_COMMISSION);
        let record = AdvanceRecord {
            id: Uuid::new_v4().to_string(),
            principal_cents: principal.cents(),
            commission_cents: commission.cents(),
            total_cents: (principal + commission).cents(),
            payment_method,
            status,
            recorded_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO cash_advances ( \
                 id, principal_cents, commission_cents, total_cents, \
                 payment_method, status, recorded_at \
             ) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(record.principal_cents)
        .bind(record.commission_cents)
        .bind(record.total_cents)
        .bind(record.payment_method)
        .bind(record.status)
        .bind(record.recorded_at)
        .execute(&self.pool)
        .await?;

        info!(
            id = %record.id,
            principal = %record.principal(),
            total = %record.total(),
            status = ?status,
            "Cash advance recorded"
        );
        Ok(record)
    }

    /// Recent rows, newest first, optionally filtered by status.
    pub async fn list_recent(
        &self,
        status: Option<OperationStatus>,
        limit: u32,
    ) -> DbResult<Vec<AdvanceRecord>> {
        let records = match status {
            Some(status) => {
                sqlx::query_as::<_, AdvanceRecord>(&format!(
                    "SELECT {ADVANCE_COLUMNS} FROM cash_advances \
                     WHERE status = ? ORDER BY recorded_at DESC, id DESC LIMIT ?"
                ))
                .bind(status)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, AdvanceRecord>(&format!(
                    "SELECT {ADVANCE_COLUMNS} FROM cash_advances \
                     ORDER BY recorded_at DESC, id DESC LIMIT ?"
                ))
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(records)
    }

    /// Rows in the inclusive timestamp range, oldest first (reporting).
    pub async fn in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<AdvanceRecord>> {
        let records = sqlx::query_as::<_, AdvanceRecord>(&format!(
            "SELECT {ADVANCE_COLUMNS} FROM cash_advances \
             WHERE recorded_at >= ? AND recorded_at <= ? \
             ORDER BY recorded_at, id"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
