//! # Phone Recharge Repository
//!
//! Prepaid phone top-ups sold at the counter: base amount plus a fixed
//! 15% commission, recorded in local currency against the recharged
//! number. One immutable row per operation; no inventory interaction.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::error::DbResult;
use caja_core::{
    validation, CoreError, Money, OperationStatus, PaymentMethod, RechargeRecord,
    RECHARGE_COMMISSION,
};

const RECHARGE_COLUMNS: &str = "id, phone_number, base_cents, commission_cents, total_cents, \
     payment_method, status, recorded_at";

/// Repository for the phone-recharge ledger.
#[derive(Debug, Clone)]
pub struct RechargeRepository {
    pool: SqlitePool,
}

impl RechargeRepository {
    /// Creates a new RechargeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RechargeRepository { pool }
    }

    /// Records a recharge: commission = 15% of the base amount,
    /// total = base + commission.
    pub async fn commit(
        &self,
        phone_number: &str,
        base: Money,
        payment_method: PaymentMethod,
        status: OperationStatus,
    ) -> DbResult<RechargeRecord> {
        validation::validate_phone_number(phone_number).map_err(CoreError::from)?;
        validation::validate_positive_amount(base, "base amount").map_err(CoreError::from)?;

        let commission = base.commission(RECHARGE_COMMISSION);
        let record = RechargeRecord {
            id: Uuid::new_v4().to_string(),
            phone_number: phone_number.trim().to_string(),
            base_cents: base.cents(),
            commission_cents: commission.cents(),
            total_cents: (base + commission).cents(),
            payment_method,
            status,
            recorded_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO phone_recharges ( \
                 id, phone_number, base_cents, commission_cents, total_cents, \
                 payment_method, status, recorded_at \
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.phone_number)
        .bind(record.base_cents)
        .bind(record.commission_cents)
        .bind(record.total_cents)
        .bind(record.payment_method)
        .bind(record.status)
        .bind(record.recorded_at)
        .execute(&self.pool)
        .await?;

        info!(
            id = %record.id,
            number = %record.phone_number,
            total = %record.total(),
            status = ?status,
            "Phone recharge recorded"
        );
        Ok(record)
    }

    /// Recent rows, newest first, optionally filtered by status.
    pub async fn list_recent(
        &self,
        status: Option<OperationStatus>,
        limit: u32,
    ) -> DbResult<Vec<RechargeRecord>> {
        let records = match status {
            Some(status) => {
                sqlx::query_as::<_, RechargeRecord>(&format!(
                    "SELECT {RECHARGE_COLUMNS} FROM phone_recharges \
                     WHERE status = ? ORDER BY recorded_at DESC, id DESC LIMIT ?"
                ))
                .bind(status)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, RechargeRecord>(&format!(
                    "SELECT {RECHARGE_COLUMNS} FROM phone_recharges \
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
    ) -> DbResult<Vec<RechargeRecord>> {
        let records = sqlx::query_as::<_, RechargeRecord>(&format!(
            "SELECT {RECHARGE_COLUMNS} FROM phone_recharges \
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
