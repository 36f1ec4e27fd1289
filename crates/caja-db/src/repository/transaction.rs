//! # Transaction Repository (Sale/Return Ledger)
//!
//! The append-only record of completed, returned, cancelled and
//! forced-closed drafts. One table holds both directions; the status tag
//! tells them apart.
//!
//! ## Commit Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       commit_sale(cart, ...)                            │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    for each cart line:                                                  │
//! │      re-read current stock          ← defense against staleness since   │
//! │      stock < qty? ──► error ─┐         the line was staged              │
//! │      debit unit + bulk stock │                                          │
//! │    append ledger row         │                                          │
//! │  COMMIT                      └──► ROLLBACK: no stock change, no row     │
//! │                                                                         │
//! │  Cancelled / ForcedClosure rows skip the stock loop entirely - the      │
//! │  items were never actually debited, so there is nothing to restore.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are immutable once written: this repository exposes no update or
//! delete.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbResult;
use crate::repository::product::ProductRepository;
use caja_core::{Cart, CoreError, PaymentMethod, SaleStatus, TransactionRecord};

const TRANSACTION_COLUMNS: &str =
    "id, recorded_at, total_cents, local_total, rate, detail, payment_method, status";

/// Repository for the sale/return ledger.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Commits a sale: debits stock for every line and appends one
    /// `Completed` row, atomically.
    ///
    /// Every line is re-validated against *current* stock inside the
    /// transaction; any shortfall rolls the whole unit back and surfaces
    /// `CoreError::InsufficientStock`. The cart stays staged so the
    /// operator can correct it.
    pub async fn commit_sale(
        &self,
        cart: &Cart,
        payment_method: PaymentMethod,
        rate: f64,
    ) -> DbResult<TransactionRecord> {
        if cart.is_empty() {
            return Err(CoreError::EmptyDraft.into());
        }

        let record = build_record(cart, payment_method, rate, SaleStatus::Completed)?;

        let mut tx = self.pool.begin().await?;

        for line in cart.lines() {
            ProductRepository::apply_stock_delta(&mut tx, &line.product_id, -line.quantity)
                .await?;
        }

        insert_record(&mut tx, &record).await?;
        tx.commit().await?;

        info!(
            id = %record.id,
            total = %record.total(),
            method = ?payment_method,
            "Sale committed"
        );
        Ok(record)
    }

    /// Commits a return: credits stock for every line (no ceiling) and
    /// appends one `Return` row, atomically. When aggregated into period
    /// totals the row's value counts negative.
    pub async fn commit_return(
        &self,
        cart: &Cart,
        payment_method: PaymentMethod,
        rate: f64,
    ) -> DbResult<TransactionRecord> {
        if cart.is_empty() {
            return Err(CoreError::EmptyDraft.into());
        }

        let record = build_record(cart, payment_method, rate, SaleStatus::Return)?;

        let mut tx = self.pool.begin().await?;

        for line in cart.lines() {
            ProductRepository::apply_stock_delta(&mut tx, &line.product_id, line.quantity)
                .await?;
        }

        insert_record(&mut tx, &record).await?;
        tx.commit().await?;

        info!(
            id = %record.id,
            total = %record.total(),
            "Return committed; inventory credited"
        );
        Ok(record)
    }

    /// Records an abandoned sale for audit. Inventory is NOT touched -
    /// cancellation happens before/instead of commit, so the items were
    /// never debited.
    pub async fn record_cancelled_sale(
        &self,
        cart: &Cart,
        payment_method: PaymentMethod,
        rate: f64,
    ) -> DbResult<TransactionRecord> {
        self.record_audit_row(cart, payment_method, rate, SaleStatus::Cancelled)
            .await
    }

    /// Records a forced closure: the application is shutting down over a
    /// non-empty sale cart and the operator confirmed abandoning it.
    /// Audit-only; no inventory effect.
    pub async fn record_forced_closure(
        &self,
        cart: &Cart,
        payment_method: PaymentMethod,
        rate: f64,
    ) -> DbResult<TransactionRecord> {
        self.record_audit_row(cart, payment_method, rate, SaleStatus::ForcedClosure)
            .await
    }

    async fn record_audit_row(
        &self,
        cart: &Cart,
        payment_method: PaymentMethod,
        rate: f64,
        status: SaleStatus,
    ) -> DbResult<TransactionRecord> {
        if cart.is_empty() {
            return Err(CoreError::EmptyDraft.into());
        }

        let record = build_record(cart, payment_method, rate, status)?;

        let mut tx = self.pool.begin().await?;
        insert_record(&mut tx, &record).await?;
        tx.commit().await?;

        debug!(id = %record.id, status = ?status, "Audit row recorded");
        Ok(record)
    }

    /// Gets a ledger row by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<TransactionRecord>> {
        let record = sqlx::query_as::<_, TransactionRecord>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Recent rows, newest first, optionally filtered by status (the
    /// report screen's status dropdown).
    pub async fn list_recent(
        &self,
        status: Option<SaleStatus>,
        limit: u32,
    ) -> DbResult<Vec<TransactionRecord>> {
        let records = match status {
            Some(status) => {
                sqlx::query_as::<_, TransactionRecord>(&format!(
                    "SELECT {TRANSACTION_COLUMNS} FROM transactions \
                     WHERE status = ? ORDER BY recorded_at DESC, id DESC LIMIT ?"
                ))
                .bind(status)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, TransactionRecord>(&format!(
                    "SELECT {TRANSACTION_COLUMNS} FROM transactions \
                     ORDER BY recorded_at DESC, id DESC LIMIT ?"
                ))
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(records)
    }

    /// All rows in the inclusive timestamp range, oldest first (reporting).
    pub async fn in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<TransactionRecord>> {
        let records = sqlx::query_as::<_, TransactionRecord>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions \
             WHERE recorded_at >= ? AND recorded_at <= ? \
             ORDER BY recorded_at, id"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Total row count (diagnostics and tests).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Builds the immutable row for a cart: totals, rate conversion, frozen
/// line snapshot.
fn build_record(
    cart: &Cart,
    payment_method: PaymentMethod,
    rate: f64,
    status: SaleStatus,
) -> DbResult<TransactionRecord> {
    let total = cart.total();
    let detail = serde_json::to_string(&cart.snapshots())?;

    Ok(TransactionRecord {
        id: Uuid::new_v4().to_string(),
        recorded_at: Utc::now(),
        total_cents: total.cents(),
        local_total: total.to_local(rate),
        rate,
        detail,
        payment_method,
        status,
    })
}

async fn insert_record(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    record: &TransactionRecord,
) -> DbResult<()> {
    sqlx::query(
        "INSERT INTO transactions ( \
             id, recorded_at, total_cents, local_total, rate, detail, \
             payment_method, status \
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&record.id)
    .bind(record.recorded_at)
    .bind(record.total_cents)
    .bind(record.local_total)
    .bind(record.rate)
    .bind(&record.detail)
    .bind(record.payment_method)
    .bind(record.status)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
