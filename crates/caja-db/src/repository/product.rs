//! # Product Repository (Inventory Ledger)
//!
//! Catalog CRUD plus the stock-delta contract every commit path uses.
//!
//! ## Dual Stock Counts
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Unit Stock vs Bulk Stock                            │
//! │                                                                         │
//! │  restock: +2 cases ──► bulk_stock += 2                                  │
//! │                        unit_stock = trunc(bulk_stock × units_per_bulk)  │
//! │                                                                         │
//! │  sale of 5 units   ──► unit_stock -= 5                                  │
//! │                        bulk_stock -= 5 / units_per_bulk  (fractional!)  │
//! │                                                                         │
//! │  return of 3 units ──► unit_stock += 3                                  │
//! │                        bulk_stock += 3 / units_per_bulk                 │
//! │                                                                         │
//! │  Float drift accumulates in bulk_stock; the maintenance sweep           │
//! │  (sync_counts) rewrites unit_stock from round(bulk × per_bulk) when     │
//! │  the two counts disagree by more than the tolerance.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock deltas run inside a caller-supplied SQLite transaction so the
//! update and the ledger append commit (or roll back) as one unit.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use caja_core::{CoreError, Product, STOCK_SYNC_TOLERANCE};

const PRODUCT_COLUMNS: &str = "id, barcode, name, description, cost_cents, price_cents, \
     unit_stock, bulk_stock, units_per_bulk, bulk_cost_cents, margin_pct, \
     created_at, updated_at";

/// Repository for product/catalog database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` when the barcode is already registered -
    /// the add-product flow checks first, this is the backstop.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(barcode = %product.barcode, name = %product.name, "Inserting product");

        sqlx::query(
            "INSERT INTO products ( \
                 id, barcode, name, description, cost_cents, price_cents, \
                 unit_stock, bulk_stock, units_per_bulk, bulk_cost_cents, margin_pct, \
                 created_at, updated_at \
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&product.id)
        .bind(&product.barcode)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.cost_cents)
        .bind(product.price_cents)
        .bind(product.unit_stock)
        .bind(product.bulk_stock)
        .bind(product.units_per_bulk)
        .bind(product.bulk_cost_cents)
        .bind(product.margin_pct)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a product by its UUID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its barcode (the scanner path).
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = ?"
        ))
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Whether a barcode is already registered (add-product precheck).
    pub async fn barcode_exists(&self, barcode: &str) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE barcode = ?")
                .bind(barcode)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    /// Lists the catalog, name-ordered (the inventory screen).
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Updates an editable product's fields.
    ///
    /// The barcode is immutable and `bulk_stock` only moves through
    /// restocking and commits; everything else (including the re-derived
    /// prices and the recomputed unit stock) is written from `product`.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET \
                 name = ?, description = ?, cost_cents = ?, price_cents = ?, \
                 unit_stock = ?, units_per_bulk = ?, bulk_cost_cents = ?, \
                 margin_pct = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.cost_cents)
        .bind(product.price_cents)
        .bind(product.unit_stock)
        .bind(product.units_per_bulk)
        .bind(product.bulk_cost_cents)
        .bind(product.margin_pct)
        .bind(now)
        .bind(&product.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Restocks: adds whole (or fractional) bulk packages.
    ///
    /// `unit_stock` is recomputed as `trunc(new_bulk_stock × units_per_bulk)`
    /// - a partial case never mints a unit that is not physically there.
    /// Returns the refreshed product.
    pub async fn add_bulk_stock(&self, id: &str, bulks: f64) -> DbResult<Product> {
        caja_core::validation::validate_bulk_count(bulks).map_err(CoreError::from)?;

        let product = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))?;

        let new_bulk_stock = product.bulk_stock + bulks;
        let new_unit_stock = if product.tracks_bulk() {
            (new_bulk_stock * product.units_per_bulk).trunc() as i64
        } else {
            product.unit_stock
        };

        debug!(
            id = %id,
            bulks = %bulks,
            new_bulk_stock = %new_bulk_stock,
            new_unit_stock = %new_unit_stock,
            "Adding bulk stock"
        );

        let now = Utc::now();

        sqlx::query(
            "UPDATE products SET unit_stock = ?, bulk_stock = ?, updated_at = ? WHERE id = ?",
        )
        .bind(new_unit_stock)
        .bind(new_bulk_stock)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Applies a signed unit-stock delta inside `tx`.
    ///
    /// Sales pass a negative delta; returns pass a positive one. The
    /// precondition for debits - current stock covers the quantity - is
    /// checked against the row as it exists *now*, immediately before the
    /// write; a violation errors out and the caller's rollback leaves
    /// both the product row and the ledger untouched.
    ///
    /// When the product tracks bulk, `bulk_stock` moves by
    /// `unit_delta / units_per_bulk` and stays fractional at this step.
    pub async fn apply_stock_delta(
        tx: &mut Transaction<'_, Sqlite>,
        product_id: &str,
        unit_delta: i64,
    ) -> DbResult<()> {
        let row = sqlx::query_as::<_, (String, i64, f64, f64)>(
            "SELECT barcode, unit_stock, bulk_stock, units_per_bulk \
             FROM products WHERE id = ?",
        )
        .bind(product_id)
        .fetch_optional(&mut **tx)
        .await?;

        let (barcode, unit_stock, bulk_stock, units_per_bulk) =
            row.ok_or_else(|| DbError::not_found("Product", product_id))?;

        if unit_delta < 0 && unit_stock < -unit_delta {
            return Err(CoreError::InsufficientStock {
                barcode,
                available: unit_stock,
                requested: -unit_delta,
            }
            .into());
        }

        let new_unit_stock = unit_stock + unit_delta;

        if units_per_bulk > 0.0 {
            let new_bulk_stock = bulk_stock + unit_delta as f64 / units_per_bulk;
            sqlx::query("UPDATE products SET unit_stock = ?, bulk_stock = ? WHERE id = ?")
                .bind(new_unit_stock)
                .bind(new_bulk_stock)
                .bind(product_id)
                .execute(&mut **tx)
                .await?;
        } else {
            sqlx::query("UPDATE products SET unit_stock = ? WHERE id = ?")
                .bind(new_unit_stock)
                .bind(product_id)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }

    /// Maintenance sweep repairing accumulated float drift.
    ///
    /// For every product with a positive units-per-bulk, recompute
    /// `round(bulk_stock × units_per_bulk)` and overwrite the unit count
    /// when it disagrees with the stored value by more than the tolerance.
    /// Not invoked on every write - callers run it at module open or on
    /// demand. Returns the number of products repaired.
    pub async fn sync_counts(&self) -> DbResult<u32> {
        let rows = sqlx::query_as::<_, (String, i64, f64, f64)>(
            "SELECT id, unit_stock, bulk_stock, units_per_bulk \
             FROM products WHERE units_per_bulk > 0",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut tx = self.pool.begin().await?;
        let mut repaired = 0u32;

        for (id, unit_stock, bulk_stock, units_per_bulk) in rows {
            let theoretical = (bulk_stock * units_per_bulk).round();
            if (unit_stock as f64 - theoretical).abs() > STOCK_SYNC_TOLERANCE {
                sqlx::query("UPDATE products SET unit_stock = ? WHERE id = ?")
                    .bind(theoretical as i64)
                    .bind(&id)
                    .execute(&mut *tx)
                    .await?;
                repaired += 1;
            }
        }

        tx.commit().await?;

        if repaired > 0 {
            debug!(repaired = repaired, "Inventory counts synchronized");
        }
        Ok(repaired)
    }

    /// Hard-deletes a product (authorized flow only). Past ledger rows
    /// keep their copied snapshots, so nothing dangles.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Total catalog size.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Generates a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use caja_core::money::Money;
    use caja_core::pricing::derive_unit_pricing;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn test_product(barcode: &str, bulk_stock: f64, units_per_bulk: f64) -> Product {
        let pricing =
            derive_unit_pricing(Money::from_cents(3000), units_per_bulk.max(1.0), 20.0).unwrap();
        let now = Utc::now();
        Product {
            id: generate_product_id(),
            barcode: barcode.to_string(),
            name: format!("Product {barcode}"),
            description: Some("test".to_string()),
            cost_cents: pricing.cost.cents(),
            price_cents: pricing.price.cents(),
            unit_stock: (bulk_stock * units_per_bulk).round() as i64,
            bulk_stock,
            units_per_bulk,
            bulk_cost_cents: 3000,
            margin_pct: 20.0,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn insert_and_fetch_by_barcode() {
        let db = test_db().await;
        let repo = db.products();
        let product = test_product("750100", 10.0, 12.0);

        repo.insert(&product).await.unwrap();

        let fetched = repo.get_by_barcode("750100").await.unwrap().unwrap();
        assert_eq!(fetched.id, product.id);
        assert_eq!(fetched.unit_stock, 120);
        assert!((fetched.bulk_stock - 10.0).abs() < 1e-9);
        assert!(repo.barcode_exists("750100").await.unwrap());
        assert!(!repo.barcode_exists("999999").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_barcode_is_rejected() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&test_product("750100", 1.0, 12.0)).await.unwrap();
        let err = repo
            .insert(&test_product("750100", 2.0, 6.0))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn restock_truncates_partial_units() {
        let db = test_db().await;
        let repo = db.products();
        let mut product = test_product("750100", 0.0, 12.0);
        product.unit_stock = 0;
        repo.insert(&product).await.unwrap();

        // 1.5 cases of 12 = 18 units exactly
        let updated = repo.add_bulk_stock(&product.id, 1.5).await.unwrap();
        assert_eq!(updated.unit_stock, 18);
        assert!((updated.bulk_stock - 1.5).abs() < 1e-9);

        // +0.4 cases = 22.8 units -> 22 on the shelf
        let updated = repo.add_bulk_stock(&product.id, 0.4).await.unwrap();
        assert_eq!(updated.unit_stock, 22);
    }

    #[tokio::test]
    async fn restock_rejects_non_positive_count() {
        let db = test_db().await;
        let repo = db.products();
        let product = test_product("750100", 1.0, 12.0);
        repo.insert(&product).await.unwrap();

        assert!(repo.add_bulk_stock(&product.id, 0.0).await.is_err());
        assert!(repo.add_bulk_stock(&product.id, -2.0).await.is_err());
    }

    #[tokio::test]
    async fn stock_delta_moves_both_counts() {
        let db = test_db().await;
        let repo = db.products();
        let product = test_product("750100", 10.0, 12.0);
        repo.insert(&product).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        ProductRepository::apply_stock_delta(&mut tx, &product.id, -5)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        // units_per_bulk=12, bulk=10 (120 units), sale of 5:
        // unit_stock 115, bulk_stock 10 - 5/12 ≈ 9.5833
        let fetched = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.unit_stock, 115);
        assert!((fetched.bulk_stock - (10.0 - 5.0 / 12.0)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn debit_past_stock_errors_inside_tx() {
        let db = test_db().await;
        let repo = db.products();
        let product = test_product("750100", 0.25, 12.0); // 3 units
        repo.insert(&product).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        let err = ProductRepository::apply_stock_delta(&mut tx, &product.id, -4)
            .await
            .unwrap_err();
        drop(tx); // rollback

        assert!(matches!(
            err,
            DbError::Domain(CoreError::InsufficientStock {
                available: 3,
                requested: 4,
                ..
            })
        ));

        let fetched = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fetched.unit_stock, 3);
    }

    #[tokio::test]
    async fn sync_counts_repairs_drift() {
        let db = test_db().await;
        let repo = db.products();
        let mut product = test_product("750100", 10.0, 12.0);
        product.unit_stock = 117; // drifted away from round(10 * 12) = 120
        repo.insert(&product).await.unwrap();

        let in_sync = test_product("750200", 2.0, 6.0);
        repo.insert(&in_sync).await.unwrap();

        let repaired = repo.sync_counts().await.unwrap();
        assert_eq!(repaired, 1);

        let fixed = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(fixed.unit_stock, 120);

        // second sweep is a no-op
        assert_eq!(repo.sync_counts().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_removes_row_outright() {
        let db = test_db().await;
        let repo = db.products();
        let product = test_product("750100", 1.0, 12.0);
        repo.insert(&product).await.unwrap();

        repo.delete(&product.id).await.unwrap();
        assert!(repo.get_by_id(&product.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&product.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}
