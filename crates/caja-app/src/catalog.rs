//! # Catalog Service
//!
//! The product-management flows: add (barcode first, uniqueness checked
//! before the form), edit, restock and delete. Prices are never typed
//! in - every create/edit re-derives the unit cost and sale price from
//! the bulk figures. Edit, restock and delete sit behind the admin gate;
//! delete additionally requires an explicit confirmation because it
//! removes the row outright.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use caja_core::pricing::derive_unit_pricing;
use caja_core::{validation, CoreError, Money, Product};
use caja_db::repository::product::generate_product_id;
use caja_db::DbError;

use crate::confirm::Confirm;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};

/// Input for the add-product flow.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub barcode: String,
    pub name: String,
    pub description: Option<String>,
    /// Bulk packages on hand at creation (> 0).
    pub bulk_stock: f64,
    /// Units per bulk package (> 0).
    pub units_per_bulk: f64,
    /// Purchase cost of one bulk package.
    pub bulk_cost: Money,
    /// Profit margin percent (< 100).
    pub margin_pct: f64,
}

/// Input for the edit-product flow. The barcode is immutable and the
/// bulk count only moves through restocking, so neither appears here.
#[derive(Debug, Clone)]
pub struct ProductEdit {
    pub name: String,
    pub description: Option<String>,
    pub units_per_bulk: f64,
    pub bulk_cost: Money,
    pub margin_pct: f64,
}

/// Product-management service.
pub struct CatalogService {
    ctx: Arc<AppContext>,
}

impl CatalogService {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        CatalogService { ctx }
    }

    /// Adds a product: validates the form, checks barcode uniqueness
    /// first, derives the unit prices, and computes the initial unit
    /// stock as `trunc(bulk_stock × units_per_bulk)`.
    pub async fn add_product(&self, input: NewProduct) -> AppResult<Product> {
        validation::validate_barcode(&input.barcode)?;
        validation::validate_product_name(&input.name)?;
        validation::validate_bulk_count(input.bulk_stock)?;
        validation::validate_units_per_bulk(input.units_per_bulk)?;
        validation::validate_margin_pct(input.margin_pct)?;

        let barcode = input.barcode.trim().to_string();
        if self.ctx.db().products().barcode_exists(&barcode).await? {
            return Err(DbError::UniqueViolation {
                field: "products.barcode".to_string(),
                value: barcode,
            }
            .into());
        }

        let pricing = derive_unit_pricing(input.bulk_cost, input.units_per_bulk, input.margin_pct)?;

        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            barcode,
            name: input.name.trim().to_string(),
            description: input.description,
            cost_cents: pricing.cost.cents(),
            price_cents: pricing.price.cents(),
            unit_stock: (input.bulk_stock * input.units_per_bulk).trunc() as i64,
            bulk_stock: input.bulk_stock,
            units_per_bulk: input.units_per_bulk,
            bulk_cost_cents: input.bulk_cost.cents(),
            margin_pct: input.margin_pct,
            created_at: now,
            updated_at: now,
        };

        self.ctx.db().products().insert(&product).await?;
        info!(barcode = %product.barcode, price = %product.price(), "Product added");
        Ok(product)
    }

    /// Edits a product (admin-gated). Prices are re-derived and the unit
    /// stock is recomputed against the unchanged bulk count, since a new
    /// units-per-bulk changes how many sellable units the same cases
    /// hold.
    pub async fn edit_product(
        &self,
        product_id: &str,
        edit: ProductEdit,
        password: &str,
    ) -> AppResult<Product> {
        self.ctx.gate().verify(password)?;

        validation::validate_product_name(&edit.name)?;
        validation::validate_units_per_bulk(edit.units_per_bulk)?;
        validation::validate_margin_pct(edit.margin_pct)?;

        let mut product = self
            .ctx
            .db()
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| {
                AppError::Domain(CoreError::ProductNotFound(product_id.to_string()))
            })?;

        let pricing = derive_unit_pricing(edit.bulk_cost, edit.units_per_bulk, edit.margin_pct)?;

        product.name = edit.name.trim().to_string();
        product.description = edit.description;
        product.units_per_bulk = edit.units_per_bulk;
        product.bulk_cost_cents = edit.bulk_cost.cents();
        product.margin_pct = edit.margin_pct;
        product.cost_cents = pricing.cost.cents();
        product.price_cents = pricing.price.cents();
        product.unit_stock = (product.bulk_stock * edit.units_per_bulk).trunc() as i64;

        self.ctx.db().products().update(&product).await?;
        info!(id = %product.id, price = %product.price(), "Product updated");
        Ok(product)
    }

    /// Restocks a product by barcode (admin-gated, confirmed).
    pub async fn restock(
        &self,
        barcode: &str,
        bulks: f64,
        password: &str,
        confirm: &dyn Confirm,
    ) -> AppResult<Option<Product>> {
        self.ctx.gate().verify(password)?;
        validation::validate_bulk_count(bulks)?;

        let product = self.lookup(barcode).await?;

        let prompt = format!(
            "Add {bulks} bulk package(s) to '{}' (currently {:.2})?",
            product.name, product.bulk_stock
        );
        if !confirm.confirm(&prompt) {
            return Ok(None);
        }

        let updated = self
            .ctx
            .db()
            .products()
            .add_bulk_stock(&product.id, bulks)
            .await?;
        Ok(Some(updated))
    }

    /// Deletes a product outright (admin-gated, confirmed). History is
    /// unaffected: ledger rows carry copied snapshots, not references.
    pub async fn delete_product(
        &self,
        barcode: &str,
        password: &str,
        confirm: &dyn Confirm,
    ) -> AppResult<bool> {
        self.ctx.gate().verify(password)?;

        let product = self.lookup(barcode).await?;

        let prompt = format!(
            "Permanently delete '{}' (barcode {})?",
            product.name, product.barcode
        );
        if !confirm.confirm(&prompt) {
            return Ok(false);
        }

        self.ctx.db().products().delete(&product.id).await?;
        info!(barcode = %product.barcode, "Product deleted");
        Ok(true)
    }

    async fn lookup(&self, barcode: &str) -> AppResult<Product> {
        validation::validate_barcode(barcode)?;
        let barcode = barcode.trim();
        self.ctx
            .db()
            .products()
            .get_by_barcode(barcode)
            .await?
            .ok_or_else(|| AppError::Domain(CoreError::ProductNotFound(barcode.to_string())))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::confirm::ScriptedConfirm;
    use caja_db::{Database, DbConfig};

    const ADMIN: &str = "mb25adminx#";

    async fn test_service() -> CatalogService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        CatalogService::new(AppContext::with_database(
            AppConfig::rooted_at(dir.path()),
            db,
        ))
    }

    fn new_product(barcode: &str) -> NewProduct {
        NewProduct {
            barcode: barcode.to_string(),
            name: "Case-of-12 item".to_string(),
            description: None,
            bulk_stock: 10.0,
            units_per_bulk: 12.0,
            bulk_cost: Money::from_cents(3000),
            margin_pct: 20.0,
        }
    }

    #[tokio::test]
    async fn add_product_derives_prices_and_stock() {
        let service = test_service().await;

        let product = service.add_product(new_product("750100")).await.unwrap();

        assert_eq!(product.cost_cents, 250);
        assert_eq!(product.price_cents, 313);
        assert_eq!(product.unit_stock, 120);
        assert!((product.bulk_stock - 10.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn duplicate_barcode_is_caught_up_front() {
        let service = test_service().await;
        service.add_product(new_product("750100")).await.unwrap();

        let err = service.add_product(new_product("750100")).await.unwrap_err();
        assert!(matches!(err, AppError::Db(DbError::UniqueViolation { .. })));
    }

    #[tokio::test]
    async fn margin_at_100_is_rejected() {
        let service = test_service().await;
        let mut input = new_product("750100");
        input.margin_pct = 100.0;

        assert!(service.add_product(input).await.is_err());
    }

    #[tokio::test]
    async fn edit_rederives_prices_and_unit_stock() {
        let service = test_service().await;
        let product = service.add_product(new_product("750100")).await.unwrap();

        let edit = ProductEdit {
            name: "Renamed item".to_string(),
            description: Some("now with a note".to_string()),
            units_per_bulk: 6.0, // same cases now hold half the units
            bulk_cost: Money::from_cents(3000),
            margin_pct: 50.0,
        };

        // gate first
        assert!(matches!(
            service
                .edit_product(&product.id, edit.clone(), "guess")
                .await
                .unwrap_err(),
            AppError::Unauthorized
        ));

        let updated = service.edit_product(&product.id, edit, ADMIN).await.unwrap();
        assert_eq!(updated.name, "Renamed item");
        assert_eq!(updated.cost_cents, 500); // 3000 / 6
        assert_eq!(updated.price_cents, 1000); // 500 / 0.5
        assert_eq!(updated.unit_stock, 60); // 10 cases × 6
        assert_eq!(updated.barcode, "750100"); // immutable
    }

    #[tokio::test]
    async fn restock_is_gated_and_confirmed() {
        let service = test_service().await;
        service.add_product(new_product("750100")).await.unwrap();

        assert!(matches!(
            service
                .restock("750100", 2.0, "guess", &ScriptedConfirm::with_answers([true]))
                .await
                .unwrap_err(),
            AppError::Unauthorized
        ));

        let declined = service
            .restock("750100", 2.0, ADMIN, &ScriptedConfirm::with_answers([false]))
            .await
            .unwrap();
        assert!(declined.is_none());

        let updated = service
            .restock("750100", 2.0, ADMIN, &ScriptedConfirm::with_answers([true]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.unit_stock, 144); // (10 + 2) × 12
    }

    #[tokio::test]
    async fn delete_requires_gate_and_confirmation() {
        let service = test_service().await;
        let product = service.add_product(new_product("750100")).await.unwrap();

        let declined = service
            .delete_product("750100", ADMIN, &ScriptedConfirm::with_answers([false]))
            .await
            .unwrap();
        assert!(!declined);

        let deleted = service
            .delete_product("750100", ADMIN, &ScriptedConfirm::with_answers([true]))
            .await
            .unwrap();
        assert!(deleted);

        assert!(service
            .ctx
            .db()
            .products()
            .get_by_id(&product.id)
            .await
            .unwrap()
            .is_none());
    }
}
