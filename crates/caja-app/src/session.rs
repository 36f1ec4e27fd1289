//! # Register Sessions
//!
//! The services driving each draft transaction from `Empty` through
//! `Staging` to a terminal state. They own the in-memory cart, talk to
//! the store through the context, and ask every yes/no question through
//! the injected [`Confirm`] port - no widget toolkit in sight.
//!
//! ## Who Checks What
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_by_barcode     product exists?  sale ceiling at add time           │
//! │  remove_line        admin password ──► confirm ──► drop whole line      │
//! │  finalize (sale)    non-empty ──► "customer paid?" ──► atomic commit    │
//! │                     (commit re-validates stock; shortfall keeps the     │
//! │                      cart staged for correction)                        │
//! │  cancel             non-empty ──► confirm ──► audit row, stock intact   │
//! │  handle_close       live cart at shutdown ──► confirm ──► forced        │
//! │                     closure audit row; decline keeps the app open      │
//! │  finalize (return)  admin password ──► confirm ──► atomic credit        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use caja_core::format::format_amount;
use caja_core::{
    validation, AdvanceRecord, Cart, CartKind, CoreError, Money, OperationStatus, PaymentMethod,
    RechargeRecord, TransactionRecord, ADVANCE_COMMISSION, RECHARGE_COMMISSION,
};

use crate::confirm::Confirm;
use crate::context::AppContext;
use crate::error::{AppError, AppResult};

// =============================================================================
// Checkout Session (sales)
// =============================================================================

/// One operator's sale in progress.
pub struct CheckoutSession {
    ctx: Arc<AppContext>,
    cart: Cart,
}

impl CheckoutSession {
    /// Opens a fresh, empty draft.
    pub fn new(ctx: Arc<AppContext>) -> Self {
        CheckoutSession {
            ctx,
            cart: Cart::new(CartKind::Sale),
        }
    }

    /// The staged cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Whether a draft is live (blocks module exit and app close).
    pub fn is_active(&self) -> bool {
        !self.cart.is_empty()
    }

    /// Base-currency total of the staged lines.
    pub fn total(&self) -> Money {
        self.cart.total()
    }

    /// Local-currency display total at the current rate.
    pub async fn local_total(&self) -> f64 {
        self.total().to_local(self.ctx.rate_or_sentinel().await)
    }

    /// Scans one unit of a product into the cart.
    pub async fn add_by_barcode(&mut self, barcode: &str) -> AppResult<()> {
        validation::validate_barcode(barcode)?;

        let barcode = barcode.trim();
        let product = self
            .ctx
            .db()
            .products()
            .get_by_barcode(barcode)
            .await?
            .ok_or_else(|| AppError::Domain(CoreError::ProductNotFound(barcode.to_string())))?;

        self.cart.add(&product)?;
        Ok(())
    }

    /// Removes an entire line - admin password first, then an explicit
    /// confirmation. Returns `false` when the operator declines; the
    /// cart is untouched in every non-`Ok(true)` outcome.
    pub async fn remove_line(
        &mut self,
        product_id: &str,
        password: &str,
        confirm: &dyn Confirm,
    ) -> AppResult<bool> {
        self.ctx.gate().verify(password)?;

        let prompt = {
            let line = self
                .cart
                .lines()
                .find(|line| line.product_id == product_id)
                .ok_or_else(|| {
                    AppError::Domain(CoreError::ProductNotFound(product_id.to_string()))
                })?;
            format!(
                "Remove ALL {} unit(s) of '{}' from the cart?",
                line.quantity, line.name
            )
        };

        if !confirm.confirm(&prompt) {
            return Ok(false);
        }

        self.cart.remove(product_id);
        Ok(true)
    }

    /// Finalizes the sale: payment confirmation, then the atomic commit.
    ///
    /// Returns `None` when the operator backs out at the confirmation.
    /// On a stock shortfall the commit has already rolled back and the
    /// error propagates with the cart still staged, so the operator can
    /// remove the offending line and retry.
    pub async fn finalize(
        &mut self,
        method: PaymentMethod,
        confirm: &dyn Confirm,
    ) -> AppResult<Option<TransactionRecord>> {
        if self.cart.is_empty() {
            return Err(CoreError::EmptyDraft.into());
        }

        let locale = self.ctx.config().locale;
        let prompt = format!(
            "Customer paid the total of $ {}?",
            format_amount(self.cart.total(), locale)
        );
        if !confirm.confirm(&prompt) {
            return Ok(None);
        }

        let rate = self.ctx.rate_or_sentinel().await;
        let record = self
            .ctx
            .db()
            .transactions()
            .commit_sale(&self.cart, method, rate)
            .await?;

        self.cart.clear();
        Ok(Some(record))
    }

    /// Abandons the sale, writing the `Cancelled` audit row. Inventory
    /// is untouched. Returns `None` when the operator backs out.
    pub async fn cancel(
        &mut self,
        method: PaymentMethod,
        confirm: &dyn Confirm,
    ) -> AppResult<Option<TransactionRecord>> {
        if self.cart.is_empty() {
            return Err(CoreError::EmptyDraft.into());
        }

        let locale = self.ctx.config().locale;
        let prompt = format!(
            "CANCEL the current purchase of $ {}? It will be recorded as Cancelled for audit.",
            format_amount(self.cart.total(), locale)
        );
        if !confirm.confirm(&prompt) {
            return Ok(None);
        }

        let rate = self.ctx.rate_or_sentinel().await;
        let record = self
            .ctx
            .db()
            .transactions()
            .record_cancelled_sale(&self.cart, method, rate)
            .await?;

        self.cart.clear();
        Ok(Some(record))
    }

    /// Host application is closing. An empty cart closes silently; a
    /// live one requires the operator to confirm abandoning it, which
    /// writes the `ForcedClosure` audit row. Returns whether the app may
    /// close.
    pub async fn handle_close(&mut self, confirm: &dyn Confirm) -> AppResult<bool> {
        if self.cart.is_empty() {
            return Ok(true);
        }

        let locale = self.ctx.config().locale;
        let prompt = format!(
            "A sale of $ {} is pending. Close anyway and record a forced-closure report?",
            format_amount(self.cart.total(), locale)
        );
        if !confirm.confirm(&prompt) {
            return Ok(false);
        }

        let rate = self.ctx.rate_or_sentinel().await;
        self.ctx
            .db()
            .transactions()
            .record_forced_closure(&self.cart, PaymentMethod::default(), rate)
            .await?;

        self.cart.clear();
        Ok(true)
    }
}

// =============================================================================
// Return Session
// =============================================================================

/// One operator's return in progress. The inverse of a sale: no stock
/// ceiling while staging, stock credited at commit, and the whole flow
/// sits behind the admin gate.
pub struct ReturnSession {
    ctx: Arc<AppContext>,
    cart: Cart,
}

impl ReturnSession {
    /// Opens a fresh, empty return draft.
    pub fn new(ctx: Arc<AppContext>) -> Self {
        ReturnSession {
            ctx,
            cart: Cart::new(CartKind::Return),
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn is_active(&self) -> bool {
        !self.cart.is_empty()
    }

    pub fn total(&self) -> Money {
        self.cart.total()
    }

    /// Scans one unit to be credited back. No ceiling.
    pub async fn add_by_barcode(&mut self, barcode: &str) -> AppResult<()> {
        validation::validate_barcode(barcode)?;

        let barcode = barcode.trim();
        let product = self
            .ctx
            .db()
            .products()
            .get_by_barcode(barcode)
            .await?
            .ok_or_else(|| AppError::Domain(CoreError::ProductNotFound(barcode.to_string())))?;

        self.cart.add(&product)?;
        Ok(())
    }

    /// Gated line removal, same contract as the sale cart's.
    pub async fn remove_line(
        &mut self,
        product_id: &str,
        password: &str,
        confirm: &dyn Confirm,
    ) -> AppResult<bool> {
        self.ctx.gate().verify(password)?;

        let prompt = {
            let line = self
                .cart
                .lines()
                .find(|line| line.product_id == product_id)
                .ok_or_else(|| {
                    AppError::Domain(CoreError::ProductNotFound(product_id.to_string()))
                })?;
            format!(
                "Remove ALL {} unit(s) of '{}' from the return?",
                line.quantity, line.name
            )
        };

        if !confirm.confirm(&prompt) {
            return Ok(false);
        }

        self.cart.remove(product_id);
        Ok(true)
    }

    /// Concretizes the return: admin authorization, refund confirmation,
    /// atomic stock credit + `Return` ledger row.
    pub async fn finalize(
        &mut self,
        method: PaymentMethod,
        password: &str,
        confirm: &dyn Confirm,
    ) -> AppResult<Option<TransactionRecord>> {
        if self.cart.is_empty() {
            return Err(CoreError::EmptyDraft.into());
        }

        self.ctx.gate().verify(password)?;

        let locale = self.ctx.config().locale;
        let prompt = format!(
            "Confirm the return and refund of $ {}?",
            format_amount(self.cart.total(), locale)
        );
        if !confirm.confirm(&prompt) {
            return Ok(None);
        }

        let rate = self.ctx.rate_or_sentinel().await;
        let record = self
            .ctx
            .db()
            .transactions()
            .commit_return(&self.cart, method, rate)
            .await?;

        self.cart.clear();
        Ok(Some(record))
    }

    /// Abandons the return draft. Unlike a sale cancellation this writes
    /// nothing - no reservation ever existed and no audit row is kept.
    pub fn cancel(&mut self, confirm: &dyn Confirm) -> AppResult<bool> {
        if self.cart.is_empty() {
            return Err(CoreError::EmptyDraft.into());
        }
        if !confirm.confirm("Discard the current return draft?") {
            return Ok(false);
        }
        self.cart.clear();
        Ok(true)
    }
}

// =============================================================================
// Counter Operations (advances, recharges, price check)
// =============================================================================

/// Performs a cash advance. The quote (principal, 20% commission, total)
/// is presented through the confirmation port; `None` when declined.
pub async fn perform_advance(
    ctx: &AppContext,
    principal: Money,
    method: PaymentMethod,
    confirm: &dyn Confirm,
) -> AppResult<Option<AdvanceRecord>> {
    validation::validate_positive_amount(principal, "principal")?;

    let locale = ctx.config().locale;
    let commission = principal.commission(ADVANCE_COMMISSION);
    let prompt = format!(
        "Hand out Bs. {} + Bs. {} commission = Bs. {} to collect. Concretize the advance?",
        format_amount(principal, locale),
        format_amount(commission, locale),
        format_amount(principal + commission, locale)
    );
    if !confirm.confirm(&prompt) {
        return Ok(None);
    }

    let record = ctx
        .db()
        .advances()
        .commit(principal, method, OperationStatus::Concretized)
        .await?;
    Ok(Some(record))
}

/// Explicitly cancels an advance in progress, keeping the audit row.
pub async fn cancel_advance(
    ctx: &AppContext,
    principal: Money,
    method: PaymentMethod,
    confirm: &dyn Confirm,
) -> AppResult<Option<AdvanceRecord>> {
    validation::validate_positive_amount(principal, "principal")?;

    if !confirm.confirm("Cancel the advance and record it for audit?") {
        return Ok(None);
    }

    let record = ctx
        .db()
        .advances()
        .commit(principal, method, OperationStatus::Cancelled)
        .await?;
    Ok(Some(record))
}

/// Performs a phone recharge; `None` when the payment is not confirmed
/// (nothing is recorded in that case - the top-up never happened).
pub async fn perform_recharge(
    ctx: &AppContext,
    phone_number: &str,
    base: Money,
    method: PaymentMethod,
    confirm: &dyn Confirm,
) -> AppResult<Option<RechargeRecord>> {
    validation::validate_phone_number(phone_number)?;
    validation::validate_positive_amount(base, "base amount")?;

    let locale = ctx.config().locale;
    let commission = base.commission(RECHARGE_COMMISSION);
    let prompt = format!(
        "Recharge {}: Bs. {} + Bs. {} commission = Bs. {} to collect. Customer paid?",
        phone_number.trim(),
        format_amount(base, locale),
        format_amount(commission, locale),
        format_amount(base + commission, locale)
    );
    if !confirm.confirm(&prompt) {
        return Ok(None);
    }

    let record = ctx
        .db()
        .recharges()
        .commit(phone_number, base, method, OperationStatus::Concretized)
        .await?;
    Ok(Some(record))
}

/// Explicitly cancels a recharge in progress, keeping the audit row.
pub async fn cancel_recharge(
    ctx: &AppContext,
    phone_number: &str,
    base: Money,
    method: PaymentMethod,
    confirm: &dyn Confirm,
) -> AppResult<Option<RechargeRecord>> {
    validation::validate_phone_number(phone_number)?;
    validation::validate_positive_amount(base, "base amount")?;

    if !confirm.confirm("Cancel the recharge and record it for audit?") {
        return Ok(None);
    }

    let record = ctx
        .db()
        .recharges()
        .commit(phone_number, base, method, OperationStatus::Cancelled)
        .await?;
    Ok(Some(record))
}

/// A price lookup for the consult screen.
#[derive(Debug, Clone)]
pub struct PriceQuote {
    pub name: String,
    pub price: Money,
    /// Rate used for the local figure; `None` when no rate is stored.
    pub rate: Option<f64>,
    /// Local-currency price; `None` when no rate is stored.
    pub local_price: Option<f64>,
}

/// Looks a product up by barcode for display only - no cart, no stock
/// effect.
pub async fn price_check(ctx: &AppContext, barcode: &str) -> AppResult<PriceQuote> {
    validation::validate_barcode(barcode)?;

    let barcode = barcode.trim();
    let product = ctx
        .db()
        .products()
        .get_by_barcode(barcode)
        .await?
        .ok_or_else(|| AppError::Domain(CoreError::ProductNotFound(barcode.to_string())))?;

    let rate = match ctx.db().rates().latest().await {
        Ok(record) => record.map(|r| r.rate),
        Err(_) => None,
    };

    Ok(PriceQuote {
        name: product.name.clone(),
        price: product.price(),
        rate,
        local_price: rate.map(|r| product.price().to_local(r)),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::confirm::ScriptedConfirm;
    use caja_core::{Product, SaleStatus};
    use caja_db::repository::product::generate_product_id;
    use caja_db::{Database, DbConfig, DbError};
    use chrono::Utc;

    const ADMIN: &str = "mb25adminx#";

    async fn test_context() -> Arc<AppContext> {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        AppContext::with_database(AppConfig::rooted_at(dir.path()), db)
    }

    async fn seed_product(ctx: &AppContext, barcode: &str, price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            barcode: barcode.to_string(),
            name: format!("Product {barcode}"),
            description: None,
            cost_cents: price_cents / 2,
            price_cents,
            unit_stock: stock,
            bulk_stock: stock as f64 / 12.0,
            units_per_bulk: 12.0,
            bulk_cost_cents: price_cents * 6,
            margin_pct: 50.0,
            created_at: now,
            updated_at: now,
        };
        ctx.db().products().insert(&product).await.unwrap();
        product
    }

    #[tokio::test]
    async fn scan_then_finalize_commits_and_clears() {
        let ctx = test_context().await;
        let product = seed_product(&ctx, "750100", 300, 24).await;
        ctx.db().rates().record(10.0, "manual").await.unwrap();

        let mut session = CheckoutSession::new(ctx.clone());
        session.add_by_barcode("750100").await.unwrap();
        session.add_by_barcode("750100").await.unwrap();
        assert!(session.is_active());
        assert_eq!(session.total().cents(), 600);
        assert!((session.local_total().await - 60.0).abs() < 1e-9);

        let record = session
            .finalize(PaymentMethod::Cash, &ScriptedConfirm::with_answers([true]))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.status, SaleStatus::Completed);
        assert!((record.rate - 10.0).abs() < 1e-12);
        assert!(!session.is_active());

        let after = ctx
            .db()
            .products()
            .get_by_id(&product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.unit_stock, 22);
    }

    #[tokio::test]
    async fn declined_payment_leaves_the_draft_staged() {
        let ctx = test_context().await;
        seed_product(&ctx, "750100", 300, 24).await;

        let mut session = CheckoutSession::new(ctx.clone());
        session.add_by_barcode("750100").await.unwrap();

        let outcome = session
            .finalize(PaymentMethod::Cash, &ScriptedConfirm::with_answers([false]))
            .await
            .unwrap();

        assert!(outcome.is_none());
        assert!(session.is_active());
        assert_eq!(ctx.db().transactions().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unknown_barcode_is_reported() {
        let ctx = test_context().await;
        let mut session = CheckoutSession::new(ctx);

        let err = session.add_by_barcode("000000").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(CoreError::ProductNotFound(_))
        ));
    }

    #[tokio::test]
    async fn gated_removal_requires_password_and_confirmation() {
        let ctx = test_context().await;
        let product = seed_product(&ctx, "750100", 300, 24).await;

        let mut session = CheckoutSession::new(ctx);
        session.add_by_barcode("750100").await.unwrap();

        // wrong password: gate refuses, cart untouched
        let err = session
            .remove_line(&product.id, "guess", &ScriptedConfirm::with_answers([true]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
        assert!(session.is_active());

        // right password, declined confirmation: cart untouched
        let removed = session
            .remove_line(&product.id, ADMIN, &ScriptedConfirm::with_answers([false]))
            .await
            .unwrap();
        assert!(!removed);
        assert!(session.is_active());

        // right password, confirmed: line gone
        let removed = session
            .remove_line(&product.id, ADMIN, &ScriptedConfirm::with_answers([true]))
            .await
            .unwrap();
        assert!(removed);
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn stale_cart_commit_fails_and_stays_staged() {
        let ctx = test_context().await;
        let product = seed_product(&ctx, "750100", 300, 3).await;

        let mut session = CheckoutSession::new(ctx.clone());
        for _ in 0..3 {
            session.add_by_barcode("750100").await.unwrap();
        }

        // stock shrinks behind the cart's back
        let mut drained = ctx
            .db()
            .products()
            .get_by_id(&product.id)
            .await
            .unwrap()
            .unwrap();
        drained.unit_stock = 1;
        ctx.db().products().update(&drained).await.unwrap();

        let err = session
            .finalize(PaymentMethod::Cash, &ScriptedConfirm::with_answers([true]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Db(DbError::Domain(CoreError::InsufficientStock { .. }))
        ));

        // the draft survived for correction
        assert!(session.is_active());
        assert_eq!(session.cart().quantity_of(&product.id), 3);
        assert_eq!(ctx.db().transactions().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn cancel_writes_audit_row_only() {
        let ctx = test_context().await;
        let product = seed_product(&ctx, "750100", 300, 24).await;

        let mut session = CheckoutSession::new(ctx.clone());
        session.add_by_barcode("750100").await.unwrap();

        let record = session
            .cancel(PaymentMethod::Cash, &ScriptedConfirm::with_answers([true]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, SaleStatus::Cancelled);
        assert!(!session.is_active());

        let after = ctx
            .db()
            .products()
            .get_by_id(&product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.unit_stock, 24);
    }

    #[tokio::test]
    async fn close_with_live_cart_needs_confirmation() {
        let ctx = test_context().await;
        seed_product(&ctx, "750100", 300, 24).await;

        let mut session = CheckoutSession::new(ctx.clone());
        assert!(session
            .handle_close(&ScriptedConfirm::with_answers([]))
            .await
            .unwrap());

        session.add_by_barcode("750100").await.unwrap();

        // declined: app must stay open, nothing recorded
        assert!(!session
            .handle_close(&ScriptedConfirm::with_answers([false]))
            .await
            .unwrap());
        assert_eq!(ctx.db().transactions().count().await.unwrap(), 0);

        // confirmed: forced-closure row, cart cleared, app may close
        assert!(session
            .handle_close(&ScriptedConfirm::with_answers([true]))
            .await
            .unwrap());
        let rows = ctx
            .db()
            .transactions()
            .list_recent(Some(SaleStatus::ForcedClosure), 10)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn return_flow_credits_stock_behind_the_gate() {
        let ctx = test_context().await;
        let product = seed_product(&ctx, "750100", 250, 0).await;

        let mut session = ReturnSession::new(ctx.clone());
        for _ in 0..4 {
            session.add_by_barcode("750100").await.unwrap();
        }

        // the gate holds before anything moves
        let err = session
            .finalize(
                PaymentMethod::Cash,
                "guess",
                &ScriptedConfirm::with_answers([true]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));

        let record = session
            .finalize(
                PaymentMethod::Cash,
                ADMIN,
                &ScriptedConfirm::with_answers([true]),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, SaleStatus::Return);
        assert_eq!(record.total_cents, 1000);

        let after = ctx
            .db()
            .products()
            .get_by_id(&product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.unit_stock, 4);
    }

    #[tokio::test]
    async fn return_cancel_discards_without_a_ledger_row() {
        let ctx = test_context().await;
        seed_product(&ctx, "750100", 250, 0).await;

        let mut session = ReturnSession::new(ctx.clone());
        session.add_by_barcode("750100").await.unwrap();

        assert!(session
            .cancel(&ScriptedConfirm::with_answers([true]))
            .unwrap());
        assert!(!session.is_active());
        assert_eq!(ctx.db().transactions().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn advance_and_recharge_flows() {
        let ctx = test_context().await;

        let advance = perform_advance(
            &ctx,
            Money::from_cents(10_000),
            PaymentMethod::CardTerminal,
            &ScriptedConfirm::with_answers([true]),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(advance.commission_cents, 2_000);
        assert_eq!(advance.total_cents, 12_000);

        // declined: nothing recorded
        let declined = perform_recharge(
            &ctx,
            "04141234567",
            Money::from_cents(5_000),
            PaymentMethod::Cash,
            &ScriptedConfirm::with_answers([false]),
        )
        .await
        .unwrap();
        assert!(declined.is_none());
        assert!(ctx
            .db()
            .recharges()
            .list_recent(None, 10)
            .await
            .unwrap()
            .is_empty());

        let recharge = perform_recharge(
            &ctx,
            "04141234567",
            Money::from_cents(5_000),
            PaymentMethod::Cash,
            &ScriptedConfirm::with_answers([true]),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(recharge.commission_cents, 750);
        assert_eq!(recharge.total_cents, 5_750);

        let cancelled = cancel_advance(
            &ctx,
            Money::from_cents(2_000),
            PaymentMethod::Cash,
            &ScriptedConfirm::with_answers([true]),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(cancelled.status, OperationStatus::Cancelled);
    }

    #[tokio::test]
    async fn price_check_converts_when_a_rate_exists() {
        let ctx = test_context().await;
        seed_product(&ctx, "750100", 300, 24).await;

        let quote = price_check(&ctx, "750100").await.unwrap();
        assert_eq!(quote.price.cents(), 300);
        assert!(quote.rate.is_none());
        assert!(quote.local_price.is_none());

        ctx.db().rates().record(10.0, "manual").await.unwrap();
        let quote = price_check(&ctx, "750100").await.unwrap();
        assert_eq!(quote.rate, Some(10.0));
        assert!((quote.local_price.unwrap() - 30.0).abs() < 1e-9);
    }
}
