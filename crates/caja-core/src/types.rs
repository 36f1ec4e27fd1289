//! # Domain Types
//!
//! Core domain types for Caja POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Domain Types                                  │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌───────────────────┐  ┌─────────────────────┐   │
//! │  │    Product      │  │ TransactionRecord │  │ AdvanceRecord       │   │
//! │  │  ─────────────  │  │  ───────────────  │  │ RechargeRecord      │   │
//! │  │  id (UUID)      │  │  id (UUID)        │  │  ─────────────────  │   │
//! │  │  barcode        │  │  status           │  │  principal/base     │   │
//! │  │  unit_stock     │  │  total_cents      │  │  commission_cents   │   │
//! │  │  bulk_stock     │  │  detail (JSON)    │  │  status             │   │
//! │  └─────────────────┘  └───────────────────┘  └─────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌───────────────────┐  ┌─────────────────────┐   │
//! │  │ CommissionRate  │  │    SaleStatus     │  │   PaymentMethod     │   │
//! │  │  ─────────────  │  │  ───────────────  │  │  ─────────────────  │   │
//! │  │  bps (u32)      │  │  Completed        │  │  Cash, ForeignCur.. │   │
//! │  │  2000 = 20%     │  │  Cancelled        │  │  CardTerminal,      │   │
//! │  └─────────────────┘  │  ForcedClosure    │  │  BioPago, Mobile..  │   │
//! │                       │  Return           │  └─────────────────────┘   │
//! │                       └───────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Products carry two identities: `id` (UUID v4, immutable, used for
//! relations and cart keys) and `barcode` (the business key the scanner
//! produces - unique and immutable once created).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Commission Rate
// =============================================================================

/// Commission rate in basis points (bps).
///
/// 1 basis point = 0.01%. Cash advances charge 2000 bps (20%), phone
/// recharges 1500 bps (15%); both are fixed percentages added on top of
/// the base amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionRate(u32);

impl CommissionRate {
    /// Creates a commission rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        CommissionRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product with dual stock counts.
///
/// `unit_stock` is what the register debits; `bulk_stock` is what restocking
/// adds (cases/boxes, possibly fractional). `unit_stock ==
/// round(bulk_stock * units_per_bulk)` is repaired by the maintenance sweep,
/// not enforced on every write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Scanner barcode - business identity, unique and immutable.
    pub barcode: String,

    /// Display name shown to the operator and copied into ledger snapshots.
    pub name: String,

    /// Optional free-text description.
    pub description: Option<String>,

    /// Derived unit purchase cost in cents (bulk cost / units per bulk).
    pub cost_cents: i64,

    /// Derived unit sale price in cents; recomputed on every edit from
    /// bulk cost, units per bulk and margin percent.
    pub price_cents: i64,

    /// Sellable units on hand.
    pub unit_stock: i64,

    /// Bulk packages on hand; fractional after partial-bulk sales.
    pub bulk_stock: f64,

    /// Units contained in one bulk package (> 0).
    pub units_per_bulk: f64,

    /// Purchase cost of one bulk package in cents.
    pub bulk_cost_cents: i64,

    /// Profit margin percent used by the price derivation (< 100).
    pub margin_pct: f64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Unit sale price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Unit purchase cost as Money.
    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }

    /// Bulk package cost as Money.
    #[inline]
    pub fn bulk_cost(&self) -> Money {
        Money::from_cents(self.bulk_cost_cents)
    }

    /// Whether this product keeps a bulk count alongside the unit count.
    #[inline]
    pub fn tracks_bulk(&self) -> bool {
        self.units_per_bulk > 0.0
    }

    /// Whether `quantity` units can currently be sold.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.unit_stock >= quantity
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// Status of a sale/return ledger row. One table records both directions;
/// the status tag tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Paid and finalized; inventory was debited.
    Completed,
    /// Abandoned before commit; audit row only, inventory untouched.
    Cancelled,
    /// Application closed over a live cart; audit row only.
    ForcedClosure,
    /// Items credited back to stock; subtracts from period totals.
    Return,
}

// =============================================================================
// Operation Status
// =============================================================================

/// Status of a cash-advance or phone-recharge row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    /// The customer paid and the operation went through.
    Concretized,
    /// Recorded for audit; the operation did not go through.
    Cancelled,
}

// =============================================================================
// Payment Method
// =============================================================================

/// Tender types accepted at the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Local-currency cash.
    Cash,
    /// Foreign-currency cash (USD bills).
    ForeignCurrency,
    /// Card terminal ("punto de venta").
    CardTerminal,
    /// BioPago biometric terminal.
    BioPago,
    /// Bank-to-bank mobile payment ("pago móvil").
    MobilePayment,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

// =============================================================================
// Line Snapshot
// =============================================================================

/// One cart line frozen at commit time.
///
/// Ledger rows store a JSON array of these instead of foreign keys, so a
/// later product edit or delete never rewrites history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSnapshot {
    pub product_id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub subtotal_cents: i64,
}

impl LineSnapshot {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Transaction Record
// =============================================================================

/// An immutable sale/return ledger row.
///
/// Created only at commit time; never updated or deleted afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionRecord {
    pub id: String,
    pub recorded_at: DateTime<Utc>,
    /// Base-currency (USD) total in cents.
    pub total_cents: i64,
    /// Local-currency total: `total × rate-at-commit`. Derived display
    /// figure, stored REAL.
    pub local_total: f64,
    /// Exchange rate snapshot used for the conversion.
    pub rate: f64,
    /// JSON-serialized `Vec<LineSnapshot>`.
    pub detail: String,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
}

impl TransactionRecord {
    /// Base-currency total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Deserializes the frozen line snapshot.
    pub fn lines(&self) -> serde_json::Result<Vec<LineSnapshot>> {
        serde_json::from_str(&self.detail)
    }
}

// =============================================================================
// Advance / Recharge Records
// =============================================================================

/// An immutable cash-advance ledger row. Amounts are local currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AdvanceRecord {
    pub id: String,
    /// Cash handed to the customer, in cents.
    pub principal_cents: i64,
    /// 20% commission on the principal, in cents.
    pub commission_cents: i64,
    /// principal + commission.
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub status: OperationStatus,
    pub recorded_at: DateTime<Utc>,
}

impl AdvanceRecord {
    #[inline]
    pub fn principal(&self) -> Money {
        Money::from_cents(self.principal_cents)
    }

    #[inline]
    pub fn commission(&self) -> Money {
        Money::from_cents(self.commission_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// An immutable phone-recharge ledger row. Amounts are local currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RechargeRecord {
    pub id: String,
    /// Full number recharged (prefix + 7 digits).
    pub phone_number: String,
    /// Recharge face value, in cents.
    pub base_cents: i64,
    /// 15% commission on the base, in cents.
    pub commission_cents: i64,
    /// base + commission.
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub status: OperationStatus,
    pub recorded_at: DateTime<Utc>,
}

impl RechargeRecord {
    #[inline]
    pub fn base(&self) -> Money {
        Money::from_cents(self.base_cents)
    }

    #[inline]
    pub fn commission(&self) -> Money {
        Money::from_cents(self.commission_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Exchange Rate Record
// =============================================================================

/// One timestamped exchange-rate observation (local units per USD).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RateRecord {
    pub id: i64,
    pub rate: f64,
    /// Where the value came from: "official_feed" or "manual".
    pub source: String,
    pub recorded_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commission_rate_percentage() {
        assert!((CommissionRate::from_bps(2000).percentage() - 20.0).abs() < 1e-9);
        assert!((CommissionRate::from_bps(1500).percentage() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn product_can_sell_respects_unit_stock() {
        let product = sample_product(5);
        assert!(product.can_sell(5));
        assert!(!product.can_sell(6));
    }

    #[test]
    fn line_snapshot_roundtrips_through_json() {
        let lines = vec![LineSnapshot {
            product_id: "p1".into(),
            name: "Harina PAN 1kg".into(),
            unit_price_cents: 165,
            quantity: 3,
            subtotal_cents: 495,
        }];
        let json = serde_json::to_string(&lines).unwrap();
        let back: Vec<LineSnapshot> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lines);
        assert_eq!(back[0].subtotal().cents(), 495);
    }

    fn sample_product(unit_stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: "p1".into(),
            barcode: "7591001234567".into(),
            name: "Harina PAN 1kg".into(),
            description: None,
            cost_cents: 132,
            price_cents: 165,
            unit_stock,
            bulk_stock: unit_stock as f64 / 20.0,
            units_per_bulk: 20.0,
            bulk_cost_cents: 2640,
            margin_pct: 20.0,
            created_at: now,
            updated_at: now,
        }
    }
}
