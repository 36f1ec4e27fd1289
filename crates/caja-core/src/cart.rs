//! # Cart / Draft Transaction
//!
//! The in-memory staging area a draft transaction accumulates in before it
//! commits. One cart per open module, owned by the active operator session,
//! never persisted.
//!
//! ## Draft Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Draft State Machine                               │
//! │                                                                         │
//! │      Empty ──add──► Staging ──add/remove──► Staging                     │
//! │                        │                                                │
//! │                        ├── commit (≥1 line, stock ok) ──► Committed     │
//! │                        ├── cancel ───────────────────────► Cancelled    │
//! │                        └── app close + confirm ──────────► ForcedClosed │
//! │                                                                         │
//! │  Committed / Cancelled / ForcedClosed are terminal: the cart is         │
//! │  cleared and a fresh draft starts from Empty.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sale carts enforce the stock ceiling at add time (staged + 1 must not
//! exceed the units on hand); the commit re-validates against current
//! stock anyway, because stock may have moved since the line was staged.
//! Return carts have no ceiling - any quantity may come back.

use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{LineSnapshot, Product};

// =============================================================================
// Cart Kind / Draft Status
// =============================================================================

/// Which direction the staged lines move stock at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartKind {
    /// Debits stock; add-time and commit-time ceilings apply.
    Sale,
    /// Credits stock; no ceiling.
    Return,
}

/// Observable state of a draft transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftStatus {
    Empty,
    Staging,
    Committed,
    Cancelled,
    ForcedClosed,
}

// =============================================================================
// Cart Line
// =============================================================================

/// One staged line: identity plus a name/price snapshot taken at add time.
///
/// The snapshot is deliberate - a price edit between add and commit does
/// not change what the customer was quoted.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: String,
    pub barcode: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
}

impl CartLine {
    /// `unit_price × quantity`.
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Ordered staging area keyed by product id; repeated scans of the same
/// product increment the existing line instead of adding a new one.
#[derive(Debug, Clone)]
pub struct Cart {
    kind: CartKind,
    lines: BTreeMap<String, CartLine>,
}

impl Cart {
    /// Creates an empty cart of the given kind.
    pub fn new(kind: CartKind) -> Self {
        Cart {
            kind,
            lines: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> CartKind {
        self.kind
    }

    /// Stages one unit of `product`.
    ///
    /// Sale carts reject the scan when the quantity already staged plus one
    /// would exceed the product's current unit stock - the cart stays
    /// untouched and the operator sees the capacity error. Return carts
    /// accept any quantity.
    ///
    /// ## Example
    /// ```rust,ignore
    /// cart.add(&product)?;            // quantity 1
    /// cart.add(&product)?;            // same line, quantity 2
    /// ```
    pub fn add(&mut self, product: &Product) -> CoreResult<()> {
        let staged = self
            .lines
            .get(&product.id)
            .map(|line| line.quantity)
            .unwrap_or(0);

        if self.kind == CartKind::Sale && staged + 1 > product.unit_stock {
            return Err(CoreError::InsufficientStock {
                barcode: product.barcode.clone(),
                available: product.unit_stock,
                requested: staged + 1,
            });
        }

        self.lines
            .entry(product.id.clone())
            .and_modify(|line| line.quantity += 1)
            .or_insert_with(|| CartLine {
                product_id: product.id.clone(),
                barcode: product.barcode.clone(),
                name: product.name.clone(),
                unit_price: product.price(),
                quantity: 1,
            });

        Ok(())
    }

    /// Removes the entire line for `product_id` (all units, not partial).
    ///
    /// Callers gate this behind admin authorization and an explicit
    /// confirmation; the cart itself only performs the removal.
    pub fn remove(&mut self, product_id: &str) -> Option<CartLine> {
        self.lines.remove(product_id)
    }

    /// Sum of `price snapshot × quantity` over all lines. Pure.
    pub fn total(&self) -> Money {
        self.lines.values().map(CartLine::subtotal).sum()
    }

    /// Empties the cart; used after commit/cancel/forced closure.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Units currently staged for a product (0 when absent).
    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.lines
            .get(product_id)
            .map(|line| line.quantity)
            .unwrap_or(0)
    }

    /// Lines in product-id order.
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    /// Freezes the lines for the ledger's `detail` column.
    pub fn snapshots(&self) -> Vec<LineSnapshot> {
        self.lines
            .values()
            .map(|line| LineSnapshot {
                product_id: line.product_id.clone(),
                name: line.name.clone(),
                unit_price_cents: line.unit_price.cents(),
                quantity: line.quantity,
                subtotal_cents: line.subtotal().cents(),
            })
            .collect()
    }

    /// Empty or Staging; terminal states are reported by the session that
    /// drove the draft there, not by the cart.
    pub fn status(&self) -> DraftStatus {
        if self.lines.is_empty() {
            DraftStatus::Empty
        } else {
            DraftStatus::Staging
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
