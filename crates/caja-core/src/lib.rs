//! # caja-core: Pure Business Logic for Caja POS
//!
//! The heart of the register. Every business rule lives here as pure code
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Caja POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Desktop shell (external)                       │   │
//! │  │   scan ──► cart view ──► tender ──► confirm dialogs             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    caja-app (services)                          │   │
//! │  │   checkout / returns / advances / recharges / price check       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ caja-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  money  │ │  types  │ │  cart   │ │ pricing │ │ valid.  │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    caja-db (storage layer)                      │   │
//! │  │          SQLite queries, migrations, atomic commits             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - integer-cent Money type, commission and rate conversion
//! - [`types`] - domain types (Product, ledger records, statuses)
//! - [`cart`] - the in-memory draft transaction (sale and return carts)
//! - [`pricing`] - bulk-cost → unit-price derivation
//! - [`validation`] - operator-input checks
//! - [`format`] - locale-aware amount rendering
//! - [`error`] - domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: deterministic, no side effects
//! 2. **No I/O**: database, network, filesystem access is FORBIDDEN here
//! 3. **Integer money**: monetary values are cents (i64), never floats
//! 4. **Explicit errors**: typed enums, no panics in non-test code

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod format;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartKind, CartLine, DraftStatus};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Commission charged on cash advances: 20% of the principal.
pub const ADVANCE_COMMISSION: CommissionRate = CommissionRate::from_bps(2000);

/// Commission charged on phone recharges: 15% of the base amount.
pub const RECHARGE_COMMISSION: CommissionRate = CommissionRate::from_bps(1500);

/// Two automatic rate observations closer than this are considered the
/// same value; the poller skips the insert instead of spamming duplicates.
pub const RATE_EPSILON: f64 = 1e-6;

/// Unit/bulk counts further apart than this (in units) are repaired by the
/// inventory maintenance sweep.
pub const STOCK_SYNC_TOLERANCE: f64 = 0.001;
