//! # caja-db: Database Layer for Caja POS
//!
//! All SQLite access for the register lives in this crate.
//!
//! ## Responsibility
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                             caja-db                                     │
//! │                                                                         │
//! │  ✅ RESPONSIBILITIES                   ❌ NOT RESPONSIBLE FOR           │
//! │  ──────────────────────                ─────────────────────────        │
//! │  • Connection pool management          • Business rules (caja-core)     │
//! │  • SQL query execution                 • Rate scraping (caja-rates)     │
//! │  • Schema migrations                   • Report rendering (caja-report) │
//! │  • Repository implementations          • Auth/license (caja-app)        │
//! │  • Atomic commit transactions                                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Commit Guarantee
//! Sale and return commits wrap every stock delta plus the ledger append
//! in one SQLite transaction. A stock shortfall (or any other failure)
//! on the third line of a five-line cart leaves the first two lines'
//! deltas unapplied and no ledger row behind - the operator sees the
//! error, the cart stays staged, nothing moved.

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{
    AdvanceRepository, ProductRepository, RateRepository, RechargeRepository,
    TransactionRepository,
};
