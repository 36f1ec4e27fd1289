//! # Repository Modules
//!
//! One repository per table family. All repositories are cheap to
//! construct (they clone the pool handle) and are obtained through
//! [`crate::Database`] accessors.

pub mod advance;
pub mod product;
pub mod rate;
pub mod recharge;
pub mod transaction;

pub use advance::AdvanceRepository;
pub use product::ProductRepository;
pub use rate::RateRepository;
pub use recharge::RechargeRepository;
pub use transaction::TransactionRepository;
