//! # caja-app: Application Context and Services for Caja POS
//!
//! The layer the desktop shell talks to. Everything UI-shaped stays on
//! the shell's side of two seams:
//!
//! - the [`confirm::Confirm`] port for yes/no dialogs
//! - the [`error::AppError`] values it renders as operator messages
//!
//! ## Modules
//! - [`config`]  - fixed per-user data directory + settings
//! - [`context`] - the explicit application context (no globals)
//! - [`license`] - one-time activation gate checked at startup
//! - [`auth`]    - admin password gate
//! - [`confirm`] - the confirmation port and its stubs
//! - [`session`] - checkout, returns, advances, recharges, price check
//! - [`catalog`] - product add/edit/restock/delete
//! - [`reporting`] - period summaries and report export

pub mod auth;
pub mod catalog;
pub mod config;
pub mod confirm;
pub mod context;
pub mod error;
pub mod license;
pub mod reporting;
pub mod session;

pub use auth::AdminGate;
pub use catalog::{CatalogService, NewProduct, ProductEdit};
pub use config::AppConfig;
pub use confirm::{AlwaysConfirm, Confirm, ScriptedConfirm};
pub use context::{init_tracing, AppContext};
pub use error::{AppError, AppResult};
pub use reporting::{export_period_report, period_summary};
pub use session::{
    cancel_advance, cancel_recharge, perform_advance, perform_recharge, price_check,
    CheckoutSession, PriceQuote, ReturnSession,
};
