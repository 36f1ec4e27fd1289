//! # caja-rates: Exchange-Rate Feed for Caja POS
//!
//! Keeps the local rate history current from the official source.
//!
//! ## Components
//! - [`scrape`] - fetch the published page and extract the numeric rate
//! - [`poller`] - the hourly fetch-and-compare loop
//! - [`error`]  - feed errors; none of them are fatal
//!
//! The feed is strictly additive: it observes and records. Everything
//! that *consumes* rates (commit conversion, reporting) reads the store
//! through [`caja_db::RateRepository`], so a dead network degrades to
//! "rate unavailable" without touching any other operation.

pub mod error;
pub mod poller;
pub mod scrape;

pub use error::{RateFeedError, RateFeedResult};
pub use poller::{PollerConfig, RatePoller};
pub use scrape::{extract_rate, fetch_official_rate, OFFICIAL_RATE_URL};
