//! # Rate Feed Error Types
//!
//! Nothing here is fatal. A failed fetch or an unparseable page means
//! "no rate available right now": the poller logs it and tries again next
//! cycle, and conversions fall back to the last stored rate.

use thiserror::Error;

/// Exchange-rate feed errors.
#[derive(Debug, Error)]
pub enum RateFeedError {
    /// Network-level failure (DNS, timeout, TLS, non-2xx status).
    #[error("Rate fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The page came back but the expected rate block wasn't in it -
    /// usually means the source changed its markup.
    #[error("Rate value not found in page")]
    ValueNotFound,

    /// The extracted text is not a usable number.
    #[error("Scraped rate is not a valid number: '{0}'")]
    BadNumber(String),

    /// Writing the observation to the store failed.
    #[error(transparent)]
    Store(#[from] caja_db::DbError),
}

/// Result type for rate-feed operations.
pub type RateFeedResult<T> = Result<T, RateFeedError>;
