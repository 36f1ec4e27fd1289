//! # Rate Poller
//!
//! The self-rescheduling hourly fetch-and-compare job.
//!
//! ## Poll Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Every tick (hourly)                             │
//! │                                                                         │
//! │  fetch page ──► extract rate ──► record_if_changed                      │
//! │       │               │                │                                │
//! │       │               │                ├── changed?  insert row         │
//! │       │               │                └── same?     skip (no spam)     │
//! │       │               │                                                 │
//! │       └───────────────┴── any failure: warn + wait for next tick        │
//! │                                                                         │
//! │  The loop runs on the shared runtime and never overlaps a commit in     │
//! │  progress - the register awaits its writes sequentially and the         │
//! │  poller's only write is the single-row rate insert.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use caja_db::repository::rate::SOURCE_FEED;
use caja_db::RateRepository;

use crate::error::RateFeedResult;
use crate::scrape::{build_client, fetch_official_rate, OFFICIAL_RATE_URL};

// =============================================================================
// Configuration
// =============================================================================

/// Poller configuration.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Page to scrape.
    pub url: String,

    /// Time between polls. Default: one hour.
    pub period: Duration,

    /// Per-request timeout. Default: 10 seconds.
    pub request_timeout: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        PollerConfig {
            url: OFFICIAL_RATE_URL.to_string(),
            period: Duration::from_secs(3600),
            request_timeout: Duration::from_secs(10),
        }
    }
}

// =============================================================================
// Poller
// =============================================================================

/// Periodically fetches the official rate and records changes.
pub struct RatePoller {
    config: PollerConfig,
    client: reqwest::Client,
    rates: RateRepository,
}

impl RatePoller {
    /// Creates a poller writing through the given rate repository.
    pub fn new(config: PollerConfig, rates: RateRepository) -> RateFeedResult<Self> {
        let client = build_client(config.request_timeout)?;
        Ok(RatePoller {
            config,
            client,
            rates,
        })
    }

    /// One fetch-and-compare cycle. Returns whether a new row was written.
    ///
    /// Also the code path behind the manual "fetch official rate now"
    /// action, which wants the error instead of a log line.
    pub async fn run_once(&self) -> RateFeedResult<bool> {
        let rate = fetch_official_rate(&self.client, &self.config.url).await?;
        let written = self.rates.record_if_changed(rate, SOURCE_FEED).await?;
        Ok(written)
    }

    /// Runs the poll loop forever. Spawn it on the runtime:
    ///
    /// ```rust,ignore
    /// let poller = RatePoller::new(PollerConfig::default(), db.rates())?;
    /// tokio::spawn(poller.run());
    /// ```
    ///
    /// The first cycle fires immediately (the register wants a rate at
    /// startup); failures are logged and never break the loop.
    pub async fn run(self) {
        let mut ticker = interval(self.config.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            url = %self.config.url,
            period_secs = self.config.period.as_secs(),
            "Rate poller started"
        );

        loop {
            ticker.tick().await;

            match self.run_once().await {
                Ok(true) => info!("Official rate changed; new record written"),
                Ok(false) => debug!("Official rate unchanged"),
                Err(err) => warn!(error = %err, "Rate poll failed; will retry next cycle"),
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use caja_db::{Database, DbConfig};

    #[test]
    fn default_config_polls_hourly() {
        let config = PollerConfig::default();
        assert_eq!(config.period, Duration::from_secs(3600));
        assert_eq!(config.url, OFFICIAL_RATE_URL);
    }

    #[tokio::test]
    async fn poller_construction_succeeds() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let poller = RatePoller::new(PollerConfig::default(), db.rates());
        assert!(poller.is_ok());
    }

    #[tokio::test]
    async fn unreachable_source_surfaces_as_feed_error_not_panic() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = PollerConfig {
            // unroutable per RFC 5737; fails fast without DNS
            url: "https://192.0.2.1/".to_string(),
            period: Duration::from_secs(3600),
            request_timeout: Duration::from_millis(200),
        };
        let poller = RatePoller::new(config, db.rates()).unwrap();

        let err = poller.run_once().await.unwrap_err();
        assert!(matches!(err, crate::error::RateFeedError::Http(_)));
        // nothing was written
        assert!(db.rates().latest().await.unwrap().is_none());
    }
}
