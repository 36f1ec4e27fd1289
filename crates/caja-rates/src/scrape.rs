//! # Official Rate Scrape
//!
//! The central bank publishes the USD rate on its homepage inside a
//! `<div id="dolar">` block, quoted with a comma decimal separator:
//!
//! ```text
//! <div id="dolar">
//!   <span> USD </span>
//!   <strong> 36,48190000 </strong>
//! </div>
//! ```
//!
//! There is no API; we fetch the page and pull the first `<strong>` value
//! out of that block. The site's certificate chain is chronically broken,
//! so verification is disabled for this one client - the value is
//! cross-checked against history by `record_if_changed` anyway.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use tracing::debug;

use crate::error::{RateFeedError, RateFeedResult};

/// Homepage of the official rate source.
pub const OFFICIAL_RATE_URL: &str = "https://www.bcv.org.ve/";

/// The source blocks default HTTP-library agents; present a browser.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Builds the HTTP client used for rate fetches.
pub fn build_client(timeout: Duration) -> RateFeedResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .danger_accept_invalid_certs(true)
        .build()?;
    Ok(client)
}

/// Fetches the page and extracts the current official rate.
pub async fn fetch_official_rate(client: &reqwest::Client, url: &str) -> RateFeedResult<f64> {
    debug!(url = url, "Fetching official rate page");

    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    extract_rate(&body)
}

/// Pulls the rate out of the page HTML.
///
/// Tolerates whitespace and attribute noise; the decimal comma is
/// normalized before parsing. Grouping dots are not expected (the source
/// quotes tens of units with eight decimals) and fail the parse rather
/// than silently mis-scaling.
pub fn extract_rate(html: &str) -> RateFeedResult<f64> {
    static RATE_BLOCK: OnceLock<Regex> = OnceLock::new();
    let re = RATE_BLOCK.get_or_init(|| {
        Regex::new(r#"(?s)id="dolar".*?<strong>\s*([0-9.,]+)\s*</strong>"#)
            .unwrap_or_else(|e| panic!("invalid rate regex: {e}"))
    });

    let raw = re
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .ok_or(RateFeedError::ValueNotFound)?;

    let normalized = raw.replace(',', ".");
    let rate: f64 = normalized
        .parse()
        .map_err(|_| RateFeedError::BadNumber(raw.clone()))?;

    if !rate.is_finite() || rate <= 0.0 {
        return Err(RateFeedError::BadNumber(raw));
    }

    debug!(rate = rate, "Extracted official rate");
    Ok(rate)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PAGE: &str = r#"
        <html><body>
          <div class="view-tipo-de-cambio-oficial">
            <div id="euro"><span> EUR </span><strong> 39,11223344 </strong></div>
            <div id="dolar">
              <span> USD </span>
              <strong> 36,48190000 </strong>
            </div>
          </div>
        </body></html>
    "#;

    #[test]
    fn extracts_the_dollar_block_value() {
        let rate = extract_rate(SAMPLE_PAGE).unwrap();
        assert!((rate - 36.4819).abs() < 1e-9);
    }

    #[test]
    fn ignores_other_currency_blocks() {
        // euro appears first in the page but must not be picked up
        let rate = extract_rate(SAMPLE_PAGE).unwrap();
        assert!((rate - 39.11223344).abs() > 1.0);
    }

    #[test]
    fn dot_decimal_also_accepted() {
        let html = r#"<div id="dolar"><strong>36.5</strong></div>"#;
        assert!((extract_rate(html).unwrap() - 36.5).abs() < 1e-9);
    }

    #[test]
    fn missing_block_is_value_not_found() {
        let err = extract_rate("<html><body>maintenance</body></html>").unwrap_err();
        assert!(matches!(err, RateFeedError::ValueNotFound));
    }

    #[test]
    fn garbage_value_is_bad_number() {
        let html = r#"<div id="dolar"><strong>36,48,19</strong></div>"#;
        assert!(matches!(
            extract_rate(html).unwrap_err(),
            RateFeedError::BadNumber(_)
        ));
    }

    #[test]
    fn non_positive_value_is_rejected() {
        let html = r#"<div id="dolar"><strong>0</strong></div>"#;
        assert!(matches!(
            extract_rate(html).unwrap_err(),
            RateFeedError::BadNumber(_)
        ));
    }
}
