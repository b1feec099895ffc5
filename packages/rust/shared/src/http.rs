//! HTTP plumbing shared by the resolvers: client construction and the
//! randomized courtesy delay issued before every outbound request.

use std::time::Duration;

use rand::Rng;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};

use crate::config::HttpConfig;
use crate::error::{EnrichError, Result};

/// Maximum number of redirects followed by scraper clients.
const MAX_REDIRECTS: usize = 5;

/// Build a client that presents browser-like headers to scraped sites.
pub fn build_scraper_client(http: &HttpConfig, timeout_secs: u64) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, header_value("accept", &http.accept)?);
    headers.insert(
        ACCEPT_LANGUAGE,
        header_value("accept_language", &http.accept_language)?,
    );

    Client::builder()
        .user_agent(http.user_agent.as_str())
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| EnrichError::Network(format!("failed to build HTTP client: {e}")))
}

/// Build a plain JSON API client.
pub fn build_api_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .user_agent(concat!("leadenrich/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| EnrichError::Network(format!("failed to build HTTP client: {e}")))
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| EnrichError::config(format!("http.{field} is not a valid header value: {e}")))
}

// ---------------------------------------------------------------------------
// CourtesyDelay
// ---------------------------------------------------------------------------

/// Randomized pause before each request, to stay under third-party rate limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourtesyDelay {
    min_ms: u64,
    max_ms: u64,
}

impl CourtesyDelay {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms,
        }
    }

    /// No delay at all. Used by tests against mock servers.
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    /// Pick a duration within the configured bounds.
    pub fn sample(&self) -> Duration {
        if self.max_ms == 0 {
            return Duration::ZERO;
        }
        let ms = rand::rng().random_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }

    pub async fn wait(&self) {
        let pause = self.sample();
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }
}

impl From<&HttpConfig> for CourtesyDelay {
    fn from(http: &HttpConfig) -> Self {
        Self::new(http.delay_min_ms, http.delay_max_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_stays_within_bounds() {
        let delay = CourtesyDelay::new(1000, 2000);
        for _ in 0..50 {
            let d = delay.sample();
            assert!(d >= Duration::from_millis(1000));
            assert!(d <= Duration::from_millis(2000));
        }
    }

    #[test]
    fn zero_delay_is_zero() {
        assert_eq!(CourtesyDelay::none().sample(), Duration::ZERO);
    }

    #[test]
    fn scraper_client_builds_from_defaults() {
        let http = HttpConfig::default();
        assert!(build_scraper_client(&http, 10).is_ok());
    }

    #[test]
    fn invalid_header_is_config_error() {
        let http = HttpConfig {
            accept: "text/html\n".into(),
            ..HttpConfig::default()
        };
        let err = build_scraper_client(&http, 10).unwrap_err();
        assert!(err.to_string().contains("http.accept"));
    }
}
