//! Revenue lookup against the company-data site.
//!
//! The site publishes one page per company at `<base_url>/<name>`. Because the
//! slug rarely matches the name as typed, each spelling variant from
//! [`name_variants`] is tried in order until a real company page comes back.
//! When every variant misses, a fallback result in the lowest revenue bucket
//! is returned together with the variants that were tried.

mod extract;
mod variants;

use reqwest::Client;
use tracing::{debug, info, instrument, warn};
use url::Url;

use leadenrich_shared::{
    CourtesyDelay, EnrichError, HttpConfig, LOWEST_REVENUE_BUCKET, Result, RevenueConfig,
    RevenueResult, build_scraper_client,
};

use crate::extract::{CompanyPage, normalize_revenue};

pub use variants::name_variants;

// ---------------------------------------------------------------------------
// Per-variant outcome
// ---------------------------------------------------------------------------

/// What a single variant lookup produced.
#[derive(Debug)]
enum VariantAttempt {
    /// A company page was found; resolution stops here.
    Matched(RevenueResult),
    /// The site answered with its "not found" page.
    NoMatch,
    /// Timeout, transport or HTTP status error.
    Failed(EnrichError),
}

// ---------------------------------------------------------------------------
// RevenueResolver
// ---------------------------------------------------------------------------

/// Resolves a company's estimated revenue from the company-data site.
pub struct RevenueResolver {
    client: Client,
    base_url: Url,
    delay: CourtesyDelay,
}

impl RevenueResolver {
    pub fn new(config: &RevenueConfig, http: &HttpConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            EnrichError::config(format!("invalid revenue.base_url '{}': {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(EnrichError::config(format!(
                "revenue.base_url '{}' cannot take a path",
                config.base_url
            )));
        }

        Ok(Self {
            client: build_scraper_client(http, config.timeout_secs)?,
            base_url,
            delay: CourtesyDelay::from(http),
        })
    }

    /// Override the courtesy delay (tests use [`CourtesyDelay::none`]).
    pub fn with_delay(mut self, delay: CourtesyDelay) -> Self {
        self.delay = delay;
        self
    }

    /// Look up the revenue of `company`.
    ///
    /// Fails only for a blank name. Every network or parse problem is
    /// absorbed: the next variant is tried, and exhaustion yields the
    /// fallback result.
    #[instrument(skip(self))]
    pub async fn resolve(&self, company: &str) -> Result<RevenueResult> {
        if company.trim().is_empty() {
            return Err(EnrichError::invalid_input("Invalid company name"));
        }

        let variants = name_variants(company);
        info!(?variants, "searching revenue");

        for variant in &variants {
            self.delay.wait().await;

            match self.try_variant(company, variant).await {
                VariantAttempt::Matched(result) => {
                    info!(
                        variant = %variant,
                        revenue = %result.estimated_revenue,
                        "found revenue"
                    );
                    return Ok(result);
                }
                VariantAttempt::NoMatch => {
                    info!(variant = %variant, "no match for variant");
                }
                VariantAttempt::Failed(e) => {
                    warn!(variant = %variant, error = %e, "variant lookup failed");
                }
            }
        }

        warn!("no revenue found, using fallback value");
        Ok(RevenueResult::fallback(company, variants))
    }

    /// Build the company page URL for one variant (percent-encoded segment).
    fn company_url(&self, variant: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(variant);
        }
        url
    }

    async fn try_variant(&self, company: &str, variant: &str) -> VariantAttempt {
        let url = self.company_url(variant);
        debug!(%url, "trying company page");

        let body = match fetch_page(&self.client, &url).await {
            Ok(body) => body,
            Err(e) => return VariantAttempt::Failed(e),
        };

        inspect_page(company, variant, &url, &body)
    }
}

/// Fetch a page body, treating non-2xx statuses as failures.
async fn fetch_page(client: &Client, url: &Url) -> Result<String> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| describe_failure(url, &e))?;

    response
        .text()
        .await
        .map_err(|e| EnrichError::Network(format!("{url}: failed to read body: {e}")))
}

fn describe_failure(url: &Url, err: &reqwest::Error) -> EnrichError {
    if err.is_timeout() {
        EnrichError::Network(format!("timeout while fetching {url}"))
    } else {
        EnrichError::Network(format!("{url}: {err}"))
    }
}

/// Classify a fetched page and pull the revenue figure from it.
fn inspect_page(company: &str, variant: &str, url: &Url, body: &str) -> VariantAttempt {
    let page = CompanyPage::parse(body);
    if page.is_not_found() {
        return VariantAttempt::NoMatch;
    }

    // A real company page without a readable figure still ends the search;
    // it is reported in the lowest bucket.
    let revenue = page
        .revenue_figure()
        .map(|raw| normalize_revenue(&raw))
        .unwrap_or_else(|| LOWEST_REVENUE_BUCKET.to_string());

    VariantAttempt::Matched(RevenueResult::matched(company, variant, revenue, url.as_str()))
}
