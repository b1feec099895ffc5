//! Firmographic enrichment through the Apollo organization API.
//!
//! Input is a website URL or a bare domain. URLs are reduced to their host
//! (lower-cased, leading `www.` removed) and sent as the `domain` parameter.
//! Every outcome, including missing credentials and transport failures, is
//! returned as an [`ApolloResult`]; nothing here fails the caller.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};
use url::Url;

use leadenrich_shared::{
    ApolloConfig, ApolloResult, CourtesyDelay, EnrichError, HttpConfig, Result, Source,
    build_api_client,
};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-Api-Key";

// ---------------------------------------------------------------------------
// Response shape
// ---------------------------------------------------------------------------

/// Only the `organization` object is used; its fields vary in type across
/// records, so they are read leniently from raw JSON.
#[derive(Debug, Deserialize)]
struct EnrichResponse {
    #[serde(default)]
    organization: Option<Map<String, Value>>,
}

// ---------------------------------------------------------------------------
// ApolloResolver
// ---------------------------------------------------------------------------

/// Calls the organization enrichment endpoint for one domain at a time.
pub struct ApolloResolver {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    delay: CourtesyDelay,
}

impl ApolloResolver {
    /// `api_key` is read once at startup; `None` makes every call return
    /// the "not configured" error without touching the network.
    pub fn new(config: &ApolloConfig, api_key: Option<String>, http: &HttpConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            EnrichError::config(format!("invalid apollo.endpoint '{}': {e}", config.endpoint))
        })?;

        Ok(Self {
            client: build_api_client(config.timeout_secs)?,
            endpoint,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            delay: CourtesyDelay::from(http),
        })
    }

    /// Override the courtesy delay (tests use [`CourtesyDelay::none`]).
    pub fn with_delay(mut self, delay: CourtesyDelay) -> Self {
        self.delay = delay;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Enrich a company from its website URL or bare domain.
    #[instrument(skip(self))]
    pub async fn enrich(&self, url_or_domain: Option<&str>) -> ApolloResult {
        let Some(api_key) = self.api_key.as_deref() else {
            return ApolloResult::error(EnrichError::NotConfigured("Apollo API key".into()).to_string());
        };

        let input = match url_or_domain.map(str::trim) {
            Some(input) if !input.is_empty() => input,
            _ => return ApolloResult::error("No URL or domain provided"),
        };

        let Some(domain) = extract_domain(input) else {
            return ApolloResult::error(format!("Could not extract domain from {input}"));
        };

        info!(%domain, "enriching domain");
        self.delay.wait().await;

        match self.fetch_organization(api_key, &domain).await {
            Ok(Some(org)) => {
                info!(%domain, "enriched domain");
                organization_result(domain, &org)
            }
            Ok(None) => {
                warn!(%domain, "no organization data found");
                ApolloResult::domain_error(domain, "No organization data found")
            }
            Err(message) => {
                warn!(%domain, error = %message, "enrichment request failed");
                ApolloResult::domain_error(domain, message)
            }
        }
    }

    /// Enrich several inputs in order; entries without a domain are
    /// reported as `"Missing domain"`.
    pub async fn enrich_many(&self, inputs: &[Option<String>]) -> Vec<ApolloResult> {
        let mut results = Vec::with_capacity(inputs.len());
        for input in inputs {
            match input.as_deref().map(str::trim) {
                Some(domain) if !domain.is_empty() => results.push(self.enrich(Some(domain)).await),
                _ => results.push(ApolloResult::error("Missing domain")),
            }
        }
        results
    }

    /// Returns the `organization` object, `None` when the API has no data,
    /// or a message describing the failure.
    async fn fetch_organization(
        &self,
        api_key: &str,
        domain: &str,
    ) -> std::result::Result<Option<Map<String, Value>>, String> {
        let response = self
            .client
            .get(self.endpoint.as_str())
            .header("accept", "application/json")
            .header("Cache-Control", "no-cache")
            .header("Content-Type", "application/json")
            .header(API_KEY_HEADER, api_key)
            .query(&[("domain", domain)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| describe_failure(&e))?;

        let body: EnrichResponse = response.json().await.map_err(|e| describe_failure(&e))?;

        Ok(body.organization.filter(|org| !org.is_empty()))
    }
}

fn describe_failure(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "Request timed out".to_string()
    } else {
        err.to_string()
    }
}

/// Map the organization payload to a result, dropping empty fields.
fn organization_result(domain: String, org: &Map<String, Value>) -> ApolloResult {
    ApolloResult {
        domain: Some(domain),
        name: text_field(org, "name"),
        website_url: text_field(org, "website_url"),
        linkedin_url: text_field(org, "linkedin_url"),
        founded_year: int_field(org, "founded_year"),
        annual_revenue_printed: text_field(org, "annual_revenue_printed"),
        employees_count: int_field(org, "employees_count"),
        industry: text_field(org, "industry"),
        location: text_field(org, "location"),
        source: Some(Source::Apollo),
        error: None,
    }
}

fn text_field(org: &Map<String, Value>, key: &str) -> Option<String> {
    match org.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn int_field(org: &Map<String, Value>, key: &str) -> Option<i64> {
    match org.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reduce a URL to its bare domain; non-URL input is taken as a domain already.
///
/// `https://www.Example.com/path` becomes `example.com`. Returns `None` when
/// an http(s) URL has no host.
pub fn extract_domain(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if !input.starts_with("http://") && !input.starts_with("https://") {
        return Some(input.to_string());
    }

    let url = Url::parse(input).ok()?;
    let host = url.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    if host.is_empty() {
        return None;
    }
    Some(host.to_string())
}
