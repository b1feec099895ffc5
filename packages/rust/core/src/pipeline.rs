//! Per-company enrichment: website, then revenue, then the enrichment API.

use tracing::{info, instrument, warn};

use leadenrich_apollo::ApolloResolver;
use leadenrich_revenue::RevenueResolver;
use leadenrich_shared::{AppConfig, Result};
use leadenrich_website::WebsiteResolver;

use crate::batch::BatchSummary;
use crate::merge::{EnrichedCompanyRecord, ResolverOutputs, merge_record};

/// Progress callback for reporting batch status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called once a company's record is ready, in input order.
    fn company_done(&self, record: &EnrichedCompanyRecord, current: usize, total: usize);
    /// Called when the batch completes.
    fn done(&self, summary: &BatchSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn company_done(&self, _record: &EnrichedCompanyRecord, _current: usize, _total: usize) {}
    fn done(&self, _summary: &BatchSummary) {}
}

/// The three resolvers, wired from one config.
pub struct Enricher {
    website: WebsiteResolver,
    revenue: RevenueResolver,
    apollo: ApolloResolver,
}

impl Enricher {
    pub fn new(website: WebsiteResolver, revenue: RevenueResolver, apollo: ApolloResolver) -> Self {
        Self {
            website,
            revenue,
            apollo,
        }
    }

    /// Build every resolver from `config`. `api_key` is the enrichment API
    /// key read at startup; without it the API resolver reports an error
    /// for each company instead of calling out.
    pub fn from_config(config: &AppConfig, api_key: Option<String>) -> Result<Self> {
        Ok(Self::new(
            WebsiteResolver::new(&config.search, &config.http)?,
            RevenueResolver::new(&config.revenue, &config.http)?,
            ApolloResolver::new(&config.apollo, api_key, &config.http)?,
        ))
    }

    pub fn website(&self) -> &WebsiteResolver {
        &self.website
    }

    pub fn revenue(&self) -> &RevenueResolver {
        &self.revenue
    }

    pub fn apollo(&self) -> &ApolloResolver {
        &self.apollo
    }

    /// Enrich one company.
    ///
    /// The website is resolved first. Revenue is always looked up. The
    /// enrichment API is only called when a website was found, since it
    /// keys on the domain. Failures become annotations on the record.
    #[instrument(skip(self))]
    pub async fn enrich_company(&self, company: &str) -> EnrichedCompanyRecord {
        info!("enriching company");

        let website = self.website.resolve(company).await;
        let revenue = self.revenue.resolve(company).await;
        let apollo = match website.as_deref() {
            Some(url) => Some(self.apollo.enrich(Some(url)).await),
            None => None,
        };

        let record = merge_record(
            company,
            ResolverOutputs {
                website,
                revenue,
                apollo,
            },
        );

        match record.error_summary() {
            None => info!("company enriched"),
            Some(errors) => warn!(%errors, "company enriched with errors"),
        }
        record
    }
}
