//! Merging resolver outputs into one record per company.
//!
//! A resolver that failed leaves an entry in [`EnrichedCompanyRecord::errors`]
//! and contributes no fields; the other resolvers' fields are still merged.
//! Partial enrichment is a valid end state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use leadenrich_shared::{ApolloResult, Result, RevenueResult, Source};

/// Error annotation recorded when no website was found.
pub const WEBSITE_NOT_FOUND: &str = "Could not find company website";

/// The resolvers whose failures are annotated on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolver {
    Website,
    Revenue,
    Apollo,
}

impl Resolver {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Revenue => "revenue",
            Self::Apollo => "apollo",
        }
    }
}

/// Everything the resolvers returned for one company.
#[derive(Debug)]
pub struct ResolverOutputs {
    pub website: Option<String>,
    pub revenue: Result<RevenueResult>,
    /// `None` when the enrichment API was not called (no website).
    pub apollo: Option<ApolloResult>,
}

/// One enriched company, as reported to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedCompanyRecord {
    /// The company name as given.
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_revenue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_source: Option<Source>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attempted_variants: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founded_year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_revenue_printed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Per-resolver failure messages.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<Resolver, String>,
}

impl EnrichedCompanyRecord {
    /// True when at least one resolver contributed data.
    pub fn has_data(&self) -> bool {
        self.website.is_some() || self.estimated_revenue.is_some() || self.domain.is_some()
    }

    /// All error annotations as `resolver: message`, joined with `; `.
    pub fn error_summary(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(
            self.errors
                .iter()
                .map(|(resolver, msg)| format!("{}: {msg}", resolver.as_str()))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Build the record for `company` from whatever the resolvers produced.
pub fn merge_record(company: &str, outputs: ResolverOutputs) -> EnrichedCompanyRecord {
    let mut record = EnrichedCompanyRecord {
        company: company.to_string(),
        ..EnrichedCompanyRecord::default()
    };

    match outputs.website {
        Some(url) => record.website = Some(url),
        None => {
            record
                .errors
                .insert(Resolver::Website, WEBSITE_NOT_FOUND.to_string());
        }
    }

    match outputs.revenue {
        Ok(revenue) => {
            record.estimated_revenue = Some(revenue.estimated_revenue);
            record.matched_variant = revenue.matched_variant;
            record.revenue_url = revenue.url;
            record.revenue_source = Some(revenue.source);
            record.attempted_variants = revenue.attempted_variants;
        }
        Err(e) => {
            record.errors.insert(Resolver::Revenue, e.to_string());
        }
    }

    if let Some(apollo) = outputs.apollo {
        match apollo.error {
            Some(msg) => {
                record.errors.insert(Resolver::Apollo, msg);
            }
            None => {
                record.domain = apollo.domain;
                record.name = apollo.name;
                record.website_url = apollo.website_url;
                record.linkedin_url = apollo.linkedin_url;
                record.founded_year = apollo.founded_year;
                record.annual_revenue_printed = apollo.annual_revenue_printed;
                record.employees_count = apollo.employees_count;
                record.industry = apollo.industry;
                record.location = apollo.location;
            }
        }
    }

    record
}
