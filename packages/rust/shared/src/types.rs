//! Resolver result types shared across leadenrich crates.
//!
//! Every resolver returns a freshly built value; callers merge them and never
//! mutate a result after it is returned.

use serde::{Deserialize, Serialize};

/// Revenue bucket used when no real figure could be found.
pub const LOWEST_REVENUE_BUCKET: &str = "<$5M";

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Which source produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// The revenue-lookup site.
    Growjo,
    /// The commercial enrichment API.
    Apollo,
    /// Synthesized when every real source was exhausted.
    Fallback,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Growjo => "growjo",
            Self::Apollo => "apollo",
            Self::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RevenueResult
// ---------------------------------------------------------------------------

/// Outcome of a revenue lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueResult {
    /// The company name as given by the caller.
    pub company: String,
    /// Name variant whose page matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_variant: Option<String>,
    /// Normalized revenue figure (e.g. `$12.5M`) or the lowest bucket.
    pub estimated_revenue: String,
    /// Page the figure was read from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub source: Source,
    /// Every variant that was tried (fallback results only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attempted_variants: Vec<String>,
}

impl RevenueResult {
    /// A figure (or the lowest bucket) read from a matched company page.
    pub fn matched(
        company: impl Into<String>,
        variant: impl Into<String>,
        revenue: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            company: company.into(),
            matched_variant: Some(variant.into()),
            estimated_revenue: revenue.into(),
            url: Some(url.into()),
            source: Source::Growjo,
            attempted_variants: Vec::new(),
        }
    }

    /// Low-confidence result once every variant was exhausted.
    pub fn fallback(company: impl Into<String>, attempted_variants: Vec<String>) -> Self {
        Self {
            company: company.into(),
            matched_variant: None,
            estimated_revenue: LOWEST_REVENUE_BUCKET.into(),
            url: None,
            source: Source::Fallback,
            attempted_variants,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == Source::Fallback
    }
}

// ---------------------------------------------------------------------------
// ApolloResult
// ---------------------------------------------------------------------------

/// Outcome of an enrichment API lookup. Empty fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApolloResult {
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApolloResult {
    /// An error raised before a domain was known (no input, no credential).
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            error: Some(msg.into()),
            ..Self::default()
        }
    }

    /// An error for a specific domain, attributed to the enrichment API.
    pub fn domain_error(domain: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            source: Some(Source::Apollo),
            error: Some(msg.into()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
