//! Brave Search.
//!
//! Brave's markup changes often, so every absolute link on the page is a
//! candidate; scoring and the denylist do the filtering.

use std::sync::LazyLock;

use scraper::Selector;
use url::Url;

use super::SearchEngine;

static ABSOLUTE_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href^="http"]"#).expect("brave link selector"));

/// Scrapes result links from Brave's HTML results page.
pub struct BraveEngine {
    endpoint: Url,
}

impl BraveEngine {
    pub fn new(endpoint: Url) -> Self {
        Self { endpoint }
    }
}

impl SearchEngine for BraveEngine {
    fn name(&self) -> &str {
        "brave"
    }

    fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn link_selector(&self) -> &Selector {
        &ABSOLUTE_LINK_SEL
    }
}
