//! Google web search.

use std::sync::LazyLock;

use scraper::Selector;
use url::Url;

use super::SearchEngine;

/// Organic result anchors; ads and "people also ask" blocks use other markup.
static RESULT_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.g div.yuRUbf > a").expect("google result selector"));

/// Scrapes organic results from Google's HTML results page.
pub struct GoogleEngine {
    endpoint: Url,
}

impl GoogleEngine {
    pub fn new(endpoint: Url) -> Self {
        Self { endpoint }
    }
}

impl SearchEngine for GoogleEngine {
    fn name(&self) -> &str {
        "google"
    }

    fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn link_selector(&self) -> &Selector {
        &RESULT_LINK_SEL
    }
}
