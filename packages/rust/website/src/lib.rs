//! Official-website resolution through web search.
//!
//! Each configured [`SearchEngine`] is asked for `"<company> official
//! website"`. The top result links are scored by how many company-name terms
//! appear in the URL, and the first link at or above the match threshold is
//! taken. Engines are tried in order; if none yields a link, the company has
//! no known website.

mod candidates;
pub mod engines;

use reqwest::Client;
use scraper::Html;
use tracing::{debug, info, instrument, warn};

use leadenrich_shared::{
    CourtesyDelay, EnrichError, HttpConfig, Result, SearchConfig, build_scraper_client,
};

use crate::candidates::CandidatePolicy;

pub use engines::{BraveEngine, GoogleEngine, SearchEngine, engines_from_config};

// ---------------------------------------------------------------------------
// Per-engine outcome
// ---------------------------------------------------------------------------

/// What querying a single engine produced.
#[derive(Debug)]
enum EngineOutcome {
    /// A result link met the threshold.
    Accepted(String),
    /// The results page had no acceptable link.
    NoCandidate,
    /// Timeout, transport or HTTP status error.
    Failed(EnrichError),
}

// ---------------------------------------------------------------------------
// WebsiteResolver
// ---------------------------------------------------------------------------

/// Finds a company's official website via the configured search engines.
pub struct WebsiteResolver {
    client: Client,
    engines: Vec<Box<dyn SearchEngine>>,
    delay: CourtesyDelay,
    max_candidates: usize,
    match_threshold: f64,
    denylist: Vec<String>,
}

impl WebsiteResolver {
    pub fn new(config: &SearchConfig, http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: build_scraper_client(http, config.timeout_secs)?,
            engines: engines_from_config(config)?,
            delay: CourtesyDelay::from(http),
            max_candidates: config.max_candidates,
            match_threshold: config.match_threshold,
            denylist: config.denylist.clone(),
        })
    }

    /// Override the courtesy delay (tests use [`CourtesyDelay::none`]).
    pub fn with_delay(mut self, delay: CourtesyDelay) -> Self {
        self.delay = delay;
        self
    }

    /// Find the official website of `company`.
    ///
    /// Returns `None` for a blank name, or when no engine produced a link
    /// that clears the threshold. Engine failures are logged and skipped.
    #[instrument(skip(self))]
    pub async fn resolve(&self, company: &str) -> Option<String> {
        if company.trim().is_empty() {
            return None;
        }

        let policy = CandidatePolicy::new(
            company,
            self.match_threshold,
            self.max_candidates,
            &self.denylist,
        );

        for engine in &self.engines {
            info!(engine = engine.name(), "searching for website");
            self.delay.wait().await;

            match self.query_engine(engine.as_ref(), company, &policy).await {
                EngineOutcome::Accepted(url) => {
                    info!(engine = engine.name(), %url, "website found");
                    return Some(url);
                }
                EngineOutcome::NoCandidate => {
                    debug!(engine = engine.name(), "no qualifying result");
                }
                EngineOutcome::Failed(e) => {
                    warn!(engine = engine.name(), error = %e, "search failed");
                }
            }
        }

        info!("no website found");
        None
    }

    async fn query_engine(
        &self,
        engine: &dyn SearchEngine,
        company: &str,
        policy: &CandidatePolicy<'_>,
    ) -> EngineOutcome {
        let query = format!("{company} official website");

        let response = self
            .client
            .get(engine.endpoint().as_str())
            .query(&[("q", query.as_str())])
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let body = match response {
            Ok(r) => match r.text().await {
                Ok(body) => body,
                Err(e) => {
                    return EngineOutcome::Failed(EnrichError::Network(format!(
                        "{}: failed to read body: {e}",
                        engine.name()
                    )));
                }
            },
            Err(e) => {
                return EngineOutcome::Failed(EnrichError::Network(format!(
                    "{}: {e}",
                    engine.name()
                )));
            }
        };

        match select_candidate(engine, &body, policy) {
            Some(url) => EngineOutcome::Accepted(url),
            None => EngineOutcome::NoCandidate,
        }
    }
}

/// Run the engine's link selector over a results page and pick a candidate.
fn select_candidate(
    engine: &dyn SearchEngine,
    body: &str,
    policy: &CandidatePolicy<'_>,
) -> Option<String> {
    let doc = Html::parse_document(body);
    let hrefs = doc
        .select(engine.link_selector())
        .map(|el| el.value().attr("href"));
    policy.pick(hrefs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn load_fixture(name: &str) -> String {
        let path = format!("../../../fixtures/html/{name}");
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
    }

    fn resolver_for(server: &MockServer) -> WebsiteResolver {
        let config = SearchConfig {
            google_url: format!("{}/google/search", server.uri()),
            brave_url: format!("{}/brave/search", server.uri()),
            timeout_secs: 2,
            ..SearchConfig::default()
        };
        WebsiteResolver::new(&config, &HttpConfig::default())
            .expect("build resolver")
            .with_delay(CourtesyDelay::none())
    }

    #[tokio::test]
    async fn blank_name_returns_none_without_requests() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        assert_eq!(resolver_for(&server).resolve("  ").await, None);
    }

    #[tokio::test]
    async fn google_result_is_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/google/search"))
            .and(query_param("q", "Acme Rockets official website"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(load_fixture("google-results.html")),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/brave/search"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let website = resolver_for(&server).resolve("Acme Rockets").await;
        // The Wikipedia result ranks first but is denylisted.
        assert_eq!(website.as_deref(), Some("https://www.acmerockets.com"));
    }

    #[tokio::test]
    async fn falls_back_to_brave_when_google_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/google/search"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/brave/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(load_fixture("brave-results.html")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let website = resolver_for(&server).resolve("Globex Corporation").await;
        assert_eq!(website.as_deref(), Some("https://globex.example.com"));
    }

    #[tokio::test]
    async fn falls_back_to_brave_when_google_has_no_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/google/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(load_fixture("google-results.html")),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/brave/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(load_fixture("brave-results.html")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let website = resolver_for(&server).resolve("Globex Corporation").await;
        assert_eq!(website.as_deref(), Some("https://globex.example.com"));
    }

    #[tokio::test]
    async fn no_engine_matches_returns_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body><p>No results.</p></body></html>"),
            )
            .expect(2)
            .mount(&server)
            .await;

        assert_eq!(resolver_for(&server).resolve("Initech").await, None);
    }

    #[test]
    fn google_selector_only_reads_organic_results() {
        let engine = GoogleEngine::new(url::Url::parse("https://www.google.com/search").unwrap());
        let denylist = Vec::new();
        let policy = CandidatePolicy::new("Acme Rockets", 0.5, 5, &denylist);
        let picked = select_candidate(&engine, &load_fixture("google-results.html"), &policy);
        // The sponsored acme link sits outside `div.g` and is ignored.
        assert_eq!(
            picked.as_deref(),
            Some("https://en.wikipedia.org/wiki/acme_rockets")
        );
    }
}
