//! Search engine trait and built-in engines.
//!
//! Each engine knows its endpoint and how to find result links in its own
//! results page. Engines are queried in the order configured in
//! `search.engines`; the first one that yields an acceptable link wins.

mod brave;
mod google;

use leadenrich_shared::{EnrichError, Result, SearchConfig};
use scraper::Selector;
use url::Url;

pub use brave::BraveEngine;
pub use google::GoogleEngine;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A web search engine whose HTML results page can be scraped for links.
pub trait SearchEngine: Send + Sync {
    /// Short engine name for tracing and config (`"google"`, `"brave"`).
    fn name(&self) -> &str;

    /// Search endpoint; the query is sent as the `q` parameter.
    fn endpoint(&self) -> &Url;

    /// Selector matching result links, in ranking order.
    fn link_selector(&self) -> &Selector;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Build the configured engines in fallback order.
pub fn engines_from_config(config: &SearchConfig) -> Result<Vec<Box<dyn SearchEngine>>> {
    if config.engines.is_empty() {
        return Err(EnrichError::config("search.engines must name at least one engine"));
    }

    config
        .engines
        .iter()
        .map(|name| -> Result<Box<dyn SearchEngine>> {
            match name.to_lowercase().as_str() {
                "google" => Ok(Box::new(GoogleEngine::new(parse_endpoint(
                    "google_url",
                    &config.google_url,
                )?))),
                "brave" => Ok(Box::new(BraveEngine::new(parse_endpoint(
                    "brave_url",
                    &config.brave_url,
                )?))),
                other => Err(EnrichError::config(format!(
                    "unknown search engine '{other}': expected 'google' or 'brave'"
                ))),
            }
        })
        .collect()
}

fn parse_endpoint(field: &str, raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| EnrichError::config(format!("invalid search.{field} '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_order_is_google_then_brave() {
        let engines = engines_from_config(&SearchConfig::default()).unwrap();
        let names: Vec<&str> = engines.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["google", "brave"]);
        assert_eq!(engines[0].endpoint().as_str(), "https://www.google.com/search");
    }

    #[test]
    fn configured_order_is_respected() {
        let config = SearchConfig {
            engines: vec!["Brave".into(), "google".into()],
            ..SearchConfig::default()
        };
        let engines = engines_from_config(&config).unwrap();
        assert_eq!(engines[0].name(), "brave");
        assert_eq!(engines[1].name(), "google");
    }

    #[test]
    fn unknown_engine_is_config_error() {
        let config = SearchConfig {
            engines: vec!["altavista".into()],
            ..SearchConfig::default()
        };
        let err = engines_from_config(&config).err().expect("should fail");
        assert!(err.to_string().contains("altavista"));
    }

    #[test]
    fn empty_engine_list_is_config_error() {
        let config = SearchConfig {
            engines: Vec::new(),
            ..SearchConfig::default()
        };
        assert!(engines_from_config(&config).is_err());
    }
}
