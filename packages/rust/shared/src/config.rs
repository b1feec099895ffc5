//! Application configuration for leadenrich.
//!
//! User config lives at `~/.leadenrich/leadenrich.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EnrichError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "leadenrich.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".leadenrich";

/// Browser-like User-Agent; the scraped sites reject obvious bots.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// ---------------------------------------------------------------------------
// Config structs (matching leadenrich.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Shared HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Revenue-lookup site settings.
    #[serde(default)]
    pub revenue: RevenueConfig,

    /// Search engine settings for website resolution.
    #[serde(default)]
    pub search: SearchConfig,

    /// Enrichment API settings.
    #[serde(default)]
    pub apollo: ApolloConfig,

    /// Batch processing settings.
    #[serde(default)]
    pub batch: BatchConfig,
}

/// `[http]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent sent to scraped sites.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// `Accept` header sent to scraped sites.
    #[serde(default = "default_accept")]
    pub accept: String,

    /// `Accept-Language` header sent to scraped sites.
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Lower bound of the randomized delay before each request.
    #[serde(default = "default_delay_min_ms")]
    pub delay_min_ms: u64,

    /// Upper bound of the randomized delay before each request.
    #[serde(default = "default_delay_max_ms")]
    pub delay_max_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept: default_accept(),
            accept_language: default_accept_language(),
            delay_min_ms: default_delay_min_ms(),
            delay_max_ms: default_delay_max_ms(),
        }
    }
}

fn default_user_agent() -> String {
    BROWSER_USER_AGENT.into()
}
fn default_accept() -> String {
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8".into()
}
fn default_accept_language() -> String {
    "en-US,en;q=0.5".into()
}
fn default_delay_min_ms() -> u64 {
    1000
}
fn default_delay_max_ms() -> u64 {
    2000
}

/// `[revenue]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueConfig {
    /// Company page prefix; the URL-encoded name variant is appended.
    #[serde(default = "default_revenue_base_url")]
    pub base_url: String,

    /// Per-request timeout.
    #[serde(default = "default_revenue_timeout")]
    pub timeout_secs: u64,
}

impl Default for RevenueConfig {
    fn default() -> Self {
        Self {
            base_url: default_revenue_base_url(),
            timeout_secs: default_revenue_timeout(),
        }
    }
}

fn default_revenue_base_url() -> String {
    "https://growjo.com/company/".into()
}
fn default_revenue_timeout() -> u64 {
    15
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Engines to query, in fallback order ("google", "brave").
    #[serde(default = "default_engines")]
    pub engines: Vec<String>,

    /// Google search endpoint.
    #[serde(default = "default_google_url")]
    pub google_url: String,

    /// Brave search endpoint.
    #[serde(default = "default_brave_url")]
    pub brave_url: String,

    /// Per-request timeout.
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,

    /// How many result links per engine are scored.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    /// Fraction of company-name terms a candidate URL must contain.
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,

    /// Domains that are never the official website.
    #[serde(default = "default_denylist")]
    pub denylist: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            engines: default_engines(),
            google_url: default_google_url(),
            brave_url: default_brave_url(),
            timeout_secs: default_search_timeout(),
            max_candidates: default_max_candidates(),
            match_threshold: default_match_threshold(),
            denylist: default_denylist(),
        }
    }
}

fn default_engines() -> Vec<String> {
    vec!["google".into(), "brave".into()]
}
fn default_google_url() -> String {
    "https://www.google.com/search".into()
}
fn default_brave_url() -> String {
    "https://search.brave.com/search".into()
}
fn default_search_timeout() -> u64 {
    10
}
fn default_max_candidates() -> usize {
    5
}
fn default_match_threshold() -> f64 {
    0.5
}
fn default_denylist() -> Vec<String> {
    ["wikipedia.org", "linkedin.com", "facebook.com", "twitter.com"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// `[apollo]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApolloConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Organization enrichment endpoint.
    #[serde(default = "default_apollo_endpoint")]
    pub endpoint: String,

    /// Per-request timeout.
    #[serde(default = "default_apollo_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApolloConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            endpoint: default_apollo_endpoint(),
            timeout_secs: default_apollo_timeout(),
        }
    }
}

fn default_api_key_env() -> String {
    "APOLLO_API_KEY".into()
}
fn default_apollo_endpoint() -> String {
    "https://api.apollo.io/api/v1/organizations/enrich".into()
}
fn default_apollo_timeout() -> u64 {
    15
}

/// `[batch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Companies enriched in parallel. Sources within one company stay ordered.
    #[serde(default = "default_batch_concurrency")]
    pub concurrency: usize,

    /// Directory processed CSV files are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_batch_concurrency(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_batch_concurrency() -> usize {
    1
}
fn default_output_dir() -> String {
    "output".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.leadenrich/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| EnrichError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.leadenrich/leadenrich.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| EnrichError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| EnrichError::config(format!("failed to parse {}: {e}", path.display())))?;

    validate_config(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| EnrichError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| EnrichError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| EnrichError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject values the resolvers cannot work with.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.http.delay_min_ms > config.http.delay_max_ms {
        return Err(EnrichError::config(format!(
            "http.delay_min_ms ({}) is greater than http.delay_max_ms ({})",
            config.http.delay_min_ms, config.http.delay_max_ms
        )));
    }
    if !(0.0..=1.0).contains(&config.search.match_threshold) {
        return Err(EnrichError::config(format!(
            "search.match_threshold must be within 0.0..=1.0, got {}",
            config.search.match_threshold
        )));
    }
    if config.search.max_candidates == 0 {
        return Err(EnrichError::config("search.max_candidates must be at least 1"));
    }
    if config.batch.concurrency == 0 {
        return Err(EnrichError::config("batch.concurrency must be at least 1"));
    }
    Ok(())
}

/// Read the enrichment API key from the env var named in config.
///
/// Called once at startup. A missing key is not fatal: the enrichment
/// resolver degrades to an error result on every call.
pub fn api_key_from_env(config: &ApolloConfig) -> Option<String> {
    match std::env::var(&config.api_key_env) {
        Ok(val) if !val.trim().is_empty() => Some(val),
        _ => {
            tracing::warn!(
                env_var = %config.api_key_env,
                "Apollo API key not found in environment"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("growjo.com"));
        assert!(toml_str.contains("APOLLO_API_KEY"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.search.max_candidates, 5);
        assert_eq!(parsed.search.engines, vec!["google", "brave"]);
        assert_eq!(parsed.apollo.api_key_env, "APOLLO_API_KEY");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let toml_str = r#"
[search]
match_threshold = 0.75
denylist = ["crunchbase.com"]

[batch]
concurrency = 4
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.search.match_threshold, 0.75);
        assert_eq!(config.search.denylist, vec!["crunchbase.com"]);
        assert_eq!(config.search.timeout_secs, 10);
        assert_eq!(config.revenue.timeout_secs, 15);
        assert_eq!(config.batch.concurrency, 4);
        assert_eq!(config.http.delay_min_ms, 1000);
    }

    #[test]
    fn rejects_inverted_delay_bounds() {
        let mut config = AppConfig::default();
        config.http.delay_min_ms = 3000;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("delay_min_ms"));
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let mut config = AppConfig::default();
        config.search.match_threshold = 1.5;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn missing_api_key_is_not_fatal() {
        let config = ApolloConfig {
            // Use a unique env var name to avoid interfering with other tests
            api_key_env: "LEADENRICH_TEST_NONEXISTENT_KEY_12345".into(),
            ..ApolloConfig::default()
        };
        assert!(api_key_from_env(&config).is_none());
    }
}
