//! Helpers shared by the pipeline and batch tests.

use leadenrich_shared::{AppConfig, ApolloConfig, HttpConfig, RevenueConfig, SearchConfig};
use wiremock::MockServer;

pub(crate) fn load_fixture(rel: &str) -> String {
    let path = format!("../../../fixtures/{rel}");
    std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
}

/// Point every resolver at `server` and turn off the courtesy delay.
pub(crate) fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        http: HttpConfig {
            delay_min_ms: 0,
            delay_max_ms: 0,
            ..HttpConfig::default()
        },
        revenue: RevenueConfig {
            base_url: format!("{}/company/", server.uri()),
            timeout_secs: 2,
        },
        search: SearchConfig {
            google_url: format!("{}/google/search", server.uri()),
            brave_url: format!("{}/brave/search", server.uri()),
            timeout_secs: 2,
            ..SearchConfig::default()
        },
        apollo: ApolloConfig {
            endpoint: format!("{}/api/v1/organizations/enrich", server.uri()),
            timeout_secs: 2,
            ..ApolloConfig::default()
        },
        ..AppConfig::default()
    }
}
