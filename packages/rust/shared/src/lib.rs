//! Shared types, error model, configuration and HTTP helpers for leadenrich.
//!
//! This crate is the foundation depended on by all other leadenrich crates.
//! It provides:
//! - [`EnrichError`], the unified error type
//! - Result types ([`RevenueResult`], [`ApolloResult`], [`Source`])
//! - Configuration ([`AppConfig`] and its sections, config loading)
//! - HTTP helpers ([`build_scraper_client`], [`CourtesyDelay`])

pub mod config;
pub mod error;
pub mod http;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    ApolloConfig, AppConfig, BatchConfig, HttpConfig, RevenueConfig, SearchConfig,
    api_key_from_env, config_dir, config_file_path, init_config, load_config, load_config_from,
    validate_config,
};
pub use error::{EnrichError, Result};
pub use http::{CourtesyDelay, build_api_client, build_scraper_client};
pub use types::{ApolloResult, LOWEST_REVENUE_BUCKET, RevenueResult, Source};
