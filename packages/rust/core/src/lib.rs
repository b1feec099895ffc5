//! Company enrichment orchestration for leadenrich.
//!
//! Ties the website, revenue and enrichment-API resolvers together into a
//! per-company pipeline, merges their outputs, and runs CSV batches.

pub mod batch;
pub mod merge;
pub mod pipeline;
pub mod table;

pub use merge::{EnrichedCompanyRecord, Resolver, merge_record};
pub use pipeline::{Enricher, ProgressReporter, SilentProgress};

#[cfg(test)]
mod test_support;
