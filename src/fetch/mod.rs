//! Fetch module: the polite fetching core
//!
//! This module contains:
//! - Request spacing per host or process-wide
//! - Global concurrency limiting
//! - HTTP fetching with retry and exponential backoff
//! - Batch orchestration with per-URL failure isolation

mod fetcher;
mod gate;
mod orchestrator;
mod rate_limiter;

pub use fetcher::{build_http_client, FetchOutcome, RetryPolicy, RetryingFetcher};
pub use gate::{ConcurrencyGate, GatePermit, DEFAULT_CONCURRENCY};
pub use orchestrator::{Orchestrator, PageResult};
pub use rate_limiter::{RateLimiter, RateSchedule, ScopeKey};

use crate::config::FetchConfig;
use crate::extract::Extractor;
use crate::ScrapeError;
use std::sync::Arc;

/// Scrapes a batch of URLs with the given settings
///
/// Convenience wrapper building a fresh [`Orchestrator`] for one run. The
/// only error is failing to build the HTTP client; per-URL failures are
/// reported in the returned results.
///
/// # Arguments
///
/// * `urls` - Absolute URLs to fetch
/// * `config` - Fetch settings
/// * `extractor` - Extraction step applied to every fetched body
///
/// # Returns
///
/// * `Ok(Vec<PageResult>)` - One result per input URL, in input order
/// * `Err(ScrapeError)` - The run could not be set up
pub async fn scrape(
    urls: &[String],
    config: &FetchConfig,
    extractor: Arc<dyn Extractor>,
) -> Result<Vec<PageResult>, ScrapeError> {
    let orchestrator = Orchestrator::new(config, extractor)?;
    Ok(orchestrator.run(urls).await)
}
