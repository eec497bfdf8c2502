//! Batch orchestration - fan-out/fan-in over a URL list
//!
//! This module runs every URL of a batch concurrently and joins on all of
//! them:
//! - Checking robots.txt (when enabled) before taking a gate slot
//! - Holding a gate slot for the whole fetch-with-retry section
//! - Handing each fetched body to the extractor
//! - Turning every failure into that URL's result, never the batch's
//!
//! Results come back in input order regardless of completion order.

use crate::config::FetchConfig;
use crate::extract::{ExtractedData, Extractor};
use crate::fetch::fetcher::{build_http_client, FetchOutcome, RetryPolicy, RetryingFetcher};
use crate::fetch::gate::ConcurrencyGate;
use crate::fetch::rate_limiter::RateLimiter;
use crate::robots::RobotsCache;
use crate::url::parse_target_url;
use crate::ScrapeError;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// The result for one input URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    /// The URL as given in the input list
    pub url: String,

    /// Whether the page was fetched and extracted
    pub ok: bool,

    /// Extracted fields, present when `ok`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ExtractedData>,

    /// Human-readable failure cause, present when not `ok`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageResult {
    pub fn success(url: impl Into<String>, data: ExtractedData) -> Self {
        Self {
            url: url.into(),
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Main batch orchestrator
pub struct Orchestrator {
    fetcher: RetryingFetcher,
    gate: ConcurrencyGate,
    robots: Option<RobotsCache>,
    extractor: Arc<dyn Extractor>,
    cancel: CancellationToken,
}

impl Orchestrator {
    /// Creates an orchestrator from fetch settings
    ///
    /// # Arguments
    ///
    /// * `config` - Fetch settings (concurrency, spacing, retries, robots, user agent)
    /// * `extractor` - Extraction step applied to every fetched body
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - Ready to run batches
    /// * `Err(ScrapeError)` - The HTTP client could not be built
    pub fn new(config: &FetchConfig, extractor: Arc<dyn Extractor>) -> Result<Self, ScrapeError> {
        let client = build_http_client(&config.user_agent)?;

        let limiter = Arc::new(RateLimiter::new(config.delay(), config.per_host));
        let fetcher = RetryingFetcher::new(client.clone(), RetryPolicy::from(config), limiter);
        let gate = ConcurrencyGate::new(config.concurrency as usize);
        let robots = config
            .respect_robots
            .then(|| RobotsCache::new(client, &config.user_agent, config.robots_timeout()));

        Ok(Self::from_parts(fetcher, gate, robots, extractor))
    }

    /// Assembles an orchestrator from explicitly constructed components
    pub fn from_parts(
        fetcher: RetryingFetcher,
        gate: ConcurrencyGate,
        robots: Option<RobotsCache>,
        extractor: Arc<dyn Extractor>,
    ) -> Self {
        Self {
            fetcher,
            gate,
            robots,
            extractor,
            cancel: CancellationToken::new(),
        }
    }

    /// Uses `token` to abandon the run early
    ///
    /// URLs not finished when the token fires get a "Cancelled" result.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn gate(&self) -> &ConcurrencyGate {
        &self.gate
    }

    pub fn robots(&self) -> Option<&RobotsCache> {
        self.robots.as_ref()
    }

    /// Processes every URL concurrently and returns one result per URL, in input order
    pub async fn run(&self, urls: &[String]) -> Vec<PageResult> {
        tracing::info!(
            "Scraping {} URLs (concurrency {}, robots.txt agent: {})",
            urls.len(),
            self.gate.capacity(),
            self.robots.as_ref().map_or("ignored", |robots| robots.agent())
        );
        let start_time = Instant::now();

        let results = join_all(urls.iter().map(|url| self.process_url(url))).await;

        let succeeded = results.iter().filter(|r| r.ok).count();
        tracing::info!(
            "Batch completed: {} ok, {} failed in {:?}",
            succeeded,
            results.len() - succeeded,
            start_time.elapsed()
        );

        results
    }

    /// Processes a single URL, racing it against cancellation
    async fn process_url(&self, url: &str) -> PageResult {
        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ScrapeError::Cancelled),
            outcome = self.scrape(url) => outcome,
        };

        match outcome {
            Ok(data) => {
                tracing::debug!("OK {}", url);
                PageResult::success(url, data)
            }
            Err(e) => {
                tracing::debug!("ERR {}: {}", url, e);
                PageResult::failure(url, e.to_string())
            }
        }
    }

    /// Robots check, gated fetch, then extraction
    async fn scrape(&self, raw: &str) -> Result<ExtractedData, ScrapeError> {
        let url = parse_target_url(raw)?;

        if let Some(robots) = &self.robots {
            if !robots.can_fetch(&url).await {
                tracing::info!("Blocked by robots.txt: {}", url);
                return Err(ScrapeError::RobotsDenied {
                    url: url.to_string(),
                });
            }
        }

        let body = {
            let _permit = self.gate.acquire().await?;
            match self.fetcher.fetch(&url).await {
                FetchOutcome::Success { body, .. } => body,
                FetchOutcome::TransientFailure { cause }
                | FetchOutcome::PermanentFailure { cause } => {
                    return Err(ScrapeError::Fetch {
                        url: url.to_string(),
                        cause,
                    })
                }
            }
        };

        self.extractor
            .extract(&body)
            .map_err(|source| ScrapeError::Extraction {
                url: url.to_string(),
                source,
            })
    }
}
