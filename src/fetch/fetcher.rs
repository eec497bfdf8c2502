//! HTTP fetcher implementation
//!
//! This module handles all page requests, including:
//! - Building the HTTP client with the configured user agent
//! - Rate limiting every attempt
//! - Classifying each attempt's outcome
//! - Retrying failed attempts with exponential backoff
//!
//! # Retry Logic
//!
//! | Condition | Action |
//! |-----------|--------|
//! | HTTP 2xx | Success, body returned as-is |
//! | Any other HTTP status | Retry, backoff doubles |
//! | Timeout | Retry, backoff doubles |
//! | Connection / transport error | Retry, backoff doubles |
//! | Last attempt failed | Permanent failure with the last cause |

use crate::config::FetchConfig;
use crate::fetch::rate_limiter::RateLimiter;
use crate::state::FetchState;
use crate::ScrapeError;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Outcome of one fetch attempt, or of a whole fetch once terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A 2xx response
    Success {
        /// Response body
        body: String,
        /// HTTP status code
        status: u16,
    },

    /// A failure worth retrying (timeout, transport error, non-2xx status)
    TransientFailure { cause: String },

    /// A failure that retrying will not fix (attempts exhausted)
    PermanentFailure { cause: String },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The failure cause, if this is a failure
    pub fn cause(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::TransientFailure { cause } | Self::PermanentFailure { cause } => Some(cause),
        }
    }
}

/// Attempt count, per-attempt timeout and backoff of a fetch
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub retries: u32,
    pub timeout_per_attempt: Duration,
    /// Wait after the first failed attempt; doubled after each further one
    pub backoff_base: Duration,
}

impl RetryPolicy {
    /// Backoff after failed attempt `attempt` (1-based): `base * 2^(attempt-1)`
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.backoff_base.saturating_mul(factor)
    }

    /// Number of attempts to make; never less than one
    pub fn attempts(&self) -> u32 {
        self.retries.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            timeout_per_attempt: Duration::from_secs(20),
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl From<&FetchConfig> for RetryPolicy {
    fn from(config: &FetchConfig) -> Self {
        Self {
            retries: config.retries,
            timeout_per_attempt: config.timeout_per_attempt(),
            backoff_base: config.backoff_base(),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Timeouts are applied per request, so the client itself only bounds the
/// connect phase.
///
/// # Example
///
/// ```no_run
/// use sumi_scrape::fetch::build_http_client;
///
/// let client = build_http_client("ExampleScraper/1.0").unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs logical fetches: rate limit, request, classify, retry
pub struct RetryingFetcher {
    client: Client,
    policy: RetryPolicy,
    limiter: Arc<RateLimiter>,
}

impl RetryingFetcher {
    pub fn new(client: Client, policy: RetryPolicy, limiter: Arc<RateLimiter>) -> Self {
        Self {
            client,
            policy,
            limiter,
        }
    }

    /// Fetches `url`, retrying failed attempts
    ///
    /// # Returns
    ///
    /// * `FetchOutcome::Success` - An attempt got a 2xx response
    /// * `FetchOutcome::PermanentFailure` - Every attempt failed; carries the last cause
    pub async fn fetch(&self, url: &Url) -> FetchOutcome {
        self.fetch_with_retries(url)
            .await
            .unwrap_or_else(|e| FetchOutcome::PermanentFailure {
                cause: e.to_string(),
            })
    }

    async fn fetch_with_retries(&self, url: &Url) -> Result<FetchOutcome, ScrapeError> {
        let attempts = self.policy.attempts();
        let mut state = FetchState::Pending;
        let mut attempt = 0;

        loop {
            attempt += 1;
            state = state.transition(FetchState::Attempting(attempt))?;

            self.limiter.wait(url).await;
            tracing::debug!("Fetching {} (attempt {}/{})", url, attempt, attempts);

            match self.attempt(url).await {
                FetchOutcome::Success { body, status } => {
                    state.transition(FetchState::Succeeded)?;
                    return Ok(FetchOutcome::Success { body, status });
                }
                FetchOutcome::TransientFailure { cause }
                | FetchOutcome::PermanentFailure { cause } => {
                    if attempt >= attempts {
                        state.transition(FetchState::Failed)?;
                        tracing::warn!(
                            "Giving up on {} after {} attempts: {}",
                            url,
                            attempt,
                            cause
                        );
                        return Ok(FetchOutcome::PermanentFailure {
                            cause: format!("{} (after {} attempts)", cause, attempt),
                        });
                    }

                    let backoff = self.policy.backoff_for(attempt);
                    tracing::warn!(
                        "Attempt {}/{} for {} failed: {}; retrying in {:?}",
                        attempt,
                        attempts,
                        url,
                        cause,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    /// Issues one request and classifies the result
    async fn attempt(&self, url: &Url) -> FetchOutcome {
        let response = match self
            .client
            .get(url.clone())
            .timeout(self.policy.timeout_per_attempt)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return FetchOutcome::TransientFailure {
                    cause: classify_error(url, e).to_string(),
                }
            }
        };

        let status = response.status();
        if !status.is_success() {
            return FetchOutcome::TransientFailure {
                cause: ScrapeError::HttpStatus {
                    url: url.to_string(),
                    status: status.as_u16(),
                }
                .to_string(),
            };
        }

        match response.text().await {
            Ok(body) => FetchOutcome::Success {
                body,
                status: status.as_u16(),
            },
            Err(e) => FetchOutcome::TransientFailure {
                cause: classify_error(url, e).to_string(),
            },
        }
    }
}

/// Maps a transport error to the crate error describing it
fn classify_error(url: &Url, error: reqwest::Error) -> ScrapeError {
    if error.is_timeout() {
        ScrapeError::Timeout {
            url: url.to_string(),
        }
    } else {
        ScrapeError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
