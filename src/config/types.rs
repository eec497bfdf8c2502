use crate::extract::Selector;
use crate::fetch::DEFAULT_CONCURRENCY;
use crate::output::OutputFormat;
use crate::robots::DEFAULT_ROBOTS_TIMEOUT;
use serde::Deserialize;
use std::time::Duration;

/// User agent sent with every page and robots.txt request unless overridden
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Main configuration structure for Sumi-Scrape
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrapeConfig {
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Extraction rules, one `[[selector]]` table each
    #[serde(default, rename = "selector")]
    pub selectors: Vec<Selector>,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Fetch behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Maximum number of URLs being fetched at once
    pub concurrency: u32,

    /// Minimum spacing between requests to one scope (seconds, 0 disables)
    pub delay: f64,

    /// Space requests per host instead of process-wide
    #[serde(rename = "per-host")]
    pub per_host: bool,

    /// Attempts per URL, including the first one
    pub retries: u32,

    /// Hard timeout for a single attempt (seconds)
    #[serde(rename = "timeout-per-attempt")]
    pub timeout_per_attempt: f64,

    /// Backoff after the first failed attempt (seconds), doubled each retry
    #[serde(rename = "backoff-base")]
    pub backoff_base: f64,

    /// Check robots.txt before fetching
    #[serde(rename = "respect-robots")]
    pub respect_robots: bool,

    /// Timeout for robots.txt requests (seconds)
    #[serde(rename = "robots-timeout")]
    pub robots_timeout: f64,

    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY as u32,
            delay: 0.0,
            per_host: false,
            retries: 3,
            timeout_per_attempt: 20.0,
            backoff_base: 1.0,
            respect_robots: false,
            robots_timeout: DEFAULT_ROBOTS_TIMEOUT.as_secs_f64(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    /// Minimum request spacing; zero when limiting is disabled
    pub fn delay(&self) -> Duration {
        secs(self.delay)
    }

    pub fn timeout_per_attempt(&self) -> Duration {
        secs(self.timeout_per_attempt)
    }

    pub fn backoff_base(&self) -> Duration {
        secs(self.backoff_base)
    }

    pub fn robots_timeout(&self) -> Duration {
        secs(self.robots_timeout)
    }
}

/// Largest accepted value for any duration setting (one day)
pub const MAX_DURATION_SECS: f64 = 86_400.0;

/// Clamps into `0..=MAX_DURATION_SECS`; NaN reads as zero
fn secs(value: f64) -> Duration {
    if value.is_nan() {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(value.clamp(0.0, MAX_DURATION_SECS))
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File to write results to; results are only summarised when absent
    pub path: Option<String>,

    pub format: OutputFormat,
}
