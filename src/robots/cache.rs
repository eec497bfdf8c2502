//! Per-host robots.txt cache
//!
//! Each host's robots.txt is fetched at most once for the lifetime of a
//! cache. The first caller for a host performs the fetch; concurrent callers
//! for the same host wait on it and then read the cached rules. Callers for
//! different hosts never wait on each other.

use crate::robots::parser::agent_token;
use crate::robots::{fetch_robots, ParsedRobots};
use crate::url::{host_key, robots_url};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};
use url::Url;

/// Default timeout for robots.txt requests
pub const DEFAULT_ROBOTS_TIMEOUT: Duration = Duration::from_secs(10);

/// Cache of robots.txt rules keyed by host
pub struct RobotsCache {
    client: Client,
    user_agent: String,
    timeout: Duration,
    hosts: Mutex<HashMap<String, Arc<OnceCell<ParsedRobots>>>>,
    fetches: AtomicUsize,
}

impl RobotsCache {
    /// Creates an empty cache
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used for robots.txt requests
    /// * `user_agent` - The full User-Agent string; rules are matched on its product token
    /// * `timeout` - Timeout for each robots.txt request
    pub fn new(client: Client, user_agent: &str, timeout: Duration) -> Self {
        Self {
            client,
            user_agent: agent_token(user_agent).to_string(),
            timeout,
            hosts: Mutex::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Checks whether `url` may be fetched
    ///
    /// Resolves the host's rules on first use. Fetch failures never surface
    /// here: an unavailable robots.txt allows everything.
    pub async fn can_fetch(&self, url: &Url) -> bool {
        let robots = self.rules_for(url).await;
        let allowed = robots.is_allowed(url.as_str(), &self.user_agent);

        if !allowed {
            tracing::debug!("robots.txt disallows {} for {}", url, self.user_agent);
        }
        allowed
    }

    /// Returns the rules for the host of `url`, fetching them if needed
    pub async fn rules_for(&self, url: &Url) -> ParsedRobots {
        let Some(host) = host_key(url) else {
            return ParsedRobots::allow_all();
        };

        // Only the cell lookup happens under the table lock; the fetch itself
        // runs under the host's own cell.
        let cell = {
            let mut hosts = self.hosts.lock().await;
            Arc::clone(hosts.entry(host.clone()).or_default())
        };

        cell.get_or_init(|| async {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let location = robots_url(url);
            tracing::debug!("Fetching robots.txt for {} from {}", host, location);
            fetch_robots(&self.client, location.as_str(), self.timeout).await
        })
        .await
        .clone()
    }

    /// Number of robots.txt fetches performed so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Number of hosts with a cache entry
    pub async fn cached_hosts(&self) -> usize {
        self.hosts.lock().await.len()
    }

    /// The product token rules are matched against
    pub fn agent(&self) -> &str {
        &self.user_agent
    }
}
