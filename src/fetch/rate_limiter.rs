//! Request spacing per scope
//!
//! A scope is either one host or the whole process. The limiter guarantees
//! that two requests to the same scope are issued at least `delay` apart, no
//! matter how many tasks call [`RateLimiter::wait`] at once:
//! - Each scope has its own exclusive section; callers for one scope are
//!   admitted one at a time, in arrival order
//! - The admitted caller sleeps until the scope's next allowed instant, then
//!   reserves the following slot (`now + delay`) before leaving the section
//! - Callers for other scopes never wait on that section

use crate::url::host_key;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use url::Url;

/// The unit a rate limit applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScopeKey {
    /// One scope for the whole process
    Global,
    /// One scope per host key (`host[:port]`)
    Host(String),
}

/// Next allowed instant of one scope; `None` until the scope is first contacted
type ScopeSlot = Arc<Mutex<Option<Instant>>>;

/// Earliest instant at which each scope may be contacted next
#[derive(Default)]
pub struct RateSchedule {
    scopes: Mutex<HashMap<ScopeKey, ScopeSlot>>,
}

impl RateSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot for `scope`, creating it on first contact
    async fn slot(&self, scope: ScopeKey) -> ScopeSlot {
        let mut scopes = self.scopes.lock().await;
        Arc::clone(scopes.entry(scope).or_default())
    }

    /// Earliest instant the next request to `scope` may be issued
    pub async fn next_allowed(&self, scope: &ScopeKey) -> Option<Instant> {
        let slot = {
            let scopes = self.scopes.lock().await;
            scopes.get(scope).cloned()
        }?;
        let next = *slot.lock().await;
        next
    }

    /// Number of scopes contacted so far
    pub async fn len(&self) -> usize {
        self.scopes.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Awaitable per-URL request spacing
pub struct RateLimiter {
    delay: Duration,
    per_host: bool,
    schedule: RateSchedule,
}

impl RateLimiter {
    /// Creates a limiter spacing requests by `delay`
    ///
    /// A zero `delay` disables limiting entirely.
    ///
    /// # Arguments
    ///
    /// * `delay` - Minimum spacing between requests to one scope
    /// * `per_host` - Scope by host instead of process-wide
    pub fn new(delay: Duration, per_host: bool) -> Self {
        Self {
            delay,
            per_host,
            schedule: RateSchedule::new(),
        }
    }

    /// A limiter that never delays
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, false)
    }

    pub fn is_enabled(&self) -> bool {
        !self.delay.is_zero()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&self) -> &RateSchedule {
        &self.schedule
    }

    /// Returns the scope a request to `url` is counted against
    pub fn scope_for(&self, url: &Url) -> ScopeKey {
        if self.per_host {
            // URLs without a host share one scope of their own
            ScopeKey::Host(host_key(url).unwrap_or_default())
        } else {
            ScopeKey::Global
        }
    }

    /// Waits until a request to `url` may be issued and reserves its slot
    pub async fn wait(&self, url: &Url) {
        if !self.is_enabled() {
            return;
        }

        let scope = self.scope_for(url);
        let slot = self.schedule.slot(scope.clone()).await;
        let mut next = slot.lock().await;

        if let Some(at) = *next {
            if Instant::now() < at {
                tracing::trace!(
                    "Rate limiting {:?}: waiting {:?}",
                    scope,
                    at - Instant::now()
                );
                tokio::time::sleep_until(at).await;
            }
        }

        *next = Some(Instant::now() + self.delay);
    }
}
