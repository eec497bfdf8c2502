/// Fetch state definitions for tracking a single URL through its attempts
use crate::ScrapeError;
use std::fmt;

/// Represents the current state of one logical fetch
///
/// ```text
/// Pending -> Attempting(1) -> Attempting(2) -> ... -> Succeeded | Failed
/// ```
///
/// `Succeeded` and `Failed` are terminal: no transition leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchState {
    /// Not yet attempted
    Pending,

    /// Attempt `n` (1-based) is in flight
    Attempting(u32),

    /// A 2xx response was received
    Succeeded,

    /// Attempts were exhausted, or the fetch was abandoned
    Failed,
}

impl FetchState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Returns the attempt number, if an attempt is in flight
    pub fn attempt(&self) -> Option<u32> {
        match self {
            Self::Attempting(n) => Some(*n),
            _ => None,
        }
    }

    /// Checks whether moving to `next` is a legal transition
    pub fn can_transition_to(&self, next: FetchState) -> bool {
        match (self, next) {
            (Self::Pending, Self::Attempting(1)) => true,
            (Self::Attempting(n), Self::Attempting(m)) => m == n + 1,
            (Self::Attempting(_), Self::Succeeded | Self::Failed) => true,
            _ => false,
        }
    }

    /// Moves to `next`, or fails with `InvalidTransition`
    pub fn transition(self, next: FetchState) -> Result<FetchState, ScrapeError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ScrapeError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for FetchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Attempting(n) => write!(f, "attempting({})", n),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
