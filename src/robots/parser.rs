//! robots.txt rule evaluation
//!
//! Matching is delegated to the robotstxt crate (a port of Google's
//! reference matcher). Rules are kept as the raw document and evaluated on
//! demand.

use robotstxt::DefaultMatcher;

/// The robots.txt rules of one host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRobots {
    /// No usable robots.txt: every URL is allowed
    AllowAll,
    /// A served robots.txt document
    Rules(String),
}

impl ParsedRobots {
    /// Wraps a served document; blank documents allow everything
    pub fn from_content(content: &str) -> Self {
        if content.trim().is_empty() {
            Self::AllowAll
        } else {
            Self::Rules(content.to_string())
        }
    }

    pub fn allow_all() -> Self {
        Self::AllowAll
    }

    /// Checks `url` (absolute, or a bare path) against the group for `agent`
    ///
    /// `agent` is a product token such as `TestBot`; see [`agent_token`].
    pub fn is_allowed(&self, url: &str, agent: &str) -> bool {
        match self {
            Self::AllowAll => true,
            Self::Rules(content) => {
                DefaultMatcher::default().one_agent_allowed_by_robots(content, agent, url)
            }
        }
    }
}

/// Reduces a full User-Agent header to the product token robots.txt groups match on
///
/// `"Mozilla/5.0 (X11; Linux)"` becomes `"Mozilla"`, `"TestBot/1.0"` becomes
/// `"TestBot"`. An agent with no usable token falls back to `"*"`.
pub fn agent_token(user_agent: &str) -> &str {
    match user_agent
        .split(|c: char| c == '/' || c.is_whitespace())
        .find(|part| !part.is_empty())
    {
        Some(token) => token,
        None => "*",
    }
}
