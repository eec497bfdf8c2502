//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching robots.txt files.

mod cache;
mod parser;

pub use cache::{RobotsCache, DEFAULT_ROBOTS_TIMEOUT};
pub use parser::{agent_token, ParsedRobots};

use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Fetches and parses a robots.txt document
///
/// Never fails: a transport error, a timeout or any status other than
/// 200 yields [`ParsedRobots::allow_all`].
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `robots_url` - Absolute location of the robots.txt document
/// * `timeout` - Timeout for the whole request
pub async fn fetch_robots(client: &Client, robots_url: &str, timeout: Duration) -> ParsedRobots {
    let response = match client.get(robots_url).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("robots.txt unavailable at {} ({}), allowing all", robots_url, e);
            return ParsedRobots::allow_all();
        }
    };

    if response.status() != StatusCode::OK {
        tracing::debug!(
            "robots.txt at {} returned {}, allowing all",
            robots_url,
            response.status()
        );
        return ParsedRobots::allow_all();
    }

    match response.text().await {
        Ok(body) => ParsedRobots::from_content(&body),
        Err(e) => {
            tracing::warn!("Failed to read robots.txt at {} ({}), allowing all", robots_url, e);
            ParsedRobots::allow_all()
        }
    }
}
