//! URL handling module for Sumi-Scrape
//!
//! This module validates target URLs, derives host keys, and loads URL lists
//! from files.

mod domain;

use crate::{UrlError, UrlResult};
use std::path::Path;
use url::Url;

// Re-export main functions
pub use domain::host_key;

/// Parses a target URL and checks that it can be fetched
///
/// Only absolute `http` and `https` URLs with a host are accepted.
///
/// # Examples
///
/// ```
/// use sumi_scrape::url::parse_target_url;
///
/// assert!(parse_target_url("https://example.com/page").is_ok());
/// assert!(parse_target_url("ftp://example.com/file").is_err());
/// assert!(parse_target_url("/relative").is_err());
/// ```
pub fn parse_target_url(raw: &str) -> UrlResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::InvalidScheme(other.to_string())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Returns the robots.txt location for the server hosting `url`
///
/// The scheme, host and port of the target are kept, so plain-HTTP targets
/// look for their robots.txt over plain HTTP.
pub fn robots_url(url: &Url) -> Url {
    let mut robots = url.clone();
    robots.set_path("/robots.txt");
    robots.set_query(None);
    robots.set_fragment(None);
    // Credentials are not forwarded to robots.txt
    let _ = robots.set_username("");
    let _ = robots.set_password(None);
    robots
}

/// Parses a URL list: one URL per line, blank lines and `#` comments skipped
pub fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Reads a URL list file (see [`parse_url_list`])
pub fn read_url_list(path: &Path) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_url_list(&content))
}
