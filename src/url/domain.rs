use url::Url;

/// Returns the host key of a URL: the lowercase host plus any explicit port
///
/// Two URLs share a host key exactly when they address the same server, so
/// robots.txt rules and per-host request spacing are keyed by it. Default
/// ports are dropped by the URL parser and never appear in the key.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_scrape::url::host_key;
///
/// let url = Url::parse("http://127.0.0.1:8080/page").unwrap();
/// assert_eq!(host_key(&url), Some("127.0.0.1:8080".to_string()));
///
/// let url = Url::parse("https://Example.com:443/").unwrap();
/// assert_eq!(host_key(&url), Some("example.com".to_string()));
/// ```
pub fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}
