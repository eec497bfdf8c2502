//! robots.txt handling during a batch

use crate::common::{default_extractor, fetch_config, html_page, page_urls};
use std::time::{Duration, Instant};
use sumi_scrape::Orchestrator;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn robots_config() -> sumi_scrape::config::FetchConfig {
    let mut config = fetch_config();
    config.respect_robots = true;
    config
}

#[tokio::test]
async fn test_robots_fetched_once_per_host() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("User-agent: *\nDisallow: /page/3\n")
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex("^/page/"))
        .respond_with(html_page("Page"))
        .mount(&server)
        .await;

    let urls = page_urls(&server.uri(), 5);
    let orchestrator = Orchestrator::new(&robots_config(), default_extractor()).unwrap();
    let results = orchestrator.run(&urls).await;

    let robots = orchestrator.robots().unwrap();
    assert_eq!(robots.fetch_count(), 1);
    assert_eq!(robots.cached_hosts().await, 1);

    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.ok, i != 3, "{}: {:?}", result.url, result.error);
    }
    server.verify().await;
}

#[tokio::test]
async fn test_disallowed_url_is_never_requested() {
    let server = MockServer::start().await;
    Mock::given(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "User-agent: *\nDisallow: /private\n",
        ))
        .mount(&server)
        .await;
    Mock::given(path("/private/data"))
        .respond_with(html_page("Secret"))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(path("/public"))
        .respond_with(html_page("Public"))
        .mount(&server)
        .await;

    let urls = vec![
        format!("{}/private/data", server.uri()),
        format!("{}/public", server.uri()),
    ];
    let orchestrator = Orchestrator::new(&robots_config(), default_extractor()).unwrap();
    let results = orchestrator.run(&urls).await;

    assert!(!results[0].ok);
    assert!(results[0]
        .error
        .as_deref()
        .unwrap()
        .starts_with("Disallowed by robots.txt"));
    assert!(results[1].ok);
    // The disallowed URL never took a gate slot
    assert_eq!(orchestrator.gate().peak(), 1);
    server.verify().await;
}

#[tokio::test]
async fn test_rules_for_our_agent_apply() {
    let server = MockServer::start().await;
    Mock::given(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "User-agent: OtherBot\nAllow: /\n\nUser-agent: TestBot\nDisallow: /\n",
        ))
        .mount(&server)
        .await;
    Mock::given(path_regex("^/page/"))
        .respond_with(html_page("Page"))
        .expect(0)
        .mount(&server)
        .await;

    let urls = page_urls(&server.uri(), 2);
    let results = Orchestrator::new(&robots_config(), default_extractor())
        .unwrap()
        .run(&urls)
        .await;

    assert!(results.iter().all(|r| !r.ok));
    server.verify().await;
}

#[tokio::test]
async fn test_robots_not_checked_when_disabled() {
    let server = MockServer::start().await;
    Mock::given(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /\n"))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(path_regex("^/page/"))
        .respond_with(html_page("Page"))
        .mount(&server)
        .await;

    let urls = page_urls(&server.uri(), 2);
    let orchestrator = Orchestrator::new(&fetch_config(), default_extractor()).unwrap();
    let results = orchestrator.run(&urls).await;

    assert!(orchestrator.robots().is_none());
    assert!(results.iter().all(|r| r.ok));
    server.verify().await;
}

async fn assert_robots_failure_allows(robots_response: ResponseTemplate) {
    let server = MockServer::start().await;
    Mock::given(path("/robots.txt"))
        .respond_with(robots_response)
        .mount(&server)
        .await;
    Mock::given(path_regex("^/page/"))
        .respond_with(html_page("Page"))
        .mount(&server)
        .await;

    let mut config = robots_config();
    config.robots_timeout = 0.2;

    let urls = page_urls(&server.uri(), 3);
    let results = Orchestrator::new(&config, default_extractor())
        .unwrap()
        .run(&urls)
        .await;

    for result in &results {
        assert!(result.ok, "{}: {:?}", result.url, result.error);
    }
}

#[tokio::test]
async fn test_missing_robots_allows_all() {
    assert_robots_failure_allows(ResponseTemplate::new(404)).await;
}

#[tokio::test]
async fn test_robots_server_error_allows_all() {
    assert_robots_failure_allows(
        ResponseTemplate::new(500).set_body_string("User-agent: *\nDisallow: /\n"),
    )
    .await;
}

#[tokio::test]
async fn test_robots_timeout_allows_all() {
    assert_robots_failure_allows(
        ResponseTemplate::new(200)
            .set_body_string("User-agent: *\nDisallow: /\n")
            .set_delay(Duration::from_secs(2)),
    )
    .await;
}

#[tokio::test]
async fn test_hosts_resolve_robots_concurrently() {
    let robots_delay = Duration::from_millis(400);
    let mut servers = Vec::new();
    for _ in 0..2 {
        let server = MockServer::start().await;
        Mock::given(path("/robots.txt"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("User-agent: *\nAllow: /\n")
                    .set_delay(robots_delay),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(path_regex("^/page/"))
            .respond_with(html_page("Page"))
            .mount(&server)
            .await;
        servers.push(server);
    }

    let urls: Vec<String> = servers
        .iter()
        .flat_map(|server| page_urls(&server.uri(), 1))
        .collect();
    let orchestrator = Orchestrator::new(&robots_config(), default_extractor()).unwrap();

    let start = Instant::now();
    let results = orchestrator.run(&urls).await;
    let elapsed = start.elapsed();

    assert!(results.iter().all(|r| r.ok));
    assert_eq!(orchestrator.robots().unwrap().fetch_count(), 2);
    // One robots delay, not one per host
    assert!(elapsed < robots_delay * 2 - Duration::from_millis(100), "elapsed {:?}", elapsed);
    for server in &servers {
        server.verify().await;
    }
}
