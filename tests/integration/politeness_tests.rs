//! Request spacing and concurrency limits

use crate::common::{default_extractor, fetch_config, html_page, page_urls, Recorder};
use std::time::{Duration, Instant};
use sumi_scrape::Orchestrator;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Slack for the time between the client issuing a request and the server seeing it
const SLACK: Duration = Duration::from_millis(30);

async fn recording_server(recorder: &Recorder) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex("^/page/"))
        .respond_with(recorder.clone())
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_requests_spaced_by_delay() {
    let recorder = Recorder::new(html_page("Spaced"));
    let server = recording_server(&recorder).await;

    let mut config = fetch_config();
    config.delay = 0.2;
    config.concurrency = 10;

    let urls = page_urls(&server.uri(), 4);
    let results = Orchestrator::new(&config, default_extractor())
        .unwrap()
        .run(&urls)
        .await;

    assert!(results.iter().all(|r| r.ok));
    let gaps = recorder.gaps();
    assert_eq!(gaps.len(), 3);
    for gap in gaps {
        assert!(gap + SLACK >= Duration::from_millis(200), "gap {:?}", gap);
    }
}

#[tokio::test]
async fn test_zero_delay_does_not_space_requests() {
    let recorder = Recorder::new(html_page("Burst"));
    let server = recording_server(&recorder).await;

    let mut config = fetch_config();
    config.delay = 0.0;

    let start = Instant::now();
    let urls = page_urls(&server.uri(), 6);
    let results = Orchestrator::new(&config, default_extractor())
        .unwrap()
        .run(&urls)
        .await;

    assert!(results.iter().all(|r| r.ok));
    assert_eq!(recorder.times().len(), 6);
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_per_host_scopes_run_independently() {
    let first = Recorder::new(html_page("First"));
    let second = Recorder::new(html_page("Second"));
    let server_a = recording_server(&first).await;
    let server_b = recording_server(&second).await;

    let mut config = fetch_config();
    config.delay = 0.3;
    config.per_host = true;

    let mut urls = page_urls(&server_a.uri(), 3);
    urls.extend(page_urls(&server_b.uri(), 3));

    let start = Instant::now();
    let results = Orchestrator::new(&config, default_extractor())
        .unwrap()
        .run(&urls)
        .await;
    let elapsed = start.elapsed();

    assert!(results.iter().all(|r| r.ok));
    for gap in first.gaps().into_iter().chain(second.gaps()) {
        assert!(gap + SLACK >= Duration::from_millis(300), "gap {:?}", gap);
    }
    // Two hosts in parallel: about 2 delays, not 5
    assert!(elapsed < Duration::from_millis(1200), "elapsed {:?}", elapsed);
}

#[tokio::test]
async fn test_global_scope_spaces_across_hosts() {
    let recorder = Recorder::new(html_page("Shared"));
    let server_a = recording_server(&recorder).await;
    let server_b = recording_server(&recorder).await;

    let mut config = fetch_config();
    config.delay = 0.15;
    config.per_host = false;

    let mut urls = page_urls(&server_a.uri(), 2);
    urls.extend(page_urls(&server_b.uri(), 2));

    let results = Orchestrator::new(&config, default_extractor())
        .unwrap()
        .run(&urls)
        .await;

    assert!(results.iter().all(|r| r.ok));
    let gaps = recorder.gaps();
    assert_eq!(gaps.len(), 3);
    for gap in gaps {
        assert!(gap + SLACK >= Duration::from_millis(150), "gap {:?}", gap);
    }
}

#[tokio::test]
async fn test_concurrency_bound() {
    let recorder = Recorder::new(html_page("Slow").set_delay(Duration::from_millis(150)));
    let server = recording_server(&recorder).await;

    let mut config = fetch_config();
    config.concurrency = 2;

    let urls = page_urls(&server.uri(), 6);
    let orchestrator = Orchestrator::new(&config, default_extractor()).unwrap();

    let start = Instant::now();
    let results = orchestrator.run(&urls).await;

    assert!(results.iter().all(|r| r.ok));
    assert_eq!(orchestrator.gate().peak(), 2);
    assert_eq!(orchestrator.gate().in_flight(), 0);
    // Six responses of 150ms, two at a time
    assert!(start.elapsed() >= Duration::from_millis(450));
}

#[tokio::test]
async fn test_retries_keep_their_gate_slot() {
    let server = MockServer::start().await;
    let flaky = Recorder::new(ResponseTemplate::new(500));
    let steady = Recorder::new(html_page("Steady"));

    Mock::given(path("/flaky"))
        .respond_with(flaky.clone())
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(path("/flaky"))
        .respond_with(flaky.with_template(html_page("Flaky")))
        .mount(&server)
        .await;
    Mock::given(path("/steady"))
        .respond_with(steady.clone())
        .mount(&server)
        .await;

    let mut config = fetch_config();
    config.concurrency = 1;
    config.retries = 3;
    config.backoff_base = 0.1;

    let urls = vec![
        format!("{}/flaky", server.uri()),
        format!("{}/steady", server.uri()),
    ];
    let orchestrator = Orchestrator::new(&config, default_extractor()).unwrap();
    let results = orchestrator.run(&urls).await;

    assert!(results.iter().all(|r| r.ok), "{:?}", results);
    assert_eq!(orchestrator.gate().peak(), 1);

    let flaky_times = flaky.times();
    let steady_times = steady.times();
    assert_eq!(flaky_times.len(), 3);
    assert_eq!(steady_times.len(), 1);
    // The second URL only gets the slot once the first URL's last attempt is done
    assert!(steady_times[0] >= flaky_times[2]);
}
