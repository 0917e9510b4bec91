//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::io::Write;
use sumi_crawl::config::{load_config, Config, CrawlerConfig, FetcherConfig};
use sumi_crawl::crawler::{build_http_client, crawl, fetch_url, FetchResult};
use sumi_crawl::robots::{HttpRobotsSource, RobotsSource};
use sumi_crawl::{CrawlOrchestrator, StopReason};
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling the given seeds with no pacing delay
fn create_test_config(seeds: Vec<String>, max_depth: u32) -> Config {
    Config {
        crawler: CrawlerConfig {
            seeds,
            max_depth,
            min_delay: 0.0,
            max_pages: 100,
            timeout: 30.0,
            respect_crawl_delay: false,
        },
        fetcher: FetcherConfig {
            user_agent: "TestBot".to_string(),
            request_timeout: 5.0,
            robots_scheme: "http".to_string(),
        },
    }
}

fn html_page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, body
        ),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, page_path: &str, title: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_page(title, body))
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"<a href="/page1">Page 1</a><a href="/page2">Page 2</a><p>Welcome</p>"#,
    )
    .await;
    mount_page(&mock_server, "/page1", "Page 1", "<article>First article</article>").await;
    mount_page(&mock_server, "/page2", "Page 2", "<main>Second main</main>").await;

    let config = create_test_config(vec![format!("{}/", base_url)], 2);
    let report = crawl(config).await.expect("Crawl failed");

    let urls: Vec<&str> = report.records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/", base_url),
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
        ]
    );

    let titles: Vec<&str> = report.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Home", "Page 1", "Page 2"]);
    assert_eq!(report.records[0].content, "Welcome");
    assert_eq!(report.records[1].content, "First article");
    assert_eq!(report.records[2].content, "Second main");

    assert_eq!(report.stats.stop_reason, StopReason::FrontierExhausted);
    assert_eq!(report.stats.domains_contacted, 1);
}

#[tokio::test]
async fn test_robots_txt_respect() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // robots.txt must be requested exactly once for the whole crawl
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /admin"))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"<a href="/allowed">Allowed</a><a href="/admin">Admin</a>"#,
    )
    .await;
    mount_page(&mock_server, "/allowed", "Allowed", r#"<a href="/admin">Admin again</a>"#).await;

    // Should never be called
    Mock::given(method("GET"))
        .and(path("/admin"))
        .respond_with(html_page("Admin", "secret"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/", base_url)], 3);
    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.records.len(), 2);
    assert!(report.records.iter().all(|r| r.title != "Admin"));
    assert_eq!(report.stats.pages_disallowed, 1);
}

#[tokio::test]
async fn test_robots_agent_specific_group() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(
        &mock_server,
        "User-agent: TestBot\nDisallow: /\n\nUser-agent: *\nAllow: /",
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Home", ""))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/", base_url)], 2);
    let report = crawl(config).await.expect("Crawl failed");

    assert!(report.is_empty());
    assert_eq!(report.stats.pages_disallowed, 1);
}

#[tokio::test]
async fn test_missing_robots_allows_all() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // No robots.txt mock: wiremock answers 404
    mount_page(&mock_server, "/", "Home", r#"<a href="/admin">Admin</a>"#).await;
    mount_page(&mock_server, "/admin", "Admin", "<p>open</p>").await;

    let config = create_test_config(vec![format!("{}/", base_url)], 2);
    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[1].content, "open");
}

#[tokio::test]
async fn test_forbidden_robots_allows_all() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/", "Home", "<p>open</p>").await;

    let config = create_test_config(vec![format!("{}/", base_url)], 0);
    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.stats.pages_disallowed, 0);
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    // Create a chain: / -> level1 -> level2 -> level3
    mount_page(&mock_server, "/", "Root", r#"<a href="/level1">Level 1</a>"#).await;
    mount_page(&mock_server, "/level1", "Level 1", r#"<a href="/level2">Level 2</a>"#).await;
    mount_page(&mock_server, "/level2", "Level 2", r#"<a href="/level3">Level 3</a>"#).await;

    // Should never be called with max_depth=2
    Mock::given(method("GET"))
        .and(path("/level3"))
        .respond_with(html_page("Level 3", ""))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/", base_url)], 2);
    let report = crawl(config).await.expect("Crawl failed");

    let titles: Vec<&str> = report.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Root", "Level 1", "Level 2"]);
}

#[tokio::test]
async fn test_failed_and_non_html_pages_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"<a href="/missing">Missing</a><a href="/data.json">Data</a><a href="/broken">Broken</a><a href="/ok">Ok</a>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/ok", "Ok", "<p>fine</p>").await;

    let config = create_test_config(vec![format!("{}/", base_url)], 1);
    let report = crawl(config).await.expect("Crawl failed");

    let titles: Vec<&str> = report.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Home", "Ok"]);
    assert_eq!(report.stats.fetch_failures, 3);
    assert_eq!(report.stats.pages_attempted, 5);
}

#[tokio::test]
async fn test_max_pages_limit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"<a href="/a">A</a><a href="/b">B</a><a href="/c">C</a>"#,
    )
    .await;
    mount_page(&mock_server, "/a", "A", "").await;
    mount_page(&mock_server, "/b", "B", "").await;

    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(html_page("C", ""))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(vec![format!("{}/", base_url)], 2);
    config.crawler.max_pages = 3;
    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.stats.stop_reason, StopReason::PageLimit);
    assert_eq!(report.stats.pending_at_stop, 1);
}

#[tokio::test]
async fn test_same_domain_requests_are_paced() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", "Home", r#"<a href="/next">Next</a>"#).await;
    mount_page(&mock_server, "/next", "Next", "").await;

    let mut config = create_test_config(vec![format!("{}/", base_url)], 1);
    config.crawler.min_delay = 0.3;

    let started = std::time::Instant::now();
    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.records.len(), 2);
    assert!(started.elapsed() >= std::time::Duration::from_millis(300));
}

#[tokio::test]
async fn test_interrupt_before_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Home", ""))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/", base_url)], 1);
    let mut orchestrator = CrawlOrchestrator::from_config(&config).expect("Failed to create orchestrator");
    orchestrator
        .interrupt_handle()
        .store(true, std::sync::atomic::Ordering::SeqCst);

    let report = orchestrator.run().await.expect("Crawl failed");
    assert!(report.is_empty());
    assert_eq!(report.stats.stop_reason, StopReason::Interrupted);
}

#[tokio::test]
async fn test_crawl_from_config_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/start", "Start", "<p>from file</p>").await;

    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[crawler]
seeds = ["{}/start"]
max-depth = 0
min-delay = 0.0

[fetcher]
user-agent = "FileBot"
robots-scheme = "http"
"#,
        base_url
    )
    .unwrap();

    let config = load_config(file.path()).expect("Failed to load config");
    assert_eq!(config.fetcher.user_agent, "FileBot");

    let report = crawl(config).await.expect("Crawl failed");
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].content, "from file");
}

#[tokio::test]
async fn test_fetch_url_classification() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/page", "Page", "").await;
    Mock::given(method("GET"))
        .and(path("/image.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8, 1, 2], "image/png"))
        .mount(&mock_server)
        .await;

    let client = build_http_client(&create_test_config(vec![], 0).fetcher).unwrap();

    match fetch_url(&client, &format!("{}/page", base_url)).await {
        FetchResult::Success { status_code, body, .. } => {
            assert_eq!(status_code, 200);
            assert!(body.contains("<title>Page</title>"));
        }
        other => panic!("Expected success, got {:?}", other),
    }

    assert!(matches!(
        fetch_url(&client, &format!("{}/image.png", base_url)).await,
        FetchResult::ContentMismatch { .. }
    ));
    assert!(matches!(
        fetch_url(&client, &format!("{}/nope", base_url)).await,
        FetchResult::HttpError { status_code: 404 }
    ));
    assert!(matches!(
        fetch_url(&client, "http://127.0.0.1:9/").await,
        FetchResult::NetworkError { .. }
    ));
}

#[tokio::test]
async fn test_http_robots_source() {
    let mock_server = MockServer::start().await;
    let domain = mock_server.address().to_string();

    mount_robots(&mock_server, "User-agent: *\nDisallow: /x").await;

    let client = build_http_client(&create_test_config(vec![], 0).fetcher).unwrap();
    let source = HttpRobotsSource::new(client).with_scheme("http");

    assert_eq!(
        source.fetch_robots(&domain).await.as_deref(),
        Some("User-agent: *\nDisallow: /x")
    );
    assert_eq!(source.fetch_robots("127.0.0.1:9").await, None);
}
