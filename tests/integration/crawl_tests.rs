//! Integration tests for the crawler
//!
//! Full runs use an in-memory page renderer so the crawl graph, failures and
//! timing are controlled by the test. The HTTP collaborators (discovery, link
//! extraction, WebDriver capture) run against wiremock servers.

use async_trait::async_trait;
use base64::Engine;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use sumi_frame::config::{Config, RendererConfig};
use sumi_frame::crawler::{build_http_client, CaptureResponse, Coordinator, PageRenderer, WebDriverRenderer};
use sumi_frame::discovery::{DiscoveryOptions, DiscoveryProvider, HttpDiscovery};
use sumi_frame::report::{merge, Report};
use sumi_frame::state::CaptureOutcome;
use sumi_frame::storage::{JsonReportStore, ReportStore};
use sumi_frame::url::derive_filename;
use sumi_frame::FrameError;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SITE: &str = "https://example.com";

/// In-memory renderer serving a fixed link graph
#[derive(Default)]
struct MockRenderer {
    links: HashMap<String, Vec<String>>,
    failures: HashMap<String, String>,
    latency: Duration,
    reachable: bool,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    /// Raises the flag when this page starts capturing
    interrupt: Mutex<Option<(String, Arc<AtomicBool>)>>,
}

impl MockRenderer {
    fn new() -> Self {
        Self {
            reachable: true,
            ..Self::default()
        }
    }

    fn link(mut self, from: &str, to: &[&str]) -> Self {
        self.links.insert(
            format!("{}{}", SITE, from),
            to.iter().map(|l| l.to_string()).collect(),
        );
        self
    }

    fn fail(mut self, page: &str, error: &str) -> Self {
        self.failures
            .insert(format!("{}{}", SITE, page), error.to_string());
        self
    }

    fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn interrupt_at(&self, page: &str, flag: Arc<AtomicBool>) {
        *self.interrupt.lock().unwrap() = Some((format!("{}{}", SITE, page), flag));
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageRenderer for MockRenderer {
    async fn capture(&self, url: &str) -> CaptureResponse {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some((page, flag)) = self.interrupt.lock().unwrap().as_ref() {
            if page == url {
                flag.store(true, Ordering::SeqCst);
            }
        }
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.failures.get(url) {
            Some(error) => CaptureResponse::failed(derive_filename(url), error.clone(), 10),
            None => CaptureResponse::succeeded(derive_filename(url), 2048, 10),
        }
    }

    async fn extract_links(&self, url: &str) -> sumi_frame::Result<Vec<String>> {
        Ok(self.links.get(url).cloned().unwrap_or_default())
    }

    async fn test_connection(&self, url: &str) -> sumi_frame::Result<()> {
        if self.reachable {
            Ok(())
        } else {
            Err(FrameError::Unreachable {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            })
        }
    }
}

/// Discovery returning a fixed list
struct StaticDiscovery(Vec<String>);

#[async_trait]
impl DiscoveryProvider for StaticDiscovery {
    async fn discover(&self, _base: &Url, _options: DiscoveryOptions) -> Vec<String> {
        self.0.clone()
    }
}

/// Creates a test configuration writing into `dir`
fn create_test_config(dir: &TempDir, concurrency: u32, max_depth: u32) -> Config {
    let mut config = Config::for_target(SITE);
    config.crawler.concurrency = concurrency;
    config.crawler.max_depth = max_depth;
    config.crawler.request_delay = 0;
    config.discovery.sitemap = false;
    config.discovery.robots = false;
    config.output.directory = dir.path().to_path_buf();
    config
}

async fn run(config: Config, renderer: Arc<MockRenderer>) -> sumi_frame::Result<Report> {
    run_with_discovery(config, renderer, Vec::new()).await
}

async fn run_with_discovery(
    mut config: Config,
    renderer: Arc<MockRenderer>,
    discovered: Vec<String>,
) -> sumi_frame::Result<Report> {
    config.discovery.sitemap = !discovered.is_empty();
    Coordinator::with_collaborators(config, renderer, Arc::new(StaticDiscovery(discovered)))
        .run()
        .await
}

fn three_page_site() -> MockRenderer {
    MockRenderer::new().link("/", &["/about", "/contact"])
}

#[tokio::test]
async fn test_fresh_crawl_of_three_page_site() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(three_page_site());

    let report = run(create_test_config(&dir, 1, 5), renderer.clone()).await.unwrap();

    assert_eq!(report.total_pages, 3);
    assert_eq!(report.successful_screenshots, 3);
    assert_eq!(report.failed_screenshots, 0);
    assert_eq!(report.new_pages_in_this_run, 3);
    assert_eq!(report.average_page_size, 2048);
    assert!(report.last_update.is_some());
    assert_eq!(
        renderer.calls(),
        vec![
            "https://example.com/",
            "https://example.com/about",
            "https://example.com/contact",
        ]
    );

    let store = JsonReportStore::new(dir.path(), "report.json", "summary.txt");
    assert_eq!(store.load().unwrap(), Some(report));
    let summary = std::fs::read_to_string(store.summary_path()).unwrap();
    assert!(summary.contains("> New in this run: 3"));
}

#[tokio::test]
async fn test_rerun_without_new_pages() {
    let dir = TempDir::new().unwrap();

    let first = run(create_test_config(&dir, 1, 5), Arc::new(three_page_site()))
        .await
        .unwrap();

    let renderer = Arc::new(three_page_site());
    let second = run(create_test_config(&dir, 1, 5), renderer.clone()).await.unwrap();

    assert!(renderer.calls().is_empty());
    assert_eq!(second.new_pages_in_this_run, 0);
    assert_eq!(second.total_pages, first.total_pages);
    assert_eq!(second.successful_screenshots, first.successful_screenshots);
    assert_eq!(second.failed_screenshots, first.failed_screenshots);
    assert_eq!(second.total_duration, first.total_duration);
    assert_eq!(second.average_page_size, first.average_page_size);
    assert!(second.last_update.is_none());
}

#[tokio::test]
async fn test_rerun_captures_only_new_discovered_pages() {
    let dir = TempDir::new().unwrap();
    run(create_test_config(&dir, 1, 5), Arc::new(three_page_site()))
        .await
        .unwrap();

    let renderer = Arc::new(three_page_site());
    let report = run_with_discovery(
        create_test_config(&dir, 1, 5),
        renderer.clone(),
        vec![
            "https://example.com/about".to_string(),
            "https://example.com/pricing".to_string(),
        ],
    )
    .await
    .unwrap();

    assert_eq!(renderer.calls(), vec!["https://example.com/pricing"]);
    assert_eq!(report.new_pages_in_this_run, 1);
    assert_eq!(report.total_pages, 4);
}

#[tokio::test]
async fn test_failed_capture_is_recorded_and_not_followed() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(
        MockRenderer::new()
            .link("/", &["/slow", "/fast"])
            .link("/slow", &["/behind-slow"])
            .fail("/slow", "timeout"),
    );

    let report = run(create_test_config(&dir, 1, 5), renderer.clone()).await.unwrap();

    let failed: Vec<&CaptureOutcome> = report.failures().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].url, "https://example.com/slow");
    assert_eq!(failed[0].error.as_deref(), Some("timeout"));
    assert!(!renderer
        .calls()
        .contains(&"https://example.com/behind-slow".to_string()));
    assert_eq!(report.total_pages, 3);
    assert_eq!(report.successful_screenshots, 2);

    let summary = std::fs::read_to_string(dir.path().join("summary.txt")).unwrap();
    assert!(summary.contains("timeout"));
}

#[tokio::test]
async fn test_skip_pattern_never_reaches_renderer() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(MockRenderer::new().link("/", &["/wp-admin/login", "/blog"]));

    let report = run(create_test_config(&dir, 1, 5), renderer.clone()).await.unwrap();

    assert_eq!(
        renderer.calls(),
        vec!["https://example.com/", "https://example.com/blog"]
    );
    assert!(report.results.iter().all(|r| !r.url.contains("wp-admin")));
}

#[tokio::test]
async fn test_skip_pattern_applies_to_discovered_urls() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(MockRenderer::new());

    run_with_discovery(
        create_test_config(&dir, 1, 5),
        renderer.clone(),
        vec!["https://example.com/WP-ADMIN/options".to_string()],
    )
    .await
    .unwrap();

    assert_eq!(renderer.calls(), vec!["https://example.com/"]);
}

#[tokio::test]
async fn test_max_depth_is_respected() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(
        MockRenderer::new()
            .link("/", &["/d1"])
            .link("/d1", &["/d2"])
            .link("/d2", &["/d3"])
            .link("/d3", &["/d4"]),
    );

    let report = run(create_test_config(&dir, 1, 2), renderer.clone()).await.unwrap();

    assert_eq!(
        renderer.calls(),
        vec![
            "https://example.com/",
            "https://example.com/d1",
            "https://example.com/d2",
        ]
    );
    assert_eq!(report.total_pages, 3);
}

#[tokio::test]
async fn test_equivalent_urls_dispatched_once() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(
        MockRenderer::new()
            .link("/", &["/page", "/page/", "/page#top", "/page?ref=nav", "/other"])
            .link("/page", &["/", "/other/", "https://example.com/page"])
            .link("/other", &["/page", "/"]),
    );

    let report = run(create_test_config(&dir, 4, 5), renderer.clone()).await.unwrap();

    let calls = renderer.calls();
    let unique: HashSet<&String> = calls.iter().collect();
    assert_eq!(unique.len(), calls.len());
    assert_eq!(calls.len(), 3);
    assert_eq!(report.total_pages, calls.len());
}

#[tokio::test]
async fn test_parallel_mode_bounds_in_flight_captures() {
    for concurrency in [2u32, 3, 5] {
        let dir = TempDir::new().unwrap();
        let children: Vec<String> = (0..20).map(|i| format!("/item-{}", i)).collect();
        let child_refs: Vec<&str> = children.iter().map(|c| c.as_str()).collect();
        let renderer = Arc::new(
            MockRenderer::new()
                .link("/", &child_refs)
                .with_latency(Duration::from_millis(20)),
        );

        let report = run(create_test_config(&dir, concurrency, 5), renderer.clone())
            .await
            .unwrap();

        assert_eq!(report.total_pages, 21);
        assert_eq!(renderer.calls().len(), 21);
        assert!(
            renderer.peak() <= concurrency as usize,
            "peak {} exceeded {}",
            renderer.peak(),
            concurrency
        );
        assert!(renderer.peak() >= 2);
    }
}

#[tokio::test]
async fn test_parallel_mode_follows_links_found_late() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(
        MockRenderer::new()
            .link("/", &["/a"])
            .link("/a", &["/b"])
            .link("/b", &["/c"])
            .with_latency(Duration::from_millis(5)),
    );

    let report = run(create_test_config(&dir, 3, 5), renderer.clone()).await.unwrap();

    assert_eq!(report.total_pages, 4);
    assert_eq!(report.successful_screenshots, 4);
}

#[tokio::test]
async fn test_interrupted_crawl_saves_partial_report() {
    let dir = TempDir::new().unwrap();
    let children: Vec<String> = (0..20).map(|i| format!("/item-{}", i)).collect();
    let child_refs: Vec<&str> = children.iter().map(|c| c.as_str()).collect();
    let renderer = Arc::new(
        MockRenderer::new()
            .link("/", &child_refs)
            .with_latency(Duration::from_millis(20)),
    );

    let coordinator = Coordinator::with_collaborators(
        create_test_config(&dir, 3, 5),
        renderer.clone(),
        Arc::new(StaticDiscovery(Vec::new())),
    );
    renderer.interrupt_at("/item-2", coordinator.shutdown_handle());

    let report = coordinator.run().await.unwrap();
    let calls = renderer.calls();

    assert!(calls.len() < 21, "crawl was not interrupted: {} captures", calls.len());
    assert_eq!(report.total_pages, calls.len());
    assert_eq!(report.new_pages_in_this_run, calls.len());

    let saved = coordinator.store().load().unwrap().unwrap();
    assert_eq!(saved, report);
    assert!(saved.results.iter().any(|r| r.url == "https://example.com/item-2"));
    assert!(coordinator.store().summary_path().exists());
}

#[tokio::test]
async fn test_unreachable_renderer_is_fatal() {
    let dir = TempDir::new().unwrap();
    let renderer = Arc::new(MockRenderer {
        reachable: false,
        ..MockRenderer::new()
    });

    let result = run(create_test_config(&dir, 1, 5), renderer.clone()).await;

    assert!(matches!(result, Err(FrameError::Unreachable { .. })));
    assert!(renderer.calls().is_empty());
    assert!(!dir.path().join("report.json").exists());
}

#[tokio::test]
async fn test_corrupt_report_is_not_overwritten() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("report.json"), "{ not json").unwrap();
    let renderer = Arc::new(three_page_site());

    let result = run(create_test_config(&dir, 1, 5), renderer.clone()).await;

    assert!(matches!(result, Err(FrameError::Storage(_))));
    assert!(renderer.calls().is_empty());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("report.json")).unwrap(),
        "{ not json"
    );
}

#[test]
fn test_merge_is_appendable() {
    let run_a = vec![
        CaptureOutcome::succeeded("https://example.com/", "homepage.png", 1000, 100),
        CaptureOutcome::failed("https://example.com/x", "x.png", "timeout", 300),
    ];
    let run_b = vec![
        CaptureOutcome::succeeded("https://example.com/y", "y.png", 3000, 200),
        CaptureOutcome::succeeded("https://example.com/z", "z.png", 2000, 50),
    ];

    let stepwise = merge(SITE, Some(merge(SITE, None, run_a.clone())), run_b.clone());
    let combined = merge(SITE, None, run_a.into_iter().chain(run_b).collect());

    assert_eq!(stepwise.total_pages, combined.total_pages);
    assert_eq!(stepwise.successful_screenshots, combined.successful_screenshots);
    assert_eq!(stepwise.failed_screenshots, combined.failed_screenshots);
    assert_eq!(stepwise.total_duration, combined.total_duration);
    assert_eq!(stepwise.average_page_size, combined.average_page_size);
    assert_eq!(stepwise.average_page_size, 2000);
}

// Discovery over HTTP

fn test_discovery() -> HttpDiscovery {
    HttpDiscovery::with_client(build_http_client("TestAgent/1.0", Duration::from_secs(5)).unwrap())
}

fn urlset(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<url><loc>{}</loc></url>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

#[tokio::test]
async fn test_sitemap_discovery() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&[
            format!("{}/", base),
            format!("{}/about/", base),
            format!("{}/about?utm=1", base),
            "https://elsewhere.org/page".to_string(),
            format!("{}/brochure.pdf", base),
        ])))
        .mount(&mock_server)
        .await;

    let urls = test_discovery()
        .discover(
            &Url::parse(&base).unwrap(),
            DiscoveryOptions {
                sitemap: true,
                robots: false,
            },
        )
        .await;

    assert_eq!(urls, vec![format!("{}/", base), format!("{}/about", base)]);
}

#[tokio::test]
async fn test_robots_sitemap_reference_and_index() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "User-agent: *\nDisallow: /private\nSitemap: {}/sitemap-index.xml\n",
            base
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap-index.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<?xml version="1.0"?><sitemapindex><sitemap><loc>{0}/posts.xml</loc></sitemap><sitemap><loc>{0}/missing.xml</loc></sitemap></sitemapindex>"#,
            base
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/posts.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&[
            format!("{}/posts/first", base),
            format!("{}/posts/second", base),
        ])))
        .mount(&mock_server)
        .await;

    let urls = test_discovery()
        .discover(
            &Url::parse(&base).unwrap(),
            DiscoveryOptions {
                sitemap: false,
                robots: true,
            },
        )
        .await;

    assert_eq!(
        urls,
        vec![
            format!("{}/posts/first", base),
            format!("{}/posts/second", base),
        ]
    );
}

#[tokio::test]
async fn test_discovery_failures_degrade_to_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not a sitemap</html>"))
        .mount(&mock_server)
        .await;

    let urls = test_discovery()
        .discover(
            &Url::parse(&mock_server.uri()).unwrap(),
            DiscoveryOptions {
                sitemap: true,
                robots: true,
            },
        )
        .await;

    assert!(urls.is_empty());
}

// WebDriver renderer

fn test_renderer(webdriver_url: &str, output: &TempDir, page_timeout: u64) -> WebDriverRenderer {
    let config = RendererConfig {
        webdriver_url: webdriver_url.to_string(),
        settle_delay: 0,
        page_timeout,
        ..RendererConfig::default()
    };
    WebDriverRenderer::new(&config, output.path()).unwrap()
}

async fn mount_webdriver_session(server: &MockServer, screenshot: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": { "sessionId": "s1", "capabilities": {} }
        })))
        .mount(server)
        .await;

    for endpoint in ["/session/s1/window/rect", "/session/s1/url"] {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "value": null })))
            .mount(server)
            .await;
    }

    Mock::given(method("POST"))
        .and(path("/session/s1/goog/cdp/execute"))
        .and(body_partial_json(serde_json::json!({ "cmd": "Page.getLayoutMetrics" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": {
                "cssLayoutViewport": { "clientWidth": 1920, "clientHeight": 1080 },
                "cssContentSize": { "x": 0, "y": 0, "width": 1920, "height": 4200.5 }
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/session/s1/goog/cdp/execute"))
        .and(body_partial_json(serde_json::json!({ "cmd": "Page.captureScreenshot" })))
        .respond_with(screenshot)
        .mount(server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/session/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "value": null })))
        .expect(1)
        .mount(server)
        .await;
}

fn screenshot_data(png: &[u8]) -> ResponseTemplate {
    let encoded = base64::engine::general_purpose::STANDARD.encode(png);
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "value": { "data": encoded } }))
}

#[tokio::test]
async fn test_webdriver_capture_writes_file() {
    let driver = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let png = b"\x89PNG fake image";

    mount_webdriver_session(&driver, screenshot_data(png)).await;

    let renderer = test_renderer(&driver.uri(), &dir, 5_000);
    let response = renderer.capture("https://example.com/about/team").await;

    assert!(response.success, "capture failed: {:?}", response.error);
    assert_eq!(response.filename, "about_team.png");
    assert_eq!(response.byte_size, png.len() as u64);
    assert_eq!(std::fs::read(dir.path().join("about_team.png")).unwrap(), png);
    driver.verify().await;
}

#[tokio::test]
async fn test_webdriver_capture_covers_full_page() {
    let driver = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // Only a request asking for the whole document gets image data back
    Mock::given(method("POST"))
        .and(path("/session/s1/goog/cdp/execute"))
        .and(body_partial_json(serde_json::json!({
            "cmd": "Page.captureScreenshot",
            "params": {
                "format": "png",
                "captureBeyondViewport": true,
                "clip": { "x": 0, "y": 0, "width": 1920, "height": 4201, "scale": 1 }
            }
        })))
        .respond_with(screenshot_data(b"\x89PNG tall page"))
        .expect(1)
        .mount(&driver)
        .await;

    mount_webdriver_session(
        &driver,
        ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "value": { "error": "unknown error", "message": "viewport only" }
        })),
    )
    .await;

    let renderer = test_renderer(&driver.uri(), &dir, 5_000);
    let response = renderer.capture("https://example.com/long-read").await;

    assert!(response.success, "capture failed: {:?}", response.error);
    assert_eq!(
        std::fs::read(dir.path().join("long-read.png")).unwrap(),
        b"\x89PNG tall page"
    );
    driver.verify().await;
}

#[tokio::test]
async fn test_webdriver_capture_timeout() {
    let driver = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_webdriver_session(
        &driver,
        screenshot_data(b"late").set_delay(Duration::from_millis(1_500)),
    )
    .await;

    let renderer = test_renderer(&driver.uri(), &dir, 300);
    let response = renderer.capture("https://example.com/slow").await;

    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("timeout"));
    assert!(!dir.path().join("slow.png").exists());
    driver.verify().await;
}

#[tokio::test]
async fn test_webdriver_session_opened_after_timeout_is_closed() {
    let driver = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "value": { "sessionId": "late", "capabilities": {} }
                }))
                .set_delay(Duration::from_millis(600)),
        )
        .mount(&driver)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/session/late"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "value": null })))
        .expect(1)
        .mount(&driver)
        .await;

    let renderer = test_renderer(&driver.uri(), &dir, 200);
    let response = renderer.capture("https://example.com/slow-start").await;

    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("timeout"));

    tokio::time::sleep(Duration::from_millis(1_000)).await;
    driver.verify().await;
}

#[tokio::test]
async fn test_webdriver_error_payload_fails_capture() {
    let driver = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "value": { "error": "session not created", "message": "Chrome failed to start" }
        })))
        .mount(&driver)
        .await;

    let renderer = test_renderer(&driver.uri(), &dir, 5_000);
    let response = renderer.capture("https://example.com/").await;

    assert!(!response.success);
    assert!(response.error.unwrap().contains("session not created"));
    assert_eq!(response.filename, "homepage.png");
}

#[tokio::test]
async fn test_webdriver_extract_links() {
    let site = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let base = site.uri();

    Mock::given(method("GET"))
        .and(path("/blog"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r##"<html><head><link rel="canonical" href="/blog"></head><body>
            <a href="/blog/post-1">One</a>
            <a href="post-2">Two</a>
            <a href="/blog/post-1/">One again</a>
            <a href="#comments">Comments</a>
            <a href="mailto:hi@example.com">Mail</a>
            <a href="/files/guide.zip" download>Guide</a>
            </body></html>"##,
            "text/html; charset=utf-8",
        ))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<rss/>", "application/rss+xml"))
        .mount(&site)
        .await;

    let renderer = test_renderer("http://127.0.0.1:9515", &dir, 5_000);

    let links = renderer
        .extract_links(&format!("{}/blog", base))
        .await
        .unwrap();
    assert_eq!(
        links,
        vec![
            format!("{}/blog/post-1", base),
            format!("{}/post-2", base),
            format!("{}/blog", base),
        ]
    );

    let result = renderer.extract_links(&format!("{}/feed", base)).await;
    assert!(matches!(result, Err(FrameError::ContentMismatch { .. })));
}

#[tokio::test]
async fn test_webdriver_connection_test() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": { "ready": true, "message": "ready" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let renderer = test_renderer(&server.uri(), &dir, 5_000);
    assert!(renderer.test_connection(&format!("{}/", server.uri())).await.is_ok());

    let missing = renderer
        .test_connection(&format!("{}/missing", server.uri()))
        .await;
    assert!(matches!(missing, Err(FrameError::Unreachable { .. })));
}

#[tokio::test]
async fn test_webdriver_not_ready_is_unreachable() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": { "ready": false, "message": "busy" }
        })))
        .mount(&server)
        .await;

    let renderer = test_renderer(&server.uri(), &dir, 5_000);
    let result = renderer.test_connection(&server.uri()).await;

    assert!(matches!(result, Err(FrameError::Unreachable { .. })));
}
