//! Integration tests for the crawler
//!
//! These tests drive full crawls two ways: through `HttpFetcher` against
//! wiremock servers, and through an in-memory instrumented fetcher that
//! measures how many fetches run at once.

use async_trait::async_trait;
use ripple_crawl::config::{FetcherConfig, UserAgentConfig};
use ripple_crawl::crawler::{run_crawl, CrawlLimits, FetchError, Fetcher, HttpFetcher};
use ripple_crawl::output::write_csv_report;
use ripple_crawl::state::{CrawlSnapshot, PageEntry};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CRAWL_TIMEOUT: Duration = Duration::from_secs(20);

fn html_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_response(body))
        .mount(server)
        .await;
}

fn http_fetcher() -> HttpFetcher {
    HttpFetcher::from_config(&UserAgentConfig::default(), &FetcherConfig::default())
        .expect("Failed to build HTTP fetcher")
}

fn limits(seed: &str, max_concurrency: usize, max_pages: usize) -> CrawlLimits {
    CrawlLimits::new(
        Url::parse(seed).expect("Failed to parse seed"),
        max_concurrency,
        max_pages,
    )
}

async fn crawl_with<F: Fetcher>(fetcher: F, limits: CrawlLimits) -> CrawlSnapshot {
    tokio::time::timeout(CRAWL_TIMEOUT, run_crawl(fetcher, limits))
        .await
        .expect("crawl did not terminate")
}

/// Host and port of a mock server, as it appears in dedup keys
fn key_prefix(server: &MockServer) -> String {
    let url = Url::parse(&server.uri()).expect("Failed to parse server URI");
    format!(
        "{}:{}",
        url.host_str().expect("Failed to extract host"),
        url.port().expect("Mock server URI has a port")
    )
}

/// In-memory site that records fetch concurrency
struct InstrumentedSite {
    pages: HashMap<String, String>,
    failing: Vec<String>,
    delay: Duration,
    active: AtomicUsize,
    peak: AtomicUsize,
    fetched: Mutex<Vec<String>>,
}

impl InstrumentedSite {
    fn new(pages: HashMap<String, String>, delay: Duration) -> Self {
        Self {
            pages,
            failing: Vec::new(),
            delay,
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            fetched: Mutex::new(Vec::new()),
        }
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for InstrumentedSite {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now_active, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.fetched.lock().unwrap().push(url.to_string());
        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.failing.iter().any(|f| f == url) {
            return Err(FetchError::Network {
                url: url.to_string(),
                message: "connection refused".to_string(),
            });
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::HttpStatus {
                url: url.to_string(),
                status_code: 404,
            })
    }
}

/// Densely linked site of `n` pages with cycles back to the root and an
/// external link on every page
fn mesh_site(n: usize) -> HashMap<String, String> {
    (0..n)
        .map(|i| {
            let targets = [(i + 1) % n, (i * 7 + 3) % n, (i * 3) % n, 0];
            let mut body = format!("<html><body><h1>Page {}</h1><p>Body {}.</p>", i, i);
            for t in targets {
                body.push_str(&format!(r#"<a href="/p{}">p{}</a>"#, t, t));
            }
            body.push_str(r#"<a href="https://elsewhere.test/p1">away</a>"#);
            body.push_str(r#"<img src="/img/logo.png"></body></html>"#);
            (format!("https://site.test/p{}", i), body)
        })
        .collect()
}

#[tokio::test]
async fn test_full_crawl_self_loop_and_child() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/a",
        r#"<html><body><h1>Page A</h1><p>Alpha.</p><a href="/a">self</a><a href="/b">b</a></body></html>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/b",
        r#"<html><body><h1>Page B</h1><p>Beta.</p></body></html>"#,
    )
    .await;

    let seed = format!("{}/a", mock_server.uri());
    let snapshot = crawl_with(http_fetcher(), limits(&seed, 2, 10)).await;

    let prefix = key_prefix(&mock_server);
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.populated_count(), 2);

    let a = snapshot
        .get(&format!("{}/a", prefix))
        .and_then(PageEntry::record)
        .expect("page a should be recorded");
    assert_eq!(a.h1, "Page A");
    assert_eq!(a.first_paragraph, "Alpha.");
    assert_eq!(
        a.outgoing_links,
        vec![
            format!("{}/a", mock_server.uri()),
            format!("{}/b", mock_server.uri())
        ]
    );

    let b = snapshot
        .get(&format!("{}/b", prefix))
        .and_then(PageEntry::record)
        .expect("page b should be recorded");
    assert_eq!(b.h1, "Page B");
    assert!(b.outgoing_links.is_empty());
}

#[tokio::test]
async fn test_crawl_failures_stay_claimed_and_out_of_report() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<html><body><h1>Home</h1>
            <a href="/c">missing</a>
            <a href="/logo.png">image link</a>
            <a href="/d">fine</a>
        </body></html>"#,
    )
    .await;
    mount_page(&mock_server, "/d", "<html><body><h1>D</h1></body></html>").await;

    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 16], "image/png"))
        .mount(&mock_server)
        .await;

    let seed = format!("{}/", mock_server.uri());
    let snapshot = crawl_with(http_fetcher(), limits(&seed, 3, 10)).await;

    let prefix = key_prefix(&mock_server);
    assert_eq!(snapshot.len(), 4);
    assert_eq!(snapshot.populated_count(), 2);
    assert_eq!(
        snapshot.get(&format!("{}/c", prefix)),
        Some(&PageEntry::Claimed)
    );
    assert_eq!(
        snapshot.get(&format!("{}/logo.png", prefix)),
        Some(&PageEntry::Claimed)
    );

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let report_path = dir.path().join("report.csv");
    let rows = write_csv_report(&snapshot, &report_path).expect("Failed to write report");
    assert_eq!(rows, 2);

    let report = std::fs::read_to_string(&report_path).expect("Failed to read report");
    assert!(report.starts_with("page_url,h1,first_paragraph,outgoing_link_urls,image_urls"));
    assert!(report.contains(&format!("{}/d", mock_server.uri())));
    assert!(!report.contains(&format!("{}/c,", mock_server.uri())));
    assert_eq!(report.lines().count(), 3);
}

#[tokio::test]
async fn test_http_fetcher_sends_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("user-agent", "BootCrawler/1.0"))
        .respond_with(html_response("<h1>ok</h1>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let body = http_fetcher()
        .fetch(&format!("{}/ua", mock_server.uri()))
        .await
        .expect("fetch should succeed");
    assert_eq!(body, "<h1>ok</h1>");
}

#[tokio::test]
async fn test_http_fetcher_rejects_bad_responses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"{}".to_vec(), "application/json"))
        .mount(&mock_server)
        .await;

    let fetcher = http_fetcher();

    let gone = fetcher.fetch(&format!("{}/gone", mock_server.uri())).await;
    assert!(matches!(
        gone,
        Err(FetchError::HttpStatus {
            status_code: 410,
            ..
        })
    ));

    let json = fetcher.fetch(&format!("{}/data.json", mock_server.uri())).await;
    assert!(matches!(json, Err(FetchError::ContentMismatch { .. })));
}

#[tokio::test]
async fn test_http_fetcher_network_error() {
    // Nothing listens on port 9 of localhost in the test environment
    let fetcher = http_fetcher();
    let result = fetcher.fetch("http://127.0.0.1:9/").await;
    assert!(matches!(
        result,
        Err(FetchError::Network { .. }) | Err(FetchError::Timeout { .. })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_limit_is_respected() {
    let site = Arc::new(InstrumentedSite::new(
        mesh_site(40),
        Duration::from_millis(15),
    ));

    let snapshot = crawl_with(
        Arc::clone(&site),
        limits("https://site.test/p0", 3, 100),
    )
    .await;

    assert_eq!(snapshot.populated_count(), 40);
    assert!(site.peak() <= 3, "peak concurrency was {}", site.peak());
    assert!(site.peak() >= 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_each_page_fetched_once_under_cycles() {
    let site = Arc::new(InstrumentedSite::new(
        mesh_site(60),
        Duration::from_millis(1),
    ));

    let snapshot = crawl_with(
        Arc::clone(&site),
        limits("https://site.test/p0", 8, 1000),
    )
    .await;

    assert_eq!(snapshot.len(), 60);
    assert_eq!(snapshot.populated_count(), 60);

    let mut fetched = site.fetched();
    let total = fetched.len();
    fetched.sort();
    fetched.dedup();
    assert_eq!(total, fetched.len(), "a page was fetched more than once");
    assert_eq!(total, 60);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_page_cap_is_never_exceeded() {
    for max_pages in [1, 2, 7, 25] {
        let site = Arc::new(InstrumentedSite::new(
            mesh_site(80),
            Duration::from_millis(2),
        ));

        let snapshot = crawl_with(
            Arc::clone(&site),
            limits("https://site.test/p0", 6, max_pages),
        )
        .await;

        assert_eq!(snapshot.len(), max_pages);
        assert_eq!(snapshot.populated_count(), max_pages);
        assert_eq!(site.fetched().len(), max_pages);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_off_domain_pages_never_recorded() {
    let mut pages = mesh_site(10);
    pages.insert(
        "https://elsewhere.test/p1".to_string(),
        r#"<a href="https://site.test/p0">back</a>"#.to_string(),
    );
    let site = Arc::new(InstrumentedSite::new(pages, Duration::from_millis(1)));

    let snapshot = crawl_with(
        Arc::clone(&site),
        limits("https://site.test/p0", 4, 100),
    )
    .await;

    assert_eq!(snapshot.len(), 10);
    assert!(snapshot.iter().all(|(key, _)| key.starts_with("site.test/")));
    assert!(site
        .fetched()
        .iter()
        .all(|url| url.starts_with("https://site.test/")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_long_chain_terminates() {
    let n = 300;
    let pages: HashMap<String, String> = (0..n)
        .map(|i| {
            let body = if i + 1 < n {
                format!(r#"<a href="/c{}">next</a>"#, i + 1)
            } else {
                r#"<a href="/c0">back to start</a>"#.to_string()
            };
            (format!("https://chain.test/c{}", i), body)
        })
        .collect();
    let site = Arc::new(InstrumentedSite::new(pages, Duration::ZERO));

    let snapshot = crawl_with(
        Arc::clone(&site),
        limits("https://chain.test/c0", 2, 1000),
    )
    .await;

    assert_eq!(snapshot.populated_count(), n);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_network_failure_does_not_affect_siblings() {
    let mut site = InstrumentedSite::new(mesh_site(12), Duration::from_millis(1));
    site.failing.push("https://site.test/p1".to_string());
    let site = Arc::new(site);

    let snapshot = crawl_with(
        Arc::clone(&site),
        limits("https://site.test/p0", 4, 100),
    )
    .await;

    assert_eq!(snapshot.unpopulated_keys(), vec!["site.test/p1"]);
    assert!(snapshot.populated_count() >= 1);
    assert_eq!(
        snapshot.populated_count() + 1,
        snapshot.len(),
        "only the failing page should lack data"
    );
}
