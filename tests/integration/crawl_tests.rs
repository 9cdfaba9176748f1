//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small copy of the shop and its stock
//! API and run the full crawl cycle end-to-end.

use afdb_crawler::config::{
    Config, CrawlerConfig, LinkRules, OutputConfig, SiteConfig, StockConfig, UserAgentConfig,
};
use afdb_crawler::crawler::crawl;
use afdb_crawler::item::ProductRecord;
use afdb_crawler::storage::{RunStatus, SqliteStorage, Storage};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HTML: &str = "text/html; charset=utf-8";

const IN_STOCK: &str = r#"{"results":[{"views":[{"result":[{"message":"2 units"}]}]}]}"#;

/// Creates a test configuration pointed at the mock server
fn create_test_config(base_url: &str, jsonl_path: &Path) -> Config {
    let host = url::Url::parse(base_url)
        .expect("Failed to parse base URL")
        .host_str()
        .expect("Failed to extract host")
        .to_string();

    Config {
        crawler: CrawlerConfig {
            max_concurrent_requests: 4,
            request_timeout_secs: 5,
            connect_timeout_secs: 5,
            ..CrawlerConfig::default()
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        site: SiteConfig {
            allowed_domains: vec![host],
            start_urls: vec![format!("{}/", base_url)],
        },
        rules: LinkRules::default(),
        stock: StockConfig {
            endpoint: format!("{}/stock", base_url),
            max_retries: 0,
            retry_delay_ms: 10,
        },
        output: OutputConfig {
            jsonl_path: Some(jsonl_path.display().to_string()),
            database_path: None,
        },
    }
}

fn product_page(title: &str, sku_script: Option<&str>) -> String {
    let script = sku_script
        .map(|json| {
            format!(
                r#"<script type="application/ld+json" data-qa="structuredDataProductSEO">{}</script>"#,
                json
            )
        })
        .unwrap_or_default();

    format!(
        r#"<html><head>{}</head><body>
        <ul class="breadcrumbs">
          <li class="breadcrumbs-list"><a href="/">Home</a></li>
          <li class="breadcrumbs-list"><a href="/tools.html">Tools</a></li>
          <li class="breadcrumbs-list"><a href="/widgets.html">Widgets</a></li>
        </ul>
        <h1><span itemprop="name">{}</span></h1>
        <div class="product-brand"><img title="Acme" src="/acme.png"></div>
        </body></html>"#,
        script, title
    )
}

async fn mount_html(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, HTML))
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

async fn mount_stock(server: &MockServer, sku: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path("/stock"))
        .and(query_param("SKUs", sku))
        .and(query_param("ShowMessage", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(server)
        .await;
}

fn read_records(path: &Path) -> Vec<ProductRecord> {
    std::fs::read_to_string(path)
        .expect("Failed to read JSON Lines output")
        .lines()
        .map(|line| serde_json::from_str(line).expect("Invalid record line"))
        .collect()
}

/// Mounts the shop used by most tests: a home page linking to one product,
/// one category page, an INTERSHOP page and an offsite page
async fn mount_shop(server: &MockServer) {
    let base_url = server.uri();
    mount_robots(server, "User-agent: *\nAllow: /").await;

    mount_html(
        server,
        "/",
        r#"<html><body>
        <a href="/foo-SKU123.html">Widget</a>
        <a href="/outillage.html">Outillage</a>
        <a href="/INTERSHOP/web/x.html">Shop internals</a>
        <a href="https://elsewhere.example/p.html">Offsite</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    mount_html(
        server,
        "/outillage.html",
        format!(
            r#"<html><body>
            <a href="{}/">Home</a>
            <a href="/outillage.html">Outillage</a>
            <a href="/foo-SKU123.html#reviews">Widget</a>
            </body></html>"#,
            base_url
        ),
    )
    .await;

    mount_html(
        server,
        "/foo-SKU123.html",
        product_page("Widget", Some(r#"{"sku":"SKU123"}"#)),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/INTERSHOP/web/x.html"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_emits_product() {
    let server = MockServer::start().await;
    mount_shop(&server).await;
    mount_stock(&server, "SKU123", IN_STOCK).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("products.jsonl");
    let config = create_test_config(&server.uri(), &output);

    let stats = crawl(config, "test-hash").await.expect("Crawl failed");

    assert_eq!(stats.pages_fetched, 3);
    assert_eq!(stats.products_emitted, 1);
    assert_eq!(stats.stock_requests, 1);
    assert_eq!(stats.sku_failures, 0);
    // INTERSHOP and offsite links on the home page, links back to the home
    // page from the category and product pages
    assert_eq!(stats.links_filtered, 4);
    // the category page links to itself and to the product again
    assert_eq!(stats.links_duplicate, 2);
    // the product page's breadcrumb targets are not served
    assert_eq!(stats.fetch_errors, 2);

    let records = read_records(&output);
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.url, format!("{}/foo-SKU123.html", server.uri()));
    assert_eq!(record.title.as_deref(), Some("Widget"));
    assert_eq!(record.brand.as_deref(), Some("Acme"));
    assert_eq!(record.sku, "SKU123");
    assert_eq!(record.category, vec!["Tools", "Widgets"]);
    assert_eq!(record.stock, "2 units");
}

#[tokio::test]
async fn test_missing_sku_yields_no_record() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_html(
        &server,
        "/",
        r#"<a href="/bar-SKU9.html">Bar</a>"#.to_string(),
    )
    .await;
    mount_html(&server, "/bar-SKU9.html", product_page("Bar", None)).await;

    Mock::given(method("GET"))
        .and(path("/stock"))
        .respond_with(ResponseTemplate::new(200).set_body_string(IN_STOCK))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("products.jsonl");
    let config = create_test_config(&server.uri(), &output);

    let stats = crawl(config, "test-hash").await.expect("Crawl failed");

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.sku_failures, 1);
    assert_eq!(stats.products_emitted, 0);
    assert!(read_records(&output).is_empty());
}

#[tokio::test]
async fn test_malformed_stock_drops_only_that_record() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_html(
        &server,
        "/",
        r#"<a href="/a-SKU1.html">A</a><a href="/b-SKU2.html">B</a>"#.to_string(),
    )
    .await;
    mount_html(&server, "/a-SKU1.html", product_page("A", Some(r#"{"sku":"SKU1"}"#))).await;
    mount_html(&server, "/b-SKU2.html", product_page("B", Some(r#"{"sku":"SKU2"}"#))).await;
    mount_stock(&server, "SKU1", r#"{"results":[]}"#).await;
    mount_stock(&server, "SKU2", IN_STOCK).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("products.jsonl");
    let config = create_test_config(&server.uri(), &output);

    let stats = crawl(config, "test-hash").await.expect("Crawl failed");

    assert_eq!(stats.stock_requests, 2);
    assert_eq!(stats.stock_failures, 1);
    assert_eq!(stats.products_emitted, 1);

    let records = read_records(&output);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].sku, "SKU2");
}

#[tokio::test]
async fn test_stock_request_retried() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_html(&server, "/", r#"<a href="/a-SKU1.html">A</a>"#.to_string()).await;
    mount_html(&server, "/a-SKU1.html", product_page("A", Some(r#"{"sku":"SKU1"}"#))).await;

    Mock::given(method("GET"))
        .and(path("/stock"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_stock(&server, "SKU1", IN_STOCK).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("products.jsonl");
    let mut config = create_test_config(&server.uri(), &output);
    config.stock.max_retries = 1;

    let stats = crawl(config, "test-hash").await.expect("Crawl failed");

    assert_eq!(stats.stock_retries, 1);
    assert_eq!(stats.stock_failures, 0);
    assert_eq!(stats.products_emitted, 1);
}

#[tokio::test]
async fn test_stock_failure_without_retries() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_html(&server, "/", r#"<a href="/a-SKU1.html">A</a>"#.to_string()).await;
    mount_html(&server, "/a-SKU1.html", product_page("A", Some(r#"{"sku":"SKU1"}"#))).await;

    Mock::given(method("GET"))
        .and(path("/stock"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("products.jsonl");
    let config = create_test_config(&server.uri(), &output);

    let stats = crawl(config, "test-hash").await.expect("Crawl failed");

    assert_eq!(stats.stock_failures, 1);
    assert_eq!(stats.products_emitted, 0);
}

#[tokio::test]
async fn test_robots_disallow_respected() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /outillage.html").await;
    mount_html(
        &server,
        "/",
        r#"<a href="/outillage.html">Outillage</a>"#.to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/outillage.html"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", HTML))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("products.jsonl");
    let config = create_test_config(&server.uri(), &output);

    let stats = crawl(config, "test-hash").await.expect("Crawl failed");

    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(stats.robots_denied, 1);
}

#[tokio::test]
async fn test_missing_robots_allows_everything() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        r#"<a href="/outillage.html">Outillage</a>"#.to_string(),
    )
    .await;
    mount_html(&server, "/outillage.html", "<html></html>".to_string()).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("products.jsonl");
    let config = create_test_config(&server.uri(), &output);

    let stats = crawl(config, "test-hash").await.expect("Crawl failed");

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.robots_denied, 0);
}

#[tokio::test]
async fn test_page_limit() {
    let server = MockServer::start().await;
    mount_shop(&server).await;

    Mock::given(method("GET"))
        .and(path("/stock"))
        .respond_with(ResponseTemplate::new(200).set_body_string(IN_STOCK))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("products.jsonl");
    let mut config = create_test_config(&server.uri(), &output);
    config.crawler.max_pages = 1;

    let stats = crawl(config, "test-hash").await.expect("Crawl failed");

    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(stats.limit_dropped, 2);
    assert_eq!(stats.products_emitted, 0);
}

#[tokio::test]
async fn test_non_html_pages_skipped() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;
    mount_html(&server, "/", r#"<a href="/catalogue-SKU5.html">PDF</a>"#.to_string()).await;

    Mock::given(method("GET"))
        .and(path("/catalogue-SKU5.html"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF-1.4", "application/pdf"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("products.jsonl");
    let config = create_test_config(&server.uri(), &output);

    let stats = crawl(config, "test-hash").await.expect("Crawl failed");

    assert_eq!(stats.pages_skipped, 1);
    assert_eq!(stats.sku_failures, 0);
    assert_eq!(stats.products_emitted, 0);
}

#[tokio::test]
async fn test_products_stored_in_database() {
    let server = MockServer::start().await;
    mount_shop(&server).await;
    mount_stock(&server, "SKU123", IN_STOCK).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("products.jsonl");
    let db_path = dir.path().join("products.db");
    let mut config = create_test_config(&server.uri(), &output);
    config.output.database_path = Some(db_path.display().to_string());

    let stats = crawl(config, "test-hash").await.expect("Crawl failed");
    assert_eq!(stats.products_emitted, 1);

    let storage = SqliteStorage::new(&db_path).expect("Failed to open database");
    let url = format!("{}/foo-SKU123.html", server.uri());
    let stored = storage
        .get_product_by_url(&url)
        .unwrap()
        .expect("Product not stored");
    assert_eq!(stored.stock, "2 units");
    assert_eq!(stored.category, vec!["Tools", "Widgets"]);

    let run = storage.get_latest_run().unwrap().expect("Run not recorded");
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(storage.count_products().unwrap(), 1);
}

#[tokio::test]
async fn test_repeated_crawls_are_identical() {
    let server = MockServer::start().await;
    mount_shop(&server).await;
    mount_stock(&server, "SKU123", IN_STOCK).await;

    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.jsonl");
    let second = dir.path().join("second.jsonl");

    crawl(create_test_config(&server.uri(), &first), "test-hash")
        .await
        .expect("First crawl failed");
    crawl(create_test_config(&server.uri(), &second), "test-hash")
        .await
        .expect("Second crawl failed");

    let first = std::fs::read(&first).unwrap();
    let second = std::fs::read(&second).unwrap();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}
