//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use site_crawler::config::{Config, StorageBackend};
use site_crawler::storage::{page_file_name, SqliteStore};
use site_crawler::CrawlManager;
use std::path::Path;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing pages into `output_dir`
pub fn create_test_config(output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.worker_count = 3;
    config.crawler.retry_delay_ms = 10; // Very short for testing
    config.crawler.request_timeout_secs = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.crawler_version = "1.0.0".to_string();
    config.output.directory = output_dir.join("pages");
    config.output.database_path = output_dir.join("pages.db");
    config
}

pub async fn mount_page(server: &MockServer, page: &str, body: String, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(expected_hits)
        .mount(server)
        .await;
}

fn stored_name(url: &str) -> String {
    page_file_name(&Url::parse(url).expect("Failed to parse URL"))
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r##"<html><body>
            <a href="{}/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            <a href="#top">Top</a>
            <a href="">Self</a>
            </body></html>"##,
            base_url
        ),
        1,
    )
    .await;
    mount_page(&mock_server, "/page1", r#"<a href="page2">again</a>"#.to_string(), 1).await;
    mount_page(&mock_server, "/page2", "<p>Content 2</p>".to_string(), 1).await;

    let dir = TempDir::new().unwrap();
    let manager = CrawlManager::from_config(create_test_config(dir.path()))
        .expect("Failed to create manager");

    let summary = manager
        .run(&format!("{}/", base_url), 10)
        .await
        .expect("Crawl failed");

    assert_eq!(summary.admitted, 3);
    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.failed, 0);

    let pages = dir.path().join("pages");
    for page in ["/", "/page1", "/page2"] {
        let name = stored_name(&format!("{}{}", base_url, page));
        assert!(pages.join(&name).exists(), "missing {}", name);
    }

    let saved = std::fs::read_to_string(pages.join(stored_name(&format!("{}/page2", base_url))))
        .unwrap();
    assert_eq!(saved, "<p>Content 2</p>");
}

#[tokio::test]
async fn test_seed_without_links_fetches_one_page() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "<p>nothing here</p>".to_string(), 1).await;

    let dir = TempDir::new().unwrap();
    let manager = CrawlManager::from_config(create_test_config(dir.path())).unwrap();

    let summary = manager
        .run(&format!("{}/", mock_server.uri()), 10)
        .await
        .unwrap();

    assert_eq!(summary.fetched, 1);
    assert_eq!(std::fs::read_dir(dir.path().join("pages")).unwrap().count(), 1);
}

#[tokio::test]
async fn test_zero_max_pages_sends_no_request() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "<p>never</p>".to_string(), 0).await;

    let dir = TempDir::new().unwrap();
    let manager = CrawlManager::from_config(create_test_config(dir.path())).unwrap();

    let summary = manager
        .run(&format!("{}/", mock_server.uri()), 0)
        .await
        .unwrap();

    assert_eq!(summary.admitted, 0);
    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "/",
        r#"<a href="/a">A</a><a href="/a">A again</a><a href="/b">B</a>"#.to_string(),
        1,
    )
    .await;
    mount_page(&mock_server, "/a", String::new(), 1).await;
    mount_page(&mock_server, "/b", String::new(), 1).await;

    let dir = TempDir::new().unwrap();
    let manager = CrawlManager::from_config(create_test_config(dir.path())).unwrap();

    let summary = manager
        .run(&format!("{}/", mock_server.uri()), 10)
        .await
        .unwrap();

    assert_eq!(summary.admitted, 3);
    // Mock expectations verify one request each when the server drops
}

#[tokio::test]
async fn test_failing_page_is_retried_then_abandoned() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="/broken">x</a>"#.to_string(), 1).await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let manager = CrawlManager::from_config(create_test_config(dir.path())).unwrap();

    let summary = tokio::time::timeout(
        std::time::Duration::from_secs(10),
        manager.run(&format!("{}/", mock_server.uri()), 10),
    )
    .await
    .expect("Crawl did not terminate")
    .unwrap();

    assert_eq!(summary.fetched, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].0, format!("{}/broken", mock_server.uri()));
    assert!(!dir
        .path()
        .join("pages")
        .join(stored_name(&format!("{}/broken", mock_server.uri())))
        .exists());
}

#[tokio::test]
async fn test_max_pages_caps_the_crawl() {
    let mock_server = MockServer::start().await;
    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/p{}">p{}</a>"#, i, i))
        .collect();
    mount_page(&mock_server, "/", links, 1).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("leaf"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let manager = CrawlManager::from_config(create_test_config(dir.path())).unwrap();

    let summary = manager
        .run(&format!("{}/", mock_server.uri()), 4)
        .await
        .unwrap();

    assert_eq!(summary.admitted, 4);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_crawl_starts_at_site_root_and_leaves_origin() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;

    mount_page(
        &site,
        "/docs/",
        format!(r#"<a href="{}/elsewhere">out</a>"#, other.uri()),
        1,
    )
    .await;
    mount_page(&site, "/docs/index.html", String::new(), 0).await;
    mount_page(&other, "/elsewhere", String::new(), 1).await;

    let dir = TempDir::new().unwrap();
    let manager = CrawlManager::from_config(create_test_config(dir.path())).unwrap();

    let summary = manager
        .run(&format!("{}/docs/index.html", site.uri()), 10)
        .await
        .unwrap();

    assert_eq!(summary.root, format!("{}/docs/", site.uri()));
    assert_eq!(summary.fetched, 2);
}

#[tokio::test]
async fn test_links_on_redirected_page_use_final_url() {
    let mock_server = MockServer::start().await;
    let location = format!("{}/about/", mock_server.uri());

    mount_page(&mock_server, "/", r#"<a href="/about">About</a>"#.to_string(), 1).await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", location.as_str()))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/about/", r#"<a href="team">Team</a>"#.to_string(), 1).await;
    mount_page(&mock_server, "/about/team", String::new(), 1).await;

    let dir = TempDir::new().unwrap();
    let manager = CrawlManager::from_config(create_test_config(dir.path())).unwrap();

    let summary = manager
        .run(&format!("{}/", mock_server.uri()), 10)
        .await
        .unwrap();

    let paths: Vec<String> = mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect();
    assert!(paths.contains(&"/about/team".to_string()), "requested {:?}", paths);
    assert!(!paths.contains(&"/team".to_string()));
    assert_eq!(summary.failed, 0);
}

#[tokio::test]
async fn test_sqlite_backend_stores_pages() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="/a">A</a>"#.to_string(), 1).await;
    mount_page(&mock_server, "/a", "<p>A</p>".to_string(), 1).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(dir.path());
    config.output.backend = StorageBackend::Sqlite;
    let db_path = config.output.database_path.clone();

    let manager = CrawlManager::from_config(config).unwrap();
    manager
        .run(&format!("{}/", mock_server.uri()), 10)
        .await
        .unwrap();
    drop(manager);

    let store = SqliteStore::new(&db_path).expect("Failed to open DB");
    assert_eq!(store.count_pages().unwrap(), 2);
    let content = store
        .load_page(&stored_name(&format!("{}/a", mock_server.uri())))
        .unwrap();
    assert_eq!(content.as_deref(), Some("<p>A</p>".as_bytes()));
}
