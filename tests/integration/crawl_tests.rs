//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! capture cycle end-to-end with the plain HTTP engine.

use chrono::Utc;
use site_capture::crawler::{Coordinator, CrawlReport, TraversalOrder};
use site_capture::output::{archive_directory, prepare_directories, write_markdown_report};
use site_capture::output::{OutputLayout, ReportContext, REPORT_FILE_NAME};
use site_capture::render::{build_http_client, HttpRenderer, RenderFailure};
use site_capture::robots::expand_seeds;
use site_capture::url::ScopePolicy;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts an HTML page at `route`
async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .expect(1)
        .mount(server)
        .await;
}

/// Runs a crawl of `seeds` against the mock server's host
async fn crawl(
    layout: &OutputLayout,
    scope: ScopePolicy,
    order: TraversalOrder,
    seeds: Vec<Url>,
) -> CrawlReport {
    let client = build_http_client(Some("TestBot/1.0"), Duration::from_secs(5)).unwrap();
    let renderer = HttpRenderer::new(client, layout.snapshots.clone(), vec!["pdf".to_string()]);

    let mut coordinator = Coordinator::new(renderer, scope, order);
    coordinator.seed(seeds);
    coordinator.run().await.expect("crawl failed")
}

fn local_scope() -> ScopePolicy {
    ScopePolicy::new(vec!["127.0.0.1".to_string()], vec![])
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<html><body>
            <a href="/page1">Page 1</a>
            <a href="{}/page2">Page 2</a>
            <a href="https://other.example.org/x">Elsewhere</a>
            <a href="mailto:team@example.com">Mail</a>
            <a href="/files/guide.pdf">Guide</a>
            </body></html>"#,
            base_url
        ),
    )
    .await;
    mount_page(&mock_server, "/page1", r#"<a href="/">Home</a><a href="/page2">2</a>"#).await;
    mount_page(&mock_server, "/page2", r#"<a href="/page1#top">1</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/files/guide.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp = TempDir::new().unwrap();
    let layout = prepare_directories(&temp.path().join("output")).unwrap();
    let seed = Url::parse(&format!("{}/", base_url)).unwrap();

    let report = crawl(&layout, local_scope(), TraversalOrder::Stack, vec![seed]).await;

    assert_eq!(report.visited.len(), 4);
    assert!(report.broken.is_empty());
    assert_eq!(report.pages_succeeded, 4);
    assert!(report
        .visited
        .iter()
        .all(|url| url.host_str() == Some("127.0.0.1")));

    // Three HTML snapshots and one download
    assert_eq!(std::fs::read_dir(&layout.snapshots.pages).unwrap().count(), 3);
    let downloads: Vec<_> = std::fs::read_dir(&layout.snapshots.downloads)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(downloads.len(), 1);
    assert!(downloads[0].to_string_lossy().ends_with("-guide.pdf"));
}

#[tokio::test]
async fn test_broken_page_isolated() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/broken">Broken</a><a href="/ok">OK</a>"#,
    )
    .await;
    mount_page(&mock_server, "/ok", r#"<a href="/broken">Again</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp = TempDir::new().unwrap();
    let layout = prepare_directories(temp.path()).unwrap();
    let seed = Url::parse(&format!("{}/", mock_server.uri())).unwrap();

    let report = crawl(&layout, local_scope(), TraversalOrder::Queue, vec![seed]).await;

    assert_eq!(report.visited.len(), 3);
    assert_eq!(report.broken.len(), 1);
    assert_eq!(report.broken[0].url.path(), "/broken");
    assert_eq!(report.broken[0].reason, RenderFailure::HttpError(500));
}

#[tokio::test]
async fn test_blacklisted_suffix_never_requested() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/report.pdf">Report</a><a href="/search?format=pdf">Search</a>"#,
    )
    .await;
    mount_page(&mock_server, "/search", "<p>results</p>").await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let temp = TempDir::new().unwrap();
    let layout = prepare_directories(temp.path()).unwrap();
    let scope = ScopePolicy::new(vec!["127.0.0.1".to_string()], vec!["PDF".to_string()]);
    let seed = Url::parse(&format!("{}/", mock_server.uri())).unwrap();

    let report = crawl(&layout, scope, TraversalOrder::Stack, vec![seed]).await;

    let paths: Vec<&str> = report.visited.iter().map(|u| u.path()).collect();
    assert_eq!(paths, vec!["/", "/search"]);
}

#[tokio::test]
async fn test_seed_expansion_feeds_frontier() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "User-agent: *\nDisallow: /hidden\nSitemap: {}/sitemap.xml\n",
            base_url
        )))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<urlset><url><loc>{}/orphan</loc></url></urlset>",
            base_url
        )))
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/", "<p>No links here</p>").await;
    mount_page(&mock_server, "/hidden", "<p>Hidden</p>").await;
    mount_page(&mock_server, "/orphan", "<p>Orphan</p>").await;

    let temp = TempDir::new().unwrap();
    let layout = prepare_directories(temp.path()).unwrap();
    let client = build_http_client(None, Duration::from_secs(5)).unwrap();
    let seed = Url::parse(&format!("{}/", base_url)).unwrap();

    let mut seeds = vec![seed.clone()];
    seeds.extend(expand_seeds(&client, &seed, &local_scope()).await.unwrap());

    let report = crawl(&layout, local_scope(), TraversalOrder::Stack, seeds).await;

    // Stack order: expanded seeds come off the frontier before the operator seed
    let paths: Vec<&str> = report.visited.iter().map(|u| u.path()).collect();
    assert_eq!(paths, vec!["/orphan", "/hidden", "/"]);
}

#[tokio::test]
async fn test_report_and_archive() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="/missing">Missing</a>"#).await;

    let temp = TempDir::new().unwrap();
    let layout = prepare_directories(&temp.path().join("output")).unwrap();
    let seed = Url::parse(&format!("{}/", mock_server.uri())).unwrap();

    let report = crawl(&layout, local_scope(), TraversalOrder::Stack, vec![seed.clone()]).await;
    assert_eq!(report.broken.len(), 1);

    let context = ReportContext {
        seeds: vec![seed.to_string()],
        started_at: Utc::now(),
        config_hash: None,
    };
    write_markdown_report(&report, &context, &layout.root).unwrap();

    let markdown = std::fs::read_to_string(layout.root.join(REPORT_FILE_NAME)).unwrap();
    assert!(markdown.contains("/missing | http-error(404)"));

    let archive = archive_directory(
        &layout.root,
        &temp.path().join("backups"),
        &layout.archive_exclusions(true),
        Utc::now(),
    )
    .unwrap();
    let zip = zip::ZipArchive::new(std::fs::File::open(&archive).unwrap()).unwrap();
    let names: Vec<&str> = zip.file_names().collect();
    assert!(names.contains(&"output/report.md"));
    assert!(names.iter().any(|name| name.starts_with("output/pages/")));
    assert!(!names.iter().any(|name| name.starts_with("output/screenshots/")));
}
