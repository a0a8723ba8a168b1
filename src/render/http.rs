//! Plain HTTP rendering engine
//!
//! Fetches pages with a GET request and no JavaScript. The response body is
//! the snapshot; links come from the raw HTML.

use super::download::Downloader;
use super::links::extract_hrefs;
use super::outcome::{RenderFailure, RenderOutcome, RenderedDocument};
use super::snapshot::SnapshotDirs;
use super::{is_download, Renderer};
use crate::CaptureError;
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

/// Renderer backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
    downloader: Downloader,
    dirs: SnapshotDirs,
    download_extensions: Vec<String>,
}

impl HttpRenderer {
    /// Creates a renderer writing into `dirs`
    ///
    /// The client is shared with the downloader, so timeouts and the user
    /// agent are configured once on it.
    pub fn new(client: Client, dirs: SnapshotDirs, download_extensions: Vec<String>) -> Self {
        let downloader = Downloader::new(client.clone(), dirs.downloads.clone());
        Self {
            client,
            downloader,
            dirs,
            download_extensions,
        }
    }

    async fn fetch_page(&self, url: &Url) -> RenderOutcome {
        let response = match self.client.get(url.as_str()).send().await {
            Ok(response) => response,
            Err(e) => return classify_transport_error(&e).into(),
        };

        let status = response.status().as_u16();
        if status >= 400 {
            return RenderFailure::HttpError(status).into();
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return classify_transport_error(&e).into(),
        };

        // Non-HTML resources count as visited but have nothing to follow
        if !content_type.is_empty() && !content_type.contains("html") {
            tracing::debug!("Skipping body of {} ({})", url, content_type);
            return RenderOutcome::Success(RenderedDocument {
                url: url.clone(),
                status: Some(status),
                hrefs: Vec::new(),
                artifacts: Vec::new(),
            });
        }

        let path = self.dirs.page_path(url);
        if let Err(e) = tokio::fs::write(&path, &body).await {
            tracing::warn!("Failed to save {}: {}", path.display(), e);
            return RenderFailure::NavigationException(format!(
                "Failed to save snapshot: {}",
                e
            ))
            .into();
        }

        RenderOutcome::Success(RenderedDocument {
            url: url.clone(),
            status: Some(status),
            hrefs: extract_hrefs(&body),
            artifacts: vec![path],
        })
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn render(&mut self, url: &Url) -> Result<RenderOutcome, CaptureError> {
        if is_download(url, &self.download_extensions) {
            return Ok(self.downloader.fetch(url).await);
        }
        Ok(self.fetch_page(url).await)
    }

    async fn close(&mut self) {}
}

fn classify_transport_error(e: &reqwest::Error) -> RenderFailure {
    if e.is_timeout() {
        RenderFailure::NavigationException("Request timeout".to_string())
    } else if e.is_connect() {
        RenderFailure::NavigationException(format!("Connection failed: {}", e))
    } else {
        RenderFailure::NavigationException(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::build_http_client;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn renderer(dir: &TempDir) -> HttpRenderer {
        let dirs = SnapshotDirs::under(dir.path());
        dirs.ensure().unwrap();
        let client = build_http_client(None, Duration::from_secs(5)).unwrap();
        HttpRenderer::new(client, dirs, vec!["pdf".to_string()])
    }

    #[tokio::test]
    async fn test_render_html_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(
                    r#"<a href="/about">About</a><a href="/doc.pdf">Doc</a>"#,
                    "text/html; charset=utf-8",
                ),
            )
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let mut renderer = renderer(&dir);
        let url = Url::parse(&format!("{}/", server.uri())).unwrap();

        let outcome = renderer.render(&url).await.unwrap();

        let RenderOutcome::Success(document) = outcome else {
            panic!("expected success, got {:?}", outcome);
        };
        assert_eq!(document.status, Some(200));
        assert_eq!(document.hrefs, vec!["/about", "/doc.pdf"]);
        assert_eq!(document.artifacts.len(), 1);
        assert!(document.artifacts[0].starts_with(dir.path().join("pages")));

        let saved = std::fs::read_to_string(&document.artifacts[0]).unwrap();
        assert!(saved.contains("About"));
    }

    #[tokio::test]
    async fn test_render_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let mut renderer = renderer(&dir);
        let url = Url::parse(&format!("{}/broken", server.uri())).unwrap();

        let outcome = renderer.render(&url).await.unwrap();

        assert_eq!(outcome, RenderOutcome::Failure(RenderFailure::HttpError(500)));
    }

    #[tokio::test]
    async fn test_render_routes_downloads() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/report.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let mut renderer = renderer(&dir);
        let url = Url::parse(&format!("{}/report.pdf", server.uri())).unwrap();

        let outcome = renderer.render(&url).await.unwrap();

        let RenderOutcome::Success(document) = outcome else {
            panic!("expected success, got {:?}", outcome);
        };
        assert!(document.hrefs.is_empty());
        assert!(document.artifacts[0].starts_with(dir.path().join("downloads")));
    }

    #[tokio::test]
    async fn test_render_non_html_has_no_links() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(vec![0u8, 1, 2], "image/png"),
            )
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let mut renderer = renderer(&dir);
        let url = Url::parse(&format!("{}/logo.png", server.uri())).unwrap();

        let outcome = renderer.render(&url).await.unwrap();

        let RenderOutcome::Success(document) = outcome else {
            panic!("expected success, got {:?}", outcome);
        };
        assert!(document.hrefs.is_empty());
        assert!(document.artifacts.is_empty());
    }

    #[tokio::test]
    async fn test_render_unreachable_host() {
        let dir = TempDir::new().unwrap();
        let mut renderer = renderer(&dir);
        // Port 9 (discard) is closed on test hosts
        let url = Url::parse("http://127.0.0.1:9/").unwrap();

        let outcome = renderer.render(&url).await.unwrap();

        assert!(matches!(
            outcome,
            RenderOutcome::Failure(RenderFailure::NavigationException(_))
        ));
    }
}
