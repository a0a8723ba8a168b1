//! Binary asset downloads
//!
//! Assets selected by path suffix (PDFs by default) are fetched with a plain
//! HTTP client instead of a browser navigation and streamed to disk.

use super::outcome::{RenderFailure, RenderOutcome, RenderedDocument};
use super::snapshot::download_path;
use futures::StreamExt;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Default user agent when none is configured
const DEFAULT_USER_AGENT: &str = concat!("site-capture/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client shared by downloads, seed expansion and the HTTP engine
///
/// # Arguments
///
/// * `user_agent` - Custom user agent, or `None` for the crate default
/// * `timeout` - Whole-request timeout
///
/// # Example
///
/// ```no_run
/// use site_capture::render::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(None, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: Option<&str>,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Streams binary assets into the downloads directory
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    dir: PathBuf,
}

impl Downloader {
    pub fn new(client: Client, dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Downloads one asset
    ///
    /// | Condition | Outcome |
    /// |-----------|---------|
    /// | 2xx, body written | `Success` with the file as artifact |
    /// | non-2xx status | `DownloadError("HTTP <status>")` |
    /// | timeout / connect failure | `NavigationException` |
    /// | body or disk failure | `DownloadError` |
    ///
    /// A partially written file is removed on failure.
    pub async fn fetch(&self, url: &Url) -> RenderOutcome {
        let response = match self.client.get(url.as_str()).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return RenderFailure::NavigationException("Request timeout".to_string()).into()
            }
            Err(e) if e.is_connect() => {
                return RenderFailure::NavigationException(format!("Connection failed: {}", e))
                    .into()
            }
            Err(e) => return RenderFailure::DownloadError(e.to_string()).into(),
        };

        let status = response.status();
        if !status.is_success() {
            return RenderFailure::DownloadError(format!("HTTP {}", status.as_u16())).into();
        }

        let path = download_path(&self.dir, url);
        if let Err(e) = write_stream(response, &path).await {
            let _ = tokio::fs::remove_file(&path).await;
            return RenderFailure::DownloadError(e).into();
        }

        tracing::debug!("Downloaded {} to {}", url, path.display());

        RenderOutcome::Success(RenderedDocument::leaf(
            url.clone(),
            Some(status.as_u16()),
            path,
        ))
    }
}

async fn write_stream(response: reqwest::Response, path: &Path) -> Result<(), String> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| format!("Failed to read body: {}", e))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    }

    file.flush()
        .await
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}
