//! Page rendering module
//!
//! A [`Renderer`] turns one URL into a [`RenderOutcome`]. Implementations:
//! - [`BrowserRenderer`]: headless Chromium, full-page screenshot plus DOM
//! - [`HttpRenderer`]: plain HTTP GET, raw HTML snapshot
//!
//! Both route binary downloads (by path suffix) to the [`Downloader`].

mod browser;
mod download;
mod http;
mod links;
mod outcome;
mod snapshot;

pub use browser::{BrowserRenderer, BrowserSettings};
pub use download::{build_http_client, Downloader};
pub use http::HttpRenderer;
pub use links::extract_hrefs;
pub use outcome::{RenderFailure, RenderOutcome, RenderedDocument};
pub use snapshot::{download_path, snapshot_file_name, SnapshotDirs, MAX_URL_FILENAME_LENGTH};

use crate::CaptureError;
use async_trait::async_trait;
use url::Url;

/// Capability consumed by the crawl driver
///
/// `render` returns `Ok` for every per-URL result, success or failure.
/// `Err` is reserved for environment-level problems (the session cannot be
/// set up at all) and aborts the run.
#[async_trait]
pub trait Renderer: Send {
    /// Renders one URL and persists its snapshot
    async fn render(&mut self, url: &Url) -> Result<RenderOutcome, CaptureError>;

    /// Releases the rendering session; a no-op if none was opened
    async fn close(&mut self);
}

/// Returns true if the URL should be downloaded rather than navigated
pub fn is_download(url: &Url, extensions: &[String]) -> bool {
    crate::url::path_has_suffix(url, extensions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_download_matches_path_suffix() {
        let extensions = vec!["pdf".to_string()];
        assert!(is_download(
            &Url::parse("https://example.com/files/report.PDF").unwrap(),
            &extensions
        ));
        assert!(!is_download(
            &Url::parse("https://example.com/report?as=pdf").unwrap(),
            &extensions
        ));
        assert!(!is_download(
            &Url::parse("https://example.com/").unwrap(),
            &extensions
        ));
    }
}
