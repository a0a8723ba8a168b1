//! Headless Chromium rendering engine
//!
//! One browser and one tab serve the whole run. The session is launched on
//! the first render call and released by [`Renderer::close`].

use super::download::Downloader;
use super::links::extract_hrefs;
use super::outcome::{RenderFailure, RenderOutcome, RenderedDocument};
use super::snapshot::{snapshot_file_name, SnapshotDirs};
use super::{is_download, Renderer};
use crate::CaptureError;
use async_trait::async_trait;
use chromiumoxide::error::CdpError;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use url::Url;

/// Settings for the browser engine, resolved from config and CLI
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Custom Chromium executable; auto-detected when `None`
    pub chrome_path: Option<PathBuf>,

    /// Bound on one navigation including the screenshot
    pub timeout: Duration,

    /// Clicked once on the first page to dismiss a cookie banner
    pub cookie_selector: Option<String>,

    pub download_extensions: Vec<String>,

    /// Persist the rendered DOM next to the screenshot
    pub save_documents: bool,
}

impl BrowserSettings {
    fn browser_config(&self) -> Result<BrowserConfig, String> {
        let viewport = Viewport {
            width: self.viewport_width,
            height: self.viewport_height,
            device_scale_factor: None,
            emulating_mobile: false,
            is_landscape: false,
            has_touch: false,
        };

        let builder = BrowserConfig::builder()
            .window_size(self.viewport_width, self.viewport_height)
            .viewport(viewport)
            .request_timeout(self.timeout);

        let builder = match &self.chrome_path {
            Some(path) => builder.chrome_executable(path),
            None => builder,
        };

        builder.build()
    }
}

/// Live browser process with its CDP event loop and working tab
struct Session {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Option<Page>,
}

impl Session {
    async fn shutdown(mut self) {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                tracing::debug!("Failed to close tab: {}", e);
            }
        }
        if let Err(e) = self.browser.close().await {
            tracing::warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("Failed to reap browser process: {}", e);
        }
        self.handler.abort();
    }
}

/// Renderer driving headless Chromium over the DevTools protocol
pub struct BrowserRenderer {
    settings: BrowserSettings,
    dirs: SnapshotDirs,
    downloader: Downloader,
    session: Option<Session>,
}

impl BrowserRenderer {
    pub fn new(settings: BrowserSettings, dirs: SnapshotDirs, downloader: Downloader) -> Self {
        Self {
            settings,
            dirs,
            downloader,
            session: None,
        }
    }

    /// Returns true while a browser process is held
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Launches the browser unless a session is already open
    ///
    /// `first_url` is used for the one-time cookie banner dismissal.
    async fn ensure_session(&mut self, first_url: &Url) -> Result<(), CaptureError> {
        if self.session.is_some() {
            return Ok(());
        }

        let config = self
            .settings
            .browser_config()
            .map_err(CaptureError::FatalSetup)?;

        tracing::info!("Launching headless browser");
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| CaptureError::FatalSetup(format!("Failed to launch browser: {}", e)))?;

        // The CDP connection only makes progress while the handler is polled
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    match e {
                        CdpError::Ws(_)
                        | CdpError::LaunchExit(_, _)
                        | CdpError::LaunchTimeout(_)
                        | CdpError::LaunchIo(_, _) => break,
                        _ => continue,
                    }
                }
            }
        });

        let mut session = Session {
            browser,
            handler,
            page: None,
        };

        let page = match session.browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                session.shutdown().await;
                return Err(CaptureError::FatalSetup(format!(
                    "Failed to open a tab: {}",
                    e
                )));
            }
        };

        if let Some(selector) = self.settings.cookie_selector.as_deref() {
            self.dismiss_cookie_banner(&page, first_url, selector).await;
        }

        session.page = Some(page);

        self.session = Some(session);
        Ok(())
    }

    /// Opens the first page, snapshots the banner and clicks the selector
    ///
    /// Failure here never aborts the run.
    async fn dismiss_cookie_banner(&self, page: &Page, url: &Url, selector: &str) {
        if let Err(e) = self.navigate(page, url).await {
            tracing::warn!("Could not open {} for cookie consent: {}", url, e);
            return;
        }

        let path = self.dirs.screenshots.join(snapshot_file_name("cookie", "png"));
        if let Err(e) = page.save_screenshot(screenshot_params(), &path).await {
            tracing::warn!("Failed to save cookie snapshot: {}", e);
        }

        let clicked = match page.find_element(selector).await {
            Ok(element) => element.click().await.map(|_| ()),
            Err(e) => Err(e),
        };

        match clicked {
            Ok(()) => tracing::info!("Dismissed cookie banner via '{}'", selector),
            Err(e) => tracing::warn!("Cookie selector '{}' not clickable: {}", selector, e),
        }
    }

    /// Navigates and returns the main-frame status, if any
    async fn navigate(&self, page: &Page, url: &Url) -> Result<Option<u16>, RenderFailure> {
        let navigation = async {
            page.goto(url.as_str()).await?;
            page.wait_for_navigation_response().await
        };

        let request = tokio::time::timeout(self.settings.timeout, navigation)
            .await
            .map_err(|_| RenderFailure::NavigationException("Navigation timeout".to_string()))?
            .map_err(|e| RenderFailure::NavigationException(e.to_string()))?;

        Ok(request
            .and_then(|request| request.response.as_ref().map(|r| r.status))
            .and_then(|status| u16::try_from(status).ok()))
    }

    async fn capture(&self, page: &Page, url: &Url) -> RenderOutcome {
        let status = match self.navigate(page, url).await {
            Ok(Some(status)) => status,
            Ok(None) => return RenderFailure::NoResponse.into(),
            Err(reason) => return reason.into(),
        };

        if status >= 400 {
            return RenderFailure::HttpError(status).into();
        }

        let mut artifacts = Vec::new();

        let screenshot = self.dirs.screenshot_path(url);
        match page.save_screenshot(screenshot_params(), &screenshot).await {
            Ok(_) => artifacts.push(screenshot),
            Err(e) => {
                return RenderFailure::NavigationException(format!("Screenshot failed: {}", e))
                    .into()
            }
        }

        let html = match page.content().await {
            Ok(html) => html,
            Err(e) => {
                return RenderFailure::NavigationException(format!(
                    "Failed to read document: {}",
                    e
                ))
                .into()
            }
        };

        if self.settings.save_documents {
            let path = self.dirs.page_path(url);
            match tokio::fs::write(&path, &html).await {
                Ok(()) => artifacts.push(path),
                Err(e) => tracing::warn!("Failed to save {}: {}", path.display(), e),
            }
        }

        RenderOutcome::Success(RenderedDocument {
            url: url.clone(),
            status: Some(status),
            hrefs: extract_hrefs(&html),
            artifacts,
        })
    }
}

#[async_trait]
impl Renderer for BrowserRenderer {
    async fn render(&mut self, url: &Url) -> Result<RenderOutcome, CaptureError> {
        if is_download(url, &self.settings.download_extensions) {
            return Ok(self.downloader.fetch(url).await);
        }

        self.ensure_session(url).await?;

        let Some(page) = self.session.as_ref().and_then(|s| s.page.as_ref()) else {
            return Err(CaptureError::FatalSetup(
                "Browser session unavailable".to_string(),
            ));
        };

        Ok(self.capture(page, url).await)
    }

    async fn close(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!("Closing browser");
            session.shutdown().await;
        }
    }
}

fn screenshot_params() -> ScreenshotParams {
    ScreenshotParams::builder().full_page(true).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::build_http_client;
    use std::path::Path;

    fn settings() -> BrowserSettings {
        BrowserSettings {
            viewport_width: 1280,
            viewport_height: 800,
            chrome_path: None,
            timeout: Duration::from_secs(5),
            cookie_selector: None,
            download_extensions: vec!["pdf".to_string()],
            save_documents: true,
        }
    }

    fn renderer(settings: BrowserSettings) -> BrowserRenderer {
        let dirs = SnapshotDirs::under(Path::new("unused"));
        let client = build_http_client(None, Duration::from_secs(5)).unwrap();
        let downloader = Downloader::new(client, dirs.downloads.clone());
        BrowserRenderer::new(settings, dirs, downloader)
    }

    #[test]
    fn test_browser_config_builds_with_custom_executable() {
        let mut settings = settings();
        settings.chrome_path = Some(PathBuf::from("/usr/bin/chromium"));
        assert!(settings.browser_config().is_ok());
    }

    #[test]
    fn test_session_starts_closed() {
        assert!(!renderer(settings()).is_open());
    }

    #[tokio::test]
    async fn test_close_without_session_is_noop() {
        let mut renderer = renderer(settings());
        renderer.close().await;
        renderer.close().await;
        assert!(!renderer.is_open());
    }

    #[tokio::test]
    async fn test_launch_failure_is_fatal() {
        let mut settings = settings();
        settings.chrome_path = Some(PathBuf::from("/nonexistent/chromium-binary"));
        let mut renderer = renderer(settings);

        let url = Url::parse("https://example.com/").unwrap();
        let result = renderer.render(&url).await;

        assert!(matches!(result, Err(CaptureError::FatalSetup(_))));
        assert!(!renderer.is_open());
    }
}
