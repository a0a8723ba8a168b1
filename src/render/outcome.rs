/// Render outcome definitions
///
/// This module defines the classified result of one render attempt.
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Why a render attempt failed
///
/// The distinction is kept for logging and the final report; the driver
/// treats every variant the same way and records the URL as broken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderFailure {
    /// Navigation finished without any main-frame response
    NoResponse,

    /// The server answered with a status >= 400
    HttpError(u16),

    /// Transport, DNS, protocol or timeout failure during navigation
    NavigationException(String),

    /// A binary asset could not be fetched or written
    DownloadError(String),
}

impl RenderFailure {
    /// Short stable label used in logs and reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoResponse => "no-response",
            Self::HttpError(_) => "http-error",
            Self::NavigationException(_) => "navigation-exception",
            Self::DownloadError(_) => "download-error",
        }
    }

    /// Returns true if another attempt could plausibly succeed
    ///
    /// Only consulted when retries are enabled.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::NoResponse | Self::NavigationException(_) => true,
            Self::HttpError(status) => *status == 429 || *status >= 500,
            Self::DownloadError(_) => false,
        }
    }
}

impl fmt::Display for RenderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResponse => write!(f, "no-response"),
            Self::HttpError(status) => write!(f, "http-error({})", status),
            Self::NavigationException(message) => write!(f, "navigation-exception: {}", message),
            Self::DownloadError(message) => write!(f, "download-error: {}", message),
        }
    }
}

/// A successfully rendered page or downloaded asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// URL that was requested
    pub url: Url,

    /// HTTP status of the main response, when the engine exposes it
    pub status: Option<u16>,

    /// Raw href values found in the document, unfiltered
    pub hrefs: Vec<String>,

    /// Files written for this URL (screenshot, HTML, download)
    pub artifacts: Vec<PathBuf>,
}

impl RenderedDocument {
    /// A document with no links, e.g. a downloaded binary
    pub fn leaf(url: Url, status: Option<u16>, artifact: PathBuf) -> Self {
        Self {
            url,
            status,
            hrefs: Vec::new(),
            artifacts: vec![artifact],
        }
    }
}

/// Result of one render attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Success(RenderedDocument),
    Failure(RenderFailure),
}

impl RenderOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn failure(&self) -> Option<&RenderFailure> {
        match self {
            Self::Failure(reason) => Some(reason),
            Self::Success(_) => None,
        }
    }
}

impl From<RenderFailure> for RenderOutcome {
    fn from(reason: RenderFailure) -> Self {
        Self::Failure(reason)
    }
}
