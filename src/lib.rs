//! Site-Capture: a single-origin web archiver
//!
//! This crate crawls one web origin inside a domain whitelist, captures a
//! full-page snapshot and the rendered document of every reachable page,
//! downloads linked binary assets separately and packs everything into a
//! compressed archive.

pub mod config;
pub mod crawler;
pub mod output;
pub mod render;
pub mod robots;
pub mod url;

use thiserror::Error;

/// Errors that abort a capture run
///
/// Per-URL render problems are not errors: they are reported as
/// [`render::RenderFailure`] values and recorded in the broken list.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No seed URL provided")]
    MissingSeed,

    #[error("Failed to set up the rendering session: {0}")]
    FatalSetup(String),

    #[error("Seed expansion failed for {origin}: {reason}")]
    SeedExpansionFailed { origin: String, reason: String },

    #[error(transparent)]
    UrlError(#[from] UrlError),

    #[error("Bad URL: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Problems with the capture configuration, raised before any request
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("Seed is not a usable URL: {0}")]
    InvalidUrl(String),
}

/// Reasons a link cannot become a frontier URL
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Unparseable URL: {0}")]
    Parse(String),

    #[error("Unsupported scheme: {0}")]
    InvalidScheme(String),

    #[error("URL has no host")]
    MissingHost,
}

pub use config::Config;
pub use crawler::{Coordinator, CrawlReport, Frontier, TraversalOrder};
pub use render::{RenderFailure, RenderOutcome, RenderedDocument, Renderer};
pub use url::{normalize_url, ScopePolicy};
