use crate::crawler::TraversalOrder;
use serde::Deserialize;

/// Main configuration structure for Site-Capture
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub renderer: RendererConfig,
    pub output: OutputConfig,
}

/// Crawl scope and traversal configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Seed URLs the crawl starts from
    pub seeds: Vec<String>,

    /// Host substrings a URL must contain to be crawled
    pub whitelist: Vec<String>,

    /// Path suffixes that exclude a URL (case-insensitive)
    pub filetype_blacklist: Vec<String>,

    /// Order in which pending URLs are taken
    pub traversal_order: TraversalOrder,

    /// Whether to add robots.txt and sitemap URLs to the seeds
    pub expand_seeds: bool,

    /// Render attempts per URL; 1 disables retries
    pub max_attempts: u32,

    /// Pause between two attempts on the same URL (milliseconds)
    pub retry_delay_ms: u64,

    /// Stop after this many visited URLs
    pub max_pages: Option<usize>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seeds: Vec::new(),
            whitelist: Vec::new(),
            filetype_blacklist: Vec::new(),
            traversal_order: TraversalOrder::Stack,
            expand_seeds: true,
            max_attempts: 1,
            retry_delay_ms: 1000,
            max_pages: None,
        }
    }
}

/// Which rendering engine captures pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Engine {
    /// Headless Chromium: screenshots plus rendered DOM
    Browser,
    /// Plain HTTP GET: raw HTML only, no JavaScript
    Http,
}

/// Page renderer configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RendererConfig {
    pub engine: Engine,

    /// Bound on every navigation or download (milliseconds)
    pub timeout_ms: u64,

    pub viewport_width: u32,

    pub viewport_height: u32,

    /// Custom Chromium executable
    pub chrome_path: Option<String>,

    /// CSS selector clicked once on the seed page to dismiss a cookie banner
    pub cookie_selector: Option<String>,

    /// Path suffixes fetched as binary downloads instead of being navigated
    pub download_extensions: Vec<String>,

    /// Persist the rendered HTML next to each screenshot
    pub save_documents: bool,

    pub user_agent: Option<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            engine: Engine::Browser,
            timeout_ms: 30_000,
            viewport_width: 1280,
            viewport_height: 800,
            chrome_path: None,
            cookie_selector: None,
            download_extensions: vec!["pdf".to_string()],
            save_documents: true,
            user_agent: None,
        }
    }
}

/// Output and post-processing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory receiving every captured artifact
    pub directory: String,

    /// Directory receiving the final zip archive
    pub archive_directory: String,

    /// Re-encode screenshots as lossy WebP after the crawl
    pub recompress: bool,

    /// Path or name of the `cwebp` encoder
    pub cwebp_path: String,

    /// WebP quality (0-100)
    pub quality: u8,

    /// Produce the zip archive after the crawl
    pub archive: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "output".to_string(),
            archive_directory: ".".to_string(),
            recompress: true,
            cwebp_path: "cwebp".to_string(),
            quality: 10,
            archive: true,
        }
    }
}
