//! Site-Capture main entry point
//!
//! This is the command-line interface for the Site-Capture web archiver.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use site_capture::config::{read_config, validate, Config, Engine};
use site_capture::crawler::{Coordinator, CrawlReport, RetryPolicy, TraversalOrder};
use site_capture::output::{
    archive_directory, prepare_directories, write_markdown_report, OutputLayout, Recompressor,
    ReportContext,
};
use site_capture::render::{
    build_http_client, BrowserRenderer, BrowserSettings, Downloader, HttpRenderer, Renderer,
};
use site_capture::url::{extract_host, normalize_url, ScopePolicy};
use site_capture::{robots, CaptureError};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Exit code after an operator interrupt (128 + SIGINT)
const EXIT_INTERRUPTED: i32 = 130;

const PREMATURE_EXIT_NOTICE: &str =
    "Exiting prematurely. Remember to manually close Chromium processes.";

/// How a run ended when no error escaped it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunStatus {
    Completed,
    DryRun,
    MissingSeed,

    /// Crawl and report done, recompression or archiving failed
    PostProcessingFailed,
}

impl RunStatus {
    fn exit_code(self) -> i32 {
        match self {
            RunStatus::Completed | RunStatus::DryRun => 0,
            RunStatus::MissingSeed | RunStatus::PostProcessingFailed => 1,
        }
    }

    /// The run stopped before the archive step was reached
    fn is_premature(self) -> bool {
        self == RunStatus::MissingSeed
    }
}

/// Site-Capture: a single-origin web archiver
///
/// Site-Capture crawls one website inside a domain whitelist, saves a
/// full-page screenshot and the rendered HTML of every page, downloads
/// linked documents and zips everything into a timestamped backup.
#[derive(Parser, Debug)]
#[command(name = "site-capture")]
#[command(version = "1.0.0")]
#[command(about = "A single-origin web archiver", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// URL to start from; replaces the seeds of the config file
    #[arg(long, env = "URL")]
    url: Option<String>,

    /// Browser viewport width in pixels
    #[arg(long, env = "VIEWPORT_WIDTH")]
    viewport_width: Option<u32>,

    /// Custom Chromium executable
    #[arg(long, env = "CHROME_PATH")]
    chrome_path: Option<PathBuf>,

    /// Directory receiving every captured artifact
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Rendering engine
    #[arg(long, value_enum)]
    engine: Option<Engine>,

    /// Traversal order of the frontier
    #[arg(long, value_enum)]
    order: Option<TraversalOrder>,

    /// Skip the zip archive at the end of the run
    #[arg(long)]
    no_archive: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (code, premature) = tokio::select! {
        result = run(cli) => match result {
            Ok(status) => (status.exit_code(), status.is_premature()),
            Err(e) => {
                tracing::error!("{:#}", e);
                (1, true)
            }
        },
        _ = tokio::signal::ctrl_c() => (EXIT_INTERRUPTED, true),
    };

    if premature {
        tracing::error!("{}", PREMATURE_EXIT_NOTICE);
    }

    std::process::exit(code);
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_capture=info,warn"),
            1 => EnvFilter::new("site_capture=debug,info"),
            2 => EnvFilter::new("site_capture=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads, merges and validates the configuration, then dispatches
async fn run(cli: Cli) -> anyhow::Result<RunStatus> {
    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = read_config(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    apply_overrides(&mut config, &cli);

    if config.crawler.seeds.is_empty() {
        tracing::error!(
            "{}. Provide one like so: URL=https://example.com/ site-capture",
            CaptureError::MissingSeed
        );
        return Ok(RunStatus::MissingSeed);
    }

    if config.crawler.whitelist.is_empty() {
        config.crawler.whitelist = seed_hosts(&config.crawler.seeds);
        tracing::info!("Whitelist defaults to seed hosts: {:?}", config.crawler.whitelist);
    }

    validate(&config)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(RunStatus::DryRun);
    }

    handle_crawl(config, config_hash).await
}

/// Command-line values win over the config file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(url) = &cli.url {
        config.crawler.seeds = vec![url.clone()];
    }
    if let Some(width) = cli.viewport_width {
        config.renderer.viewport_width = width;
    }
    if let Some(path) = &cli.chrome_path {
        config.renderer.chrome_path = Some(path.to_string_lossy().into_owned());
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.to_string_lossy().into_owned();
    }
    if let Some(engine) = cli.engine {
        config.renderer.engine = engine;
    }
    if let Some(order) = cli.order {
        config.crawler.traversal_order = order;
    }
    if cli.no_archive {
        config.output.archive = false;
    }
}

fn seed_hosts(seeds: &[String]) -> Vec<String> {
    let mut hosts: Vec<String> = Vec::new();
    for host in seeds
        .iter()
        .filter_map(|seed| normalize_url(seed).ok())
        .filter_map(|url| extract_host(&url))
    {
        if !hosts.contains(&host) {
            hosts.push(host);
        }
    }
    hosts
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Site-Capture Dry Run ===\n");

    println!("Seeds ({}):", config.crawler.seeds.len());
    for seed in &config.crawler.seeds {
        println!("  - {}", seed);
    }

    println!("\nScope:");
    println!("  Whitelist: {:?}", config.crawler.whitelist);
    println!("  Filetype blacklist: {:?}", config.crawler.filetype_blacklist);
    println!("  Traversal order: {:?}", config.crawler.traversal_order);
    println!("  Expand from robots.txt: {}", config.crawler.expand_seeds);
    println!("  Attempts per URL: {}", config.crawler.max_attempts);
    match config.crawler.max_pages {
        Some(limit) => println!("  Page budget: {}", limit),
        None => println!("  Page budget: unlimited"),
    }

    println!("\nRenderer:");
    println!("  Engine: {:?}", config.renderer.engine);
    println!(
        "  Viewport: {}x{}",
        config.renderer.viewport_width, config.renderer.viewport_height
    );
    println!("  Timeout: {}ms", config.renderer.timeout_ms);
    println!("  Downloads: {:?}", config.renderer.download_extensions);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Recompress screenshots: {}", config.output.recompress);
    println!(
        "  Archive: {}",
        if config.output.archive {
            config.output.archive_directory.as_str()
        } else {
            "disabled"
        }
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: Option<String>) -> anyhow::Result<RunStatus> {
    let started_at = Utc::now();
    let execution_start = Instant::now();
    tracing::info!("site-capture starting...");

    let layout = prepare_directories(Path::new(&config.output.directory))
        .context("Failed to create output directories")?;

    let timeout = Duration::from_millis(config.renderer.timeout_ms);
    let client = build_http_client(config.renderer.user_agent.as_deref(), timeout)?;

    let scope = ScopePolicy::new(
        config.crawler.whitelist.clone(),
        config.crawler.filetype_blacklist.clone(),
    );

    let seeds = config
        .crawler
        .seeds
        .iter()
        .map(|seed| normalize_url(seed))
        .collect::<Result<Vec<Url>, _>>()?;

    let mut all_seeds = seeds.clone();
    if config.crawler.expand_seeds {
        if let Some(origin) = seeds.first() {
            match robots::expand_seeds(&client, origin, &scope).await {
                Ok(extra) => {
                    tracing::info!("Found {} URL(s) in robots.txt and sitemaps", extra.len());
                    all_seeds.extend(extra);
                }
                Err(e) => tracing::warn!("{}", e),
            }
        }
    }

    let report = match config.renderer.engine {
        Engine::Browser => {
            let settings = BrowserSettings {
                viewport_width: config.renderer.viewport_width,
                viewport_height: config.renderer.viewport_height,
                chrome_path: config.renderer.chrome_path.as_ref().map(PathBuf::from),
                timeout,
                cookie_selector: config.renderer.cookie_selector.clone(),
                download_extensions: config.renderer.download_extensions.clone(),
                save_documents: config.renderer.save_documents,
            };
            let downloader = Downloader::new(client.clone(), layout.snapshots.downloads.clone());
            let renderer = BrowserRenderer::new(settings, layout.snapshots.clone(), downloader);
            crawl(renderer, &config, scope, all_seeds).await?
        }
        Engine::Http => {
            let renderer = HttpRenderer::new(
                client.clone(),
                layout.snapshots.clone(),
                config.renderer.download_extensions.clone(),
            );
            crawl(renderer, &config, scope, all_seeds).await?
        }
    };

    report.log_summary();

    let context = ReportContext {
        seeds: config.crawler.seeds.clone(),
        started_at,
        config_hash,
    };
    write_markdown_report(&report, &context, &layout.root).context("Failed to write report")?;

    let post_processing_ok = post_process(&config, &layout).await;

    let secs = execution_start.elapsed().as_secs();
    tracing::info!("Executed in {} min {} sec", secs / 60, secs % 60);

    Ok(if post_processing_ok {
        RunStatus::Completed
    } else {
        RunStatus::PostProcessingFailed
    })
}

async fn crawl<R: Renderer>(
    renderer: R,
    config: &Config,
    scope: ScopePolicy,
    seeds: Vec<Url>,
) -> Result<CrawlReport, CaptureError> {
    let retry = RetryPolicy::new(
        config.crawler.max_attempts,
        Duration::from_millis(config.crawler.retry_delay_ms),
    );

    let mut coordinator = Coordinator::new(renderer, scope, config.crawler.traversal_order)
        .with_retry(retry)
        .with_max_pages(config.crawler.max_pages);
    coordinator.seed(seeds);
    coordinator.run().await
}

/// Recompresses screenshots and archives the output; returns false on any error
async fn post_process(config: &Config, layout: &OutputLayout) -> bool {
    let mut ok = true;
    let mut recompressed = false;

    if config.output.recompress {
        let recompressor = Recompressor::new(&config.output.cwebp_path, config.output.quality);
        match recompressor
            .recompress_dir(&layout.snapshots.screenshots, &layout.images)
            .await
        {
            Ok(summary) if summary.is_clean() => recompressed = true,
            Ok(summary) => {
                tracing::error!(
                    "{} screenshot(s) could not be recompressed",
                    summary.failed.len()
                );
                ok = false;
            }
            Err(e) => {
                tracing::error!("{}", e);
                ok = false;
            }
        }
    }

    if config.output.archive {
        let source = layout.root.clone();
        let destination = PathBuf::from(&config.output.archive_directory);
        let excluded = layout.archive_exclusions(recompressed);
        let archived = tokio::task::spawn_blocking(move || {
            archive_directory(&source, &destination, &excluded, Utc::now())
        })
        .await;

        match archived {
            Ok(Ok(path)) => tracing::info!("Output zipped in {}", path.display()),
            Ok(Err(e)) => {
                tracing::error!("{}", e);
                ok = false;
            }
            Err(e) => {
                tracing::error!("Archive task failed: {}", e);
                ok = false;
            }
        }
    }

    ok
}
