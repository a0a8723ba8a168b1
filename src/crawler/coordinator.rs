//! Crawl coordinator - main traversal loop
//!
//! The coordinator owns the frontier and the renderer. One URL is in flight
//! at a time:
//! - pop the next URL (it is Visited from then on)
//! - render it, retrying transient failures per the retry policy
//! - on failure record it as Broken and move on
//! - on success resolve its hrefs through the scope policy and push the new
//!   ones to Pending
//!
//! The renderer session is closed on every exit path of [`Coordinator::run`].

use crate::crawler::frontier::{BrokenUrl, Frontier, TraversalOrder};
use crate::crawler::retry::RetryPolicy;
use crate::render::{RenderOutcome, Renderer};
use crate::url::ScopePolicy;
use crate::CaptureError;
use std::time::{Duration, Instant};
use url::Url;

/// Pages between two progress log lines
const PROGRESS_INTERVAL: usize = 10;

/// Result of one completed crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Every URL taken off the frontier, in visit order
    pub visited: Vec<Url>,

    /// URLs whose capture failed, with reasons, in failure order
    pub broken: Vec<BrokenUrl>,

    /// URLs left pending because the page budget was reached
    pub pending_at_stop: Vec<Url>,

    pub pages_succeeded: usize,

    pub elapsed: Duration,
}

impl CrawlReport {
    /// Returns true if the page budget cut the crawl short
    pub fn was_truncated(&self) -> bool {
        !self.pending_at_stop.is_empty()
    }

    /// Logs the visited and broken lists
    pub fn log_summary(&self) {
        tracing::info!(
            "Visited {} URL(s), {} succeeded, {} broken",
            self.visited.len(),
            self.pages_succeeded,
            self.broken.len()
        );
        for url in &self.visited {
            tracing::debug!("Visited: {}", url);
        }
        for entry in &self.broken {
            tracing::warn!("Broken: {} ({})", entry.url, entry.reason.label());
        }
        if self.was_truncated() {
            tracing::warn!(
                "Page budget reached, {} URL(s) were not visited",
                self.pending_at_stop.len()
            );
        }
    }
}

/// Main crawl coordinator
pub struct Coordinator<R: Renderer> {
    renderer: R,
    scope: ScopePolicy,
    frontier: Frontier,
    retry: RetryPolicy,
    max_pages: Option<usize>,
}

impl<R: Renderer> Coordinator<R> {
    /// Creates a coordinator with an empty frontier
    pub fn new(renderer: R, scope: ScopePolicy, order: TraversalOrder) -> Self {
        Self {
            renderer,
            scope,
            frontier: Frontier::new(order),
            retry: RetryPolicy::default(),
            max_pages: None,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Stops the crawl once this many URLs have been visited
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Adds starting URLs; returns how many were new
    ///
    /// Seeds are taken as given: the scope policy only governs discovered
    /// links.
    pub fn seed<I>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = Url>,
    {
        self.frontier.seed(urls)
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Runs the crawl to completion
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Pending emptied or the page budget was reached
    /// * `Err(CaptureError)` - The renderer reported an environment failure
    pub async fn run(mut self) -> Result<CrawlReport, CaptureError> {
        tracing::info!(
            "Starting crawl with {} seed(s), {:?} order",
            self.frontier.pending_len(),
            self.frontier.order()
        );

        let start_time = Instant::now();
        let result = self.crawl_loop(start_time).await;

        self.renderer.close().await;
        let pages_succeeded = result?;

        let pending_at_stop = self.frontier.drain_pending();
        let (visited, broken) = self.frontier.into_parts();

        Ok(CrawlReport {
            visited,
            broken,
            pending_at_stop,
            pages_succeeded,
            elapsed: start_time.elapsed(),
        })
    }

    async fn crawl_loop(&mut self, start_time: Instant) -> Result<usize, CaptureError> {
        let mut pages_succeeded = 0;

        loop {
            if let Some(limit) = self.max_pages {
                if self.frontier.visited_len() >= limit {
                    tracing::info!("Reached the limit of {} page(s)", limit);
                    break;
                }
            }

            let Some(url) = self.frontier.pop() else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            tracing::info!("Pending {} URL(s)", self.frontier.pending_len());
            tracing::info!("Visiting {}", url);

            match self.render_with_retry(&url).await? {
                RenderOutcome::Success(document) => {
                    pages_succeeded += 1;
                    let discovered = self.scope.resolve(&document.hrefs, &url);
                    let added = self.frontier.extend(discovered);
                    tracing::debug!(
                        "{} href(s) on {}, {} new URL(s)",
                        document.hrefs.len(),
                        url,
                        added
                    );
                }
                RenderOutcome::Failure(reason) => {
                    tracing::warn!("Failed to capture {}: {}", url, reason);
                    self.frontier.mark_broken(&url, reason);
                }
            }

            let visited = self.frontier.visited_len();
            if visited % PROGRESS_INTERVAL == 0 {
                let rate = visited as f64 / start_time.elapsed().as_secs_f64().max(0.001);
                tracing::info!(
                    "Progress: {} visited, {} broken, {} pending, {:.2} pages/sec",
                    visited,
                    self.frontier.broken().len(),
                    self.frontier.pending_len(),
                    rate
                );
            }
        }

        Ok(pages_succeeded)
    }

    async fn render_with_retry(&mut self, url: &Url) -> Result<RenderOutcome, CaptureError> {
        let mut attempt = 1;
        loop {
            let outcome = self.renderer.render(url).await?;

            match outcome.failure() {
                Some(reason) if self.retry.should_retry(attempt, reason) => {
                    tracing::warn!(
                        "Attempt {}/{} for {} failed ({}), retrying",
                        attempt,
                        self.retry.max_attempts,
                        url,
                        reason
                    );
                    tokio::time::sleep(self.retry.delay).await;
                    attempt += 1;
                }
                _ => return Ok(outcome),
            }
        }
    }
}
