//! Seed expansion from robots.txt and sitemaps
//!
//! Before the crawl starts, the origin's robots.txt is fetched. Every
//! `Disallow` path becomes a candidate URL, and every declared sitemap is
//! expanded (indexes recursively) into its page locations. Candidates go
//! through the same scope filter as discovered links.

mod parser;
mod sitemap;

pub use parser::RobotsDirectives;
pub use sitemap::{parse_sitemap, Sitemap, SitemapKind};

use crate::url::ScopePolicy;
use crate::CaptureError;
use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// How many sitemap indexes may be nested below a robots.txt declaration
pub const MAX_SITEMAP_DEPTH: usize = 3;

/// Upper bound on sitemap documents fetched in one expansion
pub const MAX_SITEMAPS: usize = 50;

/// Discovers additional seeds for the origin of `seed`
///
/// # Returns
///
/// * `Ok(Vec<Url>)` - In-scope URLs, deduplicated, disallowed paths first
/// * `Err(CaptureError::SeedExpansionFailed)` - robots.txt was unreachable
///
/// A sitemap that cannot be fetched or parsed is skipped with a warning; it
/// does not fail the expansion.
pub async fn expand_seeds(
    client: &Client,
    seed: &Url,
    scope: &ScopePolicy,
) -> Result<Vec<Url>, CaptureError> {
    let origin = seed.origin().ascii_serialization();
    let robots_url = format!("{}/robots.txt", origin);

    let body = fetch_text(client, &robots_url)
        .await
        .map_err(|reason| CaptureError::SeedExpansionFailed {
            origin: origin.clone(),
            reason,
        })?;

    let directives = RobotsDirectives::parse(&body);
    tracing::debug!(
        "robots.txt for {}: {} disallow path(s), {} sitemap(s)",
        origin,
        directives.disallowed.len(),
        directives.sitemaps.len()
    );

    // Disallow paths are root-relative, so resolving against the seed
    // prefixes them with the origin
    let mut candidates = directives.disallowed.clone();
    candidates.extend(collect_sitemap_locs(client, &directives.sitemaps).await);

    Ok(scope.resolve(&candidates, seed))
}

/// Walks sitemap declarations breadth-first and returns page locations
async fn collect_sitemap_locs(client: &Client, roots: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut queue: VecDeque<(String, usize)> = roots.iter().map(|r| (r.clone(), 0)).collect();
    let mut locs = Vec::new();

    while let Some((sitemap_url, depth)) = queue.pop_front() {
        if seen.contains(&sitemap_url) {
            continue;
        }
        if seen.len() >= MAX_SITEMAPS {
            tracing::warn!("Sitemap limit of {} reached, skipping the rest", MAX_SITEMAPS);
            break;
        }
        seen.insert(sitemap_url.clone());

        let body = match fetch_text(client, &sitemap_url).await {
            Ok(body) => body,
            Err(reason) => {
                tracing::warn!("Skipping sitemap {}: {}", sitemap_url, reason);
                continue;
            }
        };

        let sitemap = match parse_sitemap(&body) {
            Ok(sitemap) => sitemap,
            Err(e) => {
                tracing::warn!("Skipping sitemap {}: {}", sitemap_url, e);
                continue;
            }
        };

        match sitemap.kind {
            SitemapKind::UrlSet => locs.extend(sitemap.locs),
            SitemapKind::Index if depth < MAX_SITEMAP_DEPTH => {
                queue.extend(sitemap.locs.into_iter().map(|loc| (loc, depth + 1)));
            }
            SitemapKind::Index => {
                tracing::warn!("Sitemap index {} nested too deep, ignored", sitemap_url);
            }
            SitemapKind::Unknown => {
                tracing::warn!("{} is not a sitemap document", sitemap_url);
            }
        }
    }

    locs
}

async fn fetch_text(client: &Client, url: &str) -> Result<String, String> {
    let response = client.get(url).send().await.map_err(|e| e.to_string())?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {}", status.as_u16()));
    }

    response.text().await.map_err(|e| e.to_string())
}
