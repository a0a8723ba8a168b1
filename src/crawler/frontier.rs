//! Crawl frontier: pending, visited and broken URLs
//!
//! This module owns the three collections that describe a run:
//! - Pending: URLs known but not yet attempted, without duplicates
//! - Visited: URLs already taken off the frontier, success or failure
//! - Broken: URLs whose render failed terminally, in failure order
//!
//! Invariants held after every public call:
//! - Pending and Visited are disjoint
//! - a visited URL is never pending again
//! - every broken URL is visited

use crate::render::RenderFailure;
use serde::Deserialize;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Order in which pending URLs leave the frontier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalOrder {
    /// Last discovered first (depth-first)
    #[default]
    Stack,
    /// First discovered first (breadth-first)
    Queue,
}

/// A URL whose capture failed, with the reason kept for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenUrl {
    pub url: Url,
    pub reason: RenderFailure,
}

/// Pending/Visited/Broken sets for one crawl run
#[derive(Debug)]
pub struct Frontier {
    order: TraversalOrder,

    /// Pending URLs in insertion order
    pending: VecDeque<Url>,

    /// Membership index over `pending`
    pending_set: HashSet<Url>,

    /// Visited URLs in visit order
    visited: Vec<Url>,

    /// Membership index over `visited`
    visited_set: HashSet<Url>,

    broken: Vec<BrokenUrl>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new(order: TraversalOrder) -> Self {
        Self {
            order,
            pending: VecDeque::new(),
            pending_set: HashSet::new(),
            visited: Vec::new(),
            visited_set: HashSet::new(),
            broken: Vec::new(),
        }
    }

    pub fn order(&self) -> TraversalOrder {
        self.order
    }

    /// Adds seed URLs; returns how many were actually new
    pub fn seed<I>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = Url>,
    {
        self.extend(urls)
    }

    /// Adds one URL to Pending unless it is already pending or visited
    ///
    /// # Returns
    ///
    /// * `true` - The URL was added
    /// * `false` - The URL was already known
    pub fn push(&mut self, url: Url) -> bool {
        if self.visited_set.contains(&url) || self.pending_set.contains(&url) {
            return false;
        }
        self.pending_set.insert(url.clone());
        self.pending.push_back(url);
        true
    }

    /// Adds every URL through [`Frontier::push`]; returns how many were new
    pub fn extend<I>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = Url>,
    {
        urls.into_iter().filter(|url| self.push(url.clone())).count()
    }

    /// Takes the next URL and records it as visited
    ///
    /// The URL is in Visited before it is returned, so a caller that fails
    /// while handling it can never cause it to be queued again.
    ///
    /// * `Stack` pops the most recently added URL
    /// * `Queue` pops the oldest URL
    pub fn pop(&mut self) -> Option<Url> {
        let url = match self.order {
            TraversalOrder::Stack => self.pending.pop_back(),
            TraversalOrder::Queue => self.pending.pop_front(),
        }?;

        self.pending_set.remove(&url);
        self.visited_set.insert(url.clone());
        self.visited.push(url.clone());
        Some(url)
    }

    /// Records a visited URL as broken
    ///
    /// # Returns
    ///
    /// * `true` - The URL was appended to Broken
    /// * `false` - The URL was never visited or is already broken
    pub fn mark_broken(&mut self, url: &Url, reason: RenderFailure) -> bool {
        if !self.visited_set.contains(url) || self.is_broken(url) {
            return false;
        }
        self.broken.push(BrokenUrl {
            url: url.clone(),
            reason,
        });
        true
    }

    /// Returns true once nothing is left to visit
    pub fn is_done(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_pending(&self, url: &Url) -> bool {
        self.pending_set.contains(url)
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited_set.contains(url)
    }

    pub fn is_broken(&self, url: &Url) -> bool {
        self.broken.iter().any(|b| &b.url == url)
    }

    /// Returns true if the URL is pending or visited
    pub fn contains(&self, url: &Url) -> bool {
        self.is_pending(url) || self.is_visited(url)
    }

    /// Visited URLs in visit order
    pub fn visited(&self) -> &[Url] {
        &self.visited
    }

    /// Broken URLs in failure order
    pub fn broken(&self) -> &[BrokenUrl] {
        &self.broken
    }

    /// Empties Pending without visiting, in the order they would have been taken
    pub fn drain_pending(&mut self) -> Vec<Url> {
        self.pending_set.clear();
        let drained: Vec<Url> = self.pending.drain(..).collect();
        match self.order {
            TraversalOrder::Stack => drained.into_iter().rev().collect(),
            TraversalOrder::Queue => drained,
        }
    }

    /// Consumes the frontier, returning visited and broken lists
    pub fn into_parts(self) -> (Vec<Url>, Vec<BrokenUrl>) {
        (self.visited, self.broken)
    }
}
