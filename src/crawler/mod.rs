//! Crawler module: frontier and traversal
//!
//! This module contains the core crawling logic, including:
//! - The frontier of pending, visited and broken URLs
//! - The retry policy applied to failed renders
//! - The coordinator driving a renderer until the frontier is empty

mod coordinator;
mod frontier;
mod retry;

pub use coordinator::{Coordinator, CrawlReport};
pub use frontier::{BrokenUrl, Frontier, TraversalOrder};
pub use retry::RetryPolicy;
