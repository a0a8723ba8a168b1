//! URL handling module for Site-Capture
//!
//! This module provides the single URL normalization used for identity and
//! deduplication, and the scope policy that resolves raw hrefs and rejects
//! out-of-scope or malformed ones.

mod normalize;
mod scope;

// Re-export main functions
pub use normalize::normalize_url;
pub use scope::{path_has_suffix, ScopePolicy};

use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_capture::url::extract_host;
///
/// let url = Url::parse("https://Blog.Example.com/post").unwrap();
/// assert_eq!(extract_host(&url), Some("blog.example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_host_with_port() {
        let url = Url::parse("https://example.com:8080/").unwrap();
        assert_eq!(extract_host(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_host_ip() {
        let url = Url::parse("http://127.0.0.1:3000/").unwrap();
        assert_eq!(extract_host(&url), Some("127.0.0.1".to_string()));
    }
}
