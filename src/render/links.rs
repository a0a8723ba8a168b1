//! HTML link extraction
//!
//! Anchors are read with a real HTML parser. Values are returned raw: no
//! resolution, no scheme filtering. Deciding what is crawlable belongs to
//! the scope policy.

use scraper::{Html, Selector};

/// Returns the `href` attribute of every `<a>` element, in document order
///
/// # Example
///
/// ```
/// use site_capture::render::extract_hrefs;
///
/// let html = r#"<html><body><a href="/page">Link</a><a>none</a></body></html>"#;
/// assert_eq!(extract_hrefs(html), vec!["/page".to_string()]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .collect()
}
