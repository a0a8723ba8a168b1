//! Sitemap XML parsing
//!
//! Handles both `<urlset>` documents (page locations) and `<sitemapindex>`
//! documents (locations of further sitemaps). Only `<loc>` values are read.

use quick_xml::events::Event;
use quick_xml::Reader;

/// Root element of a sitemap document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapKind {
    /// `<urlset>`: locations are pages
    UrlSet,
    /// `<sitemapindex>`: locations are child sitemaps
    Index,
    /// Well-formed XML without a sitemap root
    Unknown,
}

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sitemap {
    pub kind: SitemapKind,
    pub locs: Vec<String>,
}

/// Parses a sitemap body
///
/// # Errors
///
/// Returns the XML error for malformed documents.
pub fn parse_sitemap(xml: &str) -> Result<Sitemap, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut kind = SitemapKind::Unknown;
    let mut locs = Vec::new();
    let mut in_loc = false;
    let mut current = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"urlset" if kind == SitemapKind::Unknown => kind = SitemapKind::UrlSet,
                b"sitemapindex" if kind == SitemapKind::Unknown => kind = SitemapKind::Index,
                b"loc" => {
                    in_loc = true;
                    current.clear();
                }
                _ => {}
            },
            Event::Text(t) if in_loc => current.push_str(&t.unescape()?),
            Event::CData(t) if in_loc => {
                current.push_str(&String::from_utf8_lossy(&t.into_inner()));
            }
            Event::End(e) if e.local_name().as_ref() == b"loc" => {
                in_loc = false;
                let value = current.trim();
                if !value.is_empty() {
                    locs.push(value.to_string());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(Sitemap { kind, locs })
}
