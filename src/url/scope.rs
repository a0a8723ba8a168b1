use crate::url::normalize::normalize_url;
use std::collections::HashSet;
use url::Url;

/// Whitelist/blacklist pair governing which discovered URLs are crawled
///
/// The policy is immutable for the duration of a run.
///
/// * `whitelist` - a URL is in scope only if its hostname contains at least
///   one of these substrings. An empty whitelist admits nothing.
/// * `filetype_blacklist` - case-insensitive suffixes; a URL whose path ends
///   with one of them is excluded even when whitelisted.
///
/// Suffixes are matched against the URL path only, so a query value such as
/// `?format=pdf` never triggers a `pdf` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopePolicy {
    whitelist: Vec<String>,
    filetype_blacklist: Vec<String>,
}

impl ScopePolicy {
    /// Creates a policy; entries are lowercased once here
    ///
    /// Hosts come out of the `url` crate lowercased, so a whitelist entry
    /// such as `Example.com` must be folded to match them.
    pub fn new(whitelist: Vec<String>, filetype_blacklist: Vec<String>) -> Self {
        Self {
            whitelist: whitelist
                .into_iter()
                .map(|entry| entry.to_lowercase())
                .collect(),
            filetype_blacklist: filetype_blacklist
                .into_iter()
                .map(|suffix| suffix.to_lowercase())
                .collect(),
        }
    }

    pub fn whitelist(&self) -> &[String] {
        &self.whitelist
    }

    pub fn filetype_blacklist(&self) -> &[String] {
        &self.filetype_blacklist
    }

    /// Returns true if the URL's hostname contains a whitelist substring
    pub fn is_whitelisted(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => self.whitelist.iter().any(|entry| host.contains(entry.as_str())),
            None => false,
        }
    }

    /// Returns true if the URL's lowercased path ends with a blacklisted suffix
    pub fn is_blacklisted(&self, url: &Url) -> bool {
        path_has_suffix(url, &self.filetype_blacklist)
    }

    /// Returns true if the URL may enter the frontier (blacklist wins)
    pub fn admits(&self, url: &Url) -> bool {
        self.is_whitelisted(url) && !self.is_blacklisted(url)
    }

    /// Turns raw hrefs found on `page` into deduplicated in-scope URLs
    ///
    /// # Resolution Rules
    ///
    /// - An href starting with `/` is appended to the origin
    ///   (scheme, host and port) of `page`.
    /// - Every other href is taken literally. Relative forms such as `../x`
    ///   or `x/y` are not resolved and are dropped when they fail to parse.
    /// - Candidates that fail normalization are dropped silently.
    /// - Out-of-scope candidates are dropped silently.
    ///
    /// The output keeps the order of first occurrence.
    ///
    /// # Examples
    ///
    /// ```
    /// use site_capture::url::ScopePolicy;
    /// use url::Url;
    ///
    /// let scope = ScopePolicy::new(vec!["example.com".into()], vec!["pdf".into()]);
    /// let page = Url::parse("https://example.com/").unwrap();
    /// let hrefs = vec![
    ///     "/about".to_string(),
    ///     "https://example.com/report.pdf".to_string(),
    ///     "https://other.com/x".to_string(),
    ///     "/about".to_string(),
    /// ];
    ///
    /// let resolved = scope.resolve(&hrefs, &page);
    /// assert_eq!(resolved.len(), 1);
    /// assert_eq!(resolved[0].as_str(), "https://example.com/about");
    /// ```
    pub fn resolve(&self, hrefs: &[String], page: &Url) -> Vec<Url> {
        let origin = page.origin().ascii_serialization();
        let mut seen = HashSet::new();
        let mut resolved = Vec::new();

        for href in hrefs {
            let candidate = make_absolute(href, &origin);

            let url = match normalize_url(&candidate) {
                Ok(url) => url,
                Err(e) => {
                    tracing::trace!("Dropping href {}: {}", href, e);
                    continue;
                }
            };

            if !self.admits(&url) {
                tracing::trace!("Out of scope: {}", url);
                continue;
            }

            if seen.insert(url.clone()) {
                resolved.push(url);
            }
        }

        resolved
    }
}

/// Prefixes root-relative hrefs with the page origin; leaves the rest alone
fn make_absolute(href: &str, origin: &str) -> String {
    let href = href.trim();
    if href.starts_with('/') {
        format!("{}{}", origin, href)
    } else {
        href.to_string()
    }
}

/// Returns true if the URL path ends with any of `suffixes`, ignoring case
pub fn path_has_suffix(url: &Url, suffixes: &[String]) -> bool {
    let path = url.path().to_lowercase();
    suffixes
        .iter()
        .any(|suffix| path.ends_with(&suffix.to_lowercase()))
}
