use crate::UrlError;
use url::Url;

/// Normalizes a URL according to Site-Capture's normalization rules
///
/// This is the single definition of URL identity used by the scope filter,
/// the seed loader and the frontier's membership checks.
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or relative
/// 2. Reject schemes other than HTTP and HTTPS
/// 3. Reject URLs without a host
/// 4. Remove the fragment (everything after #)
///
/// Everything else is left as the `url` crate serializes it: the host is
/// lowercased and an empty path becomes `/`, but trailing slashes, `www.`
/// prefixes and query strings are kept verbatim.
///
/// # Examples
///
/// ```
/// use site_capture::url::normalize_url;
///
/// let url = normalize_url("https://Example.com/About#team").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/About");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}
