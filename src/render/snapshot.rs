//! Snapshot naming and locations
//!
//! File names are derived from the URL alone, so the same page always lands
//! on the same file across runs.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use url::Url;

/// Longest file stem derived from a URL, in characters
pub const MAX_URL_FILENAME_LENGTH: usize = 100;

/// Length of the hash suffix appended to rewritten or truncated stems
const HASH_SUFFIX_LENGTH: usize = 8;

/// Characters that are not portable in file names
const RESERVED_CHARS: &[char] = &[':', '*', '?', '"', '<', '>', '|', '\0'];

/// Directories receiving per-URL artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotDirs {
    /// Full-page screenshots (`.png`)
    pub screenshots: PathBuf,

    /// Rendered documents (`.html`)
    pub pages: PathBuf,

    /// Binary downloads
    pub downloads: PathBuf,
}

impl SnapshotDirs {
    /// Standard layout under an output root
    pub fn under(root: &Path) -> Self {
        Self {
            screenshots: root.join("screenshots"),
            pages: root.join("pages"),
            downloads: root.join("downloads"),
        }
    }

    /// Creates every directory that does not exist yet
    pub fn ensure(&self) -> std::io::Result<()> {
        for dir in [&self.screenshots, &self.pages, &self.downloads] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn screenshot_path(&self, url: &Url) -> PathBuf {
        self.screenshots.join(snapshot_file_name(url.as_str(), "png"))
    }

    pub fn page_path(&self, url: &Url) -> PathBuf {
        self.pages.join(snapshot_file_name(url.as_str(), "html"))
    }
}

/// Derives a snapshot file name from a URL or label
///
/// Path separators become `--` and other reserved characters become `_`.
/// Whenever that rewrite is lossy (a character was replaced, or the input
/// already contains `--` or `_`) or the stem exceeds
/// [`MAX_URL_FILENAME_LENGTH`] characters, the stem ends with `-` and eight
/// hex digits of the SHA-256 of the input. Distinct inputs therefore never
/// share a name; plain labels such as `cookie` stay readable.
///
/// # Examples
///
/// ```
/// use site_capture::render::snapshot_file_name;
///
/// assert_eq!(
///     snapshot_file_name("https://example.com/about", "png"),
///     "https_----example.com--about-746af0ce.png"
/// );
/// assert_eq!(snapshot_file_name("cookie", "png"), "cookie.png");
/// ```
pub fn snapshot_file_name(source: &str, extension: &str) -> String {
    let sanitized = sanitize(source);

    let lossy = sanitized != source || source.contains("--") || source.contains('_');
    let stem = if lossy || sanitized.chars().count() > MAX_URL_FILENAME_LENGTH {
        let keep = MAX_URL_FILENAME_LENGTH - HASH_SUFFIX_LENGTH - 1;
        let prefix: String = sanitized.chars().take(keep).collect();
        format!("{}-{}", prefix, short_hash(source, HASH_SUFFIX_LENGTH))
    } else {
        sanitized
    };

    format!("{}.{}", stem, extension)
}

/// Path a binary download is written to
///
/// `<dir>/<16 hex of SHA-256(url)>-<last path segment>`; the hash keeps two
/// `report.pdf` files from different folders apart.
pub fn download_path(dir: &Path, url: &Url) -> PathBuf {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .unwrap_or("index");

    dir.join(format!("{}-{}", short_hash(url.as_str(), 16), sanitize(segment)))
}

fn sanitize(source: &str) -> String {
    source
        .chars()
        .flat_map(|c| match c {
            '/' | '\\' => vec!['-', '-'],
            c if RESERVED_CHARS.contains(&c) || c.is_control() => vec!['_'],
            c => vec![c],
        })
        .collect()
}

fn short_hash(input: &str, len: usize) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(len);
    encoded
}
