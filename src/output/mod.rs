//! Output module: directory layout and post-crawl processing
//!
//! This module handles:
//! - Creating the output directory tree
//! - Writing the markdown crawl report
//! - Recompressing screenshots as WebP
//! - Packing the output directory into a zip archive

mod archive;
mod images;
mod report;

pub use archive::{archive_directory, archive_file_name};
pub use images::{RecompressSummary, Recompressor};
pub use report::{format_markdown_report, write_markdown_report, ReportContext, REPORT_FILE_NAME};

use crate::render::SnapshotDirs;
use std::path::{Path, PathBuf};

/// Directory tree of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,

    /// Where renderers write screenshots, pages and downloads
    pub snapshots: SnapshotDirs,

    /// Recompressed WebP images
    pub images: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            snapshots: SnapshotDirs::under(&root),
            images: root.join("images"),
            root,
        }
    }

    /// Directories the backup archive leaves out
    ///
    /// Once every screenshot has a WebP copy under `images/`, the raw PNGs
    /// are not archived.
    pub fn archive_exclusions(&self, screenshots_recompressed: bool) -> Vec<PathBuf> {
        if screenshots_recompressed {
            vec![self.snapshots.screenshots.clone()]
        } else {
            Vec::new()
        }
    }
}

/// Creates `screenshots/`, `pages/`, `downloads/` and `images/` under `root`
pub fn prepare_directories(root: &Path) -> std::io::Result<OutputLayout> {
    let layout = OutputLayout::new(root);
    layout.snapshots.ensure()?;
    std::fs::create_dir_all(&layout.images)?;
    tracing::debug!("Output directories ready under {}", root.display());
    Ok(layout)
}
