//! Zip archiving of the output directory

use crate::CaptureError;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Archive file name for a run finishing at `now`
///
/// Colons are replaced so the name is valid on every filesystem.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use site_capture::output::archive_file_name;
///
/// let now = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
/// assert_eq!(archive_file_name(now), "backup-2024-03-05T14-07-09Z.zip");
/// ```
pub fn archive_file_name(now: DateTime<Utc>) -> String {
    format!("backup-{}.zip", now.format("%Y-%m-%dT%H-%M-%SZ"))
}

/// Packs `source` into `<destination>/backup-<timestamp>.zip`
///
/// Entries are stored under the source directory's own name, deflated, in
/// sorted order. Directories listed in `excluded` are skipped with their
/// contents. If the destination lies inside `source`, the archive being
/// written is left out of itself.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written archive
/// * `Err(CaptureError)` - Reading the tree or writing the archive failed
pub fn archive_directory(
    source: &Path,
    destination: &Path,
    excluded: &[PathBuf],
    now: DateTime<Utc>,
) -> Result<PathBuf, CaptureError> {
    std::fs::create_dir_all(destination)?;
    let archive_path = destination.join(archive_file_name(now));

    let root_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());

    let mut files = Vec::new();
    collect_files(source, excluded, &mut files)?;
    files.sort();

    let mut zip = ZipWriter::new(File::create(&archive_path)?);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let skip = archive_path.canonicalize().ok();
    let mut entries = 0usize;

    for path in files {
        if skip.is_some() && path.canonicalize().ok() == skip {
            continue;
        }

        let relative = path.strip_prefix(source).unwrap_or(&path);
        let name = std::iter::once(root_name.clone())
            .chain(
                relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned()),
            )
            .collect::<Vec<_>>()
            .join("/");

        zip.start_file(name, options)?;
        let mut file = File::open(&path)?;
        io::copy(&mut file, &mut zip)?;
        entries += 1;
    }

    zip.finish()?;

    tracing::info!(
        "Archived {} file(s) from {} into {}",
        entries,
        source.display(),
        archive_path.display()
    );

    Ok(archive_path)
}

fn collect_files(dir: &Path, excluded: &[PathBuf], files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            if excluded.contains(&path) {
                tracing::debug!("Leaving {} out of the archive", path.display());
                continue;
            }
            collect_files(&path, excluded, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}
