//! Screenshot recompression through the external `cwebp` encoder

use crate::CaptureError;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Outcome of one recompression pass
#[derive(Debug, Default)]
pub struct RecompressSummary {
    /// WebP files written
    pub converted: Vec<PathBuf>,

    /// Inputs that could not be encoded, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl RecompressSummary {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Lossy WebP encoder settings
#[derive(Debug, Clone)]
pub struct Recompressor {
    /// Encoder executable, resolved through `PATH` when not absolute
    pub cwebp: PathBuf,

    /// Quality factor (0-100)
    pub quality: u8,
}

impl Recompressor {
    pub fn new(cwebp: impl Into<PathBuf>, quality: u8) -> Self {
        Self {
            cwebp: cwebp.into(),
            quality,
        }
    }

    /// Encodes every `*.png` in `source` as `<name>.png.webp` in `destination`
    ///
    /// A file that fails to encode is logged and skipped; the pass carries on
    /// with the rest.
    ///
    /// # Errors
    ///
    /// Only when `source` cannot be listed or `destination` cannot be created.
    pub async fn recompress_dir(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<RecompressSummary, CaptureError> {
        tokio::fs::create_dir_all(destination).await?;

        let mut inputs = Vec::new();
        let mut entries = tokio::fs::read_dir(source).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_png = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("png"))
                .unwrap_or(false);
            if is_png && entry.file_type().await?.is_file() {
                inputs.push(path);
            }
        }
        inputs.sort();

        tracing::info!("Recompressing {} screenshot(s)", inputs.len());

        let mut summary = RecompressSummary::default();
        for input in inputs {
            let Some(file_name) = input.file_name() else {
                continue;
            };
            let output = destination.join(format!("{}.webp", file_name.to_string_lossy()));

            match self.encode(&input, &output).await {
                Ok(()) => {
                    tracing::debug!("Compressed {}", input.display());
                    summary.converted.push(output);
                }
                Err(reason) => {
                    tracing::error!("Error compressing {}: {}", input.display(), reason);
                    summary.failed.push((input, reason));
                }
            }
        }

        tracing::info!(
            "Finished recompression: {} converted, {} failed",
            summary.converted.len(),
            summary.failed.len()
        );

        Ok(summary)
    }

    async fn encode(&self, input: &Path, output: &Path) -> Result<(), String> {
        let result = Command::new(&self.cwebp)
            .arg("-quiet")
            .arg("-q")
            .arg(self.quality.to_string())
            .arg(input)
            .arg("-o")
            .arg(output)
            .output()
            .await
            .map_err(|e| format!("failed to run {}: {}", self.cwebp.display(), e))?;

        if result.status.success() {
            Ok(())
        } else {
            Err(format!(
                "{} exited with {}: {}",
                self.cwebp.display(),
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            ))
        }
    }
}
