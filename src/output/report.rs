//! Markdown crawl report
//!
//! Written as `report.md` in the output directory so the report travels
//! inside the archive with the artifacts it describes.

use crate::crawler::CrawlReport;
use chrono::{DateTime, Utc};
use std::path::Path;

/// File name of the report inside the output directory
pub const REPORT_FILE_NAME: &str = "report.md";

/// Run metadata shown at the top of the report
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub seeds: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub config_hash: Option<String>,
}

/// Writes the report to `<output_dir>/report.md`
pub fn write_markdown_report(
    report: &CrawlReport,
    context: &ReportContext,
    output_dir: &Path,
) -> std::io::Result<()> {
    let path = output_dir.join(REPORT_FILE_NAME);
    std::fs::write(&path, format_markdown_report(report, context))?;
    tracing::info!("Report written to {}", path.display());
    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_report(report: &CrawlReport, context: &ReportContext) -> String {
    let mut md = String::new();

    md.push_str("# Site Capture Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!(
        "- **Started**: {}\n",
        context.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    let secs = report.elapsed.as_secs();
    md.push_str(&format!(
        "- **Duration**: {} min {} sec\n",
        secs / 60,
        secs % 60
    ));
    for seed in &context.seeds {
        md.push_str(&format!("- **Seed**: {}\n", seed));
    }
    if let Some(hash) = &context.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Visited | {} |\n", report.visited.len()));
    md.push_str(&format!("| Captured | {} |\n", report.pages_succeeded));
    md.push_str(&format!("| Broken | {} |\n", report.broken.len()));
    md.push_str(&format!(
        "| Not visited (budget) | {} |\n\n",
        report.pending_at_stop.len()
    ));

    // Broken URLs
    if !report.broken.is_empty() {
        md.push_str("## Broken URLs\n\n");
        md.push_str("| URL | Reason |\n");
        md.push_str("|-----|--------|\n");
        for entry in &report.broken {
            md.push_str(&format!("| {} | {} |\n", entry.url, entry.reason));
        }
        md.push('\n');
    }

    md.push_str("## Visited URLs\n\n");
    for url in &report.visited {
        md.push_str(&format!("- {}\n", url));
    }
    md.push('\n');

    if !report.pending_at_stop.is_empty() {
        md.push_str("## Not Visited\n\n");
        md.push_str("The page budget was reached before these URLs were visited.\n\n");
        for url in &report.pending_at_stop {
            md.push_str(&format!("- {}\n", url));
        }
        md.push('\n');
    }

    md
}
