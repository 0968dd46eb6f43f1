//! Markdown summary generation
//!
//! This module renders a crawl result as a human-readable markdown report:
//! overall statistics, downloaded URLs and failures.

use crate::output::stats::CrawlStatistics;
use crate::state::CrawlResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown summary of `result` to `output_path`
///
/// # Arguments
///
/// * `result` - The crawl result
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(io::Error)` - Failed to write summary
pub fn write_markdown_summary(result: &CrawlResult, output_path: &Path) -> std::io::Result<()> {
    let markdown = format_markdown_summary(result);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl result as markdown
///
/// URLs are listed in sorted order so the same result always renders the
/// same report.
pub fn format_markdown_summary(result: &CrawlResult) -> String {
    let stats = CrawlStatistics::from_result(result);
    let mut md = String::new();

    md.push_str("# wavecrawl Summary\n\n");

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Downloaded**: {}\n", stats.downloaded));
    md.push_str(&format!("- **Failed**: {}\n", stats.failed));
    md.push_str(&format!("- **Unique Hosts**: {}\n", stats.unique_hosts));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        stats.success_rate()
    ));

    if !stats.errors_by_kind.is_empty() {
        md.push_str("## Errors by Kind\n\n");
        md.push_str("| Kind | Count |\n");
        md.push_str("|------|-------|\n");
        for (kind, count) in &stats.errors_by_kind {
            md.push_str(&format!("| {} | {} |\n", kind, count));
        }
        md.push('\n');
    }

    md.push_str("## Downloaded\n\n");
    if result.downloaded.is_empty() {
        md.push_str("_None_\n\n");
    } else {
        for url in &result.downloaded {
            md.push_str(&format!("- {}\n", url));
        }
        md.push('\n');
    }

    md.push_str("## Failed\n\n");
    if result.errors.is_empty() {
        md.push_str("_None_\n");
    } else {
        for url in result.failed_urls() {
            if let Some(error) = result.errors.get(url) {
                md.push_str(&format!("- {}: {}\n", url, error));
            }
        }
    }

    md
}
