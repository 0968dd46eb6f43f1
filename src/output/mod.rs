//! Output module for reporting crawl results
//!
//! This module handles:
//! - Summarizing a crawl result into statistics
//! - Printing the summary to stdout
//! - Writing a markdown report

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_summary, write_markdown_summary};
pub use stats::{print_statistics, CrawlStatistics};

use crate::state::CrawlResult;

/// Prints a crawl result to stdout: statistics, then every failed URL
pub fn print_summary(result: &CrawlResult) {
    print_statistics(&CrawlStatistics::from_result(result));

    if !result.errors.is_empty() {
        println!("\nFailed URLs:");
        for url in result.failed_urls() {
            if let Some(error) = result.errors.get(url) {
                println!("  - {}: {}", url, error);
            }
        }
    }
}
