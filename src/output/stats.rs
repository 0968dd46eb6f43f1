//! Statistics derived from a crawl result
//!
//! This module provides functionality for summarizing a `CrawlResult` and
//! displaying the summary on stdout.

use crate::state::CrawlResult;
use crate::url::extract_host;
use std::collections::{BTreeMap, BTreeSet};

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Number of URLs downloaded successfully
    pub downloaded: usize,

    /// Number of URLs that failed
    pub failed: usize,

    /// Distinct hosts among all reported URLs
    pub unique_hosts: usize,

    /// Count of failures per error kind
    pub errors_by_kind: BTreeMap<&'static str, usize>,
}

impl CrawlStatistics {
    /// Computes statistics for `result`
    pub fn from_result(result: &CrawlResult) -> Self {
        let mut errors_by_kind = BTreeMap::new();
        for error in result.errors.values() {
            *errors_by_kind.entry(error.kind()).or_insert(0) += 1;
        }

        let unique_hosts = result
            .downloaded
            .iter()
            .chain(result.errors.keys())
            .filter_map(|url| extract_host(url).ok())
            .collect::<BTreeSet<_>>()
            .len();

        Self {
            downloaded: result.downloaded.len(),
            failed: result.errors.len(),
            unique_hosts,
            errors_by_kind,
        }
    }

    /// Percentage of reported URLs that downloaded successfully
    pub fn success_rate(&self) -> f64 {
        let total = self.downloaded + self.failed;
        if total > 0 {
            (self.downloaded as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Downloaded: {}", stats.downloaded);
    println!("  Failed: {}", stats.failed);
    println!("  Unique hosts: {}", stats.unique_hosts);
    println!();

    if !stats.errors_by_kind.is_empty() {
        println!("Error Summary:");
        // Sort kinds by count (descending)
        let mut error_counts: Vec<_> = stats.errors_by_kind.iter().collect();
        error_counts.sort_by(|a, b| b.1.cmp(a.1));

        for (kind, count) in error_counts {
            println!("  {}: {}", kind, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} URLs downloaded)",
        stats.success_rate(),
        stats.downloaded,
        stats.downloaded + stats.failed
    );
}
