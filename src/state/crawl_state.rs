use crate::state::CrawlResult;
use crate::url::HostFilter;
use crate::FetchError;
use dashmap::{DashMap, DashSet};

/// Shared bookkeeping for a single `download` call
///
/// Every collection is safe for concurrent mutation by the worker pools. The
/// coordinator only reads it once a level has drained.
#[derive(Debug)]
pub struct CrawlState {
    /// Decides which URLs are reported
    filter: HostFilter,

    /// URLs dispatched for download, whatever the outcome
    visited: DashSet<String>,

    /// Host-accepted URLs that downloaded and extracted cleanly
    accepted: DashSet<String>,

    /// Every URL that failed, including those on rejected hosts
    failed: DashSet<String>,

    /// Failures of host-accepted URLs
    errors: DashMap<String, FetchError>,

    /// Links discovered during the current level
    next_level: DashSet<String>,
}

impl CrawlState {
    /// Creates empty state for a crawl reporting hosts accepted by `filter`
    pub fn new(filter: HostFilter) -> Self {
        Self {
            filter,
            visited: DashSet::new(),
            accepted: DashSet::new(),
            failed: DashSet::new(),
            errors: DashMap::new(),
            next_level: DashSet::new(),
        }
    }

    /// Returns true if URLs on `host` are reported
    pub fn accepts_host(&self, host: &str) -> bool {
        self.filter.accepts(host)
    }

    /// Marks `url` visited
    ///
    /// Check and insert are one atomic operation: when several workers race
    /// on the same URL, exactly one of them gets `true`.
    pub fn mark_visited(&self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    /// Records a successful download
    pub fn record_success(&self, url: &str, accepted: bool) {
        if accepted {
            self.accepted.insert(url.to_string());
        }
    }

    /// Records a failed download or extraction
    ///
    /// A URL whose extraction fails after a successful download is moved out
    /// of the accepted set, so it is reported in exactly one place.
    pub fn record_failure(&self, url: &str, error: FetchError, accepted: bool) {
        self.accepted.remove(url);
        self.failed.insert(url.to_string());
        if accepted {
            self.errors.insert(url.to_string(), error);
        }
    }

    /// Adds discovered links to the next level's frontier
    pub fn add_links<I>(&self, links: I)
    where
        I: IntoIterator<Item = String>,
    {
        for link in links {
            self.next_level.insert(link);
        }
    }

    /// Takes the next level's frontier, leaving it empty
    ///
    /// URLs that were already visited are dropped here; the download stage
    /// still rechecks, since the set may change once workers run again.
    pub fn take_next_level(&self) -> Vec<String> {
        let frontier = self
            .next_level
            .iter()
            .map(|url| url.key().clone())
            .filter(|url| !self.visited.contains(url))
            .collect();
        self.next_level.clear();
        frontier
    }

    /// Number of URLs dispatched so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of URLs that failed so far, on any host
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Returns true if `url` failed, on any host
    pub fn has_failed(&self, url: &str) -> bool {
        self.failed.contains(url)
    }

    /// Consumes the state into the immutable result
    pub fn finish(self) -> CrawlResult {
        let downloaded = self.accepted.into_iter().collect();
        let errors = self.errors.into_iter().collect();

        CrawlResult::new(downloaded, errors)
    }
}
