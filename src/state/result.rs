use crate::FetchError;
use std::collections::HashMap;

/// Outcome of a single `download` call
///
/// Every visited URL ends up in exactly one of three places: `downloaded`,
/// `errors`, or nowhere at all when its host was filtered out.
#[derive(Debug, Default)]
pub struct CrawlResult {
    /// Host-accepted URLs that were downloaded successfully, sorted
    pub downloaded: Vec<String>,

    /// Host-accepted URLs that failed, with the error that caused it
    pub errors: HashMap<String, FetchError>,
}

impl CrawlResult {
    /// Creates a result, sorting the downloaded URLs
    pub fn new(mut downloaded: Vec<String>, errors: HashMap<String, FetchError>) -> Self {
        downloaded.sort();
        Self { downloaded, errors }
    }

    /// Returns true if `url` was downloaded successfully
    pub fn is_downloaded(&self, url: &str) -> bool {
        self.downloaded.binary_search_by(|u| u.as_str().cmp(url)).is_ok()
    }

    /// Failed URLs in sorted order
    pub fn failed_urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = self.errors.keys().map(String::as_str).collect();
        urls.sort_unstable();
        urls
    }

    /// Total number of reported URLs
    pub fn total(&self) -> usize {
        self.downloaded.len() + self.errors.len()
    }
}
