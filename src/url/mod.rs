//! URL handling module for wavecrawl
//!
//! This module provides host extraction and the host filter that decides
//! which crawled URLs are reported in the result.

mod domain;

use std::collections::HashSet;

pub use domain::extract_host;

/// Decides which hosts are reported in a crawl result
///
/// The filter never stops traversal: pages on rejected hosts are still
/// downloaded and their links followed, they are only left out of the
/// accepted list and the error map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HostFilter {
    /// Every host is accepted
    #[default]
    Any,
    /// Only the listed hosts (exact, lowercase) are accepted
    AllowList(HashSet<String>),
}

impl HostFilter {
    /// Builds an allow-list filter from host names
    ///
    /// Hosts are lowercased so they compare equal to [`extract_host`] output.
    ///
    /// # Examples
    ///
    /// ```
    /// use wavecrawl::url::HostFilter;
    ///
    /// let filter = HostFilter::allow(["Example.com"]);
    /// assert!(filter.accepts("example.com"));
    /// assert!(!filter.accepts("other.com"));
    /// ```
    pub fn allow<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::AllowList(
            hosts
                .into_iter()
                .map(|h| h.as_ref().to_lowercase())
                .collect(),
        )
    }

    /// Returns true if URLs on `host` should be reported
    pub fn accepts(&self, host: &str) -> bool {
        match self {
            Self::Any => true,
            Self::AllowList(hosts) => hosts.contains(host),
        }
    }
}
