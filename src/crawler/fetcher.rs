//! Page fetching
//!
//! This module defines the fetch primitive the crawler is built on:
//! - `Downloader`: fetches a URL and returns a `Document`
//! - `Document`: a fetched page that can list its outbound links
//!
//! `HttpDownloader` is the reqwest-backed implementation used by the binary.

use crate::config::UserAgentConfig;
use crate::crawler::parser::HtmlDocument;
use crate::{FetchError, FetchResult};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// A fetched page
pub trait Document: Send + Sync {
    /// Lists the page's outbound links
    ///
    /// Runs on a blocking thread; implementations may do CPU-heavy parsing.
    fn extract_links(&self) -> FetchResult<Vec<String>>;
}

/// Fetches pages by URL
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Downloads `url`
    ///
    /// # Errors
    ///
    /// Any `FetchError`; the crawler records it against `url` and moves on.
    async fn download(&self, url: &str) -> FetchResult<Box<dyn Document>>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use wavecrawl::config::UserAgentConfig;
/// use wavecrawl::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Downloads pages over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    /// Creates a downloader with a client built from `config`
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    /// Creates a downloader around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    /// Fetches `url` with a single GET, following redirects
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx | `HtmlDocument` based at the final URL |
    /// | Other status | `FetchError::Status` |
    /// | Connect/timeout/TLS failure | `FetchError::Http` |
    /// | Body read failure | `FetchError::Body` |
    async fn download(&self, url: &str) -> FetchResult<Box<dyn Document>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;

        tracing::trace!("Fetched {} ({} bytes)", final_url, body.len());
        Ok(Box::new(HtmlDocument::new(final_url, body)))
    }
}
