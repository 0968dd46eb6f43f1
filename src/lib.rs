//! wavecrawl: a breadth-first, depth-bounded web crawler
//!
//! This crate downloads pages level by level from a seed URL, bounding
//! concurrency with separate download and extraction worker pools plus a
//! per-host admission limit.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Fatal errors raised by the crawler itself
///
/// Per-URL failures never surface here; they are collected in
/// [`CrawlResult::errors`](state::CrawlResult).
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Crawler has been shut down")]
    Shutdown,

    #[error("Crawl state still shared after the last level drained")]
    StateShared,
}

/// Failure of a single URL, recorded in the crawl result
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("Failed to extract links from {url}: {message}")]
    Extract { url: String, message: String },

    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Interrupted while waiting for host admission: {url}")]
    Interrupted { url: String },

    #[error("Downloader panicked on {url}: {message}")]
    Panicked { url: String, message: String },
}

impl FetchError {
    /// Short, stable name of the failure category
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http { .. } => "http",
            Self::Status { .. } => "status",
            Self::Body { .. } => "body",
            Self::Extract { .. } => "extract",
            Self::InvalidUrl { .. } => "invalid-url",
            Self::Interrupted { .. } => "interrupted",
            Self::Panicked { .. } => "panicked",
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for per-URL operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Document, Downloader, HtmlDocument, HttpDownloader, WebCrawler};
pub use state::CrawlResult;
pub use crate::url::{extract_host, HostFilter};
