//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The fetch primitive (`Downloader`, `Document`) and its HTTP implementation
//! - HTML link extraction
//! - Per-host admission control
//! - The download and extraction worker pools
//! - The level barrier and the breadth-first coordinator

mod barrier;
mod coordinator;
mod fetcher;
mod host_gate;
mod parser;
mod pool;
mod stages;

pub use barrier::{LevelBarrier, Unit};
pub use coordinator::WebCrawler;
pub use fetcher::{build_http_client, Document, Downloader, HttpDownloader};
pub use host_gate::HostGate;
pub use parser::HtmlDocument;
pub use pool::{Job, WorkerPool};
pub use stages::{DownloadStage, ExtractionStage};
