//! Crawler coordinator - breadth-first level loop
//!
//! The coordinator submits one level's frontier to the download stage, waits
//! on the level barrier until every download and every extraction it spawned
//! has finished, then moves on to the links discovered during that level.

use crate::config::{validate_crawler_config, CrawlerConfig};
use crate::crawler::barrier::LevelBarrier;
use crate::crawler::fetcher::Downloader;
use crate::crawler::host_gate::HostGate;
use crate::crawler::stages::{DownloadStage, ExtractionStage};
use crate::state::{CrawlResult, CrawlState};
use crate::url::HostFilter;
use crate::CrawlError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Concurrent, depth-bounded web crawler
///
/// One instance can run several crawls, sequentially or concurrently; the
/// worker pools and the per-host limits are shared between them.
pub struct WebCrawler {
    downloads: Arc<DownloadStage>,
    extraction: Arc<ExtractionStage>,
    host_gate: Arc<HostGate>,
    closed: AtomicBool,
}

impl WebCrawler {
    /// Creates a crawler and starts its worker pools
    ///
    /// # Arguments
    ///
    /// * `downloader` - Fetch primitive used for every page
    /// * `downloaders` - Maximum number of pages downloading in parallel
    /// * `extractors` - Maximum number of pages having links extracted in parallel
    /// * `per_host` - Maximum number of pages downloading in parallel from one host
    ///
    /// # Returns
    ///
    /// * `Ok(WebCrawler)` - Pools started
    /// * `Err(CrawlError::Config)` - One of the sizes is zero
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        downloader: Arc<dyn Downloader>,
        downloaders: usize,
        extractors: usize,
        per_host: usize,
    ) -> Result<Self, CrawlError> {
        let config = CrawlerConfig {
            downloaders,
            extractors,
            per_host,
            ..CrawlerConfig::default()
        };
        Self::from_config(downloader, &config)
    }

    /// Creates a crawler from the `[crawler]` configuration section
    ///
    /// `config.depth` is not used here; it is passed to [`WebCrawler::crawl`].
    pub fn from_config(
        downloader: Arc<dyn Downloader>,
        config: &CrawlerConfig,
    ) -> Result<Self, CrawlError> {
        validate_crawler_config(config)?;

        let host_gate = Arc::new(HostGate::new(config.per_host));
        let extraction = Arc::new(ExtractionStage::new(
            config.extractors,
            config.queue_capacity,
        ));
        let downloads = Arc::new(DownloadStage::new(
            downloader,
            config.downloaders,
            config.queue_capacity,
            Arc::clone(&host_gate),
            Arc::clone(&extraction),
        ));

        tracing::info!(
            "Crawler ready: {} downloaders, {} extractors, {} per host",
            config.downloaders,
            config.extractors,
            config.per_host
        );

        Ok(Self {
            downloads,
            extraction,
            host_gate,
            closed: AtomicBool::new(false),
        })
    }

    /// Crawls from `url`, reporting every host
    ///
    /// See [`WebCrawler::crawl`].
    pub async fn download(&self, url: &str, depth: u32) -> Result<CrawlResult, CrawlError> {
        self.crawl(url, depth, HostFilter::Any).await
    }

    /// Crawls from `url`, reporting only URLs on `hosts`
    ///
    /// Pages on other hosts are still downloaded so the crawl can reach
    /// allowed hosts behind them.
    pub async fn download_with_hosts<I, S>(
        &self,
        url: &str,
        depth: u32,
        hosts: I,
    ) -> Result<CrawlResult, CrawlError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.crawl(url, depth, HostFilter::allow(hosts)).await
    }

    /// Runs a breadth-first crawl of `depth` levels starting at `url`
    ///
    /// Level 0 downloads the seed, level n downloads the links found during
    /// level n-1. A depth of zero downloads nothing. Per-URL failures are
    /// collected in the result and never abort the crawl.
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::Shutdown` if the crawler is closed before or
    /// during the crawl.
    pub async fn crawl(
        &self,
        url: &str,
        depth: u32,
        filter: HostFilter,
    ) -> Result<CrawlResult, CrawlError> {
        self.ensure_open()?;

        let start_time = Instant::now();
        let state = Arc::new(CrawlState::new(filter));
        let barrier = LevelBarrier::new();
        let mut frontier = vec![url.to_string()];

        tracing::info!("Starting crawl of {} with depth {}", url, depth);

        for level in 0..depth {
            if frontier.is_empty() {
                tracing::debug!("Frontier is empty after level {}, stopping early", level);
                break;
            }

            tracing::debug!("Level {}: submitting {} URLs", level, frontier.len());
            for link in frontier.drain(..) {
                self.downloads.submit(link, &state, &barrier).await?;
            }

            barrier.wait_drained().await;
            self.ensure_open()?;

            frontier = state.take_next_level();
            tracing::info!(
                "Level {} complete: {} visited, {} failed, {} queued for next level",
                level,
                state.visited_count(),
                state.failed_count(),
                frontier.len()
            );
        }

        // Every job releases its handle before arriving, so this is the last one
        let state = Arc::try_unwrap(state).map_err(|_| CrawlError::StateShared)?;
        let result = state.finish();
        tracing::info!(
            "Crawl of {} completed: {} downloaded, {} errors in {:?}",
            url,
            result.downloaded.len(),
            result.errors.len(),
            start_time.elapsed()
        );

        Ok(result)
    }

    /// Shuts the crawler down
    ///
    /// Stops accepting work, interrupts downloads waiting for host admission
    /// and aborts both worker pools. In-flight tasks are abandoned, not
    /// awaited; crawls still running return `CrawlError::Shutdown`.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        tracing::debug!("Closing crawler");
        self.host_gate.close();
        self.downloads.close();
        self.extraction.close();
    }

    /// Returns true once [`WebCrawler::close`] has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of distinct hosts seen across all crawls
    pub fn known_hosts(&self) -> usize {
        self.host_gate.host_count()
    }

    fn ensure_open(&self) -> Result<(), CrawlError> {
        if self.is_closed() || self.downloads.is_closed() {
            return Err(CrawlError::Shutdown);
        }
        Ok(())
    }
}

impl Drop for WebCrawler {
    fn drop(&mut self) {
        self.close();
    }
}
