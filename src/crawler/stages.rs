//! Download and extraction stages
//!
//! Each stage owns its own worker pool. A download job fetches one URL under
//! its host's admission limit and, on success, hands the page to the
//! extraction stage, whose job lists the page's links into the next level's
//! frontier. Every job carries a barrier [`Unit`] and arrives exactly once.

use crate::crawler::barrier::{LevelBarrier, Unit};
use crate::crawler::fetcher::{Document, Downloader};
use crate::crawler::host_gate::HostGate;
use crate::crawler::pool::WorkerPool;
use crate::state::CrawlState;
use crate::url::extract_host;
use crate::{CrawlError, FetchError};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Pool of workers fetching pages
pub struct DownloadStage {
    pool: WorkerPool,
    downloader: Arc<dyn Downloader>,
    host_gate: Arc<HostGate>,
    extraction: Arc<ExtractionStage>,
}

impl DownloadStage {
    /// Creates the stage and spawns its workers
    pub fn new(
        downloader: Arc<dyn Downloader>,
        workers: usize,
        queue_capacity: usize,
        host_gate: Arc<HostGate>,
        extraction: Arc<ExtractionStage>,
    ) -> Self {
        Self {
            pool: WorkerPool::new("download", workers, queue_capacity),
            downloader,
            host_gate,
            extraction,
        }
    }

    /// Schedules a download of `url` unless it was already visited
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::Shutdown` if the stage has been closed.
    pub async fn submit(
        self: &Arc<Self>,
        url: String,
        state: &Arc<CrawlState>,
        barrier: &LevelBarrier,
    ) -> Result<(), CrawlError> {
        if !state.mark_visited(&url) {
            tracing::trace!("Skipping already visited {}", url);
            return Ok(());
        }

        let unit = barrier.register();
        let job = Arc::clone(self).download_page(url, Arc::clone(state), unit);
        self.pool.submit(Box::pin(job)).await
    }

    async fn download_page(self: Arc<Self>, url: String, state: Arc<CrawlState>, unit: Unit) {
        self.fetch_and_record(&url, &state, &unit).await;

        // The state handle goes before the unit, so a drained level leaves the
        // coordinator as its only owner
        drop(state);
        unit.arrive();
    }

    async fn fetch_and_record(&self, url: &str, state: &Arc<CrawlState>, unit: &Unit) {
        let host = match extract_host(url) {
            Ok(host) => host,
            Err(e) => {
                tracing::warn!("Cannot download {}: {}", url, e);
                let error = FetchError::InvalidUrl {
                    url: url.to_string(),
                    message: e.to_string(),
                };
                // The host filter cannot be evaluated, so the failure is reported
                state.record_failure(url, error, true);
                return;
            }
        };
        let accepted = state.accepts_host(&host);

        let page = {
            let _permit = match self.host_gate.acquire(&host).await {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::debug!("Admission for {} interrupted by shutdown", url);
                    let error = FetchError::Interrupted {
                        url: url.to_string(),
                    };
                    state.record_failure(url, error, accepted);
                    return;
                }
            };

            tracing::debug!("Downloading {}", url);
            AssertUnwindSafe(self.downloader.download(url))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| {
                    Err(FetchError::Panicked {
                        url: url.to_string(),
                        message: panic_message(&*payload),
                    })
                })
        };

        match page {
            Ok(page) => {
                state.record_success(url, accepted);

                // Registered before this download's unit arrives
                let extraction_unit = unit.fork();
                if let Err(e) = self
                    .extraction
                    .submit(
                        url.to_string(),
                        page,
                        accepted,
                        Arc::clone(state),
                        extraction_unit,
                    )
                    .await
                {
                    tracing::debug!("Dropping extraction of {}: {}", url, e);
                }
            }
            Err(e) => {
                tracing::warn!("Failed to download {}: {}", url, e);
                state.record_failure(url, e, accepted);
            }
        }
    }

    /// Stops the stage's workers
    pub fn close(&self) {
        self.pool.close();
    }

    /// Returns true once the stage no longer accepts work
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

/// Pool of workers extracting links from fetched pages
pub struct ExtractionStage {
    pool: WorkerPool,
}

impl ExtractionStage {
    /// Creates the stage and spawns its workers
    pub fn new(workers: usize, queue_capacity: usize) -> Self {
        Self {
            pool: WorkerPool::new("extraction", workers, queue_capacity),
        }
    }

    /// Schedules link extraction for the page downloaded from `url`
    ///
    /// `accepted` is the host filter verdict captured at download time. The
    /// caller registers `unit` before its own unit arrives.
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::Shutdown` if the stage has been closed.
    pub async fn submit(
        &self,
        url: String,
        page: Box<dyn Document>,
        accepted: bool,
        state: Arc<CrawlState>,
        unit: Unit,
    ) -> Result<(), CrawlError> {
        let job = extract_page(url, page, accepted, state, unit);
        self.pool.submit(Box::pin(job)).await
    }

    /// Stops the stage's workers
    pub fn close(&self) {
        self.pool.close();
    }
}

async fn extract_page(
    url: String,
    page: Box<dyn Document>,
    accepted: bool,
    state: Arc<CrawlState>,
    unit: Unit,
) {
    record_links(&url, page, accepted, &state).await;

    drop(state);
    unit.arrive();
}

async fn record_links(url: &str, page: Box<dyn Document>, accepted: bool, state: &CrawlState) {
    let links = tokio::task::spawn_blocking(move || page.extract_links()).await;

    match links {
        Ok(Ok(links)) => {
            tracing::trace!("Extracted {} links from {}", links.len(), url);
            state.add_links(links);
        }
        Ok(Err(e)) => {
            tracing::warn!("Failed to extract links from {}: {}", url, e);
            state.record_failure(url, e, accepted);
        }
        Err(e) => {
            tracing::warn!("Link extraction for {} did not complete: {}", url, e);
            let error = FetchError::Extract {
                url: url.to_string(),
                message: e.to_string(),
            };
            state.record_failure(url, error, accepted);
        }
    }
}

/// Best-effort text of a panic payload
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
