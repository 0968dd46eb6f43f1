//! Fixed-size worker pool
//!
//! `size` worker tasks pull boxed jobs from one bounded queue. Submitting to a
//! full queue waits, which gives the stages backpressure. Closing is a hard
//! stop: workers are aborted and queued jobs are dropped without running. A
//! job that panics is logged and its worker keeps serving the queue.

use crate::CrawlError;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A unit of work run by a pool worker
pub type Job = BoxFuture<'static, ()>;

/// Bounded pool of tokio worker tasks
#[derive(Debug)]
pub struct WorkerPool {
    name: &'static str,
    size: usize,
    sender: Mutex<Option<mpsc::Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Spawns `size` workers sharing a queue of `capacity` jobs
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(name: &'static str, size: usize, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel::<Job>(capacity);
        let receiver = Arc::new(tokio::sync::Mutex::new(receiver));

        let workers = (0..size)
            .map(|id| {
                let receiver = Arc::clone(&receiver);
                tokio::spawn(async move {
                    loop {
                        let job = receiver.lock().await.recv().await;
                        let Some(job) = job else { break };

                        // A panicking job must not take its worker down with it
                        if AssertUnwindSafe(job).catch_unwind().await.is_err() {
                            tracing::error!("{} worker {} caught a panicking job", name, id);
                        }
                    }
                    tracing::trace!("{} worker {} exiting", name, id);
                })
            })
            .collect();

        tracing::debug!(
            "Started {} pool with {} workers (queue capacity {})",
            name,
            size,
            capacity
        );

        Self {
            name,
            size,
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
        }
    }

    /// Queues a job, waiting while the queue is full
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::Shutdown` once the pool is closed. The job is
    /// dropped without running.
    pub async fn submit(&self, job: Job) -> Result<(), CrawlError> {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        match sender {
            Some(sender) => sender.send(job).await.map_err(|_| CrawlError::Shutdown),
            None => Err(CrawlError::Shutdown),
        }
    }

    /// Stops accepting jobs and aborts every worker
    ///
    /// In-flight jobs are abandoned, not awaited.
    pub fn close(&self) {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        let workers = std::mem::take(
            &mut *self
                .workers
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );

        if sender.is_some() {
            tracing::debug!("Shutting down {} pool ({} workers)", self.name, self.size);
        }

        for worker in workers {
            worker.abort();
        }
    }

    /// Returns true once the pool no longer accepts jobs
    pub fn is_closed(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.close();
    }
}
