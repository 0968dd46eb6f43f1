//! Per-host admission control
//!
//! Each host gets its own semaphore, created lazily on first use and kept for
//! the lifetime of the crawler, so the cap holds across `download` calls.

use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Bounds the number of concurrent downloads per host
#[derive(Debug)]
pub struct HostGate {
    /// Map of host to its admission semaphore
    hosts: DashMap<String, Arc<Semaphore>>,

    /// Permits handed to every new host
    per_host: usize,

    /// Set once the gate is closed; new semaphores start closed
    closed: AtomicBool,
}

impl HostGate {
    /// Creates a gate allowing `per_host` concurrent downloads per host
    pub fn new(per_host: usize) -> Self {
        Self {
            hosts: DashMap::new(),
            per_host,
            closed: AtomicBool::new(false),
        }
    }

    /// Returns the admission semaphore for `host`, creating it on first use
    ///
    /// Every caller for the same host gets the same instance.
    pub fn admission_for(&self, host: &str) -> Arc<Semaphore> {
        if let Some(semaphore) = self.hosts.get(host) {
            return Arc::clone(semaphore.value());
        }

        let entry = self.hosts.entry(host.to_string()).or_insert_with(|| {
            tracing::trace!("Creating admission limiter for host {}", host);
            let semaphore = Semaphore::new(self.per_host);
            if self.closed.load(Ordering::SeqCst) {
                semaphore.close();
            }
            Arc::new(semaphore)
        });

        Arc::clone(entry.value())
    }

    /// Waits for a free download slot on `host`
    ///
    /// The slot is released when the returned permit is dropped. Fails only
    /// when the gate is closed while waiting.
    pub async fn acquire(&self, host: &str) -> Result<OwnedSemaphorePermit, AcquireError> {
        self.admission_for(host).acquire_owned().await
    }

    /// Closes every semaphore, waking all waiters with an error
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        for entry in self.hosts.iter() {
            entry.value().close();
        }
    }

    /// Number of hosts seen so far
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }
}
