//! Level barrier: waits for one breadth-first wave of work to finish
//!
//! Work is registered as [`Unit`] guards. A unit arrives when it is dropped,
//! so a task arrives exactly once on every exit path, including when its
//! worker is aborted. Units may register further units while the coordinator
//! is already waiting; the wave ends when the outstanding count reaches zero.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct BarrierInner {
    pending: AtomicUsize,
    drained: Notify,
}

/// Reusable barrier counting the outstanding units of the current level
#[derive(Debug, Clone, Default)]
pub struct LevelBarrier {
    inner: Arc<BarrierInner>,
}

impl LevelBarrier {
    /// Creates a barrier with no outstanding units
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one unit of work
    pub fn register(&self) -> Unit {
        Unit::register(&self.inner)
    }

    /// Number of units registered but not yet arrived
    pub fn pending(&self) -> usize {
        self.inner.pending.load(Ordering::SeqCst)
    }

    /// Waits until every registered unit has arrived
    ///
    /// Returns immediately when nothing is outstanding. The barrier can be
    /// reused for the next level once this returns.
    pub async fn wait_drained(&self) {
        loop {
            let notified = self.inner.drained.notified();
            tokio::pin!(notified);
            // Listen before checking, so an arrival in between is not missed
            notified.as_mut().enable();

            if self.pending() == 0 {
                return;
            }

            notified.await;
        }
    }
}

/// One outstanding unit of work; arrives at the barrier when dropped
#[derive(Debug)]
#[must_use = "a unit arrives at the barrier as soon as it is dropped"]
pub struct Unit {
    inner: Arc<BarrierInner>,
}

impl Unit {
    fn register(inner: &Arc<BarrierInner>) -> Self {
        inner.pending.fetch_add(1, Ordering::SeqCst);
        Self {
            inner: Arc::clone(inner),
        }
    }

    /// Registers a dependent unit on the same barrier
    ///
    /// The new unit is counted before `self` can arrive, so the barrier cannot
    /// drain while the dependent work is still pending.
    pub fn fork(&self) -> Unit {
        Unit::register(&self.inner)
    }

    /// Arrives at the barrier
    pub fn arrive(self) {
        drop(self);
    }
}

impl Drop for Unit {
    fn drop(&mut self) {
        if self.inner.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.drained.notify_waiters();
        }
    }
}
