//! Flusher
//!
//! Runs one flush cycle: drain the queue, apply entries in order.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::config::FlushFailurePolicy;
use crate::error::{DeferError, Result};
use crate::storage::BackingStore;

use super::{QueueEntry, WriteQueue};

/// Outcome of a single flush cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub applied: usize,
    pub failed: usize,
    /// Entries held back because the store had no active namespace
    pub deferred: usize,
}

/// Running totals across all cycles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlushStats {
    pub cycles: u64,
    pub applied: u64,
    pub failed: u64,
}

/// Applies queued entries to a backing store
///
/// ## Ordering:
/// `drain_lock` is held from the snapshot until the last entry is applied,
/// so cycles started from the background task and from `flush` never
/// interleave and backing-store calls never overlap. Namespace switches
/// made through `switch_namespace` take the same lock.
///
/// ## Unbound writes:
/// An entry that fails with `NoActiveNamespace` is not a failure. It and
/// everything after it go back to the queue front, and the first namespace
/// switch applies them before returning.
pub struct Flusher<B: BackingStore> {
    queue: Arc<WriteQueue>,
    store: Arc<B>,
    policy: FlushFailurePolicy,
    drain_lock: Mutex<()>,
    unbound: AtomicBool,
    cycles: AtomicU64,
    applied: AtomicU64,
    failed: AtomicU64,
}

impl<B: BackingStore> Flusher<B> {
    pub fn new(queue: Arc<WriteQueue>, store: Arc<B>, policy: FlushFailurePolicy) -> Self {
        Self {
            queue,
            store,
            policy,
            drain_lock: Mutex::new(()),
            unbound: AtomicBool::new(false),
            cycles: AtomicU64::new(0),
            applied: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Drain the queue and apply every entry, one after another
    ///
    /// With `SkipEntry`, failures are logged and counted and the cycle
    /// carries on. With `AbortCycle`, the first failure stops the cycle,
    /// the failed entry and the rest are requeued in order, and the error
    /// is returned.
    pub fn run_cycle(&self) -> Result<CycleReport> {
        let _drain = self.drain_lock.lock();
        self.cycle_locked()
    }

    /// Run a namespace switch with no cycle in flight
    ///
    /// `switch` runs under the drain lock. If earlier cycles held entries
    /// back for lack of an active namespace, they are applied to the newly
    /// active namespace and `switch` runs again, so its result reflects
    /// every write submitted before the call.
    pub fn switch_namespace<T>(&self, switch: impl Fn(&B) -> Result<T>) -> Result<T> {
        let _drain = self.drain_lock.lock();
        let switched = switch(&self.store)?;

        if !self.unbound.swap(false, Ordering::SeqCst) {
            return Ok(switched);
        }
        let report = self.cycle_locked()?;
        tracing::debug!("Applied {} unbound entries on namespace switch", report.applied);
        switch(&self.store)
    }

    /// One cycle; the caller holds `drain_lock`
    fn cycle_locked(&self) -> Result<CycleReport> {
        let mut report = CycleReport::default();

        let mut pending = self.queue.drain().into_iter();
        if pending.len() > 0 {
            tracing::debug!("Flush cycle applying {} entries", pending.len());
        }

        let outcome = loop {
            let Some(entry) = pending.next() else {
                break Ok(());
            };

            match self.apply(&entry) {
                Ok(()) => report.applied += 1,
                Err(DeferError::NoActiveNamespace) => {
                    let mut unbound = Vec::with_capacity(pending.len() + 1);
                    unbound.push(entry);
                    unbound.extend(pending);
                    report.deferred = unbound.len();
                    tracing::trace!("No active namespace, {} entries held back", unbound.len());
                    self.queue.requeue_front(unbound);
                    self.unbound.store(true, Ordering::SeqCst);
                    break Ok(());
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::error!("Failed to apply {:?} for key '{}': {}", entry.action(), entry.key(), e);

                    if self.policy == FlushFailurePolicy::AbortCycle {
                        let mut unapplied = Vec::with_capacity(pending.len() + 1);
                        unapplied.push(entry);
                        unapplied.extend(pending);
                        tracing::warn!("Flush cycle aborted, {} entries requeued", unapplied.len());
                        self.queue.requeue_front(unapplied);
                        break Err(e);
                    }
                }
            }
        };

        self.cycles.fetch_add(1, Ordering::SeqCst);
        self.applied.fetch_add(report.applied as u64, Ordering::SeqCst);
        self.failed.fetch_add(report.failed as u64, Ordering::SeqCst);

        outcome.map(|()| report)
    }

    /// Totals since creation
    pub fn stats(&self) -> FlushStats {
        FlushStats {
            cycles: self.cycles.load(Ordering::SeqCst),
            applied: self.applied.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
        }
    }

    pub fn store(&self) -> &Arc<B> {
        &self.store
    }

    fn apply(&self, entry: &QueueEntry) -> Result<()> {
        match entry {
            QueueEntry::Set { key, payload } => self.store.set_item(key, payload),
            QueueEntry::Remove { key } => self.store.remove_item(key),
        }
    }
}
