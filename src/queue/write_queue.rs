//! Write queue implementation
//!
//! VecDeque behind a mutex. Appends never block on the backing store.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::error::{DeferError, Result};
use super::QueueEntry;

/// Ordered log of mutations waiting for the next flush cycle
#[derive(Debug, Default)]
pub struct WriteQueue {
    entries: Mutex<VecDeque<QueueEntry>>,
    closed: AtomicBool,
}

impl WriteQueue {
    /// Create an empty, open queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a set of already-serialized text
    pub fn enqueue_set(&self, key: impl Into<String>, payload: impl Into<String>) -> Result<()> {
        self.push(QueueEntry::set(key, payload))
    }

    /// Queue a removal
    pub fn enqueue_remove(&self, key: impl Into<String>) -> Result<()> {
        self.push(QueueEntry::remove(key))
    }

    /// Take every queued entry, leaving the queue empty
    ///
    /// Entries appended after this returns belong to the next drain.
    pub fn drain(&self) -> Vec<QueueEntry> {
        let mut entries = self.entries.lock();
        std::mem::take(&mut *entries).into()
    }

    /// Put unapplied entries back ahead of anything queued since the drain
    pub fn requeue_front(&self, unapplied: Vec<QueueEntry>) {
        let mut entries = self.entries.lock();
        for entry in unapplied.into_iter().rev() {
            entries.push_front(entry);
        }
    }

    /// Reject any further appends
    ///
    /// Taken under the entries lock, so an append either lands before the
    /// close or fails.
    pub fn close(&self) {
        let _entries = self.entries.lock();
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn push(&self, entry: QueueEntry) -> Result<()> {
        let mut entries = self.entries.lock();
        if self.is_closed() {
            return Err(DeferError::SchedulerStopped);
        }
        entries.push_back(entry);
        Ok(())
    }
}
