//! Flush Scheduler
//!
//! Background thread running flush cycles on a fixed period.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender};

use crate::error::Result;
use crate::storage::BackingStore;

use super::Flusher;

/// Name given to the background flush thread
const THREAD_NAME: &str = "deferkv-flush";

/// Owns the background flush thread
///
/// The thread runs a cycle, then waits `interval` or until the shutdown
/// channel disconnects, whichever comes first. Dropping the sender is the
/// stop signal; it is observed before every reschedule.
pub struct FlushScheduler {
    shutdown_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl FlushScheduler {
    /// Spawn the flush thread
    pub fn start<B: BackingStore>(
        flusher: Arc<Flusher<B>>,
        interval: Duration,
        flush_on_shutdown: bool,
    ) -> Result<Self> {
        let (shutdown_tx, shutdown_rx) = channel::bounded::<()>(0);

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || run(flusher, shutdown_rx, interval, flush_on_shutdown))?;

        tracing::info!("Flush scheduler started (interval {:?})", interval);

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Signal the thread and wait for it to exit
    ///
    /// Safe to call more than once.
    pub fn stop(&mut self) {
        // Disconnecting the channel wakes the thread out of its wait
        drop(self.shutdown_tx.take());

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Flush thread panicked");
            }
            tracing::info!("Flush scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for FlushScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<B: BackingStore>(
    flusher: Arc<Flusher<B>>,
    shutdown_rx: Receiver<()>,
    interval: Duration,
    flush_on_shutdown: bool,
) {
    loop {
        if let Err(e) = flusher.run_cycle() {
            tracing::error!("Flush cycle failed: {}", e);
        }

        crossbeam::select! {
            recv(shutdown_rx) -> _ => break,
            default(interval) => {}
        }
    }

    if flush_on_shutdown {
        match flusher.run_cycle() {
            Ok(report) => tracing::debug!("Final flush applied {} entries", report.applied),
            Err(e) => tracing::error!("Final flush failed: {}", e),
        }
    }
}
