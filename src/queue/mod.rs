//! Write Queue Module
//!
//! Write-behind log of pending mutations and the task that drains it.
//!
//! ## Responsibilities
//! - Append set/remove entries without touching the backing store
//! - Snapshot-and-clear the queue at the start of each flush cycle
//! - Apply drained entries to the backing store strictly in order
//! - Run flush cycles on a fixed period until stopped
//!
//! ## Flush Cycle
//! ```text
//!   enqueue ──► ┌────────────────────┐
//!   enqueue ──► │   WriteQueue (FIFO)│
//!               └─────────┬──────────┘
//!                         │ drain (atomic snapshot + clear)
//!                         ▼
//!               ┌────────────────────┐      one entry at a time
//!               │      Flusher       │ ───────────────────────► BackingStore
//!               └─────────┬──────────┘
//!                         │ wait flush_interval (or stop)
//!                         ▼
//!                      next cycle
//! ```

mod entry;
mod write_queue;
mod flusher;
mod scheduler;

pub use entry::{Action, QueueEntry};
pub use write_queue::WriteQueue;
pub use flusher::{CycleReport, FlushStats, Flusher};
pub use scheduler::FlushScheduler;
