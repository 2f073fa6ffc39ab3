//! # deferkv
//!
//! Namespace-isolated key-value persistence with:
//! - Write-behind queuing: writes return immediately, apply later in order
//! - Pluggable text serializers (JSON, base64 MessagePack)
//! - Pluggable backing stores (file-per-key on disk, in-memory)
//! - Synthetic marker keys absorbed by the file store
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      StorageFacade                          │
//! │        set/remove ─► queue        get/load ─► store         │
//! └──────────┬───────────────────────────────────┬──────────────┘
//!            │                                   │
//!            ▼                                   │
//!   ┌─────────────────┐   flush cycle    ┌───────▼─────────┐
//!   │   WriteQueue    │ ───────────────► │  BackingStore   │
//!   │ (FlushScheduler)│   (sequential)   │ (file / memory) │
//!   └─────────────────┘                  └───────┬─────────┘
//!                                                │
//!                                                ▼
//!                                    ┌──────────────────────┐
//!                                    │ KeyCodec + Container │
//!                                    │  Manager + Platform  │
//!                                    └──────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use deferkv::{Config, FileBackingStore, StorageFacade};
//! use serde_json::json;
//!
//! let config = Config::builder().data_dir("./app_data").build();
//! let store = FileBackingStore::open(&config)?;
//! let facade = StorageFacade::open(config, store)?;
//!
//! facade.load("todos")?;
//! facade.set_item("todos#item:a", &json!({ "done": false }))?;
//! facade.flush()?;
//! let items = facade.load("todos")?;
//! assert!(items.contains_key("a"));
//! # Ok::<(), deferkv::DeferError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod serializer;
pub mod key;
pub mod storage;
pub mod queue;
pub mod facade;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DeferError, Result};
pub use config::{Config, FlushFailurePolicy};
pub use facade::StorageFacade;
pub use serializer::{Serializer, SerializerRegistry};
pub use storage::{BackingStore, FileBackingStore, MemoryBackingStore, RawItem};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of deferkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
