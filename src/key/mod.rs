//! Key Module
//!
//! Logical keys as seen by the file backing store.
//!
//! ## Responsibilities
//! - Encode logical keys as filesystem-safe entry names (and back)
//! - Classify keys into real data and synthetic markers
//!
//! ## Entry Name Format
//! ```text
//! ┌──────────────────────────────┬────────┐
//! │ base64url(utf8 logical key)  │  .dat  │
//! └──────────────────────────────┴────────┘
//! ```

mod codec;
mod classify;

pub use codec::{decode_entry_name, encode_key, DATA_FILE_EXT, MAX_KEY_LEN};
pub use classify::{short_key, StorageKey, INDEX_MARKER, PRIMARY_MARKER, QUALIFIER};
