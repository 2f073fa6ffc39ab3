//! Key codec
//!
//! Bijective mapping between logical keys and physical entry names.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;

use crate::error::{DeferError, Result};

/// Suffix marking a physical entry as a data blob
pub const DATA_FILE_EXT: &str = ".dat";

/// Longest logical key, in bytes, whose entry name fits in 255 bytes
pub const MAX_KEY_LEN: usize = 186;

/// Encode a logical key as an entry name
///
/// "todos#item:a" → "dG9kb3MjaXRlbTph.dat"
///
/// The name is `4 * ceil(len / 3) + 4` bytes long. Most filesystems cap a
/// name at 255 bytes, so keys longer than [`MAX_KEY_LEN`] bytes encode
/// fine but fail to persist on disk with `WriteFailed`.
pub fn encode_key(key: &str) -> String {
    let mut name = URL_SAFE.encode(key.as_bytes());
    name.push_str(DATA_FILE_EXT);
    name
}

/// Decode an entry name back into its logical key
pub fn decode_entry_name(name: &str) -> Result<String> {
    let stem = name
        .strip_suffix(DATA_FILE_EXT)
        .ok_or_else(|| DeferError::InvalidEntryName(format!("missing {} suffix: {}", DATA_FILE_EXT, name)))?;

    let bytes = URL_SAFE
        .decode(stem)
        .map_err(|e| DeferError::InvalidEntryName(format!("{}: {}", name, e)))?;

    String::from_utf8(bytes)
        .map_err(|e| DeferError::InvalidEntryName(format!("{}: {}", name, e)))
}
