//! Key classification
//!
//! The file store must absorb keys that belong to an indexing convention
//! layered above it. `StorageKey::classify` is the only place that inspects
//! key text; everything downstream matches on the tagged variant.

/// Qualifier separating a key prefix from its short name
pub const QUALIFIER: char = ':';

/// Substring present in index keys
pub const INDEX_MARKER: &str = "index";

/// Suffix-style qualifier present in primary index keys
pub const PRIMARY_MARKER: &str = ":primary";

/// A classified logical key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageKey {
    /// Real content, persisted as one physical entry
    Data(String),

    /// Bare namespace name; never persisted
    NamespaceMarker,

    /// Primary-index bookkeeping key; never persisted
    IndexMarker,
}

impl StorageKey {
    /// Classify `key` using `separator` as the namespace separator
    ///
    /// Priority order:
    /// 1. no separator and no `:`               → NamespaceMarker
    /// 2. separator + "index" + ":primary"      → IndexMarker
    /// 3. anything else                         → Data
    pub fn classify(key: &str, separator: char) -> Self {
        let has_separator = key.contains(separator);

        if !has_separator && !key.contains(QUALIFIER) {
            return StorageKey::NamespaceMarker;
        }

        if has_separator && key.contains(INDEX_MARKER) && key.contains(PRIMARY_MARKER) {
            return StorageKey::IndexMarker;
        }

        StorageKey::Data(key.to_string())
    }

    /// True for keys that map to a physical entry
    pub fn is_data(&self) -> bool {
        matches!(self, StorageKey::Data(_))
    }
}

/// Short form of a logical key: the text after the last `:`, or the key itself
///
/// "todos#item:a" → "a", "plain" → "plain"
pub fn short_key(key: &str) -> &str {
    match key.rfind(QUALIFIER) {
        Some(pos) => &key[pos + QUALIFIER.len_utf8()..],
        None => key,
    }
}
