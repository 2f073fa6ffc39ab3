//! Configuration for deferkv
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Main configuration for a storage facade and its file backing store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory handed to the platform layer
    /// Internal structure:
    ///   {data_dir}/
    ///     └── {data_folder}/
    ///           └── {namespace}/
    ///                 └── {base64url(key)}.dat
    pub data_dir: PathBuf,

    /// Name of the top-level data area inside `data_dir`
    pub data_folder: String,

    /// Symbol separating a namespace from the rest of a logical key
    pub namespace_separator: char,

    // -------------------------------------------------------------------------
    // Serializer Configuration
    // -------------------------------------------------------------------------
    /// Item serializer used when none (or an unknown one) is requested
    pub preferred_item_serializer: String,

    /// Serializer bound to metadata reads/writes; never swapped
    pub metadata_serializer: String,

    // -------------------------------------------------------------------------
    // Flush Configuration
    // -------------------------------------------------------------------------
    /// Delay between the end of one flush cycle and the start of the next
    pub flush_interval: Duration,

    /// What a flush cycle does when applying an entry fails
    pub failure_policy: FlushFailurePolicy,

    /// Drain the queue one last time when the scheduler is stopped
    pub flush_on_shutdown: bool,
}

/// Behaviour of a flush cycle when one queued entry cannot be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushFailurePolicy {
    /// Log and count the failure, then continue with the next entry
    SkipEntry,

    /// Stop the cycle and put the failed entry and everything after it
    /// back at the front of the queue, in order
    AbortCycle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./deferkv_data"),
            data_folder: "data".to_string(),
            namespace_separator: '#',
            preferred_item_serializer: "json".to_string(),
            metadata_serializer: "msgpack".to_string(),
            flush_interval: Duration::from_millis(500),
            failure_policy: FlushFailurePolicy::SkipEntry,
            flush_on_shutdown: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the root directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the name of the data area under the root directory
    pub fn data_folder(mut self, name: impl Into<String>) -> Self {
        self.config.data_folder = name.into();
        self
    }

    /// Set the namespace separator symbol
    pub fn namespace_separator(mut self, separator: char) -> Self {
        self.config.namespace_separator = separator;
        self
    }

    /// Set the preferred (default) item serializer name
    pub fn preferred_item_serializer(mut self, name: impl Into<String>) -> Self {
        self.config.preferred_item_serializer = name.into();
        self
    }

    /// Set the metadata serializer name
    pub fn metadata_serializer(mut self, name: impl Into<String>) -> Self {
        self.config.metadata_serializer = name.into();
        self
    }

    /// Set the delay between flush cycles
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.config.flush_interval = interval;
        self
    }

    /// Set the delay between flush cycles (in milliseconds)
    pub fn flush_interval_ms(mut self, ms: u64) -> Self {
        self.config.flush_interval = Duration::from_millis(ms);
        self
    }

    /// Set the per-entry failure policy
    pub fn failure_policy(mut self, policy: FlushFailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    /// Enable or disable the final drain on shutdown
    pub fn flush_on_shutdown(mut self, enabled: bool) -> Self {
        self.config.flush_on_shutdown = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
