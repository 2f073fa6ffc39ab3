//! Error types for deferkv
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using DeferError
pub type Result<T> = std::result::Result<T, DeferError>;

/// Unified error type for deferkv operations
#[derive(Debug, Error)]
pub enum DeferError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Container Errors
    // -------------------------------------------------------------------------
    #[error("Unable to create folder: {subfolder} (error: {source})")]
    ContainerUnavailable {
        subfolder: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No namespace is active; call load or clear first")]
    NoActiveNamespace,

    #[error("Invalid namespace: {0:?}")]
    InvalidNamespace(String),

    // -------------------------------------------------------------------------
    // Entry Errors
    // -------------------------------------------------------------------------
    #[error("Unable to store data for key: {key} (error: {source})")]
    WriteFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid entry name: {0}")]
    InvalidEntryName(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Scheduler Errors
    // -------------------------------------------------------------------------
    #[error("Flush scheduler has been stopped")]
    SchedulerStopped,
}

impl From<serde_json::Error> for DeferError {
    fn from(err: serde_json::Error) -> Self {
        DeferError::Serialization(err.to_string())
    }
}
