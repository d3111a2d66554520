//! Error types for hash list lookups

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while searching a sorted hash list.
#[derive(Debug, Error)]
pub enum LookupError {
    /// I/O error while reading the backing store.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The hash list could not be opened or mapped.
    #[error("Failed to open {path}: {source}")]
    Open {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// No record boundary or separator could be found in a probe window.
    #[error("Malformed record at offset {offset}: {reason}")]
    MalformedRecord {
        /// Offset of the probe that failed
        offset: u64,
        /// What was missing
        reason: &'static str,
    },

    /// The count field of a record is not a non-negative integer.
    #[error("Invalid count {value:?} in record at offset {offset}")]
    InvalidCount {
        /// Offset where the record starts
        offset: u64,
        /// Raw count field, lossily decoded
        value: String,
    },

    /// A lookup key is not valid hexadecimal.
    #[error("Invalid lookup key: {0}")]
    InvalidKey(String),

    /// A lookup key does not have the configured fixed width.
    #[error("Lookup key width mismatch: expected {expected} characters, got {actual}")]
    KeyWidthMismatch {
        /// Configured key width
        expected: usize,
        /// Width of the offending key
        actual: usize,
    },

    /// The lookup configuration violates a sizing precondition.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LookupError {
    /// Whether this error signals malformed input rather than an I/O failure.
    pub const fn is_format_error(&self) -> bool {
        matches!(self, Self::MalformedRecord { .. } | Self::InvalidCount { .. })
    }
}

/// Result type for lookup operations.
pub type Result<T> = std::result::Result<T, LookupError>;
