// Error types for tag translation
//
// Two recovery classes: per-tag errors (UnrecognisedTag, UnrecognisedValue)
// are skipped with a diagnostic when processing a whole file; everything
// else aborts the operation.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for tagbridge operations
#[derive(Debug, Error)]
pub enum TagError {
    /// File container or tag version does not match a supported TagFormat
    #[error("unrecognised format: {0}")]
    UnrecognisedFormat(String),

    /// Source key has no translation path under any fallback rule
    #[error("unrecognised tag: {0:?}")]
    UnrecognisedTag(String),

    /// Source value shape does not match what its label requires, or no
    /// target native representation rule applies
    #[error("unrecognised value: {0}")]
    UnrecognisedValue(String),

    /// The label/format matrix could not be obtained from cache or remote
    #[error("mapping table unavailable: {reason}")]
    MappingUnavailable { reason: String },

    /// External encoder exited with a failure status
    #[error("encoder failed with status {status} for '{path}'")]
    EncoderFailed { path: PathBuf, status: i32 },

    #[error("malformed tag dump '{path}': {reason}")]
    MalformedDump { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TagError>;

impl TagError {
    /// True if processing of the rest of the file may continue after
    /// skipping the offending tag
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TagError::UnrecognisedTag(_) | TagError::UnrecognisedValue(_)
        )
    }
}
