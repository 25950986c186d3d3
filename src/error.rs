//! Error types for the fragmentizer.
//!
//! Uses the dual-error pattern: `FragmentizeError` for library consumers
//! with detailed error context, and a `Result` alias for internal use.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the fragmentize library.
#[derive(Debug, Error)]
pub enum FragmentizeError {
    /// Source file could not be read.
    #[error("Cannot read source file {path}: {source}")]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Markup parsing failed.
    #[error("Markup parsing failed: {0}")]
    Parse(#[from] roxmltree::Error),

    /// Fragment budget too small for this document.
    #[error("Invalid max length {max_len}: need at least {required} bytes to close the deepest open tag chain")]
    InvalidBudget { max_len: usize, required: usize },

    /// Malformed tag name in a block-tag override.
    #[error("Invalid block tag name: '{0}'. Expected a letter followed by letters, digits or hyphens")]
    InvalidBlockTag(String),
}

/// Result type alias for fragmentize operations.
pub type Result<T> = std::result::Result<T, FragmentizeError>;
