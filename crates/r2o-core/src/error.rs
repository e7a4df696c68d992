//! Error types for conversion

use std::path::PathBuf;

use thiserror::Error;

/// Conversion error type
///
/// Only `Parse` and `Io` are fatal to a run, and only when raised while
/// loading the export. Everything else is contained to the block or page
/// being processed.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The export is not valid JSON or does not have the expected shape
    #[error("Failed to parse export: {0}")]
    Parse(#[from] serde_json::Error),

    /// Reading the export failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A block reference names a uid that no block in the export carries
    #[error("Block reference target not found: {uid}")]
    UnresolvedReference { uid: String },

    /// The page title is empty after normalization; the page produces no file
    #[error("Page title is empty after normalization")]
    EmptyTitle,

    /// Writing a rendered page failed
    #[error("Failed to write page '{title}' to {}: {source}", path.display())]
    Persistence {
        title: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for conversion operations
pub type ConvertResult<T> = Result<T, ConvertError>;
