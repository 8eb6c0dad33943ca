use std::io;
use thiserror::Error;

use simdna_core::SimdnaError;

/// Error type for simdna-io operations.
#[derive(Error, Debug)]
pub enum SimdnaIoError {
    /// A generator or model failed while producing or loading data.
    #[error(transparent)]
    Core(#[from] SimdnaError),

    /// IO error occurred during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to serialize generator description: {0}")]
    Json(#[from] serde_json::Error),

    /// A motif file line that is neither a header nor a row of numbers.
    #[error("Malformed motif file at line {line}: {message}")]
    MotifParse { line: usize, message: String },

    /// A tab-separated line with missing or unparsable columns.
    #[error("Malformed line {line}: {message}")]
    MalformedLine { line: usize, message: String },
}

/// Result type alias for simdna-io operations.
pub type Result<T> = std::result::Result<T, SimdnaIoError>;
