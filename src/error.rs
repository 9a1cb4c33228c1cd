//! Error types for readsieve

use thiserror::Error;

/// Result type alias for readsieve operations
pub type Result<T> = std::result::Result<T, ReadsieveError>;

/// Error types that can occur in readsieve
#[derive(Debug, Error)]
pub enum ReadsieveError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid FASTQ format
    #[error("Invalid FASTQ format at line {line}: {msg}")]
    InvalidFastqFormat {
        /// Line number where error occurred
        line: usize,
        /// Error message
        msg: String,
    },

    /// Malformed filter expression
    #[error("Invalid filter expression: {msg}")]
    InvalidFilterExpression {
        /// What was wrong with the expression
        msg: String,
    },

    /// Sequence and quality string lengths differ
    #[error("Record '{id}': sequence length {sequence} != quality length {quality}")]
    LengthMismatch {
        /// Record identifier
        id: String,
        /// Sequence length in bases
        sequence: usize,
        /// Quality string length in bytes
        quality: usize,
    },

    /// Quality metric requested for a zero-length read
    #[error("Record '{id}': quality is undefined for a zero-length read")]
    EmptyRead {
        /// Record identifier
        id: String,
    },
}
