use std::io;
use thiserror::Error;

/// Type Alias: A rebranding of the `Result` enum from the standard library which focuses on the
/// failure modes of this crate's operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The `Error` enum collects every failure that can terminate one of the crate's operations:
/// reading or writing an image, persisting a trace artifact, or loading one back. Out-of-range
/// page references are deliberately absent; those are a skip condition, not an error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("bitmap error: {0}")]
    Bitmap(String),

    #[error("trace header malformed at line {line}: expected '{expected}=<value>'")]
    TraceHeader { line: u64, expected: &'static str },

    #[error("trace line {line} malformed: {reason}")]
    TraceParse { line: u64, reason: String },
}
