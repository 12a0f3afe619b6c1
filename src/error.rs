//! Error types for configuration, transforms, and text I/O

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for every fallible operation of the crate
pub type Result<T> = std::result::Result<T, FftError>;

/// Errors that can occur while configuring or running a transform
#[derive(Error, Debug)]
pub enum FftError {
    /// Missing or unusable command line arguments
    #[error("usage: {program} <input-file> <output-file> <worker-count>")]
    Usage { program: String },

    /// The worker count argument is not a positive integer
    #[error("invalid worker count: {0:?}")]
    InvalidWorkerArg(String),

    /// A transform over zero samples was requested
    #[error("sequence must contain at least one sample")]
    EmptySequence,

    /// A transform with zero workers was requested
    #[error("worker count must be at least 1")]
    NoWorkers,

    /// The recursive engine only handles power-of-two lengths
    #[error("sequence length {0} is not a power of two")]
    LengthNotPowerOfTwo(usize),

    /// The recursive engine only handles power-of-two worker counts
    #[error("worker count {0} is not a power of two")]
    WorkersNotPowerOfTwo(usize),

    /// The recursive engine needs at least one sample per leaf subtree
    #[error("worker count {workers} exceeds sequence length {len}")]
    TooManyWorkers { workers: usize, len: usize },

    /// More workers than a single run may spawn
    #[error("worker count {workers} exceeds the limit of {limit}")]
    WorkerLimit { workers: usize, limit: usize },

    /// Buffer and configuration disagree on the sequence length
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The output of a buffer is written exactly once
    #[error("sample buffer has already been transformed")]
    AlreadyTransformed,

    /// A worker thread panicked before finishing its share
    #[error("worker {0} panicked")]
    WorkerPanicked(usize),

    /// Reading or writing a sample file failed
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A sample file line could not be parsed
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

impl FftError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FftError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        FftError::Parse {
            line,
            reason: reason.into(),
        }
    }
}
