//! Crate-specific error types for mmap-stream.

use std::io;
use thiserror::Error;

/// Result alias for mmap-stream operations.
pub type Result<T> = std::result::Result<T, StreamError>;

/// Error type covering argument validation, mode enforcement, position
/// limits, and underlying OS failures.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Wrapper for `std::io::Error` from open/stat/mmap/truncate.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error for malformed inputs such as an unknown mode string or an
    /// empty path.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Error returned when an operation is not permitted by the mode the
    /// stream was opened with.
    #[error("permission denied: {0}")]
    PermissionDenied(&'static str),

    /// Error when a seek target resolves outside `[0, end]`.
    #[error("position out of range: position={position}, end={end}")]
    OutOfRange {
        /// Requested seek position, as given by the caller.
        position: i64,
        /// Logical end-of-stream the position was checked against.
        end: u64,
    },

    /// Error when a size or position cannot be represented in the stream's
    /// signed position type.
    #[error("file too large: size {size} exceeds the representable position range")]
    FileTooLarge {
        /// The offending size or position.
        size: u64,
    },

    /// Error when the environment cannot provide a usable I/O block size.
    #[error("unsupported environment: {0}")]
    Unsupported(&'static str),

    /// Error when a flush operation fails.
    #[error("flush failed: {0}")]
    FlushFailed(String),
}

impl From<StreamError> for io::Error {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::Io(e) => e,
            StreamError::InvalidArgument(msg) => io::Error::new(io::ErrorKind::InvalidInput, msg),
            StreamError::PermissionDenied(msg) => {
                io::Error::new(io::ErrorKind::PermissionDenied, msg)
            }
            e @ StreamError::OutOfRange { .. } => {
                io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
            }
            e @ StreamError::FileTooLarge { .. } => {
                io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
            }
            StreamError::Unsupported(msg) => io::Error::new(io::ErrorKind::Unsupported, msg),
            e @ StreamError::FlushFailed(_) => io::Error::new(io::ErrorKind::Other, e.to_string()),
        }
    }
}
