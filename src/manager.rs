//! High-level API for working with mapped streams.
//!
//! Provides convenience functions that wrap the cursor-level stream
//! operations.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::errors::{Result, StreamError};
use crate::mode::StreamMode;
use crate::stream::MappedStream;

/// Open a stream using a stdio-style mode string (`"r"`, `"r+"`, `"w"`,
/// `"w+"`).
///
/// # Errors
///
/// Returns `StreamError::InvalidArgument` for an unknown mode string, and
/// otherwise errors from `MappedStream::open`.
pub fn open_stream<P: AsRef<Path>>(path: P, mode: &str) -> Result<MappedStream> {
    let mode = StreamMode::from_str(mode)?;
    MappedStream::open(path, mode)
}

/// Read everything between the cursor and the logical end into a vector.
///
/// # Errors
///
/// Returns errors from `MappedStream::read`.
#[allow(clippy::cast_possible_truncation)]
pub fn read_remaining(stream: &mut MappedStream) -> Result<Vec<u8>> {
    let remaining = stream.end().saturating_sub(stream.tell()) as usize;
    let mut buf = vec![0u8; remaining];
    let n = stream.read(&mut buf)?;
    buf.truncate(n);
    Ok(buf)
}

/// Seek to the logical end and write `data`, extending the stream.
///
/// # Errors
///
/// Returns errors from `MappedStream::seek` or `MappedStream::write`.
pub fn append_stream(stream: &mut MappedStream, data: &[u8]) -> Result<usize> {
    let end = stream.end();
    let end = i64::try_from(end).map_err(|_| StreamError::FileTooLarge { size: end })?;
    stream.seek(end)?;
    stream.write(data)
}

/// Flush the stream's active window to the backing file.
///
/// # Errors
///
/// Returns errors from `MappedStream::sync`.
pub fn sync_stream(stream: &mut MappedStream) -> Result<()> {
    stream.sync()
}

/// Delete the file backing a stream path. Close the stream before invoking
/// this; on Unix, deleting a file that is still open keeps the data alive
/// until the last handle drops.
///
/// # Errors
///
/// Returns `StreamError::Io` if the delete operation fails.
pub fn delete_stream<P: AsRef<Path>>(path: P) -> Result<()> {
    fs::remove_file(path)?;
    Ok(())
}
