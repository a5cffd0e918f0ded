//! # mmap-stream: seekable byte-stream file I/O over mapped windows
//!
//! This crate provides a cursor-based stream interface (open, read, write,
//! seek, tell, sync, close) over a regular file, backed internally by
//! demand-mapped memory windows instead of read/write syscalls.
//!
//! ## Features
//!
//! - **Sliding window**: one block-aligned mapping at a time, remapped
//!   transparently as the cursor moves
//! - **Zero-copy transfers**: bytes move through the OS page cache, not
//!   intermediate buffers
//! - **Growth on demand**: writes past the end grow the backing file in
//!   block-aligned steps; the on-disk size is trimmed back to the logical
//!   end on close
//! - **Typed failures**: every failure kind is a distinct error variant
//!
//! ## Quick Start
//!
//! ```no_run
//! use mmap_stream::{open_stream, StreamMode};
//!
//! // Create-or-truncate, read-write
//! let mut stream = open_stream("data.bin", "w+")?;
//!
//! stream.write(b"HelloWorld")?;
//! assert_eq!(stream.end(), 10);
//!
//! // Negative positions are end-relative
//! stream.seek(-5)?;
//! let mut tail = [0u8; 5];
//! stream.read(&mut tail)?;
//! assert_eq!(&tail, b"World");
//! # Ok::<(), mmap_stream::StreamError>(())
//! ```
//!
//! ## Modules
//!
//! - [`errors`]: Error types for all stream operations
//! - [`mode`]: Open modes and the stdio-style mode strings
//! - [`flush`]: Flush policy configuration
//! - [`utils`]: Page size, block size selection, and position math
//! - [`stream`]: Core [`MappedStream`] implementation
//! - [`manager`]: High-level convenience functions

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(missing_docs)]
#![doc(html_root_url = "https://docs.rs/mmap-stream")]

pub mod errors;
pub mod flush;
pub mod manager;
pub mod mode;
pub mod stream;
pub mod utils;

mod window;

pub use errors::StreamError;
pub use flush::FlushPolicy;
pub use manager::{append_stream, delete_stream, open_stream, read_remaining, sync_stream};
pub use mode::StreamMode;
pub use stream::{MappedStream, StreamOptions};
