//! Flush policy configuration for MappedStream.
//!
//! Controls when writes through the mapped window should be flushed to the
//! backing file.

/// Policy controlling when to flush the dirty window to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushPolicy {
    /// Never flush implicitly; `sync()` must be called by the user.
    #[default]
    Never,
    /// Flush after every write call.
    Always,
    /// Flush when at least N bytes have been written since the last flush.
    EveryBytes(u64),
}
