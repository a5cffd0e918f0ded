//! The sliding mapped window over a block-aligned region of a file.

use std::fs::File;

use memmap2::{Mmap, MmapMut, MmapOptions};

use crate::errors::{Result, StreamError};

/// Mapping variant matching the stream's protection mode.
pub(crate) enum WindowMap {
    Ro(Mmap),
    Rw(MmapMut),
}

/// A single mapped window covering `[offset, offset + len)` of the backing
/// file. The offset must be page-aligned and the range must lie within the
/// file's current allocation.
pub(crate) struct Window {
    map: WindowMap,
    offset: u64,
    len: u64,
}

impl Window {
    /// Map `[offset, offset + len)` of `file` read-only.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn map_ro(file: &File, offset: u64, len: u64) -> Result<Self> {
        // SAFETY: the stream keeps `file` open for the lifetime of the map,
        // and the caller guarantees the range lies within the allocation.
        let map = unsafe { MmapOptions::new().offset(offset).len(len as usize).map(file)? };
        Ok(Self {
            map: WindowMap::Ro(map),
            offset,
            len,
        })
    }

    /// Map `[offset, offset + len)` of `file` read-write.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn map_rw(file: &File, offset: u64, len: u64) -> Result<Self> {
        // SAFETY: as for `map_ro`; the descriptor is open read-write.
        let map = unsafe {
            MmapOptions::new()
                .offset(offset)
                .len(len as usize)
                .map_mut(file)?
        };
        Ok(Self {
            map: WindowMap::Rw(map),
            offset,
            len,
        })
    }

    /// Cache-validity test: whether this window covers the byte at `pos`.
    pub(crate) fn covers(&self, pos: u64) -> bool {
        pos >= self.offset && pos < self.offset + self.len
    }

    /// Offset of the first mapped byte.
    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }

    /// Upper bound (exclusive) of the mapped range.
    pub(crate) fn end(&self) -> u64 {
        self.offset + self.len
    }

    /// Read-only view of the mapped bytes.
    pub(crate) fn as_slice(&self) -> &[u8] {
        match &self.map {
            WindowMap::Ro(m) => m,
            WindowMap::Rw(m) => m,
        }
    }

    /// Mutable view of the mapped bytes; `None` for read-only windows.
    pub(crate) fn as_slice_mut(&mut self) -> Option<&mut [u8]> {
        match &mut self.map {
            WindowMap::Ro(_) => None,
            WindowMap::Rw(m) => Some(&mut m[..]),
        }
    }

    /// Flush the window synchronously to the backing file. No-op for
    /// read-only windows.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::FlushFailed` if the flush fails.
    pub(crate) fn flush(&self) -> Result<()> {
        match &self.map {
            WindowMap::Ro(_) => Ok(()),
            WindowMap::Rw(m) => m
                .flush()
                .map_err(|e| StreamError::FlushFailed(e.to_string())),
        }
    }
}
