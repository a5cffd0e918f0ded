//! Seekable byte-stream over a file, backed by a sliding mapped window.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::errors::{Result, StreamError};
use crate::flush::FlushPolicy;
use crate::mode::StreamMode;
use crate::utils::{
    advance_position, align_down, fs_block_size, page_size, select_block_size, MAX_POSITION,
};
use crate::window::Window;

/// Seekable, buffered byte stream over a regular file, backed by a single
/// sliding memory-mapped window.
///
/// The stream keeps exactly one block-aligned window mapped at a time and
/// transparently remaps it whenever the cursor leaves the covered range.
/// Writes past the allocated file size grow the file in block-aligned steps;
/// the logical end-of-stream advances only as far as the bytes actually
/// written, and the file is truncated back down to it when the stream is
/// dropped.
///
/// A stream is single-owner: every mutating operation takes `&mut self` and
/// no internal locking is performed. Concurrent access to one file through
/// multiple streams is subject only to the OS's shared-mapping guarantees.
///
/// # Examples
///
/// ```no_run
/// use mmap_stream::{MappedStream, StreamMode};
///
/// let mut stream = MappedStream::open("data.bin", StreamMode::WriteUpdate)?;
/// stream.write(b"HelloWorld")?;
/// stream.seek(-5)?;
/// let mut tail = [0u8; 5];
/// stream.read(&mut tail)?;
/// assert_eq!(&tail, b"World");
/// stream.sync()?;
/// # Ok::<(), mmap_stream::StreamError>(())
/// ```
pub struct MappedStream {
    file: File,
    path: PathBuf,
    mode: StreamMode,
    window: Option<Window>,
    block_size: u64,
    cursor: u64,
    end_pos: u64,
    allocated: u64,
    flush_policy: FlushPolicy,
    dirty: u64,
}

impl fmt::Debug for MappedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedStream")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("cursor", &self.cursor)
            .field("end", &self.end_pos)
            .field("allocated", &self.allocated)
            .field("block_size", &self.block_size)
            .finish()
    }
}

impl MappedStream {
    /// Open the file at `path` in the given mode.
    ///
    /// The stream's I/O block size is chosen at open time: the larger of the
    /// system page size and the filesystem's reported optimal block size,
    /// provided the latter is an integer multiple of the page size.
    ///
    /// The writable modes open the descriptor read-write even for
    /// [`StreamMode::Write`], because a shared writable mapping needs a
    /// readable descriptor; write-only-ness is enforced by [`read`] itself.
    /// Files are created with permission bits `0o664` on Unix.
    ///
    /// [`read`]: MappedStream::read
    ///
    /// # Errors
    ///
    /// Returns `StreamError::InvalidArgument` for an empty path,
    /// `StreamError::Unsupported` when no usable page size can be
    /// determined, `StreamError::FileTooLarge` when the file size exceeds
    /// the representable position range, and `StreamError::Io` for OS
    /// open/stat failures.
    pub fn open<P: AsRef<Path>>(path: P, mode: StreamMode) -> Result<Self> {
        let path_ref = path.as_ref();
        if path_ref.as_os_str().is_empty() {
            return Err(StreamError::InvalidArgument("path must not be empty"));
        }

        let page = page_size();
        if page == 0 {
            return Err(StreamError::Unsupported(
                "cannot determine the system page size",
            ));
        }

        let mut options = OpenOptions::new();
        options.read(true).write(mode.can_write());
        if mode.truncates() {
            options.create(true).truncate(true);
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o664);
        }

        // From here on, any failure path closes the descriptor when `file`
        // drops.
        let file = options.open(path_ref)?;
        let metadata = file.metadata()?;
        let size = metadata.len();
        if size > MAX_POSITION {
            return Err(StreamError::FileTooLarge { size });
        }
        let block_size = select_block_size(page, fs_block_size(&metadata));

        Ok(Self {
            file,
            path: path_ref.to_path_buf(),
            mode,
            window: None,
            block_size,
            cursor: 0,
            end_pos: size,
            allocated: size,
            flush_policy: FlushPolicy::default(),
            dirty: 0,
        })
    }

    /// Start building a stream with non-default options.
    #[must_use]
    pub fn options() -> StreamOptions {
        StreamOptions::new()
    }

    /// Write `buf` at the cursor, growing the stream as needed.
    ///
    /// The backing file grows in block-aligned steps ahead of the logical
    /// end; the logical end advances only as far as the bytes written. On
    /// success the full buffer has been copied. A mapping or growth failure
    /// mid-loop leaves the bytes copied before the failure in place.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::PermissionDenied` if the stream is not open
    /// for writing, `StreamError::FileTooLarge` if the write would advance
    /// the cursor past the representable position range, and
    /// `StreamError::Io` for mmap/grow failures.
    #[allow(clippy::cast_possible_truncation)]
    pub fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if !self.mode.can_write() {
            return Err(StreamError::PermissionDenied(
                "stream is not open for writing",
            ));
        }
        let target = advance_position(self.cursor, buf.len() as u64)?;

        let mut copied = 0usize;
        while self.cursor < target {
            let cursor = self.cursor;
            let window = self.write_window()?;
            let chunk = (target.min(window.end()) - cursor) as usize;
            let window_pos = (cursor - window.offset()) as usize;
            let dst = window.as_slice_mut().ok_or(StreamError::PermissionDenied(
                "stream window is read-only",
            ))?;
            dst[window_pos..window_pos + chunk].copy_from_slice(&buf[copied..copied + chunk]);
            self.cursor += chunk as u64;
            copied += chunk;
            if self.cursor > self.end_pos {
                self.end_pos = self.cursor;
            }
        }

        self.apply_flush_policy(copied as u64)?;
        Ok(copied)
    }

    /// Read up to `buf.len()` bytes at the cursor into `buf`.
    ///
    /// The read is clamped at the logical end-of-stream: the returned count
    /// may be short, and reading at or past the end yields `Ok(0)` rather
    /// than an error.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::PermissionDenied` if the stream is not open
    /// for reading and `StreamError::Io` for mmap failures.
    #[allow(clippy::cast_possible_truncation)]
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.mode.can_read() {
            return Err(StreamError::PermissionDenied(
                "stream is not open for reading",
            ));
        }
        // Widened arithmetic: `end - cursor` saturates instead of reproducing
        // the underflow a naive `cursor > end - len` comparison would hit.
        let len = (buf.len() as u64).min(self.end_pos.saturating_sub(self.cursor));
        let target = self.cursor + len;

        let mut copied = 0usize;
        while self.cursor < target {
            let cursor = self.cursor;
            let window = self.read_window()?;
            let chunk = (target.min(window.end()) - cursor) as usize;
            let window_pos = (cursor - window.offset()) as usize;
            buf[copied..copied + chunk]
                .copy_from_slice(&window.as_slice()[window_pos..window_pos + chunk]);
            self.cursor += chunk as u64;
            copied += chunk;
        }
        Ok(copied)
    }

    /// Move the cursor to `position` and return the resolved absolute
    /// position.
    ///
    /// A negative position is interpreted relative to the end of the stream
    /// (`position + end`). The resolved position must lie in `[0, end]`;
    /// seeking to exactly `end` is legal and is the prelude to an appending
    /// write.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::OutOfRange` when the resolved position falls
    /// outside `[0, end]`.
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn seek(&mut self, position: i64) -> Result<u64> {
        // end_pos never exceeds i64::MAX, so the wrap lint is satisfied by
        // construction and `position + end` cannot overflow for negative
        // positions.
        let end = self.end_pos as i64;
        let resolved = if position < 0 { position + end } else { position };
        if resolved < 0 || resolved > end {
            return Err(StreamError::OutOfRange {
                position,
                end: self.end_pos,
            });
        }
        self.cursor = resolved as u64;
        Ok(self.cursor)
    }

    /// Current cursor position.
    #[must_use]
    pub fn tell(&self) -> u64 {
        self.cursor
    }

    /// Logical end-of-stream position: the highest byte ever written, or
    /// the file's size at open time.
    #[must_use]
    pub fn end(&self) -> u64 {
        self.end_pos
    }

    /// Whether the stream contains no logical bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end_pos == 0
    }

    /// The block size the window is aligned and sized to.
    #[must_use]
    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    /// The mode the stream was opened with.
    #[must_use]
    pub fn mode(&self) -> StreamMode {
        self.mode
    }

    /// Path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush the current window synchronously to the backing file.
    ///
    /// No-op success when no window is mapped or the window is read-only.
    /// Does not adjust the allocation or the logical end.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::FlushFailed` if the flush fails.
    pub fn sync(&mut self) -> Result<()> {
        self.dirty = 0;
        match &self.window {
            Some(window) => window.flush(),
            None => Ok(()),
        }
    }

    /// Consume the stream, releasing its resources.
    ///
    /// Teardown is best-effort and happens in fixed order: unmap the
    /// window, truncate speculative over-allocation back down to the
    /// logical end, close the descriptor. Failures are logged, never
    /// returned. Dropping the stream performs the same teardown.
    pub fn close(self) {
        drop(self);
    }

    /// Return the current window when it covers the cursor, or retire it
    /// and map a fresh write window: block-aligned, exactly one block long,
    /// growing the file when the window's upper bound exceeds the
    /// allocation.
    fn write_window(&mut self) -> Result<&mut Window> {
        let covered = self
            .window
            .as_ref()
            .is_some_and(|w| w.covers(self.cursor));
        if covered {
            return Ok(self.window.as_mut().unwrap());
        }

        // The stale window must be unmapped before the file is grown or a
        // replacement is mapped.
        self.window = None;
        let offset = align_down(self.cursor, self.block_size);
        let upper = offset + self.block_size;
        if upper > self.allocated {
            self.file.set_len(upper)?;
            debug!(
                "grew {} from {} to {} bytes",
                self.path.display(),
                self.allocated,
                upper
            );
            self.allocated = upper;
        }
        let window = Window::map_rw(&self.file, offset, self.block_size)?;
        Ok(self.window.insert(window))
    }

    /// Return the current window when it covers the cursor, or retire it
    /// and map a fresh read window, clamped so the mapping never extends
    /// past the file's allocation.
    fn read_window(&mut self) -> Result<&Window> {
        let covered = self
            .window
            .as_ref()
            .is_some_and(|w| w.covers(self.cursor));
        if covered {
            return Ok(self.window.as_ref().unwrap());
        }

        self.window = None;
        let offset = align_down(self.cursor, self.block_size);
        let len = self.block_size.min(self.allocated - offset);
        let window = if self.mode.can_write() {
            Window::map_rw(&self.file, offset, len)?
        } else {
            Window::map_ro(&self.file, offset, len)?
        };
        Ok(self.window.insert(window))
    }

    fn apply_flush_policy(&mut self, written: u64) -> Result<()> {
        match self.flush_policy {
            FlushPolicy::Never => Ok(()),
            FlushPolicy::Always => self.sync(),
            FlushPolicy::EveryBytes(threshold) => {
                self.dirty += written;
                if self.dirty >= threshold {
                    self.sync()
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl Drop for MappedStream {
    fn drop(&mut self) {
        // Unmap before truncating so no window outlives the allocation.
        self.window = None;
        if self.end_pos < self.allocated {
            if let Err(e) = self.file.set_len(self.end_pos) {
                warn!(
                    "failed to trim {} to {} bytes: {}",
                    self.path.display(),
                    self.end_pos,
                    e
                );
            }
        }
    }
}

/// Builder for [`MappedStream`] with explicit mode and flush policy.
///
/// # Examples
///
/// ```no_run
/// use mmap_stream::{FlushPolicy, MappedStream, StreamMode};
///
/// let stream = MappedStream::options()
///     .mode(StreamMode::WriteUpdate)
///     .flush_policy(FlushPolicy::EveryBytes(8192))
///     .open("data.bin")?;
/// # Ok::<(), mmap_stream::StreamError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct StreamOptions {
    mode: Option<StreamMode>,
    flush_policy: FlushPolicy,
}

impl StreamOptions {
    /// Create a builder with default options (read-only, never flush
    /// implicitly).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the open mode (default: [`StreamMode::Read`]).
    #[must_use]
    pub fn mode(mut self, mode: StreamMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set the flush policy applied after writes (default:
    /// [`FlushPolicy::Never`]).
    #[must_use]
    pub fn flush_policy(mut self, policy: FlushPolicy) -> Self {
        self.flush_policy = policy;
        self
    }

    /// Open the stream at `path` with the configured options.
    ///
    /// # Errors
    ///
    /// Returns errors from [`MappedStream::open`].
    pub fn open<P: AsRef<Path>>(self, path: P) -> Result<MappedStream> {
        let mut stream = MappedStream::open(path, self.mode.unwrap_or(StreamMode::Read))?;
        stream.flush_policy = self.flush_policy;
        Ok(stream)
    }
}

impl io::Read for MappedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        MappedStream::read(self, buf).map_err(io::Error::from)
    }
}

impl io::Write for MappedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        MappedStream::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sync().map_err(io::Error::from)
    }
}

impl io::Seek for MappedStream {
    /// Seek within the stream's logical bounds.
    ///
    /// Unlike plain files, a mapped stream cannot seek past its logical
    /// end; such targets report `InvalidInput`.
    #[allow(clippy::cast_possible_wrap)]
    fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
        let before_start =
            || io::Error::new(io::ErrorKind::InvalidInput, "seek before start of stream");
        let target = match pos {
            io::SeekFrom::Start(p) => i64::try_from(p).map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "seek position exceeds the representable range",
                )
            })?,
            // Resolve to an absolute target first; handing a negative value
            // to the native seek would re-resolve it end-relative.
            io::SeekFrom::End(delta) => (self.end_pos as i64)
                .checked_add(delta)
                .filter(|t| *t >= 0)
                .ok_or_else(before_start)?,
            io::SeekFrom::Current(delta) => (self.cursor as i64)
                .checked_add(delta)
                .filter(|t| *t >= 0)
                .ok_or_else(before_start)?,
        };
        MappedStream::seek(self, target).map_err(io::Error::from)
    }
}
