//! Utility helpers for page size, block size selection, and position math.

use crate::errors::{Result, StreamError};

/// Largest position representable by the public (signed) seek type.
pub(crate) const MAX_POSITION: u64 = i64::MAX as u64;

/// Get the system page size in bytes.
#[must_use]
pub fn page_size() -> u64 {
    cfg_if::cfg_if! {
        if #[cfg(target_os = "windows")] {
            windows_page_size()
        } else {
            unix_page_size()
        }
    }
}

#[cfg(target_os = "windows")]
fn windows_page_size() -> u64 {
    use std::mem::MaybeUninit;
    #[allow(non_snake_case)]
    #[repr(C)]
    struct SYSTEM_INFO {
        wProcessorArchitecture: u16,
        wReserved: u16,
        dwPageSize: u32,
        lpMinimumApplicationAddress: *mut core::ffi::c_void,
        lpMaximumApplicationAddress: *mut core::ffi::c_void,
        dwActiveProcessorMask: usize,
        dwNumberOfProcessors: u32,
        dwProcessorType: u32,
        dwAllocationGranularity: u32,
        wProcessorLevel: u16,
        wProcessorRevision: u16,
    }
    extern "system" {
        fn GetSystemInfo(lpSystemInfo: *mut SYSTEM_INFO);
    }
    let mut sysinfo = MaybeUninit::<SYSTEM_INFO>::uninit();
    unsafe {
        GetSystemInfo(sysinfo.as_mut_ptr());
        let s = sysinfo.assume_init();
        u64::from(s.dwPageSize)
    }
}

#[cfg(not(target_os = "windows"))]
#[allow(clippy::cast_sign_loss)]
fn unix_page_size() -> u64 {
    // SAFETY: sysconf with _SC_PAGESIZE is safe to call.
    unsafe {
        let page_size = libc::sysconf(libc::_SC_PAGESIZE);
        // A failed query reports as 0 and is rejected by the caller.
        page_size.max(0) as u64
    }
}

/// Filesystem-reported optimal I/O block size for a file, when the platform
/// exposes one.
#[must_use]
pub fn fs_block_size(metadata: &std::fs::Metadata) -> Option<u64> {
    cfg_if::cfg_if! {
        if #[cfg(unix)] {
            unix_fs_block_size(metadata)
        } else {
            other_fs_block_size(metadata)
        }
    }
}

#[cfg(unix)]
fn unix_fs_block_size(metadata: &std::fs::Metadata) -> Option<u64> {
    use std::os::unix::fs::MetadataExt;
    Some(metadata.blksize())
}

#[cfg(not(unix))]
fn other_fs_block_size(_metadata: &std::fs::Metadata) -> Option<u64> {
    None
}

/// Select the stream's I/O block size.
///
/// The filesystem's reported block size wins when it is a strict integer
/// multiple (quotient > 1) of the page size; otherwise the page size alone
/// is used.
#[must_use]
pub fn select_block_size(page: u64, fs_block: Option<u64>) -> u64 {
    match fs_block {
        Some(block) if block > page && page > 0 && block % page == 0 => block,
        _ => page,
    }
}

/// Align a value down to the nearest multiple of `alignment`.
#[must_use]
pub fn align_down(value: u64, alignment: u64) -> u64 {
    if alignment == 0 {
        return value;
    }
    // Fast path for power-of-2 alignments (common case for page sizes)
    if alignment.is_power_of_two() {
        value & !(alignment - 1)
    } else {
        (value / alignment) * alignment
    }
}

/// Compute `cursor + len`, failing when the result does not fit the
/// stream's signed position type.
///
/// # Errors
///
/// Returns `StreamError::FileTooLarge` on overflow.
pub fn advance_position(cursor: u64, len: u64) -> Result<u64> {
    match cursor.checked_add(len) {
        Some(end) if end <= MAX_POSITION => Ok(end),
        _ => Err(StreamError::FileTooLarge {
            size: cursor.saturating_add(len),
        }),
    }
}
