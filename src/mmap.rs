//! Memory mapping and advisory hints.
//!
//! None of these operations retry on interruption: the OS does not document
//! interruption for them. A mapping is released only by an explicit
//! [`unmap`]; nothing is tracked or freed on drop.

use std::ptr::{self, NonNull};

use libc::c_void;

use crate::error::{AdviseError, InvalidRangeError, MapError, OsError};
use crate::fd::Fd;
use crate::flags::{MSyncFlags, MapFlags, MemAdvice, Protection, SysConfName};
use crate::syscall::{check, err_no};

#[cfg(not(any(target_os = "linux", target_os = "android")))]
use crate::error::NotSupportedError;

const fn check_length(length: u64) -> Result<usize, InvalidRangeError> {
    if length > usize::MAX as u64 {
        return Err(InvalidRangeError);
    }
    Ok(length as usize)
}

/// Maps `length` bytes of `fd` at `offset` into the address space, or an
/// anonymous region when the flags say so and `fd` is [`Fd::NONE`].
///
/// On success the base address is never null. `address` is a placement hint
/// unless the kernel is told otherwise.
///
/// # Safety
/// A successful mapping aliases whatever the kernel places at the returned
/// range. The caller owns the range until [`unmap`]: it must not let safe
/// references into the mapping outlive it, and a shared file mapping makes
/// the memory contents depend on every other process with the same file.
pub unsafe fn map(
    address: Option<NonNull<c_void>>,
    length: u64,
    protection: Protection,
    flags: MapFlags,
    fd: Fd,
    offset: i64,
) -> Result<NonNull<c_void>, MapError> {
    let length = check_length(length)?;
    let hint = address.map_or(ptr::null_mut(), NonNull::as_ptr);

    // SAFETY: the caller upholds the aliasing contract; every argument is
    // validated or forwarded for the kernel to reject.
    let ret = unsafe {
        #[cfg(any(target_os = "linux", target_os = "android"))]
        {
            libc::mmap64(
                hint,
                length,
                protection.to_native(),
                flags.to_native(),
                fd.raw(),
                offset,
            )
        }
        #[cfg(not(any(target_os = "linux", target_os = "android")))]
        {
            libc::mmap(
                hint,
                length,
                protection.to_native(),
                flags.to_native(),
                fd.raw(),
                offset as libc::off_t,
            )
        }
    };

    if ret == libc::MAP_FAILED {
        return Err(OsError(err_no()).into());
    }
    debug_assert!(!ret.is_null(), "a successful mapping is never at null");
    // SAFETY: checked against MAP_FAILED; the kernel does not hand out null
    // mappings.
    Ok(unsafe { NonNull::new_unchecked(ret) })
}

/// Releases a mapped range.
///
/// # Safety
/// `address`/`length` must denote a range produced by [`map`] and not yet
/// unmapped; any pointer into it is dangling afterwards.
pub unsafe fn unmap(address: NonNull<c_void>, length: u64) -> Result<(), MapError> {
    let length = check_length(length)?;
    // SAFETY: the caller guarantees the range is a live mapping.
    check(unsafe { libc::munmap(address.as_ptr(), length) })
        .map(drop)
        .map_err(MapError::from)
}

/// Applies an advisory hint to a mapped sub-range.
///
/// Hints are optional by contract, so a platform without the hint reports
/// not-supported rather than failing loudly.
///
/// # Safety
/// `address`/`length` must lie within a live mapping.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub unsafe fn advise(
    address: NonNull<c_void>,
    length: u64,
    advice: MemAdvice,
) -> Result<(), AdviseError> {
    let length = check_length(length)?;
    // SAFETY: the caller guarantees the range lies within a live mapping.
    check(unsafe { libc::madvise(address.as_ptr(), length, advice.to_native()) })
        .map(drop)
        .map_err(AdviseError::from)
}

/// Applies an advisory hint to a mapped sub-range. The hint is not
/// supported on this platform.
///
/// # Safety
/// `address`/`length` must lie within a live mapping.
#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub unsafe fn advise(
    address: NonNull<c_void>,
    length: u64,
    advice: MemAdvice,
) -> Result<(), AdviseError> {
    let _ = (address, check_length(length)?, advice);
    Err(NotSupportedError.into())
}

/// Flushes modified pages of a mapped sub-range back to their file,
/// optionally invalidating other mappings of it.
///
/// # Safety
/// `address`/`length` must lie within a live mapping.
pub unsafe fn sync_mapping(
    address: NonNull<c_void>,
    length: u64,
    flags: MSyncFlags,
) -> Result<(), MapError> {
    let length = check_length(length)?;
    // SAFETY: the caller guarantees the range lies within a live mapping.
    check(unsafe { libc::msync(address.as_ptr(), length, flags.to_native()) })
        .map(drop)
        .map_err(MapError::from)
}

/// Queries a system configuration value, such as the page size a mapping
/// will be rounded to.
pub fn sys_conf(name: SysConfName) -> Result<i64, OsError> {
    // SAFETY: sysconf reads a static configuration table.
    check(unsafe { libc::sysconf(name.to_native()) }).map(|value| value as i64)
}
