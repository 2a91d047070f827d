//! File descriptor lifecycle and attribute operations.
//!
//! A [`Fd`] is a plain copyable projection of an OS descriptor: this layer
//! never tracks validity, never caches, and never closes on drop. Every
//! descriptor acquired through [`open`], [`dup`], [`pipe`], [`shm_open`] or
//! [`mks_temps`] stays alive until the caller passes it to [`close`].
//!
//! Operations that can fail with "interrupted by signal" retry transparently
//! ([`close`] deliberately never does: the descriptor's fate after an
//! interrupted close is unspecified, and retrying could close an unrelated,
//! freshly-allocated descriptor). All other failures forward the OS error
//! code unchanged.

mod fcntl;
mod ops;
mod tests;

pub use fcntl::*;
pub use ops::*;

use std::ffi::CStr;
use std::os::fd::RawFd;

use libc::c_uint;

use crate::error::{GatedError, OsError};
use crate::flags::{AccessMode, OpenFlags};
use crate::syscall::{check, retry_intr};

/// An OS file descriptor.
///
/// Validity is tracked by the kernel alone; a stale value is rejected by the
/// next operation with the usual error code. Copying does not duplicate the
/// underlying descriptor - see [`dup`] for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fd(RawFd);

impl Fd {
    /// The "no file" sentinel accepted by [`mmap::map`](crate::mmap::map)
    /// for anonymous mappings.
    pub const NONE: Fd = Fd(-1);

    /// Wraps a raw descriptor value without taking ownership of it.
    pub fn from_raw(raw: RawFd) -> Fd {
        debug_assert!(raw >= 0, "raw file descriptors are non-negative");
        Fd(raw)
    }

    /// The raw descriptor value.
    pub const fn raw(self) -> RawFd {
        self.0
    }
}

/// Opens `path`, translating the portable access mode and flags to the
/// native encoding.
///
/// Close-on-exec is requested atomically at creation time; every supported
/// platform has an atomic encoding for it, so there is no follow-up call
/// and no window where the descriptor can leak across a concurrent exec
/// (contrast [`pipe`]).
pub fn open(path: &CStr, access: AccessMode, flags: OpenFlags, mode: u32) -> Result<Fd, OsError> {
    let native = access.to_native() | flags.to_native();
    // SAFETY: path is NUL-terminated and outlives the call.
    check(retry_intr(|| unsafe { libc::open(path.as_ptr(), native, mode as c_uint) })).map(Fd)
}

/// Closes a descriptor. Never retried; an already-invalid handle reports
/// the usual error code rather than anything undefined at this boundary.
pub fn close(fd: Fd) -> Result<(), OsError> {
    // SAFETY: no memory is involved; the kernel rejects stale descriptors.
    check(unsafe { libc::close(fd.raw()) }).map(drop)
}

/// Duplicates a descriptor. The duplicate is always close-on-exec.
pub fn dup(fd: Fd) -> Result<Fd, OsError> {
    // SAFETY: plain descriptor-table manipulation.
    check(retry_intr(|| unsafe { libc::fcntl(fd.raw(), libc::F_DUPFD_CLOEXEC, 0) })).map(Fd)
}

/// Creates a pipe, returning `(read_end, write_end)`.
#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
))]
pub fn pipe(close_on_exec: bool) -> Result<(Fd, Fd), OsError> {
    let mut fds = [0 as RawFd; 2];
    let flags = if close_on_exec { libc::O_CLOEXEC } else { 0 };
    // SAFETY: fds points to two writable descriptor slots.
    check(retry_intr(|| unsafe { libc::pipe2(fds.as_mut_ptr(), flags) }))?;
    Ok((Fd(fds[0]), Fd(fds[1])))
}

/// Creates a pipe, returning `(read_end, write_end)`.
///
/// Without an atomic creation flag on this platform, close-on-exec is
/// applied by a follow-up call per descriptor; a concurrent exec in that
/// window inherits the pipe. The caller accepts this race by using this
/// operation here.
#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
)))]
pub fn pipe(close_on_exec: bool) -> Result<(Fd, Fd), OsError> {
    let mut fds = [0 as RawFd; 2];
    // SAFETY: fds points to two writable descriptor slots.
    check(retry_intr(|| unsafe { libc::pipe(fds.as_mut_ptr()) }))?;
    if close_on_exec {
        for fd in fds {
            // SAFETY: fd was just created by pipe.
            let set = check(retry_intr(|| unsafe {
                libc::fcntl(fd, libc::F_SETFD, libc::FD_CLOEXEC)
            }));
            if let Err(e) = set {
                // SAFETY: both ends were created above and are not yet
                // visible to the caller.
                unsafe {
                    libc::close(fds[0]);
                    libc::close(fds[1]);
                }
                return Err(e);
            }
        }
    }
    Ok((Fd(fds[0]), Fd(fds[1])))
}

/// Opens a POSIX shared memory object.
///
/// Gated on [`caps::has_shared_memory_objects`](crate::caps::has_shared_memory_objects):
/// some platforms have the call but their objects do not interoperate with
/// memory mapping, and those report not-supported instead.
#[cfg(not(target_os = "android"))]
pub fn shm_open(name: &CStr, access: AccessMode, flags: OpenFlags, mode: u32) -> Result<Fd, GatedError> {
    let native = access.to_native() | flags.to_native();
    // SAFETY: name is NUL-terminated and outlives the call.
    check(unsafe { libc::shm_open(name.as_ptr(), native, mode as c_uint) })
        .map(Fd)
        .map_err(Into::into)
}

/// Opens a POSIX shared memory object.
#[cfg(target_os = "android")]
pub fn shm_open(name: &CStr, access: AccessMode, flags: OpenFlags, mode: u32) -> Result<Fd, GatedError> {
    let _ = (name, access, flags, mode);
    Err(crate::error::NotSupportedError.into())
}

/// Removes a shared memory object name.
#[cfg(not(target_os = "android"))]
pub fn shm_unlink(name: &CStr) -> Result<(), GatedError> {
    // SAFETY: name is NUL-terminated and outlives the call.
    check(retry_intr(|| unsafe { libc::shm_unlink(name.as_ptr()) }))
        .map(drop)
        .map_err(Into::into)
}

/// Removes a shared memory object name.
#[cfg(target_os = "android")]
pub fn shm_unlink(name: &CStr) -> Result<(), GatedError> {
    let _ = name;
    Err(crate::error::NotSupportedError.into())
}

/// Creates and opens a unique temporary file.
///
/// `template` is a NUL-terminated path whose six placeholder characters
/// (followed by `suffix_len` fixed trailing characters) are replaced in
/// place, so the caller can read the chosen name back out of it.
#[cfg(not(target_os = "android"))]
pub fn mks_temps(template: &mut [u8], suffix_len: usize) -> Result<Fd, OsError> {
    debug_assert!(template.last() == Some(&0), "template must be NUL-terminated");
    // SAFETY: template is writable, NUL-terminated and outlives the call.
    check(retry_intr(|| unsafe {
        libc::mkstemps(template.as_mut_ptr().cast(), suffix_len as libc::c_int)
    }))
    .map(Fd)
}

/// Creates and opens a unique temporary file.
///
/// This platform only has the suffix-less primitive, so the suffix is
/// spliced out around the call: its first byte is swapped for a terminator
/// and restored afterwards.
#[cfg(target_os = "android")]
pub fn mks_temps(template: &mut [u8], suffix_len: usize) -> Result<Fd, OsError> {
    debug_assert!(template.last() == Some(&0), "template must be NUL-terminated");
    let len = template.len().saturating_sub(1);

    // The placeholder section must hold at least the six replaced bytes.
    if suffix_len > len || len - suffix_len < 6 {
        return Err(OsError(libc::EINVAL));
    }

    let first_suffix = len - suffix_len;
    let saved = template[first_suffix];
    template[first_suffix] = 0;

    // SAFETY: template is writable, NUL-terminated and outlives the call.
    let result = check(retry_intr(|| unsafe {
        libc::mkstemp(template.as_mut_ptr().cast())
    }));

    template[first_suffix] = saved;
    result.map(Fd)
}
