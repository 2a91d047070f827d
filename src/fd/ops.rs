use std::ffi::{CStr, CString};
use std::ptr;

use libc::mode_t;

use crate::error::{GatedError, OsError};
use crate::fd::Fd;
use crate::flags::{AccessCheck, FileAdvice, FlockKind, SeekWhence, UserFlags};
use crate::syscall::{check, err_no, retry_intr};

/// Removes a name from the filesystem.
pub fn unlink(path: &CStr) -> Result<(), OsError> {
    // SAFETY: path is NUL-terminated and outlives the call.
    check(retry_intr(|| unsafe { libc::unlink(path.as_ptr()) })).map(drop)
}

/// Creates a hard link at `link_path` referring to `source`.
pub fn link(source: &CStr, link_path: &CStr) -> Result<(), OsError> {
    // SAFETY: both paths are NUL-terminated and outlive the call.
    check(retry_intr(|| unsafe { libc::link(source.as_ptr(), link_path.as_ptr()) })).map(drop)
}

/// Creates a symbolic link at `link_path` pointing to `target`.
pub fn symlink(target: &CStr, link_path: &CStr) -> Result<(), OsError> {
    // SAFETY: both paths are NUL-terminated and outlive the call.
    check(retry_intr(|| unsafe { libc::symlink(target.as_ptr(), link_path.as_ptr()) })).map(drop)
}

/// Renames a file or directory.
pub fn rename(old_path: &CStr, new_path: &CStr) -> Result<(), OsError> {
    // SAFETY: both paths are NUL-terminated and outlive the call.
    check(retry_intr(|| unsafe { libc::rename(old_path.as_ptr(), new_path.as_ptr()) })).map(drop)
}

/// Creates a directory.
pub fn mkdir(path: &CStr, mode: u32) -> Result<(), OsError> {
    // SAFETY: path is NUL-terminated and outlives the call.
    check(retry_intr(|| unsafe { libc::mkdir(path.as_ptr(), mode as mode_t) })).map(drop)
}

/// Removes an empty directory.
pub fn rmdir(path: &CStr) -> Result<(), OsError> {
    // SAFETY: path is NUL-terminated and outlives the call.
    check(retry_intr(|| unsafe { libc::rmdir(path.as_ptr()) })).map(drop)
}

/// Changes the process working directory.
pub fn chdir(path: &CStr) -> Result<(), OsError> {
    // SAFETY: path is NUL-terminated and outlives the call.
    check(retry_intr(|| unsafe { libc::chdir(path.as_ptr()) })).map(drop)
}

/// Changes the mode bits of the file named by `path`.
pub fn chmod(path: &CStr, mode: u32) -> Result<(), OsError> {
    // SAFETY: path is NUL-terminated and outlives the call.
    check(retry_intr(|| unsafe { libc::chmod(path.as_ptr(), mode as mode_t) })).map(drop)
}

/// Changes the mode bits of an open descriptor's file.
pub fn fchmod(fd: Fd, mode: u32) -> Result<(), OsError> {
    // SAFETY: plain descriptor operation.
    check(retry_intr(|| unsafe { libc::fchmod(fd.raw(), mode as mode_t) })).map(drop)
}

/// Checks the calling process's permissions on `path`.
pub fn access(path: &CStr, check_for: AccessCheck) -> Result<(), OsError> {
    // SAFETY: path is NUL-terminated and outlives the call.
    check(unsafe { libc::access(path.as_ptr(), check_for.to_native()) }).map(drop)
}

/// Truncates or extends the file to exactly `length` bytes.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn ftruncate(fd: Fd, length: i64) -> Result<(), OsError> {
    // SAFETY: plain descriptor operation.
    check(retry_intr(|| unsafe { libc::ftruncate64(fd.raw(), length) })).map(drop)
}

/// Truncates or extends the file to exactly `length` bytes.
#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub fn ftruncate(fd: Fd, length: i64) -> Result<(), OsError> {
    // SAFETY: plain descriptor operation.
    check(retry_intr(|| unsafe { libc::ftruncate(fd.raw(), length as libc::off_t) })).map(drop)
}

/// Pre-reserves backing space for `length` bytes at `offset` without
/// changing the file's apparent size.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn fallocate(fd: Fd, offset: i64, length: i64) -> Result<(), GatedError> {
    debug_assert!(offset == 0, "callers reserve from the start of the file");
    // SAFETY: plain descriptor operation.
    check(retry_intr(|| unsafe {
        libc::fallocate64(fd.raw(), libc::FALLOC_FL_KEEP_SIZE, offset, length)
    }))
    .map(drop)
    .map_err(Into::into)
}

/// Pre-reserves backing space for `length` bytes at `offset` without
/// changing the file's apparent size.
#[cfg(any(target_os = "macos", target_os = "ios"))]
pub fn fallocate(fd: Fd, offset: i64, length: i64) -> Result<(), GatedError> {
    debug_assert!(offset == 0, "callers reserve from the start of the file");
    let mut store = libc::fstore_t {
        // All requested space or none, from the physical end of file.
        fst_flags: libc::F_ALLOCATEALL,
        fst_posmode: libc::F_PEOFPOSMODE,
        fst_offset: offset,
        fst_length: length,
        fst_bytesalloc: 0,
    };
    // SAFETY: store is a plain out-param living across the call.
    check(retry_intr(|| unsafe {
        libc::fcntl(fd.raw(), libc::F_PREALLOCATE, &mut store)
    }))
    .map(drop)
    .map_err(Into::into)
}

/// Pre-reserves backing space. Not supported on this platform.
#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
)))]
pub fn fallocate(fd: Fd, offset: i64, length: i64) -> Result<(), GatedError> {
    let _ = (fd, offset, length);
    Err(crate::error::NotSupportedError.into())
}

/// Flushes a descriptor's data and metadata to stable storage.
#[cfg(any(target_os = "macos", target_os = "ios"))]
pub fn fsync(fd: Fd) -> Result<(), OsError> {
    // fsync here only guarantees an ordered write to the drive cache;
    // F_FULLFSYNC is the flush-to-platter call.
    // SAFETY: plain descriptor operation.
    check(retry_intr(|| unsafe { libc::fcntl(fd.raw(), libc::F_FULLFSYNC) })).map(drop)
}

/// Flushes a descriptor's data and metadata to stable storage.
#[cfg(not(any(target_os = "macos", target_os = "ios")))]
pub fn fsync(fd: Fd) -> Result<(), OsError> {
    // SAFETY: plain descriptor operation.
    check(retry_intr(|| unsafe { libc::fsync(fd.raw()) })).map(drop)
}

/// Schedules a flush of all dirty buffers system-wide.
pub fn sync() {
    // SAFETY: no arguments, cannot fail.
    unsafe { libc::sync() }
}

/// Applies or releases a whole-file advisory lock.
pub fn flock(fd: Fd, kind: FlockKind, non_blocking: bool) -> Result<(), OsError> {
    // SAFETY: plain descriptor operation.
    check(retry_intr(|| unsafe { libc::flock(fd.raw(), kind.to_native(non_blocking)) })).map(drop)
}

/// Repositions the file offset, returning the new position.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn lseek(fd: Fd, offset: i64, whence: SeekWhence) -> Result<i64, OsError> {
    // SAFETY: plain descriptor operation.
    check(retry_intr(|| unsafe { libc::lseek64(fd.raw(), offset, whence.to_native()) }))
}

/// Repositions the file offset, returning the new position.
#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub fn lseek(fd: Fd, offset: i64, whence: SeekWhence) -> Result<i64, OsError> {
    // SAFETY: plain descriptor operation.
    check(retry_intr(|| unsafe {
        libc::lseek(fd.raw(), offset as libc::off_t, whence.to_native())
    }))
    .map(|pos| pos as i64)
}

/// Reads from the current file offset. A count smaller than the buffer is a
/// successful short read, not an error.
pub fn read(fd: Fd, buf: &mut [u8]) -> Result<usize, OsError> {
    // SAFETY: buf is writable for buf.len() bytes and outlives the call.
    check(retry_intr(|| unsafe {
        libc::read(fd.raw(), buf.as_mut_ptr().cast(), buf.len())
    }))
    .map(|count| count as usize)
}

/// Writes at the current file offset. A count smaller than the buffer is a
/// successful short write, not an error.
pub fn write(fd: Fd, buf: &[u8]) -> Result<usize, OsError> {
    // SAFETY: buf is readable for buf.len() bytes and outlives the call.
    check(retry_intr(|| unsafe {
        libc::write(fd.raw(), buf.as_ptr().cast(), buf.len())
    }))
    .map(|count| count as usize)
}

/// Reads the target of a symbolic link into `buf`, returning the byte count.
/// The result is not NUL-terminated and is truncated at the buffer size.
pub fn read_link(path: &CStr, buf: &mut [u8]) -> Result<usize, OsError> {
    debug_assert!(!buf.is_empty());
    if buf.is_empty() {
        return Err(OsError(libc::EINVAL));
    }
    // SAFETY: buf is writable for buf.len() bytes and outlives the call.
    check(unsafe { libc::readlink(path.as_ptr(), buf.as_mut_ptr().cast(), buf.len()) })
        .map(|count| count as usize)
}

/// Resolves `path` to an absolute path with no symlinks, `.` or `..`
/// components.
pub fn real_path(path: &CStr) -> Result<CString, OsError> {
    // SAFETY: path is NUL-terminated; a null resolved buffer asks the
    // library to allocate one.
    let resolved = unsafe { libc::realpath(path.as_ptr(), ptr::null_mut()) };
    if resolved.is_null() {
        return Err(OsError(err_no()));
    }
    // SAFETY: realpath returned a NUL-terminated heap string.
    let owned = unsafe { CStr::from_ptr(resolved) }.to_owned();
    // SAFETY: the buffer was allocated by realpath and is not used again.
    unsafe { libc::free(resolved.cast()) };
    Ok(owned)
}

/// Sets the user flags of the file named by `path`, without following a
/// trailing symlink. Gated on
/// [`caps::can_set_hidden_flag`](crate::caps::can_set_hidden_flag).
#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
pub fn lchflags(path: &CStr, flags: UserFlags) -> Result<(), GatedError> {
    // SAFETY: path is NUL-terminated and outlives the call.
    check(retry_intr(|| unsafe { libc::lchflags(path.as_ptr(), flags.bits() as _) }))
        .map(drop)
        .map_err(Into::into)
}

/// Sets the user flags of the file named by `path`. Not supported on this
/// platform.
#[cfg(not(any(target_os = "macos", target_os = "ios", target_os = "freebsd")))]
pub fn lchflags(path: &CStr, flags: UserFlags) -> Result<(), GatedError> {
    let _ = (path, flags);
    Err(crate::error::NotSupportedError.into())
}

/// Announces a file access pattern so the kernel can adapt readahead and
/// caching. Callers treat the hint as optional, so an unsupported platform
/// reports not-supported rather than failing loudly.
#[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd"))]
pub fn posix_fadvise(fd: Fd, offset: i64, length: i64, advice: FileAdvice) -> Result<(), GatedError> {
    // This call reports failure through its return value, not errno.
    let mut ret;
    loop {
        // SAFETY: plain descriptor operation.
        ret = unsafe {
            libc::posix_fadvise(
                fd.raw(),
                offset as libc::off_t,
                length as libc::off_t,
                advice.to_native(),
            )
        };
        if ret != libc::EINTR {
            break;
        }
    }
    match ret {
        0 => Ok(()),
        code => Err(OsError(code).into()),
    }
}

/// Announces a file access pattern. Not supported on this platform.
#[cfg(not(any(target_os = "linux", target_os = "android", target_os = "freebsd")))]
pub fn posix_fadvise(fd: Fd, offset: i64, length: i64, advice: FileAdvice) -> Result<(), GatedError> {
    let _ = (fd, offset, length, advice);
    Err(crate::error::NotSupportedError.into())
}
