//! Whole-file copy between open descriptors.

use crate::error::OsError;
use crate::fd::Fd;

#[cfg(not(any(target_os = "macos", target_os = "ios")))]
use crate::syscall::{check, retry_intr};

/// Copies file content, and best-effort metadata, from `src` to `dst`.
///
/// `src_len` is the source size the caller already knows (certain virtual
/// filesystems report zero even though reading produces data; the fast
/// paths are skipped for those). The fastest available mechanism wins:
/// a single kernel call copying data and metadata, a copy-on-write clone,
/// a zero-copy kernel transfer, then a buffered read/write loop.
///
/// After the data is copied, timestamps and permission bits are applied to
/// the destination; a permission-denied failure on that metadata step alone
/// is swallowed, since destination filesystems that do not preserve POSIX
/// ownership produce it even though the data copy succeeded.
#[cfg(any(target_os = "macos", target_os = "ios"))]
pub fn copy_file(src: Fd, dst: Fd, src_len: i64) -> Result<(), OsError> {
    let _ = src_len;
    // The whole copy, data and metadata, happens in the kernel.
    // SAFETY: plain descriptor operation; a null state asks for the default.
    crate::syscall::check(unsafe {
        libc::fcopyfile(src.raw(), dst.raw(), std::ptr::null_mut(), libc::COPYFILE_ALL)
    })
    .map(drop)
}

/// Copies file content, and best-effort metadata, from `src` to `dst`.
#[cfg(not(any(target_os = "macos", target_os = "ios")))]
pub fn copy_file(src: Fd, dst: Fd, src_len: i64) -> Result<(), OsError> {
    let mut copied = false;

    #[cfg(any(target_os = "linux", target_os = "android"))]
    {
        // A copy-on-write clone shares storage between the files. Skipped
        // when the source reports zero length: procfs and friends lie about
        // size, and those need the read/write loop below.
        if src_len != 0 {
            // SAFETY: plain descriptor operation.
            let ret = retry_intr(|| unsafe {
                libc::ioctl(dst.raw(), libc::FICLONE as _, src.raw())
            });
            copied = ret == 0;
        }

        if !copied && src_len != 0 {
            copied = sendfile_all(src, dst, src_len)?;
        }
    }

    if !copied {
        copy_read_write(src, dst)?;
    }

    copy_metadata(src, dst)
}

/// Transfers up to `src_len` bytes kernel-to-kernel, looping because a
/// single call is capped. Returns false when the transfer stopped early
/// (the source shrank, or the filesystem refused the mechanism) and the
/// remainder must be covered by the read/write loop.
#[cfg(any(target_os = "linux", target_os = "android"))]
fn sendfile_all(src: Fd, dst: Fd, src_len: i64) -> Result<bool, OsError> {
    use crate::syscall::err_no;

    let mut remaining = src_len;
    while remaining > 0 {
        let chunk = remaining.min(libc::ssize_t::MAX as i64) as usize;
        // SAFETY: a null offset uses and advances the source position.
        let sent = retry_intr(|| unsafe {
            libc::sendfile(dst.raw(), src.raw(), std::ptr::null_mut(), chunk)
        });
        if sent < 0 {
            let e = err_no();
            if e != libc::EINVAL && e != libc::ENOSYS {
                return Err(OsError(e));
            }
            // The filesystem rejected the mechanism outright.
            break;
        }
        if sent == 0 {
            // The source was truncated mid-copy.
            break;
        }
        debug_assert!(sent as i64 <= remaining);
        remaining -= sent as i64;
    }
    Ok(remaining == 0)
}

// Big enough to amortize the syscall, small enough to stay cache-friendly.
#[cfg(not(any(target_os = "macos", target_os = "ios")))]
const COPY_BUFFER_LENGTH: usize = 80 * 1024;

/// The universal fallback: reads the source to exhaustion and writes every
/// byte to the destination through an intermediate buffer.
#[cfg(not(any(target_os = "macos", target_os = "ios")))]
pub(crate) fn copy_read_write(src: Fd, dst: Fd) -> Result<(), OsError> {
    let mut buffer = vec![0u8; COPY_BUFFER_LENGTH];

    loop {
        let read = crate::fd::read(src, &mut buffer)?;
        if read == 0 {
            return Ok(());
        }

        // Short writes keep going until the chunk is drained.
        let mut written = 0;
        while written < read {
            written += crate::fd::write(dst, &buffer[written..read])?;
        }
    }
}

/// Applies the source's timestamps and permission bits to the destination.
/// Permission-denied is swallowed for both steps; see [`copy_file`].
#[cfg(not(any(target_os = "macos", target_os = "ios")))]
fn copy_metadata(src: Fd, dst: Fd) -> Result<(), OsError> {
    use std::mem::MaybeUninit;

    let mut raw = MaybeUninit::<libc::stat>::uninit();
    // SAFETY: raw is a stat-sized out-param.
    match check(retry_intr(|| unsafe { libc::fstat(src.raw(), raw.as_mut_ptr()) })) {
        Ok(_) => {}
        Err(OsError(libc::EPERM)) => return Ok(()),
        Err(e) => return Err(e),
    }
    // SAFETY: fstat succeeded and initialized raw.
    let source = unsafe { raw.assume_init_ref() };

    // The highest-resolution timestamp mechanism the platform offers.
    let times = [
        libc::timespec {
            tv_sec: source.st_atime,
            tv_nsec: source.st_atime_nsec,
        },
        libc::timespec {
            tv_sec: source.st_mtime,
            tv_nsec: source.st_mtime_nsec,
        },
    ];
    // SAFETY: times points at two timespecs living across the call.
    match check(retry_intr(|| unsafe { libc::futimens(dst.raw(), times.as_ptr()) })) {
        Err(OsError(libc::EPERM)) | Ok(_) => {}
        Err(e) => return Err(e),
    }

    // The destination was opened with matching permissions, but the
    // creation mode was filtered by umask; copy the real bits.
    let mode = source.st_mode & (libc::S_IRWXU | libc::S_IRWXG | libc::S_IRWXO);
    match check(retry_intr(|| unsafe { libc::fchmod(dst.raw(), mode) })) {
        Err(OsError(libc::EPERM)) | Ok(_) => {}
        Err(e) => return Err(e),
    }

    Ok(())
}
