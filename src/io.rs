//! Positional and vectored reads and writes.
//!
//! Every operation addresses an explicit offset and leaves any shared file
//! position untouched. A count smaller than requested is a successful short
//! transfer, never an error.

use std::io::{IoSlice, IoSliceMut};

use crate::error::OsError;
use crate::fd::Fd;
use crate::syscall::{check, retry_intr};

/// Reads up to `buf.len()` bytes at `offset`.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn pread(fd: Fd, buf: &mut [u8], offset: i64) -> Result<usize, OsError> {
    // SAFETY: buf is writable for buf.len() bytes and outlives the call.
    check(retry_intr(|| unsafe {
        libc::pread64(fd.raw(), buf.as_mut_ptr().cast(), buf.len(), offset)
    }))
    .map(|count| count as usize)
}

/// Reads up to `buf.len()` bytes at `offset`.
#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub fn pread(fd: Fd, buf: &mut [u8], offset: i64) -> Result<usize, OsError> {
    // SAFETY: buf is writable for buf.len() bytes and outlives the call.
    check(retry_intr(|| unsafe {
        libc::pread(fd.raw(), buf.as_mut_ptr().cast(), buf.len(), offset as libc::off_t)
    }))
    .map(|count| count as usize)
}

/// Writes up to `buf.len()` bytes at `offset`.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn pwrite(fd: Fd, buf: &[u8], offset: i64) -> Result<usize, OsError> {
    // SAFETY: buf is readable for buf.len() bytes and outlives the call.
    check(retry_intr(|| unsafe {
        libc::pwrite64(fd.raw(), buf.as_ptr().cast(), buf.len(), offset)
    }))
    .map(|count| count as usize)
}

/// Writes up to `buf.len()` bytes at `offset`.
#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub fn pwrite(fd: Fd, buf: &[u8], offset: i64) -> Result<usize, OsError> {
    // SAFETY: buf is readable for buf.len() bytes and outlives the call.
    check(retry_intr(|| unsafe {
        libc::pwrite(fd.raw(), buf.as_ptr().cast(), buf.len(), offset as libc::off_t)
    }))
    .map(|count| count as usize)
}

/// Scatter-reads into `bufs` at `offset`, returning the total byte count.
///
/// The segments fill in order; a result smaller than the summed capacity
/// means the transfer ended at a short segment and the ones after it were
/// not touched.
#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
))]
pub fn preadv(fd: Fd, bufs: &mut [IoSliceMut<'_>], offset: i64) -> Result<usize, OsError> {
    // SAFETY: IoSliceMut is layout-compatible with iovec, and each segment
    // borrows writable caller memory for the duration of the call.
    check(retry_intr(|| unsafe {
        libc::preadv(
            fd.raw(),
            bufs.as_ptr().cast::<libc::iovec>(),
            bufs.len() as libc::c_int,
            offset as libc::off_t,
        )
    }))
    .map(|count| count as usize)
}

/// Scatter-reads into `bufs` at `offset`, returning the total byte count.
///
/// This platform has no native vectored positional read, so the segments
/// are issued one positional read each. Matching the native semantics, the
/// operation stops at the first short segment: its partial count is included
/// in the total and the remaining segments are not attempted. An error in a
/// later segment is swallowed in favor of the count transferred so far; only
/// an error before any byte moves is returned.
#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
)))]
pub fn preadv(fd: Fd, bufs: &mut [IoSliceMut<'_>], offset: i64) -> Result<usize, OsError> {
    preadv_segments(fd, bufs, offset)
}

/// Gather-writes `bufs` at `offset`, returning the total byte count.
///
/// The segments drain in order; a result smaller than the summed length
/// means the transfer ended at a short segment and the ones after it were
/// not attempted.
#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
))]
pub fn pwritev(fd: Fd, bufs: &[IoSlice<'_>], offset: i64) -> Result<usize, OsError> {
    // SAFETY: IoSlice is layout-compatible with iovec, and each segment
    // borrows readable caller memory for the duration of the call.
    check(retry_intr(|| unsafe {
        libc::pwritev(
            fd.raw(),
            bufs.as_ptr().cast::<libc::iovec>(),
            bufs.len() as libc::c_int,
            offset as libc::off_t,
        )
    }))
    .map(|count| count as usize)
}

/// Gather-writes `bufs` at `offset`, returning the total byte count.
///
/// See the fallback notes on [`preadv`]: one positional write per segment,
/// stopping at the first short transfer.
#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
)))]
pub fn pwritev(fd: Fd, bufs: &[IoSlice<'_>], offset: i64) -> Result<usize, OsError> {
    pwritev_segments(fd, bufs, offset)
}

// The per-segment fallbacks reproduce the native vectored contract exactly:
// if segment k transfers fewer bytes than requested, the cumulative count
// through k is the result and segment k+1 is never attempted.

#[cfg(any(
    test,
    not(any(
        target_os = "linux",
        target_os = "android",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
    ))
))]
pub(crate) fn preadv_segments(
    fd: Fd,
    bufs: &mut [IoSliceMut<'_>],
    offset: i64,
) -> Result<usize, OsError> {
    let mut total = 0usize;
    for buf in bufs {
        let requested = buf.len();
        match pread(fd, buf, offset + total as i64) {
            Ok(count) => {
                total += count;
                // A short segment means EOF or an interruption the kernel
                // chose to surface as a partial transfer; stop here.
                if count != requested {
                    return Ok(total);
                }
            }
            // Once bytes have moved, the count so far wins over the error.
            Err(e) if total == 0 => return Err(e),
            Err(_) => return Ok(total),
        }
    }
    Ok(total)
}

#[cfg(any(
    test,
    not(any(
        target_os = "linux",
        target_os = "android",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
    ))
))]
pub(crate) fn pwritev_segments(fd: Fd, bufs: &[IoSlice<'_>], offset: i64) -> Result<usize, OsError> {
    let mut total = 0usize;
    for buf in bufs {
        let requested = buf.len();
        match pwrite(fd, buf, offset + total as i64) {
            Ok(count) => {
                total += count;
                // Out of space, or an interruption surfaced as a partial
                // transfer; stop here.
                if count != requested {
                    return Ok(total);
                }
            }
            Err(e) if total == 0 => return Err(e),
            Err(_) => return Ok(total),
        }
    }
    Ok(total)
}
