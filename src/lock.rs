//! Byte-range advisory locking.

use std::mem;

use crate::error::{InvalidRangeError, LockError};
use crate::fd::Fd;
use crate::flags::LockKind;
use crate::syscall::{check, retry_intr};

/// Applies a non-blocking advisory record lock to `length` bytes of `fd`
/// starting at `offset` (a zero length covers to end of file, including
/// growth).
///
/// Record locks are process-scoped, not handle-scoped: re-locking an
/// overlapping region from the same process succeeds with OS-defined effect,
/// closing any descriptor for the file drops the process's locks on it, and
/// unlocking is a new request with [`LockKind::Unlock`] - which also
/// succeeds when nothing was locked.
pub fn lock_file_region(fd: Fd, offset: i64, length: i64, kind: LockKind) -> Result<(), LockError> {
    if offset < 0 || length < 0 {
        debug_assert!(false, "lock regions are non-negative");
        return Err(InvalidRangeError.into());
    }

    // SAFETY: flock is a plain all-integer struct.
    let mut args: libc::flock = unsafe { mem::zeroed() };
    args.l_type = kind.to_native();
    args.l_whence = libc::SEEK_SET as libc::c_short;
    args.l_start = offset as libc::off_t;
    args.l_len = length as libc::off_t;

    // SAFETY: args lives across the call; F_SETLK is the non-blocking form.
    check(retry_intr(|| unsafe { libc::fcntl(fd.raw(), libc::F_SETLK, &args) }))
        .map(drop)
        .map_err(LockError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fd;
    use crate::flags::{AccessMode, OpenFlags};
    use crate::test_support::temp_path;

    fn scratch(tag: &str) -> (std::ffi::CString, Fd) {
        let path = temp_path(tag);
        let handle = fd::open(
            &path,
            AccessMode::ReadWrite,
            OpenFlags::CREAT | OpenFlags::EXCL,
            0o644,
        )
        .expect("create");
        fd::write(handle, &[0u8; 256]).expect("seed");
        (path, handle)
    }

    #[test]
    fn test_unlocking_an_unlocked_region_succeeds() {
        let (path, handle) = scratch("lock-noop");
        lock_file_region(handle, 0, 128, LockKind::Unlock).expect("no-op unlock");
        fd::close(handle).expect("close");
        fd::unlink(&path).expect("unlink");
    }

    #[test]
    fn test_lock_upgrade_and_release_within_one_process() {
        let (path, handle) = scratch("lock-cycle");

        lock_file_region(handle, 0, 64, LockKind::Read).expect("read lock");
        // Overlapping re-lock from the same process succeeds.
        lock_file_region(handle, 32, 64, LockKind::Write).expect("upgrade");
        lock_file_region(handle, 0, 0, LockKind::Unlock).expect("release everything");

        fd::close(handle).expect("close");
        fd::unlink(&path).expect("unlink");
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_negative_regions_are_contract_violations() {
        let (path, handle) = scratch("lock-negative");
        assert_eq!(
            lock_file_region(handle, -1, 8, LockKind::Read),
            Err(LockError::Range(crate::InvalidRangeError))
        );
        assert_eq!(
            lock_file_region(handle, 0, -8, LockKind::Read),
            Err(LockError::Range(crate::InvalidRangeError))
        );
        fd::close(handle).expect("close");
        fd::unlink(&path).expect("unlink");
    }
}
