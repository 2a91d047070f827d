//! Portable projection of filesystem metadata.

use std::ffi::CStr;
use std::mem::MaybeUninit;

use crate::error::OsError;
use crate::fd::Fd;
use crate::syscall::{check, retry_intr};

/// A portable snapshot of filesystem metadata.
///
/// Produced whole or not at all: on failure the entry points return `Err`
/// and no value exists, so a partially-filled status can never be observed.
/// The snapshot has no ownership relation to the source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStatus {
    /// Device containing the file.
    pub dev: i64,
    /// Inode number.
    pub ino: i64,
    /// Mode bits, including the file type.
    pub mode: i32,
    /// Owning user id.
    pub uid: u32,
    /// Owning group id.
    pub gid: u32,
    /// Size in bytes.
    pub size: i64,
    /// Last access time, seconds since the epoch.
    pub atime: i64,
    /// Nanosecond part of the last access time.
    pub atime_nsec: i64,
    /// Last modification time, seconds since the epoch.
    pub mtime: i64,
    /// Nanosecond part of the last modification time.
    pub mtime_nsec: i64,
    /// Last status change time, seconds since the epoch.
    pub ctime: i64,
    /// Nanosecond part of the last status change time.
    pub ctime_nsec: i64,
    /// Creation time, seconds since the epoch. Zero when
    /// [`has_birth_time`](FileStatus::has_birth_time) is false - never a
    /// fabricated value.
    pub birthtime: i64,
    /// Nanosecond part of the creation time.
    pub birthtime_nsec: i64,
    /// Whether this platform's kernel structure exposes a birth time.
    pub has_birth_time: bool,
    /// Whether the file carries the user-hidden flag. Always false on
    /// platforms without user flags; see
    /// [`caps::can_get_hidden_flag`](crate::caps::can_get_hidden_flag).
    pub hidden: bool,
}

impl FileStatus {
    #[allow(clippy::unnecessary_cast)]
    fn from_native(raw: &libc::stat) -> FileStatus {
        let (birthtime, birthtime_nsec) = Self::birth_time(raw);
        FileStatus {
            dev: raw.st_dev as i64,
            ino: raw.st_ino as i64,
            mode: raw.st_mode as i32,
            uid: raw.st_uid,
            gid: raw.st_gid,
            size: raw.st_size as i64,
            atime: raw.st_atime as i64,
            atime_nsec: raw.st_atime_nsec as i64,
            mtime: raw.st_mtime as i64,
            mtime_nsec: raw.st_mtime_nsec as i64,
            ctime: raw.st_ctime as i64,
            ctime_nsec: raw.st_ctime_nsec as i64,
            birthtime,
            birthtime_nsec,
            has_birth_time: crate::caps::has_birth_time(),
            hidden: Self::hidden(raw),
        }
    }

    #[cfg(any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
    ))]
    #[allow(clippy::unnecessary_cast)]
    const fn birth_time(raw: &libc::stat) -> (i64, i64) {
        (raw.st_birthtime as i64, raw.st_birthtime_nsec as i64)
    }

    #[cfg(not(any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
    )))]
    const fn birth_time(_raw: &libc::stat) -> (i64, i64) {
        (0, 0)
    }

    #[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
    const fn hidden(raw: &libc::stat) -> bool {
        raw.st_flags & libc::UF_HIDDEN == libc::UF_HIDDEN
    }

    #[cfg(not(any(target_os = "macos", target_os = "ios", target_os = "freebsd")))]
    const fn hidden(_raw: &libc::stat) -> bool {
        false
    }
}

/// Stats the file named by `path`, following symlinks.
pub fn stat(path: &CStr) -> Result<FileStatus, OsError> {
    let mut raw = MaybeUninit::<libc::stat>::uninit();
    // SAFETY: path is NUL-terminated; raw is a stat-sized out-param.
    check(retry_intr(|| unsafe { libc::stat(path.as_ptr(), raw.as_mut_ptr()) }))?;
    // SAFETY: stat initialized raw or the check above returned the error.
    Ok(FileStatus::from_native(unsafe { raw.assume_init_ref() }))
}

/// Stats the file named by `path` itself, not following a trailing symlink.
pub fn lstat(path: &CStr) -> Result<FileStatus, OsError> {
    let mut raw = MaybeUninit::<libc::stat>::uninit();
    // SAFETY: path is NUL-terminated; raw is a stat-sized out-param.
    check(retry_intr(|| unsafe { libc::lstat(path.as_ptr(), raw.as_mut_ptr()) }))?;
    // SAFETY: lstat initialized raw or the check above returned the error.
    Ok(FileStatus::from_native(unsafe { raw.assume_init_ref() }))
}

/// Stats an open descriptor's file.
pub fn fstat(fd: Fd) -> Result<FileStatus, OsError> {
    let mut raw = MaybeUninit::<libc::stat>::uninit();
    // SAFETY: raw is a stat-sized out-param.
    check(retry_intr(|| unsafe { libc::fstat(fd.raw(), raw.as_mut_ptr()) }))?;
    // SAFETY: fstat initialized raw or the check above returned the error.
    Ok(FileStatus::from_native(unsafe { raw.assume_init_ref() }))
}
