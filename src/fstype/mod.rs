//! Filesystem-type identification.
//!
//! Platforms with a numeric type field in their filesystem statistics report
//! it verbatim. Platforms that only expose a type *name* go through a fixed
//! name table mapped into the same numeric space, so a given filesystem
//! yields the same identifier no matter which kind of platform asked.

mod table;
mod tests;

use crate::error::FsTypeError;
use crate::fd::Fd;

use crate::syscall::{check, retry_intr};

#[cfg(any(
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "solaris",
    target_os = "illumos",
))]
use crate::error::UnknownFileSystemError;

#[cfg(any(
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "solaris",
    target_os = "illumos",
))]
fn type_from_name(name: &std::ffi::CStr) -> Result<i64, FsTypeError> {
    match name.to_str().ok().and_then(file_system_type_by_name) {
        Some(id) => Ok(id),
        None => {
            debug_assert!(false, "filesystem name missing from the table");
            Err(UnknownFileSystemError.into())
        }
    }
}

/// Looks a filesystem name up in the identification table.
///
/// Exposed on every platform so the mapping itself can be relied on (and
/// tested) independently of which lookup strategy [`file_system_type`]
/// uses locally.
pub fn file_system_type_by_name(name: &str) -> Option<i64> {
    table::FILE_SYSTEM_NAMES
        .binary_search_by_key(&name, |&(entry, _)| entry)
        .ok()
        .map(|index| table::FILE_SYSTEM_NAMES[index].1)
}

/// Returns the stable numeric identifier of the filesystem backing `fd`.
#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
))]
#[allow(clippy::unnecessary_cast)]
pub fn file_system_type(fd: Fd) -> Result<i64, FsTypeError> {
    use std::mem::MaybeUninit;

    let mut raw = MaybeUninit::<libc::statfs>::uninit();
    // SAFETY: raw is a statfs-sized out-param.
    check(retry_intr(|| unsafe { libc::fstatfs(fd.raw(), raw.as_mut_ptr()) }))
        .map_err(FsTypeError::from)?;
    // SAFETY: fstatfs initialized raw or the check above returned the error.
    let stats = unsafe { raw.assume_init_ref() };
    Ok(stats.f_type as i64)
}

/// Returns the stable numeric identifier of the filesystem backing `fd`.
///
/// This platform's filesystem statistics only carry a type name; it is
/// mapped through the shared table. A name missing from the table is a
/// contract violation - the table is expected to be exhaustive for
/// realistic targets - asserted in debug builds and reported as
/// [`UnknownFileSystemError`](crate::UnknownFileSystemError) in release
/// builds.
#[cfg(any(target_os = "netbsd", target_os = "solaris", target_os = "illumos"))]
pub fn file_system_type(fd: Fd) -> Result<i64, FsTypeError> {
    use std::ffi::CStr;
    use std::mem::MaybeUninit;

    let mut raw = MaybeUninit::<libc::statvfs>::uninit();
    // SAFETY: raw is a statvfs-sized out-param.
    check(retry_intr(|| unsafe { libc::fstatvfs(fd.raw(), raw.as_mut_ptr()) }))
        .map_err(FsTypeError::from)?;
    // SAFETY: fstatvfs initialized raw or the check above returned the error.
    let stats = unsafe { raw.assume_init_ref() };

    #[cfg(target_os = "netbsd")]
    let field = stats.f_fstypename.as_ptr();
    #[cfg(not(target_os = "netbsd"))]
    let field = stats.f_basetype.as_ptr();

    // SAFETY: the type name is NUL-terminated within the struct.
    type_from_name(unsafe { CStr::from_ptr(field) })
}

/// Returns the stable numeric identifier of the filesystem backing `fd`.
///
/// See the name-table notes on the statvfs variant; this platform reports
/// the name inside its statfs result instead.
#[cfg(target_os = "openbsd")]
pub fn file_system_type(fd: Fd) -> Result<i64, FsTypeError> {
    use std::ffi::CStr;
    use std::mem::MaybeUninit;

    let mut raw = MaybeUninit::<libc::statfs>::uninit();
    // SAFETY: raw is a statfs-sized out-param.
    check(retry_intr(|| unsafe { libc::fstatfs(fd.raw(), raw.as_mut_ptr()) }))
        .map_err(FsTypeError::from)?;
    // SAFETY: fstatfs initialized raw or the check above returned the error.
    let stats = unsafe { raw.assume_init_ref() };
    // SAFETY: the type name is NUL-terminated within the struct.
    type_from_name(unsafe { CStr::from_ptr(stats.f_fstypename.as_ptr()) })
}
