//! Filesystem watch registration.
//!
//! Only the registration surface lives here: creating the notification
//! descriptor and adding or removing watches. Reading and dispatching the
//! event stream belongs to the layer above.

use std::ffi::CStr;

use crate::error::GatedError;
use crate::fd::Fd;
use crate::flags::NotifyEvents;

#[cfg(any(target_os = "linux", target_os = "android"))]
use crate::syscall::check;

/// Creates a notification descriptor for watch registration.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn init() -> Result<Fd, GatedError> {
    // SAFETY: no arguments.
    check(unsafe { libc::inotify_init() })
        .map(Fd::from_raw)
        .map_err(Into::into)
}

/// Creates a notification descriptor. Not supported on this platform.
#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub fn init() -> Result<Fd, GatedError> {
    Err(crate::error::NotSupportedError.into())
}

/// Registers (or updates) a watch on `path`, returning the watch
/// descriptor.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn add_watch(fd: Fd, path: &CStr, mask: NotifyEvents) -> Result<i32, GatedError> {
    debug_assert!(fd.raw() >= 0);
    // SAFETY: path is NUL-terminated and outlives the call.
    check(unsafe { libc::inotify_add_watch(fd.raw(), path.as_ptr(), mask.bits()) })
        .map_err(Into::into)
}

/// Registers a watch. Not supported on this platform.
#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub fn add_watch(fd: Fd, path: &CStr, mask: NotifyEvents) -> Result<i32, GatedError> {
    let _ = (fd, path, mask);
    Err(crate::error::NotSupportedError.into())
}

/// Removes a watch previously returned by [`add_watch`].
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn remove_watch(fd: Fd, watch: i32) -> Result<(), GatedError> {
    debug_assert!(fd.raw() >= 0 && watch >= 0);
    // SAFETY: plain descriptor operation.
    check(unsafe { libc::inotify_rm_watch(fd.raw(), watch) })
        .map(drop)
        .map_err(Into::into)
}

/// Removes a watch. Not supported on this platform.
#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub fn remove_watch(fd: Fd, watch: i32) -> Result<(), GatedError> {
    let _ = (fd, watch);
    Err(crate::error::NotSupportedError.into())
}
