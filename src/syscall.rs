use std::io;

use crate::error::OsError;

pub(crate) fn err_no() -> i32 {
    // SAFETY: raw_os_error guarantees Some if constructed from last_os_error.
    unsafe { io::Error::last_os_error().raw_os_error().unwrap_unchecked() }
}

/// Resets errno so a following call's "no error" outcome is unambiguous.
/// Only the non-reentrant directory read needs this.
#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
)))]
pub(crate) fn clear_err_no() {
    #[cfg(any(target_os = "solaris", target_os = "illumos"))]
    use libc::___errno as errno_location;
    #[cfg(any(target_os = "netbsd", target_os = "openbsd"))]
    use libc::__errno as errno_location;

    // SAFETY: the thread-local errno slot is always valid to write.
    unsafe {
        *errno_location() = 0;
    }
}

/// Return types libc uses for fallible calls, all of which signal failure
/// with -1 and the specific cause via errno.
pub(crate) trait IsMinusOne: Copy {
    fn is_minus_one(self) -> bool;
}

macro_rules! impl_is_minus_one {
    ($($t:ty),+) => {$(
        impl IsMinusOne for $t {
            fn is_minus_one(self) -> bool {
                self == -1
            }
        }
    )+};
}

impl_is_minus_one!(i32, i64, isize);

/// Repeats `call` until it completes without being interrupted by a signal.
///
/// A call that fails with EINTR left no partial state behind, so it is
/// restarted from scratch and the caller never observes the interruption.
pub(crate) fn retry_intr<T: IsMinusOne>(mut call: impl FnMut() -> T) -> T {
    loop {
        let ret = call();
        if ret.is_minus_one() && err_no() == libc::EINTR {
            continue;
        }
        return ret;
    }
}

/// Maps libc's -1 failure convention onto a forwarded [`OsError`].
pub(crate) fn check<T: IsMinusOne>(ret: T) -> Result<T, OsError> {
    if ret.is_minus_one() {
        Err(OsError(err_no()))
    } else {
        Ok(ret)
    }
}
