use crate::error::{GatedError, OsError};
use crate::fd::Fd;
use crate::flags::FdFlags;
use crate::syscall::{check, retry_intr};

/// Reads the descriptor flags. Not retried; the query completes without
/// blocking.
pub fn get_fd_flags(fd: Fd) -> Result<FdFlags, OsError> {
    // SAFETY: plain descriptor operation.
    check(unsafe { libc::fcntl(fd.raw(), libc::F_GETFD) }).map(FdFlags::from_native)
}

/// Replaces the descriptor flags.
pub fn set_fd_flags(fd: Fd, flags: FdFlags) -> Result<(), OsError> {
    // SAFETY: plain descriptor operation.
    check(retry_intr(|| unsafe {
        libc::fcntl(fd.raw(), libc::F_SETFD, flags.to_native())
    }))
    .map(drop)
}

/// Reports whether the descriptor is in non-blocking mode.
pub fn get_is_non_blocking(fd: Fd) -> Result<bool, OsError> {
    // SAFETY: plain descriptor operation.
    let flags = check(unsafe { libc::fcntl(fd.raw(), libc::F_GETFL) })?;
    Ok(flags & libc::O_NONBLOCK == libc::O_NONBLOCK)
}

/// Switches the descriptor into or out of non-blocking mode, preserving the
/// other status flags.
pub fn set_is_non_blocking(fd: Fd, non_blocking: bool) -> Result<(), OsError> {
    // SAFETY: plain descriptor operation.
    let mut flags = check(unsafe { libc::fcntl(fd.raw(), libc::F_GETFL) })?;

    if non_blocking {
        flags |= libc::O_NONBLOCK;
    } else {
        flags &= !libc::O_NONBLOCK;
    }

    // SAFETY: plain descriptor operation.
    check(unsafe { libc::fcntl(fd.raw(), libc::F_SETFL, flags) }).map(drop)
}

/// Reads the pipe buffer capacity in bytes. Gated on
/// [`caps::can_get_set_pipe_size`](crate::caps::can_get_set_pipe_size).
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn get_pipe_size(fd: Fd) -> Result<usize, GatedError> {
    // SAFETY: plain descriptor operation.
    check(retry_intr(|| unsafe { libc::fcntl(fd.raw(), libc::F_GETPIPE_SZ) }))
        .map(|size| size as usize)
        .map_err(Into::into)
}

/// Reads the pipe buffer capacity. Not supported on this platform.
#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub fn get_pipe_size(fd: Fd) -> Result<usize, GatedError> {
    let _ = fd;
    Err(crate::error::NotSupportedError.into())
}

/// Adjusts the pipe buffer capacity. The kernel may round the size up;
/// gated on [`caps::can_get_set_pipe_size`](crate::caps::can_get_set_pipe_size).
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn set_pipe_size(fd: Fd, size: usize) -> Result<(), GatedError> {
    // SAFETY: plain descriptor operation.
    check(retry_intr(|| unsafe {
        libc::fcntl(fd.raw(), libc::F_SETPIPE_SZ, size as libc::c_int)
    }))
    .map(drop)
    .map_err(Into::into)
}

/// Adjusts the pipe buffer capacity. Not supported on this platform.
#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub fn set_pipe_size(fd: Fd, size: usize) -> Result<(), GatedError> {
    let _ = (fd, size);
    Err(crate::error::NotSupportedError.into())
}

/// Looks up the effective uid of the peer on a connected local socket.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn peer_euid(socket: Fd) -> Result<u32, GatedError> {
    let mut creds = libc::ucred { pid: 0, uid: 0, gid: 0 };
    let mut len = size_of::<libc::ucred>() as libc::socklen_t;
    // SAFETY: creds and len are plain out-params living across the call.
    let ret = unsafe {
        libc::getsockopt(
            socket.raw(),
            libc::SOL_SOCKET,
            libc::SO_PEERCRED,
            (&mut creds as *mut libc::ucred).cast(),
            &mut len,
        )
    };
    check(ret).map(|_| creds.uid).map_err(Into::into)
}

/// Looks up the effective uid of the peer on a connected local socket.
#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
))]
pub fn peer_euid(socket: Fd) -> Result<u32, GatedError> {
    let mut euid: libc::uid_t = 0;
    let mut egid: libc::gid_t = 0;
    // SAFETY: euid and egid are plain out-params living across the call.
    let ret = unsafe { libc::getpeereid(socket.raw(), &mut euid, &mut egid) };
    check(ret).map(|_| euid).map_err(Into::into)
}

/// Looks up the effective uid of the peer. Not supported on this platform.
#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
)))]
pub fn peer_euid(socket: Fd) -> Result<u32, GatedError> {
    let _ = socket;
    Err(crate::error::NotSupportedError.into())
}
