//! Capability probes: "can this platform do X" queries a caller consults
//! before invoking a gated operation, instead of discovering support through
//! a failure code.
//!
//! Every probed condition is a compile-time fact of the target, so the
//! probes are `const fn`s over `cfg` rather than memoized runtime state.

/// Whether the pipe buffer size can be read and adjusted
/// ([`fd::get_pipe_size`](crate::fd::get_pipe_size) /
/// [`fd::set_pipe_size`](crate::fd::set_pipe_size)).
pub const fn can_get_set_pipe_size() -> bool {
    cfg!(any(target_os = "linux", target_os = "android"))
}

/// Whether [`FileStatus`](crate::stat::FileStatus) can report the
/// user-hidden flag.
pub const fn can_get_hidden_flag() -> bool {
    cfg!(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))
}

/// Whether the user-hidden flag can be set through
/// [`fd::lchflags`](crate::fd::lchflags).
pub const fn can_set_hidden_flag() -> bool {
    can_get_hidden_flag()
}

/// Whether the native metadata struct carries a birth (creation) timestamp.
pub const fn has_birth_time() -> bool {
    cfg!(any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
    ))
}

/// Whether [`copy::copy_file`](crate::copy::copy_file) can share storage
/// with the source through a copy-on-write clone.
pub const fn has_copy_on_write_clone() -> bool {
    cfg!(any(target_os = "linux", target_os = "android"))
}

/// Whether shared memory objects interoperate with memory mapping well
/// enough for [`fd::shm_open`](crate::fd::shm_open) to be usable.
pub const fn has_shared_memory_objects() -> bool {
    !cfg!(target_os = "android")
}

/// Whether directory enumeration uses the reentrant primitive with a
/// caller-owned record buffer. When false, reads on all streams serialize
/// behind one process-wide cursor lock.
pub const fn has_reentrant_read_dir() -> bool {
    cfg!(any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
    ))
}

/// Whether filesystem watch registration
/// ([`notify`](crate::notify)) is available.
pub const fn has_watch_registration() -> bool {
    cfg!(any(target_os = "linux", target_os = "android"))
}
