use derive_more::{Display, Error, From};

/// A flag or enum encoding contained bits outside the recognized set.
///
/// This is a contract violation by the caller, not a runtime condition: the
/// accepted encodings are fixed and documented per type in [`flags`](crate::flags).
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("encoding contains unrecognized bits")]
pub struct UnknownBitsError;

/// A caller-supplied offset, length or size was outside the representable
/// range for the operation (negative, or larger than the platform can
/// address). A contract violation, not an OS failure.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("offset or length outside the representable range")]
pub struct InvalidRangeError;

/// The caller-supplied directory scratch buffer is smaller than the queried
/// minimum. A contract violation; see [`dir::read_dir_buffer_size`](crate::dir::read_dir_buffer_size).
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("scratch buffer smaller than the queried minimum")]
pub struct UndersizedBufferError;

/// The operation is meaningful but this platform or kernel lacks it.
///
/// A soft condition: callers are expected to fall back or degrade, not
/// abort. The [`caps`](crate::caps) probes report support up front.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("not supported on this platform")]
pub struct NotSupportedError;

/// A filesystem type name missing from the identification table.
///
/// The table is expected to be exhaustive for realistic targets, so this is
/// asserted in debug builds.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("filesystem type name not present in the identification table")]
pub struct UnknownFileSystemError;

/// A kernel call failed; the untouched `errno` value is carried verbatim.
///
/// This layer performs zero reinterpretation of OS failures so the caller
/// can apply platform-correct handling and messages.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("os error {_0}")]
pub struct OsError(#[error(not(source))] pub i32);

impl OsError {
    /// The raw `errno` value reported by the kernel.
    pub const fn code(self) -> i32 {
        self.0
    }
}

/// Failure of an operation gated on a platform capability.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error)]
pub enum GatedError {
    NotSupported(NotSupportedError),
    Os(OsError),
}

/// Failure to establish or release a memory mapping.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error)]
pub enum MapError {
    Range(InvalidRangeError),
    Os(OsError),
}

/// Failure to apply a memory advisory hint.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error)]
pub enum AdviseError {
    NotSupported(NotSupportedError),
    Range(InvalidRangeError),
    Os(OsError),
}

/// Failure to apply a byte-range advisory lock.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error)]
pub enum LockError {
    Range(InvalidRangeError),
    Os(OsError),
}

/// Failure while reading the next directory entry.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error)]
pub enum ReadDirError {
    UndersizedBuffer(UndersizedBufferError),
    Os(OsError),
}

/// Failure to identify the filesystem type backing a handle.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error)]
pub enum FsTypeError {
    UnknownName(UnknownFileSystemError),
    Os(OsError),
}
