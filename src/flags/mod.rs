//! Platform-independent flag and enum encodings and their translation to
//! native constants.
//!
//! The external bit values documented here are stable on every platform;
//! only the translated native values differ. Translation is a total,
//! deterministic mapping over the recognized set: decoders reject any bit
//! outside it with [`UnknownBitsError`], which is a caller contract
//! violation (additionally asserted in debug builds), never an OS failure.
//! A recognized value whose capability is absent on the running platform is
//! reported as not-supported by the operation itself, not here.

mod tests;

use libc::c_int;

use crate::error::UnknownBitsError;

/// The requested access for [`open`](crate::fd::open), carried in the low
/// nibble of the combined numeric open encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// External encoding 0.
    ReadOnly,
    /// External encoding 1.
    WriteOnly,
    /// External encoding 2.
    ReadWrite,
}

impl AccessMode {
    /// Mask covering the access-mode portion of a combined open encoding.
    pub const MASK: i32 = 0xF;

    /// Decodes the access-mode portion of a combined open encoding.
    pub const fn from_raw(raw: i32) -> Result<AccessMode, UnknownBitsError> {
        match raw & Self::MASK {
            0 => Ok(AccessMode::ReadOnly),
            1 => Ok(AccessMode::WriteOnly),
            2 => Ok(AccessMode::ReadWrite),
            _ => {
                debug_assert!(false, "unknown open access mode");
                Err(UnknownBitsError)
            }
        }
    }

    pub(crate) const fn to_native(self) -> c_int {
        match self {
            AccessMode::ReadOnly => libc::O_RDONLY,
            AccessMode::WriteOnly => libc::O_WRONLY,
            AccessMode::ReadWrite => libc::O_RDWR,
        }
    }
}

bitflags::bitflags! {
    /// Creation and status flags for [`open`](crate::fd::open), beyond the
    /// access mode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: i32 {
        /// Close the descriptor across exec, requested atomically at
        /// creation time.
        const CLOEXEC = 0x0010;
        /// Create the file if it does not exist.
        const CREAT = 0x0020;
        /// With `CREAT`, fail if the file already exists.
        const EXCL = 0x0040;
        /// Truncate an existing regular file to zero length.
        const TRUNC = 0x0080;
        /// Synchronous writes.
        const SYNC = 0x0100;
    }
}

impl OpenFlags {
    pub(crate) const fn to_native(self) -> c_int {
        let mut ret = 0;
        if self.contains(OpenFlags::CLOEXEC) {
            ret |= libc::O_CLOEXEC;
        }
        if self.contains(OpenFlags::CREAT) {
            ret |= libc::O_CREAT;
        }
        if self.contains(OpenFlags::EXCL) {
            ret |= libc::O_EXCL;
        }
        if self.contains(OpenFlags::TRUNC) {
            ret |= libc::O_TRUNC;
        }
        if self.contains(OpenFlags::SYNC) {
            ret |= libc::O_SYNC;
        }
        ret
    }
}

/// Decodes a combined numeric open encoding (access mode in the low nibble,
/// [`OpenFlags`] bits above it) as received from an external caller.
pub fn decode_open(raw: i32) -> Result<(AccessMode, OpenFlags), UnknownBitsError> {
    let access = AccessMode::from_raw(raw)?;
    match OpenFlags::from_bits(raw & !AccessMode::MASK) {
        Some(flags) => Ok((access, flags)),
        None => {
            debug_assert!(false, "unknown open flag");
            Err(UnknownBitsError)
        }
    }
}

bitflags::bitflags! {
    /// Page protection for [`mmap::map`](crate::mmap::map). Empty means no
    /// access at all.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Protection: i32 {
        const READ = 0x1;
        const WRITE = 0x2;
        const EXEC = 0x4;
    }
}

impl Protection {
    pub(crate) const fn to_native(self) -> c_int {
        if self.is_empty() {
            return libc::PROT_NONE;
        }
        let mut ret = 0;
        if self.contains(Protection::READ) {
            ret |= libc::PROT_READ;
        }
        if self.contains(Protection::WRITE) {
            ret |= libc::PROT_WRITE;
        }
        if self.contains(Protection::EXEC) {
            ret |= libc::PROT_EXEC;
        }
        ret
    }
}

bitflags::bitflags! {
    /// Sharing mode for [`mmap::map`](crate::mmap::map). `SHARED` and
    /// `PRIVATE` are mutually exclusive; the kernel rejects the combination.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MapFlags: i32 {
        const SHARED = 0x01;
        const PRIVATE = 0x02;
        const ANONYMOUS = 0x10;
    }
}

impl MapFlags {
    pub(crate) const fn to_native(self) -> c_int {
        let mut ret = 0;
        if self.contains(MapFlags::SHARED) {
            ret |= libc::MAP_SHARED;
        }
        if self.contains(MapFlags::PRIVATE) {
            ret |= libc::MAP_PRIVATE;
        }
        if self.contains(MapFlags::ANONYMOUS) {
            ret |= libc::MAP_ANON;
        }
        ret
    }
}

bitflags::bitflags! {
    /// Flush behavior for [`mmap::sync_mapping`](crate::mmap::sync_mapping).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MSyncFlags: i32 {
        /// Block until the flush completes.
        const SYNC = 0x1;
        /// Schedule the flush and return.
        const ASYNC = 0x2;
        /// Invalidate other mappings of the same range.
        const INVALIDATE = 0x4;
    }
}

impl MSyncFlags {
    pub(crate) const fn to_native(self) -> c_int {
        let mut ret = 0;
        if self.contains(MSyncFlags::SYNC) {
            ret |= libc::MS_SYNC;
        }
        if self.contains(MSyncFlags::ASYNC) {
            ret |= libc::MS_ASYNC;
        }
        if self.contains(MSyncFlags::INVALIDATE) {
            ret |= libc::MS_INVALIDATE;
        }
        ret
    }
}

bitflags::bitflags! {
    /// Permissions probed by [`fd::access`](crate::fd::access). Empty checks
    /// bare existence. These bit values are specified by POSIX and identical
    /// everywhere, but still go through the explicit table.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AccessCheck: i32 {
        const EXECUTE = 0x1;
        const WRITE = 0x2;
        const READ = 0x4;
    }
}

impl AccessCheck {
    pub(crate) const fn to_native(self) -> c_int {
        if self.is_empty() {
            return libc::F_OK;
        }
        let mut ret = 0;
        if self.contains(AccessCheck::EXECUTE) {
            ret |= libc::X_OK;
        }
        if self.contains(AccessCheck::WRITE) {
            ret |= libc::W_OK;
        }
        if self.contains(AccessCheck::READ) {
            ret |= libc::R_OK;
        }
        ret
    }
}

bitflags::bitflags! {
    /// Descriptor flags for [`fd::get_fd_flags`](crate::fd::get_fd_flags) /
    /// [`fd::set_fd_flags`](crate::fd::set_fd_flags).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FdFlags: i32 {
        const CLOEXEC = 0x1;
    }
}

impl FdFlags {
    pub(crate) const fn to_native(self) -> c_int {
        if self.contains(FdFlags::CLOEXEC) {
            libc::FD_CLOEXEC
        } else {
            0
        }
    }

    pub(crate) const fn from_native(raw: c_int) -> FdFlags {
        if raw & libc::FD_CLOEXEC != 0 {
            FdFlags::CLOEXEC
        } else {
            FdFlags::empty()
        }
    }
}

bitflags::bitflags! {
    /// Per-path user flags for [`fd::lchflags`](crate::fd::lchflags).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UserFlags: u32 {
        /// The file should not be displayed in a GUI.
        const HIDDEN = 0x8000;
    }
}

/// Origin of a [`fd::lseek`](crate::fd::lseek) offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekWhence {
    /// External encoding 0.
    Begin,
    /// External encoding 1.
    Current,
    /// External encoding 2.
    End,
}

impl SeekWhence {
    pub const fn from_raw(raw: i32) -> Result<SeekWhence, UnknownBitsError> {
        match raw {
            0 => Ok(SeekWhence::Begin),
            1 => Ok(SeekWhence::Current),
            2 => Ok(SeekWhence::End),
            _ => {
                debug_assert!(false, "unknown seek whence");
                Err(UnknownBitsError)
            }
        }
    }

    pub(crate) const fn to_native(self) -> c_int {
        match self {
            SeekWhence::Begin => libc::SEEK_SET,
            SeekWhence::Current => libc::SEEK_CUR,
            SeekWhence::End => libc::SEEK_END,
        }
    }
}

/// Whole-file advisory lock operation for [`fd::flock`](crate::fd::flock).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlockKind {
    Shared,
    Exclusive,
    Unlock,
}

impl FlockKind {
    pub(crate) const fn to_native(self, non_blocking: bool) -> c_int {
        let op = match self {
            FlockKind::Shared => libc::LOCK_SH,
            FlockKind::Exclusive => libc::LOCK_EX,
            FlockKind::Unlock => libc::LOCK_UN,
        };
        if non_blocking { op | libc::LOCK_NB } else { op }
    }
}

/// Byte-range lock kind for [`lock::lock_file_region`](crate::lock::lock_file_region).
///
/// The native record-lock constants differ across platforms, so the mapping
/// always goes through this explicit table and is never a cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockKind {
    /// External encoding 0.
    Read,
    /// External encoding 1.
    Write,
    /// External encoding 2. Releases any lock held by this process on an
    /// overlapping region; unlocking an unlocked region succeeds.
    Unlock,
}

impl LockKind {
    pub const fn from_raw(raw: i16) -> Result<LockKind, UnknownBitsError> {
        match raw {
            0 => Ok(LockKind::Read),
            1 => Ok(LockKind::Write),
            2 => Ok(LockKind::Unlock),
            _ => {
                debug_assert!(false, "unknown lock kind");
                Err(UnknownBitsError)
            }
        }
    }

    pub(crate) const fn to_native(self) -> libc::c_short {
        match self {
            LockKind::Read => libc::F_RDLCK as libc::c_short,
            LockKind::Write => libc::F_WRLCK as libc::c_short,
            LockKind::Unlock => libc::F_UNLCK as libc::c_short,
        }
    }
}

/// File access-pattern hint for [`fd::posix_fadvise`](crate::fd::posix_fadvise).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAdvice {
    /// External encoding 0.
    Normal,
    /// External encoding 1.
    Random,
    /// External encoding 2.
    Sequential,
    /// External encoding 3.
    WillNeed,
    /// External encoding 4.
    DontNeed,
    /// External encoding 5.
    NoReuse,
}

impl FileAdvice {
    pub const fn from_raw(raw: i32) -> Result<FileAdvice, UnknownBitsError> {
        match raw {
            0 => Ok(FileAdvice::Normal),
            1 => Ok(FileAdvice::Random),
            2 => Ok(FileAdvice::Sequential),
            3 => Ok(FileAdvice::WillNeed),
            4 => Ok(FileAdvice::DontNeed),
            5 => Ok(FileAdvice::NoReuse),
            _ => {
                debug_assert!(false, "unknown file advice");
                Err(UnknownBitsError)
            }
        }
    }

    // The native hint values differ per platform; convert through the table.
    #[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd"))]
    pub(crate) const fn to_native(self) -> c_int {
        match self {
            FileAdvice::Normal => libc::POSIX_FADV_NORMAL,
            FileAdvice::Random => libc::POSIX_FADV_RANDOM,
            FileAdvice::Sequential => libc::POSIX_FADV_SEQUENTIAL,
            FileAdvice::WillNeed => libc::POSIX_FADV_WILLNEED,
            FileAdvice::DontNeed => libc::POSIX_FADV_DONTNEED,
            FileAdvice::NoReuse => libc::POSIX_FADV_NOREUSE,
        }
    }
}

/// Memory advisory hint for [`mmap::advise`](crate::mmap::advise).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemAdvice {
    /// Exclude the range from a forked child's address space.
    /// External encoding 0.
    DontFork,
}

impl MemAdvice {
    pub const fn from_raw(raw: i32) -> Result<MemAdvice, UnknownBitsError> {
        match raw {
            0 => Ok(MemAdvice::DontFork),
            _ => {
                debug_assert!(false, "unknown memory advice");
                Err(UnknownBitsError)
            }
        }
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    pub(crate) const fn to_native(self) -> c_int {
        match self {
            MemAdvice::DontFork => libc::MADV_DONTFORK,
        }
    }
}

/// System configuration value selector for [`mmap::sys_conf`](crate::mmap::sys_conf).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SysConfName {
    /// Clock ticks per second. External encoding 0.
    ClockTick,
    /// Virtual memory page size. External encoding 1.
    PageSize,
}

impl SysConfName {
    pub const fn from_raw(raw: i32) -> Result<SysConfName, UnknownBitsError> {
        match raw {
            0 => Ok(SysConfName::ClockTick),
            1 => Ok(SysConfName::PageSize),
            _ => {
                debug_assert!(false, "unknown sysconf name");
                Err(UnknownBitsError)
            }
        }
    }

    pub(crate) const fn to_native(self) -> c_int {
        match self {
            SysConfName::ClockTick => libc::_SC_CLK_TCK,
            SysConfName::PageSize => libc::_SC_PAGESIZE,
        }
    }
}

bitflags::bitflags! {
    /// Event mask for [`notify::add_watch`](crate::notify::add_watch).
    /// The bit values are kernel-stable.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NotifyEvents: u32 {
        const ACCESS = 0x0000_0001;
        const MODIFY = 0x0000_0002;
        const ATTRIB = 0x0000_0004;
        const MOVED_FROM = 0x0000_0040;
        const MOVED_TO = 0x0000_0080;
        const CREATE = 0x0000_0100;
        const DELETE = 0x0000_0200;
        const QUEUE_OVERFLOW = 0x0000_4000;
        const IGNORED = 0x0000_8000;
        const ONLY_DIR = 0x0100_0000;
        const DONT_FOLLOW = 0x0200_0000;
        const EXCLUDE_UNLINKED = 0x0400_0000;
        const IS_DIR = 0x4000_0000;
    }
}
