use std::ffi::CStr;

/// The inode type recorded in a directory entry.
///
/// Filesystems are free to record [`Unknown`](InodeType::Unknown) even where
/// the platform supports entry types, and one platform family always reports
/// it; resolving the real type then requires a separate
/// [`stat`](crate::stat::stat) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InodeType {
    Unknown,
    Fifo,
    CharDevice,
    Directory,
    BlockDevice,
    Regular,
    Symlink,
    Socket,
    /// A union-mount whiteout entry; only produced by the BSD family.
    Whiteout,
}

impl InodeType {
    #[cfg(not(any(target_os = "solaris", target_os = "illumos")))]
    pub(crate) const fn from_native(d_type: u8) -> InodeType {
        match d_type {
            libc::DT_FIFO => InodeType::Fifo,
            libc::DT_CHR => InodeType::CharDevice,
            libc::DT_DIR => InodeType::Directory,
            libc::DT_BLK => InodeType::BlockDevice,
            libc::DT_REG => InodeType::Regular,
            libc::DT_LNK => InodeType::Symlink,
            libc::DT_SOCK => InodeType::Socket,
            #[cfg(any(
                target_os = "macos",
                target_os = "ios",
                target_os = "freebsd",
                target_os = "netbsd",
                target_os = "openbsd",
            ))]
            libc::DT_WHT => InodeType::Whiteout,
            _ => InodeType::Unknown,
        }
    }
}

/// One directory listing record.
///
/// The name is a view into the [`DirBuffer`](crate::dir::DirBuffer) the
/// producing read filled; its lifetime ends at the next read into that
/// buffer or when the buffer is dropped.
#[derive(Debug, Clone, Copy)]
pub struct DirectoryEntry<'buf> {
    pub(crate) name: &'buf CStr,
    pub(crate) inode_type: InodeType,
}

impl<'buf> DirectoryEntry<'buf> {
    /// The entry's file name, without any directory components.
    pub const fn name(&self) -> &'buf CStr {
        self.name
    }

    /// The entry's recorded inode type.
    pub const fn inode_type(&self) -> InodeType {
        self.inode_type
    }

    /// The name length in bytes, excluding the terminator.
    pub fn name_len(&self) -> usize {
        self.name.to_bytes().len()
    }
}
