use std::ffi::CStr;

use crate::dir::{DirectoryEntry, InodeType};
use crate::error::{OsError, ReadDirError, UndersizedBufferError};
use crate::syscall::err_no;

// Directory records carry 64-bit numbers, so records are aligned at 8 bytes.
const DIRENT_ALIGNMENT: usize = 8;

/// The minimum capacity of a [`DirBuffer`], leaving slack so the record can
/// be aligned inside it wherever the allocation lands.
pub const fn read_dir_buffer_size() -> usize {
    size_of::<libc::dirent>() + DIRENT_ALIGNMENT - 1
}

/// Caller-owned scratch memory for [`DirectoryStream::read`].
///
/// Each read overwrites the buffer, invalidating the entry produced by the
/// previous read into it. A buffer smaller than [`read_dir_buffer_size`] is
/// rejected as a contract violation.
#[derive(Debug)]
pub struct DirBuffer {
    pub(crate) bytes: Vec<u8>,
}

impl DirBuffer {
    /// A buffer of exactly the queried minimum capacity.
    pub fn new() -> DirBuffer {
        DirBuffer::with_capacity(read_dir_buffer_size())
    }

    /// A buffer of the given capacity, for callers that size it themselves
    /// from [`read_dir_buffer_size`].
    pub fn with_capacity(capacity: usize) -> DirBuffer {
        DirBuffer { bytes: vec![0; capacity] }
    }
}

impl Default for DirBuffer {
    fn default() -> Self {
        DirBuffer::new()
    }
}

/// An OS directory cursor.
///
/// Holding the raw cursor makes the stream neither copyable nor sendable;
/// it lives until the caller passes it to [`close`](DirectoryStream::close).
#[derive(Debug)]
pub struct DirectoryStream {
    dir: *mut libc::DIR,
}

impl DirectoryStream {
    /// Opens a directory stream positioned at the first entry.
    pub fn open(path: &CStr) -> Result<DirectoryStream, OsError> {
        // EINTR isn't documented for opendir; happens in practice on macOS.
        loop {
            // SAFETY: path is NUL-terminated and outlives the call.
            let dir = unsafe { libc::opendir(path.as_ptr()) };
            if !dir.is_null() {
                return Ok(DirectoryStream { dir });
            }
            let e = err_no();
            if e != libc::EINTR {
                return Err(OsError(e));
            }
        }
    }

    /// Reads the next entry into `buf`.
    ///
    /// Returns `Ok(Some(_))` with an entry borrowing `buf`, `Ok(None)` at
    /// end of stream, or the forwarded OS error. After an error the stream
    /// may still be [`close`](DirectoryStream::close)d but must not be read
    /// again.
    #[cfg(any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
    ))]
    pub fn read<'buf>(
        &mut self,
        buf: &'buf mut DirBuffer,
    ) -> Result<Option<DirectoryEntry<'buf>>, ReadDirError> {
        use std::ptr;

        let base = buf.bytes.as_mut_ptr();
        let offset = base.align_offset(DIRENT_ALIGNMENT);
        if buf.bytes.len() < offset + size_of::<libc::dirent>() {
            debug_assert!(false, "buffer smaller than read_dir_buffer_size()");
            return Err(UndersizedBufferError.into());
        }
        // SAFETY: offset stays inside the buffer per the check above.
        let entry = unsafe { base.add(offset) }.cast::<libc::dirent>();

        let mut result: *mut libc::dirent = ptr::null_mut();
        loop {
            // The reentrant primitive is deprecated on glibc, but it is the
            // only one that fills a caller-owned record buffer.
            // EINTR isn't documented; happens in practice on macOS.
            #[allow(deprecated)]
            // SAFETY: entry points at dirent-sized, dirent-aligned writable
            // memory; result is a plain out-param.
            let error = unsafe { libc::readdir_r(self.dir, entry, &mut result) };
            if error != 0 {
                if err_no() == libc::EINTR {
                    continue;
                }
                debug_assert!(error > 0);
                return Err(OsError(error).into());
            }
            break;
        }

        if result.is_null() {
            return Ok(None);
        }
        debug_assert!(result == entry, "the record is filled into the caller's buffer");

        // SAFETY: the call filled entry with a valid record.
        let record = unsafe { &*entry };
        // SAFETY: d_name is NUL-terminated inside the record, which lives in
        // buf and therefore for 'buf.
        let name = unsafe { CStr::from_ptr(record.d_name.as_ptr()) };
        Ok(Some(DirectoryEntry {
            name,
            inode_type: InodeType::from_native(record.d_type),
        }))
    }

    /// Reads the next entry into `buf`.
    ///
    /// This platform has no reentrant read primitive, so every stream in the
    /// process shares one cursor serialized behind an internal lock; the
    /// record is copied into `buf` while the lock is held, which is why the
    /// returned entry still only lives until the next read into `buf`.
    #[cfg(not(any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
    )))]
    pub fn read<'buf>(
        &mut self,
        buf: &'buf mut DirBuffer,
    ) -> Result<Option<DirectoryEntry<'buf>>, ReadDirError> {
        use std::sync::{Mutex, PoisonError};

        static CURSOR: Mutex<()> = Mutex::new(());
        let _guard = CURSOR.lock().unwrap_or_else(PoisonError::into_inner);

        crate::syscall::clear_err_no();
        // SAFETY: the stream owns a live cursor; the cursor lock is held.
        let entry = unsafe { libc::readdir(self.dir) };
        if entry.is_null() {
            let e = err_no();
            if e != 0 {
                return Err(OsError(e).into());
            }
            return Ok(None);
        }

        // SAFETY: a non-null result points at the cursor's current record,
        // valid until the next readdir, which the lock postpones.
        let record = unsafe { &*entry };
        // SAFETY: d_name is NUL-terminated inside the record.
        let name = unsafe { CStr::from_ptr(record.d_name.as_ptr()) };
        let bytes = name.to_bytes_with_nul();
        if buf.bytes.len() < bytes.len() {
            debug_assert!(false, "buffer smaller than read_dir_buffer_size()");
            return Err(UndersizedBufferError.into());
        }
        buf.bytes[..bytes.len()].copy_from_slice(bytes);

        // SAFETY: just copied from a NUL-terminated source of this length.
        let name = unsafe { CStr::from_bytes_with_nul_unchecked(&buf.bytes[..bytes.len()]) };
        Ok(Some(DirectoryEntry {
            name,
            inode_type: Self::fallback_inode_type(record),
        }))
    }

    /// Closes the stream. An interruption during close still releases the
    /// cursor, so it is reported as success.
    pub fn close(self) -> Result<(), OsError> {
        // SAFETY: consumes the stream; the cursor is not touched again.
        let ret = unsafe { libc::closedir(self.dir) };
        if ret < 0 {
            let e = err_no();
            if e != libc::EINTR {
                return Err(OsError(e));
            }
        }
        Ok(())
    }

    #[cfg(any(target_os = "netbsd", target_os = "openbsd"))]
    const fn fallback_inode_type(record: &libc::dirent) -> InodeType {
        InodeType::from_native(record.d_type)
    }

    // No entry types on this platform family; the caller resolves them with
    // a separate stat call.
    #[cfg(any(target_os = "solaris", target_os = "illumos"))]
    const fn fallback_inode_type(_record: &libc::dirent) -> InodeType {
        InodeType::Unknown
    }
}
