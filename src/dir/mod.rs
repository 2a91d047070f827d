//! Directory enumeration.
//!
//! A [`DirectoryStream`] moves through **Opened → (Reading)\* → Closed**:
//! each [`read`](DirectoryStream::read) yields one entry, `None` at end of
//! stream, or an error that leaves the stream valid only for
//! [`close`](DirectoryStream::close).
//!
//! Entries are views, not copies: a [`DirectoryEntry`] borrows the caller's
//! [`DirBuffer`] and is invalidated by the next read into the same buffer.
//! Anything the caller needs to retain must be copied out before advancing.
//!
//! Platforms without a reentrant read primitive fall back to the process's
//! single directory cursor, serialized behind one internal lock; see
//! [`caps::has_reentrant_read_dir`](crate::caps::has_reentrant_read_dir).

mod entry;
mod stream;
mod tests;

pub use entry::*;
pub use stream::*;
