//! Thin, strongly-typed wrappers over the POSIX file, directory, memory
//! mapping, locking and filesystem introspection syscalls, presenting one
//! consistent contract across Unix-like targets.
//!
//! # Scope
//! Every entry point is a stateless, synchronous forwarding call: flag
//! encodings are translated from stable platform-independent values to the
//! native constants, interrupted calls are retried so `EINTR` never reaches
//! the caller, and native structs are projected into portable shapes. Beyond
//! that the kernel's behavior is passed through untouched - error codes are
//! forwarded verbatim rather than reinterpreted.
//!
//! # Error Handling
//! Failures fall into three tiers, kept strictly apart:
//! - contract violations (unrecognized flag bits, an undersized scratch
//!   buffer, a negative lock range) abort debug builds via `debug_assert!`
//!   and surface as their own zero-sized error types in release builds;
//! - operations a platform simply lacks return a distinct
//!   [`NotSupportedError`] so callers can degrade gracefully instead of
//!   parsing error codes - the [`caps`] module lets them ask up front;
//! - everything else is an [`OsError`] carrying the untouched `errno` value.
//!
//! # Ownership
//! This layer never retains, caches, or auto-closes anything. A [`fd::Fd`]
//! is a plain copyable handle with no destructor; every acquire has a
//! matching caller-issued release ([`fd::close`], [`dir::DirectoryStream::close`],
//! [`mmap::unmap`]). Failing to release is a caller-level leak.
#![cfg(unix)]

#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::unwrap_used)]

pub mod caps;
pub mod copy;
pub mod dir;
pub mod fd;
pub mod flags;
pub mod fstype;
pub mod io;
pub mod lock;
pub mod mmap;
pub mod notify;
pub mod stat;

mod error;
mod syscall;

pub use error::*;

#[cfg(test)]
pub(crate) mod test_support;
