//! Error taxonomy for the internal syscall surface.
//!
//! The four public entry points (`allocate`, `free`, `zeroed_allocate`,
//! `resize`) keep the classical C allocator contract and return a null
//! pointer on failure rather than a `Result` — that contract is part of
//! the specification this crate satisfies. Internally, though, the
//! syscall wrappers in [`crate::sys`] return `Result` so the engine can
//! use `?` and so callers of the crate who drive the allocator directly
//! (rather than through the raw-pointer API) get a real error type.

use std::fmt;
use std::io;

/// An error from the allocator's internal syscall surface.
#[derive(Debug)]
pub enum AllocError {
  /// The `sbrk` program-break adjustment failed.
  SbrkFailed(io::Error),
  /// The `mmap` anonymous-mapping request failed.
  MmapFailed(io::Error),
  /// The `munmap` mapping-release request failed.
  MunmapFailed(io::Error),
  /// A precondition on the arguments was violated (e.g. zero size).
  InvalidArgument(&'static str),
}

impl fmt::Display for AllocError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AllocError::SbrkFailed(err) => write!(f, "sbrk failed: {err}"),
      AllocError::MmapFailed(err) => write!(f, "mmap failed: {err}"),
      AllocError::MunmapFailed(err) => write!(f, "munmap failed: {err}"),
      AllocError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
    }
  }
}

impl std::error::Error for AllocError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      AllocError::SbrkFailed(err) | AllocError::MmapFailed(err) | AllocError::MunmapFailed(err) => Some(err),
      AllocError::InvalidArgument(_) => None,
    }
  }
}
