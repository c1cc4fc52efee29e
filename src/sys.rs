//! Thin wrappers around the two raw virtual-memory primitives this
//! allocator is built on: program-break adjustment (`sbrk`) and
//! anonymous private mapping (`mmap`/`munmap`).
//!
//! Nothing above this module touches `libc` directly — the block
//! registry and allocation engine only see [`AllocError`].

use std::io;
use std::ptr;

use libc::{c_void, intptr_t};

use crate::error::AllocError;

/// Extends the program break by `increment` bytes and returns the
/// address at which the new region begins (the break's old value).
///
/// This allocator never shrinks the break: `increment` is always a
/// positive grow request (see the non-goal on returning heap pages to
/// the OS).
pub fn sbrk(increment: usize) -> Result<*mut u8, AllocError> {
  let res = unsafe { libc::sbrk(increment as intptr_t) };
  if res == usize::MAX as *mut c_void {
    log::debug!("sbrk({increment}) failed: {}", io::Error::last_os_error());
    Err(AllocError::SbrkFailed(io::Error::last_os_error()))
  } else {
    log::trace!("sbrk({increment}) -> {res:p}");
    Ok(res as *mut u8)
  }
}

/// Requests a fresh anonymous, private, read-write mapping of exactly
/// `len` bytes. The kernel guarantees the returned pages are
/// zero-filled.
pub fn mmap(len: usize) -> Result<*mut u8, AllocError> {
  let res = unsafe {
    libc::mmap(
      ptr::null_mut(),
      len,
      libc::PROT_READ | libc::PROT_WRITE,
      libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
      -1,
      0,
    )
  };
  if res == libc::MAP_FAILED {
    log::debug!("mmap({len}) failed: {}", io::Error::last_os_error());
    Err(AllocError::MmapFailed(io::Error::last_os_error()))
  } else {
    log::trace!("mmap({len}) -> {res:p}");
    Ok(res as *mut u8)
  }
}

/// Releases a mapping previously returned by [`mmap`].
///
/// # Safety
/// `base` must be the exact base address of a live mapping of exactly
/// `len` bytes previously returned by [`mmap`].
pub unsafe fn munmap(base: *mut u8, len: usize) -> Result<(), AllocError> {
  let rc = unsafe { libc::munmap(base as *mut c_void, len) };
  if rc != 0 {
    log::debug!("munmap({base:p}, {len}) failed: {}", io::Error::last_os_error());
    Err(AllocError::MunmapFailed(io::Error::last_os_error()))
  } else {
    log::trace!("munmap({base:p}, {len})");
    Ok(())
  }
}

/// The OS page size, used as the size threshold for `zeroed_allocate`.
pub fn page_size() -> usize {
  unsafe { libc::sysconf(libc::_SC_PAGESIZE) as usize }
}
