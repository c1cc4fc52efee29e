//! In-band block metadata.
//!
//! Every live region — heap-resident or mapping-resident — carries an
//! immediately preceding [`BlockMeta`] record. The record sits at the
//! start of the region; the pointer handed to the caller is the byte
//! immediately after it, so the header is recoverable from a payload
//! pointer by subtracting [`HEADER_OFFSET`].

use std::mem;

use crate::align::align8;

/// Size boundary, in bytes, above which `allocate`/`resize` service a
/// request with a fresh anonymous mapping instead of the heap.
pub const MMAP_THRESHOLD: usize = 128 * 1024;

/// Minimum payload a residual split must retain to be worth keeping as
/// its own block.
pub const MIN_SPLIT_PAYLOAD: usize = 8;

/// Size of [`BlockMeta`] itself, unpadded.
pub const META_SIZE: usize = mem::size_of::<BlockMeta>();

/// Byte offset from the start of a region to its payload: [`META_SIZE`]
/// rounded up to 8-byte alignment. [`BlockMeta`]'s own pointer fields
/// already force this to be a no-op in practice, but the rounding is
/// kept explicit so the invariant holds even if the record grows a
/// non-pointer-sized field later.
pub const HEADER_OFFSET: usize = align8(META_SIZE);

/// The state of a block in the global list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
  /// A reusable heap region.
  Free,
  /// A heap region currently handed out to a caller.
  Alloc,
  /// A region backed by its own anonymous mapping. Never split, never
  /// coalesced, released in full on free.
  Mapped,
}

/// The in-band header placed at the start of every block.
#[repr(C)]
pub struct BlockMeta {
  /// Total size of the region in bytes, including this header and its
  /// alignment padding.
  pub size: usize,
  pub status: Status,
  pub prev: *mut BlockMeta,
  pub next: *mut BlockMeta,
}

impl BlockMeta {
  /// Writes a fresh header at `at`, with no list linkage.
  ///
  /// # Safety
  /// `at` must point to at least `size` writable bytes.
  pub unsafe fn init(at: *mut u8, size: usize, status: Status) -> *mut BlockMeta {
    let block = at as *mut BlockMeta;
    unsafe {
      (*block).size = size;
      (*block).status = status;
      (*block).prev = std::ptr::null_mut();
      (*block).next = std::ptr::null_mut();
    }
    block
  }

  /// The payload address for a block whose header lives at `block`.
  ///
  /// # Safety
  /// `block` must point to a valid [`BlockMeta`].
  pub unsafe fn payload(block: *mut BlockMeta) -> *mut u8 {
    unsafe { (block as *mut u8).add(HEADER_OFFSET) }
  }

  /// Recovers the header pointer given a payload pointer previously
  /// returned by [`BlockMeta::payload`].
  ///
  /// # Safety
  /// `payload` must have been returned by a prior call to
  /// [`BlockMeta::payload`] on a still-live block.
  pub unsafe fn from_payload(payload: *mut u8) -> *mut BlockMeta {
    unsafe { payload.sub(HEADER_OFFSET) as *mut BlockMeta }
  }

  /// Usable payload capacity of a block of total size `size`.
  pub fn payload_capacity(size: usize) -> usize {
    size - HEADER_OFFSET
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn header_offset_is_eight_aligned() {
    assert_eq!(HEADER_OFFSET % 8, 0);
    assert!(HEADER_OFFSET >= META_SIZE);
  }

  #[test]
  fn payload_roundtrips_through_from_payload() {
    let mut buf = vec![0u8; HEADER_OFFSET + 64];
    let base = buf.as_mut_ptr();

    unsafe {
      let block = BlockMeta::init(base, HEADER_OFFSET + 64, Status::Alloc);
      let payload = BlockMeta::payload(block);
      assert_eq!(BlockMeta::from_payload(payload), block);
      assert_eq!(payload as usize - base as usize, HEADER_OFFSET);
    }
  }
}
