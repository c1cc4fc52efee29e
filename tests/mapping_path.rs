mod common;

use osalloc::{allocate, free, resize};

#[test]
fn large_allocation_uses_a_mapping_and_is_released_on_free() {
  let _guard = common::lock();

  let ptr = unsafe { allocate(200_000) };
  assert!(!ptr.is_null());

  unsafe {
    ptr.write_bytes(0x5A, 4096);
    assert_eq!(*ptr, 0x5A);
  }

  unsafe { free(ptr) };

  // The block record is gone; the allocator must treat this pointer as
  // unrecognized rather than touch the now-unmapped memory.
  let resized = unsafe { resize(ptr, 16) };
  assert!(resized.is_null());
}
