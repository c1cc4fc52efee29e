mod common;

use libc::sbrk;
use osalloc::allocate;

#[test]
fn first_small_allocation_preallocates_exactly_mmap_threshold() {
  let _guard = common::lock();

  let before = unsafe { sbrk(0) } as isize;
  let ptr = unsafe { allocate(64) };
  assert!(!ptr.is_null());
  let after = unsafe { sbrk(0) } as isize;

  assert_eq!(after - before, 128 * 1024);

  unsafe {
    ptr.write_bytes(0xAB, 64);
    assert_eq!(*ptr, 0xAB);
  }
}
