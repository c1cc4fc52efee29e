mod common;

use libc::sbrk;
use osalloc::align::align8;
use osalloc::allocate;
use osalloc::block::{HEADER_OFFSET, MMAP_THRESHOLD};

#[test]
fn expanding_the_tail_grows_the_break_by_exactly_the_deficit() {
  let _guard = common::lock();

  unsafe {
    // A large first allocation leaves a small FREE residual at the tail
    // of the preallocated heap.
    let first_payload = 120 * 1024;
    let a = allocate(first_payload);
    assert!(!a.is_null());

    let total_a = HEADER_OFFSET + align8(first_payload);
    let residual = MMAP_THRESHOLD - total_a;

    // A second request whose total size overflows that residual, but
    // still stays under the mapping threshold.
    let second_payload = 9000;
    let total_b = HEADER_OFFSET + align8(second_payload);
    assert!(total_b > residual, "test setup must overflow the tail's free capacity");
    assert!(total_b < MMAP_THRESHOLD);

    let before = sbrk(0) as isize;
    let b = allocate(second_payload);
    assert!(!b.is_null());
    let after = sbrk(0) as isize;

    assert_eq!((after - before) as usize, total_b - residual);
  }
}
