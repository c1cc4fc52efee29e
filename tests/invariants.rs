mod common;

use osalloc::{allocate, free, resize, zeroed_allocate};

#[test]
fn payload_pointers_are_eight_aligned() {
  let _guard = common::lock();

  unsafe {
    for size in [1usize, 3, 7, 8, 9, 100, 4095, 70_000] {
      let ptr = allocate(size);
      assert!(!ptr.is_null());
      assert_eq!(ptr as usize % 8, 0, "payload for size {size} is not 8-aligned");
      free(ptr);
    }
  }
}

#[test]
fn resize_to_current_capacity_is_a_pointer_preserving_noop() {
  let _guard = common::lock();

  unsafe {
    let ptr = allocate(64);
    assert!(!ptr.is_null());

    let same = resize(ptr, 64);
    assert_eq!(same, ptr);

    free(same);
  }
}

#[test]
fn free_is_null_safe_and_double_free_safe() {
  let _guard = common::lock();

  unsafe {
    free(std::ptr::null_mut());

    let ptr = allocate(32);
    assert!(!ptr.is_null());
    free(ptr);
    free(ptr);
  }
}

#[test]
fn zero_sized_requests_are_rejected() {
  let _guard = common::lock();

  unsafe {
    assert!(allocate(0).is_null());
    assert!(zeroed_allocate(0, 16).is_null());
    assert!(zeroed_allocate(16, 0).is_null());
  }
}

#[test]
fn resizing_a_free_block_is_invalid() {
  let _guard = common::lock();

  unsafe {
    let ptr = allocate(32);
    assert!(!ptr.is_null());
    free(ptr);

    let result = resize(ptr, 64);
    assert!(result.is_null());
  }
}

#[test]
fn allocate_then_free_then_allocate_reuses_the_same_arena() {
  let _guard = common::lock();

  unsafe {
    let first = allocate(48);
    assert!(!first.is_null());
    free(first);

    let second = allocate(48);
    assert!(!second.is_null());
    assert_eq!(second, first, "freeing then reallocating the same size should reuse the same slot");

    free(second);
  }
}
