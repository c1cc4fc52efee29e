mod common;

use osalloc::{allocate, free, resize};

#[test]
fn resize_grows_in_place_by_absorbing_a_freed_successor() {
  let _guard = common::lock();

  unsafe {
    let a = allocate(64);
    let b = allocate(64);
    assert!(!a.is_null() && !b.is_null());

    free(b);

    let grown = resize(a, 120);
    assert_eq!(grown, a, "absorbing the freed successor must not relocate the payload");

    grown.write_bytes(0x7E, 120);
    assert_eq!(*grown, 0x7E);

    free(grown);
  }
}
