mod common;

use osalloc::{allocate, free};

#[test]
fn allocate_reuses_the_tighter_freed_block() {
  let _guard = common::lock();

  unsafe {
    let a = allocate(100);
    let b = allocate(200);
    let c = allocate(50);
    // Keep a live block after C so C's successor is never the trailing
    // heap residual: otherwise freeing C lets coalesce-at-entry absorb
    // that much larger residual into C before best-fit ever runs, and
    // the bloated C would no longer be the tighter fit.
    let d = allocate(16);
    assert!(!a.is_null() && !b.is_null() && !c.is_null() && !d.is_null());

    free(a);
    free(c);

    let x = allocate(40);
    assert_eq!(x, c, "allocate(40) should reuse C, the tighter-fitting residual");

    free(x);
    free(b);
    free(d);
  }
}
