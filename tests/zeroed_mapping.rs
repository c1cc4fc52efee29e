mod common;

use osalloc::zeroed_allocate;

#[test]
fn zeroed_allocate_on_the_mapping_path_is_zero_without_an_explicit_memset() {
  let _guard = common::lock();

  unsafe {
    let page = libc::sysconf(libc::_SC_PAGESIZE) as usize;
    let nmemb = page + 4096;

    let ptr = zeroed_allocate(1, nmemb);
    assert!(!ptr.is_null());

    let slice = std::slice::from_raw_parts(ptr, nmemb);
    assert!(slice.iter().all(|&b| b == 0));
  }
}
