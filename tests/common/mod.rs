//! Serializes integration tests that drive osalloc's process-wide
//! allocator state. The allocator is explicitly single-threaded (see
//! the crate's top-level docs); Rust's test harness runs `#[test]`
//! functions on a thread pool by default, so every test in a binary
//! that touches the global list takes this lock first.

use std::sync::{Mutex, MutexGuard};

static ALLOCATOR_LOCK: Mutex<()> = Mutex::new(());

pub fn lock() -> MutexGuard<'static, ()> {
  ALLOCATOR_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
