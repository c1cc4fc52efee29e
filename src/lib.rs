//! # osalloc — a heap+mmap general-purpose allocator
//!
//! A user-space allocator built directly on the two raw virtual-memory
//! primitives an OS gives a process: program-break extension (`sbrk`)
//! and anonymous private mapping (`mmap`/`munmap`). It exposes the
//! classical C allocator contract — [`allocate`], [`free`],
//! [`zeroed_allocate`], [`resize`] — plus an optional [`OsAllocator`]
//! front-end for use as `#[global_allocator]`.
//!
//! ## Overview
//!
//! Small requests are served from a single contiguous heap region grown
//! by `sbrk`; large requests get their own `mmap`'d region:
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                     process address space                    │
//!   │                                                                │
//!   │   heap (sbrk-grown)             independent mmap regions       │
//!   │   ┌─────┬──────┬─────┐          ┌─────────┐   ┌─────────┐    │
//!   │   │ A   │ FREE │  B  │  ...     │ mapped  │   │ mapped  │    │
//!   │   └─────┴──────┴─────┘          └─────────┘   └─────────┘    │
//!   │   ▲                                                            │
//!   │   every block preceded by a BlockMeta header                  │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every live region — heap or mapped — is threaded into one global
//! doubly linked list of [`block::BlockMeta`] headers. The
//! [`registry`] module owns search/sort/coalesce over that list; the
//! [`engine`] module owns the four operations' policy (heap vs.
//! mapping, splitting, top-of-heap expansion, resize-in-place vs.
//! relocation).
//!
//! ## Crate structure
//!
//! ```text
//!   osalloc
//!   ├── align     - 8-byte alignment helper
//!   ├── block     - BlockMeta header, Status, header-offset math
//!   ├── sys       - sbrk / mmap / munmap wrappers
//!   ├── error     - AllocError
//!   ├── registry  - the block list: search, sort, coalesce
//!   ├── engine    - allocate / free / zeroed_allocate / resize
//!   └── global    - GlobalAlloc front-end (OsAllocator)
//! ```
//!
//! ## Quick start
//!
//! ```
//! use osalloc::{allocate, free};
//!
//! unsafe {
//!     let ptr = allocate(64);
//!     assert!(!ptr.is_null());
//!     ptr.write(0xAB);
//!     free(ptr);
//! }
//! ```
//!
//! ## Thread safety
//!
//! This allocator is **not** thread-safe. The global block list, the
//! heap-bootstrap flag and the process break are unsynchronized,
//! process-wide mutable state. A host that exposes these entry points
//! to multiple threads must serialize externally — there is no lock
//! anywhere in this crate.
//!
//! ## Non-goals
//!
//! Security hardening (canaries, ASLR, guard pages), alignment beyond 8
//! bytes, shrinking the program break on free, returning heap pages to
//! the OS, fragmentation statistics, debug tooling, thread-local
//! caching or size-class bucketing. This is a single-threaded,
//! educational-grade first-fit-with-best-match design.

pub mod align;
pub mod block;
mod engine;
pub mod error;
mod global;
pub mod registry;
mod sys;

pub use error::AllocError;
pub use global::OsAllocator;

/// Allocates `size` bytes and returns a pointer to the payload, or null
/// if `size` is zero or the underlying syscall failed.
///
/// # Safety
/// The caller must uphold the allocator's single-threaded contract (see
/// the crate's top-level docs): no other thread may call into this
/// crate concurrently.
pub unsafe fn allocate(size: usize) -> *mut u8 {
  unsafe { engine::allocate(size) }
}

/// Frees a block previously returned by [`allocate`], [`zeroed_allocate`]
/// or [`resize`]. A null or unrecognized pointer is a no-op.
///
/// # Safety
/// The caller must uphold the allocator's single-threaded contract and
/// must not pass a pointer this allocator did not hand out.
pub unsafe fn free(ptr: *mut u8) {
  unsafe { engine::free(ptr) }
}

/// Allocates zeroed space for `nmemb` elements of `size` bytes each.
/// Returns null if the product is zero or overflows, or if the
/// underlying syscall failed.
///
/// # Safety
/// The caller must uphold the allocator's single-threaded contract.
pub unsafe fn zeroed_allocate(nmemb: usize, size: usize) -> *mut u8 {
  unsafe { engine::zeroed_allocate(nmemb, size) }
}

/// Resizes the block at `ptr` to `size` bytes, returning a (possibly
/// new) payload pointer. `ptr == null` behaves like `allocate(size)`;
/// `size == 0` frees `ptr` and returns null; a `ptr` that identifies a
/// FREE block is invalid and returns null.
///
/// # Safety
/// The caller must uphold the allocator's single-threaded contract and
/// must not pass a pointer this allocator did not hand out.
pub unsafe fn resize(ptr: *mut u8, size: usize) -> *mut u8 {
  unsafe { engine::resize(ptr, size) }
}
