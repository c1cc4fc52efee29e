//! The allocation engine: the four public operations and the policy
//! decisions behind them — heap vs. mapping, splitting, top-of-heap
//! expansion, and resize-in-place vs. relocation.
//!
//! All state (the block list, the heap-bootstrap flag) lives in a
//! single process-wide [`GlobalState`] behind [`state`]. The allocator
//! is explicitly single-threaded (see the crate's top-level docs): there
//! is no locking here, and a host that exposes these entry points to
//! multiple threads must serialize externally.

use std::cell::UnsafeCell;
use std::ptr;

use crate::align::align8;
use crate::block::{BlockMeta, Status, HEADER_OFFSET, MIN_SPLIT_PAYLOAD, MMAP_THRESHOLD};
use crate::registry::BlockList;
use crate::sys;

struct GlobalState {
  list: BlockList,
  heap_preallocated: bool,
}

/// Wraps [`GlobalState`] so it can live in a `static`. `Sync` is a lie
/// in the general sense — it only holds because the allocator's
/// contract forbids concurrent use, exactly like the raw `sbrk`/`brk`
/// state it wraps.
struct StateCell(UnsafeCell<GlobalState>);

unsafe impl Sync for StateCell {}

static STATE: StateCell = StateCell(UnsafeCell::new(GlobalState {
  list: BlockList::new(),
  heap_preallocated: false,
}));

/// # Safety
/// The caller must uphold the allocator's single-threaded contract: no
/// other thread may be inside the engine concurrently.
unsafe fn state() -> &'static mut GlobalState {
  unsafe { &mut *STATE.0.get() }
}

fn total_size_for(payload_size: usize) -> usize {
  HEADER_OFFSET + align8(payload_size)
}

/// Splits `block` so that its ALLOC/MAPPED-bound prefix is exactly
/// `want_total` bytes, provided the residual is large enough to host a
/// new header plus [`MIN_SPLIT_PAYLOAD`] bytes. Returns whether a split
/// happened.
///
/// # Safety
/// `block` must be a live node in `list` with `(*block).size >=
/// want_total`.
unsafe fn maybe_split(list: &mut BlockList, block: *mut BlockMeta, want_total: usize) -> bool {
  unsafe {
    let residual = (*block).size - want_total;
    if residual < HEADER_OFFSET + MIN_SPLIT_PAYLOAD {
      return false;
    }

    let residual_ptr = (block as *mut u8).add(want_total);
    let residual_block = BlockMeta::init(residual_ptr, residual, Status::Free);
    list.insert_after(block, residual_block);
    (*block).size = want_total;
    true
  }
}

/// Extends the heap by exactly [`MMAP_THRESHOLD`] bytes and carves the
/// first ALLOC block of `want_total` bytes out of it, splitting off a
/// FREE residual sized against the arena actually reserved
/// (`MMAP_THRESHOLD`), never against whatever smaller threshold a
/// caller (e.g. `zeroed_allocate`) used to decide to take this path.
///
/// # Safety
/// Must only be called once per process, before `heap_preallocated` is
/// set.
unsafe fn bootstrap_heap(state: &mut GlobalState, want_total: usize, status: Status) -> Result<*mut BlockMeta, crate::error::AllocError> {
  let base = sys::sbrk(MMAP_THRESHOLD)?;
  state.heap_preallocated = true;

  unsafe {
    let block = BlockMeta::init(base, want_total, status);
    state.list.push_back(block);

    let residual = MMAP_THRESHOLD - want_total;
    if residual >= HEADER_OFFSET + MIN_SPLIT_PAYLOAD {
      let residual_ptr = base.add(want_total);
      let residual_block = BlockMeta::init(residual_ptr, residual, Status::Free);
      state.list.insert_after(block, residual_block);
    } else {
      (*block).size = MMAP_THRESHOLD;
    }

    log::debug!("bootstrapped heap: {MMAP_THRESHOLD} bytes, first block {want_total} bytes");
    Ok(block)
  }
}

/// # Safety
/// `size` must be nonzero; caller must uphold the single-threaded
/// contract.
unsafe fn allocate_with_threshold(size: usize, threshold: usize) -> *mut u8 {
  unsafe {
    let st = state();
    st.list.coalesce();

    let want_total = total_size_for(size);

    let block = if !st.heap_preallocated && want_total < threshold {
      match bootstrap_heap(st, want_total, Status::Alloc) {
        Ok(block) => block,
        Err(_) => return ptr::null_mut(),
      }
    } else if want_total >= threshold {
      match sys::mmap(want_total) {
        Ok(base) => {
          let block = BlockMeta::init(base, want_total, Status::Mapped);
          st.list.push_back(block);
          log::debug!("mapped {want_total} bytes at {base:p}");
          block
        }
        Err(_) => return ptr::null_mut(),
      }
    } else {
      let fit = st.list.find_best_fit(want_total);
      if !fit.is_null() {
        maybe_split(&mut st.list, fit, want_total);
        (*fit).status = Status::Alloc;
        fit
      } else {
        let prev = st.list.find_last_heap();
        if !prev.is_null() && (*prev).status == Status::Free {
          let needed = want_total - (*prev).size;
          match sys::sbrk(needed) {
            Ok(_) => {
              (*prev).size = want_total;
              (*prev).status = Status::Alloc;
              prev
            }
            Err(_) => return ptr::null_mut(),
          }
        } else {
          match sys::sbrk(want_total) {
            Ok(base) => {
              let block = BlockMeta::init(base, want_total, Status::Alloc);
              if prev.is_null() {
                st.list.push_back(block);
              } else {
                st.list.insert_after(prev, block);
              }
              block
            }
            Err(_) => return ptr::null_mut(),
          }
        }
      }
    };

    BlockMeta::payload(block)
  }
}

/// Allocates `size` bytes, returning a pointer to the payload or null
/// on zero-size input or syscall failure.
///
/// # Safety
/// The caller must uphold the allocator's single-threaded contract.
pub unsafe fn allocate(size: usize) -> *mut u8 {
  if size == 0 {
    log::warn!("{}", crate::error::AllocError::InvalidArgument("allocate: size must be nonzero"));
    return ptr::null_mut();
  }
  unsafe { allocate_with_threshold(size, MMAP_THRESHOLD) }
}

/// Frees a block previously returned by [`allocate`], [`zeroed_allocate`]
/// or [`resize`]. A null or unrecognized pointer is a no-op, as is a
/// pointer to an already-FREE block (double-free safe).
///
/// # Safety
/// The caller must uphold the allocator's single-threaded contract.
pub unsafe fn free(payload: *mut u8) {
  if payload.is_null() {
    return;
  }

  unsafe {
    let st = state();
    let block = st.list.find_by_payload(payload);
    if block.is_null() {
      return;
    }

    match (*block).status {
      Status::Alloc => {
        (*block).status = Status::Free;
      }
      Status::Mapped => {
        let size = (*block).size;
        st.list.unlink(block);
        let _ = sys::munmap(block as *mut u8, size);
        log::debug!("unmapped {size} bytes at {block:p}");
      }
      Status::Free => {}
    }
  }
}

/// Allocates space for `nmemb` elements of `size` bytes each, zeroed.
/// Rejects a zero-sized product. Uses the OS page size rather than
/// [`MMAP_THRESHOLD`] as the heap-vs-mapping threshold, since a fresh
/// mapping is kernel-zeroed and therefore strictly cheaper than an
/// explicit zeroing pass over the heap for large requests.
///
/// # Safety
/// The caller must uphold the allocator's single-threaded contract.
pub unsafe fn zeroed_allocate(nmemb: usize, size: usize) -> *mut u8 {
  let Some(total) = nmemb.checked_mul(size) else {
    log::warn!("{}", crate::error::AllocError::InvalidArgument("zeroed_allocate: nmemb * size overflows"));
    return ptr::null_mut();
  };
  if total == 0 {
    log::warn!("{}", crate::error::AllocError::InvalidArgument("zeroed_allocate: nmemb and size must both be nonzero"));
    return ptr::null_mut();
  }

  unsafe {
    let payload = allocate_with_threshold(total, sys::page_size());
    if payload.is_null() {
      return ptr::null_mut();
    }

    let block = BlockMeta::from_payload(payload);
    if (*block).status != Status::Mapped {
      ptr::write_bytes(payload, 0, total);
    }

    payload
  }
}

/// # Safety
/// `block` must be a live MAPPED node in `state().list`.
unsafe fn resize_mapped(block: *mut BlockMeta, size: usize) -> *mut u8 {
  unsafe {
    let new_payload = allocate(size);
    if new_payload.is_null() {
      return ptr::null_mut();
    }

    let old_payload = BlockMeta::payload(block);
    let old_capacity = BlockMeta::payload_capacity((*block).size);
    ptr::copy_nonoverlapping(old_payload, new_payload, size.min(old_capacity));

    free(old_payload);
    new_payload
  }
}

/// # Safety
/// `block` must be a live ALLOC node in `state().list`.
unsafe fn resize_heap(st: &mut GlobalState, block: *mut BlockMeta, size: usize) -> *mut u8 {
  unsafe {
    let want_total = total_size_for(size);
    let old_payload = BlockMeta::payload(block);

    if want_total <= (*block).size {
      maybe_split(&mut st.list, block, want_total);
      return old_payload;
    }

    if (*block).next.is_null() && want_total < MMAP_THRESHOLD {
      let needed = want_total - (*block).size;
      if sys::sbrk(needed).is_ok() {
        (*block).size = want_total;
        return old_payload;
      }
      return ptr::null_mut();
    }

    let next = (*block).next;
    if !next.is_null() && (*next).status == Status::Free && (*block).size + (*next).size >= want_total {
      let combined = (*block).size + (*next).size;
      let after_next = (*next).next;

      st.list.unlink(next);
      (*block).size = combined;
      (*block).next = after_next;
      if !after_next.is_null() {
        (*after_next).prev = block;
      }

      // This residual test intentionally omits the alignment-padding
      // term the other split sites add: HEADER_OFFSET is already
      // 8-aligned in this layout, so the two tests coincide.
      let residual = combined - want_total;
      if residual >= HEADER_OFFSET + MIN_SPLIT_PAYLOAD {
        let residual_ptr = (block as *mut u8).add(want_total);
        let residual_block = BlockMeta::init(residual_ptr, residual, Status::Free);
        st.list.insert_after(block, residual_block);
        (*block).size = want_total;
      }

      return old_payload;
    }

    let new_payload = allocate(size);
    if new_payload.is_null() {
      return ptr::null_mut();
    }
    let old_capacity = BlockMeta::payload_capacity((*block).size);
    ptr::copy(old_payload, new_payload, size.min(old_capacity));
    free(old_payload);
    new_payload
  }
}

/// Resizes the block at `payload` to hold `size` bytes, returning a
/// (possibly new) payload pointer.
///
/// - `payload == null` behaves like `allocate(size)`.
/// - `size == 0` frees `payload` and returns null.
/// - `payload` pointing at a FREE block is invalid and returns null.
///
/// # Safety
/// The caller must uphold the allocator's single-threaded contract.
pub unsafe fn resize(payload: *mut u8, size: usize) -> *mut u8 {
  unsafe {
    let st = state();
    st.list.coalesce();

    if payload.is_null() {
      return allocate(size);
    }
    if size == 0 {
      free(payload);
      return ptr::null_mut();
    }

    let block = st.list.find_by_payload(payload);
    if block.is_null() || (*block).status == Status::Free {
      log::warn!("{}", crate::error::AllocError::InvalidArgument("resize: pointer is not a live allocation"));
      return ptr::null_mut();
    }

    if (*block).status == Status::Mapped {
      return resize_mapped(block, size);
    }

    resize_heap(st, block, size)
  }
}
