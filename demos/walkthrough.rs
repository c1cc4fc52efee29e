use std::io::Read;

use libc::sbrk;
use osalloc::{allocate, free, resize, zeroed_allocate};

/// Waits until the user presses ENTER.
/// Useful when you want to inspect memory state with tools like `pmap`, `htop`,
/// `gdb`, or just visually track how allocations change the program break.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

/// Prints the current program break using `sbrk(0)`.
unsafe fn print_program_break(label: &str) {
  println!(
    "[{}] PID = {}, program break (sbrk(0)) = {:?}",
    label,
    std::process::id(),
    unsafe { sbrk(0) },
  );
}

fn main() {
  env_logger::init();

  unsafe {
    print_program_break("start");
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 1) Allocate 64 bytes. A virgin allocator preallocates a full
    //    MMAP_THRESHOLD-sized heap region on the first heap-serviced
    //    request, then splits off this block.
    // --------------------------------------------------------------------
    let first_block = allocate(64);
    println!("\n[1] Allocate 64 bytes");
    print_program_break("after bootstrap");
    first_block.write_bytes(0xDE, 64);
    println!("[1] ptr = {first_block:?}, first byte = 0x{:X}", *first_block);

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 2) Allocate 12 bytes. Odd sizes are padded up to an 8-byte
    //    multiple internally; the returned pointer is still 8-aligned.
    // --------------------------------------------------------------------
    let second_block = allocate(12);
    println!("\n[2] Allocate 12 bytes, ptr = {second_block:?}, aligned = {}", second_block as usize % 8 == 0);
    second_block.write_bytes(0xAB, 12);

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 3) Free the first block, then ask for something small again: the
    //    best-fit reuse path should hand back the same slot.
    // --------------------------------------------------------------------
    free(first_block);
    println!("\n[3] Freed first_block at {first_block:?}");

    let third_block = allocate(40);
    println!(
      "[3] allocate(40) -> {third_block:?} (reused first_block? {})",
      third_block == first_block
    );

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 4) Resize third_block upward. If it can absorb a freed
    //    neighbor or grow at the top of the heap it keeps the same
    //    pointer; otherwise it relocates.
    // --------------------------------------------------------------------
    let grown = resize(third_block, 256);
    println!(
      "\n[4] resize(third_block, 256) -> {grown:?} (moved? {})",
      grown != third_block
    );
    grown.write_bytes(0xCD, 256);

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 5) zeroed_allocate a large, page-crossing request: this takes the
    //    mapping path and the zero-fill is implicit, not a memset.
    // --------------------------------------------------------------------
    let page = libc::sysconf(libc::_SC_PAGESIZE) as usize;
    let zeroed = zeroed_allocate(1, page + 4096);
    let all_zero = std::slice::from_raw_parts(zeroed, page + 4096).iter().all(|&b| b == 0);
    println!("\n[5] zeroed_allocate({} bytes) -> {zeroed:?}, all zero = {all_zero}", page + 4096);

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 6) Allocate something past MMAP_THRESHOLD directly, then free it
    //    and watch the mapping disappear.
    // --------------------------------------------------------------------
    print_program_break("before large alloc");
    let big_block = allocate(200_000);
    println!("\n[6] Allocate 200000 bytes (mapped) -> {big_block:?}");
    print_program_break("after large alloc (unchanged: this went to mmap, not sbrk)");

    free(big_block);
    free(grown);
    free(zeroed);

    println!("\n[7] End of walkthrough. Remaining heap memory is reclaimed by the OS at exit.");
  }
}
