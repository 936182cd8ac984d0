use std::{io::Read, ptr};

use libc::sbrk;
use rmalloc::FreeListAllocator;

/// Waits until the user presses ENTER.
/// Useful when you want to inspect memory state with tools like `pmap`,
/// `htop`, `gdb`, or just visually track how allocations change the program
/// break.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

/// Prints the current program break using `sbrk(0)`.
/// The program break is the upper boundary of the heap managed via brk/sbrk.
unsafe fn print_program_break(label: &str) {
  println!(
    "[{}] PID = {}, program break (sbrk(0)) = {:?}",
    label,
    std::process::id(),
    unsafe { sbrk(0) },
  );
}

fn main() {
  // Our free-list allocator. It keeps every block it ever carved from the
  // heap on a chain, reuses freed blocks first-fit, and retracts the program
  // break when the last block is released.
  let allocator = FreeListAllocator::new();

  unsafe {
    // Initial heap state
    print_program_break("start");
    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 1) Allocate 64 bytes and write a pattern into them.
    // --------------------------------------------------------------------
    let first_block = allocator.allocate(64);
    println!("\n[1] Allocate 64 bytes at {:?}", first_block);
    ptr::write_bytes(first_block, 0xAB, 64);
    println!("[1] Initialized first block with 0xAB");
    println!("[1] Blocks on the chain = {}", allocator.block_count());

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 2) Allocate 13 bytes. The payload size is rounded up to 16, so the
    //    next block still lands on a 16-byte boundary.
    // --------------------------------------------------------------------
    let second_block = allocator.allocate(13);
    println!("\n[2] Allocate 13 bytes (odd size) at {:?}", second_block);
    println!(
      "[2] Address = {:#X}, addr % 16 = {}",
      second_block as usize,
      second_block as usize % 16
    );

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 3) Free the first block. It is not the last one, so the break does
    //    not move; the block is only marked free for reuse.
    // --------------------------------------------------------------------
    allocator.deallocate(first_block);
    println!("\n[3] Deallocated first_block at {:?}", first_block);
    println!("[3] Blocks on the chain = {}", allocator.block_count());
    print_program_break("after interior free");

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 4) Allocate 32 bytes and check whether the freed block is reused.
    // --------------------------------------------------------------------
    let third_block = allocator.allocate(32);
    println!("\n[4] Allocate 32 bytes (check reuse of freed block)");
    println!(
      "[4] third_block == first_block? {}",
      if third_block == first_block {
        "Yes, it reused the freed block"
      } else {
        "No, it allocated somewhere else"
      }
    );

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 5) Zeroed allocation: 8 elements of 8 bytes, wiped clean.
    // --------------------------------------------------------------------
    let zeroed = allocator.allocate_zeroed(8, 8);
    println!("\n[5] Zero-allocate 8 x 8 bytes at {:?}", zeroed);
    let mut all_zero = true;
    for i in 0..64 {
      all_zero &= *zeroed.add(i) == 0;
    }
    println!("[5] All 64 bytes zero? {}", all_zero);

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 6) Grow the third block with reallocate. It moves to a new block and
    //    carries its contents along.
    // --------------------------------------------------------------------
    ptr::write_bytes(third_block, 0x77, 32);
    let grown = allocator.reallocate(third_block, 256);
    println!("\n[6] Reallocate 32 -> 256 bytes: {:?} -> {:?}", third_block, grown);
    println!("[6] First byte after the move = 0x{:X}", *grown);
    println!("[6] Blocks on the chain = {}", allocator.block_count());

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 7) Free the last block and watch the program break retract.
    // --------------------------------------------------------------------
    print_program_break("before tail free");
    allocator.deallocate(grown);
    print_program_break("after tail free");
    println!("[7] Blocks on the chain = {}", allocator.block_count());

    block_until_enter_pressed();

    // --------------------------------------------------------------------
    // 8) End of demo. Remaining blocks stay on the chain; the OS reclaims
    //    all memory when the process exits.
    // --------------------------------------------------------------------
    println!("\n[8] End of example. Process will exit and the OS will reclaim all memory.");
  }
}
