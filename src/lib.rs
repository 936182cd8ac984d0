//! # rmalloc - A Free-List Memory Allocator Library
//!
//! This crate provides a simple **first-fit free-list allocator**
//! implementation in Rust that manages memory using the `sbrk` system call,
//! usable as a drop-in replacement for the process allocator.
//!
//! ## Overview
//!
//! Every allocation is a block: a hidden header followed by the payload the
//! caller sees. All blocks ever carved from the heap stay chained together
//! in creation order, and freed blocks are reused by the first request they
//! fit:
//!
//! ```text
//!   Free-List Concept:
//!
//!   head                                                        tail
//!    │                                                            │
//!    ▼                                                            ▼
//!   ┌────────┬────────┐   ┌────────┬────────┐   ┌────────┬────────┐
//!   │ Header │  Used  │──▶│ Header │  Free  │──▶│ Header │  Used  │──▶ null
//!   └────────┴────────┘   └────────┴────────┘   └────────┴────────┘
//!                                  ▲                              ▲
//!                                  │                              │
//!                          Reused by the next              Program Break
//!                          fitting allocation         (retracts when the
//!                                                     last block is freed)
//! ```
//!
//! Releasing the last block hands its memory back to the operating system by
//! retracting the program break; releasing any other block only marks it
//! free for reuse.
//!
//! ## Crate Structure
//!
//! ```text
//!   rmalloc
//!   ├── align      - Alignment macro (align_to!)
//!   ├── block      - Block header layout and header/payload conversions
//!   ├── grower     - Heap growth primitive (Grower trait, BrkGrower)
//!   ├── list       - The block chain: first-fit search, append, unlink
//!   ├── heap       - The four operations over list + grower (internal)
//!   ├── malloc     - FreeListAllocator: the locked facade, GlobalAlloc
//!   └── c_api      - malloc/free/calloc/realloc symbols (feature "c-exports")
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rmalloc::FreeListAllocator;
//!
//! fn main() {
//!     let allocator = FreeListAllocator::new();
//!
//!     unsafe {
//!         // Allocate 64 bytes, 16-byte aligned.
//!         let ptr = allocator.allocate(64);
//!
//!         // Use the memory.
//!         ptr.write_bytes(0xAB, 64);
//!
//!         // Free the memory.
//!         allocator.deallocate(ptr);
//!     }
//! }
//! ```
//!
//! Or install it for the whole program:
//!
//! ```rust,ignore
//! use rmalloc::FreeListAllocator;
//!
//! #[global_allocator]
//! static GLOBAL: FreeListAllocator = FreeListAllocator::new();
//! ```
//!
//! ## How It Works
//!
//! The allocator uses `sbrk(2)` to extend the program's data segment:
//!
//! ```text
//!   Program Memory Layout:
//!
//!   High Address ┌─────────────────────┐
//!                │       Stack         │ ↓ grows down
//!                │         │           │
//!                │         ▼           │
//!                │                     │
//!                │         ▲           │
//!                │         │           │
//!                │       Heap          │ ↑ grows up (sbrk)
//!                ├─────────────────────┤ ← Program Break
//!                │   Uninitialized     │
//!                │       Data          │
//!                ├─────────────────────┤
//!                │   Initialized       │
//!                │       Data          │
//!                ├─────────────────────┤
//!                │       Text          │
//!   Low Address  └─────────────────────┘
//! ```
//!
//! Each allocation creates a block with metadata:
//!
//! ```text
//!   Single Allocation:
//!   ┌───────────────────────┬────────────────────────────────┐
//!   │    Block Header       │         User Data              │
//!   │  ┌─────────────────┐  │                                │
//!   │  │ size: N         │  │  ┌──────────────────────────┐  │
//!   │  │ is_free: false  │  │  │                          │  │
//!   │  │ next: null/ptr  │  │  │     N bytes usable       │  │
//!   │  └─────────────────┘  │  │                          │  │
//!   │  32 bytes, 16-aligned │  └──────────────────────────┘  │
//!   └───────────────────────┴────────────────────────────────┘
//!                           ▲
//!                           └── Pointer returned to user
//! ```
//!
//! A request that no free block satisfies grows the heap by the header plus
//! the payload size rounded up to 16 bytes, so every payload in the chain
//! stays 16-byte aligned.
//!
//! ## Features
//!
//! - **Block reuse**: freed blocks are recycled first-fit before the heap
//!   grows
//! - **Heap shrinking**: releasing the last block retracts the program break
//! - **Thread safe**: one process-wide lock serializes every operation
//! - **Standard interface**: implements `GlobalAlloc`, with optional
//!   `malloc`/`free`/`calloc`/`realloc` C symbols behind the `c-exports`
//!   feature
//! - **Swappable backend**: the heap source is a trait, so the allocator can
//!   run against an arena that is not the real program break
//!
//! ## Limitations
//!
//! - **No splitting or merging**: blocks are reused whole, so a small
//!   request can pin a large freed block
//! - **O(n) bookkeeping**: first-fit search and tail removal both walk the
//!   chain
//! - **Coarse locking**: all threads contend on a single lock
//! - **Alignment ceiling**: requests for alignment above 16 bytes fail
//! - **Unix-only**: requires `libc` and `sbrk` (POSIX systems)
//! - **Logging**: operations emit `log` trace events; when the allocator is
//!   installed as `#[global_allocator]`, leave the logger uninstalled, since
//!   loggers themselves allocate
//!
//! ## Safety
//!
//! This crate is inherently unsafe as it deals with raw memory management.
//! Releasing a pointer that did not come from the allocator, or releasing
//! one twice, is undefined behavior and is not defended against.

pub mod align;
mod block;
mod grower;
mod heap;
mod list;
mod malloc;

#[cfg(feature = "c-exports")]
mod c_api;

pub use block::ALIGNMENT;
pub use grower::{BrkGrower, Grower};
pub use malloc::FreeListAllocator;
