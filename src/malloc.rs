use std::{
  alloc::{GlobalAlloc, Layout},
  ptr,
  sync::{Mutex, MutexGuard, PoisonError},
};

use crate::{
  block::ALIGNMENT,
  grower::{BrkGrower, Grower},
  heap::Heap,
};

/// First-fit free-list allocator over a growable heap, guarded by a single
/// process-wide lock.
pub struct FreeListAllocator<G: Grower = BrkGrower> {
  heap: Mutex<Heap<G>>,
}

impl FreeListAllocator<BrkGrower> {
  /// An allocator backed by the program break.
  pub const fn new() -> Self {
    Self::with_grower(BrkGrower::new())
  }
}

impl<G: Grower> FreeListAllocator<G> {
  pub const fn with_grower(grower: G) -> Self {
    Self {
      heap: Mutex::new(Heap::with_grower(grower)),
    }
  }

  // A poisoned lock is taken over as-is: no operation leaves the heap
  // half-mutated, and the allocator itself never panics while holding it.
  fn heap(&self) -> MutexGuard<'_, Heap<G>> {
    self.heap.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Allocates `size` bytes, 16-byte aligned. Returns null when `size` is
  /// zero (without taking the lock) or when the heap cannot grow.
  ///
  /// # Safety
  ///
  /// The returned region is uninitialized.
  pub unsafe fn allocate(
    &self,
    size: usize,
  ) -> *mut u8 {
    if size == 0 {
      return ptr::null_mut();
    }

    unsafe { self.heap().allocate(size) }
  }

  /// Releases a block. The last-created block is handed back to the OS;
  /// any other block is kept for reuse. Null is a no-op.
  ///
  /// # Safety
  ///
  /// `payload` must be null or a pointer obtained from this allocator that
  /// has not been released since.
  pub unsafe fn deallocate(
    &self,
    payload: *mut u8,
  ) {
    if payload.is_null() {
      return;
    }

    unsafe { self.heap().deallocate(payload) }
  }

  /// Allocates `count * element_size` bytes, zero-filled. Returns null when
  /// either argument is zero or the multiplication overflows.
  ///
  /// # Safety
  ///
  /// Same contract as [`FreeListAllocator::allocate`].
  pub unsafe fn allocate_zeroed(
    &self,
    count: usize,
    element_size: usize,
  ) -> *mut u8 {
    unsafe { self.heap().allocate_zeroed(count, element_size) }
  }

  /// Resizes a block, moving it if it is too small; the contents are kept up
  /// to the smaller of the two sizes. A null `payload` behaves like
  /// [`FreeListAllocator::allocate`]. A `new_size` of zero returns null and
  /// leaves the original block allocated, so the caller still owns it. On
  /// failure the original block is untouched and null is returned.
  ///
  /// # Safety
  ///
  /// `payload` must be null or a pointer obtained from this allocator that
  /// has not been released since.
  pub unsafe fn reallocate(
    &self,
    payload: *mut u8,
    new_size: usize,
  ) -> *mut u8 {
    unsafe { self.heap().reallocate(payload, new_size) }
  }

  /// Number of blocks currently carved from the arena, free or in use.
  pub fn block_count(&self) -> usize {
    unsafe { self.heap().list.len() }
  }
}

unsafe impl<G: Grower> GlobalAlloc for FreeListAllocator<G> {
  unsafe fn alloc(
    &self,
    layout: Layout,
  ) -> *mut u8 {
    if layout.align() > ALIGNMENT {
      return ptr::null_mut();
    }

    unsafe { self.allocate(layout.size()) }
  }

  unsafe fn dealloc(
    &self,
    ptr: *mut u8,
    _layout: Layout,
  ) {
    unsafe { self.deallocate(ptr) }
  }

  unsafe fn alloc_zeroed(
    &self,
    layout: Layout,
  ) -> *mut u8 {
    if layout.align() > ALIGNMENT {
      return ptr::null_mut();
    }

    unsafe { self.allocate_zeroed(layout.size(), 1) }
  }

  unsafe fn realloc(
    &self,
    ptr: *mut u8,
    layout: Layout,
    new_size: usize,
  ) -> *mut u8 {
    if layout.align() > ALIGNMENT {
      return ptr::null_mut();
    }

    unsafe { self.reallocate(ptr, new_size) }
  }
}
