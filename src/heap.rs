use std::ptr;

use log::trace;

use crate::{
  align_to,
  block::{ALIGNMENT, Block, HEADER_SIZE},
  grower::Grower,
  list::FreeList,
};

/// Unsynchronized allocator core: the block chain plus its arena source.
/// [`FreeListAllocator`](crate::FreeListAllocator) wraps one of these in the
/// global lock.
pub(crate) struct Heap<G: Grower> {
  pub(crate) list: FreeList,
  pub(crate) grower: G,
}

// Headers are reachable only through the heap that carved them.
unsafe impl<G: Grower + Send> Send for Heap<G> {}

impl<G: Grower> Heap<G> {
  pub(crate) const fn with_grower(grower: G) -> Self {
    Self {
      list: FreeList::new(),
      grower,
    }
  }

  pub(crate) unsafe fn allocate(
    &mut self,
    size: usize,
  ) -> *mut u8 {
    unsafe {
      if size == 0 {
        return ptr::null_mut();
      }

      let block = self.list.find_free(size);

      if !block.is_null() {
        (*block).is_free = false;
        trace!("reusing a {} byte block for a {} byte request", (*block).size, size);
        return Block::payload(block);
      }

      let payload_size = align_to!(size, ALIGNMENT);

      let boundary = self.grower.boundary();
      if boundary.is_null() {
        return ptr::null_mut();
      }

      // One-time correction for a boundary that starts misaligned; after it,
      // every growth is a multiple of the alignment.
      let pad = align_to!(boundary as usize, ALIGNMENT) - boundary as usize;

      let start = self.grower.grow(pad + HEADER_SIZE + payload_size);
      if start.is_null() {
        return ptr::null_mut();
      }

      trace!("grew the heap by {} bytes", pad + HEADER_SIZE + payload_size);

      let block = start.add(pad) as *mut Block;
      block.write(Block::new(payload_size, false, ptr::null_mut()));
      self.list.append(block);

      Block::payload(block)
    }
  }

  pub(crate) unsafe fn deallocate(
    &mut self,
    payload: *mut u8,
  ) {
    unsafe {
      if payload.is_null() {
        return;
      }

      let block = Block::from_payload(payload);

      // Only the physically last block is handed back to the OS: it is the
      // tail and its payload ends exactly at the heap boundary.
      if block == self.list.tail() && payload.add((*block).size) == self.grower.boundary() {
        let total = HEADER_SIZE + (*block).size;

        self.list.unlink_tail();
        self.grower.shrink(total);

        trace!("retracted the heap by {} bytes", total);
        return;
      }

      (*block).is_free = true;
    }
  }

  pub(crate) unsafe fn allocate_zeroed(
    &mut self,
    count: usize,
    element_size: usize,
  ) -> *mut u8 {
    unsafe {
      let total = match count.checked_mul(element_size) {
        Some(total) => total,
        None => return ptr::null_mut(),
      };

      let payload = self.allocate(total);

      if !payload.is_null() {
        ptr::write_bytes(payload, 0, total);
      }

      payload
    }
  }

  /// Grows `payload` to at least `new_size` bytes, moving the contents if
  /// the block is too small. A null `payload` behaves like `allocate`; a
  /// `new_size` of zero returns null and leaves the original block in use,
  /// so the caller still owns it.
  pub(crate) unsafe fn reallocate(
    &mut self,
    payload: *mut u8,
    new_size: usize,
  ) -> *mut u8 {
    unsafe {
      if payload.is_null() || new_size == 0 {
        return self.allocate(new_size);
      }

      let block = Block::from_payload(payload);

      if (*block).size >= new_size {
        return payload;
      }

      let new_payload = self.allocate(new_size);
      if new_payload.is_null() {
        return ptr::null_mut();
      }

      ptr::copy_nonoverlapping(payload, new_payload, (*block).size);
      self.deallocate(payload);

      new_payload
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grower::fixed::FixedGrower;

  fn heap() -> Heap<FixedGrower> {
    let _ = env_logger::builder().is_test(true).try_init();

    Heap::with_grower(FixedGrower::new(4096))
  }

  #[test]
  fn test_allocate_is_aligned_and_usable() {
    let mut heap = heap();

    unsafe {
      let first = heap.allocate(24);
      let second = heap.allocate(8);

      assert!(!first.is_null());
      assert!(!second.is_null());
      assert_eq!(0, first as usize % ALIGNMENT);
      assert_eq!(0, second as usize % ALIGNMENT);

      ptr::write_bytes(first, 0xAB, 24);
      ptr::write_bytes(second, 0xCD, 8);

      for i in 0..24 {
        assert_eq!(0xAB, *first.add(i));
      }
      for i in 0..8 {
        assert_eq!(0xCD, *second.add(i));
      }
    }
  }

  #[test]
  fn test_allocate_zero_returns_null_and_tracks_nothing() {
    let mut heap = heap();

    unsafe {
      assert!(heap.allocate(0).is_null());
      assert_eq!(0, heap.list.len());

      heap.allocate(16);
      assert!(heap.allocate(0).is_null());
      assert_eq!(1, heap.list.len());
    }
  }

  #[test]
  fn test_allocate_aligns_a_misaligned_boundary() {
    let mut heap = Heap::with_grower(FixedGrower::with_offset(4096, 8));

    unsafe {
      let first = heap.allocate(10);
      let second = heap.allocate(10);

      assert!(!first.is_null());
      assert_eq!(0, first as usize % ALIGNMENT);
      assert_eq!(0, second as usize % ALIGNMENT);
    }
  }

  #[test]
  fn test_allocate_reuses_a_freed_interior_block() {
    let mut heap = heap();

    unsafe {
      let first = heap.allocate(64);
      let _second = heap.allocate(16);
      let boundary = heap.grower.boundary();

      heap.deallocate(first);
      assert_eq!(2, heap.list.len());

      let reused = heap.allocate(32);
      assert_eq!(first, reused);
      assert_eq!(boundary, heap.grower.boundary());
      assert_eq!(2, heap.list.len());

      // The reused block keeps its full original capacity; nothing splits.
      assert_eq!(64, (*Block::from_payload(reused)).size);
    }
  }

  #[test]
  fn test_deallocate_tail_retracts_the_boundary() {
    let mut heap = heap();

    unsafe {
      let base = heap.grower.boundary();

      let first = heap.allocate(32);
      let second = heap.allocate(48);
      let grown = heap.grower.boundary();

      heap.deallocate(second);
      assert_eq!(grown.sub(HEADER_SIZE + 48), heap.grower.boundary());
      assert_eq!(1, heap.list.len());

      // `first` is now the tail again, so it is retracted as well.
      heap.deallocate(first);
      assert_eq!(0, heap.list.len());
      assert_eq!(base, heap.grower.boundary());
    }
  }

  #[test]
  fn test_deallocate_interior_block_marks_it_free() {
    let mut heap = heap();

    unsafe {
      heap.deallocate(ptr::null_mut());
      assert_eq!(0, heap.list.len());

      let first = heap.allocate(32);
      let second = heap.allocate(48);
      let boundary = heap.grower.boundary();

      heap.deallocate(first);
      assert_eq!(boundary, heap.grower.boundary());
      assert_eq!(2, heap.list.len());
      assert!((*Block::from_payload(first)).is_free);

      // Releasing the tail retracts it, but the freed interior block stays
      // linked until it is reused.
      heap.deallocate(second);
      assert_eq!(1, heap.list.len());
      assert!((*Block::from_payload(first)).is_free);
    }
  }

  #[test]
  fn test_allocate_zeroed_wipes_a_recycled_block() {
    let mut heap = heap();

    unsafe {
      let dirty = heap.allocate(32);
      let _guard = heap.allocate(16);

      ptr::write_bytes(dirty, 0xFF, 32);
      heap.deallocate(dirty);

      let payload = heap.allocate_zeroed(4, 8);
      assert_eq!(dirty, payload);

      for i in 0..32 {
        assert_eq!(0, *payload.add(i));
      }
    }
  }

  #[test]
  fn test_allocate_zeroed_rejects_overflow_and_zero() {
    let mut heap = heap();

    unsafe {
      assert!(heap.allocate_zeroed(usize::MAX, 2).is_null());
      assert!(heap.allocate_zeroed(usize::MAX / 2, 3).is_null());
      assert!(heap.allocate_zeroed(0, 8).is_null());
      assert!(heap.allocate_zeroed(8, 0).is_null());

      assert_eq!(0, heap.list.len());
    }
  }

  #[test]
  fn test_reallocate_within_capacity_returns_the_same_pointer() {
    let mut heap = heap();

    unsafe {
      let payload = heap.allocate(64);

      assert_eq!(payload, heap.reallocate(payload, 16));
      assert_eq!(payload, heap.reallocate(payload, 64));
      assert_eq!(1, heap.list.len());
    }
  }

  #[test]
  fn test_reallocate_growth_moves_and_preserves_contents() {
    let mut heap = heap();

    unsafe {
      let old = heap.allocate(16);
      for i in 0..16 {
        *old.add(i) = i as u8;
      }

      let new = heap.reallocate(old, 128);
      assert_ne!(old, new);

      for i in 0..16 {
        assert_eq!(i as u8, *new.add(i));
      }

      // The old block was released and is first in line for reuse.
      assert_eq!(old, heap.allocate(8));
    }
  }

  #[test]
  fn test_reallocate_null_and_zero_size() {
    let mut heap = heap();

    unsafe {
      let from_null = heap.reallocate(ptr::null_mut(), 32);
      assert!(!from_null.is_null());

      let payload = heap.allocate(16);
      *payload = 0x5A;

      assert!(heap.reallocate(payload, 0).is_null());

      // Zero-size resize leaves the original block in use and intact.
      assert!(!(*Block::from_payload(payload)).is_free);
      assert_eq!(0x5A, *payload);
    }
  }

  #[test]
  fn test_allocate_out_of_memory_leaves_state_consistent() {
    let mut heap = Heap::with_grower(FixedGrower::new(256));

    unsafe {
      let first = heap.allocate(64);
      assert!(!first.is_null());

      assert!(heap.allocate(4096).is_null());
      assert_eq!(1, heap.list.len());

      let second = heap.allocate(64);
      assert!(!second.is_null());
    }
  }

  #[test]
  fn test_reallocate_failure_keeps_the_old_block() {
    let mut heap = Heap::with_grower(FixedGrower::new(128));

    unsafe {
      let payload = heap.allocate(32);
      ptr::write_bytes(payload, 0x77, 32);

      assert!(heap.reallocate(payload, 4096).is_null());

      assert!(!(*Block::from_payload(payload)).is_free);
      for i in 0..32 {
        assert_eq!(0x77, *payload.add(i));
      }
    }
  }
}
