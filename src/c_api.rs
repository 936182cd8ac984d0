//! C allocation symbols over a process-wide allocator instance, for use as
//! an `LD_PRELOAD` interposer or from C code linked against the cdylib.

use libc::c_void;

use crate::FreeListAllocator;

static GLOBAL: FreeListAllocator = FreeListAllocator::new();

#[unsafe(no_mangle)]
pub unsafe extern "C" fn malloc(size: usize) -> *mut c_void {
  unsafe { GLOBAL.allocate(size) as *mut c_void }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn free(ptr: *mut c_void) {
  unsafe { GLOBAL.deallocate(ptr as *mut u8) }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn calloc(
  count: usize,
  element_size: usize,
) -> *mut c_void {
  unsafe { GLOBAL.allocate_zeroed(count, element_size) as *mut c_void }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn realloc(
  ptr: *mut c_void,
  new_size: usize,
) -> *mut c_void {
  unsafe { GLOBAL.reallocate(ptr as *mut u8, new_size) as *mut c_void }
}
