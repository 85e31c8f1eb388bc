//! Global-heap allocator handle.
//!
//! [`HeapAllocator`] is the default allocator for containers that do not
//! name one. It is stateless, so every instance is interchangeable, and it
//! really frees memory on [`deallocate`](Allocator::deallocate).

use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::error::ArenaError;
use crate::traits::Allocator;

/// Stateless allocator over the process-wide global allocator.
pub struct HeapAllocator<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> HeapAllocator<T> {
    /// Create a heap allocator handle.
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

fn array_layout<T>(n: usize) -> Result<Layout, ArenaError> {
    Layout::array::<T>(n).map_err(|_| ArenaError::LayoutOverflow {
        count: n,
        elem_size: std::mem::size_of::<T>(),
    })
}

// SAFETY: non-empty regions come straight from the global allocator with the
// layout of `[T; n]`; empty ones are dangling but aligned, which is valid for
// zero-sized access. Every handle frees through the same global allocator.
unsafe impl<T> Allocator for HeapAllocator<T> {
    type Value = T;
    type Rebind<U> = HeapAllocator<U>;

    fn allocate(&self, n: usize) -> Result<NonNull<T>, ArenaError> {
        let layout = array_layout::<T>(n)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        // SAFETY: `layout` has non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        NonNull::new(raw.cast::<T>()).ok_or(ArenaError::OutOfMemory {
            requested: layout.size(),
        })
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        let Ok(layout) = array_layout::<T>(n) else {
            return;
        };
        if layout.size() != 0 {
            // SAFETY: the caller guarantees `ptr` came from `allocate(n)`,
            // which used this exact layout.
            unsafe { alloc::dealloc(ptr.as_ptr().cast::<u8>(), layout) };
        }
    }

    fn rebind<U>(&self) -> HeapAllocator<U> {
        HeapAllocator::new()
    }
}

impl<T> Clone for HeapAllocator<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for HeapAllocator<T> {}

impl<T> Default for HeapAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, U> PartialEq<HeapAllocator<U>> for HeapAllocator<T> {
    fn eq(&self, _other: &HeapAllocator<U>) -> bool {
        true
    }
}

impl<T> Eq for HeapAllocator<T> {}

impl<T> fmt::Debug for HeapAllocator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HeapAllocator<{}>", std::any::type_name::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_write_read_free() {
        let heap = HeapAllocator::<u64>::new();
        let p = heap.allocate(4).unwrap();
        assert_eq!(p.as_ptr().addr() % 8, 0);
        // SAFETY: room for four u64s was just allocated.
        unsafe {
            for i in 0..4 {
                p.as_ptr().add(i).write(i as u64 * 10);
            }
            assert_eq!(p.as_ptr().add(3).read(), 30);
            heap.deallocate(p, 4);
        }
    }

    #[test]
    fn zero_sized_requests_dangle() {
        let heap = HeapAllocator::<u32>::new();
        let p = heap.allocate(0).unwrap();
        assert_eq!(p, NonNull::dangling());
        // SAFETY: freeing an empty region is a no-op.
        unsafe { heap.deallocate(p, 0) };

        let units = heap.rebind::<()>();
        assert!(units.allocate(1_000).is_ok());
    }

    #[test]
    fn overflowing_request_is_rejected() {
        let heap = HeapAllocator::<u64>::new();
        assert!(matches!(
            heap.allocate(usize::MAX),
            Err(ArenaError::LayoutOverflow { .. })
        ));
    }

    #[test]
    fn all_heap_handles_are_equal() {
        assert_eq!(HeapAllocator::<u8>::new(), HeapAllocator::<String>::new());
    }
}
