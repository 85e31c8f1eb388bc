//! Typed allocator handles over a [`StackStorage`].
//!
//! A [`StackAllocator`] is a borrowed view of a storage plus an element type.
//! It is `Copy`, compares equal to any handle over the same storage, and
//! never frees: [`deallocate`](Allocator::deallocate) is a no-op because the
//! storage has no way to take memory back.

use std::fmt;
use std::marker::PhantomData;
use std::ptr::{self, NonNull};

use crate::error::ArenaError;
use crate::storage::StackStorage;
use crate::traits::{array_bytes, Allocator};

/// Allocator handle for values of `T` backed by a `StackStorage<N>`.
///
/// The `'a` borrow ties every container built on this handle to the
/// storage's scope, so the storage cannot be dropped or moved while any
/// node still lives inside it.
///
/// Copy-assignment propagation is disabled: a list that is copy-assigned
/// keeps its own handle and rebuilds the incoming elements in its own
/// storage.
///
/// ```
/// use nook_arena::{Allocator, StackAllocator, StackStorage};
///
/// let storage = StackStorage::<256>::new();
/// let ints: StackAllocator<'_, u32, 256> = StackAllocator::new(&storage);
/// let words = ints.rebind::<u64>();
/// assert_eq!(ints, words);
///
/// let p = words.allocate(2).unwrap();
/// assert_eq!(p.as_ptr() as usize % std::mem::align_of::<u64>(), 0);
/// assert_eq!(storage.used(), 16);
/// ```
pub struct StackAllocator<'a, T, const N: usize> {
    /// `None` for a default-constructed handle.
    storage: Option<&'a StackStorage<N>>,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T, const N: usize> StackAllocator<'a, T, N> {
    /// Create a handle bound to `storage`.
    pub const fn new(storage: &'a StackStorage<N>) -> Self {
        Self {
            storage: Some(storage),
            _marker: PhantomData,
        }
    }

    /// Create a handle with no storage. Every allocation through it fails
    /// with [`ArenaError::Detached`].
    pub const fn detached() -> Self {
        Self {
            storage: None,
            _marker: PhantomData,
        }
    }

    /// Adopt the storage of a handle over another element type.
    pub fn from_rebound<U>(other: &StackAllocator<'a, U, N>) -> Self {
        Self {
            storage: other.storage,
            _marker: PhantomData,
        }
    }

    /// The storage this handle draws from, if any.
    pub fn storage(&self) -> Option<&'a StackStorage<N>> {
        self.storage
    }

    /// Whether the handle is bound to a storage.
    pub fn is_bound(&self) -> bool {
        self.storage.is_some()
    }
}

// SAFETY: regions come from `StackStorage::allocate`, which aligns them to
// `align_of::<T>()`, never hands out overlapping bytes and never reuses
// memory. The `'a` borrow keeps the storage alive and in place for as long as
// the handle exists, and rebinding copies the same storage reference.
unsafe impl<'a, T, const N: usize> Allocator for StackAllocator<'a, T, N> {
    type Value = T;
    type Rebind<U> = StackAllocator<'a, U, N>;

    const PROPAGATE_ON_COPY_ASSIGNMENT: bool = false;

    fn allocate(&self, n: usize) -> Result<NonNull<T>, ArenaError> {
        let storage = self.storage.ok_or(ArenaError::Detached)?;
        let bytes = array_bytes::<T>(n)?;
        storage
            .allocate(bytes, std::mem::align_of::<T>())
            .map(NonNull::cast)
    }

    unsafe fn deallocate(&self, _ptr: NonNull<T>, _n: usize) {}

    fn rebind<U>(&self) -> StackAllocator<'a, U, N> {
        StackAllocator::from_rebound(self)
    }
}

impl<T, const N: usize> Clone for StackAllocator<'_, T, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const N: usize> Copy for StackAllocator<'_, T, N> {}

impl<T, const N: usize> Default for StackAllocator<'_, T, N> {
    fn default() -> Self {
        Self::detached()
    }
}

impl<'a, T, U, const N: usize> PartialEq<StackAllocator<'a, U, N>> for StackAllocator<'a, T, N> {
    fn eq(&self, other: &StackAllocator<'a, U, N>) -> bool {
        match (self.storage, other.storage) {
            (Some(a), Some(b)) => ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T, const N: usize> Eq for StackAllocator<'_, T, N> {}

impl<T, const N: usize> fmt::Debug for StackAllocator<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackAllocator")
            .field("value", &std::any::type_name::<T>())
            .field("storage", &self.storage.map(ptr::from_ref))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_forwards_size_and_alignment() {
        let storage = StackStorage::<64>::new();
        let bytes: StackAllocator<'_, u8, 64> = StackAllocator::new(&storage);
        bytes.allocate(3).unwrap();

        let words = bytes.rebind::<u64>();
        let p = words.allocate(2).unwrap();
        assert_eq!(p.as_ptr().addr() % 8, 0);
        // 3 bytes, 5 bytes padding, 16 bytes of u64.
        assert_eq!(storage.used(), 24);
    }

    #[test]
    fn detached_handle_refuses_to_allocate() {
        let handle: StackAllocator<'_, u32, 64> = StackAllocator::default();
        assert!(!handle.is_bound());
        assert_eq!(handle.allocate(1), Err(ArenaError::Detached));
    }

    #[test]
    fn exhaustion_propagates_unchanged() {
        let storage = StackStorage::<16>::new();
        let handle: StackAllocator<'_, u64, 16> = StackAllocator::new(&storage);
        handle.allocate(2).unwrap();
        assert!(matches!(
            handle.allocate(1),
            Err(ArenaError::CapacityExceeded {
                requested: 8,
                capacity: 16,
                ..
            })
        ));
    }

    #[test]
    fn element_count_overflow_is_an_error() {
        let storage = StackStorage::<16>::new();
        let handle: StackAllocator<'_, u64, 16> = StackAllocator::new(&storage);
        assert!(matches!(
            handle.allocate(usize::MAX),
            Err(ArenaError::LayoutOverflow { .. })
        ));
        assert_eq!(storage.used(), 0);
    }

    #[test]
    fn deallocate_does_not_rewind() {
        let storage = StackStorage::<32>::new();
        let handle: StackAllocator<'_, u32, 32> = StackAllocator::new(&storage);
        let p = handle.allocate(4).unwrap();
        // SAFETY: `p` came from `allocate(4)` on this handle.
        unsafe { handle.deallocate(p, 4) };
        assert_eq!(storage.used(), 16);
    }

    #[test]
    fn equality_follows_storage_identity() {
        let s1 = StackStorage::<32>::new();
        let s2 = StackStorage::<32>::new();
        let a: StackAllocator<'_, u8, 32> = StackAllocator::new(&s1);
        let b: StackAllocator<'_, u16, 32> = StackAllocator::new(&s1);
        let c: StackAllocator<'_, u8, 32> = StackAllocator::new(&s2);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, StackAllocator::<'_, u8, 32>::detached());
        assert_eq!(
            StackAllocator::<'_, u8, 32>::detached(),
            StackAllocator::<'_, u64, 32>::detached()
        );
    }

    #[test]
    fn from_rebound_adopts_storage() {
        let storage = StackStorage::<32>::new();
        let a: StackAllocator<'_, u8, 32> = StackAllocator::new(&storage);
        let b = StackAllocator::<'_, [u32; 2], 32>::from_rebound(&a);
        assert!(ptr::eq(b.storage().unwrap(), &storage));
    }

    #[test]
    fn select_on_copy_shares_storage() {
        let storage = StackStorage::<32>::new();
        let a: StackAllocator<'_, u8, 32> = StackAllocator::new(&storage);
        assert_eq!(a.select_on_copy(), a);
    }

    #[test]
    fn copy_assignment_does_not_propagate() {
        assert!(!<StackAllocator<'static, u8, 8> as Allocator>::PROPAGATE_ON_COPY_ASSIGNMENT);
    }
}
