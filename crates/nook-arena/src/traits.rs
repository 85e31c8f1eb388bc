//! The allocator contract shared by arena handles and the heap allocator.

use std::ptr::NonNull;

use crate::error::ArenaError;

/// A typed, cloneable allocator handle that node-based containers draw from.
///
/// Handles are cheap to copy and do not own the memory they hand out. A
/// container stores the user's handle and a [`rebind`](Allocator::rebind)-ed
/// copy for its node type, and consults the propagation hooks when it is
/// copied.
///
/// # Safety
///
/// Implementors must guarantee that a pointer returned by
/// [`allocate`](Allocator::allocate) is aligned for `Self::Value`, valid for
/// reads and writes of `n` values, and does not overlap any other live
/// region, for as long as this handle (or any clone or rebind of it) is
/// alive. Rebinding must preserve the backing storage.
pub unsafe trait Allocator: Clone {
    /// The element type this handle allocates for.
    type Value;

    /// The same allocator family over a different element type.
    type Rebind<U>: Allocator<Value = U>;

    /// Whether copy-assigning a container also copies the source's handle.
    ///
    /// When `false`, the destination keeps its own handle and rebuilds the
    /// incoming elements with it.
    const PROPAGATE_ON_COPY_ASSIGNMENT: bool = false;

    /// Reserve uninitialised room for `n` contiguous values.
    fn allocate(&self, n: usize) -> Result<NonNull<Self::Value>, ArenaError>;

    /// Return a region obtained from [`allocate`](Allocator::allocate).
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate(n)` on this handle or one equal to it,
    /// with the same `n`, and must not be used afterwards. Any values in the
    /// region must already have been dropped.
    unsafe fn deallocate(&self, ptr: NonNull<Self::Value>, n: usize);

    /// A handle over `U` that draws from the same backing storage.
    fn rebind<U>(&self) -> Self::Rebind<U>;

    /// The handle a copy-constructed container should use.
    ///
    /// Defaults to a copy of `self`, so both containers share one storage.
    fn select_on_copy(&self) -> Self {
        self.clone()
    }
}

/// Total byte size of `n` values of `T`, or the overflow error.
pub(crate) fn array_bytes<T>(n: usize) -> Result<usize, ArenaError> {
    let elem_size = std::mem::size_of::<T>();
    n.checked_mul(elem_size)
        .ok_or(ArenaError::LayoutOverflow { count: n, elem_size })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_bytes_multiplies() {
        assert_eq!(array_bytes::<u64>(3), Ok(24));
        assert_eq!(array_bytes::<()>(usize::MAX), Ok(0));
    }

    #[test]
    fn array_bytes_reports_overflow() {
        assert_eq!(
            array_bytes::<u32>(usize::MAX),
            Err(ArenaError::LayoutOverflow {
                count: usize::MAX,
                elem_size: 4,
            })
        );
    }
}
