//! Fixed-capacity inline storage with aligned bump allocation.
//!
//! A [`StackStorage`] owns a byte buffer of `N` bytes laid out inline (so it
//! lives wherever the storage value lives, typically the stack) and a cursor
//! that only moves forward. There is no free path: regions handed out stay
//! consumed until the storage itself is dropped.

use std::cell::{Cell, UnsafeCell};
use std::fmt;
use std::mem::MaybeUninit;
use std::ptr::NonNull;

use crate::error::ArenaError;

/// Inline byte arena of compile-time capacity `N`.
///
/// Allocation takes `&self`: the cursor is a [`Cell`], so any number of
/// [`StackAllocator`](crate::StackAllocator) handles can share one storage.
/// The storage is `!Sync`; sharing it across threads does not compile.
///
/// The buffer starts on a [`BUFFER_ALIGN`](Self::BUFFER_ALIGN) boundary, so
/// requests with alignment up to 16 never pay padding on the first region.
///
/// ```
/// use nook_arena::StackStorage;
///
/// let storage = StackStorage::<64>::new();
/// let a = storage.allocate(24, 8).unwrap();
/// let b = storage.allocate(24, 8).unwrap();
/// assert_eq!(b.as_ptr() as usize - a.as_ptr() as usize, 24);
/// assert!(storage.allocate(24, 8).is_err());
/// assert_eq!(storage.used(), 48);
/// ```
#[repr(C, align(16))]
pub struct StackStorage<const N: usize> {
    /// Backing bytes. Must stay the first field so it inherits the struct alignment.
    buffer: UnsafeCell<[MaybeUninit<u8>; N]>,
    /// Offset of the next free byte, in `0..=N`.
    cursor: Cell<usize>,
}

impl<const N: usize> StackStorage<N> {
    /// Alignment of the first byte of the buffer.
    pub const BUFFER_ALIGN: usize = 16;

    /// Create an empty storage with the cursor at the start of the buffer.
    pub const fn new() -> Self {
        Self {
            buffer: UnsafeCell::new([MaybeUninit::uninit(); N]),
            cursor: Cell::new(0),
        }
    }

    /// Carve `bytes` bytes aligned to `align` out of the buffer.
    ///
    /// The cursor is first rounded up to the next address that is a multiple
    /// of `align`, then advanced by `bytes`. A request that would run past the
    /// end of the buffer fails with [`ArenaError::CapacityExceeded`] and leaves
    /// the cursor exactly where it was, padding included.
    ///
    /// Zero-byte requests succeed while the aligned cursor is within the
    /// buffer; the returned pointer may then be one past the last byte.
    pub fn allocate(&self, bytes: usize, align: usize) -> Result<NonNull<u8>, ArenaError> {
        if !align.is_power_of_two() {
            return Err(ArenaError::InvalidAlignment { align });
        }

        let base = self.base();
        let used = self.cursor.get();
        let padding = base.as_ptr().addr().wrapping_add(used).wrapping_neg() & (align - 1);

        let end = used
            .checked_add(padding)
            .and_then(|start| start.checked_add(bytes))
            .filter(|&end| end <= N);
        let Some(end) = end else {
            tracing::debug!(
                requested = bytes,
                align,
                used,
                capacity = N,
                "stack storage exhausted"
            );
            return Err(ArenaError::CapacityExceeded {
                requested: bytes,
                align,
                used,
                capacity: N,
            });
        };

        self.cursor.set(end);
        // SAFETY: `end - bytes <= end <= N`, so the offset stays inside the
        // buffer or lands one past its last byte.
        Ok(unsafe { base.add(end - bytes) })
    }

    /// Total size of the buffer in bytes.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes consumed so far, alignment padding included.
    pub fn used(&self) -> usize {
        self.cursor.get()
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        N - self.cursor.get()
    }

    /// Whether `ptr` points into this storage's buffer.
    pub fn contains<T>(&self, ptr: *const T) -> bool {
        let start = self.base().as_ptr().addr();
        let addr = ptr.addr();
        addr >= start && addr < start + N
    }

    fn base(&self) -> NonNull<u8> {
        // SAFETY: `UnsafeCell::get` returns a pointer derived from `&self`,
        // which is never null.
        unsafe { NonNull::new_unchecked(self.buffer.get().cast::<u8>()) }
    }
}

impl<const N: usize> Default for StackStorage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for StackStorage<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackStorage")
            .field("capacity", &N)
            .field("used", &self.used())
            .finish()
    }
}
