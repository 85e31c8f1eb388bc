//! Positions inside a [`List`].
//!
//! A cursor sits on a value node or on the "ghost" position between the last
//! and first element. Moving past either end lands on the ghost; moving again
//! wraps to the other end. Cursors are tied to their list by borrow, so a
//! read-only [`Cursor`] cannot outlive a mutation and a [`CursorMut`] is the
//! only way to edit the list in the middle.

use std::convert::Infallible;
use std::fmt;
use std::ptr::{self, NonNull};

use nook_arena::{Allocator, ArenaError};

use crate::error::ListError;
use crate::list::List;
use crate::node::{self, Link};

/// Index-aware step forward; the ghost position's index is `len`.
fn step_next<T, A: Allocator<Value = T>>(
    list: &List<T, A>,
    current: NonNull<Link>,
    index: usize,
) -> (NonNull<Link>, usize) {
    if current == list.sentinel {
        (list.first(), 0)
    } else {
        // SAFETY: `current` is a live member of `list`'s ring.
        (unsafe { node::next(current) }, index + 1)
    }
}

/// Index-aware step backward.
fn step_prev<T, A: Allocator<Value = T>>(
    list: &List<T, A>,
    current: NonNull<Link>,
    index: usize,
) -> (NonNull<Link>, usize) {
    // SAFETY: `current` is a live member of `list`'s ring.
    let prev = unsafe { node::prev(current) };
    let index = if current == list.sentinel {
        list.len.saturating_sub(1)
    } else if prev == list.sentinel {
        list.len
    } else {
        index - 1
    };
    (prev, index)
}

/// Read-only position in a list.
pub struct Cursor<'a, T, A: Allocator<Value = T>> {
    list: &'a List<T, A>,
    current: NonNull<Link>,
    index: usize,
}

impl<'a, T, A: Allocator<Value = T>> Cursor<'a, T, A> {
    pub(crate) fn new(list: &'a List<T, A>, current: NonNull<Link>, index: usize) -> Self {
        Self {
            list,
            current,
            index,
        }
    }

    /// Zero-based position, or `None` on the ghost position.
    pub fn index(&self) -> Option<usize> {
        (self.current != self.list.sentinel).then_some(self.index)
    }

    /// The element under the cursor.
    pub fn current(&self) -> Option<&'a T> {
        self.value_at(self.current)
    }

    /// The element after the cursor (the first element, from the ghost).
    pub fn peek_next(&self) -> Option<&'a T> {
        // SAFETY: `current` is a live member of the borrowed list.
        self.value_at(unsafe { node::next(self.current) })
    }

    /// The element before the cursor (the last element, from the ghost).
    pub fn peek_prev(&self) -> Option<&'a T> {
        // SAFETY: `current` is a live member of the borrowed list.
        self.value_at(unsafe { node::prev(self.current) })
    }

    /// Step toward the back, landing on the ghost after the last element.
    pub fn move_next(&mut self) {
        (self.current, self.index) = step_next(self.list, self.current, self.index);
    }

    /// Step toward the front, landing on the ghost before the first element.
    pub fn move_prev(&mut self) {
        (self.current, self.index) = step_prev(self.list, self.current, self.index);
    }

    /// Whether both cursors are on the same node of the same list.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        ptr::eq(self.list, other.list) && self.current == other.current
    }

    fn value_at(&self, link: NonNull<Link>) -> Option<&'a T> {
        // SAFETY: every non-sentinel link of the list is a live `Node<T>`,
        // shared-borrowed for `'a`.
        (link != self.list.sentinel).then(|| unsafe { node::value(link) })
    }
}

impl<T, A: Allocator<Value = T>> Clone for Cursor<'_, T, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, A: Allocator<Value = T>> Copy for Cursor<'_, T, A> {}

impl<T, A: Allocator<Value = T>> PartialEq for Cursor<'_, T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T, A: Allocator<Value = T>> Eq for Cursor<'_, T, A> {}

impl<T: fmt::Debug, A: Allocator<Value = T>> fmt::Debug for Cursor<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("index", &self.index())
            .field("current", &self.current())
            .finish()
    }
}

/// Editing position in a list.
///
/// Inserting puts the new element before the cursor and moves the cursor onto
/// it. Removing moves the cursor to the removed element's successor.
pub struct CursorMut<'a, T, A: Allocator<Value = T>> {
    list: &'a mut List<T, A>,
    current: NonNull<Link>,
    index: usize,
}

impl<'a, T, A: Allocator<Value = T>> CursorMut<'a, T, A> {
    pub(crate) fn new(list: &'a mut List<T, A>, current: NonNull<Link>, index: usize) -> Self {
        Self {
            list,
            current,
            index,
        }
    }

    /// Zero-based position, or `None` on the ghost position.
    pub fn index(&self) -> Option<usize> {
        (self.current != self.list.sentinel).then_some(self.index)
    }

    /// The element under the cursor.
    pub fn current(&self) -> Option<&T> {
        self.as_cursor().current()
    }

    /// Mutable access to the element under the cursor.
    pub fn current_mut(&mut self) -> Option<&mut T> {
        self.value_mut_at(self.current)
    }

    /// The element after the cursor.
    pub fn peek_next(&mut self) -> Option<&mut T> {
        // SAFETY: `current` is a live member of the borrowed list.
        self.value_mut_at(unsafe { node::next(self.current) })
    }

    /// The element before the cursor.
    pub fn peek_prev(&mut self) -> Option<&mut T> {
        // SAFETY: `current` is a live member of the borrowed list.
        self.value_mut_at(unsafe { node::prev(self.current) })
    }

    /// Step toward the back, landing on the ghost after the last element.
    pub fn move_next(&mut self) {
        (self.current, self.index) = step_next(self.list, self.current, self.index);
    }

    /// Step toward the front, landing on the ghost before the first element.
    pub fn move_prev(&mut self) {
        (self.current, self.index) = step_prev(self.list, self.current, self.index);
    }

    /// A read-only cursor on the same position.
    pub fn as_cursor(&self) -> Cursor<'_, T, A> {
        Cursor::new(self.list, self.current, self.index)
    }

    /// Insert `value` before the cursor and move onto it.
    ///
    /// On allocation failure the list and the cursor are unchanged.
    pub fn insert(&mut self, value: T) -> Result<(), ArenaError> {
        self.insert_with(|| value)
    }

    /// Insert `T::default()` before the cursor and move onto it.
    pub fn insert_default(&mut self) -> Result<(), ArenaError>
    where
        T: Default,
    {
        self.insert_with(T::default)
    }

    /// Allocate a node, fill it with `make()`, and insert it before the cursor.
    pub fn insert_with(&mut self, make: impl FnOnce() -> T) -> Result<(), ArenaError> {
        self.try_insert_with(|| Ok::<T, Infallible>(make()))
            .map_err(ListError::into_alloc)
    }

    /// Like [`insert_with`](Self::insert_with) with a fallible constructor.
    ///
    /// `make` is not called if the allocation fails. If `make` fails or
    /// panics, the node's region is released and nothing is linked.
    pub fn try_insert_with<E>(
        &mut self,
        make: impl FnOnce() -> Result<T, E>,
    ) -> Result<(), ListError<E>> {
        self.current = self.list.try_link_before(self.current, make)?;
        Ok(())
    }

    /// Remove the element under the cursor and move to its successor.
    ///
    /// Returns `None` without doing anything on the ghost position.
    pub fn remove_current(&mut self) -> Option<T> {
        if self.current == self.list.sentinel {
            return None;
        }
        let doomed = self.current;
        // SAFETY: `doomed` is a value node of this list; the successor is
        // read before the node is released.
        unsafe {
            self.current = node::next(doomed);
            Some(self.list.unlink_node(doomed))
        }
    }

    fn value_mut_at(&mut self, link: NonNull<Link>) -> Option<&mut T> {
        // SAFETY: a non-sentinel link is a live `Node<T>`; `&mut self` holds
        // the list's only mutable borrow.
        (link != self.list.sentinel).then(|| unsafe { node::value_mut(link) })
    }
}

impl<T: fmt::Debug, A: Allocator<Value = T>> fmt::Debug for CursorMut<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("index", &self.index())
            .field("current", &self.current())
            .finish()
    }
}
