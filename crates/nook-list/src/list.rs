//! The allocator-aware doubly-linked list.
//!
//! [`List`] keeps its elements in a circular ring anchored at a sentinel.
//! Every value node is drawn from the list's allocator rebound to the node
//! type, so a list built on a [`StackAllocator`](nook_arena::StackAllocator)
//! keeps all of its elements inside one [`StackStorage`](nook_arena::StackStorage).
//!
//! Insertion allocates first and constructs second. If either step fails,
//! nothing is linked, the length is unchanged, and a region that was already
//! acquired is handed back before the error (or panic) leaves the call.

use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use nook_arena::{Allocator, ArenaError, HeapAllocator};

use crate::cursor::{Cursor, CursorMut};
use crate::error::ListError;
use crate::iter::{IntoIter, Iter, IterMut};
use crate::node::{self, Link, Node};

/// A doubly-linked list whose nodes come from the allocator `A`.
///
/// Copying follows the allocator's propagation hooks:
///
/// - [`try_clone`](List::try_clone) asks the source allocator's
///   [`select_on_copy`](Allocator::select_on_copy) for the new list's handle.
///   For a `StackAllocator` that is the same storage.
/// - [`try_clone_from`](List::try_clone_from) keeps the destination's own
///   allocator unless `A::PROPAGATE_ON_COPY_ASSIGNMENT` is set, and rebuilds
///   every element with it.
///
/// ```
/// use nook_arena::{StackAllocator, StackStorage};
/// use nook_list::List;
///
/// let storage = StackStorage::<1024>::new();
/// let mut list = List::new_in(StackAllocator::new(&storage));
/// list.push_back(1).unwrap();
/// list.push_back(2).unwrap();
/// list.push_front(0).unwrap();
///
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), [0, 1, 2]);
/// assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), [2, 1, 0]);
/// assert!(storage.used() > 0);
/// ```
pub struct List<T, A: Allocator<Value = T> = HeapAllocator<T>> {
    /// Heap-pinned ring anchor; never read as a value node.
    pub(crate) sentinel: NonNull<Link>,
    pub(crate) len: usize,
    alloc: A,
    node_alloc: A::Rebind<Node<T>>,
    _owns: PhantomData<T>,
}

/// Hands a node region back to its allocator unless defused with `mem::forget`.
struct RegionGuard<'g, N: Allocator> {
    alloc: &'g N,
    region: NonNull<N::Value>,
}

impl<N: Allocator> Drop for RegionGuard<'_, N> {
    fn drop(&mut self) {
        // SAFETY: `region` came from `allocate(1)` on `alloc` and holds no value.
        unsafe { self.alloc.deallocate(self.region, 1) };
    }
}

impl<T> List<T> {
    /// Create an empty list on the global heap.
    pub fn new() -> Self {
        Self::new_in(HeapAllocator::new())
    }

    /// Create a list of `n` default values on the global heap.
    pub fn with_len(n: usize) -> Result<Self, ArenaError>
    where
        T: Default,
    {
        Self::with_len_in(n, HeapAllocator::new())
    }

    /// Create a list of `n` clones of `value` on the global heap.
    pub fn from_elem(n: usize, value: &T) -> Result<Self, ArenaError>
    where
        T: Clone,
    {
        Self::from_elem_in(n, value, HeapAllocator::new())
    }
}

impl<T, A: Allocator<Value = T>> List<T, A> {
    /// Create an empty list that draws its nodes from `alloc`.
    pub fn new_in(alloc: A) -> Self {
        let node_alloc = alloc.rebind::<Node<T>>();
        Self {
            sentinel: node::new_sentinel(),
            len: 0,
            alloc,
            node_alloc,
            _owns: PhantomData,
        }
    }

    /// Create a list of `n` default values.
    ///
    /// If any node cannot be allocated, every element built so far is
    /// dropped and released before the error is returned.
    pub fn with_len_in(n: usize, alloc: A) -> Result<Self, ArenaError>
    where
        T: Default,
    {
        Self::try_from_fn_in(n, alloc, |_| Ok::<T, Infallible>(T::default()))
            .map_err(ListError::into_alloc)
    }

    /// Create a list of `n` clones of `value`, rolling back on failure.
    pub fn from_elem_in(n: usize, value: &T, alloc: A) -> Result<Self, ArenaError>
    where
        T: Clone,
    {
        Self::try_from_fn_in(n, alloc, |_| Ok::<T, Infallible>(value.clone()))
            .map_err(ListError::into_alloc)
    }

    /// Create a list of `n` elements produced by `make(index)`.
    ///
    /// Each node is allocated before its value is made. The first failure,
    /// either an allocation error or an `Err` from `make`, drops every
    /// element already built and is returned as is.
    pub fn try_from_fn_in<E>(
        n: usize,
        alloc: A,
        mut make: impl FnMut(usize) -> Result<T, E>,
    ) -> Result<Self, ListError<E>> {
        let mut list = Self::new_in(alloc);
        for index in 0..n {
            if let Err(err) = list.try_push_back_with(|| make(index)) {
                return Err(list.roll_back(err));
            }
        }
        Ok(list)
    }

    /// Copy the list, using the handle chosen by `A::select_on_copy`.
    pub fn try_clone(&self) -> Result<Self, ArenaError>
    where
        T: Clone,
    {
        self.try_clone_in(self.alloc.select_on_copy())
    }

    /// Copy the list into `alloc`, element by element in order.
    pub fn try_clone_in(&self, alloc: A) -> Result<Self, ArenaError>
    where
        T: Clone,
    {
        let mut list = Self::new_in(alloc);
        for value in self {
            if let Err(err) = list.push_back_with(|| value.clone()) {
                return Err(list.roll_back(err));
            }
        }
        Ok(list)
    }

    /// Replace the contents of `self` with copies of `source`'s elements.
    ///
    /// Unless `A::PROPAGATE_ON_COPY_ASSIGNMENT` is set, the copies are made
    /// with `self`'s own allocator, which `self` keeps. The copy is built
    /// completely before the old contents are dropped, so on failure `self`
    /// is untouched.
    pub fn try_clone_from(&mut self, source: &Self) -> Result<(), ArenaError>
    where
        T: Clone,
    {
        let alloc = if A::PROPAGATE_ON_COPY_ASSIGNMENT {
            source.alloc.clone()
        } else {
            self.alloc.clone()
        };
        let mut fresh = source.try_clone_in(alloc)?;
        self.swap_chains(&mut fresh);
        Ok(())
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// A copy of the allocator handle the list was built with.
    pub fn allocator(&self) -> A {
        self.alloc.clone()
    }

    /// The first element, if any.
    pub fn front(&self) -> Option<&T> {
        // SAFETY: a non-empty ring's first member is a value node.
        (!self.is_empty()).then(|| unsafe { node::value(self.first()) })
    }

    /// The last element, if any.
    pub fn back(&self) -> Option<&T> {
        // SAFETY: a non-empty ring's last member is a value node.
        (!self.is_empty()).then(|| unsafe { node::value(self.last()) })
    }

    /// Mutable access to the first element.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        // SAFETY: as in `front`; `&mut self` makes the borrow exclusive.
        (!self.is_empty()).then(|| unsafe { node::value_mut(self.first()) })
    }

    /// Mutable access to the last element.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        // SAFETY: as in `back`; `&mut self` makes the borrow exclusive.
        (!self.is_empty()).then(|| unsafe { node::value_mut(self.last()) })
    }

    /// Append `value`. On allocation failure the list is unchanged and
    /// `value` is dropped.
    pub fn push_back(&mut self, value: T) -> Result<(), ArenaError> {
        self.push_back_with(|| value)
    }

    /// Prepend `value`. On allocation failure the list is unchanged.
    pub fn push_front(&mut self, value: T) -> Result<(), ArenaError> {
        self.push_front_with(|| value)
    }

    /// Allocate a node at the back, then fill it with `make()`.
    pub fn push_back_with(&mut self, make: impl FnOnce() -> T) -> Result<(), ArenaError> {
        self.try_push_back_with(|| Ok::<T, Infallible>(make()))
            .map_err(ListError::into_alloc)
    }

    /// Allocate a node at the front, then fill it with `make()`.
    pub fn push_front_with(&mut self, make: impl FnOnce() -> T) -> Result<(), ArenaError> {
        self.try_push_front_with(|| Ok::<T, Infallible>(make()))
            .map_err(ListError::into_alloc)
    }

    /// Allocate a node at the back, then fill it with a fallible `make()`.
    pub fn try_push_back_with<E>(
        &mut self,
        make: impl FnOnce() -> Result<T, E>,
    ) -> Result<(), ListError<E>> {
        self.try_link_before(self.sentinel, make).map(drop)
    }

    /// Allocate a node at the front, then fill it with a fallible `make()`.
    pub fn try_push_front_with<E>(
        &mut self,
        make: impl FnOnce() -> Result<T, E>,
    ) -> Result<(), ListError<E>> {
        self.try_link_before(self.first(), make).map(drop)
    }

    /// Remove and return the last element.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: a non-empty ring's last member is a value node of this list.
        Some(unsafe { self.unlink_node(self.last()) })
    }

    /// Remove and return the first element.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: a non-empty ring's first member is a value node of this list.
        Some(unsafe { self.unlink_node(self.first()) })
    }

    /// Drop every element, back to front.
    pub fn clear(&mut self) {
        while self.pop_back().is_some() {}
    }

    /// Whether any element equals `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|v| v == value)
    }

    /// Append every item of `items`.
    ///
    /// Stops at the first allocation failure; items appended before it stay.
    pub fn try_extend(&mut self, items: impl IntoIterator<Item = T>) -> Result<(), ArenaError> {
        items.into_iter().try_for_each(|item| self.push_back(item))
    }

    /// Front-to-back iterator over shared references.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.first(), self.last(), self.len)
    }

    /// Front-to-back iterator over mutable references.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.first(), self.last(), self.len)
    }

    /// Read-only cursor on the first element (the ghost position if empty).
    pub fn cursor_front(&self) -> Cursor<'_, T, A> {
        Cursor::new(self, self.first(), 0)
    }

    /// Read-only cursor on the last element (the ghost position if empty).
    pub fn cursor_back(&self) -> Cursor<'_, T, A> {
        let index = self.len.saturating_sub(1);
        Cursor::new(self, self.last(), index)
    }

    /// Read-only cursor on the ghost position past the last element.
    pub fn cursor_end(&self) -> Cursor<'_, T, A> {
        Cursor::new(self, self.sentinel, self.len)
    }

    /// Mutable cursor on the first element (the ghost position if empty).
    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T, A> {
        let first = self.first();
        CursorMut::new(self, first, 0)
    }

    /// Mutable cursor on the last element (the ghost position if empty).
    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, T, A> {
        let (last, index) = (self.last(), self.len.saturating_sub(1));
        CursorMut::new(self, last, index)
    }

    /// Mutable cursor on the ghost position; inserting here appends.
    pub fn cursor_end_mut(&mut self) -> CursorMut<'_, T, A> {
        let (sentinel, len) = (self.sentinel, self.len);
        CursorMut::new(self, sentinel, len)
    }

    pub(crate) fn first(&self) -> NonNull<Link> {
        // SAFETY: the sentinel lives as long as the list.
        unsafe { node::next(self.sentinel) }
    }

    pub(crate) fn last(&self) -> NonNull<Link> {
        // SAFETY: the sentinel lives as long as the list.
        unsafe { node::prev(self.sentinel) }
    }

    /// Allocate a node, build its value, and splice it in before `pos`.
    ///
    /// `pos` must be a member of this list's ring (a value node or the
    /// sentinel). Returns the new node's header.
    pub(crate) fn try_link_before<E>(
        &mut self,
        pos: NonNull<Link>,
        make: impl FnOnce() -> Result<T, E>,
    ) -> Result<NonNull<Link>, ListError<E>> {
        let region = self.node_alloc.allocate(1)?;
        let guard = RegionGuard {
            alloc: &self.node_alloc,
            region,
        };
        let value = match make() {
            Ok(value) => value,
            Err(err) => {
                tracing::trace!(len = self.len, "element construction failed, releasing node");
                drop(guard);
                return Err(ListError::Element(err));
            }
        };
        mem::forget(guard);

        let link = node::as_link(region);
        // SAFETY: `region` is fresh and aligned for `Node<T>`; `pos` is a live
        // member of this ring per the caller's contract.
        unsafe {
            region.as_ptr().write(Node::new(value));
            node::link_before(link, pos);
        }
        self.len += 1;
        Ok(link)
    }

    /// Unlink a value node, release its region, and return its value.
    ///
    /// # Safety
    ///
    /// `link` must be a value node of this list (never the sentinel).
    pub(crate) unsafe fn unlink_node(&mut self, link: NonNull<Link>) -> T {
        // SAFETY: forwarded to the caller; the node came from `node_alloc`.
        unsafe {
            node::unlink(link);
            let node = node::as_node::<T>(link);
            let value = node::take_value(node);
            self.node_alloc.deallocate(node, 1);
            self.len -= 1;
            value
        }
    }

    /// Exchange node chains, lengths and allocators with `other`.
    ///
    /// Sentinels live on the heap, so each chain keeps pointing at its own
    /// sentinel and no relinking is needed, empty rings included. Only used
    /// by copy assignment, where `other` was built with `self`'s allocator.
    fn swap_chains(&mut self, other: &mut Self) {
        mem::swap(&mut self.sentinel, &mut other.sentinel);
        mem::swap(&mut self.len, &mut other.len);
        mem::swap(&mut self.alloc, &mut other.alloc);
        mem::swap(&mut self.node_alloc, &mut other.node_alloc);
    }

    /// Drop every element of a partially built list, then hand back `err`.
    fn roll_back<E>(mut self, err: E) -> E {
        tracing::trace!(built = self.len, "rolling back partially built list");
        self.clear();
        err
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let mut link = self.sentinel;
        for step in 0..=self.len {
            // SAFETY: walking at most `len + 1` links of a live ring.
            unsafe {
                let next = node::next(link);
                assert_eq!(node::prev(next), link, "asymmetric link at step {step}");
                link = next;
            }
        }
        assert_eq!(link, self.sentinel, "ring is longer than len");
    }
}

impl<T, A: Allocator<Value = T>> Drop for List<T, A> {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: the sentinel was created in `new_in` and is freed only here.
        unsafe { node::free_sentinel(self.sentinel) };
    }
}

impl<T, A: Allocator<Value = T> + Default> Default for List<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

/// # Panics
///
/// `clone` and `clone_from` panic if the allocator runs out of room. Use
/// [`List::try_clone`] and [`List::try_clone_from`] to handle that case.
impl<T: Clone, A: Allocator<Value = T>> Clone for List<T, A> {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(list) => list,
            Err(err) => panic!("list clone failed: {err}"),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(err) = self.try_clone_from(source) {
            panic!("list clone_from failed: {err}");
        }
    }
}

impl<T: fmt::Debug, A: Allocator<Value = T>> fmt::Debug for List<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self).finish()
    }
}

/// # Panics
///
/// Panics if the global allocator fails.
impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        if let Err(err) = list.try_extend(iter) {
            panic!("collecting into a list failed: {err}");
        }
        list
    }
}

impl<T, A: Allocator<Value = T>> IntoIterator for List<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        IntoIter::new(self)
    }
}

impl<'a, T, A: Allocator<Value = T>> IntoIterator for &'a List<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: Allocator<Value = T>> IntoIterator for &'a mut List<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

// SAFETY: a heap-backed list owns its nodes outright and its allocator is a
// stateless marker, so it is as thread-safe as `T`.
unsafe impl<T: Send> Send for List<T, HeapAllocator<T>> {}
// SAFETY: `&List` only hands out `&T`.
unsafe impl<T: Sync> Sync for List<T, HeapAllocator<T>> {}
