//! Borrowing and owning iterators over a [`List`].
//!
//! The borrowing iterators walk the ring from both ends at once and stop when
//! their remaining count hits zero, so the front and back halves never hand
//! out the same node.

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use nook_arena::Allocator;

use crate::list::List;
use crate::node::{self, Link};

/// Shared iterator over a list's elements. Created by [`List::iter`].
pub struct Iter<'a, T> {
    head: NonNull<Link>,
    tail: NonNull<Link>,
    len: usize,
    _marker: PhantomData<&'a T>,
}

impl<T> Iter<'_, T> {
    pub(crate) fn new(head: NonNull<Link>, tail: NonNull<Link>, len: usize) -> Self {
        Self {
            head,
            tail,
            len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let link = self.head;
        // SAFETY: with `len` left over, `head` is a value node borrowed for `'a`.
        unsafe {
            self.head = node::next(link);
            Some(node::value(link))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let link = self.tail;
        // SAFETY: as in `next`, from the other end.
        unsafe {
            self.tail = node::prev(link);
            Some(node::value(link))
        }
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self::new(self.head, self.tail, self.len)
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.len).finish()
    }
}

// SAFETY: `Iter` behaves like `&T`.
unsafe impl<T: Sync> Send for Iter<'_, T> {}
// SAFETY: `Iter` behaves like `&T`.
unsafe impl<T: Sync> Sync for Iter<'_, T> {}

/// Mutable iterator over a list's elements. Created by [`List::iter_mut`].
pub struct IterMut<'a, T> {
    head: NonNull<Link>,
    tail: NonNull<Link>,
    len: usize,
    _marker: PhantomData<&'a mut T>,
}

impl<T> IterMut<'_, T> {
    pub(crate) fn new(head: NonNull<Link>, tail: NonNull<Link>, len: usize) -> Self {
        Self {
            head,
            tail,
            len,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let link = self.head;
        // SAFETY: each node is yielded once; the list is mutably borrowed for `'a`.
        unsafe {
            self.head = node::next(link);
            Some(node::value_mut(link))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let link = self.tail;
        // SAFETY: as in `next`, from the other end.
        unsafe {
            self.tail = node::prev(link);
            Some(node::value_mut(link))
        }
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IterMut").field(&self.len).finish()
    }
}

// SAFETY: `IterMut` behaves like `&mut T`.
unsafe impl<T: Send> Send for IterMut<'_, T> {}
// SAFETY: `IterMut` behaves like `&mut T`.
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

/// Owning iterator that drains a list. Created by `List::into_iter`.
///
/// Elements not yet yielded are dropped with the iterator, and their nodes
/// go back to the list's allocator.
pub struct IntoIter<T, A: Allocator<Value = T>> {
    list: List<T, A>,
}

impl<T, A: Allocator<Value = T>> IntoIter<T, A> {
    pub(crate) fn new(list: List<T, A>) -> Self {
        Self { list }
    }
}

impl<T, A: Allocator<Value = T>> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T, A: Allocator<Value = T>> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back()
    }
}

impl<T, A: Allocator<Value = T>> ExactSizeIterator for IntoIter<T, A> {}
impl<T, A: Allocator<Value = T>> FusedIterator for IntoIter<T, A> {}

impl<T: fmt::Debug, A: Allocator<Value = T>> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.list).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::List;
    use nook_test_utils::DropCounter;

    #[test]
    fn forward_and_reverse() {
        let list: List<i32> = (1..=4).collect();
        assert!(list.iter().eq([1, 2, 3, 4].iter()));
        assert!(list.iter().rev().eq([4, 3, 2, 1].iter()));
    }

    #[test]
    fn ends_meet_in_the_middle() {
        let list: List<i32> = (1..=5).collect();
        let mut it = list.iter();
        assert_eq!(it.len(), 5);
        assert_eq!(it.next(), Some(&1));
        assert_eq!(it.next_back(), Some(&5));
        assert_eq!(it.next(), Some(&2));
        assert_eq!(it.next_back(), Some(&4));
        assert_eq!(it.next(), Some(&3));
        assert_eq!(it.len(), 0);
        assert_eq!(it.next(), None);
        assert_eq!(it.next_back(), None);
    }

    #[test]
    fn empty_list_yields_nothing() {
        let mut list: List<i32> = List::new();
        assert_eq!(list.iter().next(), None);
        assert_eq!(list.iter_mut().next_back(), None);
        assert_eq!(list.into_iter().next(), None);
    }

    #[test]
    fn iter_mut_edits_every_element() {
        let mut list: List<i32> = (1..=3).collect();
        for v in &mut list {
            *v *= 10;
        }
        assert!(list.iter().eq([10, 20, 30].iter()));
        list.check_invariants();
    }

    #[test]
    fn into_iter_drains_both_ends() {
        let list: List<i32> = (1..=4).collect();
        let mut it = list.into_iter();
        assert_eq!(it.next_back(), Some(4));
        assert_eq!(it.next(), Some(1));
        assert_eq!(it.len(), 2);
        assert_eq!(it.collect::<Vec<_>>(), [2, 3]);
    }

    #[test]
    fn dropping_into_iter_drops_the_rest() {
        let counter = DropCounter::new();
        let list: List<_> = (0..4).map(|i| counter.track(i)).collect();
        let mut it = list.into_iter();
        drop(it.next());
        assert_eq!(counter.dropped(), 1);
        drop(it);
        assert_eq!(counter.dropped(), 4);
    }

    #[test]
    fn cloned_iter_is_independent() {
        let list: List<i32> = (1..=3).collect();
        let mut a = list.iter();
        a.next();
        let b = a.clone();
        assert_eq!(a.count(), 2);
        assert_eq!(b.copied().collect::<Vec<_>>(), [2, 3]);
    }
}
