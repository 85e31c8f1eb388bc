//! Link layout shared by the sentinel and value nodes.
//!
//! Every list is a ring of [`Link`]s anchored at a sentinel. A value node is
//! a [`Node<T>`]: a `Link` at offset 0 followed by the value, so a pointer to
//! a node is also a pointer to its link. The reverse cast is only valid for
//! links the list created as nodes; the sentinel has no value behind it.
//!
//! All raw link surgery lives here. Callers must uphold the ring invariant:
//! for every link `n`, `n.next.prev == n` and `n.prev.next == n`.

use std::ptr::NonNull;

/// Header of every ring member: two links to neighbouring headers.
pub(crate) struct Link {
    next: NonNull<Link>,
    prev: NonNull<Link>,
}

impl Link {
    /// A header whose links are not yet meaningful.
    const fn unlinked() -> Self {
        Self {
            next: NonNull::dangling(),
            prev: NonNull::dangling(),
        }
    }
}

/// A value-bearing ring member.
#[repr(C)]
pub(crate) struct Node<T> {
    /// Only reached through pointer casts.
    #[allow(dead_code)]
    link: Link,
    value: T,
}

impl<T> Node<T> {
    pub(crate) const fn new(value: T) -> Self {
        Self {
            link: Link::unlinked(),
            value,
        }
    }
}

/// Allocate a sentinel on the heap with both links pointing at itself.
///
/// The sentinel lives outside the list value so that moving the list does
/// not invalidate the self-links.
pub(crate) fn new_sentinel() -> NonNull<Link> {
    let sentinel = NonNull::from(Box::leak(Box::new(Link::unlinked())));
    // SAFETY: freshly leaked, uniquely owned allocation.
    unsafe {
        (*sentinel.as_ptr()).next = sentinel;
        (*sentinel.as_ptr()).prev = sentinel;
    }
    sentinel
}

/// Free a sentinel created by [`new_sentinel`].
///
/// # Safety
///
/// `sentinel` must come from `new_sentinel`, be freed at most once, and no
/// link may be used afterwards.
pub(crate) unsafe fn free_sentinel(sentinel: NonNull<Link>) {
    // SAFETY: per the contract, this is the box leaked by `new_sentinel`.
    drop(unsafe { Box::from_raw(sentinel.as_ptr()) });
}

/// # Safety
///
/// `link` must be a live ring member.
pub(crate) unsafe fn next(link: NonNull<Link>) -> NonNull<Link> {
    // SAFETY: `link` is live.
    unsafe { (*link.as_ptr()).next }
}

/// # Safety
///
/// `link` must be a live ring member.
pub(crate) unsafe fn prev(link: NonNull<Link>) -> NonNull<Link> {
    // SAFETY: `link` is live.
    unsafe { (*link.as_ptr()).prev }
}

/// Splice `node` into the ring immediately before `pos`.
///
/// # Safety
///
/// `pos` must be a live ring member and `node` a live header that is not
/// currently in any ring.
pub(crate) unsafe fn link_before(node: NonNull<Link>, pos: NonNull<Link>) {
    // SAFETY: both headers are live; `pos.prev` is live by the ring invariant.
    unsafe {
        let before = (*pos.as_ptr()).prev;
        (*node.as_ptr()).prev = before;
        (*node.as_ptr()).next = pos;
        (*before.as_ptr()).next = node;
        (*pos.as_ptr()).prev = node;
    }
}

/// Remove `node` from its ring, joining its neighbours.
///
/// The links inside `node` are left stale.
///
/// # Safety
///
/// `node` must be a live ring member other than the sentinel.
pub(crate) unsafe fn unlink(node: NonNull<Link>) {
    // SAFETY: `node` and, by the ring invariant, its neighbours are live.
    unsafe {
        let before = (*node.as_ptr()).prev;
        let after = (*node.as_ptr()).next;
        (*before.as_ptr()).next = after;
        (*after.as_ptr()).prev = before;
    }
}

/// Upcast a value node to its header.
pub(crate) fn as_link<T>(node: NonNull<Node<T>>) -> NonNull<Link> {
    node.cast()
}

/// Downcast a header to the node that contains it.
///
/// # Safety
///
/// `link` must be the header of a live `Node<T>`, never a sentinel.
pub(crate) unsafe fn as_node<T>(link: NonNull<Link>) -> NonNull<Node<T>> {
    link.cast()
}

/// Shared access to the value behind a header.
///
/// # Safety
///
/// `link` must be the header of a live `Node<T>` that is not mutably
/// borrowed for `'a`.
pub(crate) unsafe fn value<'a, T>(link: NonNull<Link>) -> &'a T {
    // SAFETY: forwarded to the caller.
    unsafe { &(*as_node::<T>(link).as_ptr()).value }
}

/// Exclusive access to the value behind a header.
///
/// # Safety
///
/// `link` must be the header of a live `Node<T>` with no other borrow of its
/// value for `'a`.
pub(crate) unsafe fn value_mut<'a, T>(link: NonNull<Link>) -> &'a mut T {
    // SAFETY: forwarded to the caller.
    unsafe { &mut (*as_node::<T>(link).as_ptr()).value }
}

/// Move the value out of a node, leaving the region uninitialised.
///
/// # Safety
///
/// `node` must be live and already unlinked; it must not be read again.
pub(crate) unsafe fn take_value<T>(node: NonNull<Node<T>>) -> T {
    // SAFETY: forwarded to the caller.
    unsafe { node.as_ptr().read().value }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed_node(value: u32) -> NonNull<Node<u32>> {
        NonNull::from(Box::leak(Box::new(Node::new(value))))
    }

    unsafe fn free_node(node: NonNull<Node<u32>>) {
        // SAFETY: the node came from `boxed_node`.
        drop(unsafe { Box::from_raw(node.as_ptr()) });
    }

    #[test]
    fn sentinel_is_self_linked() {
        let s = new_sentinel();
        // SAFETY: `s` is a live sentinel.
        unsafe {
            assert_eq!(next(s), s);
            assert_eq!(prev(s), s);
            free_sentinel(s);
        }
    }

    #[test]
    fn header_sits_at_offset_zero() {
        let node = boxed_node(7);
        assert_eq!(as_link(node).as_ptr().addr(), node.as_ptr().addr());
        // SAFETY: `node` is live and boxed.
        unsafe {
            assert_eq!(*value::<u32>(as_link(node)), 7);
            free_node(node);
        }
    }

    #[test]
    fn link_and_unlink_keep_ring_symmetric() {
        let s = new_sentinel();
        let a = boxed_node(1);
        let b = boxed_node(2);
        // SAFETY: all headers are live; nodes are freed after unlinking.
        unsafe {
            link_before(as_link(a), s);
            link_before(as_link(b), s);
            assert_eq!(next(s), as_link(a));
            assert_eq!(next(as_link(a)), as_link(b));
            assert_eq!(next(as_link(b)), s);
            assert_eq!(prev(s), as_link(b));
            assert_eq!(prev(as_link(b)), as_link(a));

            unlink(as_link(a));
            assert_eq!(next(s), as_link(b));
            assert_eq!(prev(as_link(b)), s);
            assert_eq!(take_value(a), 1);
            drop(Box::from_raw(a.as_ptr().cast::<std::mem::MaybeUninit<Node<u32>>>()));

            unlink(as_link(b));
            assert_eq!(next(s), s);
            assert_eq!(prev(s), s);
            free_node(b);
            free_sentinel(s);
        }
    }

    #[test]
    fn value_mut_writes_through() {
        let node = boxed_node(1);
        // SAFETY: `node` is live and not otherwise borrowed.
        unsafe {
            *value_mut::<u32>(as_link(node)) = 9;
            assert_eq!(*value::<u32>(as_link(node)), 9);
            free_node(node);
        }
    }
}
