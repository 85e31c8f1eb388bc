//! Test utilities for nook development.
//!
//! Provides element types that report on their own lifecycle so tests can
//! check that a container drops every value exactly once:
//!
//! - [`DropCounter`] / [`Tracked`]: count constructions (including clones)
//!   and drops across a group of values.
//! - [`fixtures::CloneBudget`] / [`fixtures::FailingClone`]: values whose
//!   clone fails deterministically after N successful clones.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub use fixtures::{CloneBudget, CloneFailed, FailingClone};

#[derive(Default)]
struct Counts {
    created: AtomicUsize,
    dropped: AtomicUsize,
}

/// Shared tally of [`Tracked`] values created and dropped.
///
/// Cloning the counter shares the tally.
#[derive(Clone, Default)]
pub struct DropCounter {
    counts: Arc<Counts>,
}

impl DropCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `value` so its lifecycle is counted here.
    pub fn track<T>(&self, value: T) -> Tracked<T> {
        self.counts.created.fetch_add(1, Ordering::Relaxed);
        Tracked {
            value,
            counts: Arc::clone(&self.counts),
        }
    }

    /// Values created so far, clones included.
    pub fn created(&self) -> usize {
        self.counts.created.load(Ordering::Relaxed)
    }

    /// Values dropped so far.
    pub fn dropped(&self) -> usize {
        self.counts.dropped.load(Ordering::Relaxed)
    }

    /// Values created and not yet dropped.
    pub fn live(&self) -> usize {
        self.created() - self.dropped()
    }
}

impl fmt::Debug for DropCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropCounter")
            .field("created", &self.created())
            .field("dropped", &self.dropped())
            .finish()
    }
}

/// A value whose construction and drop are counted by a [`DropCounter`].
pub struct Tracked<T> {
    value: T,
    counts: Arc<Counts>,
}

impl<T> Tracked<T> {
    pub fn get(&self) -> &T {
        &self.value
    }
}

impl<T: Clone> Clone for Tracked<T> {
    fn clone(&self) -> Self {
        self.counts.created.fetch_add(1, Ordering::Relaxed);
        Self {
            value: self.value.clone(),
            counts: Arc::clone(&self.counts),
        }
    }
}

impl<T> Drop for Tracked<T> {
    fn drop(&mut self) {
        self.counts.dropped.fetch_add(1, Ordering::Relaxed);
    }
}

impl<T: PartialEq> PartialEq for Tracked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Tracked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tracked").field(&self.value).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_creation_clone_and_drop() {
        let counter = DropCounter::new();
        let a = counter.track(1);
        let b = a.clone();
        assert_eq!(counter.created(), 2);
        assert_eq!(a, b);
        drop(a);
        assert_eq!(counter.dropped(), 1);
        assert_eq!(counter.live(), 1);
        drop(b);
        assert_eq!(counter.live(), 0);
    }
}
