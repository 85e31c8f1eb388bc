//! Element fixtures that fail on demand.
//!
//! [`CloneBudget`] hands out [`FailingClone`] values that share one clone
//! counter. The first `succeed_count` clones across the whole group succeed;
//! every clone after that panics (through `Clone`) or returns [`CloneFailed`]
//! (through [`FailingClone::try_clone`]).

use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Budget {
    succeed_count: usize,
    call_count: AtomicUsize,
}

/// Shared clone allowance for a group of [`FailingClone`] values.
#[derive(Clone)]
pub struct CloneBudget {
    inner: Arc<Budget>,
}

impl CloneBudget {
    /// Create a budget that allows `succeed_count` clones, then fails.
    pub fn new(succeed_count: usize) -> Self {
        Self {
            inner: Arc::new(Budget {
                succeed_count,
                call_count: AtomicUsize::new(0),
            }),
        }
    }

    /// Wrap `value` so its clones draw from this budget.
    pub fn wrap<T>(&self, value: T) -> FailingClone<T> {
        FailingClone {
            value,
            budget: self.clone(),
        }
    }

    /// How many clones have been attempted.
    pub fn calls(&self) -> usize {
        self.inner.call_count.load(Ordering::Relaxed)
    }

    /// Reset the clone counter.
    pub fn reset(&self) {
        self.inner.call_count.store(0, Ordering::Relaxed);
    }

    fn charge(&self) -> Result<(), CloneFailed> {
        let n = self.inner.call_count.fetch_add(1, Ordering::Relaxed);
        if n >= self.inner.succeed_count {
            return Err(CloneFailed {
                succeed_count: self.inner.succeed_count,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for CloneBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloneBudget")
            .field("succeed_count", &self.inner.succeed_count)
            .field("calls", &self.calls())
            .finish()
    }
}

/// The error a [`FailingClone`] reports once its budget is spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CloneFailed {
    pub succeed_count: usize,
}

impl fmt::Display for CloneFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "deliberate clone failure after {} successful clones",
            self.succeed_count
        )
    }
}

impl Error for CloneFailed {}

/// A value whose clones are charged against a [`CloneBudget`].
pub struct FailingClone<T> {
    value: T,
    budget: CloneBudget,
}

impl<T> FailingClone<T> {
    pub fn get(&self) -> &T {
        &self.value
    }
}

impl<T: Clone> FailingClone<T> {
    /// Clone, or report that the budget is spent. The inner value is not
    /// cloned on failure.
    pub fn try_clone(&self) -> Result<Self, CloneFailed> {
        self.budget.charge()?;
        Ok(Self {
            value: self.value.clone(),
            budget: self.budget.clone(),
        })
    }
}

impl<T: Clone> Clone for FailingClone<T> {
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T: PartialEq> PartialEq for FailingClone<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: fmt::Debug> fmt::Debug for FailingClone<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FailingClone").field(&self.value).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_shared_across_values() {
        let budget = CloneBudget::new(2);
        let a = budget.wrap(1);
        let b = budget.wrap(2);
        assert!(a.try_clone().is_ok());
        assert!(b.try_clone().is_ok());
        assert_eq!(
            a.try_clone().unwrap_err(),
            CloneFailed { succeed_count: 2 }
        );
        assert_eq!(budget.calls(), 3);
        budget.reset();
        assert_eq!(*b.try_clone().unwrap().get(), 2);
    }

    #[test]
    #[should_panic(expected = "deliberate clone failure")]
    fn clone_panics_when_spent() {
        let budget = CloneBudget::new(0);
        let _ = budget.wrap("x").clone();
    }
}
