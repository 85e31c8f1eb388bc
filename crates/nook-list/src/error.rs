//! List-level error types.

use std::convert::Infallible;
use std::error::Error;
use std::fmt;

use nook_arena::ArenaError;

/// Errors from inserting into a [`List`](crate::List).
///
/// `E` is the error type of a fallible element constructor. Operations that
/// take an already-built value use `ListError<Infallible>`, which converts
/// losslessly into [`ArenaError`] via [`ListError::into_alloc`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListError<E = Infallible> {
    /// No room for another node.
    Alloc(ArenaError),
    /// The element constructor failed; the node's region was released.
    Element(E),
}

impl<E> From<ArenaError> for ListError<E> {
    fn from(err: ArenaError) -> Self {
        Self::Alloc(err)
    }
}

impl ListError<Infallible> {
    /// Unwrap the allocation error; the element variant cannot exist.
    pub fn into_alloc(self) -> ArenaError {
        match self {
            Self::Alloc(err) => err,
            Self::Element(never) => match never {},
        }
    }
}

impl<E: fmt::Display> fmt::Display for ListError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alloc(err) => write!(f, "node allocation failed: {err}"),
            Self::Element(err) => write!(f, "element construction failed: {err}"),
        }
    }
}

impl<E: Error + 'static> Error for ListError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Alloc(err) => Some(err),
            Self::Element(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_variant_wraps_source() {
        let err: ListError<ArenaError> = ArenaError::Detached.into();
        assert_eq!(err, ListError::Alloc(ArenaError::Detached));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("node allocation failed"));
    }

    #[test]
    fn infallible_error_unwraps_to_arena_error() {
        let err: ListError = ListError::Alloc(ArenaError::OutOfMemory { requested: 24 });
        assert_eq!(
            err.into_alloc(),
            ArenaError::OutOfMemory { requested: 24 }
        );
    }

    #[test]
    fn element_variant_displays_inner_message() {
        let err: ListError<ArenaError> = ListError::Element(ArenaError::Detached);
        assert!(err.to_string().contains("element construction failed"));
    }
}
