//! Allocator-aware doubly-linked list for nook.
//!
//! [`List`] is a circular, sentinel-anchored list whose nodes come from any
//! [`Allocator`](nook_arena::Allocator). With a
//! [`StackAllocator`](nook_arena::StackAllocator) every node lives inside a
//! fixed-capacity [`StackStorage`](nook_arena::StackStorage) and the list
//! cannot outlive it.
//!
//! # Architecture
//!
//! ```text
//! List<T, A>
//! ├── sentinel: Box<Link> ──► Node<T> ──► Node<T> ──► (back to sentinel)
//! ├── alloc: A                        (user handle, returned by allocator())
//! └── node_alloc: A::Rebind<Node<T>>  (draws one node per insert)
//!
//! Cursor / CursorMut   position = one Link (sentinel = ghost position)
//! Iter / IterMut       double-ended walk between first and last node
//! IntoIter             drains by value
//! ```
//!
//! # Failure semantics
//!
//! Every insert allocates before it constructs. An allocation failure
//! returns [`ArenaError`](nook_arena::ArenaError) without calling the
//! constructor. A constructor that fails or panics gets its region released
//! and nothing linked. Bulk constructors drop everything they built before
//! returning an error. Removal never fails.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::undocumented_unsafe_blocks)]

pub mod cursor;
pub mod error;
pub mod iter;
pub mod list;
mod node;

// Public re-exports for the primary API surface.
pub use cursor::{Cursor, CursorMut};
pub use error::ListError;
pub use iter::{IntoIter, Iter, IterMut};
pub use list::List;
