//! Nook: fixed-capacity stack arenas and containers that live inside them.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! nook sub-crates. For most users, adding `nook` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use nook::prelude::*;
//!
//! // 1 KiB of node storage, owned by this stack frame.
//! let storage = StackStorage::<1024>::new();
//!
//! let mut tasks = List::new_in(StackAllocator::new(&storage));
//! tasks.push_back("parse").unwrap();
//! tasks.push_back("check").unwrap();
//! tasks.push_front("lex").unwrap();
//!
//! // Insert in the middle through a cursor.
//! let mut cursor = tasks.cursor_back_mut();
//! cursor.insert("lower").unwrap();
//! assert_eq!(cursor.current(), Some(&"lower"));
//!
//! let order: Vec<_> = tasks.iter().copied().collect();
//! assert_eq!(order, ["lex", "parse", "lower", "check"]);
//!
//! // Copies draw from the same storage; the arena never frees.
//! let copy = tasks.try_clone().unwrap();
//! assert_eq!(copy.len(), 4);
//! assert!(storage.used() > 0);
//!
//! // Running out of room is an ordinary error.
//! let tiny = StackStorage::<16>::new();
//! let mut full = List::new_in(StackAllocator::new(&tiny));
//! assert!(matches!(full.push_back(1u64), Err(ArenaError::CapacityExceeded { .. })));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `nook-arena` | `StackStorage`, allocator handles, the `Allocator` trait |
//! | [`list`] | `nook-list` | `List`, cursors, iterators, `ListError` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Arena storage and allocator handles (`nook-arena`).
///
/// [`arena::StackStorage`] owns the bytes; [`arena::StackAllocator`] borrows
/// them. [`arena::HeapAllocator`] is the default for containers that do not
/// name an allocator.
pub use nook_arena as arena;

/// The allocator-aware doubly-linked list (`nook-list`).
///
/// See [`list::List`] for copy and failure semantics and [`list::CursorMut`]
/// for editing in the middle.
pub use nook_list as list;

/// Common imports for typical nook usage.
///
/// ```rust
/// use nook::prelude::*;
/// ```
pub mod prelude {
    // Arena
    pub use nook_arena::{Allocator, ArenaError, HeapAllocator, StackAllocator, StackStorage};

    // List
    pub use nook_list::{Cursor, CursorMut, List, ListError};
}
