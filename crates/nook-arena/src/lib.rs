//! Fixed-capacity arenas and allocator handles for nook containers.
//!
//! Provides an inline, bump-allocated byte arena whose capacity is fixed at
//! compile time, and the typed handles that node-based containers use to draw
//! from it. The arena never frees: a region stays consumed until the storage
//! itself goes out of scope.
//!
//! # Architecture
//!
//! ```text
//! StackStorage<N>            (owns [u8; N] + cursor, lives on the stack)
//! └── StackAllocator<'a, T, N>  × many (Copy, borrows the storage)
//!     └── rebind::<Node<T>>()     (same storage, different element type)
//!
//! HeapAllocator<T>           (stateless, global heap, frees for real)
//! ```
//!
//! Both handle types implement [`Allocator`], the contract a container relies
//! on: typed allocation, a no-op-or-free deallocation, rebinding, and the
//! copy-propagation hooks.
//!
//! # Safety
//!
//! This crate contains `unsafe` code in two places: pointer arithmetic in
//! [`storage`] and calls into the global allocator in [`heap`]. Each block
//! carries a `// SAFETY:` comment. [`Allocator`] is an `unsafe trait`; the
//! impls in [`handle`] and [`heap`] state the guarantees they uphold.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::undocumented_unsafe_blocks)]

pub mod error;
pub mod handle;
pub mod heap;
pub mod storage;
pub mod traits;

// Public re-exports for the primary API surface.
pub use error::ArenaError;
pub use handle::StackAllocator;
pub use heap::HeapAllocator;
pub use storage::StackStorage;
pub use traits::Allocator;
