//! Benchmark profiles for nook arenas and containers.
//!
//! Shared sizes and builders so every benchmark measures the same workload:
//!
//! - [`PROFILE_LEN`] elements per list.
//! - [`PROFILE_CAPACITY`] bytes of stack storage, enough for a full profile
//!   list plus one copy of it.
//! - [`fill_profile`]: append `0..PROFILE_LEN` to any list.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use nook_arena::{Allocator, ArenaError};
use nook_list::List;

/// Elements in a profile list.
pub const PROFILE_LEN: usize = 256;

/// Stack storage bytes for two profile lists of `u64`.
pub const PROFILE_CAPACITY: usize = 16 * 1024;

/// Append `0..PROFILE_LEN` to `list`.
pub fn fill_profile<A: Allocator<Value = u64>>(list: &mut List<u64, A>) -> Result<(), ArenaError> {
    list.try_extend((0..PROFILE_LEN as u64).map(|i| i.wrapping_mul(0x9E37_79B9)))
}
