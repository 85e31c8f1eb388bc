//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur while acquiring memory from an allocator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The arena cannot place the request without running past its buffer.
    CapacityExceeded {
        /// Number of bytes requested.
        requested: usize,
        /// Alignment the region had to satisfy.
        align: usize,
        /// Bytes already consumed when the request arrived.
        used: usize,
        /// Total size of the arena buffer in bytes.
        capacity: usize,
    },
    /// The requested alignment is not a power of two.
    InvalidAlignment {
        /// The rejected alignment.
        align: usize,
    },
    /// `count * elem_size` does not fit in `usize`.
    LayoutOverflow {
        /// Number of elements requested.
        count: usize,
        /// Size of one element in bytes.
        elem_size: usize,
    },
    /// The handle was default-constructed and is not bound to any storage.
    Detached,
    /// The global allocator returned null.
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                requested,
                align,
                used,
                capacity,
            } => {
                write!(
                    f,
                    "arena capacity exceeded: requested {requested} bytes (align {align}), \
                     {used} of {capacity} bytes in use"
                )
            }
            Self::InvalidAlignment { align } => {
                write!(f, "alignment {align} is not a power of two")
            }
            Self::LayoutOverflow { count, elem_size } => {
                write!(f, "allocation of {count} x {elem_size} bytes overflows usize")
            }
            Self::Detached => write!(f, "allocator handle is not bound to a storage"),
            Self::OutOfMemory { requested } => {
                write!(f, "global allocator failed to provide {requested} bytes")
            }
        }
    }
}

impl Error for ArenaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_message_names_all_numbers() {
        let err = ArenaError::CapacityExceeded {
            requested: 24,
            align: 8,
            used: 48,
            capacity: 64,
        };
        let msg = err.to_string();
        assert!(msg.contains("24"));
        assert!(msg.contains("48 of 64"));
    }

    #[test]
    fn detached_is_comparable() {
        assert_eq!(ArenaError::Detached, ArenaError::Detached);
        assert_ne!(
            ArenaError::Detached,
            ArenaError::InvalidAlignment { align: 3 }
        );
    }
}
