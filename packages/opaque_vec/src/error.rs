use std::alloc::{Layout, handle_alloc_error};

use thiserror::Error;

/// Errors that can occur when operating on an [`OpaqueVec`][crate::OpaqueVec].
///
/// Every fallible operation has a `try_*` form that returns these as values. The non-`try`
/// forms treat them as fatal: they panic with the error message, or in the case of
/// [`Error::AllocationFailure`] hand over to [`std::alloc::handle_alloc_error`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The memory allocator could not satisfy a request for the backing buffer.
    #[error(
        "{operation} failed to allocate {} bytes with alignment {}",
        .layout.size(),
        .layout.align()
    )]
    AllocationFailure {
        /// The operation that requested the allocation.
        operation: &'static str,

        /// The layout of the allocation that failed.
        layout: Layout,
    },

    /// The byte size of the requested capacity does not fit in the address space.
    #[error(
        "{operation} cannot hold {capacity} elements of {element_size} bytes - the buffer would exceed the address space"
    )]
    CapacityOverflow {
        /// The operation that requested the capacity.
        operation: &'static str,

        /// The requested capacity, in elements.
        capacity: usize,

        /// The size of one element, in bytes.
        element_size: usize,
    },

    /// An element index was not within the live elements of the vector.
    #[error("index {index} is out of bounds for vector of length {len}")]
    OutOfBounds {
        /// The index that was requested.
        index: usize,

        /// The number of live elements at the time of the request.
        len: usize,
    },

    /// The operation requires at least one element but the vector is empty.
    #[error("{operation} requires an element but the vector is empty")]
    EmptyContainer {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// More elements were requested than the vector holds.
    #[error("requested {requested} elements but the vector only holds {len}")]
    Underflow {
        /// The number of elements that was requested.
        requested: usize,

        /// The number of live elements at the time of the request.
        len: usize,
    },

    /// Two vectors were combined but their element sizes differ.
    #[error("element sizes do not match: {first} vs {second}")]
    SizeMismatch {
        /// Element size of the vector the operation was called on.
        first: usize,

        /// Element size of the other vector.
        second: usize,
    },

    /// A caller-provided byte buffer does not have the length the operation requires.
    ///
    /// Single-element operations need exactly one element's worth of bytes, bulk operations
    /// need a whole number of elements.
    #[error("byte buffer of length {actual} does not fit elements of {element_size} bytes")]
    ElementLength {
        /// The length of the caller-provided buffer, in bytes.
        actual: usize,

        /// The size of one element, in bytes.
        element_size: usize,
    },
}

impl Error {
    /// Terminates the current operation.
    ///
    /// Allocation failures go through the standard out-of-memory handler, everything else
    /// panics with the error message.
    #[cold]
    #[track_caller]
    pub(crate) fn raise(self) -> ! {
        match self {
            Self::AllocationFailure { layout, .. } => handle_alloc_error(layout),
            other => panic!("{other}"),
        }
    }
}

/// A specialized `Result` type for vector operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

/// Converts a `Result` into its value, raising the error if there is one.
pub(crate) trait OrRaise<T> {
    fn or_raise(self) -> T;
}

impl<T> OrRaise<T> for Result<T> {
    #[track_caller]
    fn or_raise(self) -> T {
        match self {
            Ok(value) => value,
            Err(error) => error.raise(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn out_of_bounds_message_names_operands() {
        let error = Error::OutOfBounds { index: 4, len: 4 };

        let message = error.to_string();
        assert!(message.contains("index 4"));
        assert!(message.contains("length 4"));
    }

    #[test]
    fn allocation_failure_message_names_layout() {
        let layout = Layout::from_size_align(64, 8).unwrap();
        let error = Error::AllocationFailure {
            operation: "reserve",
            layout,
        };

        let message = error.to_string();
        assert!(message.starts_with("reserve"));
        assert!(message.contains("64 bytes"));
        assert!(message.contains("alignment 8"));
    }

    #[test]
    fn size_mismatch_message_names_both_sizes() {
        let error = Error::SizeMismatch {
            first: 4,
            second: 8,
        };

        assert_eq!(error.to_string(), "element sizes do not match: 4 vs 8");
    }

    #[test]
    fn or_raise_passes_through_value() {
        let result: Result<u32> = Ok(5);
        assert_eq!(result.or_raise(), 5);
    }

    #[test]
    #[should_panic(expected = "requested 3 elements but the vector only holds 1")]
    fn or_raise_panics_with_message() {
        let result: Result<()> = Err(Error::Underflow {
            requested: 3,
            len: 1,
        });

        result.or_raise();
    }
}
