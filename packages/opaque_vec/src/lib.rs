#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A growable contiguous buffer of fixed-size elements whose type is known only by its memory
//! layout.
//!
//! This crate provides [`OpaqueVec`], a dynamic array that stores elements as raw bytes. The
//! element layout is chosen when the vector is created and never changes. Elements are copied
//! in and out as byte slices, so one implementation serves any element type, including types
//! that only exist on the other side of an FFI boundary.
//!
//! # Key Features
//!
//! - **Type-erased storage**: Works with any element that matches the vector's
//!   [`std::alloc::Layout`]
//! - **Amortized O(1) append**: Capacity doubles as needed, never more than twice the request
//! - **Bulk operations**: Push or pop many elements at once, join two vectors or split one
//! - **Ordered and unordered erase**: Shift the tail down in O(n) or fill the gap with the
//!   last element in O(1)
//! - **Checked access**: Every index is validated against the number of live elements
//! - **Fail-fast or recoverable**: Each fallible operation has a `try_*` form that returns an
//!   [`Error`], while the plain form panics (or aborts on allocation failure)
//! - **Thread mobility**: Vectors can be moved between threads (but not shared without
//!   synchronization)
//!
//! # Memory layout
//!
//! Element `i` occupies bytes `[i * element_size, (i + 1) * element_size)` of a single heap
//! allocation. The element size is the layout size padded up to its alignment, so every element
//! in the buffer is aligned for the layout. A vector with zero capacity has no allocation at all.
//!
//! # Examples
//!
//! ## Basic usage
//!
//! ```rust
//! use std::num::NonZero;
//!
//! use opaque_vec::OpaqueVec;
//!
//! // A vector of 4-byte elements, with no allocation until the first push.
//! let mut vec = OpaqueVec::new(0, NonZero::new(4).unwrap());
//!
//! vec.push(&10_u32.to_ne_bytes());
//! vec.push(&20_u32.to_ne_bytes());
//! vec.push(&30_u32.to_ne_bytes());
//!
//! assert_eq!(vec.len(), 3);
//! assert_eq!(vec.at(1), &20_u32.to_ne_bytes());
//!
//! // Order-preserving removal.
//! vec.erase(0);
//! assert_eq!(vec.at(0), &20_u32.to_ne_bytes());
//! ```
//!
//! ## Recoverable errors
//!
//! ```rust
//! use opaque_vec::{Error, OpaqueVec};
//!
//! let vec = OpaqueVec::builder().layout_of::<u64>().capacity(8).build();
//!
//! // Capacity is not the same as length - there is no element 0 yet.
//! let result = vec.try_at(0);
//! assert!(matches!(result, Err(Error::OutOfBounds { index: 0, len: 0 })));
//! ```
//!
//! ## Splitting and joining
//!
//! ```rust
//! use std::num::NonZero;
//!
//! use opaque_vec::OpaqueVec;
//!
//! let size = NonZero::new(1).unwrap();
//! let mut first = OpaqueVec::from_bytes(size, &[1, 2, 3, 4]);
//! let mut second = OpaqueVec::new(0, size);
//!
//! first.split(2, &mut second);
//! assert_eq!(first.as_bytes(), &[1, 2]);
//! assert_eq!(second.as_bytes(), &[3, 4]);
//!
//! // Joining consumes the second vector.
//! first.join(second);
//! assert_eq!(first.as_bytes(), &[1, 2, 3, 4]);
//! ```

mod builder;
mod error;
mod growth;
mod raw_buffer;
mod vec;

pub use builder::*;
pub use error::Error;
pub(crate) use error::{OrRaise, Result};
pub(crate) use growth::*;
pub(crate) use raw_buffer::*;
pub use vec::OpaqueVec;
