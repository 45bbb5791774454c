use std::alloc::{Layout, alloc, dealloc, realloc};
use std::ptr::NonNull;

use crate::{Error, Result};

/// Owns a heap allocation sized for a number of elements of one layout, without tracking which
/// of those elements are initialized.
///
/// There is no allocation while the capacity is zero. The pointer and the capacity only ever
/// change together, in [`grow()`](Self::grow).
#[derive(Debug)]
pub(crate) struct RawBuffer {
    /// Start of the allocation. `None` if and only if `capacity` is zero.
    ptr: Option<NonNull<u8>>,

    /// Number of elements the allocation can hold.
    capacity: usize,

    /// Layout of one element, already padded to its alignment so the size is also the stride.
    element_layout: Layout,
}

impl RawBuffer {
    /// Creates a buffer without an allocation.
    ///
    /// # Panics
    ///
    /// Panics if the element layout has zero size.
    #[must_use]
    pub(crate) fn new(element_layout: Layout) -> Self {
        let element_layout = element_layout.pad_to_align();

        assert!(
            element_layout.size() > 0,
            "RawBuffer cannot be created for a zero-sized element layout"
        );

        Self {
            ptr: None,
            capacity: 0,
            element_layout,
        }
    }

    /// Creates a buffer that can hold `capacity` elements. Zero capacity allocates nothing.
    pub(crate) fn with_capacity(
        element_layout: Layout,
        capacity: usize,
        operation: &'static str,
    ) -> Result<Self> {
        let mut buffer = Self::new(element_layout);
        buffer.grow(capacity, operation)?;
        Ok(buffer)
    }

    #[must_use]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub(crate) fn element_layout(&self) -> Layout {
        self.element_layout
    }

    /// Returns the start of the allocation, or a dangling pointer if there is none.
    ///
    /// The dangling pointer is only valid for zero-sized access.
    #[must_use]
    pub(crate) fn as_ptr(&self) -> *const u8 {
        self.ptr.unwrap_or_else(NonNull::dangling).as_ptr()
    }

    /// Returns the start of the allocation, or a dangling pointer if there is none.
    ///
    /// The dangling pointer is only valid for zero-sized access.
    #[must_use]
    pub(crate) fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.unwrap_or_else(NonNull::dangling).as_ptr()
    }

    /// Grows the allocation to hold `new_capacity` elements, preserving its contents.
    ///
    /// Does nothing if the buffer can already hold that many. On error, the buffer is unchanged.
    pub(crate) fn grow(&mut self, new_capacity: usize, operation: &'static str) -> Result<()> {
        if new_capacity <= self.capacity {
            return Ok(());
        }

        let new_layout = self.allocation_layout(new_capacity, operation)?;

        let new_ptr = match self.ptr {
            // SAFETY: new_layout has non-zero size because new_capacity > 0 and the element
            // size is non-zero (checked in new()).
            None => unsafe { alloc(new_layout) },
            Some(old_ptr) => {
                let old_layout = self
                    .allocation_layout(self.capacity, operation)
                    .expect("layout was valid when the existing allocation was made");

                // SAFETY: old_ptr was allocated by us with old_layout, new_layout has the same
                // alignment and its size was validated by Layout::from_size_align().
                unsafe { realloc(old_ptr.as_ptr(), old_layout, new_layout.size()) }
            }
        };

        let new_ptr = NonNull::new(new_ptr).ok_or(Error::AllocationFailure {
            operation,
            layout: new_layout,
        })?;

        // Nothing can fail past this point, so the two fields are never out of sync.
        self.ptr = Some(new_ptr);
        self.capacity = new_capacity;

        Ok(())
    }

    fn allocation_layout(&self, capacity: usize, operation: &'static str) -> Result<Layout> {
        let overflow = || Error::CapacityOverflow {
            operation,
            capacity,
            element_size: self.element_layout.size(),
        };

        let size = self
            .element_layout
            .size()
            .checked_mul(capacity)
            .ok_or_else(overflow)?;

        Layout::from_size_align(size, self.element_layout.align())
            .map_err(|_layout_error| overflow())
    }
}

impl Drop for RawBuffer {
    fn drop(&mut self) {
        let Some(ptr) = self.ptr else {
            return;
        };

        let layout = self
            .allocation_layout(self.capacity, "drop")
            .expect("layout was valid when the existing allocation was made");

        // SAFETY: ptr was allocated by us with this layout and is released exactly once here.
        unsafe {
            dealloc(ptr.as_ptr(), layout);
        }
    }
}

// SAFETY: RawBuffer exclusively owns its allocation of plain bytes and does not rely on
// thread-local state. Access is governed by &self/&mut self like any owned collection.
unsafe impl Send for RawBuffer {}

#[cfg(test)]
#[allow(
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::indexing_slicing,
    reason = "test code doesn't need the same safety rigor as production code"
)]
mod tests {
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;

    assert_impl_all!(RawBuffer: Send, std::fmt::Debug);
    assert_not_impl_any!(RawBuffer: Sync);

    #[test]
    fn new_does_not_allocate() {
        let buffer = RawBuffer::new(Layout::new::<u32>());

        assert_eq!(buffer.capacity(), 0);
        assert!(buffer.ptr.is_none());
    }

    #[test]
    fn zero_capacity_does_not_allocate() {
        let buffer = RawBuffer::with_capacity(Layout::new::<u32>(), 0, "test").unwrap();

        assert_eq!(buffer.capacity(), 0);
        assert!(buffer.ptr.is_none());
    }

    #[test]
    #[should_panic]
    fn zero_sized_layout_panics() {
        _ = RawBuffer::new(Layout::new::<()>());
    }

    #[test]
    fn layout_is_padded_to_alignment() {
        let layout = Layout::from_size_align(5, 4).unwrap();
        let buffer = RawBuffer::new(layout);

        assert_eq!(buffer.element_layout().size(), 8);
        assert_eq!(buffer.element_layout().align(), 4);
    }

    #[test]
    fn grow_updates_pointer_and_capacity_together() {
        let mut buffer = RawBuffer::new(Layout::new::<u64>());

        buffer.grow(4, "test").unwrap();
        assert_eq!(buffer.capacity(), 4);
        assert!(buffer.ptr.is_some());

        buffer.grow(100, "test").unwrap();
        assert_eq!(buffer.capacity(), 100);
        assert!(buffer.ptr.is_some());
    }

    #[test]
    fn grow_never_shrinks() {
        let mut buffer = RawBuffer::with_capacity(Layout::new::<u64>(), 10, "test").unwrap();
        let ptr_before = buffer.as_ptr();

        buffer.grow(5, "test").unwrap();
        buffer.grow(10, "test").unwrap();

        assert_eq!(buffer.capacity(), 10);
        assert_eq!(buffer.as_ptr(), ptr_before);
    }

    #[test]
    fn grow_preserves_contents() {
        let mut buffer = RawBuffer::with_capacity(Layout::new::<u32>(), 2, "test").unwrap();

        unsafe {
            buffer.as_mut_ptr().cast::<u32>().write(11);
            buffer.as_mut_ptr().cast::<u32>().add(1).write(22);
        }

        buffer.grow(1000, "test").unwrap();

        unsafe {
            assert_eq!(buffer.as_ptr().cast::<u32>().read(), 11);
            assert_eq!(buffer.as_ptr().cast::<u32>().add(1).read(), 22);
        }
    }

    #[test]
    fn allocation_is_aligned() {
        let layout = Layout::from_size_align(64, 64).unwrap();
        let buffer = RawBuffer::with_capacity(layout, 3, "test").unwrap();

        assert_eq!(buffer.as_ptr().align_offset(64), 0);
    }

    #[test]
    fn size_overflow_is_error() {
        let mut buffer = RawBuffer::new(Layout::new::<u32>());

        let error = buffer.grow(usize::MAX, "test").unwrap_err();

        assert!(matches!(
            error,
            Error::CapacityOverflow {
                operation: "test",
                capacity: usize::MAX,
                element_size: 4
            }
        ));
        assert_eq!(buffer.capacity(), 0);
    }

    #[test]
    fn beyond_isize_is_error() {
        let mut buffer = RawBuffer::new(Layout::new::<u8>());

        let error = buffer.grow(usize::MAX, "test").unwrap_err();

        assert!(matches!(error, Error::CapacityOverflow { .. }));
    }

    #[test]
    fn failed_allocation_leaves_buffer_unchanged() {
        let mut buffer = RawBuffer::with_capacity(Layout::new::<u8>(), 8, "test").unwrap();
        let ptr_before = buffer.as_ptr();

        // Valid as a layout but far beyond what any allocator will hand out.
        let error = buffer.grow(isize::MAX.unsigned_abs(), "test").unwrap_err();

        assert!(matches!(
            error,
            Error::AllocationFailure {
                operation: "test",
                ..
            }
        ));
        assert_eq!(buffer.capacity(), 8);
        assert_eq!(buffer.as_ptr(), ptr_before);
    }

    #[test]
    fn unallocated_pointer_is_non_null() {
        let mut buffer = RawBuffer::new(Layout::new::<u16>());

        assert!(!buffer.as_ptr().is_null());
        assert!(!buffer.as_mut_ptr().is_null());
    }
}
