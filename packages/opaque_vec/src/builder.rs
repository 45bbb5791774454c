use std::alloc::Layout;
use std::cell::Cell;
use std::marker::PhantomData;
use std::num::NonZero;

use crate::{OpaqueVec, OrRaise, Result};

/// Builder for creating an instance of [`OpaqueVec`].
///
/// [`OpaqueVec`] requires the element memory layout to be specified at construction time.
/// Use `.element_size()` for plain bytes, `.layout()` to provide a specific layout or
/// `.layout_of::<T>()` to generate a layout based on the provided type.
///
/// The layout is mandatory, whereas the initial capacity is optional and defaults to zero,
/// which defers allocation until the first element is added.
///
/// # Examples
///
/// ```
/// use std::num::NonZero;
///
/// use opaque_vec::OpaqueVec;
///
/// let vec = OpaqueVec::builder()
///     .element_size(NonZero::new(12).unwrap())
///     .capacity(32)
///     .build();
///
/// assert_eq!(vec.element_size(), 12);
/// assert_eq!(vec.capacity(), 32);
/// ```
///
/// # Thread safety
///
/// The builder is thread-mobile ([`Send`]) and can be safely transferred between threads,
/// allowing configuration to happen on different threads than where the vector is used.
/// However, it is not thread-safe ([`Sync`]) as it contains mutable configuration state.
#[derive(Debug)]
#[must_use]
pub struct OpaqueVecBuilder {
    element_layout: Option<Layout>,
    capacity: usize,

    // Prevents Sync while allowing Send - builders are thread-mobile but not thread-safe
    _not_sync: PhantomData<Cell<()>>,
}

impl OpaqueVecBuilder {
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            element_layout: None,
            capacity: 0,
            _not_sync: PhantomData,
        }
    }

    /// Sets the size of one element in bytes, with no alignment requirement.
    ///
    /// # Panics
    ///
    /// Panics if the size exceeds `isize::MAX`.
    #[inline]
    pub fn element_size(mut self, size: NonZero<usize>) -> Self {
        let layout = Layout::from_size_align(size.get(), 1)
            .expect("element size must not exceed isize::MAX");
        self.element_layout = Some(layout);
        self
    }

    /// Sets the memory layout of one element.
    ///
    /// The size is padded up to the alignment, so that consecutive elements stay aligned.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::alloc::Layout;
    ///
    /// use opaque_vec::OpaqueVec;
    ///
    /// let layout = Layout::from_size_align(6, 4).unwrap();
    /// let vec = OpaqueVec::builder().layout(layout).build();
    ///
    /// assert_eq!(vec.element_size(), 8);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the layout has zero size.
    #[inline]
    pub fn layout(mut self, layout: Layout) -> Self {
        assert!(layout.size() > 0, "OpaqueVec must have non-zero element size");
        self.element_layout = Some(layout);
        self
    }

    /// Sets the memory layout of one element based on a type.
    ///
    /// This is a convenience method that automatically creates the layout for the given type.
    ///
    /// # Examples
    ///
    /// ```
    /// use opaque_vec::OpaqueVec;
    ///
    /// let vec = OpaqueVec::builder().layout_of::<u64>().build();
    ///
    /// assert_eq!(vec.element_size(), 8);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `T` is a zero-sized type.
    #[inline]
    pub fn layout_of<T>(self) -> Self {
        self.layout(Layout::new::<T>())
    }

    /// Sets the number of elements to allocate for up front.
    #[inline]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builds the vector with the specified configuration.
    ///
    /// # Panics
    ///
    /// Panics if no layout has been set, or if the initial capacity cannot be represented in
    /// memory. Aborts through [`std::alloc::handle_alloc_error`] if the allocation fails.
    #[must_use]
    #[inline]
    #[track_caller]
    pub fn build(self) -> OpaqueVec {
        self.try_build().or_raise()
    }

    /// Builds the vector with the specified configuration, returning allocation problems
    /// as errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`][crate::Error::CapacityOverflow] if the initial
    /// capacity does not fit in the address space and
    /// [`Error::AllocationFailure`][crate::Error::AllocationFailure] if the allocator refuses it.
    ///
    /// # Panics
    ///
    /// Panics if no layout has been set.
    #[inline]
    pub fn try_build(self) -> Result<OpaqueVec> {
        let layout = self.element_layout.expect(
            "Layout must be set using .element_size(), .layout() or .layout_of::<T>() before building",
        );
        OpaqueVec::new_inner(layout, self.capacity)
    }
}

#[cfg(test)]
mod tests {
    use new_zealand::nz;
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;
    use crate::Error;

    assert_impl_all!(OpaqueVecBuilder: Send, std::fmt::Debug);
    assert_not_impl_any!(OpaqueVecBuilder: Sync);

    #[test]
    fn builder_new_creates_default_state() {
        let builder = OpaqueVecBuilder::new();
        assert!(builder.element_layout.is_none());
        assert_eq!(builder.capacity, 0);
    }

    #[test]
    fn element_size_sets_byte_layout() {
        let builder = OpaqueVecBuilder::new().element_size(nz!(24));
        assert_eq!(
            builder.element_layout,
            Some(Layout::from_size_align(24, 1).unwrap())
        );
    }

    #[test]
    fn layout_of_sets_layout_correctly() {
        let builder = OpaqueVecBuilder::new().layout_of::<u128>();
        assert_eq!(builder.element_layout, Some(Layout::new::<u128>()));
    }

    #[test]
    #[should_panic]
    fn layout_with_zero_size_panics() {
        let _vec = OpaqueVecBuilder::new().layout(Layout::new::<()>()).build();
    }

    #[test]
    #[should_panic]
    fn layout_of_zero_sized_type_panics() {
        let _vec = OpaqueVecBuilder::new().layout_of::<()>().build();
    }

    #[test]
    #[should_panic]
    fn build_without_layout_panics() {
        let _vec = OpaqueVecBuilder::new().capacity(10).build();
    }

    #[test]
    fn last_layout_wins() {
        let builder = OpaqueVecBuilder::new()
            .layout_of::<u32>()
            .element_size(nz!(3))
            .layout_of::<u16>();
        assert_eq!(builder.element_layout, Some(Layout::new::<u16>()));
    }

    #[test]
    fn capacity_is_allocated_up_front() {
        let vec = OpaqueVecBuilder::new()
            .layout_of::<u32>()
            .capacity(17)
            .build();

        assert_eq!(vec.capacity(), 17);
        assert_eq!(vec.len(), 0);
    }

    #[test]
    fn build_order_independence() {
        let vec1 = OpaqueVecBuilder::new().layout_of::<u64>().capacity(4).build();
        let vec2 = OpaqueVecBuilder::new().capacity(4).layout_of::<u64>().build();

        assert_eq!(vec1.element_layout(), vec2.element_layout());
        assert_eq!(vec1.capacity(), vec2.capacity());
    }

    #[test]
    fn try_build_reports_overflow() {
        let result = OpaqueVecBuilder::new()
            .layout_of::<u64>()
            .capacity(usize::MAX)
            .try_build();

        assert!(matches!(result, Err(Error::CapacityOverflow { .. })));
    }

    #[test]
    fn builder_can_move_between_threads() {
        let builder = OpaqueVecBuilder::new().layout_of::<u64>().capacity(8);
        let handle = std::thread::spawn(move || builder.build());
        let vec = handle.join().expect("thread completed successfully");

        assert_eq!(vec.capacity(), 8);
    }
}
