use std::alloc::Layout;
use std::num::NonZero;
use std::{ptr, slice};

use crate::{Error, OpaqueVecBuilder, OrRaise, RawBuffer, Result, grown_capacity};

/// A growable contiguous buffer of fixed-size elements that are known only by their layout.
///
/// Element `i` occupies the bytes `[i * element_size, (i + 1) * element_size)` of the buffer.
/// Elements are copied in and out as byte slices, so the vector never needs to know their type.
///
/// Every operation that can fail comes in two forms. The `try_*` form returns an [`Error`]
/// that identifies what went wrong. The plain form treats the error as fatal: it panics with
/// the error message, except for allocation failures, which are passed to
/// [`std::alloc::handle_alloc_error`].
///
/// # Examples
///
/// ```
/// use opaque_vec::OpaqueVec;
///
/// let mut vec = OpaqueVec::builder().layout_of::<u32>().build();
///
/// vec.push(&7_u32.to_ne_bytes());
/// vec.push(&8_u32.to_ne_bytes());
///
/// assert_eq!(vec.len(), 2);
/// assert_eq!(vec.at(1), &8_u32.to_ne_bytes());
///
/// let mut last = [0_u8; 4];
/// vec.pop(&mut last);
/// assert_eq!(u32::from_ne_bytes(last), 8);
/// ```
///
/// # Thread safety
///
/// The vector is thread-mobile ([`Send`]) but not thread-safe ([`Sync`]). Sharing it between
/// threads requires external synchronization.
#[derive(Debug)]
pub struct OpaqueVec {
    buffer: RawBuffer,

    /// Number of live elements. Never exceeds `buffer.capacity()`.
    len: usize,
}

impl OpaqueVec {
    /// Creates a vector for elements of `element_size` bytes with room for `capacity` elements.
    ///
    /// A capacity of zero allocates nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZero;
    ///
    /// use opaque_vec::OpaqueVec;
    ///
    /// let vec = OpaqueVec::new(0, NonZero::new(16).unwrap());
    ///
    /// assert!(vec.is_empty());
    /// assert_eq!(vec.capacity(), 0);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the capacity cannot be represented in memory. Aborts through
    /// [`std::alloc::handle_alloc_error`] if the allocation fails.
    #[must_use]
    #[track_caller]
    pub fn new(capacity: usize, element_size: NonZero<usize>) -> Self {
        Self::builder()
            .element_size(element_size)
            .capacity(capacity)
            .build()
    }

    /// Creates a builder for configuring a new vector.
    #[inline]
    pub fn builder() -> OpaqueVecBuilder {
        OpaqueVecBuilder::new()
    }

    pub(crate) fn new_inner(element_layout: Layout, capacity: usize) -> Result<Self> {
        Ok(Self {
            buffer: RawBuffer::with_capacity(element_layout, capacity, "new")?,
            len: 0,
        })
    }

    /// Creates a vector holding the elements in `bytes`, with capacity equal to their count.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZero;
    ///
    /// use opaque_vec::OpaqueVec;
    ///
    /// let vec = OpaqueVec::from_bytes(NonZero::new(2).unwrap(), &[1, 2, 3, 4, 5, 6]);
    ///
    /// assert_eq!(vec.len(), 3);
    /// assert_eq!(vec.at(2), &[5, 6]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is not a whole number of elements.
    #[must_use]
    #[track_caller]
    pub fn from_bytes(element_size: NonZero<usize>, bytes: &[u8]) -> Self {
        Self::try_from_bytes(element_size, bytes).or_raise()
    }

    /// Creates a vector holding the elements in `bytes`, with capacity equal to their count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementLength`] if `bytes` is not a whole number of elements, or an
    /// allocation error if the buffer cannot be allocated.
    pub fn try_from_bytes(element_size: NonZero<usize>, bytes: &[u8]) -> Result<Self> {
        let mut vec = Self::builder().element_size(element_size).try_build()?;

        let count = vec.element_count(bytes)?;
        vec.try_reserve(count)?;
        vec.try_push_multiple(bytes)?;

        Ok(vec)
    }

    /// Returns the number of live elements.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector holds no elements.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the vector can hold without reallocating.
    #[must_use]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Returns the size of one element in bytes.
    #[must_use]
    #[inline]
    pub fn element_size(&self) -> usize {
        self.buffer.element_layout().size()
    }

    /// Returns the layout of one element. Its size is a multiple of its alignment.
    #[must_use]
    #[inline]
    pub fn element_layout(&self) -> Layout {
        self.buffer.element_layout()
    }

    /// Returns a pointer to the start of the buffer.
    ///
    /// The pointer is invalidated by any operation that may reallocate. If the vector has no
    /// allocation, the pointer is dangling and must not be dereferenced.
    #[must_use]
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.buffer.as_ptr()
    }

    /// Returns a mutable pointer to the start of the buffer.
    ///
    /// The pointer is invalidated by any operation that may reallocate. If the vector has no
    /// allocation, the pointer is dangling and must not be dereferenced.
    #[must_use]
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.buffer.as_mut_ptr()
    }

    /// Returns the bytes of all live elements.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: The first len elements are initialized and lie within the allocation (or the
        // length is zero and the dangling pointer is never read).
        unsafe { slice::from_raw_parts(self.buffer.as_ptr(), self.byte_len(self.len)) }
    }

    /// Returns the bytes of all live elements for modification.
    #[must_use]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let byte_len = self.byte_len(self.len);

        // SAFETY: As in as_bytes(), and we hold an exclusive reference to the vector.
        unsafe { slice::from_raw_parts_mut(self.buffer.as_mut_ptr(), byte_len) }
    }

    /// Grows the allocation to hold at least `new_capacity` elements in total.
    ///
    /// Does nothing if the capacity is already sufficient. The capacity never shrinks.
    ///
    /// # Panics
    ///
    /// Panics if the capacity cannot be represented in memory. Aborts through
    /// [`std::alloc::handle_alloc_error`] if the allocation fails.
    #[track_caller]
    pub fn reserve(&mut self, new_capacity: usize) {
        self.try_reserve(new_capacity).or_raise();
    }

    /// Grows the allocation to hold at least `new_capacity` elements in total.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] or [`Error::AllocationFailure`] if the new buffer
    /// cannot be allocated. The vector is unchanged in that case.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<()> {
        self.buffer.grow(new_capacity, "reserve")
    }

    /// Ensures room for at least `min_capacity` elements, growing by doubling.
    ///
    /// Starting from the current capacity (or 1 if there is none), the capacity is doubled
    /// until it covers `min_capacity`. This keeps the cost of repeated appends amortized O(1).
    ///
    /// # Examples
    ///
    /// ```
    /// use opaque_vec::OpaqueVec;
    ///
    /// let mut vec = OpaqueVec::builder().layout_of::<u8>().capacity(3).build();
    ///
    /// vec.ensure_capacity(10);
    /// assert_eq!(vec.capacity(), 12);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the capacity cannot be represented in memory. Aborts through
    /// [`std::alloc::handle_alloc_error`] if the allocation fails.
    #[track_caller]
    pub fn ensure_capacity(&mut self, min_capacity: usize) {
        self.try_ensure_capacity(min_capacity).or_raise();
    }

    /// Ensures room for at least `min_capacity` elements, growing by doubling.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] or [`Error::AllocationFailure`] if the new buffer
    /// cannot be allocated. The vector is unchanged in that case.
    pub fn try_ensure_capacity(&mut self, min_capacity: usize) -> Result<()> {
        let new_capacity = grown_capacity(self.capacity(), min_capacity);
        self.buffer.grow(new_capacity, "ensure_capacity")
    }

    /// Sets the number of live elements.
    ///
    /// Growing zero-fills the newly exposed elements. Shrinking only forgets the trailing
    /// elements and keeps the allocation as it is.
    ///
    /// # Panics
    ///
    /// Panics if the capacity cannot be represented in memory. Aborts through
    /// [`std::alloc::handle_alloc_error`] if the allocation fails.
    #[track_caller]
    pub fn resize(&mut self, new_len: usize) {
        self.try_resize(new_len).or_raise();
    }

    /// Sets the number of live elements, zero-filling any new ones.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] or [`Error::AllocationFailure`] if growing requires
    /// an allocation that cannot be made. The vector is unchanged in that case.
    pub fn try_resize(&mut self, new_len: usize) -> Result<()> {
        if new_len > self.len {
            self.try_ensure_capacity(new_len)?;

            // Cannot underflow because new_len > len.
            let added = new_len.wrapping_sub(self.len);
            let byte_count = self.byte_len(added);
            let start = self.element_mut_ptr(self.len);

            // SAFETY: Capacity covers new_len elements, so [len, new_len) is inside the allocation.
            unsafe {
                ptr::write_bytes(start, 0, byte_count);
            }
        }

        self.len = new_len;
        Ok(())
    }

    /// Removes all elements. The capacity is unchanged.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Returns the bytes of the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not less than [`len()`](Self::len).
    #[must_use]
    #[track_caller]
    pub fn at(&self, index: usize) -> &[u8] {
        self.try_at(index).or_raise()
    }

    /// Returns the bytes of the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index` is not less than [`len()`](Self::len).
    pub fn try_at(&self, index: usize) -> Result<&[u8]> {
        self.check_index(index)?;

        // SAFETY: index < len, so the element is initialized and inside the allocation.
        Ok(unsafe { slice::from_raw_parts(self.element_ptr(index), self.element_size()) })
    }

    /// Returns the bytes of the element at `index` for modification.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not less than [`len()`](Self::len).
    #[must_use]
    #[track_caller]
    pub fn at_mut(&mut self, index: usize) -> &mut [u8] {
        self.try_at_mut(index).or_raise()
    }

    /// Returns the bytes of the element at `index` for modification.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `index` is not less than [`len()`](Self::len).
    pub fn try_at_mut(&mut self, index: usize) -> Result<&mut [u8]> {
        self.check_index(index)?;

        let element_size = self.element_size();
        let element = self.element_mut_ptr(index);

        // SAFETY: index < len, so the element is initialized and inside the allocation. We hold
        // an exclusive reference to the vector.
        Ok(unsafe { slice::from_raw_parts_mut(element, element_size) })
    }

    /// Returns the bytes of the last element.
    ///
    /// # Panics
    ///
    /// Panics if the vector is empty.
    #[must_use]
    #[track_caller]
    pub fn last(&self) -> &[u8] {
        self.try_last().or_raise()
    }

    /// Returns the bytes of the last element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the vector is empty.
    pub fn try_last(&self) -> Result<&[u8]> {
        let index = self.last_index("last")?;
        self.try_at(index)
    }

    /// Returns the bytes of the last element for modification.
    ///
    /// # Panics
    ///
    /// Panics if the vector is empty.
    #[must_use]
    #[track_caller]
    pub fn last_mut(&mut self) -> &mut [u8] {
        self.try_last_mut().or_raise()
    }

    /// Returns the bytes of the last element for modification.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the vector is empty.
    pub fn try_last_mut(&mut self) -> Result<&mut [u8]> {
        let index = self.last_index("last_mut")?;
        self.try_at_mut(index)
    }

    /// Copies the element at `index` into `out`, which must be exactly one element long.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds or `out` has the wrong length.
    #[track_caller]
    pub fn get(&self, index: usize, out: &mut [u8]) {
        self.try_get(index, out).or_raise();
    }

    /// Copies the element at `index` into `out`, which must be exactly one element long.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementLength`] if `out` is not exactly one element long and
    /// [`Error::OutOfBounds`] if `index` is not less than [`len()`](Self::len).
    pub fn try_get(&self, index: usize, out: &mut [u8]) -> Result<()> {
        self.check_single_element(out)?;
        out.copy_from_slice(self.try_at(index)?);
        Ok(())
    }

    /// Overwrites the element at `index` with `element`, which must be exactly one element long.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds or `element` has the wrong length.
    #[track_caller]
    pub fn set(&mut self, index: usize, element: &[u8]) {
        self.try_set(index, element).or_raise();
    }

    /// Overwrites the element at `index` with `element`, which must be exactly one element long.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementLength`] if `element` is not exactly one element long and
    /// [`Error::OutOfBounds`] if `index` is not less than [`len()`](Self::len).
    pub fn try_set(&mut self, index: usize, element: &[u8]) -> Result<()> {
        self.check_single_element(element)?;
        self.try_at_mut(index)?.copy_from_slice(element);
        Ok(())
    }

    /// Appends one element.
    ///
    /// # Panics
    ///
    /// Panics if `element` is not exactly one element long. Aborts through
    /// [`std::alloc::handle_alloc_error`] if growing fails.
    #[track_caller]
    pub fn push(&mut self, element: &[u8]) {
        self.try_push(element).or_raise();
    }

    /// Appends one element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementLength`] if `element` is not exactly one element long, or an
    /// allocation error if growing fails.
    pub fn try_push(&mut self, element: &[u8]) -> Result<()> {
        self.check_single_element(element)?;
        self.try_push_multiple(element)
    }

    /// Appends all elements in `elements`, in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZero;
    ///
    /// use opaque_vec::OpaqueVec;
    ///
    /// let mut vec = OpaqueVec::new(0, NonZero::new(2).unwrap());
    /// vec.push_multiple(&[1, 1, 2, 2, 3, 3]);
    ///
    /// assert_eq!(vec.len(), 3);
    /// assert_eq!(vec.last(), &[3, 3]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `elements` is not a whole number of elements. Aborts through
    /// [`std::alloc::handle_alloc_error`] if growing fails.
    #[track_caller]
    pub fn push_multiple(&mut self, elements: &[u8]) {
        self.try_push_multiple(elements).or_raise();
    }

    /// Appends all elements in `elements`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementLength`] if `elements` is not a whole number of elements, or an
    /// allocation error if growing fails. The vector is unchanged in either case.
    pub fn try_push_multiple(&mut self, elements: &[u8]) -> Result<()> {
        let count = self.element_count(elements)?;

        if count == 0 {
            return Ok(());
        }

        let new_len = self
            .len
            .checked_add(count)
            .ok_or_else(|| Error::CapacityOverflow {
                operation: "push_multiple",
                capacity: usize::MAX,
                element_size: self.element_size(),
            })?;

        self.try_ensure_capacity(new_len)?;

        let end = self.element_mut_ptr(self.len);

        // SAFETY: Capacity covers new_len elements, so the destination is inside the allocation.
        // The source is borrowed separately from the vector, so the two cannot overlap.
        unsafe {
            ptr::copy_nonoverlapping(elements.as_ptr(), end, elements.len());
        }

        self.len = new_len;
        Ok(())
    }

    /// Inserts one element at `index`, moving all elements after it up by one position.
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than [`len()`](Self::len) or `element` has the wrong
    /// length. Aborts through [`std::alloc::handle_alloc_error`] if growing fails.
    #[track_caller]
    pub fn insert(&mut self, index: usize, element: &[u8]) {
        self.try_insert(index, element).or_raise();
    }

    /// Inserts one element at `index`, moving all elements after it up by one position.
    ///
    /// An `index` equal to [`len()`](Self::len) appends.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementLength`] if `element` is not exactly one element long,
    /// [`Error::OutOfBounds`] if `index` is greater than [`len()`](Self::len), or an
    /// allocation error if growing fails.
    pub fn try_insert(&mut self, index: usize, element: &[u8]) -> Result<()> {
        self.check_single_element(element)?;

        if index > self.len {
            return Err(Error::OutOfBounds {
                index,
                len: self.len,
            });
        }

        // Cannot overflow because len <= capacity, which is bounded by the address space.
        let new_len = self.len.wrapping_add(1);
        self.try_ensure_capacity(new_len)?;

        // Cannot underflow because index <= len.
        let tail_bytes = self.byte_len(self.len.wrapping_sub(index));
        let source = self.element_ptr(index);
        let destination = self.element_mut_ptr(index.wrapping_add(1));

        // SAFETY: Capacity covers new_len elements, so the shifted tail stays inside the
        // allocation. The ranges overlap, which ptr::copy permits.
        unsafe {
            ptr::copy(source, destination, tail_bytes);
        }

        let slot = self.element_mut_ptr(index);

        // SAFETY: The slot is inside the allocation and the element is borrowed separately.
        unsafe {
            ptr::copy_nonoverlapping(element.as_ptr(), slot, element.len());
        }

        self.len = new_len;
        Ok(())
    }

    /// Removes the last element and copies it into `out`, which must be exactly one element long.
    ///
    /// # Panics
    ///
    /// Panics if the vector is empty or `out` has the wrong length.
    #[track_caller]
    pub fn pop(&mut self, out: &mut [u8]) {
        self.try_pop(out).or_raise();
    }

    /// Removes the last element and copies it into `out`, which must be exactly one element long.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementLength`] if `out` is not exactly one element long and
    /// [`Error::Underflow`] if the vector is empty.
    pub fn try_pop(&mut self, out: &mut [u8]) -> Result<()> {
        self.check_single_element(out)?;
        self.try_pop_multiple(out)
    }

    /// Removes as many trailing elements as fit in `out` and copies them there, in their
    /// original order.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZero;
    ///
    /// use opaque_vec::OpaqueVec;
    ///
    /// let mut vec = OpaqueVec::from_bytes(NonZero::new(1).unwrap(), &[1, 2, 3, 4]);
    ///
    /// let mut tail = [0_u8; 3];
    /// vec.pop_multiple(&mut tail);
    ///
    /// assert_eq!(tail, [2, 3, 4]);
    /// assert_eq!(vec.as_bytes(), &[1]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `out` is not a whole number of elements or holds more elements than the vector.
    #[track_caller]
    pub fn pop_multiple(&mut self, out: &mut [u8]) {
        self.try_pop_multiple(out).or_raise();
    }

    /// Removes as many trailing elements as fit in `out` and copies them there, in their
    /// original order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementLength`] if `out` is not a whole number of elements and
    /// [`Error::Underflow`] if it holds more elements than the vector.
    pub fn try_pop_multiple(&mut self, out: &mut [u8]) -> Result<()> {
        let count = self.element_count(out)?;

        let Some(new_len) = self.len.checked_sub(count) else {
            return Err(Error::Underflow {
                requested: count,
                len: self.len,
            });
        };

        let start = self.element_ptr(new_len);

        // SAFETY: [new_len, len) are initialized elements inside the allocation. The destination
        // is borrowed separately from the vector, so the two cannot overlap.
        unsafe {
            ptr::copy_nonoverlapping(start, out.as_mut_ptr(), out.len());
        }

        self.len = new_len;
        Ok(())
    }

    /// Removes the element at `index`, moving all elements after it down by one position.
    ///
    /// This preserves the order of the remaining elements and costs O(len - index).
    ///
    /// # Panics
    ///
    /// Panics if the vector is empty or `index` is out of bounds.
    #[track_caller]
    pub fn erase(&mut self, index: usize) {
        self.try_erase(index).or_raise();
    }

    /// Removes the element at `index`, moving all elements after it down by one position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the vector is empty and [`Error::OutOfBounds`] if
    /// `index` is not less than [`len()`](Self::len).
    pub fn try_erase(&mut self, index: usize) -> Result<()> {
        let last = self.last_index("erase")?;
        self.check_index(index)?;

        if index < last {
            // Cannot underflow because index < last.
            let tail_bytes = self.byte_len(last.wrapping_sub(index));
            // Cannot overflow because index < last < len.
            let source = self.element_ptr(index.wrapping_add(1));
            let destination = self.element_mut_ptr(index);

            // SAFETY: Both ranges are initialized elements inside [index, len). They overlap,
            // which ptr::copy permits.
            unsafe {
                ptr::copy(source, destination, tail_bytes);
            }
        }

        self.len = last;
        Ok(())
    }

    /// Removes the element at `index` by moving the last element into its place.
    ///
    /// This costs O(1) but does not preserve the order of the remaining elements. Removing the
    /// last element leaves all other elements untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZero;
    ///
    /// use opaque_vec::OpaqueVec;
    ///
    /// let mut vec = OpaqueVec::from_bytes(NonZero::new(1).unwrap(), &[10, 20, 30, 40]);
    /// vec.erase_unordered(1);
    ///
    /// assert_eq!(vec.as_bytes(), &[10, 40, 30]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the vector is empty or `index` is out of bounds.
    #[track_caller]
    pub fn erase_unordered(&mut self, index: usize) {
        self.try_erase_unordered(index).or_raise();
    }

    /// Removes the element at `index` by moving the last element into its place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the vector is empty and [`Error::OutOfBounds`] if
    /// `index` is not less than [`len()`](Self::len).
    pub fn try_erase_unordered(&mut self, index: usize) -> Result<()> {
        let last = self.last_index("erase_unordered")?;
        self.check_index(index)?;

        // Copying the last element onto itself is skipped rather than relied upon.
        if index != last {
            let element_size = self.element_size();
            let source = self.element_ptr(last);
            let destination = self.element_mut_ptr(index);

            // SAFETY: Both are distinct initialized elements inside the allocation, and distinct
            // elements never overlap.
            unsafe {
                ptr::copy_nonoverlapping(source, destination, element_size);
            }
        }

        self.len = last;
        Ok(())
    }

    /// Appends all elements of `other` and releases its storage.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZero;
    ///
    /// use opaque_vec::OpaqueVec;
    ///
    /// let size = NonZero::new(1).unwrap();
    /// let mut first = OpaqueVec::from_bytes(size, &[1, 2]);
    /// let second = OpaqueVec::from_bytes(size, &[3, 4]);
    ///
    /// first.join(second);
    ///
    /// assert_eq!(first.as_bytes(), &[1, 2, 3, 4]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the element sizes differ. Aborts through [`std::alloc::handle_alloc_error`]
    /// if growing fails.
    #[track_caller]
    pub fn join(&mut self, other: Self) {
        self.try_join(other).or_raise();
    }

    /// Appends all elements of `other` and releases its storage.
    ///
    /// `other` is consumed whether or not the operation succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeMismatch`] if the element sizes differ, or an allocation error if
    /// growing fails. `self` is unchanged in either case.
    #[allow(
        clippy::needless_pass_by_value,
        reason = "taking ownership is the point - the joined vector cannot be used afterwards"
    )]
    pub fn try_join(&mut self, other: Self) -> Result<()> {
        self.check_same_element_size(&other)?;
        self.try_push_multiple(other.as_bytes())
    }

    /// Moves the elements from `index` onwards to the end of `other`, preserving their order.
    ///
    /// Does nothing if `index` is not less than [`len()`](Self::len).
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZero;
    ///
    /// use opaque_vec::OpaqueVec;
    ///
    /// let size = NonZero::new(1).unwrap();
    /// let mut first = OpaqueVec::from_bytes(size, &[1, 2, 3, 4]);
    /// let mut second = OpaqueVec::new(0, size);
    ///
    /// first.split(2, &mut second);
    ///
    /// assert_eq!(first.as_bytes(), &[1, 2]);
    /// assert_eq!(second.as_bytes(), &[3, 4]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the element sizes differ. Aborts through [`std::alloc::handle_alloc_error`]
    /// if growing `other` fails.
    #[track_caller]
    pub fn split(&mut self, index: usize, other: &mut Self) {
        self.try_split(index, other).or_raise();
    }

    /// Moves the elements from `index` onwards to the end of `other`, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeMismatch`] if the element sizes differ, or an allocation error if
    /// growing `other` fails. Both vectors are unchanged in either case.
    pub fn try_split(&mut self, index: usize, other: &mut Self) -> Result<()> {
        self.check_same_element_size(other)?;

        if index >= self.len {
            return Ok(());
        }

        let (_, tail) = self.as_bytes().split_at(self.byte_len(index));
        other.try_push_multiple(tail)?;

        self.len = index;
        Ok(())
    }

    /// Creates an independent copy of the vector with the same capacity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] or [`Error::AllocationFailure`] if the new buffer
    /// cannot be allocated.
    pub fn try_clone(&self) -> Result<Self> {
        let mut buffer =
            RawBuffer::with_capacity(self.element_layout(), self.capacity(), "clone")?;
        let byte_count = self.byte_len(self.len);

        // SAFETY: Both allocations have the same capacity, the first len elements of the source
        // are initialized and the new allocation is distinct from the source.
        unsafe {
            ptr::copy_nonoverlapping(self.buffer.as_ptr(), buffer.as_mut_ptr(), byte_count);
        }

        Ok(Self {
            buffer,
            len: self.len,
        })
    }

    /// Number of bytes occupied by `count` elements.
    ///
    /// Only valid for counts up to the capacity, which are known not to overflow.
    fn byte_len(&self, count: usize) -> usize {
        debug_assert!(count <= self.capacity());

        // Cannot overflow because the allocation for this many elements exists.
        count.wrapping_mul(self.element_size())
    }

    fn element_ptr(&self, index: usize) -> *const u8 {
        let offset = self.byte_len(index);

        // SAFETY: index <= capacity, so the offset is inside or one past the end of the
        // allocation (or zero if there is no allocation).
        unsafe { self.buffer.as_ptr().add(offset) }
    }

    fn element_mut_ptr(&mut self, index: usize) -> *mut u8 {
        let offset = self.byte_len(index);

        // SAFETY: As in element_ptr().
        unsafe { self.buffer.as_mut_ptr().add(offset) }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.len {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                index,
                len: self.len,
            })
        }
    }

    fn last_index(&self, operation: &'static str) -> Result<usize> {
        self.len
            .checked_sub(1)
            .ok_or(Error::EmptyContainer { operation })
    }

    /// Returns how many elements `bytes` holds, requiring a whole number of them.
    #[allow(
        clippy::integer_division,
        clippy::arithmetic_side_effects,
        clippy::modulo_arithmetic,
        reason = "remainder is checked first and the element size is never zero"
    )]
    fn element_count(&self, bytes: &[u8]) -> Result<usize> {
        let element_size = self.element_size();

        if bytes.len() % element_size != 0 {
            return Err(Error::ElementLength {
                actual: bytes.len(),
                element_size,
            });
        }

        Ok(bytes.len() / element_size)
    }

    fn check_single_element(&self, bytes: &[u8]) -> Result<()> {
        if bytes.len() == self.element_size() {
            Ok(())
        } else {
            Err(Error::ElementLength {
                actual: bytes.len(),
                element_size: self.element_size(),
            })
        }
    }

    fn check_same_element_size(&self, other: &Self) -> Result<()> {
        if self.element_size() == other.element_size() {
            Ok(())
        } else {
            Err(Error::SizeMismatch {
                first: self.element_size(),
                second: other.element_size(),
            })
        }
    }
}

impl Clone for OpaqueVec {
    #[track_caller]
    fn clone(&self) -> Self {
        self.try_clone().or_raise()
    }
}

impl PartialEq for OpaqueVec {
    fn eq(&self, other: &Self) -> bool {
        self.element_size() == other.element_size() && self.as_bytes() == other.as_bytes()
    }
}

impl Eq for OpaqueVec {}

#[cfg(test)]
#[allow(
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    reason = "tests focus on succinct code and do not need to tick all the boxes"
)]
mod tests {
    use new_zealand::nz;
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;

    assert_impl_all!(OpaqueVec: Send, std::fmt::Debug, Clone, Eq);
    assert_not_impl_any!(OpaqueVec: Sync);

    fn u32_vec(values: &[u32]) -> OpaqueVec {
        let mut vec = OpaqueVec::builder().layout_of::<u32>().build();
        for value in values {
            vec.push(&value.to_ne_bytes());
        }
        vec
    }

    fn u32_at(vec: &OpaqueVec, index: usize) -> u32 {
        u32::from_ne_bytes(vec.at(index).try_into().unwrap())
    }

    fn u32_values(vec: &OpaqueVec) -> Vec<u32> {
        (0..vec.len()).map(|index| u32_at(vec, index)).collect()
    }

    #[test]
    fn smoke_test() {
        let mut vec = OpaqueVec::new(0, nz!(4));

        assert!(vec.is_empty());
        assert_eq!(vec.capacity(), 0);
        assert_eq!(vec.element_size(), 4);

        vec.push(&1_u32.to_ne_bytes());
        vec.push(&2_u32.to_ne_bytes());
        vec.push(&3_u32.to_ne_bytes());

        assert_eq!(vec.len(), 3);
        assert_eq!(u32_values(&vec), [1, 2, 3]);

        let mut out = [0_u8; 4];
        vec.pop(&mut out);
        assert_eq!(u32::from_ne_bytes(out), 3);
        assert_eq!(vec.len(), 2);

        vec.clear();
        assert!(vec.is_empty());
        assert!(vec.capacity() >= 3);
    }

    #[test]
    fn zero_capacity_allocates_nothing() {
        let vec = OpaqueVec::new(0, nz!(8));

        assert_eq!(vec.capacity(), 0);
        assert!(vec.as_bytes().is_empty());
    }

    #[test]
    fn pushes_are_read_back_unchanged() {
        let mut vec = OpaqueVec::new(0, nz!(4));

        for value in 0..1000_u32 {
            vec.push(&(value * 7).to_ne_bytes());
            assert_eq!(vec.len(), value as usize + 1);
        }

        for index in 0..1000 {
            assert_eq!(u32_at(&vec, index), index as u32 * 7);
        }
    }

    #[test]
    fn push_grows_by_doubling() {
        let mut vec = OpaqueVec::new(0, nz!(1));
        let mut observed = Vec::new();

        for value in 0..9_u8 {
            vec.push(&[value]);
            observed.push(vec.capacity());
        }

        assert_eq!(observed, [1, 2, 4, 4, 8, 8, 8, 8, 16]);
    }

    #[test]
    fn reserve_grows_to_exact_capacity() {
        let mut vec = u32_vec(&[5, 6]);

        vec.reserve(100);
        assert_eq!(vec.capacity(), 100);
        assert_eq!(u32_values(&vec), [5, 6]);
    }

    #[test]
    fn reserve_never_shrinks() {
        let mut vec = OpaqueVec::new(50, nz!(4));

        vec.reserve(10);
        assert_eq!(vec.capacity(), 50);
    }

    #[test]
    fn try_reserve_reports_overflow() {
        let mut vec = u32_vec(&[1]);

        let error = vec.try_reserve(usize::MAX).unwrap_err();

        assert!(matches!(
            error,
            Error::CapacityOverflow {
                operation: "reserve",
                ..
            }
        ));
        assert_eq!(vec.capacity(), 1);
        assert_eq!(u32_values(&vec), [1]);
    }

    #[test]
    #[should_panic]
    fn reserve_overflow_panics() {
        let mut vec = u32_vec(&[1]);
        vec.reserve(usize::MAX);
    }

    #[test]
    fn ensure_capacity_doubles_from_current() {
        let mut vec = OpaqueVec::new(3, nz!(4));

        vec.ensure_capacity(4);
        assert_eq!(vec.capacity(), 6);

        vec.ensure_capacity(6);
        assert_eq!(vec.capacity(), 6);

        vec.ensure_capacity(25);
        assert_eq!(vec.capacity(), 48);
    }

    #[test]
    fn ensure_capacity_starts_from_one() {
        let mut vec = OpaqueVec::new(0, nz!(4));

        vec.ensure_capacity(5);
        assert_eq!(vec.capacity(), 8);
    }

    #[test]
    fn resize_grow_zero_fills_only_new_elements() {
        let mut vec = u32_vec(&[u32::MAX, u32::MAX]);

        vec.resize(5);

        assert_eq!(vec.len(), 5);
        assert_eq!(u32_values(&vec), [u32::MAX, u32::MAX, 0, 0, 0]);
    }

    #[test]
    fn resize_zero_fills_previously_used_memory() {
        let mut vec = u32_vec(&[9, 9, 9, 9]);

        vec.resize(1);
        vec.resize(4);

        assert_eq!(u32_values(&vec), [9, 0, 0, 0]);
    }

    #[test]
    fn resize_shrink_keeps_capacity_and_prefix() {
        let mut vec = u32_vec(&[1, 2, 3, 4]);
        let capacity = vec.capacity();

        vec.resize(2);

        assert_eq!(vec.capacity(), capacity);
        assert_eq!(u32_values(&vec), [1, 2]);

        vec.resize(2);
        assert_eq!(vec.len(), 2);
    }

    #[test]
    fn at_last_index_succeeds() {
        let vec = u32_vec(&[10, 20, 30]);

        assert_eq!(u32_at(&vec, 2), 30);
    }

    #[test]
    fn at_one_past_end_is_out_of_bounds() {
        let vec = u32_vec(&[10, 20, 30]);

        let error = vec.try_at(3).unwrap_err();

        assert!(matches!(error, Error::OutOfBounds { index: 3, len: 3 }));
    }

    #[test]
    #[should_panic(expected = "index 3 is out of bounds for vector of length 3")]
    fn at_one_past_end_panics() {
        let vec = u32_vec(&[10, 20, 30]);
        _ = vec.at(3);
    }

    #[test]
    fn at_on_reserved_but_empty_is_out_of_bounds() {
        let vec = OpaqueVec::new(10, nz!(4));

        assert!(matches!(
            vec.try_at(0),
            Err(Error::OutOfBounds { index: 0, len: 0 })
        ));
    }

    #[test]
    fn at_mut_modifies_in_place() {
        let mut vec = u32_vec(&[1, 2, 3]);

        vec.at_mut(1).copy_from_slice(&99_u32.to_ne_bytes());

        assert_eq!(u32_values(&vec), [1, 99, 3]);
    }

    #[test]
    fn last_returns_final_element() {
        let mut vec = u32_vec(&[1, 2, 3]);

        assert_eq!(vec.last(), &3_u32.to_ne_bytes());

        vec.last_mut().copy_from_slice(&4_u32.to_ne_bytes());
        assert_eq!(u32_values(&vec), [1, 2, 4]);
    }

    #[test]
    fn last_on_empty_is_error() {
        let mut vec = OpaqueVec::new(4, nz!(4));

        assert!(matches!(
            vec.try_last(),
            Err(Error::EmptyContainer { operation: "last" })
        ));
        assert!(matches!(
            vec.try_last_mut(),
            Err(Error::EmptyContainer {
                operation: "last_mut"
            })
        ));
    }

    #[test]
    #[should_panic(expected = "last requires an element but the vector is empty")]
    fn last_on_empty_panics() {
        let vec = OpaqueVec::new(0, nz!(4));
        _ = vec.last();
    }

    #[test]
    fn get_and_set_copy_by_value() {
        let mut vec = u32_vec(&[1, 2, 3]);

        let mut out = [0_u8; 4];
        vec.get(1, &mut out);
        assert_eq!(u32::from_ne_bytes(out), 2);

        vec.set(1, &20_u32.to_ne_bytes());
        assert_eq!(u32_values(&vec), [1, 20, 3]);

        // The copy taken earlier is independent of the vector.
        assert_eq!(u32::from_ne_bytes(out), 2);
    }

    #[test]
    fn get_and_set_out_of_bounds_are_errors() {
        let mut vec = u32_vec(&[1]);
        let mut out = [0_u8; 4];

        assert!(matches!(
            vec.try_get(1, &mut out),
            Err(Error::OutOfBounds { index: 1, len: 1 })
        ));
        assert!(matches!(
            vec.try_set(1, &out),
            Err(Error::OutOfBounds { index: 1, len: 1 })
        ));
    }

    #[test]
    fn wrong_element_length_is_error() {
        let mut vec = u32_vec(&[1]);

        assert!(matches!(
            vec.try_push(&[1, 2, 3]),
            Err(Error::ElementLength {
                actual: 3,
                element_size: 4
            })
        ));
        assert!(matches!(
            vec.try_push(&[0; 8]),
            Err(Error::ElementLength {
                actual: 8,
                element_size: 4
            })
        ));
        assert!(matches!(
            vec.try_push_multiple(&[0; 6]),
            Err(Error::ElementLength { actual: 6, .. })
        ));
        assert!(matches!(
            vec.try_set(0, &[0; 2]),
            Err(Error::ElementLength { actual: 2, .. })
        ));

        assert_eq!(u32_values(&vec), [1]);
    }

    #[test]
    fn push_then_pop_round_trips() {
        let mut vec = u32_vec(&[1, 2]);

        vec.push(&77_u32.to_ne_bytes());

        let mut out = [0_u8; 4];
        vec.pop(&mut out);

        assert_eq!(u32::from_ne_bytes(out), 77);
        assert_eq!(u32_values(&vec), [1, 2]);
    }

    #[test]
    fn push_multiple_appends_in_order() {
        let mut vec = u32_vec(&[1]);

        let bytes: Vec<u8> = [2_u32, 3, 4]
            .iter()
            .flat_map(|value| value.to_ne_bytes())
            .collect();
        vec.push_multiple(&bytes);

        assert_eq!(u32_values(&vec), [1, 2, 3, 4]);
    }

    #[test]
    fn pop_multiple_returns_tail_in_order() {
        let mut vec = u32_vec(&[1, 2, 3, 4, 5]);

        let mut out = [0_u8; 12];
        vec.pop_multiple(&mut out);

        assert_eq!(u32_values(&vec), [1, 2]);
        assert_eq!(u32::from_ne_bytes(out[0..4].try_into().unwrap()), 3);
        assert_eq!(u32::from_ne_bytes(out[4..8].try_into().unwrap()), 4);
        assert_eq!(u32::from_ne_bytes(out[8..12].try_into().unwrap()), 5);
    }

    #[test]
    fn pop_multiple_underflow_is_error() {
        let mut vec = u32_vec(&[1, 2]);

        let mut out = [0_u8; 12];
        let error = vec.try_pop_multiple(&mut out).unwrap_err();

        assert!(matches!(
            error,
            Error::Underflow {
                requested: 3,
                len: 2
            }
        ));
        assert_eq!(u32_values(&vec), [1, 2]);
    }

    #[test]
    #[should_panic(expected = "requested 1 elements but the vector only holds 0")]
    fn pop_empty_panics() {
        let mut vec = OpaqueVec::new(0, nz!(4));
        let mut out = [0_u8; 4];
        vec.pop(&mut out);
    }

    #[test]
    fn insert_shifts_tail_up() {
        let mut vec = u32_vec(&[1, 2, 4]);

        vec.insert(2, &3_u32.to_ne_bytes());
        vec.insert(0, &0_u32.to_ne_bytes());
        vec.insert(5, &5_u32.to_ne_bytes());

        assert_eq!(u32_values(&vec), [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn insert_past_end_is_error() {
        let mut vec = u32_vec(&[1]);

        assert!(matches!(
            vec.try_insert(2, &0_u32.to_ne_bytes()),
            Err(Error::OutOfBounds { index: 2, len: 1 })
        ));
    }

    #[test]
    fn erase_preserves_order() {
        let mut vec = u32_vec(&[0, 1, 2, 3, 4]);

        vec.erase(1);
        assert_eq!(u32_values(&vec), [0, 2, 3, 4]);

        vec.erase(3);
        assert_eq!(u32_values(&vec), [0, 2, 3]);

        vec.erase(0);
        assert_eq!(u32_values(&vec), [2, 3]);
    }

    #[test]
    fn erase_from_empty_is_error() {
        let mut vec = OpaqueVec::new(0, nz!(4));

        assert!(matches!(
            vec.try_erase(0),
            Err(Error::EmptyContainer { operation: "erase" })
        ));
        assert!(matches!(
            vec.try_erase_unordered(0),
            Err(Error::EmptyContainer {
                operation: "erase_unordered"
            })
        ));
    }

    #[test]
    #[should_panic(expected = "erase requires an element but the vector is empty")]
    fn erase_from_empty_panics() {
        let mut vec = OpaqueVec::new(0, nz!(4));
        vec.erase(0);
    }

    #[test]
    fn erase_out_of_bounds_is_error() {
        let mut vec = u32_vec(&[1, 2]);

        assert!(matches!(
            vec.try_erase(2),
            Err(Error::OutOfBounds { index: 2, len: 2 })
        ));
        assert!(matches!(
            vec.try_erase_unordered(5),
            Err(Error::OutOfBounds { index: 5, len: 2 })
        ));
        assert_eq!(u32_values(&vec), [1, 2]);
    }

    #[test]
    fn erase_unordered_moves_last_into_gap() {
        let mut vec = u32_vec(&[0, 1, 2, 3, 4]);

        vec.erase_unordered(1);

        assert_eq!(u32_values(&vec), [0, 4, 2, 3]);
    }

    #[test]
    fn erase_unordered_last_leaves_rest_untouched() {
        let mut vec = u32_vec(&[0, 1, 2, 3]);

        vec.erase_unordered(3);
        assert_eq!(u32_values(&vec), [0, 1, 2]);

        vec.erase_unordered(0);
        vec.erase_unordered(0);
        vec.erase_unordered(0);
        assert!(vec.is_empty());
    }

    #[test]
    fn join_appends_and_consumes() {
        let mut first = u32_vec(&[1, 2]);
        let second = u32_vec(&[3, 4]);

        first.join(second);

        assert_eq!(u32_values(&first), [1, 2, 3, 4]);
    }

    #[test]
    fn join_mismatched_sizes_is_error() {
        let mut first = u32_vec(&[1, 2]);
        let second = OpaqueVec::from_bytes(nz!(2), &[3, 3]);

        let error = first.try_join(second).unwrap_err();

        assert!(matches!(
            error,
            Error::SizeMismatch {
                first: 4,
                second: 2
            }
        ));
        assert_eq!(u32_values(&first), [1, 2]);
    }

    #[test]
    #[should_panic(expected = "element sizes do not match: 4 vs 8")]
    fn join_mismatched_sizes_panics() {
        let mut first = u32_vec(&[1]);
        first.join(OpaqueVec::new(0, nz!(8)));
    }

    #[test]
    fn split_moves_tail() {
        let mut first = u32_vec(&[1, 2, 3, 4]);
        let mut second = u32_vec(&[]);

        first.split(2, &mut second);

        assert_eq!(u32_values(&first), [1, 2]);
        assert_eq!(u32_values(&second), [3, 4]);
    }

    #[test]
    fn split_appends_after_existing_elements() {
        let mut first = u32_vec(&[1, 2, 3]);
        let mut second = u32_vec(&[9]);

        first.split(0, &mut second);

        assert!(first.is_empty());
        assert_eq!(u32_values(&second), [9, 1, 2, 3]);
    }

    #[test]
    fn split_past_end_does_nothing() {
        let mut first = u32_vec(&[1, 2, 3, 4]);
        let mut second = u32_vec(&[]);

        first.split(10, &mut second);
        first.split(4, &mut second);

        assert_eq!(u32_values(&first), [1, 2, 3, 4]);
        assert!(second.is_empty());
    }

    #[test]
    fn split_mismatched_sizes_is_error() {
        let mut first = u32_vec(&[1, 2]);
        let mut second = OpaqueVec::new(0, nz!(1));

        assert!(matches!(
            first.try_split(0, &mut second),
            Err(Error::SizeMismatch {
                first: 4,
                second: 1
            })
        ));
        assert_eq!(u32_values(&first), [1, 2]);
    }

    #[test]
    fn clone_is_independent() {
        let mut original = u32_vec(&[1, 2, 3]);
        original.reserve(10);

        let mut copy = original.clone();

        assert_eq!(copy, original);
        assert_eq!(copy.capacity(), original.capacity());
        assert_ne!(copy.as_ptr(), original.as_ptr());

        copy.push(&4_u32.to_ne_bytes());
        copy.erase(0);
        assert_eq!(u32_values(&original), [1, 2, 3]);

        original.set(0, &100_u32.to_ne_bytes());
        assert_eq!(u32_values(&copy), [2, 3, 4]);
    }

    #[test]
    fn clone_of_unallocated_stays_unallocated() {
        let original = OpaqueVec::new(0, nz!(3));
        let copy = original.clone();

        assert_eq!(copy.capacity(), 0);
        assert_eq!(copy.element_size(), 3);
    }

    #[test]
    fn from_bytes_rejects_partial_elements() {
        let result = OpaqueVec::try_from_bytes(nz!(4), &[1, 2, 3, 4, 5]);

        assert!(matches!(
            result,
            Err(Error::ElementLength {
                actual: 5,
                element_size: 4
            })
        ));
    }

    #[test]
    fn from_bytes_sets_capacity_to_count() {
        let vec = OpaqueVec::from_bytes(nz!(2), &[1, 2, 3, 4]);

        assert_eq!(vec.len(), 2);
        assert_eq!(vec.capacity(), 2);
        assert_eq!(vec.as_bytes(), &[1, 2, 3, 4]);
    }

    #[test]
    fn aligned_layout_keeps_elements_aligned() {
        let mut vec = OpaqueVec::builder().layout_of::<u64>().build();

        for value in 0..20_u64 {
            vec.push(&value.to_ne_bytes());
        }

        for index in 0..vec.len() {
            assert_eq!(vec.at(index).as_ptr().align_offset(8), 0);
        }
    }

    #[test]
    fn padded_layout_uses_stride() {
        let layout = Layout::from_size_align(3, 4).unwrap();
        let mut vec = OpaqueVec::builder().layout(layout).build();

        vec.push(&[1, 2, 3, 0]);
        vec.push(&[4, 5, 6, 0]);

        assert_eq!(vec.element_size(), 4);
        assert_eq!(vec.as_bytes(), &[1, 2, 3, 0, 4, 5, 6, 0]);
    }

    #[test]
    fn as_bytes_mut_exposes_live_region() {
        let mut vec = OpaqueVec::from_bytes(nz!(1), &[1, 2, 3]);
        vec.reserve(10);

        assert_eq!(vec.as_bytes_mut().len(), 3);

        vec.as_bytes_mut()[1] = 20;
        assert_eq!(vec.as_bytes(), &[1, 20, 3]);
    }

    #[test]
    fn equality_compares_element_size_and_live_bytes() {
        let a = OpaqueVec::from_bytes(nz!(2), &[1, 2, 3, 4]);
        let b = OpaqueVec::from_bytes(nz!(1), &[1, 2, 3, 4]);
        let mut c = OpaqueVec::from_bytes(nz!(2), &[1, 2, 3, 4, 5, 6]);
        c.resize(2);

        assert_ne!(a, b);
        assert_eq!(a, c);
    }
}
