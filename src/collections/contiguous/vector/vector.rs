use std::borrow::{Borrow, BorrowMut};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::mem::{self, ManuallyDrop};
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::slice;

use log::trace;

use crate::alloc::{Allocator, Global};
use crate::collections::contiguous::growth;
use crate::collections::contiguous::Storage;
use crate::util::error::{
    CapacityOverflow, ConstructError, IndexOutOfBounds, PushError, ReserveError,
};
use crate::util::result::ResultExtension;

/// A variable size contiguous collection, built directly on a [`Storage`] block.
///
/// A Vector holds `len` initialized values at the start of a block with room for `cap` values.
/// The remaining `cap - len` slots are allocated but uninitialized, and are never dropped.
///
/// # Failure
/// Every method that can fail offers the strong guarantee: if it fails, the Vector is exactly as
/// it was before the call, with the same elements and the same capacity. Methods which allocate
/// come in pairs, where the `try_` version returns a [`ReserveError`] and the other panics with
/// the error's message.
///
/// # Time Complexity
/// For this analysis of time complexity, variables are defined as follows:
/// - `n`: The number of items in the Vector.
/// - `i`: The index of the item in question.
/// - `m`: The number of items in the second Vector.
///
/// | Method | Complexity |
/// |-|-|
/// | `at` | `O(1)` |
/// | `len` | `O(1)` |
/// | `push` | `O(1)`*, `O(n)` |
/// | `push_unchecked` | `O(1)` |
/// | `pop` | `O(1)` |
/// | `insert` | `O(n-i)` |
/// | `remove` | `O(n-i)` |
/// | `replace` | `O(1)` |
/// | `swap` | `O(1)` |
/// | `reserve` | `O(n)`**, `O(1)` |
/// | `resize` | `O(n)` |
/// | `shrink_to_fit` | `O(n)` |
/// | `append` | `O(n+m)` |
/// | `clear` | `O(n)` |
///
/// \* If the Vector doesn't have enough capacity for the new element, `push` will take `O(n)`.
///
/// \** If the Vector already has the requested capacity, `reserve` is `O(1)`.
pub struct Vector<T, A: Allocator = Global> {
    pub(crate) buf: Storage<T, A>,
    pub(crate) len: usize,
}

impl<T> Vector<T> {
    /// Creates a new Vector with length and capacity 0. Memory will be allocated when the capacity
    /// changes.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let vec: Vector<u8> = Vector::new();
    /// assert_eq!(vec.len(), 0);
    /// assert_eq!(vec.cap(), 0);
    /// ```
    pub const fn new() -> Vector<T> {
        Vector::new_in(Global)
    }

    /// Creates a new Vector with capacity exactly equal to the provided value, allowing values to
    /// be added without reallocation.
    ///
    /// # Panics
    /// Panics if the memory layout size exceeds [`isize::MAX`] or the allocation fails.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let mut vec: Vector<u8> = Vector::with_cap(5);
    /// assert_eq!(vec.cap(), 5);
    /// vec.extend([1_u8, 2, 3, 4, 5]);
    /// assert_eq!(vec.cap(), 5);
    /// ```
    pub fn with_cap(cap: usize) -> Vector<T> {
        Vector::with_cap_in(cap, Global)
    }

    /// Creates a Vector of `count` elements, where the element at each index is the result of
    /// `f(index)`.
    ///
    /// # Panics
    /// Panics if the allocation fails. If `f` panics, all elements it has produced are dropped and
    /// the allocation is released before unwinding continues.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let squares = Vector::from_fn(4, |i| i * i);
    /// assert_eq!(squares, [0, 1, 4, 9]);
    /// ```
    pub fn from_fn<F: FnMut(usize) -> T>(count: usize, mut f: F) -> Vector<T> {
        Vector::try_from_fn_in(count, |index| Ok::<T, Infallible>(f(index)), Global)
            .map_err(reserve_only)
            .throw()
    }

    /// Creates a Vector of `count` elements using a fallible constructor.
    ///
    /// # Errors
    /// See [`Vector::try_from_fn_in`].
    pub fn try_from_fn<E, F>(count: usize, f: F) -> Result<Vector<T>, ConstructError<E>>
    where
        F: FnMut(usize) -> Result<T, E>,
    {
        Vector::try_from_fn_in(count, f, Global)
    }

    /// Creates a Vector containing `count` copies of `value`.
    ///
    /// # Panics
    /// Panics if the allocation fails. If cloning `value` panics, the clones made so far are
    /// dropped and the allocation is released before unwinding continues.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let vec = Vector::from_elem("hi", 3);
    /// assert_eq!(vec, ["hi", "hi", "hi"]);
    /// assert_eq!(vec.cap(), 3);
    /// ```
    pub fn from_elem(value: T, count: usize) -> Vector<T>
    where
        T: Clone,
    {
        Vector::from_fn(count, |_| value.clone())
    }

    /// Creates a Vector containing `count` default values.
    ///
    /// # Panics
    /// Panics if the allocation fails. A panicking [`Default`] implementation is handled the same
    /// way as in [`Vector::from_fn`].
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let vec: Vector<String> = Vector::from_default(2);
    /// assert_eq!(vec, [String::new(), String::new()]);
    /// ```
    pub fn from_default(count: usize) -> Vector<T>
    where
        T: Default,
    {
        Vector::from_fn(count, |_| T::default())
    }

    /// Creates a Vector from a type which implements [`IntoIterator`] and creates an
    /// [`ExactSizeIterator`]. The capacity of the Vector is exactly the reported length.
    ///
    /// # Panics
    /// Panics if the memory layout size exceeds [`isize::MAX`] or the allocation fails.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let vec = Vector::from_iter_sized(1_u8..=3);
    /// assert_eq!(vec, [1, 2, 3]);
    /// assert_eq!(vec.cap(), 3);
    /// ```
    pub fn from_iter_sized<I>(iter: I) -> Vector<T>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        Vector::try_from_iter_sized_in(iter, Global).throw()
    }
}

impl<T, A: Allocator> Vector<T, A> {
    /// Creates a new, empty Vector which will allocate with `alloc`.
    pub const fn new_in(alloc: A) -> Vector<T, A> {
        Vector {
            buf: Storage::new_in(alloc),
            len: 0,
        }
    }

    /// Creates a new Vector with capacity exactly equal to `cap`, allocated with `alloc`.
    ///
    /// # Panics
    /// Panics if the memory layout size exceeds [`isize::MAX`] or the allocation fails.
    pub fn with_cap_in(cap: usize, alloc: A) -> Vector<T, A> {
        Vector::try_with_cap_in(cap, alloc).throw()
    }

    /// Creates a new Vector with capacity exactly equal to `cap`, allocated with `alloc`.
    ///
    /// # Errors
    /// Returns a [`ReserveError`] if the block can't be allocated.
    pub fn try_with_cap_in(cap: usize, alloc: A) -> Result<Vector<T, A>, ReserveError> {
        Ok(Vector {
            buf: Storage::try_with_cap_in(cap, alloc)?,
            len: 0,
        })
    }

    /// Creates a Vector of `count` elements, allocated with `alloc`, where the element at each
    /// index is produced by `f(index)`. The capacity is exactly `count`.
    ///
    /// # Errors
    /// Returns [`ConstructError::Reserve`] if the block can't be allocated, or
    /// [`ConstructError::Element`] with the first error returned by `f`. In the latter case, all
    /// elements produced so far are dropped and the block is released before returning.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// # use raw_vector::alloc::Global;
    /// let parsed = Vector::try_from_fn_in(3, |i| ["1", "2", "3"][i].parse::<u8>(), Global);
    /// assert_eq!(parsed.unwrap(), [1, 2, 3]);
    ///
    /// let parsed = Vector::try_from_fn_in(3, |i| ["1", "x", "3"][i].parse::<u8>(), Global);
    /// assert!(parsed.is_err_and(|e| e.is_element()));
    /// ```
    pub fn try_from_fn_in<E, F>(count: usize, f: F, alloc: A) -> Result<Vector<T, A>, ConstructError<E>>
    where
        F: FnMut(usize) -> Result<T, E>,
    {
        let mut buf = Storage::try_with_cap_in(count, alloc)?;

        // SAFETY: The new block has exactly count free slots. If construction fails, the guard
        // inside try_construct_with drops what was built and buf releases the block as it drops.
        unsafe { buf.try_construct_with(0..count, f) }.map_err(ConstructError::Element)?;

        Ok(Vector {
            buf,
            len: count,
        })
    }

    /// Creates a Vector from an [`ExactSizeIterator`], allocated with `alloc`.
    ///
    /// # Panics
    /// Panics if the memory layout size exceeds [`isize::MAX`] or the allocation fails.
    pub fn from_iter_sized_in<I>(iter: I, alloc: A) -> Vector<T, A>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        Vector::try_from_iter_sized_in(iter, alloc).throw()
    }

    /// Creates a Vector from an [`ExactSizeIterator`], allocated with `alloc`. The capacity is
    /// exactly the length reported by the iterator. If the iterator panics, the elements taken so
    /// far are dropped along with the partially built Vector.
    ///
    /// # Errors
    /// Returns a [`ReserveError`] if the block can't be allocated.
    pub fn try_from_iter_sized_in<I>(iter: I, alloc: A) -> Result<Vector<T, A>, ReserveError>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let iter = iter.into_iter();
        let cap = iter.len();
        let mut vec = Vector::try_with_cap_in(cap, alloc)?;

        // Never trust the reported length with memory safety.
        for item in iter.take(cap) {
            // SAFETY: vec has been created with the right capacity, and take prevents overruns.
            unsafe { vec.push_unchecked(item); }
        }

        Ok(vec)
    }

    /// Returns the length of the Vector.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let vec = Vector::from_iter_sized(1_u8..=3);
    /// assert_eq!(vec.len(), 3);
    /// ```
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the Vector contains no elements.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let mut vec: Vector<u8> = Vector::new();
    /// assert!(vec.is_empty());
    /// vec.push(1);
    /// assert!(!vec.is_empty())
    /// ```
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current capacity of the Vector. Unlike [`Vec`], the capacity is guaranteed to be
    /// exactly the value provided to any of the various capacity manipulation functions.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let vec: Vector<u8> = Vector::with_cap(5);
    /// assert_eq!(vec.cap(), 5);
    /// ```
    pub const fn cap(&self) -> usize {
        self.buf.cap()
    }

    /// Returns a reference to the Vector's allocator.
    pub const fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// Returns a raw pointer to the Vector's buffer. The pointer is dangling if the Vector has
    /// never allocated.
    pub const fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    pub const fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_mut_ptr()
    }

    pub fn as_slice(&self) -> &[T] {
        self
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    /// Returns a reference to the element at `index`, checking that it is in bounds first.
    ///
    /// Indexing with `vec[index]` panics instead, while
    /// [`get_unchecked`](slice::get_unchecked) skips the check entirely.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index >= len`.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let vec = Vector::from([10, 20]);
    /// assert_eq!(vec.at(1), Ok(&20));
    /// assert!(vec.at(2).is_err());
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, IndexOutOfBounds> {
        let len = self.len;
        self.get(index).ok_or(IndexOutOfBounds { index, len })
    }

    /// Returns a mutable reference to the element at `index`, checking that it is in bounds
    /// first.
    ///
    /// # Errors
    /// Returns [`IndexOutOfBounds`] if `index >= len`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, IndexOutOfBounds> {
        let len = self.len;
        self.get_mut(index).ok_or(IndexOutOfBounds { index, len })
    }

    pub fn front(&self) -> Option<&T> {
        self.first()
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.first_mut()
    }

    pub fn back(&self) -> Option<&T> {
        self.last()
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.last_mut()
    }

    /// Push the provided value onto the end of the Vector, assuming that there is enough capacity
    /// to do so.
    ///
    /// # Safety
    /// It is up to the caller to ensure that the Vector has enough capacity to add the provided
    /// value, using methods like [`reserve`](Vector::reserve) or [`with_cap`](Vector::with_cap)
    /// to do so. Using this method on a Vector without enough capacity is undefined behavior.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let mut vec = Vector::with_cap(3);
    /// for i in 1_u8..=3 {
    ///     // SAFETY: We know that vec has enough capacity to store all three elements.
    ///     unsafe { vec.push_unchecked(i); }
    /// }
    /// assert_eq!(vec, [1, 2, 3]);
    /// ```
    pub unsafe fn push_unchecked(&mut self, value: T) {
        // SAFETY: It is up to the caller to ensure that the Vector has enough capacity for this
        // push, so the slot at len is in bounds and uninitialized.
        unsafe { self.buf.write(self.len, value); }
        self.len += 1;
    }

    /// Pops the last value off the end of the Vector, returning an owned value if the Vector has
    /// length greater than 0. Popping from an empty Vector does nothing.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let mut vec = Vector::from_iter_sized(0..5);
    /// for i in (0..vec.len()).rev() {
    ///     assert_eq!(vec.pop(), Some(i));
    /// }
    /// assert_eq!(vec.pop(), None);
    /// ```
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            // Decrement len before reading.
            self.len -= 1;

            // SAFETY: len has just been decremented and is within the capacity of the Vector. The
            // slot was initialized and is now outside of len, so it won't be dropped again.
            Some(unsafe { self.buf.read(self.len) })
        }
    }

    /// Drops all elements at or after `len`, keeping the capacity. Does nothing if `len` is not
    /// less than the current length.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let mut vec = Vector::from_iter_sized(0..5);
    /// vec.truncate(2);
    /// assert_eq!(vec, [0, 1]);
    /// assert_eq!(vec.cap(), 5);
    /// ```
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }

        let old_len = self.len;
        // Shorten first, so that a panicking drop can't cause a double drop later on.
        self.len = len;

        // SAFETY: The slots from len to old_len were initialized and are no longer tracked.
        unsafe { self.buf.drop_range(len..old_len); }
    }

    /// Drops all elements, leaving the capacity unchanged.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Exchanges the contents, capacity and allocator of two Vectors without moving any elements.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let mut a = Vector::from([1, 2, 3]);
    /// let mut b = Vector::with_cap(10);
    /// b.push(4);
    /// a.swap(&mut b);
    /// assert_eq!((a.len(), a.cap()), (1, 10));
    /// assert_eq!(b, [1, 2, 3]);
    /// ```
    pub fn swap(&mut self, other: &mut Vector<T, A>) {
        mem::swap(self, other);
    }

    /// Removes the element at the provided index, moving all following values to fill in the gap.
    ///
    /// # Panics
    /// Panics if the provided index is out of bounds.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let mut vec: Vector<_> = "Hello world!".chars().collect();
    /// assert_eq!(vec.remove(1), 'e');
    /// assert_eq!(vec.remove(4), ' ');
    /// assert_eq!(vec, "Hlloworld!".chars().collect::<Vector<_>>());
    /// ```
    pub fn remove(&mut self, index: usize) -> T {
        self.check_index(index).throw();

        // SAFETY: index < len, so the slot is initialized. Every slot after it up to len is moved
        // back by one, overwriting the (now logically uninitialized) slot at index.
        unsafe {
            let value = self.buf.read(index);
            ptr::copy(
                self.buf.slot(index + 1),
                self.buf.slot(index),
                self.len - index - 1,
            );
            self.len -= 1;
            value
        }
    }

    /// Replaces the element at the provided index with `new_value`, returning the old value.
    ///
    /// # Panics
    /// Panics if the provided index is out of bounds.
    pub fn replace(&mut self, index: usize, new_value: T) -> T {
        self.check_index(index).throw();

        mem::replace(&mut self[index], new_value)
    }

    /// Checks that the provided index refers to an initialized element.
    pub(crate) const fn check_index(&self, index: usize) -> Result<(), IndexOutOfBounds> {
        if index >= self.len {
            Err(IndexOutOfBounds {
                index,
                len: self.len,
            })
        } else {
            Ok(())
        }
    }
}

impl<T, A: Allocator + Clone> Vector<T, A> {
    /// Ensures that the Vector's capacity is at least `new_cap`. If it isn't already, a block of
    /// exactly `new_cap` slots is allocated and the elements are moved into it.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`] or
    /// the allocation fails. The Vector is unchanged in that case.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let mut vec = Vector::new();
    /// vec.reserve(10);
    /// vec.push(7);
    /// assert_eq!((vec.len(), vec.cap()), (1, 10));
    ///
    /// vec.reserve(3);
    /// assert_eq!(vec.cap(), 10);
    /// ```
    pub fn reserve(&mut self, new_cap: usize) {
        self.try_reserve(new_cap).throw()
    }

    /// Ensures that the Vector's capacity is at least `new_cap`. See [`Vector::reserve`].
    ///
    /// # Errors
    /// Returns a [`ReserveError`] if the new block can't be allocated, leaving the Vector
    /// unchanged.
    pub fn try_reserve(&mut self, new_cap: usize) -> Result<(), ReserveError> {
        if new_cap <= self.cap() {
            return Ok(());
        }

        self.try_realloc(new_cap)
    }

    /// Shrinks the Vector so that its capacity is equal to its length. An empty Vector releases
    /// its block entirely.
    ///
    /// # Panics
    /// Panics if the smaller block can't be allocated. The Vector is unchanged in that case.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let mut vec: Vector<i32> = Vector::with_cap(10);
    /// vec.extend([1, 2, 3]);
    /// vec.shrink_to_fit();
    /// assert_eq!(vec.cap(), 3);
    /// ```
    pub fn shrink_to_fit(&mut self) {
        self.try_shrink_to_fit().throw()
    }

    /// Shrinks the Vector so that its capacity is equal to its length. See
    /// [`Vector::shrink_to_fit`].
    ///
    /// # Errors
    /// Returns a [`ReserveError`] if the smaller block can't be allocated, leaving the Vector
    /// unchanged.
    pub fn try_shrink_to_fit(&mut self) -> Result<(), ReserveError> {
        if self.cap() == self.len {
            Ok(())
        } else if self.len == 0 {
            self.replace_storage(Storage::new_in(self.allocator().clone()));
            Ok(())
        } else {
            self.try_realloc(self.len)
        }
    }

    /// Push the provided value onto the end of the Vector, increasing the capacity if required.
    ///
    /// # Panics
    /// Panics if the memory layout of the Vector would have a size that exceeds [`isize::MAX`] or
    /// the allocation fails. The Vector is unchanged in that case.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let mut vec = Vector::<u8>::new();
    /// for i in 0..=5 {
    ///     vec.push(i);
    /// }
    /// assert_eq!(&*vec, &[0, 1, 2, 3, 4, 5]);
    /// ```
    pub fn push(&mut self, value: T) {
        self.try_grow_for(1).throw();
        // SAFETY: The capacity has just been adjusted to support the addition of the new item.
        unsafe { self.push_unchecked(value) }
    }

    /// Push the provided value onto the end of the Vector, increasing the capacity if required.
    ///
    /// # Errors
    /// Returns a [`PushError`] containing the value if capacity couldn't be increased. The Vector
    /// is unchanged in that case.
    pub fn try_push(&mut self, value: T) -> Result<(), PushError<T>> {
        if let Err(error) = self.try_grow_for(1) {
            return Err(PushError {
                value,
                error,
            });
        }

        // SAFETY: The capacity has just been adjusted to support the addition of the new item.
        unsafe { self.push_unchecked(value) }
        Ok(())
    }

    /// Inserts the provided value at the given index, growing and moving items as necessary. An
    /// index equal to the length appends the value.
    ///
    /// # Panics
    /// Panics if `index > len` or capacity can't be increased.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let mut vec = Vector::from_iter_sized(0..3);
    /// vec.insert(1, 100);
    /// vec.insert(1, 200);
    /// vec.insert(3, 300);
    /// vec.insert(6, 400);
    /// assert_eq!(vec, [0, 200, 100, 300, 1, 2, 400]);
    /// ```
    pub fn insert(&mut self, index: usize, value: T) {
        if index > self.len {
            Err::<(), _>(IndexOutOfBounds {
                index,
                len: self.len,
            }).throw()
        }

        self.try_grow_for(1).throw();

        // SAFETY: There is capacity for one more element. Every initialized slot from index is
        // moved forward by one, after which the slot at index is free to be written.
        unsafe {
            ptr::copy(
                self.buf.slot(index),
                self.buf.slot(index + 1),
                self.len - index,
            );
            self.buf.write(index, value);
        }
        self.len += 1;
    }

    /// Moves all elements of `other` onto the end of self, leaving `other` empty but with its
    /// capacity intact.
    ///
    /// # Panics
    /// Panics if capacity can't be increased. Neither Vector is changed in that case.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let mut a = Vector::from([1, 2]);
    /// let mut b = Vector::from([3, 4]);
    /// a.append(&mut b);
    /// assert_eq!(a, [1, 2, 3, 4]);
    /// assert!(b.is_empty());
    /// ```
    pub fn append<B: Allocator>(&mut self, other: &mut Vector<T, B>) {
        self.try_grow_for(other.len).throw();

        // SAFETY: self has room for other.len more values after its own, and other's first len
        // slots are initialized. other forgets about them straight after, so ownership moves.
        unsafe {
            ptr::copy_nonoverlapping(other.as_ptr(), self.buf.slot(self.len), other.len);
        }

        self.len += other.len;
        other.len = 0;
    }

    /// Resizes the Vector to `new_len`, dropping trailing elements or constructing new ones with
    /// `f`. Growing past the capacity reallocates to exactly `new_len`.
    ///
    /// # Panics
    /// Panics if capacity can't be increased. If `f` panics, the elements it produced are dropped
    /// while unwinding. The Vector is unchanged in both cases.
    pub fn resize_with<F: FnMut() -> T>(&mut self, new_len: usize, mut f: F) {
        self.try_resize_with(new_len, || Ok::<T, Infallible>(f()))
            .map_err(reserve_only)
            .throw()
    }

    /// Resizes the Vector to `new_len`, dropping trailing elements or constructing new ones with
    /// the fallible constructor `f`.
    ///
    /// When growing beyond the current capacity, the new elements are constructed in a fresh block
    /// before any existing element is moved into it, so that a failure never disturbs the Vector.
    ///
    /// # Errors
    /// Returns [`ConstructError::Reserve`] if capacity can't be increased, or
    /// [`ConstructError::Element`] with the first error produced by `f`. In both cases the Vector
    /// retains its previous elements and capacity.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let mut vec = Vector::from([1, 2]);
    /// let mut inputs = ["3", "4", "five"].into_iter();
    ///
    /// let result = vec.try_resize_with(5, || inputs.next().unwrap().parse::<i32>());
    /// assert!(result.is_err_and(|e| e.is_element()));
    /// assert_eq!((vec.len(), vec.cap()), (2, 2));
    /// ```
    pub fn try_resize_with<E, F>(&mut self, new_len: usize, mut f: F) -> Result<(), ConstructError<E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }

        if new_len <= self.cap() {
            // SAFETY: The slots from len to new_len are allocated and uninitialized.
            unsafe { self.buf.try_construct_with(self.len..new_len, |_| f()) }
                .map_err(ConstructError::Element)?;
        } else {
            let mut fresh = Storage::try_with_cap_in(new_len, self.allocator().clone())?;

            // SAFETY: fresh is a new block with new_len free slots. On failure, fresh only
            // releases its memory, and the existing elements haven't been touched.
            unsafe { fresh.try_construct_with(self.len..new_len, |_| f()) }
                .map_err(ConstructError::Element)?;

            // SAFETY: fresh has room for len values before the newly constructed ones, and the
            // first len slots of buf are initialized. buf is replaced immediately and only
            // releases its memory.
            unsafe { fresh.relocate_from(&self.buf, self.len); }
            self.replace_storage(fresh);
        }

        self.len = new_len;
        Ok(())
    }

    /// Moves the contents of self out, leaving self empty with no allocation.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let mut a = Vector::from([1, 2, 3]);
    /// let b = a.take();
    /// assert_eq!(b, [1, 2, 3]);
    /// assert_eq!((a.len(), a.cap()), (0, 0));
    /// ```
    pub fn take(&mut self) -> Vector<T, A> {
        let alloc = self.allocator().clone();
        mem::replace(self, Vector::new_in(alloc))
    }

    /// Replaces the contents of self with those of `other`, leaving `other` empty with no
    /// allocation. The previous contents of self are dropped.
    pub fn move_from(&mut self, other: &mut Vector<T, A>) {
        *self = other.take();
    }

    /// Ensures that there is capacity for `additional` more elements, using the growth policy.
    pub(crate) fn try_grow_for(&mut self, additional: usize) -> Result<(), ReserveError> {
        let required = self.len.checked_add(additional).ok_or(CapacityOverflow)?;

        if required <= self.cap() {
            return Ok(());
        }

        let new_cap = growth::grow_cap(self.cap(), required, growth::max_cap::<T>());
        self.try_realloc(new_cap)
    }

    /// Moves the elements into a new block of exactly `new_cap` slots. Only allocation can fail,
    /// and if it does the old block is left untouched.
    pub(crate) fn try_realloc(&mut self, new_cap: usize) -> Result<(), ReserveError> {
        debug_assert!(new_cap >= self.len, "Reallocation can't drop elements.");

        let mut fresh = Storage::try_with_cap_in(new_cap, self.allocator().clone())?;

        // SAFETY: fresh has room for new_cap >= len values and the first len slots of buf are
        // initialized. buf is replaced immediately and only releases its memory.
        unsafe { fresh.relocate_from(&self.buf, self.len); }
        self.replace_storage(fresh);

        Ok(())
    }

    /// Swaps in a new block, whose first len slots must already hold the elements, and releases
    /// the old one.
    fn replace_storage(&mut self, fresh: Storage<T, A>) {
        trace!("vector storage changed from {} to {} slots", self.cap(), fresh.cap());
        drop(mem::replace(&mut self.buf, fresh));
    }
}

impl<T: Clone, A: Allocator + Clone> Vector<T, A> {
    /// Resizes the Vector to `new_len`, dropping trailing elements or filling the new slots with
    /// clones of `value`.
    ///
    /// # Panics
    /// Panics if capacity can't be increased. If cloning panics, the clones are dropped while
    /// unwinding. The Vector is unchanged in both cases.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Vector;
    /// let mut vec = Vector::from([1, 2]);
    /// vec.resize(4, 9);
    /// assert_eq!(vec, [1, 2, 9, 9]);
    /// vec.resize(1, 0);
    /// assert_eq!(vec, [1]);
    /// ```
    pub fn resize(&mut self, new_len: usize, value: T) {
        self.try_resize(new_len, value).throw()
    }

    /// Resizes the Vector to `new_len`, filling new slots with clones of `value`.
    ///
    /// # Errors
    /// Returns a [`ReserveError`] if capacity can't be increased, leaving the Vector unchanged.
    pub fn try_resize(&mut self, new_len: usize, value: T) -> Result<(), ReserveError> {
        self.try_resize_with(new_len, || Ok::<T, Infallible>(value.clone()))
            .map_err(reserve_only)
    }

    /// Clones every element of `other` onto the end of the Vector.
    ///
    /// # Panics
    /// Panics if capacity can't be increased. If cloning panics, the clones appended by this call
    /// are dropped while unwinding and the length is unchanged.
    pub fn extend_from_slice(&mut self, other: &[T]) {
        self.try_grow_for(other.len()).throw();

        let start = self.len;
        // SAFETY: There is capacity for other.len() values after len.
        unsafe {
            self.buf.construct_with(start..start + other.len(), |index| other[index - start].clone());
        }
        self.len += other.len();
    }

    /// Clones the Vector, allocating exactly enough capacity for its elements.
    ///
    /// # Errors
    /// Returns a [`ReserveError`] if the copy can't be allocated.
    pub fn try_clone(&self) -> Result<Vector<T, A>, ReserveError> {
        let src = self.as_slice();

        Vector::try_from_fn_in(
            src.len(),
            |index| Ok::<T, Infallible>(src[index].clone()),
            self.allocator().clone(),
        ).map_err(reserve_only)
    }
}

impl<T: Default, A: Allocator + Clone> Vector<T, A> {
    /// Resizes the Vector to `new_len`, filling new slots with default values.
    ///
    /// # Panics
    /// See [`Vector::resize_with`].
    pub fn resize_default(&mut self, new_len: usize) {
        self.resize_with(new_len, T::default)
    }

    /// Resizes the Vector to `new_len`, filling new slots with default values.
    ///
    /// # Errors
    /// Returns a [`ReserveError`] if capacity can't be increased, leaving the Vector unchanged.
    pub fn try_resize_default(&mut self, new_len: usize) -> Result<(), ReserveError> {
        self.try_resize_with(new_len, || Ok::<T, Infallible>(T::default()))
            .map_err(reserve_only)
    }
}

/// Narrows an error from an infallible constructor down to its only possible variant.
fn reserve_only(err: ConstructError<Infallible>) -> ReserveError {
    match err {
        ConstructError::Reserve(err) => err,
        ConstructError::Element(never) => match never {},
    }
}

impl<T, A: Allocator + Clone> Extend<T> for Vector<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.try_grow_for(iter.size_hint().0).throw();

        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: Copy + 'a, A: Allocator + Clone> Extend<&'a T> for Vector<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(value: I) -> Self {
        let iter = value.into_iter();
        let mut vec = Vector::with_cap(iter.size_hint().0);

        for item in iter {
            vec.push(item);
        }

        vec
    }
}

impl<T, A: Allocator + Default> Default for Vector<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, A: Allocator> Drop for Vector<T, A> {
    fn drop(&mut self) {
        // SAFETY: All values less than len are initialized and safe to drop.
        unsafe { self.buf.drop_range(0..self.len); }

        // Implicitly drop self.buf, which deallocates the owned memory without touching any
        // values.
    }
}

impl<T, A: Allocator> Deref for Vector<T, A> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        // SAFETY: Vector is valid as a slice for len values, which are all initialized. The pointer
        // is nonnull, properly aligned and the range entirely contained within this Vector.
        // The borrow checker enforces that self isn't mutated due to this function taking a &self.
        // The total size is < isize::MAX as the result of being a valid Vector.
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }
}

impl<T, A: Allocator> DerefMut for Vector<T, A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: Vector is valid as a slice for len values, which are all initialized. The pointer
        // is nonnull, properly aligned and the range entirely contained within this Vector.
        // The borrow checker enforces that self isn't accessed due to this function taking a
        // &mut self. The total size is < isize::MAX as the result of being a valid Vector.
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.len) }
    }
}

impl<T, A: Allocator> AsRef<[T]> for Vector<T, A> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T, A: Allocator> AsMut<[T]> for Vector<T, A> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T, A: Allocator> Borrow<[T]> for Vector<T, A> {
    fn borrow(&self) -> &[T] {
        self
    }
}

impl<T, A: Allocator> BorrowMut<[T]> for Vector<T, A> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for Vector<T, A> {
    /// Clones the Vector into a new block with capacity equal to its length.
    ///
    /// # Panics
    /// Panics if the allocation fails. If cloning an element panics, the clones made so far are
    /// dropped and the new block is released while unwinding.
    fn clone(&self) -> Self {
        self.try_clone().throw()
    }

    /// Replaces the contents of self with a clone of `source`. The copy is built in self's allocator
    /// and completed before self is touched, so a panic while cloning leaves self unchanged.
    fn clone_from(&mut self, source: &Self) {
        let mut copy = Vector::try_from_fn_in(
            source.len(),
            |index| Ok::<T, Infallible>(source[index].clone()),
            self.allocator().clone(),
        ).map_err(reserve_only).throw();
        self.swap(&mut copy);
    }
}

impl<T: Clone> From<&[T]> for Vector<T> {
    fn from(value: &[T]) -> Self {
        Vector::from_fn(value.len(), |index| value[index].clone())
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T> {
    fn from(value: [T; N]) -> Self {
        Vector::from_iter_sized(value)
    }
}

impl<T> From<Vector<T>> for Vec<T> {
    fn from(value: Vector<T>) -> Self {
        let value = ManuallyDrop::new(value);
        // SAFETY: The block was allocated by the global allocator with the layout of
        // [T; cap], exactly as Vec expects, and the first len values are initialized. value is
        // never dropped, so ownership passes to the Vec.
        unsafe { Vec::from_raw_parts(value.buf.ptr.as_ptr(), value.len, value.buf.cap) }
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(value: Vec<T>) -> Self {
        let mut value = ManuallyDrop::new(value);
        let (len, cap) = (value.len(), value.capacity());
        // SAFETY: A Vec's pointer is never null; it is dangling when nothing is allocated.
        let ptr = unsafe { NonNull::new_unchecked(value.as_mut_ptr()) };

        Vector {
            // SAFETY: Vec allocates with the global allocator using the layout of [T; cap], and
            // uses a dangling pointer for zero-sized blocks. value is never dropped.
            buf: unsafe { Storage::from_raw_parts_in(ptr, cap, Global) },
            len,
        }
    }
}

impl<T, U, A: Allocator, B: Allocator> PartialEq<Vector<U, B>> for Vector<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &Vector<U, B>) -> bool {
        **self == **other
    }
}

impl<T: PartialEq<U>, U, A: Allocator> PartialEq<[U]> for Vector<T, A> {
    fn eq(&self, other: &[U]) -> bool {
        **self == *other
    }
}

impl<T: PartialEq<U>, U, A: Allocator> PartialEq<&[U]> for Vector<T, A> {
    fn eq(&self, other: &&[U]) -> bool {
        **self == **other
    }
}

impl<T: PartialEq<U>, U, A: Allocator, const N: usize> PartialEq<[U; N]> for Vector<T, A> {
    fn eq(&self, other: &[U; N]) -> bool {
        **self == *other
    }
}

impl<T: Eq, A: Allocator> Eq for Vector<T, A> {}

/// Vectors are ordered lexicographically, with a Vector that is a prefix of another ordered first.
impl<T: PartialOrd, A: Allocator> PartialOrd for Vector<T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (**self).partial_cmp(&**other)
    }
}

impl<T: Ord, A: Allocator> Ord for Vector<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        (**self).cmp(&**other)
    }
}

impl<T: Hash, A: Allocator> Hash for Vector<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (**self).hash(state);
    }
}

impl<T: Debug, A: Allocator> Debug for Vector<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("contents", &&**self)
            .field("len", &self.len)
            .field("cap", &self.cap())
            .finish()
    }
}

impl<T: Display, A: Allocator> Display for Vector<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (index, item) in self.iter().enumerate() {
            if index != 0 {
                write!(f, ", ")?;
            }
            Display::fmt(item, f)?;
        }
        write!(f, "]")
    }
}
