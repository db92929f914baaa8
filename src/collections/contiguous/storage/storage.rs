use std::alloc::Layout;
use std::convert::Infallible;
use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::ops::Range;
use std::ptr::{self, NonNull};

use log::trace;

use crate::alloc::{Allocator, Global};
use crate::util::error::{CapacityOverflow, ReserveError};

/// An owned, uninitialized block of memory with room for exactly `cap` values of `T`.
///
/// A Storage has no knowledge of which of its slots are initialized. It never drops elements,
/// only the memory they live in, so an owner such as [`Vector`](super::super::Vector) is
/// responsible for tracking and dropping whatever it constructs. Dropping a Storage releases the
/// block.
///
/// A Storage with capacity 0 (or one holding a zero-sized type) owns no allocation at all and
/// stores a dangling pointer instead, which is never dereferenced or released.
///
/// # Time Complexity
/// | Method | Complexity |
/// |-|-|
/// | `try_with_cap_in` | `O(1)` |
/// | `write` / `read` | `O(1)` |
/// | `relocate_from` | `O(n)` |
/// | `construct_with` | `O(n)` |
/// | `drop_range` | `O(n)` |
pub struct Storage<T, A: Allocator = Global> {
    pub(crate) ptr: NonNull<T>,
    pub(crate) cap: usize,
    pub(crate) alloc: A,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T> Storage<T> {
    /// Creates a Storage with capacity 0 in the global allocator. Nothing is allocated.
    pub const fn new() -> Storage<T> {
        Storage::new_in(Global)
    }

    /// Allocates a Storage in the global allocator with room for exactly `cap` values.
    ///
    /// # Errors
    /// See [`Storage::try_with_cap_in`].
    pub fn try_with_cap(cap: usize) -> Result<Storage<T>, ReserveError> {
        Storage::try_with_cap_in(cap, Global)
    }
}

impl<T, A: Allocator> Storage<T, A> {
    /// Creates a Storage with capacity 0, which will use `alloc` if it is ever replaced by a
    /// non-empty one.
    pub const fn new_in(alloc: A) -> Storage<T, A> {
        Storage {
            ptr: NonNull::dangling(),
            cap: 0,
            alloc,
            _phantom: PhantomData,
        }
    }

    /// Allocates a Storage with room for exactly `cap` values, using `alloc`.
    ///
    /// # Errors
    /// Returns [`ReserveError::CapacityOverflow`] if the size of the block would exceed
    /// [`isize::MAX`] bytes, or [`ReserveError::OutOfMemory`] if `alloc` fails to provide it.
    ///
    /// # Examples
    /// ```
    /// # use raw_vector::collections::contiguous::Storage;
    /// let storage = Storage::<u32>::try_with_cap(8).unwrap();
    /// assert_eq!(storage.cap(), 8);
    ///
    /// assert!(Storage::<u32>::try_with_cap(usize::MAX).is_err_and(|e| e.is_capacity_overflow()));
    /// ```
    pub fn try_with_cap_in(cap: usize, alloc: A) -> Result<Storage<T, A>, ReserveError> {
        let layout = Self::make_layout(cap)?;

        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            let ptr = alloc.allocate(layout)?.cast();
            trace!("allocated block of {} slots ({} bytes) at {:p}", cap, layout.size(), ptr);
            ptr
        };

        Ok(Storage {
            ptr,
            cap,
            alloc,
            _phantom: PhantomData,
        })
    }

    /// Reassembles a Storage from a pointer, capacity and allocator.
    ///
    /// # Safety
    /// Unless the block is zero-sized (`cap == 0` or `T` is a ZST), `ptr` must have been allocated
    /// by `alloc` with the layout of `[T; cap]`. A zero-sized block must use a dangling, properly
    /// aligned pointer. Ownership of the block passes to the Storage.
    pub const unsafe fn from_raw_parts_in(ptr: NonNull<T>, cap: usize, alloc: A) -> Storage<T, A> {
        Storage {
            ptr,
            cap,
            alloc,
            _phantom: PhantomData,
        }
    }

    /// Returns the number of slots in the block.
    pub const fn cap(&self) -> usize {
        self.cap
    }

    /// Returns a reference to the allocator which owns the block.
    pub const fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns true if the Storage actually owns allocated memory, which is the case unless its
    /// layout is zero-sized.
    pub const fn is_allocated(&self) -> bool {
        self.cap != 0 && size_of::<T>() != 0
    }

    pub const fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr().cast_const()
    }

    pub const fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Returns a pointer to the slot at `index`.
    ///
    /// # Safety
    /// `index` must be `<= cap`. (A pointer to `cap` is one past the end and can't be written.)
    pub const unsafe fn slot(&self, index: usize) -> *mut T {
        // SAFETY: The caller guarantees that index is within (or one past) the allocated block,
        // whose size doesn't exceed isize::MAX.
        unsafe { self.ptr.add(index).as_ptr() }
    }

    /// Constructs `value` in the slot at `index`, without dropping whatever was there.
    ///
    /// # Safety
    /// `index` must be `< cap`. If the slot held an initialized value it is leaked.
    pub const unsafe fn write(&mut self, index: usize, value: T) {
        // SAFETY: The caller guarantees that index is in bounds.
        unsafe { self.slot(index).write(value) }
    }

    /// Moves the value out of the slot at `index`, which is left logically uninitialized.
    ///
    /// # Safety
    /// `index` must be `< cap` and the slot must be initialized. The caller must treat the slot as
    /// uninitialized afterwards.
    pub const unsafe fn read(&self, index: usize) -> T {
        // SAFETY: The caller guarantees that the slot is in bounds and initialized.
        unsafe { self.slot(index).read() }
    }

    /// Drops the values in `range` in place, leaving the slots uninitialized.
    ///
    /// # Safety
    /// Every slot in `range` must be in bounds and initialized, and must be treated as
    /// uninitialized afterwards.
    pub unsafe fn drop_range(&mut self, range: Range<usize>) {
        if range.start >= range.end {
            return;
        }

        // SAFETY: The caller guarantees that all of these slots are initialized. Dropping a slice
        // in place continues with the remaining values if one of them panics.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.slot(range.start),
                range.end - range.start,
            ));
        }
    }

    /// Moves the first `count` values of `src` into the first `count` slots of self, as a bitwise
    /// copy. The source slots are left logically uninitialized, so `src` must not drop them.
    ///
    /// # Safety
    /// `count` must be `<= self.cap` and `<= src.cap`, the first `count` slots of `src` must be
    /// initialized and the first `count` slots of self must be uninitialized (or hold values that
    /// may be leaked).
    pub const unsafe fn relocate_from<B: Allocator>(&mut self, src: &Storage<T, B>, count: usize) {
        // SAFETY: Two distinct Storages never share a block, and both are valid for count values.
        unsafe { ptr::copy_nonoverlapping(src.as_ptr(), self.as_mut_ptr(), count) }
    }

    /// Constructs a value in each slot of `range`, in order, using `f(index)`.
    ///
    /// If `f` returns an error (or panics), the values already constructed by this call are dropped
    /// before the failure is propagated, leaving all of `range` uninitialized again.
    ///
    /// # Errors
    /// Returns the first error produced by `f`.
    ///
    /// # Safety
    /// Every slot in `range` must be in bounds and uninitialized (or hold values that may be
    /// leaked).
    pub unsafe fn try_construct_with<E, F>(&mut self, range: Range<usize>, mut f: F) -> Result<(), E>
    where
        F: FnMut(usize) -> Result<T, E>,
    {
        let mut guard = ConstructGuard {
            storage: self,
            start: range.start,
            built: range.start,
        };

        for index in range {
            let value = f(index)?;
            // SAFETY: The caller guarantees that every slot in range is in bounds and free.
            unsafe { guard.storage.write(index, value); }
            guard.built += 1;
        }

        guard.disarm();
        Ok(())
    }

    /// Constructs a value in each slot of `range`, in order, using `f(index)`. If `f` panics, the
    /// values already constructed by this call are dropped while unwinding.
    ///
    /// # Safety
    /// See [`Storage::try_construct_with`].
    pub unsafe fn construct_with<F>(&mut self, range: Range<usize>, mut f: F)
    where
        F: FnMut(usize) -> T,
    {
        // SAFETY: The caller upholds the same requirements.
        let result = unsafe {
            self.try_construct_with(range, |index| Ok::<T, Infallible>(f(index)))
        };

        match result {
            Ok(()) => (),
            Err(never) => match never {},
        }
    }

    /// A helper function to create a [`Layout`] for use during allocation, containing `cap` number
    /// of elements of type `T`.
    pub(crate) fn make_layout(cap: usize) -> Result<Layout, CapacityOverflow> {
        Layout::array::<T>(cap).map_err(|_| CapacityOverflow)
    }
}

/// Drops the values which a construction run has built so far, if the run doesn't complete.
struct ConstructGuard<'a, T, A: Allocator> {
    storage: &'a mut Storage<T, A>,
    start: usize,
    built: usize,
}

impl<T, A: Allocator> ConstructGuard<'_, T, A> {
    fn disarm(self) {
        std::mem::forget(self);
    }
}

impl<T, A: Allocator> Drop for ConstructGuard<'_, T, A> {
    fn drop(&mut self) {
        // SAFETY: Exactly the slots from start to built were initialized by this run.
        unsafe { self.storage.drop_range(self.start..self.built); }
    }
}

impl<T, A: Allocator> Drop for Storage<T, A> {
    fn drop(&mut self) {
        if !self.is_allocated() {
            return;
        }

        // SAFETY: This layout was validated by make_layout when the block was allocated, so it
        // has a non-zero size that doesn't exceed isize::MAX and T's alignment is a power of two.
        let layout = unsafe {
            Layout::from_size_align_unchecked(size_of::<T>() * self.cap, align_of::<T>())
        };

        trace!("releasing block of {} slots at {:p}", self.cap, self.ptr);

        // SAFETY: The block was allocated by self.alloc with this exact layout, and nothing can
        // use it once the Storage is dropped.
        unsafe { self.alloc.deallocate(self.ptr.cast(), layout); }
    }
}

impl<T> Default for Storage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: Allocator> Debug for Storage<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("ptr", &self.ptr)
            .field("cap", &self.cap)
            .finish()
    }
}

// SAFETY: A Storage uniquely owns its block, so it can be sent to another thread whenever the
// values it holds and its allocator can be.
unsafe impl<T: Send, A: Allocator + Send> Send for Storage<T, A> {}
// SAFETY: Storage's API only hands out raw pointers through shared references, which require unsafe
// code to use. No interior mutability occurs.
unsafe impl<T: Sync, A: Allocator + Sync> Sync for Storage<T, A> {}
