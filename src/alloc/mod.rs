//! The allocation strategy used by [`Storage`](crate::collections::contiguous::Storage) and, through
//! it, [`Vector`](crate::collections::contiguous::Vector).
//!
//! The standard library's `Allocator` trait isn't stable, so this module provides a minimal
//! stand-in. Only allocation and deallocation are required; growing a block is always done by
//! allocating a fresh one and relocating into it, so that the old block remains intact until the
//! new one is complete.

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::util::error::OutOfMemory;

/// A source of raw memory blocks.
///
/// # Safety
/// Implementors must return blocks which are valid for reads and writes of `layout.size()` bytes,
/// aligned to `layout.align()` and not aliased by any other live block, until they are passed back
/// to [`deallocate`](Allocator::deallocate). Cloning an allocator must produce a value which can
/// deallocate blocks allocated by the original.
pub unsafe trait Allocator {
    /// Allocates a block fitting `layout`. Callers never request zero-sized layouts.
    ///
    /// # Errors
    /// Returns [`OutOfMemory`] if the request can't be satisfied. Implementations must not retry
    /// internally or abort.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, OutOfMemory>;

    /// Releases a block previously returned by [`allocate`](Allocator::allocate).
    ///
    /// # Safety
    /// `ptr` must have been allocated by this allocator (or a clone of it) with the same `layout`,
    /// and must not be used again after this call.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The global allocator, as registered with `#[global_allocator]` (or the system allocator
/// otherwise).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Global;

// SAFETY: Blocks are obtained from and returned to the global allocator, which upholds all of the
// trait's requirements for non-zero-sized layouts.
unsafe impl Allocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, OutOfMemory> {
        debug_assert!(layout.size() != 0, "Zero-sized layouts are never allocated.");
        // SAFETY: Callers never request zero-sized layouts.
        NonNull::new(unsafe { alloc::alloc(layout) }).ok_or(OutOfMemory { layout })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: The caller guarantees that ptr was allocated by the global allocator with the
        // same layout.
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
    }
}

// SAFETY: A shared reference to an allocator forwards to the same allocator, so blocks allocated
// through either can be released through either.
unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, OutOfMemory> {
        (**self).allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: Forwarded with the caller's guarantees intact.
        unsafe { (**self).deallocate(ptr, layout) }
    }
}
