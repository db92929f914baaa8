//! A growable contiguous array, written from raw allocations up.
//!
//! # Purpose
//! [`Vector`](collections::contiguous::Vector) manages its own block of memory: it allocates
//! exactly the capacity it is asked for, constructs elements into uninitialized slots, and releases
//! everything itself. No part of it is built on [`Vec`].
//!
//! # Failure Model
//! Every mutating operation either succeeds or leaves the Vector exactly as it was. This holds for
//! both kinds of failure that can occur:
//! - Allocation failure. The `try_*` methods return a [`ReserveError`](util::error::ReserveError),
//!   while their panicking counterparts panic with the same message after restoring the Vector.
//! - Element construction failure. A panicking [`Clone`] or [`Default`] implementation (or an
//!   [`Err`] from a fallible constructor passed to methods like
//!   [`try_resize_with`](collections::contiguous::Vector::try_resize_with)) causes the elements
//!   constructed so far to be dropped and the fresh allocation to be released before the failure
//!   continues to the caller.
//!
//! When this crate employs errors via [`Result`]s, it does so in a method that is strongly typed,
//! using enums for static dispatch rather than dynamic, with structs (often ZSTs) that implement
//! [`Error`](std::error::Error).
//!
//! # Allocation
//! The memory for a Vector comes from an [`Allocator`](alloc::Allocator), which is
//! [`Global`](alloc::Global) by default. The trait is deliberately small: allocate a layout or
//! release one.

#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod alloc;
#[cfg(feature = "collections")]
pub mod collections;
pub mod util;
