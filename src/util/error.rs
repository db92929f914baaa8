use std::alloc::Layout;
use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};

use derive_more::{Display, Error, From, IsVariant};

/// An index was outside of the initialized elements of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexOutOfBounds {
    pub index: usize,
    pub len: usize,
}

impl Display for IndexOutOfBounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Index {} out of bounds for collection with {} elements!", self.index, self.len)
    }
}

impl Error for IndexOutOfBounds {}

/// The requested capacity can't be represented, because its layout would exceed [`isize::MAX`]
/// bytes or the element count overflowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityOverflow;

impl Display for CapacityOverflow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Capacity overflow!")
    }
}

impl Error for CapacityOverflow {}

/// The [`Allocator`](crate::alloc::Allocator) couldn't satisfy a request for `layout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfMemory {
    pub layout: Layout,
}

impl Display for OutOfMemory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to allocate {} bytes with alignment {}!",
            self.layout.size(),
            self.layout.align()
        )
    }
}

impl Error for OutOfMemory {}

/// Any failure that can occur while acquiring a new block of memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From, IsVariant)]
pub enum ReserveError {
    CapacityOverflow(CapacityOverflow),
    OutOfMemory(OutOfMemory),
}

/// A failure while constructing new elements, either because memory couldn't be reserved for them
/// or because the element constructor itself returned an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructError<E> {
    Reserve(ReserveError),
    Element(E),
}

impl<E> ConstructError<E> {
    pub const fn is_reserve(&self) -> bool {
        matches!(self, ConstructError::Reserve(_))
    }

    pub const fn is_element(&self) -> bool {
        matches!(self, ConstructError::Element(_))
    }
}

impl<E> From<ReserveError> for ConstructError<E> {
    fn from(value: ReserveError) -> Self {
        ConstructError::Reserve(value)
    }
}

impl<E: Display> Display for ConstructError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConstructError::Reserve(err) => write!(f, "{}", err),
            ConstructError::Element(err) => write!(f, "Element construction failed: {}", err),
        }
    }
}

impl<E: Error + 'static> Error for ConstructError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConstructError::Reserve(err) => Some(err),
            ConstructError::Element(err) => Some(err),
        }
    }
}

/// A push which failed to reserve space for the new element. The element is handed back to the
/// caller untouched.
pub struct PushError<T> {
    pub value: T,
    pub error: ReserveError,
}

impl<T> PushError<T> {
    /// Discards the error, returning the value that couldn't be pushed.
    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T> Debug for PushError<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> Display for PushError<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Unable to push value: {}", self.error)
    }
}

impl<T> Error for PushError<T> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}
