//! A module containing [`Vector`] and associtated types.
//!
//! Currently, the only other included type is [`IntoIter`] for owned iteration over a Vector.
//! [`IterMut`](std::slice::IterMut) and [`Iter`](std::slice::Iter) from [`std::slice`] are used
//! for borrowed iteration.
//!
//! [`Vector`] is also re-exported under the parent module, and can be created from a list of
//! values with the [`vector!`](crate::vector) macro.

mod iter;
mod tests;
mod vector;

pub use iter::*;
pub use vector::*;

/// Creates a [`Vector`] containing the arguments, with capacity equal to the number of elements.
///
/// Like an array expression, the macro accepts either a list of elements or an element and a
/// count. The second form clones the element, see [`Vector::from_elem`].
///
/// # Examples
/// ```
/// # use raw_vector::vector;
/// let vec = vector![1, 2, -2, -1];
/// assert_eq!(vec, [1, 2, -2, -1]);
///
/// let vec = vector!["a"; 3];
/// assert_eq!(vec, ["a", "a", "a"]);
/// ```
#[macro_export]
macro_rules! vector {
    () => (
        $crate::collections::contiguous::Vector::new()
    );
    ($elem:expr; $n:expr) => (
        $crate::collections::contiguous::Vector::from_elem($elem, $n)
    );
    ($($x:expr),+ $(,)?) => (
        $crate::collections::contiguous::Vector::from([$($x),+])
    );
}
