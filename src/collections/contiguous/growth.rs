//! The growth policy shared by every capacity-increasing operation on a
//! [`Vector`](super::Vector).
//!
//! Growing geometrically keeps the amortized cost of a push constant: a Vector which has been
//! pushed into `n` times has only relocated `O(n)` elements in total.

/// The capacity used when growing a Vector which has no capacity at all.
pub const MIN_CAP: usize = 1;

/// The factor by which capacity is multiplied when a Vector grows.
pub const GROWTH_FACTOR: usize = 2;

/// Returns the largest capacity that a block of `T` can have without its size exceeding
/// [`isize::MAX`] bytes. Zero-sized types never allocate, so their capacity is only limited by
/// [`usize::MAX`].
pub const fn max_cap<T>() -> usize {
    match size_of::<T>() {
        0 => usize::MAX,
        size => isize::MAX as usize / size,
    }
}

/// Computes the capacity to grow to, given the `current` capacity and the `required` minimum.
///
/// The result is [`MIN_CAP`] for an empty block and `current * GROWTH_FACTOR` otherwise, raised to
/// `required` if that is larger. If the geometric step would pass `max`, but `required` doesn't,
/// the result is clamped to `max` so that growth can continue until memory is truly exhausted.
/// If `required` itself exceeds `max`, it is returned unchanged and the allocation rejects it with
/// [`CapacityOverflow`](crate::util::error::CapacityOverflow).
///
/// # Examples
/// ```
/// # use raw_vector::collections::contiguous::growth::grow_cap;
/// assert_eq!(grow_cap(0, 1, usize::MAX), 1);
/// assert_eq!(grow_cap(4, 5, usize::MAX), 8);
/// assert_eq!(grow_cap(4, 20, usize::MAX), 20);
/// assert_eq!(grow_cap(6, 7, 10), 10);
/// assert_eq!(grow_cap(6, 11, 10), 11);
/// ```
pub const fn grow_cap(current: usize, required: usize, max: usize) -> usize {
    let stepped = match current {
        0 => MIN_CAP,
        _ => current.saturating_mul(GROWTH_FACTOR),
    };
    let new_cap = if stepped > required { stepped } else { required };

    if required > max {
        required
    } else if new_cap > max {
        max
    } else {
        new_cap
    }
}
