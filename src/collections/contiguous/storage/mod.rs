//! A module containing [`Storage`], the raw block of memory underneath a
//! [`Vector`](super::Vector).
//!
//! [`Storage`] is also re-exported under the parent module.

mod storage;

pub use storage::*;
