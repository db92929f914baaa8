//! Error types shared by the crate, along with internal helpers.

pub mod error;

pub(crate) mod panic;
pub(crate) mod result;

#[cfg(test)]
pub(crate) mod alloc;
