//! Contiguous collection types. Namely [`Vector`] for a contiguous collection that varies in size
//! at runtime, along with [`Storage`], the raw block of memory it is built on, and the [`growth`]
//! policy it uses to decide how much memory to ask for.

pub mod growth;
pub mod storage;
pub mod vector;

#[doc(inline)]
pub use storage::Storage;
#[doc(inline)]
pub use vector::Vector;
