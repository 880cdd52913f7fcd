//! Data store collaborator
//!
//! The executor talks to storage only through [`DataStore`]. [`MemoryStore`]
//! is the in-process implementation, built on [`PredicateFilter`].

mod backend;
mod errors;
mod filter;
mod memory;

pub use backend::{DataStore, OrderBy, Row};
pub use errors::{StoreError, StoreResult};
pub use filter::{compare_for_sort, compare_scalars, values_equal, PredicateFilter};
pub use memory::MemoryStore;
