//! Table registry
//!
//! Static configuration naming, per logical table, the identifier field and
//! the closed set of columns eligible for filtering and full-text matching.
//! Supplied explicitly at engine construction; there is no schema discovery.

mod errors;
mod loader;
mod registry;
mod table;

pub use errors::{RegistryError, RegistryResult};
pub use registry::{TableRegistry, TableRegistryBuilder};
pub use table::{FieldKind, SearchableField, TableDescriptor, DEFAULT_CREATED_FIELD};
