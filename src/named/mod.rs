//! Named query storage

mod registry;

pub use registry::NamedQueryRegistry;
