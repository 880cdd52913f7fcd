//! Process-wide table registry
//!
//! Maps lowercase logical table names to their descriptors. Built once at
//! startup and injected into the executor; never mutated afterwards.

use std::collections::HashMap;

use super::errors::{RegistryError, RegistryResult};
use super::table::TableDescriptor;

/// Immutable mapping from table name to descriptor
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    tables: HashMap<String, TableDescriptor>,
}

impl TableRegistry {
    /// Starts building a registry
    pub fn builder() -> TableRegistryBuilder {
        TableRegistryBuilder::default()
    }

    /// Looks up a table by name.
    ///
    /// Names are canonicalized to lowercase at registration, so the lookup
    /// lowercases its argument too.
    pub fn describe(&self, table: &str) -> Option<&TableDescriptor> {
        self.tables.get(&table.to_lowercase())
    }

    /// Registered table names, sorted
    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Builder for [`TableRegistry`]
#[derive(Debug, Default)]
pub struct TableRegistryBuilder {
    tables: Vec<(String, TableDescriptor)>,
}

impl TableRegistryBuilder {
    /// Registers a table
    pub fn table(mut self, name: impl Into<String>, descriptor: TableDescriptor) -> Self {
        self.tables.push((name.into(), descriptor));
        self
    }

    /// Validates and freezes the registry.
    ///
    /// Rejects empty names, empty identifier fields, tables without any
    /// searchable field, and names that collide once lowercased.
    pub fn build(self) -> RegistryResult<TableRegistry> {
        let mut tables = HashMap::with_capacity(self.tables.len());

        for (name, descriptor) in self.tables {
            let canonical = name.trim().to_lowercase();
            if canonical.is_empty() {
                return Err(RegistryError::Invalid("table name must not be empty".into()));
            }
            if descriptor.id_field.trim().is_empty() {
                return Err(RegistryError::Invalid(format!(
                    "table '{}' has an empty id_field",
                    canonical
                )));
            }
            if descriptor.created_field.trim().is_empty() {
                return Err(RegistryError::Invalid(format!(
                    "table '{}' has an empty created_field",
                    canonical
                )));
            }
            if descriptor.searchable_fields().is_empty() {
                return Err(RegistryError::Invalid(format!(
                    "table '{}' has no searchable fields",
                    canonical
                )));
            }
            if descriptor.field_names().any(|f| f.trim().is_empty()) {
                return Err(RegistryError::Invalid(format!(
                    "table '{}' has an empty searchable field name",
                    canonical
                )));
            }
            if tables.insert(canonical.clone(), descriptor).is_some() {
                return Err(RegistryError::Invalid(format!(
                    "table '{}' is registered more than once",
                    canonical
                )));
            }
        }

        Ok(TableRegistry { tables })
    }
}
