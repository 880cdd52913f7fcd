//! # Authorization Gate
//!
//! Validates a requested table/column pair against the table registry and an
//! optional caller-supplied table allowlist.
//!
//! Check order (first failure wins):
//! 1. Table exists in the registry
//! 2. Table is in the allowlist, when a non-empty allowlist is supplied
//! 3. Column, when supplied, is a searchable field of the table

use std::collections::HashSet;

use super::errors::{AuthError, AuthResult};
use crate::registry::{TableDescriptor, TableRegistry};

/// Set of table names a caller may query.
///
/// Entries are lowercased on construction. An empty allowlist imposes no
/// restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allowlist {
    tables: HashSet<String>,
}

impl Allowlist {
    pub fn new<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tables: tables
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    /// Checks membership of an already-lowercased table name
    pub fn contains(&self, table: &str) -> bool {
        self.tables.contains(table)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Allowlist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Allowlist::new(iter)
    }
}

/// Table/column authorization against a registry
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationGate<'a> {
    registry: &'a TableRegistry,
}

impl<'a> AuthorizationGate<'a> {
    pub fn new(registry: &'a TableRegistry) -> Self {
        Self { registry }
    }

    /// Authorizes access and returns the resolved descriptor, so callers can
    /// fan out over searchable fields without resolving the table again.
    pub fn authorize(
        &self,
        table: &str,
        column: Option<&str>,
        allowlist: Option<&Allowlist>,
    ) -> AuthResult<&'a TableDescriptor> {
        let table = table.to_lowercase();

        let descriptor = self
            .registry
            .describe(&table)
            .ok_or_else(|| AuthError::UnknownTable {
                table: table.clone(),
            })?;

        if let Some(allowlist) = allowlist {
            if !allowlist.is_empty() && !allowlist.contains(&table) {
                return Err(AuthError::TableNotAllowed { table });
            }
        }

        if let Some(column) = column {
            if !descriptor.is_searchable(column) {
                return Err(AuthError::ColumnNotSearchable {
                    table,
                    column: column.to_string(),
                });
            }
        }

        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TableRegistry {
        TableRegistry::builder()
            .table(
                "profiles",
                TableDescriptor::new("id")
                    .with_text_field("username")
                    .with_text_field("bio"),
            )
            .table("packs", TableDescriptor::new("id").with_text_field("name"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_authorize_known_table() {
        let reg = registry();
        let gate = AuthorizationGate::new(&reg);

        let desc = gate.authorize("Profiles", Some("bio"), None).unwrap();
        assert_eq!(desc.id_field, "id");
    }

    #[test]
    fn test_unknown_table_precedes_column_check() {
        let reg = registry();
        let gate = AuthorizationGate::new(&reg);

        let err = gate.authorize("posts", Some("nope"), None).unwrap_err();
        assert_eq!(
            err,
            AuthError::UnknownTable {
                table: "posts".into()
            }
        );
    }

    #[test]
    fn test_allowlist_excludes_valid_table() {
        let reg = registry();
        let gate = AuthorizationGate::new(&reg);
        let allow = Allowlist::new(["packs"]);

        let err = gate.authorize("profiles", None, Some(&allow)).unwrap_err();
        assert!(matches!(err, AuthError::TableNotAllowed { .. }));
    }

    #[test]
    fn test_allowlist_precedes_column_check() {
        let reg = registry();
        let gate = AuthorizationGate::new(&reg);
        let allow = Allowlist::new(["packs"]);

        let err = gate
            .authorize("profiles", Some("password_hash"), Some(&allow))
            .unwrap_err();
        assert!(matches!(err, AuthError::TableNotAllowed { .. }));
    }

    #[test]
    fn test_empty_allowlist_is_unrestricted() {
        let reg = registry();
        let gate = AuthorizationGate::new(&reg);

        assert!(gate
            .authorize("profiles", None, Some(&Allowlist::default()))
            .is_ok());
    }

    #[test]
    fn test_allowlist_is_case_insensitive() {
        let reg = registry();
        let gate = AuthorizationGate::new(&reg);
        let allow: Allowlist = ["PACKS"].into_iter().collect();

        assert!(gate.authorize("Packs", None, Some(&allow)).is_ok());
    }

    #[test]
    fn test_column_not_searchable() {
        let reg = registry();
        let gate = AuthorizationGate::new(&reg);

        let err = gate
            .authorize("profiles", Some("display_name"), None)
            .unwrap_err();
        assert_eq!(
            err,
            AuthError::ColumnNotSearchable {
                table: "profiles".into(),
                column: "display_name".into()
            }
        );
    }
}
