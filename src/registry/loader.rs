//! Table registry configuration loading
//!
//! The registry is supplied as a JSON document keyed by table name:
//!
//! ```json
//! {
//!   "profiles": {
//!     "id_field": "id",
//!     "searchable_fields": ["username", "bio"]
//!   },
//!   "files": {
//!     "id_field": "id",
//!     "created_field": "uploaded_at",
//!     "searchable_fields": ["name", {"name": "content_type", "kind": "enumerated"}]
//!   }
//! }
//! ```
//!
//! Missing or malformed configuration is a startup failure.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::errors::{RegistryError, RegistryResult};
use super::registry::TableRegistry;
use super::table::{FieldKind, SearchableField, TableDescriptor, DEFAULT_CREATED_FIELD};

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum FieldKindConfig {
    Text,
    Enumerated,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldConfig {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        kind: Option<FieldKindConfig>,
    },
}

impl FieldConfig {
    fn into_field(self) -> SearchableField {
        match self {
            FieldConfig::Name(name) => SearchableField::text(name),
            FieldConfig::Detailed { name, kind } => SearchableField {
                name,
                kind: match kind {
                    Some(FieldKindConfig::Enumerated) => FieldKind::Enumerated,
                    Some(FieldKindConfig::Text) | None => FieldKind::Text,
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableConfig {
    id_field: String,
    #[serde(default = "default_created_field")]
    created_field: String,
    #[serde(default)]
    searchable_fields: Vec<FieldConfig>,
}

fn default_created_field() -> String {
    DEFAULT_CREATED_FIELD.to_string()
}

impl TableConfig {
    fn into_descriptor(self, table: &str) -> RegistryResult<TableDescriptor> {
        let mut seen = HashSet::new();
        let mut descriptor =
            TableDescriptor::new(self.id_field).with_created_field(self.created_field);

        for field in self.searchable_fields.into_iter().map(FieldConfig::into_field) {
            if !seen.insert(field.name.clone()) {
                return Err(RegistryError::Invalid(format!(
                    "table '{}' lists searchable field '{}' more than once",
                    table, field.name
                )));
            }
            descriptor = descriptor.with_field(field);
        }

        Ok(descriptor)
    }
}

impl TableRegistry {
    /// Parses a registry from a JSON document
    pub fn from_json_str(json: &str) -> RegistryResult<Self> {
        Self::parse(json, "<inline>")
    }

    /// Loads a registry from a JSON file on disk
    pub fn load(path: &Path) -> RegistryResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| RegistryError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(json: &str, origin: &str) -> RegistryResult<Self> {
        // BTreeMap keeps registration (and therefore error reporting) deterministic
        let tables: BTreeMap<String, TableConfig> =
            serde_json::from_str(json).map_err(|e| RegistryError::Parse {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        let mut builder = TableRegistry::builder();
        for (name, config) in tables {
            let descriptor = config.into_descriptor(&name)?;
            builder = builder.table(name, descriptor);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONFIG: &str = r#"{
        "profiles": {
            "id_field": "id",
            "searchable_fields": ["username", "bio"]
        },
        "Files": {
            "id_field": "file_id",
            "created_field": "uploaded_at",
            "searchable_fields": ["name", {"name": "content_type", "kind": "enumerated"}]
        }
    }"#;

    #[test]
    fn test_parse_config() {
        let reg = TableRegistry::from_json_str(CONFIG).unwrap();
        assert_eq!(reg.len(), 2);

        let profiles = reg.describe("profiles").unwrap();
        assert_eq!(profiles.created_field, "created_at");
        assert_eq!(profiles.field_names().collect::<Vec<_>>(), vec!["username", "bio"]);

        let files = reg.describe("files").unwrap();
        assert_eq!(files.id_field, "file_id");
        assert_eq!(files.created_field, "uploaded_at");
        assert!(files.field("content_type").unwrap().is_enumerated());
        assert!(!files.field("name").unwrap().is_enumerated());
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let json = r#"{"packs": {"id_field": "id", "searchable_fields": ["name", "name"]}}"#;
        let err = TableRegistry::from_json_str(json).unwrap_err();
        assert!(matches!(err, RegistryError::Invalid(_)));
    }

    #[test]
    fn test_empty_field_list_rejected() {
        let json = r#"{"packs": {"id_field": "id", "searchable_fields": []}}"#;
        let err = TableRegistry::from_json_str(json).unwrap_err();
        assert!(matches!(err, RegistryError::Invalid(_)));

        let json = r#"{"packs": {"id_field": "id"}}"#;
        let err = TableRegistry::from_json_str(json).unwrap_err();
        assert!(matches!(err, RegistryError::Invalid(_)));
    }

    #[test]
    fn test_missing_id_field_is_parse_error() {
        let json = r#"{"packs": {"searchable_fields": ["name"]}}"#;
        let err = TableRegistry::from_json_str(json).unwrap_err();
        assert!(matches!(err, RegistryError::Parse { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();

        let reg = TableRegistry::load(file.path()).unwrap();
        assert_eq!(reg.table_names(), vec!["files", "profiles"]);
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = TableRegistry::load(&tmp.path().join("tables.json")).unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
    }
}
