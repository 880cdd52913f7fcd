//! Table descriptors: identifier field and searchable columns

/// How a searchable field participates in full-text fan-out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    /// Free text, matched by case-insensitive containment
    #[default]
    Text,
    /// Categorical values (content types, states), matched by exact equality
    Enumerated,
}

/// A column eligible for filtering and full-text matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchableField {
    pub name: String,
    pub kind: FieldKind,
}

impl SearchableField {
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Text,
        }
    }

    pub fn enumerated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Enumerated,
        }
    }

    pub fn is_enumerated(&self) -> bool {
        self.kind == FieldKind::Enumerated
    }
}

/// Default column used as the store-level ordering tiebreak
pub const DEFAULT_CREATED_FIELD: &str = "created_at";

/// Registry entry for one logical table
///
/// Immutable once registered. Field order is preserved so that full-text
/// fan-out produces a deterministic disjunction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    /// Column holding the record identifier
    pub id_field: String,
    /// Column holding the creation timestamp
    pub created_field: String,
    searchable_fields: Vec<SearchableField>,
}

impl TableDescriptor {
    /// Creates a descriptor with no searchable fields.
    ///
    /// At least one field must be added before the table is registered;
    /// the registry builder rejects descriptors without any.
    pub fn new(id_field: impl Into<String>) -> Self {
        Self {
            id_field: id_field.into(),
            created_field: DEFAULT_CREATED_FIELD.to_string(),
            searchable_fields: Vec::new(),
        }
    }

    /// Overrides the creation-time column
    pub fn with_created_field(mut self, field: impl Into<String>) -> Self {
        self.created_field = field.into();
        self
    }

    /// Adds a searchable field. A later entry with the same name replaces the earlier one.
    pub fn with_field(mut self, field: SearchableField) -> Self {
        match self
            .searchable_fields
            .iter_mut()
            .find(|f| f.name == field.name)
        {
            Some(existing) => *existing = field,
            None => self.searchable_fields.push(field),
        }
        self
    }

    pub fn with_text_field(self, name: impl Into<String>) -> Self {
        self.with_field(SearchableField::text(name))
    }

    pub fn with_enumerated_field(self, name: impl Into<String>) -> Self {
        self.with_field(SearchableField::enumerated(name))
    }

    /// Searchable fields in registration order
    pub fn searchable_fields(&self) -> &[SearchableField] {
        &self.searchable_fields
    }

    /// Looks up a searchable field by exact name
    pub fn field(&self, name: &str) -> Option<&SearchableField> {
        self.searchable_fields.iter().find(|f| f.name == name)
    }

    pub fn is_searchable(&self, column: &str) -> bool {
        self.field(column).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.searchable_fields.iter().map(|f| f.name.as_str())
    }
}
