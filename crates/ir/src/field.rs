//! Field definitions for entity properties
//!
//! A field maps to one user-declared column. Implicit columns (`id`,
//! `created_at`, `updated_at`) are never stored here; emitters add them.

use forge_core::{FieldType, to_identifier_case};
use serde::{Deserialize, Serialize};

/// Field name that marks the natural display key of an entity
pub const NATURAL_KEY_FIELD: &str = "name";

/// Column names every generated model carries without being declared
pub const IMPLICIT_COLUMNS: [&str; 3] = ["id", "created_at", "updated_at"];

// ============================================================================
// Field
// ============================================================================

/// Represents a field within an entity (maps to a database column)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name as entered by the user
    #[serde(default)]
    pub name: String,

    /// Column type
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
}

impl Field {
    /// Create a new field with the given name and type
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    /// Create a string field
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    /// Create an integer field
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer)
    }

    /// Create a boolean field
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    /// Create a datetime field
    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::DateTime)
    }

    /// Column / attribute name in generated code
    ///
    /// The natural key always maps to `name`, whatever its casing.
    pub fn column_name(&self) -> String {
        if self.is_natural_key() {
            return NATURAL_KEY_FIELD.to_string();
        }
        to_identifier_case(&self.name)
    }

    /// Whether this field is skipped by every emitter
    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
    }

    /// Whether this field is the entity's natural display key (`name`, any casing)
    pub fn is_natural_key(&self) -> bool {
        self.name.eq_ignore_ascii_case(NATURAL_KEY_FIELD)
    }

    /// Whether the column collides with one of the implicit columns
    pub fn shadows_implicit_column(&self) -> bool {
        let column = self.column_name();
        IMPLICIT_COLUMNS.contains(&column.as_str())
    }
}
