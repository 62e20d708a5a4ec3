//! Entity definitions for data models
//!
//! This module contains the `Entity` struct: one user-defined data type that
//! becomes one storage table, one serialization schema and one route group.

use crate::field::Field;
use forge_core::{sanitize_entity_name, table_name, to_identifier_case};
use serde::{Deserialize, Serialize};

// ============================================================================
// Entity
// ============================================================================

/// Represents a data entity (maps to a database table)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Entity {
    /// Entity name (alphabetic PascalCase, e.g. "Track", "StatusHistory")
    #[serde(default)]
    pub name: String,

    /// Fields (columns) in declaration order
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Entity {
    /// Create a new entity with the given name and no fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Create an entity from free-form input, sanitizing the name
    pub fn sanitized(raw_name: &str) -> Self {
        Self::new(sanitize_entity_name(raw_name))
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Add a field (builder style)
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Add several fields (builder style)
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    // ========================================================================
    // Field management
    // ========================================================================

    /// Append a field
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Remove the field at `index`, returning it
    pub fn remove_field(&mut self, index: usize) -> Option<Field> {
        (index < self.fields.len()).then(|| self.fields.remove(index))
    }

    /// Find a field by its generated column name
    pub fn field_by_column(&self, column: &str) -> Option<&Field> {
        self.named_fields().find(|f| f.column_name() == column)
    }

    /// Fields with a non-empty name, in declaration order
    pub fn named_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_blank())
    }

    /// The natural display key, if the entity declares a `name` field
    pub fn natural_key(&self) -> Option<&Field> {
        self.named_fields().find(|f| f.is_natural_key())
    }

    // ========================================================================
    // Naming
    // ========================================================================

    /// Whether this entity is skipped by every emitter
    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
    }

    /// Storage table name (e.g. "tracks")
    pub fn table_name(&self) -> String {
        table_name(&self.name)
    }

    /// Singular identifier-cased name (e.g. "status_history")
    pub fn identifier(&self) -> String {
        to_identifier_case(&self.name)
    }
}
