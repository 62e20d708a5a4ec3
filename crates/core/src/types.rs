//! Core type definitions for Flask Forge
//!
//! This module contains the field types an entity column can have and the
//! relationship kinds the resolver attaches to entities.

use serde::{Deserialize, Serialize};

// ============================================================================
// Field Types
// ============================================================================

/// Column types supported for entity fields
///
/// Deserialization never fails: unknown type tags fall back to
/// [`FieldType::String`], the default scalar mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum FieldType {
    /// Variable-length string
    #[default]
    String,
    /// Integer
    Integer,
    /// Boolean true/false
    Boolean,
    /// Date and time
    DateTime,
}

impl FieldType {
    /// All supported field types, in display order
    pub const ALL: [FieldType; 4] = [
        FieldType::String,
        FieldType::Integer,
        FieldType::Boolean,
        FieldType::DateTime,
    ];

    /// Parse a type tag, falling back to `String` for anything unknown
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "String" => FieldType::String,
            "Integer" => FieldType::Integer,
            "Boolean" => FieldType::Boolean,
            "DateTime" => FieldType::DateTime,
            other => {
                tracing::debug!(tag = other, "Unknown field type, using String");
                FieldType::String
            }
        }
    }

    /// Type tag as written in schema files
    pub fn tag(&self) -> &'static str {
        match self {
            FieldType::String => "String",
            FieldType::Integer => "Integer",
            FieldType::Boolean => "Boolean",
            FieldType::DateTime => "DateTime",
        }
    }

    /// Column type expression for Flask-SQLAlchemy
    pub fn to_sqlalchemy_type(&self) -> &'static str {
        match self {
            FieldType::String => "db.String(255)",
            FieldType::Integer => "db.Integer",
            FieldType::Boolean => "db.Boolean",
            FieldType::DateTime => "db.DateTime",
        }
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        FieldType::from_tag(&tag)
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        FieldType::from_tag(tag)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

// ============================================================================
// Relationship Kinds
// ============================================================================

/// Kind of a resolved relationship, seen from the entity that owns the entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationKind {
    /// This entity belongs to one target (stores the foreign key)
    ManyToOne,
    /// This entity has many targets (the target stores the foreign key)
    OneToMany,
    /// Both sides have many, linked through a junction table
    ManyToMany,
}

impl RelationKind {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            RelationKind::ManyToOne => "many-to-one",
            RelationKind::OneToMany => "one-to-many",
            RelationKind::ManyToMany => "many-to-many",
        }
    }

    /// Get arrow symbol for visual representation
    pub fn arrow_symbol(&self) -> &'static str {
        match self {
            RelationKind::OneToMany => "1 ───< *",
            RelationKind::ManyToOne => "* >─── 1",
            RelationKind::ManyToMany => "* >──< *",
        }
    }

    /// Whether the owning side of this kind refers to a collection
    pub fn is_collection(&self) -> bool {
        !matches!(self, RelationKind::ManyToOne)
    }

    /// Get the kind seen from the other side
    pub fn inverse(&self) -> Self {
        match self {
            RelationKind::OneToMany => RelationKind::ManyToOne,
            RelationKind::ManyToOne => RelationKind::OneToMany,
            RelationKind::ManyToMany => RelationKind::ManyToMany,
        }
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Tests
// ============================================================================
