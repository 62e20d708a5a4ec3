//! Relationship Helper Functions
//!
//! Naming rules for everything a relationship adds to generated code:
//! foreign key columns, relationship attributes and junction tables.
//!
//! ## Ownership
//!
//! - **Many-to-One**: the FK column lives on the entity that belongs to one target
//! - **One-to-Many**: no column; the attribute is a collection of the targets
//! - **Many-to-Many**: a junction table holds FKs to both entities

use forge_core::{pluralize, table_name, to_identifier_case};

// ============================================================================
// Column and attribute names
// ============================================================================

/// Generate a foreign key column name from the referenced entity name
///
/// # Examples
///
/// - "Artist" -> "artist_id"
/// - "StatusHistory" -> "status_history_id"
pub fn generate_fk_column_name(target_entity: &str) -> String {
    format!("{}_id", to_identifier_case(target_entity))
}

/// Attribute name on the side that refers to a single target
///
/// - "Artist" -> "artist"
pub fn one_side_field_name(target_entity: &str) -> String {
    to_identifier_case(target_entity)
}

/// Attribute name on the side that refers to a collection of targets
///
/// - "Track" -> "tracks"
/// - "Category" -> "categories"
pub fn many_side_field_name(target_entity: &str) -> String {
    to_identifier_case(&pluralize(target_entity))
}

/// Column a junction table uses to point at one participant
///
/// - "Track" -> "track_id"
pub fn junction_column_name(entity: &str) -> String {
    generate_fk_column_name(entity)
}

/// `<table>.id` reference used in `ForeignKey(...)` declarations
pub fn foreign_key_target(entity: &str) -> String {
    format!("{}.id", table_name(entity))
}

// ============================================================================
// Junction tables
// ============================================================================

/// Sort an unordered entity pair lexicographically
pub fn sorted_pair<'a>(entity1: &'a str, entity2: &'a str) -> (&'a str, &'a str) {
    if entity1 <= entity2 {
        (entity1, entity2)
    } else {
        (entity2, entity1)
    }
}

/// Generate a junction table name for many-to-many relationships
///
/// The pair is sorted first, so the name does not depend on argument order.
///
/// # Examples
///
/// - ("Track", "Tag") -> "tag_tracks"
/// - ("Student", "Course") -> "course_students"
pub fn generate_junction_table_name(entity1: &str, entity2: &str) -> String {
    let (first, second) = sorted_pair(entity1, entity2);
    format!(
        "{}_{}",
        to_identifier_case(first),
        to_identifier_case(&pluralize(second))
    )
}

// ============================================================================
// Tests
// ============================================================================
