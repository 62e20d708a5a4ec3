//! # Forge IR (Intermediate Representation)
//!
//! This crate holds the schema model of a Flask Forge project and the
//! relationship resolver that every emitter reads from.
//!
//! ## Core Concepts
//!
//! - **Entity**: a data type that maps to a database table (e.g. Track, Artist)
//! - **Field**: a typed property of an entity that maps to a column
//! - **RelationshipDeclaration**: the user's cardinality choice for one entity pair
//! - **ResolvedSchema**: per-entity relationships plus the junction table registry
//! - **SchemaProject**: the root container read from a schema file
//!

// Module declarations
pub mod entity;
pub mod field;
pub mod project;
pub mod relationship;
pub mod relationship_helpers;
pub mod resolver;
pub mod serialization;
pub mod validation;

// Re-export commonly used types at crate root
pub use entity::Entity;
pub use field::{Field, IMPLICIT_COLUMNS, NATURAL_KEY_FIELD};
pub use project::SchemaProject;
pub use relationship::{
    DeclaredShape, RelationshipChoice, RelationshipDeclaration, ResolvedRelationship,
};
pub use relationship_helpers::{
    foreign_key_target, generate_fk_column_name, generate_junction_table_name,
    junction_column_name, many_side_field_name, one_side_field_name, sorted_pair,
};
pub use resolver::{JunctionTable, JunctionTableRegistry, ResolvedSchema, resolve};
pub use serialization::{load_project, load_project_from_bytes, load_project_from_string};
pub use validation::{ValidationResult, ValidationRule, Validator};

// Re-export core types that are commonly used with IR
pub use forge_core::{EngineError, EngineResult, FieldType, RelationKind};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient re-exports for common usage
pub mod prelude {
    pub use crate::{
        // Re-exported from core
        EngineError,
        EngineResult,
        // Schema model
        Entity,
        Field,
        FieldType,
        RelationKind,
        RelationshipChoice,
        RelationshipDeclaration,
        // Resolution
        ResolvedRelationship,
        ResolvedSchema,
        SchemaProject,
        resolve,
    };
}
