//! # Generation Context
//!
//! The `GenerationContext` holds everything an emitter may read: the project
//! name, the entity list and the resolved relationship graph. It is built
//! once per run and shared by reference with every emitter. Nothing in it is
//! mutable, so emitters can run in any order or on different threads.
//!
//! [`EntityInfo`] wraps one entity with the naming helpers the emitters need
//! (class, table, schema instance and route names).

use forge_core::{pluralize, to_identifier_case};
use forge_ir::{Entity, Field, JunctionTable, ResolvedRelationship, ResolvedSchema};

// ============================================================================
// GenerationContext
// ============================================================================

/// Context carrying all information needed by the emitters.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    /// Free-text project name, embedded verbatim in file headers
    pub project_name: &'a str,

    /// Entities in input order (blank names included; accessors skip them)
    entities: &'a [Entity],

    /// Resolved relationship graph
    graph: &'a ResolvedSchema,
}

impl<'a> GenerationContext<'a> {
    /// Build a context over borrowed inputs.
    pub fn new(project_name: &'a str, entities: &'a [Entity], graph: &'a ResolvedSchema) -> Self {
        Self {
            project_name,
            entities,
            graph,
        }
    }

    // ====================================================================
    // Entity accessors
    // ====================================================================

    /// Entities with a non-empty name, in input order.
    pub fn entities(&self) -> impl Iterator<Item = &'a Entity> + use<'a> {
        let entities = self.entities;
        entities.iter().filter(|e| !e.is_blank())
    }

    /// Entities wrapped with naming helpers, in input order.
    pub fn entity_infos(&self) -> impl Iterator<Item = EntityInfo<'a>> + use<'a> {
        let graph = self.graph;
        self.entities().map(move |entity| EntityInfo::new(entity, graph))
    }

    /// Whether there is at least one named entity.
    pub fn has_entities(&self) -> bool {
        self.entities().next().is_some()
    }

    // ====================================================================
    // Relationship accessors
    // ====================================================================

    /// The resolved graph.
    pub fn graph(&self) -> &'a ResolvedSchema {
        self.graph
    }

    /// Junction tables in registration order.
    pub fn junction_tables(&self) -> &'a [JunctionTable] {
        self.graph.junctions().tables()
    }
}

// ============================================================================
// EntityInfo
// ============================================================================

/// One entity plus its resolved relationships and derived names.
#[derive(Debug, Clone, Copy)]
pub struct EntityInfo<'a> {
    pub entity: &'a Entity,
    relationships: &'a [ResolvedRelationship],
}

impl<'a> EntityInfo<'a> {
    pub fn new(entity: &'a Entity, graph: &'a ResolvedSchema) -> Self {
        Self {
            entity,
            relationships: graph.relationships_for(&entity.name),
        }
    }

    /// Class name of the model (the entity name itself).
    pub fn class_name(&self) -> &'a str {
        &self.entity.name
    }

    /// The database table name (e.g. "tracks").
    pub fn table_name(&self) -> String {
        self.entity.table_name()
    }

    /// Singular identifier (e.g. "track").
    pub fn singular_name(&self) -> String {
        self.entity.identifier()
    }

    /// Plural identifier (e.g. "tracks").
    pub fn plural_name(&self) -> String {
        to_identifier_case(&pluralize(&self.entity.name))
    }

    /// Marshmallow schema class (e.g. "TrackSchema").
    pub fn schema_class(&self) -> String {
        schema_class_name(&self.entity.name)
    }

    /// Single-record schema instance (e.g. "track_schema").
    pub fn schema_instance(&self) -> String {
        format!("{}_schema", self.singular_name())
    }

    /// Collection schema instance (e.g. "tracks_schema").
    pub fn collection_schema_instance(&self) -> String {
        format!("{}_schema", self.plural_name())
    }

    /// User fields with a non-empty name.
    pub fn fields(&self) -> impl Iterator<Item = &'a Field> + use<'a> {
        let entity = self.entity;
        entity.named_fields()
    }

    /// Relationships in attachment order.
    pub fn relationships(&self) -> &'a [ResolvedRelationship] {
        self.relationships
    }

    /// Foreign key columns this entity stores, in relationship order.
    pub fn foreign_keys(&self) -> impl Iterator<Item = (&'a ResolvedRelationship, &'a str)> + use<'a> {
        let relationships = self.relationships;
        relationships.iter().filter_map(|rel| {
            rel.foreign_key_column
                .as_deref()
                .filter(|_| rel.owns_foreign_key)
                .map(|column| (rel, column))
        })
    }

    /// Attribute used by `__repr__`: the natural key column, else `id`.
    pub fn display_attribute(&self) -> String {
        self.entity
            .natural_key()
            .map(Field::column_name)
            .unwrap_or_else(|| "id".to_string())
    }

    /// Keys a create request must carry: the natural key and every owned
    /// foreign key, the same columns the model declares `nullable=False`.
    pub fn required_keys(&self) -> Vec<String> {
        self.entity
            .natural_key()
            .map(Field::column_name)
            .into_iter()
            .chain(self.foreign_keys().map(|(_, column)| column.to_string()))
            .collect()
    }
}

/// Marshmallow schema class for an entity name.
pub fn schema_class_name(entity_name: &str) -> String {
    format!("{entity_name}Schema")
}

// ============================================================================
// Tests
// ============================================================================
