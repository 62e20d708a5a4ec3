//! Relationship Resolver
//!
//! Turns the raw entity list and relationship declarations into a
//! [`ResolvedSchema`]: one ordered list of [`ResolvedRelationship`] per entity
//! plus a [`JunctionTableRegistry`]. Every cardinality and ownership decision
//! is made here, once, so the emitters cannot disagree with each other.
//!
//! ## Algorithm
//!
//! ```text
//! for each declaration, in input order
//!   skip               → nothing
//!   A belongs to B     → A: many-to-one (owns <b>_id), B: one-to-many
//!   B belongs to A     → B: many-to-one (owns <a>_id), A: one-to-many
//!   many-to-many       → both many-to-many, junction registered once per sorted pair
//!   anything else      → nothing (logged)
//! ```
//!
//! Resolution is total and deterministic: the same input always produces the
//! same graph, and malformed declarations only ever lose a relationship.

use crate::entity::Entity;
use crate::relationship::{DeclaredShape, RelationshipDeclaration, ResolvedRelationship};
use crate::relationship_helpers::{generate_junction_table_name, sorted_pair};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// JunctionTableRegistry
// ============================================================================

/// A many-to-many association table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JunctionTable {
    /// Canonical table name
    pub name: String,

    /// Lexicographically smaller entity name of the pair
    pub left: String,

    /// Lexicographically larger entity name of the pair
    pub right: String,
}

/// Canonical junction table per unordered entity pair
///
/// Tables are remembered in registration order so emitters can declare them
/// deterministically, exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JunctionTableRegistry {
    tables: Vec<JunctionTable>,
    by_pair: BTreeMap<(String, String), usize>,
}

impl JunctionTableRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the table for a pair, registering it on first sight
    ///
    /// Argument order does not matter.
    pub fn get_or_register(&mut self, entity1: &str, entity2: &str) -> &JunctionTable {
        let (left, right) = sorted_pair(entity1, entity2);
        let key = (left.to_string(), right.to_string());

        let index = match self.by_pair.get(&key) {
            Some(&index) => index,
            None => {
                let table = JunctionTable {
                    name: generate_junction_table_name(left, right),
                    left: key.0.clone(),
                    right: key.1.clone(),
                };
                tracing::debug!(table = %table.name, "Registered junction table");
                self.tables.push(table);
                self.by_pair.insert(key, self.tables.len() - 1);
                self.tables.len() - 1
            }
        };

        &self.tables[index]
    }

    /// Find the table for a pair without registering
    pub fn get(&self, entity1: &str, entity2: &str) -> Option<&JunctionTable> {
        let (left, right) = sorted_pair(entity1, entity2);
        self.by_pair
            .get(&(left.to_string(), right.to_string()))
            .map(|&i| &self.tables[i])
    }

    /// All tables in registration order
    pub fn tables(&self) -> &[JunctionTable] {
        &self.tables
    }

    /// Number of registered tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no table has been registered
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

// ============================================================================
// ResolvedSchema
// ============================================================================

/// Resolved relationship graph for one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSchema {
    relationships: HashMap<String, Vec<ResolvedRelationship>>,
    junctions: JunctionTableRegistry,
}

impl ResolvedSchema {
    /// Relationships attached to an entity, in attachment order
    pub fn relationships_for(&self, entity_name: &str) -> &[ResolvedRelationship] {
        self.relationships
            .get(entity_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Shared junction table registry
    pub fn junctions(&self) -> &JunctionTableRegistry {
        &self.junctions
    }

    /// Total number of resolved relationship entries (both sides counted)
    pub fn relationship_count(&self) -> usize {
        self.relationships.values().map(Vec::len).sum()
    }

    fn attach(&mut self, owner: &str, relationship: ResolvedRelationship) {
        self.relationships
            .entry(owner.to_string())
            .or_default()
            .push(relationship);
    }
}

// ============================================================================
// resolve
// ============================================================================

/// Resolve relationship declarations against an entity list
pub fn resolve(entities: &[Entity], declarations: &[RelationshipDeclaration]) -> ResolvedSchema {
    let mut schema = ResolvedSchema::default();

    for declaration in declarations {
        let a = declaration.entity_a.as_str();
        let b = declaration.entity_b.as_str();

        if !is_known(entities, a) || !is_known(entities, b) {
            tracing::warn!(
                entity_a = a,
                entity_b = b,
                "Relationship references an unknown entity, skipping"
            );
            continue;
        }

        match declaration.shape() {
            DeclaredShape::Skip => {}
            DeclaredShape::ABelongsToB => {
                schema.attach(a, ResolvedRelationship::many_to_one(a, b));
                schema.attach(b, ResolvedRelationship::one_to_many(b, a));
            }
            DeclaredShape::BBelongsToA => {
                schema.attach(a, ResolvedRelationship::one_to_many(a, b));
                schema.attach(b, ResolvedRelationship::many_to_one(b, a));
            }
            DeclaredShape::ManyToMany => {
                let junction = schema.junctions.get_or_register(a, b).name.clone();
                schema.attach(a, ResolvedRelationship::many_to_many(a, b, &junction));
                schema.attach(b, ResolvedRelationship::many_to_many(b, a, junction));
            }
            shape @ (DeclaredShape::NeitherHasMany | DeclaredShape::Unspecified) => {
                // Fallback for declarations that break the skip-or-both-flags
                // precondition: the pair simply gets no relationship.
                tracing::warn!(
                    entity_a = a,
                    entity_b = b,
                    ?shape,
                    "Relationship has no usable cardinality, treating as no relationship"
                );
            }
        }
    }

    tracing::debug!(
        relationships = schema.relationship_count(),
        junction_tables = schema.junctions.len(),
        "Resolved relationship graph"
    );

    schema
}

fn is_known(entities: &[Entity], name: &str) -> bool {
    !name.is_empty() && entities.iter().any(|e| e.name == name)
}

// ============================================================================
// Tests
// ============================================================================
