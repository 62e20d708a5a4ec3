//! Schema project: the complete input of one generation run.

use crate::entity::Entity;
use crate::relationship::RelationshipDeclaration;
use crate::resolver::{ResolvedSchema, resolve};
use crate::validation::{ValidationResult, Validator};
use forge_core::sanitize_entity_name;
use serde::{Deserialize, Serialize};

/// Entities, relationship declarations and the project name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaProject {
    /// Free-text name embedded in every generated file header
    #[serde(default)]
    pub project_name: String,

    /// Entities in declaration order
    #[serde(default)]
    pub entities: Vec<Entity>,

    /// One declaration per unordered entity pair
    #[serde(default)]
    pub relationships: Vec<RelationshipDeclaration>,
}

impl SchemaProject {
    /// Create an empty project
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            ..Default::default()
        }
    }

    /// Add an entity (builder style)
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    /// Add a relationship declaration (builder style)
    pub fn with_relationship(mut self, declaration: RelationshipDeclaration) -> Self {
        self.relationships.push(declaration);
        self
    }

    /// Get an entity by exact name
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Entities with a non-empty name
    pub fn named_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| !e.is_blank())
    }

    /// Resolve the relationship graph for this project
    pub fn resolve(&self) -> ResolvedSchema {
        resolve(&self.entities, &self.relationships)
    }

    /// One pending declaration for every unordered pair of named entities
    ///
    /// Pairs follow entity order: (0,1), (0,2), ..., (1,2), ...
    pub fn pending_relationships(&self) -> Vec<RelationshipDeclaration> {
        let named: Vec<&Entity> = self.named_entities().collect();
        let mut pairs = Vec::new();
        for (i, first) in named.iter().enumerate() {
            for second in &named[i + 1..] {
                pairs.push(RelationshipDeclaration::pending(&first.name, &second.name));
            }
        }
        pairs
    }

    /// Run the default validation rules
    pub fn validate(&self) -> ValidationResult {
        Validator::with_default_rules().validate(self)
    }

    /// Copy of the project with every entity name and declaration endpoint
    /// sanitized, so hand-written schema files emit valid class names
    pub fn sanitized(&self) -> SchemaProject {
        let mut project = self.clone();
        for entity in &mut project.entities {
            entity.name = sanitize_entity_name(&entity.name);
        }
        for declaration in &mut project.relationships {
            declaration.entity_a = sanitize_entity_name(&declaration.entity_a);
            declaration.entity_b = sanitize_entity_name(&declaration.entity_b);
        }
        project
    }
}
