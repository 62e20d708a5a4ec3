//! Validation rules and utilities for schema projects
//!
//! Validation is tooling: the resolver and emitters never call it and stay
//! total on malformed input. The generator and the CLI run it up front to
//! report problems the engine would otherwise silently degrade around.

use crate::SchemaProject;
use crate::relationship::DeclaredShape;
use forge_core::{EngineError, EngineResult, sanitize_entity_name};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Python identifier (ASCII subset)
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"));

/// Python keywords that cannot be used as attribute names
const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

// ============================================================================
// ValidationResult
// ============================================================================

/// Result of a validation operation
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    /// Whether the validation passed
    pub valid: bool,

    /// List of errors (empty if valid)
    pub errors: Vec<ValidationError>,

    /// List of warnings (non-fatal issues)
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, error: ValidationError) {
        self.valid = false;
        self.errors.push(error);
    }

    /// Add a warning to the result
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Convert to EngineResult (fails if any errors)
    pub fn to_result(self) -> EngineResult<()> {
        if self.valid {
            Ok(())
        } else {
            let msg = self
                .errors
                .iter()
                .map(|e| e.message.clone())
                .collect::<Vec<_>>()
                .join("; ");
            Err(EngineError::validation(msg))
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

// ============================================================================
// ValidationError
// ============================================================================

/// A validation error
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    /// Error code for programmatic handling
    pub code: ValidationErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Path to the problematic element (e.g., "entities.Track.fields.title")
    pub path: Option<String>,

    /// Suggested fix
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(code: ValidationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            suggestion: None,
        }
    }

    /// Add a path to the error
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add a suggestion to the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "[{}] {}", path, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

/// Error codes for validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorCode {
    // Entity errors
    DuplicateEntityName,

    // Field errors
    InvalidFieldName,
    DuplicateFieldName,
    ReservedFieldName,

    // Relationship errors
    OrphanRelationship,
    SelfRelationship,
    DuplicateRelationship,
    IncompleteRelationship,
    RelationshipNameClash,
}

// ============================================================================
// ValidationWarning
// ============================================================================

/// A validation warning (non-fatal issue)
#[derive(Debug, Clone, Serialize)]
pub struct ValidationWarning {
    /// Warning code
    pub code: ValidationWarningCode,

    /// Human-readable warning message
    pub message: String,

    /// Path to the element
    pub path: Option<String>,
}

impl ValidationWarning {
    /// Create a new warning
    pub fn new(code: ValidationWarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Add a path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "[{}] Warning: {}", path, self.message)
        } else {
            write!(f, "Warning: {}", self.message)
        }
    }
}

/// Warning codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationWarningCode {
    EmptyEntityName,
    UnsanitizedEntityName,
    EmptyFieldName,
    NoCardinality,
    EmptyProjectName,
}

// ============================================================================
// ValidationRule Trait
// ============================================================================

/// Trait for validation rules
pub trait ValidationRule {
    /// Get the rule name
    fn name(&self) -> &'static str;

    /// Get the rule description
    fn description(&self) -> &'static str;

    /// Validate a project and return the result
    fn validate(&self, project: &SchemaProject) -> ValidationResult;
}

// ============================================================================
// Validator
// ============================================================================

/// Project validator that runs multiple validation rules
#[derive(Default)]
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create a validator with default rules
    pub fn with_default_rules() -> Self {
        let mut validator = Self::new();
        validator.add_rule(Box::new(EntityNamesRule));
        validator.add_rule(Box::new(EntityFieldsRule));
        validator.add_rule(Box::new(RelationshipsRule));
        validator.add_rule(Box::new(ProjectMetaRule));
        validator
    }

    /// Add a validation rule
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Validate a project with all rules
    pub fn validate(&self, project: &SchemaProject) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for rule in &self.rules {
            let rule_result = rule.validate(project);
            tracing::debug!(
                rule = rule.name(),
                errors = rule_result.errors.len(),
                warnings = rule_result.warnings.len(),
                "Validation rule finished"
            );
            result.merge(rule_result);
        }

        result
    }
}

// ============================================================================
// Built-in Validation Rules
// ============================================================================

/// Rule: Validate entity names
pub struct EntityNamesRule;

impl ValidationRule for EntityNamesRule {
    fn name(&self) -> &'static str {
        "entity_names"
    }

    fn description(&self) -> &'static str {
        "Validates that entity names are sanitized and unique"
    }

    fn validate(&self, project: &SchemaProject) -> ValidationResult {
        let mut result = ValidationResult::ok();
        let mut seen_names: HashSet<&str> = HashSet::new();

        for (index, entity) in project.entities.iter().enumerate() {
            if entity.is_blank() {
                result.add_warning(
                    ValidationWarning::new(
                        ValidationWarningCode::EmptyEntityName,
                        "Entity has no name and will be skipped",
                    )
                    .with_path(format!("entities[{index}]")),
                );
                continue;
            }

            let entity_path = format!("entities.{}", entity.name);

            let sanitized = sanitize_entity_name(&entity.name);
            if sanitized != entity.name {
                result.add_warning(
                    ValidationWarning::new(
                        ValidationWarningCode::UnsanitizedEntityName,
                        format!(
                            "Entity name '{}' is not an alphabetic PascalCase name (expected '{}')",
                            entity.name, sanitized
                        ),
                    )
                    .with_path(&entity_path),
                );
            }

            if !seen_names.insert(entity.name.as_str()) {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::DuplicateEntityName,
                        format!("Duplicate entity name: '{}'", entity.name),
                    )
                    .with_path(&entity_path),
                );
            }
        }

        result
    }
}

/// Rule: Validate entity fields
pub struct EntityFieldsRule;

impl ValidationRule for EntityFieldsRule {
    fn name(&self) -> &'static str {
        "entity_fields"
    }

    fn description(&self) -> &'static str {
        "Validates that field names are usable, unique columns"
    }

    fn validate(&self, project: &SchemaProject) -> ValidationResult {
        let mut result = ValidationResult::ok();

        for entity in project.named_entities() {
            let entity_path = format!("entities.{}", entity.name);
            let mut seen_columns: HashSet<String> = HashSet::new();

            for (index, field) in entity.fields.iter().enumerate() {
                if field.is_blank() {
                    result.add_warning(
                        ValidationWarning::new(
                            ValidationWarningCode::EmptyFieldName,
                            "Field has no name and will be skipped",
                        )
                        .with_path(format!("{entity_path}.fields[{index}]")),
                    );
                    continue;
                }

                let field_path = format!("{}.fields.{}", entity_path, field.name);
                let column = field.column_name();

                if !is_valid_identifier(&column) {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::InvalidFieldName,
                            format!(
                                "Field name '{}' does not produce a valid Python identifier ('{}')",
                                field.name, column
                            ),
                        )
                        .with_path(&field_path)
                        .with_suggestion("Use letters, digits and underscores only"),
                    );
                }

                if field.shadows_implicit_column() {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::ReservedFieldName,
                            format!(
                                "Field '{}' collides with the generated '{}' column",
                                field.name, column
                            ),
                        )
                        .with_path(&field_path),
                    );
                }

                if !seen_columns.insert(column.clone()) {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::DuplicateFieldName,
                            format!("Duplicate field name: '{}' ({})", field.name, column),
                        )
                        .with_path(&field_path),
                    );
                }
            }
        }

        result
    }
}

/// Rule: Validate relationship declarations
pub struct RelationshipsRule;

impl ValidationRule for RelationshipsRule {
    fn name(&self) -> &'static str {
        "relationships"
    }

    fn description(&self) -> &'static str {
        "Validates that relationships are complete and reference existing entities"
    }

    fn validate(&self, project: &SchemaProject) -> ValidationResult {
        let mut result = ValidationResult::ok();
        let mut seen_pairs: HashSet<(String, String)> = HashSet::new();

        for (index, declaration) in project.relationships.iter().enumerate() {
            let a = declaration.entity_a.as_str();
            let b = declaration.entity_b.as_str();
            let rel_path = format!("relationships[{index}]");

            for name in [a, b] {
                if name.is_empty() || project.entity(name).is_none() {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::OrphanRelationship,
                            format!("Relationship references non-existent entity '{name}'"),
                        )
                        .with_path(&rel_path),
                    );
                }
            }

            if a == b {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::SelfRelationship,
                        format!("Relationship pairs '{a}' with itself"),
                    )
                    .with_path(&rel_path),
                );
            }

            let key = if a <= b {
                (a.to_string(), b.to_string())
            } else {
                (b.to_string(), a.to_string())
            };
            if !seen_pairs.insert(key) {
                result.add_error(
                    ValidationError::new(
                        ValidationErrorCode::DuplicateRelationship,
                        format!("Duplicate relationship between '{a}' and '{b}'"),
                    )
                    .with_path(&rel_path),
                );
            }

            match declaration.shape() {
                DeclaredShape::Unspecified => {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::IncompleteRelationship,
                            format!("Relationship between '{a}' and '{b}' has no cardinality chosen"),
                        )
                        .with_path(&rel_path)
                        .with_suggestion("Set both aHasMany and bHasMany, or set skip"),
                    );
                }
                DeclaredShape::NeitherHasMany => {
                    result.add_warning(
                        ValidationWarning::new(
                            ValidationWarningCode::NoCardinality,
                            format!(
                                "Neither '{a}' nor '{b}' has many and skip is not set; treated as no relationship"
                            ),
                        )
                        .with_path(&rel_path),
                    );
                }
                _ => {}
            }
        }

        let resolved = project.resolve();
        for entity in project.named_entities() {
            for rel in resolved.relationships_for(&entity.name) {
                let generated = std::iter::once(&rel.relationship_field)
                    .chain(rel.foreign_key_column.as_ref());
                for column in generated {
                    if entity.field_by_column(column).is_some() {
                        result.add_error(
                            ValidationError::new(
                                ValidationErrorCode::RelationshipNameClash,
                                format!(
                                    "Relationship to '{}' generates '{}', which is already a field of '{}'",
                                    rel.target, column, entity.name
                                ),
                            )
                            .with_path(format!("entities.{}.fields.{}", entity.name, column)),
                        );
                    }
                }
            }
        }

        result
    }
}

/// Rule: Validate project metadata
pub struct ProjectMetaRule;

impl ValidationRule for ProjectMetaRule {
    fn name(&self) -> &'static str {
        "project_meta"
    }

    fn description(&self) -> &'static str {
        "Validates project metadata"
    }

    fn validate(&self, project: &SchemaProject) -> ValidationResult {
        let mut result = ValidationResult::ok();

        if project.project_name.trim().is_empty() {
            result.add_warning(ValidationWarning::new(
                ValidationWarningCode::EmptyProjectName,
                "Project name is empty; generated headers will have no name",
            ));
        }

        result
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Check if a string is usable as a Python attribute name
pub fn is_valid_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s) && !PYTHON_KEYWORDS.contains(&s)
}

// ============================================================================
// Tests
// ============================================================================
