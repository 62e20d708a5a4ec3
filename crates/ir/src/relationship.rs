//! Relationship declarations and resolved relationships
//!
//! A [`RelationshipDeclaration`] is the raw user choice for one unordered
//! pair of entities. The resolver turns declarations into
//! [`ResolvedRelationship`] entries attached to each participating entity.

use crate::relationship_helpers::{
    generate_fk_column_name, generate_junction_table_name, many_side_field_name,
    one_side_field_name,
};
use forge_core::{RelationKind, pluralize};
use serde::{Deserialize, Serialize};

// ============================================================================
// RelationshipDeclaration
// ============================================================================

/// User-chosen cardinality between two entities
///
/// Either `skip` is set, or both `a_has_many` and `b_has_many` are set.
/// Anything else is a caller error that the resolver treats as "no relationship".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDeclaration {
    /// First entity of the pair
    #[serde(alias = "entity1")]
    pub entity_a: String,

    /// Second entity of the pair
    #[serde(alias = "entity2")]
    pub entity_b: String,

    /// Whether A relates to many B records
    #[serde(default, alias = "entity1HasMany")]
    pub a_has_many: Option<bool>,

    /// Whether B relates to many A records
    #[serde(default, alias = "entity2HasMany")]
    pub b_has_many: Option<bool>,

    /// Explicit "no direct relationship"
    #[serde(default, alias = "skipRelationship")]
    pub skip: bool,
}

/// How a declaration reads once its flags are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredShape {
    /// Explicitly no relationship
    Skip,
    /// A stores the foreign key to B
    ABelongsToB,
    /// B stores the foreign key to A
    BBelongsToA,
    /// Junction table between A and B
    ManyToMany,
    /// Both flags false without `skip`; resolved as no relationship
    NeitherHasMany,
    /// At least one flag unset without `skip`; resolved as no relationship
    Unspecified,
}

impl RelationshipDeclaration {
    /// Create an undecided declaration for a pair
    pub fn pending(entity_a: impl Into<String>, entity_b: impl Into<String>) -> Self {
        Self {
            entity_a: entity_a.into(),
            entity_b: entity_b.into(),
            ..Default::default()
        }
    }

    /// Create a declaration with explicit flags
    pub fn new(
        entity_a: impl Into<String>,
        entity_b: impl Into<String>,
        a_has_many: bool,
        b_has_many: bool,
    ) -> Self {
        Self {
            entity_a: entity_a.into(),
            entity_b: entity_b.into(),
            a_has_many: Some(a_has_many),
            b_has_many: Some(b_has_many),
            skip: false,
        }
    }

    /// "No direct relationship" between A and B
    pub fn skip(entity_a: impl Into<String>, entity_b: impl Into<String>) -> Self {
        RelationshipChoice::None.declare(entity_a, entity_b)
    }

    /// A belongs to one B (A stores `<b>_id`)
    pub fn belongs_to(entity_a: impl Into<String>, entity_b: impl Into<String>) -> Self {
        RelationshipChoice::ABelongsToB.declare(entity_a, entity_b)
    }

    /// Many A relate to many B through a junction table
    pub fn many_to_many(entity_a: impl Into<String>, entity_b: impl Into<String>) -> Self {
        RelationshipChoice::ManyToMany.declare(entity_a, entity_b)
    }

    /// Interpret the flags
    pub fn shape(&self) -> DeclaredShape {
        if self.skip {
            return DeclaredShape::Skip;
        }
        match (self.a_has_many, self.b_has_many) {
            (Some(false), Some(true)) => DeclaredShape::ABelongsToB,
            (Some(true), Some(false)) => DeclaredShape::BBelongsToA,
            (Some(true), Some(true)) => DeclaredShape::ManyToMany,
            (Some(false), Some(false)) => DeclaredShape::NeitherHasMany,
            _ => DeclaredShape::Unspecified,
        }
    }

    /// Whether the declaration satisfies the skip-or-both-flags invariant
    pub fn is_well_formed(&self) -> bool {
        self.skip || (self.a_has_many.is_some() && self.b_has_many.is_some())
    }

    /// The choice this declaration represents, if it is a complete one
    pub fn choice(&self) -> Option<RelationshipChoice> {
        match self.shape() {
            DeclaredShape::Skip => Some(RelationshipChoice::None),
            DeclaredShape::ABelongsToB => Some(RelationshipChoice::ABelongsToB),
            DeclaredShape::BBelongsToA => Some(RelationshipChoice::BBelongsToA),
            DeclaredShape::ManyToMany => Some(RelationshipChoice::ManyToMany),
            DeclaredShape::NeitherHasMany | DeclaredShape::Unspecified => None,
        }
    }

    /// Overwrite the flags with a choice
    pub fn apply(&mut self, choice: RelationshipChoice) {
        let (a_has_many, b_has_many, skip) = choice.flags();
        self.a_has_many = Some(a_has_many);
        self.b_has_many = Some(b_has_many);
        self.skip = skip;
    }

    /// Whether this declaration is about the given unordered pair
    pub fn is_pair(&self, first: &str, second: &str) -> bool {
        (self.entity_a == first && self.entity_b == second)
            || (self.entity_a == second && self.entity_b == first)
    }
}

// ============================================================================
// RelationshipChoice
// ============================================================================

/// The four cardinalities a user can pick for a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipChoice {
    /// No direct relationship
    None,
    /// A belongs to one B
    ABelongsToB,
    /// B belongs to one A
    BBelongsToA,
    /// Many-to-many through a junction table
    ManyToMany,
}

impl RelationshipChoice {
    /// All choices, in menu order
    pub const ALL: [RelationshipChoice; 4] = [
        RelationshipChoice::None,
        RelationshipChoice::ABelongsToB,
        RelationshipChoice::BBelongsToA,
        RelationshipChoice::ManyToMany,
    ];

    /// `(a_has_many, b_has_many, skip)`
    pub fn flags(&self) -> (bool, bool, bool) {
        match self {
            RelationshipChoice::None => (false, false, true),
            RelationshipChoice::ABelongsToB => (false, true, false),
            RelationshipChoice::BBelongsToA => (true, false, false),
            RelationshipChoice::ManyToMany => (true, true, false),
        }
    }

    /// Build a well-formed declaration for the pair
    pub fn declare(
        &self,
        entity_a: impl Into<String>,
        entity_b: impl Into<String>,
    ) -> RelationshipDeclaration {
        let mut declaration = RelationshipDeclaration::pending(entity_a, entity_b);
        declaration.apply(*self);
        declaration
    }

    /// Menu label for the pair
    pub fn label(&self, entity_a: &str, entity_b: &str) -> String {
        match self {
            RelationshipChoice::None => {
                "No direct relationship (they may connect through other tables)".to_string()
            }
            RelationshipChoice::ABelongsToB => format!(
                "{entity_a} belongs to ONE {entity_b} (adds {} to {entity_a})",
                generate_fk_column_name(entity_b)
            ),
            RelationshipChoice::BBelongsToA => format!(
                "{entity_b} belongs to ONE {entity_a} (adds {} to {entity_b})",
                generate_fk_column_name(entity_a)
            ),
            RelationshipChoice::ManyToMany => format!(
                "Many-to-Many: {} <-> {} (creates bridge table)",
                pluralize(entity_a),
                pluralize(entity_b)
            ),
        }
    }

    /// One-line preview of what the choice generates, if anything
    pub fn preview(&self, entity_a: &str, entity_b: &str) -> Option<String> {
        match self {
            RelationshipChoice::None => None,
            RelationshipChoice::ABelongsToB => Some(format!(
                "{entity_a}.{} -> {entity_b}.id",
                generate_fk_column_name(entity_b)
            )),
            RelationshipChoice::BBelongsToA => Some(format!(
                "{entity_b}.{} -> {entity_a}.id",
                generate_fk_column_name(entity_a)
            )),
            RelationshipChoice::ManyToMany => Some(format!(
                "{} bridge table",
                generate_junction_table_name(entity_a, entity_b)
            )),
        }
    }
}

// ============================================================================
// ResolvedRelationship
// ============================================================================

/// One side of a resolved relationship, attached to its owning entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRelationship {
    /// Kind seen from the owning entity
    pub kind: RelationKind,

    /// Target entity name
    pub target: String,

    /// Attribute name on the owning entity
    pub relationship_field: String,

    /// Attribute name on the target entity pointing back here
    pub inverse_field: String,

    /// Whether the owning entity stores the foreign key column
    pub owns_foreign_key: bool,

    /// Foreign key column on the owning entity (owning side only)
    pub foreign_key_column: Option<String>,

    /// Junction table name (many-to-many only)
    pub junction_table: Option<String>,
}

impl ResolvedRelationship {
    /// The side that stores `<target>_id`
    pub fn many_to_one(owner: &str, target: &str) -> Self {
        Self {
            kind: RelationKind::ManyToOne,
            target: target.to_string(),
            relationship_field: one_side_field_name(target),
            inverse_field: many_side_field_name(owner),
            owns_foreign_key: true,
            foreign_key_column: Some(generate_fk_column_name(target)),
            junction_table: None,
        }
    }

    /// The side referenced by the other side's foreign key
    pub fn one_to_many(owner: &str, target: &str) -> Self {
        Self {
            kind: RelationKind::OneToMany,
            target: target.to_string(),
            relationship_field: many_side_field_name(target),
            inverse_field: one_side_field_name(owner),
            owns_foreign_key: false,
            foreign_key_column: None,
            junction_table: None,
        }
    }

    /// One side of a junction-table relationship
    pub fn many_to_many(owner: &str, target: &str, junction_table: impl Into<String>) -> Self {
        Self {
            kind: RelationKind::ManyToMany,
            target: target.to_string(),
            relationship_field: many_side_field_name(target),
            inverse_field: many_side_field_name(owner),
            owns_foreign_key: false,
            foreign_key_column: None,
            junction_table: Some(junction_table.into()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes() {
        assert_eq!(
            RelationshipDeclaration::skip("Track", "Link").shape(),
            DeclaredShape::Skip
        );
        assert_eq!(
            RelationshipDeclaration::belongs_to("Track", "Artist").shape(),
            DeclaredShape::ABelongsToB
        );
        assert_eq!(
            RelationshipDeclaration::new("Track", "Artist", true, false).shape(),
            DeclaredShape::BBelongsToA
        );
        assert_eq!(
            RelationshipDeclaration::many_to_many("Track", "Tag").shape(),
            DeclaredShape::ManyToMany
        );
        assert_eq!(
            RelationshipDeclaration::new("Track", "Tag", false, false).shape(),
            DeclaredShape::NeitherHasMany
        );
        assert_eq!(
            RelationshipDeclaration::pending("Track", "Tag").shape(),
            DeclaredShape::Unspecified
        );
    }

    #[test]
    fn test_skip_wins_over_flags() {
        let mut declaration = RelationshipDeclaration::many_to_many("Track", "Tag");
        declaration.skip = true;
        assert_eq!(declaration.shape(), DeclaredShape::Skip);
    }

    #[test]
    fn test_well_formed() {
        assert!(RelationshipDeclaration::skip("A", "B").is_well_formed());
        assert!(RelationshipDeclaration::new("A", "B", false, false).is_well_formed());
        assert!(!RelationshipDeclaration::pending("A", "B").is_well_formed());
    }

    #[test]
    fn test_choice_round_trip() {
        for choice in RelationshipChoice::ALL {
            assert_eq!(choice.declare("Track", "Tag").choice(), Some(choice));
        }
        assert_eq!(RelationshipDeclaration::pending("Track", "Tag").choice(), None);
    }

    #[test]
    fn test_choice_labels() {
        assert_eq!(
            RelationshipChoice::ABelongsToB.label("Track", "Artist"),
            "Track belongs to ONE Artist (adds artist_id to Track)"
        );
        assert_eq!(
            RelationshipChoice::BBelongsToA.label("Track", "Link"),
            "Link belongs to ONE Track (adds track_id to Link)"
        );
        assert_eq!(
            RelationshipChoice::ManyToMany.label("Track", "Category"),
            "Many-to-Many: Tracks <-> Categories (creates bridge table)"
        );
        assert_eq!(
            RelationshipChoice::ManyToMany.preview("Track", "Tag").as_deref(),
            Some("tag_tracks bridge table")
        );
        assert!(RelationshipChoice::None.preview("Track", "Tag").is_none());
    }

    #[test]
    fn test_deserialize_camel_case_and_aliases() {
        let declaration: RelationshipDeclaration = serde_json::from_str(
            r#"{"entityA":"Track","entityB":"Artist","aHasMany":false,"bHasMany":true}"#,
        )
        .unwrap();
        assert_eq!(declaration, RelationshipDeclaration::belongs_to("Track", "Artist"));

        let declaration: RelationshipDeclaration = serde_json::from_str(
            r#"{"entity1":"Track","entity2":"Link","entity1HasMany":false,"entity2HasMany":false,"skipRelationship":true}"#,
        )
        .unwrap();
        assert_eq!(declaration.shape(), DeclaredShape::Skip);
    }

    #[test]
    fn test_reciprocal_constructors() {
        let track = ResolvedRelationship::many_to_one("Track", "Artist");
        let artist = ResolvedRelationship::one_to_many("Artist", "Track");

        assert_eq!(track.relationship_field, "artist");
        assert_eq!(track.foreign_key_column.as_deref(), Some("artist_id"));
        assert_eq!(artist.relationship_field, "tracks");
        assert_eq!(track.inverse_field, artist.relationship_field);
        assert_eq!(artist.inverse_field, track.relationship_field);
    }
}
