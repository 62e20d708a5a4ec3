//! # Schema Emitter (Flask-Marshmallow)
//!
//! Renders `app/schemas.py`: one `SQLAlchemyAutoSchema` per entity with a
//! `ma.Nested` field per relationship, followed by the single-record and
//! collection schema instances the routes import.
//!
//! Nested fields exclude the inverse attribute of the target so a dump of
//! `Track -> artist` does not recurse back into `Artist -> tracks`.

use forge_core::RelationKind;
use forge_ir::ResolvedRelationship;

use crate::ArtifactKind;
use crate::context::{EntityInfo, GenerationContext, schema_class_name};
use crate::python::{INDENT, file_header, join_blocks, python_bool, python_str};

// ============================================================================
// Public API
// ============================================================================

/// Render the complete schemas file.
pub fn generate_schemas(ctx: &GenerationContext) -> String {
    let mut blocks = vec![preamble(ctx)];

    for info in ctx.entity_infos() {
        blocks.push(schema_class(&info));
        blocks.push(schema_instances(&info));
    }

    tracing::debug!(blocks = blocks.len(), "Rendered schemas");

    join_blocks(&blocks)
}

// ============================================================================
// Blocks
// ============================================================================

fn preamble(ctx: &GenerationContext) -> String {
    let mut lines = vec![
        file_header(ArtifactKind::Schemas, ctx.project_name),
        "from .extensions import ma".to_string(),
    ];
    if ctx.has_entities() {
        let classes: Vec<&str> = ctx.entity_infos().map(|i| i.class_name()).collect();
        lines.push(format!("from .models import {}", classes.join(", ")));
    }
    lines.join("\n")
}

fn schema_class(info: &EntityInfo) -> String {
    let mut lines = vec![format!(
        "class {}(ma.SQLAlchemyAutoSchema):",
        info.schema_class()
    )];

    for rel in info.relationships() {
        lines.push(format!("{INDENT}{}", nested_field(rel)));
    }
    if !info.relationships().is_empty() {
        lines.push(String::new());
    }

    lines.push(format!("{INDENT}class Meta:"));
    lines.push(format!("{INDENT}{INDENT}model = {}", info.class_name()));
    lines.push(format!("{INDENT}{INDENT}load_instance = True"));
    lines.push(format!("{INDENT}{INDENT}include_fk = True"));

    lines.join("\n")
}

fn schema_instances(info: &EntityInfo) -> String {
    let class = info.schema_class();
    format!(
        "{} = {class}()\n{} = {class}(many=True)",
        info.schema_instance(),
        info.collection_schema_instance()
    )
}

/// `<field> = ma.Nested('<Target>Schema', many=..., exclude=('<inverse>',))`
fn nested_field(rel: &ResolvedRelationship) -> String {
    let many = rel.kind != RelationKind::ManyToOne;
    format!(
        "{} = ma.Nested({}, many={}, exclude=({},))",
        rel.relationship_field,
        python_str(&schema_class_name(&rel.target)),
        python_bool(many),
        python_str(&rel.inverse_field)
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use forge_ir::{Entity, Field, RelationshipDeclaration, resolve};
    use pretty_assertions::assert_eq;

    fn render(entities: &[Entity], declarations: &[RelationshipDeclaration]) -> String {
        let graph = resolve(entities, declarations);
        generate_schemas(&GenerationContext::new("Music Tracker", entities, &graph))
    }

    #[test]
    fn test_empty_project_is_preamble_only() {
        assert_eq!(
            render(&[], &[]),
            "# Generated Schemas for Music Tracker\nfrom .extensions import ma\n"
        );
    }

    #[test]
    fn test_many_to_one_schema() {
        let entities = vec![
            Entity::new("Track").with_field(Field::string("title")),
            Entity::new("Artist").with_field(Field::string("name")),
        ];
        let output = render(
            &entities,
            &[RelationshipDeclaration::belongs_to("Track", "Artist")],
        );

        let expected = "\
# Generated Schemas for Music Tracker
from .extensions import ma
from .models import Track, Artist


class TrackSchema(ma.SQLAlchemyAutoSchema):
    artist = ma.Nested('ArtistSchema', many=False, exclude=('tracks',))

    class Meta:
        model = Track
        load_instance = True
        include_fk = True


track_schema = TrackSchema()
tracks_schema = TrackSchema(many=True)


class ArtistSchema(ma.SQLAlchemyAutoSchema):
    tracks = ma.Nested('TrackSchema', many=True, exclude=('artist',))

    class Meta:
        model = Artist
        load_instance = True
        include_fk = True


artist_schema = ArtistSchema()
artists_schema = ArtistSchema(many=True)
";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_many_to_many_nested_both_ways() {
        let entities = vec![Entity::new("Track"), Entity::new("Category")];
        let output = render(
            &entities,
            &[RelationshipDeclaration::many_to_many("Track", "Category")],
        );

        assert!(output.contains(
            "categories = ma.Nested('CategorySchema', many=True, exclude=('tracks',))"
        ));
        assert!(output.contains(
            "tracks = ma.Nested('TrackSchema', many=True, exclude=('categories',))"
        ));
        assert!(output.contains("categories_schema = CategorySchema(many=True)"));
    }

    #[test]
    fn test_schema_without_relationships() {
        let output = render(&[Entity::new("Tag")], &[]);
        assert!(output.contains("class TagSchema(ma.SQLAlchemyAutoSchema):\n    class Meta:"));
    }
}
