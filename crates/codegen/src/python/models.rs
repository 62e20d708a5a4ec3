//! # Model Emitter (Flask-SQLAlchemy)
//!
//! Renders `app/models.py`:
//!
//! - the `db` and `datetime` imports
//! - one `db.Table` per junction table in the registry, declared once
//! - one `db.Model` class per entity with `id`, user columns, owned foreign
//!   keys, timestamps, a `# Relationships` block and `__repr__`
//!
//! ## Type Mapping
//!
//! | Field type | Column type      |
//! |------------|------------------|
//! | String     | `db.String(255)` |
//! | Integer    | `db.Integer`     |
//! | Boolean    | `db.Boolean`     |
//! | DateTime   | `db.DateTime`    |

use forge_core::RelationKind;
use forge_ir::{Field, JunctionTable, ResolvedRelationship, foreign_key_target, junction_column_name};

use crate::ArtifactKind;
use crate::context::{EntityInfo, GenerationContext};
use crate::python::{INDENT, file_header, join_blocks, python_str};

const UTC_NOW: &str = "lambda: datetime.now(timezone.utc)";

// ============================================================================
// Public API
// ============================================================================

/// Render the complete models file.
pub fn generate_models(ctx: &GenerationContext) -> String {
    let mut blocks = vec![preamble(ctx)];

    for table in ctx.junction_tables() {
        blocks.push(junction_table(table));
    }

    for info in ctx.entity_infos() {
        blocks.push(model_class(&info));
    }

    tracing::debug!(
        junction_tables = ctx.junction_tables().len(),
        blocks = blocks.len(),
        "Rendered models"
    );

    join_blocks(&blocks)
}

// ============================================================================
// Blocks
// ============================================================================

fn preamble(ctx: &GenerationContext) -> String {
    [
        file_header(ArtifactKind::Models, ctx.project_name),
        "from .extensions import db".to_string(),
        "from datetime import datetime, timezone".to_string(),
    ]
    .join("\n")
}

fn junction_table(table: &JunctionTable) -> String {
    let mut lines = vec![
        format!("{} = db.Table(", table.name),
        format!("{INDENT}{},", python_str(&table.name)),
    ];
    for participant in [&table.left, &table.right] {
        lines.push(format!(
            "{INDENT}db.Column({}, db.Integer, db.ForeignKey({}), primary_key=True),",
            python_str(&junction_column_name(participant)),
            python_str(&foreign_key_target(participant)),
        ));
    }
    lines.push(")".to_string());
    lines.join("\n")
}

fn model_class(info: &EntityInfo) -> String {
    let mut lines = vec![
        format!("class {}(db.Model):", info.class_name()),
        format!("{INDENT}__tablename__ = {}", python_str(&info.table_name())),
        String::new(),
        format!("{INDENT}id = db.Column(db.Integer, primary_key=True)"),
    ];

    for field in info.fields() {
        lines.push(format!("{INDENT}{}", field_column(field)));
    }

    for (rel, column) in info.foreign_keys() {
        lines.push(format!(
            "{INDENT}{column} = db.Column(db.Integer, db.ForeignKey({}), nullable=False)",
            python_str(&foreign_key_target(&rel.target)),
        ));
    }

    lines.push(format!("{INDENT}created_at = db.Column(db.DateTime, default={UTC_NOW})"));
    lines.push(format!(
        "{INDENT}updated_at = db.Column(db.DateTime, default={UTC_NOW}, onupdate={UTC_NOW})"
    ));

    if !info.relationships().is_empty() {
        lines.push(String::new());
        lines.push(format!("{INDENT}# Relationships"));
        for rel in info.relationships() {
            lines.push(format!("{INDENT}{}", relationship_attribute(rel)));
        }
    }

    lines.push(String::new());
    lines.push(format!("{INDENT}def __repr__(self):"));
    lines.push(format!(
        "{INDENT}{INDENT}return f'<{} {{self.{}}}>'",
        info.class_name(),
        info.display_attribute()
    ));

    lines.join("\n")
}

// ============================================================================
// Lines
// ============================================================================

/// `<column> = db.Column(<type>, ...)` for a user field.
fn field_column(field: &Field) -> String {
    let constraints = if field.is_natural_key() {
        "nullable=False, unique=True"
    } else {
        "nullable=True"
    };
    format!(
        "{} = db.Column({}, {constraints})",
        field.column_name(),
        field.field_type.to_sqlalchemy_type()
    )
}

/// `<field> = db.relationship(...)` for one resolved relationship.
fn relationship_attribute(rel: &ResolvedRelationship) -> String {
    let mut args = vec![python_str(&rel.target)];

    if let Some(junction) = rel.junction_table.as_deref() {
        args.push(format!("secondary={junction}"));
    }
    args.push(format!("back_populates={}", python_str(&rel.inverse_field)));
    if rel.kind == RelationKind::OneToMany {
        args.push("cascade='all, delete-orphan'".to_string());
    }

    format!("{} = db.relationship({})", rel.relationship_field, args.join(", "))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use forge_ir::{Entity, RelationshipDeclaration, ResolvedSchema, resolve};
    use pretty_assertions::assert_eq;

    fn render(entities: &[Entity], declarations: &[RelationshipDeclaration]) -> String {
        let graph: ResolvedSchema = resolve(entities, declarations);
        generate_models(&GenerationContext::new("Music Tracker", entities, &graph))
    }

    #[test]
    fn test_empty_project_is_preamble_only() {
        assert_eq!(
            render(&[], &[]),
            "# Generated Models for Music Tracker\n\
             from .extensions import db\n\
             from datetime import datetime, timezone\n"
        );
    }

    #[test]
    fn test_many_to_one_model() {
        let entities = vec![
            Entity::new("Track").with_field(Field::string("title")),
            Entity::new("Artist").with_field(Field::string("name")),
        ];
        let output = render(
            &entities,
            &[RelationshipDeclaration::belongs_to("Track", "Artist")],
        );

        let expected_track = "\
class Track(db.Model):
    __tablename__ = 'tracks'

    id = db.Column(db.Integer, primary_key=True)
    title = db.Column(db.String(255), nullable=True)
    artist_id = db.Column(db.Integer, db.ForeignKey('artists.id'), nullable=False)
    created_at = db.Column(db.DateTime, default=lambda: datetime.now(timezone.utc))
    updated_at = db.Column(db.DateTime, default=lambda: datetime.now(timezone.utc), onupdate=lambda: datetime.now(timezone.utc))

    # Relationships
    artist = db.relationship('Artist', back_populates='tracks')

    def __repr__(self):
        return f'<Track {self.id}>'";

        assert!(output.contains(expected_track), "{output}");
        assert!(output.contains(
            "tracks = db.relationship('Track', back_populates='artist', cascade='all, delete-orphan')"
        ));
        assert!(!output.contains("db.Table("));
    }

    #[test]
    fn test_junction_table_declared_once() {
        let entities = vec![Entity::new("Track"), Entity::new("Tag")];
        let output = render(
            &entities,
            &[RelationshipDeclaration::many_to_many("Track", "Tag")],
        );

        let expected = "\
tag_tracks = db.Table(
    'tag_tracks',
    db.Column('tag_id', db.Integer, db.ForeignKey('tags.id'), primary_key=True),
    db.Column('track_id', db.Integer, db.ForeignKey('tracks.id'), primary_key=True),
)";
        assert!(output.contains(expected), "{output}");
        assert_eq!(output.matches("= db.Table(").count(), 1);
        assert!(output.contains("tags = db.relationship('Tag', secondary=tag_tracks, back_populates='tracks')"));
        assert!(output.contains("tracks = db.relationship('Track', secondary=tag_tracks, back_populates='tags')"));
    }

    #[test]
    fn test_natural_key_any_casing() {
        let entities = vec![Entity::new("Artist").with_field(Field::string("Name"))];
        let output = render(&entities, &[]);

        assert!(output.contains("name = db.Column(db.String(255), nullable=False, unique=True)"));
        assert!(output.contains("return f'<Artist {self.name}>'"));
        assert!(!output.contains("# Relationships"));
    }

    #[test]
    fn test_field_type_mapping_and_order() {
        let entities = vec![Entity::new("Track").with_fields([
            Field::integer("plays"),
            Field::boolean("isReleased"),
            Field::datetime("releasedAt"),
            Field::string(""),
        ])];
        let output = render(&entities, &[]);

        let plays = output.find("plays = db.Column(db.Integer, nullable=True)").unwrap();
        let released = output
            .find("is_released = db.Column(db.Boolean, nullable=True)")
            .unwrap();
        let released_at = output
            .find("released_at = db.Column(db.DateTime, nullable=True)")
            .unwrap();
        assert!(plays < released && released < released_at);
        assert!(!output.contains(" = db.Column(db.String(255)"));
    }

    #[test]
    fn test_blank_entities_are_skipped() {
        let entities = vec![Entity::new(""), Entity::new("Track")];
        let output = render(&entities, &[]);

        assert_eq!(output.matches("(db.Model):").count(), 1);
    }
}
