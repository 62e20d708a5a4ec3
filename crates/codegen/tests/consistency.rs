//! Cross-artifact regression tests.
//!
//! The three emitters are written independently but read one resolved graph.
//! These tests check that every relationship name and foreign key column the
//! resolver produces shows up the same way in models, schemas and routes.

use forge_codegen::{GeneratedArtifacts, GenerationContext, generate_artifacts, python};
use forge_ir::{Entity, Field, RelationKind, RelationshipDeclaration, ResolvedSchema, resolve};
use pretty_assertions::assert_eq;

// ============================================================================
// Fixtures
// ============================================================================

fn music_entities() -> Vec<Entity> {
    vec![
        Entity::new("Track").with_field(Field::string("title")),
        Entity::new("Artist").with_field(Field::string("name")),
        Entity::new("Tag").with_field(Field::string("Name")),
        Entity::new("Link").with_field(Field::string("url")),
        Entity::new("Category"),
    ]
}

fn music_declarations() -> Vec<RelationshipDeclaration> {
    vec![
        RelationshipDeclaration::belongs_to("Track", "Artist"),
        RelationshipDeclaration::many_to_many("Track", "Tag"),
        RelationshipDeclaration::new("Track", "Link", true, false),
        RelationshipDeclaration::many_to_many("Category", "Track"),
        RelationshipDeclaration::skip("Artist", "Tag"),
        RelationshipDeclaration::skip("Artist", "Link"),
        RelationshipDeclaration::skip("Artist", "Category"),
        RelationshipDeclaration::skip("Tag", "Link"),
        RelationshipDeclaration::many_to_many("Tag", "Category"),
        RelationshipDeclaration::skip("Link", "Category"),
    ]
}

/// Body of `class <name>(db.Model):` up to the next top-level block.
fn model_body<'a>(models: &'a str, class: &str) -> &'a str {
    let start = models
        .find(&format!("class {class}(db.Model):"))
        .unwrap_or_else(|| panic!("no model for {class}"));
    let rest = &models[start..];
    let end = rest.find("\n\n\n").unwrap_or(rest.len());
    &rest[..end]
}

/// Body of `class <name>Schema(...)` up to the next top-level block.
fn schema_body<'a>(schemas: &'a str, class: &str) -> &'a str {
    let start = schemas
        .find(&format!("class {class}Schema(ma.SQLAlchemyAutoSchema):"))
        .unwrap_or_else(|| panic!("no schema for {class}"));
    let rest = &schemas[start..];
    let end = rest.find("\n\n\n").unwrap_or(rest.len());
    &rest[..end]
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn output_is_deterministic() {
    let entities = music_entities();
    let declarations = music_declarations();

    let first = generate_artifacts(&entities, &declarations, "Music Tracker");
    let second = generate_artifacts(&entities, &declarations, "Music Tracker");

    assert_eq!(first, second);
}

#[test]
fn junction_name_ignores_declaration_order() {
    let entities = vec![Entity::new("Track"), Entity::new("Tag")];

    let forward = resolve(&entities, &[RelationshipDeclaration::many_to_many("Track", "Tag")]);
    let backward = resolve(&entities, &[RelationshipDeclaration::many_to_many("Tag", "Track")]);

    let name = |graph: &ResolvedSchema, owner: &str| {
        graph.relationships_for(owner)[0].junction_table.clone()
    };
    assert_eq!(name(&forward, "Track"), Some("tag_tracks".to_string()));
    assert_eq!(name(&forward, "Track"), name(&backward, "Track"));
    assert_eq!(name(&forward, "Tag"), name(&backward, "Tag"));
}

#[test]
fn exactly_one_side_owns_the_foreign_key() {
    let entities = music_entities();
    let graph = resolve(&entities, &music_declarations());

    for entity in &entities {
        for rel in graph.relationships_for(&entity.name) {
            if rel.kind == RelationKind::ManyToMany {
                assert!(!rel.owns_foreign_key);
                continue;
            }
            let back = graph
                .relationships_for(&rel.target)
                .iter()
                .find(|r| r.target == entity.name)
                .unwrap();
            assert_ne!(rel.owns_foreign_key, back.owns_foreign_key);
            assert_eq!(rel.foreign_key_column.is_some(), rel.owns_foreign_key);
        }
    }
}

#[test]
fn inverse_fields_are_reciprocal() {
    let entities = music_entities();
    let graph = resolve(&entities, &music_declarations());

    for entity in &entities {
        for rel in graph.relationships_for(&entity.name) {
            let back = graph
                .relationships_for(&rel.target)
                .iter()
                .find(|r| r.target == entity.name)
                .unwrap();
            assert_eq!(rel.inverse_field, back.relationship_field);
            assert_eq!(back.inverse_field, rel.relationship_field);
        }
    }
}

#[test]
fn each_junction_table_is_declared_once() {
    let artifacts = generate_artifacts(&music_entities(), &music_declarations(), "Music Tracker");

    for table in ["tag_tracks", "category_tracks", "category_tags"] {
        assert_eq!(
            artifacts.models.matches(&format!("{table} = db.Table(")).count(),
            1,
            "{table}"
        );
        assert_eq!(
            artifacts.models.matches(&format!("secondary={table},")).count(),
            2,
            "{table}"
        );
    }
    assert_eq!(artifacts.models.matches("= db.Table(").count(), 3);
}

#[test]
fn relationship_names_agree_across_artifacts() {
    let entities = music_entities();
    let declarations = music_declarations();
    let graph = resolve(&entities, &declarations);
    let GeneratedArtifacts { models, schemas, routes } =
        generate_artifacts(&entities, &declarations, "Music Tracker");

    for entity in &entities {
        let model = model_body(&models, &entity.name);
        let schema = schema_body(&schemas, &entity.name);
        let create = routes
            .split(&format!("def create_{}():", entity.identifier()))
            .nth(1)
            .unwrap();
        let create = create.split("\n\n\n").next().unwrap();

        for rel in graph.relationships_for(&entity.name) {
            assert!(
                model.contains(&format!(
                    "    {} = db.relationship('{}'",
                    rel.relationship_field, rel.target
                )),
                "{} model lacks {}",
                entity.name,
                rel.relationship_field
            );
            assert!(model.contains(&format!("back_populates='{}'", rel.inverse_field)));
            assert!(schema.contains(&format!(
                "    {} = ma.Nested('{}Schema', many={}, exclude=('{}',))",
                rel.relationship_field,
                rel.target,
                if rel.kind == RelationKind::ManyToOne { "False" } else { "True" },
                rel.inverse_field
            )));

            if let Some(column) = &rel.foreign_key_column {
                assert!(model.contains(&format!(
                    "    {column} = db.Column(db.Integer, db.ForeignKey('{}.id'), nullable=False)",
                    forge_core::table_name(&rel.target)
                )));
                assert!(create.contains(&format!("'{column}'")));
            }
        }
    }
}

#[test]
fn emitters_can_run_concurrently() {
    let entities = music_entities();
    let declarations = music_declarations();
    let graph = resolve(&entities, &declarations);
    let ctx = GenerationContext::new("Music Tracker", &entities, &graph);

    let (models, schemas, routes) = std::thread::scope(|scope| {
        let models = scope.spawn(|| python::generate_models(&ctx));
        let schemas = scope.spawn(|| python::generate_schemas(&ctx));
        let routes = scope.spawn(|| python::generate_routes(&ctx));
        (
            models.join().unwrap(),
            schemas.join().unwrap(),
            routes.join().unwrap(),
        )
    });

    let sequential = generate_artifacts(&entities, &declarations, "Music Tracker");
    assert_eq!(models, sequential.models);
    assert_eq!(schemas, sequential.schemas);
    assert_eq!(routes, sequential.routes);
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn scenario_track_belongs_to_artist() {
    let entities = vec![
        Entity::new("Track").with_field(Field::string("title")),
        Entity::new("Artist").with_field(Field::string("name")),
    ];
    let declarations = vec![RelationshipDeclaration::new("Track", "Artist", false, true)];
    let graph = resolve(&entities, &declarations);
    let artifacts = generate_artifacts(&entities, &declarations, "Music Tracker");

    let track = &graph.relationships_for("Track")[0];
    assert_eq!(track.relationship_field, "artist");
    assert_eq!(track.foreign_key_column.as_deref(), Some("artist_id"));
    assert_eq!(graph.relationships_for("Artist")[0].relationship_field, "tracks");
    assert!(graph.junctions().is_empty());

    let track_model = model_body(&artifacts.models, "Track");
    let artist_model = model_body(&artifacts.models, "Artist");
    assert!(track_model.contains("artist_id = db.Column("));
    assert!(track_model.contains("artist = db.relationship('Artist'"));
    assert!(artist_model.contains("tracks = db.relationship('Track'"));
    assert!(!artist_model.contains("_id = db.Column("));
    assert!(!artifacts.models.contains("db.Table("));
}

#[test]
fn scenario_track_tag_many_to_many() {
    let entities = vec![Entity::new("Track"), Entity::new("Tag")];
    let declarations = vec![RelationshipDeclaration::many_to_many("Track", "Tag")];
    let graph = resolve(&entities, &declarations);
    let artifacts = generate_artifacts(&entities, &declarations, "Music Tracker");

    assert_eq!(graph.relationships_for("Track")[0].relationship_field, "tags");
    assert_eq!(graph.relationships_for("Tag")[0].relationship_field, "tracks");
    assert_eq!(artifacts.models.matches("tag_tracks = db.Table(").count(), 1);
    assert!(!artifacts.models.contains("track_tags"));
}

#[test]
fn scenario_skipped_pair_adds_nothing() {
    let entities = vec![Entity::new("Track"), Entity::new("Link")];
    let declarations = vec![RelationshipDeclaration::skip("Track", "Link")];
    let graph = resolve(&entities, &declarations);
    let artifacts = generate_artifacts(&entities, &declarations, "Music Tracker");

    assert_eq!(graph.relationship_count(), 0);
    assert!(graph.junctions().is_empty());
    assert!(!artifacts.models.contains("db.relationship("));
    assert!(!artifacts.models.contains("db.ForeignKey("));
    assert!(!artifacts.schemas.contains("ma.Nested("));
}

#[test]
fn scenario_natural_key_in_any_casing() {
    for name in ["name", "Name", "NAME"] {
        let entities = vec![Entity::new("Artist").with_field(Field::string(name))];
        let artifacts = generate_artifacts(&entities, &[], "Music Tracker");

        assert!(
            artifacts
                .models
                .contains("name = db.Column(db.String(255), nullable=False, unique=True)")
        );
        assert!(artifacts.models.contains("return f'<Artist {self.name}>'"));
        assert!(artifacts.routes.contains("required = ['name']"));
        assert!(!artifacts.models.contains("{self.id}"));
        assert!(!artifacts.models.contains("n_a_m_e"));
    }
}

#[test]
fn scenario_empty_schema_is_well_formed() {
    let artifacts = generate_artifacts(&[], &[], "Empty");

    for text in [&artifacts.models, &artifacts.schemas, &artifacts.routes] {
        assert!(text.starts_with("# Generated "));
        assert!(text.ends_with('\n'));
        assert!(!text.contains("from .models import"));
        assert!(!text.contains("class "));
    }
    assert!(artifacts.routes.contains("api_bp = Blueprint('api', __name__)"));
}

#[test]
fn partial_declarations_degrade_to_no_relationship() {
    let entities = vec![Entity::new("Track"), Entity::new("Artist")];
    let declarations = vec![
        RelationshipDeclaration::pending("Track", "Artist"),
        RelationshipDeclaration::new("Track", "Ghost", false, true),
    ];

    let artifacts = generate_artifacts(&entities, &declarations, "Music Tracker");

    assert!(!artifacts.models.contains("db.relationship("));
    assert!(artifacts.models.contains("class Track(db.Model):"));
}
