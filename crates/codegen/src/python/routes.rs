//! # Route Emitter (Flask Blueprint)
//!
//! Renders `app/routes.py`: an `api_bp` blueprint with five CRUD handlers per
//! entity and a health check.
//!
//! | Operation | Method & Path             | Handler           |
//! |-----------|---------------------------|-------------------|
//! | List      | `GET    /<table>`         | `get_<plural>`    |
//! | Read      | `GET    /<table>/<id>`    | `get_<singular>`  |
//! | Create    | `POST   /<table>`         | `create_<singular>` |
//! | Update    | `PUT    /<table>/<id>`    | `update_<singular>` |
//! | Delete    | `DELETE /<table>/<id>`    | `delete_<singular>` |
//!
//! Route topology depends on the entity alone. Relationships only shape the
//! payload (through the schemas) and the keys `create` insists on.

use crate::ArtifactKind;
use crate::context::{EntityInfo, GenerationContext};
use crate::python::{INDENT, file_header, join_blocks, python_str_list};

// ============================================================================
// Public API
// ============================================================================

/// Render the complete routes file.
pub fn generate_routes(ctx: &GenerationContext) -> String {
    let mut blocks = vec![preamble(ctx), "api_bp = Blueprint('api', __name__)".to_string()];

    for info in ctx.entity_infos() {
        blocks.extend(entity_handlers(&info));
    }

    blocks.push(health_handler());

    tracing::debug!(blocks = blocks.len(), "Rendered routes");

    join_blocks(&blocks)
}

// ============================================================================
// Blocks
// ============================================================================

fn preamble(ctx: &GenerationContext) -> String {
    let mut lines = vec![
        file_header(ArtifactKind::Routes, ctx.project_name),
        "from flask import Blueprint, request, jsonify".to_string(),
        "from .extensions import db".to_string(),
    ];

    if ctx.has_entities() {
        let infos: Vec<EntityInfo> = ctx.entity_infos().collect();
        let classes: Vec<&str> = infos.iter().map(|i| i.class_name()).collect();
        let schemas: Vec<String> = infos
            .iter()
            .flat_map(|i| [i.schema_instance(), i.collection_schema_instance()])
            .collect();

        lines.push(format!("from .models import {}", classes.join(", ")));
        lines.push(format!("from .schemas import {}", schemas.join(", ")));
    }

    lines.join("\n")
}

/// The five handlers of one entity; the first carries the section comment.
fn entity_handlers(info: &EntityInfo) -> Vec<String> {
    let class = info.class_name();
    let table = info.table_name();
    let singular = info.singular_name();
    let plural = info.plural_name();
    let one = info.schema_instance();
    let many = info.collection_schema_instance();

    let list = format!(
        "# {section} ROUTES\n\
         @api_bp.route('/{table}', methods=['GET'])\n\
         def get_{plural}():\n\
         {INDENT}items = {class}.query.all()\n\
         {INDENT}return jsonify({many}.dump(items))",
        section = singular.to_uppercase(),
    );

    let get = format!(
        "@api_bp.route('/{table}/<int:id>', methods=['GET'])\n\
         def get_{singular}(id):\n\
         {INDENT}item = {class}.query.get_or_404(id)\n\
         {INDENT}return jsonify({one}.dump(item))"
    );

    let mut create = vec![
        format!("@api_bp.route('/{table}', methods=['POST'])"),
        format!("def create_{singular}():"),
        format!("{INDENT}data = request.get_json() or {{}}"),
    ];
    let required = info.required_keys();
    if !required.is_empty() {
        create.push(format!("{INDENT}required = {}", python_str_list(&required)));
        create.push(format!("{INDENT}for field in required:"));
        create.push(format!("{INDENT}{INDENT}if field not in data:"));
        create.push(format!(
            "{INDENT}{INDENT}{INDENT}return jsonify({{'error': f'Missing: {{field}}'}}), 400"
        ));
    }
    create.push(format!("{INDENT}item = {class}(**data)"));
    create.push(format!("{INDENT}db.session.add(item)"));
    create.push(format!("{INDENT}db.session.commit()"));
    create.push(format!("{INDENT}return jsonify({one}.dump(item)), 201"));

    let update = format!(
        "@api_bp.route('/{table}/<int:id>', methods=['PUT'])\n\
         def update_{singular}(id):\n\
         {INDENT}item = {class}.query.get_or_404(id)\n\
         {INDENT}data = request.get_json() or {{}}\n\
         {INDENT}for key, value in data.items():\n\
         {INDENT}{INDENT}setattr(item, key, value)\n\
         {INDENT}db.session.commit()\n\
         {INDENT}return jsonify({one}.dump(item))"
    );

    let delete = format!(
        "@api_bp.route('/{table}/<int:id>', methods=['DELETE'])\n\
         def delete_{singular}(id):\n\
         {INDENT}item = {class}.query.get_or_404(id)\n\
         {INDENT}db.session.delete(item)\n\
         {INDENT}db.session.commit()\n\
         {INDENT}return '', 204"
    );

    vec![list, get, create.join("\n"), update, delete]
}

fn health_handler() -> String {
    format!(
        "@api_bp.route('/health', methods=['GET'])\n\
         def health():\n\
         {INDENT}return jsonify({{'status': 'healthy'}})"
    )
}

// ============================================================================
// Tests
// ============================================================================
