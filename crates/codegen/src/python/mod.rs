//! # Python Emitters
//!
//! Renderers for the three files of the generated Flask package.
//!
//! | Module      | Output           | Framework                 |
//! |-------------|------------------|---------------------------|
//! | `models`    | `app/models.py`  | Flask-SQLAlchemy          |
//! | `schemas`   | `app/schemas.py` | Flask-Marshmallow         |
//! | `routes`    | `app/routes.py`  | Flask `Blueprint`         |
//!
//! Emitters build a file as a list of top-level blocks and join them with
//! two blank lines, the spacing PEP 8 asks for between top-level
//! definitions. A block never ends with a newline; [`join_blocks`] adds the
//! single trailing one.

pub mod models;
pub mod routes;
pub mod schemas;

pub use models::generate_models;
pub use routes::generate_routes;
pub use schemas::generate_schemas;

use crate::ArtifactKind;

/// Indentation unit of generated Python
pub const INDENT: &str = "    ";

/// `# Generated <Title> for <project>` header line.
///
/// The project name is embedded as given, with line breaks folded into
/// spaces so it stays a single comment line.
pub fn file_header(kind: ArtifactKind, project_name: &str) -> String {
    let name: String = project_name
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    format!("# Generated {} for {}", kind.title(), name)
}

/// Join top-level blocks with two blank lines and end with a newline.
pub fn join_blocks(blocks: &[String]) -> String {
    let mut out = blocks.join("\n\n\n");
    out.push('\n');
    out
}

/// Python boolean literal.
pub fn python_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Single-quoted Python string literal for identifier-like text.
pub fn python_str(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Python list literal of single-quoted strings.
pub fn python_str_list<S: AsRef<str>>(values: &[S]) -> String {
    let items: Vec<String> = values.iter().map(|v| python_str(v.as_ref())).collect();
    format!("[{}]", items.join(", "))
}

// ============================================================================
// Tests
// ============================================================================
