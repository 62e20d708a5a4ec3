//! # Forge Codegen
//!
//! Emitters for Flask Forge.
//!
//! This crate renders a resolved schema into the three files of a Flask
//! backend package:
//!
//! - **Models** (`app/models.py`): Flask-SQLAlchemy classes and junction tables
//! - **Schemas** (`app/schemas.py`): Flask-Marshmallow auto schemas with nested relationships
//! - **Routes** (`app/routes.py`): a blueprint with five CRUD handlers per entity
//!
//! Every emitter reads the same [`GenerationContext`], so relationship names
//! and foreign key columns always agree across the three files.

// ============================================================================
// Modules
// ============================================================================

pub mod context;
pub mod generator;
pub mod python;

// ============================================================================
// Re-exports
// ============================================================================

pub use context::{EntityInfo, GenerationContext};
pub use generator::{GenerationSummary, Generator, generate, summarize};

use forge_core::{EngineError, EngineResult};
use forge_ir::{Entity, RelationshipDeclaration, resolve};
use heck::ToSnakeCase;
use std::path::{Path, PathBuf};

/// Directory name used when a project name has no usable characters
const FALLBACK_OUTPUT_NAME: &str = "generated";

// ============================================================================
// GeneratorConfig
// ============================================================================

/// Configuration for the code generator
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Output directory for generated code
    pub output_dir: PathBuf,

    /// Whether to overwrite existing files
    pub overwrite: bool,

    /// Python package directory the artifacts are placed in
    pub package_dir: String,

    /// Refuse to generate when validation reports errors
    pub strict: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./generated"),
            overwrite: false,
            package_dir: "app".to_string(),
            strict: false,
        }
    }
}

impl GeneratorConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration writing into `./<snake_case(project_name)>`
    pub fn for_project(project_name: &str) -> Self {
        let dir = project_name.to_snake_case();
        let dir = if dir.is_empty() {
            FALLBACK_OUTPUT_NAME.to_string()
        } else {
            dir
        };
        Self::new().with_output_dir(PathBuf::from(".").join(dir))
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Allow overwriting existing files
    pub fn allow_overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    /// Set the package directory (`app` by default)
    pub fn with_package_dir(mut self, dir: impl Into<String>) -> Self {
        self.package_dir = dir.into();
        self
    }

    /// Fail on validation errors instead of reporting them as warnings
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}

// ============================================================================
// ArtifactKind
// ============================================================================

/// The three fixed artifacts produced per run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Models,
    Schemas,
    Routes,
}

impl ArtifactKind {
    /// All artifacts in emission order
    pub const ALL: [ArtifactKind; 3] = [Self::Models, Self::Schemas, Self::Routes];

    /// Conventional file name inside the package directory
    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::Models => "models.py",
            ArtifactKind::Schemas => "schemas.py",
            ArtifactKind::Routes => "routes.py",
        }
    }

    /// Word used in the generated header comment
    pub fn title(&self) -> &'static str {
        match self {
            ArtifactKind::Models => "Models",
            ArtifactKind::Schemas => "Schemas",
            ArtifactKind::Routes => "Routes",
        }
    }

    /// Render this artifact from a context
    pub fn render(&self, ctx: &GenerationContext) -> String {
        match self {
            ArtifactKind::Models => python::generate_models(ctx),
            ArtifactKind::Schemas => python::generate_schemas(ctx),
            ArtifactKind::Routes => python::generate_routes(ctx),
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

// ============================================================================
// GeneratedFile
// ============================================================================

/// Represents a single generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Relative path from output directory
    pub path: PathBuf,

    /// File content
    pub content: String,

    /// Which artifact this file holds
    pub kind: ArtifactKind,
}

impl GeneratedFile {
    /// Create a new generated file
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>, kind: ArtifactKind) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            kind,
        }
    }
}

// ============================================================================
// GeneratedProject
// ============================================================================

/// Collection of all generated files for a project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedProject {
    /// Project name
    pub name: String,

    /// All generated files
    pub files: Vec<GeneratedFile>,

    /// Validation findings and other notes collected during generation
    pub warnings: Vec<String>,
}

impl GeneratedProject {
    /// Create a new generated project
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add a file to the project
    pub fn add_file(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Get the number of files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get the file holding an artifact
    pub fn file(&self, kind: ArtifactKind) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.kind == kind)
    }

    /// Write all files to disk, returning the written paths
    ///
    /// Existing files are left alone and reported as
    /// [`EngineError::OutputExists`] unless `overwrite` is set. The check runs
    /// for every file before anything is written.
    pub fn write_to_disk(
        &self,
        base_dir: impl AsRef<Path>,
        overwrite: bool,
    ) -> EngineResult<Vec<PathBuf>> {
        let base_dir = base_dir.as_ref();

        if !overwrite {
            if let Some(existing) = self
                .files
                .iter()
                .map(|f| base_dir.join(&f.path))
                .find(|p| p.exists())
            {
                return Err(EngineError::OutputExists(existing));
            }
        }

        let mut written = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let full_path = base_dir.join(&file.path);

            // Create parent directories
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| EngineError::DirectoryCreate {
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                })?;
            }

            std::fs::write(&full_path, &file.content).map_err(|e| EngineError::FileWrite {
                path: full_path.clone(),
                message: e.to_string(),
            })?;

            tracing::debug!(path = %full_path.display(), bytes = file.content.len(), "Wrote file");
            written.push(full_path);
        }

        Ok(written)
    }
}

// ============================================================================
// GeneratedArtifacts
// ============================================================================

/// The three text blobs of one run, without any file layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    pub models: String,
    pub schemas: String,
    pub routes: String,
}

impl GeneratedArtifacts {
    /// Text of one artifact
    pub fn get(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::Models => &self.models,
            ArtifactKind::Schemas => &self.schemas,
            ArtifactKind::Routes => &self.routes,
        }
    }
}

/// Resolve the declarations and render all three artifacts.
///
/// Total: malformed declarations lose their relationship, they never fail
/// the run.
pub fn generate_artifacts(
    entities: &[Entity],
    declarations: &[RelationshipDeclaration],
    project_name: &str,
) -> GeneratedArtifacts {
    let graph = resolve(entities, declarations);
    let ctx = GenerationContext::new(project_name, entities, &graph);

    GeneratedArtifacts {
        models: python::generate_models(&ctx),
        schemas: python::generate_schemas(&ctx),
        routes: python::generate_routes(&ctx),
    }
}

// ============================================================================
// Tests
// ============================================================================
