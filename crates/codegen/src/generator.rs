//! # Code Generator Orchestrator
//!
//! The `Generator` is the top-level entry point for code generation. It takes a
//! [`SchemaProject`] and a [`GeneratorConfig`], resolves the relationship
//! graph once, and hands the same [`GenerationContext`] to all three emitters.
//!
//! ## Pipeline
//!
//! ```text
//! SchemaProject + GeneratorConfig
//!         │
//!         ├──► SchemaProject::validate() → warnings (never fatal)
//!         ▼
//!   sanitized() → entity names as valid class names
//!         │
//!   resolve()  → ResolvedSchema
//!         │
//!         ├──► python::generate_models()   → app/models.py
//!         ├──► python::generate_schemas()  → app/schemas.py
//!         ├──► python::generate_routes()   → app/routes.py
//!         ▼
//!   GeneratedProject { files, warnings }
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use forge_codegen::{Generator, GeneratorConfig};
//! use forge_ir::load_project;
//!
//! let project = load_project("music.json")?;
//! let config = GeneratorConfig::for_project(&project.project_name);
//!
//! let result = Generator::new(config).generate_and_write(&project)?;
//! println!("Generated {} files", result.file_count());
//! ```

use forge_core::EngineResult;
use forge_ir::SchemaProject;
use serde::Serialize;
use std::path::PathBuf;

use crate::context::GenerationContext;
use crate::{ArtifactKind, GeneratedFile, GeneratedProject, GeneratorConfig};

// ============================================================================
// Generator
// ============================================================================

/// Top-level code generator that orchestrates the full generation pipeline.
///
/// The `Generator` is stateless aside from its configuration.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Create a new generator with the given configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Create a generator with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(GeneratorConfig::default())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: GeneratorConfig) {
        self.config = config;
    }

    /// Run the full pipeline on a schema project.
    ///
    /// Validation findings are attached to the output as warnings; a project
    /// with errors still generates, with the offending parts degraded the way
    /// the resolver degrades them. In strict mode validation errors are
    /// returned instead.
    pub fn generate(&self, project: &SchemaProject) -> EngineResult<GeneratedProject> {
        // ── 1. Validate ──────────────────────────────────────────────────
        let report = project.validate();
        if self.config.strict {
            report.clone().to_result()?;
        }
        let mut warnings: Vec<String> = report
            .errors
            .iter()
            .map(|e| format!("error: {}", e.message))
            .chain(report.warnings.iter().map(|w| format!("warning: {}", w.message)))
            .collect();
        if report.has_errors() {
            tracing::warn!(
                errors = report.errors.len(),
                "Schema has validation errors, generating anyway"
            );
        }

        // ── 2. Resolve ───────────────────────────────────────────────────
        let project = project.sanitized();
        let graph = project.resolve();
        let ctx = GenerationContext::new(&project.project_name, &project.entities, &graph);

        if !ctx.has_entities() {
            warnings.push(
                "No entities defined: the generated files only contain their preamble."
                    .to_string(),
            );
        }

        // ── 3. Emit ──────────────────────────────────────────────────────
        let mut output = GeneratedProject::new(&project.project_name);
        let package = PathBuf::from(&self.config.package_dir);
        for kind in ArtifactKind::ALL {
            output.add_file(GeneratedFile::new(
                package.join(kind.file_name()),
                kind.render(&ctx),
                kind,
            ));
        }

        for warning in warnings {
            output.add_warning(warning);
        }

        tracing::info!(
            files = output.file_count(),
            warnings = output.warnings.len(),
            junction_tables = graph.junctions().len(),
            project = %project.project_name,
            "code generation complete",
        );

        Ok(output)
    }

    /// Generate code and write all files to the configured output directory.
    pub fn generate_and_write(&self, project: &SchemaProject) -> EngineResult<GeneratedProject> {
        let output = self.generate(project)?;
        output.write_to_disk(&self.config.output_dir, self.config.overwrite)?;
        tracing::info!(
            output_dir = %self.config.output_dir.display(),
            files = output.file_count(),
            "files written to disk",
        );
        Ok(output)
    }
}

// ============================================================================
// Standalone convenience functions
// ============================================================================

/// Generate code from a schema project using default configuration.
pub fn generate(project: &SchemaProject) -> EngineResult<GeneratedProject> {
    Generator::with_defaults().generate(project)
}

// ============================================================================
// GenerationSummary
// ============================================================================

/// A short report of a completed generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSummary {
    pub project_name: String,
    /// Relative paths of the generated files
    pub files: Vec<String>,
    pub warning_count: usize,
    pub total_bytes: usize,
}

impl GenerationSummary {
    /// Build a summary from a generated project.
    pub fn from_project(project: &GeneratedProject) -> Self {
        Self {
            project_name: project.name.clone(),
            files: project
                .files
                .iter()
                .map(|f| f.path.to_string_lossy().into_owned())
                .collect(),
            warning_count: project.warnings.len(),
            total_bytes: project.files.iter().map(|f| f.content.len()).sum(),
        }
    }
}

impl std::fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size = if self.total_bytes < 1024 {
            format!("{} B", self.total_bytes)
        } else {
            format!("{:.1} KB", self.total_bytes as f64 / 1024.0)
        };
        writeln!(f, "Project:  {}", self.project_name)?;
        writeln!(f, "Files:    {}", self.files.join(", "))?;
        writeln!(f, "Warnings: {}", self.warning_count)?;
        write!(f, "Size:     {size}")
    }
}

/// Produce a [`GenerationSummary`] from a [`GeneratedProject`].
pub fn summarize(project: &GeneratedProject) -> GenerationSummary {
    GenerationSummary::from_project(project)
}

// ============================================================================
// Tests
// ============================================================================
