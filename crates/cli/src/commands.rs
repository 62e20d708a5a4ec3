//! Command implementations
//!
//! Each command returns the process exit code; I/O and parse failures come
//! back as `anyhow` errors with the offending path attached.

use anyhow::{Context, Result};
use colored::Colorize;
use forge_codegen::{GeneratedProject, Generator, GeneratorConfig, summarize};
use forge_ir::{
    JunctionTable, ResolvedRelationship, SchemaProject, ValidationResult, load_project,
};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::wizard;
use crate::{GenerateArgs, OutputArgs};

// ============================================================================
// generate
// ============================================================================

pub fn generate(args: &GenerateArgs) -> Result<ExitCode> {
    let mut project = read_schema(&args.schema)?;
    if let Some(name) = &args.project_name {
        project.project_name = name.clone();
    }

    let config = output_config(&project.project_name, &args.output);
    let output = Generator::new(config.clone()).generate(&project)?;
    deliver(&output, &config, &args.output)
}

// ============================================================================
// wizard
// ============================================================================

pub fn wizard(args: &OutputArgs) -> Result<ExitCode> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut prompts = io::stderr();

    // Generation ignores the output directory; it is settled below once the
    // project name is known.
    let generator = Generator::new(output_config("", args));
    let state = wizard::run_prompts(&mut input, &mut prompts, &generator)?;
    let output = state
        .generated
        .context("wizard finished without generating")?;

    deliver(&output, &output_config(&state.project_name, args), args)
}

// ============================================================================
// Output
// ============================================================================

/// Generator settings for a project, from the output flags.
pub fn output_config(project_name: &str, args: &OutputArgs) -> GeneratorConfig {
    let mut config = match &args.output {
        Some(dir) => GeneratorConfig::new().with_output_dir(dir),
        None => GeneratorConfig::for_project(project_name),
    };
    if args.force {
        config = config.allow_overwrite();
    }
    if args.strict {
        config = config.strict();
    }
    config
}

/// Print generated files, or write them under `config.output_dir`.
pub fn deliver(
    output: &GeneratedProject,
    config: &GeneratorConfig,
    args: &OutputArgs,
) -> Result<ExitCode> {
    print_warnings(output);

    if args.stdout {
        print_files(output)?;
        return Ok(ExitCode::SUCCESS);
    }

    let written = write_files(output, config)?;
    println!("{} {}", "Generated".green().bold(), output.name);
    for path in &written {
        println!("  {}", path.display());
    }
    tracing::debug!(summary = %summarize(output), "Generation finished");

    Ok(ExitCode::SUCCESS)
}

fn write_files(output: &GeneratedProject, config: &GeneratorConfig) -> Result<Vec<PathBuf>> {
    output
        .write_to_disk(&config.output_dir, config.overwrite)
        .with_context(|| format!("failed to write into {}", config.output_dir.display()))
}

fn print_warnings(output: &GeneratedProject) {
    for warning in &output.warnings {
        eprintln!("{} {}", "note:".yellow().bold(), warning);
    }
}

fn print_files(output: &GeneratedProject) -> Result<()> {
    let mut stdout = io::stdout().lock();
    for (i, file) in output.files.iter().enumerate() {
        if i > 0 {
            writeln!(stdout)?;
        }
        writeln!(stdout, "==> {} <==", file.path.display())?;
        write!(stdout, "{}", file.content)?;
    }
    Ok(())
}

// ============================================================================
// validate
// ============================================================================

pub fn validate(schema: &Path, json: bool) -> Result<ExitCode> {
    let project = read_schema(schema)?;
    let result = project.validate();

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_validation(&result);
    }

    Ok(if result.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_validation(result: &ValidationResult) {
    for error in &result.errors {
        println!("{} {}", "error:".red().bold(), error);
        if let Some(suggestion) = &error.suggestion {
            println!("  {} {}", "hint:".cyan(), suggestion);
        }
    }
    for warning in &result.warnings {
        println!("{} {}", "warning:".yellow().bold(), warning.message);
    }

    if result.has_errors() {
        println!(
            "{} {} error(s), {} warning(s)",
            "Invalid:".red().bold(),
            result.errors.len(),
            result.warnings.len()
        );
    } else {
        println!(
            "{} {} warning(s)",
            "Valid:".green().bold(),
            result.warnings.len()
        );
    }
}

// ============================================================================
// inspect
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphReport<'a> {
    project_name: &'a str,
    entities: Vec<EntityReport<'a>>,
    junction_tables: &'a [JunctionTable],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EntityReport<'a> {
    name: &'a str,
    table: String,
    relationships: &'a [ResolvedRelationship],
}

pub fn inspect(schema: &Path, json: bool) -> Result<ExitCode> {
    let project = read_schema(schema)?.sanitized();
    let graph = project.resolve();

    let report = GraphReport {
        project_name: &project.project_name,
        entities: project
            .named_entities()
            .map(|e| EntityReport {
                name: &e.name,
                table: e.table_name(),
                relationships: graph.relationships_for(&e.name),
            })
            .collect(),
        junction_tables: graph.junctions().tables(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", report.project_name.bold());
    for entity in &report.entities {
        println!("{} ({})", entity.name.cyan().bold(), entity.table);
        if entity.relationships.is_empty() {
            println!("  {}", "no relationships".dimmed());
        }
        for rel in entity.relationships {
            let mut line = format!(
                "  {} {} {} ({})",
                rel.relationship_field,
                rel.kind.arrow_symbol(),
                rel.target,
                rel.kind
            );
            if let Some(column) = &rel.foreign_key_column {
                line.push_str(&format!(", fk {column}"));
            }
            if let Some(junction) = &rel.junction_table {
                line.push_str(&format!(", via {junction}"));
            }
            println!("{line}");
        }
    }

    if !report.junction_tables.is_empty() {
        println!("{}", "Junction tables".bold());
        for table in report.junction_tables {
            println!("  {} ({} <-> {})", table.name, table.left, table.right);
        }
    }

    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Helpers
// ============================================================================

fn read_schema(path: &Path) -> Result<SchemaProject> {
    load_project(path).with_context(|| format!("failed to load schema {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_ir::{Entity, Field, RelationshipDeclaration};

    fn music_project() -> SchemaProject {
        SchemaProject::new("Music Tracker")
            .with_entity(Entity::new("Track").with_field(Field::string("title")))
            .with_entity(Entity::new("Artist").with_field(Field::string("name")))
            .with_relationship(RelationshipDeclaration::belongs_to("Track", "Artist"))
    }

    fn args(output: Option<PathBuf>, force: bool) -> OutputArgs {
        OutputArgs {
            output,
            stdout: false,
            force,
            strict: false,
        }
    }

    #[test]
    fn test_output_config_defaults_to_project_dir() {
        let config = output_config("Music Tracker", &args(None, false));
        assert_eq!(config.output_dir, PathBuf::from("./music_tracker"));
        assert!(!config.overwrite);

        let config = output_config("Music Tracker", &args(Some("out".into()), true));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(config.overwrite);
    }

    #[test]
    fn test_deliver_writes_into_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let flags = args(Some(dir.path().to_path_buf()), false);
        let config = output_config("Music Tracker", &flags);
        let output = Generator::new(config.clone()).generate(&music_project()).unwrap();

        assert_eq!(deliver(&output, &config, &flags).unwrap(), ExitCode::SUCCESS);

        let models = std::fs::read_to_string(dir.path().join("app/models.py")).unwrap();
        assert!(models.contains("class Track(db.Model):"));
        assert!(dir.path().join("app/routes.py").exists());

        // Existing files are kept unless overwriting is allowed
        let err = write_files(&output, &config).unwrap_err();
        assert!(format!("{err:#}").contains("already exists"));

        let forced = output_config("Music Tracker", &args(Some(dir.path().to_path_buf()), true));
        assert_eq!(write_files(&output, &forced).unwrap().len(), 3);
    }
}
