//! # Flask Forge CLI
//!
//! Command-line interface for Flask Forge.
//!
//! ## Commands
//!
//! - `generate` - Generate models, schemas and routes from a schema file
//! - `validate` - Validate a schema file
//! - `inspect` - Print the resolved relationship graph
//! - `wizard` - Describe a schema interactively, then generate
//!

pub mod commands;
pub mod wizard;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

// Re-export dependencies for use in main.rs
pub use forge_codegen;
pub use forge_core;
pub use forge_ir;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Environment variable holding the default output directory
pub const OUTPUT_ENV: &str = "FLASK_FORGE_OUTPUT";

// ============================================================================
// Arguments
// ============================================================================

/// Generate Flask-SQLAlchemy models, Marshmallow schemas and CRUD routes
#[derive(Debug, Parser)]
#[command(name = "flask-forge", version, about, long_about = None)]
pub struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse the process arguments
    pub fn from_env() -> Self {
        Self::parse()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate app/models.py, app/schemas.py and app/routes.py from a schema file
    Generate(GenerateArgs),

    /// Check a schema file for problems the generator would silently work around
    Validate {
        /// Schema file (JSON)
        schema: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved relationship graph of a schema file
    Inspect {
        /// Schema file (JSON)
        schema: PathBuf,

        /// Print the graph as JSON
        #[arg(long)]
        json: bool,
    },

    /// Describe a schema interactively, then generate
    Wizard(OutputArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Schema file (JSON)
    pub schema: PathBuf,

    /// Replace the project name from the schema file
    #[arg(long)]
    pub project_name: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output directory (default: ./<project_name>)
    #[arg(short, long, env = OUTPUT_ENV)]
    pub output: Option<PathBuf>,

    /// Print the generated files instead of writing them
    #[arg(long, conflicts_with = "force")]
    pub stdout: bool,

    /// Overwrite existing files
    #[arg(short, long)]
    pub force: bool,

    /// Abort on validation errors instead of generating anyway
    #[arg(long)]
    pub strict: bool,
}

// ============================================================================
// Dispatch
// ============================================================================

/// Run a parsed command line
pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    tracing::debug!(command = ?cli.command, "Running command");

    match &cli.command {
        Command::Generate(args) => commands::generate(args),
        Command::Validate { schema, json } => commands::validate(schema, *json),
        Command::Inspect { schema, json } => commands::inspect(schema, *json),
        Command::Wizard(args) => commands::wizard(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "flask-forge",
            "generate",
            "music.json",
            "-o",
            "out",
            "--force",
            "--project-name",
            "Music",
            "--strict",
        ])
        .unwrap();

        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.schema, PathBuf::from("music.json"));
                assert_eq!(args.output.output, Some(PathBuf::from("out")));
                assert!(args.output.force);
                assert!(!args.output.stdout);
                assert!(args.output.strict);
                assert_eq!(args.project_name.as_deref(), Some("Music"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_stdout_conflicts_with_force() {
        let result = Cli::try_parse_from(["flask-forge", "wizard", "--stdout", "--force"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["flask-forge", "inspect", "music.json", "-v"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
