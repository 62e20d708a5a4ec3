//! # Forge Core
//!
//! Core types, naming rules and error handling for Flask Forge.
//!
//! This crate provides the foundational building blocks used throughout
//! the workspace, including:
//!
//! - **Naming**: identifier casing, pluralization and entity-name sanitization
//! - **Types**: field types and relationship kinds
//! - **Errors**: unified error handling with `EngineError` and `EngineResult`
//!

pub mod error;
pub mod naming;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{EngineError, EngineResult};
pub use naming::{pluralize, sanitize_entity_name, table_name, to_identifier_case};
pub use types::{FieldType, RelationKind};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
