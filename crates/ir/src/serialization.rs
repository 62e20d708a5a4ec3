//! Loading schema descriptions from JSON
//!
//! The tool only ever reads schema files; it never writes them back.
//!
//! ```json
//! {
//!   "projectName": "Music Tracker",
//!   "entities": [{ "name": "Track", "fields": [{ "name": "title", "type": "String" }] }],
//!   "relationships": [{ "entityA": "Track", "entityB": "Artist", "aHasMany": false, "bHasMany": true }]
//! }
//! ```

use crate::SchemaProject;
use forge_core::{EngineError, EngineResult};
use std::path::Path;

/// Load a schema project from a file
pub fn load_project(path: impl AsRef<Path>) -> EngineResult<SchemaProject> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(EngineError::SchemaNotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|e| EngineError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let project = load_project_from_bytes(&bytes).map_err(|e| match e {
        EngineError::JsonSerialization(je) => EngineError::FileRead {
            path: path.to_path_buf(),
            message: format!("Invalid schema file format: {}", je),
        },
        other => other,
    })?;

    tracing::debug!(
        path = %path.display(),
        entities = project.entities.len(),
        relationships = project.relationships.len(),
        "Loaded schema"
    );

    Ok(project)
}

/// Load a schema project from a JSON string
pub fn load_project_from_string(json: &str) -> EngineResult<SchemaProject> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(EngineError::InvalidSchemaFormat(
            "top-level value must be an object".to_string(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}

/// Load a schema project from bytes
pub fn load_project_from_bytes(bytes: &[u8]) -> EngineResult<SchemaProject> {
    let json = std::str::from_utf8(bytes)
        .map_err(|e| EngineError::InvalidSchemaFormat(format!("Invalid UTF-8: {}", e)))?;
    load_project_from_string(json)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MUSIC: &str = r#"{
        "projectName": "Music Tracker",
        "entities": [
            {"name": "Track", "fields": [{"name": "title", "type": "String"}]},
            {"name": "Artist", "fields": [{"name": "name", "type": "String"}]}
        ],
        "relationships": [
            {"entityA": "Track", "entityB": "Artist", "aHasMany": false, "bHasMany": true}
        ]
    }"#;

    #[test]
    fn test_load_from_string() {
        let project = load_project_from_string(MUSIC).unwrap();
        assert_eq!(project.project_name, "Music Tracker");
        assert_eq!(project.entities.len(), 2);
        assert!(!project.relationships[0].skip);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let project = load_project_from_string(r#"{"projectName": "Empty"}"#).unwrap();
        assert!(project.entities.is_empty());
        assert!(project.relationships.is_empty());
    }

    #[test]
    fn test_rejects_non_object() {
        let err = load_project_from_string("[]").unwrap_err();
        assert!(matches!(err, EngineError::InvalidSchemaFormat(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MUSIC.as_bytes()).unwrap();

        let project = load_project(file.path()).unwrap();
        assert_eq!(project.entities[1].name, "Artist");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_project("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, EngineError::SchemaNotFound(_)));
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = load_project(file.path()).unwrap_err();
        assert!(matches!(err, EngineError::FileRead { .. }));
    }

    #[test]
    fn test_load_file_with_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[b'{', 0xff, b'}']).unwrap();

        let err = load_project(file.path()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSchemaFormat(_)));
    }

    #[test]
    fn test_load_from_bytes_rejects_invalid_utf8() {
        let err = load_project_from_bytes(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidSchemaFormat(_)));
    }
}
