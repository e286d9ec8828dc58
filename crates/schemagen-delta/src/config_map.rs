//! Flat key/value configuration maps

use std::path::Path;

use serde_json::{Map, Value};

use schemagen_core::artifact::{read_source, write_json};
use schemagen_core::{Error, Result};

/// Flat string-keyed configuration; values are arbitrary JSON
pub type ConfigMap = Map<String, Value>;

/// Load a config map from a JSON file holding a single object
pub fn load_config_map(path: &Path) -> Result<ConfigMap> {
    let contents = read_source(path)?;
    parse_config_map(path.display().to_string(), &contents)
}

/// Parse a config map from JSON text
pub fn parse_config_map(source_name: impl Into<String>, json: &str) -> Result<ConfigMap> {
    let source_name = source_name.into();
    let value: Value =
        serde_json::from_str(json).map_err(|e| Error::parse(source_name.clone(), e.to_string()))?;

    match value {
        Value::Object(map) => {
            tracing::debug!(source = %source_name, keys = map.len(), "config map loaded");
            Ok(map)
        }
        other => Err(Error::parse(
            source_name,
            format!("expected a JSON object at top level, found {}", json_kind(&other)),
        )),
    }
}

/// Write a config map as pretty JSON, returning the artifact digest
pub fn save_config_map(path: &Path, map: &ConfigMap) -> Result<String> {
    write_json(path, map)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_object() {
        let map = parse_config_map("c.json", r#"{"a": 1, "b": {"nested": [true]}}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["b"], json!({"nested": [true]}));
    }

    #[test]
    fn non_object_is_parse_error() {
        let err = parse_config_map("list.json", "[1, 2]").unwrap_err();
        match err {
            Error::Parse { message, .. } => assert!(message.contains("an array")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_json_is_parse_error() {
        assert!(matches!(
            parse_config_map("bad.json", "{\"a\": }"),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let map = parse_config_map("inline", r#"{"x": "1", "y": null}"#).unwrap();
        save_config_map(&path, &map).unwrap();

        assert_eq!(load_config_map(&path).unwrap(), map);
    }

    #[test]
    fn missing_file_is_not_found() {
        assert!(matches!(
            load_config_map(Path::new("/no/such/config.json")),
            Err(Error::NotFound { .. })
        ));
    }
}
