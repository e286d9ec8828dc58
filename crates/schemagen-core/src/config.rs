//! Configuration schema (schemagen.toml)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::report::Stage;

/// Input file locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputPaths {
    /// XML schema description
    pub schema: PathBuf,

    /// Base flat configuration
    pub base: PathBuf,

    /// Target flat configuration
    pub target: PathBuf,
}

impl Default for InputPaths {
    fn default() -> Self {
        Self {
            schema: PathBuf::from("impulse_test_input.xml"),
            base: PathBuf::from("config.json"),
            target: PathBuf::from("patched_config.json"),
        }
    }
}

/// Output file locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    /// Directory every output is placed in (project root when unset)
    pub dir: Option<PathBuf>,

    /// Nested element document
    pub config_xml: PathBuf,

    /// Meta descriptors
    pub meta: PathBuf,

    /// Delta document; also the input of the patch stage
    pub delta: PathBuf,

    /// Patched configuration
    pub patched: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            dir: None,
            config_xml: PathBuf::from(Stage::ConfigXml.default_file_name()),
            meta: PathBuf::from(Stage::Meta.default_file_name()),
            delta: PathBuf::from(Stage::Delta.default_file_name()),
            patched: PathBuf::from(Stage::Patch.default_file_name()),
        }
    }
}

impl OutputPaths {
    fn file_for(&self, stage: Stage) -> &Path {
        match stage {
            Stage::ConfigXml => &self.config_xml,
            Stage::Meta => &self.meta,
            Stage::Delta => &self.delta,
            Stage::Patch => &self.patched,
        }
    }
}

/// Document emission settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitSettings {
    /// Spaces per nesting level
    pub indent_width: usize,

    /// Deepest aggregation path rendered before giving up
    pub max_depth: usize,
}

impl Default for EmitSettings {
    fn default() -> Self {
        Self {
            indent_width: 4,
            max_depth: 64,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Input locations
    #[serde(default)]
    pub inputs: InputPaths,

    /// Output locations
    #[serde(default)]
    pub outputs: OutputPaths,

    /// Emitter settings
    #[serde(default)]
    pub emit: EmitSettings,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: InputPaths::default(),
            outputs: OutputPaths::default(),
            emit: EmitSettings::default(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Relative paths in the file are relative to the file itself
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Resolve a path against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.project_root.join(path)
    }

    /// Resolved schema description path
    pub fn schema_path(&self) -> PathBuf {
        self.resolve(&self.inputs.schema)
    }

    /// Resolved base config path
    pub fn base_path(&self) -> PathBuf {
        self.resolve(&self.inputs.base)
    }

    /// Resolved target config path
    pub fn target_path(&self) -> PathBuf {
        self.resolve(&self.inputs.target)
    }

    /// Resolved output directory
    pub fn output_dir(&self) -> PathBuf {
        match &self.outputs.dir {
            Some(dir) => self.resolve(dir),
            None => self.project_root.clone(),
        }
    }

    /// Resolved output path of `stage`
    pub fn output_path(&self, stage: Stage) -> PathBuf {
        self.output_dir().join(self.outputs.file_for(stage))
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.inputs.schema, PathBuf::from("impulse_test_input.xml"));
        assert_eq!(config.outputs.delta, PathBuf::from("delta.json"));
        assert_eq!(config.emit.indent_width, 4);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [inputs]
            schema = "model/bts.xml"

            [emit]
            max_depth = 8
            "#,
        )
        .unwrap();

        assert_eq!(config.inputs.schema, PathBuf::from("model/bts.xml"));
        assert_eq!(config.inputs.base, PathBuf::from("config.json"));
        assert_eq!(config.emit.max_depth, 8);
        assert_eq!(config.emit.indent_width, 4);
    }

    #[test]
    fn output_paths_join_dir() {
        let mut config = Config::from_toml("[outputs]\ndir = \"out\"").unwrap();
        config.project_root = PathBuf::from("/project");

        assert_eq!(
            config.output_path(Stage::Meta),
            PathBuf::from("/project/out/meta.json")
        );
        assert_eq!(config.schema_path(), PathBuf::from("/project/impulse_test_input.xml"));
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        assert!(matches!(
            Config::from_toml("[inputs\nschema = 1"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schemagen.toml");

        let mut config = Config::default();
        config.emit.indent_width = 2;
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.emit.indent_width, 2);
        assert_eq!(loaded.project_root, dir.path());
    }
}
