//! Error taxonomy shared by every generation stage
//!
//! Error codes are stable strings. They end up in run reports, so never
//! rename them.

use serde::{Deserialize, Serialize};

/// Stable error code carried into reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// An input resource is absent
    NotFound,

    /// An input resource exists but is structurally invalid
    ParseError,

    /// An aggregation references an unknown class
    ReferenceError,

    /// An aggregation cycle is reachable from the root
    CyclicModel,

    /// The model has no root class
    MissingRoot,

    /// An output resource could not be persisted
    WriteError,
}

impl ErrorCode {
    /// The code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::ParseError => "PARSE_ERROR",
            Self::ReferenceError => "REFERENCE_ERROR",
            Self::CyclicModel => "CYCLIC_MODEL",
            Self::MissingRoot => "MISSING_ROOT",
            Self::WriteError => "WRITE_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stage failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("input not found: {path}")]
    NotFound { path: String },

    #[error("failed to parse {source_name}: {message}")]
    Parse { source_name: String, message: String },

    #[error("aggregation {source_class} -> {target_class} references unknown class '{unknown}'")]
    Reference {
        source_class: String,
        target_class: String,
        unknown: String,
    },

    #[error("aggregation cycle reachable from root: {}", .path.join(" -> "))]
    CyclicModel { path: Vec<String> },

    #[error("schema model has no root class")]
    MissingRoot,

    #[error("failed to write {path}: {message}")]
    Write { path: String, message: String },
}

impl Error {
    /// Shorthand for a parse failure
    pub fn parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a missing input
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Shorthand for a write failure
    pub fn write(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Stable code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Parse { .. } => ErrorCode::ParseError,
            Self::Reference { .. } => ErrorCode::ReferenceError,
            Self::CyclicModel { .. } => ErrorCode::CyclicModel,
            Self::MissingRoot => ErrorCode::MissingRoot,
            Self::Write { .. } => ErrorCode::WriteError,
        }
    }
}

/// Result alias for stage operations
pub type Result<T, E = Error> = std::result::Result<T, E>;
