//! Diagnostic codes for non-fatal model findings
//!
//! Diagnostic codes are versioned and stable.
//! Never rename or remove codes; add new ones instead.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Schema description findings
    /// More than one class carries `isRoot="true"`; the last one wins
    SchemaMultipleRoots,

    /// No class is marked as root
    SchemaMissingRoot,

    /// A class name is declared twice; the later declaration replaces the first
    SchemaDuplicateClass,

    /// A class or attribute name cannot be used as an element name
    SchemaInvalidName,

    /// A class cannot be reached from the root through aggregations
    SchemaUnreachableClass,

    /// An aggregation cycle is reachable from the root
    SchemaAggregationCycle,

    /// An element with an unrecognized tag was skipped
    SchemaUnknownElement,

    // Delta findings
    /// A key is listed in more than one delta section
    DeltaOverlappingKeys,

    /// General informational message
    Info,
}

impl DiagnosticCode {
    /// The diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SchemaMultipleRoots => "SCHEMA_MULTIPLE_ROOTS",
            Self::SchemaMissingRoot => "SCHEMA_MISSING_ROOT",
            Self::SchemaDuplicateClass => "SCHEMA_DUPLICATE_CLASS",
            Self::SchemaInvalidName => "SCHEMA_INVALID_NAME",
            Self::SchemaUnreachableClass => "SCHEMA_UNREACHABLE_CLASS",
            Self::SchemaAggregationCycle => "SCHEMA_AGGREGATION_CYCLE",
            Self::SchemaUnknownElement => "SCHEMA_UNKNOWN_ELEMENT",
            Self::DeltaOverlappingKeys => "DELTA_OVERLAPPING_KEYS",
            Self::Info => "INFO",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Should be reviewed, generation still proceeds
    Warn,

    /// Blocking issue
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Position inside an input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File path as supplied
    pub file: String,

    /// Optional line number (1-indexed)
    pub line: Option<u32>,

    /// Optional column number (1-indexed)
    pub column: Option<u32>,
}

impl Location {
    /// Create a new location with just a file path
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: None,
            column: None,
        }
    }

    /// Create a location with file and line number
    pub fn with_line(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line: Some(line),
            column: None,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file)?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
            if let Some(column) = self.column {
                write!(f, ":{}", column)?;
            }
        }
        Ok(())
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Source location (best-effort)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    /// Class names involved in the finding
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            location: None,
            related: Vec::new(),
        }
    }

    /// Shorthand for a warning
    pub fn warn(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Warn, message)
    }

    /// Set the location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set related class names
    pub fn with_related(mut self, related: Vec<String>) -> Self {
        self.related = related;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_code_stability() {
        assert_eq!(DiagnosticCode::SchemaMultipleRoots.as_str(), "SCHEMA_MULTIPLE_ROOTS");
        assert_eq!(DiagnosticCode::DeltaOverlappingKeys.as_str(), "DELTA_OVERLAPPING_KEYS");
    }

    #[test]
    fn diagnostic_serialization() {
        let diag = Diagnostic::warn(
            DiagnosticCode::SchemaDuplicateClass,
            "Class 'MGMT' declared twice",
        )
        .with_location(Location::with_line("input.xml", 12));

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("SCHEMA_DUPLICATE_CLASS"));
        assert!(json.contains("\"warn\""));
        assert!(!json.contains("related"));
    }

    #[test]
    fn location_display() {
        assert_eq!(Location::new("a.xml").to_string(), "a.xml");
        assert_eq!(Location::with_line("a.xml", 3).to_string(), "a.xml:3");
    }
}
