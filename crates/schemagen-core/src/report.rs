//! Run report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};

use crate::diagnostic::{Diagnostic, Severity};
use crate::error::{Error, ErrorCode};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// One artifact-generation stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Nested element document (`config.xml`)
    ConfigXml,

    /// Per-class meta descriptors (`meta.json`)
    Meta,

    /// Difference between base and target config (`delta.json`)
    Delta,

    /// Base config with the delta applied (`res_patched_config.json`)
    Patch,
}

impl Stage {
    /// All stages in execution order
    pub const ALL: [Stage; 4] = [Stage::ConfigXml, Stage::Meta, Stage::Delta, Stage::Patch];

    /// Stable identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigXml => "config_xml",
            Self::Meta => "meta",
            Self::Delta => "delta",
            Self::Patch => "patch",
        }
    }

    /// Output file name used when none is configured
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Self::ConfigXml => "config.xml",
            Self::Meta => "meta.json",
            Self::Delta => "delta.json",
            Self::Patch => "res_patched_config.json",
        }
    }

    /// Whether the stage needs the schema model
    pub fn needs_model(&self) -> bool {
        matches!(self, Self::ConfigXml | Self::Meta)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome status of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    /// Artifact written
    Succeeded,

    /// Stage failed; later stages still ran
    Failed,

    /// Stage not attempted
    Skipped,
}

/// Result of running one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageOutcome {
    /// Which stage
    pub stage: Stage,

    /// Outcome status
    pub status: StageStatus,

    /// Output path, when written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// SHA-256 of the written artifact (hex)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    /// Error code, when failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,

    /// Human-readable detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StageOutcome {
    /// A stage that wrote its artifact
    pub fn succeeded(stage: Stage, output: impl Into<String>, sha256: impl Into<String>) -> Self {
        Self {
            stage,
            status: StageStatus::Succeeded,
            output: Some(output.into()),
            sha256: Some(sha256.into()),
            error_code: None,
            message: None,
        }
    }

    /// A stage that failed with `error`
    pub fn failed(stage: Stage, error: &Error) -> Self {
        Self {
            stage,
            status: StageStatus::Failed,
            output: None,
            sha256: None,
            error_code: Some(error.code()),
            message: Some(error.to_string()),
        }
    }

    /// A stage that was not attempted
    pub fn skipped(stage: Stage, reason: impl Into<String>) -> Self {
        Self {
            stage,
            status: StageStatus::Skipped,
            output: None,
            sha256: None,
            error_code: None,
            message: Some(reason.into()),
        }
    }
}

/// Summary statistics for a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total number of diagnostics
    pub total: usize,

    /// Number of error diagnostics
    pub errors: usize,

    /// Number of warning diagnostics
    pub warnings: usize,

    /// Number of info diagnostics
    pub info: usize,

    /// Number of stages that wrote an artifact
    pub stages_succeeded: usize,

    /// Number of stages that failed
    pub stages_failed: usize,
}

/// Run report (report.json v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (RFC 3339)
    pub timestamp: String,

    /// Summary statistics
    pub summary: ReportSummary,

    /// Model findings
    pub diagnostics: Vec<Diagnostic>,

    /// One entry per stage, in execution order
    pub stages: Vec<StageOutcome>,
}

impl Report {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: ReportSummary::default(),
            diagnostics: Vec::new(),
            stages: Vec::new(),
        }
    }

    /// Add a diagnostic to the report
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.summary.errors += 1,
            Severity::Warn => self.summary.warnings += 1,
            Severity::Info => self.summary.info += 1,
        }

        self.summary.total += 1;
        self.diagnostics.push(diagnostic);
    }

    /// Add several diagnostics
    pub fn extend_diagnostics(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.add_diagnostic(diagnostic);
        }
    }

    /// Record a stage outcome
    pub fn record_stage(&mut self, outcome: StageOutcome) {
        match outcome.status {
            StageStatus::Succeeded => self.summary.stages_succeeded += 1,
            StageStatus::Failed => self.summary.stages_failed += 1,
            StageStatus::Skipped => {}
        }
        self.stages.push(outcome);
    }

    /// Outcome recorded for `stage`
    pub fn stage(&self, stage: Stage) -> Option<&StageOutcome> {
        self.stages.iter().find(|o| o.stage == stage)
    }

    /// Check if any stage failed
    pub fn has_failures(&self) -> bool {
        self.summary.stages_failed > 0
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), Error> {
        let json = self
            .to_json()
            .map_err(|e| Error::write(path.display().to_string(), e.to_string()))?;
        std::fs::write(path, json)
            .map_err(|e| Error::write(path.display().to_string(), e.to_string()))
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}
