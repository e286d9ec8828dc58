//! schemagen core
//!
//! Shared domain model, error taxonomy, configuration and run report.
//! Error and diagnostic codes are part of the public API; never rename them.

pub mod artifact;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod model;
pub mod report;

pub use config::{Config, ConfigError, EmitSettings, InputPaths, OutputPaths};
pub use diagnostic::{Diagnostic, DiagnosticCode, Location, Severity};
pub use error::{Error, ErrorCode, Result};
pub use model::{Aggregation, Attribute, ClassDef, Multiplicity, SchemaModel};
pub use report::{Report, ReportSummary, ReportVersion, Stage, StageOutcome, StageStatus};
