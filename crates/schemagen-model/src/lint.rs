//! Non-fatal model checks

use std::sync::OnceLock;

use regex::Regex;
use schemagen_core::{Diagnostic, DiagnosticCode, Location, SchemaModel, Severity};

use crate::graph::AggregationGraph;

/// Names usable as element names in the emitted document
fn element_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("element name pattern is valid")
    })
}

/// Whether `name` can be emitted as an element name
pub fn is_valid_element_name(name: &str) -> bool {
    element_name_pattern().is_match(name)
        && !name.to_ascii_lowercase().starts_with("xml")
}

/// Check a built model for problems that do not stop generation
///
/// Missing root, aggregation cycles reachable from the root, classes the root
/// never reaches, and names that would produce a malformed document.
pub fn lint_model(model: &SchemaModel, source_name: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let location = || Location::new(source_name);

    for class in model.classes() {
        if !is_valid_element_name(&class.name) {
            diagnostics.push(
                Diagnostic::warn(
                    DiagnosticCode::SchemaInvalidName,
                    format!("Class name '{}' is not a valid element name", class.name),
                )
                .with_location(location())
                .with_related(vec![class.name.clone()]),
            );
        }

        for attribute in &class.attributes {
            if !is_valid_element_name(&attribute.name) {
                diagnostics.push(
                    Diagnostic::warn(
                        DiagnosticCode::SchemaInvalidName,
                        format!(
                            "Attribute '{}' of class '{}' is not a valid element name",
                            attribute.name, class.name
                        ),
                    )
                    .with_location(location())
                    .with_related(vec![class.name.clone()]),
                );
            }
        }
    }

    let Some(root) = model.root() else {
        if !model.is_empty() {
            diagnostics.push(
                Diagnostic::warn(
                    DiagnosticCode::SchemaMissingRoot,
                    "No class is marked isRoot=\"true\"; config.xml cannot be generated",
                )
                .with_location(location()),
            );
        }
        return diagnostics;
    };

    let graph = AggregationGraph::from_model(model);

    if let Some(cycle) = graph.find_cycle_from(root) {
        diagnostics.push(
            Diagnostic::warn(
                DiagnosticCode::SchemaAggregationCycle,
                format!("Aggregation cycle reachable from root: {}", cycle.join(" -> ")),
            )
            .with_location(location())
            .with_related(cycle),
        );
    }

    let unreachable = graph.unreachable_from(root);
    if !unreachable.is_empty() {
        diagnostics.push(
            Diagnostic::new(
                DiagnosticCode::SchemaUnreachableClass,
                Severity::Info,
                format!(
                    "{} class(es) are not reachable from root '{}' and will not appear in config.xml",
                    unreachable.len(),
                    root
                ),
            )
            .with_location(location())
            .with_related(unreachable),
        );
    }

    diagnostics
}
