//! Integration tests for loading the fixture schema description

use pretty_assertions::assert_eq;
use schemagen_core::{DiagnosticCode, Error};
use schemagen_model::{AggregationGraph, SchemaDescription, SchemaModelBuilder};
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures")
        .join(name)
}

#[test]
fn load_fixture_model() {
    let built = SchemaModelBuilder::load(&fixture("impulse_test_input.xml")).unwrap();
    let model = &built.model;

    assert_eq!(model.root(), Some("BTS"));
    assert_eq!(
        model.class_names(),
        vec!["BTS", "MGMT", "MetricJob", "CPLANE", "RU", "HWE", "COMM"]
    );

    let bts = model.root_class().unwrap();
    assert_eq!(bts.documentation.as_deref(), Some("Base transceiver station"));
    assert_eq!(
        bts.aggregation_targets().collect::<Vec<_>>(),
        vec!["MGMT", "HWE", "COMM"]
    );

    let mgmt = model.class("MGMT").unwrap();
    assert_eq!(mgmt.first_aggregation_bounds().max, "100");

    assert!(!built.has_warnings(), "unexpected findings: {:?}", built.diagnostics);
}

#[test]
fn fixture_graph_reaches_every_class() {
    let built = SchemaModelBuilder::load(&fixture("impulse_test_input.xml")).unwrap();
    let graph = AggregationGraph::from_model(&built.model);

    assert!(graph.unreachable_from("BTS").is_empty());
    assert_eq!(graph.find_cycle_from("BTS"), None);
}

#[test]
fn missing_schema_file() {
    let err = SchemaModelBuilder::load(&fixture("no_such_schema.xml")).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test]
fn cyclic_description_builds_with_warning() {
    let xml = r#"<XMI>
        <Class name="A" isRoot="true"/>
        <Class name="B"/>
        <Aggregation source="A" target="B" sourceMultiplicity="1" targetMultiplicity="1"/>
        <Aggregation source="B" target="A" sourceMultiplicity="1" targetMultiplicity="1"/>
    </XMI>"#;

    let description = SchemaDescription::from_xml("cycle.xml", xml).unwrap();
    let built = SchemaModelBuilder::build(&description).unwrap();

    assert!(built
        .diagnostics
        .iter()
        .any(|d| d.code == DiagnosticCode::SchemaAggregationCycle));
}

#[test]
fn duplicate_class_location_points_at_redeclaration() {
    let xml = "<XMI>\n<Class name=\"A\" isRoot=\"true\"/>\n<Class name=\"A\" isRoot=\"true\"/>\n</XMI>";

    let description = SchemaDescription::from_xml("dup.xml", xml).unwrap();
    let built = SchemaModelBuilder::build(&description).unwrap();

    let duplicate = built
        .diagnostics
        .iter()
        .find(|d| d.code == DiagnosticCode::SchemaDuplicateClass)
        .unwrap();
    assert_eq!(duplicate.location.as_ref().and_then(|l| l.line), Some(3));
}
