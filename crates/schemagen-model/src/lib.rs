//! Schema description reading and model construction
//!
//! This crate handles:
//! - Parsing the XML class/aggregation description into a plain node tree
//! - Building the [`SchemaModel`](schemagen_core::SchemaModel) from that tree
//! - Aggregation graph traversal (reachability, cycle search)
//! - Non-fatal model lints

pub mod builder;
pub mod description;
pub mod graph;
pub mod lint;

pub use builder::{BuiltModel, SchemaModelBuilder};
pub use description::{DescriptionNode, SchemaDescription};
pub use graph::AggregationGraph;
pub use lint::{is_valid_element_name, lint_model};
