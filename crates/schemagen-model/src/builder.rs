//! Schema model construction from a parsed description
//!
//! Declarations are applied in document order. The builder either returns a
//! complete model or an error; callers never see a partial model.

use std::path::Path;

use schemagen_core::{
    Aggregation, ClassDef, Diagnostic, DiagnosticCode, Error, Location, Result, SchemaModel,
    Severity,
};

use crate::description::{DescriptionNode, SchemaDescription};
use crate::lint;

/// Tag of a class declaration
pub const CLASS_TAG: &str = "Class";

/// Tag of an attribute declaration nested in a class
pub const ATTRIBUTE_TAG: &str = "Attribute";

/// Tag of an aggregation declaration
pub const AGGREGATION_TAG: &str = "Aggregation";

/// A built model plus the non-fatal findings collected on the way
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltModel {
    /// The complete model
    pub model: SchemaModel,

    /// Lint findings, in discovery order
    pub diagnostics: Vec<Diagnostic>,
}

impl BuiltModel {
    /// Whether any finding is at least a warning
    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity >= Severity::Warn)
    }
}

/// Builds a [`SchemaModel`] from a [`SchemaDescription`]
pub struct SchemaModelBuilder<'a> {
    source_name: &'a str,
    model: SchemaModel,
    diagnostics: Vec<Diagnostic>,
    roots_seen: Vec<String>,
}

impl<'a> SchemaModelBuilder<'a> {
    /// Load and build a model straight from an XML file
    pub fn load(path: &Path) -> Result<BuiltModel> {
        let description = SchemaDescription::from_file(path)?;
        SchemaModelBuilder::build(&description)
    }

    /// Build a model from a parsed description
    pub fn build(description: &'a SchemaDescription) -> Result<BuiltModel> {
        let mut builder = SchemaModelBuilder {
            source_name: &description.source_name,
            model: SchemaModel::new(),
            diagnostics: Vec::new(),
            roots_seen: Vec::new(),
        };

        for declaration in description.declarations() {
            match declaration.tag.as_str() {
                CLASS_TAG => builder.declare_class(declaration)?,
                AGGREGATION_TAG => builder.declare_aggregation(declaration)?,
                other => builder.skip_unknown(declaration, other),
            }
        }

        builder.model.check_references()?;
        builder.finish()
    }

    fn declare_class(&mut self, node: &DescriptionNode) -> Result<()> {
        let name = self.required(node, "name")?;
        let is_root = node.attr("isRoot") == Some("true");

        let mut class = ClassDef::new(name).with_root(is_root);
        if let Some(documentation) = node.attr("documentation") {
            class = class.with_documentation(documentation);
        }

        for child in &node.children {
            if child.tag == ATTRIBUTE_TAG {
                let attr_name = self.required(child, "name")?;
                let attr_type = self.required(child, "type")?;
                class = class.with_attribute(attr_name, attr_type);
            } else {
                self.skip_unknown(child, &child.tag);
            }
        }

        if is_root && !self.roots_seen.iter().any(|seen| seen == name) {
            self.roots_seen.push(name.to_string());
        }

        tracing::debug!(
            class = name,
            is_root,
            attributes = class.attributes.len(),
            "class declared"
        );

        if self.model.insert_class(class).is_some() {
            self.diagnostics.push(
                Diagnostic::warn(
                    DiagnosticCode::SchemaDuplicateClass,
                    format!("Class '{}' is declared more than once; the last declaration replaces earlier ones", name),
                )
                .with_location(self.location(node))
                .with_related(vec![name.to_string()]),
            );
        }

        Ok(())
    }

    fn declare_aggregation(&mut self, node: &DescriptionNode) -> Result<()> {
        let source = self.required(node, "source")?;
        let target = self.required(node, "target")?;

        let mut aggregation = Aggregation::new(target);
        if let Some(multiplicity) = node.attr("sourceMultiplicity") {
            aggregation = aggregation.with_source_multiplicity(multiplicity);
        }
        if let Some(multiplicity) = node.attr("targetMultiplicity") {
            aggregation = aggregation.with_target_multiplicity(multiplicity);
        }

        tracing::debug!(source, target, "aggregation declared");
        self.model.add_aggregation(source, aggregation)
    }

    fn skip_unknown(&mut self, node: &DescriptionNode, tag: &str) {
        tracing::debug!(tag, line = ?node.line, "skipping unrecognized element");
        self.diagnostics.push(
            Diagnostic::new(
                DiagnosticCode::SchemaUnknownElement,
                Severity::Info,
                format!("Element <{}> is not a recognized declaration and was skipped", tag),
            )
            .with_location(self.location(node)),
        );
    }

    fn required<'n>(&self, node: &'n DescriptionNode, attribute: &str) -> Result<&'n str> {
        node.attr(attribute).ok_or_else(|| {
            let at = node
                .line
                .map(|line| format!(" at line {}", line))
                .unwrap_or_default();
            Error::parse(
                self.source_name,
                format!("<{}>{} is missing required attribute '{}'", node.tag, at, attribute),
            )
        })
    }

    fn location(&self, node: &DescriptionNode) -> Location {
        match node.line {
            Some(line) => Location::with_line(self.source_name, line),
            None => Location::new(self.source_name),
        }
    }

    fn finish(mut self) -> Result<BuiltModel> {
        if self.roots_seen.len() > 1 {
            let chosen = self.model.root().unwrap_or_default().to_string();
            tracing::warn!(roots = ?self.roots_seen, chosen = %chosen, "multiple root classes");
            self.diagnostics.push(
                Diagnostic::warn(
                    DiagnosticCode::SchemaMultipleRoots,
                    format!(
                        "{} classes are marked as root; using '{}'",
                        self.roots_seen.len(),
                        chosen
                    ),
                )
                .with_location(Location::new(self.source_name))
                .with_related(self.roots_seen.clone()),
            );
        }

        self.diagnostics
            .extend(lint::lint_model(&self.model, self.source_name));

        tracing::info!(
            source = %self.source_name,
            classes = self.model.len(),
            root = ?self.model.root(),
            findings = self.diagnostics.len(),
            "schema model built"
        );

        Ok(BuiltModel {
            model: self.model,
            diagnostics: self.diagnostics,
        })
    }
}
