//! Document emitter: renders the aggregation tree below the root class
//!
//! Every class occurrence along an aggregation path becomes one element.
//! Attributes become child elements whose text is the attribute's type label:
//!
//! ```text
//! <BTS>
//!     <id>uint32</id>
//!     <MGMT>
//!         <MetricJob>
//!             <jobId>uint32</jobId>
//!         </MetricJob>
//!     </MGMT>
//! </BTS>
//! ```

use schemagen_core::{ClassDef, EmitSettings, Error, Result, SchemaModel};

/// Layout and safety limits for emission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitOptions {
    /// Spaces per nesting level
    pub indent_width: usize,

    /// Deepest aggregation path rendered before giving up
    pub max_depth: usize,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self::from(&EmitSettings::default())
    }
}

impl From<&EmitSettings> for EmitOptions {
    fn from(settings: &EmitSettings) -> Self {
        Self {
            indent_width: settings.indent_width,
            max_depth: settings.max_depth,
        }
    }
}

/// Renders a [`SchemaModel`] as a nested element document
pub struct DocumentEmitter<'m> {
    model: &'m SchemaModel,
    options: EmitOptions,
}

impl<'m> DocumentEmitter<'m> {
    /// Emitter with default options
    pub fn new(model: &'m SchemaModel) -> Self {
        Self {
            model,
            options: EmitOptions::default(),
        }
    }

    /// Override the options
    pub fn with_options(mut self, options: EmitOptions) -> Self {
        self.options = options;
        self
    }

    /// Render the whole document
    ///
    /// Fails with `MissingRoot` when no root is designated, `Reference` when an
    /// aggregation names an unknown class, and `CyclicModel` when a class
    /// aggregates one of its own ancestors or the path exceeds `max_depth`.
    pub fn emit(&self) -> Result<String> {
        let root = self.model.root_class().ok_or(Error::MissingRoot)?;

        let mut out = String::new();
        let mut path = Vec::new();
        self.emit_class(root, 0, &mut path, &mut out)?;

        tracing::debug!(root = %root.name, bytes = out.len(), "document emitted");
        Ok(out)
    }

    fn emit_class<'a>(
        &'a self,
        class: &'a ClassDef,
        depth: usize,
        path: &mut Vec<&'a str>,
        out: &mut String,
    ) -> Result<()> {
        if depth > self.options.max_depth {
            let mut cycle: Vec<String> = path.iter().map(|c| c.to_string()).collect();
            cycle.push(class.name.clone());
            return Err(Error::CyclicModel { path: cycle });
        }

        path.push(&class.name);

        let indent = self.indent(depth);
        let inner = self.indent(depth + 1);

        out.push_str(&format!("{}<{}>\n", indent, class.name));

        for attribute in &class.attributes {
            out.push_str(&format!(
                "{}<{name}>{}</{name}>\n",
                inner,
                escape_text(&attribute.type_label),
                name = attribute.name
            ));
        }

        for target in class.aggregation_targets() {
            if let Some(start) = path.iter().position(|c| *c == target) {
                let mut cycle: Vec<String> = path[start..].iter().map(|c| c.to_string()).collect();
                cycle.push(target.to_string());
                return Err(Error::CyclicModel { path: cycle });
            }

            let child = self.model.class(target).ok_or_else(|| Error::Reference {
                source_class: class.name.clone(),
                target_class: target.to_string(),
                unknown: target.to_string(),
            })?;

            self.emit_class(child, depth + 1, path, out)?;
        }

        out.push_str(&format!("{}</{}>\n", indent, class.name));
        path.pop();
        Ok(())
    }

    fn indent(&self, depth: usize) -> String {
        " ".repeat(depth * self.options.indent_width)
    }
}

/// Escape characters that would otherwise end element text
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schemagen_core::{Aggregation, ClassDef};

    fn bts_model() -> SchemaModel {
        SchemaModel::from_classes(vec![
            ClassDef::new("BTS")
                .with_root(true)
                .with_attribute("id", "uint32")
                .with_attribute("name", "string")
                .with_aggregation(Aggregation::new("MGMT"))
                .with_aggregation(Aggregation::new("HWE"))
                .with_aggregation(Aggregation::new("COMM")),
            ClassDef::new("MGMT")
                .with_aggregation(Aggregation::new("MetricJob").with_source_multiplicity("0..100")),
            ClassDef::new("MetricJob").with_attribute("jobId", "uint32"),
            ClassDef::new("HWE"),
            ClassDef::new("COMM"),
        ])
    }

    #[test]
    fn emits_nested_document() {
        let doc = DocumentEmitter::new(&bts_model()).emit().unwrap();

        let expected = "\
<BTS>
    <id>uint32</id>
    <name>string</name>
    <MGMT>
        <MetricJob>
            <jobId>uint32</jobId>
        </MetricJob>
    </MGMT>
    <HWE>
    </HWE>
    <COMM>
    </COMM>
</BTS>
";
        assert_eq!(doc, expected);
    }

    #[test]
    fn custom_indent_width() {
        let model = SchemaModel::from_classes(vec![
            ClassDef::new("R")
                .with_root(true)
                .with_aggregation(Aggregation::new("C")),
            ClassDef::new("C").with_attribute("a", "int"),
        ]);
        let doc = DocumentEmitter::new(&model)
            .with_options(EmitOptions { indent_width: 2, max_depth: 8 })
            .emit()
            .unwrap();

        assert_eq!(doc, "<R>\n  <C>\n    <a>int</a>\n  </C>\n</R>\n");
    }

    #[test]
    fn shared_class_renders_on_every_path() {
        let model = SchemaModel::from_classes(vec![
            ClassDef::new("R")
                .with_root(true)
                .with_aggregation(Aggregation::new("A"))
                .with_aggregation(Aggregation::new("B")),
            ClassDef::new("A").with_aggregation(Aggregation::new("Leaf")),
            ClassDef::new("B").with_aggregation(Aggregation::new("Leaf")),
            ClassDef::new("Leaf"),
        ]);
        let doc = DocumentEmitter::new(&model).emit().unwrap();
        assert_eq!(doc.matches("<Leaf>").count(), 2);
    }

    #[test]
    fn missing_root_fails() {
        let model = SchemaModel::from_classes(vec![ClassDef::new("A")]);
        assert_eq!(DocumentEmitter::new(&model).emit(), Err(Error::MissingRoot));
    }

    #[test]
    fn cycle_is_reported_with_path() {
        let model = SchemaModel::from_classes(vec![
            ClassDef::new("A").with_root(true).with_aggregation(Aggregation::new("B")),
            ClassDef::new("B").with_aggregation(Aggregation::new("C")),
            ClassDef::new("C").with_aggregation(Aggregation::new("B")),
        ]);
        assert_eq!(
            DocumentEmitter::new(&model).emit(),
            Err(Error::CyclicModel {
                path: vec!["B".into(), "C".into(), "B".into()]
            })
        );
    }

    #[test]
    fn depth_limit_is_enforced() {
        let model = SchemaModel::from_classes(vec![
            ClassDef::new("A").with_root(true).with_aggregation(Aggregation::new("B")),
            ClassDef::new("B").with_aggregation(Aggregation::new("C")),
            ClassDef::new("C"),
        ]);
        let result = DocumentEmitter::new(&model)
            .with_options(EmitOptions { indent_width: 4, max_depth: 1 })
            .emit();
        assert!(matches!(result, Err(Error::CyclicModel { .. })));
    }

    #[test]
    fn unknown_target_is_reference_error() {
        let model = SchemaModel::from_classes(vec![
            ClassDef::new("A").with_root(true).with_aggregation(Aggregation::new("Ghost")),
        ]);
        assert!(matches!(
            DocumentEmitter::new(&model).emit(),
            Err(Error::Reference { ref unknown, .. }) if unknown == "Ghost"
        ));
    }

    #[test]
    fn type_labels_are_escaped() {
        let model = SchemaModel::from_classes(vec![
            ClassDef::new("A").with_root(true).with_attribute("list", "vector<int>"),
        ]);
        let doc = DocumentEmitter::new(&model).emit().unwrap();
        assert!(doc.contains("<list>vector&lt;int&gt;</list>"));
    }
}
