//! Schema description reading
//!
//! Turns the XML class/aggregation description into a plain tree of
//! `{tag, attributes, children}` nodes. The builder only ever sees this tree,
//! never the XML itself.

use std::collections::BTreeMap;
use std::path::Path;

use schemagen_core::artifact::read_source;
use schemagen_core::{Error, Result};

/// One element of a parsed schema description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionNode {
    /// Element tag (local name, namespace stripped)
    pub tag: String,

    /// Element attributes
    pub attributes: BTreeMap<String, String>,

    /// Child elements in document order
    pub children: Vec<DescriptionNode>,

    /// 1-indexed line of the start tag, when known
    pub line: Option<u32>,
}

impl DescriptionNode {
    /// Create a node with no attributes or children
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            line: None,
        }
    }

    /// Set an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Append a child
    pub fn with_child(mut self, child: DescriptionNode) -> Self {
        self.children.push(child);
        self
    }

    /// Set the source line
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn from_xml(doc: &roxmltree::Document<'_>, node: roxmltree::Node<'_, '_>) -> Self {
        let attributes = node
            .attributes()
            .map(|a| (a.name().to_string(), a.value().to_string()))
            .collect();

        let children = node
            .children()
            .filter(|child| child.is_element())
            .map(|child| Self::from_xml(doc, child))
            .collect();

        Self {
            tag: node.tag_name().name().to_string(),
            attributes,
            children,
            line: Some(doc.text_pos_at(node.range().start).row),
        }
    }
}

/// A parsed schema description plus where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescription {
    /// File path or other label used in messages
    pub source_name: String,

    /// Document element; its children are the declarations
    pub root: DescriptionNode,
}

impl SchemaDescription {
    /// Wrap an already-parsed tree
    pub fn new(source_name: impl Into<String>, root: DescriptionNode) -> Self {
        Self {
            source_name: source_name.into(),
            root,
        }
    }

    /// Load a description from an XML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = read_source(path)?;
        Self::from_xml(path.display().to_string(), &contents)
    }

    /// Parse a description from XML text
    pub fn from_xml(source_name: impl Into<String>, xml: &str) -> Result<Self> {
        let source_name = source_name.into();
        let doc = roxmltree::Document::parse(xml)
            .map_err(|e| Error::parse(source_name.clone(), e.to_string()))?;

        let root = DescriptionNode::from_xml(&doc, doc.root_element());
        tracing::debug!(
            source = %source_name,
            declarations = root.children.len(),
            "schema description parsed"
        );

        Ok(Self { source_name, root })
    }

    /// Top-level declarations in document order
    pub fn declarations(&self) -> &[DescriptionNode] {
        &self.root.children
    }
}
