//! Schema model types: classes, attributes and aggregations

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A named, typed attribute of a class
///
/// The type is an opaque label (`uint32`, `string`, ...) and is never
/// validated against a fixed set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name
    pub name: String,

    /// Type label
    #[serde(rename = "type")]
    pub type_label: String,
}

impl Attribute {
    /// Create a new attribute
    pub fn new(name: impl Into<String>, type_label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_label: type_label.into(),
        }
    }
}

/// Cardinality bounds parsed from a multiplicity string
///
/// `"0..100"` gives `min = "0"`, `max = "100"`; a single value `"3"` gives
/// `min = max = "3"`. Absent or empty bounds fall back to `"1"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Multiplicity {
    /// Lower bound
    pub min: String,

    /// Upper bound (may be an unbounded marker such as `*` or `many`)
    pub max: String,
}

impl Multiplicity {
    /// Separator between the lower and the upper bound
    pub const RANGE_SEPARATOR: &'static str = "..";

    /// Bound used when a multiplicity is absent or empty
    pub const DEFAULT_BOUND: &'static str = "1";

    /// Parse a raw multiplicity string
    ///
    /// Only the first separator splits the range, so `"1..2..3"` parses to
    /// `min = "1"`, `max = "2..3"`.
    pub fn parse(raw: Option<&str>) -> Self {
        let raw = raw.unwrap_or_default();
        let (min, max) = raw
            .split_once(Self::RANGE_SEPARATOR)
            .unwrap_or((raw, raw));

        Self {
            min: bound_or_default(min),
            max: bound_or_default(max),
        }
    }

    /// The `1..1` multiplicity
    pub fn exactly_one() -> Self {
        Self::parse(None)
    }

    /// Whether both bounds are equal
    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }
}

impl Default for Multiplicity {
    fn default() -> Self {
        Self::exactly_one()
    }
}

impl std::fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_fixed() {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}..{}", self.min, self.max)
        }
    }
}

fn bound_or_default(bound: &str) -> String {
    if bound.is_empty() {
        Multiplicity::DEFAULT_BOUND.to_string()
    } else {
        bound.to_string()
    }
}

/// Directed "has-a" edge from its owning class to `target`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    /// Name of the aggregated class
    pub target: String,

    /// Raw multiplicity on the source end
    #[serde(default)]
    pub source_multiplicity: Option<String>,

    /// Raw multiplicity on the target end
    #[serde(default)]
    pub target_multiplicity: Option<String>,
}

impl Aggregation {
    /// Create an aggregation without multiplicities
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            source_multiplicity: None,
            target_multiplicity: None,
        }
    }

    /// Set the source multiplicity
    pub fn with_source_multiplicity(mut self, multiplicity: impl Into<String>) -> Self {
        self.source_multiplicity = Some(multiplicity.into());
        self
    }

    /// Set the target multiplicity
    pub fn with_target_multiplicity(mut self, multiplicity: impl Into<String>) -> Self {
        self.target_multiplicity = Some(multiplicity.into());
        self
    }

    /// Parsed source multiplicity
    pub fn source_bounds(&self) -> Multiplicity {
        Multiplicity::parse(self.source_multiplicity.as_deref())
    }
}

/// One schema class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDef {
    /// Unique class name
    pub name: String,

    /// Whether this class is the document root
    pub is_root: bool,

    /// Free-text documentation
    #[serde(default)]
    pub documentation: Option<String>,

    /// Attributes in declaration order
    #[serde(default)]
    pub attributes: Vec<Attribute>,

    /// Outgoing aggregations in declaration order
    #[serde(default)]
    pub aggregations: Vec<Aggregation>,
}

impl ClassDef {
    /// Create a non-root class with no members
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_root: false,
            documentation: None,
            attributes: Vec::new(),
            aggregations: Vec::new(),
        }
    }

    /// Set the root flag
    pub fn with_root(mut self, is_root: bool) -> Self {
        self.is_root = is_root;
        self
    }

    /// Set documentation
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    /// Append an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, type_label: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, type_label));
        self
    }

    /// Append an aggregation
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregations.push(aggregation);
        self
    }

    /// Names of aggregated classes in declaration order
    pub fn aggregation_targets(&self) -> impl Iterator<Item = &str> {
        self.aggregations.iter().map(|a| a.target.as_str())
    }

    /// Bounds taken from the first aggregation only, `1..1` without one
    pub fn first_aggregation_bounds(&self) -> Multiplicity {
        self.aggregations
            .first()
            .map(Aggregation::source_bounds)
            .unwrap_or_default()
    }
}

/// The class table plus the designated root class
///
/// Iteration follows insertion order. Re-inserting a name replaces the
/// definition in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaModel {
    classes: IndexMap<String, ClassDef>,
    root: Option<String>,
}

impl SchemaModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from classes in order; the last root-flagged class wins
    pub fn from_classes(classes: impl IntoIterator<Item = ClassDef>) -> Self {
        let mut model = Self::new();
        for class in classes {
            model.insert_class(class);
        }
        model
    }

    /// Insert a class, returning the definition it replaced
    ///
    /// The root name only changes when the inserted class is root-flagged.
    pub fn insert_class(&mut self, class: ClassDef) -> Option<ClassDef> {
        if class.is_root {
            self.root = Some(class.name.clone());
        }
        self.classes.insert(class.name.clone(), class)
    }

    /// Append an aggregation to `source`'s list
    pub fn add_aggregation(&mut self, source: &str, aggregation: Aggregation) -> Result<()> {
        match self.classes.get_mut(source) {
            Some(class) => {
                class.aggregations.push(aggregation);
                Ok(())
            }
            None => Err(Error::Reference {
                source_class: source.to_string(),
                target_class: aggregation.target,
                unknown: source.to_string(),
            }),
        }
    }

    /// Check that every aggregation target names a declared class
    pub fn check_references(&self) -> Result<()> {
        for class in self.classes.values() {
            for target in class.aggregation_targets() {
                if !self.classes.contains_key(target) {
                    return Err(Error::Reference {
                        source_class: class.name.clone(),
                        target_class: target.to_string(),
                        unknown: target.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Look up a class by name
    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    /// Whether a class is declared
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Name of the root class
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// The root class definition
    pub fn root_class(&self) -> Option<&ClassDef> {
        self.root.as_deref().and_then(|name| self.classes.get(name))
    }

    /// Classes in insertion order
    pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
        self.classes.values()
    }

    /// Class names in insertion order
    pub fn class_names(&self) -> Vec<&str> {
        self.classes.keys().map(String::as_str).collect()
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the model has no classes
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
