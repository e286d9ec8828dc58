//! Meta extractor: flattened per-class descriptors
//!
//! Cardinality comes from the class's *first* aggregation only. Classes with
//! several aggregations of differing multiplicities keep only the first one's
//! bounds; existing consumers of meta.json depend on this.

use serde::{Deserialize, Serialize};

use schemagen_core::{ClassDef, SchemaModel};

/// Parameter type used for aggregated classes
pub const CLASS_PARAMETER_TYPE: &str = "class";

/// One entry of a class's parameter list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaParameter {
    /// Attribute name or aggregated class name
    pub name: String,

    /// Attribute type label, or `"class"` for aggregations
    #[serde(rename = "type")]
    pub type_label: String,
}

impl MetaParameter {
    fn new(name: impl Into<String>, type_label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_label: type_label.into(),
        }
    }

    /// Whether this parameter stands for an aggregated class
    pub fn is_class(&self) -> bool {
        self.type_label == CLASS_PARAMETER_TYPE
    }
}

/// Meta descriptor of one class (an element of meta.json)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMeta {
    /// Class name
    #[serde(rename = "class")]
    pub class_name: String,

    /// Documentation, `null` when absent
    pub documentation: Option<String>,

    /// Root flag
    #[serde(rename = "isRoot")]
    pub is_root: bool,

    /// Attributes, then aggregated classes
    pub parameters: Vec<MetaParameter>,

    /// Lower bound from the first aggregation
    pub min: String,

    /// Upper bound from the first aggregation
    pub max: String,
}

/// Flattens a model into meta descriptors
pub struct MetaExtractor;

impl MetaExtractor {
    /// Descriptors for every class, in model order
    pub fn extract(model: &SchemaModel) -> Vec<ClassMeta> {
        let descriptors: Vec<ClassMeta> = model.classes().map(Self::describe).collect();
        tracing::debug!(classes = descriptors.len(), "meta descriptors extracted");
        descriptors
    }

    /// Descriptor for a single class
    pub fn describe(class: &ClassDef) -> ClassMeta {
        let bounds = class.first_aggregation_bounds();

        let parameters = class
            .attributes
            .iter()
            .map(|a| MetaParameter::new(&a.name, &a.type_label))
            .chain(
                class
                    .aggregation_targets()
                    .map(|target| MetaParameter::new(target, CLASS_PARAMETER_TYPE)),
            )
            .collect();

        ClassMeta {
            class_name: class.name.clone(),
            documentation: class.documentation.clone(),
            is_root: class.is_root,
            parameters,
            min: bounds.min,
            max: bounds.max,
        }
    }
}
