//! Language definition records.
//!
//! A language is a set of element types, relationship types between them,
//! and structural restrictions. These are the records the graphical editor
//! builds and the textual syntax is generated from.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use serde::{Deserialize, Serialize};

/// Default element width when no concrete rule gives one.
pub const DEFAULT_ELEMENT_WIDTH: f64 = 100.0;

/// Default element height when no concrete rule gives one.
pub const DEFAULT_ELEMENT_HEIGHT: f64 = 50.0;

/// A typed attribute of an element or relationship.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    /// Type name (`String`, `Integer`, `Select`, ...).
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(default)]
    pub default_value: String,
    /// Allowed values, for enumerated types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub possible_values: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

/// Where a property value is shown on the drawn element.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Label {
    pub property: String,
    pub position: String,
}

/// A style applied when a property holds a given value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Style {
    pub linked_property: String,
    pub linked_value: String,
    /// Style text, as the renderer understands it.
    pub style: String,
}

/// An element type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    /// Property whose value names an instance on the canvas.
    #[serde(default)]
    pub label_property: String,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub styles: Vec<Style>,
}

impl Element {
    /// An element type with default size and no properties.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: DEFAULT_ELEMENT_WIDTH,
            height: DEFAULT_ELEMENT_HEIGHT,
            label_property: String::new(),
            properties: Vec::new(),
            labels: Vec::new(),
            styles: Vec::new(),
        }
    }
}

pub(crate) fn default_width() -> f64 {
    DEFAULT_ELEMENT_WIDTH
}

pub(crate) fn default_height() -> f64 {
    DEFAULT_ELEMENT_HEIGHT
}

/// A relationship type from one element type to another.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Relationship {
    pub name: String,
    /// Minimum number of instances; `None` means unbounded below.
    #[serde(default)]
    pub min: Option<u32>,
    /// Maximum number of instances; `None` means unbounded.
    #[serde(default)]
    pub max: Option<u32>,
    /// Name of the source element type.
    pub source: String,
    /// Name of the target element type.
    pub target: String,
    #[serde(default)]
    pub label_property: String,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub styles: Vec<Style>,
}

impl Relationship {
    #[must_use]
    pub fn new(name: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self { name: name.into(), source: source.into(), target: target.into(), ..Self::default() }
    }
}

/// A structural rule over element types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Restriction {
    /// Instances of these element types must have distinct names.
    UniqueName { elements: Vec<String> },
    /// Instances of `child` must be nested in an instance of `parent`.
    ParentChild { parent: String, child: String },
    /// Bounds on how many instances of `element` a model may hold.
    QuantityElement {
        element: String,
        #[serde(default)]
        min: Option<u32>,
        #[serde(default)]
        max: Option<u32>,
    },
}

impl Restriction {
    /// Tag used in the textual syntax.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UniqueName { .. } => "unique_name",
            Self::ParentChild { .. } => "parent_child",
            Self::QuantityElement { .. } => "quantity_element",
        }
    }

    /// Element type names the restriction refers to.
    #[must_use]
    pub fn element_names(&self) -> Vec<&str> {
        match self {
            Self::UniqueName { elements } => elements.iter().map(String::as_str).collect(),
            Self::ParentChild { parent, child } => vec![parent.as_str(), child.as_str()],
            Self::QuantityElement { element, .. } => vec![element.as_str()],
        }
    }
}

/// The graphical form of a language definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphicalModel {
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub restrictions: Vec<Restriction>,
}

impl GraphicalModel {
    /// Whether there is nothing to compile.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.relationships.is_empty() && self.restrictions.is_empty()
    }
}

/// The textual form of a language definition: two JSON documents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextualSyntax {
    pub abstract_syntax: String,
    pub concrete_syntax: String,
}
