//! Graphical ↔ textual compiler.
//!
//! The textual form of a language is two pretty-printed JSON documents:
//!
//! - **abstract syntax**: what the language contains. Element types with
//!   their properties, relationship types with endpoints and cardinality,
//!   and restrictions.
//! - **concrete syntax**: how it looks. Per-element size, label and style
//!   rules, and per-relationship label and style rules.
//!
//! Both documents key types by name and keep declaration order, so a
//! graphical model survives a trip through text unchanged.

#[cfg(test)]
#[path = "compiler_test.rs"]
mod compiler_test;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{SyntaxError, SyntaxPart};
use crate::model::{
    Element, GraphicalModel, Label, Property, Relationship, Restriction, Style, TextualSyntax, default_height,
    default_width,
};

/// Type declarations of a language.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AbstractSyntax {
    #[serde(default)]
    pub elements: IndexMap<String, AbstractElement>,
    #[serde(default)]
    pub relationships: IndexMap<String, AbstractRelationship>,
    #[serde(default)]
    pub restrictions: Vec<Restriction>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AbstractElement {
    #[serde(default)]
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AbstractRelationship {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// Presentation rules of a language.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConcreteSyntax {
    #[serde(default)]
    pub elements: IndexMap<String, ConcreteElement>,
    #[serde(default)]
    pub relationships: IndexMap<String, ConcreteRelationship>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcreteElement {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub label_property: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub styles: Vec<Style>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConcreteRelationship {
    #[serde(default)]
    pub label_property: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub styles: Vec<Style>,
}

// =============================================================
// Graphical → textual
// =============================================================

/// Generate the abstract and concrete syntax documents for a language.
///
/// # Errors
///
/// Returns `Err` on duplicate type names, a relationship or restriction
/// naming an undeclared element type, or a serialization failure.
pub fn graphical_to_textual(
    elements: &[Element],
    relationships: &[Relationship],
    restrictions: &[Restriction],
) -> Result<TextualSyntax, SyntaxError> {
    let mut abstract_syntax = AbstractSyntax::default();
    let mut concrete_syntax = ConcreteSyntax::default();

    for element in elements {
        if abstract_syntax.elements.contains_key(&element.name) {
            return Err(SyntaxError::DuplicateElement(element.name.clone()));
        }
        abstract_syntax
            .elements
            .insert(element.name.clone(), AbstractElement { properties: element.properties.clone() });
        concrete_syntax.elements.insert(
            element.name.clone(),
            ConcreteElement {
                width: element.width,
                height: element.height,
                label_property: element.label_property.clone(),
                labels: element.labels.clone(),
                styles: element.styles.clone(),
            },
        );
    }

    for relationship in relationships {
        if abstract_syntax.relationships.contains_key(&relationship.name) {
            return Err(SyntaxError::DuplicateRelationship(relationship.name.clone()));
        }
        abstract_syntax.relationships.insert(
            relationship.name.clone(),
            AbstractRelationship {
                min: relationship.min,
                max: relationship.max,
                source: relationship.source.clone(),
                target: relationship.target.clone(),
                properties: relationship.properties.clone(),
            },
        );
        concrete_syntax.relationships.insert(
            relationship.name.clone(),
            ConcreteRelationship {
                label_property: relationship.label_property.clone(),
                labels: relationship.labels.clone(),
                styles: relationship.styles.clone(),
            },
        );
    }

    abstract_syntax.restrictions = restrictions.to_vec();
    check_references(&abstract_syntax)?;

    let text = TextualSyntax {
        abstract_syntax: to_pretty(&abstract_syntax, SyntaxPart::Abstract)?,
        concrete_syntax: to_pretty(&concrete_syntax, SyntaxPart::Concrete)?,
    };
    tracing::debug!(
        elements = elements.len(),
        relationships = relationships.len(),
        restrictions = restrictions.len(),
        "compiled graphical model to text"
    );
    Ok(text)
}

fn to_pretty<T: Serialize>(value: &T, part: SyntaxPart) -> Result<String, SyntaxError> {
    serde_json::to_string_pretty(value).map_err(|source| SyntaxError::Json { part, source })
}

// =============================================================
// Textual → graphical
// =============================================================

/// Rebuild the graphical model from its two syntax documents.
///
/// A blank concrete syntax is accepted: every type gets default
/// presentation.
///
/// # Errors
///
/// Returns `Err` if either document is malformed, a relationship or
/// restriction names an undeclared element type, or the concrete syntax
/// has a rule for a type the abstract syntax does not declare.
pub fn textual_to_graphical(abstract_text: &str, concrete_text: &str) -> Result<GraphicalModel, SyntaxError> {
    let abstract_syntax: AbstractSyntax = serde_json::from_str(abstract_text)
        .map_err(|source| SyntaxError::Json { part: SyntaxPart::Abstract, source })?;
    let mut concrete_syntax: ConcreteSyntax = if concrete_text.trim().is_empty() {
        ConcreteSyntax::default()
    } else {
        serde_json::from_str(concrete_text).map_err(|source| SyntaxError::Json { part: SyntaxPart::Concrete, source })?
    };

    check_references(&abstract_syntax)?;
    if let Some(name) = concrete_syntax
        .elements
        .keys()
        .find(|name| !abstract_syntax.elements.contains_key(*name))
    {
        return Err(SyntaxError::UndeclaredType { kind: "element", name: name.clone() });
    }
    if let Some(name) = concrete_syntax
        .relationships
        .keys()
        .find(|name| !abstract_syntax.relationships.contains_key(*name))
    {
        return Err(SyntaxError::UndeclaredType { kind: "relationship", name: name.clone() });
    }

    let AbstractSyntax { elements, relationships, restrictions } = abstract_syntax;

    let elements: Vec<Element> = elements
        .into_iter()
        .map(|(name, decl)| {
            let mut element = Element::new(name);
            element.properties = decl.properties;
            if let Some(rule) = concrete_syntax.elements.shift_remove(&element.name) {
                element.width = rule.width;
                element.height = rule.height;
                element.label_property = rule.label_property;
                element.labels = rule.labels;
                element.styles = rule.styles;
            }
            element
        })
        .collect();

    let relationships: Vec<Relationship> = relationships
        .into_iter()
        .map(|(name, decl)| {
            let rule = concrete_syntax.relationships.shift_remove(&name).unwrap_or_default();
            Relationship {
                name,
                min: decl.min,
                max: decl.max,
                source: decl.source,
                target: decl.target,
                label_property: rule.label_property,
                properties: decl.properties,
                labels: rule.labels,
                styles: rule.styles,
            }
        })
        .collect();

    tracing::debug!(
        elements = elements.len(),
        relationships = relationships.len(),
        restrictions = restrictions.len(),
        "compiled text to graphical model"
    );
    Ok(GraphicalModel { elements, relationships, restrictions })
}

/// Every relationship endpoint and restriction target must be a declared element.
fn check_references(syntax: &AbstractSyntax) -> Result<(), SyntaxError> {
    for (name, relationship) in &syntax.relationships {
        for endpoint in [&relationship.source, &relationship.target] {
            if !syntax.elements.contains_key(endpoint) {
                return Err(SyntaxError::UnknownEndpoint { relationship: name.clone(), endpoint: endpoint.clone() });
            }
        }
    }
    for restriction in &syntax.restrictions {
        if let Some(missing) = restriction
            .element_names()
            .into_iter()
            .find(|element| !syntax.elements.contains_key(*element))
        {
            return Err(SyntaxError::UnknownRestrictionElement {
                restriction: restriction.kind(),
                name: missing.to_owned(),
            });
        }
    }
    Ok(())
}
