//! Semantics document of a language.
//!
//! The semantics is a JSON document kept as text in the
//! [`LanguageContext`]. It names which element, relation and attribute types
//! carry meaning and how each translates to constraints. Every edit reads
//! the stored JSON object, changes one key, and writes the document back
//! pretty-printed; keys it does not touch are kept as stored.

#[cfg(test)]
#[path = "semantics_test.rs"]
mod semantics_test;

use indexmap::{IndexMap, IndexSet};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use syntax::{Element, Relationship};

use crate::context::LanguageContext;

/// Keys a stored document must carry to be kept as-is.
const CORE_KEYS: [&str; 4] = ["elementTypes", "elementTranslationRules", "relationTypes", "relationTranslationRules"];

const ELEMENT_TYPES: &str = "elementTypes";
const RELATION_TYPES: &str = "relationTypes";
const ATTRIBUTE_TYPES: &str = "attributeTypes";
const ELEMENT_RULES: &str = "elementTranslationRules";
const RELATION_RULES: &str = "relationTranslationRules";
const ATTRIBUTE_RULES: &str = "attributeTranslationRules";

/// Rule collections; an empty array in any of them reads as an empty map.
const RULE_KEYS: [&str; 3] = [ELEMENT_RULES, RELATION_RULES, ATTRIBUTE_RULES];

/// Relationship property whose possible values become relation types.
const RELATION_TYPE_PROPERTY: &str = "Type";

const INDIVIDUAL_CARDINALITY: &str = "IndividualCardinality";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementTranslationRule {
    pub param: String,
    pub constraint: String,
    pub selected_constraint: String,
    pub deselected_constraint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationTranslationRule {
    pub params: Vec<String>,
    pub constraint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeTranslationRule {
    pub parent: String,
    pub param: String,
    pub template: String,
    pub constraint: String,
}

/// Where a relation's type is read from in a model instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationPropertyField {
    pub key: String,
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SemanticsDocument {
    pub element_types: Vec<String>,
    pub element_translation_rules: IndexMap<String, ElementTranslationRule>,
    pub relation_types: Vec<String>,
    pub relation_translation_rules: IndexMap<String, RelationTranslationRule>,
    pub attribute_types: Vec<String>,
    pub attribute_translation_rules: IndexMap<String, AttributeTranslationRule>,
    pub hierarchy_types: Vec<String>,
    pub typing_relation_types: Vec<String>,
    pub relation_property_schema: IndexMap<String, RelationPropertyField>,
}

impl SemanticsDocument {
    /// Parse a stored document, requiring the element and relation keys.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `text` is not JSON, lacks a core key, or a field has
    /// the wrong shape.
    pub fn parse(text: &str) -> Result<Self, SemanticsError> {
        let mut value = with_core_keys(text)?;
        empty_rule_arrays_as_maps(&mut value);
        Ok(serde_json::from_value(value)?)
    }

    /// Read whatever is stored. Blank or unreadable text is an empty
    /// document; a missing or mis-shaped field takes its default.
    #[must_use]
    pub fn current(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str(text) {
            Ok(Value::Object(mut fields)) => {
                for key in RULE_KEYS {
                    if fields.get(key).is_some_and(is_empty_array) {
                        fields.insert(key.to_owned(), Value::Object(Map::new()));
                    }
                }
                Self::from_fields(&fields)
            }
            Ok(_) => {
                tracing::warn!("stored semantics is not an object; starting from empty");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored semantics unreadable; starting from empty");
                Self::default()
            }
        }
    }

    fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            element_types: field(fields, ELEMENT_TYPES),
            element_translation_rules: field(fields, ELEMENT_RULES),
            relation_types: field(fields, RELATION_TYPES),
            relation_translation_rules: field(fields, RELATION_RULES),
            attribute_types: field(fields, ATTRIBUTE_TYPES),
            attribute_translation_rules: field(fields, ATTRIBUTE_RULES),
            hierarchy_types: field(fields, "hierarchyTypes"),
            typing_relation_types: field(fields, "typingRelationTypes"),
            relation_property_schema: field(fields, "relationPropertySchema"),
        }
    }

    /// Starting semantics derived from a language's types.
    ///
    /// # Errors
    ///
    /// Returns [`SemanticsError::NoLanguageDefinition`] when there are
    /// neither elements nor relationships.
    pub fn initial(elements: &[Element], relationships: &[Relationship]) -> Result<Self, SemanticsError> {
        if elements.is_empty() && relationships.is_empty() {
            return Err(SemanticsError::NoLanguageDefinition);
        }

        let element_types: IndexSet<&str> = elements.iter().map(|e| e.name.as_str()).collect();
        let relation_types: IndexSet<&str> = relationships
            .iter()
            .flat_map(|r| &r.properties)
            .filter(|p| p.name == RELATION_TYPE_PROPERTY)
            .flat_map(|p| &p.possible_values)
            .map(String::as_str)
            .collect();

        let mut relation_property_schema = IndexMap::new();
        relation_property_schema.insert("type".to_owned(), RelationPropertyField { key: "value".to_owned(), index: 0 });

        Ok(Self {
            element_types: element_types.into_iter().map(str::to_owned).collect(),
            relation_types: relation_types.into_iter().map(str::to_owned).collect(),
            typing_relation_types: vec![INDIVIDUAL_CARDINALITY.to_owned()],
            relation_property_schema,
            ..Self::default()
        })
    }

    /// Pretty-printed JSON text of the document.
    ///
    /// # Errors
    ///
    /// Returns `Err` if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, SemanticsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Parse `text` and check it carries every core key.
fn with_core_keys(text: &str) -> Result<Value, SemanticsError> {
    let value: Value = serde_json::from_str(text)?;
    match CORE_KEYS.into_iter().find(|key| value.get(*key).is_none()) {
        Some(key) => Err(SemanticsError::MissingKey(key)),
        None => Ok(value),
    }
}

fn empty_rule_arrays_as_maps(value: &mut Value) {
    for key in RULE_KEYS {
        if let Some(rules) = value.get_mut(key).filter(|rules| is_empty_array(rules)) {
            *rules = Value::Object(Map::new());
        }
    }
}

fn is_empty_array(value: &Value) -> bool {
    value.as_array().is_some_and(Vec::is_empty)
}

/// One field of a stored document, or its default when absent or mis-shaped.
fn field<T: DeserializeOwned + Default>(fields: &Map<String, Value>, key: &str) -> T {
    match fields.get(key) {
        None | Some(Value::Null) => T::default(),
        Some(value) => match T::deserialize(value) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring mis-shaped semantics field");
                T::default()
            }
        },
    }
}

/// Make sure the context holds usable semantics, deriving a starting
/// document from the language types when the stored one is missing or
/// incomplete.
///
/// # Errors
///
/// Returns [`SemanticsError::NoLanguageDefinition`] if initialization is
/// needed but the language has no types yet.
pub fn prepare_semantics(ctx: &mut LanguageContext) -> Result<SemanticsDocument, SemanticsError> {
    match with_core_keys(ctx.semantics()) {
        Ok(_) => Ok(SemanticsDocument::current(ctx.semantics())),
        Err(reason) => {
            tracing::debug!(%reason, "initializing semantics from language types");
            let doc = SemanticsDocument::initial(ctx.elements(), ctx.relationships())?;
            ctx.set_semantics(doc.to_pretty_json()?);
            Ok(doc)
        }
    }
}

/// Replace the element types.
///
/// # Errors
///
/// Returns `Err` if the updated document cannot be serialized.
pub fn set_element_types(ctx: &mut LanguageContext, types: Vec<String>) -> Result<(), SemanticsError> {
    let types = serde_json::to_value(types)?;
    edit(ctx, ELEMENT_TYPES, |slot| *slot = types)
}

/// Replace the relation types.
///
/// # Errors
///
/// Returns `Err` if the updated document cannot be serialized.
pub fn set_relation_types(ctx: &mut LanguageContext, types: Vec<String>) -> Result<(), SemanticsError> {
    let types = serde_json::to_value(types)?;
    edit(ctx, RELATION_TYPES, |slot| *slot = types)
}

/// Replace the attribute types.
///
/// # Errors
///
/// Returns `Err` if the updated document cannot be serialized.
pub fn set_attribute_types(ctx: &mut LanguageContext, types: Vec<String>) -> Result<(), SemanticsError> {
    let types = serde_json::to_value(types)?;
    edit(ctx, ATTRIBUTE_TYPES, |slot| *slot = types)
}

/// Insert or replace the translation rule for an element type.
///
/// # Errors
///
/// Returns `Err` if the updated document cannot be serialized.
pub fn set_element_rule(
    ctx: &mut LanguageContext,
    element: impl Into<String>,
    rule: ElementTranslationRule,
) -> Result<(), SemanticsError> {
    insert_rule(ctx, ELEMENT_RULES, element.into(), serde_json::to_value(rule)?)
}

/// Insert or replace the translation rule for a relation type.
///
/// # Errors
///
/// Returns `Err` if the updated document cannot be serialized.
pub fn set_relation_rule(
    ctx: &mut LanguageContext,
    relation: impl Into<String>,
    rule: RelationTranslationRule,
) -> Result<(), SemanticsError> {
    insert_rule(ctx, RELATION_RULES, relation.into(), serde_json::to_value(rule)?)
}

/// Insert or replace the translation rule for an attribute.
///
/// # Errors
///
/// Returns `Err` if the updated document cannot be serialized.
pub fn set_attribute_rule(
    ctx: &mut LanguageContext,
    attribute: impl Into<String>,
    rule: AttributeTranslationRule,
) -> Result<(), SemanticsError> {
    insert_rule(ctx, ATTRIBUTE_RULES, attribute.into(), serde_json::to_value(rule)?)
}

fn insert_rule(ctx: &mut LanguageContext, key: &str, name: String, rule: Value) -> Result<(), SemanticsError> {
    edit(ctx, key, |slot| {
        if !slot.is_object() {
            if !slot.is_null() && !is_empty_array(slot) {
                tracing::warn!(key, "replacing non-map rule collection");
            }
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(rules) = slot {
            rules.insert(name, rule);
        }
    })
}

/// Change one key of the stored document and write it back. Known keys
/// the stored object lacks are filled with their defaults; everything else
/// is kept as stored.
fn edit(ctx: &mut LanguageContext, key: &str, change: impl FnOnce(&mut Value)) -> Result<(), SemanticsError> {
    let text = ctx.semantics();
    let mut fields = match serde_json::from_str(text) {
        Ok(Value::Object(fields)) => fields,
        Ok(_) => {
            tracing::warn!("stored semantics is not an object; starting from empty");
            Map::new()
        }
        Err(e) => {
            if !text.trim().is_empty() {
                tracing::warn!(error = %e, "stored semantics unreadable; starting from empty");
            }
            Map::new()
        }
    };
    if let Value::Object(defaults) = serde_json::to_value(SemanticsDocument::default())? {
        for (name, value) in defaults {
            fields.entry(name).or_insert(value);
        }
    }
    change(fields.entry(key).or_insert(Value::Null));
    ctx.set_semantics(serde_json::to_string_pretty(&Value::Object(fields))?);
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum SemanticsError {
    #[error("semantics is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("semantics is missing {0}")]
    MissingKey(&'static str),
    #[error("define language elements and relationships first")]
    NoLanguageDefinition,
}
