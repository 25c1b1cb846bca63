//! Editing session for one language definition.
//!
//! The definition is held in both forms, graphical (element, relationship
//! and restriction records) and textual (abstract and concrete syntax), plus
//! its semantics document. Only the form matching the current [`Mode`] is
//! authoritative; the other is refreshed on a mode switch.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use syntax::{Element, GraphicalModel, Relationship, Restriction, SyntaxError, TextualSyntax};

/// Which form of the definition the user is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Graphical,
    Textual,
}

#[derive(Debug, Clone, Default)]
pub struct LanguageContext {
    elements: Vec<Element>,
    relationships: Vec<Relationship>,
    restrictions: Vec<Restriction>,
    abstract_syntax: String,
    concrete_syntax: String,
    semantics: String,
    mode: Mode,
    last_error: Option<String>,
}

impl LanguageContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A context in graphical mode holding `model`.
    #[must_use]
    pub fn from_model(model: GraphicalModel) -> Self {
        let mut ctx = Self::default();
        ctx.set_model(model);
        ctx
    }

    // --- graphical form ---

    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn set_elements(&mut self, elements: Vec<Element>) {
        self.elements = elements;
    }

    #[must_use]
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn set_relationships(&mut self, relationships: Vec<Relationship>) {
        self.relationships = relationships;
    }

    #[must_use]
    pub fn restrictions(&self) -> &[Restriction] {
        &self.restrictions
    }

    pub fn set_restrictions(&mut self, restrictions: Vec<Restriction>) {
        self.restrictions = restrictions;
    }

    /// Snapshot of the graphical form.
    #[must_use]
    pub fn model(&self) -> GraphicalModel {
        GraphicalModel {
            elements: self.elements.clone(),
            relationships: self.relationships.clone(),
            restrictions: self.restrictions.clone(),
        }
    }

    pub fn set_model(&mut self, model: GraphicalModel) {
        let GraphicalModel { elements, relationships, restrictions } = model;
        self.elements = elements;
        self.relationships = relationships;
        self.restrictions = restrictions;
    }

    // --- textual form ---

    #[must_use]
    pub fn abstract_syntax(&self) -> &str {
        &self.abstract_syntax
    }

    pub fn set_abstract_syntax(&mut self, text: impl Into<String>) {
        self.abstract_syntax = text.into();
    }

    #[must_use]
    pub fn concrete_syntax(&self) -> &str {
        &self.concrete_syntax
    }

    pub fn set_concrete_syntax(&mut self, text: impl Into<String>) {
        self.concrete_syntax = text.into();
    }

    #[must_use]
    pub fn semantics(&self) -> &str {
        &self.semantics
    }

    pub fn set_semantics(&mut self, text: impl Into<String>) {
        self.semantics = text.into();
    }

    // --- mode ---

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Message of the most recent failed conversion, cleared by the next
    /// successful one.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Enter textual mode, regenerating both syntax documents from the graph.
    ///
    /// # Errors
    ///
    /// Returns the compiler error if the graph cannot be expressed as text;
    /// the existing documents are kept and the mode still changes.
    pub fn switch_to_textual(&mut self) -> Result<(), SyntaxError> {
        self.mode = Mode::Textual;
        let result =
            syntax::graphical_to_textual(&self.elements, &self.relationships, &self.restrictions);
        match result {
            Ok(TextualSyntax { abstract_syntax, concrete_syntax }) => {
                self.abstract_syntax = abstract_syntax;
                self.concrete_syntax = concrete_syntax;
                self.last_error = None;
                Ok(())
            }
            Err(e) => Err(self.record(e)),
        }
    }

    /// Enter graphical mode, rebuilding the graph from the syntax documents
    /// when both are present.
    ///
    /// # Errors
    ///
    /// Returns the compiler error if the text is malformed; the graph is
    /// left untouched and the mode still changes.
    pub fn switch_to_graphical(&mut self) -> Result<(), SyntaxError> {
        self.mode = Mode::Graphical;
        if self.abstract_syntax.trim().is_empty() || self.concrete_syntax.trim().is_empty() {
            return Ok(());
        }
        match syntax::textual_to_graphical(&self.abstract_syntax, &self.concrete_syntax) {
            Ok(model) => {
                self.set_model(model);
                self.last_error = None;
                Ok(())
            }
            Err(e) => Err(self.record(e)),
        }
    }

    fn record(&mut self, error: SyntaxError) -> SyntaxError {
        tracing::warn!(code = error.error_code(), %error, "language conversion failed");
        self.last_error = Some(error.to_string());
        error
    }
}
