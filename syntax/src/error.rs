use std::fmt;

/// Which of the two textual documents an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxPart {
    Abstract,
    Concrete,
}

impl fmt::Display for SyntaxPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abstract => f.write_str("abstract"),
            Self::Concrete => f.write_str("concrete"),
        }
    }
}

/// Error returned by the graphical/textual compiler.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    /// A syntax document is not valid JSON or does not match its schema.
    #[error("{part} syntax is not valid: {source}")]
    Json { part: SyntaxPart, source: serde_json::Error },
    /// Two element types share a name.
    #[error("duplicate element type: {0}")]
    DuplicateElement(String),
    /// Two relationship types share a name.
    #[error("duplicate relationship type: {0}")]
    DuplicateRelationship(String),
    /// A relationship's source or target names no declared element type.
    #[error("relationship {relationship} refers to undeclared element {endpoint}")]
    UnknownEndpoint { relationship: String, endpoint: String },
    /// A restriction names no declared element type.
    #[error("{restriction} restriction refers to undeclared element {name}")]
    UnknownRestrictionElement { restriction: &'static str, name: String },
    /// The concrete syntax has a rule for a type the abstract syntax lacks.
    #[error("concrete syntax styles undeclared {kind} {name}")]
    UndeclaredType { kind: &'static str, name: String },
}

impl SyntaxError {
    /// Stable machine-readable code for the error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Json { .. } => "E_SYNTAX_JSON",
            Self::DuplicateElement(_) => "E_DUPLICATE_ELEMENT",
            Self::DuplicateRelationship(_) => "E_DUPLICATE_RELATIONSHIP",
            Self::UnknownEndpoint { .. } => "E_UNKNOWN_ENDPOINT",
            Self::UnknownRestrictionElement { .. } => "E_UNKNOWN_RESTRICTION_ELEMENT",
            Self::UndeclaredType { .. } => "E_UNDECLARED_TYPE",
        }
    }
}
