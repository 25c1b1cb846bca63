/// Error returned when loading a shape snapshot.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// The JSON snapshot is malformed or does not match the shape schema.
    #[error("invalid JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),
    /// The XML snapshot is not well-formed.
    #[error("invalid XML snapshot: {0}")]
    Xml(#[from] roxmltree::Error),
    /// An element other than `<shapes>` / `<shape>` was found.
    #[error("unexpected element <{0}>")]
    UnexpectedElement(String),
    /// A required attribute is absent.
    #[error("missing attribute `{0}`")]
    MissingAttribute(&'static str),
    /// A numeric attribute does not parse.
    #[error("attribute `{attribute}` is not a number: {value:?}")]
    InvalidNumber { attribute: &'static str, value: String },
    /// A shape id is not a UUID.
    #[error("invalid shape id: {0:?}")]
    InvalidId(String),
    /// The `kind` attribute names no known shape.
    #[error("unknown shape kind: {0:?}")]
    UnknownKind(String),
    /// The `slope` attribute is neither `descending` nor `ascending`.
    #[error("unknown line slope: {0:?}")]
    UnknownSlope(String),
    /// The snapshot was written by an incompatible format version.
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
}

impl CanvasError {
    /// Stable machine-readable code for the error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Json(_) => "E_JSON",
            Self::Xml(_) => "E_XML",
            Self::UnexpectedElement(_) => "E_UNEXPECTED_ELEMENT",
            Self::MissingAttribute(_) => "E_MISSING_ATTRIBUTE",
            Self::InvalidNumber { .. } => "E_INVALID_NUMBER",
            Self::InvalidId(_) => "E_INVALID_ID",
            Self::UnknownKind(_) => "E_UNKNOWN_KIND",
            Self::UnknownSlope(_) => "E_UNKNOWN_SLOPE",
            Self::UnsupportedVersion(_) => "E_UNSUPPORTED_VERSION",
        }
    }
}
