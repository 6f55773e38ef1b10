use thiserror::Error;

/// Rejection of a configuration value before it reaches a docker command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid image name: {0}")]
    InvalidImage(String),

    #[error("invalid tag '{tag}': {reason}")]
    InvalidTag { tag: String, reason: String },

    #[error("invalid registry: {0}")]
    InvalidRegistry(String),

    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("invalid path '{path}': {reason}")]
    PathTraversal { path: String, reason: String },
}

impl ValidationError {
    /// Stable name of the error kind, used in structured plugin responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::InvalidImage(_) => "InvalidImage",
            ValidationError::InvalidTag { .. } => "InvalidTag",
            ValidationError::InvalidRegistry(_) => "InvalidRegistry",
            ValidationError::InvalidKey { .. } => "InvalidKey",
            ValidationError::PathTraversal { .. } => "PathTraversal",
        }
    }

    /// The reason alone, without the offending value.
    ///
    /// Used for per-field validation reports where the field name is shown separately.
    pub fn reason(&self) -> &str {
        match self {
            ValidationError::InvalidImage(reason) | ValidationError::InvalidRegistry(reason) => {
                reason
            }
            ValidationError::InvalidTag { reason, .. }
            | ValidationError::InvalidKey { reason, .. }
            | ValidationError::PathTraversal { reason, .. } => reason,
        }
    }
}

/// A [`ValidationError`] attributed to the configuration field it came from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field} configuration: {source}")]
pub struct FieldError {
    pub field: &'static str,
    #[source]
    pub source: ValidationError,
}

impl FieldError {
    pub fn new(field: &'static str, source: ValidationError) -> Self {
        Self { field, source }
    }
}

pub type Result<T> = std::result::Result<T, ValidationError>;
