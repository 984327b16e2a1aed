/// Convenience result type used across the crate.
pub type CellResult<T> = Result<T, CellError>;

/// Top-level error taxonomy.
///
/// Height calculation itself never fails: per-item problems are absorbed into a defaulted
/// [`crate::Resolution`]. Errors only surface from construction-time validation, configuration
/// loading, and measurement surfaces that refuse to start a render.
#[derive(thiserror::Error, Debug)]
pub enum CellError {
    /// Invalid caller-provided data (layout context, configuration values).
    #[error("validation error: {0}")]
    Validation(String),

    /// A measurement surface could not start or complete a render.
    #[error("surface error: {0}")]
    Surface(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CellError {
    /// Build a [`CellError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CellError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`CellError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
