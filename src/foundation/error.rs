/// Convenience result type used across geostory.
pub type GeostoryResult<T> = Result<T, GeostoryError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum GeostoryError {
    /// Invalid caller-provided values or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing, malformed or empty trajectory data. Fatal to startup.
    #[error("data error: {0}")]
    Data(String),

    /// Preference storage could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// A map-surface operation failed (bounds, draw, restyle, removal).
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GeostoryError {
    /// Build a [`GeostoryError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GeostoryError::Data`] value.
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    /// Build a [`GeostoryError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`GeostoryError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`GeostoryError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
