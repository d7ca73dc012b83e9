/// Convenience result type used across Pinment.
pub type PinmentResult<T> = Result<T, PinmentError>;

/// Top-level error taxonomy used by the library.
///
/// The total operations of the crate (`validate`, `decode`, `resolve`, ...) never surface these;
/// they collapse them into `None` or a fallback placement at the boundary. The fallible building
/// blocks underneath return them so callers that want the reason can get it.
#[derive(thiserror::Error, Debug)]
pub enum PinmentError {
    /// Annotation state that does not satisfy the schema.
    #[error("validation error: {0}")]
    Validation(String),

    /// A locator string that cannot be parsed or evaluated.
    #[error("locator error: {0}")]
    Locator(String),

    /// Failures of the share-payload transform (compression, base64, size caps).
    #[error("codec error: {0}")]
    Codec(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PinmentError {
    /// Build a [`PinmentError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PinmentError::Locator`] value.
    pub fn locator(msg: impl Into<String>) -> Self {
        Self::Locator(msg.into())
    }

    /// Build a [`PinmentError::Codec`] value.
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Build a [`PinmentError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
