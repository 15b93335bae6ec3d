//! Error types for polyspan.

use thiserror::Error;

/// Result type for polyspan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for polyspan operations.
///
/// None of these are fatal to a recognition pass: the cascade turns
/// collaborator failures into empty results, and local operations
/// (overlap resolution, alignment) never fail on well-formed spans.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A span labeler or language classifier cannot be invoked.
    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// A collaborator was invoked but failed.
    #[error("Labeler failed: {0}")]
    Labeler(String),

    /// Dictionary registration rejected; the registry is left unchanged.
    #[error("Invalid dictionary: {0}")]
    InvalidDictionary(String),

    /// Span construction with `start >= end`.
    #[error("Invalid span: {0}")]
    InvalidSpan(String),

    /// Configuration is structurally valid TOML but semantically wrong.
    #[error("Config error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a collaborator-unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Error::CollaboratorUnavailable(msg.into())
    }

    /// Create a labeler failure.
    #[must_use]
    pub fn labeler(msg: impl Into<String>) -> Self {
        Error::Labeler(msg.into())
    }

    /// Create an invalid dictionary error.
    #[must_use]
    pub fn invalid_dictionary(msg: impl Into<String>) -> Self {
        Error::InvalidDictionary(msg.into())
    }

    /// Create an invalid span error.
    #[must_use]
    pub fn invalid_span(msg: impl Into<String>) -> Self {
        Error::InvalidSpan(msg.into())
    }

    /// Create a config error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Whether the cascade should treat this error as "strategy unavailable".
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::CollaboratorUnavailable(_))
    }
}
