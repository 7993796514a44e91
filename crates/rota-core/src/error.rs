use thiserror::Error;

/// Top-level error type for the Rota system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for RotaError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RotaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Record store error: {0}")]
    Store(String),

    #[error("Generative model error: {0}")]
    Llm(String),

    #[error("Speech synthesis error: {0}")]
    Speech(String),

    #[error("Audit error: {0}")]
    Audit(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for RotaError {
    fn from(err: toml::de::Error) -> Self {
        RotaError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for RotaError {
    fn from(err: toml::ser::Error) -> Self {
        RotaError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for RotaError {
    fn from(err: serde_json::Error) -> Self {
        RotaError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Rota operations.
pub type Result<T> = std::result::Result<T, RotaError>;
