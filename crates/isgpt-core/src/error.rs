//! Error types for isgpt

/// Result type alias using isgpt's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for isgpt operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Tokenization produced no tokens for the text being scored
    #[error("empty input: tokenization returned no token ids")]
    EmptyInput,

    /// Tokenizer loading or encoding errors
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// Inference session, tensor or shape errors
    #[error("inference error: {0}")]
    Inference(String),

    /// Model resolution and loading errors
    #[error("model error: {0}")]
    Model(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new tokenizer error
    pub fn tokenizer(msg: impl Into<String>) -> Self {
        Self::Tokenizer(msg.into())
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
