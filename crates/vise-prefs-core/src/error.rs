//! Error types for the codec.

use thiserror::Error;

/// Errors that can occur while converting between [`Value`](crate::Value)
/// and its stored text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The value holds something JSON text cannot represent.
    #[error("unencodable value: {0}")]
    UnencodableValue(String),

    /// The stored text is not valid JSON or carries an unknown envelope.
    #[error("corrupt value: {0}")]
    CorruptValue(String),
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
