//! Error types for the preference store.

use thiserror::Error;
use vise_prefs_core::CodecError;
use vise_prefs_store::StoreError;

/// Errors that can occur during preference store operations.
///
/// A missing key is never an error; it resolves to the registered default.
#[derive(Debug, Error)]
pub enum PrefsError {
    /// The backing file could not be created or opened.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] StoreError),

    /// A statement failed on an open store.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// A stored value failed to decode.
    #[error("corrupt value for {key:?}: {source}")]
    CorruptValue { key: String, source: CodecError },

    /// A value cannot be represented in the stored text format.
    #[error("cannot encode value for {key:?}: {source}")]
    UnencodableValue { key: String, source: CodecError },

    /// The store name cannot be mapped to a file.
    #[error("invalid store name: {0:?}")]
    InvalidName(String),

    /// A buffering session is already open on this store.
    #[error("buffering is already active")]
    AlreadyBuffering,
}

/// Result type for preference store operations.
pub type Result<T> = std::result::Result<T, PrefsError>;
