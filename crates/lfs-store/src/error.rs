use std::path::PathBuf;

/// Errors from metadata store operations.
#[derive(Debug, thiserror::Error)]
pub enum MetaError {
    /// The request credential was rejected. Raised before any store access.
    #[error("unauthorized")]
    Auth,

    /// A required partition is missing from the store file.
    #[error("bucket not found: {0}")]
    BucketNotFound(String),

    /// No record exists for the requested oid.
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    /// Stored bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A record could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// The store file could not be opened or locked.
    #[error("store unavailable at {path}: {reason}")]
    Unavailable { path: PathBuf, reason: String },

    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Any other failure from the storage engine.
    #[error("storage engine error: {0}")]
    Engine(#[from] redb::Error),
}

impl MetaError {
    /// Returns `true` for a plain missing-object lookup, the one error a
    /// writer may treat as "go ahead and create".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound(_))
    }
}

impl From<redb::TableError> for MetaError {
    fn from(err: redb::TableError) -> Self {
        match err {
            redb::TableError::TableDoesNotExist(name) => Self::BucketNotFound(name),
            other => Self::Engine(other.into()),
        }
    }
}

impl From<redb::TransactionError> for MetaError {
    fn from(err: redb::TransactionError) -> Self {
        Self::Engine(err.into())
    }
}

impl From<redb::StorageError> for MetaError {
    fn from(err: redb::StorageError) -> Self {
        Self::Engine(err.into())
    }
}

impl From<redb::CommitError> for MetaError {
    fn from(err: redb::CommitError) -> Self {
        Self::Engine(err.into())
    }
}

/// Result alias for store operations.
pub type MetaResult<T> = Result<T, MetaError>;
