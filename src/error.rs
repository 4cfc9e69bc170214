//! Error types for rowkey

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Index {index} out of range for key with {len} fields")]
    OutOfRange { index: usize, len: usize },

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    #[error("Type error: {0}")]
    TypeError(String),
}

impl From<bincode::Error> for StorageError {
    fn from(err: bincode::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}
