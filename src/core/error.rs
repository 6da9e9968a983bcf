//! Error types for the storage layer and trainer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SvmError {
    #[error("Block capacity exceeded: {capacity} elements")]
    CapacityExceeded { capacity: usize },

    #[error("Index out of range: {index} (bound {bound})")]
    IndexOutOfRange { index: usize, bound: usize },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty corpus")]
    EmptyCorpus,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, SvmError>;
