use std::path::PathBuf;
use thiserror::Error;

/// Domain invariant failures. Each variant names the offending field or id
/// so callers can report exactly what was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: is missing")]
    Missing { field: String },

    #[error("{field}: was empty")]
    EmptyString { field: String },

    #[error("{field}: id {value} was < 0")]
    InvalidId { field: String, value: i64 },

    #[error("{field}: count {value} was < 1")]
    InvalidCount { field: String, value: i64 },

    #[error("category with id {0} not found")]
    UnknownCategory(i64),

    #[error("{field}: references invalid item id {id}")]
    UnknownItem { field: String, id: i64 },

    #[error("{field}: references invalid list id {id}")]
    UnknownList { field: String, id: i64 },

    #[error("list with id {0}: circular reference")]
    SelfReference(u64),

    #[error("{field}: createdAt is later than modifiedAt")]
    Timestamps { field: String },

    #[error("malformed body: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum InvError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store file {} is locked by another process", .0.display())]
    Locked(PathBuf),
}

impl InvError {
    /// True for failures of the backing file rather than of the request.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            InvError::Io(_) | InvError::Serialization(_) | InvError::Locked(_)
        )
    }

    /// Status code a REST collaborator should answer with.
    pub fn status(&self) -> u16 {
        match self {
            InvError::InvalidArgument(_) | InvError::Validation(_) => 400,
            InvError::Integrity(_) => 500,
            InvError::Io(_) | InvError::Serialization(_) | InvError::Locked(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, InvError>;
