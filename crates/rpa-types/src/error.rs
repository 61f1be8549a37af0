use thiserror::Error;

/// Errors produced when encoding or decoding artifact payloads.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("unsupported rewards file version: {0}")]
    UnsupportedVersion(u64),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

/// Result alias for payload operations.
pub type TypeResult<T> = Result<T, TypeError>;
