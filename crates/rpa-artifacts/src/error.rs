use std::path::PathBuf;

use rpa_cid::CidError;
use thiserror::Error;

/// Errors from materializing artifacts.
///
/// Every variant names the path or file being processed. None of them are
/// retried: a failure aborts the whole interval, leaving any files already
/// written on disk.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("error reading {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error deserializing {}: {reason}", .path.display())]
    DeserializationFailed { path: PathBuf, reason: String },

    #[error("error serializing {name}: {reason}")]
    SerializationFailed { name: String, reason: String },

    #[error("error compressing {}: {reason}", .path.display())]
    CompressionFailed { path: PathBuf, reason: String },

    #[error("error calculating CID for {name}: {source}")]
    IdentifierComputationFailed { name: String, source: CidError },

    #[error("error writing {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result alias for artifact operations.
pub type ArtifactResult<T> = Result<T, ArtifactError>;
