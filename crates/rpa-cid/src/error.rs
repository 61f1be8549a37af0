use thiserror::Error;

/// Errors from content identifier encoding and parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CidError {
    /// The directory entry name cannot be stored in a UnixFS directory.
    #[error("invalid directory entry name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// A CID string or byte sequence could not be decoded.
    #[error("invalid CID: {0}")]
    InvalidCid(String),

    #[error("unsupported multicodec: {0:#x}")]
    UnsupportedCodec(u64),

    #[error("unsupported multihash: {0:#x}")]
    UnsupportedHash(u64),
}

/// Result alias for CID operations.
pub type CidResult<T> = Result<T, CidError>;
