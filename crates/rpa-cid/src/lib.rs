//! Offline content identifiers for reward pool artifacts.
//!
//! Computes the CID an IPFS node would assign to a file placed, under a
//! given name, as the only entry of a fresh UnixFS directory. The encoding is
//! reproduced byte for byte so independent nodes agree on the identifier
//! without talking to any IPFS daemon.
//!
//! # Encoding
//!
//! - CIDv1, sha2-256 multihash, base32 multibase string form
//! - Raw leaves over fixed 1 MiB chunks
//! - Balanced file layout, at most 1024 links per node
//! - dag-pb directory node with a single named link

pub mod cid;
pub mod error;
mod pb;
pub mod unixfs;
mod varint;

pub use cid::{Codec, ContentId};
pub use error::{CidError, CidResult};
pub use unixfs::{file_cid, raw_leaf_cid, single_file_dir_cid, CHUNK_SIZE, MAX_LINKS};
