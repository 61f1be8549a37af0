use std::fmt;
use std::str::FromStr;

use data_encoding::BASE32_NOPAD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::{CidError, CidResult};
use crate::varint::{decode_varint, encode_varint};

/// CID version emitted for every identifier.
pub const CID_VERSION: u64 = 1;

/// Multihash code for sha2-256.
pub const SHA2_256: u64 = 0x12;

/// Digest length of sha2-256, in bytes.
pub const DIGEST_LEN: usize = 32;

/// Multibase prefix for lowercase RFC 4648 base32 without padding.
const MULTIBASE_BASE32: char = 'b';

/// IPLD codec of the block a CID points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Codec {
    /// Opaque bytes (UnixFS raw leaves).
    Raw,
    /// Protobuf-encoded Merkle DAG node (UnixFS files and directories).
    DagPb,
}

impl Codec {
    /// The multicodec code.
    pub const fn code(self) -> u64 {
        match self {
            Self::Raw => 0x55,
            Self::DagPb => 0x70,
        }
    }

    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0x55 => Some(Self::Raw),
            0x70 => Some(Self::DagPb),
            _ => None,
        }
    }
}

/// A CIDv1 with a sha2-256 multihash.
///
/// The string form is multibase base32 (`bafy...` for dag-pb, `bafk...` for
/// raw), matching what an IPFS node prints for the same block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId {
    codec: Codec,
    digest: [u8; DIGEST_LEN],
}

impl ContentId {
    /// Create a CID from a pre-computed sha2-256 digest.
    pub fn new(codec: Codec, digest: [u8; DIGEST_LEN]) -> Self {
        Self { codec, digest }
    }

    /// Hash an encoded block and address it with the given codec.
    pub fn hash(codec: Codec, block: &[u8]) -> Self {
        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(&Sha256::digest(block));
        Self { codec, digest }
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// The raw sha2-256 digest.
    pub fn digest(&self) -> &[u8; DIGEST_LEN] {
        &self.digest
    }

    /// Binary CID: `<version><codec><multihash code><digest length><digest>`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(4 + DIGEST_LEN);
        encode_varint(&mut buf, CID_VERSION);
        encode_varint(&mut buf, self.codec.code());
        encode_varint(&mut buf, SHA2_256);
        encode_varint(&mut buf, DIGEST_LEN as u64);
        buf.extend_from_slice(&self.digest);
        buf
    }

    /// Parse a binary CIDv1.
    pub fn from_bytes(data: &[u8]) -> CidResult<Self> {
        let mut pos = 0;
        let mut next = |data: &[u8]| -> CidResult<u64> {
            let (value, consumed) = decode_varint(&data[pos..])?;
            pos += consumed;
            Ok(value)
        };

        let version = next(data)?;
        if version != CID_VERSION {
            return Err(CidError::InvalidCid(format!("unsupported CID version {version}")));
        }
        let code = next(data)?;
        let codec = Codec::from_code(code).ok_or(CidError::UnsupportedCodec(code))?;
        let hash = next(data)?;
        if hash != SHA2_256 {
            return Err(CidError::UnsupportedHash(hash));
        }
        let len = next(data)?;
        if len != DIGEST_LEN as u64 || data.len() - pos != DIGEST_LEN {
            return Err(CidError::InvalidCid(format!(
                "expected {DIGEST_LEN}-byte digest, got {} bytes",
                data.len() - pos
            )));
        }

        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(&data[pos..]);
        Ok(Self { codec, digest })
    }

    /// Trailing characters of the string form, for log lines.
    pub fn short(&self) -> String {
        let full = self.to_string();
        full[full.len() - 8..].to_string()
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({self})")
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = BASE32_NOPAD.encode(&self.to_bytes()).to_ascii_lowercase();
        write!(f, "{MULTIBASE_BASE32}{encoded}")
    }
}

impl FromStr for ContentId {
    type Err = CidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix(MULTIBASE_BASE32)
            .ok_or_else(|| CidError::InvalidCid(format!("expected base32 multibase prefix: {s:?}")))?;
        if body.bytes().any(|b| b.is_ascii_uppercase()) {
            return Err(CidError::InvalidCid(format!("expected lowercase base32: {s:?}")));
        }
        let bytes = BASE32_NOPAD
            .decode(body.to_ascii_uppercase().as_bytes())
            .map_err(|e| CidError::InvalidCid(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl Serialize for ContentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_RAW: &str = "bafkreihdwdcefgh4dqkjv67uzcmw7ojee6xedzdetojuzjevtenxquvyku";

    #[test]
    fn raw_empty_block_matches_ipfs() {
        let cid = ContentId::hash(Codec::Raw, b"");
        assert_eq!(cid.to_string(), EMPTY_RAW);
    }

    #[test]
    fn binary_layout() {
        let cid = ContentId::hash(Codec::DagPb, b"node");
        let bytes = cid.to_bytes();
        assert_eq!(&bytes[..4], &[0x01, 0x70, 0x12, 0x20]);
        assert_eq!(bytes.len(), 36);
        assert_eq!(&bytes[4..], cid.digest());
    }

    #[test]
    fn dag_pb_prefix() {
        let cid = ContentId::hash(Codec::DagPb, b"anything");
        assert!(cid.to_string().starts_with("bafybei"));
    }

    #[test]
    fn string_roundtrip() {
        let cid = ContentId::hash(Codec::DagPb, b"roundtrip");
        let parsed: ContentId = cid.to_string().parse().unwrap();
        assert_eq!(parsed, cid);
        let raw: ContentId = EMPTY_RAW.parse().unwrap();
        assert_eq!(raw.codec(), Codec::Raw);
    }

    #[test]
    fn rejects_other_multibase() {
        let err = "zb2rhe5P4gXftAwvA4eXQ5HJwsER2owDyS9sKaQRRVQPn93bA"
            .parse::<ContentId>()
            .unwrap_err();
        assert!(matches!(err, CidError::InvalidCid(_)));
    }

    #[test]
    fn rejects_uppercase() {
        let upper = EMPTY_RAW.to_ascii_uppercase().replacen('B', "b", 1);
        assert!(upper.parse::<ContentId>().is_err());
    }

    #[test]
    fn rejects_sentinel() {
        assert!("---".parse::<ContentId>().is_err());
    }

    #[test]
    fn from_bytes_rejects_unknown_codec() {
        let mut bytes = ContentId::hash(Codec::Raw, b"x").to_bytes();
        bytes[1] = 0x71;
        assert_eq!(
            ContentId::from_bytes(&bytes).unwrap_err(),
            CidError::UnsupportedCodec(0x71)
        );
    }

    #[test]
    fn from_bytes_rejects_truncated_digest() {
        let bytes = ContentId::hash(Codec::Raw, b"x").to_bytes();
        let err = ContentId::from_bytes(&bytes[..20]).unwrap_err();
        assert!(matches!(err, CidError::InvalidCid(_)));
    }

    #[test]
    fn short_is_suffix() {
        let cid = ContentId::hash(Codec::Raw, b"");
        assert_eq!(cid.short(), "enxquvyku"[1..]);
    }

    #[test]
    fn serde_as_string() {
        let cid = ContentId::hash(Codec::Raw, b"");
        let json = serde_json::to_string(&cid).unwrap();
        assert_eq!(json, format!("\"{EMPTY_RAW}\""));
        let parsed: ContentId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cid);
    }
}
