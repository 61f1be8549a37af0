use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};

/// Oldest rewards file format this crate can read.
pub const MIN_FILE_VERSION: u64 = 1;

/// Newest rewards file format this crate can read or write.
pub const CURRENT_FILE_VERSION: u64 = 3;

/// A payload with a canonical byte encoding.
///
/// Implementations must be deterministic: the same payload state always
/// renders to the same bytes. Field order is fixed by declaration order and
/// every keyed collection is a `BTreeMap`.
pub trait Serializable: Sized {
    /// Human-readable name used in logs and error messages.
    const KIND: &'static str;

    /// Render the payload to its canonical bytes.
    fn to_bytes(&self) -> TypeResult<Vec<u8>>;

    /// Parse a payload from its canonical bytes.
    fn from_bytes(data: &[u8]) -> TypeResult<Self>;
}

#[derive(Deserialize)]
struct VersionProbe {
    #[serde(rename = "rewardsFileVersion")]
    version: u64,
}

/// Compact JSON encoding shared by every payload.
pub(crate) fn encode_json<T: Serialize>(value: &T) -> TypeResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| TypeError::Serialization(e.to_string()))
}

/// Decode a versioned JSON payload, rejecting unknown format versions before
/// attempting the full parse.
pub(crate) fn decode_versioned_json<T: DeserializeOwned>(data: &[u8]) -> TypeResult<T> {
    let probe: VersionProbe =
        serde_json::from_slice(data).map_err(|e| TypeError::Deserialization(e.to_string()))?;
    if !(MIN_FILE_VERSION..=CURRENT_FILE_VERSION).contains(&probe.version) {
        return Err(TypeError::UnsupportedVersion(probe.version));
    }
    serde_json::from_slice(data).map_err(|e| TypeError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Probe {
        rewards_file_version: u64,
        label: String,
    }

    #[test]
    fn decode_accepts_supported_versions() {
        for version in MIN_FILE_VERSION..=CURRENT_FILE_VERSION {
            let json = format!(r#"{{"rewardsFileVersion":{version},"label":"x"}}"#);
            let probe: Probe = decode_versioned_json(json.as_bytes()).unwrap();
            assert_eq!(probe.rewards_file_version, version);
        }
    }

    #[test]
    fn decode_rejects_future_version() {
        let json = br#"{"rewardsFileVersion":4,"somethingNew":true}"#;
        let err = decode_versioned_json::<Probe>(json).unwrap_err();
        assert_eq!(err, TypeError::UnsupportedVersion(4));
    }

    #[test]
    fn decode_rejects_version_zero() {
        let json = br#"{"rewardsFileVersion":0,"label":"x"}"#;
        let err = decode_versioned_json::<Probe>(json).unwrap_err();
        assert_eq!(err, TypeError::UnsupportedVersion(0));
    }

    #[test]
    fn decode_rejects_missing_version() {
        let err = decode_versioned_json::<Probe>(br#"{"label":"x"}"#).unwrap_err();
        assert!(matches!(err, TypeError::Deserialization(_)));
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode_versioned_json::<Probe>(b"not json").unwrap_err();
        assert!(matches!(err, TypeError::Deserialization(_)));
    }

    #[test]
    fn encode_is_compact() {
        let probe = Probe {
            rewards_file_version: 3,
            label: "a b".into(),
        };
        let bytes = encode_json(&probe).unwrap();
        assert_eq!(bytes, br#"{"rewardsFileVersion":3,"label":"a b"}"#);
    }
}
