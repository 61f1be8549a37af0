use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amount::Wei;
use crate::error::TypeResult;
use crate::serializable::{decode_versioned_json, encode_json, Serializable};

/// Attestation performance of one minipool over an interval.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinipoolPerformance {
    pub successful_attestations: u64,
    pub missed_attestations: u64,
    pub missing_attestation_slots: Vec<u64>,
    pub eth_earned: Wei,
}

/// Per-minipool performance records backing a rewards tree.
///
/// Published alongside the rewards file; the rewards header points at it by
/// CID. It carries no references of its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceFile {
    pub rewards_file_version: u64,
    pub ruleset_version: u64,
    pub index: u64,
    pub network: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub consensus_start_block: u64,
    pub execution_start_block: u64,
    pub consensus_end_block: u64,
    pub execution_end_block: u64,
    /// Keyed by minipool address.
    pub minipool_performance: BTreeMap<String, MinipoolPerformance>,
}

impl PerformanceFile {
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Total attestations (successful and missed) across every minipool.
    pub fn total_attestations(&self) -> u64 {
        self.minipool_performance
            .values()
            .map(|p| p.successful_attestations + p.missed_attestations)
            .sum()
    }
}

impl Serializable for PerformanceFile {
    const KIND: &'static str = "minipool performance file";

    fn to_bytes(&self) -> TypeResult<Vec<u8>> {
        encode_json(self)
    }

    fn from_bytes(data: &[u8]) -> TypeResult<Self> {
        decode_versioned_json(data)
    }
}
