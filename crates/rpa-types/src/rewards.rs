use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amount::Wei;
use crate::error::TypeResult;
use crate::serializable::{decode_versioned_json, encode_json, Serializable};

/// Placeholder written into [`RewardsFileHeader::minipool_performance_file_cid`]
/// when the performance file's CID is intentionally not computed.
///
/// This value is visible on the wire and must be reproduced exactly.
pub const PERFORMANCE_CID_SENTINEL: &str = "---";

/// Protocol-wide reward totals for one interval.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalRewards {
    pub protocol_dao_rpl: Wei,
    pub total_collateral_rpl: Wei,
    pub total_oracle_dao_rpl: Wei,
    pub total_smoothing_pool_eth: Wei,
    pub pool_staker_smoothing_pool_eth: Wei,
    pub node_operator_smoothing_pool_eth: Wei,
}

/// Rewards allocated to one reward network (mainnet, or an L2 relay).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRewardsInfo {
    pub collateral_rpl: Wei,
    pub oracle_dao_rpl: Wei,
    pub smoothing_pool_eth: Wei,
}

/// Rewards allocated to a single node, with its Merkle proof.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRewardsInfo {
    pub reward_network: u64,
    pub collateral_rpl: Wei,
    pub oracle_dao_rpl: Wei,
    pub smoothing_pool_eth: Wei,
    pub merkle_proof: Vec<String>,
}

/// Interval metadata shared by the whole rewards tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardsFileHeader {
    pub rewards_file_version: u64,
    pub ruleset_version: u64,
    /// Reward interval index.
    pub index: u64,
    pub network: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub consensus_start_block: u64,
    pub execution_start_block: u64,
    pub consensus_end_block: u64,
    pub execution_end_block: u64,
    pub intervals_passed: u64,
    pub merkle_root: String,
    /// CID of the compressed minipool performance file, or
    /// [`PERFORMANCE_CID_SENTINEL`].
    pub minipool_performance_file_cid: String,
    pub total_rewards: TotalRewards,
    /// Keyed by the decimal network id.
    pub network_rewards: BTreeMap<String, NetworkRewardsInfo>,
}

/// A complete rewards tree for one interval.
///
/// The header fields are serialized at the top level, followed by
/// `nodeRewards` keyed by node address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardsFile {
    #[serde(flatten)]
    pub header: RewardsFileHeader,
    pub node_rewards: BTreeMap<String, NodeRewardsInfo>,
}

impl RewardsFile {
    /// Create a rewards file with no node rewards.
    pub fn new(header: RewardsFileHeader) -> Self {
        Self {
            header,
            node_rewards: BTreeMap::new(),
        }
    }

    pub fn header(&self) -> &RewardsFileHeader {
        &self.header
    }

    /// The interval index this tree belongs to.
    pub fn index(&self) -> u64 {
        self.header.index
    }

    pub fn minipool_performance_file_cid(&self) -> &str {
        &self.header.minipool_performance_file_cid
    }

    /// Record the CID of the companion performance file.
    pub fn set_minipool_performance_file_cid(&mut self, cid: impl Into<String>) {
        self.header.minipool_performance_file_cid = cid.into();
    }

    /// Returns `true` if the performance CID is the sentinel placeholder.
    pub fn has_performance_cid_sentinel(&self) -> bool {
        self.header.minipool_performance_file_cid == PERFORMANCE_CID_SENTINEL
    }
}

impl Serializable for RewardsFile {
    const KIND: &'static str = "rewards file";

    fn to_bytes(&self) -> TypeResult<Vec<u8>> {
        encode_json(self)
    }

    fn from_bytes(data: &[u8]) -> TypeResult<Self> {
        decode_versioned_json(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TypeError;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn header(index: u64) -> RewardsFileHeader {
        RewardsFileHeader {
            rewards_file_version: 3,
            ruleset_version: 9,
            index,
            network: "holesky".into(),
            start_time: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 3, 29, 0, 0, 0).unwrap(),
            consensus_start_block: 100,
            execution_start_block: 200,
            consensus_end_block: 300,
            execution_end_block: 400,
            intervals_passed: 1,
            merkle_root: "0xabc".into(),
            minipool_performance_file_cid: String::new(),
            total_rewards: TotalRewards::default(),
            network_rewards: BTreeMap::new(),
        }
    }

    fn node(collateral: u128) -> NodeRewardsInfo {
        NodeRewardsInfo {
            reward_network: 0,
            collateral_rpl: Wei::new(collateral),
            oracle_dao_rpl: Wei::ZERO,
            smoothing_pool_eth: Wei::new(collateral / 2),
            merkle_proof: vec!["0x01".into(), "0x02".into()],
        }
    }

    #[test]
    fn header_fields_are_top_level() {
        let file = RewardsFile::new(header(5));
        let value: serde_json::Value = serde_json::from_slice(&file.to_bytes().unwrap()).unwrap();
        assert_eq!(value["index"], 5);
        assert_eq!(value["network"], "holesky");
        assert_eq!(value["startTime"], "2024-03-01T00:00:00Z");
        assert!(value.get("header").is_none());
        assert!(value["nodeRewards"].as_object().unwrap().is_empty());
    }

    #[test]
    fn field_order_is_fixed() {
        let file = RewardsFile::new(header(1));
        let text = String::from_utf8(file.to_bytes().unwrap()).unwrap();
        assert!(text.starts_with(r#"{"rewardsFileVersion":3,"rulesetVersion":9,"index":1,"#));
        let cid_pos = text.find("minipoolPerformanceFileCid").unwrap();
        let nodes_pos = text.find("nodeRewards").unwrap();
        assert!(cid_pos < nodes_pos);
    }

    #[test]
    fn node_order_independent_of_insertion() {
        let mut a = RewardsFile::new(header(2));
        a.node_rewards.insert("0xbb".into(), node(1));
        a.node_rewards.insert("0xaa".into(), node(2));

        let mut b = RewardsFile::new(header(2));
        b.node_rewards.insert("0xaa".into(), node(2));
        b.node_rewards.insert("0xbb".into(), node(1));

        assert_eq!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
    }

    #[test]
    fn roundtrip_with_nodes_and_networks() {
        let mut file = RewardsFile::new(header(7));
        file.header.network_rewards.insert(
            "0".into(),
            NetworkRewardsInfo {
                collateral_rpl: Wei::new(10),
                oracle_dao_rpl: Wei::new(20),
                smoothing_pool_eth: Wei::new(30),
            },
        );
        file.node_rewards.insert("0x01".into(), node(1_000_000_000_000_000_000_000));
        file.set_minipool_performance_file_cid("bafybeigdyr");

        let parsed = RewardsFile::from_bytes(&file.to_bytes().unwrap()).unwrap();
        assert_eq!(parsed, file);
        assert_eq!(parsed.minipool_performance_file_cid(), "bafybeigdyr");
    }

    #[test]
    fn sentinel_detection() {
        let mut file = RewardsFile::new(header(1));
        assert!(!file.has_performance_cid_sentinel());
        file.set_minipool_performance_file_cid(PERFORMANCE_CID_SENTINEL);
        assert!(file.has_performance_cid_sentinel());
    }

    #[test]
    fn unsupported_version_rejected() {
        let mut file = RewardsFile::new(header(1));
        file.header.rewards_file_version = 9;
        let err = RewardsFile::from_bytes(&file.to_bytes().unwrap()).unwrap_err();
        assert_eq!(err, TypeError::UnsupportedVersion(9));
    }

    #[test]
    fn malformed_amount_rejected() {
        let file = RewardsFile::new(header(1));
        let text = String::from_utf8(file.to_bytes().unwrap()).unwrap();
        let broken = text.replacen(r#""protocolDaoRpl":"0""#, r#""protocolDaoRpl":"x""#, 1);
        let err = RewardsFile::from_bytes(broken.as_bytes()).unwrap_err();
        assert!(matches!(err, TypeError::Deserialization(_)));
    }

    proptest! {
        #[test]
        fn roundtrip_arbitrary_nodes(
            index in 0u64..100_000,
            nodes in proptest::collection::btree_map("0x[0-9a-f]{40}", any::<u128>(), 0..16),
        ) {
            let mut file = RewardsFile::new(header(index));
            for (address, amount) in nodes {
                file.node_rewards.insert(address, node(amount));
            }
            let bytes = file.to_bytes().unwrap();
            prop_assert_eq!(RewardsFile::from_bytes(&bytes).unwrap(), file.clone());
            prop_assert_eq!(file.to_bytes().unwrap(), bytes);
        }
    }
}
