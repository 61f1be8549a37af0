//! Payload types for reward pool artifacts.
//!
//! Every reward interval produces two JSON artifacts: the rewards tree and
//! the minipool performance file it references. Both must render to the same
//! bytes on every node that computes the interval, so their encodings are
//! fixed here.
//!
//! # Key Types
//!
//! - [`RewardsFile`]: rewards tree with its interval header
//! - [`PerformanceFile`]: per-minipool attestation performance
//! - [`Serializable`]: canonical byte encoding contract for payloads
//! - [`Wei`]: token amount serialized as a decimal string

pub mod amount;
pub mod error;
pub mod performance;
pub mod rewards;
pub mod serializable;

pub use amount::Wei;
pub use error::{TypeError, TypeResult};
pub use performance::{MinipoolPerformance, PerformanceFile};
pub use rewards::{
    NetworkRewardsInfo, NodeRewardsInfo, RewardsFile, RewardsFileHeader, TotalRewards,
    PERFORMANCE_CID_SENTINEL,
};
pub use serializable::{Serializable, CURRENT_FILE_VERSION, MIN_FILE_VERSION};
