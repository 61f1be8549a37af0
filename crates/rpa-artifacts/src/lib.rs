//! Materialization and content addressing of reward pool artifacts.
//!
//! Each reward interval yields a rewards tree and a minipool performance
//! file. Oracle nodes publish zstd-compressed copies and agree on the tree
//! by comparing CIDs, so every byte written here is consensus-relevant.
//!
//! # Architecture
//!
//! - **LocalArtifact**: a payload bound to its destination path
//! - **ArtifactWriter**: writes both files for an interval in the required
//!   order and collects their CIDs
//! - **ArtifactStore**: filesystem or in-memory destination for artifact bytes
//! - **ArtifactConfig**: output directory and file naming
//!
//! # Ordering
//!
//! The performance file is always written first. On a trusted run the CID of
//! its compressed copy is embedded in the rewards header before the rewards
//! file is serialized; otherwise the header carries the `"---"` sentinel.

pub mod compress;
pub mod config;
pub mod error;
pub mod local;
pub mod store;
pub mod writer;

pub use compress::{
    compress, compressed_path, decompress, COMPRESSED_EXTENSION, COMPRESSION_LEVEL,
    ZSTD_LIBRARY_VERSION,
};
pub use config::ArtifactConfig;
pub use error::{ArtifactError, ArtifactResult};
pub use local::{
    identify, read_artifact, read_artifact_from, read_performance_file, read_rewards_file,
    LoadedArtifact, LocalArtifact, LocalPerformanceFile, LocalRewardsFile,
};
pub use store::{ArtifactStore, FsStore, MemoryStore};
pub use writer::{ArtifactWriter, CidMap, SavedArtifacts};
