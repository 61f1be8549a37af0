use indexmap::IndexMap;
use rpa_cid::ContentId;
use rpa_types::{PerformanceFile, RewardsFile, PERFORMANCE_CID_SENTINEL};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ArtifactConfig;
use crate::error::ArtifactResult;
use crate::local::{file_name_of, identify, LocalArtifact};
use crate::store::{ArtifactStore, FsStore};

/// CIDs of every file written for an interval, keyed by file name, in write
/// order.
pub type CidMap = IndexMap<String, ContentId>;

/// Outcome of saving one interval's artifacts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SavedArtifacts {
    /// CID of the plain rewards file; the value nodes compare for consensus.
    pub primary_cid: ContentId,
    /// Every CID computed, plain and compressed.
    pub cids: CidMap,
}

/// Writes the rewards tree and minipool performance file for an interval.
///
/// One writer may save many intervals, but only one at a time: the store
/// paths of an interval must not be shared with a concurrent save.
pub struct ArtifactWriter<S = FsStore> {
    config: ArtifactConfig,
    store: S,
}

impl ArtifactWriter<FsStore> {
    /// A writer targeting the local filesystem.
    pub fn new(config: ArtifactConfig) -> Self {
        Self {
            config,
            store: FsStore,
        }
    }
}

impl<S: ArtifactStore> ArtifactWriter<S> {
    pub fn with_store(config: ArtifactConfig, store: S) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &ArtifactConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persist both artifacts for the interval in `rewards.index()`.
    ///
    /// The performance file is written first. On a trusted run its
    /// compressed CID is written into the rewards header; otherwise the
    /// header gets [`PERFORMANCE_CID_SENTINEL`], replacing whatever value it
    /// held. Only then is the rewards file written. Trusted runs also write
    /// `.zst` copies of both files.
    ///
    /// Any failure aborts the save. Files already written stay on disk.
    pub fn save(
        &self,
        rewards: &mut RewardsFile,
        performance: &PerformanceFile,
        trusted: bool,
    ) -> ArtifactResult<SavedArtifacts> {
        let index = rewards.index();
        if performance.index() != index {
            warn!(
                rewards_index = index,
                performance_index = performance.index(),
                "performance file index differs from rewards file index"
            );
        }
        let mut cids = CidMap::with_capacity(4);

        // Do not reorder: the rewards header embeds the performance CID.
        let performance_cid = {
            let artifact = LocalArtifact::with_store(
                performance,
                self.config.performance_path(index),
                &self.store,
            );
            let name = artifact.file_name()?.to_string();
            let data = artifact.persist()?;
            let cid = identify(&data, &name)?;
            cids.insert(name, cid);

            if trusted {
                let (path, cid) = artifact.compress_and_identify()?;
                cids.insert(file_name_of(&path)?.to_string(), cid);
                cid.to_string()
            } else {
                // Non-trusted nodes only need the inflated files.
                PERFORMANCE_CID_SENTINEL.to_string()
            }
        };
        rewards.set_minipool_performance_file_cid(performance_cid);
        debug!(
            index,
            cid = rewards.minipool_performance_file_cid(),
            "recorded performance file CID"
        );

        let artifact =
            LocalArtifact::with_store(&*rewards, self.config.rewards_path(index), &self.store);
        let name = artifact.file_name()?.to_string();
        let data = artifact.persist()?;
        let primary_cid = identify(&data, &name)?;
        cids.insert(name, primary_cid);

        if trusted {
            let (path, cid) = artifact.compress_and_identify()?;
            cids.insert(file_name_of(&path)?.to_string(), cid);
        }

        info!(
            index,
            trusted,
            primary = %primary_cid,
            files = cids.len(),
            "saved interval artifacts"
        );
        Ok(SavedArtifacts { primary_cid, cids })
    }
}
