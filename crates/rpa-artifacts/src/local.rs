use std::path::{Path, PathBuf};

use rpa_cid::{single_file_dir_cid, CidError, ContentId};
use rpa_types::{PerformanceFile, RewardsFile, Serializable};
use tracing::debug;

use crate::compress::{compress, compressed_path};
use crate::error::{ArtifactError, ArtifactResult};
use crate::store::{ArtifactStore, FsStore};

/// Compute the single-file-directory CID of `data` stored under `name`.
pub fn identify(data: &[u8], name: &str) -> ArtifactResult<ContentId> {
    let cid = single_file_dir_cid(data, name).map_err(|source| {
        ArtifactError::IdentifierComputationFailed {
            name: name.to_string(),
            source,
        }
    })?;
    debug!(file = name, cid = %cid, len = data.len(), "computed CID");
    Ok(cid)
}

/// Final path component, or empty if there is none.
///
/// CIDs are computed under this name, so a component that is not valid
/// UTF-8 is an error rather than being replaced lossily.
pub(crate) fn file_name_of(path: &Path) -> ArtifactResult<&str> {
    let Some(name) = path.file_name() else {
        return Ok("");
    };
    name.to_str().ok_or_else(|| {
        let lossy = name.to_string_lossy().into_owned();
        ArtifactError::IdentifierComputationFailed {
            name: lossy.clone(),
            source: CidError::InvalidName {
                name: lossy,
                reason: "name is not valid UTF-8",
            },
        }
    })
}

/// A payload bound to the path it is written to.
///
/// The artifact borrows its payload, so the owner cannot change it while the
/// artifact exists. Anything that must land in the file (such as the
/// performance CID in a rewards header) has to be set before the artifact is
/// constructed.
pub struct LocalArtifact<'a, T, S: ?Sized = FsStore> {
    payload: &'a T,
    path: PathBuf,
    store: &'a S,
}

/// A rewards file bound to its path.
pub type LocalRewardsFile<'a> = LocalArtifact<'a, RewardsFile>;

/// A minipool performance file bound to its path.
pub type LocalPerformanceFile<'a> = LocalArtifact<'a, PerformanceFile>;

impl<'a, T: Serializable> LocalArtifact<'a, T> {
    /// Bind `payload` to `path` on the local filesystem. Nothing is written
    /// until [`persist`](Self::persist) is called.
    pub fn new(payload: &'a T, path: impl Into<PathBuf>) -> Self {
        Self {
            payload,
            path: path.into(),
            store: &FsStore,
        }
    }
}

impl<'a, T: Serializable, S: ArtifactStore + ?Sized> LocalArtifact<'a, T, S> {
    /// Bind `payload` to `path` within `store`.
    pub fn with_store(payload: &'a T, path: impl Into<PathBuf>, store: &'a S) -> Self {
        Self {
            payload,
            path: path.into(),
            store,
        }
    }

    /// The bound payload.
    pub fn payload(&self) -> &'a T {
        self.payload
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final component of the bound path. Fails if it is not valid UTF-8.
    pub fn file_name(&self) -> ArtifactResult<&str> {
        file_name_of(&self.path)
    }

    /// Render the payload to its canonical bytes.
    pub fn serialize(&self) -> ArtifactResult<Vec<u8>> {
        self.payload
            .to_bytes()
            .map_err(|e| ArtifactError::SerializationFailed {
                name: format!("{} {}", T::KIND, self.path.display()),
                reason: e.to_string(),
            })
    }

    /// Serialize the payload and write it to the bound path, replacing any
    /// existing file. Returns the bytes written.
    pub fn persist(&self) -> ArtifactResult<Vec<u8>> {
        let data = self.serialize()?;
        self.store
            .write(&self.path, &data)
            .map_err(|source| ArtifactError::WriteFailed {
                path: self.path.clone(),
                source,
            })?;
        debug!(kind = T::KIND, path = %self.path.display(), len = data.len(), "wrote artifact");
        Ok(data)
    }

    /// Compress the serialized payload, write it next to the bound path with
    /// the compressed extension, and return that path with the CID of the
    /// compressed bytes.
    ///
    /// The CID is computed under the compressed file's name, since only the
    /// compressed form is ever distributed.
    pub fn compress_and_identify(&self) -> ArtifactResult<(PathBuf, ContentId)> {
        let data = self.serialize()?;
        let path = compressed_path(&self.path);

        let compressed = compress(&data).map_err(|e| ArtifactError::CompressionFailed {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let cid = identify(&compressed, file_name_of(&path)?)?;

        self.store
            .write(&path, &compressed)
            .map_err(|source| ArtifactError::WriteFailed {
                path: path.clone(),
                source,
            })?;
        debug!(
            kind = T::KIND,
            path = %path.display(),
            plain = data.len(),
            compressed = compressed.len(),
            "wrote compressed artifact"
        );
        Ok((path, cid))
    }
}

/// A payload read back from disk, owning its content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedArtifact<T> {
    payload: T,
    path: PathBuf,
}

impl<T: Serializable> LoadedArtifact<T> {
    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Borrow this artifact as a [`LocalArtifact`] bound to the path it was
    /// read from, on the local filesystem.
    ///
    /// This targets [`FsStore`] whatever store the artifact was loaded from;
    /// use [`as_local_in`](Self::as_local_in) to write back elsewhere.
    pub fn as_local(&self) -> LocalArtifact<'_, T> {
        LocalArtifact::new(&self.payload, self.path.clone())
    }

    /// Borrow this artifact as a [`LocalArtifact`] bound to the path it was
    /// read from, within `store`.
    pub fn as_local_in<'a, S: ArtifactStore + ?Sized>(
        &'a self,
        store: &'a S,
    ) -> LocalArtifact<'a, T, S> {
        LocalArtifact::with_store(&self.payload, self.path.clone(), store)
    }
}

/// Read and parse an artifact from `store`.
pub fn read_artifact_from<T: Serializable, S: ArtifactStore + ?Sized>(
    store: &S,
    path: impl AsRef<Path>,
) -> ArtifactResult<LoadedArtifact<T>> {
    let path = path.as_ref();
    let data = store.read(path).map_err(|source| ArtifactError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let payload = T::from_bytes(&data).map_err(|e| ArtifactError::DeserializationFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!(kind = T::KIND, path = %path.display(), "loaded artifact");
    Ok(LoadedArtifact {
        payload,
        path: path.to_path_buf(),
    })
}

/// Read an artifact from the local filesystem.
pub fn read_artifact<T: Serializable>(path: impl AsRef<Path>) -> ArtifactResult<LoadedArtifact<T>> {
    read_artifact_from(&FsStore, path)
}

/// Read an existing rewards file from disk.
pub fn read_rewards_file(path: impl AsRef<Path>) -> ArtifactResult<LoadedArtifact<RewardsFile>> {
    read_artifact(path)
}

/// Read an existing minipool performance file from disk.
pub fn read_performance_file(
    path: impl AsRef<Path>,
) -> ArtifactResult<LoadedArtifact<PerformanceFile>> {
    read_artifact(path)
}
