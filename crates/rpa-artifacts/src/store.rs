use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Destination for artifact bytes.
///
/// Implementations must satisfy these rules:
/// - `write` replaces any existing content at `path`.
/// - Writes are not required to be atomic.
/// - Errors are returned as-is; no implementation retries.
pub trait ArtifactStore: Send + Sync {
    /// Write `data` to `path`, replacing existing content.
    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()>;

    /// Read the full content at `path`.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

impl<S: ArtifactStore + ?Sized> ArtifactStore for &S {
    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        (**self).write(path, data)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read(path)
    }
}

/// Local filesystem store.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsStore;

impl ArtifactStore for FsStore {
    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        std::fs::write(path, data)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// In-memory store that records every write in order.
///
/// Intended for tests: the write log makes the artifact ordering observable
/// without touching a disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RwLock<BTreeMap<PathBuf, Vec<u8>>>,
    log: RwLock<Vec<PathBuf>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every path written, in write order (repeated writes appear twice).
    pub fn writes(&self) -> Vec<PathBuf> {
        self.log.read().expect("lock poisoned").clone()
    }

    /// Current content at `path`, if any.
    pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.read().expect("lock poisoned").get(path).cloned()
    }

    /// Number of distinct paths held.
    pub fn len(&self) -> usize {
        self.files.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().expect("lock poisoned").is_empty()
    }
}

impl ArtifactStore for MemoryStore {
    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        self.files
            .write()
            .expect("lock poisoned")
            .insert(path.to_path_buf(), data.to_vec());
        self.log
            .write()
            .expect("lock poisoned")
            .push(path.to_path_buf());
        Ok(())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no artifact at {}", path.display()),
            )
        })
    }
}
