use std::io;
use std::path::{Path, PathBuf};

/// Extension appended to an artifact path for its compressed copy.
pub const COMPRESSED_EXTENSION: &str = ".zst";

/// zstd level used for every published artifact.
///
/// Changing it changes every compressed CID.
pub const COMPRESSION_LEVEL: i32 = 22;

/// libzstd release the compressor must be linked against (1.5.7), as
/// reported by `ZSTD_versionNumber`.
///
/// Compressed bytes are only reproducible between builds linking the same
/// libzstd release. Other zstd encoders produce different frames for the
/// same input even at their own best-compression setting, and some add a
/// frame checksum, so their output never matches these CIDs.
pub const ZSTD_LIBRARY_VERSION: u32 = 10507;

/// Compress `data` as a single zstd frame at [`COMPRESSION_LEVEL`].
///
/// The frame records the content size and carries no checksum or
/// dictionary. Fails if the linked libzstd is not
/// [`ZSTD_LIBRARY_VERSION`], for example when built against a system
/// library.
pub fn compress(data: &[u8]) -> io::Result<Vec<u8>> {
    let linked = zstd::zstd_safe::version_number();
    if linked != ZSTD_LIBRARY_VERSION {
        return Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("linked libzstd {linked} does not match pinned {ZSTD_LIBRARY_VERSION}"),
        ));
    }
    zstd::bulk::compress(data, COMPRESSION_LEVEL)
}

/// Decompress a zstd stream produced by [`compress`].
pub fn decompress(data: &[u8]) -> io::Result<Vec<u8>> {
    zstd::decode_all(data)
}

/// `path` with [`COMPRESSED_EXTENSION`] appended (`a.json` -> `a.json.zst`).
pub fn compressed_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(COMPRESSED_EXTENSION);
    PathBuf::from(os)
}
