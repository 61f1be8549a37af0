use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ArtifactError, ArtifactResult};

/// Where and under which names interval artifacts are written.
///
/// ```toml
/// output_dir = "/srv/rewards-trees"
/// network = "holesky"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArtifactConfig {
    /// Directory holding every artifact.
    pub output_dir: PathBuf,
    /// Network name embedded in artifact file names.
    pub network: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("rewards-trees"),
            network: "mainnet".into(),
        }
    }
}

impl ArtifactConfig {
    pub fn new(output_dir: impl Into<PathBuf>, network: impl Into<String>) -> ArtifactResult<Self> {
        let config = Self {
            output_dir: output_dir.into(),
            network: network.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document. Missing keys take their default values.
    pub fn from_toml_str(s: &str) -> ArtifactResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ArtifactError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file; a missing file yields the defaults.
    pub fn load(path: &Path) -> ArtifactResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ArtifactError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> ArtifactResult<()> {
        if self.network.is_empty() {
            return Err(ArtifactError::Config("network must not be empty".into()));
        }
        if self.network.contains(['/', '\\']) {
            return Err(ArtifactError::Config(format!(
                "network {:?} must not contain path separators",
                self.network
            )));
        }
        Ok(())
    }

    /// `rp-rewards-<network>-<index>.json`
    pub fn rewards_file_name(&self, index: u64) -> String {
        format!("rp-rewards-{}-{index}.json", self.network)
    }

    /// `rp-minipool-performance-<network>-<index>.json`
    pub fn performance_file_name(&self, index: u64) -> String {
        format!("rp-minipool-performance-{}-{index}.json", self.network)
    }

    pub fn rewards_path(&self, index: u64) -> PathBuf {
        self.output_dir.join(self.rewards_file_name(index))
    }

    pub fn performance_path(&self, index: u64) -> PathBuf {
        self.output_dir.join(self.performance_file_name(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ArtifactConfig::default();
        assert_eq!(c.output_dir, PathBuf::from("rewards-trees"));
        assert_eq!(c.network, "mainnet");
    }

    #[test]
    fn file_names() {
        let c = ArtifactConfig::new("/data", "holesky").unwrap();
        assert_eq!(c.rewards_file_name(12), "rp-rewards-holesky-12.json");
        assert_eq!(
            c.performance_file_name(12),
            "rp-minipool-performance-holesky-12.json"
        );
        assert_eq!(
            c.rewards_path(12),
            PathBuf::from("/data/rp-rewards-holesky-12.json")
        );
        assert_eq!(
            c.performance_path(0),
            PathBuf::from("/data/rp-minipool-performance-holesky-0.json")
        );
    }

    #[test]
    fn parse_partial_toml() {
        let c = ArtifactConfig::from_toml_str("network = \"holesky\"\n").unwrap();
        assert_eq!(c.network, "holesky");
        assert_eq!(c.output_dir, PathBuf::from("rewards-trees"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = ArtifactConfig::from_toml_str("netwrok = \"holesky\"\n").unwrap_err();
        assert!(matches!(err, ArtifactError::Config(_)));
    }

    #[test]
    fn rejects_bad_network() {
        assert!(ArtifactConfig::new("/data", "").is_err());
        assert!(ArtifactConfig::new("/data", "../etc").is_err());
        assert!(ArtifactConfig::from_toml_str("network = \"a/b\"\n").is_err());
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let c = ArtifactConfig::load(&dir.path().join("rpa.toml")).unwrap();
        assert_eq!(c, ArtifactConfig::default());
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rpa.toml");
        std::fs::write(&path, "output_dir = \"/srv/trees\"\nnetwork = \"devnet\"\n").unwrap();
        let c = ArtifactConfig::load(&path).unwrap();
        assert_eq!(c.output_dir, PathBuf::from("/srv/trees"));
        assert_eq!(c.network, "devnet");
    }
}
