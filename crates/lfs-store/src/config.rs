use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MetaError, MetaResult};

/// Configuration for opening a [`MetaStore`](crate::MetaStore).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the store file. Created if missing.
    pub path: PathBuf,
    /// How long to wait for the file lock held by another process.
    pub open_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("lfs.db"),
            open_timeout: Duration::from_secs(1),
        }
    }
}

impl StoreConfig {
    /// Default configuration for the store file at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> MetaResult<Self> {
        toml::from_str(s).map_err(|e| MetaError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> MetaResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| MetaError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}
