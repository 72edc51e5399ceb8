use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    fs::{config_dir, data_dir},
    version::KdbVersion,
};

const FILE_NAME: &str = "core.toml";

/// Handle to the core configuration
pub type Cfg = Arc<RwLock<CoreConfig>>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to access configuration file: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// The core configuration, serialized to TOML.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Where new databases are placed. Defaults to a directory under the XDG data dir.
    library_dir: Option<PathBuf>,
    /// Whether a database may be created with an empty master password
    allow_empty_password: bool,
    /// Version preselected on the new database screen
    default_version: KdbVersion,
}

impl CoreConfig {
    /// Load the configuration from the XDG config dir, writing the defaults if no file exists.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_dir()?.join(FILE_NAME))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Ok(toml::from_str(&contents).unwrap_or_else(|e| {
                warn!("Ignoring malformed config at {}: {e}", path.display());
                Self::default()
            }))
        } else {
            let cfg = Self::default();
            cfg.save_to(path)?;
            Ok(cfg)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;

        debug!("Saved config to {}", path.display());

        Ok(())
    }

    pub fn library_dir(&self) -> Result<PathBuf> {
        match &self.library_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(data_dir()?.join("databases")),
        }
    }

    pub fn set_library_dir(&mut self, dir: impl Into<PathBuf>) {
        self.library_dir = Some(dir.into());
    }

    pub fn allow_empty_password(&self) -> bool {
        self.allow_empty_password
    }

    pub fn set_allow_empty_password(&mut self, allow: bool) {
        self.allow_empty_password = allow;
    }

    pub fn default_version(&self) -> KdbVersion {
        self.default_version
    }

    pub fn into_handle(self) -> Cfg {
        Arc::new(RwLock::new(self))
    }
}

#[cfg(test)]
mod test {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);

        let cfg = CoreConfig::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(cfg, CoreConfig::default());
        assert!(!cfg.allow_empty_password());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);

        let mut cfg = CoreConfig::default();
        cfg.set_allow_empty_password(true);
        cfg.set_library_dir(dir.path().join("vaults"));
        cfg.save_to(&path).unwrap();

        let loaded = CoreConfig::load_from(&path).unwrap();

        assert_eq!(loaded, cfg);
        assert_eq!(loaded.library_dir().unwrap(), dir.path().join("vaults"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, "default_version = \"v1\"\n").unwrap();

        let cfg = CoreConfig::load_from(&path).unwrap();

        assert_eq!(cfg.default_version(), KdbVersion::V1);
        assert!(!cfg.allow_empty_password());
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, "this is not toml = = =").unwrap();

        assert_eq!(CoreConfig::load_from(&path).unwrap(), CoreConfig::default());
    }
}
