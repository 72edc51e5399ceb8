//! Receives accepted creation requests.
//!
//! The [`Library`] decides where a new database lives, enforces the password policy and
//! keeps a registry of what it has created. Writing the encrypted database itself is the
//! storage backend's concern and isn't done here.

use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::Utc;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    config::{self, Cfg},
    fs::state_dir,
    new_database::NewDatabase,
};

mod registry;

pub use registry::DatabaseEntry;

use registry::Registry;

const REGISTRY_FILE_NAME: &str = "databases.toml";

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to read the database registry: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to write the database registry: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error(transparent)]
    Config(#[from] config::Error),
    #[error("\"{0}\" is not a valid database name")]
    InvalidName(String),
    #[error("A master password is required")]
    EmptyPassword,
    #[error("A database named {0} already exists")]
    AlreadyExists(String),
}

/// Something that can turn a [`NewDatabase`] request into a database.
pub trait DatabaseCreator {
    type Created;
    type Error;

    fn create(&self, request: NewDatabase) -> std::result::Result<Self::Created, Self::Error>;
}

#[derive(Clone, Debug)]
pub struct Library {
    dir: PathBuf,
    registry_path: PathBuf,
    registry: Arc<RwLock<Registry>>,
    cfg: Cfg,
}

impl Library {
    /// Open the library at the configured location, keeping its registry in the XDG state dir.
    pub fn new(cfg: Cfg) -> Result<Self> {
        let dir = cfg.read().library_dir()?;
        Self::open(dir, state_dir()?.join(REGISTRY_FILE_NAME), cfg)
    }

    pub fn open(dir: impl Into<PathBuf>, registry_path: impl Into<PathBuf>, cfg: Cfg) -> Result<Self> {
        let dir = dir.into();
        let registry_path = registry_path.into();

        std::fs::create_dir_all(&dir)?;
        let registry = Registry::load(&registry_path)?;

        debug!(
            "Opened library at {} with {} databases",
            dir.display(),
            registry.entries().len()
        );

        Ok(Self {
            dir,
            registry_path,
            registry: Arc::new(RwLock::new(registry)),
            cfg,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Databases created so far, oldest first
    pub fn databases(&self) -> Vec<DatabaseEntry> {
        self.registry.read().entries().to_vec()
    }

    pub fn path_of(&self, entry: &DatabaseEntry) -> PathBuf {
        self.dir.join(&entry.file_name)
    }

    fn check_name(name: &str) -> Result<()> {
        if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\', '\0']) {
            return Err(Error::InvalidName(name.into()));
        }

        Ok(())
    }
}

impl DatabaseCreator for Library {
    type Created = DatabaseEntry;
    type Error = Error;

    fn create(&self, request: NewDatabase) -> Result<DatabaseEntry> {
        Self::check_name(request.name())?;

        if request.password().is_empty() && !self.cfg.read().allow_empty_password() {
            return Err(Error::EmptyPassword);
        }

        let file_name = request.file_name();

        let mut registry = self.registry.write();
        if registry.contains(&file_name) || self.dir.join(&file_name).exists() {
            return Err(Error::AlreadyExists(file_name));
        }

        let entry = DatabaseEntry {
            name: request.name().clone(),
            file_name,
            version: request.version(),
            created: Utc::now(),
        };

        // Only commit in memory once the registry is on disk
        let mut updated = registry.clone();
        updated.insert(entry.clone());
        updated.save(&self.registry_path)?;
        *registry = updated;

        info!("Created database {} ({})", entry.name, entry.version);

        Ok(entry)
    }
}
