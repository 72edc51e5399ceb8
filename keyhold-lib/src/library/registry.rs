use std::{fs, path::Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{library::Result, version::KdbVersion};

/// A database the [`Library`](super::Library) has created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseEntry {
    pub name: String,
    pub file_name: String,
    pub version: KdbVersion,
    pub created: DateTime<Utc>,
}

/// Bookkeeping of created databases, serialized to TOML.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct Registry {
    #[serde(default)]
    databases: Vec<DatabaseEntry>,
}

impl Registry {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;

        Ok(())
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.databases.iter().any(|e| e.file_name == file_name)
    }

    pub fn insert(&mut self, entry: DatabaseEntry) {
        self.databases.push(entry);
    }

    pub fn entries(&self) -> &[DatabaseEntry] {
        &self.databases
    }
}
