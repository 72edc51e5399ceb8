use std::{fs, io, path::PathBuf};

use keyhold_lib::fs::config_dir;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::theme::Theme;

mod theme;

const FILE_NAME: &str = "gui.toml";

/// The frontend's configuration, serialized to TOML.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    pub theme: Theme,
}

impl GuiConfig {
    /// Load the configuration, falling back to the defaults if it can't be read.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load GUI config, using defaults: {e}");
                Self::default()
            }
        }
    }

    fn try_load() -> io::Result<Self> {
        let path = path()?;

        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Ok(toml::from_str(&contents).unwrap_or_default())
        } else {
            let cfg = Self::default();
            cfg.save()?;
            Ok(cfg)
        }
    }

    pub fn save(&self) -> io::Result<()> {
        let contents = toml::to_string_pretty(self).map_err(io::Error::other)?;

        fs::write(path()?, contents)
    }

    pub fn theme(&self) -> iced::Theme {
        (&self.theme).into()
    }
}

fn path() -> io::Result<PathBuf> {
    Ok(config_dir()?.join(FILE_NAME))
}
