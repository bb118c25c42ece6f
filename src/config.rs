//! Persisted grid preferences.
//!
//! The last applied category-filter set and view flags survive across
//! sessions; event data itself never does. Stored as TOML under the
//! platform config dir.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};
use crate::filter::CategoryFilter;
use crate::layout::ViewMode;

/// Preferences at ~/.config/shiftgrid/prefs.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridPrefs {
    #[serde(default)]
    pub filter: CategoryFilter,

    #[serde(default)]
    pub view_mode: ViewMode,

    /// Noon-to-noon shift window instead of the midnight origin.
    #[serde(default)]
    pub night_view: bool,
}

impl GridPrefs {
    pub fn prefs_path() -> GridResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| GridError::Config("Could not determine config directory".into()))?
            .join("shiftgrid");

        Ok(config_dir.join("prefs.toml"))
    }

    /// Load saved preferences, or the defaults when none were saved yet.
    pub fn load() -> GridResult<Self> {
        Self::load_from(&Self::prefs_path()?)
    }

    pub fn load_from(path: &Path) -> GridResult<Self> {
        if !path.exists() {
            return Ok(GridPrefs::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| GridError::Config(format!("Could not read preferences: {e}")))?;
        toml::from_str(&content).map_err(|e| GridError::Config(e.to_string()))
    }

    pub fn save(&self) -> GridResult<()> {
        self.save_to(&Self::prefs_path()?)
    }

    pub fn save_to(&self, path: &Path) -> GridResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| GridError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| GridError::Config(format!("Could not create config directory: {e}")))?;
        }

        std::fs::write(path, content)
            .map_err(|e| GridError::Config(format!("Could not write preferences: {e}")))?;

        Ok(())
    }
}
