//! User configuration stored as JSON in the git-loom config directory.

use crate::core::dirs::get_config_directory;
use crate::core::error::Result;
use crate::core::rewrite_driver::RewriteSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RebaseConfig {
    pub autostash: bool,
    pub keep_empty: bool,
    pub rebase_merges: bool,
}

impl Default for RebaseConfig {
    fn default() -> Self {
        Self {
            autostash: true,
            keep_empty: true,
            rebase_merges: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoomConfig {
    pub git_binary: String,
    pub rebase: RebaseConfig,
    /// How many commits `log` and the rewrite commands load
    pub log_limit: usize,
}

impl Default for LoomConfig {
    fn default() -> Self {
        Self {
            git_binary: "git".to_string(),
            rebase: RebaseConfig::default(),
            log_limit: 300,
        }
    }
}

impl LoomConfig {
    pub fn config_file() -> Result<PathBuf> {
        Ok(get_config_directory()?.join("config.json"))
    }

    /// Load the config file, falling back to defaults when there is none
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Driver settings for this config
    pub fn rewrite_settings(&self, editor_path: PathBuf, debug: bool) -> RewriteSettings {
        RewriteSettings {
            git_binary: self.git_binary.clone(),
            editor_path,
            autostash: self.rebase.autostash,
            keep_empty: self.rebase.keep_empty,
            rebase_merges: self.rebase.rebase_merges,
            debug,
        }
    }
}
