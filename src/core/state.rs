//! Session state persisted between invocations.
//!
//! Each CLI invocation is a fresh process, while a rewrite may stay paused
//! across many of them. [`SessionCache`] keeps what the engine must remember in
//! the meantime: the last status snapshot, the patch selection and the pending
//! follow-up step of a compound operation.
//!
//! # Cache Strategy
//! - **JSON serialization**: Human-readable cache files for debugging
//! - **Timestamping**: Track when the cache was last updated
//! - **Repository isolation**: Separate cache per repository path

use crate::core::{
    change_set::merge_status_files,
    dirs::get_cache_directory,
    error::{GitLoomError, Result},
    file_change::{parse_status, FileChange},
    patch_selection::PatchSelectionTracker,
    rewrite_driver::Continuation,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CACHE_FILE: &str = "files.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCache {
    pub repo_path: PathBuf,
    #[serde(default)]
    pub files: Vec<FileChange>,
    #[serde(default)]
    pub selection: PatchSelectionTracker,
    #[serde(default)]
    pub continuation: Option<Continuation>,
    pub last_updated: DateTime<Utc>,
}

impl SessionCache {
    pub fn new(repo_path: PathBuf) -> Self {
        Self {
            repo_path,
            files: Vec::new(),
            selection: PatchSelectionTracker::new(),
            continuation: None,
            last_updated: Utc::now(),
        }
    }

    /// Fold a fresh status listing into the snapshot, keeping known files in place.
    pub fn refresh_files(&mut self, status_output: &str) -> &[FileChange] {
        let fresh = parse_status(status_output);
        self.files = merge_status_files(&self.files, fresh);
        &self.files
    }

    fn cache_file(repo_path: &Path) -> Result<PathBuf> {
        Ok(get_cache_directory(repo_path)?.join(CACHE_FILE))
    }

    /// Load the session for `repo_path`; a missing file starts a new session
    pub fn load(repo_path: &Path) -> Result<Self> {
        let cache_file = Self::cache_file(repo_path)?;
        log::debug!("Looking for session cache: {}", cache_file.display());

        if !cache_file.exists() {
            log::debug!("No session cache yet for {}", repo_path.display());
            return Ok(Self::new(repo_path.to_path_buf()));
        }

        let content = fs::read_to_string(&cache_file).map_err(|e| {
            log::error!("Failed to read cache file '{}': {e}", cache_file.display());
            GitLoomError::cache_read_failed(&cache_file, e)
        })?;

        let cache: SessionCache = serde_json::from_str(&content).map_err(|e| {
            log::error!("Failed to parse cache file '{}': {e}", cache_file.display());
            GitLoomError::cache_parse_failed(&cache_file, e)
        })?;

        log::debug!(
            "Loaded session with {} files, continuation pending: {}",
            cache.files.len(),
            cache.continuation.is_some()
        );
        Ok(cache)
    }

    pub fn save(&mut self) -> Result<()> {
        let cache_file = Self::cache_file(&self.repo_path)?;
        if let Some(cache_dir) = cache_file.parent() {
            fs::create_dir_all(cache_dir).map_err(|e| {
                log::error!(
                    "Failed to create cache directory '{}': {e}",
                    cache_dir.display()
                );
                GitLoomError::cache_directory_creation_failed(cache_dir, e)
            })?;
        }

        self.last_updated = Utc::now();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&cache_file, json).map_err(|e| {
            log::error!("Failed to write cache file '{}': {e}", cache_file.display());
            GitLoomError::cache_write_failed(&cache_file, e)
        })?;

        log::debug!("Saved session cache to {}", cache_file.display());
        Ok(())
    }
}
