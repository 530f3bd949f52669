//! Which files of one commit are marked for a cross-commit patch operation.
//!
//! Only one target commit is active at a time. Queries about any other commit
//! answer [`SelectionStatus::Unselected`].

use crate::core::error::{GitLoomError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStatus {
    #[default]
    Unselected,
    WholeFile,
    Partial,
}

impl fmt::Display for SelectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SelectionStatus::Unselected => "unselected",
            SelectionStatus::WholeFile => "whole file",
            SelectionStatus::Partial => "partial",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSelectionTracker {
    target_sha: Option<String>,
    files: BTreeMap<String, SelectionStatus>,
}

impl PatchSelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target_sha(&self) -> Option<&str> {
        self.target_sha.as_deref()
    }

    fn is_target(&self, sha: &str) -> bool {
        self.target_sha.as_deref() == Some(sha)
    }

    /// Make `sha` the active target, keeping only the selections for `carry_over`.
    pub fn switch_target(&mut self, sha: &str, carry_over: &[&str]) {
        if self.is_target(sha) {
            return;
        }
        log::debug!("Patch selection target is now {sha}");
        self.files.retain(|path, _| carry_over.contains(&path.as_str()));
        self.target_sha = Some(sha.to_string());
    }

    /// Mark `path` in commit `sha`. Selecting in another commit switches target;
    /// unselecting there changes nothing.
    pub fn set_status(&mut self, sha: &str, path: &str, status: SelectionStatus) {
        if status == SelectionStatus::Unselected && !self.is_target(sha) {
            return;
        }
        self.switch_target(sha, &[]);
        match status {
            SelectionStatus::Unselected => {
                self.files.remove(path);
            }
            other => {
                self.files.insert(path.to_string(), other);
            }
        }
    }

    pub fn get_status(&self, sha: &str, path: &str) -> SelectionStatus {
        if !self.is_target(sha) {
            return SelectionStatus::Unselected;
        }
        self.files.get(path).copied().unwrap_or_default()
    }

    /// Selected paths of the active target, in path order
    pub fn selected(&self) -> impl Iterator<Item = (&str, SelectionStatus)> {
        self.files.iter().map(|(path, status)| (path.as_str(), *status))
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn clear(&mut self) {
        self.target_sha = None;
        self.files.clear();
    }

    /// Paths selected as whole files in `sha`.
    ///
    /// Fails if `sha` is not the active target, nothing is selected, or any
    /// selection is partial.
    pub fn whole_file_paths(&self, sha: &str) -> Result<Vec<String>> {
        match self.target_sha.as_deref() {
            Some(active) if active == sha => {}
            Some(active) => {
                return Err(GitLoomError::SelectionTargetMismatch {
                    expected: sha.to_string(),
                    actual: active.to_string(),
                })
            }
            None => return Err(GitLoomError::EmptySelection { sha: sha.to_string() }),
        }

        if let Some((path, _)) = self
            .files
            .iter()
            .find(|(_, status)| **status == SelectionStatus::Partial)
        {
            return Err(GitLoomError::UnsupportedPartialSelection { path: path.clone() });
        }
        if self.files.is_empty() {
            return Err(GitLoomError::EmptySelection { sha: sha.to_string() });
        }
        Ok(self.files.keys().cloned().collect())
    }
}
