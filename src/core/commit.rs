use serde::{Deserialize, Serialize};

/// A commit in the history list. Lists are ordered newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    /// Subject line
    pub name: String,
    #[serde(default)]
    pub is_merge: bool,
}

impl Commit {
    pub fn new(sha: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            name: name.into(),
            is_merge: false,
        }
    }

    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}
