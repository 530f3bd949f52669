//! Repository metadata read through `git2`.
//!
//! This module provides [`GitRepo`], the read-only view of a repository that the
//! rewrite engine needs before it starts: where the repository lives, its
//! newest-first history, whether commits get signed and whether git is already
//! in the middle of a rebase. Everything that mutates the repository goes
//! through the `git` binary instead, see [`crate::core::process`].
//!
//! # Public API
//! - [`GitRepo`]: Main interface for repository queries
//! - [`parse_git_bool`]: git's boolean config syntax

use crate::core::{
    commit::Commit,
    error::{GitLoomError, Result},
    rewrite_driver::RebaseMode,
};
use git2::{Repository, RepositoryState, Sort};
use std::path::{Path, PathBuf};

pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                GitLoomError::NotInGitRepo
            } else {
                GitLoomError::GitRepo(e)
            }
        })?;
        Ok(GitRepo { repo })
    }

    pub fn workdir(&self) -> Result<&Path> {
        self.repo.workdir().ok_or(GitLoomError::NotInGitRepo)
    }

    /// The `.git` directory
    pub fn git_dir(&self) -> PathBuf {
        self.repo.path().to_path_buf()
    }

    pub fn get_repository(&self) -> &Repository {
        &self.repo
    }

    /// Up to `limit` commits reachable from HEAD, newest first.
    ///
    /// An unborn branch has no history and yields an empty list.
    pub fn commits(&self, limit: usize) -> Result<Vec<Commit>> {
        if self.repo.head().is_err() {
            return Ok(Vec::new());
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL)?;

        let mut commits = Vec::new();
        for oid in revwalk.take(limit) {
            let commit = self.repo.find_commit(oid?)?;
            commits.push(Self::to_commit(&commit));
        }
        log::debug!("Loaded {} commits from HEAD", commits.len());
        Ok(commits)
    }

    /// Resolve any revision (sha, branch, `HEAD~2`) to a commit
    pub fn resolve_commit(&self, rev: &str) -> Result<Commit> {
        let commit = self.repo.revparse_single(rev)?.peel_to_commit()?;
        Ok(Self::to_commit(&commit))
    }

    fn to_commit(commit: &git2::Commit) -> Commit {
        let subject = commit.summary().unwrap_or("").to_string();
        let mut entry = Commit::new(commit.id().to_string(), subject);
        entry.is_merge = commit.parent_count() > 1;
        entry
    }

    /// Whether `commit.gpgsign` is switched on for this repository
    pub fn commit_signing_enabled(&self) -> bool {
        let value = self
            .repo
            .config()
            .and_then(|config| config.get_string("commit.gpgsign"));
        match value {
            Ok(value) => parse_git_bool(&value),
            Err(_) => false,
        }
    }

    pub fn rebase_mode(&self) -> RebaseMode {
        match self.repo.state() {
            RepositoryState::RebaseInteractive | RepositoryState::RebaseMerge => {
                RebaseMode::Interactive
            }
            RepositoryState::Rebase | RepositoryState::ApplyMailboxOrRebase => RebaseMode::Normal,
            _ => RebaseMode::None,
        }
    }

    pub fn get_current_branch(&self) -> Result<String> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(_) => return Ok("-none-".to_string()),
        };

        match (head.is_branch(), head.shorthand(), head.target()) {
            (true, Some(name), _) => Ok(name.to_string()),
            (false, _, Some(oid)) => {
                let sha = oid.to_string();
                Ok(format!("detached at {}", &sha[..7]))
            }
            _ => Ok("-none-".to_string()),
        }
    }

    /// Short sha and subject of HEAD
    pub fn get_head_commit_info(&self) -> Result<(String, String)> {
        match self.repo.head().ok().and_then(|head| head.target()) {
            Some(oid) => {
                let commit = self.repo.find_commit(oid)?;
                let short_hash = oid.to_string()[..7].to_string();
                Ok((short_hash, commit.summary().unwrap_or("").to_string()))
            }
            None => Ok(("".to_string(), "- no commits yet -".to_string())),
        }
    }
}

/// git's boolean syntax: `true`, `1`, `yes` and `on` in any case are true.
pub fn parse_git_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
