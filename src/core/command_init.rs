//! Centralized initialization for commands.
//!
//! This module provides [`CommandContext`], which handles the setup every
//! command shares: repository discovery, configuration, the session cache and,
//! for history rewrites, a [`FileOpOrchestrator`] wired to the real `git`
//! binary and file system.
//!
//! # Initialization Steps
//! 1. **Git repository validation**: Ensure we're in a valid git repository
//! 2. **Configuration**: Load `config.json`, or defaults
//! 3. **Session loading**: Load the cached status snapshot, patch selection and
//!    pending follow-up step from earlier invocations
//!
//! A rewrite started by one invocation may be continued by the next, so every
//! command that touches the orchestrator calls [`CommandContext::persist`]
//! afterwards, whether the operation succeeded or not.

use crate::core::{
    commit::Commit,
    config::LoomConfig,
    error::{GitLoomError, Result},
    git::GitRepo,
    orchestrator::FileOpOrchestrator,
    process::{OsFileSystem, SystemProcessRunner},
    rewrite_driver::RewriteDriver,
    state::SessionCache,
};
use std::env;
use std::path::PathBuf;

pub type SystemOrchestrator = FileOpOrchestrator<SystemProcessRunner, OsFileSystem>;

pub struct CommandContext {
    pub git_repo: GitRepo,
    pub config: LoomConfig,
    pub session: SessionCache,
    pub debug: bool,
}

impl CommandContext {
    pub fn initialize(debug: bool) -> Result<Self> {
        let current_dir = env::current_dir()?;
        let git_repo = GitRepo::open(&current_dir)?;
        let config = LoomConfig::load()?;

        log::debug!("Loading session for {}", git_repo.git_dir().display());
        let session = SessionCache::load(&git_repo.git_dir()).map_err(|e| {
            log::warn!("Failed to load session cache: {e}");
            e
        })?;

        Ok(Self {
            git_repo,
            config,
            session,
            debug,
        })
    }

    pub fn workdir(&self) -> Result<PathBuf> {
        Ok(self.git_repo.workdir()?.to_path_buf())
    }

    /// History from HEAD, newest first, bounded by `log_limit`
    pub fn commits(&self) -> Result<Vec<Commit>> {
        self.git_repo.commits(self.config.log_limit)
    }

    pub fn runner(&self) -> Result<SystemProcessRunner> {
        Ok(SystemProcessRunner::new(self.workdir()?))
    }

    /// Orchestrator picking up where the previous invocation left off
    pub fn orchestrator(&self) -> Result<SystemOrchestrator> {
        let workdir = self.workdir()?;
        let editor_path = env::current_exe()?;
        let settings = self.config.rewrite_settings(editor_path, self.debug);

        let mut driver = RewriteDriver::new(
            SystemProcessRunner::new(&workdir),
            OsFileSystem::new(&workdir),
            self.git_repo.git_dir(),
            settings,
        );
        driver.sync_with_repository();
        driver.restore_continuation(self.session.continuation.clone());

        Ok(
            FileOpOrchestrator::new(driver, self.git_repo.commit_signing_enabled())
                .with_selection(self.session.selection.clone()),
        )
    }

    /// Store the orchestrator's pending step and selection for the next invocation
    pub fn persist(&mut self, orchestrator: &SystemOrchestrator) -> Result<()> {
        self.session.continuation = orchestrator.driver().pending_continuation().cloned();
        self.session.selection = orchestrator.selection().clone();
        self.session.save()
    }

    /// Commit at a newest-first `index` of the loaded history
    pub fn commit_at(commits: &[Commit], index: usize) -> Result<&Commit> {
        commits
            .get(index)
            .ok_or_else(|| GitLoomError::commit_index_out_of_range(index, commits.len()))
    }
}
