//! Compound history operations built from several synchronous git calls.
//!
//! Every operation validates its inputs before the first call with side
//! effects. Once a rewrite is running, any failure stops the remaining steps
//! and is returned as is; the repository is left paused for an explicit
//! continue or abort.

use crate::core::{
    commit::Commit,
    error::{GitLoomError, Result},
    patch_selection::PatchSelectionTracker,
    process::{FileSystem, ProcessRunner},
    rewrite_driver::{Continuation, RewriteDriver, RewriteState},
    rewrite_plan::{RewritePlan, RewriteVerb},
};
use std::path::Path;

pub struct FileOpOrchestrator<R: ProcessRunner, F: FileSystem> {
    driver: RewriteDriver<R, F>,
    signing_enabled: bool,
    selection: PatchSelectionTracker,
}

impl<R: ProcessRunner, F: FileSystem> FileOpOrchestrator<R, F> {
    pub fn new(driver: RewriteDriver<R, F>, signing_enabled: bool) -> Self {
        Self {
            driver,
            signing_enabled,
            selection: PatchSelectionTracker::new(),
        }
    }

    pub fn with_selection(mut self, selection: PatchSelectionTracker) -> Self {
        self.selection = selection;
        self
    }

    pub fn driver(&self) -> &RewriteDriver<R, F> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut RewriteDriver<R, F> {
        &mut self.driver
    }

    pub fn selection(&self) -> &PatchSelectionTracker {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut PatchSelectionTracker {
        &mut self.selection
    }

    fn ensure_unsigned(&self) -> Result<()> {
        if self.signing_enabled {
            return Err(GitLoomError::UnsupportedWithSigning);
        }
        Ok(())
    }

    fn commit_at<'a>(commits: &'a [Commit], index: usize) -> Result<&'a Commit> {
        commits
            .get(index)
            .ok_or_else(|| GitLoomError::commit_index_out_of_range(index, commits.len()))
    }

    /// Start `plan` and require git to stop at an `edit` entry
    fn start_paused(&mut self, plan: RewritePlan) -> Result<()> {
        self.driver.start(plan, true)?;
        match self.driver.state() {
            RewriteState::Running => Ok(()),
            other => Err(GitLoomError::invalid_rewrite_state(
                "amend the edited commit",
                other.as_str(),
            )),
        }
    }

    /// Make `path` in the paused commit look like it does in its parent
    fn restore_from_parent(&self, path: &str) -> Result<()> {
        let parent_blob = format!("HEAD^:{path}");
        match self.driver.run_git(&["cat-file", "-e", &parent_blob]) {
            Ok(_) => {
                log::debug!("{path} exists in the parent commit, checking it out");
                self.driver.run_git(&["checkout", "HEAD^", "--", path])?;
            }
            Err(GitLoomError::CommandFailed { .. }) => {
                log::debug!("{path} was introduced by this commit, removing it");
                self.driver.fs().remove(Path::new(path))?;
                self.driver.run_git(&["add", "--", path])?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    fn amend_head(&self) -> Result<()> {
        self.driver
            .run_git(&["commit", "--amend", "--no-edit", "--allow-empty"])?;
        Ok(())
    }

    /// Remove one file's change from an older commit, replaying everything after it.
    pub fn discard_old_file_changes(
        &mut self,
        commits: &[Commit],
        index: usize,
        path: &str,
    ) -> Result<()> {
        self.ensure_unsigned()?;
        let commit = Self::commit_at(commits, index)?;
        log::info!("Discarding changes to {path} from {}", commit.short_sha());

        let plan = RewritePlan::build(commits, index, RewriteVerb::Edit)?;
        self.start_paused(plan)?;

        self.restore_from_parent(path)?;
        self.amend_head()?;
        self.driver.continue_rewrite()
    }

    /// Apply `verb` to the commit at `index`. Only reword opens the user's editor.
    pub fn interactive_rebase(
        &mut self,
        commits: &[Commit],
        index: usize,
        verb: RewriteVerb,
    ) -> Result<RewriteState> {
        self.ensure_unsigned()?;
        Self::commit_at(commits, index)?;

        let plan = RewritePlan::build(commits, index, verb)?;
        self.driver.start(plan, verb != RewriteVerb::Reword)
    }

    pub fn reword_commit(&mut self, commits: &[Commit], index: usize) -> Result<RewriteState> {
        self.interactive_rebase(commits, index, RewriteVerb::Reword)
    }

    /// Swap the commit at `index` with the older one beneath it.
    pub fn move_commit_down(&mut self, commits: &[Commit], index: usize) -> Result<RewriteState> {
        self.ensure_unsigned()?;
        let plan = RewritePlan::move_down(commits, index)?;
        self.driver.start(plan, true)
    }

    /// Swap the commit at `index` with the newer one above it.
    pub fn move_commit_up(&mut self, commits: &[Commit], index: usize) -> Result<RewriteState> {
        if index == 0 {
            return Err(GitLoomError::InsufficientRoom { index });
        }
        self.move_commit_down(commits, index - 1)
    }

    /// Fold the staged changes into commit `sha`.
    pub fn amend_to(&mut self, sha: &str) -> Result<RewriteState> {
        self.ensure_unsigned()?;
        // the fixup commit must not outlive a rewrite that cannot start
        if !self.driver.can_start() {
            return Err(GitLoomError::invalid_rewrite_state(
                "start a rewrite",
                self.driver.state().as_str(),
            ));
        }
        let fixup = format!("--fixup={sha}");
        self.driver.run_git(&["commit", &fixup])?;
        self.driver.start_autosquash(sha)
    }

    /// Replay `commits` (newest first) on top of HEAD.
    pub fn cherry_pick_commits(&mut self, commits: &[Commit]) -> Result<RewriteState> {
        if commits.is_empty() {
            return Err(GitLoomError::EmptyPlan);
        }
        self.driver.start(RewritePlan::cherry_pick(commits), true)
    }

    /// Rebase the current branch onto `upstream` without editing the todo.
    pub fn rebase_branch(&mut self, upstream: &str) -> Result<RewriteState> {
        self.driver.start(RewritePlan::onto(upstream), false)
    }

    /// Strip every selected file from the commit at `index`.
    pub fn remove_selected_files_from_commit(
        &mut self,
        commits: &[Commit],
        index: usize,
    ) -> Result<()> {
        self.ensure_unsigned()?;
        let commit = Self::commit_at(commits, index)?;
        let paths = self.selection.whole_file_paths(&commit.sha)?;

        let plan = RewritePlan::build(commits, index, RewriteVerb::Edit)?;
        self.start_paused(plan)?;

        for path in &paths {
            self.restore_from_parent(path)?;
        }
        self.amend_head()?;
        self.selection.clear();
        self.driver.continue_rewrite()
    }

    /// Move the selected files' changes from commit `source` to the newer commit `dest`.
    pub fn move_selected_files_to_commit(
        &mut self,
        commits: &[Commit],
        source: usize,
        dest: usize,
    ) -> Result<()> {
        self.ensure_unsigned()?;
        let source_commit = Self::commit_at(commits, source)?;
        Self::commit_at(commits, dest)?;
        if dest >= source {
            return Err(GitLoomError::InvalidMoveTarget {
                source_index: source,
                dest_index: dest,
            });
        }
        let paths = self.selection.whole_file_paths(&source_commit.sha)?;
        let plan = RewritePlan::build_with_actions(
            commits,
            &[(source, RewriteVerb::Edit), (dest, RewriteVerb::Edit)],
        )?;

        let mut show = vec!["show", "--format=", "--binary", source_commit.sha.as_str(), "--"];
        show.extend(paths.iter().map(String::as_str));
        let patch = self.driver.run_git(&show)?;
        let source_sha = source_commit.sha.clone();

        self.start_paused(plan)?;
        for path in &paths {
            self.restore_from_parent(path)?;
        }
        self.amend_head()?;
        self.selection.clear();

        self.driver.queue_continuation(Continuation::ApplyPatchAndAmend {
            source_sha,
            patch,
            at_destination: false,
        })?;
        self.driver.continue_rewrite()
    }
}
