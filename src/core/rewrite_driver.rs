//! Driving `git rebase --interactive` as a resumable, partly external workflow.
//!
//! The driver owns the plan of the rewrite in flight and at most one pending
//! [`Continuation`]. Git itself is a black box that may stop for conflicts; from
//! here a step simply succeeds or fails, and conflict resolution happens out of
//! band through later `continue`, `skip` or `abort` calls.
//!
//! ```text
//! Idle -> PlanPrepared -> Running -> Completed
//!                            |  ^
//!                            |  +-- continue / skip (still paused)
//!                            +----> Aborted
//! ```

use crate::core::{
    client::{ClientMode, CLIENT_COMMAND_ENV, REBASE_TODO_ENV},
    error::{GitLoomError, Result},
    process::{FileSystem, ProcessRunner},
    rewrite_plan::RewritePlan,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteState {
    Idle,
    PlanPrepared,
    Running,
    Completed,
    Aborted,
}

impl RewriteState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RewriteState::Idle => "idle",
            RewriteState::PlanPrepared => "being prepared",
            RewriteState::Running => "running",
            RewriteState::Completed => "completed",
            RewriteState::Aborted => "aborted",
        }
    }

    pub fn can_start(&self) -> bool {
        matches!(
            self,
            RewriteState::Idle | RewriteState::Completed | RewriteState::Aborted
        )
    }
}

/// Which kind of rebase git has on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebaseMode {
    None,
    /// `git rebase` without `--interactive` (`rebase-apply`)
    Normal,
    /// `rebase-merge`
    Interactive,
}

/// Follow-up step of a compound operation, run after the next successful continue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Continuation {
    /// Apply `patch` to the index of the commit the rewrite stopped at,
    /// amend that commit and continue the rewrite.
    ApplyPatchAndAmend {
        source_sha: String,
        patch: String,
        /// git is already stopped at the destination, e.g. after the patch failed to apply
        #[serde(default)]
        at_destination: bool,
    },
}

/// How the driver invokes git and itself
#[derive(Debug, Clone)]
pub struct RewriteSettings {
    pub git_binary: String,
    /// This executable, re-invoked by git as its editor
    pub editor_path: PathBuf,
    pub autostash: bool,
    pub keep_empty: bool,
    pub rebase_merges: bool,
    pub debug: bool,
}

impl Default for RewriteSettings {
    fn default() -> Self {
        Self {
            git_binary: "git".to_string(),
            editor_path: PathBuf::from("git-loom"),
            autostash: true,
            keep_empty: true,
            rebase_merges: true,
            debug: false,
        }
    }
}

pub struct RewriteDriver<R: ProcessRunner, F: FileSystem> {
    runner: R,
    fs: F,
    git_dir: PathBuf,
    settings: RewriteSettings,
    state: RewriteState,
    plan: Option<RewritePlan>,
    continuation: Option<Continuation>,
}

impl<R: ProcessRunner, F: FileSystem> RewriteDriver<R, F> {
    pub fn new(runner: R, fs: F, git_dir: impl Into<PathBuf>, settings: RewriteSettings) -> Self {
        Self {
            runner,
            fs,
            git_dir: git_dir.into(),
            settings,
            state: RewriteState::Idle,
            plan: None,
            continuation: None,
        }
    }

    pub fn state(&self) -> RewriteState {
        self.state
    }

    pub fn plan(&self) -> Option<&RewritePlan> {
        self.plan.as_ref()
    }

    pub fn pending_continuation(&self) -> Option<&Continuation> {
        self.continuation.as_ref()
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    pub fn settings(&self) -> &RewriteSettings {
        &self.settings
    }

    /// argv for `git <args>`
    pub fn git_argv(&self, args: &[&str]) -> Vec<String> {
        std::iter::once(self.settings.git_binary.as_str())
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect()
    }

    /// Run a plain git command and capture its stdout
    pub fn run_git(&self, args: &[&str]) -> Result<String> {
        self.runner.run(&self.git_argv(args))
    }

    pub fn rebase_mode(&self) -> RebaseMode {
        if self.fs.exists(&self.git_dir.join("rebase-apply")) {
            RebaseMode::Normal
        } else if self.fs.exists(&self.git_dir.join("rebase-merge")) {
            RebaseMode::Interactive
        } else {
            RebaseMode::None
        }
    }

    pub fn rebase_in_progress(&self) -> bool {
        self.rebase_mode() != RebaseMode::None
    }

    /// Whether a new rewrite may start from the current state
    pub fn can_start(&self) -> bool {
        self.state.can_start()
    }

    /// Adopt a rewrite some earlier process left paused on disk.
    pub fn sync_with_repository(&mut self) {
        if !self.rebase_in_progress() {
            self.drop_stale_continuation();
        } else if self.state.can_start() {
            log::debug!("Found a rebase in progress, driver is now running");
            self.state = RewriteState::Running;
        }
    }

    /// Hand the driver a continuation persisted by an earlier process.
    ///
    /// It only belongs to a rebase still paused on disk; otherwise the rewrite
    /// it was queued for ended elsewhere and it is dropped.
    pub fn restore_continuation(&mut self, continuation: Option<Continuation>) {
        self.continuation = continuation;
        if !self.rebase_in_progress() {
            self.drop_stale_continuation();
        }
    }

    fn drop_stale_continuation(&mut self) {
        if self.continuation.take().is_some() {
            log::warn!("No rebase in progress; dropping the follow-up step of an earlier rewrite");
        }
    }

    /// Queue the follow-up step for the next successful continue.
    pub fn queue_continuation(&mut self, continuation: Continuation) -> Result<()> {
        if self.state != RewriteState::Running {
            return Err(GitLoomError::invalid_rewrite_state(
                "queue a follow-up step",
                self.state.as_str(),
            ));
        }
        if self.continuation.is_some() {
            log::warn!("Replacing a pending follow-up step");
        }
        self.continuation = Some(continuation);
        Ok(())
    }

    /// Command line and environment that start the rebase for `plan`
    pub fn rebase_command(&self, plan: &RewritePlan, override_editor: bool) -> (Vec<String>, Vec<(String, String)>) {
        let mut args = vec!["rebase", "--interactive"];
        if self.settings.autostash {
            args.push("--autostash");
        }
        if self.settings.keep_empty {
            args.push("--keep-empty");
        }
        if self.settings.rebase_merges {
            args.push("--rebase-merges");
        }
        args.push(&plan.base_sha);

        let editor = shell_quote(&self.settings.editor_path.to_string_lossy());
        let sequence_editor = if plan.is_empty() {
            "true".to_string()
        } else {
            editor.clone()
        };
        let mode = ClientMode::InteractiveRebase {
            todo: plan.to_todo(),
        };

        let mut env = vec![
            (CLIENT_COMMAND_ENV.to_string(), mode.env_value().to_string()),
            (REBASE_TODO_ENV.to_string(), plan.to_todo()),
            (
                "DEBUG".to_string(),
                if self.settings.debug { "TRUE" } else { "FALSE" }.to_string(),
            ),
            ("LANG".to_string(), "en_US.UTF-8".to_string()),
            ("LC_ALL".to_string(), "en_US.UTF-8".to_string()),
            ("GIT_SEQUENCE_EDITOR".to_string(), sequence_editor),
        ];
        if override_editor {
            env.push(("EDITOR".to_string(), editor));
        }

        (self.git_argv(&args), env)
    }

    /// Environment that makes git accept its own proposals without prompting
    fn skip_editor_env(&self) -> Vec<(String, String)> {
        let editor = shell_quote(&self.settings.editor_path.to_string_lossy());
        vec![
            (
                CLIENT_COMMAND_ENV.to_string(),
                ClientMode::ExitImmediately.env_value().to_string(),
            ),
            ("GIT_SEQUENCE_EDITOR".to_string(), editor.clone()),
            ("EDITOR".to_string(), editor),
        ]
    }

    /// Launch the rewrite described by `plan`.
    ///
    /// When `override_editor` is set, commit messages are accepted as proposed
    /// instead of opening the user's editor.
    pub fn start(&mut self, plan: RewritePlan, override_editor: bool) -> Result<RewriteState> {
        if !self.state.can_start() {
            return Err(GitLoomError::invalid_rewrite_state(
                "start a rewrite",
                self.state.as_str(),
            ));
        }

        log::info!(
            "Rewriting {} commit(s) onto {}",
            plan.entries.len(),
            plan.base_sha
        );
        let (argv, env) = self.rebase_command(&plan, override_editor);
        self.launch(plan, &argv, &env)
    }

    /// Start the autosquash rebase that folds `fixup!` commits into `sha`.
    pub fn start_autosquash(&mut self, sha: &str) -> Result<RewriteState> {
        if !self.state.can_start() {
            return Err(GitLoomError::invalid_rewrite_state(
                "start a rewrite",
                self.state.as_str(),
            ));
        }

        let base = format!("{sha}^");
        let mut args = vec!["rebase", "--interactive"];
        if self.settings.autostash {
            args.push("--autostash");
        }
        args.extend(["--autosquash", base.as_str()]);
        let argv = self.git_argv(&args);

        let env = self.skip_editor_env();
        self.launch(RewritePlan::onto(base), &argv, &env)
    }

    fn launch(&mut self, plan: RewritePlan, argv: &[String], env: &[(String, String)]) -> Result<RewriteState> {
        self.drop_stale_continuation();
        self.plan = Some(plan);
        self.state = RewriteState::PlanPrepared;

        match self.runner.run_interactive(argv, env) {
            Ok(()) => {
                self.settle();
                Ok(self.state)
            }
            Err(e) => {
                if self.rebase_in_progress() {
                    // stopped on a conflict; resolve, then continue or abort
                    self.state = RewriteState::Running;
                } else {
                    self.state = RewriteState::Idle;
                    self.plan = None;
                }
                Err(e.into_rewrite_failure())
            }
        }
    }

    /// Signal `--continue`; runs the pending continuation once git accepted it.
    ///
    /// A continuation that already failed at the current stop is retried there
    /// without moving git on.
    pub fn continue_rewrite(&mut self) -> Result<()> {
        if self.continuation_at_destination() {
            self.ensure_running("continue")?;
            log::info!("Retrying the follow-up step at the current stop");
        } else {
            self.signal("continue")?;
        }

        if let Some(continuation) = self.continuation.take() {
            log::info!("Running queued follow-up step");
            self.run_continuation(continuation)?;
        }
        Ok(())
    }

    /// Signal `--skip` to drop the commit git stopped at.
    pub fn skip(&mut self) -> Result<()> {
        let skipped_destination = self.continuation_at_destination();
        self.signal("skip")?;
        if skipped_destination && self.continuation.take().is_some() {
            log::warn!("Skipped the commit the follow-up step was meant for; dropping it");
        } else if self.state == RewriteState::Completed && self.continuation.take().is_some() {
            log::warn!("Rewrite finished while skipping; dropping the queued follow-up step");
        }
        Ok(())
    }

    /// Signal `--abort`. A pending continuation is discarded, never run.
    pub fn abort(&mut self) -> Result<()> {
        self.ensure_running("abort")?;
        if self.continuation.take().is_some() {
            log::info!("Discarding queued follow-up step");
        }

        let argv = self.git_argv(&["rebase", "--abort"]);
        self.runner
            .run_interactive(&argv, &self.skip_editor_env())
            .map_err(GitLoomError::into_rewrite_failure)?;

        self.state = RewriteState::Aborted;
        self.plan = None;
        Ok(())
    }

    fn continuation_at_destination(&self) -> bool {
        matches!(
            self.continuation,
            Some(Continuation::ApplyPatchAndAmend {
                at_destination: true,
                ..
            })
        )
    }

    fn ensure_running(&self, operation: &'static str) -> Result<()> {
        if self.state == RewriteState::Running {
            Ok(())
        } else {
            Err(GitLoomError::invalid_rewrite_state(
                operation,
                self.state.as_str(),
            ))
        }
    }

    fn signal(&mut self, command: &'static str) -> Result<()> {
        self.ensure_running(command)?;
        let flag = format!("--{command}");
        let argv = self.git_argv(&["rebase", &flag]);

        // on failure git is still paused; state stays Running for a retry or abort
        self.runner
            .run_interactive(&argv, &self.skip_editor_env())
            .map_err(GitLoomError::into_rewrite_failure)?;
        self.settle();
        Ok(())
    }

    /// Derive the state from what git left on disk after a step
    fn settle(&mut self) {
        if self.rebase_in_progress() {
            self.state = RewriteState::Running;
        } else {
            log::info!("Rewrite completed");
            self.state = RewriteState::Completed;
            self.plan = None;
        }
    }

    fn run_continuation(&mut self, continuation: Continuation) -> Result<()> {
        match continuation {
            Continuation::ApplyPatchAndAmend {
                source_sha, patch, ..
            } => {
                let short = source_sha.get(..7).unwrap_or(&source_sha);
                let patch_path = self.git_dir.join(format!("git-loom-{short}.patch"));
                if let Err(e) = self.apply_patch(&patch_path, &patch) {
                    // nothing was amended yet, so the step can be retried at this stop
                    log::warn!("Patch from {short} did not apply; the follow-up step stays queued");
                    self.continuation = Some(Continuation::ApplyPatchAndAmend {
                        source_sha,
                        patch,
                        at_destination: true,
                    });
                    return Err(e);
                }

                self.run_git(&["commit", "--amend", "--no-edit", "--allow-empty"])?;
                self.settle();
                if self.state == RewriteState::Running {
                    self.signal("continue")?;
                }
                Ok(())
            }
        }
    }

    fn apply_patch(&self, patch_path: &Path, patch: &str) -> Result<()> {
        self.fs.write_file(patch_path, patch.as_bytes())?;

        let patch_arg = patch_path.to_string_lossy().into_owned();
        let applied = self.run_git(&["apply", "--index", &patch_arg]);
        let cleanup = self.fs.remove(patch_path);

        match applied {
            Ok(_) => cleanup,
            Err(e) => {
                if let Err(cleanup_err) = cleanup {
                    log::warn!("Failed to remove {}: {cleanup_err}", patch_path.display());
                }
                Err(e)
            }
        }
    }
}

/// Quote a path for the shell git runs editor commands through
fn shell_quote(value: &str) -> String {
    if value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "/._-+:=@".contains(c))
    {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}
