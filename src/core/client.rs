//! Hidden editor mode.
//!
//! During a rewrite git launches this same binary as its sequence editor and,
//! for automated steps, as its commit message editor. The parent process
//! leaves instructions in the environment; the child reads them, writes the
//! precomputed todo where git asked for it and exits. No state flows back to
//! the parent except through the files git reads.

use crate::core::{
    error::{GitLoomError, Result},
    process::FileSystem,
    rewrite_plan::RewritePlan,
};
use std::path::Path;

/// Marks a process as launched by git rather than by the user
pub const CLIENT_COMMAND_ENV: &str = "GIT_LOOM_CLIENT_COMMAND";
/// The todo the sequence editor should write
pub const REBASE_TODO_ENV: &str = "GIT_LOOM_REBASE_TODO";

const INTERACTIVE_REBASE: &str = "INTERACTIVE_REBASE";
const EXIT_IMMEDIATELY: &str = "EXIT_IMMEDIATELY";
const TODO_FILE_NAME: &str = "git-rebase-todo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMode {
    /// Replace git's todo with the given plan text
    InteractiveRebase { todo: String },
    /// Accept whatever git proposed, e.g. a commit message
    ExitImmediately,
}

impl ClientMode {
    pub fn env_value(&self) -> &'static str {
        match self {
            ClientMode::InteractiveRebase { .. } => INTERACTIVE_REBASE,
            ClientMode::ExitImmediately => EXIT_IMMEDIATELY,
        }
    }

    /// Resolve the mode from an environment lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        match lookup(CLIENT_COMMAND_ENV)?.as_str() {
            INTERACTIVE_REBASE => Some(ClientMode::InteractiveRebase {
                todo: lookup(REBASE_TODO_ENV).unwrap_or_default(),
            }),
            EXIT_IMMEDIATELY => Some(ClientMode::ExitImmediately),
            other => {
                log::warn!("Unknown {CLIENT_COMMAND_ENV} value '{other}', running normally");
                None
            }
        }
    }

    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

/// Act as git's editor for `target` (the file path git passed as argv[1]).
pub fn run_client<F: FileSystem>(mode: &ClientMode, target: Option<&Path>, fs: &F) -> Result<()> {
    log::debug!("Invoked as editor: mode={}, target={target:?}", mode.env_value());

    let todo = match mode {
        ClientMode::ExitImmediately => return Ok(()),
        ClientMode::InteractiveRebase { todo } => todo,
    };

    let target = match target {
        Some(path) if path.ends_with(TODO_FILE_NAME) => path,
        // squash and reword steps hand us COMMIT_EDITMSG; keep git's message
        Some(path) => {
            log::debug!("Leaving {} untouched", path.display());
            return Ok(());
        }
        None => return Err(GitLoomError::todo_file_not_found(TODO_FILE_NAME)),
    };

    // a corrupt plan must stop git before it rewrites anything
    let entries = RewritePlan::parse_todo(todo)?;
    log::debug!("Writing {} todo entries to {}", entries.len(), target.display());
    fs.write_file(target, todo.as_bytes())
}
