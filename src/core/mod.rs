//! Core functionality for the git-loom tool.
//!
//! This module provides the repository state model (status parsing and
//! snapshot merging), the rewrite engine (plans, the rebase driver and the
//! compound file operations built on it), and the ambient pieces around them:
//! errors, configuration, the session cache and output formatting.

pub mod change_set;
pub mod client;
pub mod colors;
pub mod command_init;
pub mod commit;
pub mod config;
pub mod dirs;
pub mod error;
pub mod file_change;
pub mod git;
pub mod git_status;
pub mod orchestrator;
pub mod output;
pub mod patch_selection;
pub mod process;
pub mod rewrite_driver;
pub mod rewrite_plan;
pub mod state;
pub mod todo_file;

#[cfg(test)]
pub mod testing;

// === Error handling ===
pub use error::{GitLoomError, Result};

// === Repository state model ===
// Porcelain status codes, parsed file changes and snapshot merging
pub use change_set::merge_status_files;
pub use file_change::{parse_status, FileChange};
pub use git_status::StatusCode;

// === Git operations ===
pub use commit::Commit;
pub use git::GitRepo;

// === Rewrite engine ===
// Plans, the rebase driver with its follow-up steps, and compound operations
pub use orchestrator::FileOpOrchestrator;
pub use patch_selection::{PatchSelectionTracker, SelectionStatus};
pub use process::{FileSystem, OsFileSystem, ProcessRunner, SystemProcessRunner};
pub use rewrite_driver::{Continuation, RebaseMode, RewriteDriver, RewriteSettings, RewriteState};
pub use rewrite_plan::{PlanEntry, RewritePlan, RewriteVerb};

// === Hidden editor mode ===
pub use client::{run_client, ClientMode};

// === State management ===
pub use config::LoomConfig;
pub use state::SessionCache;

// === Command initialization ===
pub use command_init::CommandContext;

// === Output formatting ===
pub use output::{print_error, print_info, print_section_header, print_success, print_warning};
