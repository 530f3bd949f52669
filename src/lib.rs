//! Git Loom - history rewriting for git from the terminal.
//!
//! This library provides the core of git-loom: a typed model of the working
//! tree status and an engine that synthesizes `git rebase --interactive` plans,
//! drives git through them non-interactively and resumes queued follow-up steps
//! once a paused rewrite continues.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module, which provides:
//! - Status parsing and snapshot merging
//! - Rewrite plans, the rebase driver and compound file operations
//! - Patch selection tracking
//! - Error handling and result types

pub mod commands;
pub mod core;

// Re-export the core public API for external users
pub use core::{
    merge_status_files,
    parse_status,
    // Rewrite engine
    Commit,
    Continuation,
    FileChange,
    FileOpOrchestrator,
    // Error handling
    GitLoomError,
    // Git operations
    GitRepo,
    PatchSelectionTracker,
    Result,
    RewriteDriver,
    RewritePlan,
    RewriteState,
    RewriteVerb,
    SelectionStatus,
    StatusCode,
};
