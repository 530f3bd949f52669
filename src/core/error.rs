//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`GitLoomError`] which covers every failure mode of the
//! status model and the rewrite engine. It uses `thiserror` for ergonomic error
//! definitions and includes constructors for the common failure scenarios.
//!
//! # Public API
//! - [`GitLoomError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, GitLoomError>`
//!
//! # Error Categories
//! - **Malformed input**: Unparseable status or plan lines
//! - **History validation**: Rewrite positions without a valid base
//! - **Unsupported configuration**: Signing enabled, partial selections
//! - **External tool failures**: Non-zero exits with captured stderr
//! - **Cache operations**: Session cache read/write/parse failures

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for git-loom
#[derive(Error, Debug)]
pub enum GitLoomError {
    // Git repository errors
    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("Git repository error: {0}")]
    GitRepo(#[from] git2::Error),

    #[error("Invalid UTF-8 path in repository")]
    InvalidUtf8Path,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Malformed input
    #[error("Malformed status line: '{line}'")]
    MalformedStatusLine { line: String },

    #[error("Malformed rebase plan line: '{line}'")]
    MalformedPlanLine { line: String },

    // History validation
    #[error("Cannot rewrite: {required} commits of history are needed but only {available} are known")]
    InsufficientHistory { required: usize, available: usize },

    #[error("No room to move commit {index} down")]
    InsufficientRoom { index: usize },

    #[error("Nothing to rewrite: the plan has no actions")]
    EmptyPlan,

    #[error("Cannot fold {sha}: no picked commit beneath it in the plan")]
    FoldWithoutTarget { sha: String },

    #[error("Commit index {index} is out of range ({len} commits available)")]
    CommitIndexOutOfRange { index: usize, len: usize },

    // Unsupported configuration
    #[error("This operation is disabled while commit signing (commit.gpgsign) is enabled")]
    UnsupportedWithSigning,

    #[error("Partial selection of '{path}' cannot be moved between commits")]
    UnsupportedPartialSelection { path: String },

    #[error("No files are selected in commit {sha}")]
    EmptySelection { sha: String },

    #[error("Selection belongs to commit {actual}, not {expected}")]
    SelectionTargetMismatch { expected: String, actual: String },

    #[error("Cannot move changes from commit {source_index} to commit {dest_index}: the destination must be newer")]
    InvalidMoveTarget {
        source_index: usize,
        dest_index: usize,
    },

    // External tool failures
    #[error("'{command}' failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Rewrite failed: {stderr}")]
    RewriteFailed { stderr: String },

    #[error("Cannot {operation} while the rewrite is {state}")]
    InvalidRewriteState {
        operation: &'static str,
        state: &'static str,
    },

    // Todo file errors
    #[error("Rebase todo file does not exist: {path}")]
    TodoFileNotFound { path: PathBuf },

    #[error("Todo index {index} is out of range ({count} entries)")]
    TodoIndexOutOfRange { index: usize, count: usize },

    // Cache errors
    #[error("Failed to create cache directory '{path}': {source}")]
    CacheDirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write cache file '{path}': {source}")]
    CacheWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read cache file '{path}': {source}")]
    CacheReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse cache file '{path}': {source}")]
    CacheParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    // JSON serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using GitLoomError
pub type Result<T> = std::result::Result<T, GitLoomError>;

impl GitLoomError {
    /// Create a malformed status line error
    pub fn malformed_status_line(line: impl Into<String>) -> Self {
        Self::MalformedStatusLine { line: line.into() }
    }

    /// Create a malformed plan line error
    pub fn malformed_plan_line(line: impl Into<String>) -> Self {
        Self::MalformedPlanLine { line: line.into() }
    }

    pub fn insufficient_history(required: usize, available: usize) -> Self {
        Self::InsufficientHistory {
            required,
            available,
        }
    }

    pub fn commit_index_out_of_range(index: usize, len: usize) -> Self {
        Self::CommitIndexOutOfRange { index, len }
    }

    pub fn command_failed(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a rewrite failure carrying the external tool's stderr
    pub fn rewrite_failed(stderr: impl Into<String>) -> Self {
        Self::RewriteFailed {
            stderr: stderr.into(),
        }
    }

    /// Re-label a failed external command as a failed rewrite step
    pub fn into_rewrite_failure(self) -> Self {
        match self {
            Self::CommandFailed { stderr, .. } => Self::RewriteFailed { stderr },
            other => other,
        }
    }

    pub fn invalid_rewrite_state(operation: &'static str, state: &'static str) -> Self {
        Self::InvalidRewriteState { operation, state }
    }

    pub fn todo_file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::TodoFileNotFound { path: path.into() }
    }

    /// Create a cache directory creation failed error
    pub fn cache_directory_creation_failed(
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::CacheDirectoryCreationFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a cache write failed error
    pub fn cache_write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CacheWriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a cache read failed error
    pub fn cache_read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CacheReadFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a cache parse failed error
    pub fn cache_parse_failed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::CacheParseFailed {
            path: path.into(),
            source,
        }
    }

    /// Whether the error was raised before any repository mutation took place
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InsufficientHistory { .. }
                | Self::InsufficientRoom { .. }
                | Self::FoldWithoutTarget { .. }
                | Self::CommitIndexOutOfRange { .. }
                | Self::UnsupportedWithSigning
                | Self::UnsupportedPartialSelection { .. }
                | Self::EmptySelection { .. }
                | Self::SelectionTargetMismatch { .. }
                | Self::InvalidMoveTarget { .. }
        )
    }
}
