//! Test data generation utilities and predefined scenarios
//!
//! Provides functions for creating repositories with specific histories
//! to test the rewrite commands consistently.

#![allow(dead_code)]

use super::repository::*;
use git_loom::core::error::Result;

/// Scenario: one file per commit
///
/// History (newest first): "add f3" [0], "add f2" [1], "add f1" [2], "Initial commit" [3]
pub fn create_linear_history() -> Result<TestRepo> {
    let repo = setup_test_repo_with_initial_commit()?;
    for i in 1..=3 {
        commit_file(
            &repo.path,
            &format!("f{i}.txt"),
            &format!("content {i}\n"),
            &format!("add f{i}"),
        )?;
    }
    Ok(repo)
}

/// Scenario: a file that exists before the commit which edits it
///
/// History (newest first): "add other" [0], "edit shared" [1], "add shared" [2], "Initial commit" [3]
pub fn create_edited_file_history() -> Result<TestRepo> {
    let repo = setup_test_repo_with_initial_commit()?;
    commit_file(&repo.path, "shared.txt", "one\n", "add shared")?;
    commit_file(&repo.path, "shared.txt", "two\n", "edit shared")?;
    commit_file(&repo.path, "other.txt", "other\n", "add other")?;
    Ok(repo)
}

/// Scenario: a commit with two files followed by an unrelated one
///
/// History (newest first): "add c" [0], "add a and b" [1], "Initial commit" [2]
pub fn create_two_file_commit_history() -> Result<TestRepo> {
    let repo = setup_test_repo_with_initial_commit()?;
    create_file(&repo.path, "a.txt", "a\n")?;
    create_file(&repo.path, "b.txt", "b\n")?;
    git_add(&repo.path, ".")?;
    git_commit(&repo.path, "add a and b")?;
    commit_file(&repo.path, "c.txt", "c\n", "add c")?;
    Ok(repo)
}
