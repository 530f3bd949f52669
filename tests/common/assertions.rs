//! Common assertion helpers for test output validation
//!
//! Provides predicates and assertion utilities for validating git-loom
//! command output, error messages, and expected behaviors.

#![allow(dead_code)]

use predicates::prelude::*;

/// Creates a predicate that checks for git repository error messages
pub fn not_in_git_repo() -> impl Predicate<str> {
    predicates::str::contains("Not in a git repository")
}

pub fn has_branch_info() -> impl Predicate<str> {
    predicates::str::contains("On branch:")
}

pub fn has_head_info() -> impl Predicate<str> {
    predicates::str::contains("HEAD:")
}

/// Creates a predicate that checks for numbered indices
pub fn has_index(index: u32) -> impl Predicate<str> {
    predicates::str::contains(format!("[{index}]"))
}

pub fn rewrite_completed() -> impl Predicate<str> {
    predicates::str::contains("Rewrite completed")
}

pub fn rewrite_paused() -> impl Predicate<str> {
    predicates::str::contains("Rewrite paused")
}

pub fn invalid_rewrite_state() -> impl Predicate<str> {
    predicates::str::contains("while the rewrite is")
}

/// The numbered line of `stdout` that mentions `path`, if any
pub fn line_for<'a>(stdout: &'a str, path: &str) -> Option<&'a str> {
    stdout
        .lines()
        .find(|line| line.starts_with('[') && line.contains(path))
}
