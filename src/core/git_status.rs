//! Type-safe porcelain status codes.
//!
//! This module defines [`StatusCode`], the two-column `XY` code printed by
//! `git status --porcelain`. Every flag carried by a [`FileChange`] is derived
//! from it, so the classification rules live here in one place instead of being
//! string-matched throughout the codebase.
//!
//! # Public API
//! - [`StatusCode`]: The staged (`X`) and unstaged (`Y`) status characters
//!
//! [`FileChange`]: crate::core::file_change::FileChange

use serde::{Deserialize, Serialize};
use std::fmt;

/// Porcelain `XY` status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusCode {
    /// Index column (`X`)
    pub staged: char,
    /// Work tree column (`Y`)
    pub unstaged: char,
}

impl StatusCode {
    /// Codes reported for paths that are not part of any commit yet
    const UNTRACKED: [&'static str; 3] = ["??", "A ", "AM"];
    /// Codes for which a merge conflict is pending
    const CONFLICTED: [&'static str; 3] = ["UU", "AA", "DU"];
    /// Conflicts whose markers can be resolved inline in the file
    const INLINE_CONFLICTED: [&'static str; 2] = ["UU", "AA"];

    pub fn new(staged: char, unstaged: char) -> Self {
        Self { staged, unstaged }
    }

    /// Build a status code from the first two characters of a porcelain line
    pub fn from_prefix(line: &str) -> Option<Self> {
        let mut chars = line.chars();
        let staged = chars.next()?;
        let unstaged = chars.next()?;
        Some(Self { staged, unstaged })
    }

    pub fn as_string(&self) -> String {
        let mut code = String::with_capacity(2);
        code.push(self.staged);
        code.push(self.unstaged);
        code
    }

    fn is_one_of(&self, codes: &[&str]) -> bool {
        let code = self.as_string();
        codes.iter().any(|c| *c == code)
    }

    pub fn is_untracked(&self) -> bool {
        self.is_one_of(&Self::UNTRACKED)
    }

    pub fn has_staged_changes(&self) -> bool {
        !matches!(self.staged, ' ' | 'U' | '?')
    }

    pub fn has_unstaged_changes(&self) -> bool {
        self.unstaged != ' '
    }

    pub fn is_deleted(&self) -> bool {
        self.staged == 'D' || self.unstaged == 'D'
    }

    pub fn has_merge_conflicts(&self) -> bool {
        self.is_one_of(&Self::CONFLICTED)
    }

    pub fn has_inline_merge_conflicts(&self) -> bool {
        self.is_one_of(&Self::INLINE_CONFLICTED)
    }

    /// Get human-readable description for status
    pub fn description(&self) -> &'static str {
        if self.has_merge_conflicts() {
            return match (self.staged, self.unstaged) {
                ('A', 'A') => "both added",
                ('D', 'U') => "deleted by us",
                _ => "both modified",
            };
        }
        if self.staged == '?' {
            return "untracked";
        }
        let column = if self.has_staged_changes() {
            self.staged
        } else {
            self.unstaged
        };
        match column {
            'M' => "modified",
            'A' => "new",
            'D' => "deleted",
            'R' => "renamed",
            'C' => "copied",
            'T' => "type changed",
            _ => "changed",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.staged, self.unstaged)
    }
}
