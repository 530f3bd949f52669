//! Unified color system for status codes, commits and rewrite verbs.
//!
//! # Public API
//! - [`get_status_color_style`]: Color function for one porcelain status character
//! - [`get_aligned_status`]: Both columns of a status code, each in its own color
//! - [`get_colored_path`]: Path colored after the file's dominant state
//! - [`format_file_status`]: Complete numbered file line
//! - [`format_commit_line`]: Complete numbered commit line
//!
//! # Color Scheme
//! - **Modified**: Yellow
//! - **Added**: Green
//! - **Deleted**: Red
//! - **Renamed/Copied**: Blue
//! - **Untracked**: Cyan
//! - **Unmerged**: Red bold for conflict resolution needed

use crate::core::{
    commit::Commit, file_change::FileChange, git_status::StatusCode, rewrite_plan::RewriteVerb,
};
use colored::*;

/// Color function for a single status character
pub fn get_status_color_style(status: char) -> Box<dyn Fn(&str) -> ColoredString> {
    match status {
        'M' => Box::new(|text: &str| text.yellow()),
        '?' => Box::new(|text: &str| text.cyan()),
        'D' => Box::new(|text: &str| text.red()),
        'A' => Box::new(|text: &str| text.green()),
        'R' | 'C' => Box::new(|text: &str| text.blue()),
        'T' => Box::new(|text: &str| text.magenta()),
        'U' => Box::new(|text: &str| text.red().bold()),
        _ => Box::new(|text: &str| text.normal()),
    }
}

/// The two-column status code with each column colored on its own
pub fn get_aligned_status(code: StatusCode) -> String {
    if code.has_merge_conflicts() {
        return code.as_string().red().bold().to_string();
    }
    let staged = get_status_color_style(code.staged)(&code.staged.to_string());
    let unstaged = get_status_color_style(code.unstaged)(&code.unstaged.to_string());
    format!("{staged}{unstaged}")
}

/// Path in the color of the file's most pressing state
pub fn get_colored_path(file: &FileChange) -> ColoredString {
    let code = file.short_status;
    let dominant = if code.has_merge_conflicts() {
        'U'
    } else if !file.tracked {
        '?'
    } else if code.unstaged != ' ' {
        code.unstaged
    } else {
        code.staged
    };
    get_status_color_style(dominant)(&file.name)
}

pub fn format_file_status(index: usize, file: &FileChange) -> String {
    let index_colored = format!("[{index}]").cyan().bold();
    format!(
        "{index_colored} {} {}",
        get_aligned_status(file.short_status),
        get_colored_path(file)
    )
}

pub fn get_verb_style(verb: RewriteVerb) -> ColoredString {
    let text = verb.as_str();
    match verb {
        RewriteVerb::Pick => text.normal(),
        RewriteVerb::Reword => text.blue(),
        RewriteVerb::Edit => text.yellow(),
        RewriteVerb::Squash | RewriteVerb::Fixup => text.magenta(),
        RewriteVerb::Drop => text.red(),
    }
}

pub fn format_commit_line(index: usize, commit: &Commit) -> String {
    let index_colored = format!("[{index}]").cyan().bold();
    let marker = if commit.is_merge {
        " (merge)".bright_black().to_string()
    } else {
        String::new()
    };
    format!(
        "{index_colored} {} {}{marker}",
        commit.short_sha().yellow(),
        commit.name.white()
    )
}
