//! Editing git's own todo file while a rewrite is paused.
//!
//! Commit indices are newest first, like everywhere else in the crate. The todo
//! file is oldest first, so index 0 is the last entry line. Comments and blank
//! lines never count as positions.

use crate::core::{
    error::{GitLoomError, Result},
    process::FileSystem,
    rewrite_plan::{is_todo_entry, RewriteVerb},
};
use std::path::{Path, PathBuf};

pub fn todo_path(git_dir: &Path) -> PathBuf {
    git_dir.join("rebase-merge").join("git-rebase-todo")
}

/// Number of lines in `content` that name a commit
pub fn todo_commit_count(content: &str) -> usize {
    content.lines().filter(|line| is_todo_entry(line)).count()
}

struct TodoFile {
    path: PathBuf,
    lines: Vec<String>,
    trailing_newline: bool,
}

impl TodoFile {
    fn load<F: FileSystem>(fs: &F, git_dir: &Path) -> Result<Self> {
        let path = todo_path(git_dir);
        let bytes = fs
            .read_file(&path)?
            .ok_or_else(|| GitLoomError::todo_file_not_found(&path))?;
        let content = String::from_utf8_lossy(&bytes);
        Ok(Self {
            trailing_newline: content.ends_with('\n'),
            lines: content.lines().map(str::to_string).collect(),
            path,
        })
    }

    /// Line numbers of the entries, oldest first
    fn entry_lines(&self) -> Vec<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| is_todo_entry(line))
            .map(|(n, _)| n)
            .collect()
    }

    /// Line number holding the commit at newest-first `index`
    fn line_for(&self, index: usize) -> Result<(usize, Vec<usize>)> {
        let entries = self.entry_lines();
        let count = entries.len();
        if index >= count {
            return Err(GitLoomError::TodoIndexOutOfRange { index, count });
        }
        let position = count - 1 - index;
        Ok((position, entries))
    }

    fn save<F: FileSystem>(&self, fs: &F) -> Result<()> {
        let mut content = self.lines.join("\n");
        if self.trailing_newline {
            content.push('\n');
        }
        fs.write_file(&self.path, content.as_bytes())
    }
}

/// Replace the verb of the todo entry for commit `index`.
pub fn edit_todo_action<F: FileSystem>(
    fs: &F,
    git_dir: &Path,
    index: usize,
    verb: RewriteVerb,
) -> Result<()> {
    let mut todo = TodoFile::load(fs, git_dir)?;
    let (position, entries) = todo.line_for(index)?;
    let line_no = entries[position];

    let line = &todo.lines[line_no];
    let rest = line
        .trim_start()
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest)
        .unwrap_or("");
    let updated = format!("{verb} {rest}");
    log::debug!("Todo line {line_no}: '{line}' becomes '{updated}'");
    todo.lines[line_no] = updated;
    todo.save(fs)
}

/// Swap the todo entry for commit `index` with the older entry above it.
pub fn move_todo_down<F: FileSystem>(fs: &F, git_dir: &Path, index: usize) -> Result<()> {
    let mut todo = TodoFile::load(fs, git_dir)?;
    let (position, entries) = todo.line_for(index)?;
    if position == 0 {
        return Err(GitLoomError::InsufficientRoom { index });
    }

    todo.lines.swap(entries[position], entries[position - 1]);
    todo.save(fs)
}
