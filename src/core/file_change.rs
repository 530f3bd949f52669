//! Working tree status parsing.
//!
//! Turns the text printed by `git status --untracked-files=all --porcelain` into an
//! ordered list of [`FileChange`] records. Parsing is pure: no repository access,
//! no side effects. A line that cannot be parsed is reported as
//! [`GitLoomError::MalformedStatusLine`] by [`FileChange::from_status_line`] and
//! skipped by [`parse_status`], so a refresh never aborts on one odd line.

use crate::core::{
    error::{GitLoomError, Result},
    git_status::StatusCode,
};
use serde::{Deserialize, Serialize};

/// Separator git uses for renamed and copied entries
pub const RENAME_SEPARATOR: &str = " -> ";

/// One changed path in the working tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// Path, or `"old -> new"` for renames
    pub name: String,
    pub short_status: StatusCode,
    pub tracked: bool,
    pub has_staged_changes: bool,
    pub has_unstaged_changes: bool,
    pub deleted: bool,
    pub has_merge_conflicts: bool,
    pub has_inline_merge_conflicts: bool,
    /// The raw porcelain line
    pub display_string: String,
}

impl FileChange {
    /// Parse a single porcelain line of the form `XY path`.
    pub fn from_status_line(line: &str) -> Result<Self> {
        let mut indices = line.char_indices();
        let code = StatusCode::from_prefix(line)
            .ok_or_else(|| GitLoomError::malformed_status_line(line))?;
        // X, Y and the separating space
        if indices.nth(2).is_none() {
            return Err(GitLoomError::malformed_status_line(line));
        }
        let raw_path = indices.as_str();

        let name = if matches!(code.staged, 'R' | 'C') && raw_path.contains(RENAME_SEPARATOR) {
            raw_path
                .split(RENAME_SEPARATOR)
                .map(unquote_path)
                .collect::<Vec<_>>()
                .join(RENAME_SEPARATOR)
        } else {
            unquote_path(raw_path)
        };

        Ok(Self {
            name,
            short_status: code,
            tracked: !code.is_untracked(),
            has_staged_changes: code.has_staged_changes(),
            has_unstaged_changes: code.has_unstaged_changes(),
            deleted: code.is_deleted(),
            has_merge_conflicts: code.has_merge_conflicts(),
            has_inline_merge_conflicts: code.has_inline_merge_conflicts(),
            display_string: line.to_string(),
        })
    }

    /// Component paths of the entry: one path, or source and destination of a rename
    pub fn names(&self) -> Vec<&str> {
        self.name.split(RENAME_SEPARATOR).collect()
    }

    /// The path the file lives at in the working tree
    pub fn current_name(&self) -> &str {
        self.name
            .rsplit(RENAME_SEPARATOR)
            .next()
            .unwrap_or(&self.name)
    }
}

/// Parse full porcelain output into file changes, in output order.
///
/// Malformed lines are logged and skipped.
pub fn parse_status(output: &str) -> Vec<FileChange> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| match FileChange::from_status_line(line) {
            Ok(change) => Some(change),
            Err(e) => {
                log::warn!("Skipping status line: {e}");
                None
            }
        })
        .collect()
}

/// Undo git's C-style quoting of a path.
///
/// Paths that are not wrapped in double quotes are returned unchanged.
pub fn unquote_path(raw: &str) -> String {
    let inner = match raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner,
        None => return raw.to_string(),
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('n') => bytes.push(b'\n'),
            Some('t') => bytes.push(b'\t'),
            Some('r') => bytes.push(b'\r'),
            Some('a') => bytes.push(0x07),
            Some('b') => bytes.push(0x08),
            Some('f') => bytes.push(0x0c),
            Some('v') => bytes.push(0x0b),
            Some('"') => bytes.push(b'"'),
            Some('\\') => bytes.push(b'\\'),
            Some(d @ '0'..='7') => {
                // up to three octal digits encode one raw byte
                let mut value = d.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                bytes.push((value & 0xff) as u8);
            }
            Some(other) => {
                bytes.push(b'\\');
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
            }
            None => bytes.push(b'\\'),
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_status() {
        let files = parse_status("MM file1.txt\nA  file3.txt\n?? file4.txt");
        assert_eq!(files.len(), 3);

        let flags: Vec<_> = files
            .iter()
            .map(|f| (f.has_staged_changes, f.has_unstaged_changes, f.tracked))
            .collect();
        assert_eq!(
            flags,
            vec![(true, true, true), (true, false, false), (false, true, false)]
        );
        assert_eq!(files[0].name, "file1.txt");
        assert_eq!(files[1].name, "file3.txt");
        assert_eq!(files[2].name, "file4.txt");
    }

    #[test]
    fn test_parse_conflicts() {
        let files = parse_status("UU both.txt\nAA added.txt\nDU gone.txt");
        assert!(files.iter().all(|f| f.has_merge_conflicts));
        assert!(files[0].has_inline_merge_conflicts);
        assert!(files[1].has_inline_merge_conflicts);
        assert!(!files[2].has_inline_merge_conflicts);
        assert!(files[2].deleted);
        assert!(!files[0].has_staged_changes);
    }

    #[test]
    fn test_inline_conflicts_imply_conflicts() {
        let output = "UU a\nAA b\nDU c\nUD d\nMM e\n?? f\n D g\nR  h -> i";
        for file in parse_status(output) {
            if file.has_inline_merge_conflicts {
                assert!(file.has_merge_conflicts, "{}", file.display_string);
            }
        }
    }

    #[test]
    fn test_parse_deleted() {
        let files = parse_status(" D removed.txt\nD  staged_removal.txt");
        assert!(files[0].deleted);
        assert!(!files[0].has_staged_changes);
        assert!(files[1].deleted);
        assert!(files[1].has_staged_changes);
    }

    #[test]
    fn test_parse_keeps_display_string() {
        let files = parse_status(" M src/lib.rs");
        assert_eq!(files[0].display_string, " M src/lib.rs");
        assert_eq!(files[0].short_status.to_string(), " M");
    }

    #[test]
    fn test_short_line_is_malformed() {
        let err = FileChange::from_status_line("M").unwrap_err();
        assert!(matches!(err, GitLoomError::MalformedStatusLine { .. }));
        assert!(FileChange::from_status_line("MM").is_err());
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let files = parse_status("M\n M ok.txt\n\n");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "ok.txt");
    }

    #[test]
    fn test_quoted_path() {
        let files = parse_status("?? \"with space.txt\"\n?? \"tab\\there\"");
        assert_eq!(files[0].name, "with space.txt");
        assert_eq!(files[1].name, "tab\there");
    }

    #[test]
    fn test_octal_escaped_path() {
        // "é" is encoded by git as \303\251
        assert_eq!(unquote_path("\"caf\\303\\251.txt\""), "café.txt");
    }

    #[test]
    fn test_unquoted_path_unchanged() {
        assert_eq!(unquote_path("plain.txt"), "plain.txt");
        assert_eq!(unquote_path("\"unterminated"), "\"unterminated");
    }

    #[test]
    fn test_rename_entry() {
        let files = parse_status("R  old name.txt -> \"new name.txt\"");
        assert_eq!(files[0].name, "old name.txt -> new name.txt");
        assert_eq!(files[0].names(), vec!["old name.txt", "new name.txt"]);
        assert_eq!(files[0].current_name(), "new name.txt");
    }

    #[test]
    fn test_current_name_plain() {
        let files = parse_status(" M plain.txt");
        assert_eq!(files[0].current_name(), "plain.txt");
        assert_eq!(files[0].names(), vec!["plain.txt"]);
    }
}
