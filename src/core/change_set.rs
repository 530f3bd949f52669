//! Reconciliation of successive status snapshots.
//!
//! A list UI keeps its cursor on the same row across refreshes only if rows that
//! were already visible stay where they were. [`merge_status_files`] keeps the
//! previous ordering for every path still present, drops paths that disappeared
//! and appends newcomers in the order git reported them.

use crate::core::file_change::FileChange;
use std::collections::HashMap;

/// Merge a fresh status snapshot into the previous one.
///
/// The output contains exactly the entries of `new_files` (with their fresh
/// flags), ordered by their position in `old_files` first.
pub fn merge_status_files(old_files: &[FileChange], new_files: Vec<FileChange>) -> Vec<FileChange> {
    if old_files.is_empty() {
        return new_files;
    }

    // first occurrence wins when a snapshot repeats a name
    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(new_files.len());
    for (index, file) in new_files.iter().enumerate() {
        positions.entry(file.name.as_str()).or_insert(index);
    }

    let mut consumed = vec![false; new_files.len()];
    let mut order = Vec::with_capacity(new_files.len());
    for old in old_files {
        if let Some(&index) = positions.get(old.name.as_str()) {
            if !consumed[index] {
                consumed[index] = true;
                order.push(index);
            }
        }
    }
    order.extend((0..new_files.len()).filter(|index| !consumed[*index]));

    let mut slots: Vec<Option<FileChange>> = new_files.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect()
}
