use crate::core::{
    colors::format_commit_line, command_init::CommandContext, commit::Commit, error::Result,
    print_info, print_section_header, patch_selection::PatchSelectionTracker,
};
use colored::*;

pub fn execute_log(debug: bool, limit: Option<usize>) -> Result<()> {
    let context = CommandContext::initialize(debug)?;
    let mut commits = context.commits()?;
    if let Some(limit) = limit {
        commits.truncate(limit);
    }

    if commits.is_empty() {
        print_info("No commits yet");
        return Ok(());
    }

    print_section_header("Commits");
    for line in render_log_lines(&commits, &context.session.selection) {
        println!("{line}");
    }
    println!();
    Ok(())
}

/// One line per commit, indexed from 0 = HEAD like the rewrite commands expect
pub fn render_log_lines(commits: &[Commit], selection: &PatchSelectionTracker) -> Vec<String> {
    commits
        .iter()
        .enumerate()
        .map(|(index, commit)| {
            let mut line = format_commit_line(index, commit);
            if selection.target_sha() == Some(commit.sha.as_str()) && !selection.is_empty() {
                let count = selection.selected().count();
                line.push_str(&format!(" {}", format!("({count} selected)").green()));
            }
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::patch_selection::SelectionStatus;

    #[test]
    fn test_render_log_lines_mark_selection_target() {
        let commits = vec![
            Commit::new("bbbbbbbbbb", "second"),
            Commit::new("aaaaaaaaaa", "first"),
        ];
        let mut selection = PatchSelectionTracker::new();
        selection.set_status("aaaaaaaaaa", "a.txt", SelectionStatus::WholeFile);

        let lines = render_log_lines(&commits, &selection);
        assert!(lines[0].contains("[0]"));
        assert!(!lines[0].contains("selected"));
        assert!(lines[1].contains("(1 selected)"));
    }
}
