use crate::core::{
    command_init::CommandContext,
    error::Result,
    patch_selection::{PatchSelectionTracker, SelectionStatus},
    print_info, print_section_header, print_success,
};
use colored::*;

pub fn execute_select(debug: bool, index: usize, path: &str, status: SelectionStatus) -> Result<()> {
    let mut context = CommandContext::initialize(debug)?;
    let commits = context.commits()?;
    let commit = CommandContext::commit_at(&commits, index)?;

    if context.session.selection.target_sha() != Some(commit.sha.as_str()) {
        log::debug!("Selection moves to commit {}", commit.short_sha());
    }
    context.session.selection.set_status(&commit.sha, path, status);
    context.session.save()?;

    print_success(&format!(
        "{path} in {} is now {status}.",
        commit.short_sha()
    ));
    Ok(())
}

pub fn execute_selection(debug: bool) -> Result<()> {
    let context = CommandContext::initialize(debug)?;
    let selection = &context.session.selection;

    match selection.target_sha() {
        Some(sha) if !selection.is_empty() => {
            print_section_header(&format!("Selected in {}", &sha[..sha.len().min(7)]));
            for line in render_selection_lines(selection) {
                println!("{line}");
            }
            println!();
        }
        _ => print_info("Nothing selected"),
    }
    Ok(())
}

pub fn render_selection_lines(selection: &PatchSelectionTracker) -> Vec<String> {
    selection
        .selected()
        .map(|(path, status)| {
            let marker = match status {
                SelectionStatus::WholeFile => "[x]".green(),
                SelectionStatus::Partial => "[~]".yellow(),
                SelectionStatus::Unselected => "[ ]".normal(),
            };
            format!("{marker} {path}")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_selection_lines() {
        let mut selection = PatchSelectionTracker::new();
        selection.set_status("abc", "b.txt", SelectionStatus::Partial);
        selection.set_status("abc", "a.txt", SelectionStatus::WholeFile);

        let lines = render_selection_lines(&selection);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[x]") && lines[0].contains("a.txt"));
        assert!(lines[1].contains("[~]") && lines[1].contains("b.txt"));
    }
}
