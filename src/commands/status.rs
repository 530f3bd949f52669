use crate::core::{
    colors::format_file_status,
    command_init::CommandContext,
    error::Result,
    file_change::FileChange,
    print_section_header,
    process::{argv, ProcessRunner},
    rewrite_driver::RebaseMode,
};
use colored::*;

pub fn execute_status(debug: bool) -> Result<()> {
    let mut context = CommandContext::initialize(debug)?;

    let branch = context
        .git_repo
        .get_current_branch()
        .unwrap_or_else(|_| "-none-".to_string());
    let (hash, message) = context
        .git_repo
        .get_head_commit_info()
        .unwrap_or_else(|_| ("".to_string(), "- no commits yet -".to_string()));

    println!();
    println!("{} {}", "On branch:".bright_black(), branch.white().bold());
    if hash.is_empty() {
        println!("{} {}", "HEAD:".bright_black(), message.bright_black());
    } else {
        println!("{} {} {}", "HEAD:".bright_black(), hash.yellow(), message.white());
    }
    match context.git_repo.rebase_mode() {
        RebaseMode::None => {}
        RebaseMode::Normal => println!("{}", "Rebasing".yellow().bold()),
        RebaseMode::Interactive => println!("{}", "Interactive rebase in progress".yellow().bold()),
    }

    let git = context.config.git_binary.clone();
    let output = context.runner()?.run(&argv(&[
        git.as_str(),
        "status",
        "--untracked-files=all",
        "--porcelain",
    ]))?;
    let files = context.session.refresh_files(&output).to_vec();

    // a failed cache write must not hide the status
    if let Err(e) = context.session.save() {
        log::warn!("Cache save failed (status command will continue): {e}");
    }

    if files.is_empty() {
        println!();
        return Ok(());
    }

    print_section_header("Files");
    for line in render_status_lines(&files) {
        println!("{line}");
    }
    println!();

    Ok(())
}

/// Numbered lines in snapshot order, with conflicts called out
pub fn render_status_lines(files: &[FileChange]) -> Vec<String> {
    files
        .iter()
        .enumerate()
        .map(|(index, file)| {
            let mut line = format_file_status(index + 1, file);
            if file.has_inline_merge_conflicts {
                line.push_str(&format!("  {}", "(conflict markers)".red()));
            } else if file.has_merge_conflicts {
                line.push_str(&format!("  {}", "(conflict)".red()));
            }
            line
        })
        .collect()
}
