use crate::core::{
    command_init::CommandContext,
    error::Result,
    print_success,
    process::OsFileSystem,
    rewrite_plan::RewriteVerb,
    todo_file::{edit_todo_action, move_todo_down},
};

pub fn execute_todo_edit(debug: bool, index: usize, verb: RewriteVerb) -> Result<()> {
    let context = CommandContext::initialize(debug)?;
    let fs = OsFileSystem::new(context.workdir()?);

    edit_todo_action(&fs, &context.git_repo.git_dir(), index, verb)?;
    print_success(&format!("Todo entry {index} is now {verb}."));
    Ok(())
}

pub fn execute_todo_down(debug: bool, index: usize) -> Result<()> {
    let context = CommandContext::initialize(debug)?;
    let fs = OsFileSystem::new(context.workdir()?);

    move_todo_down(&fs, &context.git_repo.git_dir(), index)?;
    print_success(&format!("Moved todo entry {index} down."));
    Ok(())
}
