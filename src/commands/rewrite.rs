use crate::core::{
    command_init::{CommandContext, SystemOrchestrator},
    commit::Commit,
    error::Result,
    output::{print_paused_hint, print_success, print_warning},
    rewrite_driver::RewriteState,
    rewrite_plan::RewriteVerb,
};

/// Run `op` against the orchestrator and keep its session state for the next invocation.
fn run_rewrite<T>(
    context: &mut CommandContext,
    op: impl FnOnce(&mut SystemOrchestrator, &[Commit]) -> Result<T>,
) -> Result<T> {
    let commits = context.commits()?;
    let mut orchestrator = context.orchestrator()?;

    let result = op(&mut orchestrator, &commits);

    // a paused rewrite is only resumable if its follow-up step was saved
    if let Err(e) = context.persist(&orchestrator) {
        log::error!("Failed to save session: {e}");
        if result.is_ok() {
            return Err(e);
        }
    }
    report_state(orchestrator.driver().state(), result.is_ok());
    result
}

fn report_state(state: RewriteState, succeeded: bool) {
    match state {
        RewriteState::Running => {
            if succeeded {
                print_warning("Rewrite stopped before finishing");
            }
            print_paused_hint();
        }
        RewriteState::Completed if succeeded => print_success("Rewrite completed."),
        RewriteState::Aborted if succeeded => print_success("Rewrite aborted."),
        _ => {}
    }
}

pub fn execute_rebase(debug: bool, verb: RewriteVerb, index: usize) -> Result<()> {
    let mut context = CommandContext::initialize(debug)?;
    run_rewrite(&mut context, |orchestrator, commits| {
        orchestrator.interactive_rebase(commits, index, verb)
    })?;
    Ok(())
}

pub fn execute_reword(debug: bool, index: usize) -> Result<()> {
    let mut context = CommandContext::initialize(debug)?;
    run_rewrite(&mut context, |orchestrator, commits| {
        orchestrator.reword_commit(commits, index)
    })?;
    Ok(())
}

pub fn execute_move_down(debug: bool, index: usize) -> Result<()> {
    let mut context = CommandContext::initialize(debug)?;
    run_rewrite(&mut context, |orchestrator, commits| {
        orchestrator.move_commit_down(commits, index)
    })?;
    Ok(())
}

pub fn execute_move_up(debug: bool, index: usize) -> Result<()> {
    let mut context = CommandContext::initialize(debug)?;
    run_rewrite(&mut context, |orchestrator, commits| {
        orchestrator.move_commit_up(commits, index)
    })?;
    Ok(())
}

pub fn execute_discard_file(debug: bool, index: usize, path: &str) -> Result<()> {
    let mut context = CommandContext::initialize(debug)?;
    run_rewrite(&mut context, |orchestrator, commits| {
        orchestrator.discard_old_file_changes(commits, index, path)
    })
}

pub fn execute_amend_to(debug: bool, rev: &str) -> Result<()> {
    let mut context = CommandContext::initialize(debug)?;
    let target = context.git_repo.resolve_commit(rev)?;
    log::info!("Amending staged changes into {} {}", target.short_sha(), target.name);

    run_rewrite(&mut context, |orchestrator, _| {
        orchestrator.amend_to(&target.sha)
    })?;
    Ok(())
}

pub fn execute_cherry_pick(debug: bool, revs: &[String]) -> Result<()> {
    let mut context = CommandContext::initialize(debug)?;
    // newest first, the way history lists are kept
    let mut picked = revs
        .iter()
        .map(|rev| context.git_repo.resolve_commit(rev))
        .collect::<Result<Vec<_>>>()?;
    picked.reverse();

    run_rewrite(&mut context, |orchestrator, _| {
        orchestrator.cherry_pick_commits(&picked)
    })?;
    Ok(())
}

pub fn execute_rebase_onto(debug: bool, upstream: &str) -> Result<()> {
    let mut context = CommandContext::initialize(debug)?;
    run_rewrite(&mut context, |orchestrator, _| {
        orchestrator.rebase_branch(upstream)
    })?;
    Ok(())
}

pub fn execute_remove_files(debug: bool, index: usize) -> Result<()> {
    let mut context = CommandContext::initialize(debug)?;
    run_rewrite(&mut context, |orchestrator, commits| {
        orchestrator.remove_selected_files_from_commit(commits, index)
    })
}

pub fn execute_move_files(debug: bool, from: usize, to: usize) -> Result<()> {
    let mut context = CommandContext::initialize(debug)?;
    run_rewrite(&mut context, |orchestrator, commits| {
        orchestrator.move_selected_files_to_commit(commits, from, to)
    })
}

pub fn execute_continue(debug: bool) -> Result<()> {
    let mut context = CommandContext::initialize(debug)?;
    run_rewrite(&mut context, |orchestrator, _| {
        orchestrator.driver_mut().continue_rewrite()
    })
}

pub fn execute_abort(debug: bool) -> Result<()> {
    let mut context = CommandContext::initialize(debug)?;
    run_rewrite(&mut context, |orchestrator, _| orchestrator.driver_mut().abort())
}

pub fn execute_skip(debug: bool) -> Result<()> {
    let mut context = CommandContext::initialize(debug)?;
    run_rewrite(&mut context, |orchestrator, _| orchestrator.driver_mut().skip())
}
