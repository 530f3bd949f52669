use clap::{Parser, Subcommand, ValueEnum};
use git_loom::commands::*;
use git_loom::core::{
    client::{run_client, ClientMode},
    error::{GitLoomError, Result},
    patch_selection::SelectionStatus,
    print_error,
    process::OsFileSystem,
    rewrite_plan::RewriteVerb,
};
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "git-loom")]
#[command(about = "Rewrite git history from the terminal")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SelectState {
    Whole,
    Partial,
    #[value(name = "none")]
    Unselected,
}

impl From<SelectState> for SelectionStatus {
    fn from(state: SelectState) -> Self {
        match state {
            SelectState::Whole => SelectionStatus::WholeFile,
            SelectState::Partial => SelectionStatus::Partial,
            SelectState::Unselected => SelectionStatus::Unselected,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show numbered working tree status
    Status,
    /// Show numbered history, 0 = HEAD
    Log {
        /// Show at most this many commits
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Apply a todo verb (edit, squash, fixup, drop, ...) to a commit
    Rebase {
        verb: RewriteVerb,
        /// Commit index from `log`
        index: usize,
    },
    /// Reword a commit message in your editor
    Reword { index: usize },
    /// Swap a commit with the older one beneath it
    MoveDown { index: usize },
    /// Swap a commit with the newer one above it
    MoveUp { index: usize },
    /// Remove one file's change from an older commit
    DiscardFile { index: usize, path: String },
    /// Fold the staged changes into an older commit
    AmendTo { rev: String },
    /// Replay commits on top of HEAD
    CherryPick {
        #[arg(required = true)]
        revs: Vec<String>,
    },
    /// Rebase the current branch onto another revision
    RebaseOnto { upstream: String },
    /// Mark a file of a commit for a patch operation
    Select {
        index: usize,
        path: String,
        #[arg(long, value_enum, default_value = "whole")]
        state: SelectState,
    },
    /// Show the current patch selection
    Selection,
    /// Remove the selected files' changes from their commit
    RemoveFiles { index: usize },
    /// Move the selected files' changes to a newer commit
    MoveFiles { from: usize, to: usize },
    /// Continue a paused rewrite
    Continue,
    /// Abort a paused rewrite
    Abort,
    /// Skip the commit a rewrite stopped at
    Skip,
    /// Change the verb of a pending todo entry during a rewrite
    TodoEdit { index: usize, verb: RewriteVerb },
    /// Move a pending todo entry down during a rewrite
    TodoDown { index: usize },
}

/// git launched us as its editor; do that job and nothing else
fn run_as_editor(mode: ClientMode) -> Result<()> {
    let debug = env::var("DEBUG").is_ok_and(|value| value == "TRUE");
    env_logger::Builder::new()
        .parse_filters(if debug { "debug" } else { "warn" })
        .init();

    let target = env::args_os().nth(1).map(PathBuf::from);
    let fs = OsFileSystem::new(env::current_dir()?);
    run_client(&mode, target.as_deref(), &fs)
}

fn run_command(command: Commands, debug: bool) -> Result<()> {
    match command {
        Commands::Status => execute_status(debug),
        Commands::Log { limit } => execute_log(debug, limit),
        Commands::Rebase { verb, index } => execute_rebase(debug, verb, index),
        Commands::Reword { index } => execute_reword(debug, index),
        Commands::MoveDown { index } => execute_move_down(debug, index),
        Commands::MoveUp { index } => execute_move_up(debug, index),
        Commands::DiscardFile { index, path } => execute_discard_file(debug, index, &path),
        Commands::AmendTo { rev } => execute_amend_to(debug, &rev),
        Commands::CherryPick { revs } => execute_cherry_pick(debug, &revs),
        Commands::RebaseOnto { upstream } => execute_rebase_onto(debug, &upstream),
        Commands::Select { index, path, state } => {
            execute_select(debug, index, &path, state.into())
        }
        Commands::Selection => execute_selection(debug),
        Commands::RemoveFiles { index } => execute_remove_files(debug, index),
        Commands::MoveFiles { from, to } => execute_move_files(debug, from, to),
        Commands::Continue => execute_continue(debug),
        Commands::Abort => execute_abort(debug),
        Commands::Skip => execute_skip(debug),
        Commands::TodoEdit { index, verb } => execute_todo_edit(debug, index, verb),
        Commands::TodoDown { index } => execute_todo_down(debug, index),
    }
}

fn main() -> Result<()> {
    if let Some(mode) = ClientMode::from_env() {
        if let Err(e) = run_as_editor(mode) {
            eprintln!("git-loom: {e}");
            std::process::exit(1);
        }
        return Ok(());
    }

    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    if let Err(e) = run_command(cli.command, cli.debug) {
        if let GitLoomError::NotInGitRepo = e {
            print_error("Not in a git repository");
        } else {
            print_error(&e.to_string());
        }
        std::process::exit(1);
    }

    Ok(())
}
