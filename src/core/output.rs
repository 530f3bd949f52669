//! Printers shared by all git-loom commands.
//!
//! Errors, successes and warnings each get a fixed marker and colour; a paused
//! rewrite is followed by the commands that resume or abandon it.

use colored::*;

/// `✕ Error: <message>` in red, padded by blank lines
pub fn print_error(message: &str) {
    println!("\n{} {}\n", "✕ Error:".red(), message.white());
}

pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Non-fatal problems, e.g. a rewrite that stopped for conflicts
pub fn print_warning(message: &str) {
    println!("\n{} {}\n", "! Warning:".yellow(), message.white());
}

/// The follow-up commands available while a rewrite is paused
pub fn print_paused_hint() {
    println!(
        "{} {}\n",
        "Rewrite paused.".yellow(),
        "Resolve any conflicts, then run `git-loom continue`, `git-loom skip` or `git-loom abort`."
            .bright_black()
    );
}

/// `<header>:` between blank lines, above a numbered listing
pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.white());
}
