//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::path::Path;

use colored::Colorize;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for JSON and trees)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Batch line for a structured document: `✓ doc.txt (12 nodes) -> doc.json`
pub fn document_ok(document: &Path, nodes: usize, target: &Path) {
    println!(
        "  {} {} ({} nodes) -> {}",
        "✓".green(),
        document.display(),
        nodes,
        target.display().to_string().dimmed()
    );
}

/// Batch line for a rejected document, with the reason.
pub fn document_failed(document: &Path, reason: &(impl std::fmt::Display + ?Sized)) {
    println!("  {} {}: {}", "✗".red(), document.display(), reason);
}

/// One row of `doctree check`: rank, name, parent, pattern, leaf marker.
pub fn level_row(rank: usize, name: &str, parent: Option<&str>, pattern: &str, leaf: bool) {
    let marker = if leaf { " (leaf)".yellow().to_string() } else { String::new() };
    println!(
        "  {:>2}  {}{}  <- {}  {}",
        rank,
        name.bold(),
        marker,
        parent.unwrap_or("root"),
        pattern.dimmed()
    );
}
