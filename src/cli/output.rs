//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

use crate::domain::TodoNode;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}", error_line(msg));
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", success_line(msg));
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", header_line(msg));
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

pub fn error_line(msg: &(impl std::fmt::Display + ?Sized)) -> String {
    format!("{}: {}", "error".red().bold(), msg)
}

pub fn success_line(msg: &(impl std::fmt::Display + ?Sized)) -> String {
    format!("{} {}", "✓".green(), msg)
}

pub fn header_line(msg: &(impl std::fmt::Display + ?Sized)) -> String {
    msg.to_string().cyan().bold().to_string()
}

/// Completion marker, `[x]` or `[ ]`
pub fn marker(completed: bool) -> String {
    if completed {
        "[x]".green().to_string()
    } else {
        "[ ]".to_string()
    }
}

/// One numbered list row, indented two spaces per level below the root children.
pub fn todo_line(position: usize, node: &TodoNode, depth: usize) -> String {
    let indent = "  ".repeat(depth.saturating_sub(1));
    let text = if node.completed {
        node.text.dimmed().to_string()
    } else {
        node.text.clone()
    };
    format!("{:>3}. {} {}{}", position, marker(node.completed), indent, text)
}
