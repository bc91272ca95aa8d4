//! Console progress output for report generation.
//!
//! The generator is a single-pass batch job; all progress goes to stdout
//! as scoped one-liners so an operator can follow a run in a terminal or
//! a captured log. Output groups by package, then by node.

use colored::Colorize;

/// Prints a scoped progress line.
pub fn info(scope: &str, msg: &str) {
    println!("{} {} {msg}", "granary>".dimmed(), format!("[{scope}]").cyan());
}

/// Prints a scoped "BEGIN" marker.
pub fn begin(scope: &str, msg: &str) {
    println!(
        "{} {} {msg}: {} ...",
        "granary>".dimmed(),
        format!("[{scope}]").cyan(),
        "BEGIN".bold()
    );
}

/// Prints a scoped "END" marker.
pub fn end(scope: &str, msg: &str) {
    println!(
        "{} {} {msg}: {}",
        "granary>".dimmed(),
        format!("[{scope}]").cyan(),
        "END.".bold()
    );
}

/// Prints the short acknowledgement used after a unit of work completes.
pub fn ok() {
    println!("{}", "OK".green());
}
