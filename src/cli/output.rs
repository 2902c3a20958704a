//! Terminal output helpers for the CLI commands.
//!
//! Only the interactive commands print here; the MCP transport writes
//! JSON-RPC frames to stdout directly and must never be styled.

use console::style;

/// Styled output for the human-facing CLI commands.
pub struct Output;

impl Output {
    /// Print a section header.
    pub fn header(title: &str) {
        println!("\n{}", style(title).bold().underlined());
    }

    /// Print an indented key-value row under a header.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print an informational hint.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a warning to stderr.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }
}
