//! Common utilities
//!
//! User-facing messages go to stderr, separate from log output and from the
//! rendered document on stdout.

use colored::Colorize;

/// Severity of a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Info,
    Error,
}

/// Format a user-facing message with its severity prefix
pub fn format_notice(kind: Notice, message: &str) -> String {
    match kind {
        Notice::Info => format!("{} {}", "info:".cyan().bold(), message),
        Notice::Error => format!("{} {}", "error:".red().bold(), message),
    }
}

/// Print an informational message to stderr
pub fn show_info(message: &str) {
    eprintln!("{}", format_notice(Notice::Info, message));
}

/// Print an error message to stderr
pub fn show_error(message: &str) {
    eprintln!("{}", format_notice(Notice::Error, message));
}

/// Force colors off (e.g. `--no-color`)
pub fn disable_color() {
    colored::control::set_override(false);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_notice_plain() {
        disable_color();
        assert_eq!(
            format_notice(Notice::Info, "No active editor found."),
            "info: No active editor found."
        );
        assert_eq!(format_notice(Notice::Error, "boom"), "error: boom");
    }
}
