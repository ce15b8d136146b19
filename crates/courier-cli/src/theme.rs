//! CLI theme and styling.

use colored::Colorize;

/// CLI theme configuration.
pub(crate) struct Theme;

impl Theme {
    /// Format a header.
    pub(crate) fn header(text: &str) -> String {
        format!("{}", text.bold().cyan())
    }

    /// Format a success message.
    pub(crate) fn success(text: &str) -> String {
        format!("{} {}", "✓".green(), text)
    }

    /// Format an error message.
    pub(crate) fn error(text: &str) -> String {
        format!("{} {}", "✗".red(), text.red())
    }

    /// Format a warning message.
    pub(crate) fn warning(text: &str) -> String {
        format!("{} {}", "!".yellow(), text.yellow())
    }

    /// Format a dimmed message.
    pub(crate) fn dimmed(text: &str) -> String {
        format!("{}", text.dimmed())
    }

    /// Format an upload target as `kind.name`.
    pub(crate) fn target(kind: &str, name: &str) -> String {
        format!("{}.{}", kind.dimmed(), name.bold())
    }

    /// Format whether a target takes part in the release.
    pub(crate) fn state(enabled: bool) -> String {
        if enabled {
            "enabled".green().to_string()
        } else {
            "disabled".dimmed().to_string()
        }
    }

    /// Format whether a config file exists.
    pub(crate) fn presence(found: bool) -> String {
        if found {
            "found".green().to_string()
        } else {
            "not found".dimmed().to_string()
        }
    }

    /// Format a separator line.
    pub(crate) fn separator() -> String {
        "━".repeat(50).dimmed().to_string()
    }
}
