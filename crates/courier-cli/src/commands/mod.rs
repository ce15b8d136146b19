//! Command implementations.

pub(crate) mod config;
pub(crate) mod upload;

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    /// Colored, human-readable text.
    Pretty,
    /// Machine-readable JSON on stdout.
    Json,
}

impl OutputFormat {
    /// Parse the `--format` flag; anything but `json` is pretty.
    pub(crate) fn parse(value: &str) -> Self {
        match value {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}
