//! Bridge from the `[logging]` config section to telemetry settings.

use std::path::Path;
use std::str::FromStr;

use courier_config::LoggingSection;
use courier_telemetry::{FileRotation, LogConfig, LogFormat};

/// Build a [`LogConfig`] from the `[logging]` section.
///
/// An unknown format falls back to compact; `verbose` raises the level to
/// `debug`; `log_dir` switches output to a daily rolling file.
pub(crate) fn to_log_config(
    section: &LoggingSection,
    verbose: bool,
    log_dir: Option<&Path>,
) -> LogConfig {
    let level = if verbose {
        "debug"
    } else {
        section.level.as_str()
    };
    let format = LogFormat::from_str(&section.format).unwrap_or_default();

    let config = LogConfig::new(level)
        .with_format(format)
        .with_directives(section.directives.iter().cloned());

    match log_dir {
        Some(dir) => config.with_file_logging(dir, FileRotation::Daily),
        None => config,
    }
}
