//! CLI handlers for the `courier config` subcommand.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use courier_config::uploader::SshField;
use courier_config::{ConfigResult, LoadOptions, ResolvedConfig, ShowFormat, Uploader};

use crate::theme::Theme;

const CASCADE_HINT: &str = "{KIND}_{NAME}_{FIELD} > SSH_{NAME}_{FIELD} > {KIND}_{FIELD} > SSH_{FIELD}";

/// Show the resolved configuration with source annotations.
pub(crate) fn show_config(
    resolved: &ResolvedConfig,
    json: bool,
    section: Option<&str>,
) -> Result<()> {
    let show_format = if json {
        ShowFormat::Json
    } else {
        ShowFormat::Toml
    };

    let output = resolved
        .show(show_format, section)
        .map_err(|e| anyhow::anyhow!("failed to format config: {e}"))?;

    println!("{output}");
    Ok(())
}

/// Validate the current configuration.
pub(crate) fn validate_config(loaded: &ConfigResult<ResolvedConfig>) -> Result<()> {
    let resolved = match loaded {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("{}", Theme::error(&format!("Configuration error: {e}")));
            anyhow::bail!("configuration is invalid");
        },
    };

    println!("{}", Theme::success("Configuration is valid."));
    if !resolved.loaded_files.is_empty() {
        println!("\nLoaded files:");
        for path in &resolved.loaded_files {
            println!("  - {path}");
        }
    }

    let release = &resolved.release;
    let project = release.context().project();
    println!(
        "\nProject: {} {}",
        project.name().bold(),
        Theme::dimmed(project.version())
    );

    if release.uploaders().is_empty() {
        println!("{}", Theme::warning("No upload targets configured."));
        return Ok(());
    }

    println!("\nUpload targets:");
    for uploader in release.uploaders() {
        println!(
            "  {}  [{}]  active = {}",
            Theme::target(uploader.kind_name(), uploader.name()),
            Theme::state(uploader.is_enabled(project)),
            uploader.base().active()
        );
    }

    Ok(())
}

/// Show every config file path that is checked, and the environment keys
/// each upload target reads.
pub(crate) fn show_paths(options: &LoadOptions, resolved: Option<&ResolvedConfig>) {
    let home = directories::BaseDirs::new().map(|d| d.home_dir().to_string_lossy().to_string());
    let workspace = options
        .workspace_root
        .as_ref()
        .map(|p| p.to_string_lossy().to_string());
    let explicit = options
        .config_file
        .as_ref()
        .map(|p| p.to_string_lossy().to_string());

    let paths =
        ResolvedConfig::config_paths(home.as_deref(), workspace.as_deref(), explicit.as_deref());

    println!(
        "{}\n",
        Theme::header("Configuration files checked (in precedence order):")
    );
    for (i, path) in paths.iter().enumerate() {
        println!(
            "  {}. {path}  [{}]",
            i.saturating_add(1),
            Theme::presence(Path::new(path).exists())
        );
    }
    println!(
        "\n  {}",
        Theme::dimmed("$COURIER_HOME/config.toml is used when ~/.courier/config.toml is absent")
    );

    println!("\n{}", Theme::header("Environment overrides:"));
    println!("  {CASCADE_HINT}");

    let Some(resolved) = resolved else {
        return;
    };

    for uploader in resolved.release.uploaders() {
        println!("\n  {}", Theme::target(uploader.kind_name(), uploader.name()));
        for field in SshField::ALL {
            let keys = uploader.env_keys(field).join(" > ");
            println!("    {:<12} {}", field.key(), Theme::dimmed(&keys));
        }
    }
}
