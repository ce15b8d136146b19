//! Courier CLI - release upload configuration
//!
//! Inspects the layered courier configuration and resolves, per artifact,
//! where each enabled upload target would place it. No bytes are
//! transferred.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use courier_config::{Config, LoadOptions};
use courier_telemetry::{LogConfig, LogFormat, RunContext, RunGuard};

mod commands;
mod config_bridge;
mod theme;

use commands::{OutputFormat, config, upload};

/// Courier - release upload configuration
#[derive(Parser)]
#[command(name = "courier")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format: pretty (default) or json
    #[arg(long, global = true, default_value = "pretty")]
    format: String,

    /// Explicit configuration file, merged last
    #[arg(short, long, global = true, env = "COURIER_CONFIG")]
    config: Option<PathBuf>,

    /// Project root (defaults to the current directory)
    #[arg(short, long, global = true)]
    workspace: Option<PathBuf>,

    /// Write logs to daily rolling files in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// View and check configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Plan artifact uploads
    Upload {
        #[command(subcommand)]
        command: UploadCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show resolved configuration with source annotations
    Show {
        /// Print JSON instead of annotated TOML
        #[arg(long)]
        json: bool,
        /// Show only a specific section (e.g. project, upload, logging)
        #[arg(short, long)]
        section: Option<String>,
    },
    /// Validate the current configuration
    Validate,
    /// Show config file paths and environment keys being checked
    Paths,
}

#[derive(Subcommand)]
enum UploadCommands {
    /// Resolve upload paths and download URLs without uploading
    Plan {
        /// Artifact files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Target platform of the artifacts
        #[arg(short, long)]
        platform: Option<String>,
        /// Only plan for the named target
        #[arg(short, long)]
        target: Option<String>,
    },
}

impl Commands {
    /// Name recorded on the run span.
    fn label(&self) -> &'static str {
        match self {
            Self::Config { command } => match command {
                ConfigCommands::Show { .. } => "config show",
                ConfigCommands::Validate => "config validate",
                ConfigCommands::Paths => "config paths",
            },
            Self::Upload { command } => match command {
                UploadCommands::Plan { .. } => "upload plan",
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let workspace_root = cli
        .workspace
        .clone()
        .or_else(|| std::env::current_dir().ok());
    let mut options = LoadOptions::new();
    options.workspace_root = workspace_root;
    options.config_file.clone_from(&cli.config);

    let loaded = Config::load_with(&options);

    // Set up logging from config, with --verbose override.
    let log_config = match &loaded {
        Ok(resolved) => {
            config_bridge::to_log_config(&resolved.logging, cli.verbose, cli.log_dir.as_deref())
        },
        Err(_) => {
            // Fallback if config loading fails.
            let level = if cli.verbose { "debug" } else { "info" };
            let lc = LogConfig::new(level).with_format(LogFormat::Compact);
            match &cli.log_dir {
                Some(dir) => lc.with_file_logging(dir, courier_telemetry::FileRotation::Daily),
                None => lc,
            }
        },
    };
    if let Err(e) = courier_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let mut run = RunContext::new(cli.command.label());
    if let Ok(resolved) = &loaded {
        let project = resolved.release.context().project();
        run = run.with_project(project.name(), project.version());
    }
    let _guard = RunGuard::new(run);

    let output_format = OutputFormat::parse(&cli.format);

    match cli.command {
        Commands::Config { command } => match command {
            ConfigCommands::Show { json, section } => {
                let resolved = loaded?;
                config::show_config(
                    &resolved,
                    json || output_format == OutputFormat::Json,
                    section.as_deref(),
                )?;
            },
            ConfigCommands::Validate => config::validate_config(&loaded)?,
            ConfigCommands::Paths => config::show_paths(&options, loaded.as_ref().ok()),
        },
        Commands::Upload { command } => match command {
            UploadCommands::Plan {
                files,
                platform,
                target,
            } => {
                let resolved = loaded?;
                upload::run_plan(
                    &resolved,
                    &files,
                    platform.as_deref(),
                    target.as_deref(),
                    output_format,
                )?;
            },
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_upload_plan() {
        let cli = Cli::try_parse_from([
            "courier",
            "--format",
            "json",
            "upload",
            "plan",
            "a.jar",
            "b.tar.gz",
            "--platform",
            "linux-x86_64",
        ])
        .unwrap();

        assert_eq!(cli.format, "json");
        assert_eq!(cli.command.label(), "upload plan");
        match cli.command {
            Commands::Upload {
                command: UploadCommands::Plan { files, platform, .. },
            } => {
                assert_eq!(files, vec![PathBuf::from("a.jar"), PathBuf::from("b.tar.gz")]);
                assert_eq!(platform.as_deref(), Some("linux-x86_64"));
            },
            Commands::Config { .. } => panic!("expected upload plan"),
        }
    }

    #[test]
    fn test_plan_requires_files() {
        assert!(Cli::try_parse_from(["courier", "upload", "plan"]).is_err());
    }

    #[test]
    fn test_parse_config_show() {
        let cli = Cli::try_parse_from([
            "courier",
            "config",
            "show",
            "--json",
            "--section",
            "upload",
            "--config",
            "release.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("release.toml")));
        assert_eq!(cli.command.label(), "config show");
    }
}
