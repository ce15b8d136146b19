//! CLI handlers for the `courier upload` subcommand.
//!
//! `upload plan` resolves where each file would go without transferring
//! anything.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use courier_config::{Artifact, Release, ResolvedConfig, Uploader};
use serde::Serialize;
use tracing::{debug, info};

use super::OutputFormat;
use crate::theme::Theme;

/// One uploader/artifact pair of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct PlanEntry {
    /// Uploader kind.
    pub(crate) kind: String,
    /// Uploader name.
    pub(crate) uploader: String,
    /// Artifact file name.
    pub(crate) artifact: String,
    /// Resolved remote path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) path: Option<String>,
    /// Resolved download URL, when the uploader has a template for one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) download_url: Option<String>,
    /// Resolution failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

/// Resolve every enabled uploader against every artifact.
///
/// Failures are recorded per entry so one bad template does not hide the
/// rest of the plan.
pub(crate) fn plan(
    release: &Release,
    artifacts: &[Artifact],
    target: Option<&str>,
) -> Vec<PlanEntry> {
    let ctx = release.context();
    let mut entries = Vec::new();

    for uploader in release
        .enabled_uploaders()
        .filter(|u| target.is_none_or(|t| u.name() == t))
    {
        if !uploader.base().artifacts() {
            debug!(uploader = uploader.name(), "Artifact uploads disabled, skipping");
            continue;
        }

        for artifact in artifacts {
            let mut entry = PlanEntry {
                kind: uploader.kind_name().to_owned(),
                uploader: uploader.name().to_owned(),
                artifact: artifact.file_name(),
                path: None,
                download_url: None,
                error: None,
            };

            let resolved = uploader.resolved_path(ctx, artifact).and_then(|path| {
                let url = match uploader.download_url() {
                    Some(_) => Some(uploader.resolved_download_url(ctx, artifact)?),
                    None => None,
                };
                Ok((path, url))
            });

            match resolved {
                Ok((path, url)) => {
                    entry.path = Some(path);
                    entry.download_url = url;
                },
                Err(e) => entry.error = Some(e.to_string()),
            }
            entries.push(entry);
        }
    }

    entries
}

/// Print the upload plan for `files`.
pub(crate) fn run_plan(
    resolved: &ResolvedConfig,
    files: &[PathBuf],
    platform: Option<&str>,
    target: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let artifacts: Vec<Artifact> = files
        .iter()
        .map(|file| {
            let artifact = Artifact::new(file);
            match platform {
                Some(p) => artifact.with_platform(p),
                None => artifact,
            }
        })
        .collect();

    let entries = plan(&resolved.release, &artifacts, target);
    info!(
        artifacts = artifacts.len(),
        entries = entries.len(),
        "Computed upload plan"
    );

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Pretty => print_plan(&entries),
    }

    let failures = entries.iter().filter(|e| e.error.is_some()).count();
    if failures > 0 {
        anyhow::bail!("{failures} upload destination(s) failed to resolve");
    }
    Ok(())
}

fn print_plan(entries: &[PlanEntry]) {
    if entries.is_empty() {
        println!("{}", Theme::warning("No enabled upload targets for this release."));
        return;
    }

    println!("{}", Theme::header("Upload plan"));
    println!("{}", Theme::separator());

    let mut current = None;
    for entry in entries {
        let key = (entry.kind.as_str(), entry.uploader.as_str());
        if current != Some(key) {
            println!("\n{}", Theme::target(&entry.kind, &entry.uploader));
            current = Some(key);
        }

        match (&entry.path, &entry.error) {
            (_, Some(error)) => {
                println!("  {}", entry.artifact);
                println!("    {}", Theme::error(error));
            },
            (Some(path), None) => {
                println!("  {} -> {}", entry.artifact, path.cyan());
                if let Some(url) = &entry.download_url {
                    println!("    {}", Theme::dimmed(url));
                }
            },
            (None, None) => {},
        }
    }
}
