//! Source-annotated display for `config show`.
//!
//! Prints the effective configuration with annotations showing which layer
//! (defaults, user, workspace, explicit file) set each value. Uploaders are
//! rendered through their masked `as_map`, so secrets never reach the output.

use std::fmt::Write as _;

use serde_json::Value;

use crate::assemble::Release;
use crate::error::{ConfigError, ConfigResult};
use crate::merge::FieldSources;
use crate::props::PropertyBag;
use crate::types::LoggingSection;

/// A resolved configuration together with source annotations.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The assembled release.
    pub release: Release,
    /// Logging settings, for the telemetry layer.
    pub logging: LoggingSection,
    /// Dotted field path → which layer set the value.
    pub field_sources: FieldSources,
    /// Config file paths that were loaded (in precedence order).
    pub loaded_files: Vec<String>,
}

/// Output format for `config show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowFormat {
    /// TOML with inline comments showing source.
    Toml,
    /// JSON (for programmatic consumption).
    Json,
}

impl ResolvedConfig {
    /// The effective configuration as a property bag.
    ///
    /// # Errors
    ///
    /// Returns an error if an uploader's displayed fields fail to resolve.
    pub fn effective(&self) -> ConfigResult<PropertyBag> {
        let ctx = self.release.context();
        let project = ctx.project();

        let mut bag = PropertyBag::new();
        bag.insert_bag(
            "project",
            PropertyBag::new()
                .with("name", project.name())
                .with("version", project.version())
                .with("snapshot", project.is_snapshot())
                .with("prerelease", project.is_prerelease()),
        );
        bag.insert_bag(
            "properties",
            ctx.properties()
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
        );
        bag.insert_bag("upload", self.release.as_map(true)?);
        bag.insert(
            "logging",
            serde_json::to_value(&self.logging).map_err(|e| ConfigError::Render(e.to_string()))?,
        );
        Ok(bag)
    }

    /// Render the effective configuration, optionally limited to one
    /// top-level section.
    ///
    /// # Errors
    ///
    /// Returns an error if the section does not exist, a field fails to
    /// resolve, or serialization fails.
    pub fn show(&self, format: ShowFormat, section: Option<&str>) -> ConfigResult<String> {
        let effective = self.effective()?;
        let view: Value = match section {
            Some(name) => effective
                .get(name)
                .cloned()
                .ok_or_else(|| ConfigError::ValidationError {
                    field: name.to_owned(),
                    message: "unknown configuration section".to_owned(),
                })?,
            None => effective.into(),
        };

        match format {
            ShowFormat::Toml => self.show_toml(&view, section),
            ShowFormat::Json => {
                serde_json::to_string_pretty(&view).map_err(|e| ConfigError::Render(e.to_string()))
            },
        }
    }

    fn show_toml(&self, view: &Value, section: Option<&str>) -> ConfigResult<String> {
        let toml_str =
            toml::to_string_pretty(view).map_err(|e| ConfigError::Render(e.to_string()))?;

        let mut output = String::new();

        output.push_str("# Resolved Courier Configuration\n");
        output.push_str("# Source annotations: [defaults] [user] [workspace] [explicit]\n");

        if !self.loaded_files.is_empty() {
            output.push_str("#\n# Loaded files (in precedence order):\n");
            for (i, path) in self.loaded_files.iter().enumerate() {
                let _ = writeln!(output, "#   {}. {path}", i.saturating_add(1));
            }
        }

        output.push('\n');

        let mut table = section.unwrap_or("").to_owned();
        for line in toml_str.lines() {
            let trimmed = line.trim();
            if let Some(header) = trimmed
                .strip_prefix('[')
                .and_then(|h| h.strip_suffix(']'))
                .filter(|h| !h.starts_with('['))
            {
                table = join(section.unwrap_or(""), &header.replace('"', ""));
            }

            if let Some(annotation) = self.annotate_line(trimmed, &table) {
                let _ = writeln!(output, "{line}  # {annotation}");
            } else {
                output.push_str(line);
                output.push('\n');
            }
        }

        Ok(output)
    }

    /// Try to extract a source annotation for a TOML line.
    fn annotate_line(&self, trimmed: &str, table: &str) -> Option<String> {
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('[') {
            return None;
        }

        let key = trimmed.split('=').next()?.trim().trim_matches('"');
        self.annotate_path(&join(table, key))
    }

    /// Source of a displayed field. Uploader fields are looked up on the
    /// target table first, then on the transport defaults.
    fn annotate_path(&self, path: &str) -> Option<String> {
        if let Some(layer) = self.field_sources.get(path) {
            return Some(format!("[{layer}]"));
        }

        let rest = path.strip_prefix("upload.")?;
        let mut parts = rest.splitn(3, '.');
        let (kind, name, field) = (parts.next()?, parts.next()?, parts.next()?);

        if let Some(layer) = self
            .field_sources
            .get(&format!("upload.{kind}.targets.{name}.{field}"))
        {
            return Some(format!("[{layer}]"));
        }
        self.field_sources
            .get(&format!("upload.{kind}.defaults.{field}"))
            .map(|layer| format!("[{layer}, via {kind} defaults]"))
    }

    /// List all config file paths that are checked during loading.
    #[must_use]
    pub fn config_paths(
        home_dir: Option<&str>,
        workspace_root: Option<&str>,
        explicit: Option<&str>,
    ) -> Vec<String> {
        let mut paths = Vec::new();

        if let Some(home) = home_dir {
            paths.push(format!("{home}/.courier/config.toml"));
        } else {
            paths.push("~/.courier/config.toml".to_owned());
        }

        if let Some(ws) = workspace_root {
            paths.push(format!("{ws}/.courier/config.toml"));
        } else {
            paths.push("{workspace}/.courier/config.toml".to_owned());
        }

        if let Some(file) = explicit {
            paths.push(file.to_owned());
        }

        paths
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}
