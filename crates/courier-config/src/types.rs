//! Configuration file model.
//!
//! These are the raw, mutable shapes deserialized from the merged TOML tree.
//! Every struct implements [`Default`] so that a bare `[section]` header
//! produces a usable configuration. Uploaders stay in builder form here;
//! [`Config::assemble`](crate::Config::assemble) merges and freezes them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::context::Project;
use crate::uploader::{SshKind, SshUploaderBuilder};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration for a courier run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project metadata.
    pub project: ProjectSection,
    /// Global template properties.
    pub properties: BTreeMap<String, String>,
    /// Upload targets, grouped by uploader kind.
    pub upload: UploadSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// ProjectSection
// ---------------------------------------------------------------------------

/// Project name and version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSection {
    /// Project name.
    pub name: String,
    /// Project version.
    pub version: String,
    /// Force snapshot detection on or off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<bool>,
    /// Force prerelease detection on or off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerelease: Option<bool>,
}

impl ProjectSection {
    /// Build the [`Project`], applying explicit snapshot/prerelease flags.
    #[must_use]
    pub fn to_project(&self) -> Project {
        let mut project = Project::new(self.name.as_str(), self.version.as_str());
        if let Some(snapshot) = self.snapshot {
            project = project.with_snapshot(snapshot);
        }
        if let Some(prerelease) = self.prerelease {
            project = project.with_prerelease(prerelease);
        }
        project
    }
}

// ---------------------------------------------------------------------------
// UploadSection
// ---------------------------------------------------------------------------

/// `[upload.*]` tables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UploadSection {
    /// SCP uploaders.
    pub scp: TransportSection,
    /// SFTP uploaders.
    pub sftp: TransportSection,
}

impl UploadSection {
    /// The section for `kind`.
    #[must_use]
    pub fn transport(&self, kind: SshKind) -> &TransportSection {
        match kind {
            SshKind::Scp => &self.scp,
            SshKind::Sftp => &self.sftp,
        }
    }
}

/// Defaults plus named targets for one uploader kind.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransportSection {
    /// Values every target of this kind falls back to.
    pub defaults: SshUploaderBuilder,
    /// Named targets (`[upload.sftp.targets.<name>]`).
    pub targets: BTreeMap<String, SshUploaderBuilder>,
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"`, or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["courier_config=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}
