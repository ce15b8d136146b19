//! Upload targets.
//!
//! An uploader describes one remote destination. Settings shared by every
//! uploader kind live in [`UploaderBaseBuilder`] / [`UploaderBase`]; the SSH
//! family (SCP, SFTP) adds credentials and path templates in [`ssh`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;
use crate::context::{Project, ReleaseContext};
use crate::entity::{AsMap, Configurable, FillDown};
use crate::error::ConfigResult;
use crate::props::PropertyBag;

pub mod ssh;

pub use ssh::{SshField, SshKind, SshUploader, SshUploaderBuilder};

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u32 = 20;

/// Default read timeout in seconds.
pub const DEFAULT_READ_TIMEOUT_SECS: u32 = 60;

/// When an uploader takes part in a release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Active {
    /// Never runs.
    #[default]
    Never,
    /// Always runs.
    Always,
    /// Runs for final releases only.
    Release,
    /// Runs for prereleases only.
    Prerelease,
    /// Runs for final releases and prereleases, not snapshots.
    ReleasePrerelease,
    /// Runs for snapshots only.
    Snapshot,
}

impl Active {
    /// Whether this setting enables the uploader for `project`.
    #[must_use]
    pub fn check(self, project: &Project) -> bool {
        match self {
            Self::Never => false,
            Self::Always => true,
            Self::Release => !project.is_snapshot() && !project.is_prerelease(),
            Self::Prerelease => project.is_prerelease(),
            Self::ReleasePrerelease => !project.is_snapshot(),
            Self::Snapshot => project.is_snapshot(),
        }
    }

    /// Config-file spelling of this value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Always => "always",
            Self::Release => "release",
            Self::Prerelease => "prerelease",
            Self::ReleasePrerelease => "release_prerelease",
            Self::Snapshot => "snapshot",
        }
    }
}

impl fmt::Display for Active {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings every uploader kind carries (mutable form).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UploaderBaseBuilder {
    /// When the uploader runs. Defaults to [`Active::Never`].
    pub active: Option<Active>,
    /// Connect timeout in seconds.
    pub connect_timeout: Option<u32>,
    /// Read timeout in seconds.
    pub read_timeout: Option<u32>,
    /// Whether distribution artifacts are uploaded.
    pub artifacts: Option<bool>,
    /// Whether standalone release files are uploaded.
    pub files: Option<bool>,
    /// Whether signatures are uploaded.
    pub signatures: Option<bool>,
    /// Extra template properties, overlaid on every path/URL context.
    pub extra_properties: BTreeMap<String, String>,
}

impl Configurable for UploaderBaseBuilder {
    type Frozen = UploaderBase;

    fn merge(&mut self, other: &Self) {
        self.active.fill_down(&other.active);
        self.connect_timeout.fill_down(&other.connect_timeout);
        self.read_timeout.fill_down(&other.read_timeout);
        self.artifacts.fill_down(&other.artifacts);
        self.files.fill_down(&other.files);
        self.signatures.fill_down(&other.signatures);
        self.extra_properties.fill_down(&other.extra_properties);
    }

    fn freeze(self) -> UploaderBase {
        UploaderBase {
            active: self.active.unwrap_or_default(),
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
            read_timeout: self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT_SECS),
            artifacts: self.artifacts.unwrap_or(true),
            files: self.files.unwrap_or(true),
            signatures: self.signatures.unwrap_or(true),
            extra_properties: self.extra_properties,
        }
    }
}

/// Frozen settings shared by every uploader kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploaderBase {
    active: Active,
    connect_timeout: u32,
    read_timeout: u32,
    artifacts: bool,
    files: bool,
    signatures: bool,
    extra_properties: BTreeMap<String, String>,
}

impl UploaderBase {
    /// When the uploader runs.
    #[must_use]
    pub fn active(&self) -> Active {
        self.active
    }

    /// Connect timeout in seconds.
    #[must_use]
    pub fn connect_timeout(&self) -> u32 {
        self.connect_timeout
    }

    /// Read timeout in seconds.
    #[must_use]
    pub fn read_timeout(&self) -> u32 {
        self.read_timeout
    }

    /// Whether distribution artifacts are uploaded.
    #[must_use]
    pub fn artifacts(&self) -> bool {
        self.artifacts
    }

    /// Whether standalone release files are uploaded.
    #[must_use]
    pub fn files(&self) -> bool {
        self.files
    }

    /// Whether signatures are uploaded.
    #[must_use]
    pub fn signatures(&self) -> bool {
        self.signatures
    }

    /// Extra template properties.
    #[must_use]
    pub fn extra_properties(&self) -> &BTreeMap<String, String> {
        &self.extra_properties
    }

    /// Write the shared entries of an `as_map` bag.
    pub(crate) fn write_map(&self, enabled: bool, bag: &mut PropertyBag) {
        bag.insert("enabled", enabled);
        bag.insert("active", self.active.as_str());
        bag.insert("connect_timeout", self.connect_timeout);
        bag.insert("read_timeout", self.read_timeout);
        bag.insert("artifacts", self.artifacts);
        bag.insert("files", self.files);
        bag.insert("signatures", self.signatures);
    }
}

/// A frozen upload destination, as seen by the pipeline and transport layers.
pub trait Uploader: AsMap + Send + Sync {
    /// Uploader type (`scp`, `sftp`).
    fn kind_name(&self) -> &'static str;

    /// Target name as configured.
    fn name(&self) -> &str;

    /// Shared uploader settings.
    fn base(&self) -> &UploaderBase;

    /// Whether the uploader takes part in a release of `project`.
    fn is_enabled(&self, project: &Project) -> bool {
        self.base().active().check(project)
    }

    /// Remote path for `artifact`.
    ///
    /// # Errors
    ///
    /// Returns an error if no path template is configured or it fails to render.
    fn resolved_path(&self, ctx: &ReleaseContext, artifact: &Artifact) -> ConfigResult<String>;

    /// Public download URL for `artifact`.
    ///
    /// # Errors
    ///
    /// Returns an error if no URL template is configured or it fails to render.
    fn resolved_download_url(
        &self,
        ctx: &ReleaseContext,
        artifact: &Artifact,
    ) -> ConfigResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_check() {
        let release = Project::new("app", "1.0.0");
        let rc = Project::new("app", "1.0.0-rc.1");
        let snapshot = Project::new("app", "1.0.0-SNAPSHOT");

        assert!(!Active::Never.check(&release));
        assert!(Active::Always.check(&snapshot));

        assert!(Active::Release.check(&release));
        assert!(!Active::Release.check(&rc));
        assert!(!Active::Release.check(&snapshot));

        assert!(Active::Prerelease.check(&rc));
        assert!(!Active::Prerelease.check(&release));

        assert!(Active::ReleasePrerelease.check(&release));
        assert!(Active::ReleasePrerelease.check(&rc));
        assert!(!Active::ReleasePrerelease.check(&snapshot));

        assert!(Active::Snapshot.check(&snapshot));
        assert!(!Active::Snapshot.check(&release));

        let tagged = Project::new("app", "1.0.0+build-5");
        assert!(Active::Release.check(&tagged));
        assert!(!Active::Prerelease.check(&tagged));
    }

    #[test]
    fn test_active_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            active: Active,
        }
        let w: Wrapper = toml::from_str("active = \"release_prerelease\"").unwrap();
        assert_eq!(w.active, Active::ReleasePrerelease);
    }

    #[test]
    fn test_base_freeze_defaults() {
        let base = UploaderBaseBuilder::default().freeze();
        assert_eq!(base.active(), Active::Never);
        assert_eq!(base.connect_timeout(), DEFAULT_CONNECT_TIMEOUT_SECS);
        assert_eq!(base.read_timeout(), DEFAULT_READ_TIMEOUT_SECS);
        assert!(base.artifacts());
        assert!(base.files());
        assert!(base.signatures());
        assert!(base.extra_properties().is_empty());
    }

    #[test]
    fn test_base_merge_fills_down() {
        let mut target = UploaderBaseBuilder {
            active: Some(Active::Always),
            files: Some(false),
            ..Default::default()
        };
        target
            .extra_properties
            .insert("bucket".to_owned(), "mine".to_owned());

        let mut defaults = UploaderBaseBuilder {
            active: Some(Active::Never),
            connect_timeout: Some(5),
            files: Some(true),
            ..Default::default()
        };
        defaults
            .extra_properties
            .insert("bucket".to_owned(), "shared".to_owned());
        defaults
            .extra_properties
            .insert("region".to_owned(), "eu".to_owned());

        let base = target.merged(&defaults).freeze();

        assert_eq!(base.active(), Active::Always);
        assert_eq!(base.connect_timeout(), 5);
        assert!(!base.files());
        assert_eq!(base.extra_properties()["bucket"], "mine");
        assert_eq!(base.extra_properties()["region"], "eu");
    }
}
