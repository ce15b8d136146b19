//! Release-wide context: project metadata, global properties and the
//! environment snapshot every resolution reads from.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::env::EnvSource;
use crate::props::PropertyBag;

/// Project metadata used for templating and `active` evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    name: String,
    version: String,
    snapshot: bool,
    prerelease: bool,
}

impl Project {
    /// Create a project, detecting snapshot and prerelease from the version.
    ///
    /// Build metadata after `+` is ignored. A version ending in `-SNAPSHOT`
    /// (any case) is a snapshot. Any other version carrying a `-` suffix
    /// (`1.0.0-rc.1`) is a prerelease.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        let version = version.into();
        let core = version.split('+').next().unwrap_or_default();
        let snapshot = core.to_ascii_uppercase().ends_with("-SNAPSHOT");
        let prerelease = !snapshot && core.contains('-');
        Self {
            name: name.into(),
            version,
            snapshot,
            prerelease,
        }
    }

    /// Override snapshot detection.
    #[must_use]
    pub fn with_snapshot(mut self, snapshot: bool) -> Self {
        self.snapshot = snapshot;
        self
    }

    /// Override prerelease detection.
    #[must_use]
    pub fn with_prerelease(mut self, prerelease: bool) -> Self {
        self.prerelease = prerelease;
        self
    }

    /// Project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Project version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Whether this is a snapshot build.
    #[must_use]
    pub fn is_snapshot(&self) -> bool {
        self.snapshot
    }

    /// Whether this is a prerelease.
    #[must_use]
    pub fn is_prerelease(&self) -> bool {
        self.prerelease
    }

    /// Flat `project*` properties plus a nested `project` bag.
    #[must_use]
    pub fn props(&self) -> PropertyBag {
        let mut bag = PropertyBag::new()
            .with("projectName", self.name.as_str())
            .with("projectVersion", self.version.as_str())
            .with("projectSnapshot", self.snapshot)
            .with("projectPrerelease", self.prerelease);
        bag.insert_bag(
            "project",
            PropertyBag::new()
                .with("name", self.name.as_str())
                .with("version", self.version.as_str())
                .with("snapshot", self.snapshot)
                .with("prerelease", self.prerelease),
        );
        bag
    }
}

/// Everything a release run resolves against.
#[derive(Clone)]
pub struct ReleaseContext {
    project: Project,
    properties: BTreeMap<String, String>,
    env: Arc<dyn EnvSource>,
}

impl ReleaseContext {
    /// Create a context over `project` reading from `env`.
    #[must_use]
    pub fn new(project: Project, env: Arc<dyn EnvSource>) -> Self {
        Self {
            project,
            properties: BTreeMap::new(),
            env,
        }
    }

    /// Add a global property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Replace the global property table.
    #[must_use]
    pub fn with_properties(mut self, properties: BTreeMap<String, String>) -> Self {
        self.properties = properties;
        self
    }

    /// The project.
    #[must_use]
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Configured global properties.
    #[must_use]
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// The environment snapshot.
    #[must_use]
    pub fn env(&self) -> &dyn EnvSource {
        self.env.as_ref()
    }

    /// Base template context: project properties overlaid by the global
    /// property table. Rebuilt on every call.
    #[must_use]
    pub fn full_props(&self) -> PropertyBag {
        let mut bag = self.project.props();
        bag.extend_strings(&self.properties);
        bag
    }
}

impl fmt::Debug for ReleaseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseContext")
            .field("project", &self.project)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}
