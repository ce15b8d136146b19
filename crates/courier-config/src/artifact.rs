//! Release artifacts and the properties derived from them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::props::PropertyBag;

/// Archive extensions made of more than one dot-separated part.
const COMPOUND_EXTENSIONS: &[&str] = &[".tar.gz", ".tar.bz2", ".tar.xz", ".tar.zst"];

/// A file to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    path: PathBuf,
    platform: Option<String>,
    group: Option<String>,
    version: Option<String>,
    extra_properties: BTreeMap<String, String>,
}

impl Artifact {
    /// Create an artifact for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            platform: None,
            group: None,
            version: None,
            extra_properties: BTreeMap::new(),
        }
    }

    /// Set the target platform (e.g. `linux-x86_64`).
    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Set the artifact group (e.g. `com.example`).
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Set the artifact version. Defaults to the project version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Add an artifact-level extra property.
    #[must_use]
    pub fn with_extra_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_properties.insert(key.into(), value.into());
        self
    }

    /// Path to the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Target platform, if any.
    #[must_use]
    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    /// Final path component, lossily converted to UTF-8.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Split the file name into stem and extension (with leading dot).
    ///
    /// `lib-1.0.tar.gz` splits into `("lib-1.0", ".tar.gz")`; a file without
    /// an extension has an empty one.
    #[must_use]
    pub fn split_extension(&self) -> (String, String) {
        let file_name = self.file_name();
        let lower = file_name.to_ascii_lowercase();

        if let Some(ext) = COMPOUND_EXTENSIONS.iter().find(|ext| lower.ends_with(**ext)) {
            let (stem, ext_part) = file_name.split_at(file_name.len().saturating_sub(ext.len()));
            return (stem.to_owned(), ext_part.to_owned());
        }

        match file_name.rfind('.') {
            Some(idx) if idx > 0 => {
                let (stem, ext) = file_name.split_at(idx);
                (stem.to_owned(), ext.to_owned())
            },
            _ => (file_name, String::new()),
        }
    }

    /// Copy `base` and overlay artifact-derived properties.
    ///
    /// Adds flat `artifact*` keys, a nested `artifact` bag with the same
    /// values, and each artifact extra property as `artifact<Key>`. The
    /// artifact version falls back to `projectVersion` from `base`.
    #[must_use]
    pub fn props(&self, base: &PropertyBag) -> PropertyBag {
        let mut bag = base.clone();

        let file_name = self.file_name();
        let (name, extension) = self.split_extension();
        let format = extension.trim_start_matches('.').to_owned();
        let version = self.version.clone().or_else(|| {
            base.get("projectVersion")
                .and_then(|v| v.as_str())
                .map(str::to_owned)
        });

        let mut nested = PropertyBag::new()
            .with("fileName", file_name.as_str())
            .with("name", name.as_str())
            .with("fileExtension", extension.as_str())
            .with("fileFormat", format.as_str());

        bag.insert("artifactFileName", file_name.as_str());
        bag.insert("artifactName", name.as_str());
        bag.insert("artifactFileExtension", extension.as_str());
        bag.insert("artifactFileFormat", format.as_str());

        if let Some(platform) = &self.platform {
            bag.insert("artifactPlatform", platform.as_str());
            nested.insert("platform", platform.as_str());
        }
        if let Some(group) = &self.group {
            bag.insert("artifactGroup", group.as_str());
            nested.insert("group", group.as_str());
        }
        if let Some(version) = &version {
            bag.insert("artifactVersion", version.as_str());
            nested.insert("version", version.as_str());
        }

        for (key, value) in &self.extra_properties {
            bag.insert(format!("artifact{}", capitalize(key)), value.as_str());
        }

        bag.insert_bag("artifact", nested);
        bag
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
