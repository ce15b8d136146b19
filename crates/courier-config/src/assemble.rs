//! Turning a raw [`Config`] into a frozen [`Release`].

use std::sync::Arc;

use tracing::debug;

use crate::context::ReleaseContext;
use crate::entity::{AsMap, Configurable};
use crate::env::EnvSource;
use crate::error::ConfigResult;
use crate::props::PropertyBag;
use crate::types::{Config, UploadSection};
use crate::uploader::{SshKind, SshUploader, Uploader};
use crate::validate;

/// A fully assembled release: the context every resolution reads from and
/// every uploader in frozen form.
#[derive(Debug, Clone)]
pub struct Release {
    context: ReleaseContext,
    uploaders: Vec<Arc<SshUploader>>,
}

impl Release {
    /// The release context.
    #[must_use]
    pub fn context(&self) -> &ReleaseContext {
        &self.context
    }

    /// Every configured uploader, ordered by kind then name.
    #[must_use]
    pub fn uploaders(&self) -> &[Arc<SshUploader>] {
        &self.uploaders
    }

    /// Look up an uploader by kind and name.
    #[must_use]
    pub fn uploader(&self, kind: SshKind, name: &str) -> Option<&Arc<SshUploader>> {
        self.uploaders
            .iter()
            .find(|u| u.kind() == kind && u.name() == name)
    }

    /// Uploaders whose `active` setting matches the project.
    pub fn enabled_uploaders(&self) -> impl Iterator<Item = &Arc<SshUploader>> {
        let project = self.context.project();
        self.uploaders.iter().filter(move |u| u.is_enabled(project))
    }

    /// Masked view of every uploader, grouped by kind.
    ///
    /// Kinds with nothing to show are omitted.
    ///
    /// # Errors
    ///
    /// Returns an error if an uploader's displayed fields fail to resolve.
    pub fn as_map(&self, full: bool) -> ConfigResult<PropertyBag> {
        let mut bag = PropertyBag::new();
        for kind in SshKind::ALL {
            let mut group = PropertyBag::new();
            for uploader in self.uploaders.iter().filter(|u| u.kind() == kind) {
                group.extend(&uploader.as_map(full, &self.context)?);
            }
            if !group.is_empty() {
                bag.insert_bag(kind.as_str(), group);
            }
        }
        Ok(bag)
    }
}

impl Config {
    /// Merge every target onto its transport defaults, freeze, and validate.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`](crate::ConfigError) if the configuration or
    /// any enabled uploader fails validation.
    pub fn assemble(self, env: Arc<dyn EnvSource>) -> ConfigResult<Release> {
        validate::validate(&self)?;

        let context = ReleaseContext::new(self.project.to_project(), env)
            .with_properties(self.properties);
        let uploaders = freeze_uploaders(self.upload);

        for uploader in &uploaders {
            validate::validate_uploader(uploader, &context)?;
        }

        debug!(
            project = context.project().name(),
            version = context.project().version(),
            uploaders = uploaders.len(),
            "Assembled release"
        );

        Ok(Release { context, uploaders })
    }
}

fn freeze_uploaders(upload: UploadSection) -> Vec<Arc<SshUploader>> {
    let UploadSection { scp, sftp } = upload;
    let mut uploaders = Vec::new();

    for (kind, section) in [(SshKind::Scp, scp), (SshKind::Sftp, sftp)] {
        for (name, mut target) in section.targets {
            target.name = name;
            target.kind = kind;
            let uploader = target.merged(&section.defaults).freeze();
            debug!(
                kind = %kind,
                name = uploader.name(),
                active = %uploader.base().active(),
                "Merged target onto transport defaults"
            );
            uploaders.push(Arc::new(uploader));
        }
    }

    uploaders
}
