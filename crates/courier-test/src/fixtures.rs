//! Test fixtures for common types.

use std::collections::HashMap;
use std::sync::Arc;

use courier_config::{
    Active, Artifact, Configurable, EnvSource, Project, ReleaseContext, SshKind, SshUploader,
    SshUploaderBuilder,
};

/// Project `app` at release version `1.0.0`.
#[must_use]
pub fn test_project() -> Project {
    Project::new("app", "1.0.0")
}

/// Project `app` at `1.0.0-SNAPSHOT`.
#[must_use]
pub fn test_snapshot_project() -> Project {
    Project::new("app", "1.0.0-SNAPSHOT")
}

/// Release context over [`test_project`] with an empty environment.
#[must_use]
pub fn test_context() -> ReleaseContext {
    ReleaseContext::new(test_project(), Arc::new(HashMap::<String, String>::new()))
}

/// Release context over [`test_project`] reading from `env`.
#[must_use]
pub fn test_context_with(env: impl EnvSource + 'static) -> ReleaseContext {
    ReleaseContext::new(test_project(), Arc::new(env))
}

/// The artifact `build/libs/lib-1.0.jar`.
#[must_use]
pub fn test_artifact() -> Artifact {
    Artifact::new("build/libs/lib-1.0.jar")
}

/// An artifact with the given file name.
#[must_use]
pub fn test_artifact_named(file_name: &str) -> Artifact {
    Artifact::new(format!("build/dist/{file_name}"))
}

/// An always-active SFTP target named `name` with host, username and path set.
#[must_use]
pub fn test_sftp_builder(name: &str) -> SshUploaderBuilder {
    let mut builder = SshUploaderBuilder {
        host: Some("a.example.com".to_owned()),
        username: Some("deploy".to_owned()),
        path: Some("/srv/{{projectName}}/{{artifactFileName}}".to_owned()),
        download_url: Some("https://a.example.com/{{artifactFileName}}".to_owned()),
        ..SshUploaderBuilder::new(SshKind::Sftp, name)
    };
    builder.base.active = Some(Active::Always);
    builder
}

/// Frozen form of [`test_sftp_builder`].
#[must_use]
pub fn test_sftp_uploader(name: &str) -> SshUploader {
    test_sftp_builder(name).freeze()
}

/// A small but complete configuration document.
pub const SAMPLE_CONFIG: &str = r#"
[project]
name = "app"
version = "1.0.0"

[properties]
channel = "stable"

[upload.sftp.defaults]
host = "a.example.com"
username = "deploy"

[upload.sftp.targets.mirror]
active = "always"
path = "/srv/{{channel}}/{{artifactFileName}}"
download_url = "https://a.example.com/{{channel}}/{{artifactFileName}}"

[upload.scp.targets.archive]
host = "archive.example.com"
username = "ops"
path = "/archive/{{projectVersion}}/{{artifactFileName}}"
"#;
