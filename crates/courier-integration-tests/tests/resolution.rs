//! End-to-end resolution: defaults fill down onto targets, the environment
//! cascade overrides configured values, and templates render per artifact.

mod common;

use courier_config::{Artifact, ConfigError, SshKind, TemplateError, Uploader};
use courier_test::{MockEnv, test_artifact};

const GLOBAL_HOST: &str = r#"
[project]
name = "lib"
version = "1.0"

[upload.sftp.defaults]
host = "a.example.com"
username = "deploy"

[upload.sftp.targets.mirror]
active = "always"
host = ""
path = "{{artifactFileName}}"
"#;

#[test]
fn test_blank_target_host_falls_back_to_defaults() {
    let env = MockEnv::new();
    let release = common::assemble(GLOBAL_HOST, &env);
    let mirror = release.uploader(SshKind::Sftp, "mirror").unwrap();

    assert_eq!(mirror.resolved_host(&env), "a.example.com");
    assert_eq!(
        mirror
            .resolved_path(release.context(), &test_artifact())
            .unwrap(),
        "lib-1.0.jar"
    );
}

#[test]
fn test_environment_cascade_order() {
    let env = MockEnv::new()
        .with_var("SSH_HOST", "ssh.example.com")
        .with_var("SFTP_HOST", "sftp.example.com");
    let release = common::assemble(GLOBAL_HOST, &env);
    let mirror = release.uploader(SshKind::Sftp, "mirror").unwrap();

    assert_eq!(mirror.resolved_host(&env), "sftp.example.com");

    env.set("SSH_MIRROR_HOST", "ssh-mirror.example.com");
    assert_eq!(mirror.resolved_host(&env), "ssh-mirror.example.com");

    env.set("SFTP_MIRROR_HOST", "sftp-mirror.example.com");
    env.clear_lookups();
    assert_eq!(mirror.resolved_host(&env), "sftp-mirror.example.com");
    assert_eq!(env.lookups(), vec!["SFTP_MIRROR_HOST"]);
}

#[test]
fn test_cascade_queries_every_tier_before_falling_back() {
    let env = MockEnv::new();
    let release = common::assemble(GLOBAL_HOST, &env);
    let mirror = release.uploader(SshKind::Sftp, "mirror").unwrap();

    env.clear_lookups();
    assert_eq!(mirror.resolved_username(&env), "deploy");
    assert_eq!(
        env.lookups(),
        vec![
            "SFTP_MIRROR_USERNAME",
            "SSH_MIRROR_USERNAME",
            "SFTP_USERNAME",
            "SSH_USERNAME",
        ]
    );
}

#[test]
fn test_blank_environment_value_is_skipped() {
    let env = MockEnv::new()
        .with_var("SFTP_MIRROR_HOST", "   ")
        .with_var("SSH_HOST", "ssh.example.com");
    let release = common::assemble(GLOBAL_HOST, &env);
    let mirror = release.uploader(SshKind::Sftp, "mirror").unwrap();

    assert_eq!(mirror.resolved_host(&env), "ssh.example.com");
}

#[test]
fn test_port_resolution() {
    let env = MockEnv::new();
    let release = common::assemble(GLOBAL_HOST, &env);
    let mirror = release.uploader(SshKind::Sftp, "mirror").unwrap();

    assert_eq!(mirror.resolved_port(&env).unwrap(), 22);

    env.set("SSH_PORT", "2222");
    assert_eq!(mirror.resolved_port(&env).unwrap(), 2222);

    env.set("SFTP_MIRROR_PORT", "abc");
    let err = mirror.resolved_port(&env).unwrap_err();
    match err {
        ConfigError::InvalidNumber { field, value } => {
            assert_eq!(field, "upload.sftp.mirror.port");
            assert_eq!(value, "abc");
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_invalid_port_fails_assembly() {
    let env = MockEnv::new().with_var("SSH_PORT", "70000");
    let err = common::assemble_err(GLOBAL_HOST, &env);
    assert!(matches!(err, ConfigError::InvalidNumber { .. }));
}

#[test]
fn test_template_layers() {
    let config = r#"
        [project]
        name = "app"
        version = "2.1.0"

        [properties]
        channel = "stable"
        bucket = "global"

        [upload.scp.targets.archive]
        active = "release"
        host = "archive.example.com"
        username = "ops"
        path = "/{{bucket}}/{{channel}}/{{projectVersion}}/{{artifactPlatform}}/{{artifactFileName}}"
        download_url = "https://{{bucket}}.example.com/{{artifact.name}}{{artifact.fileExtension}}"

        [upload.scp.targets.archive.extra_properties]
        bucket = "archive"
    "#;
    let release = common::assemble_plain(config);
    let archive = release.uploader(SshKind::Scp, "archive").unwrap();
    let artifact = Artifact::new("dist/app-2.1.0.tar.gz").with_platform("linux-x86_64");

    assert_eq!(
        archive.resolved_path(release.context(), &artifact).unwrap(),
        "/archive/stable/2.1.0/linux-x86_64/app-2.1.0.tar.gz"
    );
    assert_eq!(
        archive
            .resolved_download_url(release.context(), &artifact)
            .unwrap(),
        "https://archive.example.com/app-2.1.0.tar.gz"
    );
}

#[test]
fn test_unresolved_identifier_is_an_error() {
    let config = r#"
        [project]
        name = "app"
        version = "1.0.0"

        [upload.sftp.targets.mirror]
        active = "always"
        host = "a.example.com"
        username = "deploy"
        path = "/srv/{{artifactPlatform}}/{{artifactFileName}}"
    "#;
    let release = common::assemble_plain(config);
    let mirror = release.uploader(SshKind::Sftp, "mirror").unwrap();

    let err = mirror
        .resolved_path(release.context(), &test_artifact())
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Template(TemplateError::Unresolved { ref identifier })
            if identifier == "artifactPlatform"
    ));

    let err = mirror
        .resolved_download_url(release.context(), &test_artifact())
        .unwrap_err();
    assert!(matches!(err, ConfigError::MissingTemplate { .. }));
}

#[test]
fn test_activation_follows_project_version() {
    let config = r#"
        [project]
        name = "app"
        version = "1.0.0-SNAPSHOT"

        [upload.sftp.defaults]
        host = "a.example.com"
        username = "deploy"
        path = "/srv/{{artifactFileName}}"

        [upload.sftp.targets.nightly]
        active = "snapshot"

        [upload.sftp.targets.stable]
        active = "release"

        [upload.sftp.targets.off]
    "#;
    let release = common::assemble_plain(config);
    let enabled: Vec<&str> = release.enabled_uploaders().map(|u| u.name()).collect();
    assert_eq!(enabled, vec!["nightly"]);
    assert_eq!(release.uploaders().len(), 3);
}

#[test]
fn test_disabled_target_skips_validation() {
    let config = r#"
        [project]
        name = "app"
        version = "1.0.0"

        [upload.scp.targets.incomplete]
        active = "never"
    "#;
    let release = common::assemble_plain(config);
    assert_eq!(release.enabled_uploaders().count(), 0);
}

#[test]
fn test_enabled_target_without_host_fails() {
    let config = r#"
        [project]
        name = "app"
        version = "1.0.0"

        [upload.scp.targets.incomplete]
        active = "always"
        username = "ops"
        path = "/x"
    "#;
    let err = common::assemble_err(config, &MockEnv::new());
    match err {
        ConfigError::ValidationError { field, .. } => {
            assert_eq!(field, "upload.scp.incomplete.host");
        },
        other => panic!("unexpected error: {other:?}"),
    }

    let env = MockEnv::new().with_var("SCP_INCOMPLETE_HOST", "h.example.com");
    let release = common::assemble(config, &env);
    assert_eq!(release.enabled_uploaders().count(), 1);
}
