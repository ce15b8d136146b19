//! Layered file loading through a temporary home and workspace.

use courier_config::{ConfigError, LoadOptions, ShowFormat, SshKind, Uploader, loader};
use courier_test::{MockEnv, SAMPLE_CONFIG, TestWorkspace, test_artifact};

#[test]
fn test_workspace_overrides_user() {
    let ws = TestWorkspace::new();
    ws.write_user_config(SAMPLE_CONFIG);
    ws.write_workspace_config(
        r#"
        [properties]
        channel = "beta"

        [upload.sftp.defaults]
        host = "b.example.com"
        "#,
    );

    let resolved = ws.load(MockEnv::new()).unwrap();
    let release = &resolved.release;
    let mirror = release.uploader(SshKind::Sftp, "mirror").unwrap();

    assert_eq!(resolved.loaded_files.len(), 2);
    assert_eq!(mirror.resolved_host(release.context().env()), "b.example.com");
    assert_eq!(
        mirror.resolved_path(release.context(), &test_artifact()).unwrap(),
        "/srv/beta/lib-1.0.jar"
    );
}

#[test]
fn test_explicit_file_wins() {
    let ws = TestWorkspace::new();
    ws.write_workspace_config(SAMPLE_CONFIG);
    let explicit = ws.write_file(
        "release.toml",
        r#"
        [project]
        version = "3.0.0"
        "#,
    );

    let options = ws.options(MockEnv::new()).with_config_file(&explicit);
    let resolved = loader::load(&options).unwrap();

    assert_eq!(resolved.release.context().project().version(), "3.0.0");
    assert_eq!(resolved.release.context().project().name(), "app");
    assert_eq!(resolved.loaded_files.len(), 2);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let ws = TestWorkspace::new();
    let options = ws
        .options(MockEnv::new())
        .with_config_file(ws.root().join("nope.toml"));
    assert!(loader::load(&options).is_err());
}

#[test]
fn test_malformed_workspace_file() {
    let ws = TestWorkspace::new();
    ws.write_workspace_config("[project\nname = ");

    let err = ws.load(MockEnv::new()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn test_empty_layers_use_defaults() {
    let ws = TestWorkspace::new();
    let resolved = ws.load(MockEnv::new()).unwrap();

    assert!(resolved.loaded_files.is_empty());
    assert!(resolved.release.uploaders().is_empty());
    assert_eq!(resolved.logging.level, "info");
    assert_eq!(resolved.logging.format, "compact");
}

#[test]
fn test_show_annotates_sources() {
    let ws = TestWorkspace::new();
    ws.write_user_config(SAMPLE_CONFIG);
    ws.write_workspace_config("[logging]\nlevel = \"debug\"\n");

    let resolved = ws.load(MockEnv::new()).unwrap();
    let toml = resolved.show(ShowFormat::Toml, None).unwrap();

    assert!(toml.contains("# [workspace (.courier/config.toml)]"));
    assert!(toml.contains("via sftp defaults"));
    assert!(toml.contains("# [defaults]"));

    let json = resolved.show(ShowFormat::Json, Some("logging")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["level"], "debug");
}

#[test]
fn test_load_options_default_to_no_overrides() {
    let options = LoadOptions::new();
    assert!(options.workspace_root.is_none());
    assert!(options.config_file.is_none());
    assert!(options.env.is_none());
}
