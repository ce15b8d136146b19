//! Frozen uploaders are shared read-only across threads.

mod common;

use std::sync::Arc;
use std::thread;

use courier_config::{SshKind, Uploader};
use courier_test::{MockEnv, test_artifact_named};

const CONFIG: &str = r#"
[project]
name = "app"
version = "1.0.0"

[upload.sftp.targets.mirror]
active = "always"
host = "a.example.com"
username = "deploy"
path = "/srv/{{projectVersion}}/{{artifactFileName}}"
"#;

#[test]
fn test_parallel_resolution() {
    let env = MockEnv::new().with_var("SFTP_MIRROR_PORT", "2022");
    let release = Arc::new(common::assemble(CONFIG, &env));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let release = Arc::clone(&release);
            thread::spawn(move || {
                let mirror = release.uploader(SshKind::Sftp, "mirror").unwrap();
                let artifact = test_artifact_named(&format!("app-{i}.zip"));
                let path = mirror.resolved_path(release.context(), &artifact).unwrap();
                let port = mirror.resolved_port(release.context().env()).unwrap();
                (path, port)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let (path, port) = handle.join().unwrap();
        assert_eq!(path, format!("/srv/1.0.0/app-{i}.zip"));
        assert_eq!(port, 2022);
    }
}
