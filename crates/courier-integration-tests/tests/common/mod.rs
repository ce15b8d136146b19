//! Shared helpers for integration tests.

use courier_config::{Config, Release};
use courier_test::MockEnv;

/// Parse `source` and assemble it against `env`.
#[allow(dead_code)]
pub fn assemble(source: &str, env: &MockEnv) -> Release {
    let config: Config = toml::from_str(source).expect("config should parse");
    config
        .assemble(env.shared())
        .expect("config should assemble")
}

/// Parse `source` and assemble it against an empty environment.
#[allow(dead_code)]
pub fn assemble_plain(source: &str) -> Release {
    assemble(source, &MockEnv::new())
}

/// Assemble and return the error.
#[allow(dead_code)]
pub fn assemble_err(source: &str, env: &MockEnv) -> courier_config::ConfigError {
    let config: Config = toml::from_str(source).expect("config should parse");
    config
        .assemble(env.shared())
        .expect_err("assembly should fail")
}
