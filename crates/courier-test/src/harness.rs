//! Test harness helpers.

use std::path::{Path, PathBuf};

use courier_config::{ConfigResult, EnvSource, LoadOptions, ResolvedConfig, loader};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Set up test logging with the given filter.
///
/// Safe to call from several tests; only the first call installs a
/// subscriber.
pub fn setup_test_logging(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .try_init();
}

/// Set up test logging with the default filter (warn level).
pub fn setup_test_logging_default() {
    setup_test_logging("warn");
}

/// A throwaway courier home and project workspace.
///
/// Both directories are removed when the value is dropped.
#[derive(Debug)]
pub struct TestWorkspace {
    home: TempDir,
    workspace: TempDir,
}

impl TestWorkspace {
    /// Create empty home and workspace directories.
    ///
    /// # Panics
    ///
    /// Panics if a temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            home: TempDir::with_prefix("courier-home").expect("Failed to create temp directory"),
            workspace: TempDir::with_prefix("courier-ws")
                .expect("Failed to create temp directory"),
        }
    }

    /// The courier home directory (holds the user `config.toml`).
    #[must_use]
    pub fn home(&self) -> &Path {
        self.home.path()
    }

    /// The project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.workspace.path()
    }

    /// Write the user-level config file.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_user_config(&self, content: &str) -> PathBuf {
        write_file(&self.home().join("config.toml"), content)
    }

    /// Write the workspace-level config file.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_workspace_config(&self, content: &str) -> PathBuf {
        write_file(&self.root().join(".courier").join("config.toml"), content)
    }

    /// Write an arbitrary file under the project root.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        write_file(&self.root().join(relative), content)
    }

    /// Load options pointing at this home and workspace.
    #[must_use]
    pub fn options(&self, env: impl EnvSource + 'static) -> LoadOptions {
        LoadOptions::new()
            .with_home_override(self.home())
            .with_workspace_root(self.root())
            .with_env(std::sync::Arc::new(env))
    }

    /// Load the layered configuration against `env`.
    ///
    /// # Errors
    ///
    /// Returns whatever the loader returns.
    pub fn load(&self, env: impl EnvSource + 'static) -> ConfigResult<ResolvedConfig> {
        loader::load(&self.options(env))
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

fn write_file(path: &Path, content: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    std::fs::write(path, content).expect("Failed to write file");
    path.to_path_buf()
}
