#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Release-upload configuration for courier.
//!
//! This crate resolves the effective connection and credential settings of
//! every upload target, and computes per-artifact upload paths and download
//! URLs from templates.
//!
//! # Usage
//!
//! ```rust,no_run
//! use courier_config::{Artifact, Config, Uploader};
//!
//! let resolved = Config::load(Some(std::path::Path::new("."))).unwrap();
//! let release = &resolved.release;
//! let artifact = Artifact::new("target/dist/app-1.0.0.tar.gz");
//! for uploader in release.enabled_uploaders() {
//!     let path = uploader.resolved_path(release.context(), &artifact).unwrap();
//!     println!("{} -> {path}", uploader.name());
//! }
//! ```
//!
//! # Configuration Precedence
//!
//! Files, from highest to lowest priority:
//!
//! 1. **Explicit** (`--config <file>`)
//! 2. **Workspace** (`{workspace}/.courier/config.toml`)
//! 3. **User** (`~/.courier/config.toml`, or `$COURIER_HOME/config.toml`)
//! 4. **Embedded defaults** (`defaults.toml` compiled into the binary)
//!
//! Within the merged file, each `[upload.<kind>.targets.<name>]` table is
//! filled in from `[upload.<kind>.defaults]`. At resolution time, credential
//! and connection fields consult the environment first:
//!
//! ```text
//! SFTP_MIRROR_HOST  >  SSH_MIRROR_HOST  >  SFTP_HOST  >  SSH_HOST  >  configured value
//! ```

/// Release artifacts and their template properties.
pub mod artifact;
/// Assembly of the raw configuration into a frozen release.
pub mod assemble;
/// Project metadata and the release-wide context.
pub mod context;
/// Merge, freeze, and masked introspection of configuration entities.
pub mod entity;
/// Environment lookup and the key cascade.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Layered configuration merging with source tracking.
pub mod merge;
/// Ordered property bags.
pub mod props;
/// Resolved configuration display and serialization.
pub mod show;
/// `{{identifier}}` template rendering.
pub mod template;
/// Configuration struct definitions.
pub mod types;
/// Upload targets.
pub mod uploader;
/// Configuration validation rules.
pub mod validate;

// Re-export primary types at the crate root.
pub use artifact::Artifact;
pub use assemble::Release;
pub use context::{Project, ReleaseContext};
pub use entity::{AsMap, Configurable, HIDE, UNSET};
pub use env::EnvSource;
pub use error::{ConfigError, ConfigResult};
pub use loader::LoadOptions;
pub use props::PropertyBag;
pub use show::{ResolvedConfig, ShowFormat};
pub use template::{TemplateError, resolve_template};
pub use types::*;
pub use uploader::{Active, SshKind, SshUploader, SshUploaderBuilder, Uploader};

impl Config {
    /// Load configuration with the full precedence chain, resolving against
    /// the process environment.
    ///
    /// See [`loader::load`] for the full algorithm.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the
    /// assembled release fails validation.
    pub fn load(workspace_root: Option<&std::path::Path>) -> ConfigResult<ResolvedConfig> {
        let mut options = LoadOptions::new();
        options.workspace_root = workspace_root.map(std::path::Path::to_path_buf);
        loader::load(&options)
    }

    /// Load configuration with explicit options.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the
    /// assembled release fails validation.
    pub fn load_with(options: &LoadOptions) -> ConfigResult<ResolvedConfig> {
        loader::load(options)
    }
}
