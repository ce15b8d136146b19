//! Config file discovery and layered loading.
//!
//! Implements the `Config::load()` algorithm:
//! 1. Parse `defaults.toml` → base
//! 2. Merge `~/.courier/config.toml` (user), or `$COURIER_HOME/config.toml`
//! 3. Merge `{workspace}/.courier/config.toml` (workspace)
//! 4. Merge the file given with `--config` (explicit)
//! 5. Deserialize merged tree → `Config`
//! 6. Assemble: merge targets onto defaults, freeze, validate
//! 7. Return `ResolvedConfig`

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::env::{EnvSource, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources, deep_merge_tracking, record_leaves};
use crate::show::ResolvedConfig;
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// Where to look for configuration and which environment to resolve against.
#[derive(Clone, Default)]
pub struct LoadOptions {
    /// Project root. If `None`, the workspace layer is skipped.
    pub workspace_root: Option<PathBuf>,
    /// Explicit config file, merged last. Must exist.
    pub config_file: Option<PathBuf>,
    /// Courier home override, treated as the `.courier` directory itself.
    pub home_override: Option<PathBuf>,
    /// Environment snapshot. Defaults to the process environment.
    pub env: Option<Arc<dyn EnvSource>>,
}

impl LoadOptions {
    /// Options with every layer at its default location.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the workspace root.
    #[must_use]
    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    /// Set the explicit config file.
    #[must_use]
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Set the courier home override.
    #[must_use]
    pub fn with_home_override(mut self, dir: impl Into<PathBuf>) -> Self {
        self.home_override = Some(dir.into());
        self
    }

    /// Resolve against `env` instead of the process environment.
    #[must_use]
    pub fn with_env(mut self, env: Arc<dyn EnvSource>) -> Self {
        self.env = Some(env);
        self
    }
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("workspace_root", &self.workspace_root)
            .field("config_file", &self.config_file)
            .field("home_override", &self.home_override)
            .field("has_env", &self.env.is_some())
            .finish()
    }
}

/// Load the configuration with layered file precedence and assemble it.
///
/// # Errors
///
/// Returns a [`ConfigError`] if any config file is unreadable or malformed,
/// or if the assembled release fails validation.
pub fn load(options: &LoadOptions) -> ConfigResult<ResolvedConfig> {
    let env: Arc<dyn EnvSource> = match &options.env {
        Some(env) => Arc::clone(env),
        None => Arc::new(collect_env_vars()),
    };

    // 1. Parse embedded defaults.
    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;

    let mut field_sources = FieldSources::new();
    let mut loaded_files = Vec::new();
    record_leaves(&merged, "", &ConfigLayer::Defaults, &mut field_sources);

    // 2. User config.
    if let Some((overlay, path)) = load_user_config(options, env.as_ref())? {
        deep_merge_tracking(
            &mut merged,
            &overlay,
            "",
            &ConfigLayer::User,
            &mut field_sources,
        );
        info!(path = %path.display(), "loaded user config");
        loaded_files.push(path.display().to_string());
    }

    // 3. Workspace config ({workspace}/.courier/config.toml).
    if let Some(ws_root) = &options.workspace_root {
        let ws_path = ws_root.join(".courier").join("config.toml");
        if let Some(overlay) = try_load_file(&ws_path)? {
            deep_merge_tracking(
                &mut merged,
                &overlay,
                "",
                &ConfigLayer::Workspace,
                &mut field_sources,
            );
            info!(path = %ws_path.display(), "loaded workspace config");
            loaded_files.push(ws_path.display().to_string());
        }
    }

    // 4. Explicit config file.
    if let Some(path) = &options.config_file {
        let overlay = try_load_file(path)?.ok_or_else(|| ConfigError::ReadError {
            path: path.display().to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })?;
        deep_merge_tracking(
            &mut merged,
            &overlay,
            "",
            &ConfigLayer::Explicit,
            &mut field_sources,
        );
        info!(path = %path.display(), "loaded explicit config");
        loaded_files.push(path.display().to_string());
    }

    // 5. Deserialize.
    let config: Config =
        merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError {
                path: "<merged config>".to_owned(),
                source: e,
            })?;

    // 6. Assemble and validate.
    let logging = config.logging.clone();
    let release = config.assemble(env)?;
    debug!(files = loaded_files.len(), "configuration resolved");

    Ok(ResolvedConfig {
        release,
        logging,
        field_sources,
        loaded_files,
    })
}

/// The user-level config: `{home_override}/config.toml` when overridden,
/// else `~/.courier/config.toml`, else `$COURIER_HOME/config.toml`.
fn load_user_config(
    options: &LoadOptions,
    env: &dyn EnvSource,
) -> ConfigResult<Option<(toml::Value, PathBuf)>> {
    if let Some(dir) = &options.home_override {
        let path = dir.join("config.toml");
        return Ok(try_load_file(&path)?.map(|overlay| (overlay, path)));
    }

    let home_dir = match home_directory() {
        Ok(dir) => Some(dir),
        Err(e) => {
            debug!(error = %e, "skipping ~/.courier");
            None
        },
    };
    discover_user_config(home_dir.as_deref(), env)
}

/// `~/.courier/config.toml` when it exists, else the config in a validated
/// `$COURIER_HOME`. Without a home directory `$COURIER_HOME` is required.
fn discover_user_config(
    home_dir: Option<&Path>,
    env: &dyn EnvSource,
) -> ConfigResult<Option<(toml::Value, PathBuf)>> {
    if let Some(home) = home_dir {
        let user_path = home.join(".courier").join("config.toml");
        if let Some(overlay) = try_load_file(&user_path)? {
            return Ok(Some((overlay, user_path)));
        }
    }

    let Some(raw) = env.get("COURIER_HOME").filter(|h| !h.trim().is_empty()) else {
        return match home_dir {
            Some(_) => Ok(None),
            None => Err(ConfigError::NoHomeDir),
        };
    };

    match validate_courier_home(&raw, home_dir) {
        Some(dir) => {
            let path = dir.join("config.toml");
            Ok(try_load_file(&path)?.map(|overlay| (overlay, path)))
        },
        None => {
            warn!(
                path = %raw,
                "ignoring COURIER_HOME: not a directory owned by the home directory's owner"
            );
            Ok(None)
        },
    }
}

/// Canonicalize a `$COURIER_HOME` path, requiring a directory. On Unix it
/// must also share the owner of `home_dir`, when one is known.
fn validate_courier_home(raw_path: &str, home_dir: Option<&Path>) -> Option<PathBuf> {
    let canonical = PathBuf::from(raw_path).canonicalize().ok()?;
    if !canonical.is_dir() {
        return None;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        if let Some(home) = home_dir
            && canonical.metadata().ok()?.uid() != home.metadata().ok()?.uid()
        {
            return None;
        }
    }

    #[cfg(not(unix))]
    let _ = home_dir;

    Some(canonical)
}

/// Try to load a file, returning `None` if the file doesn't exist.
///
/// Uses a single read operation, with no separate exists/metadata checks.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };

    if content.len() as u64 > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {} byte limit",
                content.len(),
                MAX_CONFIG_FILE_SIZE
            ),
        });
    }

    let value: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(Some(value))
}

/// Determine the user's home directory.
fn home_directory() -> ConfigResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDir)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::uploader::SshKind;

    fn empty_env() -> Arc<dyn EnvSource> {
        Arc::new(HashMap::<String, String>::new())
    }

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_defaults_parse() {
        let config: Config = toml::from_str(DEFAULTS_TOML).unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(validate::validate(&config).is_ok());
    }

    #[test]
    fn test_load_without_files() {
        let home = tempfile::tempdir().unwrap();
        let options = LoadOptions::new()
            .with_home_override(home.path())
            .with_env(empty_env());

        let resolved = load(&options).unwrap();
        assert!(resolved.loaded_files.is_empty());
        assert!(resolved.release.uploaders().is_empty());
        assert_eq!(
            resolved.field_sources.get("logging.level"),
            Some(&ConfigLayer::Defaults)
        );
    }

    #[test]
    fn test_workspace_overrides_user() {
        let home = tempfile::tempdir().unwrap();
        let ws = tempfile::tempdir().unwrap();
        write(
            &home.path().join("config.toml"),
            r#"
            [project]
            name = "app"
            version = "1.0.0"

            [upload.sftp.defaults]
            host = "user.example.com"
            username = "deploy"
            "#,
        );
        write(
            &ws.path().join(".courier").join("config.toml"),
            r#"
            [upload.sftp.defaults]
            host = "workspace.example.com"

            [upload.sftp.targets.mirror]
            path = "/srv/{{artifactFileName}}"
            "#,
        );

        let options = LoadOptions::new()
            .with_home_override(home.path())
            .with_workspace_root(ws.path())
            .with_env(empty_env());
        let resolved = load(&options).unwrap();

        assert_eq!(resolved.loaded_files.len(), 2);
        let mirror = resolved.release.uploader(SshKind::Sftp, "mirror").unwrap();
        let env = resolved.release.context().env();
        assert_eq!(mirror.resolved_host(env), "workspace.example.com");
        assert_eq!(mirror.resolved_username(env), "deploy");
        assert_eq!(
            resolved.field_sources["upload.sftp.defaults.host"],
            ConfigLayer::Workspace
        );
        assert_eq!(
            resolved.field_sources["upload.sftp.defaults.username"],
            ConfigLayer::User
        );
    }

    #[test]
    fn test_explicit_file_wins() {
        let home = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        write(
            &home.path().join("config.toml"),
            "[logging]\nlevel = \"warn\"\n",
        );
        let explicit = dir.path().join("release.toml");
        write(&explicit, "[logging]\nlevel = \"trace\"\n");

        let options = LoadOptions::new()
            .with_home_override(home.path())
            .with_config_file(&explicit)
            .with_env(empty_env());
        let resolved = load(&options).unwrap();

        assert_eq!(resolved.logging.level, "trace");
        assert_eq!(
            resolved.field_sources["logging.level"],
            ConfigLayer::Explicit
        );
        assert_eq!(
            resolved.loaded_files.last().unwrap(),
            &explicit.display().to_string()
        );
    }

    #[test]
    fn test_explicit_file_missing() {
        let home = tempfile::tempdir().unwrap();
        let options = LoadOptions::new()
            .with_home_override(home.path())
            .with_config_file(home.path().join("nope.toml"))
            .with_env(empty_env());
        assert!(matches!(
            load(&options),
            Err(ConfigError::ReadError { .. })
        ));
    }

    #[test]
    fn test_invalid_toml() {
        let home = tempfile::tempdir().unwrap();
        write(&home.path().join("config.toml"), "[project\nname = ");
        let options = LoadOptions::new()
            .with_home_override(home.path())
            .with_env(empty_env());
        assert!(matches!(
            load(&options),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let home = tempfile::tempdir().unwrap();
        write(
            &home.path().join("config.toml"),
            "[upload.sftp.defaults]\nport = \"ssh\"\n",
        );
        let options = LoadOptions::new()
            .with_home_override(home.path())
            .with_env(empty_env());
        assert!(matches!(
            load(&options),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_courier_home_without_home_dir() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("config.toml"),
            "[project]\nname = \"app\"\nversion = \"3.0.0\"\n",
        );
        let env: HashMap<String, String> = [(
            "COURIER_HOME".to_owned(),
            dir.path().display().to_string(),
        )]
        .into();

        let (overlay, path) = discover_user_config(None, &env).unwrap().unwrap();
        assert_eq!(overlay["project"]["version"].as_str(), Some("3.0.0"));
        assert_eq!(path, dir.path().canonicalize().unwrap().join("config.toml"));
    }

    #[test]
    fn test_no_home_dir_and_no_courier_home() {
        let env = HashMap::<String, String>::new();
        assert!(matches!(
            discover_user_config(None, &env),
            Err(ConfigError::NoHomeDir)
        ));
    }

    #[test]
    fn test_home_config_preferred_over_courier_home() {
        let home = tempfile::tempdir().unwrap();
        write(
            &home.path().join(".courier").join("config.toml"),
            "[project]\nname = \"home\"\n",
        );
        let alt = tempfile::tempdir().unwrap();
        write(&alt.path().join("config.toml"), "[project]\nname = \"alt\"\n");
        let env: HashMap<String, String> = [(
            "COURIER_HOME".to_owned(),
            alt.path().display().to_string(),
        )]
        .into();

        let (overlay, _) = discover_user_config(Some(home.path()), &env)
            .unwrap()
            .unwrap();
        assert_eq!(overlay["project"]["name"].as_str(), Some("home"));
    }

    #[test]
    fn test_courier_home_falls_back_when_home_has_no_config() {
        let home = tempfile::tempdir().unwrap();
        let alt = tempfile::tempdir().unwrap();
        write(&alt.path().join("config.toml"), "[project]\nname = \"alt\"\n");
        let env: HashMap<String, String> = [(
            "COURIER_HOME".to_owned(),
            alt.path().display().to_string(),
        )]
        .into();

        let (overlay, _) = discover_user_config(Some(home.path()), &env)
            .unwrap()
            .unwrap();
        assert_eq!(overlay["project"]["name"].as_str(), Some("alt"));
    }

    #[test]
    fn test_courier_home_must_be_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        write(&file, "");

        assert!(validate_courier_home(file.to_str().unwrap(), Some(dir.path())).is_none());
        assert!(validate_courier_home("/nonexistent/courier-home", None).is_none());
        assert_eq!(
            validate_courier_home(dir.path().to_str().unwrap(), Some(dir.path())),
            Some(dir.path().canonicalize().unwrap())
        );
    }

    #[test]
    fn test_try_load_file_missing() {
        let result = try_load_file(Path::new("/nonexistent/config.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_oversized_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("huge.toml");
        let data = "x = \"".to_owned() + &"a".repeat(1_100_000) + "\"";
        std::fs::write(&file_path, data).unwrap();

        let result = try_load_file(&file_path);
        assert!(
            matches!(result, Err(ConfigError::ValidationError { .. })),
            "Expected ValidationError for oversized config, got: {result:?}"
        );
    }

    #[test]
    fn test_options_debug_hides_env() {
        let options = LoadOptions::new().with_env(empty_env());
        let debug_str = format!("{options:?}");
        assert!(debug_str.contains("has_env: true"));
    }
}
