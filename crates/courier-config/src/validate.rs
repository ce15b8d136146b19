//! Configuration validation.
//!
//! [`validate`] checks the raw [`Config`] before assembly; [`validate_uploader`]
//! checks a frozen uploader against the environment it will run with.

use crate::context::ReleaseContext;
use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;
use crate::uploader::{SshKind, SshUploader, Uploader};

/// Upper bound for connect and read timeouts, in seconds.
pub const MAX_TIMEOUT_SECS: u32 = 300;

/// Validate a merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_targets(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_targets(config: &Config) -> ConfigResult<()> {
    for kind in SshKind::ALL {
        for name in config.upload.transport(kind).targets.keys() {
            if name.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    field: format!("upload.{kind}.targets"),
                    message: "target names must not be blank".to_owned(),
                });
            }
        }
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.level".to_owned(),
            message: format!(
                "unsupported log level '{}'; expected one of: {}",
                config.logging.level,
                valid_levels.join(", ")
            ),
        });
    }

    let valid_formats = ["pretty", "compact", "json", "full"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: format!(
                "unsupported log format '{}'; expected one of: {}",
                config.logging.format,
                valid_formats.join(", ")
            ),
        });
    }

    Ok(())
}

/// Validate a frozen uploader.
///
/// Disabled uploaders are skipped. For enabled ones, the resolved host and
/// username must be non-blank, a path template must be set, the resolved
/// port must be valid and both timeouts must lie in `1..=MAX_TIMEOUT_SECS`.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate_uploader(uploader: &SshUploader, ctx: &ReleaseContext) -> ConfigResult<()> {
    if !uploader.is_enabled(ctx.project()) {
        return Ok(());
    }
    let env = ctx.env();

    if uploader.resolved_host(env).trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: uploader.field_name("host"),
            message: "host is not set in configuration or environment".to_owned(),
        });
    }

    if uploader.resolved_username(env).trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: uploader.field_name("username"),
            message: "username is not set in configuration or environment".to_owned(),
        });
    }

    if uploader.path().is_none_or(|p| p.trim().is_empty()) {
        return Err(ConfigError::ValidationError {
            field: uploader.field_name("path"),
            message: "enabled uploaders need a path template".to_owned(),
        });
    }

    uploader.resolved_port(env)?;

    let base = uploader.base();
    for (key, secs) in [
        ("connect_timeout", base.connect_timeout()),
        ("read_timeout", base.read_timeout()),
    ] {
        if secs == 0 || secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::ValidationError {
                field: uploader.field_name(key),
                message: format!("{key} must be between 1 and {MAX_TIMEOUT_SECS} seconds"),
            });
        }
    }

    Ok(())
}
