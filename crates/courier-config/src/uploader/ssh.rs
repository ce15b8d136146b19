//! SSH-family uploaders (SCP and SFTP).
//!
//! Credential and connection fields are resolved through the environment
//! cascade built from the uploader kind (`SCP`, `SFTP`), the transport prefix
//! `SSH` and the target name. Paths and download URLs are templates rendered
//! per artifact.

use std::fmt;

use serde::Deserialize;
use tracing::debug;

use super::{Uploader, UploaderBase, UploaderBaseBuilder};
use crate::artifact::Artifact;
use crate::context::ReleaseContext;
use crate::entity::{AsMap, Configurable, FillDown, mask};
use crate::env::{Cascade, EnvSource};
use crate::error::{ConfigError, ConfigResult};
use crate::props::PropertyBag;
use crate::template::resolve_template;

/// Port used when no port is configured or set in the environment.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Transport-family environment prefix shared by every SSH uploader.
pub const TRANSPORT_PREFIX: &str = "SSH";

/// SSH uploader kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SshKind {
    /// Secure copy.
    Scp,
    /// SSH file transfer protocol.
    #[default]
    Sftp,
}

impl SshKind {
    /// Every kind, in display order.
    pub const ALL: [Self; 2] = [Self::Scp, Self::Sftp];

    /// Kind-specific environment prefix.
    #[must_use]
    pub fn env_prefix(self) -> &'static str {
        match self {
            Self::Scp => "SCP",
            Self::Sftp => "SFTP",
        }
    }

    /// Config-file spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scp => "scp",
            Self::Sftp => "sftp",
        }
    }
}

impl fmt::Display for SshKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields resolved through the environment cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SshField {
    /// Login name.
    Username,
    /// Login password.
    Password,
    /// Remote host.
    Host,
    /// Remote port.
    Port,
    /// Public key material or path.
    PublicKey,
    /// Private key material or path.
    PrivateKey,
    /// Private key passphrase.
    Passphrase,
    /// Expected host key fingerprint.
    Fingerprint,
}

impl SshField {
    /// Every cascaded field, in display order.
    pub const ALL: [Self; 8] = [
        Self::Host,
        Self::Port,
        Self::Username,
        Self::Password,
        Self::PublicKey,
        Self::PrivateKey,
        Self::Passphrase,
        Self::Fingerprint,
    ];

    /// Environment key suffix (`PUBLIC_KEY`).
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Username => "USERNAME",
            Self::Password => "PASSWORD",
            Self::Host => "HOST",
            Self::Port => "PORT",
            Self::PublicKey => "PUBLIC_KEY",
            Self::PrivateKey => "PRIVATE_KEY",
            Self::Passphrase => "PASSPHRASE",
            Self::Fingerprint => "FINGERPRINT",
        }
    }

    /// Config-file and `as_map` key (`public_key`).
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Password => "password",
            Self::Host => "host",
            Self::Port => "port",
            Self::PublicKey => "public_key",
            Self::PrivateKey => "private_key",
            Self::Passphrase => "passphrase",
            Self::Fingerprint => "fingerprint",
        }
    }

    /// Whether `as_map` masks this field.
    #[must_use]
    pub fn is_secret(self) -> bool {
        !matches!(self, Self::Host | Self::Port)
    }
}

/// SSH uploader (mutable form).
///
/// Deserialized from `[upload.<kind>.defaults]` and
/// `[upload.<kind>.targets.<name>]`. Name and kind come from the table
/// position, not from the table body.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SshUploaderBuilder {
    /// Target name.
    #[serde(skip)]
    pub name: String,
    /// Uploader kind.
    #[serde(skip)]
    pub kind: SshKind,
    /// Settings shared with every uploader kind.
    #[serde(flatten)]
    pub base: UploaderBaseBuilder,
    /// Login name.
    pub username: Option<String>,
    /// Login password.
    pub password: Option<String>,
    /// Remote host.
    pub host: Option<String>,
    /// Remote port.
    pub port: Option<u16>,
    /// `known_hosts` file to verify the host key against.
    pub known_hosts_file: Option<String>,
    /// Public key material or path.
    pub public_key: Option<String>,
    /// Private key material or path.
    pub private_key: Option<String>,
    /// Private key passphrase.
    pub passphrase: Option<String>,
    /// Expected host key fingerprint.
    pub fingerprint: Option<String>,
    /// Remote path template.
    pub path: Option<String>,
    /// Download URL template.
    pub download_url: Option<String>,
}

impl SshUploaderBuilder {
    /// Create an empty builder for the target `name`.
    #[must_use]
    pub fn new(kind: SshKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }
}

impl fmt::Debug for SshUploaderBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SshUploaderBuilder")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("base", &self.base)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("has_username", &self.username.is_some())
            .field("has_password", &self.password.is_some())
            .field("known_hosts_file", &self.known_hosts_file)
            .field("has_public_key", &self.public_key.is_some())
            .field("has_private_key", &self.private_key.is_some())
            .field("has_passphrase", &self.passphrase.is_some())
            .field("has_fingerprint", &self.fingerprint.is_some())
            .field("path", &self.path)
            .field("download_url", &self.download_url)
            .finish()
    }
}

impl Configurable for SshUploaderBuilder {
    type Frozen = SshUploader;

    fn merge(&mut self, other: &Self) {
        self.name.fill_down(&other.name);
        self.base.merge(&other.base);
        self.username.fill_down(&other.username);
        self.password.fill_down(&other.password);
        self.host.fill_down(&other.host);
        self.port.fill_down(&other.port);
        self.known_hosts_file.fill_down(&other.known_hosts_file);
        self.public_key.fill_down(&other.public_key);
        self.private_key.fill_down(&other.private_key);
        self.passphrase.fill_down(&other.passphrase);
        self.fingerprint.fill_down(&other.fingerprint);
        self.path.fill_down(&other.path);
        self.download_url.fill_down(&other.download_url);
    }

    fn freeze(self) -> SshUploader {
        debug!(kind = %self.kind, name = %self.name, "Freezing uploader");
        let cascade = Cascade::new(self.kind.env_prefix(), TRANSPORT_PREFIX, &self.name);
        SshUploader {
            cascade,
            name: self.name,
            kind: self.kind,
            base: self.base.freeze(),
            username: self.username,
            password: self.password,
            host: self.host,
            port: self.port,
            known_hosts_file: self.known_hosts_file,
            public_key: self.public_key,
            private_key: self.private_key,
            passphrase: self.passphrase,
            fingerprint: self.fingerprint,
            path: self.path,
            download_url: self.download_url,
        }
    }
}

/// SSH uploader (frozen form).
///
/// Holds the configured values only; every `resolved_*` accessor consults
/// the environment on each call.
#[derive(Clone, PartialEq, Eq)]
pub struct SshUploader {
    name: String,
    kind: SshKind,
    cascade: Cascade,
    base: UploaderBase,
    username: Option<String>,
    password: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    known_hosts_file: Option<String>,
    public_key: Option<String>,
    private_key: Option<String>,
    passphrase: Option<String>,
    fingerprint: Option<String>,
    path: Option<String>,
    download_url: Option<String>,
}

impl SshUploader {
    /// Uploader kind.
    #[must_use]
    pub fn kind(&self) -> SshKind {
        self.kind
    }

    /// Dotted config name of `key` on this uploader (`upload.sftp.mirror.port`).
    #[must_use]
    pub fn field_name(&self, key: &str) -> String {
        format!("upload.{}.{}.{key}", self.kind, self.name)
    }

    /// Environment keys consulted for `field`, most specific first.
    #[must_use]
    pub fn env_keys(&self, field: SshField) -> Vec<String> {
        self.cascade.keys(field.suffix())
    }

    /// Value set in configuration for `field`, ignoring the environment.
    #[must_use]
    pub fn configured(&self, field: SshField) -> Option<String> {
        let text = match field {
            SshField::Port => return self.port.map(|p| p.to_string()),
            SshField::Username => &self.username,
            SshField::Password => &self.password,
            SshField::Host => &self.host,
            SshField::PublicKey => &self.public_key,
            SshField::PrivateKey => &self.private_key,
            SshField::Passphrase => &self.passphrase,
            SshField::Fingerprint => &self.fingerprint,
        };
        text.clone()
    }

    /// Effective value of `field`: the first non-blank environment value in
    /// the cascade, else the configured value, else an empty string.
    #[must_use]
    pub fn resolved(&self, env: &dyn EnvSource, field: SshField) -> String {
        let configured = self.configured(field);
        self.cascade
            .resolve(env, field.suffix(), configured.as_deref())
    }

    /// Effective login name.
    #[must_use]
    pub fn resolved_username(&self, env: &dyn EnvSource) -> String {
        self.resolved(env, SshField::Username)
    }

    /// Effective password.
    #[must_use]
    pub fn resolved_password(&self, env: &dyn EnvSource) -> String {
        self.resolved(env, SshField::Password)
    }

    /// Effective host.
    #[must_use]
    pub fn resolved_host(&self, env: &dyn EnvSource) -> String {
        self.resolved(env, SshField::Host)
    }

    /// Effective port.
    ///
    /// A blank value resolves to [`DEFAULT_SSH_PORT`]. Any other value is
    /// parsed verbatim, so surrounding whitespace is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] if the resolved value is not
    /// an integer in `1..=65535`.
    pub fn resolved_port(&self, env: &dyn EnvSource) -> ConfigResult<u16> {
        let raw = self.resolved(env, SshField::Port);
        if raw.trim().is_empty() {
            return Ok(DEFAULT_SSH_PORT);
        }
        match raw.parse::<u16>() {
            Ok(port) if port != 0 => Ok(port),
            _ => Err(ConfigError::InvalidNumber {
                field: self.field_name("port"),
                value: raw,
            }),
        }
    }

    /// Effective public key.
    #[must_use]
    pub fn resolved_public_key(&self, env: &dyn EnvSource) -> String {
        self.resolved(env, SshField::PublicKey)
    }

    /// Effective private key.
    #[must_use]
    pub fn resolved_private_key(&self, env: &dyn EnvSource) -> String {
        self.resolved(env, SshField::PrivateKey)
    }

    /// Effective private key passphrase.
    #[must_use]
    pub fn resolved_passphrase(&self, env: &dyn EnvSource) -> String {
        self.resolved(env, SshField::Passphrase)
    }

    /// Effective host key fingerprint.
    #[must_use]
    pub fn resolved_fingerprint(&self, env: &dyn EnvSource) -> String {
        self.resolved(env, SshField::Fingerprint)
    }

    /// Configured `known_hosts` file. Not read from the environment.
    #[must_use]
    pub fn known_hosts_file(&self) -> Option<&str> {
        self.known_hosts_file.as_deref()
    }

    /// Remote path template.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Download URL template.
    #[must_use]
    pub fn download_url(&self) -> Option<&str> {
        self.download_url.as_deref()
    }

    /// Render the path template over an explicit base bag.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingTemplate`] if no path is configured, or
    /// [`ConfigError::Template`] if it fails to render.
    pub fn resolved_path_with(
        &self,
        props: &PropertyBag,
        artifact: &Artifact,
    ) -> ConfigResult<String> {
        self.render(self.path.as_deref(), "path", props, artifact)
    }

    /// Render the download URL template over an explicit base bag.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingTemplate`] if no URL is configured, or
    /// [`ConfigError::Template`] if it fails to render.
    pub fn resolved_download_url_with(
        &self,
        props: &PropertyBag,
        artifact: &Artifact,
    ) -> ConfigResult<String> {
        self.render(self.download_url.as_deref(), "download_url", props, artifact)
    }

    /// Base bag, then artifact properties, then uploader extra properties.
    fn render(
        &self,
        template: Option<&str>,
        key: &str,
        props: &PropertyBag,
        artifact: &Artifact,
    ) -> ConfigResult<String> {
        let template = template
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingTemplate {
                field: self.field_name(key),
            })?;

        let mut context = artifact.props(props);
        context.extend_strings(self.base.extra_properties());

        let rendered = resolve_template(template, &context)?;
        debug!(
            uploader = %self.name,
            kind = %self.kind,
            field = key,
            value = %rendered,
            "Resolved template"
        );
        Ok(rendered)
    }
}

impl fmt::Debug for SshUploader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SshUploader")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("base", &self.base)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("has_username", &self.username.is_some())
            .field("has_password", &self.password.is_some())
            .field("known_hosts_file", &self.known_hosts_file)
            .field("has_public_key", &self.public_key.is_some())
            .field("has_private_key", &self.private_key.is_some())
            .field("has_passphrase", &self.passphrase.is_some())
            .field("has_fingerprint", &self.fingerprint.is_some())
            .field("path", &self.path)
            .field("download_url", &self.download_url)
            .finish_non_exhaustive()
    }
}

impl AsMap for SshUploader {
    fn as_map(&self, full: bool, ctx: &ReleaseContext) -> ConfigResult<PropertyBag> {
        let enabled = self.is_enabled(ctx.project());
        if !full && !enabled {
            return Ok(PropertyBag::new());
        }

        let env = ctx.env();
        let mut map = PropertyBag::new();
        self.base.write_map(enabled, &mut map);

        for field in SshField::ALL {
            match field {
                SshField::Port => {
                    map.insert(field.key(), self.resolved_port(env)?);
                },
                SshField::Host => {
                    map.insert(field.key(), self.resolved_host(env));
                },
                _ => {
                    map.insert(field.key(), mask(&self.resolved(env, field)));
                },
            }
        }

        if let Some(known_hosts) = &self.known_hosts_file {
            map.insert("known_hosts_file", known_hosts.as_str());
        }
        if let Some(path) = &self.path {
            map.insert("path", path.as_str());
        }
        if let Some(url) = &self.download_url {
            map.insert("download_url", url.as_str());
        }

        let extra: PropertyBag = self
            .base
            .extra_properties()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        map.insert_bag("extra_properties", extra);

        let mut bag = PropertyBag::new();
        bag.insert_bag(self.name.as_str(), map);
        Ok(bag)
    }
}

impl Uploader for SshUploader {
    fn kind_name(&self) -> &'static str {
        self.kind.as_str()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn base(&self) -> &UploaderBase {
        &self.base
    }

    fn resolved_path(&self, ctx: &ReleaseContext, artifact: &Artifact) -> ConfigResult<String> {
        self.resolved_path_with(&ctx.full_props(), artifact)
    }

    fn resolved_download_url(
        &self,
        ctx: &ReleaseContext,
        artifact: &Artifact,
    ) -> ConfigResult<String> {
        self.resolved_download_url_with(&ctx.full_props(), artifact)
    }
}
