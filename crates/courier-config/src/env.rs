//! Environment-backed value resolution.
//!
//! Every connection and credential field of an uploader is resolved through
//! an ordered cascade of candidate environment keys. The first key with a
//! non-blank value wins; otherwise the configured value is returned as-is.
//! Env vars therefore **override** configured values, the opposite of the
//! file-layer merge which only fills blanks.

use std::collections::HashMap;
use std::hash::BuildHasher;

use tracing::trace;

/// Read-only view of an external environment.
pub trait EnvSource: Send + Sync {
    /// Look up a single key. `None` when the key is absent.
    fn get(&self, key: &str) -> Option<String>;
}

impl<S: BuildHasher + Send + Sync> EnvSource for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl<E: EnvSource + ?Sized> EnvSource for &E {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

impl<E: EnvSource + ?Sized> EnvSource for std::sync::Arc<E> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// Collect all current environment variables into a snapshot.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Return the value of the first candidate key that is present and not blank,
/// or `fallback` verbatim when none is.
///
/// Keys are examined in order and the scan stops at the first hit.
pub fn resolve<E, K>(env: &E, keys: &[K], fallback: &str) -> String
where
    E: EnvSource + ?Sized,
    K: AsRef<str>,
{
    for key in keys {
        let key = key.as_ref();
        if let Some(value) = env.get(key).filter(|v| !v.trim().is_empty()) {
            trace!(key, "resolved from environment");
            return value;
        }
    }
    fallback.to_owned()
}

/// Convert an entity name to an env var segment.
///
/// camelCase boundaries become `_`, every other non-alphanumeric character
/// becomes `_`, and the result is upper-cased: `nightlyBuilds` and
/// `nightly-builds` both map to `NIGHTLY_BUILDS`.
#[must_use]
pub fn to_var(name: &str) -> String {
    let mut out = String::with_capacity(name.len().saturating_mul(2));
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if ch.is_ascii_uppercase() && prev_lower {
                out.push('_');
            }
            out.push(ch.to_ascii_uppercase());
            prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        } else {
            out.push('_');
            prev_lower = false;
        }
    }
    out
}

/// Where a cascade tier takes its prefix from.
#[derive(Debug, Clone, Copy)]
enum Prefix {
    /// Uploader-type prefix (`SCP`, `SFTP`).
    Tool,
    /// Transport-family prefix (`SSH`).
    Transport,
}

/// One tier of the cascade: a prefix source and whether the target name is
/// part of the key.
#[derive(Debug, Clone, Copy)]
struct Tier {
    prefix: Prefix,
    scoped: bool,
}

/// Most specific first: per-target keys before generic keys, tool prefix
/// before transport prefix.
const TIERS: &[Tier] = &[
    Tier {
        prefix: Prefix::Tool,
        scoped: true,
    },
    Tier {
        prefix: Prefix::Transport,
        scoped: true,
    },
    Tier {
        prefix: Prefix::Tool,
        scoped: false,
    },
    Tier {
        prefix: Prefix::Transport,
        scoped: false,
    },
];

/// Builds the candidate key list for a named entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cascade {
    tool_prefix: String,
    transport_prefix: String,
    scope: String,
}

impl Cascade {
    /// Create a cascade for the entity `name`.
    #[must_use]
    pub fn new(
        tool_prefix: impl Into<String>,
        transport_prefix: impl Into<String>,
        name: &str,
    ) -> Self {
        Self {
            tool_prefix: tool_prefix.into(),
            transport_prefix: transport_prefix.into(),
            scope: to_var(name),
        }
    }

    /// Candidate keys for `field` (an upper-snake suffix such as `HOST`).
    ///
    /// An empty entity name yields only the unscoped tiers.
    #[must_use]
    pub fn keys(&self, field: &str) -> Vec<String> {
        TIERS
            .iter()
            .filter(|tier| !tier.scoped || !self.scope.is_empty())
            .map(|tier| {
                let prefix = match tier.prefix {
                    Prefix::Tool => &self.tool_prefix,
                    Prefix::Transport => &self.transport_prefix,
                };
                if tier.scoped {
                    format!("{prefix}_{}_{field}", self.scope)
                } else {
                    format!("{prefix}_{field}")
                }
            })
            .collect()
    }

    /// Resolve `field` against `env`, falling back to `configured`.
    pub fn resolve<E: EnvSource + ?Sized>(
        &self,
        env: &E,
        field: &str,
        configured: Option<&str>,
    ) -> String {
        let keys = self.keys(field);
        resolve(env, keys.as_slice(), configured.unwrap_or_default())
    }
}
